//! SQLite-backed entity store.
//!
//! Flat tables, one per entity, plus `issued_serials`: every catalog serial
//! ever handed out, never deleted, so the high-water mark survives catalog
//! deletions. Ids, dates and decimal amounts are stored as text; dimension
//! sets are stored as a JSON text blob next to the owning row.
//!
//! ## Error Mapping
//!
//! | SQLx Error | StoreError |
//! |------------|------------|
//! | Database (unique violation) | `Conflict` |
//! | Database (other) | `Backend` |
//! | ColumnDecode / ColumnNotFound / Decode | `Corrupt` |
//! | PoolClosed / Other | `Backend` |
//!
//! Lists are ordered by `rowid`, i.e. insertion order.

use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use tracing::instrument;

use conrod_catalog::{ConrodDefinition, ConrodDimensions};
use conrod_core::{BillId, ConrodId, CustomerId, ProductId, ProductionId, ValueObject};
use conrod_invoicing::Bill;
use conrod_parties::Customer;
use conrod_production::ProductionRecord;
use conrod_products::{Product, ProductDimensions, ProductType};

use super::{EntityStore, StoreError, StoreResult};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id           TEXT PRIMARY KEY,
        product_name TEXT NOT NULL,
        product_type TEXT NOT NULL,
        dimensions   TEXT NOT NULL,
        quantity     INTEGER NOT NULL,
        date         TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS conrods (
        id           TEXT PRIMARY KEY,
        sr_no        INTEGER NOT NULL UNIQUE,
        name         TEXT NOT NULL,
        dimensions   TEXT NOT NULL,
        pin          TEXT NOT NULL,
        ball_bearing TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS issued_serials (
        sr_no INTEGER PRIMARY KEY
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS production (
        id        TEXT PRIMARY KEY,
        conrod_id TEXT NOT NULL,
        quantity  INTEGER NOT NULL,
        size      TEXT NULL,
        date      TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS customers (
        id      TEXT PRIMARY KEY,
        name    TEXT NOT NULL,
        address TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS bills (
        id            TEXT PRIMARY KEY,
        invoice_no    TEXT NOT NULL,
        customer_id   TEXT NULL,
        production_id TEXT NOT NULL,
        quantity      INTEGER NOT NULL,
        amount        TEXT NOT NULL,
        date          TEXT NOT NULL
    )
    "#,
];

/// SQLite-backed entity store.
///
/// `SqlitePool` is `Send + Sync` and cheap to clone; every statement checks a
/// connection out of the pool, so statements serialize at the database while
/// ledger operations do not.
#[derive(Debug, Clone)]
pub struct SqliteEntityStore {
    pool: SqlitePool,
}

impl SqliteEntityStore {
    /// Connect to `url` (e.g. `sqlite://ledger.db` or `sqlite::memory:`) and
    /// create the schema if it is missing.
    pub async fn connect(url: &str) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| map_sqlx_error("connect", e))?
            .create_if_missing(true);

        // Each connection to an in-memory URL opens its own empty database,
        // so the pool must hold exactly one connection for the process lifetime.
        let pool_options = if url.contains(":memory:") || url.contains("mode=memory") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> StoreResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("migrate", e))?;
        }
        Ok(())
    }

    async fn fetch_all<T>(
        &self,
        operation: &str,
        sql: &str,
        decode: fn(&SqliteRow) -> StoreResult<T>,
    ) -> StoreResult<Vec<T>> {
        let rows = sqlx::query(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(operation, e))?;
        rows.iter().map(decode).collect()
    }

    async fn fetch_by_id<T>(
        &self,
        operation: &str,
        sql: &str,
        id: String,
        decode: fn(&SqliteRow) -> StoreResult<T>,
    ) -> StoreResult<Option<T>> {
        let row = sqlx::query(sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(operation, e))?;
        row.as_ref().map(decode).transpose()
    }

    async fn delete_by_id(&self, operation: &str, sql: &str, id: String) -> StoreResult<bool> {
        let result = sqlx::query(sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(operation, e))?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl EntityStore for SqliteEntityStore {
    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        self.fetch_all(
            "list_products",
            "SELECT id, product_name, product_type, dimensions, quantity, date FROM products ORDER BY rowid",
            product_from_row,
        )
        .await
    }

    async fn get_product(&self, id: ProductId) -> StoreResult<Option<Product>> {
        self.fetch_by_id(
            "get_product",
            "SELECT id, product_name, product_type, dimensions, quantity, date FROM products WHERE id = ?1",
            id.to_string(),
            product_from_row,
        )
        .await
    }

    #[instrument(skip(self, product), fields(product_id = %product.id), err)]
    async fn insert_product(&self, product: &Product) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO products (id, product_name, product_type, dimensions, quantity, date)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(product.id.to_string())
        .bind(&product.product_name)
        .bind(product.product_type.as_str())
        .bind(encode_blob(&product.dimensions)?)
        .bind(product.quantity)
        .bind(product.date.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_product", e))?;
        Ok(())
    }

    #[instrument(skip(self, product), fields(product_id = %product.id), err)]
    async fn update_product(&self, product: &Product) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET product_name = ?2, product_type = ?3, dimensions = ?4, quantity = ?5, date = ?6
            WHERE id = ?1
            "#,
        )
        .bind(product.id.to_string())
        .bind(&product.product_name)
        .bind(product.product_type.as_str())
        .bind(encode_blob(&product.dimensions)?)
        .bind(product.quantity)
        .bind(product.date.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_product", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_product(&self, id: ProductId) -> StoreResult<bool> {
        self.delete_by_id("delete_product", "DELETE FROM products WHERE id = ?1", id.to_string())
            .await
    }

    async fn list_conrods(&self) -> StoreResult<Vec<ConrodDefinition>> {
        self.fetch_all(
            "list_conrods",
            "SELECT id, sr_no, name, dimensions, pin, ball_bearing FROM conrods ORDER BY rowid",
            conrod_from_row,
        )
        .await
    }

    async fn get_conrod(&self, id: ConrodId) -> StoreResult<Option<ConrodDefinition>> {
        self.fetch_by_id(
            "get_conrod",
            "SELECT id, sr_no, name, dimensions, pin, ball_bearing FROM conrods WHERE id = ?1",
            id.to_string(),
            conrod_from_row,
        )
        .await
    }

    async fn conrod_with_serial(&self, sr_no: u32) -> StoreResult<Option<ConrodDefinition>> {
        let row = sqlx::query(
            "SELECT id, sr_no, name, dimensions, pin, ball_bearing FROM conrods WHERE sr_no = ?1",
        )
        .bind(i64::from(sr_no))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("conrod_with_serial", e))?;
        row.as_ref().map(conrod_from_row).transpose()
    }

    async fn serial_high_water(&self) -> StoreResult<Option<u32>> {
        let row = sqlx::query("SELECT MAX(sr_no) AS high_water FROM issued_serials")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("serial_high_water", e))?;
        let high_water: Option<i64> = row
            .try_get("high_water")
            .map_err(|e| map_sqlx_error("serial_high_water", e))?;
        high_water.map(serial_from_i64).transpose()
    }

    #[instrument(skip(self, conrod), fields(conrod_id = %conrod.id, sr_no = conrod.sr_no), err)]
    async fn insert_conrod(&self, conrod: &ConrodDefinition) -> StoreResult<()> {
        let dimensions = encode_blob(&conrod.dimensions)?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("insert_conrod", e))?;

        sqlx::query("INSERT INTO issued_serials (sr_no) VALUES (?1)")
            .bind(i64::from(conrod.sr_no))
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("insert_conrod", e))?;

        sqlx::query(
            r#"
            INSERT INTO conrods (id, sr_no, name, dimensions, pin, ball_bearing)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(conrod.id.to_string())
        .bind(i64::from(conrod.sr_no))
        .bind(&conrod.name)
        .bind(dimensions)
        .bind(&conrod.pin)
        .bind(&conrod.ball_bearing)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("insert_conrod", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("insert_conrod", e))?;
        Ok(())
    }

    #[instrument(skip(self, conrod), fields(conrod_id = %conrod.id), err)]
    async fn update_conrod(&self, conrod: &ConrodDefinition) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE conrods
            SET name = ?2, dimensions = ?3, pin = ?4, ball_bearing = ?5
            WHERE id = ?1
            "#,
        )
        .bind(conrod.id.to_string())
        .bind(&conrod.name)
        .bind(encode_blob(&conrod.dimensions)?)
        .bind(&conrod.pin)
        .bind(&conrod.ball_bearing)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_conrod", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_conrod(&self, id: ConrodId) -> StoreResult<bool> {
        self.delete_by_id("delete_conrod", "DELETE FROM conrods WHERE id = ?1", id.to_string())
            .await
    }

    async fn list_production(&self) -> StoreResult<Vec<ProductionRecord>> {
        self.fetch_all(
            "list_production",
            "SELECT id, conrod_id, quantity, size, date FROM production ORDER BY rowid",
            production_from_row,
        )
        .await
    }

    async fn get_production(&self, id: ProductionId) -> StoreResult<Option<ProductionRecord>> {
        self.fetch_by_id(
            "get_production",
            "SELECT id, conrod_id, quantity, size, date FROM production WHERE id = ?1",
            id.to_string(),
            production_from_row,
        )
        .await
    }

    #[instrument(skip(self, record), fields(production_id = %record.id), err)]
    async fn insert_production(&self, record: &ProductionRecord) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO production (id, conrod_id, quantity, size, date)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(record.id.to_string())
        .bind(record.conrod_id.to_string())
        .bind(record.quantity)
        .bind(record.size.as_deref())
        .bind(record.date.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_production", e))?;
        Ok(())
    }

    #[instrument(skip(self, record), fields(production_id = %record.id), err)]
    async fn update_production(&self, record: &ProductionRecord) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE production
            SET conrod_id = ?2, quantity = ?3, size = ?4, date = ?5
            WHERE id = ?1
            "#,
        )
        .bind(record.id.to_string())
        .bind(record.conrod_id.to_string())
        .bind(record.quantity)
        .bind(record.size.as_deref())
        .bind(record.date.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_production", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_production(&self, id: ProductionId) -> StoreResult<bool> {
        self.delete_by_id("delete_production", "DELETE FROM production WHERE id = ?1", id.to_string())
            .await
    }

    async fn list_customers(&self) -> StoreResult<Vec<Customer>> {
        self.fetch_all(
            "list_customers",
            "SELECT id, name, address FROM customers ORDER BY rowid",
            customer_from_row,
        )
        .await
    }

    async fn insert_customer(&self, customer: &Customer) -> StoreResult<()> {
        sqlx::query("INSERT INTO customers (id, name, address) VALUES (?1, ?2, ?3)")
            .bind(customer.id.to_string())
            .bind(&customer.name)
            .bind(&customer.address)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert_customer", e))?;
        Ok(())
    }

    async fn delete_customer(&self, id: CustomerId) -> StoreResult<bool> {
        self.delete_by_id("delete_customer", "DELETE FROM customers WHERE id = ?1", id.to_string())
            .await
    }

    async fn list_bills(&self) -> StoreResult<Vec<Bill>> {
        self.fetch_all(
            "list_bills",
            "SELECT id, invoice_no, customer_id, production_id, quantity, amount, date FROM bills ORDER BY rowid",
            bill_from_row,
        )
        .await
    }

    async fn get_bill(&self, id: BillId) -> StoreResult<Option<Bill>> {
        self.fetch_by_id(
            "get_bill",
            "SELECT id, invoice_no, customer_id, production_id, quantity, amount, date FROM bills WHERE id = ?1",
            id.to_string(),
            bill_from_row,
        )
        .await
    }

    #[instrument(skip(self, bill), fields(bill_id = %bill.id), err)]
    async fn insert_bill(&self, bill: &Bill) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO bills (id, invoice_no, customer_id, production_id, quantity, amount, date)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(bill.id.to_string())
        .bind(&bill.invoice_no)
        .bind(bill.customer_id.map(|id| id.to_string()))
        .bind(bill.production_id.to_string())
        .bind(bill.quantity)
        .bind(bill.amount.to_string())
        .bind(bill.date.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_bill", e))?;
        Ok(())
    }

    async fn delete_bill(&self, id: BillId) -> StoreResult<bool> {
        self.delete_by_id("delete_bill", "DELETE FROM bills WHERE id = ?1", id.to_string())
            .await
    }
}

fn product_from_row(row: &SqliteRow) -> StoreResult<Product> {
    Ok(Product {
        id: parse(&text(row, "id")?, "product id")?,
        product_name: text(row, "product_name")?,
        product_type: ProductType::classify(&text(row, "product_type")?),
        dimensions: decode_blob::<ProductDimensions>(&text(row, "dimensions")?)?,
        quantity: integer(row, "quantity")?,
        date: parse(&text(row, "date")?, "product date")?,
    })
}

fn conrod_from_row(row: &SqliteRow) -> StoreResult<ConrodDefinition> {
    Ok(ConrodDefinition {
        id: parse(&text(row, "id")?, "conrod id")?,
        sr_no: serial_from_i64(integer(row, "sr_no")?)?,
        name: text(row, "name")?,
        dimensions: decode_blob::<ConrodDimensions>(&text(row, "dimensions")?)?,
        pin: text(row, "pin")?,
        ball_bearing: text(row, "ball_bearing")?,
    })
}

fn production_from_row(row: &SqliteRow) -> StoreResult<ProductionRecord> {
    Ok(ProductionRecord {
        id: parse(&text(row, "id")?, "production id")?,
        conrod_id: parse(&text(row, "conrod_id")?, "conrod id")?,
        quantity: integer(row, "quantity")?,
        size: optional_text(row, "size")?,
        date: parse(&text(row, "date")?, "production date")?,
    })
}

fn customer_from_row(row: &SqliteRow) -> StoreResult<Customer> {
    Ok(Customer {
        id: parse(&text(row, "id")?, "customer id")?,
        name: text(row, "name")?,
        address: text(row, "address")?,
    })
}

fn bill_from_row(row: &SqliteRow) -> StoreResult<Bill> {
    let customer_id = optional_text(row, "customer_id")?
        .map(|raw| parse(&raw, "customer id"))
        .transpose()?;

    Ok(Bill {
        id: parse(&text(row, "id")?, "bill id")?,
        invoice_no: text(row, "invoice_no")?,
        customer_id,
        production_id: parse(&text(row, "production_id")?, "production id")?,
        quantity: integer(row, "quantity")?,
        amount: parse(&text(row, "amount")?, "bill amount")?,
        date: parse(&text(row, "date")?, "bill date")?,
    })
}

fn text(row: &SqliteRow, column: &str) -> StoreResult<String> {
    row.try_get(column).map_err(|e| map_sqlx_error(column, e))
}

fn optional_text(row: &SqliteRow, column: &str) -> StoreResult<Option<String>> {
    row.try_get(column).map_err(|e| map_sqlx_error(column, e))
}

fn integer(row: &SqliteRow, column: &str) -> StoreResult<i64> {
    row.try_get(column).map_err(|e| map_sqlx_error(column, e))
}

fn parse<T>(raw: &str, what: &str) -> StoreResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    raw.parse()
        .map_err(|e| StoreError::Corrupt(format!("invalid {what} '{raw}': {e}")))
}

fn serial_from_i64(raw: i64) -> StoreResult<u32> {
    u32::try_from(raw).map_err(|_| StoreError::Corrupt(format!("serial number {raw} out of range")))
}

fn encode_blob<V: ValueObject + Serialize>(value: &V) -> StoreResult<String> {
    serde_json::to_string(value)
        .map_err(|e| StoreError::Backend(format!("failed to encode dimensions: {e}")))
}

fn decode_blob<V: ValueObject + DeserializeOwned>(raw: &str) -> StoreResult<V> {
    serde_json::from_str(raw)
        .map_err(|e| StoreError::Corrupt(format!("invalid dimensions blob: {e}")))
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            if db_err.is_unique_violation() {
                StoreError::Conflict(msg)
            } else {
                StoreError::Backend(msg)
            }
        }
        err @ (sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::Decode(_)) => StoreError::Corrupt(format!("{operation}: {err}")),
        sqlx::Error::PoolClosed => {
            StoreError::Backend(format!("connection pool closed in {}", operation))
        }
        other => StoreError::Backend(format!("sqlx error in {}: {}", operation, other)),
    }
}
