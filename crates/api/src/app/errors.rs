use std::str::FromStr;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use conrod_infra::LedgerError;

pub fn ledger_error_to_response(err: LedgerError) -> axum::response::Response {
    let message = err.to_string();
    match err {
        LedgerError::Validation(_) => json_error(StatusCode::BAD_REQUEST, "validation_error", message),
        LedgerError::NotFound(_) => json_error(StatusCode::NOT_FOUND, "not_found", message),
        LedgerError::ComponentUnavailable { .. } => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "component_unavailable", message)
        }
        LedgerError::InsufficientStock { .. } => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "insufficient_stock", message)
        }
        LedgerError::SerialCollision(_) => json_error(StatusCode::CONFLICT, "serial_collision", message),
        LedgerError::Incomplete { .. } => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "partial_failure", message)
        }
        LedgerError::Store(_) => json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", message),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Parse a path id, answering 400 `invalid_id` on failure.
pub fn parse_id<T: FromStr>(raw: &str, what: &str) -> Result<T, axum::response::Response> {
    raw.parse()
        .map_err(|_| json_error(StatusCode::BAD_REQUEST, "invalid_id", format!("invalid {what} id")))
}

#[cfg(test)]
mod tests {
    use conrod_infra::StoreError;
    use conrod_production::ComponentRole;

    use super::*;

    #[test]
    fn each_failure_kind_gets_its_own_status() {
        let cases = [
            (LedgerError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (LedgerError::NotFound("bill"), StatusCode::NOT_FOUND),
            (
                LedgerError::ComponentUnavailable {
                    role: ComponentRole::Pin,
                    name: "P1".into(),
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (LedgerError::SerialCollision(3), StatusCode::CONFLICT),
            (
                LedgerError::Store(StoreError::Backend("down".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ledger_error_to_response(err).status(), status);
        }
    }

    #[test]
    fn malformed_ids_are_bad_requests() {
        let res = parse_id::<conrod_core::BillId>("not-a-uuid", "bill").unwrap_err();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
