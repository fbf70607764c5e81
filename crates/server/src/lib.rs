use axum::{Json, http::StatusCode, response::IntoResponse};
use ledger::LedgerError;
use serde::Serialize;

pub use server::{app, run, run_with_listener, spawn_with_listener};

mod advances;
mod boq;
mod categories;
mod convert;
mod expenses;
mod organizations;
mod parties;
mod payments;
mod projects;
mod server;
mod summaries;
mod tasks;
mod user;

pub enum ServerError {
    Ledger(LedgerError),
    Generic(String),
}

/// `{"success": true, "data": ...}` with an explicit status code.
pub(crate) struct ApiOk<T>(pub StatusCode, pub T);

impl<T> ApiOk<T> {
    pub(crate) fn ok(data: T) -> Self {
        Self(StatusCode::OK, data)
    }

    pub(crate) fn created(data: T) -> Self {
        Self(StatusCode::CREATED, data)
    }
}

#[derive(Serialize)]
struct SuccessBody<T> {
    success: bool,
    data: T,
}

impl<T: Serialize> IntoResponse for ApiOk<T> {
    fn into_response(self) -> axum::response::Response {
        let body = SuccessBody {
            success: true,
            data: self.1,
        };
        (self.0, Json(body)).into_response()
    }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    message: String,
    code: &'static str,
}

fn status_for_ledger_error(err: &LedgerError) -> (StatusCode, &'static str) {
    match err {
        LedgerError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        LedgerError::AlreadyExists(_) => (StatusCode::CONFLICT, "conflict"),
        LedgerError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),
        LedgerError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation"),
        LedgerError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
    }
}

fn message_for_ledger_error(err: LedgerError) -> String {
    match err {
        LedgerError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, code, message) = match self {
            ServerError::Ledger(err) => {
                let (status, code) = status_for_ledger_error(&err);
                (status, code, message_for_ledger_error(err))
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, "bad_request", err),
        };

        let body = ErrorBody {
            success: false,
            error: ErrorDetail { message, code },
        };
        (status, Json(body)).into_response()
    }
}

impl From<LedgerError> for ServerError {
    fn from(value: LedgerError) -> Self {
        Self::Ledger(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let res = ServerError::from(LedgerError::NotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn already_exists_maps_to_409() {
        let res = ServerError::from(LedgerError::AlreadyExists("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn forbidden_maps_to_403() {
        let res = ServerError::from(LedgerError::Forbidden("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn validation_maps_to_422() {
        let res = ServerError::from(LedgerError::Validation("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn database_maps_to_500() {
        let res =
            ServerError::from(LedgerError::Database(sea_orm::DbErr::Custom("x".to_string())))
                .into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
