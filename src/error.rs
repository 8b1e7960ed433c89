use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{sqlx, DbErr, RuntimeErr, SqlErr};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(DbErr),

    #[error("Store unavailable: {0}")]
    TransientStore(DbErr),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Stable machine-readable code carried in every error body.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Database(_) => "database_error",
            Self::TransientStore(_) => "store_unavailable",
            Self::NotFound(_) => "not_found",
            Self::ForeignKeyViolation(_) => "foreign_key_violation",
            Self::ConstraintViolation(_) => "constraint_violation",
            Self::Validation(_) => "bad_request",
            Self::Internal(_) | Self::Other(_) => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) | Self::ForeignKeyViolation(_) => StatusCode::NOT_FOUND,
            Self::ConstraintViolation(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::TransientStore(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Database(_) | Self::Internal(_) | Self::Other(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        if let Some(SqlErr::ForeignKeyConstraintViolation(msg)) = err.sql_err() {
            return Self::ForeignKeyViolation(msg);
        }
        if is_sqlite_restrict_violation(&err) {
            return Self::ForeignKeyViolation(err.to_string());
        }

        match err {
            DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => Self::TransientStore(err),
            DbErr::RecordNotFound(msg) => Self::NotFound(msg),
            DbErr::RecordNotUpdated => Self::NotFound("Record no longer exists".to_string()),
            other => Self::Database(other),
        }
    }
}

/// SQLite reports an `ON DELETE RESTRICT` failure as SQLITE_CONSTRAINT_TRIGGER
/// (1811) rather than SQLITE_CONSTRAINT_FOREIGNKEY (787).
fn is_sqlite_restrict_violation(err: &DbErr) -> bool {
    let runtime = match err {
        DbErr::Exec(e) | DbErr::Query(e) => e,
        _ => return false,
    };
    match runtime {
        RuntimeErr::SqlxError(sqlx::Error::Database(e)) => {
            e.code().as_deref() == Some("1811") && e.message().contains("FOREIGN KEY")
        }
        _ => false,
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            Self::Database(e) => tracing::error!("Database error: {}", e),
            Self::TransientStore(e) => tracing::error!("Store unavailable: {}", e),
            Self::Internal(msg) => tracing::error!("Internal error: {}", msg),
            Self::Other(e) => tracing::error!("Unexpected error: {}", e),
            _ => tracing::debug!("Request rejected: {}", self),
        }

        let body = Json(json!({
            "error": self.code(),
            "details": self.to_string(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_not_found_maps_to_not_found() {
        let err: AppError = DbErr::RecordNotFound("song 7".to_string()).into();
        assert!(matches!(err, AppError::NotFound(ref msg) if msg == "song 7"));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_record_not_updated_maps_to_not_found() {
        let err: AppError = DbErr::RecordNotUpdated.into();
        assert_eq!(err.code(), "not_found");
    }

    #[test]
    fn test_other_db_errors_are_internal() {
        let err: AppError = DbErr::Custom("boom".to_string()).into();
        assert!(matches!(err, AppError::Database(_)));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_rule_failures_are_distinguishable() {
        let missing = AppError::NotFound("album 1".to_string());
        let dangling = AppError::ForeignKeyViolation("artist 9".to_string());
        let blocked = AppError::ConstraintViolation("album 1 has songs".to_string());
        let invalid = AppError::Validation("nombre".to_string());

        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        assert_eq!(dangling.status(), StatusCode::NOT_FOUND);
        assert_eq!(blocked.status(), StatusCode::BAD_REQUEST);
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

        let codes = [missing.code(), dangling.code(), blocked.code(), invalid.code()];
        for (i, a) in codes.iter().enumerate() {
            for b in codes.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
