use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use order_intake_engine::IntakeError;
use serde_json::json;
use thiserror::Error;

pub const REJECTED_ITEMS_MESSAGE: &str = "Some items could not be matched to menu or have invalid prices";

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid request body. {0}")]
    InvalidRequestBody(String),
    #[error("{0}")]
    Intake(#[from] IntakeError),
    #[error("Internal server error. {0}")]
    Unspecified(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::Intake(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            Self::Intake(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            Self::Intake(e @ IntakeError::RejectedItems(failed)) => json!({
                "error": e.to_string(),
                "failed_items": failed,
                "message": REJECTED_ITEMS_MESSAGE,
            }),
            _ => json!({ "error": self.to_string() }),
        };
        HttpResponse::build(self.status_code()).insert_header(ContentType::json()).body(body.to_string())
    }
}
