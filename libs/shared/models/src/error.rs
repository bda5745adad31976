use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Slot unavailable: {0}")]
    SlotUnavailable(String),

    #[error("Already cancelled: {0}")]
    AlreadyCancelled(String),

    #[error("Not payable: {0}")]
    NotPayable(String),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Doctor unavailable: {0}")]
    DoctorUnavailable(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Gateway unavailable: {0}")]
    GatewayUnavailable(String),
}

impl AppError {
    /// Stable machine-readable code carried alongside the human message.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Auth(_) => "UNAUTHORIZED",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::SlotUnavailable(_) => "SLOT_UNAVAILABLE",
            AppError::AlreadyCancelled(_) => "ALREADY_CANCELLED",
            AppError::NotPayable(_) => "NOT_PAYABLE",
            AppError::InvalidSignature(_) => "INVALID_SIGNATURE",
            AppError::DoctorUnavailable(_) => "DOCTOR_UNAVAILABLE",
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::GatewayUnavailable(_) => "GATEWAY_UNAVAILABLE",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::SlotUnavailable(_) => StatusCode::CONFLICT,
            AppError::AlreadyCancelled(_) => StatusCode::CONFLICT,
            AppError::NotPayable(_) => StatusCode::CONFLICT,
            AppError::InvalidSignature(_) => StatusCode::BAD_REQUEST,
            AppError::DoctorUnavailable(_) => StatusCode::CONFLICT,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::GatewayUnavailable(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        tracing::error!("Error: {}: {}", status, message);

        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
