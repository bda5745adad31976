// libs/payment-cell/src/handlers.rs
use axum::{
    extract::{Extension, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{CreateOrderRequest, PaymentError, VerifyOutcome, VerifyPaymentRequest};
use crate::state::PaymentState;

fn map_payment_error(e: PaymentError) -> AppError {
    match e {
        PaymentError::NotFound => AppError::NotFound("Appointment not found".to_string()),
        PaymentError::NotPayable => {
            AppError::NotPayable("Appointment not valid for payment".to_string())
        }
        PaymentError::InvalidSignature => {
            AppError::InvalidSignature("Payment verification failed".to_string())
        }
        PaymentError::GatewayUnavailable => {
            AppError::GatewayUnavailable("Payment gateway unavailable".to_string())
        }
        PaymentError::StorageError(msg) => AppError::Storage(msg),
    }
}

#[axum::debug_handler]
pub async fn create_payment_order(
    State(state): State<PaymentState>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<Json<Value>, AppError> {
    let requester_id = Uuid::parse_str(&user.id)
        .map_err(|_| AppError::Auth("Principal id is not a valid uuid".to_string()))?;

    // Only the owning patient pays for an appointment.
    let appointment = state
        .store
        .get(request.appointment_id)
        .await
        .ok_or_else(|| AppError::NotFound("Appointment not found".to_string()))?;
    if appointment.patient_id != requester_id {
        return Err(AppError::Auth("Not authorized to pay for this appointment".to_string()));
    }

    let order_id = state
        .payments
        .create_order(request.appointment_id)
        .await
        .map_err(map_payment_error)?;

    Ok(Json(json!({
        "success": true,
        "order_id": order_id,
        "amount": appointment.amount * 100,
    })))
}

#[axum::debug_handler]
pub async fn verify_payment(
    State(state): State<PaymentState>,
    Json(request): Json<VerifyPaymentRequest>,
) -> Result<Json<Value>, AppError> {
    let outcome = state
        .payments
        .verify(
            &request.gateway_order_id,
            &request.gateway_payment_id,
            &request.gateway_signature,
        )
        .await
        .map_err(map_payment_error)?;

    Ok(Json(json!({
        "success": true,
        "already_applied": outcome == VerifyOutcome::AlreadyApplied,
        "message": "Payment successful",
    })))
}
