// libs/payment-cell/src/models.rs
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub appointment_id: Uuid,
}

/// Gateway callback payload relayed after a completed checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyPaymentRequest {
    pub gateway_order_id: String,
    pub gateway_payment_id: String,
    pub gateway_signature: String,
}

/// Order request forwarded to the external gateway, with the amount in the
/// smallest currency unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayOrderRequest {
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
}

/// Outcome of a verification. A replayed callback on an already-paid
/// appointment is reported as success without re-mutating anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    Applied,
    AlreadyApplied,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum PaymentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Appointment not valid for payment")]
    NotPayable,

    #[error("Payment verification failed")]
    InvalidSignature,

    #[error("Payment gateway unavailable")]
    GatewayUnavailable,

    #[error("Storage error: {0}")]
    StorageError(String),
}
