// libs/payment-cell/src/services/reconcile.rs
use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use appointment_cell::models::AppointmentPatch;
use appointment_cell::services::store::AppointmentStore;

use crate::models::{GatewayOrderRequest, PaymentError, VerifyOutcome};
use crate::services::gateway::PaymentGateway;
use crate::services::signature::verify_payment_signature;

/// Applies external payment confirmations to appointments, exactly once.
pub struct PaymentService {
    store: Arc<AppointmentStore>,
    gateway: Arc<dyn PaymentGateway>,
    key_secret: String,
    currency: String,
}

impl PaymentService {
    pub fn new(
        store: Arc<AppointmentStore>,
        gateway: Arc<dyn PaymentGateway>,
        key_secret: String,
        currency: String,
    ) -> Self {
        Self {
            store,
            gateway,
            key_secret,
            currency,
        }
    }

    /// Create a gateway order for an appointment. The appointment is only
    /// mutated once the gateway has handed back an order id, so a timed-out
    /// call can be retried safely.
    pub async fn create_order(&self, appointment_id: Uuid) -> Result<String, PaymentError> {
        debug!("Creating payment order for appointment {}", appointment_id);

        let appointment = self
            .store
            .get(appointment_id)
            .await
            .ok_or(PaymentError::NotFound)?;

        if appointment.cancelled || appointment.paid {
            return Err(PaymentError::NotPayable);
        }

        let order_request = GatewayOrderRequest {
            // Gateway amounts are in the smallest currency unit.
            amount: appointment.amount * 100,
            currency: self.currency.clone(),
            receipt: appointment_id.to_string(),
        };

        let order_id = self.gateway.create_order(order_request).await?;

        self.store
            .update(
                appointment_id,
                AppointmentPatch {
                    gateway_order_id: Some(order_id.clone()),
                    ..AppointmentPatch::default()
                },
            )
            .await
            .map_err(|e| PaymentError::StorageError(e.to_string()))?;

        info!(
            "Gateway order {} created for appointment {}",
            order_id, appointment_id
        );
        Ok(order_id)
    }

    /// Apply a gateway payment callback.
    ///
    /// The signature gates everything: nothing is looked up, let alone
    /// mutated, until it checks out. The `paid == false` precondition makes
    /// duplicated callbacks side-effect free after the first.
    pub async fn verify(
        &self,
        order_id: &str,
        payment_id: &str,
        provided_signature: &str,
    ) -> Result<VerifyOutcome, PaymentError> {
        if !verify_payment_signature(order_id, payment_id, provided_signature, &self.key_secret) {
            // Deliberately unspecific: the caller never learns why.
            warn!("Rejected payment callback for order {}", order_id);
            return Err(PaymentError::InvalidSignature);
        }

        let appointment = self
            .store
            .find_by_order_id(order_id)
            .await
            .ok_or(PaymentError::NotFound)?;

        if appointment.paid {
            info!(
                "Duplicate payment callback for appointment {} ignored",
                appointment.id
            );
            return Ok(VerifyOutcome::AlreadyApplied);
        }

        self.store
            .update(
                appointment.id,
                AppointmentPatch {
                    paid: Some(true),
                    gateway_payment_id: Some(payment_id.to_string()),
                    gateway_signature: Some(provided_signature.to_string()),
                    ..AppointmentPatch::default()
                },
            )
            .await
            .map_err(|e| PaymentError::StorageError(e.to_string()))?;

        info!("Payment applied to appointment {}", appointment.id);
        Ok(VerifyOutcome::Applied)
    }
}
