use std::sync::Arc;

use appointment_cell::services::store::AppointmentStore;
use shared_config::AppConfig;

use crate::services::reconcile::PaymentService;

#[derive(Clone)]
pub struct PaymentState {
    pub config: Arc<AppConfig>,
    pub store: Arc<AppointmentStore>,
    pub payments: Arc<PaymentService>,
}
