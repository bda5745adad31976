use std::sync::Arc;

use shared_config::AppConfig;

use crate::services::booking::BookingService;

#[derive(Clone)]
pub struct AppointmentState {
    pub config: Arc<AppConfig>,
    pub booking: Arc<BookingService>,
}
