use std::sync::Arc;

use shared_config::AppConfig;

use crate::services::directory::DoctorDirectory;
use crate::services::slots::SlotLedger;

#[derive(Clone)]
pub struct DoctorState {
    pub config: Arc<AppConfig>,
    pub directory: Arc<DoctorDirectory>,
    pub ledger: Arc<SlotLedger>,
}
