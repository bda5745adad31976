use std::sync::Arc;

use shared_config::AppConfig;

use crate::services::profile::PatientDirectory;

#[derive(Clone)]
pub struct PatientState {
    pub config: Arc<AppConfig>,
    pub directory: Arc<PatientDirectory>,
}
