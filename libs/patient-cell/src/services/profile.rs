// libs/patient-cell/src/services/profile.rs
use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::models::{Patient, UpsertPatientRequest};

/// In-memory patient profile directory. The booking core only reads display
/// fields from it when taking the appointment snapshot; profile management
/// itself is outside the core.
pub struct PatientDirectory {
    patients: RwLock<HashMap<Uuid, Patient>>,
}

impl PatientDirectory {
    pub fn new() -> Self {
        Self {
            patients: RwLock::new(HashMap::new()),
        }
    }

    pub async fn upsert(&self, patient_id: Uuid, request: UpsertPatientRequest) -> Patient {
        let now = Utc::now();
        let mut patients = self.patients.write().await;
        let created_at = patients
            .get(&patient_id)
            .map(|existing| existing.created_at)
            .unwrap_or(now);

        let patient = Patient {
            id: patient_id,
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            phone_number: request.phone_number,
            address: request.address,
            profile_image_url: request.profile_image_url,
            date_of_birth: request.date_of_birth,
            created_at,
            updated_at: now,
        };

        patients.insert(patient_id, patient.clone());
        info!("Patient profile {} saved", patient_id);
        patient
    }

    pub async fn get(&self, patient_id: Uuid) -> Option<Patient> {
        self.patients.read().await.get(&patient_id).cloned()
    }
}

impl Default for PatientDirectory {
    fn default() -> Self {
        Self::new()
    }
}
