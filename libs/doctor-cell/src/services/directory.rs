// libs/doctor-cell/src/services/directory.rs
use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{CreateDoctorRequest, Doctor};

/// In-memory doctor profile directory.
///
/// Profile management proper is outside the booking core; this is the
/// collaborator interface the coordinator reads doctors through. Mutation
/// of `slots_booked` state lives in the slot ledger, never here.
pub struct DoctorDirectory {
    doctors: RwLock<HashMap<Uuid, Doctor>>,
}

impl DoctorDirectory {
    pub fn new() -> Self {
        Self {
            doctors: RwLock::new(HashMap::new()),
        }
    }

    pub async fn create(&self, request: CreateDoctorRequest) -> Doctor {
        let now = Utc::now();
        let doctor = Doctor {
            id: Uuid::new_v4(),
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            specialty: request.specialty,
            degree: request.degree,
            about: request.about,
            address: request.address,
            profile_image_url: request.profile_image_url,
            consultation_fee: request.consultation_fee,
            is_available: true,
            created_at: now,
            updated_at: now,
        };

        self.doctors.write().await.insert(doctor.id, doctor.clone());
        info!("Doctor {} registered in directory", doctor.id);
        doctor
    }

    pub async fn get(&self, doctor_id: Uuid) -> Option<Doctor> {
        self.doctors.read().await.get(&doctor_id).cloned()
    }

    pub async fn list(&self) -> Vec<Doctor> {
        let mut doctors: Vec<Doctor> = self.doctors.read().await.values().cloned().collect();
        doctors.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        doctors
    }

    /// Toggle or set the global availability flag. Returns the updated
    /// doctor, or None when the id is unknown.
    pub async fn set_available(&self, doctor_id: Uuid, is_available: bool) -> Option<Doctor> {
        let mut doctors = self.doctors.write().await;
        let doctor = doctors.get_mut(&doctor_id)?;
        doctor.is_available = is_available;
        doctor.updated_at = Utc::now();
        debug!("Doctor {} availability set to {}", doctor_id, is_available);
        Some(doctor.clone())
    }
}

impl Default for DoctorDirectory {
    fn default() -> Self {
        Self::new()
    }
}
