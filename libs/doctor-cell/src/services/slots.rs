// libs/doctor-cell/src/services/slots.rs
use std::collections::{BTreeSet, HashMap};

use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::models::{BookedSlots, SlotError};

/// Per-doctor slot ledger: the single source of truth for availability.
///
/// Date and time tokens are opaque strings supplied by the caller. Each
/// date maps to a set of booked time tokens, so a token can never appear
/// twice for one date. `reserve` and `release` for a given doctor are
/// linearizable: both take the write guard for their whole check-and-mutate
/// step. Multi-step booking sequences are serialized one level up by the
/// coordinator's per-doctor lock.
pub struct SlotLedger {
    slots: RwLock<HashMap<Uuid, HashMap<String, BTreeSet<String>>>>,
}

impl SlotLedger {
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
        }
    }

    pub async fn is_booked(&self, doctor_id: Uuid, date: &str, time: &str) -> bool {
        self.slots
            .read()
            .await
            .get(&doctor_id)
            .and_then(|days| days.get(date))
            .map(|times| times.contains(time))
            .unwrap_or(false)
    }

    /// Atomically add the time token to the date's booked set. Fails with
    /// `SlotTaken` when the token is already present.
    pub async fn reserve(
        &self,
        doctor_id: Uuid,
        date: &str,
        time: &str,
    ) -> Result<(), SlotError> {
        let mut slots = self.slots.write().await;
        let times = slots
            .entry(doctor_id)
            .or_default()
            .entry(date.to_string())
            .or_default();

        if !times.insert(time.to_string()) {
            return Err(SlotError::SlotTaken);
        }

        debug!("Slot {} {} reserved for doctor {}", date, time, doctor_id);
        Ok(())
    }

    /// Remove the time token from the date's booked set. Releasing a slot
    /// that is already free is a no-op, not an error.
    pub async fn release(&self, doctor_id: Uuid, date: &str, time: &str) {
        let mut slots = self.slots.write().await;
        if let Some(days) = slots.get_mut(&doctor_id) {
            if let Some(times) = days.get_mut(date) {
                times.remove(time);
                if times.is_empty() {
                    days.remove(date);
                }
            }
            if days.is_empty() {
                slots.remove(&doctor_id);
            }
        }
        debug!("Slot {} {} released for doctor {}", date, time, doctor_id);
    }

    /// Snapshot of all booked tokens for one doctor, for listings and
    /// consistency checks.
    pub async fn booked_slots(&self, doctor_id: Uuid) -> BookedSlots {
        self.slots
            .read()
            .await
            .get(&doctor_id)
            .map(|days| {
                days.iter()
                    .map(|(date, times)| (date.clone(), times.iter().cloned().collect()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Default for SlotLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reserve_marks_slot_booked() {
        let ledger = SlotLedger::new();
        let doctor_id = Uuid::new_v4();

        assert!(!ledger.is_booked(doctor_id, "2024_1_15", "10:00").await);
        ledger.reserve(doctor_id, "2024_1_15", "10:00").await.unwrap();
        assert!(ledger.is_booked(doctor_id, "2024_1_15", "10:00").await);
    }

    #[tokio::test]
    async fn double_reserve_fails_with_slot_taken() {
        let ledger = SlotLedger::new();
        let doctor_id = Uuid::new_v4();

        ledger.reserve(doctor_id, "2024_1_15", "10:00").await.unwrap();
        let err = ledger.reserve(doctor_id, "2024_1_15", "10:00").await.unwrap_err();
        assert_eq!(err, SlotError::SlotTaken);
    }

    #[tokio::test]
    async fn same_time_on_other_dates_and_doctors_is_free() {
        let ledger = SlotLedger::new();
        let doctor_a = Uuid::new_v4();
        let doctor_b = Uuid::new_v4();

        ledger.reserve(doctor_a, "2024_1_15", "10:00").await.unwrap();
        ledger.reserve(doctor_a, "2024_1_16", "10:00").await.unwrap();
        ledger.reserve(doctor_b, "2024_1_15", "10:00").await.unwrap();

        assert!(ledger.is_booked(doctor_a, "2024_1_15", "10:00").await);
        assert!(ledger.is_booked(doctor_a, "2024_1_16", "10:00").await);
        assert!(ledger.is_booked(doctor_b, "2024_1_15", "10:00").await);
    }

    #[tokio::test]
    async fn release_is_idempotent() {
        let ledger = SlotLedger::new();
        let doctor_id = Uuid::new_v4();

        ledger.reserve(doctor_id, "2024_1_15", "10:00").await.unwrap();
        ledger.release(doctor_id, "2024_1_15", "10:00").await;
        assert!(!ledger.is_booked(doctor_id, "2024_1_15", "10:00").await);

        // Releasing an already-free slot is a no-op.
        ledger.release(doctor_id, "2024_1_15", "10:00").await;
        assert!(!ledger.is_booked(doctor_id, "2024_1_15", "10:00").await);

        ledger.reserve(doctor_id, "2024_1_15", "10:00").await.unwrap();
        assert!(ledger.is_booked(doctor_id, "2024_1_15", "10:00").await);
    }

    #[tokio::test]
    async fn booked_slots_returns_per_date_sets() {
        let ledger = SlotLedger::new();
        let doctor_id = Uuid::new_v4();

        ledger.reserve(doctor_id, "2024_1_15", "10:00").await.unwrap();
        ledger.reserve(doctor_id, "2024_1_15", "11:00").await.unwrap();
        ledger.reserve(doctor_id, "2024_1_16", "09:30").await.unwrap();

        let booked = ledger.booked_slots(doctor_id).await;
        assert_eq!(booked.len(), 2);
        assert_eq!(booked["2024_1_15"], vec!["10:00", "11:00"]);
        assert_eq!(booked["2024_1_16"], vec!["09:30"]);
    }
}
