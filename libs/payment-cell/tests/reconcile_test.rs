use std::sync::Arc;

use assert_matches::assert_matches;
use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use appointment_cell::models::{Appointment, BookAppointmentRequest};
use appointment_cell::services::booking::BookingService;
use appointment_cell::services::store::AppointmentStore;
use doctor_cell::models::CreateDoctorRequest;
use doctor_cell::services::directory::DoctorDirectory;
use doctor_cell::services::slots::SlotLedger;
use patient_cell::models::UpsertPatientRequest;
use patient_cell::services::profile::PatientDirectory;
use payment_cell::models::{GatewayOrderRequest, PaymentError, VerifyOutcome};
use payment_cell::services::gateway::PaymentGateway;
use payment_cell::services::reconcile::PaymentService;
use payment_cell::services::signature::payment_signature;

const KEY_SECRET: &str = "test-gateway-secret";

/// Gateway stub recording the last order request it was handed.
struct StubGateway {
    fail: bool,
    last_request: Mutex<Option<GatewayOrderRequest>>,
}

impl StubGateway {
    fn new() -> Self {
        Self {
            fail: false,
            last_request: Mutex::new(None),
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            last_request: Mutex::new(None),
        }
    }
}

#[async_trait]
impl PaymentGateway for StubGateway {
    async fn create_order(&self, request: GatewayOrderRequest) -> Result<String, PaymentError> {
        if self.fail {
            return Err(PaymentError::GatewayUnavailable);
        }
        let order_id = format!("order_{}", request.receipt);
        *self.last_request.lock().await = Some(request);
        Ok(order_id)
    }
}

struct TestHarness {
    store: Arc<AppointmentStore>,
    payments: PaymentService,
    gateway: Arc<StubGateway>,
    appointment: Appointment,
}

async fn setup_with_gateway(gateway: StubGateway) -> TestHarness {
    let doctors = Arc::new(DoctorDirectory::new());
    let patients = Arc::new(PatientDirectory::new());
    let ledger = Arc::new(SlotLedger::new());
    let store = Arc::new(AppointmentStore::new());
    let booking = BookingService::new(
        Arc::clone(&doctors),
        Arc::clone(&patients),
        ledger,
        Arc::clone(&store),
    );

    let doctor = doctors
        .create(CreateDoctorRequest {
            first_name: "Riya".to_string(),
            last_name: "Mehta".to_string(),
            email: "riya.mehta@example.com".to_string(),
            specialty: "General Practice".to_string(),
            degree: None,
            about: None,
            address: None,
            profile_image_url: None,
            consultation_fee: 500,
        })
        .await;

    let patient_id = Uuid::new_v4();
    patients
        .upsert(
            patient_id,
            UpsertPatientRequest {
                first_name: "Uma".to_string(),
                last_name: "Kapoor".to_string(),
                email: "uma@example.com".to_string(),
                phone_number: None,
                address: None,
                profile_image_url: None,
                date_of_birth: None,
            },
        )
        .await;

    let appointment = booking
        .book(
            patient_id,
            BookAppointmentRequest {
                doctor_id: doctor.id,
                slot_date: "2024_1_15".to_string(),
                slot_time: "10:00".to_string(),
            },
        )
        .await
        .unwrap();

    let gateway = Arc::new(gateway);
    let payments = PaymentService::new(
        Arc::clone(&store),
        Arc::clone(&gateway) as Arc<dyn PaymentGateway>,
        KEY_SECRET.to_string(),
        "INR".to_string(),
    );

    TestHarness {
        store,
        payments,
        gateway,
        appointment,
    }
}

async fn setup() -> TestHarness {
    setup_with_gateway(StubGateway::new()).await
}

#[tokio::test]
async fn create_order_converts_to_minor_units_and_stores_order_id() {
    let harness = setup().await;

    let order_id = harness
        .payments
        .create_order(harness.appointment.id)
        .await
        .unwrap();

    let request = harness.gateway.last_request.lock().await.clone().unwrap();
    assert_eq!(request.amount, 500 * 100);
    assert_eq!(request.currency, "INR");
    assert_eq!(request.receipt, harness.appointment.id.to_string());

    let stored = harness.store.get(harness.appointment.id).await.unwrap();
    assert_eq!(stored.gateway_order_id.as_deref(), Some(order_id.as_str()));
}

#[tokio::test]
async fn create_order_for_unknown_appointment_is_not_found() {
    let harness = setup().await;
    let err = harness.payments.create_order(Uuid::new_v4()).await.unwrap_err();
    assert_matches!(err, PaymentError::NotFound);
}

#[tokio::test]
async fn create_order_refuses_cancelled_and_paid_appointments() {
    let harness = setup().await;
    let order_id = harness
        .payments
        .create_order(harness.appointment.id)
        .await
        .unwrap();

    // Pay it, then try to create another order.
    let signature = payment_signature(&order_id, "pay_1", KEY_SECRET);
    harness
        .payments
        .verify(&order_id, "pay_1", &signature)
        .await
        .unwrap();

    let err = harness
        .payments
        .create_order(harness.appointment.id)
        .await
        .unwrap_err();
    assert_matches!(err, PaymentError::NotPayable);
}

#[tokio::test]
async fn gateway_failure_leaves_appointment_untouched() {
    let harness = setup_with_gateway(StubGateway::failing()).await;

    let err = harness
        .payments
        .create_order(harness.appointment.id)
        .await
        .unwrap_err();
    assert_matches!(err, PaymentError::GatewayUnavailable);

    let stored = harness.store.get(harness.appointment.id).await.unwrap();
    assert!(stored.gateway_order_id.is_none());
    assert!(!stored.paid);
}

#[tokio::test]
async fn verify_applies_payment_exactly_once() {
    let harness = setup().await;
    let order_id = harness
        .payments
        .create_order(harness.appointment.id)
        .await
        .unwrap();
    let signature = payment_signature(&order_id, "pay_1", KEY_SECRET);

    let outcome = harness
        .payments
        .verify(&order_id, "pay_1", &signature)
        .await
        .unwrap();
    assert_eq!(outcome, VerifyOutcome::Applied);

    let stored = harness.store.get(harness.appointment.id).await.unwrap();
    assert!(stored.paid);
    assert_eq!(stored.gateway_payment_id.as_deref(), Some("pay_1"));
    assert_eq!(stored.gateway_signature.as_deref(), Some(signature.as_str()));

    // A duplicated callback reports success without re-mutating anything.
    let outcome = harness
        .payments
        .verify(&order_id, "pay_1", &signature)
        .await
        .unwrap();
    assert_eq!(outcome, VerifyOutcome::AlreadyApplied);

    let after_replay = harness.store.get(harness.appointment.id).await.unwrap();
    assert_eq!(after_replay.gateway_payment_id, stored.gateway_payment_id);
    assert_eq!(after_replay.gateway_signature, stored.gateway_signature);
    assert!(after_replay.paid);
}

#[tokio::test]
async fn tampered_signature_never_mutates_state() {
    let harness = setup().await;
    let order_id = harness
        .payments
        .create_order(harness.appointment.id)
        .await
        .unwrap();
    let forged = payment_signature(&order_id, "pay_1", "wrong-secret");

    for _ in 0..3 {
        let err = harness
            .payments
            .verify(&order_id, "pay_1", &forged)
            .await
            .unwrap_err();
        assert_matches!(err, PaymentError::InvalidSignature);
    }

    let stored = harness.store.get(harness.appointment.id).await.unwrap();
    assert!(!stored.paid);
    assert!(stored.gateway_payment_id.is_none());
}

#[tokio::test]
async fn valid_signature_for_unknown_order_creates_no_state() {
    let harness = setup().await;

    // Correctly signed, but the order id was never issued here.
    let signature = payment_signature("order_forged", "pay_1", KEY_SECRET);
    let err = harness
        .payments
        .verify("order_forged", "pay_1", &signature)
        .await
        .unwrap_err();
    assert_matches!(err, PaymentError::NotFound);

    let stored = harness.store.get(harness.appointment.id).await.unwrap();
    assert!(!stored.paid);
}
