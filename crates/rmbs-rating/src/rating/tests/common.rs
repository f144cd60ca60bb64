use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::rating::calculators::{ComputationError, RiskCalculator, RiskFactor};
use crate::rating::domain::{
    LoanType, MortgageRecord, MortgageSubmission, PropertyType, RmbsPayload,
};
use crate::rating::observer::{RatingEvent, RatingObserver};
use crate::rating::service::RatingService;

pub(super) fn mortgage(
    credit_score: u16,
    loan_amount: f64,
    property_value: f64,
    annual_income: f64,
    debt_amount: f64,
    loan_type: LoanType,
    property_type: PropertyType,
) -> MortgageRecord {
    MortgageRecord::new(
        credit_score,
        loan_amount,
        property_value,
        annual_income,
        debt_amount,
        loan_type,
        property_type,
    )
    .expect("valid mortgage")
}

/// LTV 0.8, DTI 33.3, good credit, fixed single family: scores -2.
pub(super) fn prime_mortgage() -> MortgageRecord {
    mortgage(
        750,
        200_000.0,
        250_000.0,
        60_000.0,
        20_000.0,
        LoanType::Fixed,
        PropertyType::SingleFamily,
    )
}

/// LTV 0.95, DTI 55, poor credit, adjustable condo: scores 7.
pub(super) fn distressed_mortgage() -> MortgageRecord {
    mortgage(
        600,
        285_000.0,
        300_000.0,
        60_000.0,
        33_000.0,
        LoanType::Adjustable,
        PropertyType::Condo,
    )
}

/// LTV 0.85, DTI 45, credit 640, adjustable condo: scores 5.
pub(super) fn stretched_mortgage() -> MortgageRecord {
    mortgage(
        640,
        170_000.0,
        200_000.0,
        60_000.0,
        27_000.0,
        LoanType::Adjustable,
        PropertyType::Condo,
    )
}

/// LTV 0.6, DTI 25, credit 710, fixed single family: scores -2.
pub(super) fn conservative_mortgage() -> MortgageRecord {
    mortgage(
        710,
        150_000.0,
        250_000.0,
        80_000.0,
        20_000.0,
        LoanType::Fixed,
        PropertyType::SingleFamily,
    )
}

pub(super) fn submission_from(record: &MortgageRecord) -> MortgageSubmission {
    MortgageSubmission {
        credit_score: i64::from(record.credit_score()),
        loan_amount: record.loan_amount(),
        property_value: record.property_value(),
        annual_income: record.annual_income(),
        debt_amount: record.debt_amount(),
        loan_type: record.loan_type().label().to_string(),
        property_type: record.property_type().label().to_string(),
    }
}

pub(super) fn payload(records: &[MortgageRecord]) -> RmbsPayload {
    RmbsPayload {
        mortgages: records.iter().map(submission_from).collect(),
    }
}

pub(super) fn low_risk_payload() -> RmbsPayload {
    payload(&[prime_mortgage()])
}

pub(super) fn medium_risk_payload() -> RmbsPayload {
    payload(&[stretched_mortgage(), conservative_mortgage()])
}

/// Two distressed mortgages plus one conservative: 7 + 7 - 2, average credit
/// below 650 adds one more.
pub(super) fn high_risk_payload() -> RmbsPayload {
    payload(&[
        distressed_mortgage(),
        distressed_mortgage(),
        conservative_mortgage(),
    ])
}

/// Calculator that fails on every mortgage.
pub(super) struct FaultyCalculator;

impl RiskCalculator for FaultyCalculator {
    fn factor(&self) -> RiskFactor {
        RiskFactor::DebtToIncome
    }

    fn calculate(&self, _mortgage: &MortgageRecord) -> Result<i32, ComputationError> {
        Err(ComputationError::NonFiniteRatio {
            factor: RiskFactor::DebtToIncome,
        })
    }

    fn explain(&self, _mortgage: &MortgageRecord) -> String {
        "always fails".to_string()
    }
}

#[derive(Default)]
pub(super) struct RecordingObserver {
    events: Mutex<Vec<RatingEvent>>,
}

impl RatingObserver for RecordingObserver {
    fn observe(&self, event: &RatingEvent) {
        self.events
            .lock()
            .expect("observer mutex poisoned")
            .push(event.clone());
    }
}

impl RecordingObserver {
    pub(super) fn events(&self) -> Vec<RatingEvent> {
        self.events.lock().expect("observer mutex poisoned").clone()
    }
}

pub(super) fn build_service() -> (RatingService<RecordingObserver>, Arc<RecordingObserver>) {
    let observer = Arc::new(RecordingObserver::default());
    (RatingService::new(observer.clone()), observer)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
