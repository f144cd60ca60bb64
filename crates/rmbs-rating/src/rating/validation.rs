use std::fmt;

use super::domain::{MortgagePortfolio, MortgageRecord, RmbsPayload};
use super::thresholds::{CREDIT_SCORE_MAX, CREDIT_SCORE_MIN};

/// Domain violation found while turning a submission into rated inputs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("credit_score must be between {min} and {max} (found {found})")]
    CreditScoreOutOfRange { found: i64, min: u16, max: u16 },
    #[error("{field} must be a positive amount (found {value})")]
    NonPositiveAmount { field: &'static str, value: f64 },
    #[error("loan_type must be one of 'fixed', 'adjustable' (found '{0}')")]
    UnknownLoanType(String),
    #[error("property_type must be one of 'single_family', 'condo' (found '{0}')")]
    UnknownPropertyType(String),
    #[error("portfolio must contain at least one mortgage")]
    EmptyPortfolio,
}

pub(crate) fn check_credit_score(value: i64) -> Result<u16, ValidationError> {
    if (i64::from(CREDIT_SCORE_MIN)..=i64::from(CREDIT_SCORE_MAX)).contains(&value) {
        u16::try_from(value).map_err(|_| out_of_range(value))
    } else {
        Err(out_of_range(value))
    }
}

fn out_of_range(found: i64) -> ValidationError {
    ValidationError::CreditScoreOutOfRange {
        found,
        min: CREDIT_SCORE_MIN,
        max: CREDIT_SCORE_MAX,
    }
}

pub(crate) fn check_amount(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ValidationError::NonPositiveAmount { field, value })
    }
}

/// One validation failure, located by the index of the offending mortgage
/// when it concerns a single record.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub mortgage_index: Option<usize>,
    pub error: ValidationError,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mortgage_index {
            Some(index) => write!(f, "mortgages[{index}]: {}", self.error),
            None => write!(f, "{}", self.error),
        }
    }
}

/// Every violation found in a payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrors {
    violations: Vec<Violation>,
}

impl ValidationErrors {
    pub fn single(error: ValidationError) -> Self {
        Self {
            violations: vec![Violation {
                mortgage_index: None,
                error,
            }],
        }
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(ToString::to_string).collect()
    }

    pub fn is_empty_portfolio(&self) -> bool {
        matches!(
            self.violations.as_slice(),
            [Violation {
                error: ValidationError::EmptyPortfolio,
                ..
            }]
        )
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid payload: {}", self.messages().join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self::single(error)
    }
}

/// Convert a wire payload into a rated portfolio, rejecting it as a whole if
/// any mortgage is invalid or the batch is empty.
pub fn validate_payload(payload: RmbsPayload) -> Result<MortgagePortfolio, ValidationErrors> {
    if payload.mortgages.is_empty() {
        return Err(ValidationError::EmptyPortfolio.into());
    }

    let mut records = Vec::with_capacity(payload.mortgages.len());
    let mut violations = Vec::new();

    for (index, submission) in payload.mortgages.into_iter().enumerate() {
        match MortgageRecord::try_from(submission) {
            Ok(record) => records.push(record),
            Err(errors) => violations.extend(errors.into_iter().map(|error| Violation {
                mortgage_index: Some(index),
                error,
            })),
        }
    }

    if !violations.is_empty() {
        return Err(ValidationErrors { violations });
    }

    Ok(MortgagePortfolio::new(records)?)
}
