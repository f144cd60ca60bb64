use serde::{Deserialize, Serialize};

use super::domain::{LoanType, MortgageRecord, PropertyType};
use super::thresholds::*;

/// Identifies which rule produced a risk contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    LoanToValue,
    DebtToIncome,
    CreditScore,
    LoanType,
    PropertyType,
}

impl RiskFactor {
    pub fn label(&self) -> &'static str {
        match self {
            RiskFactor::LoanToValue => "loan_to_value",
            RiskFactor::DebtToIncome => "debt_to_income",
            RiskFactor::CreditScore => "credit_score",
            RiskFactor::LoanType => "loan_type",
            RiskFactor::PropertyType => "property_type",
        }
    }
}

/// Arithmetic fault inside a calculator. Validation rejects the inputs that
/// could cause these, so hitting one means a record bypassed validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ComputationError {
    #[error("{} received non-positive denominator {field}={value}", .factor.label())]
    InvalidDenominator {
        factor: RiskFactor,
        field: &'static str,
        value: f64,
    },
    #[error("{} produced a non-finite ratio", .factor.label())]
    NonFiniteRatio { factor: RiskFactor },
}

/// Single scoring rule mapping one mortgage to a signed risk contribution.
pub trait RiskCalculator: Send + Sync {
    fn factor(&self) -> RiskFactor;

    fn calculate(&self, mortgage: &MortgageRecord) -> Result<i32, ComputationError>;

    /// Human readable description of the measured input, for rating breakdowns.
    fn explain(&self, mortgage: &MortgageRecord) -> String;
}

fn checked_ratio(
    factor: RiskFactor,
    numerator: f64,
    field: &'static str,
    denominator: f64,
) -> Result<f64, ComputationError> {
    if !(denominator.is_finite() && denominator > 0.0) {
        return Err(ComputationError::InvalidDenominator {
            factor,
            field,
            value: denominator,
        });
    }

    let ratio = numerator / denominator;
    if ratio.is_finite() {
        Ok(ratio)
    } else {
        Err(ComputationError::NonFiniteRatio { factor })
    }
}

/// `loan_amount / property_value`.
pub fn loan_to_value(mortgage: &MortgageRecord) -> Result<f64, ComputationError> {
    checked_ratio(
        RiskFactor::LoanToValue,
        mortgage.loan_amount(),
        "property_value",
        mortgage.property_value(),
    )
}

/// Debt as a percentage of annual income.
pub fn debt_to_income(mortgage: &MortgageRecord) -> Result<f64, ComputationError> {
    checked_ratio(
        RiskFactor::DebtToIncome,
        mortgage.debt_amount(),
        "annual_income",
        mortgage.annual_income(),
    )
    .map(|ratio| ratio * 100.0)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LoanToValueRisk;

impl RiskCalculator for LoanToValueRisk {
    fn factor(&self) -> RiskFactor {
        RiskFactor::LoanToValue
    }

    fn calculate(&self, mortgage: &MortgageRecord) -> Result<i32, ComputationError> {
        let ltv = loan_to_value(mortgage)?;
        Ok(if ltv > LTV_HIGH_THRESHOLD {
            LTV_HIGH_SCORE
        } else if ltv > LTV_MEDIUM_THRESHOLD {
            LTV_MEDIUM_SCORE
        } else {
            LTV_LOW_SCORE
        })
    }

    fn explain(&self, mortgage: &MortgageRecord) -> String {
        match loan_to_value(mortgage) {
            Ok(ltv) => format!(
                "loan-to-value {ltv:.3} (medium above {LTV_MEDIUM_THRESHOLD}, high above {LTV_HIGH_THRESHOLD})"
            ),
            Err(err) => err.to_string(),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DebtToIncomeRisk;

impl RiskCalculator for DebtToIncomeRisk {
    fn factor(&self) -> RiskFactor {
        RiskFactor::DebtToIncome
    }

    fn calculate(&self, mortgage: &MortgageRecord) -> Result<i32, ComputationError> {
        let dti = debt_to_income(mortgage)?;
        Ok(if dti > DTI_HIGH_THRESHOLD {
            DTI_HIGH_SCORE
        } else if dti > DTI_MEDIUM_THRESHOLD {
            DTI_MEDIUM_SCORE
        } else {
            DTI_LOW_SCORE
        })
    }

    fn explain(&self, mortgage: &MortgageRecord) -> String {
        match debt_to_income(mortgage) {
            Ok(dti) => format!(
                "debt-to-income {dti:.1}% (medium above {DTI_MEDIUM_THRESHOLD}%, high above {DTI_HIGH_THRESHOLD}%)"
            ),
            Err(err) => err.to_string(),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CreditScoreRisk;

impl RiskCalculator for CreditScoreRisk {
    fn factor(&self) -> RiskFactor {
        RiskFactor::CreditScore
    }

    fn calculate(&self, mortgage: &MortgageRecord) -> Result<i32, ComputationError> {
        let score = mortgage.credit_score();
        Ok(if score >= CREDIT_SCORE_GOOD {
            CREDIT_SCORE_GOOD_DEDUCTION
        } else if score < CREDIT_SCORE_POOR {
            CREDIT_SCORE_POOR_ADDITION
        } else {
            CREDIT_SCORE_NEUTRAL
        })
    }

    fn explain(&self, mortgage: &MortgageRecord) -> String {
        let score = mortgage.credit_score();
        if score >= CREDIT_SCORE_GOOD {
            format!("credit score {score} at or above {CREDIT_SCORE_GOOD}")
        } else if score < CREDIT_SCORE_POOR {
            format!("credit score {score} below {CREDIT_SCORE_POOR}")
        } else {
            format!("credit score {score} in neutral band")
        }
    }
}

/// Exhaustive over `LoanType`; a new category fails to compile here until it
/// is given a score.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoanTypeRisk;

impl RiskCalculator for LoanTypeRisk {
    fn factor(&self) -> RiskFactor {
        RiskFactor::LoanType
    }

    fn calculate(&self, mortgage: &MortgageRecord) -> Result<i32, ComputationError> {
        Ok(match mortgage.loan_type() {
            LoanType::Fixed => LOAN_TYPE_FIXED_SCORE,
            LoanType::Adjustable => LOAN_TYPE_ADJUSTABLE_SCORE,
        })
    }

    fn explain(&self, mortgage: &MortgageRecord) -> String {
        format!("{} rate loan", mortgage.loan_type().label())
    }
}

/// Exhaustive over `PropertyType`, same as `LoanTypeRisk`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PropertyTypeRisk;

impl RiskCalculator for PropertyTypeRisk {
    fn factor(&self) -> RiskFactor {
        RiskFactor::PropertyType
    }

    fn calculate(&self, mortgage: &MortgageRecord) -> Result<i32, ComputationError> {
        Ok(match mortgage.property_type() {
            PropertyType::Condo => PROPERTY_TYPE_CONDO_SCORE,
            PropertyType::SingleFamily => PROPERTY_TYPE_SINGLE_FAMILY_SCORE,
        })
    }

    fn explain(&self, mortgage: &MortgageRecord) -> String {
        format!("{} collateral", mortgage.property_type().label())
    }
}

/// The five rules in their fixed evaluation order.
pub fn standard_calculators() -> Vec<Box<dyn RiskCalculator>> {
    vec![
        Box::new(LoanToValueRisk),
        Box::new(DebtToIncomeRisk),
        Box::new(CreditScoreRisk),
        Box::new(LoanTypeRisk),
        Box::new(PropertyTypeRisk),
    ]
}
