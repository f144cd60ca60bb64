use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use super::validation::{self, ValidationError};

/// Interest structure of a mortgage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanType {
    Fixed,
    Adjustable,
}

impl LoanType {
    pub fn label(&self) -> &'static str {
        match self {
            LoanType::Fixed => "fixed",
            LoanType::Adjustable => "adjustable",
        }
    }
}

impl FromStr for LoanType {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "fixed" => Ok(LoanType::Fixed),
            "adjustable" => Ok(LoanType::Adjustable),
            other => Err(ValidationError::UnknownLoanType(other.to_string())),
        }
    }
}

/// Collateral category of the mortgaged property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    SingleFamily,
    Condo,
}

impl PropertyType {
    pub fn label(&self) -> &'static str {
        match self {
            PropertyType::SingleFamily => "single_family",
            PropertyType::Condo => "condo",
        }
    }
}

impl FromStr for PropertyType {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "single_family" => Ok(PropertyType::SingleFamily),
            "condo" => Ok(PropertyType::Condo),
            other => Err(ValidationError::UnknownPropertyType(other.to_string())),
        }
    }
}

/// Mortgage exactly as received on the wire, before any domain checks.
///
/// Categorical fields stay as strings so an unknown category is reported as a
/// validation error naming the offending field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortgageSubmission {
    #[serde(deserialize_with = "whole_number")]
    pub credit_score: i64,
    pub loan_amount: f64,
    pub property_value: f64,
    pub annual_income: f64,
    pub debt_amount: f64,
    pub loan_type: String,
    pub property_type: String,
}

/// Accepts JSON integers and floats with no fractional part (`750.0`).
fn whole_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    struct WholeNumber;

    impl Visitor<'_> for WholeNumber {
        type Value = i64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a whole number")
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<i64, E> {
            Ok(value)
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<i64, E> {
            i64::try_from(value)
                .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(value), &self))
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<i64, E> {
            // Beyond this magnitude every f64 is integral but may not fit i64.
            const LIMIT: f64 = 9_007_199_254_740_992.0;
            if value.fract() == 0.0 && value.abs() <= LIMIT {
                Ok(value as i64)
            } else {
                Err(E::invalid_value(de::Unexpected::Float(value), &self))
            }
        }
    }

    deserializer.deserialize_any(WholeNumber)
}

/// Request body of the rating endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RmbsPayload {
    pub mortgages: Vec<MortgageSubmission>,
}

/// Validated mortgage. Every constructor enforces the field domains, so a
/// `MortgageRecord` always has a credit score in range and positive amounts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MortgageRecord {
    credit_score: u16,
    loan_amount: f64,
    property_value: f64,
    annual_income: f64,
    debt_amount: f64,
    loan_type: LoanType,
    property_type: PropertyType,
}

impl MortgageRecord {
    pub fn new(
        credit_score: u16,
        loan_amount: f64,
        property_value: f64,
        annual_income: f64,
        debt_amount: f64,
        loan_type: LoanType,
        property_type: PropertyType,
    ) -> Result<Self, ValidationError> {
        let credit_score = validation::check_credit_score(i64::from(credit_score))?;
        let loan_amount = validation::check_amount("loan_amount", loan_amount)?;
        let property_value = validation::check_amount("property_value", property_value)?;
        let annual_income = validation::check_amount("annual_income", annual_income)?;
        let debt_amount = validation::check_amount("debt_amount", debt_amount)?;

        Ok(Self {
            credit_score,
            loan_amount,
            property_value,
            annual_income,
            debt_amount,
            loan_type,
            property_type,
        })
    }

    pub fn credit_score(&self) -> u16 {
        self.credit_score
    }

    pub fn loan_amount(&self) -> f64 {
        self.loan_amount
    }

    pub fn property_value(&self) -> f64 {
        self.property_value
    }

    pub fn annual_income(&self) -> f64 {
        self.annual_income
    }

    pub fn debt_amount(&self) -> f64 {
        self.debt_amount
    }

    pub fn loan_type(&self) -> LoanType {
        self.loan_type
    }

    pub fn property_type(&self) -> PropertyType {
        self.property_type
    }

    /// Builds a record without domain checks so tests can reach the
    /// calculators' defensive paths.
    #[cfg(test)]
    pub(crate) fn unchecked(
        credit_score: u16,
        loan_amount: f64,
        property_value: f64,
        annual_income: f64,
        debt_amount: f64,
        loan_type: LoanType,
        property_type: PropertyType,
    ) -> Self {
        Self {
            credit_score,
            loan_amount,
            property_value,
            annual_income,
            debt_amount,
            loan_type,
            property_type,
        }
    }
}

impl TryFrom<MortgageSubmission> for MortgageRecord {
    type Error = Vec<ValidationError>;

    /// Checks every field and reports all violations, not just the first.
    fn try_from(submission: MortgageSubmission) -> Result<Self, Self::Error> {
        let mut errors = Vec::new();

        let credit_score = validation::check_credit_score(submission.credit_score)
            .map_err(|err| errors.push(err))
            .ok();
        let mut amount = |field: &'static str, value: f64| {
            validation::check_amount(field, value)
                .map_err(|err| errors.push(err))
                .ok()
        };
        let loan_amount = amount("loan_amount", submission.loan_amount);
        let property_value = amount("property_value", submission.property_value);
        let annual_income = amount("annual_income", submission.annual_income);
        let debt_amount = amount("debt_amount", submission.debt_amount);
        let loan_type = submission
            .loan_type
            .parse::<LoanType>()
            .map_err(|err| errors.push(err))
            .ok();
        let property_type = submission
            .property_type
            .parse::<PropertyType>()
            .map_err(|err| errors.push(err))
            .ok();

        match (
            credit_score,
            loan_amount,
            property_value,
            annual_income,
            debt_amount,
            loan_type,
            property_type,
        ) {
            (
                Some(credit_score),
                Some(loan_amount),
                Some(property_value),
                Some(annual_income),
                Some(debt_amount),
                Some(loan_type),
                Some(property_type),
            ) => Ok(Self {
                credit_score,
                loan_amount,
                property_value,
                annual_income,
                debt_amount,
                loan_type,
                property_type,
            }),
            _ => Err(errors),
        }
    }
}

/// Non-empty, ordered batch of mortgages rated together.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MortgagePortfolio {
    mortgages: Vec<MortgageRecord>,
}

impl MortgagePortfolio {
    pub fn new(mortgages: Vec<MortgageRecord>) -> Result<Self, ValidationError> {
        if mortgages.is_empty() {
            return Err(ValidationError::EmptyPortfolio);
        }
        Ok(Self { mortgages })
    }

    pub fn mortgages(&self) -> &[MortgageRecord] {
        &self.mortgages
    }

    pub fn len(&self) -> usize {
        self.mortgages.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.mortgages.is_empty()
    }

    pub fn into_inner(self) -> Vec<MortgageRecord> {
        self.mortgages
    }
}

impl TryFrom<Vec<MortgageRecord>> for MortgagePortfolio {
    type Error = ValidationError;

    fn try_from(mortgages: Vec<MortgageRecord>) -> Result<Self, Self::Error> {
        Self::new(mortgages)
    }
}

/// Portfolio-level credit rating band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CreditRating {
    #[serde(rename = "AAA")]
    Aaa,
    #[serde(rename = "BBB")]
    Bbb,
    #[serde(rename = "C")]
    C,
}

impl CreditRating {
    pub fn label(&self) -> &'static str {
        match self {
            CreditRating::Aaa => "AAA",
            CreditRating::Bbb => "BBB",
            CreditRating::C => "C",
        }
    }
}

impl fmt::Display for CreditRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
