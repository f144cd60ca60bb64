use serde::Serialize;

use super::calculators::{standard_calculators, ComputationError, RiskCalculator, RiskFactor};
use super::domain::{CreditRating, MortgagePortfolio, MortgageRecord};
use super::thresholds::{
    CREDIT_SCORE_GOOD, CREDIT_SCORE_POOR, RATING_AAA_MAX_SCORE, RATING_BBB_MAX_SCORE,
};
use super::validation::{ValidationError, ValidationErrors};

/// Failure of a rating request. No partial rating is ever produced.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RatingError {
    #[error(transparent)]
    Validation(ValidationErrors),
    #[error("rating computation failed: {0}")]
    Computation(#[from] ComputationError),
    #[error("portfolio must contain at least one mortgage")]
    EmptyPortfolio,
}

impl RatingError {
    /// Stable machine-readable category for response envelopes and logs.
    pub fn category(&self) -> &'static str {
        match self {
            RatingError::Validation(_) => "validation_error",
            RatingError::Computation(_) => "computation_error",
            RatingError::EmptyPortfolio => "empty_input",
        }
    }
}

impl From<ValidationErrors> for RatingError {
    fn from(errors: ValidationErrors) -> Self {
        if errors.is_empty_portfolio() {
            RatingError::EmptyPortfolio
        } else {
            RatingError::Validation(errors)
        }
    }
}

impl From<ValidationError> for RatingError {
    fn from(error: ValidationError) -> Self {
        ValidationErrors::from(error).into()
    }
}

/// Contribution of one calculator to one mortgage, kept for audits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskComponent {
    pub factor: RiskFactor,
    pub score: i32,
    pub notes: String,
}

/// Per-mortgage risk score with the contributions that make it up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MortgageBreakdown {
    pub index: usize,
    pub risk_score: i32,
    pub components: Vec<RiskComponent>,
}

/// Full result of rating a portfolio.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingOutcome {
    pub rating: CreditRating,
    pub mortgage_count: usize,
    /// Sum of every mortgage's risk score before the portfolio adjustment.
    pub base_score: i32,
    pub average_credit_score: f64,
    pub portfolio_adjustment: i32,
    pub total_score: i32,
    pub mortgages: Vec<MortgageBreakdown>,
}

/// Stateless aggregator applying the calculator set to a portfolio.
pub struct RatingEngine {
    calculators: Vec<Box<dyn RiskCalculator>>,
}

impl Default for RatingEngine {
    fn default() -> Self {
        Self::standard()
    }
}

impl RatingEngine {
    pub fn standard() -> Self {
        Self::with_calculators(standard_calculators())
    }

    pub fn with_calculators(calculators: Vec<Box<dyn RiskCalculator>>) -> Self {
        Self { calculators }
    }

    pub fn factors(&self) -> Vec<RiskFactor> {
        self.calculators
            .iter()
            .map(|calculator| calculator.factor())
            .collect()
    }

    /// Sum of every calculator's contribution for a single mortgage.
    pub fn risk_score(&self, mortgage: &MortgageRecord) -> Result<i32, ComputationError> {
        self.calculators
            .iter()
            .map(|calculator| calculator.calculate(mortgage))
            .sum()
    }

    pub fn assess(
        &self,
        index: usize,
        mortgage: &MortgageRecord,
    ) -> Result<MortgageBreakdown, ComputationError> {
        let mut components = Vec::with_capacity(self.calculators.len());
        let mut risk_score = 0;

        for calculator in &self.calculators {
            let score = calculator.calculate(mortgage)?;
            risk_score += score;
            components.push(RiskComponent {
                factor: calculator.factor(),
                score,
                notes: calculator.explain(mortgage),
            });
        }

        Ok(MortgageBreakdown {
            index,
            risk_score,
            components,
        })
    }

    pub fn rate(&self, portfolio: &MortgagePortfolio) -> Result<RatingOutcome, RatingError> {
        self.rate_records(portfolio.mortgages())
    }

    /// Rate a slice of already validated records. The slice is re-checked
    /// for emptiness before the credit score average is taken.
    pub fn rate_records(&self, mortgages: &[MortgageRecord]) -> Result<RatingOutcome, RatingError> {
        if mortgages.is_empty() {
            return Err(RatingError::EmptyPortfolio);
        }

        let breakdowns = mortgages
            .iter()
            .enumerate()
            .map(|(index, mortgage)| self.assess(index, mortgage))
            .collect::<Result<Vec<_>, _>>()?;

        let base_score: i32 = breakdowns.iter().map(|entry| entry.risk_score).sum();
        let average_credit_score = average_credit_score(mortgages);
        let portfolio_adjustment = portfolio_adjustment(average_credit_score);
        let total_score = base_score + portfolio_adjustment;

        Ok(RatingOutcome {
            rating: rating_for_score(total_score),
            mortgage_count: mortgages.len(),
            base_score,
            average_credit_score,
            portfolio_adjustment,
            total_score,
            mortgages: breakdowns,
        })
    }
}

fn average_credit_score(mortgages: &[MortgageRecord]) -> f64 {
    let sum: f64 = mortgages
        .iter()
        .map(|mortgage| f64::from(mortgage.credit_score()))
        .sum();
    sum / mortgages.len() as f64
}

/// Correction applied to the summed score from the portfolio's mean credit score.
pub fn portfolio_adjustment(average_credit_score: f64) -> i32 {
    if average_credit_score >= f64::from(CREDIT_SCORE_GOOD) {
        -1
    } else if average_credit_score < f64::from(CREDIT_SCORE_POOR) {
        1
    } else {
        0
    }
}

/// Band lookup; the first matching upper bound wins.
pub fn rating_for_score(total_score: i32) -> CreditRating {
    if total_score <= RATING_AAA_MAX_SCORE {
        CreditRating::Aaa
    } else if total_score <= RATING_BBB_MAX_SCORE {
        CreditRating::Bbb
    } else {
        CreditRating::C
    }
}

/// Rate a batch of mortgages with the standard calculator set.
pub fn calculate_credit_rating(mortgages: &[MortgageRecord]) -> Result<CreditRating, RatingError> {
    RatingEngine::standard()
        .rate_records(mortgages)
        .map(|outcome| outcome.rating)
}
