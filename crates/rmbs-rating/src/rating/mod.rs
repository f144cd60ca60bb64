//! Mortgage portfolio credit rating: validation, risk calculators, aggregation,
//! and the HTTP endpoint built on top of them.

pub mod calculators;
pub mod domain;
pub mod engine;
pub mod observer;
pub mod router;
pub mod service;
pub mod thresholds;
pub mod validation;

#[cfg(test)]
mod tests;

pub use calculators::{
    ComputationError, CreditScoreRisk, DebtToIncomeRisk, LoanToValueRisk, LoanTypeRisk,
    PropertyTypeRisk, RiskCalculator, RiskFactor,
};
pub use domain::{
    CreditRating, LoanType, MortgagePortfolio, MortgageRecord, MortgageSubmission, PropertyType,
    RmbsPayload,
};
pub use engine::{
    calculate_credit_rating, MortgageBreakdown, RatingEngine, RatingError, RatingOutcome,
    RiskComponent,
};
pub use observer::{RatingEvent, RatingEventKind, RatingObserver, TracingObserver};
pub use router::{rating_router, ApiResponse, CREDIT_RATING_ENDPOINT};
pub use service::RatingService;
pub use validation::{validate_payload, ValidationError, ValidationErrors, Violation};
