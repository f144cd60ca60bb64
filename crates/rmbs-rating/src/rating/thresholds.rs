//! Fixed rule table shared by the risk calculators and the rating aggregator.

/// Inclusive bounds of a valid borrower credit score.
pub const CREDIT_SCORE_MIN: u16 = 300;
pub const CREDIT_SCORE_MAX: u16 = 850;

// Loan-to-value
pub const LTV_HIGH_THRESHOLD: f64 = 0.9;
pub const LTV_MEDIUM_THRESHOLD: f64 = 0.8;
pub const LTV_HIGH_SCORE: i32 = 2;
pub const LTV_MEDIUM_SCORE: i32 = 1;
pub const LTV_LOW_SCORE: i32 = 0;

// Debt-to-income, expressed as a percentage of annual income
pub const DTI_HIGH_THRESHOLD: f64 = 50.0;
pub const DTI_MEDIUM_THRESHOLD: f64 = 40.0;
pub const DTI_HIGH_SCORE: i32 = 2;
pub const DTI_MEDIUM_SCORE: i32 = 1;
pub const DTI_LOW_SCORE: i32 = 0;

// Credit score, applied per mortgage and again to the portfolio average
pub const CREDIT_SCORE_GOOD: u16 = 700;
pub const CREDIT_SCORE_POOR: u16 = 650;
pub const CREDIT_SCORE_GOOD_DEDUCTION: i32 = -1;
pub const CREDIT_SCORE_POOR_ADDITION: i32 = 1;
pub const CREDIT_SCORE_NEUTRAL: i32 = 0;

pub const LOAN_TYPE_FIXED_SCORE: i32 = -1;
pub const LOAN_TYPE_ADJUSTABLE_SCORE: i32 = 1;

pub const PROPERTY_TYPE_SINGLE_FAMILY_SCORE: i32 = 0;
pub const PROPERTY_TYPE_CONDO_SCORE: i32 = 1;

/// Upper bounds (inclusive) of the total portfolio score for each rating band.
pub const RATING_AAA_MAX_SCORE: i32 = 2;
pub const RATING_BBB_MAX_SCORE: i32 = 5;
