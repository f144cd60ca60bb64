use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error};

use super::domain::{MortgagePortfolio, RmbsPayload};
use super::engine::{RatingEngine, RatingError, RatingOutcome};
use super::observer::{RatingEvent, RatingEventKind, RatingObserver};
use super::validation::validate_payload;

/// Service composing payload validation, the rating engine, and telemetry.
pub struct RatingService<O> {
    engine: Arc<RatingEngine>,
    observer: Arc<O>,
}

impl<O> RatingService<O>
where
    O: RatingObserver + 'static,
{
    pub fn new(observer: Arc<O>) -> Self {
        Self::with_engine(RatingEngine::standard(), observer)
    }

    pub fn with_engine(engine: RatingEngine, observer: Arc<O>) -> Self {
        Self {
            engine: Arc::new(engine),
            observer,
        }
    }

    /// Validate a wire payload and rate it. Validation failures never reach
    /// the calculators.
    pub fn rate_payload(&self, payload: RmbsPayload) -> Result<RatingOutcome, RatingError> {
        let submitted = payload.mortgages.len();
        let portfolio = match validate_payload(payload) {
            Ok(portfolio) => portfolio,
            Err(errors) => {
                let err = RatingError::from(errors);
                self.notify_rejected(submitted, &err);
                return Err(err);
            }
        };

        self.rate(&portfolio)
    }

    pub fn rate(&self, portfolio: &MortgagePortfolio) -> Result<RatingOutcome, RatingError> {
        debug!(mortgages = portfolio.len(), "rating portfolio");

        match self.engine.rate(portfolio) {
            Ok(outcome) => {
                self.observer.observe(&RatingEvent {
                    recorded_at: Utc::now(),
                    mortgage_count: outcome.mortgage_count,
                    result: RatingEventKind::Rated {
                        rating: outcome.rating,
                        total_score: outcome.total_score,
                    },
                });
                Ok(outcome)
            }
            Err(err) => {
                if let RatingError::Computation(cause) = &err {
                    error!(error = %cause, "risk calculator fault");
                }
                self.notify_rejected(portfolio.len(), &err);
                Err(err)
            }
        }
    }

    fn notify_rejected(&self, mortgage_count: usize, err: &RatingError) {
        self.observer.observe(&RatingEvent {
            recorded_at: Utc::now(),
            mortgage_count,
            result: RatingEventKind::Rejected {
                category: err.category(),
                reason: err.to_string(),
            },
        });
    }
}
