use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::domain::CreditRating;

/// Record of one rating request, handed to the injected observer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingEvent {
    pub recorded_at: DateTime<Utc>,
    pub mortgage_count: usize,
    pub result: RatingEventKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RatingEventKind {
    Rated {
        rating: CreditRating,
        total_score: i32,
    },
    Rejected {
        category: &'static str,
        reason: String,
    },
}

/// Telemetry hook for the rating service (metrics exporters, audit logs).
pub trait RatingObserver: Send + Sync {
    fn observe(&self, event: &RatingEvent);
}

/// Observer that only emits a structured tracing event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl RatingObserver for TracingObserver {
    fn observe(&self, event: &RatingEvent) {
        match &event.result {
            RatingEventKind::Rated {
                rating,
                total_score,
            } => info!(
                mortgages = event.mortgage_count,
                total_score,
                rating = rating.label(),
                "portfolio rated"
            ),
            RatingEventKind::Rejected { category, reason } => warn!(
                mortgages = event.mortgage_count,
                category,
                reason = reason.as_str(),
                "rating request rejected"
            ),
        }
    }
}
