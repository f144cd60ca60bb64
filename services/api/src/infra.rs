use metrics_exporter_prometheus::PrometheusHandle;
use rmbs_rating::rating::{RatingEvent, RatingEventKind, RatingObserver, TracingObserver};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) const RATINGS_TOTAL: &str = "rmbs_ratings_total";
pub(crate) const REJECTIONS_TOTAL: &str = "rmbs_rating_rejections_total";

/// Observer that logs through tracing and counts outcomes in the Prometheus
/// registry installed by the metrics layer.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct MetricsObserver {
    tracing: TracingObserver,
}

impl RatingObserver for MetricsObserver {
    fn observe(&self, event: &RatingEvent) {
        self.tracing.observe(event);

        match &event.result {
            RatingEventKind::Rated { rating, .. } => {
                metrics::counter!(RATINGS_TOTAL, "rating" => rating.label()).increment(1);
            }
            RatingEventKind::Rejected { category, .. } => {
                metrics::counter!(REJECTIONS_TOTAL, "category" => *category).increment(1);
            }
        }
    }
}
