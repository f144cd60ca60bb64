use clap::Args;
use rmbs_rating::error::AppError;
use rmbs_rating::rating::{RatingOutcome, RatingService, RmbsPayload, TracingObserver};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct RateArgs {
    /// JSON file shaped like the HTTP request body ({"mortgages": [...]})
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Print the full outcome as JSON instead of a text breakdown
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_rate(args: RateArgs) -> Result<(), AppError> {
    let outcome = rate_file(&args.input)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print!("{}", render_outcome(&outcome));
    }

    Ok(())
}

pub(crate) fn rate_file(path: &Path) -> Result<RatingOutcome, AppError> {
    let raw = std::fs::read_to_string(path)?;
    let payload: RmbsPayload = serde_json::from_str(&raw)?;
    let service = RatingService::new(Arc::new(TracingObserver));
    Ok(service.rate_payload(payload)?)
}

pub(crate) fn render_outcome(outcome: &RatingOutcome) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Credit rating: {} (total score {})",
        outcome.rating, outcome.total_score
    );
    let _ = writeln!(
        out,
        "- {} mortgage(s), base score {}, average credit score {:.1}, portfolio adjustment {:+}",
        outcome.mortgage_count,
        outcome.base_score,
        outcome.average_credit_score,
        outcome.portfolio_adjustment
    );

    for mortgage in &outcome.mortgages {
        let _ = writeln!(
            out,
            "Mortgage #{}: risk score {:+}",
            mortgage.index + 1,
            mortgage.risk_score
        );
        for component in &mortgage.components {
            let _ = writeln!(
                out,
                "  - {:<15} {:+}  {}",
                component.factor.label(),
                component.score,
                component.notes
            );
        }
    }

    out
}
