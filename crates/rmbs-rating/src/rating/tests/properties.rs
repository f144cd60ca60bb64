use proptest::prelude::*;

use crate::rating::calculators::standard_calculators;
use crate::rating::domain::{LoanType, MortgagePortfolio, MortgageRecord, PropertyType};
use crate::rating::engine::RatingEngine;

fn amount() -> impl Strategy<Value = f64> {
    1.0f64..5_000_000.0
}

fn valid_mortgage() -> impl Strategy<Value = MortgageRecord> {
    (
        300u16..=850,
        amount(),
        amount(),
        amount(),
        amount(),
        prop_oneof![Just(LoanType::Fixed), Just(LoanType::Adjustable)],
        prop_oneof![Just(PropertyType::SingleFamily), Just(PropertyType::Condo)],
    )
        .prop_map(
            |(credit, loan, value, income, debt, loan_type, property_type)| {
                MortgageRecord::new(credit, loan, value, income, debt, loan_type, property_type)
                    .expect("strategy only yields valid mortgages")
            },
        )
}

proptest! {
    #[test]
    fn calculator_outputs_stay_in_their_bands(mortgage in valid_mortgage()) {
        let allowed: [&[i32]; 5] = [&[0, 1, 2], &[0, 1, 2], &[-1, 0, 1], &[-1, 1], &[0, 1]];
        for (calculator, allowed) in standard_calculators().iter().zip(allowed) {
            let score = calculator.calculate(&mortgage).expect("valid input never faults");
            prop_assert!(allowed.contains(&score), "{:?} scored {}", calculator.factor(), score);
        }
    }

    #[test]
    fn rating_ignores_mortgage_order(
        (original, shuffled) in prop::collection::vec(valid_mortgage(), 1..8)
            .prop_flat_map(|mortgages| (Just(mortgages.clone()), Just(mortgages).prop_shuffle()))
    ) {
        let engine = RatingEngine::standard();
        let original = engine
            .rate(&MortgagePortfolio::new(original).expect("non-empty"))
            .expect("rates");
        let shuffled = engine
            .rate(&MortgagePortfolio::new(shuffled).expect("non-empty"))
            .expect("rates");

        prop_assert_eq!(original.total_score, shuffled.total_score);
        prop_assert_eq!(original.rating, shuffled.rating);
    }

    #[test]
    fn total_score_is_base_plus_adjustment(
        mortgages in prop::collection::vec(valid_mortgage(), 1..8)
    ) {
        let outcome = RatingEngine::standard()
            .rate(&MortgagePortfolio::new(mortgages).expect("non-empty"))
            .expect("rates");

        let per_mortgage: i32 = outcome.mortgages.iter().map(|entry| entry.risk_score).sum();
        prop_assert_eq!(outcome.base_score, per_mortgage);
        prop_assert!((-1..=1).contains(&outcome.portfolio_adjustment));
        prop_assert_eq!(outcome.total_score, outcome.base_score + outcome.portfolio_adjustment);
    }
}
