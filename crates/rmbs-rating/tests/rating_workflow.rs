//! End-to-end rating scenarios exercised through the public API only: the
//! plain function, the service facade, and the HTTP router.

mod common {
    use std::sync::Arc;

    use rmbs_rating::rating::{
        LoanType, MortgageRecord, MortgageSubmission, PropertyType, RatingService, RmbsPayload,
        TracingObserver,
    };

    pub(super) fn record(
        credit_score: u16,
        loan_amount: f64,
        property_value: f64,
        annual_income: f64,
        debt_amount: f64,
        loan_type: LoanType,
        property_type: PropertyType,
    ) -> MortgageRecord {
        MortgageRecord::new(
            credit_score,
            loan_amount,
            property_value,
            annual_income,
            debt_amount,
            loan_type,
            property_type,
        )
        .expect("valid mortgage")
    }

    pub(super) fn submission(
        credit_score: i64,
        loan_amount: f64,
        property_value: f64,
        annual_income: f64,
        debt_amount: f64,
        loan_type: &str,
        property_type: &str,
    ) -> MortgageSubmission {
        MortgageSubmission {
            credit_score,
            loan_amount,
            property_value,
            annual_income,
            debt_amount,
            loan_type: loan_type.to_string(),
            property_type: property_type.to_string(),
        }
    }

    pub(super) fn low_risk() -> RmbsPayload {
        RmbsPayload {
            mortgages: vec![submission(
                750,
                200_000.0,
                250_000.0,
                60_000.0,
                20_000.0,
                "fixed",
                "single_family",
            )],
        }
    }

    pub(super) fn medium_risk() -> RmbsPayload {
        RmbsPayload {
            mortgages: vec![
                submission(640, 170_000.0, 200_000.0, 60_000.0, 27_000.0, "adjustable", "condo"),
                submission(
                    710,
                    150_000.0,
                    250_000.0,
                    80_000.0,
                    20_000.0,
                    "fixed",
                    "single_family",
                ),
            ],
        }
    }

    pub(super) fn high_risk() -> RmbsPayload {
        let distressed =
            submission(600, 285_000.0, 300_000.0, 60_000.0, 33_000.0, "adjustable", "condo");
        RmbsPayload {
            mortgages: vec![
                distressed.clone(),
                distressed,
                submission(
                    710,
                    150_000.0,
                    250_000.0,
                    80_000.0,
                    20_000.0,
                    "fixed",
                    "single_family",
                ),
            ],
        }
    }

    pub(super) fn service() -> Arc<RatingService<TracingObserver>> {
        Arc::new(RatingService::new(Arc::new(TracingObserver)))
    }
}

mod function_api {
    use super::common::*;
    use rmbs_rating::rating::{
        calculate_credit_rating, CreditRating, LoanType, PropertyType, RatingError,
    };

    #[test]
    fn prime_single_mortgage_is_aaa() {
        let mortgages = [record(
            750,
            200_000.0,
            250_000.0,
            60_000.0,
            20_000.0,
            LoanType::Fixed,
            PropertyType::SingleFamily,
        )];

        assert_eq!(calculate_credit_rating(&mortgages), Ok(CreditRating::Aaa));
    }

    #[test]
    fn empty_input_is_an_error_not_a_rating() {
        assert_eq!(calculate_credit_rating(&[]), Err(RatingError::EmptyPortfolio));
    }
}

mod service_api {
    use super::common::*;
    use rmbs_rating::rating::{CreditRating, RatingError};

    #[test]
    fn scenarios_map_to_expected_bands() {
        let service = service();

        let cases = [
            (low_risk(), CreditRating::Aaa, -3),
            (medium_risk(), CreditRating::Bbb, 3),
            (high_risk(), CreditRating::C, 13),
        ];

        for (payload, rating, total_score) in cases {
            let outcome = service.rate_payload(payload).expect("rating succeeds");
            assert_eq!(outcome.rating, rating);
            assert_eq!(outcome.total_score, total_score);
        }
    }

    #[test]
    fn unknown_category_is_a_validation_error() {
        let mut payload = low_risk();
        payload.mortgages[0].property_type = "duplex".to_string();

        match rmbs_rating::rating::validate_payload(payload.clone()) {
            Err(errors) => assert_eq!(errors.violations().len(), 1),
            Ok(_) => panic!("unknown property type must not validate"),
        }

        let err = service().rate_payload(payload).expect_err("rejected");
        assert!(matches!(err, RatingError::Validation(_)));
        assert!(err.to_string().contains("duplex"));
    }
}

mod http_api {
    use super::common::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use rmbs_rating::rating::{rating_router, ApiResponse, RmbsPayload, CREDIT_RATING_ENDPOINT};
    use tower::ServiceExt;

    async fn post(payload: &RmbsPayload) -> ApiResponse {
        let response = rating_router(service())
            .oneshot(
                Request::post(CREDIT_RATING_ENDPOINT)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(serde_json::to_vec(payload).expect("serializes")))
                    .expect("request builds"),
            )
            .await
            .expect("route executes");
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        let envelope: ApiResponse = serde_json::from_slice(&body).expect("envelope");
        assert_eq!(envelope.status_code, status.as_u16());
        envelope
    }

    #[tokio::test]
    async fn endpoint_returns_rating_in_envelope() {
        let envelope = post(&high_risk()).await;

        assert_eq!(envelope.status_code, StatusCode::OK.as_u16());
        assert_eq!(envelope.data["credit_rating"], "C");
    }

    #[tokio::test]
    async fn endpoint_rejects_negative_debt() {
        let mut payload = medium_risk();
        payload.mortgages[1].debt_amount = -10.0;

        let envelope = post(&payload).await;

        assert_eq!(envelope.status_code, StatusCode::BAD_REQUEST.as_u16());
        assert!(envelope.data.get("credit_rating").is_none());
        assert!(envelope.data["errors"][0]
            .as_str()
            .expect("message")
            .starts_with("mortgages[1]: debt_amount"));
    }
}
