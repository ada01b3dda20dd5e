mod support;

use std::str::FromStr;
use std::time::Duration;

use conciliador::error::PortalError;
use conciliador::models::{ExpedienteRequest, Validation};
use conciliador::portal::{accept_current_row, SearchPipeline};
use conciliador::recon::StatsAggregator;
use rust_decimal::Decimal;
use support::{fast_config, FakePage};

fn request(id: &str, cost: &str) -> ExpedienteRequest {
    ExpedienteRequest::new(id, Decimal::from_str(cost).unwrap()).unwrap()
}

#[tokio::test]
async fn missing_accept_button_downgrades_to_error_in_acceptance() {
    let page = FakePage::with_cost("$500.00").with_acceptance(false, true);
    let pipeline = SearchPipeline::new(fast_config());
    let mut stats = StatsAggregator::new();

    let outcome = pipeline
        .search(&page, &mut stats, &request("123456", "500"))
        .await;

    // The match was already counted; only the classification is downgraded.
    assert_eq!(outcome.validacion, Validation::ErrorInAcceptance);
    assert_eq!(outcome.stats.total_revisados, 1);
    assert_eq!(outcome.stats.total_con_costo, 1);
    assert_eq!(outcome.stats.total_aceptados, 1);
}

#[tokio::test]
async fn missing_confirmation_downgrades_to_error_in_acceptance() {
    let page = FakePage::with_cost("$500.00").with_acceptance(true, false);
    let pipeline = SearchPipeline::new(fast_config());
    let mut stats = StatsAggregator::new();

    let outcome = pipeline
        .search(&page, &mut stats, &request("123456", "500"))
        .await;

    assert_eq!(outcome.validacion, Validation::ErrorInAcceptance);
    assert_eq!(page.accept_clicks(), 1);
    assert_eq!(page.confirm_clicks(), 1);
    assert_eq!(outcome.stats.total_aceptados, 1);
}

#[tokio::test]
async fn acceptance_failure_does_not_retry() {
    let page = FakePage::with_cost("$500.00").with_acceptance(false, false);
    let pipeline = SearchPipeline::new(fast_config());
    let mut stats = StatsAggregator::new();

    pipeline
        .search(&page, &mut stats, &request("123456", "500"))
        .await;

    // One click on the row control; the modal was never reached and the
    // sequence was not re-run by the search retry loop.
    assert_eq!(page.accept_clicks(), 1);
    assert_eq!(page.confirm_clicks(), 0);
}

#[tokio::test]
async fn accept_errors_name_the_failing_step() {
    let settle = Duration::from_millis(1);

    let page = FakePage::with_cost("$1.00").with_acceptance(false, true);
    let err = accept_current_row(&page, settle).await.unwrap_err();
    assert!(matches!(err, PortalError::AcceptButtonNotFound));

    let page = FakePage::with_cost("$1.00").with_acceptance(true, false);
    let err = accept_current_row(&page, settle).await.unwrap_err();
    assert!(matches!(err, PortalError::ConfirmationNotFound(_)));
}
