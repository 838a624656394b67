use kawase_core::{DateSpan, FxSource, SpotSource, derive_span};
use kawase_mock::MockMarket;

#[tokio::test]
async fn fixtures_are_sliced_to_the_requested_span() {
    let market = MockMarket::new();
    let span = DateSpan::new(
        "2022-10-03".parse().unwrap(),
        "2022-10-04".parse().unwrap(),
    )
    .unwrap();

    let closes = SpotSource::daily_closes(&market, span).await.unwrap();
    let crosses = FxSource::eur_cross_rates(&market, span).await.unwrap();

    assert_eq!(closes.len(), 2);
    assert_eq!(crosses.len(), 2);
}

#[tokio::test]
async fn genesis_week_derives_without_gaps() {
    let market = MockMarket::new();
    let span = DateSpan::new(
        "2022-09-30".parse().unwrap(),
        "2022-10-07".parse().unwrap(),
    )
    .unwrap();

    let closes = SpotSource::daily_closes(&market, span).await.unwrap();
    let crosses = FxSource::eur_cross_rates(&market, span).await.unwrap();
    let outcome = derive_span(span, &closes, &crosses);

    // 09-30 has no exchange fixture; the weekend derives off Friday's cross.
    assert_eq!(outcome.rates.len(), 7);
    assert_eq!(outcome.skipped.len(), 1);
    let first = &outcome.rates[0];
    assert_eq!(first.date, "2022-10-01".parse().unwrap());
    assert!((first.xrp_jpy - 68.77).abs() < 0.01);
}

#[tokio::test]
async fn failing_market_surfaces_source_unavailable() {
    let market = MockMarket::failing();
    let span = DateSpan::single("2022-10-01".parse().unwrap());
    assert!(SpotSource::daily_closes(&market, span).await.is_err());
    assert!(FxSource::eur_cross_rates(&market, span).await.is_err());
}
