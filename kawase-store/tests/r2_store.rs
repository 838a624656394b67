use httpmock::prelude::*;

use kawase_core::{KawaseError, RatePair, RateSeries, SeriesStore};
use kawase_store::{R2Config, R2Store};

const CACHE_BODY: &str = r#"{"2022-10-01":[0.4754,68.77],"2022-10-02":[0.4485,64.88]}"#;

fn config(server: &MockServer) -> R2Config {
    R2Config {
        endpoint: server.base_url(),
        bucket: "oracle".into(),
        access_key_id: "test-key".into(),
        secret_access_key: "test-secret".into(),
        object_key: "xrp_oracle_daily.json".into(),
    }
}

fn store(server: &MockServer) -> R2Store {
    R2Store::new(&config(server)).unwrap()
}

#[tokio::test]
async fn missing_object_loads_as_empty_series() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/oracle/xrp_oracle_daily.json");
        then.status(404);
    });

    let series = store(&server).load().await.unwrap();

    mock.assert();
    assert!(series.is_empty());
}

#[tokio::test]
async fn load_parses_the_published_object() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/oracle/xrp_oracle_daily.json");
        then.status(200)
            .header("etag", "\"abc123\"")
            .header("last-modified", "Sat, 01 Oct 2022 00:00:00 GMT")
            .body(CACHE_BODY);
    });

    let series = store(&server).load().await.unwrap();

    assert_eq!(series.len(), 2);
    assert_eq!(
        series.get("2022-10-01".parse().unwrap()),
        Some(RatePair(0.4754, 68.77))
    );
}

#[tokio::test]
async fn save_puts_the_flat_cache_format() {
    let server = MockServer::start();
    let put = server.mock(|when, then| {
        when.method(PUT)
            .path("/oracle/xrp_oracle_daily.json")
            .body(CACHE_BODY);
        then.status(200).header("etag", "\"abc123\"");
    });

    let series: RateSeries = [
        ("2022-10-01".parse().unwrap(), RatePair(0.4754, 68.77)),
        ("2022-10-02".parse().unwrap(), RatePair(0.4485, 64.88)),
    ]
    .into_iter()
    .collect();
    store(&server).save(&series).await.unwrap();

    put.assert();
}

#[tokio::test]
async fn corrupt_object_fails_loudly() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/oracle/xrp_oracle_daily.json");
        then.status(200)
            .header("etag", "\"abc123\"")
            .header("last-modified", "Sat, 01 Oct 2022 00:00:00 GMT")
            .body("not json");
    });

    let err = store(&server).load().await.unwrap_err();
    assert!(matches!(err, KawaseError::StoreUnavailable { .. }));
}

#[tokio::test]
async fn server_error_is_not_treated_as_missing() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/oracle/xrp_oracle_daily.json");
        then.status(500).body("internal error");
    });

    let err = store(&server).load().await.unwrap_err();
    assert!(matches!(err, KawaseError::StoreUnavailable { .. }));
}
