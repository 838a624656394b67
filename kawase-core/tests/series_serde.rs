use kawase_core::{RatePair, RateSeries};

#[test]
fn serializes_to_flat_date_keyed_object_ascending() {
    let series: RateSeries = [
        ("2022-10-02".parse().unwrap(), RatePair(0.4485, 64.88)),
        ("2022-10-01".parse().unwrap(), RatePair(0.4754, 68.77)),
    ]
    .into_iter()
    .collect();

    assert_eq!(
        serde_json::to_string(&series).unwrap(),
        r#"{"2022-10-01":[0.4754,68.77],"2022-10-02":[0.4485,64.88]}"#
    );
}

#[test]
fn deserializes_the_published_cache_format() {
    let series: RateSeries =
        serde_json::from_str(r#"{"2022-10-01":[0.4754,68.77],"2022-10-02":[0.4485,64.88]}"#)
            .unwrap();

    assert_eq!(series.len(), 2);
    assert_eq!(
        series.get("2022-10-01".parse().unwrap()),
        Some(RatePair(0.4754, 68.77))
    );
    assert_eq!(series.last_date(), Some("2022-10-02".parse().unwrap()));
}

#[test]
fn round_trip_preserves_pair_order() {
    let series: RateSeries = [("2022-10-01".parse().unwrap(), RatePair(0.4754, 68.77))]
        .into_iter()
        .collect();
    let bytes = serde_json::to_vec(&series).unwrap();
    let back: RateSeries = serde_json::from_slice(&bytes).unwrap();
    let pair = back.get("2022-10-01".parse().unwrap()).unwrap();
    // Index 0 is USDT, index 1 is JPY; fixed order, never reordered.
    assert_eq!(pair.usdt(), 0.4754);
    assert_eq!(pair.jpy(), 68.77);
}

#[test]
fn empty_object_is_an_empty_series() {
    let series: RateSeries = serde_json::from_str("{}").unwrap();
    assert!(series.is_empty());
    assert_eq!(series.last_date(), None);
}

#[test]
fn rejects_malformed_entries() {
    // A bare number instead of a 2-element array must fail fast rather than
    // propagate silently into the cache.
    assert!(serde_json::from_str::<RateSeries>(r#"{"2022-10-01":0.4754}"#).is_err());
    assert!(serde_json::from_str::<RateSeries>(r#"{"not-a-date":[0.1,1.0]}"#).is_err());
}
