use kawase_core::{DailyClose, EurCross};

/// Daily XRP/USDT closes for the first week of October 2022 (the cache's
/// genesis week). Saturday and Sunday trade around the clock on the
/// exchange, so every calendar day has a close.
pub fn closes() -> Vec<DailyClose> {
    rows_to_closes(&[
        ("2022-10-01", 0.4754),
        ("2022-10-02", 0.4485),
        ("2022-10-03", 0.4621),
        ("2022-10-04", 0.4878),
        ("2022-10-05", 0.4834),
        ("2022-10-06", 0.4882),
        ("2022-10-07", 0.4847),
    ])
}

/// EUR cross rates for the same week. Business days only: 10-01/10-02 are a
/// weekend, so the reference publishes nothing and derivation has to carry
/// Friday 2022-09-30 forward.
pub fn crosses() -> Vec<EurCross> {
    rows_to_crosses(&[
        ("2022-09-30", 141.89, 0.9808),
        ("2022-10-03", 142.12, 0.9820),
        ("2022-10-04", 143.05, 0.9910),
        ("2022-10-05", 143.55, 0.9883),
        ("2022-10-06", 142.87, 0.9797),
        ("2022-10-07", 142.62, 0.9789),
    ])
}

fn rows_to_closes(rows: &[(&str, f64)]) -> Vec<DailyClose> {
    rows.iter()
        .map(|(date, close)| DailyClose {
            date: date.parse().expect("valid fixture date"),
            close: *close,
        })
        .collect()
}

fn rows_to_crosses(rows: &[(&str, f64, f64)]) -> Vec<EurCross> {
    rows.iter()
        .map(|(date, eur_jpy, eur_usd)| EurCross {
            date: date.parse().expect("valid fixture date"),
            eur_jpy: *eur_jpy,
            eur_usd: *eur_usd,
        })
        .collect()
}
