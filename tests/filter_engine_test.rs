//! Filter, search and sort engine.
//!
//! Run with: cargo test --test filter_engine_test

mod common;

use common::{minute_series, reading};
use safe_dashboard::dashboard::filter::{self, FilterState, SortOrder, StatusFilter};
use safe_dashboard::upstream::{Measurement, SensorReading};

fn run(
    rows: &[SensorReading],
    status: StatusFilter,
    sort: SortOrder,
    query: &str,
) -> Vec<SensorReading> {
    let state = FilterState {
        filter: status,
        sort,
        search_query: query.to_string(),
        ..FilterState::default()
    };
    filter::apply(rows, &state, chrono_tz::UTC)
}

fn temps(rows: &[SensorReading]) -> Vec<String> {
    rows.iter().map(|r| r.temperature.to_string()).collect()
}

#[test]
fn anomaly_filter_and_temperature_sort() {
    let row1 = reading("2024-01-01T10:00", 20.0, false);
    let row2 = reading("2024-01-01T09:00", 30.0, true);
    let rows = vec![row1.clone(), row2.clone()];

    let anomalies = run(&rows, StatusFilter::Anomaly, SortOrder::Newest, "");
    assert_eq!(anomalies, vec![row2.clone()]);

    let by_temp = run(&rows, StatusFilter::All, SortOrder::TempHigh, "");
    assert_eq!(by_temp, vec![row2, row1]);
}

#[test]
fn status_filter_keeps_exact_subset_in_order() {
    // Identical timestamps: the stable sort must keep input order
    let rows: Vec<_> = (0..6u32)
        .map(|i| reading("2024-01-01T10:00:00+00:00", f64::from(i), i % 2 == 0))
        .collect();

    let normal = run(&rows, StatusFilter::Normal, SortOrder::Newest, "");
    assert_eq!(temps(&normal), vec!["1", "3", "5"]);

    let anomaly = run(&rows, StatusFilter::Anomaly, SortOrder::Oldest, "");
    assert_eq!(temps(&anomaly), vec!["0", "2", "4"]);

    let all = run(&rows, StatusFilter::All, SortOrder::Newest, "");
    assert_eq!(all, rows);
}

#[test]
fn oldest_reversed_equals_newest() {
    let mut rows = minute_series(17);
    rows.swap(0, 9);
    rows.swap(3, 14);

    let mut oldest = run(&rows, StatusFilter::All, SortOrder::Oldest, "");
    let newest = run(&rows, StatusFilter::All, SortOrder::Newest, "");
    oldest.reverse();

    assert_eq!(oldest, newest);
    assert_eq!(newest, minute_series(17));
}

#[test]
fn offset_and_naive_timestamps_compare_by_instant() {
    let late_naive = reading("2024-01-01T05:00:00", 1.0, false);
    // 03:00 UTC
    let early_offset = reading("2024-01-01T10:00:00+07:00", 2.0, false);
    let rows = vec![early_offset.clone(), late_naive.clone()];

    let newest = run(&rows, StatusFilter::All, SortOrder::Newest, "");
    assert_eq!(newest, vec![late_naive, early_offset]);
}

#[test]
fn invalid_timestamps_sort_last_both_ways() {
    let broken = reading("not a date", 1.0, false);
    let a = reading("2024-01-01T08:00:00Z", 2.0, false);
    let b = reading("2024-01-01T09:00:00Z", 3.0, false);
    let rows = vec![broken.clone(), a.clone(), b.clone()];

    let newest = run(&rows, StatusFilter::All, SortOrder::Newest, "");
    assert_eq!(newest, vec![b.clone(), a.clone(), broken.clone()]);

    let oldest = run(&rows, StatusFilter::All, SortOrder::Oldest, "");
    assert_eq!(oldest, vec![a, b, broken]);
}

#[test]
fn invalid_temperatures_sort_last_both_ways() {
    let mut text = reading("2024-01-01T08:00:00Z", 0.0, false);
    text.temperature = Measurement::Text("n/a".to_string());
    let mut missing = reading("2024-01-01T08:01:00Z", 0.0, false);
    missing.temperature = Measurement::Missing;
    let mut numeric_text = reading("2024-01-01T08:02:00Z", 0.0, false);
    numeric_text.temperature = Measurement::Text(" 25.5 ".to_string());
    let cold = reading("2024-01-01T08:03:00Z", -4.0, false);

    let rows = vec![text.clone(), cold.clone(), missing.clone(), numeric_text.clone()];

    let high = run(&rows, StatusFilter::All, SortOrder::TempHigh, "");
    assert_eq!(
        high,
        vec![numeric_text.clone(), cold.clone(), text.clone(), missing.clone()]
    );

    let low = run(&rows, StatusFilter::All, SortOrder::TempLow, "");
    assert_eq!(low, vec![cold, numeric_text, text, missing]);
}

#[test]
fn search_matches_device_case_insensitively_and_measurement_text() {
    let mut a = reading("2024-01-01T08:00:00Z", 25.5, false);
    a.device_id = Some("SENSOR-Alpha".to_string());
    let mut b = reading("2024-01-01T08:01:00Z", 19.0, false);
    b.device_id = None;
    b.humidity = Measurement::Number(72.75);
    let rows = vec![a.clone(), b.clone()];

    let by_device = run(&rows, StatusFilter::All, SortOrder::Oldest, "sensor-alpha");
    assert_eq!(by_device, vec![a.clone()]);

    let by_temperature = run(&rows, StatusFilter::All, SortOrder::Oldest, "25");
    assert_eq!(by_temperature, vec![a.clone()]);

    let by_humidity = run(&rows, StatusFilter::All, SortOrder::Oldest, "2.7");
    assert_eq!(by_humidity, vec![b.clone()]);

    let none = run(&rows, StatusFilter::All, SortOrder::Oldest, "zzz");
    assert!(none.is_empty());

    let blank = run(&rows, StatusFilter::All, SortOrder::Oldest, "   ");
    assert_eq!(blank, vec![a, b]);
}

#[test]
fn search_combines_with_status_filter() {
    let rows = minute_series(12);
    // Temperatures 0..12; "1" matches 1, 10, 11; anomalies are multiples of 3
    let result = run(&rows, StatusFilter::Normal, SortOrder::TempLow, "1");
    assert_eq!(temps(&result), vec!["1", "10", "11"]);
}

#[test]
fn filter_and_sort_parse_keys_and_captions() {
    assert_eq!("all".parse::<StatusFilter>(), Ok(StatusFilter::All));
    assert_eq!("Semua Data".parse::<StatusFilter>(), Ok(StatusFilter::All));
    assert_eq!("Anomali".parse::<StatusFilter>(), Ok(StatusFilter::Anomaly));
    assert_eq!(" normal ".parse::<StatusFilter>(), Ok(StatusFilter::Normal));
    assert!("broken".parse::<StatusFilter>().is_err());

    assert_eq!("Urutkan Terlama".parse::<SortOrder>(), Ok(SortOrder::Oldest));
    assert_eq!("Suhu Tertinggi".parse::<SortOrder>(), Ok(SortOrder::TempHigh));
    assert_eq!("temp_low".parse::<SortOrder>(), Ok(SortOrder::TempLow));
    assert!("sideways".parse::<SortOrder>().is_err());
}

#[test]
fn chart_limit_is_bounded() {
    assert_eq!(filter::clamp_chart_limit(0), filter::CHART_LIMIT_MIN);
    assert_eq!(filter::clamp_chart_limit(50), 50);
    assert_eq!(filter::clamp_chart_limit(1_000_000), filter::CHART_LIMIT_MAX);
}
