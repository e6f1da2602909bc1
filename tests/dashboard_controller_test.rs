//! Dashboard controller: UI events, poll application and derived views.
//!
//! Run with: cargo test --test dashboard_controller_test

mod common;

use chrono::NaiveDate;
use common::{dashboard, dashboard_with, minute_series, payload, reading};
use safe_dashboard::dashboard::PollOutcome;
use safe_dashboard::dashboard::export::ExportError;
use safe_dashboard::dashboard::filter::{SortOrder, StatusFilter};

#[test]
fn new_dashboard_is_empty_with_placeholder() {
    let dashboard = dashboard();

    assert!(dashboard.rows().is_empty());
    assert_eq!(dashboard.current_page(), 1);
    assert_eq!(dashboard.total_pages(), 0);
    assert!(dashboard.render_table().contains("empty-row"));
    assert_eq!(dashboard.render_pagination(), "");
    assert_eq!(dashboard.last_applied_seq(), None);
}

#[test]
fn poll_replaces_store_and_refreshes_everything() {
    let mut dashboard = dashboard();

    let outcome = dashboard.apply_poll(1, payload(minute_series(35), Some(900), Some(100)));

    assert_eq!(outcome, PollOutcome::Applied { rows: 35 });
    assert_eq!(dashboard.rows().len(), 35);
    assert_eq!(dashboard.view().len(), 35);
    assert_eq!(dashboard.total_pages(), 4);
    assert_eq!(dashboard.page_rows().len(), 10);
    assert_eq!(dashboard.charts().stats.total, 1000);
    assert_eq!(dashboard.charts().line.labels.len(), 30);
    assert_eq!(dashboard.last_applied_seq(), Some(1));

    dashboard.apply_poll(2, payload(minute_series(5), None, None));
    assert_eq!(dashboard.rows().len(), 5);
    assert_eq!(dashboard.total_pages(), 1);
}

#[test]
fn filter_sort_and_search_reset_to_first_page() {
    let mut dashboard = dashboard_with(minute_series(35));

    dashboard.go_to_page(3);
    dashboard.set_filter(StatusFilter::Normal);
    assert_eq!(dashboard.current_page(), 1);
    assert!(dashboard.view().iter().all(|r| !r.is_anomaly));

    dashboard.go_to_page(2);
    dashboard.set_sort(SortOrder::TempHigh);
    assert_eq!(dashboard.current_page(), 1);

    dashboard.go_to_page(2);
    dashboard.set_search("  3 ");
    assert_eq!(dashboard.current_page(), 1);
    assert_eq!(dashboard.filters().search_query, "3");
}

#[test]
fn page_change_keeps_view_and_renders_that_slice() {
    let mut dashboard = dashboard_with(minute_series(35));
    let view_before = dashboard.view().to_vec();
    let revision = dashboard.revision();

    dashboard.go_to_page(4);

    assert_eq!(dashboard.view(), view_before.as_slice());
    assert_eq!(dashboard.current_page(), 4);
    assert_eq!(dashboard.page_rows().len(), 5);
    assert!(dashboard.render_table().contains("<td>31</td>"));
    assert!(dashboard.render_pagination().contains("Halaman 4 dari 4"));
    assert!(dashboard.revision() > revision);
}

#[test]
fn out_of_range_page_is_clamped() {
    let mut dashboard = dashboard_with(minute_series(35));

    dashboard.go_to_page(99);
    assert_eq!(dashboard.current_page(), 4);

    dashboard.go_to_page(0);
    assert_eq!(dashboard.current_page(), 1);
}

#[test]
fn successful_poll_returns_to_first_page() {
    let mut dashboard = dashboard_with(minute_series(35));
    dashboard.go_to_page(3);

    dashboard.apply_poll(2, payload(minute_series(35), None, None));

    assert_eq!(dashboard.current_page(), 1);
}

#[test]
fn poll_keeps_filters_and_reapplies_them() {
    let mut dashboard = dashboard_with(minute_series(12));
    dashboard.set_filter(StatusFilter::Anomaly);
    dashboard.set_sort(SortOrder::Oldest);

    dashboard.apply_poll(2, payload(minute_series(30), None, None));

    assert_eq!(dashboard.filters().filter, StatusFilter::Anomaly);
    assert_eq!(dashboard.view().len(), 10);
    assert!(dashboard.view().iter().all(|r| r.is_anomaly));
}

#[test]
fn empty_poll_changes_nothing() {
    let mut dashboard = dashboard_with(minute_series(12));
    let rows = dashboard.rows().to_vec();
    let stats = dashboard.charts().stats;
    let revision = dashboard.revision();

    let outcome = dashboard.apply_poll(2, payload(Vec::new(), Some(5), Some(2)));

    assert_eq!(outcome, PollOutcome::Empty);
    assert_eq!(dashboard.rows(), rows.as_slice());
    assert_eq!(dashboard.charts().stats, stats);
    assert_eq!(dashboard.revision(), revision);
    assert_eq!(dashboard.last_applied_seq(), Some(1));
}

#[test]
fn late_response_cannot_overwrite_newer_data() {
    let mut dashboard = dashboard();
    let fresh = vec![reading("2024-01-01T10:05:00Z", 22.0, false)];
    let slow = minute_series(20);

    assert_eq!(
        dashboard.apply_poll(2, payload(fresh.clone(), None, None)),
        PollOutcome::Applied { rows: 1 }
    );
    assert_eq!(
        dashboard.apply_poll(1, payload(slow, None, None)),
        PollOutcome::Stale { last_applied: 2 }
    );
    assert_eq!(
        dashboard.apply_poll(2, payload(minute_series(3), None, None)),
        PollOutcome::Stale { last_applied: 2 }
    );

    assert_eq!(dashboard.rows(), fresh.as_slice());
    assert_eq!(dashboard.last_applied_seq(), Some(2));
}

#[test]
fn poll_with_overflowing_totals_is_applied() {
    let mut dashboard = dashboard();

    let outcome = dashboard.apply_poll(1, payload(minute_series(1), Some(u64::MAX), Some(1)));

    assert_eq!(outcome, PollOutcome::Applied { rows: 1 });
    assert_eq!(dashboard.charts().stats.total, u64::MAX);

    // Redraw on a limit change goes through the same totals
    dashboard.set_chart_limit(10);
    assert_eq!(dashboard.charts().stats.total, u64::MAX);
}

#[test]
fn chart_limit_redraws_from_held_rows() {
    let mut dashboard = dashboard();
    dashboard.apply_poll(1, payload(minute_series(50), Some(70), Some(30)));
    let line_revision = dashboard.charts().line.revision;

    dashboard.set_chart_limit(10);

    assert_eq!(dashboard.filters().chart_limit, 10);
    assert_eq!(dashboard.charts().line.labels.len(), 10);
    assert_eq!(dashboard.charts().line.revision, line_revision + 1);
    assert_eq!(dashboard.charts().line.labels.last().map(String::as_str), Some("10.00.00"));
    // Server totals from the last poll are reused
    assert_eq!(dashboard.charts().stats.total, 100);

    dashboard.set_chart_limit(0);
    assert_eq!(dashboard.filters().chart_limit, 1);
    assert_eq!(dashboard.charts().line.labels.len(), 1);
}

#[test]
fn chart_window_ignores_table_filters() {
    let mut dashboard = dashboard_with(minute_series(40));
    dashboard.set_filter(StatusFilter::Anomaly);
    dashboard.set_chart_limit(30);

    assert_eq!(dashboard.charts().line.labels.len(), 30);
}

#[test]
fn export_covers_filtered_view_not_page() {
    let mut dashboard = dashboard_with(minute_series(35));
    dashboard.set_filter(StatusFilter::Normal);
    dashboard.go_to_page(2);
    let today = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();

    let csv = dashboard.export_csv(today).unwrap();

    assert_eq!(csv.rows, dashboard.view().len());
    assert_eq!(csv.filename, "sensor_data_Gudang_2024-05-06.csv");
}

#[test]
fn export_of_empty_view_fails() {
    let mut dashboard = dashboard_with(minute_series(5));
    dashboard.set_search("no such device");
    let today = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();

    assert!(matches!(dashboard.export_csv(today), Err(ExportError::Empty)));
    assert!(dashboard.render_table().contains("Tidak ada data yang sesuai dengan filter"));
}
