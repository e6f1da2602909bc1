use chrono_tz::Tz;
use std::fmt::Write as _;

use crate::dashboard::escape_html;
use crate::dashboard::locale::display_date_time;
use crate::dashboard::paginate::PAGE_SIZE;
use crate::upstream::SensorReading;

/// Column count of the readings table, used by the placeholder row
pub const TABLE_COLUMNS: usize = 7;

pub const EMPTY_VIEW_MESSAGE: &str = "Tidak ada data yang sesuai dengan filter";

const BADGE_ANOMALY: &str = r#"<span class="status-anomaly">⚠️ ANOMALI</span>"#;
const BADGE_NORMAL: &str = r#"<span class="status-normal">✅ NORMAL</span>"#;

/// Render the `<tr>` rows for `#sensor-rows`.
///
/// `page_rows` is the slice for `page`; sequence numbers continue across pages.
/// When `view_is_empty` the placeholder row is rendered instead.
#[must_use]
pub fn render_rows(
    page_rows: &[SensorReading],
    page: usize,
    location_name: &str,
    tz: Tz,
    view_is_empty: bool,
) -> String {
    if view_is_empty {
        return format!(
            r#"<tr><td colspan="{TABLE_COLUMNS}" class="empty-row">{EMPTY_VIEW_MESSAGE}</td></tr>"#
        );
    }

    let offset = page.saturating_sub(1) * PAGE_SIZE;
    let location = escape_html(location_name);
    let mut html = String::new();

    for (idx, reading) in page_rows.iter().enumerate() {
        let (row_class, badge) = if reading.is_anomaly {
            ("anomaly-row", BADGE_ANOMALY)
        } else {
            ("", BADGE_NORMAL)
        };
        let _ = write!(
            html,
            r#"<tr class="{row_class}"><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{location}</td><td>{badge}</td></tr>"#,
            offset + idx + 1,
            escape_html(&display_date_time(&reading.timestamp, tz)),
            escape_html(reading.device_label()),
            escape_html(&reading.temperature.to_string()),
            escape_html(&reading.humidity.to_string()),
        );
    }

    html
}
