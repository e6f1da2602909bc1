use serde::Serialize;
use std::fmt::Write as _;
use std::ops::RangeInclusive;
use utoipa::ToSchema;

pub const PAGE_SIZE: usize = 10;
/// Maximum number of numbered page buttons in the navigation window
pub const MAX_PAGE_BUTTONS: usize = 5;

#[must_use]
pub fn total_pages(count: usize) -> usize {
    count.div_ceil(PAGE_SIZE)
}

/// Keep `page` inside `[1, total_pages]` (page 1 when there are no rows).
#[must_use]
pub fn clamp_page(page: usize, count: usize) -> usize {
    page.clamp(1, total_pages(count).max(1))
}

/// Rows of the 1-based `page`; empty past the end.
#[must_use]
pub fn page_slice<T>(items: &[T], page: usize) -> &[T] {
    let start = page.saturating_sub(1).saturating_mul(PAGE_SIZE);
    if start >= items.len() {
        return &[];
    }
    let end = (start + PAGE_SIZE).min(items.len());
    &items[start..end]
}

/// Navigation controls for one page of a filtered view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Pagination {
    pub current: usize,
    pub total: usize,
    pub first_button: usize,
    pub last_button: usize,
    pub previous: Option<usize>,
    pub next: Option<usize>,
}

impl Pagination {
    /// Controls for `count` rows at `current`; `None` when everything fits on one page.
    #[must_use]
    pub fn for_view(count: usize, current: usize) -> Option<Self> {
        let total = total_pages(count);
        if total <= 1 {
            return None;
        }
        let current = current.clamp(1, total);
        let first_button = current.saturating_sub(2).max(1);
        let last_button = (first_button + MAX_PAGE_BUTTONS - 1).min(total);

        Some(Self {
            current,
            total,
            first_button,
            last_button,
            previous: (current > 1).then(|| current - 1),
            next: (current < total).then(|| current + 1),
        })
    }

    #[must_use]
    pub fn buttons(&self) -> RangeInclusive<usize> {
        self.first_button..=self.last_button
    }
}

/// Markup for `#pagination-controls`; empty when there are no controls.
#[must_use]
pub fn render(pagination: Option<&Pagination>) -> String {
    let Some(p) = pagination else {
        return String::new();
    };

    let mut html = String::from(r#"<div class="pagination">"#);
    let _ = write!(
        html,
        r#"<span class="pagination-info">Halaman {} dari {}</span>"#,
        p.current, p.total
    );

    if let Some(prev) = p.previous {
        let _ = write!(
            html,
            r#"<button class="pagination-btn" data-page="{prev}">← Sebelumnya</button>"#
        );
    }

    for page in p.buttons() {
        let class = if page == p.current {
            "pagination-btn active"
        } else {
            "pagination-btn"
        };
        let _ = write!(
            html,
            r#"<button class="{class}" data-page="{page}">{page}</button>"#
        );
    }

    if let Some(next) = p.next {
        let _ = write!(
            html,
            r#"<button class="pagination-btn" data-page="{next}">Berikutnya →</button>"#
        );
    }

    html.push_str("</div>");
    html
}
