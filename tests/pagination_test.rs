//! Pagination arithmetic and navigation markup.
//!
//! Run with: cargo test --test pagination_test

use safe_dashboard::dashboard::paginate::{self, PAGE_SIZE, Pagination};

#[test]
fn total_pages_rounds_up() {
    assert_eq!(paginate::total_pages(0), 0);
    assert_eq!(paginate::total_pages(1), 1);
    assert_eq!(paginate::total_pages(10), 1);
    assert_eq!(paginate::total_pages(11), 2);
    assert_eq!(paginate::total_pages(25), 3);
}

#[test]
fn pages_concatenate_back_to_the_view() {
    let items: Vec<u32> = (0..23).collect();
    let pages = paginate::total_pages(items.len());

    let joined: Vec<u32> = (1..=pages)
        .flat_map(|p| paginate::page_slice(&items, p).iter().copied())
        .collect();

    assert_eq!(joined, items);
    assert_eq!(paginate::page_slice(&items, 1).len(), PAGE_SIZE);
    assert_eq!(paginate::page_slice(&items, 3), &[20, 21, 22]);
    assert!(paginate::page_slice(&items, 4).is_empty());
}

#[test]
fn clamp_page_stays_in_range() {
    assert_eq!(paginate::clamp_page(0, 35), 1);
    assert_eq!(paginate::clamp_page(3, 35), 3);
    assert_eq!(paginate::clamp_page(9, 35), 4);
    assert_eq!(paginate::clamp_page(5, 0), 1);
}

#[test]
fn no_controls_when_view_fits_one_page() {
    assert_eq!(Pagination::for_view(0, 1), None);
    assert_eq!(Pagination::for_view(10, 1), None);
    assert!(Pagination::for_view(11, 1).is_some());
    assert_eq!(paginate::render(None), "");
}

#[test]
fn button_window_follows_current_page() {
    let first = Pagination::for_view(100, 1).unwrap();
    assert_eq!(first.buttons(), 1..=5);
    assert_eq!(first.previous, None);
    assert_eq!(first.next, Some(2));

    let middle = Pagination::for_view(100, 5).unwrap();
    assert_eq!(middle.buttons(), 3..=7);
    assert_eq!(middle.previous, Some(4));
    assert_eq!(middle.next, Some(6));

    // Window is not shifted back at the end, so it shrinks
    let last = Pagination::for_view(100, 10).unwrap();
    assert_eq!(last.buttons(), 8..=10);
    assert_eq!(last.previous, Some(9));
    assert_eq!(last.next, None);

    let short = Pagination::for_view(25, 2).unwrap();
    assert_eq!(short.buttons(), 1..=3);
}

#[test]
fn render_marks_active_page_and_neighbours() {
    let html = paginate::render(Pagination::for_view(25, 2).as_ref());

    assert!(html.starts_with(r#"<div class="pagination">"#));
    assert!(html.contains("Halaman 2 dari 3"));
    assert!(html.contains(
        r#"<button class="pagination-btn" data-page="1">← Sebelumnya</button>"#
    ));
    assert!(html.contains(r#"<button class="pagination-btn active" data-page="2">2</button>"#));
    assert!(html.contains(
        r#"<button class="pagination-btn" data-page="3">Berikutnya →</button>"#
    ));
    assert_eq!(html.matches("pagination-btn active").count(), 1);
}

#[test]
fn first_page_has_no_previous_button() {
    let html = paginate::render(Pagination::for_view(25, 1).as_ref());
    assert!(!html.contains("Sebelumnya"));
    assert!(html.contains("Berikutnya"));
}
