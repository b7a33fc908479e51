use crate::*;

use alloc::vec::Vec;

use masonry_grid::{Align, LayoutPhase, MasonryOptions, Rect, RenderRange};

#[test]
fn throttle_passes_leading_and_holds_trailing() {
    let mut t = Throttle::new(12);
    assert_eq!(t.interval_ms(), 83);

    assert_eq!(t.push(1u64, 0), Some(1));
    assert_eq!(t.push(2, 10), None);
    assert_eq!(t.push(3, 50), None);
    assert!(t.has_pending());

    assert_eq!(t.poll(60), None);
    assert_eq!(t.poll(83), Some(3));
    assert_eq!(t.poll(300), None);

    // The trailing release restarts the interval.
    assert_eq!(t.push(4, 100), None);
    assert_eq!(t.poll(166), Some(4));
    assert_eq!(t.push(5, 400), Some(5));
}

#[test]
fn throttle_cancel_restores_the_leading_edge() {
    let mut t = Throttle::from_interval_ms(100);
    assert_eq!(t.push(1u64, 0), Some(1));
    assert_eq!(t.push(2, 10), None);
    t.cancel();
    assert!(!t.has_pending());
    assert_eq!(t.poll(500), None);
    assert_eq!(t.push(3, 20), Some(3));
}

#[test]
fn scan_extends_the_last_range_forward() {
    let loader = InfiniteLoader::new(100);
    assert_eq!(loader.scan(0, 20, |i| i < 10), [(10, 25)]);

    // Capped by the item count.
    let loader = InfiniteLoader::new(20);
    assert_eq!(loader.scan(10, 12, |i| i < 10), [(10, 19)]);
}

#[test]
fn scan_reports_every_hole() {
    let loader = InfiniteLoader::new(100);
    let loaded = |i: usize| i < 5 || (8..10).contains(&i);
    assert_eq!(loader.scan(0, 12, loaded), [(5, 7), (10, 25)]);
}

#[test]
fn scan_extends_the_first_range_backward() {
    let loader = InfiniteLoader::new(100);
    assert_eq!(loader.scan(35, 45, |i| i >= 40), [(24, 39)]);

    let loader = InfiniteLoader::new(100).with_minimum_batch_size(1);
    assert_eq!(loader.scan(35, 45, |i| i >= 40), [(35, 39)]);
}

#[test]
fn scan_of_loaded_items_is_empty() {
    let loader = InfiniteLoader::default();
    assert!(loader.scan(0, 50, |_| true).is_empty());
}

#[test]
fn on_render_widens_by_threshold() {
    let loader = InfiniteLoader::new(100);
    let mut calls = Vec::new();
    loader.on_render(
        RenderRange {
            start_index: 20,
            stop_index: 30,
        },
        |i| i < 30,
        |lo, hi| calls.push((lo, hi)),
    );
    assert_eq!(calls, [(30, 46)]);

    calls.clear();
    InfiniteLoader::new(0).on_render(
        RenderRange {
            start_index: 0,
            stop_index: 0,
        },
        |_| false,
        |lo, hi| calls.push((lo, hi)),
    );
    assert!(calls.is_empty());
}

/// 3 columns of width 200, a 600px viewport and 1200px of overscan.
fn controller(count: usize) -> Controller {
    Controller::new(
        MasonryOptions::new(count)
            .with_initial_rect(Some(Rect {
                main: 600,
                cross: 600,
            }))
            .with_item_height_estimate(100),
    )
}

#[test]
fn resizes_coalesce_until_tick() {
    let mut c = controller(100);
    c.on_resize(Rect {
        main: 600,
        cross: 400,
    });
    c.on_resize(Rect {
        main: 600,
        cross: 800,
    });
    assert_eq!(c.masonry().column_layout().column_count, 3);

    let frame = c.tick(0);
    assert!(frame.render);
    assert_eq!(c.masonry().column_layout().column_count, 4);
    assert_eq!(c.masonry().scroll_rect().cross, 800);

    assert!(!c.tick(16).render);
}

#[test]
fn scroll_is_throttled_with_a_trailing_edge() {
    let mut c = controller(100);
    c.on_scroll(100, 0);
    assert_eq!(c.masonry().scroll_offset(), 100);

    c.on_scroll(200, 10);
    c.on_scroll(300, 20);
    assert_eq!(c.masonry().scroll_offset(), 100);

    let frame = c.tick(50);
    assert_eq!(frame.scroll_offset, None);
    assert!(frame.render);

    let frame = c.tick(90);
    assert_eq!(frame.scroll_offset, Some(300));
    assert!(frame.render);
    assert_eq!(c.masonry().scroll_offset(), 300);
    assert!(c.masonry().is_scrolling());
}

#[test]
fn tick_debounces_is_scrolling() {
    let mut c = controller(100);
    c.on_scroll(100, 0);
    c.tick(10);
    assert!(c.masonry().is_scrolling());

    let frame = c.tick(masonry_grid::DEFAULT_IS_SCROLLING_RESET_DELAY_MS);
    assert!(!c.masonry().is_scrolling());
    assert!(frame.render);
}

#[test]
fn remeasurements_flush_once_per_tick() {
    let mut c = controller(100);
    for i in 0..36 {
        c.on_item_measured(i, 100);
    }
    let frame = c.tick(0);
    assert!(frame.render);
    assert_eq!(frame.phase, LayoutPhase::Settled);

    c.on_item_measured(0, 150);
    c.on_item_measured(3, 50);
    assert_eq!(c.masonry().phase(), LayoutPhase::Cascading);

    let frame = c.tick(16);
    assert!(frame.render);
    assert_eq!(frame.phase, LayoutPhase::Settled);
    let p = c.masonry().positioner();
    assert_eq!(p.get(3).map(|i| i.top), Some(150));
    assert_eq!(p.get(6).map(|i| i.top), Some(200));
}

#[test]
fn cancel_drops_scheduled_work() {
    let mut c = controller(100);
    for i in 0..36 {
        c.on_item_measured(i, 100);
    }
    c.tick(0);

    c.on_scroll(100, 10);
    c.on_scroll(400, 20);
    c.on_resize(Rect {
        main: 600,
        cross: 800,
    });
    c.on_item_measured(0, 150);
    c.cancel();

    let frame = c.tick(1000);
    assert_eq!(frame.scroll_offset, None);
    assert_eq!(c.masonry().scroll_offset(), 100);
    assert_eq!(c.masonry().column_layout().column_count, 3);
    assert_eq!(c.masonry().positioner().get(0).map(|i| i.height), Some(100));
}

#[test]
fn scroll_to_index_overrides_held_scroll() {
    let mut c = controller(100);
    assert_eq!(c.scroll_to_index(30, Align::Start, 0), None);

    for i in 0..36 {
        c.on_item_measured(i, 100);
    }
    c.on_scroll(10, 0);
    c.on_scroll(20, 5);

    assert_eq!(c.scroll_to_index(30, Align::Start, 10), Some(1000));
    let frame = c.tick(200);
    assert_eq!(frame.scroll_offset, None);
    assert!(frame.render);
    assert_eq!(c.masonry().scroll_offset(), 1000);
}
