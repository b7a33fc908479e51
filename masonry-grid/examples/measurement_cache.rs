// Example: export and import measurement cache.
use masonry_grid::{Masonry, MasonryOptions, Rect};

fn options() -> MasonryOptions {
    MasonryOptions::new_with_key(10, |i| 1000 + i as u64).with_initial_rect(Some(Rect {
        main: 600,
        cross: 600,
    }))
}

fn main() {
    // Heights are cached by item key, so a new grid over the same data can be laid out without
    // measuring again.
    let mut m1 = Masonry::new(options());
    m1.measure_many([(0, 10), (1, 42), (2, 30)]);

    let snapshot = m1.export_measurement_cache();
    println!("exported_cache_len={}", snapshot.len());

    let mut m2 = Masonry::new(options());
    println!("before import: measured={}", m2.measured_count());

    m2.import_measurement_cache(snapshot);
    println!(
        "after import: cache_len={} measured={} item1={:?}",
        m2.measurement_cache_len(),
        m2.measured_count(),
        m2.positioner().get(1)
    );
}
