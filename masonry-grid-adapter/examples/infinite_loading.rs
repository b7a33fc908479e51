// Example: requesting more data as the render range approaches the end of what is loaded.
use std::sync::{Arc, Mutex};

use masonry_grid::{Masonry, MasonryOptions, Rect, RenderRange};
use masonry_grid_adapter::InfiniteLoader;

fn main() {
    let last_range = Arc::new(Mutex::new(None::<RenderRange>));
    let sink = Arc::clone(&last_range);

    let mut loaded: Vec<u32> = (0..40).collect();
    let mut m = Masonry::new(
        MasonryOptions::new(loaded.len())
            .with_initial_rect(Some(Rect {
                main: 800,
                cross: 800,
            }))
            .with_item_height_estimate(200)
            .with_on_render(Some(move |range: RenderRange| {
                if let Ok(mut slot) = sink.lock() {
                    *slot = Some(range);
                }
            })),
    );
    m.measure_many((0..loaded.len()).map(|i| (i, 200)));

    let loader = InfiniteLoader::new(10_000);
    if let Err(e) = m.render(&loaded, |_| {}) {
        eprintln!("render failed: {e}");
        return;
    }

    let range = last_range.lock().ok().and_then(|r| *r);
    if let Some(range) = range {
        let len = loaded.len();
        loader.on_render(
            range,
            |i| i < len,
            |start, stop| {
                println!("load_more {start}..={stop}");
                loaded.extend(start as u32..=stop as u32);
            },
        );
    }
    m.set_count(loaded.len());
    println!("loaded={} phase={:?}", loaded.len(), m.phase());
}
