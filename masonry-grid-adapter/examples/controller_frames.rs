// Example: driving a grid through the frame controller.
use masonry_grid::{MasonryOptions, Rect};
use masonry_grid_adapter::{Controller, ControllerOptions};

fn main() {
    let mut c = Controller::with_options(
        MasonryOptions::new(1000)
            .with_initial_rect(Some(Rect {
                main: 600,
                cross: 900,
            }))
            .with_item_height_estimate(250),
        ControllerOptions::default(),
    );

    let mut now_ms = 0u64;
    for step in 0..8u64 {
        // Pretend the UI measured whatever the grid asked for last frame.
        let mut batch = Vec::new();
        c.masonry().collect_unmeasured(&mut batch);
        for cell in &batch {
            c.on_item_measured(cell.index, 180 + (cell.index as u32 % 5) * 40);
        }

        c.on_scroll(step * 400, now_ms);
        if step == 4 {
            c.on_resize(Rect {
                main: 600,
                cross: 600,
            });
        }

        now_ms += 16;
        let frame = c.tick(now_ms);
        println!(
            "t={now_ms} frame={frame:?} offset={} columns={}",
            c.masonry().scroll_offset(),
            c.masonry().column_layout().column_count
        );
    }
}
