// Example: the two-phase render loop (measure unknown heights, then place).
use masonry_grid::{Masonry, MasonryCell, MasonryOptions, Rect};

fn fake_height(index: usize) -> u32 {
    120 + (index as u32 * 37) % 180
}

fn main() -> Result<(), masonry_grid::MasonryError> {
    let items: Vec<String> = (0..500).map(|i| format!("card #{i}")).collect();
    let mut m = Masonry::new(
        MasonryOptions::new(items.len())
            .with_initial_rect(Some(Rect {
                main: 800,
                cross: 1000,
            }))
            .with_item_height_estimate(200),
    );
    println!("layout={:?} phase={:?}", m.column_layout(), m.phase());

    for frame in 0..3 {
        let mut measured = Vec::new();
        let range = m.render(&items, |cell| match cell {
            MasonryCell::Placed { cell, item } => {
                if cell.index < 3 {
                    println!("  placed {item} at ({}, {})", cell.left, cell.top);
                }
            }
            MasonryCell::Unmeasured { cell, .. } => {
                measured.push((cell.index, fake_height(cell.index)));
            }
        })?;
        println!(
            "frame {frame}: range={range:?} measuring={} phase={:?}",
            measured.len(),
            m.phase()
        );
        m.measure_many(measured);
        m.flush();
        m.set_scroll_offset(m.scroll_offset() + 1500);
    }

    println!("measured={} total_size={}", m.measured_count(), m.total_size());
    Ok(())
}
