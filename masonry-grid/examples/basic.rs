// Example: positioner + interval tree without the render driver.
use masonry_grid::Positioner;

fn main() {
    let mut p = Positioner::with_gutter(3, 200, 8);
    for (i, h) in [120, 80, 200, 60, 150, 90, 110].into_iter().enumerate() {
        p.set(i, h);
    }
    println!("column_heights={:?}", p.column_heights());

    p.range(100, 220, |index, left, top| {
        println!("visible index={index} left={left} top={top}");
    });

    // A taller item pushes everything below it in the same column.
    p.update([(0, 240)]);
    println!("after update: item3={:?}", p.get(3));
    println!("estimated height for 1000 items={}", p.estimate_height(1000, 150));
}
