use incremental_pathfinding::{Anchor, GridLayout, Pathfinder, PathfinderConfig, Point, Vec2};

// A centred 5x5 layout with 32 pixel cells and a full wall at column 2. A host would translate a
// mouse click into a cell with `cell_at` and draw cells at `project`.
fn main() {
    let layout = GridLayout::new(5, 5, Vec2::splat(32.0))
        .unwrap()
        .with_anchor(Anchor::CENTER);
    let start = layout.cell_at(Vec2::new(-70.0, -70.0)).unwrap();
    let end = layout.cell_at(Vec2::new(70.0, 70.0)).unwrap();
    let mut pathfinder =
        Pathfinder::for_layout(&layout, start, end, PathfinderConfig::default()).unwrap();
    pathfinder
        .add_obstacles((0..5).map(|y| Point::new(2, y)))
        .unwrap();
    let result = pathfinder.run(None);
    println!(
        "{} after {} lookups, {} obstacle probes",
        result.status,
        result.lookups,
        pathfinder.hit_obstacles()
    );
    for node in pathfinder.closed() {
        println!("closed {} drawn at {}", node.position, layout.project(&node.position));
    }
}
