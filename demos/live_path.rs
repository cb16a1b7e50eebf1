use incremental_pathfinding::{Pathfinder, PathfinderConfig, Point, SearchStatus};

// Drives the search one step per "frame" with live path updates, printing the grid after every
// expansion the way a render loop would draw it.
fn main() {
    let config = PathfinderConfig::default().with_update_path(true);
    let mut pathfinder =
        Pathfinder::with_config(8, 6, Point::new(0, 5), Point::new(7, 0), config).unwrap();
    let wall = (1..6).map(|y| Point::new(4, y));
    pathfinder.add_obstacles(wall).unwrap();
    let mut frame = 0;
    loop {
        let result = pathfinder.step();
        println!("frame {frame}: {} ({} lookups)", result.status, result.lookups);
        println!("{}", pathfinder);
        if result.status != SearchStatus::Searching {
            break;
        }
        frame += 1;
    }
}
