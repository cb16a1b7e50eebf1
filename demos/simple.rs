use incremental_pathfinding::{Pathfinder, Point};

// In this example a path is found on a 5x5 grid with shape
//  _____
// |S    |
// | #   |
// |  #  |
// |     |
// |    E|
//  _____
// where
// - # marks an obstacle
// - S marks the start
// - E marks the end
fn main() {
    let start = Point::new(0, 0);
    let end = Point::new(4, 4);
    let mut pathfinder = Pathfinder::new(5, 5, start, end).unwrap();
    pathfinder
        .add_obstacles(vec![Point::new(1, 1), Point::new(2, 2)])
        .unwrap();
    let result = pathfinder.run(None);
    println!("{} after {} lookups", result.status, result.lookups);
    println!("{}", pathfinder);
    for p in result.path {
        println!("{:?}", p);
    }
}
