/// Compares path costs against a Dijkstra oracle using the same straight/diagonal edge costs.
/// Accumulated costs must match the optimum exactly; estimated costs only have to produce a
/// route that is at least as expensive, since `g` there is not the cost of the route taken.
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use incremental_pathfinding::{
    heuristic, path_cost, GCost, Pathfinder, PathfinderConfig, Point, SearchStatus, D, D2,
};
use rand::prelude::*;

fn dijkstra(n: i32, obstacles: &HashSet<Point>, start: Point, end: Point) -> Option<i32> {
    let mut dist: HashMap<Point, i32> = HashMap::from([(start, 0)]);
    let mut heap = BinaryHeap::from([Reverse((0, start.x, start.y))]);
    while let Some(Reverse((d, x, y))) = heap.pop() {
        let p = Point::new(x, y);
        if p == end {
            return Some(d);
        }
        if dist.get(&p).is_some_and(|&best| d > best) {
            continue;
        }
        for dx in -1..=1 {
            for dy in -1..=1 {
                if (dx, dy) == (0, 0) {
                    continue;
                }
                let q = Point::new(x + dx, y + dy);
                if q.x < 0 || q.y < 0 || q.x >= n || q.y >= n || obstacles.contains(&q) {
                    continue;
                }
                let nd = d + if dx != 0 && dy != 0 { D2 } else { D };
                if dist.get(&q).map_or(true, |&best| nd < best) {
                    dist.insert(q, nd);
                    heap.push(Reverse((nd, q.x, q.y)));
                }
            }
        }
    }
    None
}

fn random_case(n: i32, rng: &mut StdRng) -> (Point, Point, HashSet<Point>) {
    let start = Point::new(rng.gen_range(0..n), rng.gen_range(0..n));
    let end = Point::new(rng.gen_range(0..n), rng.gen_range(0..n));
    let mut obstacles = HashSet::new();
    for x in 0..n {
        for y in 0..n {
            let p = Point::new(x, y);
            if p != start && p != end && rng.gen_bool(0.3) {
                obstacles.insert(p);
            }
        }
    }
    (start, end, obstacles)
}

fn solve(
    n: i32,
    start: Point,
    end: Point,
    obstacles: &HashSet<Point>,
    g_cost: GCost,
) -> Vec<Point> {
    let config = PathfinderConfig::default().with_g_cost(g_cost);
    let mut pathfinder =
        Pathfinder::with_config(n as usize, n as usize, start, end, config).unwrap();
    pathfinder.add_obstacles(obstacles.iter().copied()).unwrap();
    let result = pathfinder.run(None);
    assert_eq!(result.status, SearchStatus::Found);
    result.path
}

#[test]
fn accumulated_paths_are_optimal() {
    const N: i32 = 12;
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..300 {
        let (start, end, obstacles) = random_case(N, &mut rng);
        if let Some(best) = dijkstra(N, &obstacles, start, end) {
            let path = solve(N, start, end, &obstacles, GCost::Accumulated);
            assert_eq!(path_cost(&path), best, "{start} -> {end}: {path:?}");
        }
    }
}

#[test]
fn estimated_paths_are_never_cheaper() {
    const N: i32 = 12;
    let mut rng = StdRng::seed_from_u64(4);
    for _ in 0..300 {
        let (start, end, obstacles) = random_case(N, &mut rng);
        if let Some(best) = dijkstra(N, &obstacles, start, end) {
            let path = solve(N, start, end, &obstacles, GCost::Estimated);
            assert!(path_cost(&path) >= best);
        }
    }
}

#[test]
fn open_grid_costs_match_heuristic() {
    let obstacles = HashSet::new();
    for (start, end) in [
        (Point::new(0, 0), Point::new(4, 4)),
        (Point::new(0, 0), Point::new(9, 3)),
        (Point::new(8, 1), Point::new(2, 7)),
    ] {
        let path = solve(10, start, end, &obstacles, GCost::Accumulated);
        assert_eq!(path_cost(&path), heuristic(&start, &end));
    }
}

/// Where the optimal route is unique the estimated cost model has no choice to get wrong.
#[test]
fn estimated_costs_on_unique_routes() {
    let obstacles = HashSet::new();
    for (start, end) in [
        (Point::new(0, 0), Point::new(4, 4)),
        (Point::new(8, 1), Point::new(2, 7)),
        (Point::new(0, 2), Point::new(9, 2)),
    ] {
        let path = solve(10, start, end, &obstacles, GCost::Estimated);
        assert_eq!(path_cost(&path), heuristic(&start, &end));
    }
}
