//! Show every tile reachable within a budget, then retrace a route to the
//! edge of it.
//!
//! Run: RUST_LOG=debug cargo run --bin reach [range]

use std::collections::HashMap;

use tilepath_demos::{MAP, parse_map, render, tile};
use tilepath_search::{PathSearch, SearchPreferences, SearchType};

fn main() {
    env_logger::init();

    let range: u32 = std::env::args()
        .nth(1)
        .and_then(|a| a.parse().ok())
        .unwrap_or(6);
    let grid = match parse_map(MAP) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    let start = tile(&grid, 3, 3);
    let search = PathSearch::new(&grid);
    let prefs = SearchPreferences::default().recording_obstacles();
    let reached = search.search_at_range(start, range, &prefs, SearchType::Ground, 1.0);

    let mut marks: HashMap<usize, char> = reached
        .indices()
        .iter()
        .filter_map(|&i| {
            let cost = reached.accumulated_cost_of(i)?;
            char::from_digit((cost as u32).min(9), 10).map(|c| (i, c))
        })
        .collect();
    marks.insert(start, '@');
    println!("{}", render(&grid, &marks));
    println!(
        "{:?}: {} tiles within {range}, {} obstacles seen",
        reached.state(),
        reached.len(),
        reached.obstacle_count()
    );

    // The farthest tile reached, approached from its cheapest neighbor.
    let far = reached.indices().last().copied();
    if let Some(far) = far {
        let route = search.retrace(start, far, true, &[], &reached);
        let mut marks: HashMap<usize, char> = route.indices().iter().map(|&i| (i, '*')).collect();
        marks.insert(start, '@');
        marks.insert(far, 'X');
        println!("{}", render(&grid, &marks));
        println!(
            "retrace to {far}: {:?}, {} steps, cost {:.1}",
            route.state(),
            route.len(),
            route.total_cost()
        );
    }
}
