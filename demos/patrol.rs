//! Walk an agent along an A* path, pausing once on the way.
//!
//! Run: RUST_LOG=debug cargo run --bin patrol

use std::collections::HashMap;

use tilepath_demos::{MAP, Walker, parse_map, render, tile};
use tilepath_follow::{FollowStatus, FollowerConfig, MoveRequest, PathFollower};
use tilepath_search::{PathSearch, SearchPreferences, SearchStats, SearchType};

const DT: f32 = 0.05;

fn main() {
    env_logger::init();

    let grid = match parse_map(MAP) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    let start = tile(&grid, 0, 0);
    let goal = tile(&grid, 13, 6);

    let stats = SearchStats::new();
    let search = PathSearch::new(&grid).with_observer(&stats);
    let prefs = SearchPreferences::default();
    let result = search.astar(start, goal, &prefs, false, SearchType::Ground, 1.0);
    if !result.is_success() {
        eprintln!("no path: {:?}", result.state());
        std::process::exit(1);
    }

    let mut marks: HashMap<usize, char> = result.indices().iter().map(|&i| (i, '*')).collect();
    marks.insert(start, 'S');
    marks.insert(goal, 'G');
    println!("{}", render(&grid, &marks));
    println!(
        "path: {} tiles, cost {:.1} ({:?})",
        result.len(),
        result.total_cost(),
        stats.snapshot()
    );

    let Some(origin) = grid.position(start) else {
        return;
    };
    let mut walker = Walker::new("patroller", origin, 250.0);
    walker.pause_at_segment = Some(result.len() / 2);
    let mut follower = PathFollower::new(FollowerConfig::default());
    if let Err(e) = follower.request_move(&mut walker, MoveRequest::new(&result)) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let mut paused_for = 0.0;
    for _ in 0..10_000 {
        walker.step(DT);
        follower.tick(&mut walker, DT);
        match follower.status() {
            FollowStatus::Moving => {}
            FollowStatus::Paused => {
                paused_for += DT;
                if paused_for >= 1.0 {
                    println!(
                        "paused {:.1}s at segment {} ({})",
                        paused_for,
                        follower.segment_start(),
                        walker.location
                    );
                    walker.pause_at_segment = None;
                    follower.resume_move(&mut walker);
                }
            }
            FollowStatus::Idle | FollowStatus::Waiting => break,
        }
    }

    println!(
        "finished with {:?} at {} after {:.2}s",
        walker.result,
        walker.location,
        follower.elapsed()
    );
}
