use std::collections::HashMap;

use tilepath_core::{Grid, GridConfig, TileProperty, Vec3};
use tilepath_follow::{
    FollowPath, FollowStatus, FollowerConfig, MoveRequest, MovementAgent, PathFollower, PathResult,
};
use tilepath_search::{PathSearch, SearchPreferences, SearchType};

/// Moves at a fixed speed toward its target.
struct Walker {
    location: Vec3,
    target: Option<Vec3>,
    speed: f32,
    pause_at: Option<usize>,
    segments: Vec<usize>,
    result: Option<PathResult>,
}

impl Walker {
    fn at(location: Vec3) -> Self {
        Self {
            location,
            target: None,
            speed: 200.0,
            pause_at: None,
            segments: Vec::new(),
            result: None,
        }
    }

    fn step(&mut self, dt: f32) {
        let Some(target) = self.target else {
            return;
        };
        let to = target - self.location;
        let reach = self.speed * dt;
        if to.length() <= reach {
            self.location = target;
        } else {
            self.location += to.normalize_or_zero() * reach;
        }
    }
}

impl MovementAgent for Walker {
    fn location(&self) -> Vec3 {
        self.location
    }
    fn set_move_target(&mut self, target: Vec3) {
        self.target = Some(target);
    }
    fn stop_movement(&mut self) {
        self.target = None;
    }
    fn should_pause_now(&self, segment: usize) -> bool {
        self.pause_at == Some(segment)
    }
    fn on_segment_finished(&mut self, segment: usize) {
        self.segments.push(segment);
    }
    fn on_path_finished(&mut self, result: PathResult) {
        self.result = Some(result);
    }
}

fn grid_with_wall() -> Grid {
    // 6x6 with a wall on x = 2 except at y = 5.
    let h = 6;
    let props: HashMap<usize, TileProperty> =
        (0..5).map(|y| (2 * h + y, TileProperty::blocked())).collect();
    let mut grid = Grid::default();
    grid.generate(GridConfig::square(6, h), &props).unwrap();
    grid
}

fn run(follower: &mut PathFollower, walker: &mut Walker, ticks: usize) {
    for _ in 0..ticks {
        walker.step(0.1);
        follower.tick(walker, 0.1);
        if follower.status() != FollowStatus::Moving {
            break;
        }
    }
}

#[test]
fn follows_astar_path_to_goal() {
    let grid = grid_with_wall();
    let prefs = SearchPreferences::default();
    let result = PathSearch::new(&grid).astar(0, 30, &prefs, false, SearchType::Ground, 1.0);
    assert!(result.is_success());

    let mut walker = Walker::at(grid.position(0).unwrap());
    let mut follower = PathFollower::new(FollowerConfig::default());
    follower
        .request_move(&mut walker, MoveRequest::new(&result))
        .unwrap();
    assert_eq!(follower.segment_start_tile(), result.indices().first().copied());

    run(&mut follower, &mut walker, 500);
    assert_eq!(walker.result, Some(PathResult::Success));
    assert_eq!(walker.segments, (0..result.len()).collect::<Vec<_>>());
    let goal = grid.position(30).unwrap();
    assert!(walker.location.distance(goal) <= follower.config().reach_tolerance);
}

#[test]
fn pause_lands_on_a_tile() {
    let grid = grid_with_wall();
    let prefs = SearchPreferences::default();
    let result = PathSearch::new(&grid).astar(0, 30, &prefs, false, SearchType::Ground, 1.0);
    let path = FollowPath::from(&result);

    let mut walker = Walker::at(grid.position(0).unwrap());
    let mut follower = PathFollower::default();
    follower
        .request_move(&mut walker, MoveRequest::new(path.clone()))
        .unwrap();

    // Half a segment in, ask for a pause.
    walker.step(0.25);
    follower.tick(&mut walker, 0.25);
    assert!(follower.request_pause(&mut walker));

    run(&mut follower, &mut walker, 500);
    assert_eq!(follower.status(), FollowStatus::Paused);
    let seg = follower.segment_start();
    let tile = path.get(seg).and_then(|p| p.tile).unwrap();
    let landed = walker.location.distance(grid.position(tile).unwrap());
    assert!(landed <= follower.config().reach_tolerance);

    // Re-requesting the same route picks up where it stopped.
    follower
        .request_move(&mut walker, MoveRequest::new(path))
        .unwrap();
    assert_eq!(follower.segment_start(), seg + 1);
    run(&mut follower, &mut walker, 500);
    assert_eq!(walker.result, Some(PathResult::Success));
}
