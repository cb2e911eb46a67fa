//! Shared scenario used by the demo binaries.
//!
//! Maps are written as text, one character per tile:
//! `#` wall, `~` water, `,` grass, anything else plain ground. The top text
//! row is the highest Y.

use std::collections::HashMap;

use log::info;
use tilepath_core::{Grid, GridConfig, GridError, Terrain, TileProperty, Vec3};
use tilepath_follow::{MovementAgent, PathResult};

pub const MAP: &str = "\
..........,,,,
..####....,,,,
.....#....~~~.
.....#....~~~.
..,,.#........
..,,.####.....
..............";

/// Build a square grid from a text map.
pub fn parse_map(map: &str) -> Result<Grid, GridError> {
    let rows: Vec<&str> = map.lines().collect();
    let height = rows.len();
    let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);

    let mut props = HashMap::new();
    for (r, row) in rows.iter().enumerate() {
        let y = height - 1 - r;
        for (x, c) in row.chars().enumerate() {
            let prop = match c {
                '#' => TileProperty::blocked(),
                '~' => TileProperty::with_terrain(Terrain::Water),
                ',' => TileProperty {
                    cost: 2.0,
                    ..TileProperty::with_terrain(Terrain::Grass)
                },
                _ => continue,
            };
            props.insert(x * height + y, prop);
        }
    }

    let mut grid = Grid::default();
    grid.generate(GridConfig::square(width, height), &props)?;
    Ok(grid)
}

/// Tile index of map column `x`, row `y` (counting Y upward).
pub fn tile(grid: &Grid, x: usize, y: usize) -> usize {
    x * grid.height() + y
}

/// Draw the grid, overlaying `marks`.
pub fn render(grid: &Grid, marks: &HashMap<usize, char>) -> String {
    let (w, h) = (grid.width(), grid.height());
    let mut out = String::with_capacity((w + 1) * h);
    for y in (0..h).rev() {
        for x in 0..w {
            let i = x * h + y;
            let c = marks.get(&i).copied().unwrap_or_else(|| match grid.tile(i) {
                Some(t) if !t.is_passable() => '#',
                Some(t) => match t.terrain() {
                    Terrain::Water => '~',
                    Terrain::Grass => ',',
                    _ => '.',
                },
                None => ' ',
            });
            out.push(c);
        }
        out.push('\n');
    }
    out
}

// ---------------------------------------------------------------------------
// Walker
// ---------------------------------------------------------------------------

/// Simulated agent moving at constant speed toward its target.
pub struct Walker {
    pub name: &'static str,
    pub location: Vec3,
    pub speed: f32,
    target: Option<Vec3>,
    pub pause_at_segment: Option<usize>,
    pub result: Option<PathResult>,
}

impl Walker {
    pub fn new(name: &'static str, location: Vec3, speed: f32) -> Self {
        Self {
            name,
            location,
            speed,
            target: None,
            pause_at_segment: None,
            result: None,
        }
    }

    pub fn step(&mut self, dt: f32) {
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
        self.pause_at_segment == Some(segment)
    }

    fn on_begin_movement(&mut self) {
        info!("{}: off we go from {}", self.name, self.location);
    }

    fn on_segment_finished(&mut self, segment: usize) {
        info!("{}: segment {segment} done at {}", self.name, self.location);
    }

    fn on_path_finished(&mut self, result: PathResult) {
        info!("{}: path finished: {result:?}", self.name);
        self.result = Some(result);
    }

    fn on_pause_movement(&mut self) {
        info!("{}: will pause at the next tile", self.name);
    }

    fn on_resume_movement(&mut self) {
        info!("{}: moving again", self.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_round_trips_through_render() {
        let grid = parse_map(MAP).unwrap();
        assert_eq!(grid.width(), 14);
        assert_eq!(grid.height(), 7);
        let drawn = render(&grid, &HashMap::new());
        assert_eq!(drawn.trim_end(), MAP);
    }

    #[test]
    fn walker_snaps_to_target() {
        let mut w = Walker::new("w", Vec3::ZERO, 10.0);
        w.set_move_target(Vec3::new(15.0, 0.0, 0.0));
        w.step(1.0);
        assert_eq!(w.location, Vec3::new(10.0, 0.0, 0.0));
        w.step(1.0);
        assert_eq!(w.location, Vec3::new(15.0, 0.0, 0.0));
    }
}
