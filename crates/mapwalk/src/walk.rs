//! Avatar movement and the walked-distance statistic.

use crate::MapSquare;
use glam::Vec3;

/// Default avatar speed in map units per second.
pub const PLAYER_SPEED: f32 = 5.0;

/// Cardinal direction the avatar faces, stored as a yaw about +Y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    /// Towards -z.
    #[default]
    North,
    /// Towards +z.
    South,
    /// Towards -x.
    West,
    /// Towards +x.
    East,
}

impl Facing {
    pub fn yaw_deg(self) -> f32 {
        match self {
            Facing::North => 180.0,
            Facing::South => 0.0,
            Facing::West => -90.0,
            Facing::East => 90.0,
        }
    }

    pub fn yaw_rad(self) -> f32 {
        self.yaw_deg().to_radians()
    }
}

/// Movement keys held during a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveInput {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub position: Vec3,
    pub facing: Facing,
}

impl Player {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            facing: Facing::North,
        }
    }

    /// Moves by `speed * dt` along every held axis, then clamps onto the map.
    /// When several keys are held the last one in W, S, A, D order decides
    /// the facing.
    pub fn step(&mut self, input: MoveInput, speed: f32, dt: f32, map: &MapSquare) {
        let velocity = speed * dt;

        if input.forward {
            self.position.z -= velocity;
            self.facing = Facing::North;
        }
        if input.back {
            self.position.z += velocity;
            self.facing = Facing::South;
        }
        if input.left {
            self.position.x -= velocity;
            self.facing = Facing::West;
        }
        if input.right {
            self.position.x += velocity;
            self.facing = Facing::East;
        }

        self.position = map.clamp(self.position);
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

/// Running total of the distance the avatar has covered.
#[derive(Debug, Clone, Default)]
pub struct WalkTracker {
    total: f32,
    last: Vec3,
}

impl WalkTracker {
    pub fn new(start: Vec3) -> Self {
        Self {
            total: 0.0,
            last: start,
        }
    }

    /// Adds the distance from the previously recorded position.
    pub fn record(&mut self, position: Vec3) -> f32 {
        let delta = self.last.distance(position);
        self.total += delta;
        self.last = position;
        delta
    }

    #[inline]
    pub fn total(&self) -> f32 {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 75.0;

    #[test]
    fn one_second_forward_walks_five_units() {
        let map = MapSquare::default();
        let mut player = Player::default();
        let mut tracker = WalkTracker::new(player.position);
        let input = MoveInput {
            forward: true,
            ..Default::default()
        };

        for _ in 0..75 {
            player.step(input, PLAYER_SPEED, DT, &map);
            tracker.record(player.position);
        }

        assert!((tracker.total() - 5.0).abs() < 1e-3, "total = {}", tracker.total());
        assert!((player.position.z + 5.0).abs() < 1e-3);
        assert_eq!(player.facing, Facing::North);
    }

    #[test]
    fn clamped_at_map_edge() {
        let map = MapSquare::default();
        let mut player = Player::new(Vec3::new(0.0, 0.0, -9.9));
        let mut tracker = WalkTracker::new(player.position);
        let input = MoveInput {
            forward: true,
            ..Default::default()
        };

        for _ in 0..150 {
            player.step(input, PLAYER_SPEED, DT, &map);
            tracker.record(player.position);
        }

        assert_eq!(player.position.z, -10.0);
        // Pushing against the edge adds nothing once clamped.
        assert!((tracker.total() - 0.1).abs() < 1e-4);
    }

    #[test]
    fn facing_follows_last_key() {
        let map = MapSquare::default();
        let mut player = Player::default();

        player.step(MoveInput { back: true, ..Default::default() }, 1.0, 0.1, &map);
        assert_eq!(player.facing, Facing::South);

        player.step(MoveInput { forward: true, left: true, ..Default::default() }, 1.0, 0.1, &map);
        assert_eq!(player.facing, Facing::West);

        player.step(MoveInput { left: true, right: true, ..Default::default() }, 1.0, 0.1, &map);
        assert_eq!(player.facing, Facing::East);
    }

    #[test]
    fn idle_keeps_position_and_facing() {
        let map = MapSquare::default();
        let mut player = Player::new(Vec3::new(2.0, 0.0, 3.0));
        player.facing = Facing::East;
        player.step(MoveInput::default(), PLAYER_SPEED, DT, &map);
        assert_eq!(player.position, Vec3::new(2.0, 0.0, 3.0));
        assert_eq!(player.facing, Facing::East);
    }

    #[test]
    fn tracker_is_monotonic() {
        let mut tracker = WalkTracker::new(Vec3::ZERO);
        let mut prev = 0.0;
        for p in [Vec3::X, Vec3::ZERO, Vec3::new(0.0, 0.0, 3.0), Vec3::new(0.0, 0.0, 3.0)] {
            tracker.record(p);
            assert!(tracker.total() >= prev);
            prev = tracker.total();
        }
        assert!((tracker.total() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn yaw_values() {
        assert_eq!(Facing::North.yaw_deg(), 180.0);
        assert_eq!(Facing::South.yaw_deg(), 0.0);
        assert_eq!(Facing::West.yaw_deg(), -90.0);
        assert_eq!(Facing::East.yaw_deg(), 90.0);
    }
}
