//! Vehicle state: heading, speed, and the turn interpolation record.

use crate::config::CityParams;
use crate::road::{Orientation, RoadNetwork};
use glam::Vec2;
use rand::Rng;
use std::f32::consts::{FRAC_PI_2, PI};

/// Render height of every vehicle above the ground plane.
pub const RIDE_HEIGHT: f32 = 0.2;

/// Wall-clock length of a turn interpolation, in seconds.
pub const TURN_DURATION: f32 = 0.5;

/// Distance covered per tick: `SPEED_MIN + random * SPEED_SPAN`.
pub const SPEED_MIN: f32 = 0.05;
pub const SPEED_SPAN: f32 = 0.05;

/// One of the four axis-aligned travel headings.
///
/// Vehicles only ever travel along these, so "the direction is always a
/// canonical unit vector" holds by construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    PosX,
    NegX,
    PosZ,
    NegZ,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::PosX,
        Direction::NegX,
        Direction::PosZ,
        Direction::NegZ,
    ];

    /// Unit travel vector on the ground plane (x, z).
    #[inline]
    pub fn unit(self) -> Vec2 {
        match self {
            Direction::PosX => Vec2::new(1.0, 0.0),
            Direction::NegX => Vec2::new(-1.0, 0.0),
            Direction::PosZ => Vec2::new(0.0, 1.0),
            Direction::NegZ => Vec2::new(0.0, -1.0),
        }
    }

    /// Facing angle implied by this heading: 0 or π along x, ∓π/2 along z.
    #[inline]
    pub fn yaw(self) -> f32 {
        match self {
            Direction::PosX => 0.0,
            Direction::NegX => PI,
            Direction::PosZ => -FRAC_PI_2,
            Direction::NegZ => FRAC_PI_2,
        }
    }

    #[inline]
    pub fn reversed(self) -> Direction {
        match self {
            Direction::PosX => Direction::NegX,
            Direction::NegX => Direction::PosX,
            Direction::PosZ => Direction::NegZ,
            Direction::NegZ => Direction::PosZ,
        }
    }

    /// Whether this heading runs along the x axis.
    #[inline]
    pub fn along_x(self) -> bool {
        matches!(self, Direction::PosX | Direction::NegX)
    }
}

/// Quadratic ease-in-out over `t ∈ [0, 1]`.
pub fn ease_in_out_quad(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u / 2.0
    }
}

/// An in-flight rotation from one heading to another.
///
/// The tween interpolates the raw yaw values, with no wrap-around
/// shortest-path correction. It is advanced once per tick; completion is
/// checked by the traffic phase, which then commits the vehicle's new
/// direction.
#[derive(Clone, Copy, Debug)]
pub struct Turn {
    pub from_yaw: f32,
    pub to_yaw: f32,
    pub elapsed: f32,
    pub duration: f32,
}

impl Turn {
    pub fn new(from_yaw: f32, to_yaw: f32) -> Self {
        Self {
            from_yaw,
            to_yaw,
            elapsed: 0.0,
            duration: TURN_DURATION,
        }
    }

    /// Advances the tween clock. Call once per tick.
    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt;
    }

    pub fn finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Eased yaw at the current tween time, clamped to the endpoints.
    pub fn current_yaw(&self) -> f32 {
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        self.from_yaw + (self.to_yaw - self.from_yaw) * ease_in_out_quad(t)
    }
}

/// A single simulated vehicle.
///
/// `dir` is the committed travel heading; `target_dir` differs from it
/// only while `turn` is `Some`, and the commit happens when the tween
/// completes. `yaw` is the smoothly interpolated facing used by
/// renderers; outside of turns it equals `dir.yaw()`.
#[derive(Clone, Debug)]
pub struct Vehicle {
    /// Ground position (x, z); render height is [`RIDE_HEIGHT`].
    pub pos: Vec2,
    pub dir: Direction,
    pub target_dir: Direction,
    pub yaw: f32,
    /// Per-tick step length, fixed at creation.
    pub speed: f32,
    pub turn: Option<Turn>,
    /// Derived each tick from the global night flag.
    pub headlights_on: bool,
}

impl Vehicle {
    /// Creates a vehicle at a fixed position and heading, not turning.
    pub fn at(pos: Vec2, dir: Direction, speed: f32) -> Self {
        Self {
            pos,
            dir,
            target_dir: dir,
            yaw: dir.yaw(),
            speed,
            turn: None,
            headlights_on: false,
        }
    }

    /// Spawns a vehicle somewhere on a random lane.
    ///
    /// A vertical lane pins x to the lane offset and draws z uniformly in
    /// `[-grid_radius, grid_radius]`, with a coin-flip ±z heading; a
    /// horizontal lane does the mirror image along x. Speed is drawn once
    /// from `[SPEED_MIN, SPEED_MIN + SPEED_SPAN)`.
    pub fn spawn(roads: &RoadNetwork, params: &CityParams, rng: &mut impl Rng) -> Self {
        let r = params.grid_radius;
        let lane = roads.lanes[rng.random_range(0..roads.lanes.len())];

        let (pos, dir) = match lane.orientation {
            Orientation::Vertical => {
                let dir = if rng.random::<bool>() {
                    Direction::PosZ
                } else {
                    Direction::NegZ
                };
                (Vec2::new(lane.offset, rng.random_range(-r..=r)), dir)
            }
            Orientation::Horizontal => {
                let dir = if rng.random::<bool>() {
                    Direction::PosX
                } else {
                    Direction::NegX
                };
                (Vec2::new(rng.random_range(-r..=r), lane.offset), dir)
            }
        };

        let speed = SPEED_MIN + rng.random::<f32>() * SPEED_SPAN;
        Self::at(pos, dir, speed)
    }

    /// Starts a turn toward `to`: records the tween and the pending
    /// heading, leaving `dir` untouched until completion.
    pub fn begin_turn(&mut self, to: Direction) {
        self.target_dir = to;
        self.turn = Some(Turn::new(self.yaw, to.yaw()));
    }
}
