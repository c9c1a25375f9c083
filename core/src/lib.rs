#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Snake Arcade engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and the systems. Adapters and the session submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems to react to deterministically.
//!
//! The collaborator traits [`Canvas`] and [`Timer`] describe everything the
//! simulation needs from the outside: somewhere to place sprites and a
//! single-shot delayed wake-up. Neither owns simulation state.

use std::time::Duration;

use serde::Deserialize;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "SNAKE ARCADE";

/// Cell the food occupies when no free cell is left for it.
pub const FALLBACK_FOOD_CELL: Cell = Cell::new(1, 1);

/// Lifecycle state of a game session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum GameStatus {
    /// No tick is scheduled and the snake has not started moving.
    #[default]
    Stopped,
    /// Ticks are being scheduled and the snake advances on each one.
    Running,
    /// The snake collided; the session waits for a restart.
    GameOver,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the board with a grid of the provided dimensions.
    ConfigureBoard {
        /// Number of cell columns.
        columns: u32,
        /// Number of cell rows.
        rows: u32,
        /// Width of the board surface in pixels.
        width: f32,
        /// Height of the board surface in pixels.
        height: f32,
    },
    /// Recreates the snake from scratch.
    ///
    /// When either endpoint is omitted the default horizontal layout centred
    /// on the board is used.
    SpawnSnake {
        /// Cell occupied by the head.
        head: Option<Cell>,
        /// Cell the body extends towards. The tail cell itself is not occupied.
        tail: Option<Cell>,
    },
    /// Stores the heading the snake will take on its next advance.
    SetPendingHeading {
        /// Heading already validated by the direction arbiter.
        heading: Heading,
    },
    /// Enables or disables relaxed rules.
    SetRelaxedMode {
        /// Whether relaxed rules should be active.
        enabled: bool,
    },
    /// Moves the head one cell along the pending heading and resolves
    /// collision and consumption against the current free-cell snapshot.
    AdvanceSnake,
    /// Finishes the tick: refreshes the free-cell snapshot and either keeps
    /// the grown tail or retracts it.
    SettleSnake,
    /// Moves the food to the provided cell.
    PlaceFood {
        /// Destination cell for the food.
        cell: Cell,
    },
    /// Sets the score back to zero.
    ResetScore,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the board was replaced.
    BoardConfigured {
        /// Number of cell columns.
        columns: u32,
        /// Number of cell rows.
        rows: u32,
    },
    /// Confirms that a fresh snake was created.
    SnakeSpawned {
        /// Cell occupied by the head.
        head: Cell,
        /// Number of segments in the new snake.
        length: u32,
        /// Heading shared by every segment of the new snake.
        heading: Heading,
    },
    /// Reports that a board or snake layout request was rejected.
    LayoutRejected {
        /// Specific reason the layout was refused.
        reason: LayoutError,
    },
    /// Announces that the pending heading changed.
    PendingHeadingChanged {
        /// Heading applied on the next advance.
        heading: Heading,
    },
    /// Announces that relaxed rules were switched on or off.
    RelaxedModeChanged {
        /// Whether relaxed rules are now active.
        enabled: bool,
    },
    /// Confirms that the head entered a new cell.
    SnakeAdvanced {
        /// Cell the head occupied before the move.
        from: Cell,
        /// Cell the head occupies after the move.
        to: Cell,
        /// Heading used for the move.
        heading: Heading,
    },
    /// Reports that the head entered a cell outside the free-cell snapshot.
    SnakeCollided {
        /// Cell the head moved into.
        cell: Cell,
    },
    /// Reports that the head entered the food cell.
    FoodEaten {
        /// Cell where the food was consumed.
        cell: Cell,
        /// Score after the consumption was counted.
        score: u32,
    },
    /// Confirms that the tick's bookkeeping is complete.
    SnakeSettled {
        /// Segment count after the tick.
        length: u32,
        /// Whether the snake kept an extra tail segment.
        grew: bool,
    },
    /// Confirms that the food moved.
    FoodPlaced {
        /// Cell the food now occupies.
        cell: Cell,
    },
    /// Confirms that the score returned to zero.
    ScoreReset,
}

/// Reasons a board or snake layout can be refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum LayoutError {
    /// The grid would have no cells.
    #[error("board must have at least one column and one row")]
    EmptyGrid,
    /// The pixel surface has no area.
    #[error("board surface must have a positive width and height")]
    DegenerateSurface,
    /// Head and tail do not share a row or a column.
    #[error("snake endpoints {head} and {tail} do not share a row or column")]
    NotAligned {
        /// Requested head cell.
        head: Cell,
        /// Requested tail cell.
        tail: Cell,
    },
    /// Head and tail are closer than two cells.
    #[error("snake must span at least two cells")]
    TooShort,
    /// A cell of the requested layout lies outside the board.
    #[error("cell {cell} lies outside the board")]
    OutOfBounds {
        /// First offending cell.
        cell: Cell,
    },
}

/// Location of a single grid cell expressed as 1-indexed column and row.
///
/// Coordinates are signed so that a head stepping off the board is still
/// representable; such cells are simply never free.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
pub struct Cell {
    column: i32,
    row: i32,
}

impl Cell {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// 1-indexed column of the cell.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// 1-indexed row of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Returns the neighbouring cell one step along the heading.
    #[must_use]
    pub const fn step(self, heading: Heading) -> Self {
        let (dc, dr) = heading.unit_offset();
        Self {
            column: self.column + dc,
            row: self.row + dr,
        }
    }

    /// Computes the Chebyshev distance between two cells.
    #[must_use]
    pub fn chebyshev_distance(self, other: Cell) -> u32 {
        self.column
            .abs_diff(other.column)
            .max(self.row.abs_diff(other.row))
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Cardinal movement directions available to the snake.
///
/// Each heading is encoded as a compass angle measured clockwise from up:
/// right is 90, down 180, left 270 and up 360.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Heading {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Heading {
    /// All headings in angle order.
    pub const ALL: [Heading; 4] = [Heading::Right, Heading::Down, Heading::Left, Heading::Up];

    /// Angle encoding of the heading, one of 90, 180, 270 or 360.
    #[must_use]
    pub const fn degrees(self) -> u16 {
        match self {
            Self::Right => 90,
            Self::Down => 180,
            Self::Left => 270,
            Self::Up => 360,
        }
    }

    /// Column and row offset of a single step along the heading.
    #[must_use]
    pub const fn unit_offset(self) -> (i32, i32) {
        match self {
            Self::Right => (1, 0),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Up => (0, -1),
        }
    }
}

/// Visual rotation of a sprite in whole degrees, clockwise from up.
///
/// Always normalised into `0..360`, so [`Heading::Up`] maps to zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Orientation(u16);

impl Orientation {
    /// Creates an orientation from any signed angle.
    #[must_use]
    pub const fn from_degrees(degrees: i32) -> Self {
        Self(degrees.rem_euclid(360) as u16)
    }

    /// Orientation a sprite shows when travelling along the heading.
    #[must_use]
    pub const fn of(heading: Heading) -> Self {
        Self::from_degrees(heading.degrees() as i32)
    }

    /// Angle in `0..360`.
    #[must_use]
    pub const fn degrees(&self) -> u16 {
        self.0
    }

    /// Signed rotation that reaches `target` the short way round.
    ///
    /// The result lies in `(-180, 180]`.
    #[must_use]
    pub const fn delta_to(self, target: Orientation) -> i32 {
        let delta = (target.0 as i32 - self.0 as i32).rem_euclid(360);
        if delta > 180 {
            delta - 360
        } else {
            delta
        }
    }

    /// Returns the orientation rotated by a relative angle.
    #[must_use]
    pub const fn rotated(self, delta: i32) -> Self {
        Self::from_degrees(self.0 as i32 + delta)
    }
}

/// Position on the board surface measured in pixels from the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct PixelPos {
    /// Horizontal offset in pixels.
    pub x: f32,
    /// Vertical offset in pixels.
    pub y: f32,
}

impl PixelPos {
    /// Creates a new pixel position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Linearly interpolates towards `other` by `fraction`.
    #[must_use]
    pub fn lerp(self, other: PixelPos, fraction: f32) -> Self {
        Self {
            x: self.x + (other.x - self.x) * fraction,
            y: self.y + (other.y - self.y) * fraction,
        }
    }
}

/// Artwork a sprite is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpriteKind {
    /// Head segment of the snake.
    SnakeHead,
    /// Any non-head segment of the snake.
    SnakeBody,
    /// The food item.
    Food,
}

/// Opaque identifier of a sprite owned by a [`Canvas`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpriteHandle(u32);

impl SpriteHandle {
    /// Creates a new handle with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the handle.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Rendering collaborator that stores positioned, rotated sprites.
///
/// The simulation calls these once per sub-frame per segment and once per
/// food relocation; it never touches pixel buffers.
pub trait Canvas {
    /// Creates a sprite of the given kind and returns its handle.
    fn create_sprite(
        &mut self,
        kind: SpriteKind,
        position: PixelPos,
        orientation: Orientation,
    ) -> SpriteHandle;

    /// Moves and/or rotates an existing sprite. Unknown handles are ignored.
    fn update_sprite(
        &mut self,
        handle: SpriteHandle,
        position: Option<PixelPos>,
        orientation: Option<Orientation>,
    );

    /// Removes a sprite. Unknown handles are ignored.
    fn delete_sprite(&mut self, handle: SpriteHandle);

    /// Reports where a sprite currently sits, if it exists.
    fn sprite_position(&self, handle: SpriteHandle) -> Option<PixelPos>;
}

/// Opaque identifier of a scheduled wake-up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    /// Creates a new handle with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the handle.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Timer collaborator providing cancellable single-shot delays.
///
/// The owner of the timer delivers each expired handle back to whoever
/// scheduled it; the handle plays the role of the callback identity.
pub trait Timer {
    /// Schedules a wake-up after `delay` and returns its handle.
    fn schedule(&mut self, delay: Duration) -> TimerHandle;

    /// Cancels a pending wake-up. Returns `false` if it already fired or never existed.
    fn cancel(&mut self, handle: TimerHandle) -> bool;
}

/// Score-dependent cadence of simulation ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickSchedule {
    base_delay: Duration,
    min_delay: Duration,
    decay_per_point: Duration,
}

impl TickSchedule {
    /// Delay before the first point is scored.
    pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(200);
    /// Floor the delay never drops below.
    pub const DEFAULT_MIN_DELAY: Duration = Duration::from_millis(50);
    /// Amount the delay shrinks per point scored.
    pub const DEFAULT_DECAY_PER_POINT: Duration = Duration::from_millis(5);

    /// Creates a schedule from explicit parameters.
    #[must_use]
    pub const fn new(base_delay: Duration, min_delay: Duration, decay_per_point: Duration) -> Self {
        Self {
            base_delay,
            min_delay,
            decay_per_point,
        }
    }

    /// Delay until the next tick for the given live score.
    ///
    /// Computes `max(min_delay, base_delay - score * decay_per_point)` without
    /// underflowing.
    #[must_use]
    pub fn interval_for(&self, score: u32) -> Duration {
        self.base_delay
            .saturating_sub(self.decay_per_point.saturating_mul(score))
            .max(self.min_delay)
    }
}

impl Default for TickSchedule {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_BASE_DELAY,
            Self::DEFAULT_MIN_DELAY,
            Self::DEFAULT_DECAY_PER_POINT,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_degrees_follow_compass_encoding() {
        let degrees: Vec<u16> = Heading::ALL.iter().map(|heading| heading.degrees()).collect();
        assert_eq!(degrees, vec![90, 180, 270, 360]);
    }

    #[test]
    fn step_follows_unit_offsets() {
        let origin = Cell::new(10, 10);
        assert_eq!(origin.step(Heading::Right), Cell::new(11, 10));
        assert_eq!(origin.step(Heading::Down), Cell::new(10, 11));
        assert_eq!(origin.step(Heading::Left), Cell::new(9, 10));
        assert_eq!(origin.step(Heading::Up), Cell::new(10, 9));
    }

    #[test]
    fn chebyshev_distance_matches_expectation() {
        assert_eq!(Cell::new(10, 10).chebyshev_distance(Cell::new(7, 10)), 3);
        assert_eq!(Cell::new(1, 1).chebyshev_distance(Cell::new(3, 5)), 4);
    }

    #[test]
    fn orientation_normalises_up_to_zero() {
        assert_eq!(Orientation::of(Heading::Up).degrees(), 0);
        assert_eq!(Orientation::from_degrees(-90).degrees(), 270);
    }

    #[test]
    fn orientation_delta_takes_short_way() {
        let up = Orientation::of(Heading::Up);
        let left = Orientation::of(Heading::Left);
        assert_eq!(up.delta_to(left), -90);
        assert_eq!(left.delta_to(up), 90);
        assert_eq!(up.delta_to(Orientation::of(Heading::Down)), 180);
        assert_eq!(up.rotated(-18).degrees(), 342);
    }

    #[test]
    fn tick_schedule_matches_documented_cadence() {
        let schedule = TickSchedule::default();
        assert_eq!(schedule.interval_for(0), Duration::from_millis(200));
        assert_eq!(schedule.interval_for(10), Duration::from_millis(150));
        assert_eq!(schedule.interval_for(40), Duration::from_millis(50));
        assert_eq!(schedule.interval_for(100), Duration::from_millis(50));
    }

    #[test]
    fn tick_schedule_is_monotonic() {
        let schedule = TickSchedule::default();
        let mut previous = schedule.interval_for(0);
        for score in 1..64 {
            let current = schedule.interval_for(score);
            assert!(current <= previous);
            previous = current;
        }
    }

    #[test]
    fn cell_deserializes_from_toml_table() {
        #[derive(serde::Deserialize)]
        struct Wrapper {
            head: Cell,
        }
        let parsed: Wrapper =
            toml::from_str("head = { column = 4, row = 9 }").expect("cell should parse");
        assert_eq!(parsed.head, Cell::new(4, 9));
    }

    #[test]
    fn lerp_interpolates_both_axes() {
        let start = PixelPos::new(0.0, 10.0);
        let end = PixelPos::new(10.0, 30.0);
        assert_eq!(start.lerp(end, 0.5), PixelPos::new(5.0, 20.0));
    }
}
