#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Snake Arcade adapters.

mod headless;

pub use headless::{HeadlessCanvas, SpriteState};

use anyhow::Result as AnyResult;
use glam::Vec2;
use snake_arcade_core::{Canvas, GameStatus, Heading, Orientation};
use std::{
    error::Error,
    fmt, fs,
    path::PathBuf,
    time::Duration,
};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with a different alpha channel.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }
}

/// Input snapshot gathered by adapters before updating the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Directional key pressed this frame, if any.
    pub heading: Option<Heading>,
    /// Whether the relaxed-mode shortcut was pressed.
    pub toggle_relaxed: bool,
    /// Whether a restart was requested.
    pub restart: bool,
}

/// Read-only game state the adapter overlays on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hud {
    /// Points scored since the last reset.
    pub score: u32,
    /// Lifecycle state of the session.
    pub status: GameStatus,
    /// Whether relaxed rules are active.
    pub relaxed: bool,
    /// Delay between the ticks currently being animated.
    pub tick_interval: Duration,
}

impl Hud {
    /// Score readout shown while playing.
    #[must_use]
    pub fn score_text(&self) -> String {
        format!("Score: {}", self.score)
    }

    /// Two-line message shown once the snake collided.
    #[must_use]
    pub fn game_over_text(&self) -> String {
        format!("GAME OVER\nScore: {}", self.score)
    }

    /// Short notice announcing the relaxed-mode setting.
    #[must_use]
    pub fn relaxed_notice(&self) -> &'static str {
        if self.relaxed {
            "Relaxed mode ON"
        } else {
            "Relaxed mode OFF"
        }
    }
}

/// Describes the checkerboard drawn beneath the sprites.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoardPresentation {
    /// Number of cell columns.
    pub columns: u32,
    /// Number of cell rows.
    pub rows: u32,
    /// Width of the board surface in pixels.
    pub width: f32,
    /// Height of the board surface in pixels.
    pub height: f32,
    /// Color of cells whose column and row sum to an even number.
    pub light: Color,
    /// Color of the remaining cells.
    pub dark: Color,
}

impl BoardPresentation {
    /// Light checkerboard shade.
    pub const LIGHT: Color = Color::from_rgb_u8(0x8b, 0xf5, 0x2d);
    /// Dark checkerboard shade.
    pub const DARK: Color = Color::from_rgb_u8(0x6e, 0xbd, 0x28);

    /// Creates a board presentation after validating its dimensions.
    pub fn new(columns: u32, rows: u32, width: f32, height: f32) -> Result<Self, RenderingError> {
        if columns == 0 || rows == 0 {
            return Err(RenderingError::EmptyBoard { columns, rows });
        }
        Ok(Self {
            columns,
            rows,
            width,
            height,
            light: Self::LIGHT,
            dark: Self::DARK,
        })
    }

    /// Size of a single cell in pixels.
    #[must_use]
    pub fn cell_size(&self) -> Vec2 {
        Vec2::new(
            self.width / self.columns as f32,
            self.height / self.rows as f32,
        )
    }

    /// Top-left corner of a 1-indexed cell.
    #[must_use]
    pub fn cell_origin(&self, column: u32, row: u32) -> Vec2 {
        let size = self.cell_size();
        Vec2::new(
            column.saturating_sub(1) as f32 * size.x,
            row.saturating_sub(1) as f32 * size.y,
        )
    }

    /// Checkerboard color of a 1-indexed cell.
    #[must_use]
    pub const fn cell_color(&self, column: u32, row: u32) -> Color {
        if (column + row) % 2 == 0 {
            self.light
        } else {
            self.dark
        }
    }
}

/// Static description of the window and board.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Board drawn beneath the sprites.
    pub board: BoardPresentation,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, board: BoardPresentation) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            board,
        }
    }
}

/// Rendering backend capable of presenting Snake Arcade sessions.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update` closure receives the frame delta, the input
    /// captured by the adapter, and the canvas the game draws its sprites on.
    /// It returns the overlay state to display for that frame.
    fn run<F>(self, presentation: Presentation, update: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut dyn Canvas) -> Hud + 'static;
}

/// Where sprite artwork comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpriteSource {
    /// Encoded image already held in memory.
    Bytes(Vec<u8>),
    /// Encoded image stored on disk.
    Path(PathBuf),
}

impl SpriteSource {
    /// Selects a source, preferring in-memory bytes over a path.
    ///
    /// Fails when neither is supplied.
    pub fn new(bytes: Option<Vec<u8>>, path: Option<PathBuf>) -> Result<Self, RenderingError> {
        match (bytes, path) {
            (Some(bytes), _) => Ok(Self::Bytes(bytes)),
            (None, Some(path)) => Ok(Self::Path(path)),
            (None, None) => Err(RenderingError::MissingImageSource),
        }
    }

    /// Reads the encoded image.
    pub fn load(&self) -> std::io::Result<Vec<u8>> {
        match self {
            Self::Bytes(bytes) => Ok(bytes.clone()),
            Self::Path(path) => fs::read(path),
        }
    }
}

/// Precomputed rotation for each whole-degree orientation.
///
/// Sprites are rotated by table lookup instead of trigonometry per frame.
#[derive(Clone, Debug)]
pub struct OrientationTable {
    entries: Vec<(f32, Vec2)>,
}

impl OrientationTable {
    /// Builds the table for all 360 orientations.
    #[must_use]
    pub fn new() -> Self {
        let entries = (0..360u16)
            .map(|degrees| {
                let radians = f32::from(degrees).to_radians();
                // Zero degrees faces up, angles grow clockwise on a y-down surface.
                (radians, Vec2::new(radians.sin(), -radians.cos()))
            })
            .collect();
        Self { entries }
    }

    /// Clockwise rotation in radians.
    #[must_use]
    pub fn radians(&self, orientation: Orientation) -> f32 {
        self.entry(orientation).0
    }

    /// Unit vector the sprite faces.
    #[must_use]
    pub fn facing(&self, orientation: Orientation) -> Vec2 {
        self.entry(orientation).1
    }

    fn entry(&self, orientation: Orientation) -> (f32, Vec2) {
        self.entries
            .get(usize::from(orientation.degrees()))
            .copied()
            .unwrap_or((0.0, Vec2::new(0.0, -1.0)))
    }
}

impl Default for OrientationTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// The board must contain at least one cell.
    EmptyBoard {
        /// Requested number of columns.
        columns: u32,
        /// Requested number of rows.
        rows: u32,
    },
    /// A sprite needs either image bytes or a path.
    MissingImageSource,
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyBoard { columns, rows } => {
                write!(f, "board must contain cells (received {columns}x{rows})")
            }
            Self::MissingImageSource => {
                write!(f, "an image or a path to an image is required")
            }
        }
    }
}

impl Error for RenderingError {}
