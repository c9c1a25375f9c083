#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Snake Arcade.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! The game-over panel uses Macroquad's immediate-mode UI module. All
//! UI-specific calls live inside the local `ui` module.

mod playback;
mod sprites;
mod ui;

pub use self::playback::PlaybackCanvas;

use self::sprites::{DrawParams, SpriteAtlas};
use self::ui::{draw_game_over_ui, GameOverUiContext};
use anyhow::Result;
use glam::Vec2;
use macroquad::{
    color::{Color as MacroquadColor, BLACK, WHITE},
    input::{is_key_down, is_key_pressed, KeyCode},
    math::Vec2 as MacroquadVec2,
    shapes::{draw_circle, draw_rectangle},
    text::draw_text,
};
use snake_arcade_core::{Canvas, GameStatus, Heading, PixelPos, SpriteKind};
use snake_arcade_rendering::{
    BoardPresentation, Color, FrameInput, Hud, OrientationTable, Presentation, RenderingBackend,
    SpriteState,
};
use std::{path::PathBuf, time::Duration};

/// How long the relaxed-mode notice stays on screen.
pub const NOTICE_DURATION: Duration = Duration::from_secs(2);

const SNAKE_HEAD_COLOR: Color = Color::from_rgb_u8(0x1f, 0x4e, 0x8c);
const SNAKE_BODY_COLOR: Color = Color::from_rgb_u8(0x2f, 0x6f, 0xc4);
const FOOD_COLOR: Color = Color::from_rgb_u8(0xd6, 0x27, 0x28);
const OVERLAY_COLOR: Color = Color::from_rgb_u8(0x20, 0x20, 0x20);

/// Tracks UI-sourced restart requests so they can be merged with keyboard input on the next frame.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, Default)]
pub struct RestartLatch {
    latched: bool,
}

impl RestartLatch {
    /// Returns whether a restart was requested and clears the latch so it fires only once.
    pub fn take(&mut self) -> bool {
        let latched = self.latched;
        self.latched = false;
        latched
    }

    /// Records that the Restart button was pressed this frame.
    pub fn register(&mut self) {
        self.latched = true;
    }
}

/// Text shown for a limited time.
#[doc(hidden)]
#[derive(Clone, Debug, Default)]
pub struct TransientNotice {
    text: Option<String>,
    remaining: Duration,
}

impl TransientNotice {
    /// Displays `text` for `duration`, replacing any current notice.
    pub fn show(&mut self, text: impl Into<String>, duration: Duration) {
        self.text = Some(text.into());
        self.remaining = duration;
    }

    /// Consumes `dt` of display time.
    pub fn advance(&mut self, dt: Duration) {
        self.remaining = self.remaining.saturating_sub(dt);
        if self.remaining.is_zero() {
            self.text = None;
        }
    }

    /// Notice currently visible, if any.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Escape` quits the game loop.
    quit_requested: bool,
    /// Arrow key pressed this frame.
    heading: Option<Heading>,
    /// `Ctrl+R` toggles relaxed mode.
    toggle_relaxed: bool,
    /// `Enter` restarts after a game over.
    restart: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        let heading = [
            (KeyCode::Up, Heading::Up),
            (KeyCode::Down, Heading::Down),
            (KeyCode::Left, Heading::Left),
            (KeyCode::Right, Heading::Right),
        ]
        .into_iter()
        .find(|(key, _)| is_key_pressed(*key))
        .map(|(_, heading)| heading);
        let control = is_key_down(KeyCode::LeftControl) || is_key_down(KeyCode::RightControl);

        Self {
            quit_requested: is_key_pressed(KeyCode::Escape),
            heading,
            toggle_relaxed: control && is_key_pressed(KeyCode::R),
            restart: is_key_pressed(KeyCode::Enter),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    load_sprites: bool,
    sprite_manifest: PathBuf,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            show_fps: false,
            load_sprites: true,
            sprite_manifest: PathBuf::from("assets/manifest.toml"),
        }
    }
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame rate once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Configures whether the backend should attempt to load sprite assets.
    #[must_use]
    pub fn with_sprite_loading(mut self, enabled: bool) -> Self {
        self.load_sprites = enabled;
        self
    }

    /// Overrides the sprite manifest location.
    #[must_use]
    pub fn with_sprite_manifest(mut self, path: impl Into<PathBuf>) -> Self {
        self.sprite_manifest = path.into();
        self
    }
}

#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
}

impl FpsCounter {
    /// Records a rendered frame and returns the average once one second has elapsed.
    fn record_frame(&mut self, frame: Duration) -> Option<f32> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);
        if self.elapsed < Duration::from_secs(1) {
            return None;
        }
        let per_second = self.frames as f32 / self.elapsed.as_secs_f32();
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(per_second)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut dyn Canvas) -> Hud + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            load_sprites,
            sprite_manifest,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            board,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: board.width.round() as i32,
            window_height: board.height.round() as i32,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let sprite_atlas = if load_sprites {
                match SpriteAtlas::from_manifest_path(&sprite_manifest) {
                    Ok(atlas) => {
                        log::info!("loaded {} sprites", atlas.texture_count());
                        Some(atlas)
                    }
                    Err(error) => {
                        log::warn!("{error:#}; drawing placeholder sprites");
                        None
                    }
                }
            } else {
                None
            };

            let orientations = OrientationTable::new();
            let background = to_macroquad_color(clear_color);
            let mut canvas = PlaybackCanvas::new();
            let mut restart_latch = RestartLatch::default();
            let mut notice = TransientNotice::default();
            let mut fps_counter = FpsCounter::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                macroquad::window::clear_background(background);

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let frame_input = FrameInput {
                    heading: keyboard.heading,
                    toggle_relaxed: keyboard.toggle_relaxed,
                    restart: keyboard.restart || restart_latch.take(),
                };

                let hud = update(frame_dt, frame_input, &mut canvas);
                if frame_input.toggle_relaxed {
                    notice.show(hud.relaxed_notice(), NOTICE_DURATION);
                }
                canvas.advance(frame_dt, hud.tick_interval);
                notice.advance(frame_dt);

                let metrics = BoardMetrics::new(
                    &board,
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                draw_board(&board, &metrics);
                for (_, sprite) in canvas.displayed() {
                    draw_sprite(&sprite, &metrics, &orientations, sprite_atlas.as_ref());
                }
                draw_hud(&hud, notice.current(), &metrics);

                if hud.status == GameStatus::GameOver {
                    let context = game_over_context(&hud, &board, &metrics);
                    let mut root_ui = macroquad::ui::root_ui();
                    if draw_game_over_ui(&mut root_ui, context) {
                        restart_latch.register();
                    }
                }

                if let Some(per_second) = fps_counter.record_frame(frame_dt) {
                    if show_fps {
                        log::info!("FPS: {per_second:.2}");
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Maps board pixels onto the window, letterboxing to keep cells square.
#[derive(Clone, Copy, Debug, PartialEq)]
struct BoardMetrics {
    offset: Vec2,
    scale: f32,
    cell: Vec2,
}

impl BoardMetrics {
    fn new(board: &BoardPresentation, screen_width: f32, screen_height: f32) -> Self {
        let scale = (screen_width / board.width)
            .min(screen_height / board.height)
            .max(f32::EPSILON);
        let offset = Vec2::new(
            (screen_width - board.width * scale) / 2.0,
            (screen_height - board.height * scale) / 2.0,
        );
        Self {
            offset,
            scale,
            cell: board.cell_size() * scale,
        }
    }

    fn to_screen(&self, position: PixelPos) -> Vec2 {
        self.offset + Vec2::new(position.x, position.y) * self.scale
    }
}

fn draw_board(board: &BoardPresentation, metrics: &BoardMetrics) {
    for column in 1..=board.columns {
        for row in 1..=board.rows {
            let origin = metrics.offset + board.cell_origin(column, row) * metrics.scale;
            draw_rectangle(
                origin.x,
                origin.y,
                metrics.cell.x,
                metrics.cell.y,
                to_macroquad_color(board.cell_color(column, row)),
            );
        }
    }
}

fn draw_sprite(
    sprite: &SpriteState,
    metrics: &BoardMetrics,
    orientations: &OrientationTable,
    atlas: Option<&SpriteAtlas>,
) {
    let center = metrics.to_screen(sprite.position);
    let params = DrawParams::new(center, metrics.cell)
        .with_rotation(orientations.radians(sprite.orientation));
    if atlas.map_or(false, |atlas| atlas.draw(sprite.kind, params)) {
        return;
    }

    let radius = metrics.cell.x.min(metrics.cell.y) / 2.0;
    match sprite.kind {
        SpriteKind::Food => {
            draw_circle(
                center.x,
                center.y,
                radius * 0.7,
                to_macroquad_color(FOOD_COLOR),
            );
        }
        SpriteKind::SnakeBody => {
            let size = metrics.cell * 0.84;
            let top_left = center - size * 0.5;
            draw_rectangle(
                top_left.x,
                top_left.y,
                size.x,
                size.y,
                to_macroquad_color(SNAKE_BODY_COLOR),
            );
        }
        SpriteKind::SnakeHead => {
            draw_circle(
                center.x,
                center.y,
                radius * 0.9,
                to_macroquad_color(SNAKE_HEAD_COLOR),
            );
            let eye = center + orientations.facing(sprite.orientation) * radius * 0.5;
            draw_circle(eye.x, eye.y, radius * 0.18, WHITE);
        }
    }
}

fn draw_hud(hud: &Hud, notice: Option<&str>, metrics: &BoardMetrics) {
    let font_size = (metrics.cell.y * 0.8).max(16.0);
    let _ = draw_text(
        &hud.score_text(),
        metrics.offset.x + 8.0,
        metrics.offset.y + font_size,
        font_size,
        BLACK,
    );
    if let Some(text) = notice {
        let color = if hud.relaxed {
            MacroquadColor::from_rgba(0xff, 0x00, 0x00, 0xff)
        } else {
            MacroquadColor::from_rgba(0x00, 0x80, 0x00, 0xff)
        };
        let _ = draw_text(
            text,
            metrics.offset.x + 8.0,
            metrics.offset.y + font_size * 2.2,
            font_size,
            color,
        );
    }
}

fn game_over_context(hud: &Hud, board: &BoardPresentation, metrics: &BoardMetrics) -> GameOverUiContext {
    let size = MacroquadVec2::new(260.0, 180.0);
    let center = metrics.offset + Vec2::new(board.width, board.height) * metrics.scale * 0.5;
    GameOverUiContext {
        origin: MacroquadVec2::new(center.x, center.y) - size / 2.0,
        size,
        background: to_macroquad_color(OVERLAY_COLOR.with_alpha(0.9)),
        lines: hud.game_over_text().lines().map(str::to_owned).collect(),
    }
}

fn to_macroquad_color(color: Color) -> MacroquadColor {
    MacroquadColor::new(color.red, color.green, color.blue, color.alpha)
}
