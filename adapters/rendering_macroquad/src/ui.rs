//! Game-over panel drawn with `macroquad::ui`.
//!
//! Every use of Macroquad's widget types stays in this module.

use macroquad::{
    color::{Color, WHITE},
    math::{RectOffset, Vec2},
    ui::{hash, widgets, Skin, Style, Ui},
};

const TITLE_FONT_SIZE: u16 = 28;
const BUTTON_FONT_SIZE: u16 = 24;
const PANEL_PADDING: f32 = 16.0;

/// Restart button fill for idle, hovered and pressed states.
const BUTTON_FILL: [Color; 3] = [
    Color::new(0.27, 0.27, 0.27, 1.0),
    Color::new(0.38, 0.38, 0.38, 1.0),
    Color::new(0.22, 0.22, 0.22, 1.0),
];

/// Layout and text of the game-over panel for the current frame.
#[derive(Clone, Debug)]
pub(crate) struct GameOverUiContext {
    /// Top-left corner of the panel in screen coordinates.
    pub(crate) origin: Vec2,
    /// Panel dimensions in screen space.
    pub(crate) size: Vec2,
    /// Fill behind the text.
    pub(crate) background: Color,
    /// Message lines shown above the restart button.
    pub(crate) lines: Vec<String>,
}

/// Renders the game-over panel and reports whether Restart was pressed.
pub(crate) fn draw_game_over_ui(ui: &mut Ui, context: GameOverUiContext) -> bool {
    let skin = game_over_skin(ui, context.background);
    ui.push_skin(&skin);

    let mut restart_pressed = false;
    let _ = ui.window(hash!("game_over"), context.origin, context.size, |ui| {
        for line in &context.lines {
            ui.label(None, line);
        }
        restart_pressed = widgets::Button::new("Restart").ui(ui);
    });

    ui.pop_skin();
    restart_pressed
}

fn game_over_skin(ui: &mut Ui, background: Color) -> Skin {
    let panel = flat_style(ui, [background; 3], 0, PANEL_PADDING, PANEL_PADDING);
    let label = flat_style(ui, [Color::new(0.0, 0.0, 0.0, 0.0); 3], TITLE_FONT_SIZE, 0.0, 4.0);
    let button = flat_style(ui, BUTTON_FILL, BUTTON_FONT_SIZE, 12.0, 8.0);

    Skin {
        window_style: panel,
        label_style: label,
        button_style: button,
        margin: 0.0,
        ..ui.default_skin()
    }
}

/// White-text style with one fill per interaction state.
///
/// A `font_size` of zero keeps the default size.
fn flat_style(ui: &mut Ui, [idle, hovered, clicked]: [Color; 3], font_size: u16, x: f32, y: f32) -> Style {
    let builder = ui
        .style_builder()
        .color(idle)
        .color_hovered(hovered)
        .color_clicked(clicked)
        .color_selected(idle)
        .color_selected_hovered(hovered)
        .color_inactive(idle)
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .margin(RectOffset::new(x, x, y, y));
    if font_size == 0 {
        builder.build()
    } else {
        builder.font_size(font_size).build()
    }
}
