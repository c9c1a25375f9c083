#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares the Snake Arcade experience.

use snake_arcade_core::{Cell, Command};
use snake_arcade_world::{query, World};

const CONTROLS: [&str; 4] = [
    "Arrow keys: steer",
    "Ctrl+R: toggle relaxed mode",
    "Enter: restart after game over",
    "Escape: quit",
];

/// Board and snake layout requested at startup.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layout {
    /// Number of cell columns.
    pub columns: u32,
    /// Number of cell rows.
    pub rows: u32,
    /// Width of the board surface in pixels.
    pub width: f32,
    /// Height of the board surface in pixels.
    pub height: f32,
    /// Optional head cell; the centred default is used when absent.
    pub head: Option<Cell>,
    /// Optional tail cell; the centred default is used when absent.
    pub tail: Option<Cell>,
    /// Whether relaxed rules start enabled.
    pub relaxed: bool,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            columns: 20,
            rows: 20,
            width: 750.0,
            height: 750.0,
            head: None,
            tail: None,
            relaxed: false,
        }
    }
}

/// Produces data required to greet the player.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner<'world>(&self, world: &'world World) -> &'world str {
        query::welcome_banner(world)
    }

    /// Lines describing the keyboard controls.
    #[must_use]
    pub fn controls(&self) -> &'static [&'static str] {
        &CONTROLS
    }

    /// Emits the commands that shape a fresh world into the requested layout.
    pub fn initial_commands(&self, layout: Layout, out: &mut Vec<Command>) {
        out.push(Command::ConfigureBoard {
            columns: layout.columns,
            rows: layout.rows,
            width: layout.width,
            height: layout.height,
        });
        out.push(Command::SetRelaxedMode {
            enabled: layout.relaxed,
        });
        out.push(Command::SpawnSnake {
            head: layout.head,
            tail: layout.tail,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snake_arcade_core::{Event, Heading};
    use snake_arcade_world as world;

    #[test]
    fn banner_comes_from_world() {
        let world = World::new();
        assert_eq!(Bootstrap.welcome_banner(&world), "SNAKE ARCADE");
    }

    #[test]
    fn initial_commands_build_requested_layout() {
        let mut world = World::new();
        let mut commands = Vec::new();
        Bootstrap.initial_commands(
            Layout {
                columns: 30,
                rows: 16,
                width: 900.0,
                height: 480.0,
                relaxed: true,
                ..Layout::default()
            },
            &mut commands,
        );

        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }

        assert_eq!(
            events,
            vec![
                Event::BoardConfigured {
                    columns: 30,
                    rows: 16
                },
                Event::RelaxedModeChanged { enabled: true },
                Event::SnakeSpawned {
                    head: Cell::new(15, 8),
                    length: 3,
                    heading: Heading::Right,
                },
            ]
        );
        assert!(query::relaxed_mode(&world));
        // The spawn snapshot already follows the relaxed rules.
        assert_eq!(query::free_cells(&world).len(), 30 * 16);
    }
}
