#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Snake Arcade.

mod board;
mod snake;

pub use board::Board;
pub use snake::{Snake, DEFAULT_LENGTH};

use snake_arcade_core::{Cell, Command, Event, Heading, FALLBACK_FOOD_CELL, WELCOME_BANNER};

const DEFAULT_COLUMNS: u32 = 20;
const DEFAULT_ROWS: u32 = 20;
const DEFAULT_SURFACE: f32 = 750.0;

/// The single food item on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Food {
    cell: Cell,
}

impl Food {
    /// Cell the food currently occupies.
    #[must_use]
    pub const fn cell(&self) -> Cell {
        self.cell
    }
}

/// Represents the authoritative Snake Arcade world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    board: Board,
    snake: Snake,
    food: Food,
    score: u32,
    relaxed: bool,
}

impl World {
    /// Creates a world with a 20 by 20 board and the default snake.
    #[must_use]
    pub fn new() -> Self {
        let mut board = Board::unchecked(
            DEFAULT_COLUMNS,
            DEFAULT_ROWS,
            DEFAULT_SURFACE,
            DEFAULT_SURFACE,
        );
        let (head, _) = Snake::default_endpoints(DEFAULT_COLUMNS, DEFAULT_ROWS);
        let snake = Snake::straight(head, DEFAULT_LENGTH, Heading::Right);
        let _ = board.recompute_free_cells(snake.cells().iter().copied(), false);

        Self {
            banner: WELCOME_BANNER,
            board,
            snake,
            food: Food {
                cell: FALLBACK_FOOD_CELL,
            },
            score: 0,
            relaxed: false,
        }
    }

    fn refresh_free_cells(&mut self) {
        let _ = self
            .board
            .recompute_free_cells(self.snake.cells().iter().copied(), self.relaxed);
    }

    fn spawn_snake(&mut self, head: Option<Cell>, tail: Option<Cell>, out_events: &mut Vec<Event>) {
        let (default_head, default_tail) =
            Snake::default_endpoints(self.board.columns(), self.board.rows());
        let head = head.unwrap_or(default_head);
        let tail = tail.unwrap_or(default_tail);

        match Snake::from_endpoints(head, tail, &self.board) {
            Ok(snake) => {
                self.snake = snake;
                self.refresh_free_cells();
                out_events.push(Event::SnakeSpawned {
                    head,
                    length: self.snake.length(),
                    heading: self.snake.next_direction(),
                });
            }
            Err(reason) => {
                log::warn!("rejected snake layout {head} -> {tail}: {reason}");
                out_events.push(Event::LayoutRejected { reason });
            }
        }
    }

    fn advance_snake(&mut self, out_events: &mut Vec<Event>) {
        if !self.snake.is_alive() || self.snake.mid_tick() {
            return;
        }

        let food_cell = self.food.cell;
        let (from, to, heading) = self.snake.push_head();
        out_events.push(Event::SnakeAdvanced { from, to, heading });

        if !self.board.is_free(to) {
            self.snake.kill();
            log::debug!("snake collided at {to}");
            out_events.push(Event::SnakeCollided { cell: to });
        }

        if to == food_cell {
            self.score = self.score.saturating_add(1);
            self.snake.mark_growth();
            out_events.push(Event::FoodEaten {
                cell: to,
                score: self.score,
            });
        }
    }

    fn settle_snake(&mut self, out_events: &mut Vec<Event>) {
        if !self.snake.mid_tick() {
            return;
        }

        self.refresh_free_cells();
        let grew = self.snake.settle();
        out_events.push(Event::SnakeSettled {
            length: self.snake.length(),
            grew,
        });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureBoard {
            columns,
            rows,
            width,
            height,
        } => match Board::new(columns, rows, width, height) {
            Ok(board) => {
                world.board = board;
                world.refresh_free_cells();
                out_events.push(Event::BoardConfigured { columns, rows });
            }
            Err(reason) => out_events.push(Event::LayoutRejected { reason }),
        },
        Command::SpawnSnake { head, tail } => world.spawn_snake(head, tail, out_events),
        Command::SetPendingHeading { heading } => {
            if world.snake.set_next_direction(heading) {
                out_events.push(Event::PendingHeadingChanged { heading });
            }
        }
        // The free-cell snapshot keeps the previous rule until the next settle.
        Command::SetRelaxedMode { enabled } => {
            if world.relaxed != enabled {
                world.relaxed = enabled;
                out_events.push(Event::RelaxedModeChanged { enabled });
            }
        }
        Command::AdvanceSnake => world.advance_snake(out_events),
        Command::SettleSnake => world.settle_snake(out_events),
        Command::PlaceFood { cell } => {
            world.food.cell = cell;
            out_events.push(Event::FoodPlaced { cell });
        }
        Command::ResetScore => {
            world.score = 0;
            out_events.push(Event::ScoreReset);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{Board, Food, Snake, World};
    use snake_arcade_core::Cell;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the board.
    #[must_use]
    pub fn board(world: &World) -> &Board {
        &world.board
    }

    /// Provides read-only access to the snake.
    #[must_use]
    pub fn snake(world: &World) -> &Snake {
        &world.snake
    }

    /// Provides read-only access to the food.
    #[must_use]
    pub fn food(world: &World) -> Food {
        world.food
    }

    /// Points scored since the last reset.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Whether relaxed rules are active.
    #[must_use]
    pub fn relaxed_mode(world: &World) -> bool {
        world.relaxed
    }

    /// Free cells according to the latest snapshot.
    #[must_use]
    pub fn free_cells(world: &World) -> &[Cell] {
        world.board.free_cells()
    }

    /// Reports whether the snake currently sits on the cell.
    #[must_use]
    pub fn is_occupied(world: &World, cell: Cell) -> bool {
        world.snake.occupies(cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(world: &mut World, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        apply(world, command, &mut events);
        events
    }

    fn tick(world: &mut World) -> Vec<Event> {
        let mut events = run(world, Command::AdvanceSnake);
        events.extend(run(world, Command::SettleSnake));
        events
    }

    fn assert_aligned(world: &World) {
        let snake = query::snake(world);
        assert_eq!(snake.cells().len(), snake.directions().len());
        assert_eq!(snake.cells().len() as u32, snake.length());
    }

    #[test]
    fn new_world_primes_free_cells_around_default_snake() {
        let world = World::new();
        assert_eq!(query::food(&world).cell(), FALLBACK_FOOD_CELL);
        assert_eq!(query::free_cells(&world).len(), 397);
        assert!(query::is_occupied(&world, Cell::new(8, 10)));
        assert!(!query::board(&world).is_free(Cell::new(10, 10)));
    }

    #[test]
    fn non_eating_tick_keeps_length() {
        let mut world = World::new();
        let _ = run(&mut world, Command::PlaceFood { cell: Cell::new(1, 1) });
        let events = tick(&mut world);

        assert!(events.contains(&Event::SnakeAdvanced {
            from: Cell::new(10, 10),
            to: Cell::new(11, 10),
            heading: Heading::Right,
        }));
        assert!(events.contains(&Event::SnakeSettled {
            length: 3,
            grew: false
        }));
        assert_eq!(query::snake(&world).head(), Some(Cell::new(11, 10)));
        assert_aligned(&world);
    }

    #[test]
    fn eating_tick_grows_and_scores() {
        let mut world = World::new();
        let _ = run(&mut world, Command::PlaceFood { cell: Cell::new(11, 10) });

        let advanced = run(&mut world, Command::AdvanceSnake);
        assert!(advanced.contains(&Event::FoodEaten {
            cell: Cell::new(11, 10),
            score: 1
        }));
        assert!(query::snake(&world).growth_pending());

        let settled = run(&mut world, Command::SettleSnake);
        assert_eq!(
            settled,
            vec![Event::SnakeSettled {
                length: 4,
                grew: true
            }]
        );
        assert_eq!(query::score(&world), 1);
        assert_aligned(&world);
        assert_eq!(query::snake(&world).cells().back().copied(), Some(Cell::new(8, 10)));
    }

    #[test]
    fn leaving_the_board_is_fatal() {
        let mut world = World::new();
        let _ = run(
            &mut world,
            Command::SpawnSnake {
                head: Some(Cell::new(20, 5)),
                tail: Some(Cell::new(17, 5)),
            },
        );
        let events = tick(&mut world);
        assert!(events.contains(&Event::SnakeCollided {
            cell: Cell::new(21, 5)
        }));
        assert!(!query::snake(&world).is_alive());
        assert_aligned(&world);
    }

    fn curl(world: &mut World) {
        let _ = run(
            world,
            Command::SpawnSnake {
                head: Some(Cell::new(10, 10)),
                tail: Some(Cell::new(5, 10)),
            },
        );
        for heading in [Heading::Down, Heading::Left] {
            let _ = run(world, Command::SetPendingHeading { heading });
            let _ = tick(world);
        }
        let _ = run(
            world,
            Command::SetPendingHeading {
                heading: Heading::Up,
            },
        );
    }

    #[test]
    fn self_collision_depends_on_relaxed_mode() {
        let mut strict = World::new();
        curl(&mut strict);
        let _ = tick(&mut strict);
        assert!(!query::snake(&strict).is_alive());

        let mut relaxed = World::new();
        let _ = run(&mut relaxed, Command::SetRelaxedMode { enabled: true });
        curl(&mut relaxed);
        let _ = tick(&mut relaxed);
        assert!(query::snake(&relaxed).is_alive());
        assert_eq!(query::snake(&relaxed).head(), Some(Cell::new(9, 10)));
    }

    #[test]
    fn departing_tail_cell_stays_blocked_for_one_tick() {
        let mut world = World::new();
        let _ = tick(&mut world);
        // The cell vacated by the tail this tick was still occupied when the
        // snapshot was taken.
        assert!(!query::board(&world).is_free(Cell::new(8, 10)));
        assert!(!query::is_occupied(&world, Cell::new(8, 10)));

        let _ = tick(&mut world);
        assert!(query::board(&world).is_free(Cell::new(8, 10)));
    }

    #[test]
    fn toggling_relaxed_mode_waits_for_next_settle() {
        let mut world = World::new();
        let events = run(&mut world, Command::SetRelaxedMode { enabled: true });
        assert_eq!(events, vec![Event::RelaxedModeChanged { enabled: true }]);
        assert_eq!(query::free_cells(&world).len(), 397);
        assert!(run(&mut world, Command::SetRelaxedMode { enabled: true }).is_empty());

        let _ = tick(&mut world);
        assert_eq!(query::free_cells(&world).len(), 400);
    }

    #[test]
    fn disabling_relaxed_mode_keeps_vacated_tail_cell_blocked() {
        let mut world = World::new();
        let _ = tick(&mut world);
        // (8, 10) was vacated by the tail but is still blocked by the snapshot.
        assert!(!query::board(&world).is_free(Cell::new(8, 10)));

        let _ = run(&mut world, Command::SetRelaxedMode { enabled: true });
        assert!(!query::board(&world).is_free(Cell::new(8, 10)));
        let _ = tick(&mut world);
        assert!(query::board(&world).is_free(Cell::new(9, 10)));

        let _ = run(&mut world, Command::SetRelaxedMode { enabled: false });
        // Strict rules only apply once the snapshot is rebuilt at the next settle.
        assert!(query::board(&world).is_free(Cell::new(9, 10)));
        let _ = tick(&mut world);
        assert!(!query::board(&world).is_free(Cell::new(12, 10)));
        assert!(!query::board(&world).is_free(Cell::new(10, 10)));
    }

    #[test]
    fn dead_snake_ignores_advance() {
        let mut world = World::new();
        let _ = run(
            &mut world,
            Command::SpawnSnake {
                head: Some(Cell::new(20, 5)),
                tail: Some(Cell::new(17, 5)),
            },
        );
        let _ = tick(&mut world);
        assert!(run(&mut world, Command::AdvanceSnake).is_empty());
        assert!(run(&mut world, Command::SettleSnake).is_empty());
    }

    #[test]
    fn rejected_layout_keeps_previous_snake() {
        let mut world = World::new();
        let events = run(
            &mut world,
            Command::SpawnSnake {
                head: Some(Cell::new(3, 3)),
                tail: Some(Cell::new(6, 6)),
            },
        );
        assert!(matches!(
            events.as_slice(),
            [Event::LayoutRejected { .. }]
        ));
        assert_eq!(query::snake(&world).head(), Some(Cell::new(10, 10)));
    }

    #[test]
    fn configure_board_replaces_grid() {
        let mut world = World::new();
        let events = run(
            &mut world,
            Command::ConfigureBoard {
                columns: 12,
                rows: 8,
                width: 480.0,
                height: 320.0,
            },
        );
        assert_eq!(
            events,
            vec![Event::BoardConfigured {
                columns: 12,
                rows: 8
            }]
        );
        let board = query::board(&world);
        assert_eq!(board.columns(), 12);
        assert!((board.cell_width() - 40.0).abs() < f32::EPSILON);
    }

    #[test]
    fn reset_score_returns_to_zero() {
        let mut world = World::new();
        let _ = run(&mut world, Command::PlaceFood { cell: Cell::new(11, 10) });
        let _ = tick(&mut world);
        assert_eq!(query::score(&world), 1);
        assert_eq!(run(&mut world, Command::ResetScore), vec![Event::ScoreReset]);
        assert_eq!(query::score(&world), 0);
    }
}
