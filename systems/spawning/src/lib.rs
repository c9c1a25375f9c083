#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for relocating the food.

use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use snake_arcade_core::{Cell, Command, Event, FALLBACK_FOOD_CELL};

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration seeded with the provided value.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Pure system that picks a new food cell whenever the previous one is consumed.
#[derive(Debug)]
pub struct FoodSpawner {
    rng: ChaCha8Rng,
    awaiting_settle: bool,
}

impl FoodSpawner {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            awaiting_settle: false,
        }
    }

    /// Consumes events and immutable views to emit food placement commands.
    ///
    /// Food is placed when a snake is spawned and once a tick that ate food
    /// has settled, so the choice sees the grown body.
    pub fn handle<F>(
        &mut self,
        events: &[Event],
        free_cells: &[Cell],
        is_occupied: F,
        out: &mut Vec<Command>,
    ) where
        F: Fn(Cell) -> bool,
    {
        let mut place = false;
        for event in events {
            match event {
                Event::SnakeSpawned { .. } => {
                    self.awaiting_settle = false;
                    place = true;
                }
                Event::FoodEaten { .. } => self.awaiting_settle = true,
                Event::SnakeSettled { .. } if self.awaiting_settle => {
                    self.awaiting_settle = false;
                    place = true;
                }
                _ => {}
            }
        }

        if place {
            let cell = self.pick(free_cells, is_occupied);
            out.push(Command::PlaceFood { cell });
        }
    }

    /// Picks a uniformly random free cell the snake does not cover.
    pub fn pick<F>(&mut self, free_cells: &[Cell], is_occupied: F) -> Cell
    where
        F: Fn(Cell) -> bool,
    {
        let candidates: Vec<Cell> = free_cells
            .iter()
            .copied()
            .filter(|cell| !is_occupied(*cell))
            .collect();
        match candidates.choose(&mut self.rng) {
            Some(cell) => *cell,
            None => {
                log::debug!("no free cell left for food; using {FALLBACK_FOOD_CELL}");
                FALLBACK_FOOD_CELL
            }
        }
    }
}
