#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Game session orchestrating the world, the pure systems and the tick timer.
//!
//! A session owns the authoritative [`World`] and routes every command
//! through [`world::apply`], feeding the resulting events to the animator
//! and the food spawner until no further commands are produced. Ticks are
//! driven by a single cancellable [`Timer`] wake-up; the owner of the timer
//! hands expired handles back through [`Session::on_timer`].

mod timer;

pub use timer::TimerQueue;

use std::time::Duration;

use snake_arcade_core::{
    Canvas, Command, Event, GameStatus, Heading, LayoutError, TickSchedule, Timer, TimerHandle,
};
use snake_arcade_system_bootstrap::{Bootstrap, Layout};
use snake_arcade_system_movement::Animator;
use snake_arcade_system_spawning::{self as spawning, FoodSpawner};
use snake_arcade_system_steering::DirectionArbiter;
use snake_arcade_world::{self as world, query, World};

/// Errors raised while assembling a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The requested board or snake layout is unusable.
    #[error("invalid layout: {0}")]
    Layout(#[from] LayoutError),
}

/// Parameters required to start a session.
#[derive(Clone, Copy, Debug)]
pub struct SessionConfig {
    /// Board and snake layout.
    pub layout: Layout,
    /// Score-dependent tick cadence.
    pub schedule: TickSchedule,
    /// Seed for food placement.
    pub rng_seed: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            layout: Layout::default(),
            schedule: TickSchedule::default(),
            rng_seed: 0,
        }
    }
}

/// One running game: world state, systems and the pending tick.
#[derive(Debug)]
pub struct Session {
    world: World,
    bootstrap: Bootstrap,
    arbiter: DirectionArbiter,
    animator: Animator,
    spawner: FoodSpawner,
    schedule: TickSchedule,
    layout: Layout,
    status: GameStatus,
    pending_tick: Option<TimerHandle>,
}

impl Session {
    /// Builds the world for `config` and draws the initial sprites.
    pub fn new(config: SessionConfig, canvas: &mut dyn Canvas) -> Result<Self, SessionError> {
        let mut session = Self {
            world: World::new(),
            bootstrap: Bootstrap,
            arbiter: DirectionArbiter,
            animator: Animator::new(),
            spawner: FoodSpawner::new(spawning::Config::new(config.rng_seed)),
            schedule: config.schedule,
            layout: config.layout,
            status: GameStatus::Stopped,
            pending_tick: None,
        };

        let mut commands = Vec::new();
        session.bootstrap.initial_commands(config.layout, &mut commands);
        let events = session.execute(commands, canvas);
        if let Some(reason) = events.iter().find_map(|event| match event {
            Event::LayoutRejected { reason } => Some(*reason),
            _ => None,
        }) {
            return Err(SessionError::Layout(reason));
        }

        log::info!(
            "session ready on a {}x{} board",
            config.layout.columns,
            config.layout.rows
        );
        Ok(session)
    }

    /// Read-only access to the world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Sprites maintained for the world.
    #[must_use]
    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    /// Banner shown when the experience starts.
    #[must_use]
    pub fn welcome_banner(&self) -> &str {
        self.bootstrap.welcome_banner(&self.world)
    }

    /// Lines describing the keyboard controls.
    #[must_use]
    pub fn controls(&self) -> &'static [&'static str] {
        self.bootstrap.controls()
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn status(&self) -> GameStatus {
        self.status
    }

    /// Points scored since the last reset.
    #[must_use]
    pub fn score(&self) -> u32 {
        query::score(&self.world)
    }

    /// Whether relaxed rules are active.
    #[must_use]
    pub fn relaxed_mode(&self) -> bool {
        query::relaxed_mode(&self.world)
    }

    /// Delay until the next tick at the current score.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        self.schedule.interval_for(self.score())
    }

    /// Handle of the scheduled tick, if any.
    #[must_use]
    pub const fn pending_tick(&self) -> Option<TimerHandle> {
        self.pending_tick
    }

    /// Starts ticking. Has no effect unless the session is stopped.
    pub fn launch(&mut self, timer: &mut dyn Timer) {
        if self.status != GameStatus::Stopped {
            return;
        }
        self.status = GameStatus::Running;
        self.schedule_tick(timer);
        log::info!("game launched");
    }

    /// Runs one complete tick and reports whether the snake survived.
    pub fn advance(&mut self, canvas: &mut dyn Canvas) -> bool {
        let _ = self.execute(vec![Command::AdvanceSnake], canvas);
        let _ = self.execute(vec![Command::SettleSnake], canvas);
        query::snake(&self.world).is_alive()
    }

    /// Delivers an expired timer handle.
    ///
    /// Handles that do not match the pending tick are ignored, so a wake-up
    /// issued before a reset can never drive the new game.
    pub fn on_timer(&mut self, handle: TimerHandle, timer: &mut dyn Timer, canvas: &mut dyn Canvas) {
        if self.pending_tick != Some(handle) {
            log::debug!("ignoring stale timer {}", handle.get());
            return;
        }
        self.pending_tick = None;

        if self.status != GameStatus::Running {
            return;
        }

        if self.advance(canvas) {
            self.schedule_tick(timer);
        } else {
            self.status = GameStatus::GameOver;
            log::info!("game over with score {}", self.score());
        }
    }

    /// Cancels the pending tick, restores the starting layout and relaunches.
    pub fn reset(&mut self, timer: &mut dyn Timer, canvas: &mut dyn Canvas) {
        if let Some(handle) = self.pending_tick.take() {
            let _ = timer.cancel(handle);
        }
        self.status = GameStatus::Stopped;

        let events = self.execute(
            vec![
                Command::ResetScore,
                Command::SpawnSnake {
                    head: self.layout.head,
                    tail: self.layout.tail,
                },
            ],
            canvas,
        );
        if events
            .iter()
            .any(|event| matches!(event, Event::LayoutRejected { .. }))
        {
            log::warn!("starting layout rejected on reset");
        }

        log::info!("game reset");
        self.launch(timer);
    }

    /// Forwards a directional key press to the arbiter.
    ///
    /// Always returns `true`, matching [`DirectionArbiter::request`].
    pub fn on_direction(&mut self, heading: Heading) -> bool {
        let snake = query::snake(&self.world);
        let mut commands = Vec::new();
        let accepted = self.arbiter.request(
            heading,
            snake.next_direction(),
            query::relaxed_mode(&self.world),
            &mut commands,
        );
        for command in commands {
            let mut events = Vec::new();
            world::apply(&mut self.world, command, &mut events);
        }
        accepted
    }

    /// Flips relaxed rules and returns the new setting.
    pub fn on_toggle_relaxed(&mut self) -> bool {
        let enabled = !self.relaxed_mode();
        let mut events = Vec::new();
        world::apply(
            &mut self.world,
            Command::SetRelaxedMode { enabled },
            &mut events,
        );
        log::info!(
            "relaxed mode {}",
            if enabled { "enabled" } else { "disabled" }
        );
        enabled
    }

    /// Recreates every sprite on `canvas`, forgetting those drawn elsewhere.
    ///
    /// Lets a session be assembled before the window that shows it exists.
    pub fn redraw(&mut self, canvas: &mut dyn Canvas) {
        self.animator = Animator::new();
        let snake = query::snake(&self.world);
        let mut events = Vec::with_capacity(2);
        if let Some(head) = snake.head() {
            events.push(Event::SnakeSpawned {
                head,
                length: snake.length(),
                heading: snake.next_direction(),
            });
        }
        events.push(Event::FoodPlaced {
            cell: query::food(&self.world).cell(),
        });
        self.animator
            .handle(&events, query::board(&self.world), snake, canvas);
    }

    /// Advances the timer queue by `dt` and dispatches every expired tick.
    pub fn drive(&mut self, timers: &mut TimerQueue, dt: Duration, canvas: &mut dyn Canvas) {
        for handle in timers.advance(dt) {
            self.on_timer(handle, timers, canvas);
        }
    }

    fn schedule_tick(&mut self, timer: &mut dyn Timer) {
        let delay = self.tick_interval();
        self.pending_tick = Some(timer.schedule(delay));
        log::trace!("next tick in {delay:?}");
    }

    fn execute(&mut self, commands: Vec<Command>, canvas: &mut dyn Canvas) -> Vec<Event> {
        let mut processed = Vec::new();
        let mut pending = commands;

        while !pending.is_empty() {
            let mut events = Vec::new();
            for command in pending.drain(..) {
                world::apply(&mut self.world, command, &mut events);
            }

            self.animator.handle(
                &events,
                query::board(&self.world),
                query::snake(&self.world),
                canvas,
            );
            let world = &self.world;
            self.spawner.handle(
                &events,
                query::free_cells(world),
                |cell| query::is_occupied(world, cell),
                &mut pending,
            );

            processed.extend(events);
        }

        processed
    }
}
