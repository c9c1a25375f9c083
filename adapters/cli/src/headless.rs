//! Runs a session without a window against the in-memory canvas.

use snake_arcade_core::GameStatus;
use snake_arcade_rendering::HeadlessCanvas;
use snake_arcade_session::{Session, TimerQueue};

/// Result of a headless run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct HeadlessOutcome {
    pub(crate) ticks: u32,
    pub(crate) score: u32,
    pub(crate) status: GameStatus,
}

/// Launches `session` and fires scheduled ticks until the game ends or
/// `max_ticks` ticks have run.
pub(crate) fn run(
    session: &mut Session,
    canvas: &mut HeadlessCanvas,
    max_ticks: u32,
) -> HeadlessOutcome {
    let mut timers = TimerQueue::new();
    session.launch(&mut timers);

    let mut ticks = 0;
    while ticks < max_ticks && session.status() == GameStatus::Running {
        let Some(wait) = timers.until_next() else {
            break;
        };
        session.drive(&mut timers, wait, canvas);
        ticks += 1;
        log::debug!(
            "tick {ticks}: score {} at {:?}",
            session.score(),
            timers.now()
        );
    }

    HeadlessOutcome {
        ticks,
        score: session.score(),
        status: session.status(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snake_arcade_core::Cell;
    use snake_arcade_session::SessionConfig;
    use snake_arcade_system_bootstrap::Layout;

    #[test]
    fn straight_run_ends_at_the_wall() {
        let mut canvas = HeadlessCanvas::new();
        let mut session = Session::new(
            SessionConfig {
                layout: Layout {
                    head: Some(Cell::new(5, 3)),
                    tail: Some(Cell::new(2, 3)),
                    ..Layout::default()
                },
                ..SessionConfig::default()
            },
            &mut canvas,
        )
        .expect("valid session");

        let outcome = run(&mut session, &mut canvas, 100);

        assert_eq!(outcome.status, GameStatus::GameOver);
        assert_eq!(outcome.ticks, 16);
        assert_eq!(canvas.len(), 3 + outcome.score as usize + 1);
    }

    #[test]
    fn tick_budget_stops_a_running_game() {
        let mut canvas = HeadlessCanvas::new();
        let mut session =
            Session::new(SessionConfig::default(), &mut canvas).expect("valid session");

        let outcome = run(&mut session, &mut canvas, 4);

        assert_eq!(outcome.ticks, 4);
        assert_eq!(outcome.status, GameStatus::Running);
    }
}
