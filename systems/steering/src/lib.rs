#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure steering system that validates directional input.

use snake_arcade_core::{Command, Heading};

/// Angle difference that marks a reversal under strict rules.
const REVERSAL_DEGREES: i32 = 180;

/// Arbitrates requested headings against the pending one.
#[derive(Debug, Default)]
pub struct DirectionArbiter;

impl DirectionArbiter {
    /// Validates `requested` and emits a pending-heading command when accepted.
    ///
    /// Strict rules compare raw compass angles, so up (360) against right
    /// (90) is a turn while up against down (180) is a reversal. Relaxed rules
    /// accept every heading.
    ///
    /// Always returns `true`; callers must not rely on rejection being reported.
    pub fn request(
        &self,
        requested: Heading,
        pending: Heading,
        relaxed: bool,
        out: &mut Vec<Command>,
    ) -> bool {
        if relaxed || Self::is_permitted(pending, requested) {
            out.push(Command::SetPendingHeading { heading: requested });
        }
        true
    }

    /// Reports whether strict rules permit moving from `pending` to `requested`.
    #[must_use]
    pub fn is_permitted(pending: Heading, requested: Heading) -> bool {
        let difference = i32::from(pending.degrees()) - i32::from(requested.degrees());
        difference.abs() != REVERSAL_DEGREES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_rule_is_asymmetric() {
        assert!(!DirectionArbiter::is_permitted(Heading::Up, Heading::Down));
        assert!(!DirectionArbiter::is_permitted(Heading::Right, Heading::Left));
        assert!(DirectionArbiter::is_permitted(Heading::Up, Heading::Right));
        assert!(DirectionArbiter::is_permitted(Heading::Left, Heading::Up));
        assert!(DirectionArbiter::is_permitted(Heading::Down, Heading::Down));
    }

    #[test]
    fn relaxed_rules_accept_reversal() {
        let arbiter = DirectionArbiter;
        let mut out = Vec::new();
        assert!(arbiter.request(Heading::Left, Heading::Right, true, &mut out));
        assert_eq!(
            out,
            vec![Command::SetPendingHeading {
                heading: Heading::Left
            }]
        );
    }

    #[test]
    fn rejection_still_reports_true() {
        let arbiter = DirectionArbiter;
        let mut out = Vec::new();
        assert!(arbiter.request(Heading::Left, Heading::Right, false, &mut out));
        assert!(out.is_empty());
    }
}
