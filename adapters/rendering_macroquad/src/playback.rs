//! Canvas that spreads sprite updates over the tick interval.
//!
//! The simulation applies a whole tick of sub-frame updates at once. This
//! canvas queues those updates per sprite and releases them evenly over the
//! following tick interval so movement looks continuous on screen.

use std::{
    collections::{BTreeMap, VecDeque},
    time::Duration,
};

use snake_arcade_core::{Canvas, Orientation, PixelPos, SpriteHandle, SpriteKind};
use snake_arcade_rendering::{HeadlessCanvas, SpriteState};

#[derive(Clone, Debug)]
struct Track {
    shown: SpriteState,
    queue: VecDeque<SpriteState>,
    period: Duration,
    elapsed: Duration,
}

impl Track {
    fn new(shown: SpriteState) -> Self {
        Self {
            shown,
            queue: VecDeque::new(),
            period: Duration::ZERO,
            elapsed: Duration::ZERO,
        }
    }

    fn advance(&mut self, dt: Duration, interval: Duration) {
        if self.queue.is_empty() {
            return;
        }
        if self.period.is_zero() {
            let steps = u32::try_from(self.queue.len()).unwrap_or(u32::MAX);
            self.period = (interval / steps).max(Duration::from_nanos(1));
        }

        self.elapsed = self.elapsed.saturating_add(dt);
        while self.elapsed >= self.period {
            let Some(next) = self.queue.pop_front() else {
                break;
            };
            self.shown = next;
            self.elapsed -= self.period;
        }

        if self.queue.is_empty() {
            self.period = Duration::ZERO;
            self.elapsed = Duration::ZERO;
        }
    }
}

/// Canvas whose displayed state trails the simulated state by up to one tick.
#[derive(Clone, Debug, Default)]
pub struct PlaybackCanvas {
    latest: HeadlessCanvas,
    tracks: BTreeMap<SpriteHandle, Track>,
}

impl PlaybackCanvas {
    /// Creates an empty canvas.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Releases queued updates for `dt` of wall time, pacing each sprite's
    /// backlog to finish within `interval`.
    pub fn advance(&mut self, dt: Duration, interval: Duration) {
        for track in self.tracks.values_mut() {
            track.advance(dt, interval);
        }
    }

    /// Sprites as they should currently be drawn, in creation order.
    pub fn displayed(&self) -> impl Iterator<Item = (SpriteHandle, SpriteState)> + '_ {
        self.tracks.iter().map(|(handle, track)| (*handle, track.shown))
    }

    /// Simulated state the display is catching up with.
    #[must_use]
    pub fn latest(&self) -> &HeadlessCanvas {
        &self.latest
    }
}

impl Canvas for PlaybackCanvas {
    fn create_sprite(
        &mut self,
        kind: SpriteKind,
        position: PixelPos,
        orientation: Orientation,
    ) -> SpriteHandle {
        let handle = self.latest.create_sprite(kind, position, orientation);
        let _ = self.tracks.insert(
            handle,
            Track::new(SpriteState {
                kind,
                position,
                orientation,
            }),
        );
        handle
    }

    fn update_sprite(
        &mut self,
        handle: SpriteHandle,
        position: Option<PixelPos>,
        orientation: Option<Orientation>,
    ) {
        self.latest.update_sprite(handle, position, orientation);
        let (Some(state), Some(track)) = (self.latest.sprite(handle), self.tracks.get_mut(&handle))
        else {
            return;
        };
        track.queue.push_back(*state);
    }

    fn delete_sprite(&mut self, handle: SpriteHandle) {
        self.latest.delete_sprite(handle);
        let _ = self.tracks.remove(&handle);
    }

    fn sprite_position(&self, handle: SpriteHandle) -> Option<PixelPos> {
        self.latest.sprite_position(handle)
    }
}
