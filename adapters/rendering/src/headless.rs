//! Canvas that keeps sprites in memory without drawing anything.

use std::collections::BTreeMap;

use snake_arcade_core::{Canvas, Orientation, PixelPos, SpriteHandle, SpriteKind};

/// Stored state of one sprite.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteState {
    /// Artwork the sprite displays.
    pub kind: SpriteKind,
    /// Centre of the sprite in board pixels.
    pub position: PixelPos,
    /// Rotation of the sprite.
    pub orientation: Orientation,
}

/// In-memory canvas used for headless runs and as the store behind drawing backends.
#[derive(Clone, Debug, Default)]
pub struct HeadlessCanvas {
    next_handle: u32,
    sprites: BTreeMap<SpriteHandle, SpriteState>,
}

impl HeadlessCanvas {
    /// Creates an empty canvas.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a single sprite.
    #[must_use]
    pub fn sprite(&self, handle: SpriteHandle) -> Option<&SpriteState> {
        self.sprites.get(&handle)
    }

    /// Number of live sprites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    /// Reports whether no sprite exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}

impl Canvas for HeadlessCanvas {
    fn create_sprite(
        &mut self,
        kind: SpriteKind,
        position: PixelPos,
        orientation: Orientation,
    ) -> SpriteHandle {
        self.next_handle = self.next_handle.wrapping_add(1);
        let handle = SpriteHandle::new(self.next_handle);
        let _ = self.sprites.insert(
            handle,
            SpriteState {
                kind,
                position,
                orientation,
            },
        );
        handle
    }

    fn update_sprite(
        &mut self,
        handle: SpriteHandle,
        position: Option<PixelPos>,
        orientation: Option<Orientation>,
    ) {
        let Some(sprite) = self.sprites.get_mut(&handle) else {
            return;
        };
        if let Some(position) = position {
            sprite.position = position;
        }
        if let Some(orientation) = orientation {
            sprite.orientation = orientation;
        }
    }

    fn delete_sprite(&mut self, handle: SpriteHandle) {
        let _ = self.sprites.remove(&handle);
    }

    fn sprite_position(&self, handle: SpriteHandle) -> Option<PixelPos> {
        self.sprites.get(&handle).map(|sprite| sprite.position)
    }
}
