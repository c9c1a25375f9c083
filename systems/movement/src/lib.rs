#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Animation system that mirrors world movement onto canvas sprites.
//!
//! Each tick is split into [`SUB_FRAMES`] steps. On every step each segment
//! slides from the cell it left towards the cell it entered and turns a
//! fraction of the way towards its heading.

use snake_arcade_core::{
    Canvas, Cell, Event, Orientation, PixelPos, SpriteHandle, SpriteKind,
};
use snake_arcade_world::{Board, Snake};

/// Number of interpolation steps per tick.
pub const SUB_FRAMES: u32 = 5;

/// Sprite handle together with the position and orientation last sent to the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionedSprite {
    handle: SpriteHandle,
    kind: SpriteKind,
    position: PixelPos,
    orientation: Orientation,
}

impl PositionedSprite {
    /// Creates the sprite on the canvas.
    pub fn show(
        canvas: &mut dyn Canvas,
        kind: SpriteKind,
        position: PixelPos,
        orientation: Orientation,
    ) -> Self {
        let handle = canvas.create_sprite(kind, position, orientation);
        Self {
            handle,
            kind,
            position,
            orientation,
        }
    }

    /// Handle assigned by the canvas.
    #[must_use]
    pub const fn handle(&self) -> SpriteHandle {
        self.handle
    }

    /// Kind of artwork the sprite displays.
    #[must_use]
    pub const fn kind(&self) -> SpriteKind {
        self.kind
    }

    /// Last position sent to the canvas.
    #[must_use]
    pub const fn position(&self) -> PixelPos {
        self.position
    }

    /// Last orientation sent to the canvas.
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Moves the sprite to an absolute position.
    pub fn move_to(&mut self, canvas: &mut dyn Canvas, position: PixelPos) {
        self.position = position;
        canvas.update_sprite(self.handle, Some(position), None);
    }

    /// Rotates the sprite by a relative angle.
    pub fn pivot(&mut self, canvas: &mut dyn Canvas, delta: i32) {
        self.orientation = self.orientation.rotated(delta);
        canvas.update_sprite(self.handle, None, Some(self.orientation));
    }

    /// Removes the sprite from the canvas.
    pub fn hide(self, canvas: &mut dyn Canvas) {
        canvas.delete_sprite(self.handle);
    }
}

/// Rotation applied during one sub-frame while turning by `delta`.
///
/// Truncates towards zero like the positional fraction does, but snaps to
/// the target once the remaining angle is smaller than one step.
#[must_use]
pub fn rotation_step(delta: i32) -> i32 {
    let step = delta / SUB_FRAMES as i32;
    if step == 0 {
        delta
    } else {
        step
    }
}

/// Stateful system translating world events into sprite updates.
#[derive(Debug, Default)]
pub struct Animator {
    segments: Vec<PositionedSprite>,
    pending_tail: Option<PositionedSprite>,
    food: Option<PositionedSprite>,
}

impl Animator {
    /// Creates an animator without any sprites.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snake sprites, head first.
    #[must_use]
    pub fn segments(&self) -> &[PositionedSprite] {
        &self.segments
    }

    /// Sprite created for the segment gained this tick, if any.
    #[must_use]
    pub fn pending_tail(&self) -> Option<&PositionedSprite> {
        self.pending_tail.as_ref()
    }

    /// Sprite showing the food, once placed.
    #[must_use]
    pub fn food(&self) -> Option<&PositionedSprite> {
        self.food.as_ref()
    }

    /// Consumes world events and immutable views to drive the canvas.
    ///
    /// Events produced by a single advance must be delivered together while
    /// the snake is still mid-tick; the tick is animated once all of them
    /// have been seen.
    pub fn handle(
        &mut self,
        events: &[Event],
        board: &Board,
        snake: &Snake,
        canvas: &mut dyn Canvas,
    ) {
        let mut advanced = false;
        let mut dying = false;

        for event in events {
            match event {
                Event::SnakeSpawned { .. } => self.rebuild(board, snake, canvas),
                Event::FoodPlaced { cell } => self.place_food(board, *cell, canvas),
                Event::SnakeAdvanced { .. } => advanced = true,
                Event::SnakeCollided { .. } => dying = true,
                Event::FoodEaten { .. } => self.spawn_tail(board, snake, canvas),
                Event::SnakeSettled { grew, .. } => self.settle(*grew, canvas),
                _ => {}
            }
        }

        if advanced {
            self.animate(board, snake, dying, canvas);
        }
    }

    /// Removes every sprite owned by the animator.
    pub fn clear(&mut self, canvas: &mut dyn Canvas) {
        for sprite in self.segments.drain(..) {
            sprite.hide(canvas);
        }
        if let Some(sprite) = self.pending_tail.take() {
            sprite.hide(canvas);
        }
        if let Some(sprite) = self.food.take() {
            sprite.hide(canvas);
        }
    }

    fn rebuild(&mut self, board: &Board, snake: &Snake, canvas: &mut dyn Canvas) {
        for sprite in self.segments.drain(..) {
            sprite.hide(canvas);
        }
        if let Some(sprite) = self.pending_tail.take() {
            sprite.hide(canvas);
        }

        for (index, (cell, heading)) in snake.cells().iter().zip(snake.directions()).enumerate() {
            let kind = if index == 0 {
                SpriteKind::SnakeHead
            } else {
                SpriteKind::SnakeBody
            };
            self.segments.push(PositionedSprite::show(
                canvas,
                kind,
                board.cell_to_pixel(*cell),
                Orientation::of(*heading),
            ));
        }
    }

    fn place_food(&mut self, board: &Board, cell: Cell, canvas: &mut dyn Canvas) {
        let position = board.cell_to_pixel(cell);
        match self.food.as_mut() {
            Some(sprite) => sprite.move_to(canvas, position),
            None => {
                self.food = Some(PositionedSprite::show(
                    canvas,
                    SpriteKind::Food,
                    position,
                    Orientation::default(),
                ));
            }
        }
    }

    fn spawn_tail(&mut self, board: &Board, snake: &Snake, canvas: &mut dyn Canvas) {
        let (Some(cell), Some(heading)) = (snake.cells().back(), snake.directions().back()) else {
            return;
        };
        if let Some(stale) = self.pending_tail.take() {
            stale.hide(canvas);
        }
        self.pending_tail = Some(PositionedSprite::show(
            canvas,
            SpriteKind::SnakeBody,
            board.cell_to_pixel(*cell),
            Orientation::of(*heading),
        ));
    }

    fn settle(&mut self, grew: bool, canvas: &mut dyn Canvas) {
        match (self.pending_tail.take(), grew) {
            (Some(sprite), true) => self.segments.push(sprite),
            (Some(sprite), false) => sprite.hide(canvas),
            (None, true) => log::warn!("snake grew without a tail sprite"),
            (None, false) => {}
        }
    }

    fn animate(&mut self, board: &Board, snake: &Snake, dying: bool, canvas: &mut dyn Canvas) {
        let cells = snake.cells();
        let directions = snake.directions();

        for frame in 1..=SUB_FRAMES {
            let fraction = frame as f32 / SUB_FRAMES as f32;
            for (index, sprite) in self.segments.iter_mut().enumerate() {
                let Some(heading) = directions.get(index) else {
                    break;
                };
                let target = Orientation::of(*heading);

                if dying {
                    if frame == SUB_FRAMES || sprite.orientation() == target {
                        log::trace!("death animation stopped at sub-frame {frame}");
                        return;
                    }
                    if index == 0 {
                        let delta = sprite.orientation().delta_to(target);
                        sprite.pivot(canvas, rotation_step(delta));
                    }
                    continue;
                }

                if sprite.orientation() != target {
                    let delta = sprite.orientation().delta_to(target);
                    sprite.pivot(canvas, rotation_step(delta));
                }

                let (Some(current), Some(previous)) = (cells.get(index), cells.get(index + 1))
                else {
                    continue;
                };
                let from = board.cell_to_pixel(*previous);
                let to = board.cell_to_pixel(*current);
                sprite.move_to(canvas, from.lerp(to, fraction));
            }
        }
    }
}
