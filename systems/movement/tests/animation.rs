use std::collections::BTreeMap;

use snake_arcade_core::{
    Canvas, Cell, Command, Event, Heading, Orientation, PixelPos, SpriteHandle, SpriteKind,
};
use snake_arcade_system_movement::{Animator, SUB_FRAMES};
use snake_arcade_world::{self as world, query, World};

#[derive(Debug, Default)]
struct RecordingCanvas {
    next: u32,
    sprites: BTreeMap<SpriteHandle, (SpriteKind, PixelPos, Orientation)>,
    updates: usize,
}

impl Canvas for RecordingCanvas {
    fn create_sprite(
        &mut self,
        kind: SpriteKind,
        position: PixelPos,
        orientation: Orientation,
    ) -> SpriteHandle {
        self.next += 1;
        let handle = SpriteHandle::new(self.next);
        let _ = self.sprites.insert(handle, (kind, position, orientation));
        handle
    }

    fn update_sprite(
        &mut self,
        handle: SpriteHandle,
        position: Option<PixelPos>,
        orientation: Option<Orientation>,
    ) {
        if let Some(sprite) = self.sprites.get_mut(&handle) {
            self.updates += 1;
            if let Some(position) = position {
                sprite.1 = position;
            }
            if let Some(orientation) = orientation {
                sprite.2 = orientation;
            }
        }
    }

    fn delete_sprite(&mut self, handle: SpriteHandle) {
        let _ = self.sprites.remove(&handle);
    }

    fn sprite_position(&self, handle: SpriteHandle) -> Option<PixelPos> {
        self.sprites.get(&handle).map(|sprite| sprite.1)
    }
}

struct Harness {
    world: World,
    animator: Animator,
    canvas: RecordingCanvas,
}

impl Harness {
    fn new() -> Self {
        Self {
            world: World::new(),
            animator: Animator::new(),
            canvas: RecordingCanvas::default(),
        }
    }

    fn run(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        self.animator.handle(
            &events,
            query::board(&self.world),
            query::snake(&self.world),
            &mut self.canvas,
        );
        events
    }

    fn tick(&mut self) {
        let _ = self.run(Command::AdvanceSnake);
        let _ = self.run(Command::SettleSnake);
    }

    fn spawn(&mut self, head: Cell, tail: Cell) {
        let _ = self.run(Command::SpawnSnake {
            head: Some(head),
            tail: Some(tail),
        });
    }

    fn pixel(&self, column: i32, row: i32) -> PixelPos {
        query::board(&self.world).cell_to_pixel(Cell::new(column, row))
    }
}

fn close(a: PixelPos, b: PixelPos) -> bool {
    (a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3
}

#[test]
fn spawn_creates_head_and_body_sprites() {
    let mut harness = Harness::new();
    harness.spawn(Cell::new(10, 10), Cell::new(7, 10));

    let segments = harness.animator.segments();
    assert_eq!(segments.len(), 3);
    assert_eq!(segments[0].kind(), SpriteKind::SnakeHead);
    assert!(segments[1..]
        .iter()
        .all(|sprite| sprite.kind() == SpriteKind::SnakeBody));
    assert!(close(segments[2].position(), harness.pixel(8, 10)));
    assert_eq!(segments[0].orientation().degrees(), 90);
    assert_eq!(harness.canvas.sprites.len(), 3);
}

#[test]
fn respawn_replaces_previous_sprites() {
    let mut harness = Harness::new();
    harness.spawn(Cell::new(10, 10), Cell::new(7, 10));
    harness.spawn(Cell::new(5, 5), Cell::new(5, 10));
    assert_eq!(harness.canvas.sprites.len(), 5);
    assert_eq!(harness.animator.segments()[0].orientation().degrees(), 0);
}

#[test]
fn straight_tick_slides_every_segment_one_cell() {
    let mut harness = Harness::new();
    harness.spawn(Cell::new(10, 10), Cell::new(7, 10));
    harness.canvas.updates = 0;

    harness.tick();

    assert_eq!(harness.canvas.updates, 3 * SUB_FRAMES as usize);
    let segments = harness.animator.segments();
    assert!(close(segments[0].position(), harness.pixel(11, 10)));
    assert!(close(segments[2].position(), harness.pixel(9, 10)));
    let head = segments[0].handle();
    let on_canvas = harness.canvas.sprite_position(head).expect("head sprite");
    assert!(close(on_canvas, harness.pixel(11, 10)));
}

#[test]
fn head_turns_gradually_towards_new_heading() {
    let mut harness = Harness::new();
    harness.spawn(Cell::new(10, 10), Cell::new(7, 10));
    let _ = harness.run(Command::SetPendingHeading {
        heading: Heading::Down,
    });

    harness.tick();

    // 90 degrees remaining shrinks by a fifth on each sub-frame:
    // 18 + 14 + 11 + 9 + 7.
    let head = harness.animator.segments()[0];
    assert_eq!(head.orientation().degrees(), 149);
    assert!(close(head.position(), harness.pixel(10, 11)));
    assert_eq!(harness.animator.segments()[1].orientation().degrees(), 90);
}

#[test]
fn eating_adds_a_tail_sprite_after_settling() {
    let mut harness = Harness::new();
    harness.spawn(Cell::new(10, 10), Cell::new(7, 10));
    let _ = harness.run(Command::PlaceFood {
        cell: Cell::new(11, 10),
    });

    let _ = harness.run(Command::AdvanceSnake);
    let tail = *harness.animator.pending_tail().expect("pending tail");
    assert!(close(tail.position(), harness.pixel(8, 10)));
    assert_eq!(harness.animator.segments().len(), 3);

    let _ = harness.run(Command::SettleSnake);
    assert!(harness.animator.pending_tail().is_none());
    assert_eq!(harness.animator.segments().len(), 4);
    assert_eq!(harness.animator.segments()[3], tail);
}

#[test]
fn food_sprite_is_reused_between_placements() {
    let mut harness = Harness::new();
    let _ = harness.run(Command::PlaceFood {
        cell: Cell::new(3, 3),
    });
    let first = harness.animator.food().expect("food sprite").handle();
    let _ = harness.run(Command::PlaceFood {
        cell: Cell::new(4, 4),
    });
    let food = harness.animator.food().expect("food sprite");
    assert_eq!(food.handle(), first);
    assert!(close(food.position(), harness.pixel(4, 4)));
}

#[test]
fn collision_freezes_straight_moving_snake() {
    let mut harness = Harness::new();
    harness.spawn(Cell::new(20, 5), Cell::new(17, 5));
    harness.canvas.updates = 0;

    let events = harness.run(Command::AdvanceSnake);
    assert!(events.contains(&Event::SnakeCollided {
        cell: Cell::new(21, 5)
    }));
    assert_eq!(harness.canvas.updates, 0);
    assert!(close(
        harness.animator.segments()[0].position(),
        harness.pixel(20, 5)
    ));

    let _ = harness.run(Command::SettleSnake);
    assert_eq!(harness.animator.segments().len(), 3);
}

#[test]
fn collision_after_turn_pivots_head_once() {
    let mut harness = Harness::new();
    harness.spawn(Cell::new(10, 1), Cell::new(7, 1));
    let _ = harness.run(Command::SetPendingHeading {
        heading: Heading::Up,
    });

    let _ = harness.run(Command::AdvanceSnake);

    // Head pivots a fifth of the way, then the aligned neck ends the animation.
    let head = harness.animator.segments()[0];
    assert_eq!(head.orientation().degrees(), 72);
    assert!(close(head.position(), harness.pixel(10, 1)));
}
