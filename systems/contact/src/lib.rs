#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless contact detection between overlapping entity bodies.
//!
//! Each body is treated as an axis-aligned box centred on its position.
//! Pairs whose boxes overlap and whose collision profiles permit contact are
//! reported to the world as [`Command::ResolveContact`].

use glam::Vec2;
use siege_lanes_core::{may_contact, CollisionProfile, Command, EntityId, EntityView};

/// Contact detector that reuses a scratch buffer of bodies between frames.
#[derive(Debug, Default)]
pub struct ContactDetector {
    bodies: Vec<Body>,
}

impl ContactDetector {
    /// Creates a new detector with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits a contact command for every overlapping pair allowed to touch.
    ///
    /// Pairs are reported in ascending order of the lower identifier, then the
    /// higher one, with the lower identifier first.
    pub fn handle(&mut self, entities: &EntityView, out: &mut Vec<Command>) {
        self.bodies.clear();
        self.bodies.extend(
            entities
                .iter()
                .filter(|snapshot| snapshot.alive)
                .map(|snapshot| {
                    let center = Vec2::new(snapshot.position.x, snapshot.position.y);
                    let half = Vec2::new(snapshot.body.width, snapshot.body.height) * 0.5;
                    Body {
                        id: snapshot.id,
                        min: center - half,
                        max: center + half,
                        collision: snapshot.collision,
                    }
                }),
        );

        for (index, first) in self.bodies.iter().enumerate() {
            for second in &self.bodies[index + 1..] {
                if may_contact(first.collision, second.collision) && first.overlaps(second) {
                    out.push(Command::ResolveContact {
                        first: first.id,
                        second: second.id,
                    });
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Body {
    id: EntityId,
    min: Vec2,
    max: Vec2,
    collision: CollisionProfile,
}

impl Body {
    fn overlaps(&self, other: &Body) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}
