#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic lane movement for units and drifting collectibles.

use std::time::Duration;

use siege_lanes_core::{
    Command, EntityKind, EntitySnapshot, EntityView, Faction, TileGrid, WorldPoint,
    LOGIC_TICK_DURATION,
};

/// Horizontal speed, in world units per second, at which collectibles drift toward the player.
pub const TASK_DRIFT_SPEED: f32 = 60.0;

/// Pure system that proposes lane advances once per logic tick.
#[derive(Debug, Default)]
pub struct Movement {
    opponents: Vec<Opponent>,
}

impl Movement {
    /// Creates a new movement system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits movement commands for the active faction and every collectible.
    ///
    /// Units of the active faction advance along their lane by
    /// `speed * LOGIC_TICK_DURATION` unless an attackable opponent is within
    /// their attack range, in which case they hold position. Collectibles
    /// drift toward the player side on every tick regardless of the active
    /// faction and are allowed to leave the board. Moves that would not change
    /// a position are omitted.
    pub fn handle(
        &mut self,
        active: Faction,
        entities: &EntityView,
        grid: &TileGrid,
        out: &mut Vec<Command>,
    ) {
        self.opponents.clear();
        self.opponents.extend(
            entities
                .iter()
                .filter(|snapshot| snapshot.is_attackable())
                .map(|snapshot| Opponent {
                    faction: snapshot.faction,
                    position: snapshot.position,
                }),
        );

        let board = grid.board();
        let seconds = LOGIC_TICK_DURATION.as_secs_f32();

        for snapshot in entities.iter().filter(|snapshot| snapshot.alive) {
            let destination = match snapshot.kind {
                EntityKind::Unit(kind) if snapshot.faction == active => {
                    let stats = kind.stats();
                    if self.is_engaged(snapshot, stats.attack_range) {
                        continue;
                    }
                    let step = active.lane_direction() * stats.speed * seconds;
                    WorldPoint::new(
                        (snapshot.position.x + step).clamp(0.0, board.width),
                        snapshot.position.y,
                    )
                }
                EntityKind::Task => WorldPoint::new(
                    snapshot.position.x - drift_distance(LOGIC_TICK_DURATION),
                    snapshot.position.y,
                ),
                _ => continue,
            };

            if destination != snapshot.position {
                out.push(Command::MoveEntity {
                    entity: snapshot.id,
                    to: destination,
                });
            }
        }
    }

    fn is_engaged(&self, unit: &EntitySnapshot, range: f32) -> bool {
        self.opponents.iter().any(|opponent| {
            unit.faction.opposes(opponent.faction)
                && unit.position.distance(opponent.position) <= range
        })
    }
}

fn drift_distance(elapsed: Duration) -> f32 {
    TASK_DRIFT_SPEED * elapsed.as_secs_f32()
}

#[derive(Clone, Copy, Debug)]
struct Opponent {
    faction: Faction,
    position: WorldPoint,
}
