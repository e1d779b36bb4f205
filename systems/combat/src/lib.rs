#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that resolves unit attacks from entity snapshots.

use std::time::Duration;

use siege_lanes_core::{AttackStyle, Command, EntityId, EntityView, Faction, WorldPoint};

/// Combat resolver that reuses scratch buffers to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct Combat {
    candidates: Vec<Candidate>,
}

impl Combat {
    /// Creates a new combat resolver with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits attack commands for every ready unit of the active faction.
    ///
    /// Each unit whose cooldown has elapsed targets the nearest opposing unit
    /// or stronghold within its attack range, ties going to the lowest
    /// identifier. Melee units strike directly; ranged units launch a
    /// projectile instead. Melee damage queued earlier in the same batch is
    /// accounted for so later attackers do not pick a target that is already
    /// doomed. Units without an eligible target do nothing.
    pub fn handle(
        &mut self,
        active: Faction,
        entities: &EntityView,
        now: Duration,
        out: &mut Vec<Command>,
    ) {
        self.prepare_candidates(entities);
        if self.candidates.is_empty() {
            return;
        }

        for attacker in entities.iter() {
            if !attacker.alive || attacker.faction != active {
                continue;
            }
            let Some(kind) = attacker.unit_kind() else {
                continue;
            };

            let stats = kind.stats();
            if !cooldown_elapsed(attacker.last_attack, stats.attack_cooldown, now) {
                continue;
            }

            let Some(index) = self.nearest(attacker.faction, attacker.position, stats.attack_range)
            else {
                continue;
            };

            let target = &mut self.candidates[index];
            match stats.style {
                AttackStyle::Melee => {
                    target.projected_health = target.projected_health.saturating_sub(attacker.attack);
                    out.push(Command::Strike {
                        attacker: attacker.id,
                        target: target.id,
                    });
                }
                AttackStyle::Ranged => out.push(Command::LaunchProjectile {
                    attacker: attacker.id,
                    target: target.id,
                }),
            }
        }
    }

    fn prepare_candidates(&mut self, entities: &EntityView) {
        self.candidates.clear();
        self.candidates.extend(
            entities
                .iter()
                .filter(|snapshot| snapshot.is_attackable())
                .map(|snapshot| Candidate {
                    id: snapshot.id,
                    faction: snapshot.faction,
                    position: snapshot.position,
                    projected_health: snapshot.health.get(),
                }),
        );
    }

    fn nearest(&self, faction: Faction, origin: WorldPoint, range: f32) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;

        // Candidates are in ascending id order, so a strict comparison keeps
        // the lowest id among equidistant targets.
        for (index, candidate) in self.candidates.iter().enumerate() {
            if candidate.projected_health == 0 || !faction.opposes(candidate.faction) {
                continue;
            }

            let distance = origin.distance(candidate.position);
            if distance > range {
                continue;
            }

            match best {
                Some((_, best_distance)) if distance >= best_distance => {}
                _ => best = Some((index, distance)),
            }
        }

        best.map(|(index, _)| index)
    }
}

fn cooldown_elapsed(last_attack: Option<Duration>, cooldown: Duration, now: Duration) -> bool {
    last_attack.map_or(true, |last| now.saturating_sub(last) >= cooldown)
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Candidate {
    id: EntityId,
    faction: Faction,
    position: WorldPoint,
    projected_health: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use siege_lanes_core::{
        BodySize, CollisionProfile, EntityKind, EntitySnapshot, Health, UnitKind,
    };

    fn unit(id: u32, kind: UnitKind, x: f32, y: f32) -> EntitySnapshot {
        let entity_kind = EntityKind::Unit(kind);
        let stats = kind.stats();
        EntitySnapshot {
            id: EntityId::new(id),
            kind: entity_kind,
            faction: kind.faction(),
            position: WorldPoint::new(x, y),
            velocity: WorldPoint::default(),
            health: Health::new(stats.health),
            attack: stats.attack,
            body: BodySize::new(100.0, 100.0),
            collision: CollisionProfile::for_entity(entity_kind, kind.faction()),
            last_attack: None,
            alive: true,
        }
    }

    fn stronghold(id: u32, faction: Faction, x: f32) -> EntitySnapshot {
        EntitySnapshot {
            id: EntityId::new(id),
            kind: EntityKind::Stronghold,
            faction,
            position: WorldPoint::new(x, 450.0),
            velocity: WorldPoint::default(),
            health: Health::new(100),
            attack: 0,
            body: BodySize::new(100.0, 500.0),
            collision: CollisionProfile::for_entity(EntityKind::Stronghold, faction),
            last_attack: None,
            alive: true,
        }
    }

    fn run(active: Faction, snapshots: Vec<EntitySnapshot>, now: Duration) -> Vec<Command> {
        let mut combat = Combat::new();
        let mut out = Vec::new();
        combat.handle(active, &EntityView::from_snapshots(snapshots), now, &mut out);
        out
    }

    #[test]
    fn strikes_nearest_opponent_in_range() {
        let out = run(
            Faction::Player,
            vec![
                unit(1, UnitKind::Swordsman, 300.0, 500.0),
                unit(2, UnitKind::Titan, 400.0, 500.0),
                unit(3, UnitKind::Titan, 350.0, 500.0),
            ],
            Duration::ZERO,
        );

        assert_eq!(
            out,
            vec![Command::Strike {
                attacker: EntityId::new(1),
                target: EntityId::new(3),
            }]
        );
    }

    #[test]
    fn equidistant_targets_prefer_lowest_id() {
        let out = run(
            Faction::Player,
            vec![
                unit(1, UnitKind::Swordsman, 300.0, 500.0),
                unit(7, UnitKind::Titan, 400.0, 500.0),
                unit(4, UnitKind::Titan, 200.0, 500.0),
            ],
            Duration::ZERO,
        );

        assert_eq!(
            out,
            vec![Command::Strike {
                attacker: EntityId::new(1),
                target: EntityId::new(4),
            }]
        );
    }

    #[test]
    fn opponents_outside_range_are_ignored() {
        let out = run(
            Faction::Player,
            vec![
                unit(1, UnitKind::Swordsman, 100.0, 500.0),
                unit(2, UnitKind::Titan, 900.0, 500.0),
            ],
            Duration::ZERO,
        );
        assert!(out.is_empty());
    }

    #[test]
    fn inactive_faction_does_not_attack() {
        let out = run(
            Faction::Enemy,
            vec![
                unit(1, UnitKind::Swordsman, 300.0, 500.0),
                unit(2, UnitKind::Tank, 320.0, 500.0),
            ],
            Duration::ZERO,
        );
        assert!(out.is_empty());
    }

    #[test]
    fn cooling_down_units_hold_fire() {
        let mut attacker = unit(1, UnitKind::Titan, 300.0, 500.0);
        attacker.last_attack = Some(Duration::from_secs(1));
        let snapshots = vec![attacker, unit(2, UnitKind::Tank, 320.0, 500.0)];

        let early = run(Faction::Enemy, snapshots.clone(), Duration::from_millis(2_500));
        assert!(early.is_empty());

        let ready = run(Faction::Enemy, snapshots, Duration::from_secs(3));
        assert_eq!(ready.len(), 1);
    }

    #[test]
    fn ranged_units_launch_projectiles() {
        let out = run(
            Faction::Player,
            vec![
                unit(1, UnitKind::Archer, 200.0, 500.0),
                unit(2, UnitKind::Titan, 600.0, 500.0),
            ],
            Duration::ZERO,
        );
        assert_eq!(
            out,
            vec![Command::LaunchProjectile {
                attacker: EntityId::new(1),
                target: EntityId::new(2),
            }]
        );
    }

    #[test]
    fn strongholds_are_valid_targets() {
        let out = run(
            Faction::Enemy,
            vec![
                stronghold(0, Faction::Player, 50.0),
                unit(5, UnitKind::Titan, 150.0, 450.0),
            ],
            Duration::ZERO,
        );
        assert_eq!(
            out,
            vec![Command::Strike {
                attacker: EntityId::new(5),
                target: EntityId::new(0),
            }]
        );
    }

    #[test]
    fn doomed_targets_are_not_struck_twice() {
        let mut weak = unit(3, UnitKind::Titan, 400.0, 500.0);
        weak.health = Health::new(5);
        let out = run(
            Faction::Player,
            vec![
                unit(1, UnitKind::Swordsman, 350.0, 500.0),
                unit(2, UnitKind::Swordsman, 350.0, 520.0),
                weak,
                unit(4, UnitKind::Titan, 420.0, 500.0),
            ],
            Duration::ZERO,
        );

        assert_eq!(
            out,
            vec![
                Command::Strike {
                    attacker: EntityId::new(1),
                    target: EntityId::new(3),
                },
                Command::Strike {
                    attacker: EntityId::new(2),
                    target: EntityId::new(4),
                },
            ]
        );
    }

    #[test]
    fn dead_units_neither_attack_nor_get_targeted() {
        let mut corpse = unit(2, UnitKind::Titan, 320.0, 500.0);
        corpse.alive = false;
        let mut dead_attacker = unit(1, UnitKind::Swordsman, 300.0, 500.0);
        dead_attacker.alive = false;

        let out = run(
            Faction::Player,
            vec![
                dead_attacker,
                corpse,
                unit(3, UnitKind::Swordsman, 300.0, 520.0),
            ],
            Duration::ZERO,
        );
        assert!(out.is_empty());
    }
}
