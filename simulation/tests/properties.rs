use std::collections::HashMap;

use siege_lanes_core::{
    frame_time, EntityId, EntityKind, Event, Faction, Health, MatchStatus, SpawnError, UnitKind,
    FRAMES_PER_LOGIC_TICK,
};
use siege_lanes_simulation::{active_faction, Simulation, SimulationConfig};

fn skirmish() -> Simulation {
    let mut simulation = Simulation::default();
    for (kind, column, row) in [
        (UnitKind::Swordsman, 3, 5),
        (UnitKind::Archer, 2, 4),
        (UnitKind::Swordsman, 4, 7),
    ] {
        let _ = simulation
            .try_spawn_hero(kind, column, row, Faction::Player)
            .expect("skirmish heroes are affordable");
    }
    simulation
}

fn actor(event: &Event) -> Option<EntityId> {
    match event {
        Event::UnitAttacked { attacker, .. } | Event::ProjectileLaunched { attacker, .. } => {
            Some(*attacker)
        }
        Event::EntityMoved { entity, .. } => Some(*entity),
        _ => None,
    }
}

#[test]
fn mana_is_only_spent_on_successful_spawns() {
    let mut simulation = Simulation::default();
    let attempts = [
        (UnitKind::Tank, 1, 1),
        (UnitKind::Archer, 2, 3),
        (UnitKind::Titan, 2, 3),
        (UnitKind::Tank, 10, 4),
        (UnitKind::Swordsman, 5, 8),
        (UnitKind::Tank, 4, 4),
        (UnitKind::Swordsman, 6, 2),
        (UnitKind::Archer, 3, 9),
        (UnitKind::Swordsman, 7, 6),
    ];

    for (index, (kind, column, row)) in attempts.into_iter().enumerate() {
        for _ in 0..index * 7 {
            simulation.advance();
        }

        let before = simulation.mana();
        let entities = simulation.entities().len();
        match simulation.try_spawn_hero(kind, column, row, Faction::Player) {
            Ok(_) => {
                assert_eq!(simulation.mana(), before - kind.stats().mana_cost);
                assert_eq!(simulation.entities().len(), entities + 1);
            }
            Err(_) => {
                assert_eq!(simulation.mana(), before);
                assert_eq!(simulation.entities().len(), entities);
            }
        }
    }
}

#[test]
fn insufficient_mana_leaves_state_untouched() {
    let mut simulation = Simulation::default();
    let _ = simulation
        .try_spawn_hero(UnitKind::Tank, 3, 4, Faction::Player)
        .expect("first tank");
    let _ = simulation
        .try_spawn_hero(UnitKind::Tank, 3, 6, Faction::Player)
        .expect("second tank");

    let entities = simulation.entities().into_vec();
    let result = simulation.try_spawn_hero(UnitKind::Tank, 3, 7, Faction::Player);

    assert_eq!(
        result,
        Err(SpawnError::InsufficientResource {
            required: 20,
            available: 0,
        })
    );
    assert_eq!(simulation.mana(), 0);
    assert_eq!(simulation.entities().into_vec(), entities);
}

#[test]
fn health_never_increases_during_a_match() {
    let mut simulation = skirmish();
    let mut last_seen: HashMap<EntityId, Health> = HashMap::new();
    let mut damaged = 0;

    for _ in 0..2_400 {
        simulation.advance();
        for snapshot in simulation.entities().iter() {
            if let Some(previous) = last_seen.insert(snapshot.id, snapshot.health) {
                assert!(
                    snapshot.health <= previous,
                    "{:?} healed from {previous:?} to {:?}",
                    snapshot.id,
                    snapshot.health
                );
                if snapshot.health < previous {
                    damaged += 1;
                }
            }
        }
    }

    assert!(damaged > 0, "skirmish never dealt damage");
}

#[test]
fn units_attack_at_most_once_per_cooldown() {
    let mut simulation = skirmish();
    let mut kinds: HashMap<EntityId, UnitKind> = HashMap::new();
    let mut attacks: HashMap<EntityId, Vec<u64>> = HashMap::new();

    for _ in 0..3_000 {
        for snapshot in simulation.entities().iter() {
            if let Some(kind) = snapshot.unit_kind() {
                let _ = kinds.insert(snapshot.id, kind);
            }
        }
        simulation.advance();

        let frame = simulation.frame();
        for event in simulation.last_events() {
            if let Event::UnitAttacked { attacker, .. }
            | Event::ProjectileLaunched { attacker, .. } = event
            {
                attacks.entry(*attacker).or_default().push(frame);
            }
        }
    }

    assert!(!attacks.is_empty(), "no unit ever attacked");
    for (attacker, frames) in attacks {
        let cooldown = kinds[&attacker].stats().attack_cooldown;
        for pair in frames.windows(2) {
            let gap = frame_time(pair[1]) - frame_time(pair[0]);
            assert!(gap >= cooldown, "{attacker:?} attacked again after {gap:?}");
        }
    }
}

#[test]
fn factions_take_turns_on_alternate_ticks() {
    let mut simulation = skirmish();
    let mut active_ticks = [0u32; 2];

    for _ in 0..3_000 {
        let before = simulation.entities();
        simulation.advance();
        if simulation.status().is_terminal() {
            break;
        }

        let frame = simulation.frame();
        let acting: Vec<Faction> = simulation
            .last_events()
            .iter()
            .filter_map(actor)
            .filter_map(|id| before.get(id))
            .filter(|snapshot| matches!(snapshot.kind, EntityKind::Unit(_)))
            .map(|snapshot| snapshot.faction)
            .collect();

        if frame % FRAMES_PER_LOGIC_TICK != 0 {
            assert!(acting.is_empty(), "units acted between ticks on frame {frame}");
            continue;
        }

        let expected = active_faction(frame / FRAMES_PER_LOGIC_TICK);
        assert!(
            acting.iter().all(|faction| *faction == expected),
            "tick on frame {frame} mixed factions: {acting:?}"
        );
        if !acting.is_empty() {
            active_ticks[usize::from(expected == Faction::Enemy)] += 1;
        }
    }

    assert!(active_ticks[0] > 0, "heroes never acted");
    assert!(active_ticks[1] > 0, "monsters never acted");
}

#[test]
fn destroying_only_the_enemy_stronghold_wins() {
    let mut simulation = Simulation::default();
    simulation.inflict_damage(simulation.enemy_stronghold(), 100);
    assert_eq!(simulation.status(), MatchStatus::InProgress);

    for _ in 0..FRAMES_PER_LOGIC_TICK {
        simulation.advance();
    }

    assert_eq!(simulation.status(), MatchStatus::PlayerWon);
    assert!(simulation
        .last_events()
        .contains(&Event::MatchConcluded {
            status: MatchStatus::PlayerWon,
        }));
    let snapshot = simulation.match_snapshot();
    assert!(snapshot.player_stronghold.get() > 0);
    assert!(snapshot.enemy_stronghold.is_depleted());
}

#[test]
fn simultaneous_fall_is_a_loss() {
    let mut simulation = Simulation::default();
    simulation.inflict_damage(simulation.enemy_stronghold(), 250);
    simulation.inflict_damage(simulation.player_stronghold(), 100);

    for _ in 0..FRAMES_PER_LOGIC_TICK {
        simulation.advance();
    }
    assert_eq!(simulation.status(), MatchStatus::PlayerLost);
}

#[test]
fn concluded_match_stops_advancing() {
    let mut simulation = Simulation::default();
    simulation.inflict_damage(simulation.player_stronghold(), 100);
    for _ in 0..FRAMES_PER_LOGIC_TICK {
        simulation.advance();
    }
    let frame = simulation.frame();
    let entities = simulation.entities().into_vec();

    for _ in 0..600 {
        simulation.advance();
        assert!(simulation.last_events().is_empty());
    }
    assert_eq!(simulation.frame(), frame);
    assert_eq!(simulation.entities().into_vec(), entities);
}

#[test]
fn concluded_match_refuses_player_input() {
    let mut simulation = Simulation::default();
    let mut task = None;
    for _ in 0..FRAMES_PER_LOGIC_TICK {
        simulation.advance();
        task = task.or_else(|| {
            simulation.last_events().iter().find_map(|event| match event {
                Event::TaskSpawned { entity, .. } => Some(*entity),
                _ => None,
            })
        });
    }
    let task = task.expect("task spawned on the first tick");

    simulation.inflict_damage(simulation.player_stronghold(), 100);
    for _ in 0..2 * FRAMES_PER_LOGIC_TICK {
        simulation.advance();
    }
    assert_eq!(simulation.status(), MatchStatus::PlayerLost);
    let entities = simulation.entities().into_vec();

    assert_eq!(
        simulation.try_spawn_hero(UnitKind::Tank, 3, 4, Faction::Player),
        Err(SpawnError::MatchConcluded)
    );
    assert!(!simulation.collect_task(task));
    assert_eq!(simulation.mana(), 40);
    assert_eq!(simulation.entities().into_vec(), entities);
}

#[test]
fn tank_economy_example_and_restart() {
    let config = SimulationConfig::default();
    assert_eq!((config.rows, config.columns), (9, 11));
    let mut simulation = Simulation::new(config);
    assert_eq!(simulation.mana(), 40);

    assert!(simulation
        .try_spawn_hero(UnitKind::Tank, 2, 3, Faction::Player)
        .is_ok());
    assert_eq!(simulation.mana(), 20);
    assert!(simulation
        .try_spawn_hero(UnitKind::Tank, 2, 5, Faction::Player)
        .is_ok());
    assert_eq!(simulation.mana(), 0);
    assert!(matches!(
        simulation.try_spawn_hero(UnitKind::Tank, 2, 7, Faction::Player),
        Err(SpawnError::InsufficientResource { .. })
    ));
    assert_eq!(simulation.mana(), 0);

    for _ in 0..200 {
        simulation.advance();
    }
    simulation.restart();

    assert_eq!(simulation.mana(), 40);
    assert_eq!(simulation.frame(), 0);
    assert_eq!(simulation.status(), MatchStatus::InProgress);
    let view = simulation.entities();
    assert!(
        view.iter()
            .all(|snapshot| snapshot.unit_kind().map_or(true, |kind| !kind.is_hero())),
        "heroes survived the restart"
    );
    assert!(view
        .iter()
        .all(|snapshot| snapshot.kind != EntityKind::Task));
    let snapshot = simulation.match_snapshot();
    assert_eq!(snapshot.player_stronghold, Health::new(100));
    assert_eq!(snapshot.enemy_stronghold, Health::new(100));
}

#[test]
fn collectible_can_be_collected_once() {
    let mut simulation = Simulation::default();
    let mut task = None;
    for _ in 0..FRAMES_PER_LOGIC_TICK {
        simulation.advance();
        task = task.or_else(|| {
            simulation.last_events().iter().find_map(|event| match event {
                Event::TaskSpawned { entity, .. } => Some(*entity),
                _ => None,
            })
        });
    }
    let task = task.expect("task spawned on the first tick");

    assert!(simulation.collect_task(task));
    assert_eq!(simulation.mana(), 50);
    assert!(!simulation.collect_task(task));
    assert!(!simulation.collect_task(simulation.player_stronghold()));
    assert_eq!(simulation.mana(), 50);
}
