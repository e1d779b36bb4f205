use siege_lanes_core::{
    Command, EntityId, EntityKind, Event, Faction, Health, MatchStatus, SpawnError, TilePosition,
    UnitKind,
};
use siege_lanes_world::{self as world, query, MatchSettings, World};

fn titan(world: &mut World, column: u32, row: u32) -> EntityId {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::SpawnMonster {
            tile: TilePosition::new(column, row),
        },
        &mut events,
    );
    events
        .iter()
        .find_map(|event| match event {
            Event::MonsterSpawned { entity, .. } => Some(*entity),
            _ => None,
        })
        .expect("monster spawns")
}

#[test]
fn lethal_damage_floors_health_and_flags_death() {
    let mut world = World::default();
    let monster = titan(&mut world, 5, 5);

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::InflictDamage {
            target: monster,
            amount: 250,
        },
        &mut events,
    );
    assert_eq!(
        events,
        vec![
            Event::EntityDamaged {
                entity: monster,
                amount: 250,
                remaining: Health::new(0),
            },
            Event::EntityDied { entity: monster },
        ]
    );

    let snapshot = query::entity(&world, monster).expect("dead until cleanup");
    assert!(!snapshot.alive);
    assert_eq!(snapshot.health, Health::new(0));

    events.clear();
    world::apply(
        &mut world,
        Command::InflictDamage {
            target: monster,
            amount: 10,
        },
        &mut events,
    );
    assert!(events.is_empty(), "dead units take no further damage");

    world::apply(&mut world, Command::RemoveDead, &mut events);
    assert_eq!(events, vec![Event::EntityRemoved { entity: monster }]);
    assert!(query::entity(&world, monster).is_none());
}

#[test]
fn arrow_expires_once_its_range_is_spent() {
    let mut world = World::default();
    let mut events = Vec::new();
    let archer = world::spawn_hero(
        &mut world,
        UnitKind::Archer,
        TilePosition::new(1, 8),
        Faction::Player,
        &mut events,
    )
    .expect("archer spawns");
    let target = titan(&mut world, 4, 8);

    events.clear();
    world::apply(
        &mut world,
        Command::LaunchProjectile {
            attacker: archer,
            target,
        },
        &mut events,
    );
    let projectile = events
        .iter()
        .find_map(|event| match event {
            Event::ProjectileLaunched { projectile, .. } => Some(*projectile),
            _ => None,
        })
        .expect("arrow launched");

    let mut frames = 0;
    loop {
        events.clear();
        world::apply(&mut world, Command::AdvanceFrame, &mut events);
        frames += 1;
        if events.contains(&Event::ProjectileExpired { projectile }) {
            break;
        }
        assert!(frames < 200, "arrow never expired");
    }

    assert!((96..=97).contains(&frames), "arrow flew {frames} frames");
    assert!(events.contains(&Event::EntityRemoved { entity: projectile }));
    assert!(query::entity(&world, projectile).is_none());
    assert_eq!(
        query::entity(&world, target).expect("titan").health,
        Health::new(100),
        "flight alone never damages"
    );
}

#[test]
fn projectiles_inherit_their_launcher_faction() {
    let mut world = World::default();
    let mut events = Vec::new();
    let archer = world::spawn_hero(
        &mut world,
        UnitKind::Archer,
        TilePosition::new(2, 4),
        Faction::Player,
        &mut events,
    )
    .expect("archer spawns");
    let target = titan(&mut world, 6, 4);

    world::apply(
        &mut world,
        Command::LaunchProjectile {
            attacker: archer,
            target,
        },
        &mut events,
    );

    let arrow = query::entity_view(&world)
        .into_vec()
        .into_iter()
        .find(|snapshot| snapshot.kind == EntityKind::Projectile)
        .expect("arrow is live");
    assert_eq!(arrow.faction, Faction::Player);
    assert_eq!(arrow.attack, UnitKind::Archer.stats().attack);
    assert!(arrow.velocity.x > 0.0);
    assert_eq!(arrow.velocity.y, 0.0);
}

#[test]
fn placement_outside_lanes_is_an_explicit_error() {
    let mut world = World::new(MatchSettings::default());
    let mut events = Vec::new();

    for (column, row) in [(0, 4), (10, 4), (5, 0), (5, 1), (5, 9)] {
        let result = world::spawn_hero(
            &mut world,
            UnitKind::Swordsman,
            TilePosition::new(column, row),
            Faction::Player,
            &mut events,
        );
        assert_eq!(result, Err(SpawnError::InvalidPlacement { column, row }));
    }
    assert_eq!(query::mana(&world), 40);
    assert_eq!(query::entity_view(&world).len(), 2);
}

#[test]
fn both_strongholds_falling_together_is_a_loss() {
    let mut world = World::default();
    let mut events = Vec::new();
    for target in [query::enemy_stronghold(&world), query::player_stronghold(&world)] {
        world::apply(
            &mut world,
            Command::InflictDamage {
                target,
                amount: 100,
            },
            &mut events,
        );
    }

    events.clear();
    world::apply(&mut world, Command::EvaluateMatch, &mut events);
    assert_eq!(
        events,
        vec![Event::MatchConcluded {
            status: MatchStatus::PlayerLost,
        }]
    );

    events.clear();
    world::apply(&mut world, Command::EvaluateMatch, &mut events);
    assert!(events.is_empty(), "conclusion is announced once");
}
