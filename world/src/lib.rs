#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative match state for Siege Lanes.
//!
//! A [`World`] is the match context: it owns the live entity set, the
//! player's mana balance, the frame clock and the match status. It is built
//! once per match and replaced wholesale on restart. All mutation flows
//! through [`apply`] (and [`spawn_hero`], which reports its outcome directly),
//! and all reads go through the [`query`] module.

mod economy;

use std::time::Duration;

use glam::Vec2;
use siege_lanes_core::{
    frame_time, may_contact, AttackStyle, BodySize, CollisionProfile, Command, EntityId, EntityKind,
    EntitySnapshot, Event, Faction, Health, MatchStatus, SpawnError, TileCoord, TileGrid,
    TilePosition, UnitKind, WorldPoint, FRAMES_PER_SECOND, LOGIC_TICK_DURATION,
    PROJECTILE_BODY, PROJECTILE_MAX_RANGE, PROJECTILE_SPEED, STRONGHOLD_HEIGHT_IN_TILES,
};
use tracing::{debug, info, warn};

use crate::economy::ManaPool;

const DEFAULT_GRID_COLUMNS: TileCoord = TileCoord::new(11);
const DEFAULT_GRID_ROWS: TileCoord = TileCoord::new(9);
const DEFAULT_BOARD: BodySize = BodySize::new(1100.0, 900.0);
const DEFAULT_INITIAL_MANA: u32 = 40;
const DEFAULT_STRONGHOLD_HEALTH: u32 = 100;
const DEFAULT_TASK_MANA_BONUS: u32 = 10;
const DEFAULT_MATCH_DURATION: Duration = Duration::from_secs(60);

/// Row, in tiles, on which both strongholds are centred.
const STRONGHOLD_CENTER_ROW: f32 = 4.5;

/// Parameters fixed for the lifetime of a match.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchSettings {
    /// Tile layout and board size.
    pub grid: TileGrid,
    /// Mana available when the match begins.
    pub initial_mana: u32,
    /// Starting health of both strongholds.
    pub stronghold_health: u32,
    /// Mana granted by each consumed collectible.
    pub task_mana_bonus: u32,
    /// Starting value of the match countdown.
    pub match_duration: Duration,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            grid: TileGrid::new(DEFAULT_GRID_COLUMNS, DEFAULT_GRID_ROWS, DEFAULT_BOARD),
            initial_mana: DEFAULT_INITIAL_MANA,
            stronghold_health: DEFAULT_STRONGHOLD_HEALTH,
            task_mana_bonus: DEFAULT_TASK_MANA_BONUS,
            match_duration: DEFAULT_MATCH_DURATION,
        }
    }
}

/// Represents the authoritative state of one match.
#[derive(Debug)]
pub struct World {
    settings: MatchSettings,
    mana: ManaPool,
    entities: Vec<Entity>,
    next_entity_id: u32,
    frame: u64,
    status: MatchStatus,
    player_stronghold: EntityId,
    enemy_stronghold: EntityId,
}

impl World {
    /// Creates a fresh match with both strongholds standing and full mana.
    #[must_use]
    pub fn new(settings: MatchSettings) -> Self {
        let mut world = Self {
            mana: ManaPool::new(settings.initial_mana),
            entities: Vec::new(),
            next_entity_id: 0,
            frame: 0,
            status: MatchStatus::InProgress,
            player_stronghold: EntityId::new(0),
            enemy_stronghold: EntityId::new(0),
            settings,
        };
        world.player_stronghold = world.place_stronghold(Faction::Player);
        world.enemy_stronghold = world.place_stronghold(Faction::Enemy);
        world
    }

    fn place_stronghold(&mut self, faction: Faction) -> EntityId {
        let grid = &self.settings.grid;
        let tile = grid.tile_size();
        let column = match faction {
            Faction::Player => 0.5,
            _ => grid.columns().get() as f32 - 2.5,
        };
        let position = to_vec(grid.tile_point(column, STRONGHOLD_CENTER_ROW));
        let id = self.allocate_id();
        self.entities.push(Entity {
            id,
            kind: EntityKind::Stronghold,
            faction,
            position,
            velocity: Vec2::ZERO,
            health: Health::new(self.settings.stronghold_health),
            attack: 0,
            body: BodySize::new(tile.width, tile.height * STRONGHOLD_HEIGHT_IN_TILES),
            alive: true,
            state: EntityState::Stronghold,
        });
        id
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId::new(self.next_entity_id);
        self.next_entity_id = self.next_entity_id.saturating_add(1);
        id
    }

    fn now(&self) -> Duration {
        frame_time(self.frame)
    }

    // Entities are appended in allocation order, so the store stays sorted by id.
    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entities.binary_search_by_key(&id, |entity| entity.id).ok()
    }

    fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.index_of(id).map(|index| &self.entities[index])
    }

    fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let index = self.index_of(id)?;
        self.entities.get_mut(index)
    }

    fn stronghold_health(&self, id: EntityId) -> Health {
        self.entity(id).map(|entity| entity.health).unwrap_or_default()
    }

    fn insert_unit(&mut self, kind: UnitKind, position: Vec2) -> EntityId {
        let stats = kind.stats();
        let id = self.allocate_id();
        self.entities.push(Entity {
            id,
            kind: EntityKind::Unit(kind),
            faction: kind.faction(),
            position,
            velocity: Vec2::ZERO,
            health: Health::new(stats.health),
            attack: stats.attack,
            body: self.settings.grid.tile_size(),
            alive: true,
            state: EntityState::Unit { last_attack: None },
        });
        id
    }

    fn try_spawn_hero(
        &mut self,
        kind: UnitKind,
        tile: TilePosition,
        faction: Faction,
    ) -> Result<(EntityId, WorldPoint, u32), SpawnError> {
        if self.status.is_terminal() {
            return Err(SpawnError::MatchConcluded);
        }
        if !kind.is_hero() || kind.faction() != faction {
            return Err(SpawnError::FactionMismatch { kind, faction });
        }
        if !self.settings.grid.is_spawn_lane(tile) {
            return Err(SpawnError::InvalidPlacement {
                column: tile.column(),
                row: tile.row(),
            });
        }

        let balance = self.mana.try_spend(kind.stats().mana_cost)?;
        let position = self.settings.grid.tile_center(tile);
        let id = self.insert_unit(kind, to_vec(position));
        Ok((id, position, balance))
    }

    fn spawn_monster(&mut self, tile: TilePosition, out_events: &mut Vec<Event>) {
        if !self.settings.grid.is_spawn_lane(tile) {
            warn!(
                column = tile.column(),
                row = tile.row(),
                "ignoring monster spawn outside the interior lanes"
            );
            return;
        }
        let position = self.settings.grid.tile_center(tile);
        let entity = self.insert_unit(UnitKind::Titan, to_vec(position));
        debug!(entity = entity.get(), x = position.x, y = position.y, "monster spawned");
        out_events.push(Event::MonsterSpawned { entity, position });
    }

    fn spawn_task(&mut self, out_events: &mut Vec<Event>) {
        let grid = &self.settings.grid;
        let position = grid.tile_point(grid.columns().get() as f32 - 0.5, 1.0);
        let body = grid.tile_size();
        let entity = self.allocate_id();
        self.entities.push(Entity {
            id: entity,
            kind: EntityKind::Task,
            faction: Faction::Neutral,
            position: to_vec(position),
            velocity: Vec2::ZERO,
            health: Health::default(),
            attack: 0,
            body,
            alive: true,
            state: EntityState::Task,
        });
        debug!(entity = entity.get(), "task spawned");
        out_events.push(Event::TaskSpawned { entity, position });
    }

    fn advance_frame(&mut self, out_events: &mut Vec<Event>) {
        self.frame = self.frame.saturating_add(1);
        out_events.push(Event::FrameAdvanced { frame: self.frame });

        let mut expired = Vec::new();
        for entity in self.entities.iter_mut().filter(|entity| entity.alive) {
            if let EntityState::Projectile {
                origin,
                max_range,
                frames_in_flight,
            } = &mut entity.state
            {
                *frames_in_flight = frames_in_flight.saturating_add(1);
                let elapsed = *frames_in_flight as f32 / FRAMES_PER_SECOND as f32;
                entity.position = *origin + entity.velocity * elapsed;
                if entity.position.distance(*origin) >= *max_range {
                    entity.alive = false;
                    expired.push(entity.id);
                }
            }
        }

        for projectile in &expired {
            out_events.push(Event::ProjectileExpired {
                projectile: *projectile,
            });
        }
        self.purge(&expired, out_events);
    }

    fn move_entity(&mut self, id: EntityId, to: WorldPoint, out_events: &mut Vec<Event>) {
        let board = self.settings.grid.board();
        let Some(entity) = self.entity_mut(id) else {
            return;
        };
        if !entity.alive {
            return;
        }

        let from = entity.position;
        let destination = match entity.kind {
            EntityKind::Unit(_) => Vec2::new(
                to.x.clamp(0.0, board.width),
                to.y.clamp(0.0, board.height),
            ),
            EntityKind::Task => to_vec(to),
            EntityKind::Stronghold | EntityKind::Projectile => return,
        };

        entity.position = destination;
        entity.velocity = (destination - from) / LOGIC_TICK_DURATION.as_secs_f32();
        out_events.push(Event::EntityMoved {
            entity: id,
            from: to_point(from),
            to: to_point(destination),
        });

        if entity.kind == EntityKind::Task && destination.x < 0.0 {
            entity.alive = false;
            out_events.push(Event::EntityDied { entity: id });
        }
    }

    /// Returns the attacker's damage, faction and position when its cooldown has elapsed.
    fn ready_attacker(&self, id: EntityId) -> Option<ReadyAttacker> {
        let entity = self.entity(id)?;
        let EntityKind::Unit(kind) = entity.kind else {
            return None;
        };
        let EntityState::Unit { last_attack } = entity.state else {
            return None;
        };
        if !entity.alive {
            return None;
        }

        let now = self.now();
        let cooldown = kind.stats().attack_cooldown;
        if let Some(last) = last_attack {
            if now.saturating_sub(last) < cooldown {
                return None;
            }
        }

        Some(ReadyAttacker {
            kind,
            faction: entity.faction,
            attack: entity.attack,
            position: entity.position,
        })
    }

    fn valid_target(&self, faction: Faction, target: EntityId) -> Option<&Entity> {
        self.entity(target)
            .filter(|entity| entity.is_attackable() && faction.opposes(entity.faction))
    }

    fn mark_attacked(&mut self, id: EntityId) {
        let now = self.now();
        if let Some(entity) = self.entity_mut(id) {
            if let EntityState::Unit { last_attack } = &mut entity.state {
                *last_attack = Some(now);
            }
        }
    }

    fn strike(&mut self, attacker: EntityId, target: EntityId, out_events: &mut Vec<Event>) {
        let Some(ready) = self.ready_attacker(attacker) else {
            return;
        };
        if self.valid_target(ready.faction, target).is_none() {
            return;
        }

        out_events.push(Event::UnitAttacked { attacker, target });
        self.damage(target, ready.attack, out_events);
        self.mark_attacked(attacker);
    }

    fn launch_projectile(
        &mut self,
        attacker: EntityId,
        target: EntityId,
        out_events: &mut Vec<Event>,
    ) {
        let Some(ready) = self.ready_attacker(attacker) else {
            return;
        };
        if ready.kind.stats().style != AttackStyle::Ranged {
            return;
        }
        let Some(target_position) = self
            .valid_target(ready.faction, target)
            .map(|entity| entity.position)
        else {
            return;
        };

        let mut direction = (target_position - ready.position).normalize_or_zero();
        if direction == Vec2::ZERO {
            direction = Vec2::new(ready.faction.lane_direction(), 0.0);
        }

        let projectile = self.allocate_id();
        self.entities.push(Entity {
            id: projectile,
            kind: EntityKind::Projectile,
            faction: ready.faction,
            position: ready.position,
            velocity: direction * PROJECTILE_SPEED,
            health: Health::default(),
            attack: ready.attack,
            body: PROJECTILE_BODY,
            alive: true,
            state: EntityState::Projectile {
                origin: ready.position,
                max_range: PROJECTILE_MAX_RANGE,
                frames_in_flight: 0,
            },
        });
        self.mark_attacked(attacker);
        out_events.push(Event::ProjectileLaunched {
            projectile,
            attacker,
            target,
        });
    }

    fn resolve_contact(&mut self, first: EntityId, second: EntityId, out_events: &mut Vec<Event>) {
        let (Some(a), Some(b)) = (self.entity(first), self.entity(second)) else {
            return;
        };
        if !a.alive || !b.alive || !may_contact(a.collision(), b.collision()) {
            return;
        }

        match (a.kind, b.kind) {
            (EntityKind::Projectile, _) => self.projectile_hit(first, second, out_events),
            (_, EntityKind::Projectile) => self.projectile_hit(second, first, out_events),
            (EntityKind::Task, EntityKind::Unit(kind)) if kind.is_hero() => {
                self.collect_task(first, out_events);
            }
            (EntityKind::Unit(kind), EntityKind::Task) if kind.is_hero() => {
                self.collect_task(second, out_events);
            }
            _ => {}
        }
    }

    fn projectile_hit(&mut self, projectile: EntityId, target: EntityId, out_events: &mut Vec<Event>) {
        let Some((faction, damage)) = self
            .entity(projectile)
            .map(|entity| (entity.faction, entity.attack))
        else {
            return;
        };
        if self.valid_target(faction, target).is_none() {
            return;
        }

        out_events.push(Event::ProjectileHit { projectile, target });
        self.damage(target, damage, out_events);
        self.purge(&[projectile], out_events);
    }

    fn collect_task(&mut self, task: EntityId, out_events: &mut Vec<Event>) {
        if self.status.is_terminal() {
            return;
        }
        let Some(entity) = self.entity(task) else {
            return;
        };
        if !entity.alive || entity.kind != EntityKind::Task {
            return;
        }

        let bonus = self.settings.task_mana_bonus;
        let balance = self.mana.credit(bonus);
        debug!(task = task.get(), balance, "task collected");
        out_events.push(Event::TaskCollected { task, bonus });
        out_events.push(Event::ManaChanged { balance });
        self.purge(&[task], out_events);
    }

    /// Removes health from a unit or stronghold; the only path that lowers health.
    fn damage(&mut self, target: EntityId, amount: u32, out_events: &mut Vec<Event>) {
        let Some(entity) = self.entity_mut(target) else {
            return;
        };
        if !entity.is_attackable() {
            return;
        }

        entity.health = entity.health.damaged(amount);
        let remaining = entity.health;
        out_events.push(Event::EntityDamaged {
            entity: target,
            amount,
            remaining,
        });

        if remaining.is_depleted() {
            entity.alive = false;
            debug!(entity = target.get(), kind = ?entity.kind, "entity died");
            out_events.push(Event::EntityDied { entity: target });
        }
    }

    fn evaluate_match(&mut self, out_events: &mut Vec<Event>) {
        if self.status.is_terminal() {
            return;
        }

        let status = MatchStatus::from_strongholds(
            self.stronghold_health(self.player_stronghold),
            self.stronghold_health(self.enemy_stronghold),
        );
        if status.is_terminal() {
            self.status = status;
            info!(?status, frame = self.frame, "match concluded");
            out_events.push(Event::MatchConcluded { status });
        }
    }

    fn remove_dead(&mut self, out_events: &mut Vec<Event>) {
        let dead: Vec<EntityId> = self
            .entities
            .iter()
            // Fallen strongholds stay on the board; the match status reports them.
            .filter(|entity| !entity.alive && entity.kind != EntityKind::Stronghold)
            .map(|entity| entity.id)
            .collect();
        self.purge(&dead, out_events);
    }

    fn purge(&mut self, ids: &[EntityId], out_events: &mut Vec<Event>) {
        if ids.is_empty() {
            return;
        }
        self.entities.retain(|entity| !ids.contains(&entity.id));
        for id in ids {
            debug!(entity = id.get(), "entity removed");
            out_events.push(Event::EntityRemoved { entity: *id });
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(MatchSettings::default())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::AdvanceFrame => world.advance_frame(out_events),
        Command::SpawnHero {
            kind,
            tile,
            faction,
        } => {
            let _ = spawn_hero(world, kind, tile, faction, out_events);
        }
        Command::SpawnMonster { tile } => world.spawn_monster(tile, out_events),
        Command::SpawnTask => world.spawn_task(out_events),
        Command::MoveEntity { entity, to } => world.move_entity(entity, to, out_events),
        Command::Strike { attacker, target } => world.strike(attacker, target, out_events),
        Command::LaunchProjectile { attacker, target } => {
            world.launch_projectile(attacker, target, out_events);
        }
        Command::ResolveContact { first, second } => {
            world.resolve_contact(first, second, out_events);
        }
        Command::CollectTask { task } => world.collect_task(task, out_events),
        Command::InflictDamage { target, amount } => {
            world.damage(target, amount, out_events);
        }
        Command::EvaluateMatch => world.evaluate_match(out_events),
        Command::RemoveDead => world.remove_dead(out_events),
    }
}

/// Spends mana and places a hero, reporting the outcome to the caller.
///
/// The mana check and deduction happen in one step. A rejected request
/// creates no entity and leaves the balance untouched; it is still broadcast
/// as [`Event::SpawnRejected`].
pub fn spawn_hero(
    world: &mut World,
    kind: UnitKind,
    tile: TilePosition,
    faction: Faction,
    out_events: &mut Vec<Event>,
) -> Result<EntityId, SpawnError> {
    match world.try_spawn_hero(kind, tile, faction) {
        Ok((entity, position, balance)) => {
            debug!(entity = entity.get(), ?kind, balance, "hero spawned");
            out_events.push(Event::ManaChanged { balance });
            out_events.push(Event::HeroSpawned {
                entity,
                kind,
                position,
            });
            Ok(entity)
        }
        Err(reason) => {
            warn!(?kind, column = tile.column(), row = tile.row(), %reason, "hero spawn rejected");
            out_events.push(Event::SpawnRejected { kind, tile, reason });
            Err(reason)
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::World;
    use siege_lanes_core::{
        EntityId, EntitySnapshot, EntityView, MatchSnapshot, MatchStatus, TileGrid,
    };

    /// Provides read-only access to the tile grid definition.
    #[must_use]
    pub fn tile_grid(world: &World) -> &TileGrid {
        &world.settings.grid
    }

    /// Current player mana balance.
    #[must_use]
    pub fn mana(world: &World) -> u32 {
        world.mana.balance()
    }

    /// Current match status.
    #[must_use]
    pub fn status(world: &World) -> MatchStatus {
        world.status
    }

    /// Frames advanced since the match began.
    #[must_use]
    pub fn frame(world: &World) -> u64 {
        world.frame
    }

    /// Simulated time elapsed since the match began.
    #[must_use]
    pub fn now(world: &World) -> Duration {
        world.now()
    }

    /// Identifier of the player's stronghold.
    #[must_use]
    pub fn player_stronghold(world: &World) -> EntityId {
        world.player_stronghold
    }

    /// Identifier of the enemy's stronghold.
    #[must_use]
    pub fn enemy_stronghold(world: &World) -> EntityId {
        world.enemy_stronghold
    }

    /// Captures a snapshot of a single entity.
    #[must_use]
    pub fn entity(world: &World, id: EntityId) -> Option<EntitySnapshot> {
        world.entity(id).map(super::Entity::snapshot)
    }

    /// Captures a read-only view of every entity in the live set.
    #[must_use]
    pub fn entity_view(world: &World) -> EntityView {
        EntityView::from_snapshots(world.entities.iter().map(super::Entity::snapshot).collect())
    }

    /// Summarises the values shown by the match HUD.
    #[must_use]
    pub fn match_snapshot(world: &World) -> MatchSnapshot {
        MatchSnapshot {
            status: world.status,
            mana: world.mana.balance(),
            player_stronghold: world.stronghold_health(world.player_stronghold),
            enemy_stronghold: world.stronghold_health(world.enemy_stronghold),
            frame: world.frame,
            time_left: world.settings.match_duration.saturating_sub(world.now()),
        }
    }
}

#[derive(Clone, Debug)]
struct Entity {
    id: EntityId,
    kind: EntityKind,
    faction: Faction,
    position: Vec2,
    velocity: Vec2,
    health: Health,
    attack: u32,
    body: BodySize,
    alive: bool,
    state: EntityState,
}

impl Entity {
    fn is_attackable(&self) -> bool {
        self.alive
            && !self.health.is_depleted()
            && matches!(self.kind, EntityKind::Unit(_) | EntityKind::Stronghold)
    }

    fn collision(&self) -> CollisionProfile {
        CollisionProfile::for_entity(self.kind, self.faction)
    }

    fn snapshot(&self) -> EntitySnapshot {
        let last_attack = match self.state {
            EntityState::Unit { last_attack } => last_attack,
            _ => None,
        };
        EntitySnapshot {
            id: self.id,
            kind: self.kind,
            faction: self.faction,
            position: to_point(self.position),
            velocity: to_point(self.velocity),
            health: self.health,
            attack: self.attack,
            body: self.body,
            collision: self.collision(),
            last_attack,
            alive: self.alive,
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum EntityState {
    Unit {
        last_attack: Option<Duration>,
    },
    Stronghold,
    Projectile {
        origin: Vec2,
        max_range: f32,
        frames_in_flight: u32,
    },
    Task,
}

#[derive(Clone, Copy, Debug)]
struct ReadyAttacker {
    kind: UnitKind,
    faction: Faction,
    attack: u32,
    position: Vec2,
}

fn to_vec(point: WorldPoint) -> Vec2 {
    Vec2::new(point.x, point.y)
}

fn to_point(vector: Vec2) -> WorldPoint {
    WorldPoint::new(vector.x, vector.y)
}
