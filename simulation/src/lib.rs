#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-step scheduler and external interface of a Siege Lanes match.
//!
//! [`Simulation`] owns one [`World`] together with the pure systems that
//! drive it. Presentation layers call [`Simulation::advance`] once per fixed
//! frame, submit spawn requests through [`Simulation::try_spawn_hero`], and
//! read state through the snapshot accessors. Nothing here blocks or touches
//! the wall clock.

mod config;

pub use config::{ConfigError, SimulationConfig};

use siege_lanes_core::{
    Command, EntityId, EntityView, Event, Faction, MatchSnapshot, MatchStatus, SpawnError,
    TileGrid, TilePosition, UnitKind, FRAMES_PER_LOGIC_TICK,
};
use siege_lanes_system_combat::Combat;
use siege_lanes_system_contact::ContactDetector;
use siege_lanes_system_movement::Movement;
use siege_lanes_system_spawning::Spawning;
use siege_lanes_world::{self as world, query, World};
use tracing::{debug, info};

/// Faction whose units act on the provided logic tick.
///
/// Heroes act on odd ticks and monsters on even ticks.
#[must_use]
pub const fn active_faction(tick_index: u64) -> Faction {
    if tick_index % 2 == 1 {
        Faction::Player
    } else {
        Faction::Enemy
    }
}

/// A running match and the systems that advance it.
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    world: World,
    combat: Combat,
    movement: Movement,
    spawning: Spawning,
    contact: ContactDetector,
    events: Vec<Event>,
    commands: Vec<Command>,
}

impl Simulation {
    /// Starts a new match described by the provided configuration.
    #[must_use]
    pub fn new(config: SimulationConfig) -> Self {
        let mut simulation = Self {
            world: World::new(config.match_settings()),
            combat: Combat::new(),
            movement: Movement::new(),
            spawning: Spawning::new(config.spawning()),
            contact: ContactDetector::new(),
            events: Vec::new(),
            commands: Vec::new(),
            config,
        };
        simulation.open();
        simulation
    }

    fn open(&mut self) {
        self.spawning
            .opening(query::tile_grid(&self.world), &mut self.commands);
        self.flush();
    }

    /// Advances the match by one fixed frame.
    ///
    /// Projectiles move and contacts resolve on every frame. Every
    /// [`FRAMES_PER_LOGIC_TICK`]th frame also runs a logic tick: combat and
    /// movement for the active faction, the spawn cadences, match evaluation
    /// and dead-entity cleanup, in that order. Once the match has concluded
    /// this is a no-op.
    pub fn advance(&mut self) {
        self.events.clear();
        if query::status(&self.world).is_terminal() {
            return;
        }

        world::apply(&mut self.world, Command::AdvanceFrame, &mut self.events);
        self.resolve_contacts();

        let frame = query::frame(&self.world);
        if frame % FRAMES_PER_LOGIC_TICK == 0 {
            self.logic_tick(frame / FRAMES_PER_LOGIC_TICK);
        }
    }

    fn resolve_contacts(&mut self) {
        self.contact
            .handle(&query::entity_view(&self.world), &mut self.commands);
        self.flush();
    }

    fn logic_tick(&mut self, tick_index: u64) {
        let active = active_faction(tick_index);
        debug!(tick_index, ?active, "logic tick");

        self.combat.handle(
            active,
            &query::entity_view(&self.world),
            query::now(&self.world),
            &mut self.commands,
        );
        self.flush();

        self.movement.handle(
            active,
            &query::entity_view(&self.world),
            query::tile_grid(&self.world),
            &mut self.commands,
        );
        self.flush();

        self.spawning
            .handle(tick_index, query::tile_grid(&self.world), &mut self.commands);
        self.commands.push(Command::EvaluateMatch);
        self.commands.push(Command::RemoveDead);
        self.flush();
    }

    fn flush(&mut self) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
    }

    /// Pays for and places a hero on the tile at `column`, `row`.
    ///
    /// A rejected request leaves the entity set and mana untouched. Once the
    /// match has concluded every request fails with
    /// [`SpawnError::MatchConcluded`].
    pub fn try_spawn_hero(
        &mut self,
        kind: UnitKind,
        column: u32,
        row: u32,
        faction: Faction,
    ) -> Result<EntityId, SpawnError> {
        self.events.clear();
        world::spawn_hero(
            &mut self.world,
            kind,
            TilePosition::new(column, row),
            faction,
            &mut self.events,
        )
    }

    /// Consumes a collectible on behalf of the player.
    ///
    /// Returns `false` when the identifier does not name a live collectible
    /// or the match has already concluded.
    pub fn collect_task(&mut self, task: EntityId) -> bool {
        self.events.clear();
        world::apply(&mut self.world, Command::CollectTask { task }, &mut self.events);
        self.events.iter().any(|event| {
            matches!(event, Event::TaskCollected { task: collected, .. } if *collected == task)
        })
    }

    /// Applies raw damage to a unit or stronghold, for scripted scenarios.
    pub fn inflict_damage(&mut self, target: EntityId, amount: u32) {
        self.events.clear();
        world::apply(
            &mut self.world,
            Command::InflictDamage { target, amount },
            &mut self.events,
        );
    }

    /// Discards the current match and starts a fresh one from the same configuration.
    pub fn restart(&mut self) {
        info!(
            frame = query::frame(&self.world),
            status = ?query::status(&self.world),
            "restarting match"
        );
        *self = Self::new(self.config.clone());
    }

    /// Events produced by the most recent operation.
    #[must_use]
    pub fn last_events(&self) -> &[Event] {
        &self.events
    }

    /// Snapshot of every entity in the live set.
    #[must_use]
    pub fn entities(&self) -> EntityView {
        query::entity_view(&self.world)
    }

    /// Current player mana balance.
    #[must_use]
    pub fn mana(&self) -> u32 {
        query::mana(&self.world)
    }

    /// Current match status.
    #[must_use]
    pub fn status(&self) -> MatchStatus {
        query::status(&self.world)
    }

    /// Frames advanced since the match began.
    #[must_use]
    pub fn frame(&self) -> u64 {
        query::frame(&self.world)
    }

    /// Values shown by the match HUD.
    #[must_use]
    pub fn match_snapshot(&self) -> MatchSnapshot {
        query::match_snapshot(&self.world)
    }

    /// Tile layout of the board.
    #[must_use]
    pub fn grid(&self) -> &TileGrid {
        query::tile_grid(&self.world)
    }

    /// Identifier of the player's stronghold.
    #[must_use]
    pub fn player_stronghold(&self) -> EntityId {
        query::player_stronghold(&self.world)
    }

    /// Identifier of the enemy's stronghold.
    #[must_use]
    pub fn enemy_stronghold(&self) -> EntityId {
        query::enemy_stronghold(&self.world)
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}
