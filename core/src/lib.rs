#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Siege Lanes engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative match world, and pure systems. Adapters and the scheduler
//! submit [`Command`] values describing desired mutations, the world executes
//! those commands via its `apply` entry point, and then broadcasts [`Event`]
//! values describing what changed. Systems read immutable [`EntityView`]
//! snapshots and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of render frames that elapse per second of simulated time.
pub const FRAMES_PER_SECOND: u32 = 60;

const FRAME_NANOS: u64 = 16_666_667;

/// Duration of a single fixed frame.
pub const FRAME_DURATION: Duration = Duration::from_nanos(FRAME_NANOS);

/// Number of frames between two consecutive logic ticks.
pub const FRAMES_PER_LOGIC_TICK: u64 = 30;

/// Simulated time covered by a single logic tick.
pub const LOGIC_TICK_DURATION: Duration =
    Duration::from_nanos(FRAME_NANOS * FRAMES_PER_LOGIC_TICK);

/// Logic tick period of the collectible spawn cadence.
///
/// A collectible appears on every logic tick whose index satisfies
/// `tick_index % TASK_SPAWN_PERIOD == 1`.
pub const TASK_SPAWN_PERIOD: u64 = 8;

/// Speed of a launched projectile in world units per second.
pub const PROJECTILE_SPEED: f32 = 500.0;

/// Distance a projectile may travel from its origin before it despawns.
pub const PROJECTILE_MAX_RANGE: f32 = 800.0;

/// Collision footprint of a projectile.
pub const PROJECTILE_BODY: BodySize = BodySize::new(20.0, 5.0);

/// Height of a stronghold measured in tiles.
pub const STRONGHOLD_HEIGHT_IN_TILES: f32 = 5.0;

/// Returns the simulated time at the end of the provided frame.
#[must_use]
pub fn frame_time(frame: u64) -> Duration {
    Duration::from_nanos(FRAME_NANOS.saturating_mul(frame))
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the clock by one fixed frame and moves every live projectile.
    AdvanceFrame,
    /// Requests that the economy pay for and place a hero unit.
    SpawnHero {
        /// Hero kind to create.
        kind: UnitKind,
        /// Interior lane tile that receives the hero.
        tile: TilePosition,
        /// Faction requesting the spawn.
        faction: Faction,
    },
    /// Places a monster without charging any resource.
    SpawnMonster {
        /// Interior lane tile that receives the monster.
        tile: TilePosition,
    },
    /// Places a collectible task at its fixed lane position.
    SpawnTask,
    /// Relocates a unit or collectible to a new world position.
    MoveEntity {
        /// Entity being moved.
        entity: EntityId,
        /// Destination expressed in world units.
        to: WorldPoint,
    },
    /// Requests that a melee unit damage the provided target directly.
    Strike {
        /// Unit performing the attack.
        attacker: EntityId,
        /// Opposing unit or stronghold receiving the damage.
        target: EntityId,
    },
    /// Requests that a ranged unit launch a projectile toward the target.
    LaunchProjectile {
        /// Unit launching the projectile.
        attacker: EntityId,
        /// Entity whose direction the projectile is aimed at.
        target: EntityId,
    },
    /// Reports that two bodies touched according to the physics collaborator.
    ResolveContact {
        /// First participant of the contact pair.
        first: EntityId,
        /// Second participant of the contact pair.
        second: EntityId,
    },
    /// Consumes a collectible on behalf of the player.
    CollectTask {
        /// Collectible being consumed.
        task: EntityId,
    },
    /// Applies raw damage to a unit or stronghold, used by scripted scenarios.
    InflictDamage {
        /// Entity receiving the damage.
        target: EntityId,
        /// Amount of health to remove.
        amount: u32,
    },
    /// Checks stronghold health and concludes the match when one has fallen.
    EvaluateMatch,
    /// Removes every entity flagged dead since the previous cleanup.
    RemoveDead,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced by one frame.
    FrameAdvanced {
        /// Frame counter after advancing.
        frame: u64,
    },
    /// Confirms that the economy created a hero.
    HeroSpawned {
        /// Identifier allocated to the hero.
        entity: EntityId,
        /// Kind of hero created.
        kind: UnitKind,
        /// World position of the hero's tile centre.
        position: WorldPoint,
    },
    /// Confirms that a monster entered the board.
    MonsterSpawned {
        /// Identifier allocated to the monster.
        entity: EntityId,
        /// World position of the monster's tile centre.
        position: WorldPoint,
    },
    /// Confirms that a collectible task appeared.
    TaskSpawned {
        /// Identifier allocated to the collectible.
        entity: EntityId,
        /// World position of the collectible.
        position: WorldPoint,
    },
    /// Reports that a hero spawn request was rejected without side effects.
    SpawnRejected {
        /// Kind requested by the caller.
        kind: UnitKind,
        /// Tile requested by the caller.
        tile: TilePosition,
        /// Reason the request failed.
        reason: SpawnError,
    },
    /// Reports the player's mana balance after it changed.
    ManaChanged {
        /// Balance after the change.
        balance: u32,
    },
    /// Confirms that an entity moved.
    EntityMoved {
        /// Entity that moved.
        entity: EntityId,
        /// Position before the move.
        from: WorldPoint,
        /// Position after the move.
        to: WorldPoint,
    },
    /// Confirms a direct melee attack.
    UnitAttacked {
        /// Unit that attacked.
        attacker: EntityId,
        /// Entity that was hit.
        target: EntityId,
    },
    /// Reports that an entity lost health.
    EntityDamaged {
        /// Entity that lost health.
        entity: EntityId,
        /// Damage requested by the source.
        amount: u32,
        /// Health remaining after the damage, floored at zero.
        remaining: Health,
    },
    /// Confirms that a ranged unit launched a projectile.
    ProjectileLaunched {
        /// Identifier allocated to the projectile.
        projectile: EntityId,
        /// Unit that launched it.
        attacker: EntityId,
        /// Entity the projectile was aimed at.
        target: EntityId,
    },
    /// Reports that a projectile struck an eligible opponent.
    ProjectileHit {
        /// Projectile that struck.
        projectile: EntityId,
        /// Entity that was struck.
        target: EntityId,
    },
    /// Reports that a projectile reached its maximum range without contact.
    ProjectileExpired {
        /// Projectile that expired.
        projectile: EntityId,
    },
    /// Reports that the player consumed a collectible.
    TaskCollected {
        /// Collectible that was consumed.
        task: EntityId,
        /// Mana granted to the player.
        bonus: u32,
    },
    /// Reports that an entity was flagged dead and awaits cleanup.
    EntityDied {
        /// Entity that died.
        entity: EntityId,
    },
    /// Reports that an entity left the live set; adapters detach its render handle.
    EntityRemoved {
        /// Entity that was removed.
        entity: EntityId,
    },
    /// Announces that the match entered a terminal state.
    MatchConcluded {
        /// Terminal status reached.
        status: MatchStatus,
    },
}

/// Ownership grouping that determines valid attack targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    /// Defending side controlled by the player.
    Player,
    /// Attacking side driven by fixed spawn routines.
    Enemy,
    /// Entities that belong to neither side, such as collectibles.
    Neutral,
}

impl Faction {
    /// Reports whether entities of the two factions may attack one another.
    #[must_use]
    pub const fn opposes(self, other: Faction) -> bool {
        matches!(
            (self, other),
            (Faction::Player, Faction::Enemy) | (Faction::Enemy, Faction::Player)
        )
    }

    /// Horizontal direction of travel along a lane, `+1` toward the enemy side.
    #[must_use]
    pub const fn lane_direction(self) -> f32 {
        match self {
            Faction::Player => 1.0,
            Faction::Enemy => -1.0,
            Faction::Neutral => 0.0,
        }
    }
}

/// Unique identifier assigned to an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Integer health value that never drops below zero.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Health(u32);

impl Health {
    /// Creates a health value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the remaining hit points.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Reports whether no hit points remain.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.0 == 0
    }

    /// Returns the health left after removing `amount`, floored at zero.
    #[must_use]
    pub const fn damaged(self, amount: u32) -> Self {
        Self(self.0.saturating_sub(amount))
    }
}

/// How a unit delivers its attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackStyle {
    /// Damage lands on the target immediately.
    Melee,
    /// A projectile carries the damage and applies it on contact.
    Ranged,
}

/// Base statistics shared by every unit of a kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitStats {
    /// Mana the economy charges to spawn the unit; zero for monsters.
    pub mana_cost: u32,
    /// Starting health.
    pub health: u32,
    /// Damage dealt per attack.
    pub attack: u32,
    /// Lane movement speed in world units per second.
    pub speed: f32,
    /// Maximum distance between positions at which the unit may attack.
    pub attack_range: f32,
    /// Minimum simulated time between two attacks.
    pub attack_cooldown: Duration,
    /// Delivery method for the unit's attack.
    pub style: AttackStyle,
}

/// Reach shared by every unit kind. A unit on the outermost lane still
/// reaches the centre of a five-tile stronghold from the board edge.
const ATTACK_RANGE: f32 = 500.0;

/// Unit sub-types available to both factions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    /// Melee hero with balanced statistics.
    Swordsman,
    /// Ranged hero that launches arrows.
    Archer,
    /// Durable hero with a weak attack.
    Tank,
    /// Monster that marches on the player's stronghold.
    Titan,
}

impl UnitKind {
    /// Looks up the fixed stat and cost table entry for the kind.
    #[must_use]
    pub const fn stats(self) -> UnitStats {
        match self {
            UnitKind::Swordsman => UnitStats {
                mana_cost: 10,
                health: 100,
                attack: 10,
                speed: 30.0,
                attack_range: ATTACK_RANGE,
                attack_cooldown: Duration::from_secs(1),
                style: AttackStyle::Melee,
            },
            UnitKind::Archer => UnitStats {
                mana_cost: 15,
                health: 60,
                attack: 8,
                speed: 25.0,
                attack_range: ATTACK_RANGE,
                attack_cooldown: Duration::from_secs(1),
                style: AttackStyle::Ranged,
            },
            UnitKind::Tank => UnitStats {
                mana_cost: 20,
                health: 200,
                attack: 2,
                speed: 20.0,
                attack_range: ATTACK_RANGE,
                attack_cooldown: Duration::from_secs(1),
                style: AttackStyle::Melee,
            },
            UnitKind::Titan => UnitStats {
                mana_cost: 0,
                health: 100,
                attack: 20,
                speed: 40.0,
                attack_range: ATTACK_RANGE,
                attack_cooldown: Duration::from_secs(2),
                style: AttackStyle::Melee,
            },
        }
    }

    /// Faction that fields units of this kind.
    #[must_use]
    pub const fn faction(self) -> Faction {
        match self {
            UnitKind::Swordsman | UnitKind::Archer | UnitKind::Tank => Faction::Player,
            UnitKind::Titan => Faction::Enemy,
        }
    }

    /// Reports whether the kind is a hero created through the economy.
    #[must_use]
    pub const fn is_hero(self) -> bool {
        matches!(self.faction(), Faction::Player)
    }

    /// Collision category assigned to units of this kind.
    #[must_use]
    pub const fn category(self) -> CollisionCategory {
        match self {
            UnitKind::Swordsman => CollisionCategory::SWORDSMAN,
            UnitKind::Archer => CollisionCategory::ARCHER,
            UnitKind::Tank => CollisionCategory::TANK,
            UnitKind::Titan => CollisionCategory::TITAN,
        }
    }

    /// Parses a lowercase kind name such as `"archer"`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "swordsman" => Some(UnitKind::Swordsman),
            "archer" => Some(UnitKind::Archer),
            "tank" => Some(UnitKind::Tank),
            "titan" => Some(UnitKind::Titan),
            _ => None,
        }
    }
}

/// Variant tag carried by every entity record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// A hero or monster.
    Unit(UnitKind),
    /// A faction's stronghold.
    Stronghold,
    /// A projectile in flight.
    Projectile,
    /// A periodic collectible granting mana.
    Task,
}

/// Disjoint bit flag identifying what an entity is for contact filtering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollisionCategory(u32);

impl CollisionCategory {
    /// Swordsman heroes.
    pub const SWORDSMAN: Self = Self(1 << 0);
    /// Archer heroes.
    pub const ARCHER: Self = Self(1 << 1);
    /// Tank heroes.
    pub const TANK: Self = Self(1 << 2);
    /// Titan monsters.
    pub const TITAN: Self = Self(1 << 3);
    /// The player's stronghold.
    pub const PLAYER_STRONGHOLD: Self = Self(1 << 4);
    /// The enemy's stronghold.
    pub const ENEMY_STRONGHOLD: Self = Self(1 << 5);
    /// Projectiles in flight.
    pub const PROJECTILE: Self = Self(1 << 6);
    /// Collectible tasks.
    pub const TASK: Self = Self(1 << 7);

    /// Raw bit representation of the category.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }
}

/// Union of categories an entity may register contact against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContactMask(u32);

impl ContactMask {
    /// Mask that matches nothing.
    pub const NONE: Self = Self(0);
    /// Every hero category.
    pub const HEROES: Self = Self(
        CollisionCategory::SWORDSMAN.bits()
            | CollisionCategory::ARCHER.bits()
            | CollisionCategory::TANK.bits(),
    );
    /// Every monster category.
    pub const MONSTERS: Self = Self(CollisionCategory::TITAN.bits());

    /// Builds a mask from a list of categories.
    #[must_use]
    pub const fn of(categories: &[CollisionCategory]) -> Self {
        let mut bits = 0;
        let mut index = 0;
        while index < categories.len() {
            bits |= categories[index].bits();
            index += 1;
        }
        Self(bits)
    }

    /// Returns the union of two masks.
    #[must_use]
    pub const fn union(self, other: ContactMask) -> Self {
        Self(self.0 | other.0)
    }

    /// Reports whether the mask includes the provided category.
    #[must_use]
    pub const fn includes(self, category: CollisionCategory) -> bool {
        self.0 & category.bits() != 0
    }

    /// Raw bit representation of the mask.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }
}

/// Category and contact mask pair attached to an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollisionProfile {
    /// What the entity is.
    pub category: CollisionCategory,
    /// What the entity listens for.
    pub contact_mask: ContactMask,
}

impl CollisionProfile {
    /// Resolves the collision profile for an entity of the given kind and faction.
    #[must_use]
    pub const fn for_entity(kind: EntityKind, faction: Faction) -> Self {
        match kind {
            EntityKind::Unit(unit) => {
                let contact_mask = if unit.is_hero() {
                    ContactMask::MONSTERS.union(ContactMask::of(&[
                        CollisionCategory::ENEMY_STRONGHOLD,
                        CollisionCategory::TASK,
                    ]))
                } else {
                    ContactMask::HEROES
                        .union(ContactMask::of(&[CollisionCategory::PLAYER_STRONGHOLD]))
                };
                Self {
                    category: unit.category(),
                    contact_mask,
                }
            }
            EntityKind::Stronghold => Self {
                category: match faction {
                    Faction::Player => CollisionCategory::PLAYER_STRONGHOLD,
                    _ => CollisionCategory::ENEMY_STRONGHOLD,
                },
                contact_mask: ContactMask::NONE,
            },
            EntityKind::Projectile => Self {
                category: CollisionCategory::PROJECTILE,
                contact_mask: match faction {
                    Faction::Player => ContactMask::MONSTERS
                        .union(ContactMask::of(&[CollisionCategory::ENEMY_STRONGHOLD])),
                    Faction::Enemy => ContactMask::HEROES
                        .union(ContactMask::of(&[CollisionCategory::PLAYER_STRONGHOLD])),
                    Faction::Neutral => ContactMask::NONE,
                },
            },
            EntityKind::Task => Self {
                category: CollisionCategory::TASK,
                contact_mask: ContactMask::HEROES,
            },
        }
    }
}

/// Reports whether two bodies are permitted to register contact.
///
/// Contact is allowed when either side's mask includes the other's category.
#[must_use]
pub const fn may_contact(first: CollisionProfile, second: CollisionProfile) -> bool {
    first.contact_mask.includes(second.category) || second.contact_mask.includes(first.category)
}

/// Location of a single tile expressed as column and row indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TilePosition {
    column: u32,
    row: u32,
}

impl TilePosition {
    /// Creates a new tile position.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Position in continuous world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl WorldPoint {
    /// Creates a new world point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: WorldPoint) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Width and height of a collision body in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BodySize {
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl BodySize {
    /// Creates a new body size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Index within the tile grid measured in whole tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord(u32);

impl TileCoord {
    /// Creates a new tile coordinate wrapper.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the underlying tile index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Describes the discrete tile layout of the board.
#[derive(Clone, Debug, PartialEq)]
pub struct TileGrid {
    columns: TileCoord,
    rows: TileCoord,
    board: BodySize,
}

impl TileGrid {
    /// Creates a tile grid covering a board of the provided world size.
    #[must_use]
    pub const fn new(columns: TileCoord, rows: TileCoord, board: BodySize) -> Self {
        Self {
            columns,
            rows,
            board,
        }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> TileCoord {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> TileCoord {
        self.rows
    }

    /// Total world size of the board.
    #[must_use]
    pub const fn board(&self) -> BodySize {
        self.board
    }

    /// World-unit size of a single tile.
    ///
    /// Width divides the board width by the column count and height divides
    /// the board height by the row count. An empty axis yields zero.
    #[must_use]
    pub fn tile_size(&self) -> BodySize {
        let width = if self.columns.get() == 0 {
            0.0
        } else {
            self.board.width / self.columns.get() as f32
        };
        let height = if self.rows.get() == 0 {
            0.0
        } else {
            self.board.height / self.rows.get() as f32
        };
        BodySize::new(width, height)
    }

    /// Converts a tile position into the world position of its centre.
    #[must_use]
    pub fn tile_center(&self, tile: TilePosition) -> WorldPoint {
        self.tile_point(tile.column() as f32 + 0.5, tile.row() as f32 + 0.5)
    }

    /// Converts fractional tile coordinates into a world position.
    #[must_use]
    pub fn tile_point(&self, column: f32, row: f32) -> WorldPoint {
        let size = self.tile_size();
        WorldPoint::new(column * size.width, row * size.height)
    }

    /// Reports whether the tile lies within the interior lanes open to spawns.
    ///
    /// Boundary columns and the top rows are reserved, so placement requires
    /// `0 < column < columns - 1` and `1 < row < rows`.
    #[must_use]
    pub const fn is_spawn_lane(&self, tile: TilePosition) -> bool {
        let columns = self.columns.get();
        let rows = self.rows.get();
        tile.column() > 0
            && tile.column().saturating_add(1) < columns
            && tile.row() > 1
            && tile.row() < rows
    }
}

/// Reasons a hero spawn request may be rejected.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpawnError {
    /// The mana balance cannot cover the unit's cost.
    #[error("insufficient mana: {required} required, {available} available")]
    InsufficientResource {
        /// Cost of the requested unit.
        required: u32,
        /// Balance at the time of the request.
        available: u32,
    },
    /// The requested tile lies outside the interior spawn lanes.
    #[error("tile ({column}, {row}) is outside the interior spawn lanes")]
    InvalidPlacement {
        /// Requested column.
        column: u32,
        /// Requested row.
        row: u32,
    },
    /// The requested kind cannot be fielded through the economy by this faction.
    #[error("{kind:?} cannot be spawned by the {faction:?} economy")]
    FactionMismatch {
        /// Requested kind.
        kind: UnitKind,
        /// Requesting faction.
        faction: Faction,
    },
    /// The match has already been decided.
    #[error("the match has already concluded")]
    MatchConcluded,
}

/// Lifecycle of a single match.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchStatus {
    /// Both strongholds stand; the scheduler keeps advancing.
    #[default]
    InProgress,
    /// The enemy stronghold fell while the player's stood.
    PlayerWon,
    /// The player's stronghold fell.
    PlayerLost,
}

impl MatchStatus {
    /// Reports whether the status is terminal.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, MatchStatus::InProgress)
    }

    /// Derives the status implied by the two strongholds' health.
    ///
    /// A fallen player stronghold takes priority, so a simultaneous fall is a
    /// loss.
    #[must_use]
    pub const fn from_strongholds(player: Health, enemy: Health) -> Self {
        if player.is_depleted() {
            MatchStatus::PlayerLost
        } else if enemy.is_depleted() {
            MatchStatus::PlayerWon
        } else {
            MatchStatus::InProgress
        }
    }
}

/// Immutable representation of a single entity's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct EntitySnapshot {
    /// Unique identifier assigned to the entity.
    pub id: EntityId,
    /// Variant tag of the entity.
    pub kind: EntityKind,
    /// Owning faction.
    pub faction: Faction,
    /// Current position in world units.
    pub position: WorldPoint,
    /// Current velocity in world units per second.
    pub velocity: WorldPoint,
    /// Remaining health; always zero for collectibles and projectiles.
    pub health: Health,
    /// Damage dealt by attacks or carried by a projectile.
    pub attack: u32,
    /// Collision footprint centred on the position.
    pub body: BodySize,
    /// Collision category and contact mask.
    pub collision: CollisionProfile,
    /// Simulated time of the unit's most recent attack, if any.
    pub last_attack: Option<Duration>,
    /// Whether the entity still participates in ticks.
    pub alive: bool,
}

impl EntitySnapshot {
    /// Unit kind when the entity is a hero or monster.
    #[must_use]
    pub const fn unit_kind(&self) -> Option<UnitKind> {
        match self.kind {
            EntityKind::Unit(kind) => Some(kind),
            _ => None,
        }
    }

    /// Reports whether the entity is a live unit or stronghold with health left.
    #[must_use]
    pub const fn is_attackable(&self) -> bool {
        self.alive
            && !self.health.is_depleted()
            && matches!(self.kind, EntityKind::Unit(_) | EntityKind::Stronghold)
    }
}

/// Read-only snapshot describing all live entities.
#[derive(Clone, Debug, Default)]
pub struct EntityView {
    snapshots: Vec<EntitySnapshot>,
}

impl EntityView {
    /// Creates a new entity view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EntitySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in ascending identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &EntitySnapshot> {
        self.snapshots.iter()
    }

    /// Looks up a snapshot by identifier.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&EntitySnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of captured snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EntitySnapshot> {
        self.snapshots
    }
}

/// Read-only summary of the match values displayed by presentation layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchSnapshot {
    /// Current match status.
    pub status: MatchStatus,
    /// Player mana balance.
    pub mana: u32,
    /// Health of the player's stronghold.
    pub player_stronghold: Health,
    /// Health of the enemy's stronghold.
    pub enemy_stronghold: Health,
    /// Frames advanced since the match began.
    pub frame: u64,
    /// Countdown shown on the match timer.
    pub time_left: Duration,
}
