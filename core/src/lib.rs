#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Mergeworks engine.
//!
//! This crate defines the data model and message surface that connects
//! adapters, the authoritative world, and the pure rule systems. Adapters
//! submit [`Command`] values describing player intent, the world executes
//! those commands via its `apply` entry point, and then broadcasts [`Event`]
//! values that presentation layers animate. Systems operate on immutable
//! snapshots of the [`Board`] and ledgers defined here and hand back new
//! snapshots instead of mutating shared state.

mod board;
mod config;
mod error;
mod ledger;
mod mission;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use board::Board;
pub use config::{
    AccrualConfig, BoardConfig, GameConfig, GeneratorCost, GeneratorPlacement, LevelCaps,
    LevelChance, OutputTable, MAX_BOARD_CELLS,
};
pub use error::{BoardError, ConfigError, GameError, SecondOutOfRange};
pub use ledger::{ResourceLedger, RewardBundle, RewardLedger};
pub use mission::{Mission, MissionId, MissionState};

/// Number of seconds on the accrual wheel.
pub const SECONDS_PER_MINUTE: u8 = 60;

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Presses a cell: selects its occupant, or activates an already selected generator.
    PressCell {
        /// Cell that received the press.
        cell: CellCoord,
    },
    /// Captures the item at a cell for a pending merge.
    BeginDrag {
        /// Cell holding the item to drag.
        cell: CellCoord,
    },
    /// Updates the hover indicator while a drag is in flight.
    DragOver {
        /// Target currently under the pointer, if any.
        target: Option<DropTarget>,
    },
    /// Releases a dragged item over a target, invoking the merge rules.
    EndDrag {
        /// Token handed out when the drag started.
        token: DragToken,
        /// Target the item was released over.
        target: DropTarget,
    },
    /// Abandons the pending drag without touching the board.
    CancelDrag,
    /// Advances the engine clock to the provided second of the minute.
    Tick {
        /// Wall-clock second observed by the external one-second cadence.
        second: SecondOfMinute,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Announces that an item became the current selection.
    ItemSelected {
        /// Identifier of the selected item.
        item: ItemId,
        /// Cell holding the selected item.
        cell: CellCoord,
    },
    /// Announces that the selection was cleared.
    SelectionCleared,
    /// Confirms that a drag gesture captured an item.
    DragStarted {
        /// Token identifying the dragged item; must be passed back on release.
        token: DragToken,
    },
    /// Reports that the hover indicator moved.
    HoverChanged {
        /// Target now under the pointer, if any.
        target: Option<DropTarget>,
    },
    /// Confirms that a pending drag was abandoned.
    DragCancelled {
        /// Token of the abandoned drag.
        token: DragToken,
    },
    /// Confirms that an item moved into an empty cell.
    ItemMoved {
        /// Identifier of the moved item, unchanged by the move.
        item: ItemId,
        /// Cell the item occupied before moving.
        from: CellCoord,
        /// Cell the item occupies after moving.
        to: CellCoord,
    },
    /// Confirms that two identical items merged into the next level.
    ItemsMerged {
        /// Identifiers of the two items destroyed by the merge.
        consumed: [ItemId; 2],
        /// Item created at the target cell.
        created: Item,
        /// Cell holding the created item.
        cell: CellCoord,
    },
    /// Confirms that two capped elements were transformed into a fresh generator.
    GeneratorForged {
        /// Identifiers of the two elements destroyed by the transformation.
        consumed: [ItemId; 2],
        /// Generator created at the target cell.
        created: Item,
        /// Cell holding the created generator.
        cell: CellCoord,
    },
    /// Confirms that a generator spawned a new element.
    ElementGenerated {
        /// Identifier of the activated generator.
        generator: ItemId,
        /// Element placed on the board.
        item: Item,
        /// Cell the element was placed into.
        cell: CellCoord,
    },
    /// Reports that resources were spent.
    ResourceSpent {
        /// Resource color debited.
        color: ResourceColor,
        /// Amount debited.
        amount: u32,
        /// Balance remaining after the debit.
        balance: u32,
    },
    /// Reports passive income produced by an element.
    ResourceGained {
        /// Element that produced the income.
        item: ItemId,
        /// Resource color credited.
        color: ResourceColor,
        /// Amount credited.
        amount: u32,
        /// Balance after the credit.
        balance: u32,
    },
    /// Indicates that the engine clock advanced.
    TimeAdvanced {
        /// Second of the minute now considered current.
        second: SecondOfMinute,
    },
    /// Reports which items produced income on the latest tick.
    ActiveItemsChanged {
        /// Items that matured on the latest tick, in board order.
        items: Vec<ItemId>,
    },
    /// Confirms that an item left the board for the pit.
    ItemDeposited {
        /// Item placed into the pit.
        item: Item,
        /// Whether the item counted toward the active mission.
        matched: bool,
    },
    /// Reports progress toward one requirement group of the active mission.
    MissionProgressed {
        /// Mission receiving the progress.
        mission: MissionId,
        /// Requirement group that was advanced.
        spec: ItemSpec,
        /// Items of the group delivered so far.
        satisfied: u32,
        /// Items of the group required in total.
        required: u32,
    },
    /// Announces that the active mission is complete.
    MissionCompleted {
        /// Mission that was completed.
        mission: MissionId,
    },
    /// Reports a reward credit.
    RewardGained {
        /// Reward kind credited.
        kind: RewardKind,
        /// Amount credited.
        amount: u32,
        /// Balance after the credit.
        balance: u32,
    },
    /// Announces that a new mission became active.
    MissionActivated {
        /// Mission that became active.
        mission: MissionId,
    },
    /// Reports that a command was rejected and the world left unchanged.
    CommandRejected {
        /// Specific reason the command failed.
        reason: GameError,
    },
}

/// Unique identifier assigned to an item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(u32);

impl ItemId {
    /// Creates a new item identifier with the provided numeric value.
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

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item-{}", self.0)
    }
}

/// Monotonic source of fresh [`ItemId`] values.
///
/// The allocator is `Copy` so a transition can mint identifiers on a scratch
/// copy and commit it only when the whole command succeeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ItemIdAllocator {
    next: u32,
}

impl ItemIdAllocator {
    /// Creates an allocator whose first identifier is `first`.
    #[must_use]
    pub const fn starting_at(first: u32) -> Self {
        Self { next: first }
    }

    /// Returns a fresh identifier and advances the allocator.
    pub fn mint(&mut self) -> ItemId {
        let id = ItemId::new(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }

    /// Identifier that the next call to [`ItemIdAllocator::mint`] will return.
    #[must_use]
    pub const fn peek(&self) -> ItemId {
        ItemId::new(self.next)
    }
}

/// Location of a single board cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new board cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Place an item can be released over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DropTarget {
    /// A cell on the board.
    Cell(CellCoord),
    /// The pit collecting items for the active mission.
    Pit,
}

/// Handle describing a drag gesture in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DragToken {
    item: ItemId,
    origin: CellCoord,
}

impl DragToken {
    /// Creates a token for the item captured at `origin`.
    #[must_use]
    pub const fn new(item: ItemId, origin: CellCoord) -> Self {
        Self { item, origin }
    }

    /// Item captured by the drag.
    #[must_use]
    pub const fn item(&self) -> ItemId {
        self.item
    }

    /// Cell the item was captured from.
    #[must_use]
    pub const fn origin(&self) -> CellCoord {
        self.origin
    }
}

/// Second within a minute (`0..60`), the only clock the engine knows about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SecondOfMinute(u8);

impl SecondOfMinute {
    /// Wraps an arbitrary second count onto the sixty second wheel.
    #[must_use]
    pub const fn wrapping(value: u32) -> Self {
        Self((value % SECONDS_PER_MINUTE as u32) as u8)
    }

    /// Retrieves the second in `0..60`.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Seconds elapsed on the wheel since `earlier`, wrapping through zero.
    #[must_use]
    pub const fn since(self, earlier: SecondOfMinute) -> u8 {
        (self.0 + SECONDS_PER_MINUTE - earlier.0) % SECONDS_PER_MINUTE
    }
}

impl TryFrom<u8> for SecondOfMinute {
    type Error = SecondOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value < SECONDS_PER_MINUTE {
            Ok(Self(value))
        } else {
            Err(SecondOutOfRange { value })
        }
    }
}

impl From<SecondOfMinute> for u8 {
    fn from(second: SecondOfMinute) -> Self {
        second.0
    }
}

impl fmt::Display for SecondOfMinute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{:02}", self.0)
    }
}

/// Broad category of an item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Spawns elements when activated.
    Generator,
    /// Produces passive income and merges up to the tier cap.
    Element,
    /// Collectible resource token with plain merge behavior.
    Resource,
}

/// Resource colors tracked by the [`ResourceLedger`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceColor {
    /// Blue resource.
    Blue,
    /// Red resource.
    Red,
    /// Gray resource.
    Gray,
}

impl ResourceColor {
    /// Every resource color in ledger order.
    pub const ALL: [ResourceColor; 3] = [Self::Blue, Self::Red, Self::Gray];

    /// Color of the generator forged from two capped elements of this color.
    ///
    /// The mapping is fixed: blue yields red, red yields gray, gray yields red.
    #[must_use]
    pub const fn forged_generator_color(self) -> Self {
        match self {
            Self::Blue => Self::Red,
            Self::Red => Self::Gray,
            Self::Gray => Self::Red,
        }
    }
}

/// Reward kinds tracked by the [`RewardLedger`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardKind {
    /// Black square reward.
    BlackSquare,
    /// Orange triangle reward.
    OrangeTriangle,
}

impl RewardKind {
    /// Every reward kind in ledger order.
    pub const ALL: [RewardKind; 2] = [Self::BlackSquare, Self::OrangeTriangle];
}

/// Identity-free description of an item used for matching.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemSpec {
    /// Category of the item.
    pub kind: ItemKind,
    /// Level of the item.
    pub level: u8,
    /// Resource color of the item, if it carries one.
    #[serde(default)]
    pub color: Option<ResourceColor>,
}

impl ItemSpec {
    /// Creates a spec with an explicit color.
    #[must_use]
    pub const fn new(kind: ItemKind, level: u8, color: ResourceColor) -> Self {
        Self {
            kind,
            level,
            color: Some(color),
        }
    }
}

/// An item occupying a board cell.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    id: ItemId,
    kind: ItemKind,
    level: u8,
    color: Option<ResourceColor>,
    placed_at: SecondOfMinute,
}

impl Item {
    /// Creates a generator of the provided level and color.
    #[must_use]
    pub const fn generator(
        id: ItemId,
        level: u8,
        color: ResourceColor,
        placed_at: SecondOfMinute,
    ) -> Self {
        Self::from_spec(id, ItemSpec::new(ItemKind::Generator, level, color), placed_at)
    }

    /// Creates an element of the provided level and color.
    #[must_use]
    pub const fn element(
        id: ItemId,
        level: u8,
        color: ResourceColor,
        placed_at: SecondOfMinute,
    ) -> Self {
        Self::from_spec(id, ItemSpec::new(ItemKind::Element, level, color), placed_at)
    }

    /// Creates an item matching `spec`.
    ///
    /// Levels below one are raised to one.
    #[must_use]
    pub const fn from_spec(id: ItemId, spec: ItemSpec, placed_at: SecondOfMinute) -> Self {
        Self {
            id,
            kind: spec.kind,
            level: if spec.level == 0 { 1 } else { spec.level },
            color: spec.color,
            placed_at,
        }
    }

    /// Identifier of the item.
    #[must_use]
    pub const fn id(&self) -> ItemId {
        self.id
    }

    /// Category of the item.
    #[must_use]
    pub const fn kind(&self) -> ItemKind {
        self.kind
    }

    /// Level of the item, always at least one.
    #[must_use]
    pub const fn level(&self) -> u8 {
        self.level
    }

    /// Resource color of the item, if it carries one.
    #[must_use]
    pub const fn color(&self) -> Option<ResourceColor> {
        self.color
    }

    /// Second of the minute the item appeared on the board.
    #[must_use]
    pub const fn placed_at(&self) -> SecondOfMinute {
        self.placed_at
    }

    /// Identity-free description of the item.
    #[must_use]
    pub const fn spec(&self) -> ItemSpec {
        ItemSpec {
            kind: self.kind,
            level: self.level,
            color: self.color,
        }
    }

    /// Reports whether the item is a generator.
    #[must_use]
    pub fn is_generator(&self) -> bool {
        self.kind == ItemKind::Generator
    }
}
