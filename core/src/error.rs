//! Error kinds reported by the board, the rule systems, and configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{CellCoord, ItemId, MissionId, ResourceColor};

/// Reasons a direct board mutation may fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum BoardError {
    /// The target cell already holds an item.
    #[error("cell {cell} is already occupied")]
    OccupiedCell {
        /// Cell that was occupied.
        cell: CellCoord,
    },
    /// The coordinate lies outside the board.
    #[error("cell {cell} lies outside the board")]
    InvalidCoordinate {
        /// Offending coordinate.
        cell: CellCoord,
    },
    /// An item with the same identifier is already on the board.
    #[error("{item} is already on the board")]
    DuplicateItem {
        /// Identifier that would have been duplicated.
        item: ItemId,
    },
}

/// Reasons a player command may be rejected by the world.
///
/// Every rejection leaves the game state untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum GameError {
    /// The target cell already holds an item.
    #[error("cell {cell} is already occupied")]
    OccupiedCell {
        /// Cell that was occupied.
        cell: CellCoord,
    },
    /// The ledger cannot cover the activation cost.
    #[error("not enough {color:?} resource: need {required}, have {available}")]
    InsufficientResource {
        /// Resource color required by the generator.
        color: ResourceColor,
        /// Cost of the activation.
        required: u32,
        /// Balance available in the ledger.
        available: u32,
    },
    /// No empty cell remains for a new element.
    #[error("no free cell left on the board")]
    BoardFull,
    /// Depositing the generator would leave the board without any generator.
    #[error("the last generator cannot be deposited")]
    LastGenerator,
    /// The coordinate lies outside the board.
    #[error("cell {cell} lies outside the board")]
    InvalidCoordinate {
        /// Offending coordinate.
        cell: CellCoord,
    },
    /// The dragged item and the target occupant cannot be combined.
    #[error("items do not match")]
    NoMergeMatch,
    /// Generators at the maximum level cannot be merged further.
    #[error("generators at level {level} cannot be merged")]
    GeneratorAtCap {
        /// Level of the capped generators.
        level: u8,
    },
    /// The cell holds no item.
    #[error("cell {cell} is empty")]
    EmptyCell {
        /// Cell that was empty.
        cell: CellCoord,
    },
    /// The cell holds an item that is not a generator.
    #[error("item at {cell} is not a generator")]
    NotAGenerator {
        /// Cell holding the non-generator item.
        cell: CellCoord,
    },
    /// A drag command arrived while no drag was in flight.
    #[error("no drag in progress")]
    NoActiveDrag,
    /// The drag token no longer describes the item under its origin.
    #[error("drag token is stale")]
    StaleDrag,
    /// An item with the same identifier is already on the board.
    #[error("{item} is already on the board")]
    DuplicateItem {
        /// Identifier that would have been duplicated.
        item: ItemId,
    },
    /// No output table is configured for the generator level.
    #[error("no output table configured for generator level {level}")]
    UnconfiguredGeneratorLevel {
        /// Generator level lacking a table.
        level: u8,
    },
}

impl GameError {
    /// Reports whether presentation layers should surface the error to the player.
    ///
    /// Mismatched merges and stray drags are silent no-ops.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::InsufficientResource { .. } | Self::BoardFull | Self::LastGenerator
        )
    }
}

impl From<BoardError> for GameError {
    fn from(error: BoardError) -> Self {
        match error {
            BoardError::OccupiedCell { cell } => Self::OccupiedCell { cell },
            BoardError::InvalidCoordinate { cell } => Self::InvalidCoordinate { cell },
            BoardError::DuplicateItem { item } => Self::DuplicateItem { item },
        }
    }
}

/// Error returned when a raw second does not fit on the sixty second wheel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("second {value} is outside 0..60")]
pub struct SecondOutOfRange {
    /// Rejected value.
    pub value: u8,
}

/// Reasons a [`GameConfig`](crate::GameConfig) fails validation.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The board must have at least one row and one column.
    #[error("board dimensions {columns}x{rows} are empty")]
    EmptyBoard {
        /// Configured column count.
        columns: u32,
        /// Configured row count.
        rows: u32,
    },
    /// The board would hold more cells than the engine allows.
    #[error("board dimensions {columns}x{rows} exceed {max_cells} cells")]
    BoardTooLarge {
        /// Configured column count.
        columns: u32,
        /// Configured row count.
        rows: u32,
        /// Largest permitted cell count.
        max_cells: u64,
    },
    /// A starting generator lies outside the board.
    #[error("starting generator at {cell} lies outside the board")]
    LayoutOutOfBounds {
        /// Offending cell.
        cell: CellCoord,
    },
    /// Two starting generators share a cell.
    #[error("starting layout places two generators at {cell}")]
    LayoutOverlap {
        /// Shared cell.
        cell: CellCoord,
    },
    /// A generator level lies outside `1..=cap`.
    #[error("generator level {level} is outside 1..={cap}")]
    GeneratorLevelOutOfRange {
        /// Offending level.
        level: u8,
        /// Configured generator cap.
        cap: u8,
    },
    /// A generator level has no output table.
    #[error("no output table for generator level {level}")]
    MissingOutputTable {
        /// Level lacking a table.
        level: u8,
    },
    /// An output table has no outcomes.
    #[error("output table for generator level {level} is empty")]
    EmptyOutputTable {
        /// Level of the empty table.
        level: u8,
    },
    /// The chances of an output table do not sum to one.
    #[error("output chances for generator level {level} sum to {total}")]
    OutputChancesUnbalanced {
        /// Level of the unbalanced table.
        level: u8,
        /// Sum of the configured chances.
        total: f64,
    },
    /// An output table yields an element level outside `1..=cap`.
    #[error("generator level {generator_level} yields element level {level} outside 1..={cap}")]
    OutputLevelOutOfRange {
        /// Level of the generator owning the table.
        generator_level: u8,
        /// Offending element level.
        level: u8,
        /// Configured element cap.
        cap: u8,
    },
    /// An accrual interval does not fit on the sixty second wheel.
    #[error("accrual interval {second} is outside 0..60")]
    IntervalOutOfRange {
        /// Offending interval.
        second: u8,
    },
    /// The accrual yield fraction divides by zero.
    #[error("accrual yield denominator must be positive")]
    ZeroYieldDenominator,
    /// A mission requires nothing.
    #[error("mission {mission} has no requirements")]
    EmptyMission {
        /// Offending mission.
        mission: MissionId,
    },
    /// Two missions share an identifier.
    #[error("mission id {mission} is used more than once")]
    DuplicateMission {
        /// Duplicated identifier.
        mission: MissionId,
    },
}
