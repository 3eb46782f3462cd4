#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure merge rule engine deciding what happens when an item is dropped.
//!
//! [`attempt_merge`] never mutates the board it is given. Accepted outcomes
//! carry a fresh board snapshot; rejections carry only the reason.

use mergeworks_core::{
    Board, BoardError, CellCoord, DropTarget, GameError, Item, ItemId, ItemIdAllocator, ItemKind,
    ItemSpec, LevelCaps, ResourceColor, SecondOfMinute,
};

/// Inputs shared by every merge attempt besides the board itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MergeContext {
    /// Second used to timestamp items created by the merge.
    pub now: SecondOfMinute,
    /// Level caps for elements and generators.
    pub caps: LevelCaps,
}

impl MergeContext {
    /// Creates a merge context.
    #[must_use]
    pub const fn new(now: SecondOfMinute, caps: LevelCaps) -> Self {
        Self { now, caps }
    }
}

/// Accepted result of a merge attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The item was released over its own cell.
    Unchanged,
    /// The item moved into an empty cell, keeping its identity.
    Moved {
        /// Board after the move.
        board: Board,
        /// Identifier of the moved item.
        item: ItemId,
        /// Cell the item left.
        from: CellCoord,
        /// Cell the item entered.
        to: CellCoord,
    },
    /// Two identical items became one item of the next level.
    Promoted {
        /// Board after the promotion.
        board: Board,
        /// Dragged item followed by the target occupant.
        consumed: [ItemId; 2],
        /// Newly minted item.
        created: Item,
        /// Cell holding the new item.
        cell: CellCoord,
    },
    /// Two capped elements became a level-one generator.
    Forged {
        /// Board after the transformation.
        board: Board,
        /// Dragged element followed by the target element.
        consumed: [ItemId; 2],
        /// Newly minted generator.
        created: Item,
        /// Cell holding the new generator.
        cell: CellCoord,
    },
    /// The item left the board for the pit.
    Deposited {
        /// Board without the deposited item.
        board: Board,
        /// Item handed to the mission tracker.
        item: Item,
        /// Cell the item left.
        from: CellCoord,
    },
}

/// Reasons a merge attempt leaves the board untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergeRejection {
    /// A coordinate lies outside the board.
    InvalidCoordinate {
        /// Offending coordinate.
        cell: CellCoord,
    },
    /// There is nothing to drag at the source cell.
    EmptySource {
        /// Empty source cell.
        cell: CellCoord,
    },
    /// The items differ in kind, level, or color.
    NoMergeMatch,
    /// Both items are generators at the level cap.
    GeneratorAtCap {
        /// Level of the capped generators.
        level: u8,
    },
    /// The dragged generator is the last one on the board.
    LastGenerator,
    /// The working snapshot refused a placement.
    Board(BoardError),
}

impl From<BoardError> for MergeRejection {
    fn from(error: BoardError) -> Self {
        Self::Board(error)
    }
}

impl From<MergeRejection> for GameError {
    fn from(rejection: MergeRejection) -> Self {
        match rejection {
            MergeRejection::InvalidCoordinate { cell } => Self::InvalidCoordinate { cell },
            MergeRejection::EmptySource { cell } => Self::EmptyCell { cell },
            MergeRejection::NoMergeMatch => Self::NoMergeMatch,
            MergeRejection::GeneratorAtCap { level } => Self::GeneratorAtCap { level },
            MergeRejection::LastGenerator => Self::LastGenerator,
            MergeRejection::Board(error) => error.into(),
        }
    }
}

/// Applies the merge rules to the item at `from` released over `to`.
///
/// Rules are checked in order: releasing over the source is a no-op; the pit
/// accepts anything except the last generator on the board; empty cells accept
/// a move; identical items promote, forge a generator at the element cap, or
/// refuse at the generator cap; anything else is rejected. Identifiers for
/// created items are drawn from `ids`.
pub fn attempt_merge(
    board: &Board,
    from: CellCoord,
    to: DropTarget,
    context: &MergeContext,
    ids: &mut ItemIdAllocator,
) -> Result<MergeOutcome, MergeRejection> {
    let source = board
        .occupant(from)
        .map_err(|_| MergeRejection::InvalidCoordinate { cell: from })?;

    let target_cell = match to {
        DropTarget::Pit => None,
        DropTarget::Cell(cell) => {
            if !board.contains(cell) {
                return Err(MergeRejection::InvalidCoordinate { cell });
            }
            Some(cell)
        }
    };

    if target_cell == Some(from) {
        return Ok(MergeOutcome::Unchanged);
    }

    let source = source.ok_or(MergeRejection::EmptySource { cell: from })?;

    let Some(to) = target_cell else {
        return deposit(board, from, source);
    };

    let Some(target) = board.get(to) else {
        let mut next = board.clone();
        let item = next.remove(from).ok_or(MergeRejection::EmptySource { cell: from })?;
        let id = item.id();
        next.place(to, item)?;
        return Ok(MergeOutcome::Moved {
            board: next,
            item: id,
            from,
            to,
        });
    };

    let spec = source.spec();
    if spec != target.spec() {
        return Err(MergeRejection::NoMergeMatch);
    }
    let consumed = [source.id(), target.id()];

    match spec.kind {
        ItemKind::Element if spec.level >= context.caps.element => {
            let forged = ItemSpec {
                kind: ItemKind::Generator,
                level: 1,
                color: spec.color.map(ResourceColor::forged_generator_color),
            };
            let (board, created) = replace_pair(board, from, to, forged, context.now, ids)?;
            Ok(MergeOutcome::Forged {
                board,
                consumed,
                created,
                cell: to,
            })
        }
        ItemKind::Generator if spec.level >= context.caps.generator => {
            Err(MergeRejection::GeneratorAtCap { level: spec.level })
        }
        _ => {
            let promoted = ItemSpec {
                level: spec.level.saturating_add(1),
                ..spec
            };
            let (board, created) = replace_pair(board, from, to, promoted, context.now, ids)?;
            Ok(MergeOutcome::Promoted {
                board,
                consumed,
                created,
                cell: to,
            })
        }
    }
}

fn deposit(board: &Board, from: CellCoord, source: &Item) -> Result<MergeOutcome, MergeRejection> {
    if source.is_generator() && board.generator_count() <= 1 {
        return Err(MergeRejection::LastGenerator);
    }
    let mut next = board.clone();
    let item = next
        .remove(from)
        .ok_or(MergeRejection::EmptySource { cell: from })?;
    Ok(MergeOutcome::Deposited {
        board: next,
        item,
        from,
    })
}

fn replace_pair(
    board: &Board,
    from: CellCoord,
    to: CellCoord,
    spec: ItemSpec,
    now: SecondOfMinute,
    ids: &mut ItemIdAllocator,
) -> Result<(Board, Item), MergeRejection> {
    let mut next = board.clone();
    let _ = next.remove(from);
    let _ = next.remove(to);
    let created = Item::from_spec(ids.mint(), spec, now);
    next.place(to, created.clone())?;
    Ok((next, created))
}
