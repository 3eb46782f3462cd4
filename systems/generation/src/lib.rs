#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Generator activation: pays the activation cost and spawns an element.
//!
//! The element level is drawn from the generator's configured output table
//! using an injected random source, and the element lands on the empty cell
//! nearest to the generator. Nothing changes unless every check passes.

use mergeworks_core::{
    Board, CellCoord, GameConfig, GameError, Item, ItemId, ItemIdAllocator, ItemKind, ItemSpec,
    LevelChance, ResourceColor, ResourceLedger, SecondOfMinute,
};
use rand::Rng;

/// Result of a successful generator activation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Activation {
    /// Board holding the newly spawned element.
    pub board: Board,
    /// Ledger after the activation cost was debited.
    pub ledger: ResourceLedger,
    /// Identifier of the activated generator.
    pub generator: ItemId,
    /// Element placed on the board.
    pub item: Item,
    /// Cell the element was placed into.
    pub cell: CellCoord,
    /// Resource color that paid for the activation.
    pub color: ResourceColor,
    /// Amount debited.
    pub cost: u32,
    /// Balance remaining after the debit.
    pub balance: u32,
}

/// Activates the generator at `cell`.
///
/// Checks run before any randomness is consumed, in this order: coordinate,
/// occupant, generator kind, output table, funds, free space. The element is
/// timestamped with `now` and shares the generator's color.
pub fn activate<R>(
    board: &Board,
    ledger: &ResourceLedger,
    cell: CellCoord,
    config: &GameConfig,
    now: SecondOfMinute,
    ids: &mut ItemIdAllocator,
    rng: &mut R,
) -> Result<Activation, GameError>
where
    R: Rng + ?Sized,
{
    let generator = board.occupant(cell)?.ok_or(GameError::EmptyCell { cell })?;
    if !generator.is_generator() {
        return Err(GameError::NotAGenerator { cell });
    }
    let color = generator.color().ok_or(GameError::NotAGenerator { cell })?;
    let level = generator.level();
    let table = config
        .output_table(level)
        .ok_or(GameError::UnconfiguredGeneratorLevel { level })?;

    let cost = config.generator_cost.cost_for(level);
    let mut next_ledger = *ledger;
    let balance = next_ledger.debit(color, cost)?;

    let target = board.find_nearest_empty(cell).ok_or(GameError::BoardFull)?;

    let draw: f64 = rng.gen();
    let element_level = pick_level(&table.outcomes, draw);
    tracing::trace!(
        generator = %generator.id(),
        level,
        draw,
        element_level,
        "generator output drawn"
    );

    let item = Item::from_spec(
        ids.mint(),
        ItemSpec::new(ItemKind::Element, element_level, color),
        now,
    );
    let mut next_board = board.clone();
    next_board.place(target, item.clone())?;

    Ok(Activation {
        board: next_board,
        ledger: next_ledger,
        generator: generator.id(),
        item,
        cell: target,
        color,
        cost,
        balance,
    })
}

/// Maps a uniform draw in `[0, 1)` onto an output table.
///
/// Buckets are walked in order and the first whose cumulative chance exceeds
/// the draw wins. Draws past the final bucket, possible only through rounding,
/// resolve to the last level.
#[must_use]
pub fn pick_level(outcomes: &[LevelChance], draw: f64) -> u8 {
    let mut cumulative = 0.0;
    for outcome in outcomes {
        cumulative += outcome.chance;
        if draw < cumulative {
            return outcome.level;
        }
    }
    outcomes.last().map_or(1, |outcome| outcome.level)
}
