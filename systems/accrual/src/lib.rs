#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Passive income: elements pay out at fixed offsets from their placement second.

use mergeworks_core::{
    AccrualConfig, Board, ItemId, ItemKind, ResourceColor, ResourceLedger, SecondOfMinute,
};

/// Income credited by one element on a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResourceGain {
    /// Element that produced the income.
    pub item: ItemId,
    /// Resource color credited.
    pub color: ResourceColor,
    /// Amount credited.
    pub amount: u32,
    /// Balance right after this credit.
    pub balance: u32,
}

/// Outcome of processing one tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccrualReport {
    /// Ledger with every gain applied.
    pub ledger: ResourceLedger,
    /// Gains in board order.
    pub gains: Vec<ResourceGain>,
    /// Elements that matured on this tick, in board order.
    pub active_items: Vec<ItemId>,
}

/// Credits income for every element maturing at `second`.
///
/// An element matures when the seconds elapsed since its placement, wrapped
/// onto the minute, appear in the configured intervals. Elements are visited
/// in row-major order and credited one after another.
#[must_use]
pub fn tick(
    board: &Board,
    ledger: &ResourceLedger,
    second: SecondOfMinute,
    config: &AccrualConfig,
) -> AccrualReport {
    let mut next = *ledger;
    let mut gains = Vec::new();
    let mut active_items = Vec::new();

    for (_, item) in board.iter() {
        if item.kind() != ItemKind::Element {
            continue;
        }
        let Some(color) = item.color() else {
            continue;
        };
        if !config.matures_at(second.since(item.placed_at())) {
            continue;
        }
        let amount = config.yield_for(item.level());
        let balance = next.credit(color, amount);
        active_items.push(item.id());
        gains.push(ResourceGain {
            item: item.id(),
            color,
            amount,
            balance,
        });
    }

    AccrualReport {
        ledger: next,
        gains,
        active_items,
    }
}
