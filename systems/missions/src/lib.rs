#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Mission progress tracker fed by items deposited into the pit.

use mergeworks_core::{
    Item, ItemSpec, Mission, MissionId, MissionState, RewardKind, RewardLedger,
};

/// Progress recorded for one requirement group after a matching deposit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GroupProgress {
    /// Mission receiving the deposit.
    pub mission: MissionId,
    /// Requirement group that was advanced.
    pub spec: ItemSpec,
    /// Items of the group delivered so far.
    pub satisfied: u32,
    /// Items of the group required in total.
    pub required: u32,
}

/// A reward credited on mission completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RewardCredit {
    /// Reward kind credited.
    pub kind: RewardKind,
    /// Amount credited.
    pub amount: u32,
    /// Balance after the credit.
    pub balance: u32,
}

/// Completion of the active mission triggered by a deposit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Completion {
    /// Mission that was completed.
    pub mission: MissionId,
    /// Rewards credited, omitting kinds the mission does not grant.
    pub rewards: Vec<RewardCredit>,
    /// Mission activated next, or `None` when the list is exhausted.
    pub next: Option<MissionId>,
}

/// Result of depositing one item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DepositOutcome {
    /// Mission state after the deposit.
    pub state: MissionState,
    /// Reward ledger after the deposit.
    pub rewards: RewardLedger,
    /// Whether the item counted toward the active mission.
    pub matched: bool,
    /// Group advanced by the deposit, when it matched.
    pub progress: Option<GroupProgress>,
    /// Completion triggered by the deposit, if any.
    pub completion: Option<Completion>,
}

/// Counts `item` toward the active mission.
///
/// An item matches when the active mission still needs more items sharing its
/// kind, level, and color. Completing the mission credits its reward bundle
/// and advances to the next mission, resetting progress. Once the list is
/// exhausted deposits never match.
#[must_use]
pub fn deposit(
    state: &MissionState,
    rewards: &RewardLedger,
    missions: &[Mission],
    item: &Item,
) -> DepositOutcome {
    let mut next_state = state.clone();
    let mut next_rewards = *rewards;

    let Some(mission) = state.active(missions) else {
        return DepositOutcome {
            state: next_state,
            rewards: next_rewards,
            matched: false,
            progress: None,
            completion: None,
        };
    };

    let spec = item.spec();
    let required = mission.required_count(&spec);
    if next_state.satisfied(&spec) >= required {
        return DepositOutcome {
            state: next_state,
            rewards: next_rewards,
            matched: false,
            progress: None,
            completion: None,
        };
    }

    let satisfied = next_state.record(spec);
    let progress = GroupProgress {
        mission: mission.id,
        spec,
        satisfied,
        required,
    };

    let completion = if next_state.is_complete(missions) {
        let credits = RewardKind::ALL
            .into_iter()
            .filter_map(|kind| {
                let amount = mission.rewards.amount(kind);
                (amount > 0).then(|| RewardCredit {
                    kind,
                    amount,
                    balance: next_rewards.credit(kind, amount),
                })
            })
            .collect();
        next_state.advance(missions);
        Some(Completion {
            mission: mission.id,
            rewards: credits,
            next: next_state.active(missions).map(|active| active.id),
        })
    } else {
        None
    };

    DepositOutcome {
        state: next_state,
        rewards: next_rewards,
        matched: true,
        progress: Some(progress),
        completion,
    }
}
