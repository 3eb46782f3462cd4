#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Read-only projections for the selected-item panel and the mission panel.

use mergeworks_core::{
    GameConfig, Item, ItemId, ItemKind, ItemSpec, LevelChance, Mission, MissionId, MissionState,
    ResourceColor, RewardBundle,
};

/// Details shown for the currently selected item.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemDetails {
    /// Identifier of the item.
    pub item: ItemId,
    /// Category of the item.
    pub kind: ItemKind,
    /// Level of the item.
    pub level: u8,
    /// Resource color of the item, if any.
    pub color: Option<ResourceColor>,
    /// Income per maturity for elements.
    pub yield_per_cycle: Option<u32>,
    /// Activation cost for generators.
    pub activation_cost: Option<u32>,
    /// Possible element levels for generators, empty otherwise.
    pub outputs: Vec<LevelChance>,
}

/// Describes `item` using the configured economy.
#[must_use]
pub fn describe_item(item: &Item, config: &GameConfig) -> ItemDetails {
    let (yield_per_cycle, activation_cost, outputs) = match item.kind() {
        ItemKind::Element => (Some(config.accrual.yield_for(item.level())), None, Vec::new()),
        ItemKind::Generator => (
            None,
            Some(config.generator_cost.cost_for(item.level())),
            config
                .output_table(item.level())
                .map(|table| table.outcomes.clone())
                .unwrap_or_default(),
        ),
        ItemKind::Resource => (None, None, Vec::new()),
    };

    ItemDetails {
        item: item.id(),
        kind: item.kind(),
        level: item.level(),
        color: item.color(),
        yield_per_cycle,
        activation_cost,
        outputs,
    }
}

/// Delivery status of one requirement group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequirementProgress {
    /// Requirement tuple.
    pub spec: ItemSpec,
    /// Items delivered so far, capped at `required`.
    pub satisfied: u32,
    /// Items required in total.
    pub required: u32,
}

/// Snapshot of the mission panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MissionView {
    /// Mission on display: the active one, or the last one once exhausted.
    pub mission: Option<MissionId>,
    /// Progress per requirement group of the displayed mission.
    pub progress: Vec<RequirementProgress>,
    /// Outstanding requirement tuples, one per missing item.
    pub remaining: Vec<ItemSpec>,
    /// Reward granted by the displayed mission.
    pub rewards: RewardBundle,
    /// Whether the displayed mission has been completed.
    pub completed: bool,
    /// Whether every mission has been completed.
    pub exhausted: bool,
    /// Items deposited during the current mission cycle.
    pub pit_size: usize,
}

/// Projects the mission tracker and pit into a [`MissionView`].
#[must_use]
pub fn mission_view(state: &MissionState, missions: &[Mission], pit: &[Item]) -> MissionView {
    let exhausted = state.is_exhausted();
    let displayed = missions.get(state.index());

    let progress = if exhausted {
        displayed
            .map(|mission| {
                mission
                    .requirement_groups()
                    .into_iter()
                    .map(|(spec, required)| RequirementProgress {
                        spec,
                        satisfied: required,
                        required,
                    })
                    .collect()
            })
            .unwrap_or_default()
    } else {
        state
            .progress(missions)
            .into_iter()
            .map(|(spec, satisfied, required)| RequirementProgress {
                spec,
                satisfied,
                required,
            })
            .collect()
    };

    MissionView {
        mission: displayed.map(|mission| mission.id),
        progress,
        remaining: state.remaining(missions),
        rewards: displayed.map_or(RewardBundle::NONE, |mission| mission.rewards),
        completed: exhausted && displayed.is_some(),
        exhausted,
        pit_size: pit.len(),
    }
}
