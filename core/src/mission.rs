//! Mission definitions and per-mission progress.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::{ItemSpec, RewardBundle};

/// Identifier of a mission within the configured mission list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MissionId(u32);

impl MissionId {
    /// Creates a new mission identifier with the provided numeric value.
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

impl fmt::Display for MissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Immutable mission definition: items to deposit and the reward for doing so.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    /// Identifier of the mission.
    pub id: MissionId,
    /// Items that must be deposited, duplicates included.
    pub required: Vec<ItemSpec>,
    /// Reward credited on completion.
    #[serde(default)]
    pub rewards: RewardBundle,
}

impl Mission {
    /// Creates a mission granting the default reward.
    #[must_use]
    pub fn new(id: u32, required: Vec<ItemSpec>) -> Self {
        Self {
            id: MissionId::new(id),
            required,
            rewards: RewardBundle::default(),
        }
    }

    /// Distinct requirement tuples with their required counts, in first-appearance order.
    #[must_use]
    pub fn requirement_groups(&self) -> Vec<(ItemSpec, u32)> {
        let mut groups: Vec<(ItemSpec, u32)> = Vec::new();
        for spec in &self.required {
            match groups.iter_mut().find(|(existing, _)| existing == spec) {
                Some((_, count)) => *count += 1,
                None => groups.push((*spec, 1)),
            }
        }
        groups
    }

    /// Number of items matching `spec` the mission requires.
    #[must_use]
    pub fn required_count(&self, spec: &ItemSpec) -> u32 {
        let count = self.required.iter().filter(|required| *required == spec).count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }
}

/// Progress through the mission list.
///
/// Holds the index of the active mission and how many items of each
/// requirement group were delivered. Once the final mission completes the
/// state becomes exhausted and stays on the last index.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct MissionState {
    index: usize,
    satisfied: BTreeMap<ItemSpec, u32>,
    exhausted: bool,
}

impl MissionState {
    /// Starts at the first mission, or exhausted when the list is empty.
    #[must_use]
    pub fn new(missions: &[Mission]) -> Self {
        Self {
            index: 0,
            satisfied: BTreeMap::new(),
            exhausted: missions.is_empty(),
        }
    }

    /// Index of the active (or, once exhausted, the last) mission.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Reports whether every mission has been completed.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Mission currently accepting deposits.
    #[must_use]
    pub fn active<'a>(&self, missions: &'a [Mission]) -> Option<&'a Mission> {
        if self.exhausted {
            None
        } else {
            missions.get(self.index)
        }
    }

    /// Items of `spec` delivered toward the active mission.
    #[must_use]
    pub fn satisfied(&self, spec: &ItemSpec) -> u32 {
        self.satisfied.get(spec).copied().unwrap_or(0)
    }

    /// `(spec, satisfied, required)` per requirement group of the active mission.
    #[must_use]
    pub fn progress(&self, missions: &[Mission]) -> Vec<(ItemSpec, u32, u32)> {
        self.active(missions)
            .map(|mission| {
                mission
                    .requirement_groups()
                    .into_iter()
                    .map(|(spec, required)| (spec, self.satisfied(&spec).min(required), required))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Requirement tuples still outstanding, one entry per missing item, in mission order.
    #[must_use]
    pub fn remaining(&self, missions: &[Mission]) -> Vec<ItemSpec> {
        let Some(mission) = self.active(missions) else {
            return Vec::new();
        };
        let mut seen: BTreeMap<ItemSpec, u32> = BTreeMap::new();
        let mut outstanding = Vec::new();
        for spec in &mission.required {
            let ordinal = seen.entry(*spec).or_insert(0);
            if *ordinal >= self.satisfied(spec) {
                outstanding.push(*spec);
            }
            *ordinal += 1;
        }
        outstanding
    }

    /// Reports whether every requirement group of the active mission is satisfied.
    #[must_use]
    pub fn is_complete(&self, missions: &[Mission]) -> bool {
        match self.active(missions) {
            Some(mission) => mission
                .requirement_groups()
                .iter()
                .all(|(spec, required)| self.satisfied(spec) >= *required),
            None => false,
        }
    }

    /// Counts one more delivered item of `spec` and returns the new total.
    pub fn record(&mut self, spec: ItemSpec) -> u32 {
        let count = self.satisfied.entry(spec).or_insert(0);
        *count += 1;
        *count
    }

    /// Clears progress and moves to the next mission, or becomes exhausted.
    pub fn advance(&mut self, missions: &[Mission]) {
        self.satisfied.clear();
        if self.index + 1 < missions.len() {
            self.index += 1;
        } else {
            self.exhausted = true;
        }
    }
}
