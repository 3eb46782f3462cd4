//! Static game configuration loaded once at startup.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{
    CellCoord, ConfigError, ItemKind, ItemSpec, Mission, MissionId, ResourceColor,
    ResourceLedger, RewardLedger, SecondOfMinute,
};

const DEFAULT_COLUMNS: u32 = 7;
const DEFAULT_ROWS: u32 = 7;
const DEFAULT_STARTING_RESOURCES: u32 = 1_000;
const DEFAULT_COST_PER_LEVEL: u32 = 10;
const DEFAULT_SEED: u64 = 0x6d65_7267_6577_6b73;
const CHANCE_TOLERANCE: f64 = 1e-6;
/// Largest number of cells a board may hold.
pub const MAX_BOARD_CELLS: u64 = 4_096;

/// Every tunable of the game, from board size to the mission list.
///
/// Missing fields fall back to [`GameConfig::default`] when deserializing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Board dimensions.
    pub board: BoardConfig,
    /// Resource balances at game start.
    pub initial_resources: ResourceLedger,
    /// Reward balances at game start.
    pub initial_rewards: RewardLedger,
    /// Generators placed on the board at game start.
    pub generator_layout: Vec<GeneratorPlacement>,
    /// Activation cost function.
    pub generator_cost: GeneratorCost,
    /// Element level distribution per generator level.
    pub generator_outputs: Vec<OutputTable>,
    /// Highest reachable level per item kind.
    pub level_caps: LevelCaps,
    /// Passive income schedule.
    pub accrual: AccrualConfig,
    /// Second of the minute the game starts at, used to timestamp the starting layout.
    pub start_second: SecondOfMinute,
    /// Seed for the generator output draws.
    pub seed: u64,
    /// Ordered mission list.
    pub missions: Vec<Mission>,
}

impl GameConfig {
    /// Output table for generators of `level`.
    #[must_use]
    pub fn output_table(&self, level: u8) -> Option<&OutputTable> {
        self.generator_outputs
            .iter()
            .find(|table| table.generator_level == level)
    }

    /// Checks the configuration for values the engine cannot honor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let BoardConfig { columns, rows } = self.board;
        if columns == 0 || rows == 0 {
            return Err(ConfigError::EmptyBoard { columns, rows });
        }
        if u64::from(columns) * u64::from(rows) > MAX_BOARD_CELLS {
            return Err(ConfigError::BoardTooLarge {
                columns,
                rows,
                max_cells: MAX_BOARD_CELLS,
            });
        }

        let mut occupied = BTreeSet::new();
        for placement in &self.generator_layout {
            let cell = placement.cell;
            if cell.column() >= columns || cell.row() >= rows {
                return Err(ConfigError::LayoutOutOfBounds { cell });
            }
            if !occupied.insert(cell) {
                return Err(ConfigError::LayoutOverlap { cell });
            }
            self.check_generator_level(placement.level)?;
        }

        for table in &self.generator_outputs {
            self.check_generator_level(table.generator_level)?;
            self.check_output_table(table)?;
        }
        for level in 1..=self.level_caps.generator {
            if self.output_table(level).is_none() {
                return Err(ConfigError::MissingOutputTable { level });
            }
        }

        if let Some(&second) = self
            .accrual
            .intervals
            .iter()
            .find(|second| SecondOfMinute::try_from(**second).is_err())
        {
            return Err(ConfigError::IntervalOutOfRange { second });
        }
        if self.accrual.yield_denominator == 0 {
            return Err(ConfigError::ZeroYieldDenominator);
        }

        let mut mission_ids = BTreeSet::new();
        for mission in &self.missions {
            if mission.required.is_empty() {
                return Err(ConfigError::EmptyMission {
                    mission: mission.id,
                });
            }
            if !mission_ids.insert(mission.id) {
                return Err(ConfigError::DuplicateMission {
                    mission: mission.id,
                });
            }
        }

        Ok(())
    }

    fn check_generator_level(&self, level: u8) -> Result<(), ConfigError> {
        let cap = self.level_caps.generator;
        if level == 0 || level > cap {
            return Err(ConfigError::GeneratorLevelOutOfRange { level, cap });
        }
        Ok(())
    }

    fn check_output_table(&self, table: &OutputTable) -> Result<(), ConfigError> {
        let level = table.generator_level;
        if table.outcomes.is_empty() {
            return Err(ConfigError::EmptyOutputTable { level });
        }
        let cap = self.level_caps.element;
        if let Some(outcome) = table
            .outcomes
            .iter()
            .find(|outcome| outcome.level == 0 || outcome.level > cap)
        {
            return Err(ConfigError::OutputLevelOutOfRange {
                generator_level: level,
                level: outcome.level,
                cap,
            });
        }
        let total: f64 = table.outcomes.iter().map(|outcome| outcome.chance).sum();
        if (total - 1.0).abs() > CHANCE_TOLERANCE {
            return Err(ConfigError::OutputChancesUnbalanced { level, total });
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board: BoardConfig::default(),
            initial_resources: ResourceLedger::uniform(DEFAULT_STARTING_RESOURCES),
            initial_rewards: RewardLedger::default(),
            generator_layout: default_layout(),
            generator_cost: GeneratorCost::default(),
            generator_outputs: default_outputs(),
            level_caps: LevelCaps::default(),
            accrual: AccrualConfig::default(),
            start_second: SecondOfMinute::default(),
            seed: DEFAULT_SEED,
            missions: default_missions(),
        }
    }
}

/// Board dimensions measured in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Number of columns.
    pub columns: u32,
    /// Number of rows.
    pub rows: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
        }
    }
}

/// A generator placed on the board at game start.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorPlacement {
    /// Cell holding the generator.
    pub cell: CellCoord,
    /// Generator level.
    pub level: u8,
    /// Generator color.
    pub color: ResourceColor,
}

/// Linear activation cost: `level * per_level`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorCost {
    /// Cost added per generator level.
    pub per_level: u32,
}

impl GeneratorCost {
    /// Cost of activating a generator of `level`.
    #[must_use]
    pub fn cost_for(&self, level: u8) -> u32 {
        u32::from(level).saturating_mul(self.per_level)
    }
}

impl Default for GeneratorCost {
    fn default() -> Self {
        Self {
            per_level: DEFAULT_COST_PER_LEVEL,
        }
    }
}

/// Element level distribution for one generator level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutputTable {
    /// Generator level the table applies to.
    pub generator_level: u8,
    /// Possible element levels with their chances, in draw order.
    pub outcomes: Vec<LevelChance>,
}

/// One bucket of an [`OutputTable`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelChance {
    /// Element level produced.
    pub level: u8,
    /// Probability in `0.0..=1.0`.
    pub chance: f64,
}

/// Highest level each item kind can reach through merging.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelCaps {
    /// Element tier cap; merging two capped elements forges a generator.
    pub element: u8,
    /// Generator cap; capped generators refuse to merge.
    pub generator: u8,
}

impl Default for LevelCaps {
    fn default() -> Self {
        Self {
            element: 5,
            generator: 3,
        }
    }
}

/// Passive income schedule for elements.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccrualConfig {
    /// Elapsed seconds since placement, modulo 60, at which an element pays out.
    pub intervals: Vec<u8>,
    /// Numerator of the per-level yield fraction.
    pub yield_numerator: u32,
    /// Denominator of the per-level yield fraction.
    pub yield_denominator: u32,
}

impl AccrualConfig {
    /// Reports whether an element `elapsed` seconds after placement pays out.
    #[must_use]
    pub fn matures_at(&self, elapsed: u8) -> bool {
        self.intervals.contains(&elapsed)
    }

    /// Income paid by an element of `level`: `floor(level * numerator / denominator)`.
    #[must_use]
    pub fn yield_for(&self, level: u8) -> u32 {
        if self.yield_denominator == 0 {
            return 0;
        }
        u32::from(level).saturating_mul(self.yield_numerator) / self.yield_denominator
    }
}

impl Default for AccrualConfig {
    fn default() -> Self {
        Self {
            intervals: vec![10, 20, 30, 40, 50, 0],
            yield_numerator: 3,
            yield_denominator: 2,
        }
    }
}

fn default_layout() -> Vec<GeneratorPlacement> {
    let generators = [
        (1, ResourceColor::Blue),
        (2, ResourceColor::Blue),
        (3, ResourceColor::Blue),
        (1, ResourceColor::Red),
        (2, ResourceColor::Red),
        (3, ResourceColor::Red),
    ];
    generators
        .into_iter()
        .zip(0u32..)
        .map(|((level, color), index)| GeneratorPlacement {
            cell: CellCoord::new(index % DEFAULT_COLUMNS, index / DEFAULT_COLUMNS),
            level,
            color,
        })
        .collect()
}

fn default_outputs() -> Vec<OutputTable> {
    let table = |generator_level: u8, outcomes: &[(u8, f64)]| OutputTable {
        generator_level,
        outcomes: outcomes
            .iter()
            .map(|&(level, chance)| LevelChance { level, chance })
            .collect(),
    };
    vec![
        table(1, &[(1, 1.0)]),
        table(2, &[(1, 0.6), (2, 0.4)]),
        table(3, &[(1, 0.1), (2, 0.5), (3, 0.4)]),
    ]
}

fn default_missions() -> Vec<Mission> {
    use ItemKind::{Element, Generator};
    use ResourceColor::{Blue, Gray, Red};

    let spec = ItemSpec::new;
    vec![
        Mission::new(1, vec![spec(Element, 2, Blue)]),
        Mission::new(2, vec![spec(Element, 4, Red)]),
        Mission::new(3, vec![spec(Element, 3, Gray)]),
        Mission::new(4, vec![spec(Generator, 1, Blue)]),
        Mission::new(5, vec![spec(Generator, 2, Red)]),
        Mission::new(6, vec![spec(Generator, 1, Gray)]),
        Mission::new(7, vec![spec(Element, 1, Blue), spec(Element, 1, Blue)]),
        Mission::new(8, vec![spec(Element, 2, Red), spec(Element, 2, Red)]),
        Mission::new(9, vec![spec(Element, 1, Blue), spec(Element, 1, Red)]),
        Mission::new(10, vec![spec(Element, 2, Blue), spec(Element, 3, Gray)]),
        Mission::new(11, vec![spec(Generator, 1, Blue), spec(Element, 2, Red)]),
        Mission::new(
            12,
            vec![
                spec(Element, 3, Blue),
                spec(Generator, 2, Gray),
                spec(Element, 1, Red),
            ],
        ),
        Mission::new(
            13,
            vec![
                spec(Generator, 3, Blue),
                spec(Element, 4, Red),
                spec(Generator, 1, Gray),
            ],
        ),
        Mission::new(
            14,
            vec![
                spec(Element, 5, Blue),
                spec(Element, 3, Red),
                spec(Generator, 2, Gray),
                spec(Element, 2, Blue),
            ],
        ),
    ]
}
