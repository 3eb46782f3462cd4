#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Mergeworks.
//!
//! [`apply`] is the only way to change a [`World`]. Each command is computed
//! against snapshots of the board and ledgers and committed only when it
//! succeeds; a failed command leaves the world untouched and reports a single
//! [`Event::CommandRejected`].

use mergeworks_core::{
    Board, CellCoord, Command, ConfigError, DragToken, DropTarget, Event, GameConfig, GameError,
    Item, ItemId, ItemIdAllocator, MissionState, ResourceLedger, RewardLedger, SecondOfMinute,
};
use mergeworks_system_accrual as accrual;
use mergeworks_system_generation as generation;
use mergeworks_system_merging::{self as merging, MergeContext, MergeOutcome};
use mergeworks_system_missions as missions;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const FIRST_ITEM_ID: u32 = 1;

/// Represents the authoritative Mergeworks world state.
#[derive(Clone, Debug, PartialEq)]
pub struct World {
    config: GameConfig,
    board: Board,
    resources: ResourceLedger,
    rewards: RewardLedger,
    missions: MissionState,
    pit: Vec<Item>,
    selection: Option<ItemId>,
    hover: Option<DropTarget>,
    drag: Option<DragToken>,
    active_items: Vec<ItemId>,
    clock: SecondOfMinute,
    ids: ItemIdAllocator,
    rng: ChaCha8Rng,
}

impl World {
    /// Starts a game: validates `config` and lays out the starting generators.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut ids = ItemIdAllocator::starting_at(FIRST_ITEM_ID);
        let mut board = Board::new(config.board.columns, config.board.rows);
        for placement in &config.generator_layout {
            let generator = Item::generator(
                ids.mint(),
                placement.level,
                placement.color,
                config.start_second,
            );
            board
                .place(placement.cell, generator)
                .map_err(|_| ConfigError::LayoutOverlap {
                    cell: placement.cell,
                })?;
        }

        tracing::debug!(
            columns = config.board.columns,
            rows = config.board.rows,
            generators = config.generator_layout.len(),
            missions = config.missions.len(),
            next_item = %ids.peek(),
            "world created"
        );

        Ok(Self {
            board,
            resources: config.initial_resources,
            rewards: config.initial_rewards,
            missions: MissionState::new(&config.missions),
            pit: Vec::new(),
            selection: None,
            hover: None,
            drag: None,
            active_items: Vec::new(),
            clock: config.start_second,
            ids,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
        })
    }

    fn merge_context(&self) -> MergeContext {
        MergeContext::new(self.clock, self.config.level_caps)
    }

    fn clear_selection_if_gone(&mut self, events: &mut Vec<Event>) {
        if let Some(selected) = self.selection {
            if !self.board.contains_id(selected) {
                self.selection = None;
                events.push(Event::SelectionCleared);
            }
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    tracing::debug!(?command, "applying command");

    match command {
        Command::EndDrag { token, target } => {
            // The gesture ends whether or not the release is accepted.
            let pending = world.drag.take();
            world.hover = None;
            dispatch(world, out_events, |world, events| {
                end_drag(world, pending, token, target, events)
            });
        }
        Command::PressCell { cell } => {
            dispatch(world, out_events, |world, events| press_cell(world, cell, events));
        }
        Command::BeginDrag { cell } => {
            dispatch(world, out_events, |world, events| begin_drag(world, cell, events));
        }
        Command::DragOver { target } => {
            dispatch(world, out_events, |world, events| drag_over(world, target, events));
        }
        Command::CancelDrag => dispatch(world, out_events, cancel_drag),
        Command::Tick { second } => {
            dispatch(world, out_events, |world, events| tick(world, second, events));
        }
    }
}

fn dispatch<F>(world: &mut World, out_events: &mut Vec<Event>, handler: F)
where
    F: FnOnce(&mut World, &mut Vec<Event>) -> Result<(), GameError>,
{
    let mut events = Vec::new();
    match handler(world, &mut events) {
        Ok(()) => out_events.append(&mut events),
        Err(reason) => {
            tracing::debug!(%reason, user_facing = reason.is_user_facing(), "command rejected");
            out_events.push(Event::CommandRejected { reason });
        }
    }
}

fn press_cell(world: &mut World, cell: CellCoord, events: &mut Vec<Event>) -> Result<(), GameError> {
    let Some(item) = world.board.occupant(cell)? else {
        if world.selection.take().is_some() {
            events.push(Event::SelectionCleared);
        }
        return Ok(());
    };

    if world.selection == Some(item.id()) && item.is_generator() {
        return activate_generator(world, cell, events);
    }

    let item = item.id();
    world.selection = Some(item);
    events.push(Event::ItemSelected { item, cell });
    Ok(())
}

fn activate_generator(
    world: &mut World,
    cell: CellCoord,
    events: &mut Vec<Event>,
) -> Result<(), GameError> {
    let mut ids = world.ids;
    let mut rng = world.rng.clone();
    let activation = generation::activate(
        &world.board,
        &world.resources,
        cell,
        &world.config,
        world.clock,
        &mut ids,
        &mut rng,
    )?;

    world.board = activation.board;
    world.resources = activation.ledger;
    world.ids = ids;
    world.rng = rng;

    events.push(Event::ResourceSpent {
        color: activation.color,
        amount: activation.cost,
        balance: activation.balance,
    });
    events.push(Event::ElementGenerated {
        generator: activation.generator,
        item: activation.item,
        cell: activation.cell,
    });
    Ok(())
}

fn begin_drag(world: &mut World, cell: CellCoord, events: &mut Vec<Event>) -> Result<(), GameError> {
    let item = world
        .board
        .occupant(cell)?
        .ok_or(GameError::EmptyCell { cell })?;
    let token = DragToken::new(item.id(), cell);

    if let Some(previous) = world.drag.replace(token) {
        events.push(Event::DragCancelled { token: previous });
    }
    world.hover = None;
    events.push(Event::DragStarted { token });
    Ok(())
}

fn drag_over(
    world: &mut World,
    target: Option<DropTarget>,
    events: &mut Vec<Event>,
) -> Result<(), GameError> {
    if world.drag.is_none() {
        return Err(GameError::NoActiveDrag);
    }
    let target = target.filter(|target| match target {
        DropTarget::Cell(cell) => world.board.contains(*cell),
        DropTarget::Pit => true,
    });
    if world.hover != target {
        world.hover = target;
        events.push(Event::HoverChanged { target });
    }
    Ok(())
}

fn cancel_drag(world: &mut World, events: &mut Vec<Event>) -> Result<(), GameError> {
    let token = world.drag.take().ok_or(GameError::NoActiveDrag)?;
    world.hover = None;
    events.push(Event::DragCancelled { token });
    Ok(())
}

fn end_drag(
    world: &mut World,
    pending: Option<DragToken>,
    token: DragToken,
    target: DropTarget,
    events: &mut Vec<Event>,
) -> Result<(), GameError> {
    let pending = pending.ok_or(GameError::NoActiveDrag)?;
    let origin = token.origin();
    let still_there = world.board.get(origin).map(Item::id) == Some(token.item());
    if pending != token || !still_there {
        return Err(GameError::StaleDrag);
    }

    let mut ids = world.ids;
    let outcome = merging::attempt_merge(
        &world.board,
        origin,
        target,
        &world.merge_context(),
        &mut ids,
    )?;
    world.ids = ids;

    match outcome {
        MergeOutcome::Unchanged => {}
        MergeOutcome::Moved {
            board,
            item,
            from,
            to,
        } => {
            world.board = board;
            events.push(Event::ItemMoved { item, from, to });
        }
        MergeOutcome::Promoted {
            board,
            consumed,
            created,
            cell,
        } => {
            world.board = board;
            events.push(Event::ItemsMerged {
                consumed,
                created,
                cell,
            });
            world.clear_selection_if_gone(events);
        }
        MergeOutcome::Forged {
            board,
            consumed,
            created,
            cell,
        } => {
            world.board = board;
            events.push(Event::GeneratorForged {
                consumed,
                created,
                cell,
            });
            world.clear_selection_if_gone(events);
        }
        MergeOutcome::Deposited { board, item, .. } => {
            world.board = board;
            deposit(world, item, events);
            world.clear_selection_if_gone(events);
        }
    }
    Ok(())
}

fn deposit(world: &mut World, item: Item, events: &mut Vec<Event>) {
    let outcome = missions::deposit(
        &world.missions,
        &world.rewards,
        &world.config.missions,
        &item,
    );
    world.missions = outcome.state;
    world.rewards = outcome.rewards;
    world.pit.push(item.clone());
    events.push(Event::ItemDeposited {
        item,
        matched: outcome.matched,
    });

    if let Some(progress) = outcome.progress {
        events.push(Event::MissionProgressed {
            mission: progress.mission,
            spec: progress.spec,
            satisfied: progress.satisfied,
            required: progress.required,
        });
    }

    let Some(completion) = outcome.completion else {
        return;
    };
    tracing::info!(mission = %completion.mission, "mission completed");
    world.pit.clear();
    events.push(Event::MissionCompleted {
        mission: completion.mission,
    });
    for credit in completion.rewards {
        events.push(Event::RewardGained {
            kind: credit.kind,
            amount: credit.amount,
            balance: credit.balance,
        });
    }
    match completion.next {
        Some(mission) => {
            tracing::info!(%mission, "mission activated");
            events.push(Event::MissionActivated { mission });
        }
        None => tracing::info!("all missions completed"),
    }
}

fn tick(world: &mut World, second: SecondOfMinute, events: &mut Vec<Event>) -> Result<(), GameError> {
    let report = accrual::tick(&world.board, &world.resources, second, &world.config.accrual);

    world.clock = second;
    world.resources = report.ledger;
    events.push(Event::TimeAdvanced { second });
    for gain in report.gains {
        events.push(Event::ResourceGained {
            item: gain.item,
            color: gain.color,
            amount: gain.amount,
            balance: gain.balance,
        });
    }
    if world.active_items != report.active_items {
        world.active_items = report.active_items;
        events.push(Event::ActiveItemsChanged {
            items: world.active_items.clone(),
        });
    }
    Ok(())
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use mergeworks_core::{
        Board, CellCoord, DragToken, DropTarget, GameConfig, Item, ItemId, Mission,
        MissionState, ResourceLedger, RewardLedger, SecondOfMinute,
    };
    use mergeworks_system_inspection::{self as inspection, ItemDetails, MissionView};

    use super::World;

    /// Provides read-only access to the board.
    #[must_use]
    pub fn board(world: &World) -> &Board {
        &world.board
    }

    /// Current resource balances.
    #[must_use]
    pub fn resources(world: &World) -> ResourceLedger {
        world.resources
    }

    /// Current reward balances.
    #[must_use]
    pub fn rewards(world: &World) -> RewardLedger {
        world.rewards
    }

    /// Identifier of the selected item, if any.
    #[must_use]
    pub fn selection(world: &World) -> Option<ItemId> {
        world.selection
    }

    /// The selected item together with its cell.
    #[must_use]
    pub fn selected_item(world: &World) -> Option<(CellCoord, &Item)> {
        let selected = world.selection?;
        let cell = world.board.locate(selected)?;
        world.board.get(cell).map(|item| (cell, item))
    }

    /// Details of the selected item for the inspection panel.
    #[must_use]
    pub fn selected_details(world: &World) -> Option<ItemDetails> {
        selected_item(world).map(|(_, item)| inspection::describe_item(item, &world.config))
    }

    /// Target currently highlighted by a drag gesture.
    #[must_use]
    pub fn hover(world: &World) -> Option<DropTarget> {
        world.hover
    }

    /// Token of the drag gesture in flight.
    #[must_use]
    pub fn active_drag(world: &World) -> Option<DragToken> {
        world.drag
    }

    /// Items that produced income on the latest tick.
    #[must_use]
    pub fn active_items(world: &World) -> &[ItemId] {
        &world.active_items
    }

    /// Last second reported through a tick, or the starting second.
    #[must_use]
    pub fn clock(world: &World) -> SecondOfMinute {
        world.clock
    }

    /// Items deposited during the current mission cycle, oldest first.
    #[must_use]
    pub fn pit(world: &World) -> &[Item] {
        &world.pit
    }

    /// Raw mission tracker state.
    #[must_use]
    pub fn mission_state(world: &World) -> &MissionState {
        &world.missions
    }

    /// Mission currently accepting deposits.
    #[must_use]
    pub fn active_mission(world: &World) -> Option<&Mission> {
        world.missions.active(&world.config.missions)
    }

    /// Projection of the mission panel.
    #[must_use]
    pub fn mission_view(world: &World) -> MissionView {
        inspection::mission_view(&world.missions, &world.config.missions, &world.pit)
    }

    /// Configuration the world was started with.
    #[must_use]
    pub fn config(world: &World) -> &GameConfig {
        &world.config
    }
}
