use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use mergeworks_core::{CellCoord, Command, DropTarget, Event, GameConfig, SecondOfMinute};
use mergeworks_world::{self as world, query, World};

#[test]
fn deterministic_replay_produces_identical_streams() {
    let first = replay(GameConfig::default());
    let second = replay(GameConfig::default());

    assert_eq!(first.events, second.events, "event streams diverged");
    assert_eq!(first.fingerprint, second.fingerprint, "final boards diverged");
    assert!(
        first
            .events
            .iter()
            .any(|event| matches!(event, Event::ElementGenerated { .. })),
        "script exercises generation"
    );
}

#[test]
fn different_seeds_draw_different_elements() {
    let seeded = |seed: u64| {
        replay(GameConfig {
            seed,
            ..GameConfig::default()
        })
    };

    assert_ne!(seeded(1).events, seeded(2).events);
}

struct ReplayOutcome {
    events: Vec<Event>,
    fingerprint: u64,
}

fn replay(config: GameConfig) -> ReplayOutcome {
    let mut world = World::new(config).expect("valid config");
    let mut log = Vec::new();

    for command in scripted_commands() {
        let mut events = Vec::new();
        world::apply(&mut world, command, &mut events);
        // Drags started by the script are released onto their neighbor.
        let released = events.iter().find_map(|event| match event {
            Event::DragStarted { token } => Some(*token),
            _ => None,
        });
        log.extend(events);
        if let Some(token) = released {
            let origin = token.origin();
            let target = DropTarget::Cell(CellCoord::new(origin.column() + 1, origin.row()));
            world::apply(&mut world, Command::EndDrag { token, target }, &mut log);
        }
    }

    let mut hasher = DefaultHasher::new();
    for (cell, item) in query::board(&world).iter() {
        cell.hash(&mut hasher);
        item.hash(&mut hasher);
    }
    query::resources(&world).hash(&mut hasher);

    ReplayOutcome {
        events: log,
        fingerprint: hasher.finish(),
    }
}

fn scripted_commands() -> Vec<Command> {
    let level_three = CellCoord::new(2, 0);
    let mut commands = vec![Command::PressCell { cell: level_three }];
    for second in 0..20 {
        commands.push(Command::PressCell { cell: level_three });
        commands.push(Command::Tick {
            second: SecondOfMinute::wrapping(second * 3),
        });
    }
    for row in 1..4 {
        for column in 0..5 {
            commands.push(Command::BeginDrag {
                cell: CellCoord::new(column, row),
            });
        }
    }
    commands
}
