use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use glam::Vec2;
use mergeworks_core::{Command, Event, ItemKind, ResourceColor, RewardKind};
use mergeworks_rendering::{
    color_name, describe_spec, render_board, reward_name, BoardLayout, Frame, Highlights,
    RenderingBackend,
};
use mergeworks_world::{self as world, query, World};

use crate::script::{parse_line, Directive};

/// Backend that writes frames as plain text.
#[derive(Debug)]
pub(crate) struct TextBackend<W> {
    writer: W,
}

impl<W: Write> TextBackend<W> {
    pub(crate) fn new(writer: W) -> Self {
        Self { writer }
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn present(&mut self, frame: &Frame) -> Result<()> {
        for line in &frame.log {
            writeln!(self.writer, "{line}").context("failed to write log line")?;
        }
        if let Some(board) = &frame.board {
            write!(self.writer, "{board}").context("failed to write board")?;
        }
        self.writer.flush().context("failed to flush output")
    }
}

/// Whether the session should keep reading input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Drives a world from textual directives and presents the outcome.
#[derive(Debug)]
pub(crate) struct Session<B> {
    world: World,
    backend: B,
    layout: BoardLayout,
}

impl<B: RenderingBackend> Session<B> {
    pub(crate) fn new(world: World, backend: B, cell_size: f32) -> Result<Self> {
        let layout = BoardLayout::for_board(query::board(&world), Vec2::ZERO, cell_size)
            .context("invalid board layout")?;
        Ok(Self {
            world,
            backend,
            layout,
        })
    }

    /// Executes every line of `input` until it ends or a `quit` directive.
    pub(crate) fn run<R: BufRead>(&mut self, input: R) -> Result<()> {
        for (index, line) in input.lines().enumerate() {
            let line = line.context("failed to read input")?;
            let directive = match parse_line(&line) {
                Ok(Some(directive)) => directive,
                Ok(None) => continue,
                Err(error) => {
                    tracing::warn!(line = index + 1, error = %error, "skipping script line");
                    self.present_lines(vec![format!("line {}: {error:#}", index + 1)])?;
                    continue;
                }
            };
            if self.execute(directive)? == Flow::Quit {
                break;
            }
        }
        Ok(())
    }

    fn execute(&mut self, directive: Directive) -> Result<Flow> {
        tracing::debug!(?directive, "executing directive");
        match directive {
            Directive::Press(cell) => self.submit(Command::PressCell { cell })?,
            Directive::Drag(cell) => self.submit(Command::BeginDrag { cell })?,
            Directive::Over(target) => self.submit(Command::DragOver { target })?,
            Directive::Drop(target) => match query::active_drag(&self.world) {
                Some(token) => self.submit(Command::EndDrag { token, target })?,
                None => {
                    self.present_lines(vec![String::from("drop ignored: no drag in progress")])?
                }
            },
            Directive::Cancel => self.submit(Command::CancelDrag)?,
            Directive::Tick(second) => self.submit(Command::Tick { second })?,
            Directive::Point(point) => {
                let line = match self.layout.cell_at(point) {
                    Some(cell) => {
                        let center = self.layout.cell_center(cell);
                        format!(
                            "pointer ({}, {}) is over {cell} centered at ({}, {})",
                            point.x, point.y, center.x, center.y
                        )
                    }
                    None => {
                        let size = self.layout.size();
                        format!(
                            "pointer ({}, {}) is outside the {}x{} board",
                            point.x, point.y, size.x, size.y
                        )
                    }
                };
                self.present_lines(vec![line])?;
            }
            Directive::Board => {
                let frame = Frame {
                    log: Vec::new(),
                    board: Some(render_board(query::board(&self.world), &self.highlights())),
                };
                self.backend.present(&frame)?;
            }
            Directive::Mission => self.present_lines(self.mission_lines())?,
            Directive::Pit => self.present_lines(self.pit_lines())?,
            Directive::Ledger => self.present_lines(self.ledger_lines())?,
            Directive::Inspect => self.present_lines(self.inspect_lines())?,
            Directive::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn submit(&mut self, command: Command) -> Result<()> {
        let mut events: Vec<Event> = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        events.retain(|event| match event {
            Event::CommandRejected { reason } if !reason.is_user_facing() => {
                tracing::debug!(%reason, "rejection not shown");
                false
            }
            _ => true,
        });
        let frame = Frame::from_events(&events);
        if frame.is_empty() {
            return Ok(());
        }
        self.backend.present(&frame)
    }

    fn present_lines(&mut self, log: Vec<String>) -> Result<()> {
        self.backend.present(&Frame { log, board: None })
    }

    fn highlights(&self) -> Highlights {
        let board = query::board(&self.world);
        Highlights {
            selection: query::selected_item(&self.world).map(|(cell, _)| cell),
            hover: query::hover(&self.world),
            active: query::active_items(&self.world)
                .iter()
                .filter_map(|item| board.locate(*item))
                .collect(),
        }
    }

    fn mission_lines(&self) -> Vec<String> {
        let view = query::mission_view(&self.world);
        let Some(mission) = view.mission else {
            return vec![String::from("no missions configured")];
        };

        let status = if view.exhausted {
            "all missions completed"
        } else if view.completed {
            "completed"
        } else {
            "in progress"
        };
        let mut lines = vec![format!("mission {mission}: {status}")];
        for group in &view.progress {
            lines.push(format!(
                "  {} {}/{}",
                describe_spec(&group.spec),
                group.satisfied,
                group.required
            ));
        }
        if !view.remaining.is_empty() {
            let remaining: Vec<String> = view.remaining.iter().map(describe_spec).collect();
            lines.push(format!("  remaining: {}", remaining.join(", ")));
        }
        if !view.rewards.is_empty() {
            let rewards: Vec<String> = RewardKind::ALL
                .iter()
                .filter(|kind| view.rewards.amount(**kind) > 0)
                .map(|kind| format!("{} {}", view.rewards.amount(*kind), reward_name(*kind)))
                .collect();
            lines.push(format!("  rewards: {}", rewards.join(", ")));
        }
        lines.push(format!("  pit holds {} item(s)", view.pit_size));
        lines
    }

    fn pit_lines(&self) -> Vec<String> {
        let pit = query::pit(&self.world);
        if pit.is_empty() {
            return vec![String::from("pit is empty")];
        }
        pit.iter()
            .map(|item| format!("pit: {} ({})", item.id(), describe_spec(&item.spec())))
            .collect()
    }

    fn ledger_lines(&self) -> Vec<String> {
        let resources = query::resources(&self.world);
        let rewards = query::rewards(&self.world);
        let mut lines: Vec<String> = ResourceColor::ALL
            .iter()
            .map(|color| format!("{}: {}", color_name(*color), resources.balance(*color)))
            .collect();
        lines.extend(
            RewardKind::ALL
                .iter()
                .map(|kind| format!("{}: {}", reward_name(*kind), rewards.balance(*kind))),
        );
        lines.push(format!("time {}", query::clock(&self.world)));
        lines
    }

    fn inspect_lines(&self) -> Vec<String> {
        let Some(details) = query::selected_details(&self.world) else {
            return vec![String::from("nothing selected")];
        };

        let kind = match details.kind {
            ItemKind::Generator => "generator",
            ItemKind::Element => "element",
            ItemKind::Resource => "resource",
        };
        let color = details.color.map_or("colorless", color_name);
        let mut lines = vec![format!(
            "{}: level {} {color} {kind}",
            details.item, details.level
        )];
        if let Some(amount) = details.yield_per_cycle {
            lines.push(format!("  yields {amount} {color} per cycle"));
        }
        if let Some(cost) = details.activation_cost {
            lines.push(format!("  activation costs {cost} {color}"));
        }
        for outcome in &details.outputs {
            lines.push(format!(
                "  level {} element: {:.0}%",
                outcome.level,
                outcome.chance * 100.0
            ));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mergeworks_core::GameConfig;

    fn run_script(script: &str) -> String {
        let world = World::new(GameConfig::default()).expect("default configuration is valid");
        let mut session =
            Session::new(world, TextBackend::new(Vec::new()), 32.0).expect("valid layout");
        session.run(script.as_bytes()).expect("script runs");
        String::from_utf8(session.backend.into_inner()).expect("output is utf-8")
    }

    #[test]
    fn board_directive_draws_initial_generators() {
        let output = run_script("board\n");
        let first_row = output.lines().next().expect("board has rows");
        assert_eq!(first_row, " G1b  G2b  G3b  G1r  G2r  G3r  ... ");
        assert_eq!(output.lines().count(), 7);
    }

    #[test]
    fn double_press_activates_generator() {
        let output = run_script("press 0 0\npress 0 0\nledger\n");
        assert!(output.contains("selected item-1 at (0, 0)"));
        assert!(output.contains("spent 10 blue (balance 990)"));
        assert!(output.contains("item-1 generated item-7 (E1 blue)"));
        assert!(output.contains("blue: 990"));
    }

    #[test]
    fn drop_without_drag_is_reported_by_the_driver() {
        let output = run_script("drop 1 1\n");
        assert_eq!(output, "drop ignored: no drag in progress\n");
    }

    #[test]
    fn drag_and_drop_uses_the_issued_token() {
        let output = run_script("drag 0 0\nover 6 6\ndrop 6 6\n");
        assert!(output.contains("dragging item-1 from (0, 0)"));
        assert!(output.contains("hovering (6, 6)"));
        assert!(output.contains("item-1 moved (0, 0) -> (6, 6)"));
    }

    #[test]
    fn mismatched_drops_are_silent() {
        let output = run_script("drag 0 0\ndrop 3 0\nboard\n");
        assert!(!output.contains("rejected"));
        assert!(output.starts_with("dragging item-1 from (0, 0)\n G1b  G2b  G3b  G1r "));
    }

    #[test]
    fn out_of_bounds_drops_are_silent() {
        let output = run_script("drag 0 0\ndrop 9 9\n");
        assert_eq!(output, "dragging item-1 from (0, 0)\n");
    }

    #[test]
    fn last_generator_rejection_is_shown() {
        let mut script = String::new();
        for column in 0..5 {
            script.push_str(&format!("drag {column} 0\ndrop pit\n"));
        }
        script.push_str("drag 5 0\ndrop pit\nboard\n");

        let output = run_script(&script);
        assert!(output.contains("rejected: the last generator cannot be deposited"));
        assert!(output.contains(" G3r "), "the last generator stays on the board");
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let output = run_script("dance\nquit\nboard\n");
        assert_eq!(output, "line 1: unknown command `dance`\n");
    }

    #[test]
    fn pointer_positions_map_to_cells() {
        let output = run_script("point 40 70\npoint -1 5\n");
        assert_eq!(
            output,
            "pointer (40, 70) is over (1, 2) centered at (48, 80)\npointer (-1, 5) is outside the 224x224 board\n"
        );
    }

    #[test]
    fn inspect_describes_selected_generator() {
        let output = run_script("inspect\npress 1 0\ninspect\n");
        assert!(output.starts_with("nothing selected\n"));
        assert!(output.contains("item-2: level 2 blue generator"));
        assert!(output.contains("activation costs 20 blue"));
    }

    #[test]
    fn mission_directive_lists_requirements() {
        let output = run_script("mission\npit\n");
        assert!(output.starts_with("mission #1: in progress\n"));
        assert!(output.contains("pit is empty"));
    }
}
