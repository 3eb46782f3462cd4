#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Mergeworks adapters.
//!
//! Holds the pointer-to-cell geometry presentation layers need for drag
//! gestures, a plain text rendering of the board, and one-line descriptions
//! of engine events.

use anyhow::Result as AnyResult;
use glam::Vec2;
use mergeworks_core::{
    Board, CellCoord, DropTarget, Event, ItemKind, ItemSpec, ResourceColor, RewardKind,
};
use std::{error::Error, fmt, fmt::Write as _};

/// Screen-space placement of the board grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoardLayout {
    /// Top-left corner of the grid.
    pub origin: Vec2,
    /// Side length of one cell.
    pub cell_size: f32,
    /// Number of columns drawn.
    pub columns: u32,
    /// Number of rows drawn.
    pub rows: u32,
}

impl BoardLayout {
    /// Creates a layout descriptor.
    ///
    /// Returns an error when `cell_size` is not a positive finite number.
    pub fn new(
        origin: Vec2,
        cell_size: f32,
        columns: u32,
        rows: u32,
    ) -> std::result::Result<Self, RenderingError> {
        if !cell_size.is_finite() || cell_size <= f32::EPSILON {
            return Err(RenderingError::InvalidCellSize { cell_size });
        }

        Ok(Self {
            origin,
            cell_size,
            columns,
            rows,
        })
    }

    /// Creates a layout matching the board dimensions.
    pub fn for_board(
        board: &Board,
        origin: Vec2,
        cell_size: f32,
    ) -> std::result::Result<Self, RenderingError> {
        Self::new(origin, cell_size, board.columns(), board.rows())
    }

    /// Total width and height of the grid.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.columns as f32, self.rows as f32) * self.cell_size
    }

    /// Maps a pointer position onto the cell beneath it.
    ///
    /// Returns `None` when the point lies outside the grid.
    #[must_use]
    pub fn cell_at(&self, point: Vec2) -> Option<CellCoord> {
        let relative = (point - self.origin) / self.cell_size;
        if !relative.is_finite() || relative.x < 0.0 || relative.y < 0.0 {
            return None;
        }

        let floored = relative.floor();
        if floored.x >= self.columns as f32 || floored.y >= self.rows as f32 {
            return None;
        }
        Some(CellCoord::new(floored.x as u32, floored.y as u32))
    }

    /// Screen position of the center of `cell`.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord) -> Vec2 {
        let corner = Vec2::new(cell.column() as f32, cell.row() as f32);
        self.origin + (corner + Vec2::splat(0.5)) * self.cell_size
    }
}

/// Cells that should stand out when the board is drawn.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Highlights {
    /// Cell holding the selected item.
    pub selection: Option<CellCoord>,
    /// Target under the pointer during a drag.
    pub hover: Option<DropTarget>,
    /// Cells whose items produced income on the latest tick.
    pub active: Vec<CellCoord>,
}

/// Draws the board as text, one line per row.
///
/// Each cell is five characters wide: a three character glyph made of the
/// kind initial, the level and a color initial, framed by markers. Brackets
/// frame the selection, angle brackets the hovered cell, and asterisks items
/// that produced income on the latest tick. Empty cells render as dots.
#[must_use]
pub fn render_board(board: &Board, highlights: &Highlights) -> String {
    let mut out = String::new();
    for row in 0..board.rows() {
        for column in 0..board.columns() {
            let cell = CellCoord::new(column, row);
            let glyph = board
                .get(cell)
                .map_or_else(|| String::from("..."), |item| glyph(&item.spec()));
            let (open, close) = if highlights.selection == Some(cell) {
                ('[', ']')
            } else if highlights.hover == Some(DropTarget::Cell(cell)) {
                ('<', '>')
            } else if highlights.active.contains(&cell) {
                ('*', '*')
            } else {
                (' ', ' ')
            };
            out.push(open);
            out.push_str(&glyph);
            out.push(close);
        }
        out.push('\n');
    }
    if highlights.hover == Some(DropTarget::Pit) {
        out.push_str("<pit>\n");
    }
    out
}

fn glyph(spec: &ItemSpec) -> String {
    let kind = match spec.kind {
        ItemKind::Generator => 'G',
        ItemKind::Element => 'E',
        ItemKind::Resource => 'R',
    };
    let color = match spec.color {
        Some(ResourceColor::Blue) => 'b',
        Some(ResourceColor::Red) => 'r',
        Some(ResourceColor::Gray) => 'g',
        None => '-',
    };
    let level = char::from_digit(u32::from(spec.level), 36).unwrap_or('+');
    format!("{kind}{level}{color}")
}

/// Lowercase display name of a resource color.
#[must_use]
pub fn color_name(color: ResourceColor) -> &'static str {
    match color {
        ResourceColor::Blue => "blue",
        ResourceColor::Red => "red",
        ResourceColor::Gray => "gray",
    }
}

/// Lowercase display name of a reward kind.
#[must_use]
pub fn reward_name(kind: RewardKind) -> &'static str {
    match kind {
        RewardKind::BlackSquare => "black square",
        RewardKind::OrangeTriangle => "orange triangle",
    }
}

/// Short label for an item description, such as `E2 blue`.
#[must_use]
pub fn describe_spec(spec: &ItemSpec) -> String {
    let kind = match spec.kind {
        ItemKind::Generator => 'G',
        ItemKind::Element => 'E',
        ItemKind::Resource => 'R',
    };
    match spec.color {
        Some(color) => format!("{kind}{} {}", spec.level, color_name(color)),
        None => format!("{kind}{}", spec.level),
    }
}

fn describe_target(target: Option<DropTarget>) -> String {
    match target {
        Some(DropTarget::Cell(cell)) => cell.to_string(),
        Some(DropTarget::Pit) => String::from("pit"),
        None => String::from("nothing"),
    }
}

/// One-line human readable description of an event.
#[must_use]
pub fn describe_event(event: &Event) -> String {
    match event {
        Event::ItemSelected { item, cell } => format!("selected {item} at {cell}"),
        Event::SelectionCleared => String::from("selection cleared"),
        Event::DragStarted { token } => {
            format!("dragging {} from {}", token.item(), token.origin())
        }
        Event::HoverChanged { target } => format!("hovering {}", describe_target(*target)),
        Event::DragCancelled { token } => format!("drag of {} cancelled", token.item()),
        Event::ItemMoved { item, from, to } => format!("{item} moved {from} -> {to}"),
        Event::ItemsMerged {
            consumed: [dragged, occupant],
            created,
            cell,
        } => format!(
            "{dragged} + {occupant} merged into {} ({}) at {cell}",
            created.id(),
            describe_spec(&created.spec())
        ),
        Event::GeneratorForged {
            consumed: [dragged, occupant],
            created,
            cell,
        } => format!(
            "{dragged} + {occupant} forged {} ({}) at {cell}",
            created.id(),
            describe_spec(&created.spec())
        ),
        Event::ElementGenerated {
            generator,
            item,
            cell,
        } => format!(
            "{generator} generated {} ({}) at {cell}",
            item.id(),
            describe_spec(&item.spec())
        ),
        Event::ResourceSpent {
            color,
            amount,
            balance,
        } => format!("spent {amount} {} (balance {balance})", color_name(*color)),
        Event::ResourceGained {
            item,
            color,
            amount,
            balance,
        } => format!(
            "{item} earned {amount} {} (balance {balance})",
            color_name(*color)
        ),
        Event::TimeAdvanced { second } => format!("time {second}"),
        Event::ActiveItemsChanged { items } => {
            if items.is_empty() {
                String::from("active items: none")
            } else {
                let mut line = String::from("active items:");
                for item in items {
                    let _ = write!(line, " {item}");
                }
                line
            }
        }
        Event::ItemDeposited { item, matched } => format!(
            "{} ({}) deposited{}",
            item.id(),
            describe_spec(&item.spec()),
            if *matched { ", counted" } else { ", not needed" }
        ),
        Event::MissionProgressed {
            mission,
            spec,
            satisfied,
            required,
        } => format!(
            "mission {mission}: {} {satisfied}/{required}",
            describe_spec(spec)
        ),
        Event::MissionCompleted { mission } => format!("mission {mission} completed"),
        Event::RewardGained {
            kind,
            amount,
            balance,
        } => format!("gained {amount} {} (balance {balance})", reward_name(*kind)),
        Event::MissionActivated { mission } => format!("mission {mission} active"),
        Event::CommandRejected { reason } => format!("rejected: {reason}"),
    }
}

/// Snapshot handed to a backend for presentation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    /// Lines describing what happened since the previous frame.
    pub log: Vec<String>,
    /// Text rendering of the board, when requested.
    pub board: Option<String>,
}

impl Frame {
    /// Creates a frame describing `events`.
    #[must_use]
    pub fn from_events(events: &[Event]) -> Self {
        Self {
            log: events.iter().map(describe_event).collect(),
            board: None,
        }
    }

    /// Reports whether the frame has nothing to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.log.is_empty() && self.board.is_none()
    }
}

/// Rendering backend capable of presenting Mergeworks frames.
pub trait RenderingBackend {
    /// Presents one frame.
    fn present(&mut self, frame: &Frame) -> AnyResult<()>;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Cells must have a positive finite size.
    InvalidCellSize {
        /// Provided size that failed validation.
        cell_size: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCellSize { cell_size } => {
                write!(f, "cell_size must be positive (received {cell_size})")
            }
        }
    }
}

impl Error for RenderingError {}
