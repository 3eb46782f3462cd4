use anyhow::{anyhow, bail, Context, Result};
use glam::Vec2;
use mergeworks_core::{CellCoord, DropTarget, SecondOfMinute};

/// One line of a command script.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Directive {
    Press(CellCoord),
    Drag(CellCoord),
    Over(Option<DropTarget>),
    Drop(DropTarget),
    Cancel,
    Tick(SecondOfMinute),
    Point(Vec2),
    Board,
    Mission,
    Pit,
    Ledger,
    Inspect,
    Quit,
}

/// Parses one script line; blank lines and `#` comments yield `None`.
pub(crate) fn parse_line(line: &str) -> Result<Option<Directive>> {
    let line = line.split('#').next().unwrap_or_default().trim();
    let mut words = line.split_whitespace();
    let Some(keyword) = words.next() else {
        return Ok(None);
    };
    let arguments: Vec<&str> = words.collect();

    let directive = match keyword.to_ascii_lowercase().as_str() {
        "press" => Directive::Press(cell(&arguments)?),
        "drag" => Directive::Drag(cell(&arguments)?),
        "over" => match arguments.as_slice() {
            ["none"] => Directive::Over(None),
            _ => Directive::Over(Some(target(&arguments)?)),
        },
        "drop" => Directive::Drop(target(&arguments)?),
        "cancel" => no_arguments(&arguments, Directive::Cancel)?,
        "tick" => Directive::Tick(second(&arguments)?),
        "point" => Directive::Point(point(&arguments)?),
        "board" => no_arguments(&arguments, Directive::Board)?,
        "mission" => no_arguments(&arguments, Directive::Mission)?,
        "pit" => no_arguments(&arguments, Directive::Pit)?,
        "ledger" => no_arguments(&arguments, Directive::Ledger)?,
        "inspect" => no_arguments(&arguments, Directive::Inspect)?,
        "quit" | "exit" => no_arguments(&arguments, Directive::Quit)?,
        other => bail!("unknown command `{other}`"),
    };
    Ok(Some(directive))
}

fn no_arguments(arguments: &[&str], directive: Directive) -> Result<Directive> {
    if arguments.is_empty() {
        Ok(directive)
    } else {
        bail!("unexpected arguments: {}", arguments.join(" "))
    }
}

fn cell(arguments: &[&str]) -> Result<CellCoord> {
    match arguments {
        [column, row] => {
            let column = column
                .parse()
                .with_context(|| format!("invalid column `{column}`"))?;
            let row = row.parse().with_context(|| format!("invalid row `{row}`"))?;
            Ok(CellCoord::new(column, row))
        }
        _ => Err(anyhow!("expected a column and a row")),
    }
}

fn target(arguments: &[&str]) -> Result<DropTarget> {
    match arguments {
        ["pit"] => Ok(DropTarget::Pit),
        _ => cell(arguments)
            .map(DropTarget::Cell)
            .context("expected `pit` or a column and a row"),
    }
}

fn second(arguments: &[&str]) -> Result<SecondOfMinute> {
    let [value] = arguments else {
        bail!("expected a second between 0 and 59");
    };
    let value: u8 = value
        .parse()
        .with_context(|| format!("invalid second `{value}`"))?;
    Ok(SecondOfMinute::try_from(value)?)
}

fn point(arguments: &[&str]) -> Result<Vec2> {
    let [x, y] = arguments else {
        bail!("expected an x and a y coordinate");
    };
    let x: f32 = x.parse().with_context(|| format!("invalid x `{x}`"))?;
    let y: f32 = y.parse().with_context(|| format!("invalid y `{y}`"))?;
    Ok(Vec2::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_and_comments_are_skipped() {
        assert_eq!(parse_line("").expect("blank"), None);
        assert_eq!(parse_line("   # just a note").expect("comment"), None);
    }

    #[test]
    fn gestures_parse_into_directives() {
        assert_eq!(
            parse_line("press 2 0").expect("press"),
            Some(Directive::Press(CellCoord::new(2, 0)))
        );
        assert_eq!(
            parse_line("DRAG 0 1  # grab it").expect("drag"),
            Some(Directive::Drag(CellCoord::new(0, 1)))
        );
        assert_eq!(
            parse_line("over pit").expect("over"),
            Some(Directive::Over(Some(DropTarget::Pit)))
        );
        assert_eq!(
            parse_line("over none").expect("over"),
            Some(Directive::Over(None))
        );
        assert_eq!(
            parse_line("drop 1 1").expect("drop"),
            Some(Directive::Drop(DropTarget::Cell(CellCoord::new(1, 1))))
        );
        assert_eq!(
            parse_line("tick 59").expect("tick"),
            Some(Directive::Tick(SecondOfMinute::wrapping(59)))
        );
        assert_eq!(
            parse_line("point 12.5 40").expect("point"),
            Some(Directive::Point(Vec2::new(12.5, 40.0)))
        );
    }

    #[test]
    fn malformed_lines_are_rejected() {
        assert!(parse_line("tick 60").is_err());
        assert!(parse_line("press 1").is_err());
        assert!(parse_line("press a b").is_err());
        assert!(parse_line("board now").is_err());
        assert!(parse_line("dance").is_err());
    }
}
