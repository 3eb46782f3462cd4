use std::{fs, path::Path};

use anyhow::{Context, Result};
use mergeworks_core::GameConfig;

/// Loads the game configuration from `path`, or the built-in defaults when absent.
pub(crate) fn load(path: Option<&Path>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration file {}", path.display()))?;
    parse(&contents).with_context(|| format!("invalid configuration in {}", path.display()))
}

/// Parses a TOML configuration document.
pub(crate) fn parse(contents: &str) -> Result<GameConfig> {
    let config: GameConfig = toml::from_str(contents).context("failed to parse TOML")?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mergeworks_core::{CellCoord, ResourceColor};

    const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

    #[test]
    fn shipped_configuration_matches_defaults() {
        let parsed = parse(DEFAULT_CONFIG).expect("shipped configuration parses");
        assert_eq!(parsed, GameConfig::default());
    }

    #[test]
    fn partial_documents_inherit_defaults() {
        let parsed = parse(
            r#"
            seed = 42

            [board]
            rows = 5

            [[generator_layout]]
            cell = { column = 2, row = 4 }
            level = 2
            color = "gray"
            "#,
        )
        .expect("partial configuration parses");

        assert_eq!(parsed.seed, 42);
        assert_eq!(parsed.board.rows, 5);
        assert_eq!(parsed.board.columns, 7);
        assert_eq!(parsed.generator_layout.len(), 1);
        assert_eq!(parsed.generator_layout[0].cell, CellCoord::new(2, 4));
        assert_eq!(parsed.generator_layout[0].color, ResourceColor::Gray);
        assert_eq!(parsed.missions, GameConfig::default().missions);
    }

    #[test]
    fn malformed_documents_are_reported() {
        assert!(parse("start_second = 75").is_err());
        assert!(parse("[board\ncolumns = 3").is_err());
    }

    #[test]
    fn missing_files_name_the_path() {
        let error = load(Some(Path::new("/nonexistent/mergeworks.toml")))
            .expect_err("file does not exist");
        assert!(error.to_string().contains("/nonexistent/mergeworks.toml"));
    }
}
