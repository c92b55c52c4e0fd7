use std::{fs, path::Path};

use anyhow::{Context, Result};
use cabin_chase_core::SessionConfig;

/// Loads the session configuration, falling back to defaults without a file.
pub(crate) fn load_session_config(path: Option<&Path>) -> Result<SessionConfig> {
    let Some(path) = path else {
        return Ok(SessionConfig::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read session config at {}", path.display()))?;
    parse_session_config(&contents)
        .with_context(|| format!("invalid session config in {}", path.display()))
}

pub(crate) fn parse_session_config(contents: &str) -> Result<SessionConfig> {
    toml::from_str(contents).context("failed to parse session config toml contents")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_remaining_defaults() {
        let config = parse_session_config(
            r#"
            spotting_radius = 6.5
            bush_count = 0
        "#,
        )
        .expect("valid config");
        assert_eq!(config.spotting_radius, 6.5);
        assert_eq!(config.bush_count, 0);
        assert_eq!(config.chase_radius, SessionConfig::default().chase_radius);
    }

    #[test]
    fn rejects_mistyped_fields() {
        let error = parse_session_config("grid_width = \"wide\"").expect_err("must fail");
        assert!(error.to_string().contains("session config"));
    }

    #[test]
    fn missing_path_uses_defaults() {
        let config = load_session_config(None).expect("defaults");
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn unreadable_file_reports_its_path() {
        let error = load_session_config(Some(Path::new("/definitely/missing/session.toml")))
            .expect_err("missing file");
        assert!(format!("{error:#}").contains("/definitely/missing/session.toml"));
    }
}
