// src/pipeline/validate.rs

use std::env;
use std::path::Path;

use crate::error::Result;
use crate::models::Config;
use crate::utils::log;

/// Load and check a configuration file, reporting what a run would use.
///
/// Missing API keys only warn: the scrape and cleanup commands do not need
/// them.
pub fn run_validate(config_path: &Path) -> Result<Config> {
    log::header("Validate - Configuration");

    let config = match Config::load(config_path).and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => {
            ::log::error!("Validation failed for {}: {}", config_path.display(), e);
            return Err(e);
        }
    };

    log::success(&format!("Config valid: {}", config_path.display()));
    log::sub_item(&format!("Portal: {}", config.portal.base_url));
    log::sub_item(&format!("Base dir: {}", config.paths.base_dir.display()));
    log::sub_item(&format!(
        "Catalog: {} modal tests, {} metric tiles",
        config.capture.modals.len(),
        config.capture.tiles.len()
    ));
    log::sub_item(&format!(
        "Analysis: {} at {} rpm",
        config.analysis.model, config.analysis.rpm
    ));
    log::sub_item(&format!(
        "Program: {} at {} rpm, {} weeks",
        config.program.model, config.program.rpm, config.program.weeks
    ));

    for var in [
        &config.portal.email_env,
        &config.portal.password_env,
        &config.analysis.api_key_env,
        &config.program.api_key_env,
    ] {
        if env::var(var).map(|v| v.trim().is_empty()).unwrap_or(true) {
            ::log::warn!("Environment variable {} is not set", var);
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_file_passes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[paths]\nbase_dir = \"out\"\n\n[program]\nweeks = 6\n",
        )
        .unwrap();

        let config = run_validate(&path).unwrap();
        assert_eq!(config.program.weeks, 6);
        assert_eq!(config.paths.base_dir, Path::new("out"));
    }

    #[test]
    fn test_invalid_values_fail() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[capture]\nmodal_open_attempts = 0\n").unwrap();
        assert!(run_validate(&path).is_err());

        std::fs::write(&path, "[portal]\nbase_url = \"not a url\"\n").unwrap();
        assert!(run_validate(&path).is_err());

        assert!(run_validate(&dir.path().join("missing.toml")).is_err());
    }
}
