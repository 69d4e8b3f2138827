use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default data file, resolved relative to the working directory.
pub const DEFAULT_DATA_FILE: &str = "urbanmart_sales.csv";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Sales analysis console and dashboard for UrbanMart
#[derive(Parser, Debug, Clone)]
#[command(
    name = "urbanmart",
    about = "Sales analysis console and dashboard for UrbanMart",
    version
)]
pub struct Settings {
    /// Path to the sales CSV file
    #[arg(long, default_value = DEFAULT_DATA_FILE)]
    pub data_file: PathBuf,

    /// Interface to run
    #[arg(long, default_value = "console", value_parser = ["console", "dashboard", "summary"])]
    pub mode: String,

    /// Number of entries in top-product rankings (1-50)
    #[arg(long, default_value = "5", value_parser = clap::value_parser!(u32).range(1..=50))]
    pub top_n: u32,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Parameters persisted to `~/.urbanmart/last_used.json` between runs.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_n: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

impl LastUsedParams {
    /// `~/.urbanmart/last_used.json`.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Config path rooted at `base_dir`.
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(".urbanmart").join("last_used.json")
    }

    /// Load persisted params; `Default` when absent or unparseable.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_json::from_str(&content) {
            Ok(params) => params,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "ignoring unreadable last-used params");
                Self::default()
            }
        }
    }

    /// Write params via a temp file and rename, creating parent directories.
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at `path` if it exists.
    pub fn clear_at(path: &std::path::Path) -> Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse process arguments, merge last-used values for anything not given
    /// explicitly, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Same as [`Settings::load_with_last_used`] with explicit arguments and
    /// config path.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            if let Err(e) = LastUsedParams::clear_at(config_path) {
                tracing::warn!(error = %e, "failed to clear last-used params");
            }
            return Self::apply_debug_flag(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // clap stores arg ids under the field name, not the flag spelling.
        if !is_arg_explicitly_set(&matches, "data_file") {
            if let Some(v) = last.data_file {
                settings.data_file = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "mode") {
            if let Some(v) = last.mode {
                settings.mode = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "top_n") {
            if let Some(v) = last.top_n.filter(|n| (1..=50).contains(n)) {
                settings.top_n = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "theme") {
            if let Some(v) = last.theme {
                settings.theme = v;
            }
        }

        settings = Self::apply_debug_flag(settings);

        if let Err(e) = LastUsedParams::from(&settings).save_to(config_path) {
            tracing::warn!(error = %e, "failed to persist last-used params");
        }

        settings
    }

    /// `--debug` overrides the log level.
    fn apply_debug_flag(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            data_file: Some(s.data_file.clone()),
            mode: Some(s.mode.clone()),
            top_n: Some(s.top_n),
            theme: Some(s.theme.clone()),
        }
    }
}

/// `true` when `name` came from the command line rather than a default.
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tmp_config_path(tmp: &TempDir) -> PathBuf {
        LastUsedParams::config_path_in(tmp.path())
    }

    #[test]
    fn test_last_used_params_save_load() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        let params = LastUsedParams {
            data_file: Some(PathBuf::from("/data/sales.csv")),
            mode: Some("dashboard".to_string()),
            top_n: Some(10),
            theme: Some("dark".to_string()),
        };
        params.save_to(&path).expect("save");

        let loaded = LastUsedParams::load_from(&path);
        assert_eq!(loaded.data_file, Some(PathBuf::from("/data/sales.csv")));
        assert_eq!(loaded.mode, Some("dashboard".to_string()));
        assert_eq!(loaded.top_n, Some(10));
        assert_eq!(loaded.theme, Some("dark".to_string()));
    }

    #[test]
    fn test_last_used_params_default_when_missing_or_corrupt() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        assert!(LastUsedParams::load_from(&path).mode.is_none());

        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();
        assert!(LastUsedParams::load_from(&path).theme.is_none());
    }

    #[test]
    fn test_last_used_params_clear() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        LastUsedParams::default().save_to(&path).expect("save");
        assert!(path.exists());
        LastUsedParams::clear_at(&path).expect("clear");
        assert!(!path.exists());
    }

    #[test]
    fn test_settings_default_values() {
        let settings = Settings::parse_from(["urbanmart"]);
        assert_eq!(settings.data_file, PathBuf::from(DEFAULT_DATA_FILE));
        assert_eq!(settings.mode, "console");
        assert_eq!(settings.top_n, 5);
        assert_eq!(settings.theme, "auto");
        assert_eq!(settings.log_level, "INFO");
        assert!(settings.log_file.is_none());
        assert!(!settings.debug);
        assert!(!settings.clear);
    }

    #[test]
    fn test_settings_rejects_out_of_range_top_n() {
        assert!(Settings::try_parse_from(["urbanmart", "--top-n", "0"]).is_err());
        assert!(Settings::try_parse_from(["urbanmart", "--top-n", "51"]).is_err());
    }

    #[test]
    fn test_settings_rejects_unknown_mode() {
        assert!(Settings::try_parse_from(["urbanmart", "--mode", "web"]).is_err());
    }

    #[test]
    fn test_load_with_last_used_merges_persisted_values() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            data_file: Some(PathBuf::from("/data/other.csv")),
            mode: Some("dashboard".to_string()),
            top_n: Some(10),
            theme: Some("classic".to_string()),
        }
        .save_to(&config_path)
        .expect("save");

        let settings = Settings::load_with_last_used_impl(vec!["urbanmart".into()], &config_path);
        assert_eq!(settings.data_file, PathBuf::from("/data/other.csv"));
        assert_eq!(settings.mode, "dashboard");
        assert_eq!(settings.top_n, 10);
        assert_eq!(settings.theme, "classic");
    }

    #[test]
    fn test_load_with_last_used_cli_overrides_persisted() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            mode: Some("dashboard".to_string()),
            ..Default::default()
        }
        .save_to(&config_path)
        .expect("save");

        let settings = Settings::load_with_last_used_impl(
            vec!["urbanmart".into(), "--mode".into(), "summary".into()],
            &config_path,
        );
        assert_eq!(settings.mode, "summary");
    }

    #[test]
    fn test_load_with_last_used_clear_removes_file() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams::default().save_to(&config_path).expect("save");

        Settings::load_with_last_used_impl(
            vec!["urbanmart".into(), "--clear".into()],
            &config_path,
        );
        assert!(!config_path.exists());
    }

    #[test]
    fn test_load_with_last_used_debug_overrides_log_level() {
        let tmp = TempDir::new().expect("tempdir");
        let settings = Settings::load_with_last_used_impl(
            vec!["urbanmart".into(), "--debug".into()],
            &tmp_config_path(&tmp),
        );
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_load_with_last_used_persists_after_run() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        Settings::load_with_last_used_impl(
            vec!["urbanmart".into(), "--top-n".into(), "7".into()],
            &config_path,
        );
        let loaded = LastUsedParams::load_from(&config_path);
        assert_eq!(loaded.top_n, Some(7));
        assert_eq!(loaded.mode, Some("console".to_string()));
    }
}
