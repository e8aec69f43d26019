use anyhow::{Context, Result};
use config::{Config as ConfigLoader, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG: &str = "config/default.toml";

fn config_candidates(exe_dir: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(DEFAULT_CONFIG)];
    candidates.extend(exe_dir.map(|dir| dir.join(DEFAULT_CONFIG)));
    candidates
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub focus: FocusConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// CSV or Parquet export of the EM-DAT database
    pub path: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: "emdat.csv".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub title: String,
    pub icon: String,
    pub subtitle: String,
    /// Extra stylesheet inlined into the page; missing file is not fatal
    pub style_path: String,
    pub default_start_year: i32,
    pub default_end_year: i32,
    pub chart_height: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "The Pulse of Disasters".to_string(),
            icon: "🌍".to_string(),
            subtitle: "Global natural disaster patterns and the evolution of human resilience: a decoupling analysis"
                .to_string(),
            style_path: "style.css".to_string(),
            default_start_year: 1950,
            default_end_year: 2024,
            chart_height: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FocusConfig {
    /// ISO-3 code of the country given a detailed section
    pub iso: String,
    pub name: String,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            iso: "KOR".to_string(),
            name: "Korea".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load from an explicit file, still layering `PULSE_*` environment overrides
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let settings = ConfigLoader::builder()
            .add_source(File::from(config_path.to_path_buf()).required(false))
            .add_source(
                Environment::with_prefix("PULSE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .context("Failed to build configuration")?;

        settings
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Settings file used when none is given: `config/default.toml` under the
    /// working directory, else beside the binary. Falls back to the working
    /// directory path so a missing file just means defaults plus env vars.
    fn config_path() -> PathBuf {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        Self::first_existing(&config_candidates(exe_dir.as_deref()))
    }

    fn first_existing(candidates: &[PathBuf]) -> PathBuf {
        candidates
            .iter()
            .find(|path| path.exists())
            .or_else(|| candidates.first())
            .cloned()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG))
    }

    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(&self.data.path)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(config.data.path, "emdat.csv");
        assert_eq!(config.server.port, 8501);
        assert_eq!(config.dashboard.default_start_year, 1950);
        assert_eq!(config.dashboard.default_end_year, 2024);
        assert_eq!(config.focus.iso, "KOR");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pulse.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[data]\npath = \"events.parquet\"\n\n[dashboard]\nchart_height = 640\n\n[focus]\niso = \"JPN\"\nname = \"Japan\""
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.data_path(), PathBuf::from("events.parquet"));
        assert_eq!(config.dashboard.chart_height, 640);
        // Untouched fields in a partially specified section keep their defaults
        assert_eq!(config.dashboard.default_start_year, 1950);
        assert_eq!(config.focus.name, "Japan");
        assert_eq!(config.bind_addr(), "127.0.0.1:8501");
    }

    #[test]
    fn test_config_lookup_prefers_first_existing() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("local.toml");
        let beside_exe = dir.path().join("exe.toml");

        // Nothing exists yet: the first candidate is returned for a defaults-only load
        let candidates = vec![local.clone(), beside_exe.clone()];
        assert_eq!(Config::first_existing(&candidates), local);

        std::fs::File::create(&beside_exe).unwrap();
        assert_eq!(Config::first_existing(&candidates), beside_exe);

        std::fs::File::create(&local).unwrap();
        assert_eq!(Config::first_existing(&candidates), local);

        let exe_dir = PathBuf::from("/opt/pulse");
        assert_eq!(
            config_candidates(Some(&exe_dir)),
            vec![PathBuf::from(DEFAULT_CONFIG), exe_dir.join(DEFAULT_CONFIG)]
        );
        assert_eq!(config_candidates(None).len(), 1);
    }
}
