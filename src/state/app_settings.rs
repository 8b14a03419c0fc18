use anyhow::Context;
use log::LevelFilter;
use nrl_api::config::Config;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const CONFIG_ENV: &str = "NRLTUI_CONFIG";
const LOG_ENV: &str = "NRLTUI_LOG";
const DEV_ENV: &str = "NRLTUI_DEV";

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    pub config: Config,
}

impl AppSettings {
    /// Read the widget config from `config_path`, falling back to `NRLTUI_CONFIG`,
    /// then to defaults. A file that exists but can't be read or parsed is an error.
    pub fn load(config_path: Option<PathBuf>) -> anyhow::Result<Self> {
        let path = config_path.or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
        let mut config = match path {
            Some(path) => load_config(&path)?,
            None => Config::default(),
        };

        if std::env::var(DEV_ENV).is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true")) {
            config.development = true;
        }

        let log_level = std::env::var(LOG_ENV)
            .ok()
            .and_then(|level| LevelFilter::from_str(level.trim()).ok());

        Ok(Self { full_screen: false, log_level, config })
    }
}

fn load_config(path: &Path) -> anyhow::Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("could not read config {}", path.display()))?;
    Config::from_json(&content).with_context(|| format!("invalid config json at {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nrl_api::config::Mode;

    #[test]
    fn config_file_is_parsed_and_corrected() {
        let path = std::env::temp_dir().join(format!("nrltui-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "mode": "upcoming", "maximumEntries": 0, "focus_on": ["Broncos"] }"#)
            .unwrap();

        let config = load_config(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.mode, Mode::Upcoming);
        assert_eq!(config.maximum_entries, 10);
        assert_eq!(config.focus_on, vec!["Broncos".to_string()]);
    }

    #[test]
    fn mistyped_config_values_still_load() {
        let path = std::env::temp_dir().join(format!("nrltui-mistyped-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "mode": null, "maximumEntries": "5" }"#).unwrap();

        let config = load_config(&path);
        std::fs::remove_file(&path).ok();

        let config = config.unwrap();
        assert_eq!(config.mode, Mode::All);
        assert_eq!(config.maximum_entries, 5);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let err = load_config(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("could not read config"));
    }
}
