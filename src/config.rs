use chrono::{Datelike, Local};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::compiler;
use crate::datetime::WeekStart;
use crate::error::{Error, Result};
use crate::render;

const CONFIG_PATH_ENV_VAR: &str = "CALGRID_CONFIG_FILE";

pub(crate) fn find_configfile_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();

    if let Some(path) = env::var_os(CONFIG_PATH_ENV_VAR) {
        locations.push(PathBuf::from(path));
    }

    if let Some(dir) = dirs::config_dir() {
        locations.push(dir.join("calgrid").join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        locations.push(home.join(".calgrid.toml"));
    }

    locations
}

/// Loads the config at `path`, or the first one found in the default
/// locations. Without any config file the defaults are used.
pub fn load_suitable_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return Config::from_file(path);
    }

    for location in find_configfile_locations() {
        if location.is_file() {
            return Config::from_file(&location);
        }
    }

    log::info!("No config file found, using defaults");
    Ok(Config::default())
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Defaults to the current year.
    pub year: Option<i32>,
    pub num_months: i32,
    pub start_month: u32,
    pub week_start: WeekStart,
    pub show_day_number: bool,
    pub events: Option<PathBuf>,
    pub template_dir: Option<PathBuf>,
    pub template: String,
    pub output: PathBuf,
    pub compile: bool,
    pub compiler: CompilerConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerConfig {
    pub program: String,
    pub args: Vec<String>,
    pub packages: Vec<String>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            year: None,
            num_months: 12,
            start_month: 1,
            week_start: WeekStart::default(),
            show_day_number: false,
            events: None,
            template_dir: None,
            template: render::BUILTIN_TEMPLATE.to_owned(),
            output: PathBuf::from("generated").join("index.tex"),
            compile: false,
            compiler: CompilerConfig::default(),
        }
    }
}

impl Default for CompilerConfig {
    fn default() -> CompilerConfig {
        CompilerConfig {
            program: compiler::DEFAULT_PROGRAM.to_owned(),
            args: Vec::new(),
            packages: vec!["calendar".to_owned(), "geometry".to_owned()],
        }
    }
}

impl Config {
    /// Relative paths set in the file are taken relative to the file's directory.
    pub fn from_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|err| {
            Error::from(err).with_msg(&format!("could not read config '{}'", path.display()))
        })?;

        let table: toml::Value = toml::from_str(&content)?;
        let mut config = Config::from_toml(table.clone())?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base, table.get("output").is_some());
        }

        log::info!("Using config '{}'", path.display());
        Ok(config)
    }

    pub(crate) fn from_toml(table: toml::Value) -> Result<Config> {
        // A bad week start is a configuration error, not a syntax error
        if let Some(week_start) = table.get("week_start").and_then(toml::Value::as_str) {
            week_start.parse::<WeekStart>()?;
        }

        Ok(table.try_into()?)
    }

    pub fn year(&self) -> i32 {
        self.year.unwrap_or_else(|| Local::now().year())
    }

    fn resolve_paths(&mut self, base: &Path, output_set: bool) {
        let resolve = |path: &Path| -> PathBuf {
            if path.is_relative() {
                base.join(path)
            } else {
                path.to_owned()
            }
        };

        self.events = self.events.as_deref().map(resolve);
        self.template_dir = self.template_dir.as_deref().map(resolve);
        if output_set {
            self.output = resolve(&self.output);
        }
    }
}
