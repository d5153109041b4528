//! Skirmish configuration read from the process environment.
use std::env;
use std::path::PathBuf;

/// Where to find content and how long to let a skirmish run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkirmishConfig {
    pub data_dir: PathBuf,
    pub scenario: String,
    pub max_rounds: u32,
}

impl Default for SkirmishConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(Self::DEFAULT_DATA_DIR),
            scenario: Self::DEFAULT_SCENARIO.to_string(),
            max_rounds: Self::DEFAULT_MAX_ROUNDS,
        }
    }
}

impl SkirmishConfig {
    pub const DEFAULT_DATA_DIR: &'static str = "data";
    pub const DEFAULT_SCENARIO: &'static str = "crossing";
    pub const DEFAULT_MAX_ROUNDS: u32 = 50;

    /// Construct configuration from environment variables.
    ///
    /// Environment variables:
    /// - `TACTICS_DATA_DIR` - Content directory (default: `data`)
    /// - `TACTICS_SCENARIO` - Scenario name under `scenarios/` (default: `crossing`)
    /// - `TACTICS_MAX_ROUNDS` - Round cap before declaring a stalemate (default: 50)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = lookup("TACTICS_DATA_DIR").filter(|dir| !dir.is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(scenario) = lookup("TACTICS_SCENARIO").filter(|name| !name.is_empty()) {
            config.scenario = scenario;
        }
        if let Some(rounds) = read_var::<u32>(&lookup, "TACTICS_MAX_ROUNDS") {
            config.max_rounds = rounds.max(1);
        }

        config
    }
}

fn read_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    lookup(key)?.trim().parse().ok()
}
