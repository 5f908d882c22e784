use std::fs;
use std::path::Path;

use election_results::Selector;
use log::debug;
use serde::{Deserialize, Serialize};
use snafu::prelude::*;

use crate::args::Args;
use crate::dash::{io_common::resolve_path, *};

pub const DEFAULT_CANDIDATES_FILE: &str = "candidates_with_phase.csv";
pub const DEFAULT_RESULTS_FILE: &str = "results_2024.csv";
pub const DEFAULT_WINNERS_FILE: &str = "results_2024_winners.csv";
pub const DEFAULT_TURNOUT_FILE: &str = "STATE2.csv";

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionConfig {
    pub state: Option<String>,
    /// Absent or null: every party of the state.
    pub parties: Option<Vec<String>>,
    /// Absent or null: every candidate of the state.
    pub candidates: Option<Vec<String>>,
    #[serde(rename = "voterState")]
    pub voter_state: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashConfig {
    #[serde(rename = "candidatesFile")]
    pub candidates_file: Option<String>,
    #[serde(rename = "resultsFile")]
    pub results_file: Option<String>,
    #[serde(rename = "winnersFile")]
    pub winners_file: Option<String>,
    #[serde(rename = "turnoutFile")]
    pub turnout_file: Option<String>,
    #[serde(rename = "exportDirectory")]
    pub export_directory: Option<String>,
    pub selection: Option<SelectionConfig>,
}

/// The location of the four input files.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct InputPaths {
    pub candidates: String,
    pub results: String,
    pub winners: String,
    pub turnout: String,
}

impl Default for InputPaths {
    fn default() -> Self {
        InputPaths {
            candidates: DEFAULT_CANDIDATES_FILE.to_string(),
            results: DEFAULT_RESULTS_FILE.to_string(),
            winners: DEFAULT_WINNERS_FILE.to_string(),
            turnout: DEFAULT_TURNOUT_FILE.to_string(),
        }
    }
}

/// The selections made by the user. A missing state means the first available one.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Selection {
    pub state: Option<String>,
    pub parties: Selector,
    pub candidates: Selector,
    pub voter_state: Option<String>,
}

/// Everything a run needs, once the config file and the arguments are merged.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Settings {
    pub inputs: InputPaths,
    pub selection: Selection,
    pub export_directory: Option<String>,
}

pub fn read_config(path: &str) -> DashResult<DashConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: DashConfig = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

fn selector(values: Option<Vec<String>>) -> Selector {
    match values {
        Some(values) => Selector::subset_of(values),
        None => Selector::AllOf,
    }
}

impl Settings {
    /// Settings from a config file. Relative paths are resolved against `root`, the
    /// directory of the config file.
    pub fn from_config(config: &DashConfig, root: &Path) -> Settings {
        let defaults = InputPaths::default();
        let resolve = |p: &Option<String>, default: &str| -> String {
            resolve_path(root, p.as_deref().unwrap_or(default))
        };
        let selection = config.selection.clone().unwrap_or_default();
        Settings {
            inputs: InputPaths {
                candidates: resolve(&config.candidates_file, &defaults.candidates),
                results: resolve(&config.results_file, &defaults.results),
                winners: resolve(&config.winners_file, &defaults.winners),
                turnout: resolve(&config.turnout_file, &defaults.turnout),
            },
            selection: Selection {
                state: selection.state,
                parties: selector(selection.parties),
                candidates: selector(selection.candidates),
                voter_state: selection.voter_state,
            },
            export_directory: config
                .export_directory
                .as_ref()
                .map(|p| resolve_path(root, p)),
        }
    }

    /// Applies the command line, which takes precedence over the config file.
    pub fn with_args(mut self, args: &Args) -> Settings {
        if let Some(p) = &args.candidates {
            self.inputs.candidates = p.clone();
        }
        if let Some(p) = &args.results {
            self.inputs.results = p.clone();
        }
        if let Some(p) = &args.winners {
            self.inputs.winners = p.clone();
        }
        if let Some(p) = &args.turnout {
            self.inputs.turnout = p.clone();
        }
        if args.state.is_some() {
            self.selection.state = args.state.clone();
        }
        if !args.party.is_empty() {
            self.selection.parties = Selector::subset_of(args.party.clone());
        }
        if !args.candidate.is_empty() {
            self.selection.candidates = Selector::subset_of(args.candidate.clone());
        }
        if args.voter_state.is_some() {
            self.selection.voter_state = args.voter_state.clone();
        }
        if args.export_dir.is_some() {
            self.export_directory = args.export_dir.clone();
        }
        self
    }
}

/// Merges the config file, if any, with the command line.
pub fn read_settings(args: &Args) -> DashResult<Settings> {
    let settings = match &args.config {
        Some(config_path) => {
            let config = read_config(config_path)?;
            let root = Path::new(config_path.as_str())
                .parent()
                .context(MissingParentDirSnafu {})?;
            Settings::from_config(&config, root)
        }
        None => Settings::default(),
    };
    Ok(settings.with_args(args))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dash::tests::{data_path, test_args};

    #[test]
    fn parses_config() {
        let config = read_config(&data_path("dashboard.json")).unwrap();
        assert_eq!(config.results_file.as_deref(), Some("results_2024.csv"));
        assert_eq!(config.export_directory, None);
        let selection = config.selection.unwrap();
        assert_eq!(selection.voter_state.as_deref(), Some("Kerala"));
        assert_eq!(selection.candidates, None);
    }

    #[test]
    fn resolves_paths_against_the_config_directory() {
        let config: DashConfig =
            serde_json::from_str(r#"{"resultsFile": "r.csv", "exportDirectory": "out"}"#).unwrap();
        let settings = Settings::from_config(&config, Path::new("/data"));
        assert_eq!(settings.inputs.results, "/data/r.csv");
        assert_eq!(settings.inputs.winners, "/data/results_2024_winners.csv");
        assert_eq!(settings.export_directory.as_deref(), Some("/data/out"));
        assert_eq!(settings.selection, Selection::default());
    }

    #[test]
    fn null_list_selects_everything() {
        let config: DashConfig = serde_json::from_str(
            r#"{"selection": {"state": "Goa", "parties": ["BJP"], "candidates": null}}"#,
        )
        .unwrap();
        let settings = Settings::from_config(&config, Path::new("."));
        assert_eq!(settings.selection.state.as_deref(), Some("Goa"));
        assert_eq!(settings.selection.parties, Selector::subset_of(["BJP"]));
        assert_eq!(settings.selection.candidates, Selector::AllOf);
        assert_eq!(settings.selection.voter_state, None);
    }

    #[test]
    fn arguments_override_the_config() {
        let mut args = test_args();
        args.config = Some(data_path("dashboard.json"));
        args.state = Some("Goa".to_string());
        args.candidate = vec!["Farah Dias".to_string()];
        args.results = Some("elsewhere.csv".to_string());
        let settings = read_settings(&args).unwrap();
        assert_eq!(settings.selection.state.as_deref(), Some("Goa"));
        assert_eq!(
            settings.selection.parties,
            Selector::subset_of(["Indian National Congress", "Independent"])
        );
        assert_eq!(
            settings.selection.candidates,
            Selector::subset_of(["Farah Dias"])
        );
        assert_eq!(settings.selection.voter_state.as_deref(), Some("Kerala"));
        assert_eq!(settings.inputs.results, "elsewhere.csv");
        assert_eq!(settings.inputs.turnout, data_path("STATE2.csv"));
    }

    #[test]
    fn defaults_without_config() {
        let settings = read_settings(&test_args()).unwrap();
        assert_eq!(settings.inputs, InputPaths::default());
        assert_eq!(settings.selection, Selection::default());
    }

    #[test]
    fn malformed_config_is_fatal() {
        let err = read_config(&data_path("STATE2.csv")).unwrap_err();
        assert!(matches!(err, DashError::ParsingJson { .. }));
    }
}
