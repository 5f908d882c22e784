use log::{debug, info, warn};

use election_results::*;
use snafu::prelude::*;

use std::fs;

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::dash::config_reader::*;

pub mod config_reader;
mod export;
mod io_common;
mod io_csv;

#[derive(Debug, Snafu)]
pub enum DashError {
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno} of {path}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Line {lineno} of {path} is too short"))]
    CsvLineTooShort { path: String, lineno: usize },
    #[snafu(display("Missing column {column:?} in {path}"))]
    MissingColumn { column: String, path: String },
    #[snafu(display("Error opening JSON file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("The config file has no parent directory"))]
    MissingParentDir {},
    #[snafu(display("Error writing {path}"))]
    Writing {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing CSV file {path}"))]
    CsvWrite { source: csv::Error, path: String },
    #[snafu(display("Difference detected between the dashboard and the reference {path}"))]
    ReferenceMismatch { path: String },
}

pub type DashResult<T> = Result<T, DashError>;

pub type BDashResult<T> = Result<T, Box<DashError>>;

const NOT_FILTERED: &str = "No election results are available to select a state from.";
const NO_RESULTS: &str = "No data available for the selected filters.";
const NO_PARTY_PERFORMANCE: &str =
    "No data available for party performance in the selected filters.";
const NO_PARTY_VOTES: &str = "No votes recorded for parties in the selected filters.";
const NO_STATE_SUMMARY: &str = "No data available for state-wise summary.";
const NO_TURNOUT: &str = "No data available for the selected state.";
const NO_DEMOGRAPHICS: &str = "No demographic data available for the selected state.";

/// The values offered to each selector.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Choices {
    pub states: Vec<String>,
    /// Parties of the selected state.
    pub parties: Vec<String>,
    /// Candidates of the selected state.
    pub candidates: Vec<String>,
    pub voter_states: Vec<String>,
}

/// Everything shown for one selection.
#[derive(PartialEq, Debug, Clone)]
pub struct DashboardView {
    /// None when there was no state to select: the results have not been filtered.
    pub election: Option<FilteredResults>,
    pub winners: Vec<WinnerProfile>,
    /// None when there was no state/UT to select.
    pub turnout: Option<TurnoutView>,
    pub choices: Choices,
}

/// The session: the tables are loaded and joined once, then rendered for any number
/// of selections.
pub struct Dashboard {
    unified: Vec<UnifiedRow>,
    winners: Vec<DeclaredWinner>,
    turnout: Vec<TurnoutRow>,
}

impl Dashboard {
    pub fn new(
        results: &[ConstituencyResult],
        candidates: &[CandidateFiling],
        winners: Vec<DeclaredWinner>,
        turnout: Vec<TurnoutRow>,
    ) -> Dashboard {
        let unified = unify_results(results, candidates, &winners);
        Dashboard {
            unified,
            winners,
            turnout,
        }
    }

    pub fn load(inputs: &InputPaths) -> BDashResult<Dashboard> {
        info!("Loading input files {:?}", inputs);
        let candidates = io_csv::read_candidates(&inputs.candidates)?;
        let results = io_csv::read_results(&inputs.results)?;
        let winners = io_csv::read_winners(&inputs.winners)?;
        let turnout = io_csv::read_turnout(&inputs.turnout)?;
        Ok(Dashboard::new(&results, &candidates, winners, turnout))
    }

    pub fn unified(&self) -> &[UnifiedRow] {
        &self.unified
    }

    pub fn turnout(&self) -> &[TurnoutRow] {
        &self.turnout
    }

    pub fn view(&self, selection: &Selection) -> DashboardView {
        let states = state_choices(&self.unified);
        let state = selection.state.clone().or_else(|| states.first().cloned());
        debug!("view: state {:?} among {:?}", state, states);

        let (election, winners, parties, candidates) = match state.as_deref() {
            Some(s) => {
                let filter = ElectionFilter {
                    state: s.to_string(),
                    parties: selection.parties.clone(),
                    candidates: selection.candidates.clone(),
                };
                (
                    Some(filter_results(&self.unified, &filter)),
                    winner_roster(&self.winners, s),
                    party_choices(&self.unified, s),
                    candidate_choices(&self.unified, s),
                )
            }
            None => (None, vec![], vec![], vec![]),
        };

        let voter_states = turnout_state_choices(&self.turnout);
        let voter_state = selection
            .voter_state
            .clone()
            .or_else(|| voter_states.first().cloned());
        let turnout = voter_state
            .as_deref()
            .map(|s| filter_turnout(&self.turnout, s));

        DashboardView {
            election,
            winners,
            turnout,
            choices: Choices {
                states,
                parties,
                candidates,
                voter_states,
            },
        }
    }
}

fn message_js(message: &str) -> JSValue {
    json!({ "message": message })
}

fn selector_to_json(sel: &Selector) -> JSValue {
    match sel {
        Selector::AllOf => JSValue::Null,
        Selector::SubsetOf(values) => json!(values),
    }
}

pub fn choices_to_json(choices: &Choices) -> JSValue {
    json!({
        "states": choices.states,
        "parties": choices.parties,
        "candidates": choices.candidates,
        "voterStates": choices.voter_states,
    })
}

fn turnout_rows_to_json(rows: &[TurnoutRow]) -> Vec<JSValue> {
    rows.iter()
        .map(|r| {
            json!({
                "state": r.state,
                "pc": r.pc,
                "male": r.male,
                "female": r.female,
                "others": r.others,
                "total": r.total,
            })
        })
        .collect()
}

fn election_sections(view: &DashboardView) -> JSMap {
    let mut sections = JSMap::new();
    let filtered = match &view.election {
        None => {
            for k in [
                "constituencyResults",
                "partyPerformance",
                "winningCandidates",
                "stateSummary",
            ] {
                sections.insert(k.to_string(), message_js(NOT_FILTERED));
            }
            return sections;
        }
        Some(f) => f,
    };

    if filtered.is_empty() {
        sections.insert("constituencyResults".to_string(), message_js(NO_RESULTS));
        sections.insert(
            "partyPerformance".to_string(),
            message_js(NO_PARTY_PERFORMANCE),
        );
        sections.insert(
            "winningCandidates".to_string(),
            message_js(&format!(
                "No data available for winning candidate profiles in {}.",
                filtered.state
            )),
        );
        sections.insert("stateSummary".to_string(), message_js(NO_STATE_SUMMARY));
        return sections;
    }

    let rows: Vec<JSValue> = filtered
        .rows
        .iter()
        .map(|r| {
            json!({
                "pcName": r.pc_name,
                "totalVotes": r.total_votes,
                "party": r.party,
                "candidateName": r.candidate_name,
                "gender": r.gender,
                "age": r.age,
                "applicationStatus": r.application_status,
            })
        })
        .collect();
    sections.insert("constituencyResults".to_string(), json!({ "rows": rows }));

    let by_party = party_totals(&filtered.rows);
    let party_performance = if by_party.is_empty() {
        message_js(NO_PARTY_VOTES)
    } else {
        let totals: Vec<JSValue> = by_party
            .iter()
            .map(|t| json!({"party": t.party, "totalVotes": t.total_votes}))
            .collect();
        json!({ "totals": totals })
    };
    sections.insert("partyPerformance".to_string(), party_performance);

    let winners: Vec<JSValue> = view
        .winners
        .iter()
        .map(|w| {
            json!({
                "winningCandidate": w.winning_candidate,
                "winningParty": w.winning_party,
                "state": w.state,
                "marginVotes": w.margin_votes,
            })
        })
        .collect();
    sections.insert("winningCandidates".to_string(), json!({ "rows": winners }));

    let totals: Vec<JSValue> = state_party_totals(&filtered.rows)
        .iter()
        .map(|t| json!({"state": t.state, "party": t.party, "totalVotes": t.total_votes}))
        .collect();
    sections.insert("stateSummary".to_string(), json!({ "totals": totals }));
    sections
}

fn turnout_sections(view: &DashboardView) -> JSMap {
    let mut sections = JSMap::new();
    let (turnout_js, demographics_js) = match &view.turnout {
        Some(t) if !t.is_empty() => {
            let sums = t.sums();
            let rows: Vec<JSValue> = t
                .rows
                .iter()
                .map(|r| {
                    json!({"pc": r.pc, "male": r.male, "female": r.female, "others": r.others})
                })
                .collect();
            (
                json!({"rows": rows, "totalVoters": sums.total}),
                json!({"male": sums.male, "female": sums.female, "others": sums.others}),
            )
        }
        _ => (
            json!({"message": NO_TURNOUT, "totalVoters": 0}),
            message_js(NO_DEMOGRAPHICS),
        ),
    };
    sections.insert("voterTurnout".to_string(), turnout_js);
    sections.insert("voterDemographics".to_string(), demographics_js);
    sections
}

type JSMap = serde_json::Map<String, JSValue>;

/// Assembles the dashboard document for a view.
///
/// `raw_voter_data`: the complete turnout table, when it should be shown.
pub fn build_dashboard_js(
    view: &DashboardView,
    selection: &Selection,
    raw_voter_data: Option<&[TurnoutRow]>,
) -> JSValue {
    let mut doc = JSMap::new();
    doc.insert(
        "selection".to_string(),
        json!({
            "state": view.election.as_ref().map(|e| e.state.clone()),
            "parties": selector_to_json(&selection.parties),
            "candidates": selector_to_json(&selection.candidates),
            "voterState": view.turnout.as_ref().map(|t| t.state.clone()),
        }),
    );
    doc.insert("choices".to_string(), choices_to_json(&view.choices));
    doc.extend(election_sections(view));
    doc.extend(turnout_sections(view));
    if let Some(rows) = raw_voter_data {
        doc.insert(
            "rawVoterData".to_string(),
            JSValue::Array(turnout_rows_to_json(rows)),
        );
    }
    JSValue::Object(doc)
}

fn write_output(out: Option<&str>, contents: &str) -> DashResult<()> {
    match out {
        None | Some("") | Some("stdout") => {
            println!("{}", contents);
            Ok(())
        }
        Some(path) => {
            info!("Writing dashboard to {}", path);
            fs::write(path, contents).context(WritingSnafu { path })
        }
    }
}

fn export_views(dir: &str, view: &DashboardView) -> BDashResult<()> {
    match &view.election {
        Some(election) => {
            export::write_election_results(dir, election)?;
        }
        None => warn!("No state selected, the election results are not exported"),
    }
    match &view.turnout {
        Some(turnout) => {
            export::write_voter_data(dir, turnout)?;
        }
        None => warn!("No state/UT selected, the voter data is not exported"),
    }
    Ok(())
}

fn check_reference(reference_path: &str, pretty_js: &str) -> DashResult<()> {
    let contents = fs::read_to_string(reference_path).context(OpeningJsonSnafu {
        path: reference_path,
    })?;
    let reference: JSValue = serde_json::from_str(&contents).context(ParsingJsonSnafu {})?;
    let pretty_reference = serde_json::to_string_pretty(&reference).context(ParsingJsonSnafu {})?;
    if pretty_reference != pretty_js {
        warn!("Found differences with the reference {}", reference_path);
        print_diff(pretty_reference.as_str(), pretty_js, "\n");
        return ReferenceMismatchSnafu {
            path: reference_path,
        }
        .fail();
    }
    info!("The dashboard matches the reference {}", reference_path);
    Ok(())
}

pub fn run_dashboard(args: &Args) -> BDashResult<()> {
    let settings = read_settings(args)?;
    info!("settings: {:?}", settings);

    let dashboard = Dashboard::load(&settings.inputs)?;
    info!("Unified results: {} rows", dashboard.unified().len());
    let view = dashboard.view(&settings.selection);

    let result_js = if args.list_choices {
        choices_to_json(&view.choices)
    } else {
        let raw = if args.show_raw_voter_data {
            Some(dashboard.turnout())
        } else {
            None
        };
        build_dashboard_js(&view, &settings.selection, raw)
    };
    let pretty_js = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;
    write_output(args.out.as_deref(), &pretty_js)?;

    if args.list_choices {
        return Ok(());
    }

    if let Some(dir) = &settings.export_directory {
        export_views(dir, &view)?;
    }

    if let Some(reference_path) = &args.reference {
        check_reference(reference_path, &pretty_js)?;
    }
    Ok(())
}
