// Exports of the filtered views as CSV files.

use std::fs;
use std::path::Path;

use election_results::{FilteredResults, TurnoutView};
use log::info;
use snafu::prelude::*;

use crate::dash::{io_common::export_file_name, *};

const ELECTION_HEADER: [&str; 13] = [
    "State",
    "PC No",
    "PC Name",
    "Candidate Name",
    "Party",
    "Total Votes",
    "Gender",
    "Age",
    "Application Status",
    "Phase",
    "Winning Candidate",
    "Winning Party",
    "Margin Votes",
];

const VOTER_HEADER: [&str; 6] = ["State/UT", "PC", "Male", "Female", "Others", "Total"];

fn create_writer(dir: &str, file_name: &str) -> DashResult<(String, csv::Writer<fs::File>)> {
    fs::create_dir_all(dir).context(WritingSnafu { path: dir })?;
    let path = Path::new(dir).join(file_name).display().to_string();
    let wtr = csv::Writer::from_path(&path).context(CsvWriteSnafu {
        path: path.as_str(),
    })?;
    Ok((path, wtr))
}

/// Writes `{state}_election_results.csv` in `dir` and returns its path.
pub fn write_election_results(dir: &str, view: &FilteredResults) -> BDashResult<String> {
    let (path, mut wtr) = create_writer(dir, &export_file_name(&view.state, "election_results"))?;
    wtr.write_record(ELECTION_HEADER)
        .context(CsvWriteSnafu { path: path.as_str() })?;
    for r in view.rows.iter() {
        let total_votes = r.total_votes.to_string();
        wtr.write_record([
            r.state.as_str(),
            r.pc_no.as_str(),
            r.pc_name.as_str(),
            r.candidate_name.as_str(),
            r.party.as_str(),
            total_votes.as_str(),
            r.gender.as_str(),
            r.age.as_str(),
            r.application_status.as_str(),
            r.phase.as_str(),
            r.winning_candidate.as_str(),
            r.winning_party.as_str(),
            r.margin_votes.as_str(),
        ])
        .context(CsvWriteSnafu { path: path.as_str() })?;
    }
    wtr.flush().context(WritingSnafu { path: path.as_str() })?;
    info!("Exported {} election rows to {}", view.rows.len(), path);
    Ok(path)
}

/// Writes `{state}_voter_data.csv` in `dir` and returns its path.
pub fn write_voter_data(dir: &str, view: &TurnoutView) -> BDashResult<String> {
    let (path, mut wtr) = create_writer(dir, &export_file_name(&view.state, "voter_data"))?;
    wtr.write_record(VOTER_HEADER)
        .context(CsvWriteSnafu { path: path.as_str() })?;
    for r in view.rows.iter() {
        wtr.write_record(&[
            r.state.clone(),
            r.pc.clone(),
            r.male.to_string(),
            r.female.to_string(),
            r.others.to_string(),
            r.total.to_string(),
        ])
        .context(CsvWriteSnafu { path: path.as_str() })?;
    }
    wtr.flush().context(WritingSnafu { path: path.as_str() })?;
    info!("Exported {} voter rows to {}", view.rows.len(), path);
    Ok(path)
}
