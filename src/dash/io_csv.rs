// Primitives for reading the CSV input files.

use std::fs::File;

use election_results::{CandidateFiling, ConstituencyResult, DeclaredWinner, TurnoutRow};
use log::{debug, info};
use snafu::prelude::*;

use crate::dash::{
    io_common::{simplify_file_name, Columns},
    *,
};

pub fn read_candidates(path: &str) -> BDashResult<Vec<CandidateFiling>> {
    let (columns, records) = get_records(path)?;
    let state = columns.required("State")?;
    let constituency_no = columns.required("Constituency_No")?;
    let candidate_name = columns.required("Candidate Name")?;
    let party = columns.required("Party")?;
    let gender = columns.optional("Gender");
    let age = columns.optional("Age");
    let application_status = columns.optional("Application Status");
    let phase = columns.optional("Phase");

    let mut res: Vec<CandidateFiling> = Vec::new();
    for (idx, line_r) in records.enumerate() {
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { path, lineno })?;
        res.push(CandidateFiling {
            state: columns.cell(&line, state, lineno)?,
            constituency_no: columns.cell(&line, constituency_no, lineno)?,
            candidate_name: columns.cell(&line, candidate_name, lineno)?,
            party: columns.cell(&line, party, lineno)?,
            gender: columns.optional_cell(&line, gender, lineno)?,
            age: columns.optional_cell(&line, age, lineno)?,
            application_status: columns.optional_cell(&line, application_status, lineno)?,
            phase: columns.optional_cell(&line, phase, lineno)?,
        });
    }
    info!(
        "read_candidates: {} filings from {}",
        res.len(),
        simplify_file_name(path)
    );
    Ok(res)
}

pub fn read_results(path: &str) -> BDashResult<Vec<ConstituencyResult>> {
    let (columns, records) = get_records(path)?;
    let state = columns.required("State")?;
    let pc_no = columns.required("PC No")?;
    let pc_name = columns.required("PC Name")?;
    let candidate = columns.required("Candidate")?;
    let party = columns.required("Party")?;
    let total_votes = columns.required("Total Votes")?;

    let mut res: Vec<ConstituencyResult> = Vec::new();
    for (idx, line_r) in records.enumerate() {
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { path, lineno })?;
        debug!("read_results: lineno: {:?} row: {:?}", lineno, line);
        res.push(ConstituencyResult {
            state: columns.cell(&line, state, lineno)?,
            pc_no: columns.cell(&line, pc_no, lineno)?,
            pc_name: columns.cell(&line, pc_name, lineno)?,
            candidate: columns.cell(&line, candidate, lineno)?,
            party: columns.cell(&line, party, lineno)?,
            total_votes: columns.cell(&line, total_votes, lineno)?,
        });
    }
    info!(
        "read_results: {} results from {}",
        res.len(),
        simplify_file_name(path)
    );
    Ok(res)
}

pub fn read_winners(path: &str) -> BDashResult<Vec<DeclaredWinner>> {
    let (columns, records) = get_records(path)?;
    let state = columns.required("State")?;
    let pc_no = columns.required("PC No")?;
    let pc_name = columns.optional("PC Name");
    let winning_candidate = columns.required("Winning Candidate")?;
    let winning_party = columns.required("Winning Party")?;
    let margin_votes = columns.required("Margin Votes")?;

    let mut res: Vec<DeclaredWinner> = Vec::new();
    for (idx, line_r) in records.enumerate() {
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { path, lineno })?;
        res.push(DeclaredWinner {
            state: columns.cell(&line, state, lineno)?,
            pc_no: columns.cell(&line, pc_no, lineno)?,
            pc_name: columns.optional_cell(&line, pc_name, lineno)?,
            winning_candidate: columns.cell(&line, winning_candidate, lineno)?,
            winning_party: columns.cell(&line, winning_party, lineno)?,
            margin_votes: columns.cell(&line, margin_votes, lineno)?,
        });
    }
    info!(
        "read_winners: {} winners from {}",
        res.len(),
        simplify_file_name(path)
    );
    Ok(res)
}

pub fn read_turnout(path: &str) -> BDashResult<Vec<TurnoutRow>> {
    let (columns, records) = get_records(path)?;
    let state = columns.required("State/UT")?;
    let pc = columns.required("PC")?;
    let male = columns.required("Male")?;
    let female = columns.required("Female")?;
    let others = columns.required("Others")?;
    let total = columns.required("Total")?;

    let mut res: Vec<TurnoutRow> = Vec::new();
    for (idx, line_r) in records.enumerate() {
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { path, lineno })?;
        res.push(TurnoutRow {
            state: columns.cell(&line, state, lineno)?,
            pc: columns.cell(&line, pc, lineno)?,
            male: columns.count_cell(&line, male, "Male", lineno)?,
            female: columns.count_cell(&line, female, "Female", lineno)?,
            others: columns.count_cell(&line, others, "Others", lineno)?,
            total: columns.count_cell(&line, total, "Total", lineno)?,
        });
    }
    info!(
        "read_turnout: {} constituencies from {}",
        res.len(),
        simplify_file_name(path)
    );
    Ok(res)
}

// Short lines are accepted by the reader and reported when a missing cell is needed.
fn get_records(path: &str) -> DashResult<(Columns, csv::StringRecordsIntoIter<File>)> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    let headers = rdr.headers().context(CsvOpenSnafu { path })?.clone();
    debug!("get_records: {}: header: {:?}", path, headers);
    Ok((Columns::new(path, &headers), rdr.into_records()))
}
