mod records;
mod selector;
mod turnout;

pub mod manual;

use log::{debug, info};

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

pub use crate::records::*;
pub use crate::selector::Selector;
pub use crate::turnout::*;

// **** Join ****

/// A constituency number as a join key: `01`, ` 1` and `1` are the same
/// constituency. Cells that are not integers are compared as written.
#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy)]
enum PcKey<'a> {
    Number(i64),
    Text(&'a str),
}

fn pc_key(cell: &str) -> PcKey {
    match cell.trim().parse::<i64>() {
        Ok(n) => PcKey::Number(n),
        Err(_) => PcKey::Text(cell),
    }
}

// (State, constituency number, candidate name, party)
type CandidateKey<'a> = (&'a str, PcKey<'a>, &'a str, &'a str);
// (State, constituency number)
type ConstituencyKey<'a> = (&'a str, PcKey<'a>);

/// Reads a Total Votes cell as a number.
///
/// The cell is trimmed and parsed as a decimal number. Anything else counts as zero:
/// empty cells, placeholders such as `-`, non-finite values, and numbers written with
/// thousands separators (`"1,234"` is zero, not 1234). Negative numbers are kept.
pub fn coerce_total_votes(cell: &str) -> f64 {
    match cell.trim().parse::<f64>() {
        Ok(x) if x.is_finite() => x,
        _ => 0.0,
    }
}

/// Builds the unified results table.
///
/// Results are joined with the candidate filings on (state, constituency number,
/// candidate name, party), then with the winners on (state, constituency number).
/// Both joins are inner joins: a result without a matching filing or without a
/// declared winner is dropped. Constituency numbers are compared as integers when
/// they are written as integers, every other key as exact text. Duplicated keys
/// fan out, one output row per matching pair, in the order of the results table.
///
/// The constituency name and the party are taken from the results table.
pub fn unify_results(
    results: &[ConstituencyResult],
    candidates: &[CandidateFiling],
    winners: &[DeclaredWinner],
) -> Vec<UnifiedRow> {
    info!(
        "Joining {} results, {} candidate filings, {} winners",
        results.len(),
        candidates.len(),
        winners.len()
    );

    let mut filings: HashMap<CandidateKey, Vec<&CandidateFiling>> = HashMap::new();
    for c in candidates.iter() {
        let key = (
            c.state.as_str(),
            pc_key(&c.constituency_no),
            c.candidate_name.as_str(),
            c.party.as_str(),
        );
        filings.entry(key).or_default().push(c);
    }

    let mut declared: HashMap<ConstituencyKey, Vec<&DeclaredWinner>> = HashMap::new();
    for w in winners.iter() {
        declared
            .entry((w.state.as_str(), pc_key(&w.pc_no)))
            .or_default()
            .push(w);
    }

    // First stage: results with their filings.
    let mut with_filings: Vec<(&ConstituencyResult, &CandidateFiling)> = Vec::new();
    for r in results.iter() {
        let key = (
            r.state.as_str(),
            pc_key(&r.pc_no),
            r.candidate.as_str(),
            r.party.as_str(),
        );
        if let Some(matches) = filings.get(&key) {
            for c in matches.iter() {
                with_filings.push((r, c));
            }
        }
    }
    debug!(
        "unify_results: {} rows after joining the candidate filings",
        with_filings.len()
    );

    // Second stage: the winner of each constituency.
    let mut res: Vec<UnifiedRow> = Vec::new();
    for (r, c) in with_filings.iter() {
        let Some(matches) = declared.get(&(r.state.as_str(), pc_key(&r.pc_no))) else {
            continue;
        };
        for w in matches.iter() {
            res.push(UnifiedRow {
                state: r.state.clone(),
                pc_no: r.pc_no.clone(),
                pc_name: r.pc_name.clone(),
                candidate_name: c.candidate_name.clone(),
                party: r.party.clone(),
                total_votes: coerce_total_votes(&r.total_votes),
                gender: c.gender.clone(),
                age: c.age.clone(),
                application_status: c.application_status.clone(),
                phase: c.phase.clone(),
                winning_candidate: w.winning_candidate.clone(),
                winning_party: w.winning_party.clone(),
                margin_votes: w.margin_votes.clone(),
            });
        }
    }
    info!("Unified results: {} rows", res.len());
    res
}

// **** Filtering ****

/// The selections applied to the unified results.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ElectionFilter {
    /// Required: there is no selection spanning all the states.
    pub state: String,
    pub parties: Selector,
    pub candidates: Selector,
}

impl ElectionFilter {
    /// Selects every party and every candidate of the state.
    pub fn state(state: &str) -> ElectionFilter {
        ElectionFilter {
            state: state.to_string(),
            parties: Selector::AllOf,
            candidates: Selector::AllOf,
        }
    }
}

/// The unified rows left after applying an `ElectionFilter`. It may be empty.
#[derive(PartialEq, Debug, Clone)]
pub struct FilteredResults {
    pub state: String,
    pub rows: Vec<UnifiedRow>,
}

impl FilteredResults {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub(crate) fn sorted_distinct<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let set: BTreeSet<&str> = values.into_iter().collect();
    set.into_iter().map(|s| s.to_string()).collect()
}

/// The sorted distinct states of the unified results.
pub fn state_choices(rows: &[UnifiedRow]) -> Vec<String> {
    sorted_distinct(rows.iter().map(|r| r.state.as_str()))
}

/// The rows of one state, in their original order.
pub fn rows_in_state<'a>(rows: &'a [UnifiedRow], state: &str) -> Vec<&'a UnifiedRow> {
    rows.iter().filter(|r| r.state == state).collect()
}

/// The sorted distinct parties running in the given state.
pub fn party_choices(rows: &[UnifiedRow], state: &str) -> Vec<String> {
    sorted_distinct(rows_in_state(rows, state).iter().map(|r| r.party.as_str()))
}

/// The sorted distinct candidates running in the given state.
pub fn candidate_choices(rows: &[UnifiedRow], state: &str) -> Vec<String> {
    sorted_distinct(
        rows_in_state(rows, state)
            .iter()
            .map(|r| r.candidate_name.as_str()),
    )
}

/// Applies the selections to the unified results.
///
/// The state is applied first. The party and candidate selectors are then resolved
/// against the rows of that state, so that `AllOf` means every party (or candidate)
/// present in the state and not in the whole country, and applied together.
pub fn filter_results(rows: &[UnifiedRow], filter: &ElectionFilter) -> FilteredResults {
    let in_state = rows_in_state(rows, &filter.state);
    let parties = filter
        .parties
        .resolve(in_state.iter().map(|r| r.party.as_str()));
    let candidates = filter
        .candidates
        .resolve(in_state.iter().map(|r| r.candidate_name.as_str()));

    let filtered: Vec<UnifiedRow> = in_state
        .into_iter()
        .filter(|r| parties.contains(&r.party) && candidates.contains(&r.candidate_name))
        .cloned()
        .collect();
    debug!(
        "filter_results: {:?}: {} rows, {} parties, {} candidates",
        filter.state,
        filtered.len(),
        parties.len(),
        candidates.len()
    );
    FilteredResults {
        state: filter.state.clone(),
        rows: filtered,
    }
}

// **** Aggregation ****

/// Total votes by party, sorted by party.
///
/// Parties whose total is zero or negative are left out.
pub fn party_totals(rows: &[UnifiedRow]) -> Vec<PartyTotal> {
    let mut tally: BTreeMap<&str, f64> = BTreeMap::new();
    for r in rows.iter() {
        *tally.entry(r.party.as_str()).or_insert(0.0) += r.total_votes;
    }
    tally
        .into_iter()
        .filter(|(_, total)| *total > 0.0)
        .map(|(party, total_votes)| PartyTotal {
            party: party.to_string(),
            total_votes,
        })
        .collect()
}

/// Total votes by state and party, sorted by state then party.
///
/// Unlike `party_totals`, groups with a zero total are kept.
pub fn state_party_totals(rows: &[UnifiedRow]) -> Vec<StatePartyTotal> {
    let mut tally: BTreeMap<(&str, &str), f64> = BTreeMap::new();
    for r in rows.iter() {
        *tally
            .entry((r.state.as_str(), r.party.as_str()))
            .or_insert(0.0) += r.total_votes;
    }
    tally
        .into_iter()
        .map(|((state, party), total_votes)| StatePartyTotal {
            state: state.to_string(),
            party: party.to_string(),
            total_votes,
        })
        .collect()
}

/// The winners declared in a state, without exact duplicates.
///
/// The roster only depends on the state: the party and candidate selections do not
/// apply to it.
pub fn winner_roster(winners: &[DeclaredWinner], state: &str) -> Vec<WinnerProfile> {
    let mut seen: HashSet<WinnerProfile> = HashSet::new();
    let mut res: Vec<WinnerProfile> = Vec::new();
    for w in winners.iter().filter(|w| w.state == state) {
        let profile = WinnerProfile {
            winning_candidate: w.winning_candidate.clone(),
            winning_party: w.winning_party.clone(),
            state: w.state.clone(),
            margin_votes: w.margin_votes.clone(),
        };
        if seen.insert(profile.clone()) {
            res.push(profile);
        }
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn result(
        state: &str,
        pc_no: &str,
        candidate: &str,
        party: &str,
        votes: &str,
    ) -> ConstituencyResult {
        ConstituencyResult {
            state: state.to_string(),
            pc_no: pc_no.to_string(),
            pc_name: format!("{}-{}", state, pc_no),
            candidate: candidate.to_string(),
            party: party.to_string(),
            total_votes: votes.to_string(),
        }
    }

    fn filing(state: &str, pc_no: &str, candidate: &str, party: &str) -> CandidateFiling {
        CandidateFiling {
            state: state.to_string(),
            constituency_no: pc_no.to_string(),
            candidate_name: candidate.to_string(),
            party: party.to_string(),
            gender: "F".to_string(),
            age: "45".to_string(),
            application_status: "Accepted".to_string(),
            phase: "1".to_string(),
        }
    }

    fn winner(
        state: &str,
        pc_no: &str,
        candidate: &str,
        party: &str,
        margin: &str,
    ) -> DeclaredWinner {
        DeclaredWinner {
            state: state.to_string(),
            pc_no: pc_no.to_string(),
            pc_name: format!("{}-{}", state, pc_no),
            winning_candidate: candidate.to_string(),
            winning_party: party.to_string(),
            margin_votes: margin.to_string(),
        }
    }

    // Two states, three constituencies. Kerala 2 has no declared winner and Goa 1 has
    // a result without a filing.
    fn fixture() -> (Vec<ConstituencyResult>, Vec<CandidateFiling>, Vec<DeclaredWinner>) {
        let results = vec![
            result("Kerala", "1", "Anna", "INC", "1200"),
            result("Kerala", "1", "Bala", "BJP", "800"),
            result("Kerala", "1", "Chandra", "IND", "NA"),
            result("Kerala", "2", "Devi", "INC", "700"),
            result("Goa", "1", "Elias", "BJP", "300"),
            result("Goa", "1", "Farah", "INC", "250"),
        ];
        let candidates = vec![
            filing("Kerala", "1", "Anna", "INC"),
            filing("Kerala", "1", "Bala", "BJP"),
            filing("Kerala", "1", "Chandra", "IND"),
            filing("Kerala", "2", "Devi", "INC"),
            filing("Goa", "1", "Elias", "BJP"),
        ];
        let winners = vec![
            winner("Kerala", "1", "Anna", "INC", "400"),
            winner("Goa", "1", "Elias", "BJP", "50"),
        ];
        (results, candidates, winners)
    }

    fn unified() -> Vec<UnifiedRow> {
        let (results, candidates, winners) = fixture();
        unify_results(&results, &candidates, &winners)
    }

    #[test]
    fn coercion() {
        assert_eq!(coerce_total_votes("1234"), 1234.0);
        assert_eq!(coerce_total_votes(" 12 "), 12.0);
        assert_eq!(coerce_total_votes("12.5"), 12.5);
        assert_eq!(coerce_total_votes("-5"), -5.0);
        assert_eq!(coerce_total_votes("1,234"), 0.0);
        assert_eq!(coerce_total_votes(""), 0.0);
        assert_eq!(coerce_total_votes("-"), 0.0);
        assert_eq!(coerce_total_votes("NaN"), 0.0);
        assert_eq!(coerce_total_votes("inf"), 0.0);
    }

    #[test]
    fn join_keeps_rows_present_in_all_sources() {
        init();
        let rows = unified();
        let names: Vec<&str> = rows.iter().map(|r| r.candidate_name.as_str()).collect();
        assert_eq!(names, vec!["Anna", "Bala", "Chandra", "Elias"]);
        assert!(rows.iter().all(|r| r.total_votes.is_finite()));
        assert_eq!(rows[2].total_votes, 0.0);
        assert_eq!(rows[0].winning_candidate, "Anna");
        assert_eq!(rows[0].pc_name, "Kerala-1");
        assert_eq!(rows[0].gender, "F");
    }

    #[test]
    fn join_separator_literal_counts_as_zero() {
        let results = vec![result("X", "1", "A", "P", "1,234")];
        let candidates = vec![filing("X", "1", "A", "P")];
        let winners = vec![winner("X", "1", "A", "P", "10")];
        let rows = unify_results(&results, &candidates, &winners);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total_votes, 0.0);

        let results = vec![result("X", "1", "A", "P", "1234")];
        let rows = unify_results(&results, &candidates, &winners);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total_votes, 1234.0);
    }

    #[test]
    fn join_on_disjoint_keys_is_empty() {
        let (results, candidates, _) = fixture();
        let winners = vec![winner("Punjab", "9", "Z", "AAP", "1")];
        assert!(unify_results(&results, &candidates, &winners).is_empty());
        assert!(unify_results(&results, &[], &[]).is_empty());
    }

    #[test]
    fn constituency_numbers_join_as_integers() {
        let results = vec![
            result("X", "01", "A", "P", "5"),
            result("X", " 2", "B", "P", "6"),
        ];
        let candidates = vec![filing("X", "1", "A", "P"), filing("X", "2", "B", "P")];
        let winners = vec![winner("X", "1", "A", "P", "1"), winner("X", "02", "B", "P", "1")];
        let rows = unify_results(&results, &candidates, &winners);
        assert_eq!(rows.len(), 2);
        // The results table keeps its own spelling.
        assert_eq!(rows[0].pc_no, "01");
        assert_eq!(rows[1].total_votes, 6.0);
    }

    #[test]
    fn other_keys_are_exact() {
        let candidates = vec![filing("X", "1", "A", "P")];
        let winners = vec![winner("X", "1", "A", "P", "1")];
        let results = vec![result("X", "1", "a", "P", "5")];
        assert!(unify_results(&results, &candidates, &winners).is_empty());
        let results = vec![result("x", "1", "A", "P", "5")];
        assert!(unify_results(&results, &candidates, &winners).is_empty());

        let candidates = vec![filing("X", "1A", "A", "P")];
        let winners = vec![winner("X", "1a", "A", "P", "1")];
        let results = vec![result("X", "1A", "A", "P", "5")];
        assert!(unify_results(&results, &candidates, &winners).is_empty());
    }

    #[test]
    fn join_fans_out_on_duplicated_keys() {
        let results = vec![result("X", "1", "A", "P", "5")];
        let candidates = vec![filing("X", "1", "A", "P"), filing("X", "1", "A", "P")];
        let winners = vec![winner("X", "1", "A", "P", "1")];
        assert_eq!(unify_results(&results, &candidates, &winners).len(), 2);
    }

    #[test]
    fn join_never_exceeds_source_cardinality() {
        let (results, candidates, winners) = fixture();
        let rows = unify_results(&results, &candidates, &winners);
        assert!(rows.len() <= results.len());
        assert!(rows.len() <= candidates.len());
    }

    #[test]
    fn choices_are_sorted() {
        let rows = unified();
        assert_eq!(state_choices(&rows), vec!["Goa", "Kerala"]);
        assert_eq!(party_choices(&rows, "Kerala"), vec!["BJP", "INC", "IND"]);
        assert_eq!(party_choices(&rows, "Goa"), vec!["BJP"]);
        assert_eq!(
            candidate_choices(&rows, "Kerala"),
            vec!["Anna", "Bala", "Chandra"]
        );
    }

    #[test]
    fn all_of_equals_every_value_of_the_state() {
        let rows = unified();
        let all = filter_results(&rows, &ElectionFilter::state("Kerala"));
        let manual = filter_results(
            &rows,
            &ElectionFilter {
                state: "Kerala".to_string(),
                parties: Selector::subset_of(party_choices(&rows, "Kerala")),
                candidates: Selector::subset_of(candidate_choices(&rows, "Kerala")),
            },
        );
        assert_eq!(all, manual);
        assert_eq!(all.rows.len(), 3);
    }

    #[test]
    fn party_and_candidate_selectors_combine() {
        let rows = unified();
        let filter = ElectionFilter {
            state: "Kerala".to_string(),
            parties: Selector::subset_of(["INC", "BJP"]),
            candidates: Selector::subset_of(["Bala", "Chandra"]),
        };
        let res = filter_results(&rows, &filter);
        assert_eq!(res.rows.len(), 1);
        assert_eq!(res.rows[0].candidate_name, "Bala");
    }

    #[test]
    fn selection_outside_the_state_is_empty() {
        let rows = unified();
        let filter = ElectionFilter {
            state: "Goa".to_string(),
            parties: Selector::subset_of(["INC"]),
            candidates: Selector::AllOf,
        };
        let res = filter_results(&rows, &filter);
        assert!(res.is_empty());
        assert_eq!(res.state, "Goa");
        assert!(party_totals(&res.rows).is_empty());
        assert!(state_party_totals(&res.rows).is_empty());
    }

    #[test]
    fn zero_vote_party_only_appears_in_state_party_totals() {
        let rows = unified();
        let kerala = filter_results(&rows, &ElectionFilter::state("Kerala"));
        let parties = party_totals(&kerala.rows);
        assert_eq!(
            parties,
            vec![
                PartyTotal {
                    party: "BJP".to_string(),
                    total_votes: 800.0
                },
                PartyTotal {
                    party: "INC".to_string(),
                    total_votes: 1200.0
                },
            ]
        );
        let by_state = state_party_totals(&kerala.rows);
        assert_eq!(by_state.len(), 3);
        assert_eq!(by_state[2].party, "IND");
        assert_eq!(by_state[2].total_votes, 0.0);
    }

    #[test]
    fn party_totals_drop_negative_sums() {
        let rows = vec![
            UnifiedRow {
                party: "P".to_string(),
                total_votes: -3.0,
                ..Default::default()
            },
            UnifiedRow {
                party: "Q".to_string(),
                total_votes: 1.0,
                ..Default::default()
            },
        ];
        let totals = party_totals(&rows);
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].party, "Q");
        assert_eq!(state_party_totals(&rows).len(), 2);
    }

    #[test]
    fn winner_roster_removes_exact_duplicates() {
        let (_, _, mut winners) = fixture();
        winners.push(winner("Kerala", "1", "Anna", "INC", "400"));
        winners.push(winner("Kerala", "3", "Anna", "INC", "401"));
        let roster = winner_roster(&winners, "Kerala");
        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0].margin_votes, "400");
        assert_eq!(roster[1].margin_votes, "401");
        assert!(winner_roster(&winners, "Atlantis").is_empty());
    }
}
