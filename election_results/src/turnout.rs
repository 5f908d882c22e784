use log::debug;

use crate::records::{TurnoutRow, TurnoutSums};
use crate::sorted_distinct;

/// The turnout rows of one state or union territory.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TurnoutView {
    pub state: String,
    pub rows: Vec<TurnoutRow>,
}

impl TurnoutView {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn sums(&self) -> TurnoutSums {
        self.rows.iter().sum()
    }
}

/// The sorted distinct State/UT values, as offered to the turnout selector.
pub fn turnout_state_choices(rows: &[TurnoutRow]) -> Vec<String> {
    sorted_distinct(rows.iter().map(|r| r.state.as_str()))
}

/// Keeps the rows whose State/UT is exactly `state`.
pub fn filter_turnout(rows: &[TurnoutRow], state: &str) -> TurnoutView {
    let filtered: Vec<TurnoutRow> = rows.iter().filter(|r| r.state == state).cloned().collect();
    debug!(
        "filter_turnout: state {:?}: {} of {} rows",
        state,
        filtered.len(),
        rows.len()
    );
    TurnoutView {
        state: state.to_string(),
        rows: filtered,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(state: &str, pc: &str, male: u64, female: u64, others: u64) -> TurnoutRow {
        TurnoutRow {
            state: state.to_string(),
            pc: pc.to_string(),
            male,
            female,
            others,
            total: male + female + others,
        }
    }

    fn table() -> Vec<TurnoutRow> {
        vec![
            row("Kerala", "Wayanad", 500, 600, 1),
            row("Goa", "North Goa", 200, 210, 0),
            row("Kerala", "Kollam", 400, 450, 2),
        ]
    }

    #[test]
    fn choices_are_sorted_and_distinct() {
        assert_eq!(turnout_state_choices(&table()), vec!["Goa", "Kerala"]);
    }

    #[test]
    fn sums_over_the_selected_state() {
        let view = filter_turnout(&table(), "Kerala");
        assert_eq!(view.rows.len(), 2);
        assert_eq!(
            view.sums(),
            TurnoutSums {
                male: 900,
                female: 1050,
                others: 3,
                total: 1953
            }
        );
    }

    #[test]
    fn unknown_state_yields_zero_sums() {
        let view = filter_turnout(&table(), "Atlantis");
        assert!(view.is_empty());
        assert_eq!(view.sums(), TurnoutSums::EMPTY);
    }

    #[test]
    fn match_is_exact() {
        assert!(filter_turnout(&table(), "kerala").is_empty());
        assert!(filter_turnout(&table(), "Kerala ").is_empty());
    }

    #[test]
    fn sums_saturate() {
        let mut rows = table();
        rows[0].male = u64::MAX;
        rows[0].total = u64::MAX;
        let sums = filter_turnout(&rows, "Kerala").sums();
        assert_eq!(sums.male, u64::MAX);
        assert_eq!(sums.total, u64::MAX);
        assert_eq!(sums.female, 1050);
    }
}
