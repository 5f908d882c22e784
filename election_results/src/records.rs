// ********* Input data structures ***********

use std::ops::AddAssign;

/// A candidate filing: one row per candidate per constituency.
///
/// The demographic fields are kept as the raw cell text. They are empty when the
/// source file does not carry the corresponding column.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct CandidateFiling {
    pub state: String,
    pub constituency_no: String,
    pub candidate_name: String,
    pub party: String,
    pub gender: String,
    pub age: String,
    pub application_status: String,
    pub phase: String,
}

/// The result of one candidate in one constituency.
///
/// `total_votes` is the raw cell. It may hold placeholders that are not numbers,
/// the join takes care of coercing it.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct ConstituencyResult {
    pub state: String,
    pub pc_no: String,
    pub pc_name: String,
    pub candidate: String,
    pub party: String,
    pub total_votes: String,
}

/// The declared winner of a constituency.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct DeclaredWinner {
    pub state: String,
    pub pc_no: String,
    pub pc_name: String,
    pub winning_candidate: String,
    pub winning_party: String,
    pub margin_votes: String,
}

/// Voter turnout of one constituency, split by gender.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct TurnoutRow {
    pub state: String,
    pub pc: String,
    pub male: u64,
    pub female: u64,
    pub others: u64,
    pub total: u64,
}

// ******** Output data structures *********

/// A row of the unified election results: a result joined with the filing of the
/// same candidate and with the winner of the constituency.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct UnifiedRow {
    pub state: String,
    pub pc_no: String,
    pub pc_name: String,
    pub candidate_name: String,
    pub party: String,
    /// Always finite. Cells that do not parse are counted as zero.
    pub total_votes: f64,
    pub gender: String,
    pub age: String,
    pub application_status: String,
    pub phase: String,
    pub winning_candidate: String,
    pub winning_party: String,
    pub margin_votes: String,
}

#[derive(PartialEq, Debug, Clone)]
pub struct PartyTotal {
    pub party: String,
    pub total_votes: f64,
}

#[derive(PartialEq, Debug, Clone)]
pub struct StatePartyTotal {
    pub state: String,
    pub party: String,
    pub total_votes: f64,
}

/// Projection of a declared winner, as listed in the winner roster.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct WinnerProfile {
    pub winning_candidate: String,
    pub winning_party: String,
    pub state: String,
    pub margin_votes: String,
}

/// Turnout counts summed over a set of constituencies.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct TurnoutSums {
    pub male: u64,
    pub female: u64,
    pub others: u64,
    pub total: u64,
}

impl TurnoutSums {
    pub const EMPTY: TurnoutSums = TurnoutSums {
        male: 0,
        female: 0,
        others: 0,
        total: 0,
    };
}

impl AddAssign<&TurnoutRow> for TurnoutSums {
    fn add_assign(&mut self, rhs: &TurnoutRow) {
        self.male = self.male.saturating_add(rhs.male);
        self.female = self.female.saturating_add(rhs.female);
        self.others = self.others.saturating_add(rhs.others);
        self.total = self.total.saturating_add(rhs.total);
    }
}

impl<'a> std::iter::Sum<&'a TurnoutRow> for TurnoutSums {
    fn sum<I: Iterator<Item = &'a TurnoutRow>>(iter: I) -> Self {
        let mut res = TurnoutSums::EMPTY;
        for row in iter {
            res += row;
        }
        res
    }
}
