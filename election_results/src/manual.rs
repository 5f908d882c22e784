/*!

This is the long-form manual for `election_results` and `pcdash`.

## Input files

Four comma-separated files with a header row are read. Columns are found by their
header name, so their order does not matter and extra columns are ignored.

### Candidates (`candidates_with_phase.csv`)

One row per candidate per constituency.

Required: `State`, `Constituency_No`, `Candidate Name`, `Party`.
Optional: `Gender`, `Age`, `Application Status`, `Phase`.

### Results (`results_2024.csv`)

One row per candidate per constituency.

Required: `State`, `PC No`, `PC Name`, `Candidate`, `Party`, `Total Votes`.

`Total Votes` is the only column that is coerced: a cell that is not a plain decimal
number counts as zero votes. This includes numbers written with thousands
separators (`1,234`).

### Winners (`results_2024_winners.csv`)

One row per constituency.

Required: `State`, `PC No`, `Winning Candidate`, `Winning Party`, `Margin Votes`.
Optional: `PC Name`.

### Voter turnout (`STATE2.csv`)

One row per constituency.

Required: `State/UT`, `PC`, `Male`, `Female`, `Others`, `Total`. The four counts
are whole numbers. A cell that is empty or not a count (`NA`, `-3`, `2.5`) is
counted as zero and reported in the log.

## Joining

Results are matched to candidate filings on (`State`, `PC No` = `Constituency_No`,
`Candidate` = `Candidate Name`, `Party`), then to winners on (`State`, `PC No`).
Constituency numbers are compared as integers, so `01` and `1` are the same
constituency. The other keys are compared as they are written in the files. Rows
that cannot be matched in all three files are dropped without notice, and a join
with no common key gives an empty table.

## Selections

The state is always selected, by default the first one in alphabetical order. The
party and candidate selections are either every value present in the selected
state, or an explicit list. The voter turnout selection is independent of the
others.

## Aggregates

* party totals: total votes by party, without the parties that gather zero votes or
  less
* state summary: total votes by state and party, zero totals included
* winning candidates: winners of the selected state, without duplicates
* turnout: male, female, others and total counts summed over the selected state

*/
