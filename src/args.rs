use clap::Parser;

/// This is a dashboard for constituency-level election results and voter turnout.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file describing the input files, the selections and the
    /// export directory. Relative paths in this file are resolved against its directory.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) The candidate filings. Overrides the path in the config file.
    #[clap(long, value_parser)]
    pub candidates: Option<String>,

    /// (file path) The results of each candidate. Overrides the path in the config file.
    #[clap(long, value_parser)]
    pub results: Option<String>,

    /// (file path) The winner of each constituency. Overrides the path in the config file.
    #[clap(long, value_parser)]
    pub winners: Option<String>,

    /// (file path) The voter turnout by constituency. Overrides the path in the config file.
    #[clap(long, value_parser)]
    pub turnout: Option<String>,

    /// (default: first state in alphabetical order) The state of the election results.
    #[clap(short, long, value_parser)]
    pub state: Option<String>,

    /// (repeatable, default: every party of the state) The parties to keep.
    #[clap(long, value_parser)]
    pub party: Vec<String>,

    /// (repeatable, default: every candidate of the state) The candidates to keep.
    #[clap(long, value_parser)]
    pub candidate: Vec<String>,

    /// (default: first state/UT in alphabetical order) The state or union territory of the
    /// voter turnout.
    #[clap(long, value_parser)]
    pub voter_state: Option<String>,

    /// (file path, 'stdout' or empty) Where to write the dashboard in JSON format.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (directory, optional) If specified, the filtered election results and voter data are
    /// exported as CSV files in this directory.
    #[clap(long, value_parser)]
    pub export_dir: Option<String>,

    /// (file path) A reference dashboard in JSON format. If provided, pcdash will check
    /// that the rendered dashboard matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// Includes the complete voter turnout table in the dashboard.
    #[clap(long, takes_value = false)]
    pub show_raw_voter_data: bool,

    /// Only prints the values available for each selection.
    #[clap(long, takes_value = false)]
    pub list_choices: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
