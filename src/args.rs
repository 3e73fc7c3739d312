use clap::Parser;

/// This program charts, for every state and union territory, how many seats were won
/// within each winning-margin bracket.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, default 31_Winning_Candidate_Analysis_Over_Total_Electors.csv) The table with one row per
    /// state/UT. It must contain the columns 'Name of State/UT', 'No. Of Seats' and the eight 'Winner with ...' columns.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default csv) The type of the input: csv or xlsx. With xlsx, the first worksheet is read.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (file path or 'stdout') Where to write the chart. Defaults to winning_margins.<format> in the
    /// current directory. 'stdout' is only accepted with the json format.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (default html) The output format: html (interactive page), json (plotly figure) or svg (static image).
    #[clap(long, value_parser)]
    pub format: Option<String>,

    /// (file path, optional) A JSON file overriding the titles and dimensions of the chart.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) A reference file containing a figure in JSON format. If provided, marginchart will
    /// check that the generated figure matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard error.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
