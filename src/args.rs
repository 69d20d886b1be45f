use clap::Parser;

/// This is a raffle drawing program for employee raffle entries.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON configuration file describing the roster sources, the prize and the
    /// rules of the raffle. The flags below take precedence over its content.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,
    /// (file path) A reference summary in JSON format. If provided, rafflectl checks that the outcome
    /// matches the reference. This is only meaningful with a seed.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the raffle will be written in JSON
    /// format to the given location. Setting this option overrides the output directory of the configuration.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path or empty) The roster of employees. Setting this option overrides the roster sources
    /// of the configuration.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (json or excel) The type of the input. By default, it is guessed from the extension of the file.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// When using an Excel file, indicates the name of the worksheet to use. It is required if
    /// the workbook has several worksheets.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (string) If specified, the draw is reproducible: the same roster and seed give the same winner.
    #[clap(long, value_parser)]
    pub seed: Option<String>,

    /// (default 4000) The suspense, in milliseconds, before the winner is revealed.
    #[clap(long, value_parser)]
    pub reveal_delay_ms: Option<u64>,

    /// The prize of the raffle, as reported in the summary.
    #[clap(long, value_parser)]
    pub prize: Option<String>,

    /// The name of the raffle, as reported in the summary.
    #[clap(long, value_parser)]
    pub name: Option<String>,

    /// If passed as an argument, prints the statistics of the roster instead of drawing a winner.
    #[clap(long, takes_value = false)]
    pub stats: bool,

    /// (default 5) The number of top performers in the statistics.
    #[clap(long, value_parser)]
    pub top: Option<usize>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
