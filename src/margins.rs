use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};
use winning_margins::*;

use std::fs;
use std::path::Path;

use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::margins::config_reader::read_settings;
use crate::margins::sink::{make_sink, ChartSink};

pub mod config_reader;
mod io_csv;
mod io_excel;
mod io_svg;
pub mod sink;

/// The relative path of the dataset when none is given on the command line.
pub const DEFAULT_INPUT: &str = "31_Winning_Candidate_Analysis_Over_Total_Electors.csv";

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum MarginError {
    #[snafu(display("File '{path}' not found (current working directory: {cwd})"))]
    FileNotFound { path: String, cwd: String },
    #[snafu(display("Error reading CSV file {path}: {source}"))]
    CsvParse { source: csv::Error, path: String },
    #[snafu(display("The file {path} has no header row"))]
    EmptyTable { path: String },
    #[snafu(display("Error opening Excel file {path}: {source}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The Excel file {path} has no worksheet or no header row"))]
    EmptyExcel { path: String },
    #[snafu(display("Malformed table in {path}: {source}"))]
    TableShape {
        source: TableShapeError,
        path: String,
    },
    #[snafu(display("Error opening JSON file {path}: {source}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON: {source}"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Cannot build the chart: {source}"))]
    Chart { source: ChartErrors },
    #[snafu(display("Error writing {path}: {source}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error drawing {path}: {message}"))]
    DrawingSvg { path: String, message: String },
    #[snafu(display("Unknown input type {input_type:?} (expected csv or xlsx)"))]
    UnknownInputType { input_type: String },
    #[snafu(display("Unknown output format {format:?} (expected html, json or svg)"))]
    UnknownFormat { format: String },
    #[snafu(display("The {format} format cannot be written to stdout"))]
    StdoutUnsupported { format: String },
    #[snafu(display("Difference detected between the generated figure and the reference {path}"))]
    ReferenceMismatch { path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type MarginResult<T> = Result<T, MarginError>;
pub type BMarginResult<T> = Result<T, Box<MarginError>>;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum InputType {
    Csv,
    Xlsx,
}

impl InputType {
    pub fn parse(s: Option<&str>) -> BMarginResult<InputType> {
        match s {
            None | Some("csv") => Ok(InputType::Csv),
            Some("xlsx") | Some("excel") => Ok(InputType::Xlsx),
            Some(x) => Err(Box::new(MarginError::UnknownInputType {
                input_type: x.to_string(),
            })),
        }
    }

    /// How the file kind is called in messages to the user.
    pub fn describe(&self) -> &'static str {
        match self {
            InputType::Csv => "CSV",
            InputType::Xlsx => "Excel",
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum OutputFormat {
    Html,
    Json,
    Svg,
}

impl OutputFormat {
    pub fn parse(s: Option<&str>) -> BMarginResult<OutputFormat> {
        match s {
            None | Some("html") => Ok(OutputFormat::Html),
            Some("json") => Ok(OutputFormat::Json),
            Some("svg") => Ok(OutputFormat::Svg),
            Some(x) => Err(Box::new(MarginError::UnknownFormat {
                format: x.to_string(),
            })),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Json => "json",
            OutputFormat::Svg => "svg",
        }
    }
}

/// What happened to the chart.
#[derive(PartialEq, Debug, Clone)]
pub enum RenderOutcome {
    /// There was no table to chart. Nothing was produced.
    NoData,
    /// The figure was built and handed to the sink.
    Rendered(Box<Figure>),
}

/// Reads the table at the given path.
pub fn load_table(path: &str, input_type: InputType) -> BMarginResult<Table> {
    if !Path::new(path).is_file() {
        let cwd = std::env::current_dir()
            .map(|d| d.display().to_string())
            .unwrap_or_else(|_| "<unknown>".to_string());
        return Err(Box::new(MarginError::FileNotFound {
            path: path.to_string(),
            cwd,
        }));
    }
    info!("Attempting to read {:?} file {:?}", input_type, path);
    let table = match input_type {
        InputType::Csv => io_csv::read_csv_table(path),
        InputType::Xlsx => io_excel::read_excel_table(path),
    }?;
    info!(
        "load_table: {} rows, columns: {:?}",
        table.rows.len(),
        table.headers
    );
    Ok(table)
}

/// The lines telling the user why the input could not be read.
fn load_diagnostic(e: &MarginError, input_type: InputType) -> Vec<String> {
    match e {
        MarginError::FileNotFound { path, cwd } => vec![
            format!("Error: File '{}' not found!", path),
            format!("Current working directory: {}", cwd),
            format!(
                "Please make sure the {} file is in the same directory as this program.",
                input_type.describe()
            ),
        ],
        other => vec![format!("Error reading the input file: {}", other)],
    }
}

/// Reads the table, or explains on the console why it could not.
///
/// None means that there is no data to work with. The errors stop here.
pub fn load_election_data(path: &str, input_type: InputType) -> Option<Table> {
    match load_table(path, input_type) {
        Ok(table) => Some(table),
        Err(e) => {
            warn!("load_election_data: {:?}", e);
            for line in load_diagnostic(&e, input_type) {
                eprintln!("{}", line);
            }
            None
        }
    }
}

/// Builds the chart for the table, if there is one, and hands it to the sink.
pub fn create_visualization(
    table: Option<&Table>,
    settings: &ChartSettings,
    sink: &mut dyn ChartSink,
) -> BMarginResult<RenderOutcome> {
    let table = match table {
        Some(t) => t,
        None => {
            info!("create_visualization: no data, nothing to render");
            return Ok(RenderOutcome::NoData);
        }
    };
    let figure = build_figure(table, settings).context(ChartSnafu {})?;
    sink.present(&figure)?;
    Ok(RenderOutcome::Rendered(Box::new(figure)))
}

fn read_reference(path: &str) -> BMarginResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

/// Compares the figure with a reference figure stored in JSON.
pub fn check_reference(figure: &Figure, reference_path: &str) -> BMarginResult<()> {
    let reference = read_reference(reference_path)?;
    let pretty_ref = serde_json::to_string_pretty(&reference).context(ParsingJsonSnafu {})?;
    // Going through a JSValue on both sides orders the keys the same way.
    let figure_js = serde_json::to_value(figure).context(ParsingJsonSnafu {})?;
    let pretty_fig = serde_json::to_string_pretty(&figure_js).context(ParsingJsonSnafu {})?;
    if pretty_ref != pretty_fig {
        warn!("Found differences with the reference figure");
        print_diff(pretty_ref.as_str(), pretty_fig.as_str(), "\n");
        return Err(Box::new(MarginError::ReferenceMismatch {
            path: reference_path.to_string(),
        }));
    }
    info!("check_reference: the figure matches {}", reference_path);
    Ok(())
}

/// The whole program: settings, input, chart, output.
pub fn run_chart(args: &Args) -> BMarginResult<RenderOutcome> {
    let settings = match &args.config {
        Some(p) => read_settings(p)?,
        None => ChartSettings::default_settings(),
    };
    debug!("settings: {:?}", settings);
    let input_type = InputType::parse(args.input_type.as_deref())?;
    let format = OutputFormat::parse(args.format.as_deref())?;
    let out = args
        .out
        .clone()
        .unwrap_or_else(|| format!("winning_margins.{}", format.extension()));
    let mut sink = make_sink(format, &out)?;

    let input = args.input.as_deref().unwrap_or(DEFAULT_INPUT);
    let table = load_election_data(input, input_type);

    let outcome = create_visualization(table.as_ref(), &settings, sink.as_mut())?;
    match &outcome {
        RenderOutcome::Rendered(figure) => {
            info!("run_chart: chart written to {}", out);
            if let Some(reference) = &args.reference {
                check_reference(figure, reference)?;
            }
        }
        RenderOutcome::NoData => {
            warn!("run_chart: no chart produced");
        }
    }
    Ok(outcome)
}
