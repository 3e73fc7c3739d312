// ********* Input data structures ***********

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::Display;

/// A table as read from the input file.
///
/// The cells are kept as text, exactly as they appear in the file. Typing
/// happens when the chart gets built.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// The position of the header with exactly this text.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One state or union territory, typed.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct MarginRow {
    pub state: String,
    pub seats: u64,
    /// Seat counts, in the order of `BRACKET_COLUMNS`.
    pub brackets: [u64; NUM_BRACKETS],
}

impl MarginRow {
    /// The height of the tallest bar for this state.
    pub fn max_bracket(&self) -> u64 {
        self.brackets.iter().copied().max().unwrap_or(0)
    }

    pub fn bracket_total(&self) -> u64 {
        self.brackets.iter().sum()
    }
}

// ********* Columns **********

pub const STATE_COLUMN: &str = "Name of State/UT";
pub const SEATS_COLUMN: &str = "No. Of Seats";

pub const NUM_BRACKETS: usize = 8;

/// The margin brackets, with the exact header text found in the published
/// dataset (the spacing is irregular). The order is the order of the series
/// in the chart.
pub const BRACKET_COLUMNS: [&str; NUM_BRACKETS] = [
    "Winner with <= 10%",
    "Winner with > 10% to <= 20%",
    "Winner with > 20% to <=30%",
    "Winner with >30% to <=40%",
    "Winner with >40% to <=50%",
    "Winner with >50% to <=60%",
    "Winner with >60% to <=70%",
    "Winner with > 70%",
];

pub const LABEL_PREFIX: &str = "Winner with ";

/// The legend label of a bracket column: the header minus its `Winner with ` prefix.
pub fn bracket_label(column: &str) -> &str {
    column.strip_prefix(LABEL_PREFIX).unwrap_or(column)
}

// ********* Colors **********

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rgb({},{},{})", self.0, self.1, self.2)
    }
}

/// The qualitative 'Set3' palette (12 colors).
pub const PALETTE: [Rgb; 12] = [
    Rgb(141, 211, 199),
    Rgb(255, 255, 179),
    Rgb(190, 186, 218),
    Rgb(251, 128, 114),
    Rgb(128, 177, 211),
    Rgb(253, 180, 98),
    Rgb(179, 222, 105),
    Rgb(252, 205, 229),
    Rgb(217, 217, 217),
    Rgb(188, 128, 189),
    Rgb(204, 235, 197),
    Rgb(255, 237, 111),
];

/// The color of the i-th series. Cycles through the palette.
pub fn series_color(palette: &[Rgb], idx: usize) -> Rgb {
    palette[idx % palette.len()]
}

/// Errors that prevent the chart from being built.
///
/// They all point at malformed input data.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ChartErrors {
    /// A required column is not present in the header.
    MissingColumn(String),
    /// A cell that should hold a seat count does not.
    InvalidCount {
        state: String,
        column: String,
        value: String,
    },
    /// The row (0-based, excluding the header) has no state name.
    EmptyStateName { row: usize },
    /// Looking up a state by name did not find exactly one row.
    StateLookup { state: String, matches: usize },
}

impl Error for ChartErrors {}

impl Display for ChartErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartErrors::MissingColumn(c) => write!(f, "missing column {:?}", c),
            ChartErrors::InvalidCount {
                state,
                column,
                value,
            } => write!(
                f,
                "invalid seat count {:?} for {:?} in column {:?}",
                value, state, column
            ),
            ChartErrors::EmptyStateName { row } => {
                write!(f, "row {} has an empty state name", row)
            }
            ChartErrors::StateLookup { state, matches } => write!(
                f,
                "expected exactly one row for {:?}, found {}",
                state, matches
            ),
        }
    }
}

// ********* Configuration **********

/// The parts of the chart that can be changed by the user.
#[derive(PartialEq, Debug, Clone)]
pub struct ChartSettings {
    pub title: String,
    pub x_axis_title: String,
    pub y_axis_title: String,
    pub legend_title: String,
    pub width: u32,
    pub height: u32,
    /// Rotation of the state names on the x axis, in degrees.
    pub tick_angle: i32,
    /// Distance between the top of the tallest bar and its annotation, in pixels.
    pub annotation_y_shift: i32,
}

impl ChartSettings {
    pub fn default_settings() -> ChartSettings {
        ChartSettings {
            title: "Distribution of Winning Margins Across States/UTs (2024)".to_string(),
            x_axis_title: "State/UT".to_string(),
            y_axis_title: "Number of Seats".to_string(),
            legend_title: "Winning Margin".to_string(),
            width: 1200,
            height: 900,
            tick_angle: -45,
            annotation_y_shift: 20,
        }
    }
}

impl Default for ChartSettings {
    fn default() -> Self {
        ChartSettings::default_settings()
    }
}

// ******** Output data structures *********

// The figure follows the JSON schema of plotly.js, so that it can be handed
// as-is to Plotly.newPlot.

/// A complete chart: the series and the layout (which carries the annotations).
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Figure {
    pub data: Vec<BarTrace>,
    pub layout: Layout,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct BarTrace {
    #[serde(rename = "type")]
    pub trace_type: String,
    pub name: String,
    pub x: Vec<String>,
    pub y: Vec<u64>,
    pub text: Vec<String>,
    pub textposition: String,
    pub marker: Marker,
    pub hovertemplate: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Marker {
    pub color: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct Font {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct Title {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xanchor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yanchor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
}

impl Title {
    pub fn plain(text: &str) -> Title {
        Title {
            text: text.to_string(),
            ..Default::default()
        }
    }
}

#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct Axis {
    pub title: Title,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickangle: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gridcolor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gridwidth: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zeroline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zerolinecolor: Option<String>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Legend {
    pub title: Title,
    pub bgcolor: String,
    pub bordercolor: String,
    pub borderwidth: u32,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Margin {
    pub b: u32,
    pub t: u32,
    pub l: u32,
    pub r: u32,
}

/// A text placed above a group of bars. Not interactive.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Annotation {
    pub x: String,
    pub y: u64,
    pub text: String,
    pub showarrow: bool,
    /// Upward offset in pixels.
    pub yshift: i32,
    pub font: Font,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Layout {
    pub title: Title,
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub barmode: String,
    pub width: u32,
    pub height: u32,
    pub showlegend: bool,
    pub legend: Legend,
    pub margin: Margin,
    pub hovermode: String,
    pub plot_bgcolor: String,
    pub paper_bgcolor: String,
    pub font: Font,
    pub annotations: Vec<Annotation>,
}
