use crate::margins::*;

use serde::{Deserialize, Serialize};

/// The chart settings as written in a JSON file. Every entry is optional.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsFile {
    pub title: Option<String>,
    #[serde(rename = "xAxisTitle")]
    pub x_axis_title: Option<String>,
    #[serde(rename = "yAxisTitle")]
    pub y_axis_title: Option<String>,
    #[serde(rename = "legendTitle")]
    pub legend_title: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    #[serde(rename = "tickAngle")]
    pub tick_angle: Option<i32>,
    #[serde(rename = "annotationYShift")]
    pub annotation_y_shift: Option<i32>,
}

impl SettingsFile {
    /// The settings, with the entries of this file replacing the defaults.
    pub fn apply(&self, base: ChartSettings) -> MarginResult<ChartSettings> {
        let res = ChartSettings {
            title: self.title.clone().unwrap_or(base.title),
            x_axis_title: self.x_axis_title.clone().unwrap_or(base.x_axis_title),
            y_axis_title: self.y_axis_title.clone().unwrap_or(base.y_axis_title),
            legend_title: self.legend_title.clone().unwrap_or(base.legend_title),
            width: self.width.unwrap_or(base.width),
            height: self.height.unwrap_or(base.height),
            tick_angle: self.tick_angle.unwrap_or(base.tick_angle),
            annotation_y_shift: self.annotation_y_shift.unwrap_or(base.annotation_y_shift),
        };
        if res.width == 0 || res.height == 0 {
            whatever!(
                "The chart must have a positive size, got {}x{}",
                res.width,
                res.height
            )
        }
        if !(-180..=180).contains(&res.tick_angle) {
            whatever!("tickAngle must be between -180 and 180, got {}", res.tick_angle)
        }
        Ok(res)
    }
}

pub fn parse_settings(contents: &str) -> MarginResult<ChartSettings> {
    let sf: SettingsFile = serde_json::from_str(contents).context(ParsingJsonSnafu {})?;
    debug!("parse_settings: {:?}", sf);
    sf.apply(ChartSettings::default_settings())
}

pub fn read_settings(path: &str) -> BMarginResult<ChartSettings> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    info!("Reading chart settings from {:?}", path);
    Ok(parse_settings(&contents)?)
}
