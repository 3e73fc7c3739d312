// Where finished charts go.

use std::fs;

use crate::margins::io_svg::SvgSink;
use crate::margins::*;

const PLOTLY_JS: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Receives a finished figure and presents it: on screen, in a file, etc.
pub trait ChartSink {
    fn present(&mut self, figure: &Figure) -> BMarginResult<()>;
}

/// A standalone web page that draws the figure with plotly.js.
pub struct HtmlSink {
    pub path: String,
}

/// The figure as plotly JSON, in a file or on the standard output.
pub struct JsonSink {
    /// None for stdout.
    pub path: Option<String>,
}

/// Chooses the sink for the output format.
pub fn make_sink(format: OutputFormat, out: &str) -> BMarginResult<Box<dyn ChartSink>> {
    let to_stdout = out == "stdout";
    match format {
        OutputFormat::Json if to_stdout => Ok(Box::new(JsonSink { path: None })),
        _ if to_stdout => Err(Box::new(MarginError::StdoutUnsupported {
            format: format.extension().to_string(),
        })),
        OutputFormat::Json => Ok(Box::new(JsonSink {
            path: Some(out.to_string()),
        })),
        OutputFormat::Html => Ok(Box::new(HtmlSink {
            path: out.to_string(),
        })),
        OutputFormat::Svg => Ok(Box::new(SvgSink {
            path: out.to_string(),
        })),
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// The page for a figure.
pub fn figure_html(figure: &Figure) -> BMarginResult<String> {
    let js = serde_json::to_string(figure).context(ParsingJsonSnafu {})?;
    // The figure goes inside a script element.
    let js = js.replace("</", "<\\/");
    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8" />
<title>{title}</title>
<script src="{plotly}" charset="utf-8"></script>
</head>
<body>
<div id="chart" style="width:{width}px;height:{height}px;"></div>
<script>
const figure = {js};
Plotly.newPlot("chart", figure.data, figure.layout);
</script>
</body>
</html>
"#,
        title = escape_html(&figure.layout.title.text),
        plotly = PLOTLY_JS,
        width = figure.layout.width,
        height = figure.layout.height,
        js = js,
    ))
}

impl ChartSink for HtmlSink {
    fn present(&mut self, figure: &Figure) -> BMarginResult<()> {
        let page = figure_html(figure)?;
        fs::write(&self.path, page).context(WritingOutputSnafu {
            path: self.path.clone(),
        })?;
        info!("HtmlSink: open {} in a browser to see the chart", self.path);
        Ok(())
    }
}

impl ChartSink for JsonSink {
    fn present(&mut self, figure: &Figure) -> BMarginResult<()> {
        let pretty = serde_json::to_string_pretty(figure).context(ParsingJsonSnafu {})?;
        match &self.path {
            Some(p) => {
                fs::write(p, pretty).context(WritingOutputSnafu { path: p.clone() })?;
                info!("JsonSink: figure written to {}", p);
            }
            None => {
                println!("{}", pretty);
            }
        }
        Ok(())
    }
}
