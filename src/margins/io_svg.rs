//! Static export of the chart, drawn with plotters on its SVG backend.

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::margins::sink::ChartSink;
use crate::margins::*;

// Every state takes one slot per bracket, plus an empty slot between groups.
const GROUP_WIDTH: usize = NUM_BRACKETS + 1;

pub struct SvgSink {
    pub path: String,
}

impl ChartSink for SvgSink {
    fn present(&mut self, figure: &Figure) -> BMarginResult<()> {
        draw_figure(&self.path, figure).map_err(|e| {
            Box::new(MarginError::DrawingSvg {
                path: self.path.clone(),
                message: e.to_string(),
            })
        })?;
        info!("SvgSink: chart written to {}", self.path);
        Ok(())
    }
}

/// Reads back a `rgb(r,g,b)` color.
fn parse_rgb(s: &str) -> Option<RGBColor> {
    let inner = s.trim().strip_prefix("rgb(")?.strip_suffix(')')?;
    let parts: Vec<u8> = inner
        .split(',')
        .map(|p| p.trim().parse::<u8>().ok())
        .collect::<Option<Vec<u8>>>()?;
    match parts.as_slice() {
        [r, g, b] => Some(RGBColor(*r, *g, *b)),
        _ => None,
    }
}

fn trace_color(trace: &BarTrace, idx: usize) -> RGBColor {
    parse_rgb(&trace.marker.color).unwrap_or_else(|| {
        let c = series_color(&PALETTE, idx);
        RGBColor(c.0, c.1, c.2)
    })
}

fn group_center(state_idx: usize) -> SegmentValue<usize> {
    SegmentValue::CenterOf(state_idx * GROUP_WIDTH + NUM_BRACKETS / 2)
}

fn draw_figure(path: &str, figure: &Figure) -> Result<(), Box<dyn std::error::Error>> {
    let layout = &figure.layout;
    let root = SVGBackend::new(path, (layout.width, layout.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let states: Vec<String> = figure
        .data
        .first()
        .map(|t| t.x.clone())
        .unwrap_or_default();
    let n_slots = (states.len() * GROUP_WIDTH).max(1);
    let y_max = figure
        .data
        .iter()
        .flat_map(|t| t.y.iter().copied())
        .max()
        .unwrap_or(0);
    // Room above the tallest bar for the labels and annotations.
    let y_top = y_max + y_max / 5 + 2;

    let mut chart = ChartBuilder::on(&root)
        .caption(&layout.title.text, ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(layout.margin.b + 40)
        .y_label_area_size(layout.margin.l)
        .build_cartesian_2d((0..n_slots).into_segmented(), 0u64..y_top)?;

    // No tick labels on the slots: each state name goes under the middle of its group.
    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_x_axis()
        .bold_line_style(&BLACK.mix(0.1))
        .light_line_style(&WHITE)
        .x_desc(layout.xaxis.title.text.as_str())
        .y_desc(layout.yaxis.title.text.as_str())
        .draw()?;

    let font = ("sans-serif", 12).into_font();
    let label_style: TextStyle = if layout.xaxis.tickangle.unwrap_or(0) != 0 {
        font.transform(FontTransform::Rotate90).into()
    } else {
        TextStyle::from(font).pos(Pos::new(HPos::Center, VPos::Top))
    };
    for (state_idx, state) in states.iter().enumerate() {
        let (x, y) = chart.backend_coord(&(group_center(state_idx), 0));
        root.draw(&Text::new(state.as_str(), (x, y + 6), label_style.clone()))?;
    }

    for (idx, trace) in figure.data.iter().enumerate() {
        let color = trace_color(trace, idx);
        chart
            .draw_series(trace.y.iter().enumerate().map(|(s, v)| {
                let slot = s * GROUP_WIDTH + idx;
                Rectangle::new(
                    [(SegmentValue::Exact(slot), 0), (SegmentValue::Exact(slot + 1), *v)],
                    color.filled(),
                )
            }))?
            .label(trace.name.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));

        // The value on top of every non-empty bar.
        chart.draw_series(
            trace
                .y
                .iter()
                .zip(trace.text.iter())
                .enumerate()
                .filter(|(_, (v, _))| **v > 0)
                .map(|(s, (v, text))| {
                    EmptyElement::at((SegmentValue::CenterOf(s * GROUP_WIDTH + idx), *v))
                        + Text::new(text.clone(), (-3, -12), ("sans-serif", 9).into_font())
                }),
        )?;
    }

    chart.draw_series(layout.annotations.iter().filter_map(|a| {
        let state_idx = states.iter().position(|s| *s == a.x)?;
        Some(
            EmptyElement::at((group_center(state_idx), a.y))
                + Text::new(
                    a.text.clone(),
                    (-30, -a.yshift - 12),
                    ("sans-serif", 10).into_font().color(&BLACK.mix(0.6)),
                ),
        )
    }))?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK.mix(0.2))
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::margins::tests::{temp_dir, temp_path, write_temp, HEADER};

    #[test]
    fn colors_read_back() {
        let rgb = |s: &str| parse_rgb(s).map(|c| c.rgb());
        assert_eq!(rgb("rgb(141,211,199)"), Some((141, 211, 199)));
        assert_eq!(rgb("rgb( 1, 2, 3 )"), Some((1, 2, 3)));
        assert_eq!(rgb("rgba(1,2,3,0.5)"), None);
        assert_eq!(rgb("rgb(1,2)"), None);
        assert_eq!(rgb("rgb(1,2,300)"), None);
    }

    #[test]
    fn writes_an_svg_file() {
        let dir = temp_dir();
        let input = write_temp(
            &dir,
            "svg.csv",
            &format!(
                "{}\nX,10,2,3,1,0,4,0,0,0\nGoa,2,0,1,1,0,0,0,0,0\n",
                HEADER
            ),
        );
        let table = load_table(&input, InputType::Csv).unwrap();
        let path = temp_path(&dir, "chart.svg");
        let mut sink = SvgSink { path: path.clone() };
        let outcome =
            create_visualization(Some(&table), &ChartSettings::default_settings(), &mut sink)
                .unwrap();
        assert!(matches!(outcome, RenderOutcome::Rendered(_)));
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Total Seats: 10"));
        // One label per state, and no blank tick labels.
        assert_eq!(svg.matches(">\nX\n</text>").count(), 1);
        assert_eq!(svg.matches(">\nGoa\n</text>").count(), 1);
        assert!(!svg.contains(">\n\n</text>"));
    }
}
