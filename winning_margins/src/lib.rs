/*!

Builds the chart of winning margins per state and union territory.

The input is a [`Table`] with one row per state/UT: its name, its number of
seats, and for each of the eight margin brackets the number of seats won
within that bracket. The output is a [`Figure`]: eight bar series grouped by
state, the layout, and a `Total Seats: N` annotation above every group.

The figure follows the JSON schema of plotly.js. Displaying it is left to the
caller.

```
use winning_margins::*;

let mut headers = vec![STATE_COLUMN.to_string(), SEATS_COLUMN.to_string()];
headers.extend(BRACKET_COLUMNS.iter().map(|c| c.to_string()));
let mut builder = builder::TableBuilder::new(&headers)?;
builder.add_row(&["Goa", "2", "0", "1", "1", "0", "0", "0", "0", "0"].map(String::from))?;

let figure = build_figure(&builder.build(), &ChartSettings::default_settings())?;
assert_eq!(figure.data.len(), 8);
assert_eq!(figure.layout.annotations[0].text, "Total Seats: 2");
# Ok::<(), Box<dyn std::error::Error>>(())
```
*/

mod config;
pub mod builder;

use log::{debug, info, warn};

pub use crate::builder::TableShapeError;
pub use crate::config::*;

// **** Private structures ****

// Where the required columns sit in the table.
#[derive(Eq, PartialEq, Debug, Clone)]
struct ColumnLayout {
    state: usize,
    seats: usize,
    brackets: [usize; NUM_BRACKETS],
}

fn locate_columns(table: &Table) -> Result<ColumnLayout, ChartErrors> {
    let find = |name: &str| {
        table
            .column_index(name)
            .ok_or_else(|| ChartErrors::MissingColumn(name.to_string()))
    };
    let state = find(STATE_COLUMN)?;
    let seats = find(SEATS_COLUMN)?;
    let mut brackets = [0usize; NUM_BRACKETS];
    for (slot, column) in brackets.iter_mut().zip(BRACKET_COLUMNS.iter()) {
        *slot = find(*column)?;
    }
    Ok(ColumnLayout {
        state,
        seats,
        brackets,
    })
}

fn parse_count(state: &str, column: &str, cell: &str) -> Result<u64, ChartErrors> {
    cell.trim()
        .parse::<u64>()
        .map_err(|_| ChartErrors::InvalidCount {
            state: state.to_string(),
            column: column.to_string(),
            value: cell.to_string(),
        })
}

fn cell<'a>(row: &'a [String], idx: usize) -> &'a str {
    // Readers guarantee rectangular tables, a short row reads as blank.
    row.get(idx).map(|s| s.as_str()).unwrap_or("")
}

/// Reads every row of the table into its typed form.
///
/// The rows keep the order of the table.
pub fn margin_rows(table: &Table) -> Result<Vec<MarginRow>, ChartErrors> {
    let cols = locate_columns(table)?;
    let mut res: Vec<MarginRow> = Vec::new();
    for (idx, row) in table.rows.iter().enumerate() {
        let state = cell(row, cols.state).trim().to_string();
        if state.is_empty() {
            return Err(ChartErrors::EmptyStateName { row: idx });
        }
        let seats = parse_count(&state, SEATS_COLUMN, cell(row, cols.seats))?;
        let mut brackets = [0u64; NUM_BRACKETS];
        for (b, (col_idx, column)) in cols.brackets.iter().zip(BRACKET_COLUMNS.iter()).enumerate() {
            brackets[b] = parse_count(&state, column, cell(row, *col_idx))?;
        }
        let mr = MarginRow {
            state,
            seats,
            brackets,
        };
        if mr.bracket_total() != mr.seats {
            warn!(
                "margin_rows: {}: the brackets add up to {} but the number of seats is {}",
                mr.state,
                mr.bracket_total(),
                mr.seats
            );
        }
        debug!("margin_rows: {:?}", mr);
        res.push(mr);
    }
    Ok(res)
}

/// Finds the single row of a state.
///
/// No match, or more than one match, means that the table is malformed.
pub fn find_state<'a>(rows: &'a [MarginRow], state: &str) -> Result<&'a MarginRow, ChartErrors> {
    let mut matching = rows.iter().filter(|r| r.state == state);
    match (matching.next(), matching.count()) {
        (Some(r), 0) => Ok(r),
        (None, _) => Err(ChartErrors::StateLookup {
            state: state.to_string(),
            matches: 0,
        }),
        (Some(_), rest) => Err(ChartErrors::StateLookup {
            state: state.to_string(),
            matches: rest + 1,
        }),
    }
}

/// One bar series per bracket, in the order of `BRACKET_COLUMNS`.
pub fn bar_traces(rows: &[MarginRow]) -> Vec<BarTrace> {
    let states: Vec<String> = rows.iter().map(|r| r.state.clone()).collect();
    BRACKET_COLUMNS
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            let label = bracket_label(column);
            let y: Vec<u64> = rows.iter().map(|r| r.brackets[idx]).collect();
            BarTrace {
                trace_type: "bar".to_string(),
                name: label.to_string(),
                x: states.clone(),
                text: y.iter().map(|v| v.to_string()).collect(),
                y,
                textposition: "outside".to_string(),
                marker: Marker {
                    color: series_color(&PALETTE, idx).to_string(),
                },
                hovertemplate: format!(
                    "<b>%{{x}}</b><br>Seats: %{{y}}<br>Range: {}<extra></extra>",
                    label
                ),
            }
        })
        .collect()
}

/// The `Total Seats` annotations, one per state, above the tallest bar.
pub fn seat_annotations(
    rows: &[MarginRow],
    settings: &ChartSettings,
) -> Result<Vec<Annotation>, ChartErrors> {
    let mut res: Vec<Annotation> = Vec::new();
    for r in rows.iter() {
        let row = find_state(rows, &r.state)?;
        res.push(Annotation {
            x: row.state.clone(),
            y: row.max_bracket(),
            text: format!("Total Seats: {}", row.seats),
            showarrow: false,
            yshift: settings.annotation_y_shift,
            font: Font {
                family: None,
                size: Some(10),
                color: Some("rgba(0,0,0,0.6)".to_string()),
            },
        });
    }
    Ok(res)
}

/// The layout of the chart. The annotations are added separately.
pub fn chart_layout(settings: &ChartSettings) -> Layout {
    Layout {
        title: Title {
            text: settings.title.clone(),
            x: Some(0.5),
            y: Some(0.95),
            xanchor: Some("center".to_string()),
            yanchor: Some("top".to_string()),
            font: Some(Font {
                size: Some(24),
                ..Default::default()
            }),
        },
        xaxis: Axis {
            title: Title::plain(&settings.x_axis_title),
            tickangle: Some(settings.tick_angle),
            ..Default::default()
        },
        yaxis: Axis {
            title: Title::plain(&settings.y_axis_title),
            gridcolor: Some("rgba(0,0,0,0.1)".to_string()),
            gridwidth: Some(1),
            zeroline: Some(true),
            zerolinecolor: Some("rgba(0,0,0,0.2)".to_string()),
            ..Default::default()
        },
        barmode: "group".to_string(),
        width: settings.width,
        height: settings.height,
        showlegend: true,
        legend: Legend {
            title: Title::plain(&settings.legend_title),
            bgcolor: "rgba(255,255,255,0.8)".to_string(),
            bordercolor: "rgba(0,0,0,0.2)".to_string(),
            borderwidth: 1,
        },
        margin: Margin {
            b: 100,
            t: 120,
            l: 80,
            r: 80,
        },
        hovermode: "x unified".to_string(),
        plot_bgcolor: "rgba(250,250,250,0.9)".to_string(),
        paper_bgcolor: "white".to_string(),
        font: Font {
            family: Some("Arial, sans-serif".to_string()),
            ..Default::default()
        },
        annotations: Vec::new(),
    }
}

/// Builds the complete chart for the given table.
///
/// Arguments:
/// * `table` the table as read from the input, one row per state/UT
/// * `settings` the titles and dimensions of the chart
///
/// Fails if a required column is missing, if a count is not a non-negative
/// integer, or if a state does not appear exactly once.
pub fn build_figure(table: &Table, settings: &ChartSettings) -> Result<Figure, ChartErrors> {
    info!(
        "build_figure: Processing {} rows and {} columns",
        table.rows.len(),
        table.headers.len()
    );
    let rows = margin_rows(table)?;
    let data = bar_traces(&rows);
    let mut layout = chart_layout(settings);
    layout.annotations = seat_annotations(&rows, settings)?;
    info!(
        "build_figure: {} series, {} annotations",
        data.len(),
        layout.annotations.len()
    );
    Ok(Figure { data, layout })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn headers() -> Vec<String> {
        let mut h = vec![STATE_COLUMN.to_string(), SEATS_COLUMN.to_string()];
        h.extend(BRACKET_COLUMNS.iter().map(|c| c.to_string()));
        h
    }

    fn table(rows: &[[&str; 10]]) -> Table {
        let mut b = builder::TableBuilder::new(&headers()).unwrap();
        for r in rows {
            b.add_row(&r.map(String::from)).unwrap();
        }
        b.build()
    }

    fn single_state() -> Table {
        table(&[["X", "10", "2", "3", "1", "0", "4", "0", "0", "0"]])
    }

    #[test]
    fn eight_series_for_any_row_count() {
        init();
        let settings = ChartSettings::default_settings();
        let one = build_figure(&single_state(), &settings).unwrap();
        assert_eq!(one.data.len(), 8);

        let many = table(&[
            ["A", "1", "1", "0", "0", "0", "0", "0", "0", "0"],
            ["B", "2", "0", "2", "0", "0", "0", "0", "0", "0"],
            ["C", "3", "0", "0", "3", "0", "0", "0", "0", "0"],
        ]);
        let fig = build_figure(&many, &settings).unwrap();
        assert_eq!(fig.data.len(), 8);
        assert!(fig.data.iter().all(|t| t.x == vec!["A", "B", "C"]));

        let empty = table(&[]);
        let fig = build_figure(&empty, &settings).unwrap();
        assert_eq!(fig.data.len(), 8);
        assert!(fig.layout.annotations.is_empty());
    }

    #[test]
    fn series_add_up_to_the_seats() {
        init();
        let fig = build_figure(&single_state(), &ChartSettings::default_settings()).unwrap();
        let total: u64 = fig.data.iter().map(|t| t.y[0]).sum();
        assert_eq!(total, 10);
        assert_eq!(fig.layout.annotations.len(), 1);
        assert_eq!(fig.layout.annotations[0].x, "X");
        assert_eq!(fig.layout.annotations[0].text, "Total Seats: 10");
    }

    #[test]
    fn annotation_sits_on_the_tallest_bar() {
        let fig = build_figure(&single_state(), &ChartSettings::default_settings()).unwrap();
        let a = &fig.layout.annotations[0];
        assert_eq!(a.y, 4);
        assert_eq!(a.yshift, 20);
        assert!(!a.showarrow);
    }

    #[test]
    fn annotation_uses_the_seat_column() {
        // The brackets do not add up: the annotation still shows the seat column.
        let t = table(&[["Y", "7", "1", "1", "0", "0", "0", "0", "0", "0"]]);
        let fig = build_figure(&t, &ChartSettings::default_settings()).unwrap();
        assert_eq!(fig.layout.annotations[0].text, "Total Seats: 7");
        assert_eq!(fig.layout.annotations[0].y, 1);
    }

    #[test]
    fn labels_strip_the_prefix() {
        assert_eq!(bracket_label("Winner with > 10% to <= 20%"), "> 10% to <= 20%");
        assert_eq!(bracket_label("Winner with <= 10%"), "<= 10%");
        assert_eq!(bracket_label("Winner with > 20% to <=30%"), "> 20% to <=30%");
        assert_eq!(bracket_label("Winner with > 70%"), "> 70%");
        // Only the exact prefix goes.
        assert_eq!(bracket_label("winner with > 70%"), "winner with > 70%");

        let fig = build_figure(&single_state(), &ChartSettings::default_settings()).unwrap();
        let names: Vec<&str> = fig.data.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "<= 10%",
                "> 10% to <= 20%",
                "> 20% to <=30%",
                ">30% to <=40%",
                ">40% to <=50%",
                ">50% to <=60%",
                ">60% to <=70%",
                "> 70%"
            ]
        );
        assert_eq!(
            fig.data[1].hovertemplate,
            "<b>%{x}</b><br>Seats: %{y}<br>Range: > 10% to <= 20%<extra></extra>"
        );
    }

    #[test]
    fn colors_cycle_through_the_palette() {
        let short = [Rgb(1, 2, 3), Rgb(4, 5, 6), Rgb(7, 8, 9)];
        for i in 0..(NUM_BRACKETS - short.len()) {
            assert_eq!(series_color(&short, i), series_color(&short, i + short.len()));
        }
        assert_eq!(series_color(&short, 7), Rgb(4, 5, 6));

        let fig = build_figure(&single_state(), &ChartSettings::default_settings()).unwrap();
        for (i, t) in fig.data.iter().enumerate() {
            assert_eq!(t.marker.color, PALETTE[i].to_string());
        }
        assert_eq!(fig.data[0].marker.color, "rgb(141,211,199)");
    }

    #[test]
    fn missing_column_is_named() {
        let mut t = single_state();
        let idx = t.column_index("Winner with >50% to <=60%").unwrap();
        t.headers[idx] = "Winner with >50% to <= 60%".to_string();
        let res = build_figure(&t, &ChartSettings::default_settings());
        assert_eq!(
            res,
            Err(ChartErrors::MissingColumn("Winner with >50% to <=60%".to_string()))
        );
    }

    #[test]
    fn missing_seat_column() {
        let mut t = single_state();
        t.headers[1] = "Seats".to_string();
        let res = build_figure(&t, &ChartSettings::default_settings());
        assert_eq!(res, Err(ChartErrors::MissingColumn(SEATS_COLUMN.to_string())));
    }

    #[test]
    fn duplicate_state_fails_the_lookup() {
        let t = table(&[
            ["Z", "1", "1", "0", "0", "0", "0", "0", "0", "0"],
            ["Z", "2", "0", "2", "0", "0", "0", "0", "0", "0"],
        ]);
        let res = build_figure(&t, &ChartSettings::default_settings());
        assert_eq!(
            res,
            Err(ChartErrors::StateLookup {
                state: "Z".to_string(),
                matches: 2
            })
        );
    }

    #[test]
    fn unknown_state_fails_the_lookup() {
        let rows = margin_rows(&single_state()).unwrap();
        assert_eq!(
            find_state(&rows, "Nowhere"),
            Err(ChartErrors::StateLookup {
                state: "Nowhere".to_string(),
                matches: 0
            })
        );
        assert_eq!(find_state(&rows, "X").unwrap().seats, 10);
    }

    #[test]
    fn counts_must_be_integers() {
        let t = table(&[["W", "3", "1", "two", "0", "0", "0", "0", "0", "0"]]);
        let res = build_figure(&t, &ChartSettings::default_settings());
        assert_eq!(
            res,
            Err(ChartErrors::InvalidCount {
                state: "W".to_string(),
                column: "Winner with > 10% to <= 20%".to_string(),
                value: "two".to_string()
            })
        );
        let t = table(&[["W", "-3", "1", "0", "0", "0", "0", "0", "0", "0"]]);
        assert!(matches!(
            build_figure(&t, &ChartSettings::default_settings()),
            Err(ChartErrors::InvalidCount { .. })
        ));
    }

    #[test]
    fn blank_state_name() {
        let t = table(&[
            ["A", "1", "1", "0", "0", "0", "0", "0", "0", "0"],
            ["  ", "1", "1", "0", "0", "0", "0", "0", "0", "0"],
        ]);
        let res = build_figure(&t, &ChartSettings::default_settings());
        assert_eq!(res, Err(ChartErrors::EmptyStateName { row: 1 }));
    }

    #[test]
    fn layout_follows_the_settings() {
        let mut settings = ChartSettings::default_settings();
        settings.title = "Margins".to_string();
        settings.width = 800;
        settings.annotation_y_shift = 12;
        let fig = build_figure(&single_state(), &settings).unwrap();
        assert_eq!(fig.layout.title.text, "Margins");
        assert_eq!(fig.layout.width, 800);
        assert_eq!(fig.layout.height, 900);
        assert_eq!(fig.layout.barmode, "group");
        assert_eq!(fig.layout.hovermode, "x unified");
        assert_eq!(fig.layout.xaxis.tickangle, Some(-45));
        assert_eq!(fig.layout.legend.title.text, "Winning Margin");
        assert_eq!(fig.layout.annotations[0].yshift, 12);
    }

    #[test]
    fn figure_serializes_as_plotly_json() {
        let fig = build_figure(&single_state(), &ChartSettings::default_settings()).unwrap();
        let js = serde_json::to_value(&fig).unwrap();
        assert_eq!(js["data"][0]["type"], "bar");
        assert_eq!(js["data"][0]["textposition"], "outside");
        assert_eq!(js["layout"]["barmode"], "group");
        assert_eq!(js["layout"]["title"]["xanchor"], "center");
        assert_eq!(js["layout"]["yaxis"]["zeroline"], true);
        // Unset options are left out.
        assert!(js["layout"]["xaxis"].get("gridcolor").is_none());
        assert_eq!(js["layout"]["annotations"][0]["text"], "Total Seats: 10");
    }

    #[test]
    fn builder_rejects_ragged_rows() {
        let mut b = builder::TableBuilder::new(&headers()).unwrap();
        let res = b.add_row(&["A".to_string(), "1".to_string()]);
        assert_eq!(
            res,
            Err(TableShapeError {
                row: 1,
                expected: 10,
                found: 2
            })
        );
        assert!(builder::TableBuilder::new(&[]).is_err());
    }
}
