use std::io;

use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame, Terminal, TerminalOptions, Viewport,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use breakeven_core::chart::{ChartSpec, Polyline};

/// Rows reserved below the prompt for the inline chart.
const CHART_HEIGHT: u16 = 24;
/// Dots per dashed reference line.
const DASH_STEPS: usize = 40;
const ORANGE: Color = Color::Rgb(255, 165, 0);

/// Draw the chart inline in the terminal, below the current cursor.
pub fn draw(chart: &ChartSpec) -> io::Result<()> {
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::with_options(
        backend,
        TerminalOptions {
            viewport: Viewport::Inline(CHART_HEIGHT),
        },
    )?;
    render(&mut terminal, chart)?;
    println!();
    Ok(())
}

pub fn render<B: Backend>(terminal: &mut Terminal<B>, chart: &ChartSpec) -> io::Result<()> {
    let data = PlotData::from_spec(chart);
    terminal.draw(|f| ui(f, chart, &data))?;
    Ok(())
}

/// Chart points converted to the f64 pairs the widget plots.
struct PlotData {
    revenue: Vec<(f64, f64)>,
    total_cost: Vec<(f64, f64)>,
    vertical: Vec<(f64, f64)>,
    horizontal: Vec<(f64, f64)>,
    marker: Vec<(f64, f64)>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

impl PlotData {
    fn from_spec(chart: &ChartSpec) -> Self {
        let x_bounds = [to_f64(chart.x_range.0), to_f64(chart.x_range.1)];
        let y_lo = to_f64(chart.y_range.0);
        let y_hi = to_f64(chart.y_range.1);
        let y_bounds = [y_lo, y_hi + (y_hi - y_lo).abs() * 0.05];

        let (vertical, horizontal, marker) = match &chart.annotation {
            Some(m) => {
                let x = to_f64(m.units);
                let y = to_f64(m.revenue);
                (
                    dashed(|t| (x, y_bounds[0] + (y - y_bounds[0]) * t)),
                    dashed(|t| (x_bounds[0] + (x - x_bounds[0]) * t, y)),
                    vec![(x, y)],
                )
            }
            None => (Vec::new(), Vec::new(), Vec::new()),
        };

        Self {
            revenue: points(&chart.revenue),
            total_cost: points(&chart.total_cost),
            vertical,
            horizontal,
            marker,
            x_bounds,
            y_bounds,
        }
    }
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

fn points(line: &Polyline) -> Vec<(f64, f64)> {
    line.points
        .iter()
        .map(|(x, y)| (to_f64(*x), to_f64(*y)))
        .collect()
}

/// Every other step along `t` in [0, 1], giving a dashed look.
fn dashed(at: impl Fn(f64) -> (f64, f64)) -> Vec<(f64, f64)> {
    (0..=DASH_STEPS)
        .step_by(2)
        .map(|i| at(i as f64 / DASH_STEPS as f64))
        .collect()
}

fn axis_labels(bounds: [f64; 2]) -> Vec<Span<'static>> {
    let mid = (bounds[0] + bounds[1]) / 2.0;
    [bounds[0], mid, bounds[1]]
        .iter()
        .map(|v| Span::raw(format!("{:.0}", v)))
        .collect()
}

fn ui(f: &mut Frame, chart: &ChartSpec, data: &PlotData) {
    let mut datasets = vec![
        Dataset::default()
            .name(chart.revenue.label.clone())
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Green))
            .data(&data.revenue),
        Dataset::default()
            .name(chart.total_cost.label.clone())
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Red))
            .data(&data.total_cost),
    ];

    if let Some(m) = &chart.annotation {
        datasets.push(
            Dataset::default()
                .name(m.units_label.clone())
                .marker(Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(ORANGE))
                .data(&data.vertical),
        );
        datasets.push(
            Dataset::default()
                .name(m.revenue_label.clone())
                .marker(Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(Color::Blue))
                .data(&data.horizontal),
        );
        datasets.push(
            Dataset::default()
                .name("Break-even")
                .marker(Marker::Block)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(Color::White))
                .data(&data.marker),
        );
    }

    let widget = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(chart.title.clone()),
        )
        .x_axis(
            Axis::default()
                .title(chart.x_label.clone())
                .style(Style::default().fg(Color::Gray))
                .bounds(data.x_bounds)
                .labels(axis_labels(data.x_bounds)),
        )
        .y_axis(
            Axis::default()
                .title(chart.y_label.clone())
                .style(Style::default().fg(Color::Gray))
                .bounds(data.y_bounds)
                .labels(axis_labels(data.y_bounds)),
        );

    let area: Rect = f.size();
    f.render_widget(widget, area);
}
