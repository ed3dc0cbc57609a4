use crate::tui::app::{App, Impact, View};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::Color::White;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Padding, Paragraph, Row, Table, Tabs};
use waterflow::analysis::reports::EdgeMetrics;

pub fn draw_app(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(frame.area());

    frame.render_widget(build_header(app), chunks[0]);
    frame.render_widget(build_tabs(app), chunks[1]);
    match app.view {
        View::Cities => frame.render_widget(build_city_table(app), chunks[2]),
        View::Deficits => frame.render_widget(build_deficit_table(app), chunks[2]),
        View::Metrics => draw_metrics(frame, app, chunks[2]),
        View::Resiliency => draw_resiliency(frame, app, chunks[2]),
    }
    frame.render_widget(build_footer(app), chunks[3]);
}

/// Green when demand is met, yellow when partly met, red when the city gets
/// less than half of what it asks for.
fn deficit_style(deficit: f64, demand: f64) -> Style {
    let ratio = if demand > 0.0 { deficit / demand } else { 0.0 };
    if ratio <= 0.0 {
        Style::default().fg(Color::Green)
    } else if ratio < 0.5 {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Red)
    }
}

fn header_row<const N: usize>(titles: [&'static str; N]) -> Row<'static> {
    Row::new(titles).style(Style::default().bg(Color::DarkGray).fg(White))
}

fn titled_block(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(Line::from(vec![
            Span::from(title).style(Style::default().bold()),
        ]))
        .padding(Padding::horizontal(1))
}

fn build_header(app: &'_ App) -> Block<'_> {
    let dim = Style::default().add_modifier(Modifier::DIM);
    Block::new()
        .title(Line::from(vec![
            Span::raw(" Waterflow ").style(Style::default().bold().cyan()),
            Span::raw(format!("[{}]", app.source)).style(dim),
            Span::raw(" Supply: ").style(dim),
            Span::raw(app.deficits.total_supply().to_string()).style(Style::default().bold()),
            Span::raw(" Demand: ").style(dim),
            Span::raw(format!("{:.1}", app.deficits.total_demand()))
                .style(Style::default().bold()),
            Span::raw(" Max flow: ").style(dim),
            Span::raw(app.max_flow.to_string()).style(Style::default().bold()),
            Span::raw(" "),
        ]))
        .title_alignment(Alignment::Center)
}

fn build_tabs(app: &'_ App) -> Tabs<'_> {
    Tabs::new(
        View::ALL
            .iter()
            .enumerate()
            .map(|(i, v)| format!("{} {}", i + 1, v.title())),
    )
    .select(View::ALL.iter().position(|v| *v == app.view))
    .highlight_style(Style::default().bold().cyan())
}

fn build_footer(app: &'_ App) -> Paragraph<'_> {
    let keys = match app.view {
        View::Metrics => "b balance",
        View::Resiliency => "↑↓ select  enter simulate  p pipelines",
        _ => "",
    };
    Paragraph::new(Line::from(vec![
        Span::raw(" q quit  tab switch  ").style(Style::default().add_modifier(Modifier::DIM)),
        Span::raw(keys).style(Style::default().add_modifier(Modifier::DIM)),
        Span::raw("  "),
        Span::raw(app.status.as_str()).style(Style::default().yellow()),
    ]))
}

fn build_city_table(app: &'_ App) -> Table<'_> {
    Table::new(
        app.cities.iter().map(|city| {
            let deficit = (city.demand - city.inflow as f64).max(0.0);
            Row::new(vec![
                Cell::from(city.code.as_str()),
                Cell::from(city.name.as_str()),
                Cell::from(format!("{:>9}", city.population)),
                Cell::from(format!("{:>8.1}", city.demand)),
                Cell::from(format!("{:>8}", city.inflow)).style(deficit_style(deficit, city.demand)),
            ])
        }),
        [
            Constraint::Length(8),
            Constraint::Length(24),
            Constraint::Length(10),
            Constraint::Length(9),
            Constraint::Length(9),
        ],
    )
    .header(header_row(["Code", "City", "Population", "  Demand", "    Flow"]))
    .block(titled_block(" Water reaching each city ".to_string()))
}

fn build_deficit_table(app: &'_ App) -> Table<'_> {
    let title = format!(
        " Cities short: {}  total deficit {:.1} ",
        app.deficits.shortfalls().len(),
        app.deficits.total_deficit()
    );
    Table::new(
        app.deficits.shortfalls().iter().map(|s| {
            Row::new(vec![
                Cell::from(s.code()),
                Cell::from(s.name()),
                Cell::from(format!("{:>8.1}", s.demand())),
                Cell::from(format!("{:>8.1}", s.deficit()))
                    .style(deficit_style(s.deficit(), s.demand())),
            ])
        }),
        [
            Constraint::Length(8),
            Constraint::Length(24),
            Constraint::Length(9),
            Constraint::Length(9),
        ],
    )
    .header(header_row(["Code", "City", "  Demand", " Deficit"]))
    .block(titled_block(title))
}

fn draw_metrics(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(3)])
        .split(area);

    let after = app.balanced.as_ref().map(|b| &b.metrics);
    let value = |f: fn(&EdgeMetrics) -> f64| {
        let before = format!("{:>10.2}", f(&app.metrics));
        let after = after
            .map(|m| format!("{:>10.2}", f(m)))
            .unwrap_or_else(|| format!("{:>10}", "-"));
        (before, after)
    };
    let rows = [
        ("Max spare", value(|m| m.max_spare())),
        ("Mean spare", value(|m| m.mean_spare())),
        ("Variance", value(|m| m.variance())),
    ];
    let summary = Table::new(
        rows.into_iter().map(|(name, (before, after))| {
            Row::new(vec![Cell::from(name), Cell::from(before), Cell::from(after)])
        }),
        [
            Constraint::Length(14),
            Constraint::Length(11),
            Constraint::Length(11),
        ],
    )
    .header(header_row(["Metric", "    Before", "     After"]))
    .block(titled_block(" Spare capacity ".to_string()));
    frame.render_widget(summary, chunks[0]);

    let adjustments = app
        .balanced
        .as_ref()
        .map(|b| b.report.adjustments())
        .unwrap_or_default();
    let table = Table::new(
        adjustments.iter().map(|a| {
            let (origin, dest) = app
                .graph
                .edge(a.edge)
                .map(|e| (e.origin(), e.dest()))
                .unwrap_or(("?", "?"));
            Row::new(vec![
                Cell::from(format!("{} -> {}", origin, dest)),
                Cell::from(format!("{:>6}", a.before)),
                Cell::from(format!("{:>6}", a.after)).style(Style::default().green()),
            ])
        }),
        [
            Constraint::Length(24),
            Constraint::Length(7),
            Constraint::Length(7),
        ],
    )
    .header(header_row(["Pipe", "Before", " After"]))
    .block(titled_block(" Balancing adjustments ".to_string()));
    frame.render_widget(table, chunks[1]);
}

fn draw_resiliency(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(32), Constraint::Min(20)])
        .split(area);

    let targets = Table::new(
        app.targets().into_iter().enumerate().map(|(i, (code, kind))| {
            let row = Row::new(vec![Cell::from(code.to_string()), Cell::from(kind)]);
            if i == app.selected {
                row.style(Style::default().bg(Color::Blue).fg(White))
            } else {
                row
            }
        }),
        [Constraint::Length(10), Constraint::Length(16)],
    )
    .header(header_row(["Code", "Kind"]))
    .block(titled_block(" Take offline ".to_string()));
    frame.render_widget(targets, chunks[0]);

    match &app.impact {
        None => frame.render_widget(
            Paragraph::new("Select a node and press enter, or p to scan every pipe")
                .block(titled_block(" Impact ".to_string())),
            chunks[1],
        ),
        Some(Impact::Node { code, cities }) => {
            let table = Table::new(
                cities.iter().map(|c| {
                    Row::new(vec![
                        Cell::from(c.code()),
                        Cell::from(c.name()),
                        Cell::from(format!("{:>8.1}", c.demand())),
                        Cell::from(format!("{:>8.1}", c.baseline_deficit())),
                        Cell::from(format!("{:>8.1}", c.deficit()))
                            .style(deficit_style(c.deficit(), c.demand())),
                    ])
                }),
                [
                    Constraint::Length(8),
                    Constraint::Length(22),
                    Constraint::Length(9),
                    Constraint::Length(9),
                    Constraint::Length(9),
                ],
            )
            .header(header_row(["Code", "City", "  Demand", "  Before", "   After"]))
            .block(titled_block(format!(" Without {} ", code)));
            frame.render_widget(table, chunks[1]);
        }
        Some(Impact::Pipelines(pipes)) => {
            let table = Table::new(
                pipes.iter().filter(|p| p.is_critical()).map(|p| {
                    let cities = p
                        .affected()
                        .iter()
                        .filter(|c| c.increase() > 0.0)
                        .map(|c| format!("{} (-{:.1})", c.code(), c.increase()))
                        .collect::<Vec<_>>()
                        .join(", ");
                    Row::new(vec![
                        Cell::from(format!("{} -> {}", p.edge().origin(), p.edge().dest())),
                        Cell::from(format!("{:>5}", p.edge().capacity())),
                        Cell::from(cities).style(Style::default().light_red()),
                    ])
                }),
                [
                    Constraint::Length(20),
                    Constraint::Length(6),
                    Constraint::Min(20),
                ],
            )
            .header(header_row(["Pipe", "  Cap", "Cities losing water"]))
            .block(titled_block(" Critical pipes ".to_string()));
            frame.render_widget(table, chunks[1]);
        }
    }
}
