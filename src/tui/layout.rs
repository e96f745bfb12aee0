//! TUI layout and widget rendering.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table, TableState};

use super::app::App;
use super::style;
use crate::billing::types::Scheme;

/// Renders the full TUI frame.
pub fn render(frame: &mut Frame, app: &App<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),  // header
            Constraint::Length(12), // bar chart
            Constraint::Min(5),     // month table
            Constraint::Length(1),  // footer
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_bars(frame, app, chunks[1]);
    render_table(frame, app, chunks[2]);
    render_footer(frame, chunks[3]);
}

/// Header bar: month count and overall winner.
fn render_header(frame: &mut Frame, app: &App<'_>, area: Rect) {
    let t = &app.report.totals;
    let header = Line::from(vec![
        Span::styled(
            " TARIFF-COMPARE ",
            Style::default()
                .fg(style::HEADER_FG)
                .bg(style::HEADER_BG)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            " {} months │ {:.1} kWh │ cheapest overall: ",
            app.report.months.len(),
            t.total_kwh
        )),
        Span::styled(
            format!("{} (${:.2})", t.best_scheme, t.cost(t.best_scheme)),
            Style::default()
                .fg(style::BEST_FG)
                .add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

/// Cost of each scheme in the selected month.
fn render_bars(frame: &mut Frame, app: &App<'_>, area: Rect) {
    let Some(month) = app.selected_month() else {
        let empty = Paragraph::new("  No readings.")
            .block(Block::default().title(" Costs ").borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    };

    let bars: Vec<Bar> = Scheme::ALL
        .into_iter()
        .map(|scheme| {
            let cost = month.cost(scheme);
            let label = if scheme == month.best_scheme {
                format!("{scheme} ✓")
            } else {
                scheme.to_string()
            };
            Bar::default()
                .value(style::bar_cents(cost))
                .text_value(format!("${cost:.2}"))
                .label(Line::from(label))
                .style(Style::default().fg(style::scheme_color(scheme)))
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .title(format!(
                    " {} │ {:.1} kWh │ tier 2: {:.1} kWh ",
                    month.month, month.total_kwh, month.tier2_kwh
                ))
                .borders(Borders::ALL),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(12)
        .bar_gap(3);
    frame.render_widget(chart, area);
}

/// One row per month, selected row highlighted.
fn render_table(frame: &mut Frame, app: &App<'_>, area: Rect) {
    let header = Row::new(["Month", "kWh", "TOU $", "ULO $", "Tiered $", "Best", "Saves $"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = app
        .report
        .months
        .iter()
        .map(|m| {
            Row::new(vec![
                Cell::from(m.month.to_string()),
                Cell::from(format!("{:.1}", m.total_kwh)),
                Cell::from(format!("{:.2}", m.tou_cost)),
                Cell::from(format!("{:.2}", m.ulo_cost)),
                Cell::from(format!("{:.2}", m.tiered_cost)),
                Cell::from(m.best_scheme.to_string())
                    .style(Style::default().fg(style::scheme_color(m.best_scheme))),
                Cell::from(format!("{:.2}", m.spread())),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(8),
        Constraint::Length(10),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(7),
        Constraint::Length(8),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().title(" Months ").borders(Borders::ALL))
        .row_highlight_style(Style::default().bg(style::SELECTED_BG))
        .highlight_symbol("▶ ");

    let mut state = TableState::default().with_selected(app.selected_month().map(|_| app.selected));
    frame.render_stateful_widget(table, area, &mut state);
}

/// Footer with keybinding hints.
fn render_footer(frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(Span::styled(
        " q:Quit  ←/→:Month  Home/End:First/Last",
        Style::default().fg(style::FOOTER_FG),
    )));
    frame.render_widget(footer, area);
}
