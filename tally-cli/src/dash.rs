use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span, Text},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph, Row,
        Table, TableState,
    },
    Frame, Terminal,
};
use std::io::{self, Stdout};
use tally_core::{format_money, group_thousands, Statement};
use tally_finance::{by_description, Dashboard, MonthlyFlow, RunningPoint};

struct DashState {
    query: String,
    editing: bool,
    filtered: Statement,
    table: TableState,
}

impl DashState {
    fn new(dash: &Dashboard) -> Self {
        let mut table = TableState::default();
        if !dash.statement.is_empty() {
            table.select(Some(0));
        }
        Self {
            query: String::new(),
            editing: false,
            filtered: dash.statement.clone(),
            table,
        }
    }

    fn refilter(&mut self, dash: &Dashboard) {
        self.filtered = by_description(&dash.statement, &self.query);
        self.table
            .select(if self.filtered.is_empty() { None } else { Some(0) });
    }

    fn scroll(&mut self, delta: isize) {
        if self.filtered.is_empty() {
            return;
        }
        let last = self.filtered.len() as isize - 1;
        let cur = self.table.selected().unwrap_or(0) as isize;
        self.table.select(Some((cur + delta).clamp(0, last) as usize));
    }
}

pub fn run_dash(dash: &Dashboard, symbol: &str) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = dash_loop(&mut terminal, dash, symbol);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn dash_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    dash: &Dashboard,
    symbol: &str,
) -> Result<()> {
    let mut state = DashState::new(dash);

    loop {
        terminal.draw(|f| draw(f, dash, &mut state, symbol))?;

        if !event::poll(std::time::Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        if state.editing {
            match key.code {
                KeyCode::Enter => state.editing = false,
                KeyCode::Esc => {
                    state.editing = false;
                    state.query.clear();
                    state.refilter(dash);
                }
                KeyCode::Backspace => {
                    state.query.pop();
                    state.refilter(dash);
                }
                KeyCode::Char(c) => {
                    state.query.push(c);
                    state.refilter(dash);
                }
                _ => {}
            }
            continue;
        }

        match key.code {
            KeyCode::Char('q') => break,
            KeyCode::Char('/') => state.editing = true,
            KeyCode::Esc if !state.query.is_empty() => {
                state.query.clear();
                state.refilter(dash);
            }
            KeyCode::Esc => break,
            KeyCode::Down | KeyCode::Char('j') => state.scroll(1),
            KeyCode::Up | KeyCode::Char('k') => state.scroll(-1),
            KeyCode::PageDown => state.scroll(10),
            KeyCode::PageUp => state.scroll(-10),
            _ => {}
        }
    }

    Ok(())
}

fn draw(f: &mut Frame, dash: &Dashboard, state: &mut DashState, symbol: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Percentage(45),
            Constraint::Min(6),
            Constraint::Length(3),
        ])
        .split(f.area());

    draw_cards(f, chunks[0], dash, symbol);

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);
    f.render_widget(monthly_chart(&dash.monthly), charts[0]);
    let points = cumulative_points(&dash.running);
    f.render_widget(running_chart(&dash.running, &points), charts[1]);

    draw_table(f, chunks[2], dash, state);

    let (label, style) = if state.editing {
        ("search (Enter=done, Esc=clear)", Style::default().fg(Color::Yellow))
    } else {
        ("/=search  ↑↓=scroll  q=quit", Style::default().fg(Color::Gray))
    };
    let search = Paragraph::new(state.query.as_str())
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(label));
    f.render_widget(search, chunks[3]);
}

fn draw_cards(f: &mut Frame, area: Rect, dash: &Dashboard, symbol: &str) {
    let s = &dash.summary;
    let closing = s
        .closing_balance
        .map(|b| format_money(b, symbol))
        .unwrap_or_else(|| "n/a".to_string());
    let cards = [
        ("Total Spent", format_money(s.total_debit, symbol), Color::Red),
        ("Total Received", format_money(s.total_credit, symbol), Color::Green),
        ("Net", format_money(s.net, symbol), Color::Cyan),
        ("Closing Balance", closing, Color::Yellow),
    ];

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for ((title, value, color), col) in cards.into_iter().zip(cols.iter()) {
        let card = Paragraph::new(Text::from(Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(card, *col);
    }
}

fn monthly_chart(monthly: &[MonthlyFlow]) -> BarChart<'_> {
    let mut chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Monthly cash flow (debit / credit)"),
        )
        .bar_width(5)
        .bar_gap(0)
        .group_gap(2);

    for m in monthly {
        let bars = [
            Bar::default()
                .value(bar_value(m.debit))
                .style(Style::default().fg(Color::Red)),
            Bar::default()
                .value(bar_value(m.credit))
                .style(Style::default().fg(Color::Green)),
        ];
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(m.month_year.as_str()))
                .bars(&bars),
        );
    }
    chart
}

fn running_chart<'a>(running: &[RunningPoint], points: &'a [(f64, f64)]) -> Chart<'a> {
    let (x_bounds, y_bounds) = chart_bounds(points);
    let x_labels = match (running.first(), running.last()) {
        (Some(a), Some(b)) => vec![a.date.to_string(), b.date.to_string()],
        _ => Vec::new(),
    };
    let y_labels = vec![group_thousands(y_bounds[0]), group_thousands(y_bounds[1])];

    let dataset = Dataset::default()
        .name("cumulative")
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(points);

    Chart::new(vec![dataset])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Running total"),
        )
        .x_axis(Axis::default().bounds(x_bounds).labels(x_labels))
        .y_axis(Axis::default().bounds(y_bounds).labels(y_labels))
}

fn draw_table(f: &mut Frame, area: Rect, dash: &Dashboard, state: &mut DashState) {
    let rows: Vec<Row> = state
        .filtered
        .records
        .iter()
        .map(|r| {
            Row::new(vec![
                r.txn_date.to_string(),
                r.txn_type().to_string(),
                group_thousands(r.debit),
                group_thousands(r.credit),
                r.balance.map(group_thousands).unwrap_or_default(),
                r.description.clone(),
            ])
        })
        .collect();

    let title = format!(
        "Transactions ({} of {})",
        state.filtered.len(),
        dash.statement.len()
    );
    let table = Table::new(
        rows,
        [
            Constraint::Length(11),
            Constraint::Length(7),
            Constraint::Length(13),
            Constraint::Length(13),
            Constraint::Length(15),
            Constraint::Min(20),
        ],
    )
    .header(
        Row::new(vec!["Date", "Type", "Debit", "Credit", "Balance", "Description"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().borders(Borders::ALL).title(title))
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    f.render_stateful_widget(table, area, &mut state.table);
}

/// Bar heights are whole currency units
fn bar_value(amount: f64) -> u64 {
    amount.max(0.0).round() as u64
}

/// (days since the first record, cumulative) pairs for the line chart
fn cumulative_points(running: &[RunningPoint]) -> Vec<(f64, f64)> {
    let Some(start) = running.first().map(|p| p.date) else {
        return Vec::new();
    };
    running
        .iter()
        .map(|p| ((p.date - start).num_days() as f64, p.cumulative))
        .collect()
}

/// Axis bounds covering every point; degenerate ranges are widened by one
fn chart_bounds(points: &[(f64, f64)]) -> ([f64; 2], [f64; 2]) {
    if points.is_empty() {
        return ([0.0, 1.0], [0.0, 1.0]);
    }
    let (mut x0, mut x1) = (f64::MAX, f64::MIN);
    let (mut y0, mut y1) = (f64::MAX, f64::MIN);
    for &(x, y) in points {
        x0 = x0.min(x);
        x1 = x1.max(x);
        y0 = y0.min(y);
        y1 = y1.max(y);
    }
    if x1 <= x0 {
        x1 = x0 + 1.0;
    }
    if y1 <= y0 {
        y1 = y0 + 1.0;
    }
    ([x0, x1], [y0, y1])
}
