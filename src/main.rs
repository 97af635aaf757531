use std::fs::File;
use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::widgets::{Axis, Block, Borders, Chart, Clear, Dataset, GraphType, Paragraph, Wrap};

use wp_dashboard::config::DashboardConfig;
use wp_dashboard::record_store::{FIRST_WEEK, LAST_WEEK};
use wp_dashboard::selection::{ChartId, MessageLevel};
use wp_dashboard::state::{spawn_loader, AppState, ChartView, Delta, LoadStatus, Session};
use wp_dashboard::teams::team_label;

struct App {
    session: Session,
    should_quit: bool,
}

impl App {
    fn new(session: Session) -> Self {
        Self {
            session,
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('l') | KeyCode::Right | KeyCode::Char('j') | KeyCode::Down => {
                self.session.next_week()
            }
            KeyCode::Char('h') | KeyCode::Left | KeyCode::Char('k') | KeyCode::Up => {
                self.session.previous_week()
            }
            KeyCode::Char('g') | KeyCode::Home => self.session.first_week(),
            KeyCode::Char('?') => {
                self.session.state.help_overlay = !self.session.state.help_overlay
            }
            KeyCode::Esc => self.session.state.help_overlay = false,
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let config = DashboardConfig::from_env_and_args(&args);
    init_logging(&config)?;

    let state = AppState::new(
        &config.focal_team,
        config.source.to_string(),
        config.panels.clone(),
    );
    let mut app = App::new(Session::new(state, config.selection()));

    let (tx, rx) = mpsc::channel();
    spawn_loader(config.source.clone(), tx);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

/// The screen owns stderr, so log lines only go somewhere when a file is configured.
fn init_logging(config: &DashboardConfig) -> Result<()> {
    let Some(path) = config.log_file.as_ref() else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            app.session.apply_delta(delta);
        }

        terminal.draw(|f| ui(f, &app.session.state))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match &state.load {
        LoadStatus::Loading => {
            let loading = Paragraph::new(format!("Loading {} ...", state.source_label))
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(loading, chunks[1]);
        }
        LoadStatus::Failed(reason) => {
            let failed = Paragraph::new(format!(
                "Could not load the dataset.\n{reason}\n\nRestart once the data is available."
            ))
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true });
            frame.render_widget(failed, chunks[1]);
        }
        LoadStatus::Ready => render_body(frame, chunks[1], state),
    }

    let narrative = Paragraph::new(state.narrative.clone().unwrap_or_default())
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Most Exciting Game").borders(Borders::ALL));
    frame.render_widget(narrative, chunks[2]);

    let console = Paragraph::new(console_text(state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[3]);

    let footer = Paragraph::new(status_line(state));
    frame.render_widget(footer, chunks[4]);

    if state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let line1 = format!(
        " {} WIN PROBABILITY | Week {} | {}",
        team_label(&state.focal_team).to_uppercase(),
        state.selected_week,
        state.source_label
    );
    let line2 = match &state.header {
        Some(game) => format!(
            " {}  ·  {} at {}  ·  {}",
            game.matchup(),
            team_label(&game.away_team),
            team_label(&game.home_team),
            game.display_date()
        ),
        None => " No game selected".to_string(),
    };
    format!("{line1}\n{line2}")
}

fn render_body(frame: &mut Frame, area: Rect, state: &AppState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Min(30)])
        .split(area);

    let weeks = Paragraph::new(week_list_text(state))
        .block(Block::default().title("Weeks").borders(Borders::ALL));
    frame.render_widget(weeks, columns[0]);

    let panels = ChartId::ALL
        .into_iter()
        .filter(|chart| state.mounted.contains(chart))
        .collect::<Vec<_>>();
    if panels.is_empty() {
        let empty = Paragraph::new("No chart panels enabled (WP_PANELS)")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, columns[1]);
        return;
    }

    let constraints = panels
        .iter()
        .map(|_| Constraint::Ratio(1, panels.len() as u32))
        .collect::<Vec<_>>();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(columns[1]);

    for (chart, area) in panels.into_iter().zip(rows.iter()) {
        match state.chart(chart) {
            Some(view) => render_chart(frame, *area, chart, view),
            None => {
                let empty = Paragraph::new("No data")
                    .style(Style::default().fg(Color::DarkGray))
                    .block(
                        Block::default()
                            .title(panel_title(chart))
                            .borders(Borders::ALL),
                    );
                frame.render_widget(empty, *area);
            }
        }
    }
}

fn panel_title(chart: ChartId) -> &'static str {
    match chart {
        ChartId::GameWinProbability => "Win Probability",
        ChartId::GameExcitement => "Excitement",
        ChartId::Season => "Season",
    }
}

fn chart_color(chart: ChartId) -> Color {
    match chart {
        ChartId::GameWinProbability => Color::Blue,
        ChartId::GameExcitement => Color::Yellow,
        ChartId::Season => Color::Red,
    }
}

fn render_chart(frame: &mut Frame, area: Rect, chart: ChartId, view: &ChartView) {
    let data = view.data();
    let (x_min, x_max) = match chart {
        ChartId::Season => (f64::from(FIRST_WEEK), f64::from(LAST_WEEK)),
        _ => (0.0, (data.len().saturating_sub(1) as f64).max(1.0)),
    };
    let y_min = view.axis.y_min;
    let y_max = view.y_max();
    let latest = data.last().map(|(_, y)| *y).unwrap_or(0.0);

    let marker = if chart == ChartId::Season {
        symbols::Marker::Dot
    } else {
        symbols::Marker::Braille
    };
    let segments = view.segments();
    let datasets = segments
        .iter()
        .enumerate()
        .map(|(i, run)| {
            let dataset = Dataset::default()
                .marker(marker)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(chart_color(chart)))
                .data(run);
            // One legend entry, not one per run.
            if i == 0 {
                dataset.name(format!("{} {latest:.3}", view.axis.y_title))
            } else {
                dataset
            }
        })
        .collect::<Vec<_>>();

    let widget = Chart::new(datasets)
        .block(
            Block::default()
                .title(format!(" {} ", view.axis.title))
                .borders(Borders::ALL),
        )
        .x_axis(
            Axis::default()
                .title(Span::styled(
                    view.axis.x_title.clone(),
                    Style::default().fg(Color::DarkGray),
                ))
                .bounds([x_min, x_max])
                .labels(vec![
                    Span::raw(format!("{x_min:.0}")),
                    Span::raw(format!("{x_max:.0}")),
                ]),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled(
                    view.axis.y_title.clone(),
                    Style::default().fg(Color::DarkGray),
                ))
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::raw(format!("{y_min:.1}")),
                    Span::raw(format!("{y_max:.2}")),
                ]),
        );
    frame.render_widget(widget, area);
}

fn week_list_text(state: &AppState) -> String {
    if state.weeks.is_empty() {
        return "No weeks".to_string();
    }
    state
        .weeks
        .iter()
        .map(|opt| {
            let prefix = if opt.week == state.selected_week { "> " } else { "  " };
            let mut line = format!("{prefix}Week {:>2}", opt.week);
            if !opt.has_games {
                line.push_str(" (no games)");
            }
            if opt.most_exciting {
                line.push_str(" *");
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn status_line(state: &AppState) -> Line<'static> {
    let keys = "h/← Prev | l/→ Next | g First | ? Help | q Quit";
    match &state.status {
        Some(msg) => {
            let color = match msg.level {
                MessageLevel::Info => Color::Cyan,
                MessageLevel::Error => Color::Red,
            };
            Line::from(vec![
                Span::styled(
                    format!(" {} ", msg.text),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!("| {keys}")),
            ])
        }
        None => Line::from(format!(" {keys}")),
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Win Probability Dashboard - Help",
        "",
        "  h / ← / k / ↑   Previous week",
        "  l / → / j / ↓   Next week",
        "  g / Home        First week",
        "  ?               Toggle help",
        "  q               Quit",
        "",
        "Weeks marked * hold the season's most exciting game.",
        "Excitement is |ΔWP| between consecutive plays.",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
