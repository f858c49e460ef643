use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Tabs};

use f1_catalog::config::CatalogConfig;
use f1_catalog::data_loader::spawn_loader;
use f1_catalog::logging::init_logging;
use f1_catalog::render::{self, CARD_HEIGHT, CARD_WIDTH, Card, GridView, LOADING_MESSAGE};
use f1_catalog::state::{self, AppState, Delta, InputFocus, Section, apply_delta, section_label};

struct App {
    state: AppState,
    should_quit: bool,
}

impl App {
    fn new() -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        if self.state.focus == InputFocus::Search {
            match key.code {
                KeyCode::Char(c) => self.state.push_search_char(c),
                KeyCode::Backspace => self.state.pop_search_char(),
                KeyCode::Enter | KeyCode::Esc => self.state.blur_search(),
                KeyCode::Tab => self.state.next_section(),
                KeyCode::BackTab => self.state.prev_section(),
                _ => {}
            }
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.state.switch_section(Section::Cars),
            KeyCode::Char('2') => self.state.switch_section(Section::Drivers),
            KeyCode::Char('3') => self.state.switch_section(Section::Champions),
            KeyCode::Tab => self.state.next_section(),
            KeyCode::BackTab => self.state.prev_section(),
            KeyCode::Char('/') => self.state.focus_search(),
            KeyCode::Char('y') => self.state.cycle_year(true),
            KeyCode::Char('Y') => self.state.cycle_year(false),
            KeyCode::Char('t') => self.state.cycle_team(true),
            KeyCode::Char('T') => self.state.cycle_team(false),
            KeyCode::Char('j') | KeyCode::Down => self.state.scroll_down(),
            KeyCode::Char('k') | KeyCode::Up => self.state.scroll_up(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Esc => self.state.help_overlay = false,
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let config = CatalogConfig::from_env();
    init_logging(&config.log_file)?;
    tracing::info!(?config, "starting f1_catalog");

    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    spawn_loader(config.source.clone(), tx);

    let mut app = App::new();
    let res = run_app(&mut terminal, &mut app, rx, config.tick_rate);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "terminal loop failed");
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
    tick_rate: Duration,
) -> io::Result<()> {
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, app))?;

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

fn ui(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(frame.size());

    render_tabs(frame, chunks[0], &app.state);
    render_filter_bar(frame, chunks[1], &app.state);

    let (columns, rows) = render::grid_shape(chunks[2].width, chunks[2].height);
    app.state.set_grid_shape(columns, rows);
    let grid = render::grid_view(&app.state);
    render_grid(frame, chunks[2], &grid, app.state.scroll);

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[3]);

    let footer =
        Paragraph::new(footer_text(&app.state)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[4]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn render_tabs(frame: &mut Frame, area: Rect, state: &AppState) {
    let titles = Section::ALL
        .iter()
        .enumerate()
        .map(|(i, section)| format!("{} {}", i + 1, section_label(*section)))
        .collect::<Vec<_>>();
    let title = match state.loaded_at {
        Some(at) => format!("F1 CATALOG | loaded {}", at.format("%H:%M:%S")),
        None => "F1 CATALOG".to_string(),
    };
    let tabs = Tabs::new(titles)
        .block(Block::default().title(title).borders(Borders::ALL))
        .select(state.section.index())
        .highlight_style(
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

fn render_filter_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(20),
            Constraint::Length(14),
            Constraint::Length(28),
        ])
        .split(area);

    let search_style = if state.focus == InputFocus::Search {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let cursor = if state.focus == InputFocus::Search { "_" } else { "" };
    let search = Paragraph::new(format!("{}{cursor}", state.criteria.search)).block(
        Block::default()
            .title("Search (/)")
            .borders(Borders::ALL)
            .border_style(search_style),
    );
    frame.render_widget(search, cols[0]);

    let year = state
        .criteria
        .year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "All".to_string());
    let year_title = if state.section == Section::Drivers {
        "Year (n/a)"
    } else {
        "Year (y)"
    };
    let year = Paragraph::new(year).block(Block::default().title(year_title).borders(Borders::ALL));
    frame.render_widget(year, cols[1]);

    let team = state.criteria.team.clone().unwrap_or_else(|| "All".to_string());
    let team = Paragraph::new(team).block(Block::default().title("Team (t)").borders(Borders::ALL));
    frame.render_widget(team, cols[2]);
}

fn render_grid(frame: &mut Frame, area: Rect, grid: &GridView, scroll: usize) {
    let cards = match grid {
        GridView::Loading => {
            render_placeholder(frame, area, LOADING_MESSAGE, Color::DarkGray);
            return;
        }
        GridView::Error(message) => {
            render_placeholder(frame, area, message, Color::Red);
            return;
        }
        GridView::NoResults(message) => {
            render_placeholder(frame, area, message, Color::DarkGray);
            return;
        }
        GridView::Cards(cards) => cards,
    };

    if area.height < CARD_HEIGHT || area.width < CARD_WIDTH {
        render_placeholder(frame, area, "Card grid needs more room", Color::DarkGray);
        return;
    }

    let (columns, visible_rows) = render::grid_shape(area.width, area.height);
    let (start, end) = render::visible_range(scroll, cards.len(), columns, visible_rows);
    let card_width = area.width / columns as u16;

    for (i, card) in cards[start..end].iter().enumerate() {
        let row = (i / columns) as u16;
        let col = (i % columns) as u16;
        let card_area = Rect {
            x: area.x + col * card_width,
            y: area.y + row * CARD_HEIGHT,
            width: card_width,
            height: CARD_HEIGHT,
        };
        render_card(frame, card_area, card);
    }
}

fn render_card(frame: &mut Frame, area: Rect, card: &Card) {
    let mut lines = vec![
        Line::from(Span::styled(
            card.subtitle.clone(),
            Style::default().fg(Color::Yellow),
        )),
        Line::from(Span::styled(
            card.image_source(),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    for row in &card.details {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{}: ", row.label),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(row.value.clone()),
        ]));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(Span::styled(
                card.title.clone(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL),
    );
    frame.render_widget(paragraph, area);
}

fn render_placeholder(frame: &mut Frame, area: Rect, text: &str, color: Color) {
    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(color))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

const GRID_KEYS: &str =
    "1/2/3 Section | / Search | y/Y Year | t/T Team | j/k Scroll | ? Help | q Quit";

fn footer_text(state: &AppState) -> String {
    match state.focus {
        InputFocus::Search => {
            "Type to search | Backspace Delete | Enter/Esc Done | Tab Section".to_string()
        }
        InputFocus::Grid => {
            let count = match state.status {
                state::LoadStatus::Ready => format!("{} results | ", state.filtered_view().len()),
                _ => String::new(),
            };
            format!("{count}{GRID_KEYS}")
        }
    }
}

fn console_text(state: &AppState) -> String {
    state
        .logs
        .back()
        .cloned()
        .unwrap_or_else(|| "No messages yet".to_string())
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "F1 Catalog - Help",
        "",
        "Sections:",
        "  1 / 2 / 3    Cars / Drivers / Champions",
        "  Tab          Next section",
        "  Shift+Tab    Previous section",
        "",
        "Filters (reset on section change):",
        "  /            Search name, team, year",
        "  y / Y        Next / previous year",
        "  t / T        Next / previous team",
        "",
        "  j/k or ↑/↓   Scroll",
        "  ?            Toggle help",
        "  q            Quit",
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
