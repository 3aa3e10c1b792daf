use anyhow::Result;
use chrono::{DateTime, Utc};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use std::io::stdout;
use tracing::debug;

use crate::models::Job;
use crate::view::{is_recent, summary, JobBoard, LEVELS_ICON, LOCATION_ICON};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputMode {
    Normal,
    Filter,
}

struct AppState {
    board: JobBoard,
    cursor: usize,
    scroll_offset: u16,
    mode: InputMode,
    filter: String,
    recent_only: bool,
}

impl AppState {
    fn new(board: JobBoard) -> Self {
        Self {
            board,
            cursor: 0,
            scroll_offset: 0,
            mode: InputMode::Normal,
            filter: String::new(),
            recent_only: false,
        }
    }

    fn next(&mut self) {
        let len = self.board.visible_len();
        if len > 0 && self.cursor < len - 1 {
            self.cursor += 1;
        }
    }

    fn prev(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(3);
    }

    fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(3);
    }

    fn select_cursor(&mut self) {
        if self.board.select(self.cursor) {
            self.scroll_offset = 0;
        }
    }

    fn refilter_company(&mut self) {
        self.board.filter_by_company(&self.filter);
        self.recent_only = false;
        self.cursor = 0;
    }

    fn filter_recent(&mut self, now: DateTime<Utc>) {
        self.board.filter_last_seven_days(now);
        self.recent_only = true;
        self.cursor = 0;
    }

    fn clear(&mut self) {
        self.filter.clear();
        self.board.clear_filter();
        self.recent_only = false;
        self.cursor = 0;
    }

    /// Returns true when the browser should exit.
    fn handle_key(&mut self, code: KeyCode, now: DateTime<Utc>) -> bool {
        match self.mode {
            InputMode::Filter => match code {
                KeyCode::Enter | KeyCode::Esc => self.mode = InputMode::Normal,
                KeyCode::Backspace => {
                    self.filter.pop();
                    self.refilter_company();
                }
                KeyCode::Char(c) => {
                    self.filter.push(c);
                    self.refilter_company();
                }
                _ => {}
            },
            InputMode::Normal => match code {
                KeyCode::Char('q') | KeyCode::Esc => return true,
                KeyCode::Down | KeyCode::Char('j') => self.next(),
                KeyCode::Up | KeyCode::Char('k') => self.prev(),
                KeyCode::Enter | KeyCode::Char(' ') => self.select_cursor(),
                KeyCode::Char('J') | KeyCode::PageDown => self.scroll_down(),
                KeyCode::Char('K') | KeyCode::PageUp => self.scroll_up(),
                KeyCode::Char('/') => self.mode = InputMode::Filter,
                KeyCode::Char('r') => self.filter_recent(now),
                KeyCode::Char('c') => self.clear(),
                _ => {}
            },
        }
        false
    }
}

pub fn run_browse(board: JobBoard) -> Result<()> {
    let mut state = AppState::new(board);

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_loop(&mut terminal, &mut state);

    // Restore terminal
    let restored = restore_terminal(disable_raw_mode, || {
        stdout().execute(LeaveAlternateScreen).map(|_| ())
    });

    result?;
    restored
}

/// Runs both restore steps even if the first fails, then reports the first error.
fn restore_terminal<R, S>(leave_raw_mode: R, leave_screen: S) -> Result<()>
where
    R: FnOnce() -> std::io::Result<()>,
    S: FnOnce() -> std::io::Result<()>,
{
    let raw = leave_raw_mode();
    let screen = leave_screen();
    raw?;
    screen?;
    Ok(())
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state: &mut AppState,
) -> Result<()> {
    let mut list_state = ListState::default();

    loop {
        terminal.draw(|frame| draw(frame, state, &mut list_state, Utc::now()))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if state.handle_key(key.code, Utc::now()) {
                break;
            }
            debug!(cursor = state.cursor, visible = state.board.visible_len(), "key handled");
        }
    }
    Ok(())
}

fn draw(frame: &mut Frame, state: &AppState, list_state: &mut ListState, now: DateTime<Utc>) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(frame.area());

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(rows[0]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(chunks[0]);

    frame.render_widget(build_filter_bar(state), left[0]);

    // Left panel: job list
    if state.board.is_empty() {
        let empty = Paragraph::new(Span::styled("No jobs found.", Style::default().fg(Color::Red)))
            .block(Block::default().borders(Borders::ALL).title(" Jobs (0) "));
        frame.render_widget(empty, left[1]);
    } else {
        let width = left[1].width.saturating_sub(5).max(10) as usize;
        let items: Vec<ListItem> = state
            .board
            .visible()
            .into_iter()
            .map(|job| ListItem::new(build_list_item(job, state.board.is_selected(job), width, now)))
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(format!(
                " Jobs ({}/{}) ",
                state.board.visible_len(),
                state.board.jobs().len()
            )))
            .highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("> ");

        list_state.select(Some(state.cursor));
        frame.render_stateful_widget(list, left[1], list_state);
    }

    // Right panel: job detail, only while something is listed
    if let Some(job) = state.board.detail_job() {
        let detail = Paragraph::new(build_detail(job))
            .block(Block::default().borders(Borders::ALL).title(" Detail "))
            .wrap(Wrap { trim: false })
            .scroll((state.scroll_offset, 0));
        frame.render_widget(detail, chunks[1]);
    }

    // Footer help
    let help = match state.mode {
        InputMode::Filter => " type to filter by company  Enter/Esc:done",
        InputMode::Normal => {
            " j/k:move  Enter:select  /:company filter  r:last 7 days  c:clear  J/K:scroll  q:quit"
        }
    };
    frame.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        rows[1],
    );
}

fn build_filter_bar(state: &AppState) -> Paragraph<'_> {
    let mut spans = Vec::new();
    if state.filter.is_empty() && state.mode == InputMode::Normal {
        spans.push(Span::styled(
            "Filter by company name",
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        spans.push(Span::raw(state.filter.as_str()));
    }
    if state.mode == InputMode::Filter {
        spans.push(Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)));
    }
    if state.recent_only {
        spans.push(Span::styled(
            "  [last 7 days]",
            Style::default().fg(Color::Yellow),
        ));
    }

    let border = if state.mode == InputMode::Filter {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(" Filter "),
    )
}

fn build_list_item(job: &Job, selected: bool, width: usize, now: DateTime<Utc>) -> Text<'static> {
    let accent = if selected {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let marker = if selected { "▌" } else { " " };

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(vec![
        Span::styled(marker, accent),
        Span::styled(
            format!("[logo] {}", job.company_logo_url),
            Style::default().fg(Color::DarkGray),
        ),
    ]));
    lines.push(Line::from(vec![
        Span::styled(marker, accent),
        Span::styled(job.title.clone(), accent.add_modifier(Modifier::BOLD)),
    ]));
    lines.push(Line::from(vec![
        Span::styled(marker, accent),
        Span::raw(job.company_name.clone()),
    ]));
    for line in textwrap::wrap(&summary(&job.description), width) {
        lines.push(Line::from(vec![
            Span::styled(marker, accent),
            Span::styled(line.into_owned(), Style::default().fg(Color::Gray)),
        ]));
    }

    let mut info = vec![
        Span::styled(marker, accent),
        Span::raw(job.estimated_salary.clone()),
        Span::raw("  "),
    ];
    if is_recent(&job.posting_date, now) {
        info.push(Span::styled(
            "New ",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ));
    }
    info.push(Span::styled(job.posted_date.clone(), Style::default().fg(Color::DarkGray)));
    lines.push(Line::from(info));
    lines.push(Line::from(""));

    Text::from(lines)
}

fn build_detail(job: &Job) -> Text<'_> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let rule = Line::from(Span::styled(
        "─".repeat(40),
        Style::default().fg(Color::DarkGray),
    ));

    let mut lines: Vec<Line> = Vec::new();

    // Header
    lines.push(Line::from(Span::styled(&job.title, bold)));
    lines.push(Line::from(job.company_name.as_str()));
    lines.push(Line::from(job.location()));
    lines.push(Line::from(Span::styled(
        &job.estimated_salary,
        Style::default().fg(Color::Green),
    )));
    lines.push(rule.clone());

    lines.push(Line::from(Span::styled("Job Highlights", bold)));
    lines.push(Line::from(format!("  {} {}", LOCATION_ICON, job.location())));
    lines.push(Line::from(format!("  {} {}", LEVELS_ICON, job.levels())));
    lines.push(rule);

    lines.push(Line::from(Span::styled("Job Description", bold)));
    for line in job.description.lines() {
        lines.push(Line::from(line));
    }

    Text::from(lines)
}
