use anyhow::Result;
use bday_tracker::{BirthdayRecord, BirthdayStore, UpcomingBirthday};
use chrono::NaiveDate;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

const PAGE_JUMP: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    AllBirthdays,
    Upcoming,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::AllBirthdays => Page::Upcoming,
            Page::Upcoming => Page::AllBirthdays,
        }
    }

    pub fn previous(&self) -> Self {
        // Two pages: previous and next coincide
        self.next()
    }

    pub fn title(&self) -> &str {
        match self {
            Page::AllBirthdays => "All Birthdays",
            Page::Upcoming => "Upcoming",
        }
    }
}

/// One table row, whichever page it comes from
#[derive(Debug, Clone)]
pub struct Entry {
    pub record: BirthdayRecord,
    pub next_date: NaiveDate,
    pub days_until: i64,
    pub turning: Option<u32>,
}

impl From<UpcomingBirthday> for Entry {
    fn from(u: UpcomingBirthday) -> Self {
        Entry {
            record: u.record,
            next_date: u.next_date,
            days_until: u.days_until,
            turning: u.turning,
        }
    }
}

pub struct App {
    pub all: Vec<Entry>,
    pub upcoming: Vec<Entry>,
    pub upcoming_days: u32,
    pub today: NaiveDate,
    pub state: TableState,
    pub current_page: Page,
    pub show_detail: bool,
}

impl App {
    pub fn new(store: &BirthdayStore, today: NaiveDate, upcoming_days: u32) -> Self {
        let all: Vec<Entry> = store
            .all()
            .into_iter()
            .map(|record| {
                let next_date = record.date.next_occurrence(today);
                Entry {
                    record: record.clone(),
                    next_date,
                    days_until: (next_date - today).num_days(),
                    turning: record.date.age_on(next_date),
                }
            })
            .collect();
        let upcoming: Vec<Entry> = store
            .upcoming(today, upcoming_days)
            .into_iter()
            .map(Entry::from)
            .collect();

        let mut state = TableState::default();
        if !all.is_empty() {
            state.select(Some(0));
        }

        Self {
            all,
            upcoming,
            upcoming_days,
            today,
            state,
            current_page: Page::AllBirthdays,
            show_detail: false,
        }
    }

    /// Rows shown on the current page
    pub fn entries(&self) -> &[Entry] {
        match self.current_page {
            Page::AllBirthdays => &self.all,
            Page::Upcoming => &self.upcoming,
        }
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    pub fn selected_entry(&self) -> Option<&Entry> {
        self.state.selected().and_then(|i| self.entries().get(i))
    }

    pub fn next_page(&mut self) {
        self.switch_to(self.current_page.next());
    }

    pub fn previous_page(&mut self) {
        self.switch_to(self.current_page.previous());
    }

    fn switch_to(&mut self, page: Page) {
        self.current_page = page;

        // Reset selection to first item
        if self.entries().is_empty() {
            self.state.select(None);
        } else {
            self.state.select(Some(0));
        }
    }

    pub fn next(&mut self) {
        let len = self.entries().len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i >= len - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.entries().len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) => len - 1,
            Some(i) => i - 1,
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let len = self.entries().len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => (i + PAGE_JUMP).min(len - 1),
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        if self.entries().is_empty() {
            return;
        }
        let i = self.state.selected().map_or(0, |i| i.saturating_sub(PAGE_JUMP));
        self.state.select(Some(i));
    }

    pub fn first(&mut self) {
        if !self.entries().is_empty() {
            self.state.select(Some(0));
        }
    }

    pub fn last(&mut self) {
        let len = self.entries().len();
        if len > 0 {
            self.state.select(Some(len - 1));
        }
    }

    pub fn todays_count(&self) -> usize {
        self.all.iter().filter(|e| e.days_until == 0).count()
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        log::error!("Viewer stopped with error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Enter => app.toggle_detail(),
                KeyCode::Tab => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        app.previous_page();
                    } else {
                        app.next_page();
                    }
                }
                KeyCode::BackTab => app.previous_page(),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::PageDown => app.page_down(),
                KeyCode::PageUp => app.page_up(),
                KeyCode::Home => app.first(),
                KeyCode::End => app.last(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    if app.show_detail {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1]);

        render_table(f, content_chunks[0], app);
        render_detail_panel(f, content_chunks[1], app);
    } else {
        render_table(f, chunks[1], app);
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut tab_spans = vec![];
    for (i, page) in [Page::AllBirthdays, Page::Upcoming].iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(page.title().to_string(), style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Total: {}", app.all.len()),
        Style::default().fg(Color::White),
    ));
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("🎉 {} today", app.todays_count()),
        Style::default().fg(Color::Magenta),
    ));
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("{} in {} days", app.upcoming.len(), app.upcoming_days),
        Style::default().fg(Color::Green),
    ));

    let header = Paragraph::new(vec![Line::from(tab_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn days_color(days_until: i64) -> Color {
    match days_until {
        0 => Color::Magenta,
        1..=7 => Color::Green,
        8..=30 => Color::Yellow,
        _ => Color::White,
    }
}

fn when_label(days_until: i64) -> String {
    match days_until {
        0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        n => format!("in {} days", n),
    }
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["Name", "Birthday", "Next", "When", "Turns"].iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows: Vec<Row> = app
        .entries()
        .iter()
        .map(|entry| {
            let color = days_color(entry.days_until);
            let cells = vec![
                Cell::from(truncate(&entry.record.name, 30)),
                Cell::from(entry.record.date.to_string()),
                Cell::from(entry.next_date.format("%Y-%m-%d").to_string()),
                Cell::from(when_label(entry.days_until)).style(Style::default().fg(color)),
                Cell::from(entry.turning.map(|a| a.to_string()).unwrap_or_default()),
            ];
            Row::new(cells).height(1)
        })
        .collect();

    let title = format!(" {} ", app.current_page.title());
    let table = Table::new(
        rows,
        [
            Constraint::Length(32),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(14),
            Constraint::Length(6),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(title),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);
    let total = app.entries().len();

    let key = Style::default().fg(Color::Yellow);
    let status_spans = vec![
        Span::styled(
            format!(" Row: {}/{} ", selected, total),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(" | "),
        Span::styled("Enter", key),
        Span::raw(" Details | "),
        Span::styled("Tab", key),
        Span::raw(" Page | "),
        Span::styled("↑/↓", key),
        Span::raw(" Nav | "),
        Span::styled("PgUp/PgDn", key),
        Span::raw(" Fast | "),
        Span::styled("q", Style::default().fg(Color::Red)),
        Span::raw(" Quit"),
    ];

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn render_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Birthday Details ");

    let Some(entry) = app.selected_entry() else {
        f.render_widget(Paragraph::new("No birthday selected").block(block), area);
        return;
    };

    let label = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let year = entry
        .record
        .date
        .year()
        .map(|y| y.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let turning = entry
        .turning
        .map(|a| a.to_string())
        .unwrap_or_else(|| "-".to_string());

    let content = vec![
        Line::from(""),
        Line::from(vec![Span::styled("  Name: ", label), Span::raw(entry.record.name.clone())]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Birthday: ", label),
            Span::raw(entry.record.date.to_string()),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled("  Born: ", label), Span::raw(year)]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Next: ", label),
            Span::raw(entry.next_date.format("%A, %B %-d %Y").to_string()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  When: ", label),
            Span::styled(
                when_label(entry.days_until),
                Style::default().fg(days_color(entry.days_until)),
            ),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled("  Turns: ", label), Span::raw(turning)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            "  Press Enter to close",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )]),
    ];

    f.render_widget(Paragraph::new(content).block(block), area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}
