use anyhow::Result;
use budget_admin::{
    entities::{Budget, BudgetEntry, Customer, Division, Employee, GlAccount, Vendor},
    ClientConfig, Facade, FieldError, FieldKind, FieldSpec, HttpStore, ListView, LoadState, Mode,
    Record, RecordId,
};
use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use std::collections::HashMap;
use std::io;
use tracing::{info, warn};

/// Blank rows appended by `a` on the Entries page, until changed with `+`/`-`
const DEFAULT_ENTRY_BATCH: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Budgets,
    Entries,
    Employees,
    Customers,
    Vendors,
    GlAccounts,
    Divisions,
}

impl Page {
    pub const ALL: [Page; 7] = [
        Page::Budgets,
        Page::Entries,
        Page::Employees,
        Page::Customers,
        Page::Vendors,
        Page::GlAccounts,
        Page::Divisions,
    ];

    fn index(&self) -> usize {
        Self::ALL.iter().position(|p| p == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Budgets => "Budgets",
            Page::Entries => "Entries",
            Page::Employees => "Employees",
            Page::Customers => "Customers",
            Page::Vendors => "Vendors",
            Page::GlAccounts => "GL Accounts",
            Page::Divisions => "Divisions",
        }
    }
}

// ============================================================================
// SCREEN - what every list page exposes to the loop and the renderer
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    List,
    Search,
    Form,
}

trait Screen {
    fn focus(&self) -> Focus;
    fn loading(&self) -> bool;
    fn load(&mut self);
    fn on_key(&mut self, key: KeyEvent);
    fn draw(&self, f: &mut Frame, area: Rect, title: &str);
    fn status_spans(&self) -> Vec<Span<'static>>;
}

impl<T: Record> Screen for ListView<T> {
    fn focus(&self) -> Focus {
        match self.mode() {
            Mode::Listing => Focus::List,
            Mode::Searching => Focus::Search,
            Mode::Editing(_) => Focus::Form,
        }
    }

    fn loading(&self) -> bool {
        self.is_loading()
    }

    fn load(&mut self) {
        self.refresh();
    }

    fn on_key(&mut self, key: KeyEvent) {
        match Screen::focus(self) {
            Focus::Form => match key.code {
                KeyCode::Esc => self.cancel(),
                KeyCode::Enter => self.submit(),
                code => {
                    let Some(form) = self.form_mut() else {
                        return;
                    };
                    match code {
                        KeyCode::Tab | KeyCode::Down => form.focus_next(),
                        KeyCode::BackTab | KeyCode::Up => form.focus_previous(),
                        KeyCode::Left => form.cycle_choice(false),
                        KeyCode::Right => form.cycle_choice(true),
                        KeyCode::Backspace => form.backspace(),
                        KeyCode::Char(c) => form.push_char(c),
                        _ => {}
                    }
                }
            },
            Focus::Search => match key.code {
                KeyCode::Enter | KeyCode::Esc => self.finish_search(),
                KeyCode::Backspace => self.pop_query_char(),
                KeyCode::Char(c) => self.push_query_char(c),
                _ => {}
            },
            Focus::List => match key.code {
                KeyCode::Down | KeyCode::Char('j') => self.select_next(),
                KeyCode::Up | KeyCode::Char('k') => self.select_previous(),
                KeyCode::Home => self.select_first(),
                KeyCode::End => self.select_last(),
                KeyCode::Char('/') => self.start_search(),
                KeyCode::Char('n') => self.open_create(),
                KeyCode::Enter | KeyCode::Char('e') => self.open_edit(),
                KeyCode::Char('d') => self.delete_selected(),
                KeyCode::Char(' ') => self.toggle_active_selected(),
                KeyCode::Char('i') => self.toggle_include_inactive(),
                KeyCode::Char('r') => self.request_reload(),
                KeyCode::Esc if !self.query().is_empty() => self.set_query(""),
                _ => {}
            },
        }
    }

    fn draw(&self, f: &mut Frame, area: Rect, title: &str) {
        let show_search = Screen::focus(self) == Focus::Search || !self.query().is_empty();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(if show_search {
                [Constraint::Length(3), Constraint::Min(0)]
            } else {
                [Constraint::Length(0), Constraint::Min(0)]
            })
            .split(area);

        if show_search {
            render_search(f, chunks[0], self.query(), Screen::focus(self) == Focus::Search);
        }

        match self.load_state() {
            LoadState::Loading => {
                let text = Paragraph::new(format!("Loading {}...", title.to_lowercase()))
                    .style(Style::default().fg(Color::Cyan))
                    .block(Block::default().borders(Borders::ALL).title(format!(" {} ", title)));
                f.render_widget(text, chunks[1]);
            }
            LoadState::Failed(message) => {
                let text = Paragraph::new(vec![
                    Line::from(Span::styled(message.clone(), Style::default().fg(Color::Red))),
                    Line::from(""),
                    Line::from(vec![
                        Span::raw("Press "),
                        Span::styled("r", Style::default().fg(Color::Yellow)),
                        Span::raw(" to retry"),
                    ]),
                ])
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL).title(format!(" {} ", title)));
                f.render_widget(text, chunks[1]);
            }
            LoadState::Ready => render_table(f, chunks[1], self, title),
        }

        if let Mode::Editing(form) = self.mode() {
            render_form(f, area, form.title(), form.inputs(), form.focus(), form.errors(), T::fields());
        }
    }

    fn status_spans(&self) -> Vec<Span<'static>> {
        let selected = self.selected().map(|i| i + 1).unwrap_or(0);
        let mut spans = vec![Span::styled(
            format!(" Row: {}/{} ", selected, self.visible().len()),
            Style::default().fg(Color::Cyan),
        )];

        if T::blank().active().is_some() && self.include_inactive() {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled("Showing inactive", Style::default().fg(Color::Green)));
        }

        if let Some(notice) = self.notice() {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(notice.to_string(), Style::default().fg(Color::Magenta)));
        }

        spans
    }
}

// ============================================================================
// APP
// ============================================================================

pub struct App {
    pub current_page: Page,
    pub should_quit: bool,
    budgets: ListView<Budget>,
    open_budget: Option<Budget>,
    entries: HashMap<RecordId, ListView<BudgetEntry>>,
    entry_batch: usize,
    employees: ListView<Employee>,
    customers: ListView<Customer>,
    vendors: ListView<Vendor>,
    gl_accounts: ListView<GlAccount>,
    divisions: ListView<Division>,
}

impl App {
    /// Budgets come from the mock API, everything else is local
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let store = HttpStore::<Budget>::new(config)?;
        info!(url = %store.base_url(), "budgets backed by mock API");
        Ok(Self::with_budgets(Facade::new(Box::new(store))))
    }

    pub fn with_budgets(budgets: Facade<Budget>) -> Self {
        Self {
            current_page: Page::Budgets,
            should_quit: false,
            budgets: ListView::new(budgets),
            open_budget: None,
            entries: HashMap::new(),
            entry_batch: DEFAULT_ENTRY_BATCH,
            employees: ListView::new(Facade::in_memory(Employee::seed())),
            customers: ListView::new(Facade::in_memory(Customer::seed())),
            vendors: ListView::new(Facade::in_memory(Vendor::seed())),
            gl_accounts: ListView::new(Facade::in_memory(GlAccount::seed())),
            divisions: ListView::new(Facade::in_memory(Division::seed())),
        }
    }

    fn screen(&self) -> Option<&dyn Screen> {
        let screen: &dyn Screen = match self.current_page {
            Page::Budgets => &self.budgets,
            Page::Entries => self.entries.get(&self.open_budget.as_ref()?.id)?,
            Page::Employees => &self.employees,
            Page::Customers => &self.customers,
            Page::Vendors => &self.vendors,
            Page::GlAccounts => &self.gl_accounts,
            Page::Divisions => &self.divisions,
        };
        Some(screen)
    }

    fn screen_mut(&mut self) -> Option<&mut dyn Screen> {
        let screen: &mut dyn Screen = match self.current_page {
            Page::Budgets => &mut self.budgets,
            Page::Entries => {
                let id = self.open_budget.as_ref()?.id;
                self.entries.get_mut(&id)?
            }
            Page::Employees => &mut self.employees,
            Page::Customers => &mut self.customers,
            Page::Vendors => &mut self.vendors,
            Page::GlAccounts => &mut self.gl_accounts,
            Page::Divisions => &mut self.divisions,
        };
        Some(screen)
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
    }

    /// Run the pending fetch for the current page. Returns true when one
    /// ran, so the caller redraws before waiting on input.
    pub fn load_pending(&mut self) -> bool {
        match self.screen_mut() {
            Some(screen) if screen.loading() => {
                screen.load();
                true
            }
            _ => false,
        }
    }

    /// Show the entries of the selected budget
    pub fn open_entries(&mut self) {
        let Some(budget) = self.budgets.selected_record().cloned() else {
            return;
        };

        self.entries
            .entry(budget.id)
            .or_insert_with(|| ListView::new(Facade::in_memory(BudgetEntry::seed())));
        self.open_budget = Some(budget);
        self.current_page = Page::Entries;
    }

    pub fn add_blank_entries(&mut self) {
        let Some(id) = self.open_budget.as_ref().map(|b| b.id) else {
            return;
        };
        let Some(view) = self.entries.get_mut(&id) else {
            return;
        };

        let today = Local::now().date_naive();
        match view.facade_mut().add_blank_entries(self.entry_batch, today) {
            Ok(added) => info!(budget = id, count = added.len(), "blank entries added"),
            Err(e) => warn!(budget = id, error = %e, "failed to add blank entries"),
        }
        view.refresh();
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        let focus = self.screen().map(|s| s.focus()).unwrap_or(Focus::List);

        if focus == Focus::List {
            match key.code {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                    return;
                }
                KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => {
                    self.previous_page();
                    return;
                }
                KeyCode::BackTab => {
                    self.previous_page();
                    return;
                }
                KeyCode::Tab => {
                    self.next_page();
                    return;
                }
                KeyCode::Char('o') if self.current_page == Page::Budgets => {
                    self.open_entries();
                    return;
                }
                KeyCode::Char('+') | KeyCode::Char('=') if self.current_page == Page::Entries => {
                    self.entry_batch += 1;
                    return;
                }
                KeyCode::Char('-') if self.current_page == Page::Entries => {
                    self.entry_batch = self.entry_batch.saturating_sub(1).max(1);
                    return;
                }
                KeyCode::Char('a') if self.current_page == Page::Entries => {
                    self.add_blank_entries();
                    return;
                }
                _ => {}
            }
        }

        if let Some(screen) = self.screen_mut() {
            screen.on_key(key);
        }
    }

    /// "Sales / Field Sales" for the selected division
    fn division_path(&self) -> Option<String> {
        let division = self.divisions.selected_record()?;
        Some(division.path(self.divisions.all()).join(" / "))
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if app.should_quit {
            return Ok(());
        }

        // Loading frame is on screen; fetch, then redraw
        if app.load_pending() {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.on_key(key);
            }
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.current_page {
        Page::Entries => render_entries(f, chunks[1], app),
        page => {
            if let Some(screen) = app.screen() {
                screen.draw(f, chunks[1], page.title());
            }
        }
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut tab_spans = vec![];
    for (i, page) in Page::ALL.iter().enumerate() {
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

    let header = Paragraph::new(Line::from(tab_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Budget Admin "),
    );

    f.render_widget(header, area);
}

fn render_entries(f: &mut Frame, area: Rect, app: &App) {
    let (Some(budget), Some(view)) = (
        app.open_budget.as_ref(),
        app.screen(),
    ) else {
        let hint = Paragraph::new(vec![
            Line::from("No budget open."),
            Line::from(vec![
                Span::raw("Select one on the Budgets page and press "),
                Span::styled("o", Style::default().fg(Color::Yellow)),
                Span::raw("."),
            ]),
        ])
        .block(Block::default().borders(Borders::ALL).title(" Entries "));
        f.render_widget(hint, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let total = app
        .entries
        .get(&budget.id)
        .map(|v| BudgetEntry::total(v.all()))
        .unwrap_or(0.0);

    let summary = Paragraph::new(Line::from(vec![
        Span::styled(budget.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!("  {} → {}  ", budget.start_date, budget.end_date)),
        Span::styled(budget.status.as_str(), Style::default().fg(Color::Green)),
        Span::raw("  |  "),
        Span::styled(format!("Total: {:.2}", total), Style::default().fg(Color::Yellow)),
        Span::raw("  |  "),
        Span::styled(
            format!("Add: {} rows", app.entry_batch),
            Style::default().fg(Color::Cyan),
        ),
    ]))
    .block(Block::default().borders(Borders::ALL).title(" Budget "));

    f.render_widget(summary, chunks[0]);
    view.draw(f, chunks[1], "Budget Entries");
}

fn render_search(f: &mut Frame, area: Rect, query: &str, editing: bool) {
    let cursor = if editing { "▏" } else { "" };
    let style = if editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    };

    let search = Paragraph::new(Line::from(vec![
        Span::styled("Search: ", Style::default().fg(Color::Cyan)),
        Span::styled(format!("{}{}", query, cursor), style),
    ]))
    .block(Block::default().borders(Borders::ALL));

    f.render_widget(search, area);
}

fn render_table<T: Record>(f: &mut Frame, area: Rect, view: &ListView<T>, title: &str) {
    let has_active = T::blank().active().is_some();

    let mut labels = vec!["ID"];
    labels.extend(T::fields().iter().map(|spec| spec.label));
    if has_active {
        labels.push("Active");
    }

    let header_cells = labels.iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = view.visible().iter().map(|record| {
        let mut cells = vec![Cell::from(record.id().to_string())];
        cells.extend(
            T::fields()
                .iter()
                .map(|spec| Cell::from(truncate(&record.get(spec.field), 30))),
        );

        let style = match record.active() {
            Some(true) => {
                cells.push(Cell::from("Yes").style(Style::default().fg(Color::Green)));
                Style::default()
            }
            Some(false) => {
                cells.push(Cell::from("No").style(Style::default().fg(Color::Red)));
                Style::default().fg(Color::DarkGray)
            }
            None => Style::default(),
        };

        Row::new(cells).style(style).height(1)
    });

    let field_count = T::fields().len() as u32 + u32::from(has_active);
    let mut widths = vec![Constraint::Length(5)];
    widths.extend((0..field_count).map(|_| Constraint::Ratio(1, field_count.max(1))));

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(format!(" {} ({}) ", title, view.visible().len())),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("→ ");

    let mut state = TableState::default();
    state.select(view.selected());
    f.render_stateful_widget(table, area, &mut state);
}

fn render_form<F: 'static>(
    f: &mut Frame,
    area: Rect,
    title: String,
    inputs: &[String],
    focus: usize,
    errors: &[FieldError],
    fields: &[FieldSpec<F>],
) {
    let modal = centered_rect(60, 70, area);
    f.render_widget(Clear, modal);

    let mut lines = Vec::new();
    for (i, (spec, input)) in fields.iter().zip(inputs).enumerate() {
        let focused = i == focus;
        let marker = if focused { "▶ " } else { "  " };
        let required = if spec.required { "*" } else { "" };

        let label_style = if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };

        let mut spans = vec![
            Span::raw(marker),
            Span::styled(format!("{}{}: ", spec.label, required), label_style),
            Span::raw(input.clone()),
        ];
        if focused {
            spans.push(Span::styled("▏", Style::default().fg(Color::Yellow)));
        }

        let hint = match spec.kind {
            FieldKind::Choice(options) => Some(format!("←/→ {}", options.join(", "))),
            FieldKind::Date => Some("YYYY-MM-DD".to_string()),
            FieldKind::Reference(kind) => Some(format!("{} id", kind)),
            FieldKind::Text | FieldKind::Number => None,
        };
        if let (true, Some(hint)) = (focused, hint) {
            spans.push(Span::styled(format!("  ({})", hint), Style::default().fg(Color::DarkGray)));
        }

        lines.push(Line::from(spans));
    }

    if !errors.is_empty() {
        lines.push(Line::from(""));
        for error in errors {
            lines.push(Line::from(Span::styled(
                error.to_string(),
                Style::default().fg(Color::Red),
            )));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" Save | "),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::raw(" Cancel | "),
        Span::styled("Tab/↑/↓", Style::default().fg(Color::Yellow)),
        Span::raw(" Field"),
    ]));

    let form = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(format!(" {} ", title)),
    );

    f.render_widget(form, modal);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut status_spans = app
        .screen()
        .map(|s| s.status_spans())
        .unwrap_or_default();

    if app.current_page == Page::Divisions {
        if let Some(path) = app.division_path() {
            status_spans.push(Span::raw(" | "));
            status_spans.push(Span::styled(
                format!("Path: {}", path),
                Style::default().fg(Color::Green),
            ));
        }
    }

    let focus = app.screen().map(|s| s.focus()).unwrap_or(Focus::List);
    let hints: &[(&'static str, &'static str)] = match (focus, app.current_page) {
        (Focus::Form, _) => &[("Enter", "Save"), ("Esc", "Cancel")],
        (Focus::Search, _) => &[("Enter", "Done"), ("Backspace", "Erase")],
        (Focus::List, Page::Budgets) => &[
            ("n", "New"),
            ("e", "Edit"),
            ("d", "Delete"),
            ("o", "Entries"),
            ("/", "Search"),
            ("r", "Reload"),
            ("Tab", "Page"),
            ("q", "Quit"),
        ],
        (Focus::List, Page::Entries) => &[
            ("n", "New"),
            ("e", "Edit"),
            ("d", "Delete"),
            ("a", "Add rows"),
            ("+/-", "Count"),
            ("/", "Search"),
            ("Tab", "Page"),
            ("q", "Quit"),
        ],
        (Focus::List, _) => &[
            ("n", "New"),
            ("e", "Edit"),
            ("d", "Delete"),
            ("Space", "Active"),
            ("i", "Inactive"),
            ("/", "Search"),
            ("Tab", "Page"),
            ("q", "Quit"),
        ],
    };

    for (key, label) in hints {
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(*key, Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(format!(" {}", label)));
    }

    let status = Paragraph::new(Line::from(status_spans))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(status, area);
}

/// Rect of `percent_x` by `percent_y` in the middle of `area`
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn press(app: &mut App, code: KeyCode) {
        app.on_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn local_app() -> App {
        let mut app = App::with_budgets(Facade::in_memory(Budget::seed()));
        app.load_pending();
        app
    }

    fn screen_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 30)).unwrap();
        terminal.draw(|f| ui(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_page_cycle_wraps() {
        assert_eq!(Page::Budgets.next(), Page::Entries);
        assert_eq!(Page::Divisions.next(), Page::Budgets);
        assert_eq!(Page::Budgets.previous(), Page::Divisions);
        assert_eq!(Page::GlAccounts.title(), "GL Accounts");
    }

    #[test]
    fn test_pages_load_on_first_visit() {
        let mut app = local_app();
        assert!(!app.load_pending());

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.current_page, Page::Employees);
        assert!(app.employees.is_loading());

        assert!(app.load_pending());
        assert_eq!(app.employees.visible().len(), 2);
    }

    #[test]
    fn test_create_budget_through_modal() {
        let mut app = local_app();

        press(&mut app, KeyCode::Char('n'));
        type_text(&mut app, "Ops Budget");
        press(&mut app, KeyCode::Enter);

        assert!(matches!(app.budgets.mode(), Mode::Listing));
        assert_eq!(app.budgets.visible().len(), 3);
        assert_eq!(app.budgets.selected_record().unwrap().name, "Ops Budget");
        assert_eq!(app.budgets.selected_record().unwrap().id, 3);
    }

    #[test]
    fn test_blank_form_stays_open_with_errors() {
        let mut app = local_app();
        app.current_page = Page::Customers;
        app.load_pending();

        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Enter);

        let Mode::Editing(form) = app.customers.mode() else {
            panic!("form should still be open");
        };
        assert_eq!(form.errors().len(), 4);

        // 'q' is text while the modal is open
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.customers.visible().len(), 2);
    }

    #[test]
    fn test_search_then_toggle_active() {
        let mut app = local_app();
        app.current_page = Page::Customers;
        app.load_pending();

        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "BOB");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.customers.visible().len(), 1);

        press(&mut app, KeyCode::Char(' '));
        assert!(app.customers.visible().is_empty());

        press(&mut app, KeyCode::Char('i'));
        assert_eq!(app.customers.visible().len(), 1);
        assert!(!app.customers.visible()[0].active);
    }

    #[test]
    fn test_open_entries_and_add_blank_rows() {
        let mut app = local_app();
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('o'));

        assert_eq!(app.current_page, Page::Entries);
        assert_eq!(app.open_budget.as_ref().unwrap().id, 2);
        assert!(app.load_pending());

        press(&mut app, KeyCode::Char('a'));
        let entries = &app.entries[&2];
        assert_eq!(entries.visible().len(), 2 + DEFAULT_ENTRY_BATCH);
        assert_eq!(BudgetEntry::total(entries.all()), 3000.0);

        // other budgets keep their own entries
        assert!(!app.entries.contains_key(&1));
    }

    #[test]
    fn test_entry_batch_size_adjustable() {
        let mut app = local_app();
        press(&mut app, KeyCode::Char('o'));
        app.load_pending();

        press(&mut app, KeyCode::Char('+'));
        press(&mut app, KeyCode::Char('+'));
        assert_eq!(app.entry_batch, 12);

        for _ in 0..20 {
            press(&mut app, KeyCode::Char('-'));
        }
        assert_eq!(app.entry_batch, 1);

        press(&mut app, KeyCode::Char('+'));
        press(&mut app, KeyCode::Char('+'));
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.entries[&1].visible().len(), 5);
        assert!(screen_text(&app).contains("Add: 3 rows"));

        // '-' is plain text inside the search box
        press(&mut app, KeyCode::Char('/'));
        press(&mut app, KeyCode::Char('-'));
        assert_eq!(app.entry_batch, 3);
    }

    #[test]
    fn test_quit_only_from_list() {
        let mut app = local_app();
        press(&mut app, KeyCode::Char('/'));
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        assert_eq!(app.budgets.query(), "q");

        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_renders_budget_table_and_division_path() {
        let mut app = local_app();
        let text = screen_text(&app);
        assert!(text.contains("FY 2024 Budget"));
        assert!(text.contains("Q1 2024 Forecast"));

        app.current_page = Page::Divisions;
        app.load_pending();
        app.divisions
            .facade_mut()
            .create(Division::new("Field Sales", "FS", Some(1)))
            .unwrap();
        app.divisions.refresh();
        app.divisions.select_last();

        let text = screen_text(&app);
        assert!(text.contains("Path: Sales / Field Sales"));
    }

    #[test]
    fn test_renders_loading_before_fetch() {
        let app = App::with_budgets(Facade::in_memory(Budget::seed()));
        assert!(screen_text(&app).contains("Loading budgets..."));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long vendor name", 10), "a very ...");
    }
}
