//! Dashboard interface.
//!
//! A kanban board of the filtered tasks with one column per status, next to a
//! status bar chart and the team leaderboard. Cards can be moved between columns;
//! every change is saved and all views are recomputed from the reloaded workspace.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Row, Table, Wrap},
    Frame, Terminal,
};
use tracing::debug;

use crate::client::client_name;
use crate::db::{format_due_relative, truncate, Database};
use crate::error::FlowResult;
use crate::fields::*;
use crate::filter::{filter_tasks, TaskFilter};
use crate::leaderboard::compute_leaderboard;
use crate::stats::{aggregate_by_status, dashboard_summary};
use crate::task::Task;
use crate::team::birthdays_today;
use crate::tui::colors::{priority_color, status_color};

/// Main dashboard application state
pub struct DashboardApp {
    db: Database,
    db_path: PathBuf,
    today: NaiveDate,
    filter: TaskFilter,
    filter_active: bool, // Whether search input mode is active
    filter_text: String,
    selected_column: usize,
    selected_card: usize,
    status_message: String,
    // Task ids per status column, in board order
    columns: [Vec<String>; 4],
}

impl DashboardApp {
    pub fn new(db_path: &Path, today: NaiveDate) -> FlowResult<Self> {
        let db = Database::load(db_path)?;
        let mut app = DashboardApp {
            db,
            db_path: db_path.to_path_buf(),
            today,
            filter: TaskFilter::default(),
            filter_active: false,
            filter_text: String::new(),
            selected_column: 0,
            selected_card: 0,
            status_message: String::new(),
            columns: Default::default(),
        };
        app.update_columns();
        Ok(app)
    }

    /// Rebuild the columns from the current filter.
    fn update_columns(&mut self) {
        for column in self.columns.iter_mut() {
            column.clear();
        }
        for task in filter_tasks(&self.db.tasks, &self.filter, self.today) {
            self.columns[task.status.column()].push(task.id.clone());
        }
        debug!(visible = self.columns.iter().map(Vec::len).sum::<usize>(), "board recomputed");
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let column_len = self.columns[self.selected_column].len();
        if column_len == 0 {
            self.selected_card = 0;
        } else if self.selected_card >= column_len {
            self.selected_card = column_len - 1;
        }
    }

    fn selected_task_id(&self) -> Option<&str> {
        self.columns[self.selected_column]
            .get(self.selected_card)
            .map(String::as_str)
    }

    fn save_db(&mut self) -> FlowResult<()> {
        self.db.save(&self.db_path)?;
        self.reload()
    }

    fn reload(&mut self) -> FlowResult<()> {
        self.db = Database::load(&self.db_path)?;
        self.update_columns();
        Ok(())
    }

    /// Move the selected card one column left (-1) or right (+1).
    fn move_card(&mut self, step: isize) {
        let target = self.selected_column as isize + step;
        if target < 0 || target >= Status::ALL.len() as isize {
            return;
        }
        let Some(task_id) = self.selected_task_id().map(str::to_string) else {
            return;
        };
        let new_status = Status::ALL[target as usize];
        if let Some(task) = self.db.get_mut(&task_id) {
            task.status = new_status;
        }
        match self.save_db() {
            Err(e) => self.status_message = format!("Error saving: {}", e),
            Ok(()) => {
                self.status_message = format!("Moved task to {}", new_status);
                self.selected_column = target as usize;
                if let Some(pos) = self.columns[self.selected_column].iter().position(|id| *id == task_id) {
                    self.selected_card = pos;
                } else {
                    self.clamp_selection();
                }
            }
        }
    }

    /// Step through today -> overdue -> this week -> all.
    fn cycle_date_range(&mut self) {
        self.filter.date_range = match self.filter.date_range {
            DateRange::All => DateRange::Today,
            DateRange::Today => DateRange::Overdue,
            DateRange::Overdue => DateRange::ThisWeek,
            DateRange::ThisWeek => DateRange::All,
        };
        self.update_columns();
    }

    fn date_range_label(&self) -> &'static str {
        match self.filter.date_range {
            DateRange::Today => "due today",
            DateRange::Overdue => "overdue",
            DateRange::ThisWeek => "this week",
            DateRange::All => "all dates",
        }
    }

    /// Handle keyboard input. Returns true when the user asked to quit.
    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if self.filter_active {
                    match key.code {
                        KeyCode::Esc => {
                            self.filter_active = false;
                            self.filter_text.clear();
                            self.filter.search = None;
                            self.update_columns();
                        }
                        KeyCode::Enter => {
                            self.filter_active = false;
                        }
                        KeyCode::Backspace => {
                            self.filter_text.pop();
                            self.filter.search = Some(self.filter_text.clone()).filter(|s| !s.is_empty());
                            self.update_columns();
                        }
                        KeyCode::Char(c) => {
                            self.filter_text.push(c);
                            self.filter.search = Some(self.filter_text.clone());
                            self.update_columns();
                        }
                        _ => {}
                    }
                    return Ok(false);
                }

                self.status_message.clear();
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return Ok(true),
                    KeyCode::Left if key.modifiers.contains(KeyModifiers::SHIFT) => self.move_card(-1),
                    KeyCode::Right if key.modifiers.contains(KeyModifiers::SHIFT) => self.move_card(1),
                    KeyCode::Char('<') => self.move_card(-1),
                    KeyCode::Char('>') => self.move_card(1),
                    KeyCode::Left | KeyCode::Char('h') => {
                        self.selected_column = self.selected_column.saturating_sub(1);
                        self.clamp_selection();
                    }
                    KeyCode::Right | KeyCode::Char('l') => {
                        self.selected_column = (self.selected_column + 1).min(Status::ALL.len() - 1);
                        self.clamp_selection();
                    }
                    KeyCode::Up | KeyCode::Char('k') => {
                        self.selected_card = self.selected_card.saturating_sub(1);
                    }
                    KeyCode::Down | KeyCode::Char('j') => {
                        self.selected_card += 1;
                        self.clamp_selection();
                    }
                    KeyCode::Char('/') => self.filter_active = true,
                    KeyCode::Char('d') => self.cycle_date_range(),
                    KeyCode::Char('r') => {
                        if let Err(e) = self.reload() {
                            self.status_message = format!("Error reloading: {}", e);
                        } else {
                            self.status_message = "Reloaded".to_string();
                        }
                    }
                    _ => {}
                }
            }
        }
        Ok(false)
    }

    fn render(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Body
                Constraint::Length(1), // Status bar
            ])
            .split(f.area());

        self.render_header(f, chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(68), Constraint::Percentage(32)])
            .split(chunks[1]);
        self.render_board(f, body[0]);

        let side = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(12), Constraint::Min(0)])
            .split(body[1]);
        self.render_status_chart(f, side[0]);
        self.render_leaderboard(f, side[1]);

        self.render_status_bar(f, chunks[2]);
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let summary = dashboard_summary(&self.db.tasks, self.today);
        let mut spans = vec![
            Span::styled("AGENCY OPERATIONS", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                format!(
                    "WIP {}  Delivered {}  Overdue {} ({}%)  Today {}",
                    summary.wip, summary.delivered, summary.overdue, summary.delay_rate, self.today
                ),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            ),
        ];
        let birthdays: Vec<&str> = birthdays_today(&self.db.members, self.today)
            .into_iter()
            .map(|m| m.name.as_str())
            .collect();
        if !birthdays.is_empty() {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                format!("Birthday: {}", birthdays.join(", ")),
                Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
            ));
        }

        let header = Paragraph::new(Line::from(spans))
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        f.render_widget(header, area);
    }

    fn render_board(&self, f: &mut Frame, area: Rect) {
        let constraints: Vec<Constraint> = Status::ALL
            .iter()
            .map(|_| Constraint::Ratio(1, Status::ALL.len() as u32))
            .collect();
        let columns_layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);

        for (i, &column_area) in columns_layout.iter().enumerate() {
            self.render_column(f, column_area, i);
        }
    }

    fn render_column(&self, f: &mut Frame, area: Rect, column_index: usize) {
        let status = Status::ALL[column_index];
        let is_selected = column_index == self.selected_column;
        let color = status_color(status);
        let cards = &self.columns[column_index];

        let border_style = if is_selected {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("{} ({})", status, cards.len()))
            .border_style(border_style);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let card_height = 5usize;
        let visible_cards = (inner.height as usize / card_height).max(1);
        let scroll_offset = if is_selected && self.selected_card >= visible_cards {
            self.selected_card + 1 - visible_cards
        } else {
            0
        };

        let mut rendered = 0;
        for (card_index, task_id) in cards.iter().enumerate().skip(scroll_offset).take(visible_cards) {
            let Some(task) = self.db.get(task_id) else {
                continue;
            };
            let card_area = Rect {
                x: inner.x,
                y: inner.y + (rendered * card_height) as u16,
                width: inner.width,
                height: (card_height as u16).min(inner.height.saturating_sub((rendered * card_height) as u16)),
            };
            if card_area.height == 0 {
                break;
            }
            self.render_card(f, card_area, task, is_selected && card_index == self.selected_card);
            rendered += 1;
        }

        let remaining = cards.len().saturating_sub(scroll_offset + rendered);
        if remaining > 0 && inner.height > 0 {
            let indicator = Paragraph::new(format!("▼ +{} below", remaining)).style(Style::default().fg(Color::Cyan));
            f.render_widget(
                indicator,
                Rect { x: inner.x, y: inner.y + inner.height - 1, width: inner.width, height: 1 },
            );
        }
    }

    fn render_card(&self, f: &mut Frame, area: Rect, task: &Task, is_selected: bool) {
        let style = if is_selected {
            Style::default().bg(status_color(task.status)).fg(Color::Black).add_modifier(Modifier::BOLD)
        } else {
            Style::default().bg(Color::DarkGray)
        };
        let width = area.width.saturating_sub(2) as usize;
        let client = task
            .client_id
            .as_deref()
            .and_then(|c| client_name(&self.db.clients, c))
            .unwrap_or("-");

        let lines = vec![
            Line::from(vec![
                Span::styled(task.priority.label(), Style::default().fg(priority_color(task.priority))),
                Span::raw(format!(" #{}", task.id)),
            ]),
            Line::from(truncate(&task.title, width)),
            Line::from(truncate(
                &format!(
                    "{} | {} | {}",
                    format_due_relative(task.due_date, self.today),
                    if task.assignee.is_empty() { "-" } else { task.assignee.as_str() },
                    client
                ),
                width,
            )),
        ];

        let card = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL))
            .style(style)
            .wrap(Wrap { trim: true });
        f.render_widget(card, area);
    }

    fn render_status_chart(&self, f: &mut Frame, area: Rect) {
        let visible: Vec<Task> = filter_tasks(&self.db.tasks, &self.filter, self.today)
            .into_iter()
            .cloned()
            .collect();
        let counts = aggregate_by_status(&visible);
        let bars: Vec<Bar> = counts
            .iter()
            .map(|(status, n)| {
                Bar::default()
                    .value(n as u64)
                    .label(Line::from(status.label()))
                    .style(Style::default().fg(status_color(status)))
            })
            .collect();

        let chart = BarChart::default()
            .block(Block::default().borders(Borders::ALL).title("Tasks by status"))
            .data(BarGroup::default().bars(&bars))
            .bar_width(7)
            .bar_gap(1);
        f.render_widget(chart, area);
    }

    fn render_leaderboard(&self, f: &mut Frame, area: Rect) {
        let board = compute_leaderboard(&self.db.tasks, &self.db.members, self.today);
        let rows: Vec<Row> = board
            .iter()
            .enumerate()
            .map(|(rank, p)| {
                Row::new(vec![
                    format!("{}", rank + 1),
                    truncate(&p.name, 14),
                    p.score.to_string(),
                    format!("{}/{}/{}", p.delivered, p.open, p.delayed),
                    format!("{}%", p.win_rate),
                ])
            })
            .collect();
        let widths = [
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(6),
            Constraint::Length(9),
            Constraint::Length(5),
        ];
        let table = Table::new(rows, widths)
            .header(
                Row::new(vec!["#", "Member", "Score", "D/O/L", "Win"])
                    .style(Style::default().add_modifier(Modifier::BOLD)),
            )
            .block(Block::default().borders(Borders::ALL).title("Leaderboard"));
        f.render_widget(table, area);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let text = if self.filter_active {
            format!("Search: {} | Type to search, Enter to apply, Esc to clear", self.filter_text)
        } else if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            let shown: usize = self.columns.iter().map(Vec::len).sum();
            let search = if self.filter_text.is_empty() {
                String::new()
            } else {
                format!(" [Search: {}]", self.filter_text)
            };
            format!(
                "Tasks: {} [{}]{} | /: Search | d: Dates | </>: Move | r: Reload | q: Quit",
                shown,
                self.date_range_label(),
                search
            )
        };
        let bar = Paragraph::new(text)
            .style(Style::default().bg(status_color(Status::ALL[self.selected_column])).fg(Color::White))
            .alignment(Alignment::Left);
        f.render_widget(bar, area);
    }

    /// Main event loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;
            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}
