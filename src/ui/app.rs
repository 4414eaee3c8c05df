use std::mem;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState,
    Wrap,
};
use ratatui::Frame;
use rusqlite::Connection;
use tracing::warn;

use crate::db::{
    count_students, create_student, delete_student, fetch_students, search_students,
    update_student,
};
use crate::models::Student;

use super::forms::{ConfirmStudentDelete, SearchForm, StudentField, StudentForm};
use super::helpers::{anchored_rect, centered_rect, surface_error};
use super::menu::{MenuAction, MenuState, MENUS};
use super::screens::StudentTable;

pub const WINDOW_TITLE: &str = "Student Management System";
/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
const MENU_BAR_HEIGHT: u16 = 1;
const TABLE_HEADERS: [&str; 4] = ["Id", "Name", "Course", "Mobile"];
const PAGE_SIZE: isize = 10;
const ABOUT_TEXT: &str = "This app was created as a small exercise in CRUD over SQLite. \
Add, search, edit and delete student records; every change is written straight \
to the database and the table is reloaded from it.";

/// Modal states layered over the student table.
enum Mode {
    Normal,
    Menu(MenuState),
    AddingStudent(StudentForm),
    EditingStudent { id: i64, form: StudentForm },
    ConfirmDelete(ConfirmStudentDelete),
    Searching(SearchForm),
    About,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    conn: Connection,
    table: StudentTable,
    courses: Vec<String>,
    record_count: i64,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    /// Build the app and run the initial load against `conn`.
    pub fn new(conn: Connection, courses: Vec<String>) -> Result<Self> {
        let students = fetch_students(&conn)?;
        let record_count = count_students(&conn)?;
        Ok(Self {
            conn,
            table: StudentTable::new(students),
            courses,
            record_count,
            mode: Mode::Normal,
            status: None,
        })
    }

    /// Students currently shown in the table, in display order.
    pub fn students(&self) -> &[Student] {
        &self.table.students
    }

    pub fn selected_student(&self) -> Option<&Student> {
        self.table.current()
    }

    /// Feed one key press through the active mode. Returns `true` when the
    /// user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::Menu(state) => self.handle_menu(code, state, &mut exit)?,
            Mode::AddingStudent(form) => self.handle_add_student(code, form)?,
            Mode::EditingStudent { id, form } => self.handle_edit_student(code, id, form)?,
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm)?,
            Mode::Searching(form) => self.handle_search(code, form)?,
            Mode::About => Mode::Normal,
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        let action = match code {
            KeyCode::Char('q') => Some(MenuAction::Quit),
            KeyCode::Char('a') | KeyCode::Char('+') => Some(MenuAction::AddStudent),
            KeyCode::Char('f') | KeyCode::Char('/') => Some(MenuAction::Search),
            KeyCode::Char('e') | KeyCode::Char('E') => Some(MenuAction::EditRecord),
            KeyCode::Char('d') | KeyCode::Delete => Some(MenuAction::DeleteRecord),
            KeyCode::Char('r') | KeyCode::F(5) => Some(MenuAction::Refresh),
            KeyCode::Char('?') | KeyCode::F(1) => Some(MenuAction::About),
            KeyCode::Char('m') | KeyCode::F(10) => return Ok(Mode::Menu(MenuState::default())),
            KeyCode::Esc => {
                if self.table.clear_highlights() {
                    self.set_status("Search highlights cleared.", StatusKind::Info);
                }
                None
            }
            KeyCode::Up => {
                self.table.move_selection(-1);
                None
            }
            KeyCode::Down => {
                self.table.move_selection(1);
                None
            }
            KeyCode::PageUp => {
                self.table.move_selection(-PAGE_SIZE);
                None
            }
            KeyCode::PageDown => {
                self.table.move_selection(PAGE_SIZE);
                None
            }
            KeyCode::Home => {
                self.table.select_first();
                None
            }
            KeyCode::End => {
                self.table.select_last();
                None
            }
            _ => None,
        };

        match action {
            Some(action) => self.run_action(action, exit),
            None => Ok(Mode::Normal),
        }
    }

    fn handle_menu(&mut self, code: KeyCode, mut state: MenuState, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::F(10) | KeyCode::Char('m') => Ok(Mode::Normal),
            KeyCode::Left => {
                state.move_menu(-1);
                Ok(Mode::Menu(state))
            }
            KeyCode::Right | KeyCode::Tab => {
                state.move_menu(1);
                Ok(Mode::Menu(state))
            }
            KeyCode::Up => {
                state.move_item(-1);
                Ok(Mode::Menu(state))
            }
            KeyCode::Down => {
                state.move_item(1);
                Ok(Mode::Menu(state))
            }
            KeyCode::Enter => self.run_action(state.action(), exit),
            _ => Ok(Mode::Menu(state)),
        }
    }

    /// Dispatch a command coming from either the menu bar or a shortcut.
    fn run_action(&mut self, action: MenuAction, exit: &mut bool) -> Result<Mode> {
        match action {
            MenuAction::Quit => {
                *exit = true;
                Ok(Mode::Normal)
            }
            MenuAction::AddStudent => {
                self.clear_status();
                Ok(Mode::AddingStudent(StudentForm::new(&self.courses)))
            }
            MenuAction::Refresh => {
                if self.reload_or_report(None) {
                    self.set_status(
                        format!("Loaded {} students.", self.record_count),
                        StatusKind::Info,
                    );
                }
                Ok(Mode::Normal)
            }
            MenuAction::Search => {
                self.clear_status();
                Ok(Mode::Searching(SearchForm::default()))
            }
            MenuAction::EditRecord => match self.table.current().cloned() {
                Some(student) => {
                    self.clear_status();
                    Ok(Mode::EditingStudent {
                        id: student.id,
                        form: StudentForm::from_student(&student),
                    })
                }
                None => {
                    self.set_status("No student selected to edit.", StatusKind::Error);
                    Ok(Mode::Normal)
                }
            },
            MenuAction::DeleteRecord => match self.table.current().cloned() {
                Some(student) => {
                    self.clear_status();
                    Ok(Mode::ConfirmDelete(ConfirmStudentDelete { student }))
                }
                None => {
                    self.set_status("No student selected to delete.", StatusKind::Error);
                    Ok(Mode::Normal)
                }
            },
            MenuAction::About => Ok(Mode::About),
        }
    }

    fn handle_add_student(&mut self, code: KeyCode, mut form: StudentForm) -> Result<Mode> {
        if code == KeyCode::Esc {
            self.set_status("Add student cancelled.", StatusKind::Info);
            return Ok(Mode::Normal);
        }
        if code == KeyCode::Enter {
            return match self.save_new_student(&form) {
                Ok(()) => Ok(Mode::Normal),
                Err(err) => {
                    self.report_form_error(&mut form, &err);
                    Ok(Mode::AddingStudent(form))
                }
            };
        }
        self.edit_form(code, &mut form);
        Ok(Mode::AddingStudent(form))
    }

    fn handle_edit_student(&mut self, code: KeyCode, id: i64, mut form: StudentForm) -> Result<Mode> {
        if code == KeyCode::Esc {
            self.set_status("Edit cancelled.", StatusKind::Info);
            return Ok(Mode::Normal);
        }
        if code == KeyCode::Enter {
            return match self.save_existing_student(id, &form) {
                Ok(()) => Ok(Mode::Normal),
                Err(err) => {
                    self.report_form_error(&mut form, &err);
                    Ok(Mode::EditingStudent { id, form })
                }
            };
        }
        self.edit_form(code, &mut form);
        Ok(Mode::EditingStudent { id, form })
    }

    /// Keys shared by the insert and edit dialogs.
    fn edit_form(&self, code: KeyCode, form: &mut StudentForm) {
        match code {
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Left if form.active == StudentField::Course => {
                form.cycle_course(&self.courses, -1)
            }
            KeyCode::Right | KeyCode::Char(' ') if form.active == StudentField::Course => {
                form.cycle_course(&self.courses, 1)
            }
            KeyCode::Backspace => form.backspace(),
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
    }

    fn report_form_error(&mut self, form: &mut StudentForm, err: &anyhow::Error) {
        let message = surface_error(err);
        warn!(error = %err, "student form rejected");
        form.error = Some(message.clone());
        self.set_status(message, StatusKind::Error);
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmStudentDelete) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.perform_delete(&confirm) {
                    Ok(()) => Ok(Mode::Normal),
                    Err(err) => {
                        warn!(error = %err, id = confirm.student.id, "delete failed");
                        self.set_status(surface_error(&err), StatusKind::Error);
                        Ok(Mode::ConfirmDelete(confirm))
                    }
                }
            }
            _ => Ok(Mode::ConfirmDelete(confirm)),
        }
    }

    fn handle_search(&mut self, code: KeyCode, mut form: SearchForm) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_status("Search cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter => {
                if form.query.trim().is_empty() {
                    form.error = Some("Enter a name to search for.".to_string());
                    return Ok(Mode::Searching(form));
                }
                match self.run_search(&form.query) {
                    Ok(true) => Ok(Mode::Normal),
                    Ok(false) => {
                        form.error = Some(format!("No students named \"{}\".", form.query.trim()));
                        Ok(Mode::Searching(form))
                    }
                    Err(err) => {
                        warn!(error = %err, "search failed");
                        let message = surface_error(&err);
                        form.error = Some(message.clone());
                        self.set_status(message, StatusKind::Error);
                        Ok(Mode::Searching(form))
                    }
                }
            }
            KeyCode::Backspace => {
                form.backspace();
                form.error = None;
                Ok(Mode::Searching(form))
            }
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
                Ok(Mode::Searching(form))
            }
            _ => Ok(Mode::Searching(form)),
        }
    }

    /// Reload from the database, then highlight the matches. Returns
    /// whether anything matched.
    fn run_search(&mut self, query: &str) -> Result<bool> {
        self.load_data(None)?;
        let matches = search_students(&self.conn, query)?;
        let count = self.table.highlight(matches.iter().map(|s| s.id));
        if count == 0 {
            self.set_status(
                format!("No students match \"{}\".", query.trim()),
                StatusKind::Error,
            );
            return Ok(false);
        }
        let noun = if count == 1 { "student" } else { "students" };
        self.set_status(
            format!("Found {count} {noun} matching \"{}\".", query.trim()),
            StatusKind::Info,
        );
        Ok(true)
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(MENU_BAR_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        let open_menu = match &self.mode {
            Mode::Menu(state) => Some(*state),
            _ => None,
        };
        self.draw_menu_bar(frame, chunks[0], open_menu);
        self.draw_table(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);

        match &self.mode {
            Mode::Normal => {}
            Mode::Menu(state) => self.draw_menu_dropdown(frame, area, state),
            Mode::AddingStudent(form) => self.draw_student_form(frame, area, "Add Student", form),
            Mode::EditingStudent { form, .. } => {
                self.draw_student_form(frame, area, "Update Student", form)
            }
            Mode::ConfirmDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::Searching(form) => self.draw_search(frame, area, form),
            Mode::About => self.draw_about(frame, area),
        }
    }

    fn draw_menu_bar(&self, frame: &mut Frame, area: Rect, open: Option<MenuState>) {
        let mut spans = Vec::with_capacity(MENUS.len() * 2);
        for (idx, menu) in MENUS.iter().enumerate() {
            let style = if open.map(|s| s.menu) == Some(idx) {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };
            spans.push(Span::styled(format!(" {} ", menu.title), style));
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(
            "(F10 menu)",
            Style::default().fg(Color::DarkGray),
        ));
        let bar = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
        frame.render_widget(bar, area);
    }

    fn draw_menu_dropdown(&self, frame: &mut Frame, area: Rect, state: &MenuState) {
        // Each title renders as " Title " followed by a spacer.
        let x = MENUS[..state.menu]
            .iter()
            .map(|menu| menu.title.len() as u16 + 3)
            .sum::<u16>();
        let menu = state.current();
        let width = menu
            .items
            .iter()
            .map(|(label, _)| label.len() as u16)
            .max()
            .unwrap_or(0)
            + 4;
        let height = menu.items.len() as u16 + 2;
        let popup_area = anchored_rect(area.x + x, area.y + MENU_BAR_HEIGHT, width, height, area);
        frame.render_widget(Clear, popup_area);

        let items: Vec<ListItem> = menu
            .items
            .iter()
            .map(|(label, _)| ListItem::new(Line::from(*label)))
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan));
        let mut list_state = ListState::default();
        list_state.select(Some(state.item));
        frame.render_stateful_widget(list, popup_area, &mut list_state);
    }

    fn draw_table(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().title(WINDOW_TITLE).borders(Borders::ALL);

        if self.table.students.is_empty() {
            let message = Paragraph::new("No students yet. Press 'a' to add one.")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let header = Row::new(TABLE_HEADERS).style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
        let highlight = Style::default().fg(Color::Black).bg(Color::Yellow);
        let rows = self.table.students.iter().map(|student| {
            let row = Row::new(vec![
                Cell::from(student.id.to_string()),
                Cell::from(student.name.clone()),
                Cell::from(student.course.clone()),
                Cell::from(student.mobile.clone()),
            ]);
            if self.table.is_highlighted(student.id) {
                row.style(highlight)
            } else {
                row
            }
        });
        let widths = [
            Constraint::Length(6),
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");

        let mut state = TableState::default().with_selected(self.table.selected);
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let count = Span::styled(
            format!("{} records  ", self.record_count),
            Style::default().fg(Color::Gray),
        );
        let status_line = match &self.status {
            Some(status) => Line::from(vec![
                count,
                Span::styled(status.text.clone(), status.kind.style()),
            ]),
            None => Line::from(count),
        };

        let instructions = self.footer_instructions();
        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let hint = |key: &'static str, label: &'static str| {
            [Span::styled(key, key_style), Span::raw(label)]
        };

        let spans: Vec<Span<'static>> = match &self.mode {
            Mode::Menu(_) => [
                hint("[←→]", " Menu   "),
                hint("[↑↓]", " Item   "),
                hint("[Enter]", " Select   "),
                hint("[Esc]", " Close"),
            ]
            .concat(),
            Mode::AddingStudent(_) | Mode::EditingStudent { .. } => [
                hint("[Tab]", " Next Field   "),
                hint("[←→]", " Course   "),
                hint("[Enter]", " Submit   "),
                hint("[Esc]", " Cancel"),
            ]
            .concat(),
            Mode::ConfirmDelete(_) => [hint("[y]", " Yes   "), hint("[n]", " No")].concat(),
            Mode::Searching(_) => [hint("[Enter]", " Search   "), hint("[Esc]", " Cancel")].concat(),
            Mode::About => hint("[any key]", " Close").to_vec(),
            Mode::Normal => {
                let mut spans = [
                    hint("[↑↓]", " Select   "),
                    hint("[a]", " Add Student   "),
                    hint("[f]", " Search   "),
                ]
                .concat();
                if self.table.current().is_some() {
                    spans.extend(hint("[e]", " Edit Record   "));
                    spans.extend(hint("[d]", " Delete Record   "));
                }
                spans.extend(hint("[F10]", " Menu   "));
                spans.extend(hint("[q]", " Quit"));
                spans
            }
        };
        Line::from(spans)
    }

    fn draw_student_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &StudentForm) {
        let popup_area = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            form.build_line("Name", StudentField::Name),
            form.build_line("Course", StudentField::Course),
            form.build_line("Mobile", StudentField::Mobile),
            Line::from(""),
        ];

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to submit • Tab to switch • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let (prefix, row) = match form.active {
            StudentField::Name => ("Name: ", 0),
            StudentField::Course => ("Course: < ", 1),
            StudentField::Mobile => ("Mobile: ", 2),
        };
        let cursor_x = inner.x + prefix.len() as u16 + form.value_len(form.active) as u16;
        frame.set_cursor_position((cursor_x, inner.y + row));
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmStudentDelete) {
        let popup_area = centered_rect(50, 25, area);
        frame.render_widget(Clear, popup_area);

        let lines = vec![
            Line::from("Are you sure you want to delete?"),
            Line::from(Span::styled(
                format!("#{} {}", confirm.student.id, confirm.student),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("[y] Yes   [n] No"),
        ];
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().title("Delete Student").borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);
    }

    fn draw_search(&self, frame: &mut Frame, area: Rect, form: &SearchForm) {
        let popup_area = centered_rect(50, 25, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Search Student").borders(Borders::ALL);
        let mut lines = vec![Line::from(format!("Name: {}", form.query)), Line::from("")];
        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        }
        let paragraph = Paragraph::new(lines).block(block.clone()).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);

        let inner = block.inner(popup_area);
        let cursor_x = inner.x + "Name: ".len() as u16 + form.query.chars().count() as u16;
        frame.set_cursor_position((cursor_x, inner.y));
    }

    fn draw_about(&self, frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup_area);
        let paragraph = Paragraph::new(ABOUT_TEXT)
            .block(Block::default().title("About").borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    fn save_new_student(&mut self, form: &StudentForm) -> Result<()> {
        let payload = form.parse_inputs()?;
        let student = create_student(&self.conn, &payload)?;
        self.set_status(format!("Added {}.", student.name), StatusKind::Info);
        self.reload_or_report(Some(student.id));
        Ok(())
    }

    fn save_existing_student(&mut self, id: i64, form: &StudentForm) -> Result<()> {
        let payload = form.parse_inputs()?;
        update_student(&self.conn, id, &payload)?;
        self.set_status(format!("Updated {}.", payload.name), StatusKind::Info);
        self.reload_or_report(Some(id));
        Ok(())
    }

    fn perform_delete(&mut self, confirm: &ConfirmStudentDelete) -> Result<()> {
        delete_student(&self.conn, confirm.student.id)?;
        self.set_status(
            format!("Deleted {}.", confirm.student.name),
            StatusKind::Info,
        );
        self.reload_or_report(None);
        Ok(())
    }

    /// Reload after a committed change. A failed reload goes to the status
    /// bar and never back into the dialog, so the mutation is not retried.
    fn reload_or_report(&mut self, focus_id: Option<i64>) -> bool {
        match self.load_data(focus_id) {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "failed to reload students");
                self.set_status(surface_error(&err), StatusKind::Error);
                false
            }
        }
    }

    /// Re-run the select and repaint from scratch.
    fn load_data(&mut self, focus_id: Option<i64>) -> Result<()> {
        let students = fetch_students(&self.conn)?;
        self.record_count = count_students(&self.conn)?;
        self.table.set_students(students, focus_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use super::*;
    use crate::db::{ensure_schema, fetch_student};
    use crate::models::NewStudent;

    fn courses() -> Vec<String> {
        ["Biology", "Math", "Astronomy", "Physics"]
            .iter()
            .map(|c| c.to_string())
            .collect()
    }

    fn seeded_app(names: &[&str]) -> App {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        for (idx, name) in names.iter().enumerate() {
            let student = NewStudent::new(name, "Math", &format!("555-010{idx}")).unwrap();
            create_student(&conn, &student).unwrap();
        }
        App::new(conn, courses()).unwrap()
    }

    fn press(app: &mut App, keys: &[KeyCode]) {
        for key in keys {
            assert!(!app.handle_key(*key).unwrap());
        }
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch)).unwrap();
        }
    }

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn initial_load_fills_table() {
        let app = seeded_app(&["John Smith", "Jane Doe"]);
        assert_eq!(app.students().len(), 2);
        assert_eq!(app.selected_student().map(|s| s.name.as_str()), Some("John Smith"));

        let screen = render(&app);
        assert!(screen.contains(WINDOW_TITLE));
        assert!(screen.contains("Mobile"));
        assert!(screen.contains("Jane Doe"));
        assert!(screen.contains("2 records"));
    }

    #[test]
    fn empty_table_shows_hint_and_hides_record_actions() {
        let app = seeded_app(&[]);
        let screen = render(&app);
        assert!(screen.contains("No students yet"));
        assert!(!screen.contains("Delete Record"));
    }

    #[test]
    fn add_student_through_dialog() {
        let mut app = seeded_app(&[]);
        press(&mut app, &[KeyCode::Char('a')]);
        type_text(&mut app, "Ada Lovelace");
        press(&mut app, &[KeyCode::Tab, KeyCode::Right, KeyCode::Tab]);
        type_text(&mut app, "555 1234");
        press(&mut app, &[KeyCode::Enter]);

        assert!(matches!(app.mode, Mode::Normal));
        let added = app.selected_student().cloned().unwrap();
        assert_eq!(added.name, "Ada Lovelace");
        assert_eq!(added.course, "Math");
        assert_eq!(added.mobile, "555 1234");
        assert_eq!(app.record_count, 1);
    }

    #[test]
    fn invalid_insert_keeps_dialog_open_with_error() {
        let mut app = seeded_app(&[]);
        press(&mut app, &[KeyCode::Char('a'), KeyCode::Enter]);

        match &app.mode {
            Mode::AddingStudent(form) => {
                assert_eq!(form.error.as_deref(), Some("Student name is required."))
            }
            _ => panic!("dialog should stay open"),
        }
        assert!(render(&app).contains("Student name is required."));

        press(&mut app, &[KeyCode::Esc]);
        assert!(matches!(app.mode, Mode::Normal));
        assert!(app.students().is_empty());
    }

    #[test]
    fn edit_selected_record() {
        let mut app = seeded_app(&["John", "Jane"]);
        press(&mut app, &[KeyCode::Down, KeyCode::Char('e')]);
        press(&mut app, &[KeyCode::Backspace; 4]);
        type_text(&mut app, "Janet");
        press(&mut app, &[KeyCode::Enter]);

        let id = app.selected_student().unwrap().id;
        let stored = fetch_student(&app.conn, id).unwrap().unwrap();
        assert_eq!(stored.name, "Janet");
        assert_eq!(app.selected_student().unwrap().name, "Janet");
    }

    #[test]
    fn edit_without_selection_reports_error() {
        let mut app = seeded_app(&[]);
        press(&mut app, &[KeyCode::Char('e')]);
        assert!(matches!(app.mode, Mode::Normal));
        assert!(render(&app).contains("No student selected to edit."));
    }

    #[test]
    fn delete_requires_confirmation() {
        let mut app = seeded_app(&["John", "Jane"]);
        press(&mut app, &[KeyCode::Char('d')]);
        assert!(render(&app).contains("Are you sure you want to delete?"));
        press(&mut app, &[KeyCode::Char('n')]);
        assert_eq!(app.students().len(), 2);

        press(&mut app, &[KeyCode::Delete, KeyCode::Char('y')]);
        let names: Vec<&str> = app.students().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Jane"]);
        assert_eq!(app.record_count, 1);
    }

    #[test]
    fn search_highlights_matches() {
        let mut app = seeded_app(&["John Smith", "Jane Doe", "Johnny Walker"]);
        press(&mut app, &[KeyCode::End, KeyCode::Char('f')]);
        type_text(&mut app, "john");
        press(&mut app, &[KeyCode::Enter]);

        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(app.table.highlighted.len(), 2);
        assert_eq!(app.selected_student().unwrap().name, "John Smith");
        assert!(render(&app).contains("Found 2 students"));

        press(&mut app, &[KeyCode::Esc]);
        assert!(app.table.highlighted.is_empty());
    }

    #[test]
    fn search_without_match_stays_open() {
        let mut app = seeded_app(&["John"]);
        press(&mut app, &[KeyCode::Char('/')]);
        type_text(&mut app, "zed");
        press(&mut app, &[KeyCode::Enter]);

        match &app.mode {
            Mode::Searching(form) => assert!(form.error.is_some()),
            _ => panic!("search dialog should stay open"),
        }
        assert!(app.table.highlighted.is_empty());
    }

    #[test]
    fn menu_navigation_runs_actions() {
        let mut app = seeded_app(&["John"]);
        press(&mut app, &[KeyCode::F(10), KeyCode::Left, KeyCode::Enter]);
        assert!(matches!(app.mode, Mode::About));
        assert!(render(&app).contains("About"));
        press(&mut app, &[KeyCode::Char('x')]);
        assert!(matches!(app.mode, Mode::Normal));

        press(&mut app, &[KeyCode::F(10), KeyCode::Right, KeyCode::Down, KeyCode::Enter]);
        assert!(matches!(app.mode, Mode::EditingStudent { .. }));
    }

    #[test]
    fn quit_from_menu_and_shortcut() {
        let mut app = seeded_app(&[]);
        press(&mut app, &[KeyCode::F(10), KeyCode::Up]);
        assert!(app.handle_key(KeyCode::Enter).unwrap());

        let mut app = seeded_app(&[]);
        assert!(app.handle_key(KeyCode::Char('q')).unwrap());
    }

    #[test]
    fn refresh_picks_up_external_changes() {
        let mut app = seeded_app(&["John"]);
        let student = NewStudent::new("Late Arrival", "Physics", "1").unwrap();
        create_student(&app.conn, &student).unwrap();
        assert_eq!(app.students().len(), 1);

        press(&mut app, &[KeyCode::Char('r')]);
        assert_eq!(app.students().len(), 2);
        assert!(render(&app).contains("Loaded 2 students."));
    }

    #[test]
    fn failed_refresh_is_reported_not_propagated() {
        let mut app = seeded_app(&["John"]);
        app.conn.execute("DROP TABLE students", []).unwrap();

        assert!(!app.handle_key(KeyCode::Char('r')).unwrap());
        assert!(matches!(app.mode, Mode::Normal));
        let status = app.status.as_ref().unwrap();
        assert!(matches!(status.kind, StatusKind::Error));
        assert!(status.text.contains("no such table"));
    }

    #[test]
    fn failed_reload_after_insert_closes_dialog() {
        let mut app = seeded_app(&[]);
        // Store a blob in the text column so reading rows back fails.
        app.conn
            .execute_batch(
                "CREATE TEMP TRIGGER corrupt_mobile AFTER INSERT ON students
                 BEGIN UPDATE students SET mobile = x'00ff' WHERE id = NEW.id; END;",
            )
            .unwrap();

        press(&mut app, &[KeyCode::Char('a')]);
        type_text(&mut app, "Ada");
        press(&mut app, &[KeyCode::Tab, KeyCode::Tab]);
        type_text(&mut app, "555");
        press(&mut app, &[KeyCode::Enter]);

        assert!(matches!(app.mode, Mode::Normal));
        assert!(matches!(
            app.status.as_ref().map(|s| &s.kind),
            Some(StatusKind::Error)
        ));

        press(&mut app, &[KeyCode::Enter]);
        assert_eq!(count_students(&app.conn).unwrap(), 1);
    }

    #[test]
    fn failed_reload_after_delete_closes_dialog() {
        let mut app = seeded_app(&["John", "Jane"]);
        let jane = app.students()[1].id;
        app.conn
            .execute(
                "UPDATE students SET mobile = x'00ff' WHERE id = ?1",
                [jane],
            )
            .unwrap();

        press(&mut app, &[KeyCode::Char('d'), KeyCode::Char('y')]);

        assert!(matches!(app.mode, Mode::Normal));
        assert!(matches!(
            app.status.as_ref().map(|s| &s.kind),
            Some(StatusKind::Error)
        ));
        assert_eq!(count_students(&app.conn).unwrap(), 1);
    }
}
