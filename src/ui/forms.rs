use anyhow::Result;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{NewStudent, Student};

/// Field state behind the insert and edit dialogs.
#[derive(Default, Clone, Debug)]
pub(crate) struct StudentForm {
    pub(crate) name: String,
    pub(crate) course: String,
    pub(crate) mobile: String,
    pub(crate) active: StudentField,
    pub(crate) error: Option<String>,
}

/// Fields available within the student form.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub(crate) enum StudentField {
    #[default]
    Name,
    Course,
    Mobile,
}

impl StudentForm {
    /// Blank form with the first configured course preselected.
    pub(crate) fn new(courses: &[String]) -> Self {
        Self {
            course: courses.first().cloned().unwrap_or_default(),
            ..Self::default()
        }
    }

    /// Populate the form from an existing record when editing.
    pub(crate) fn from_student(student: &Student) -> Self {
        Self {
            name: student.name.clone(),
            course: student.course.clone(),
            mobile: student.mobile.clone(),
            active: StudentField::Name,
            error: None,
        }
    }

    /// Cycle focus forward across the three fields.
    pub(crate) fn next_field(&mut self) {
        self.active = match self.active {
            StudentField::Name => StudentField::Course,
            StudentField::Course => StudentField::Mobile,
            StudentField::Mobile => StudentField::Name,
        };
    }

    pub(crate) fn previous_field(&mut self) {
        self.active = match self.active {
            StudentField::Name => StudentField::Mobile,
            StudentField::Course => StudentField::Name,
            StudentField::Mobile => StudentField::Course,
        };
    }

    /// Append a character to the active text field. The course field is a
    /// choice list and ignores typed input.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            StudentField::Name => self.name.push(ch),
            StudentField::Mobile => self.mobile.push(ch),
            StudentField::Course => return false,
        }
        true
    }

    pub(crate) fn backspace(&mut self) {
        match self.active {
            StudentField::Name => {
                self.name.pop();
            }
            StudentField::Mobile => {
                self.mobile.pop();
            }
            StudentField::Course => {}
        }
    }

    /// Step through the course list. A course that is no longer configured
    /// (kept from an older record) moves to the first or last entry.
    pub(crate) fn cycle_course(&mut self, courses: &[String], delta: isize) {
        if courses.is_empty() {
            return;
        }
        let len = courses.len() as isize;
        let next = match courses.iter().position(|c| c == &self.course) {
            Some(idx) => (idx as isize + delta).rem_euclid(len),
            None if delta < 0 => len - 1,
            None => 0,
        };
        self.course = courses[next as usize].clone();
    }

    /// Validate the inputs and return a payload ready for persistence.
    pub(crate) fn parse_inputs(&self) -> Result<NewStudent> {
        Ok(NewStudent::new(&self.name, &self.course, &self.mobile)?)
    }

    /// Render a single line for the dialog.
    pub(crate) fn build_line(&self, field_name: &str, field: StudentField) -> Line<'static> {
        let value = self.value(field);
        let is_active = self.active == field;

        let display = match field {
            StudentField::Course => format!("< {} >", value),
            _ if value.is_empty() => "<required>".to_string(),
            _ => value.to_string(),
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{field_name}: ")),
            Span::styled(display, style),
        ])
    }

    /// Character count for the requested field, used for cursor placement.
    pub(crate) fn value_len(&self, field: StudentField) -> usize {
        self.value(field).chars().count()
    }

    fn value(&self, field: StudentField) -> &str {
        match field {
            StudentField::Name => &self.name,
            StudentField::Course => &self.course,
            StudentField::Mobile => &self.mobile,
        }
    }
}

/// State for confirming the removal of the selected record.
#[derive(Clone, Debug)]
pub(crate) struct ConfirmStudentDelete {
    pub(crate) student: Student,
}

/// Query typed into the search dialog.
#[derive(Default, Clone, Debug)]
pub(crate) struct SearchForm {
    pub(crate) query: String,
    pub(crate) error: Option<String>,
}

impl SearchForm {
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            false
        } else {
            self.query.push(ch);
            true
        }
    }

    pub(crate) fn backspace(&mut self) {
        self.query.pop();
    }
}
