use std::collections::HashSet;

use crate::models::Student;

/// Rows shown in the main table plus the selection and search highlights.
#[derive(Default, Debug)]
pub(crate) struct StudentTable {
    pub(crate) students: Vec<Student>,
    pub(crate) selected: Option<usize>,
    pub(crate) highlighted: HashSet<i64>,
}

impl StudentTable {
    pub(crate) fn new(students: Vec<Student>) -> Self {
        let mut table = Self::default();
        table.set_students(students, None);
        table
    }

    /// Replace the rows after a reload. Selection follows `focus_id` when
    /// given, otherwise stays on the same record if it still exists, and is
    /// clamped to the table otherwise. Search highlights are dropped.
    pub(crate) fn set_students(&mut self, students: Vec<Student>, focus_id: Option<i64>) {
        let previous_id = self.current().map(|s| s.id);
        let previous_idx = self.selected;
        self.students = students;
        self.highlighted.clear();

        if self.students.is_empty() {
            self.selected = None;
            return;
        }

        let target = focus_id.or(previous_id);
        if let Some(idx) = target.and_then(|id| self.position_of(id)) {
            self.selected = Some(idx);
            return;
        }

        let last = self.students.len() - 1;
        self.selected = Some(previous_idx.unwrap_or(0).min(last));
    }

    pub(crate) fn current(&self) -> Option<&Student> {
        self.selected.and_then(|idx| self.students.get(idx))
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.students.is_empty() {
            return;
        }
        let last = self.students.len() as isize - 1;
        let base = self.selected.map(|idx| idx as isize).unwrap_or(-1);
        let new = (base + offset).clamp(0, last);
        self.selected = Some(new as usize);
    }

    pub(crate) fn select_first(&mut self) {
        if !self.students.is_empty() {
            self.selected = Some(0);
        }
    }

    pub(crate) fn select_last(&mut self) {
        if !self.students.is_empty() {
            self.selected = Some(self.students.len() - 1);
        }
    }

    /// Mark search matches and jump the selection to the first of them.
    /// Returns how many of the ids are present in the table.
    pub(crate) fn highlight(&mut self, ids: impl IntoIterator<Item = i64>) -> usize {
        self.highlighted = ids
            .into_iter()
            .filter(|id| self.position_of(*id).is_some())
            .collect();

        if let Some(first) = self
            .students
            .iter()
            .position(|s| self.highlighted.contains(&s.id))
        {
            self.selected = Some(first);
        }
        self.highlighted.len()
    }

    /// Returns whether anything was highlighted.
    pub(crate) fn clear_highlights(&mut self) -> bool {
        let had_any = !self.highlighted.is_empty();
        self.highlighted.clear();
        had_any
    }

    pub(crate) fn is_highlighted(&self, id: i64) -> bool {
        self.highlighted.contains(&id)
    }

    fn position_of(&self, id: i64) -> Option<usize> {
        self.students.iter().position(|s| s.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(id: i64, name: &str) -> Student {
        Student {
            id,
            name: name.to_string(),
            course: "Math".to_string(),
            mobile: "555".to_string(),
        }
    }

    fn roster() -> Vec<Student> {
        vec![student(1, "Ann"), student(2, "Ben"), student(5, "Cat")]
    }

    #[test]
    fn new_table_selects_first_row() {
        let table = StudentTable::new(roster());
        assert_eq!(table.current().map(|s| s.id), Some(1));
        assert_eq!(StudentTable::new(Vec::new()).selected, None);
    }

    #[test]
    fn movement_is_clamped() {
        let mut table = StudentTable::new(roster());
        table.move_selection(-3);
        assert_eq!(table.selected, Some(0));
        table.move_selection(10);
        assert_eq!(table.selected, Some(2));
        table.select_first();
        assert_eq!(table.selected, Some(0));
        table.select_last();
        assert_eq!(table.current().map(|s| s.id), Some(5));
    }

    #[test]
    fn reload_keeps_selection_on_same_record() {
        let mut table = StudentTable::new(roster());
        table.move_selection(1);
        let mut reloaded = vec![student(0, "Zed")];
        reloaded.extend(roster());
        table.set_students(reloaded, None);
        assert_eq!(table.current().map(|s| s.id), Some(2));
    }

    #[test]
    fn reload_after_delete_clamps_selection() {
        let mut table = StudentTable::new(roster());
        table.select_last();
        table.set_students(vec![student(1, "Ann"), student(2, "Ben")], None);
        assert_eq!(table.current().map(|s| s.id), Some(2));

        table.set_students(Vec::new(), None);
        assert_eq!(table.selected, None);
        assert!(table.current().is_none());
    }

    #[test]
    fn focus_id_wins_over_previous_selection() {
        let mut table = StudentTable::new(roster());
        table.set_students(roster(), Some(5));
        assert_eq!(table.selected, Some(2));
    }

    #[test]
    fn highlight_selects_first_match_and_ignores_unknown_ids() {
        let mut table = StudentTable::new(roster());
        let count = table.highlight([5, 2, 99]);
        assert_eq!(count, 2);
        assert_eq!(table.current().map(|s| s.id), Some(2));
        assert!(table.is_highlighted(5));
        assert!(!table.is_highlighted(1));

        assert!(table.clear_highlights());
        assert!(!table.clear_highlights());
    }

    #[test]
    fn reload_drops_highlights() {
        let mut table = StudentTable::new(roster());
        table.highlight([1]);
        table.set_students(roster(), None);
        assert!(table.highlighted.is_empty());
    }
}
