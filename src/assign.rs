use std::collections::BTreeSet;

use crate::model::{Assignment, EntityId, Student, Subject};
use crate::store::AssignmentMap;

/// Draft selection of the "assign students to subject" dialog.
///
/// `select_all` is the checkbox's own state. Toggling single students never
/// re-derives it; only [`AssignDialog::toggle_select_all`] flips it.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignDialog {
    pub subject: Subject,
    selected: BTreeSet<EntityId>,
    select_all: bool,
}

impl AssignDialog {
    /// Seeds the selection from the last known assignment of the subject.
    pub fn open(subject: Subject, assignments: &AssignmentMap) -> Self {
        let selected = assignments.assigned(subject.id);
        Self { subject, selected, select_all: false }
    }

    pub fn is_selected(&self, student_id: EntityId) -> bool {
        self.selected.contains(&student_id)
    }

    pub fn select_all_checked(&self) -> bool {
        self.select_all
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn toggle_student(&mut self, student_id: EntityId) {
        if !self.selected.remove(&student_id) {
            self.selected.insert(student_id);
        }
    }

    /// Clears the selection when the box is checked and every loaded student
    /// is still selected, otherwise selects them all and checks the box.
    pub fn toggle_select_all(&mut self, students: &[Student]) {
        let all_selected =
            !students.is_empty() && students.iter().all(|student| self.selected.contains(&student.id));
        if self.select_all && all_selected {
            self.selected.clear();
            self.select_all = false;
        } else {
            self.selected = students.iter().map(|student| student.id).collect();
            self.select_all = true;
        }
    }

    /// Full target set submitted to the assign endpoint.
    pub fn assignment(&self) -> Assignment {
        Assignment {
            subject_id: self.subject.id,
            student_ids: self.selected.iter().copied().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn students(n: EntityId) -> Vec<Student> {
        (1..=n)
            .map(|id| Student {
                id,
                first_name: format!("S{id}"),
                last_name: "Doe".into(),
                email: String::new(),
            })
            .collect()
    }

    fn math() -> Subject {
        Subject { id: 10, name: "Math".into(), students: None }
    }

    #[test]
    fn opens_empty_for_unassigned_subject() {
        let dialog = AssignDialog::open(math(), &AssignmentMap::default());
        assert_eq!(dialog.selected_count(), 0);
        assert!(!dialog.select_all_checked());
    }

    #[test]
    fn reopening_pre_checks_last_assignment() {
        let mut map = AssignmentMap::default();
        let mut dialog = AssignDialog::open(math(), &map);
        dialog.toggle_student(1);
        let submitted = dialog.assignment();
        assert_eq!(submitted.student_ids, vec![1]);
        map.replace(submitted.subject_id, submitted.student_ids);

        let reopened = AssignDialog::open(math(), &map);
        assert!(reopened.is_selected(1));
        assert!(!reopened.is_selected(2));
        assert_eq!(reopened.selected_count(), 1);
    }

    #[test]
    fn select_all_then_deselect_one() {
        let roster = students(4);
        let mut dialog = AssignDialog::open(math(), &AssignmentMap::default());
        dialog.toggle_select_all(&roster);
        assert_eq!(dialog.selected_count(), 4);

        dialog.toggle_student(2);
        assert_eq!(dialog.selected_count(), 3);
        // checkbox state is not re-derived from the selection
        assert!(dialog.select_all_checked());

        dialog.toggle_select_all(&roster);
        assert_eq!(dialog.selected_count(), 4);

        dialog.toggle_select_all(&roster);
        assert_eq!(dialog.selected_count(), 0);
        assert!(!dialog.select_all_checked());
    }

    #[test]
    fn select_all_on_fully_assigned_subject_checks_the_box() {
        let roster = students(2);
        let mut map = AssignmentMap::default();
        map.replace(10, [1, 2]);
        let mut dialog = AssignDialog::open(math(), &map);
        assert_eq!(dialog.selected_count(), 2);
        assert!(!dialog.select_all_checked());

        dialog.toggle_select_all(&roster);
        assert_eq!(dialog.selected_count(), 2);
        assert!(dialog.select_all_checked());

        dialog.toggle_select_all(&roster);
        assert_eq!(dialog.selected_count(), 0);
        assert!(!dialog.select_all_checked());
    }

    #[test]
    fn select_all_with_no_students_selects_nothing() {
        let mut dialog = AssignDialog::open(math(), &AssignmentMap::default());
        dialog.toggle_select_all(&[]);
        assert_eq!(dialog.selected_count(), 0);
        assert!(dialog.select_all_checked());
    }
}
