//! In-memory cache of the three entity collections plus the assignment map.
//!
//! Collections are only patched after the remote store confirmed a mutation.
//! A fetch replaces a collection wholesale; create, update and delete patch
//! one record. After every patch each live id appears exactly once.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{EntityId, Grade, GradeUpdate, NewGrade, Record, Student, Subject};

#[derive(Debug, Clone)]
pub struct EntityStore<T: Record> {
    items: Vec<T>,
    loaded: bool,
}

impl<T: Record> Default for EntityStore<T> {
    fn default() -> Self {
        Self { items: Vec::new(), loaded: false }
    }
}

impl<T: Record> EntityStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.items.iter().map(Record::id).collect()
    }

    /// Full-collection fetch result: no merge with what was there.
    pub fn replace_all(&mut self, items: Vec<T>) {
        self.items = items;
        self.loaded = true;
    }

    /// Appends a server-created record. A record whose id is already present
    /// replaces it instead, so a replayed response cannot duplicate an id.
    pub fn insert_created(&mut self, record: T) {
        match self.position(record.id()) {
            Some(index) => self.items[index] = record,
            None => self.items.push(record),
        }
    }

    /// Replaces the record with the same id. Returns false when the id is not
    /// cached (for example it was deleted while the update was in flight).
    pub fn apply_updated(&mut self, record: T) -> bool {
        match self.position(record.id()) {
            Some(index) => {
                self.items[index] = record;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: EntityId) -> Option<T> {
        self.position(id).map(|index| self.items.remove(index))
    }

    fn position(&self, id: EntityId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }
}

impl EntityStore<Grade> {
    /// "The" grade of a pair is the first match.
    pub fn find_for(&self, student_id: EntityId, subject_id: EntityId) -> Option<&Grade> {
        self.items.iter().find(|grade| grade.matches(student_id, subject_id))
    }

    /// Merges the answer of an idempotent upsert: by id, then by pair, else append.
    pub fn upsert(&mut self, grade: Grade) {
        if let Some(index) = self.position(grade.id) {
            self.items[index] = grade;
        } else if let Some(index) = self
            .items
            .iter()
            .position(|g| g.matches(grade.student_id, grade.subject_id))
        {
            self.items[index] = grade;
        } else {
            self.items.push(grade);
        }
    }
}

/// Which students are assigned to which subject.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignmentMap {
    by_subject: BTreeMap<EntityId, BTreeSet<EntityId>>,
}

impl AssignmentMap {
    pub fn assigned(&self, subject_id: EntityId) -> BTreeSet<EntityId> {
        self.by_subject.get(&subject_id).cloned().unwrap_or_default()
    }

    pub fn is_assigned(&self, subject_id: EntityId, student_id: EntityId) -> bool {
        self.by_subject
            .get(&subject_id)
            .is_some_and(|students| students.contains(&student_id))
    }

    /// Replaces the entry wholesale with the set the server accepted.
    pub fn replace(&mut self, subject_id: EntityId, student_ids: impl IntoIterator<Item = EntityId>) {
        self.by_subject.insert(subject_id, student_ids.into_iter().collect());
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GradeSave {
    Create(NewGrade),
    Update(GradeUpdate),
    Upsert(NewGrade),
}

/// The single shared cache every section reads from.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub students: EntityStore<Student>,
    pub subjects: EntityStore<Subject>,
    pub grades: EntityStore<Grade>,
    pub assignments: AssignmentMap,
}

impl Catalog {
    /// Installs a subjects fetch and seeds assignments from any embedded
    /// student lists the server sent along.
    pub fn replace_subjects(&mut self, subjects: Vec<Subject>) {
        for subject in &subjects {
            if let Some(students) = &subject.students {
                self.assignments
                    .replace(subject.id, students.iter().map(|student| student.id));
            }
        }
        self.subjects.replace_all(subjects);
    }

    pub fn grade_for(&self, student_id: EntityId, subject_id: EntityId) -> Option<&Grade> {
        self.grades.find_for(student_id, subject_id)
    }

    /// Remote call a grade save turns into. With `upsert` the server matches
    /// the pair itself; otherwise the cached grade for the pair decides.
    pub fn plan_grade_save(&self, upsert: bool, grade: NewGrade) -> GradeSave {
        if upsert {
            return GradeSave::Upsert(grade);
        }
        match self.grade_for(grade.student_id, grade.subject_id) {
            Some(existing) => GradeSave::Update(GradeUpdate { id: existing.id, value: grade.value }),
            None => GradeSave::Create(grade),
        }
    }

    /// Students shown under a subject in the grades view: those with a grade
    /// for it, plus those assigned to it, in student-list order.
    pub fn students_for_subject(&self, subject_id: EntityId) -> Vec<&Student> {
        self.students
            .iter()
            .filter(|student| {
                self.grades.find_for(student.id, subject_id).is_some()
                    || self.assignments.is_assigned(subject_id, student.id)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(id: EntityId, first: &str) -> Student {
        Student {
            id,
            first_name: first.to_string(),
            last_name: "Doe".to_string(),
            email: format!("{first}@school.test"),
        }
    }

    fn grade(id: EntityId, student_id: EntityId, subject_id: EntityId, value: f64) -> Grade {
        Grade { id, student_id, subject_id, grade: value }
    }

    fn assert_unique_ids<T: Record>(store: &EntityStore<T>) {
        let ids: BTreeSet<_> = store.ids().into_iter().collect();
        assert_eq!(ids.len(), store.len(), "duplicate ids in {:?}", store.ids());
    }

    #[test]
    fn fetch_replaces_wholesale() {
        let mut store = EntityStore::new();
        assert!(!store.is_loaded());
        store.replace_all(vec![student(1, "A"), student(2, "B")]);
        store.replace_all(vec![student(3, "C")]);
        assert!(store.is_loaded());
        assert_eq!(store.ids(), vec![3]);
    }

    #[test]
    fn crud_sequence_keeps_one_record_per_live_id() {
        let mut store = EntityStore::new();
        store.replace_all(vec![student(1, "A")]);

        store.insert_created(student(2, "B"));
        assert_unique_ids(&store);

        assert!(store.apply_updated(Student { first_name: "Bee".into(), ..student(2, "B") }));
        assert_unique_ids(&store);
        assert_eq!(store.get(2).unwrap().first_name, "Bee");
        assert_eq!(store.len(), 2);

        // a replayed create for an id already present replaces it
        store.insert_created(student(2, "B2"));
        assert_unique_ids(&store);
        assert_eq!(store.get(2).unwrap().first_name, "B2");

        assert!(store.remove(1).is_some());
        assert_eq!(store.ids(), vec![2]);
        assert!(store.remove(1).is_none());
    }

    #[test]
    fn update_of_unknown_id_changes_nothing() {
        let mut store = EntityStore::new();
        store.replace_all(vec![student(1, "A")]);
        assert!(!store.apply_updated(student(9, "Z")));
        assert_eq!(store.ids(), vec![1]);
    }

    #[test]
    fn grade_lookup_takes_first_match() {
        let mut grades = EntityStore::new();
        grades.replace_all(vec![grade(5, 1, 10, 3.0), grade(6, 1, 10, 4.0)]);
        assert_eq!(grades.find_for(1, 10).map(|g| g.id), Some(5));
        assert!(grades.find_for(2, 10).is_none());
    }

    #[test]
    fn upsert_matches_by_id_then_by_pair() {
        let mut grades = EntityStore::new();
        grades.replace_all(vec![grade(5, 1, 10, 3.0)]);

        grades.upsert(grade(5, 1, 10, 3.5));
        assert_eq!(grades.len(), 1);

        // server re-keyed the pair
        grades.upsert(grade(8, 1, 10, 4.0));
        assert_eq!(grades.ids(), vec![8]);

        grades.upsert(grade(9, 2, 10, 2.0));
        assert_eq!(grades.ids(), vec![8, 9]);
    }

    #[test]
    fn deleting_a_student_leaves_its_grades_dangling() {
        let mut catalog = Catalog::default();
        catalog.students.replace_all(vec![student(1, "A"), student(2, "B")]);
        catalog.grades.replace_all(vec![grade(5, 1, 10, 3.0)]);

        catalog.students.remove(1);

        let dangling = catalog.grade_for(1, 10).expect("grade survives");
        assert_eq!(dangling.student_id, 1);
        assert!(catalog.students.get(1).is_none());
    }

    #[test]
    fn assignment_entry_is_replaced_not_merged() {
        let mut map = AssignmentMap::default();
        assert!(map.assigned(10).is_empty());
        map.replace(10, [1, 2]);
        map.replace(10, [3]);
        assert_eq!(map.assigned(10), BTreeSet::from([3]));
        assert!(!map.is_assigned(10, 1));
    }

    #[test]
    fn subjects_fetch_seeds_assignments_from_embedded_students() {
        let mut catalog = Catalog::default();
        catalog.assignments.replace(11, [7]);
        catalog.replace_subjects(vec![
            Subject { id: 10, name: "Math".into(), students: Some(vec![student(1, "A")]) },
            Subject { id: 11, name: "Art".into(), students: None },
        ]);
        assert_eq!(catalog.assignments.assigned(10), BTreeSet::from([1]));
        // no embedded list: last known assignment stays
        assert_eq!(catalog.assignments.assigned(11), BTreeSet::from([7]));
    }

    #[test]
    fn grades_view_rows_include_graded_and_assigned_students() {
        let mut catalog = Catalog::default();
        catalog
            .students
            .replace_all(vec![student(1, "A"), student(2, "B"), student(3, "C")]);
        catalog.grades.replace_all(vec![grade(5, 3, 10, 4.0)]);
        catalog.assignments.replace(10, [1]);

        let ids: Vec<_> = catalog.students_for_subject(10).iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(catalog.students_for_subject(11).is_empty());
    }

    #[test]
    fn grade_save_creates_then_updates_by_id() {
        let mut catalog = Catalog::default();
        let first = NewGrade { value: 4.0, student_id: 1, subject_id: 10 };
        assert_eq!(catalog.plan_grade_save(false, first.clone()), GradeSave::Create(first));

        catalog.grades.insert_created(grade(7, 1, 10, 4.0));
        let again = NewGrade { value: 5.0, student_id: 1, subject_id: 10 };
        assert_eq!(catalog.plan_grade_save(false, again), GradeSave::Update(GradeUpdate { id: 7, value: 5.0 }));

        let other_pair = NewGrade { value: 3.0, student_id: 2, subject_id: 10 };
        assert_eq!(catalog.plan_grade_save(false, other_pair.clone()), GradeSave::Create(other_pair));
    }

    #[test]
    fn grade_save_prefers_upsert_when_available() {
        let mut catalog = Catalog::default();
        catalog.grades.insert_created(grade(7, 1, 10, 4.0));
        let value = NewGrade { value: 5.0, student_id: 1, subject_id: 10 };
        assert_eq!(catalog.plan_grade_save(true, value.clone()), GradeSave::Upsert(value));
    }
}
