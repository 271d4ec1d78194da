use std::time::Instant;

use crate::error::ApiError;
use crate::model::{Assignment, EntityId, Grade, Student, Subject};
use crate::router::Section;

#[derive(Debug, Clone)]
pub enum Message {
    // Session
    AuthEmailChanged(String),
    AuthPasswordChanged(String),
    ToggleAuthMode,
    SubmitAuth,
    AuthFinished(Result<String, ApiError>),
    Logout,
    AlertDismissed,
    // Navigation
    SelectSection(Section),
    Frame(Instant),
    // Fetches
    StudentsLoaded(Result<Vec<Student>, ApiError>),
    SubjectsLoaded(Result<Vec<Subject>, ApiError>),
    GradesLoaded(Result<Vec<Grade>, ApiError>),
    // Students
    OpenAddStudent,
    OpenEditStudent(Student),
    ConfirmDeleteStudent(Student),
    CloseStudentModal,
    StudentFirstNameChanged(String),
    StudentLastNameChanged(String),
    StudentEmailChanged(String),
    SubmitStudent,
    DeleteStudent,
    StudentCreated(Result<Student, ApiError>),
    StudentUpdated(Result<Student, ApiError>),
    StudentDeleted(Result<EntityId, ApiError>),
    // Subjects
    OpenAddSubject,
    OpenEditSubject(Subject),
    ConfirmDeleteSubject(Subject),
    ToggleSubjectOptions(EntityId),
    CloseSubjectModal,
    SubjectNameChanged(String),
    SubmitSubject,
    DeleteSubject,
    SubjectCreated(Result<Subject, ApiError>),
    SubjectUpdated(Result<Subject, ApiError>),
    SubjectDeleted(Result<EntityId, ApiError>),
    // Assignment dialog
    OpenAssign(Subject),
    ToggleAssignStudent(EntityId),
    ToggleSelectAll,
    SubmitAssign,
    SubjectAssigned(Result<Assignment, ApiError>),
    // Grades
    ToggleGradesView,
    NextSubject,
    PrevSubject,
    EditGrade { student_id: EntityId, subject_id: EntityId },
    GradeValueChanged(String),
    SaveGrade,
    RemoveGrade,
    CloseGradeEditor,
    GradeCreated(Result<Grade, ApiError>),
    GradeUpdated(Result<Grade, ApiError>),
    GradeUpserted(Result<Grade, ApiError>),
    GradeRemoved(Result<EntityId, ApiError>),
}
