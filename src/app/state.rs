use std::time::Instant;

use iced::{Task, Theme};

use crate::api::ApiClient;
use crate::assign::AssignDialog;
use crate::config::Config;
use crate::model::{EntityId, Grade, NewStudent, Student, Subject};
use crate::router::{Section, SectionRouter};
use crate::session::{CookieJar, CredentialStore, SessionGuard};
use crate::store::Catalog;

use super::Message;

pub const APP_TITLE: &str = "School Records";

pub struct App {
    pub config: Config,
    pub theme: Theme,
    pub api: ApiClient,
    pub session: SessionGuard,
    //
    pub auth_email: String,
    pub auth_password: String,
    pub auth_error: Option<String>,
    pub auth_pending: bool,
    //
    pub router: SectionRouter,
    pub now: Instant,
    //
    pub catalog: Catalog,
    pub page: Page,
}

impl App {
    /// Startup: restores the session from the cookie file. No section is
    /// selected yet, so nothing is fetched.
    pub fn new(config: Config, api: ApiClient) -> (Self, Task<Message>) {
        let jar = CookieJar::new(&config.cookie_file, &config.cookie_name);
        (Self::with_parts(config, api, Box::new(jar)), Task::none())
    }

    pub fn with_parts(config: Config, api: ApiClient, credentials: Box<dyn CredentialStore>) -> Self {
        Self {
            theme: config.theme(),
            router: SectionRouter::new(config.section_transition()),
            session: SessionGuard::restore(credentials),
            api,
            config,
            auth_email: String::new(),
            auth_password: String::new(),
            auth_error: None,
            auth_pending: false,
            now: Instant::now(),
            catalog: Catalog::default(),
            page: Page::None,
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme.clone()
    }

    pub fn students_page(&mut self) -> Option<&mut StudentsPage> {
        match &mut self.page {
            Page::Students(page) => Some(page),
            _ => None,
        }
    }

    pub fn subjects_page(&mut self) -> Option<&mut SubjectsPage> {
        match &mut self.page {
            Page::Subjects(page) => Some(page),
            _ => None,
        }
    }

    pub fn grades_page(&mut self) -> Option<&mut GradesPage> {
        match &mut self.page {
            Page::Grades(page) => Some(page),
            _ => None,
        }
    }
}

/// Local state of the mounted section. Dropped on unmount, which discards
/// any open modal and draft field.
#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    None,
    Home,
    Students(StudentsPage),
    Subjects(SubjectsPage),
    Grades(GradesPage),
}

impl Page {
    pub fn mount(section: Section) -> Self {
        match section {
            Section::Home => Page::Home,
            Section::Students => Page::Students(StudentsPage::default()),
            Section::Subjects => Page::Subjects(SubjectsPage::default()),
            Section::Grades => Page::Grades(GradesPage::default()),
        }
    }
}

// --- students ---

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl StudentForm {
    pub fn from_student(student: &Student) -> Self {
        Self {
            first_name: student.first_name.clone(),
            last_name: student.last_name.clone(),
            email: student.email.clone(),
        }
    }

    pub fn is_complete(&self) -> bool {
        [&self.first_name, &self.last_name, &self.email]
            .iter()
            .all(|field| !field.trim().is_empty())
    }

    pub fn to_new(&self) -> NewStudent {
        NewStudent {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
        }
    }

    pub fn to_student(&self, id: EntityId) -> Student {
        Student {
            id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StudentModal {
    Add,
    Edit(Student),
    Delete(Student),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentsPage {
    pub modal: Option<StudentModal>,
    pub form: StudentForm,
}

impl StudentsPage {
    pub fn close_modal(&mut self) {
        self.modal = None;
        self.form = StudentForm::default();
    }
}

// --- subjects ---

#[derive(Debug, Clone, PartialEq)]
pub enum SubjectModal {
    Add,
    Edit(Subject),
    Delete(Subject),
    Assign(AssignDialog),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubjectsPage {
    pub modal: Option<SubjectModal>,
    pub name: String,
    pub options_menu: Option<EntityId>,
}

impl SubjectsPage {
    pub fn close_modal(&mut self) {
        self.modal = None;
        self.name.clear();
    }

    pub fn assign_dialog(&mut self) -> Option<&mut AssignDialog> {
        match &mut self.modal {
            Some(SubjectModal::Assign(dialog)) => Some(dialog),
            _ => None,
        }
    }
}

// --- grades ---

#[derive(Debug, Clone, PartialEq)]
pub struct GradeEditor {
    pub student: Student,
    pub subject: Subject,
    /// Grade shown when the editor opened; removal targets this record.
    pub existing: Option<Grade>,
    pub value: String,
}

impl GradeEditor {
    pub fn is_for(&self, student_id: EntityId, subject_id: EntityId) -> bool {
        self.student.id == student_id && self.subject.id == subject_id
    }

    /// Numeric value, or `None` when the field is empty or not a number.
    pub fn parsed_value(&self) -> Option<f64> {
        self.value.trim().parse::<f64>().ok().filter(|value| value.is_finite())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GradesPage {
    pub list_view: bool,
    pub subject_index: usize,
    pub editor: Option<GradeEditor>,
}

impl GradesPage {
    pub fn next_subject(&mut self, subject_count: usize) {
        if subject_count > 0 {
            self.subject_index = (self.subject_index + 1) % subject_count;
        }
    }

    pub fn prev_subject(&mut self, subject_count: usize) {
        if subject_count > 0 {
            self.subject_index = (self.subject_index + subject_count - 1) % subject_count;
        }
    }
}
