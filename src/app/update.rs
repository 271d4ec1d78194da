use std::future::Future;
use std::time::Instant;

use iced::{Subscription, Task, window};

use crate::api::ApiClient;
use crate::assign::AssignDialog;
use crate::error::ApiError;
use crate::model::{Credentials, NewGrade, NewSubject, SubjectUpdate};
use crate::router::{RouterEvent, Section};
use crate::store::GradeSave;

use super::state::{APP_TITLE, GradeEditor, Page, StudentForm, StudentModal, SubjectModal};
use super::{App, Message};

impl App {
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            // --- session ---
            Message::AuthEmailChanged(v) => {
                self.auth_email = v;
                Task::none()
            }
            Message::AuthPasswordChanged(v) => {
                self.auth_password = v;
                Task::none()
            }
            Message::ToggleAuthMode => {
                self.session.toggle_mode();
                self.auth_error = None;
                Task::none()
            }
            Message::SubmitAuth => {
                let Some(mode) = self.session.auth_mode() else {
                    return Task::none();
                };
                if self.auth_email.trim().is_empty() || self.auth_password.is_empty() || self.auth_pending {
                    return Task::none();
                }
                self.auth_pending = true;
                let credentials = Credentials {
                    email: self.auth_email.trim().to_string(),
                    password: self.auth_password.clone(),
                };
                let api = self.api.clone();
                Task::perform(
                    async move { api.authenticate(mode, credentials).await },
                    Message::AuthFinished,
                )
            }
            Message::AuthFinished(result) => {
                self.auth_pending = false;
                match result {
                    Ok(token) => match self.session.authenticate(&token) {
                        Ok(()) => {
                            self.auth_password.clear();
                            self.auth_error = None;
                            Task::none()
                        }
                        Err(err) => {
                            tracing::error!(error = %err, "cannot persist credential");
                            self.auth_error = Some(err.to_string());
                            alert(err.to_string())
                        }
                    },
                    Err(err) => {
                        tracing::error!(error = %err, "authentication failed");
                        let text = err.user_message();
                        self.auth_error = Some(text.clone());
                        alert(text)
                    }
                }
            }
            Message::Logout => {
                if let Err(err) = self.session.logout() {
                    tracing::error!(error = %err, "cannot remove credential");
                }
                self.auth_password.clear();
                self.auth_error = None;
                // Cached collections and the mounted section stay as they are.
                Task::none()
            }
            Message::AlertDismissed => Task::none(),

            // --- navigation ---
            Message::SelectSection(section) => {
                if !self.session.is_authenticated() {
                    return Task::none();
                }
                let now = Instant::now();
                self.now = now;
                match self.router.select(section, now) {
                    Some(event) => self.apply_router_event(event),
                    None => Task::none(),
                }
            }
            Message::Frame(now) => {
                self.now = now;
                match self.router.tick(now) {
                    Some(event) => self.apply_router_event(event),
                    None => Task::none(),
                }
            }

            // --- fetches ---
            Message::StudentsLoaded(result) => {
                match result {
                    Ok(students) => {
                        tracing::debug!(count = students.len(), "students fetched");
                        self.catalog.students.replace_all(students);
                    }
                    Err(err) => tracing::error!(error = %err, "error fetching students"),
                }
                Task::none()
            }
            Message::SubjectsLoaded(result) => {
                match result {
                    Ok(subjects) => {
                        tracing::debug!(count = subjects.len(), "subjects fetched");
                        self.catalog.replace_subjects(subjects);
                        if let Some(page) = self.grades_page() {
                            page.subject_index = 0;
                        }
                    }
                    Err(err) => tracing::error!(error = %err, "error fetching subjects"),
                }
                Task::none()
            }
            Message::GradesLoaded(result) => match result {
                Ok(grades) => {
                    tracing::debug!(count = grades.len(), "grades fetched");
                    self.catalog.grades.replace_all(grades);
                    Task::none()
                }
                Err(err) => {
                    tracing::error!(error = %err, "error fetching grades");
                    alert(err.user_message())
                }
            },

            // --- students ---
            Message::OpenAddStudent => {
                if let Some(page) = self.students_page() {
                    page.form = StudentForm::default();
                    page.modal = Some(StudentModal::Add);
                }
                Task::none()
            }
            Message::OpenEditStudent(student) => {
                if let Some(page) = self.students_page() {
                    page.form = StudentForm::from_student(&student);
                    page.modal = Some(StudentModal::Edit(student));
                }
                Task::none()
            }
            Message::ConfirmDeleteStudent(student) => {
                if let Some(page) = self.students_page() {
                    page.modal = Some(StudentModal::Delete(student));
                }
                Task::none()
            }
            Message::CloseStudentModal => {
                if let Some(page) = self.students_page() {
                    page.close_modal();
                }
                Task::none()
            }
            Message::StudentFirstNameChanged(v) => {
                if let Some(page) = self.students_page() {
                    page.form.first_name = v;
                }
                Task::none()
            }
            Message::StudentLastNameChanged(v) => {
                if let Some(page) = self.students_page() {
                    page.form.last_name = v;
                }
                Task::none()
            }
            Message::StudentEmailChanged(v) => {
                if let Some(page) = self.students_page() {
                    page.form.email = v;
                }
                Task::none()
            }
            Message::SubmitStudent => {
                let Some(page) = self.students_page() else {
                    return Task::none();
                };
                if !page.form.is_complete() {
                    return Task::none();
                }
                match page.modal.clone() {
                    Some(StudentModal::Add) => {
                        let student = page.form.to_new();
                        self.remote(
                            move |api, token| async move { api.create_student(token, student).await },
                            Message::StudentCreated,
                        )
                    }
                    Some(StudentModal::Edit(original)) => {
                        let student = page.form.to_student(original.id);
                        self.remote(
                            move |api, token| async move { api.update_student(token, student).await },
                            Message::StudentUpdated,
                        )
                    }
                    _ => Task::none(),
                }
            }
            Message::DeleteStudent => {
                let Page::Students(page) = &self.page else {
                    return Task::none();
                };
                let Some(StudentModal::Delete(student)) = &page.modal else {
                    return Task::none();
                };
                let id = student.id;
                self.remote(
                    move |api, token| async move { api.delete_student(token, id).await },
                    Message::StudentDeleted,
                )
            }
            Message::StudentCreated(result) => {
                match result {
                    Ok(student) => {
                        self.catalog.students.insert_created(student);
                        if let Some(page) = self.students_page() {
                            if page.modal == Some(StudentModal::Add) {
                                page.close_modal();
                            }
                        }
                    }
                    Err(err) => tracing::error!(error = %err, "failed to add student"),
                }
                Task::none()
            }
            Message::StudentUpdated(result) => {
                match result {
                    Ok(student) => {
                        let id = student.id;
                        self.catalog.students.apply_updated(student);
                        if let Some(page) = self.students_page() {
                            if matches!(&page.modal, Some(StudentModal::Edit(s)) if s.id == id) {
                                page.close_modal();
                            }
                        }
                    }
                    Err(err) => tracing::error!(error = %err, "failed to edit student"),
                }
                Task::none()
            }
            Message::StudentDeleted(result) => {
                match result {
                    Ok(id) => {
                        // Grades referencing this student are left as they are.
                        self.catalog.students.remove(id);
                        if let Some(page) = self.students_page() {
                            if matches!(&page.modal, Some(StudentModal::Delete(s)) if s.id == id) {
                                page.close_modal();
                            }
                        }
                    }
                    Err(err) => tracing::error!(error = %err, "failed to delete student"),
                }
                Task::none()
            }

            // --- subjects ---
            Message::OpenAddSubject => {
                if let Some(page) = self.subjects_page() {
                    page.name.clear();
                    page.options_menu = None;
                    page.modal = Some(SubjectModal::Add);
                }
                Task::none()
            }
            Message::OpenEditSubject(subject) => {
                if let Some(page) = self.subjects_page() {
                    page.name = subject.name.clone();
                    page.options_menu = None;
                    page.modal = Some(SubjectModal::Edit(subject));
                }
                Task::none()
            }
            Message::ConfirmDeleteSubject(subject) => {
                if let Some(page) = self.subjects_page() {
                    page.options_menu = None;
                    page.modal = Some(SubjectModal::Delete(subject));
                }
                Task::none()
            }
            Message::ToggleSubjectOptions(id) => {
                if let Some(page) = self.subjects_page() {
                    page.options_menu = if page.options_menu == Some(id) { None } else { Some(id) };
                }
                Task::none()
            }
            Message::CloseSubjectModal => {
                if let Some(page) = self.subjects_page() {
                    page.close_modal();
                }
                Task::none()
            }
            Message::SubjectNameChanged(v) => {
                if let Some(page) = self.subjects_page() {
                    page.name = v;
                }
                Task::none()
            }
            Message::SubmitSubject => {
                let Some(page) = self.subjects_page() else {
                    return Task::none();
                };
                if page.name.trim().is_empty() {
                    return Task::none();
                }
                let name = page.name.clone();
                match page.modal.clone() {
                    Some(SubjectModal::Add) => self.remote(
                        move |api, token| async move { api.create_subject(token, NewSubject { name }).await },
                        Message::SubjectCreated,
                    ),
                    Some(SubjectModal::Edit(subject)) => {
                        let update = SubjectUpdate { id: subject.id, name };
                        self.remote(
                            move |api, token| async move { api.update_subject(token, update).await },
                            Message::SubjectUpdated,
                        )
                    }
                    _ => Task::none(),
                }
            }
            Message::DeleteSubject => {
                let Page::Subjects(page) = &self.page else {
                    return Task::none();
                };
                let Some(SubjectModal::Delete(subject)) = &page.modal else {
                    return Task::none();
                };
                let id = subject.id;
                self.remote(
                    move |api, token| async move { api.delete_subject(token, id).await },
                    Message::SubjectDeleted,
                )
            }
            Message::SubjectCreated(result) => {
                match result {
                    Ok(subject) => {
                        self.catalog.subjects.insert_created(subject);
                        if let Some(page) = self.subjects_page() {
                            if page.modal == Some(SubjectModal::Add) {
                                page.close_modal();
                            }
                        }
                    }
                    Err(err) => tracing::error!(error = %err, "failed to add subject"),
                }
                Task::none()
            }
            Message::SubjectUpdated(result) => {
                match result {
                    Ok(subject) => {
                        let id = subject.id;
                        self.catalog.subjects.apply_updated(subject);
                        if let Some(page) = self.subjects_page() {
                            if matches!(&page.modal, Some(SubjectModal::Edit(s)) if s.id == id) {
                                page.close_modal();
                            }
                        }
                    }
                    Err(err) => tracing::error!(error = %err, "failed to edit subject"),
                }
                Task::none()
            }
            Message::SubjectDeleted(result) => {
                match result {
                    Ok(id) => {
                        self.catalog.subjects.remove(id);
                        if let Some(page) = self.subjects_page() {
                            if matches!(&page.modal, Some(SubjectModal::Delete(s)) if s.id == id) {
                                page.close_modal();
                            }
                        }
                    }
                    Err(err) => tracing::error!(error = %err, "failed to delete subject"),
                }
                Task::none()
            }

            // --- assignment dialog ---
            Message::OpenAssign(subject) => {
                let dialog = AssignDialog::open(subject, &self.catalog.assignments);
                if let Some(page) = self.subjects_page() {
                    page.options_menu = None;
                    page.modal = Some(SubjectModal::Assign(dialog));
                }
                Task::none()
            }
            Message::ToggleAssignStudent(student_id) => {
                if let Some(dialog) = self.subjects_page().and_then(|page| page.assign_dialog()) {
                    dialog.toggle_student(student_id);
                }
                Task::none()
            }
            Message::ToggleSelectAll => {
                let Page::Subjects(page) = &mut self.page else {
                    return Task::none();
                };
                if let Some(dialog) = page.assign_dialog() {
                    dialog.toggle_select_all(self.catalog.students.as_slice());
                }
                Task::none()
            }
            Message::SubmitAssign => {
                let Some(dialog) = self.subjects_page().and_then(|page| page.assign_dialog()) else {
                    return Task::none();
                };
                let assignment = dialog.assignment();
                self.remote(
                    move |api, token| async move { api.assign_subject(token, assignment).await },
                    Message::SubjectAssigned,
                )
            }
            Message::SubjectAssigned(result) => {
                match result {
                    Ok(assignment) => {
                        let subject_id = assignment.subject_id;
                        self.catalog.assignments.replace(subject_id, assignment.student_ids);
                        if let Some(page) = self.subjects_page() {
                            if matches!(&page.modal, Some(SubjectModal::Assign(d)) if d.subject.id == subject_id) {
                                page.close_modal();
                            }
                        }
                    }
                    Err(err) => tracing::error!(error = %err, "failed to assign students to subject"),
                }
                Task::none()
            }

            // --- grades ---
            Message::ToggleGradesView => {
                if let Some(page) = self.grades_page() {
                    page.list_view = !page.list_view;
                }
                Task::none()
            }
            Message::NextSubject => {
                let count = self.catalog.subjects.len();
                if let Some(page) = self.grades_page() {
                    page.next_subject(count);
                }
                Task::none()
            }
            Message::PrevSubject => {
                let count = self.catalog.subjects.len();
                if let Some(page) = self.grades_page() {
                    page.prev_subject(count);
                }
                Task::none()
            }
            Message::EditGrade { student_id, subject_id } => {
                let (Some(student), Some(subject)) = (
                    self.catalog.students.get(student_id).cloned(),
                    self.catalog.subjects.get(subject_id).cloned(),
                ) else {
                    return Task::none();
                };
                let existing = self.catalog.grade_for(student_id, subject_id).cloned();
                let value = existing.as_ref().map(|g| g.grade.to_string()).unwrap_or_default();
                if let Some(page) = self.grades_page() {
                    page.editor = Some(GradeEditor { student, subject, existing, value });
                }
                Task::none()
            }
            Message::GradeValueChanged(v) => {
                if let Some(editor) = self.grades_page().and_then(|page| page.editor.as_mut()) {
                    editor.value = v;
                }
                Task::none()
            }
            Message::SaveGrade => {
                let Some(editor) = self.grades_page().and_then(|page| page.editor.clone()) else {
                    return Task::none();
                };
                let Some(value) = editor.parsed_value() else {
                    return Task::none();
                };
                self.save_grade(&editor, value)
            }
            Message::RemoveGrade => {
                let Some(grade) = self
                    .grades_page()
                    .and_then(|page| page.editor.as_ref())
                    .and_then(|editor| editor.existing.clone())
                else {
                    return Task::none();
                };
                let id = grade.id;
                self.remote(
                    move |api, token| async move { api.delete_grade(token, id).await },
                    Message::GradeRemoved,
                )
            }
            Message::CloseGradeEditor => {
                if let Some(page) = self.grades_page() {
                    page.editor = None;
                }
                Task::none()
            }
            Message::GradeCreated(result) => self.grade_saved(result, |catalog, grade| {
                catalog.grades.insert_created(grade);
            }),
            Message::GradeUpdated(result) => self.grade_saved(result, |catalog, grade| {
                catalog.grades.apply_updated(grade);
            }),
            Message::GradeUpserted(result) => self.grade_saved(result, |catalog, grade| {
                catalog.grades.upsert(grade);
            }),
            Message::GradeRemoved(result) => match result {
                Ok(id) => {
                    self.catalog.grades.remove(id);
                    if let Some(page) = self.grades_page() {
                        let removed_open_grade = page
                            .editor
                            .as_ref()
                            .and_then(|editor| editor.existing.as_ref())
                            .is_some_and(|grade| grade.id == id);
                        if removed_open_grade {
                            page.editor = None;
                        }
                    }
                    Task::none()
                }
                Err(err) => {
                    tracing::error!(error = %err, "failed to remove grade");
                    alert(err.user_message())
                }
            },
        }
    }

    pub fn subscription(&self) -> Subscription<Message> {
        if self.router.is_animating() {
            window::frames().map(Message::Frame)
        } else {
            Subscription::none()
        }
    }

    fn apply_router_event(&mut self, event: RouterEvent) -> Task<Message> {
        match event {
            RouterEvent::Unmount(section) => {
                tracing::debug!(%section, "unmounting section");
                self.page = Page::None;
                Task::none()
            }
            RouterEvent::Mount(section) => {
                tracing::debug!(%section, "mounting section");
                self.page = Page::mount(section);
                self.fetch_for(section)
            }
            RouterEvent::Settled(_) => Task::none(),
        }
    }

    /// Fetch issued when a section mounts. Every response replaces the
    /// corresponding shared collection.
    fn fetch_for(&self, section: Section) -> Task<Message> {
        let students = || {
            self.remote(|api, token| async move { api.list_students(token).await }, Message::StudentsLoaded)
        };
        let subjects = || {
            self.remote(|api, token| async move { api.list_subjects(token).await }, Message::SubjectsLoaded)
        };
        match section {
            Section::Home => Task::none(),
            Section::Students => students(),
            Section::Subjects => Task::batch([subjects(), students()]),
            Section::Grades => Task::batch([
                students(),
                subjects(),
                self.remote(|api, token| async move { api.list_grades(token).await }, Message::GradesLoaded),
            ]),
        }
    }

    /// Chooses create or update from the cached grades, unless the server
    /// offers an idempotent upsert.
    fn save_grade(&self, editor: &GradeEditor, value: f64) -> Task<Message> {
        let student_id = editor.student.id;
        let subject_id = editor.subject.id;
        let new_grade = NewGrade { value, student_id, subject_id };

        match self.catalog.plan_grade_save(self.api.supports_grade_upsert(), new_grade) {
            GradeSave::Upsert(grade) => self.remote(
                move |api, token| async move { api.upsert_grade(token, grade).await },
                Message::GradeUpserted,
            ),
            GradeSave::Update(update) => self.remote(
                move |api, token| async move { api.update_grade(token, update).await },
                Message::GradeUpdated,
            ),
            GradeSave::Create(grade) => self.remote(
                move |api, token| async move { api.create_grade(token, grade).await },
                Message::GradeCreated,
            ),
        }
    }

    fn grade_saved(
        &mut self,
        result: Result<crate::model::Grade, ApiError>,
        apply: impl FnOnce(&mut crate::store::Catalog, crate::model::Grade),
    ) -> Task<Message> {
        match result {
            Ok(grade) => {
                let (student_id, subject_id) = (grade.student_id, grade.subject_id);
                apply(&mut self.catalog, grade);
                if let Some(page) = self.grades_page() {
                    if page.editor.as_ref().is_some_and(|e| e.is_for(student_id, subject_id)) {
                        page.editor = None;
                    }
                }
                Task::none()
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to save grade");
                alert(err.user_message())
            }
        }
    }

    /// Runs one remote call with the bearer token as stored right now.
    fn remote<T, F, Fut>(&self, call: F, done: fn(Result<T, ApiError>) -> Message) -> Task<Message>
    where
        T: Send + 'static,
        F: FnOnce(ApiClient, Option<String>) -> Fut,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let future = call(self.api.clone(), self.session.bearer());
        Task::perform(future, done)
    }
}

/// Blocking native alert used for authentication and grade failures.
fn alert(description: String) -> Task<Message> {
    Task::perform(
        async move {
            let shown = tokio::task::spawn_blocking(move || {
                rfd::MessageDialog::new()
                    .set_level(rfd::MessageLevel::Error)
                    .set_title(APP_TITLE)
                    .set_description(description)
                    .set_buttons(rfd::MessageButtons::Ok)
                    .show()
            })
            .await;
            if let Err(err) = shown {
                tracing::warn!(error = %err, "alert dialog task failed");
            }
        },
        |_| Message::AlertDismissed,
    )
}
