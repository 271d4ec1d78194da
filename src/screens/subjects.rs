use iced::widget::container::bordered_box;
use iced::widget::{
    Column, Container, Row, Scrollable, Text, button, checkbox, column, horizontal_space, row, text, text_input,
};
use iced::{Alignment, Element, Length};

use crate::app::state::{SubjectModal, SubjectsPage};
use crate::app::{App, Message};
use crate::assign::AssignDialog;
use crate::model::Subject;

use super::modal;

fn assigned_names(app: &App, subject: &Subject) -> String {
    let names: Vec<String> = app
        .catalog
        .students
        .iter()
        .filter(|student| app.catalog.assignments.is_assigned(subject.id, student.id))
        .map(|student| student.full_name())
        .collect();
    if names.is_empty() { "No students assigned".to_string() } else { names.join(", ") }
}

fn subject_row<'a>(app: &'a App, page: &'a SubjectsPage, subject: &'a Subject) -> Container<'a, Message> {
    let mut header = Row::new()
        .spacing(10)
        .align_y(Alignment::Center)
        .push(
            button(Text::new(&subject.name).size(20))
                .style(button::text)
                .on_press(Message::OpenAssign(subject.clone())),
        )
        .push(horizontal_space());

    if page.options_menu == Some(subject.id) {
        header = header
            .push(button("Edit").on_press(Message::OpenEditSubject(subject.clone())))
            .push(
                button("Delete")
                    .style(button::danger)
                    .on_press(Message::ConfirmDeleteSubject(subject.clone())),
            );
    }
    header = header.push(
        button("...")
            .style(button::secondary)
            .on_press(Message::ToggleSubjectOptions(subject.id)),
    );

    Container::new(
        Column::new()
            .spacing(5)
            .push(header)
            .push(Text::new(assigned_names(app, subject)).size(14)),
    )
    .padding(10)
    .width(Length::Fill)
    .style(move |_| bordered_box(&app.theme))
}

fn name_modal<'a>(page: &'a SubjectsPage, title: &'static str, submit: &'static str) -> Column<'a, Message> {
    column![
        text(title).size(24),
        text_input("Subject name", &page.name)
            .on_input(Message::SubjectNameChanged)
            .on_submit(Message::SubmitSubject)
            .padding(10),
        row![
            button(submit).on_press(Message::SubmitSubject),
            button("Cancel").style(button::secondary).on_press(Message::CloseSubjectModal),
        ]
        .spacing(10),
    ]
    .spacing(15)
}

fn delete_modal(subject: &Subject) -> Column<'_, Message> {
    column![
        text("Delete subject").size(24),
        text(format!("Delete {subject}? This cannot be undone.")),
        row![
            button("Delete").style(button::danger).on_press(Message::DeleteSubject),
            button("Cancel").style(button::secondary).on_press(Message::CloseSubjectModal),
        ]
        .spacing(10),
    ]
    .spacing(15)
}

fn assign_modal<'a>(app: &'a App, dialog: &'a AssignDialog) -> Column<'a, Message> {
    let students = app.catalog.students.iter().fold(Column::new().spacing(8), |col, student| {
        col.push(
            checkbox(student.full_name(), dialog.is_selected(student.id))
                .on_toggle(move |_| Message::ToggleAssignStudent(student.id)),
        )
    });

    column![
        text(format!("Assign students to {}", dialog.subject.name)).size(24),
        checkbox("Select all", dialog.select_all_checked()).on_toggle(|_| Message::ToggleSelectAll),
        Scrollable::new(students).height(Length::Fixed(300.0)),
        text(format!("{} selected", dialog.selected_count())).size(14),
        row![
            button("Assign").on_press(Message::SubmitAssign),
            button("Cancel").style(button::secondary).on_press(Message::CloseSubjectModal),
        ]
        .spacing(10),
    ]
    .spacing(15)
}

pub fn subjects_screen<'a>(app: &'a App, page: &'a SubjectsPage) -> Element<'a, Message> {
    let header = Row::new()
        .spacing(10)
        .align_y(Alignment::Center)
        .push(text("Subjects").size(30))
        .push(horizontal_space())
        .push(button("Add subject").on_press(Message::OpenAddSubject));

    let list = if app.catalog.subjects.is_empty() {
        let label = if app.catalog.subjects.is_loaded() { "No subjects yet." } else { "Loading..." };
        Column::new().push(text(label).size(16))
    } else {
        app.catalog
            .subjects
            .iter()
            .fold(Column::new().spacing(10), |col, subject| col.push(subject_row(app, page, subject)))
    };

    let base = Container::new(
        Column::new()
            .spacing(20)
            .padding(20)
            .push(header)
            .push(Scrollable::new(list).height(Length::Fill)),
    )
    .width(Length::Fill)
    .height(Length::Fill);

    let dismiss = Some(Message::CloseSubjectModal);
    match &page.modal {
        None => base.into(),
        Some(SubjectModal::Add) => modal(app, base, name_modal(page, "Add subject", "Add"), 450.0, dismiss),
        Some(SubjectModal::Edit(_)) => modal(app, base, name_modal(page, "Edit subject", "Save"), 450.0, dismiss),
        Some(SubjectModal::Delete(subject)) => modal(app, base, delete_modal(subject), 450.0, dismiss),
        Some(SubjectModal::Assign(dialog)) => modal(app, base, assign_modal(app, dialog), 500.0, dismiss),
    }
}
