use iced::widget::container::bordered_box;
use iced::widget::{Column, Container, Row, Scrollable, Text, button, column, horizontal_space, row, text, text_input};
use iced::{Alignment, Element, Length};

use crate::app::state::{StudentModal, StudentsPage};
use crate::app::{App, Message};
use crate::model::Student;

use super::modal;

fn student_row<'a>(app: &'a App, student: &'a Student) -> Container<'a, Message> {
    let content = Row::new()
        .spacing(10)
        .align_y(Alignment::Center)
        .push(Text::new(student.full_name()).size(18).width(Length::FillPortion(3)))
        .push(Text::new(&student.email).size(16).width(Length::FillPortion(3)))
        .push(horizontal_space())
        .push(button("Edit").on_press(Message::OpenEditStudent(student.clone())))
        .push(
            button("Delete")
                .style(button::danger)
                .on_press(Message::ConfirmDeleteStudent(student.clone())),
        );

    Container::new(content)
        .padding(10)
        .width(Length::Fill)
        .style(move |_| bordered_box(&app.theme))
}

fn form_modal<'a>(page: &'a StudentsPage, title: &'static str, submit: &'static str) -> Column<'a, Message> {
    column![
        text(title).size(24),
        text_input("First name", &page.form.first_name)
            .on_input(Message::StudentFirstNameChanged)
            .padding(10),
        text_input("Last name", &page.form.last_name)
            .on_input(Message::StudentLastNameChanged)
            .padding(10),
        text_input("Email", &page.form.email)
            .on_input(Message::StudentEmailChanged)
            .on_submit(Message::SubmitStudent)
            .padding(10),
        row![
            button(submit).on_press(Message::SubmitStudent),
            button("Cancel").style(button::secondary).on_press(Message::CloseStudentModal),
        ]
        .spacing(10),
    ]
    .spacing(15)
}

fn delete_modal(student: &Student) -> Column<'_, Message> {
    column![
        text("Delete student").size(24),
        text(format!("Delete {}? This cannot be undone.", student.full_name())),
        row![
            button("Delete").style(button::danger).on_press(Message::DeleteStudent),
            button("Cancel").style(button::secondary).on_press(Message::CloseStudentModal),
        ]
        .spacing(10),
    ]
    .spacing(15)
}

pub fn students_screen<'a>(app: &'a App, page: &'a StudentsPage) -> Element<'a, Message> {
    let header = Row::new()
        .spacing(10)
        .align_y(Alignment::Center)
        .push(text("Students").size(30))
        .push(horizontal_space())
        .push(button("Add student").on_press(Message::OpenAddStudent));

    let list = if app.catalog.students.is_empty() {
        let label = if app.catalog.students.is_loaded() { "No students yet." } else { "Loading..." };
        Column::new().push(text(label).size(16))
    } else {
        app.catalog
            .students
            .iter()
            .fold(Column::new().spacing(10), |col, student| col.push(student_row(app, student)))
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

    match &page.modal {
        None => base.into(),
        Some(StudentModal::Add) => modal(
            app,
            base,
            form_modal(page, "Add student", "Add"),
            450.0,
            Some(Message::CloseStudentModal),
        ),
        Some(StudentModal::Edit(_)) => modal(
            app,
            base,
            form_modal(page, "Edit student", "Save"),
            450.0,
            Some(Message::CloseStudentModal),
        ),
        Some(StudentModal::Delete(student)) => {
            modal(app, base, delete_modal(student), 450.0, Some(Message::CloseStudentModal))
        }
    }
}
