use iced::widget::container::bordered_box;
use iced::widget::{Column, Container, Row, Scrollable, Text, button, column, horizontal_space, row, text, text_input};
use iced::{Alignment, Element, Length};

use crate::app::state::{GradeEditor, GradesPage};
use crate::app::{App, Message};
use crate::model::Subject;

use super::modal;

fn subject_table<'a>(app: &'a App, subject: &'a Subject) -> Container<'a, Message> {
    let students = app.catalog.students_for_subject(subject.id);

    let mut table = Column::new().spacing(5).push(Text::new(&subject.name).size(22));
    if students.is_empty() {
        table = table.push(Text::new("No students for this subject.").size(14));
    }
    for student in students {
        let cell = match app.catalog.grade_for(student.id, subject.id) {
            Some(grade) => grade.grade.to_string(),
            None => "No grade".to_string(),
        };
        table = table.push(
            Row::new()
                .spacing(10)
                .align_y(Alignment::Center)
                .push(Text::new(student.full_name()).width(Length::FillPortion(3)))
                .push(Text::new(cell).width(Length::FillPortion(1)))
                .push(button("Edit").on_press(Message::EditGrade {
                    student_id: student.id,
                    subject_id: subject.id,
                })),
        );
    }

    Container::new(table)
        .padding(10)
        .width(Length::Fill)
        .style(move |_| bordered_box(&app.theme))
}

fn editor_modal(editor: &GradeEditor) -> Column<'_, Message> {
    let mut actions = row![button("Save").on_press(Message::SaveGrade)].spacing(10);
    if editor.existing.is_some() {
        actions = actions.push(button("Remove").style(button::danger).on_press(Message::RemoveGrade));
    }
    actions = actions.push(button("Close").style(button::secondary).on_press(Message::CloseGradeEditor));

    column![
        text(format!("{} / {}", editor.student, editor.subject)).size(22),
        text_input("Grade", &editor.value)
            .on_input(Message::GradeValueChanged)
            .on_submit(Message::SaveGrade)
            .padding(10),
        actions,
    ]
    .spacing(15)
}

pub fn grades_screen<'a>(app: &'a App, page: &'a GradesPage) -> Element<'a, Message> {
    let subjects = app.catalog.subjects.as_slice();
    let toggle_label = if page.list_view { "Show all subjects" } else { "One subject at a time" };

    let mut header = Row::new()
        .spacing(10)
        .align_y(Alignment::Center)
        .push(text("Grades").size(30))
        .push(horizontal_space());
    if page.list_view && !subjects.is_empty() {
        header = header
            .push(button("Previous").on_press(Message::PrevSubject))
            .push(text(format!("{} / {}", page.subject_index.min(subjects.len() - 1) + 1, subjects.len())))
            .push(button("Next").on_press(Message::NextSubject));
    }
    header = header.push(button(toggle_label).style(button::secondary).on_press(Message::ToggleGradesView));

    let body = if subjects.is_empty() {
        let label = if app.catalog.subjects.is_loaded() { "No subjects yet." } else { "Loading..." };
        Column::new().push(text(label).size(16))
    } else if page.list_view {
        let index = page.subject_index.min(subjects.len() - 1);
        Column::new().push(subject_table(app, &subjects[index]))
    } else {
        subjects
            .iter()
            .fold(Column::new().spacing(15), |col, subject| col.push(subject_table(app, subject)))
    };

    let base = Container::new(
        Column::new()
            .spacing(20)
            .padding(20)
            .push(header)
            .push(Scrollable::new(body).height(Length::Fill)),
    )
    .width(Length::Fill)
    .height(Length::Fill);

    match &page.editor {
        Some(editor) => modal(app, base, editor_modal(editor), 400.0, Some(Message::CloseGradeEditor)),
        None => base.into(),
    }
}
