use iced::widget::{Container, button, column, text};
use iced::{Center, Length};

use crate::app::{App, Message};
use crate::router::Section;

pub fn home_screen(app: &App) -> Container<'_, Message> {
    let summary = format!(
        "{} students, {} subjects, {} grades loaded",
        app.catalog.students.len(),
        app.catalog.subjects.len(),
        app.catalog.grades.len(),
    );

    let content = column![
        text("Welcome").size(30),
        text("Manage students, subjects and their grades.").size(18),
        text(summary).size(14),
        button("Go to Students")
            .padding(10)
            .on_press(Message::SelectSection(Section::Students)),
    ]
    .spacing(15)
    .align_x(Center);

    Container::new(content).center(Length::Fill).padding(40)
}
