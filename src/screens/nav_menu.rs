use iced::widget::{Container, Row, button, column, text, vertical_space};
use iced::{Alignment, Element, Length, Renderer, Theme};
use iced_font_awesome::fa_icon_solid;

use crate::app::{App, Message};
use crate::router::Section;

fn icon_button_content<'a>(
    icon_element: impl Into<Element<'a, Message, Theme, Renderer>>,
    label: String,
) -> Row<'a, Message> {
    Row::new()
        .align_y(Alignment::Center)
        .spacing(5)
        .push(icon_element)
        .push(text(label))
}

fn section_icon(section: Section) -> &'static str {
    match section {
        Section::Home => "house",
        Section::Students => "user-graduate",
        Section::Subjects => "book",
        Section::Grades => "star",
    }
}

pub fn nav_menu(app: &App) -> Container<'_, Message> {
    let signed_in = app.session.is_authenticated();
    let active = app.router.active();

    let mut content = column![].spacing(10);
    for section in Section::ALL {
        let style = if active == Some(section) { button::primary } else { button::secondary };
        content = content.push(
            button(icon_button_content(
                fa_icon_solid(section_icon(section)).style(move |_| text::base(&app.theme)),
                section.to_string(),
            ))
            .style(style)
            .on_press_maybe(signed_in.then_some(Message::SelectSection(section)))
            .width(Length::Fill),
        );
    }

    let content = content.push(vertical_space()).push(
        button(icon_button_content(
            fa_icon_solid("arrow-right-from-bracket").style(move |_| text::base(&app.theme)),
            "Logout".to_string(),
        ))
        .on_press_maybe(signed_in.then_some(Message::Logout))
        .width(Length::Fill),
    );

    Container::new(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(10)
}
