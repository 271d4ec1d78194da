pub mod auth;
pub mod grades;
pub mod home;
pub mod nav_menu;
pub mod students;
pub mod subjects;

use iced::widget::container::{background, bordered_box};
use iced::widget::{Container, Stack, mouse_area, opaque};
use iced::{Color, Element, Length};

use crate::app::{App, Message};

pub use auth::auth_modal;
pub use grades::grades_screen;
pub use home::home_screen;
pub use nav_menu::nav_menu;
pub use students::students_screen;
pub use subjects::subjects_screen;

/// Lays `content` over `base` behind a dimmed backdrop. Clicking the backdrop
/// sends `on_dismiss` when one is given.
pub fn modal<'a>(
    app: &'a App,
    base: impl Into<Element<'a, Message>>,
    content: impl Into<Element<'a, Message>>,
    width: f32,
    on_dismiss: Option<Message>,
) -> Element<'a, Message> {
    let dialog = Container::new(content)
        .style(move |_| bordered_box(&app.theme))
        .padding(20)
        .width(Length::Fixed(width));

    let overlay = Container::new(opaque(dialog))
        .center(Length::Fill)
        .style(|_| background(Color { r: 0.0, g: 0.0, b: 0.0, a: 0.7 }));

    let backdrop = match on_dismiss {
        Some(message) => mouse_area(overlay).on_press(message),
        None => mouse_area(overlay),
    };

    Stack::new()
        .push(base)
        .push(opaque(backdrop))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}
