use iced::widget::{Column, button, column, text, text_input};
use iced::{Center, Element, Length};

use crate::app::{App, Message};
use crate::session::AuthMode;

fn switch_label(mode: AuthMode) -> &'static str {
    match mode {
        AuthMode::Login => "No account yet? Register",
        AuthMode::Register => "Already have an account? Login",
    }
}

/// Login / register form shown over the whole window while signed out.
pub fn auth_modal(app: &App, mode: AuthMode) -> Element<'_, Message> {
    let submit = button(text(mode.title()))
        .padding(10)
        .on_press_maybe((!app.auth_pending).then_some(Message::SubmitAuth));

    let mut content: Column<Message> = column![
        text(mode.title()).size(30),
        text_input("Email", &app.auth_email)
            .on_input(Message::AuthEmailChanged)
            .on_submit(Message::SubmitAuth)
            .padding(10)
            .size(18),
        text_input("Password", &app.auth_password)
            .on_input(Message::AuthPasswordChanged)
            .on_submit(Message::SubmitAuth)
            .secure(true)
            .padding(10)
            .size(18),
        submit,
    ]
    .spacing(15)
    .width(Length::Fill)
    .align_x(Center);

    if let Some(error) = &app.auth_error {
        content = content.push(text(error).size(16));
    }

    content
        .push(button(text(switch_label(mode))).style(button::text).on_press(Message::ToggleAuthMode))
        .into()
}
