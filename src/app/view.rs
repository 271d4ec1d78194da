use iced::widget::container::background;
use iced::widget::{Container, Row, Space, Stack, text};
use iced::{Color, Element, Length};

use crate::router::Phase;
use crate::screens::{auth_modal, grades_screen, home_screen, modal, nav_menu, students_screen, subjects_screen};

use super::state::Page;
use super::{App, Message};

impl App {
    pub fn view(&self) -> Element<'_, Message> {
        let layout = Row::new()
            .spacing(20)
            .push(
                // sidebar
                Container::new(nav_menu(self))
                    .width(Length::Fixed(200.0))
                    .height(Length::Fill)
                    .padding(10),
            )
            .push(self.section_panel());

        match self.session.auth_mode() {
            Some(mode) => modal(self, layout, auth_modal(self, mode), 400.0, None),
            None => layout.into(),
        }
    }

    /// Mounted section, faded according to the router phase.
    fn section_panel(&self) -> Element<'_, Message> {
        if self.router.phase() == Phase::Idle {
            return Container::new(text("Select a section").size(20)).center(Length::Fill).into();
        }
        let content: Element<'_, Message> = match &self.page {
            Page::None => Space::new(Length::Fill, Length::Fill).into(),
            Page::Home => home_screen(self).into(),
            Page::Students(page) => students_screen(self, page),
            Page::Subjects(page) => subjects_screen(self, page),
            Page::Grades(page) => grades_screen(self, page),
        };

        let veil = 1.0 - self.router.opacity(self.now);
        if veil <= 0.0 {
            return Container::new(content).width(Length::Fill).height(Length::Fill).into();
        }
        let backdrop = self.theme.palette().background;
        Stack::new()
            .push(content)
            .push(
                Container::new(Space::new(Length::Fill, Length::Fill))
                    .style(move |_| background(Color { a: veil, ..backdrop })),
            )
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}
