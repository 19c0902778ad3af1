//! Email row component - displays a single captured message in the list

use gpui::prelude::*;
use gpui::*;
use gpui_component::{ActiveTheme, Icon, IconName, Sizable};
use inspector::{Message, display_addresses};

#[derive(IntoElement)]
pub struct EmailRow {
    message: Message,
    is_selected: bool,
}

impl EmailRow {
    pub fn new(message: Message, is_selected: bool) -> Self {
        Self {
            message,
            is_selected,
        }
    }

    fn format_date(&self) -> String {
        use chrono::{Local, Utc};
        let local = self.message.date.with_timezone(&Local);
        let now = Utc::now().with_timezone(&Local);

        if local.date_naive() == now.date_naive() {
            local.format("%H:%M").to_string()
        } else if (now - local).num_days() < 7 {
            local.format("%a %H:%M").to_string()
        } else {
            local.format("%b %d").to_string()
        }
    }
}

impl RenderOnce for EmailRow {
    fn render(self, _window: &mut Window, cx: &mut App) -> impl IntoElement {
        let theme = cx.theme();

        let bg_color = if self.is_selected {
            theme.list_active
        } else {
            theme.list
        };

        let border_color = if self.is_selected {
            theme.list_active_border
        } else {
            theme.border
        };

        let date_str = self.format_date();
        let sender = self.message.from.label().to_string();
        let recipients = format!("To: {}", display_addresses(&self.message.to));
        let subject = if self.message.subject.is_empty() {
            "(no subject)".to_string()
        } else {
            self.message.subject.clone()
        };
        let preview = self.message.preview.clone();
        let has_attachments = self.message.has_attachments;

        div()
            .w_full()
            .px_4()
            .py_2()
            .bg(bg_color)
            .border_b_1()
            .border_color(border_color)
            .cursor_pointer()
            .hover(|style| style.bg(theme.list_hover))
            .child(
                div()
                    .flex()
                    .justify_between()
                    .items_center()
                    .child(
                        div()
                            .flex()
                            .flex_col()
                            .overflow_hidden()
                            .flex_1()
                            .child(
                                div()
                                    .flex()
                                    .gap_2()
                                    .child(
                                        div()
                                            .text_sm()
                                            .font_weight(FontWeight::MEDIUM)
                                            .text_color(theme.foreground)
                                            .text_ellipsis()
                                            .child(sender),
                                    )
                                    .child(
                                        div()
                                            .text_xs()
                                            .text_color(theme.muted_foreground)
                                            .text_ellipsis()
                                            .child(recipients),
                                    ),
                            )
                            .child(
                                div()
                                    .text_sm()
                                    .text_color(theme.foreground)
                                    .text_ellipsis()
                                    .child(subject),
                            )
                            .child(
                                div()
                                    .text_xs()
                                    .text_color(theme.muted_foreground)
                                    .text_ellipsis()
                                    .child(preview),
                            ),
                    )
                    .child(
                        div()
                            .flex()
                            .flex_col()
                            .items_end()
                            .gap_1()
                            .flex_shrink_0()
                            .ml_4()
                            .child(
                                div()
                                    .text_xs()
                                    .text_color(theme.muted_foreground)
                                    .child(date_str),
                            )
                            .when(has_attachments, |el| {
                                el.child(
                                    Icon::new(IconName::File)
                                        .xsmall()
                                        .text_color(theme.muted_foreground),
                                )
                            }),
                    ),
            )
    }
}
