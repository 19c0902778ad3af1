//! Sidebar entry for a mailbox

use gpui::prelude::*;
use gpui::*;
use gpui_component::ActiveTheme;

/// A single item in the sidebar navigation
#[derive(IntoElement)]
pub struct MailboxItem {
    name: SharedString,
    is_selected: bool,
}

impl MailboxItem {
    pub fn new(name: impl Into<SharedString>, is_selected: bool) -> Self {
        Self {
            name: name.into(),
            is_selected,
        }
    }
}

impl RenderOnce for MailboxItem {
    fn render(self, _window: &mut Window, cx: &mut App) -> impl IntoElement {
        let theme = cx.theme();

        let bg_color = if self.is_selected {
            theme.list_active
        } else {
            theme.transparent
        };

        let text_color = if self.is_selected {
            theme.foreground
        } else {
            theme.muted_foreground
        };

        let border_color = if self.is_selected {
            theme.list_active_border
        } else {
            theme.transparent
        };

        div()
            .w_full()
            .px_3()
            .py_2()
            .rounded_md()
            .bg(bg_color)
            .border_l_2()
            .border_color(border_color)
            .cursor_pointer()
            .hover(|style| style.bg(theme.list_hover))
            .child(
                div()
                    .text_sm()
                    .text_color(text_color)
                    .text_ellipsis()
                    .font_weight(if self.is_selected {
                        FontWeight::MEDIUM
                    } else {
                        FontWeight::NORMAL
                    })
                    .child(self.name),
            )
    }
}
