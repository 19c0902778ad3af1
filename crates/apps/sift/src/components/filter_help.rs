//! Filter syntax help overlay
//!
//! Lists the query commands the capture server understands.

use gpui::prelude::*;
use gpui::*;
use gpui_component::ActiveTheme;
use inspector::FilterSyntaxEntry;

#[derive(IntoElement)]
pub struct FilterHelp {
    entries: Vec<FilterSyntaxEntry>,
}

impl FilterHelp {
    pub fn new(entries: Vec<FilterSyntaxEntry>) -> Self {
        Self { entries }
    }
}

impl RenderOnce for FilterHelp {
    fn render(self, _window: &mut Window, cx: &mut App) -> impl IntoElement {
        let theme = cx.theme();

        // Full-screen overlay with centered modal
        div()
            .absolute()
            .inset_0()
            .flex()
            .items_center()
            .justify_center()
            .child(div().absolute().inset_0().bg(hsla(0., 0., 0., 0.5)))
            .child(
                div()
                    .relative()
                    .bg(theme.background)
                    .border_1()
                    .border_color(theme.border)
                    .rounded_lg()
                    .shadow_lg()
                    .p_4()
                    .min_w(px(480.))
                    .child(
                        div()
                            .pb_3()
                            .mb_3()
                            .border_b_1()
                            .border_color(theme.border)
                            .flex()
                            .items_center()
                            .justify_between()
                            .child(
                                div()
                                    .text_lg()
                                    .font_weight(FontWeight::BOLD)
                                    .text_color(theme.foreground)
                                    .child("Search Filters"),
                            )
                            .child(
                                div()
                                    .text_sm()
                                    .text_color(theme.muted_foreground)
                                    .child("Press Escape to close"),
                            ),
                    )
                    .when(self.entries.is_empty(), |el| {
                        el.child(
                            div()
                                .text_sm()
                                .text_color(theme.muted_foreground)
                                .child("Filter syntax not available"),
                        )
                    })
                    .child(
                        div()
                            .flex()
                            .flex_col()
                            .gap_1()
                            .children(self.entries.into_iter().map(|entry| {
                                div()
                                    .flex()
                                    .items_center()
                                    .gap_3()
                                    .child(
                                        div()
                                            .min_w(px(160.))
                                            .px_2()
                                            .py_px()
                                            .bg(theme.secondary)
                                            .rounded(px(4.))
                                            .text_xs()
                                            .font_weight(FontWeight::MEDIUM)
                                            .text_color(theme.secondary_foreground)
                                            .child(entry.suggestion),
                                    )
                                    .child(
                                        div()
                                            .text_sm()
                                            .text_color(theme.muted_foreground)
                                            .child(entry.description),
                                    )
                            })),
                    ),
            )
    }
}
