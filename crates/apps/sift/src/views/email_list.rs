//! Email list view - one page of captured messages

use gpui::prelude::*;
use gpui::*;
use gpui_component::button::{Button, ButtonVariants};
use gpui_component::scroll::Scrollbar;
use gpui_component::skeleton::Skeleton;
use gpui_component::{
    ActiveTheme, Disableable, IconName, Sizable, VirtualListScrollHandle, v_virtual_list,
};
use inspector::{Message, Pagination};
use std::rc::Rc;

use crate::app::SiftApp;
use crate::components::EmailRow;
use crate::input::{DeleteSelected, MoveDown, MoveUp, NextPage, OpenSelected, PrevPage};

/// Height of each email row (sender, subject, preview + padding)
const EMAIL_ROW_HEIGHT: f32 = 72.0;

/// Paged list of messages pushed in by the app
pub struct EmailListView {
    emails: Vec<Message>,
    pagination: Pagination,
    query: String,
    /// Index of currently selected item for keyboard navigation
    selected_index: Option<usize>,
    is_loading: bool,
    error_message: Option<String>,
    app: Option<Entity<SiftApp>>,
    scroll_handle: VirtualListScrollHandle,
    item_sizes: Rc<Vec<Size<Pixels>>>,
    focus_handle: FocusHandle,
}

impl EmailListView {
    pub fn new(cx: &mut Context<Self>) -> Self {
        Self {
            emails: Vec::new(),
            pagination: Pagination::default(),
            query: String::new(),
            selected_index: None,
            is_loading: true,
            error_message: None,
            app: None,
            scroll_handle: VirtualListScrollHandle::new(),
            item_sizes: Rc::new(Vec::new()),
            focus_handle: cx.focus_handle(),
        }
    }

    /// Focus this view for keyboard input
    pub fn focus(&self, window: &mut Window, _cx: &mut Context<Self>) {
        window.focus(&self.focus_handle);
    }

    /// Set the parent app entity for navigation
    pub fn set_app(&mut self, app: Entity<SiftApp>) {
        self.app = Some(app);
    }

    pub fn set_loading(&mut self, cx: &mut Context<Self>) {
        self.is_loading = true;
        self.error_message = None;
        cx.notify();
    }

    pub fn set_error(&mut self, message: String, cx: &mut Context<Self>) {
        self.is_loading = false;
        self.error_message = Some(message);
        cx.notify();
    }

    /// Show a freshly received page
    pub fn set_page(
        &mut self,
        query: &str,
        emails: Vec<Message>,
        pagination: Pagination,
        cx: &mut Context<Self>,
    ) {
        self.item_sizes = Rc::new(
            emails
                .iter()
                .map(|_| size(px(10000.), px(EMAIL_ROW_HEIGHT)))
                .collect(),
        );
        // Keep the keyboard selection in range of the new page
        self.selected_index = match self.selected_index {
            _ if emails.is_empty() => None,
            Some(i) => Some(i.min(emails.len() - 1)),
            None => None,
        };
        self.emails = emails;
        self.pagination = pagination;
        self.query = query.to_string();
        self.is_loading = false;
        self.error_message = None;
        cx.notify();
    }

    /// Move selection up (previous item)
    fn move_up(&mut self, cx: &mut Context<Self>) {
        if self.emails.is_empty() {
            return;
        }
        let max_index = self.emails.len() - 1;
        let new_index = match self.selected_index.map(|i| i.min(max_index)) {
            Some(i) if i > 0 => i - 1,
            _ => 0,
        };
        self.selected_index = Some(new_index);
        cx.notify();
    }

    /// Move selection down (next item)
    fn move_down(&mut self, cx: &mut Context<Self>) {
        if self.emails.is_empty() {
            return;
        }
        let max_index = self.emails.len() - 1;
        let new_index = match self.selected_index.map(|i| i.min(max_index)) {
            Some(i) if i < max_index => i + 1,
            Some(_) => max_index,
            None => 0,
        };
        self.selected_index = Some(new_index);
        cx.notify();
    }

    fn selected_email(&self) -> Option<Message> {
        self.selected_index
            .and_then(|ix| self.emails.get(ix))
            .cloned()
    }

    fn open_email(&mut self, message: Message, cx: &mut Context<Self>) {
        if let Some(app) = &self.app {
            app.update(cx, |app, cx| {
                app.open_message(message, cx);
            });
        }
    }

    fn with_app(&self, cx: &mut Context<Self>, f: impl FnOnce(&mut SiftApp, &mut Context<SiftApp>)) {
        if let Some(app) = &self.app {
            app.update(cx, f);
        }
    }

    // Action handlers
    fn handle_move_up(&mut self, _: &MoveUp, _window: &mut Window, cx: &mut Context<Self>) {
        self.move_up(cx);
    }

    fn handle_move_down(&mut self, _: &MoveDown, _window: &mut Window, cx: &mut Context<Self>) {
        self.move_down(cx);
    }

    fn handle_open_selected(
        &mut self,
        _: &OpenSelected,
        _window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        if let Some(message) = self.selected_email() {
            self.open_email(message, cx);
        }
    }

    fn handle_delete_selected(
        &mut self,
        _: &DeleteSelected,
        _window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        if let Some(message) = self.selected_email() {
            self.with_app(cx, |app, cx| app.delete_message(message.id, cx));
        }
    }

    fn handle_next_page(&mut self, _: &NextPage, _window: &mut Window, cx: &mut Context<Self>) {
        self.with_app(cx, |app, cx| app.next_page(cx));
    }

    fn handle_prev_page(&mut self, _: &PrevPage, _window: &mut Window, cx: &mut Context<Self>) {
        self.with_app(cx, |app, cx| app.prev_page(cx));
    }

    fn render_header(&self, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        let title = if self.query.is_empty() {
            "All messages".to_string()
        } else {
            self.query.clone()
        };

        let stats_text = format!(
            "{} messages, page {} of {}",
            self.pagination.total_matches,
            self.pagination.current_page,
            self.pagination.total_pages.max(1)
        );
        let is_first = self.pagination.is_first_page;
        let is_last = self.pagination.is_last_page;

        div()
            .w_full()
            .px_4()
            .py_3()
            .bg(theme.background)
            .border_b_1()
            .border_color(theme.border)
            .flex()
            .justify_between()
            .items_center()
            .gap_3()
            .child(
                div()
                    .text_lg()
                    .font_weight(FontWeight::BOLD)
                    .text_color(theme.foreground)
                    .text_ellipsis()
                    .child(title),
            )
            .child(
                div()
                    .flex()
                    .items_center()
                    .gap_1()
                    .flex_shrink_0()
                    .child(
                        div()
                            .text_sm()
                            .text_color(theme.muted_foreground)
                            .mr_2()
                            .child(stats_text),
                    )
                    .child(
                        Button::new("prev-page")
                            .icon(IconName::ChevronLeft)
                            .small()
                            .ghost()
                            .disabled(is_first)
                            .on_click(cx.listener(|view, _event, _window, cx| {
                                view.with_app(cx, |app, cx| app.prev_page(cx));
                            })),
                    )
                    .child(
                        Button::new("next-page")
                            .icon(IconName::ChevronRight)
                            .small()
                            .ghost()
                            .disabled(is_last)
                            .on_click(cx.listener(|view, _event, _window, cx| {
                                view.with_app(cx, |app, cx| app.next_page(cx));
                            })),
                    )
                    .child(
                        Button::new("delete-all")
                            .icon(IconName::Delete)
                            .label("Delete all")
                            .small()
                            .ghost()
                            .disabled(self.emails.is_empty())
                            .on_click(cx.listener(|view, _event, _window, cx| {
                                view.with_app(cx, |app, cx| app.delete_all(cx));
                            })),
                    ),
            )
    }

    fn render_skeleton(&self, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();

        div()
            .flex()
            .flex_col()
            .flex_1()
            .bg(theme.list)
            .children((0..8).map(|_| {
                div()
                    .h(px(EMAIL_ROW_HEIGHT))
                    .w_full()
                    .px_4()
                    .py_2()
                    .flex()
                    .flex_col()
                    .gap_2()
                    .border_b_1()
                    .border_color(theme.border)
                    .child(
                        div()
                            .flex()
                            .gap_3()
                            .child(Skeleton::new().w(px(120.)).h(px(14.)))
                            .child(Skeleton::new().w(px(160.)).h(px(14.))),
                    )
                    .child(Skeleton::new().w(px(320.)).h(px(14.)))
                    .child(Skeleton::new().w(px(240.)).h(px(12.)))
            }))
    }

    fn render_error(&self, message: &str, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();

        div()
            .flex()
            .flex_1()
            .justify_center()
            .items_center()
            .p_4()
            .child(
                div()
                    .p_4()
                    .bg(theme.danger)
                    .rounded_lg()
                    .border_1()
                    .border_color(theme.danger)
                    .child(
                        div()
                            .text_sm()
                            .text_color(theme.danger_foreground)
                            .child(message.to_string()),
                    ),
            )
    }

    fn render_empty(&self, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        let hint = if self.query.is_empty() {
            "Messages sent to the capture server appear here"
        } else {
            "No messages match this search"
        };

        div().flex().flex_1().justify_center().items_center().child(
            div()
                .flex()
                .flex_col()
                .items_center()
                .gap_2()
                .child(
                    div()
                        .text_sm()
                        .text_color(theme.muted_foreground)
                        .child("No messages"),
                )
                .child(div().text_xs().text_color(theme.muted_foreground).child(hint)),
        )
    }

    fn render_email_list(&self, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        let selected_index = self.selected_index;

        div()
            .relative()
            .flex()
            .flex_col()
            .flex_1()
            .overflow_hidden()
            .bg(theme.list)
            .child(
                v_virtual_list(
                    cx.entity().clone(),
                    "email-list",
                    self.item_sizes.clone(),
                    move |view, visible_range, _window, cx| {
                        visible_range
                            .filter_map(|ix| view.emails.get(ix).cloned().map(|m| (ix, m)))
                            .map(|(ix, message)| {
                                let is_selected = selected_index == Some(ix);
                                let id = message.id.clone();
                                let row = EmailRow::new(message.clone(), is_selected);

                                div()
                                    .id(ElementId::Name(id.0.into()))
                                    .h(px(EMAIL_ROW_HEIGHT))
                                    .w_full()
                                    .cursor_pointer()
                                    .on_click(cx.listener(move |view, _event, _window, cx| {
                                        view.selected_index = Some(ix);
                                        view.open_email(message.clone(), cx);
                                    }))
                                    .child(row)
                            })
                            .collect()
                    },
                )
                .flex_1()
                .track_scroll(&self.scroll_handle),
            )
            .child(Scrollbar::vertical(&self.scroll_handle))
    }
}

impl Render for EmailListView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();

        div()
            .key_context("EmailListView")
            .track_focus(&self.focus_handle)
            .on_action(cx.listener(Self::handle_move_up))
            .on_action(cx.listener(Self::handle_move_down))
            .on_action(cx.listener(Self::handle_open_selected))
            .on_action(cx.listener(Self::handle_delete_selected))
            .on_action(cx.listener(Self::handle_next_page))
            .on_action(cx.listener(Self::handle_prev_page))
            .flex()
            .flex_col()
            .size_full()
            .bg(theme.background)
            .child(self.render_header(cx))
            .child(if self.is_loading {
                self.render_skeleton(cx).into_any_element()
            } else if let Some(error) = self.error_message.clone() {
                self.render_error(&error, cx).into_any_element()
            } else if self.emails.is_empty() {
                self.render_empty(cx).into_any_element()
            } else {
                self.render_email_list(cx).into_any_element()
            })
    }
}
