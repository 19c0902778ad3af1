//! Email view - header and controls of the open message
//!
//! The parent SiftApp manages the WebView holding the body surface.
//! EmailView renders the header only and the app composes the WebView below it.

use gpui::prelude::*;
use gpui::*;
use gpui_component::button::{Button, ButtonVariants};
use gpui_component::{ActiveTheme, Icon, IconName, Sizable, Size as ComponentSize};
use inspector::{Attachment, Message, MessageView, display_addresses};

use crate::app::SiftApp;
use crate::input::{Release, ToggleImages};

pub struct EmailView {
    message: Message,
    versions: Vec<String>,
    selected_version: String,
    images_shown: bool,
    external_images: usize,
    /// `None` until the listing arrives
    attachments: Option<Vec<Attachment>>,
    app: Option<Entity<SiftApp>>,
    focus_handle: FocusHandle,
}

impl EmailView {
    pub fn new(view: &MessageView, cx: &mut Context<Self>) -> Self {
        let mut this = Self {
            message: view.message().clone(),
            versions: Vec::new(),
            selected_version: String::new(),
            images_shown: false,
            external_images: 0,
            attachments: None,
            app: None,
            focus_handle: cx.focus_handle(),
        };
        this.sync(view, cx);
        this
    }

    /// Focus this view for keyboard input
    pub fn focus(&self, window: &mut Window, _cx: &mut Context<Self>) {
        window.focus(&self.focus_handle);
    }

    /// Set the parent app entity for navigation
    pub fn set_app(&mut self, app: Entity<SiftApp>) {
        self.app = Some(app);
    }

    /// Copy the display state of the open message
    pub fn sync(&mut self, view: &MessageView, cx: &mut Context<Self>) {
        self.versions = view
            .selector()
            .available()
            .iter()
            .map(str::to_string)
            .collect();
        self.selected_version = view.selected_version().to_string();
        self.images_shown = view.policy().display();
        self.external_images = view
            .target()
            .images()
            .filter(|image| image.is_external())
            .count();
        self.attachments = view.attachments().map(<[Attachment]>::to_vec);
        cx.notify();
    }

    fn with_app(&self, cx: &mut Context<Self>, f: impl FnOnce(&mut SiftApp, &mut Context<SiftApp>)) {
        if let Some(app) = &self.app {
            app.update(cx, f);
        }
    }

    fn handle_toggle_images(
        &mut self,
        _: &ToggleImages,
        _window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        self.with_app(cx, |app, cx| app.toggle_images(cx));
    }

    fn handle_release(&mut self, _: &Release, window: &mut Window, cx: &mut Context<Self>) {
        let id = self.message.id.clone();
        if let Some(app) = &self.app {
            app.update(cx, |app, cx| app.open_relay_dialog(id, window, cx));
        }
    }

    fn render_header(&self, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        let subject = if self.message.subject.is_empty() {
            "(no subject)".to_string()
        } else {
            self.message.subject.clone()
        };
        let date = self
            .message
            .date
            .with_timezone(&chrono::Local)
            .format("%a, %b %d %Y %H:%M")
            .to_string();
        let id = self.message.id.clone();

        div()
            .w_full()
            .px_4()
            .py_3()
            .bg(theme.background)
            .border_b_1()
            .border_color(theme.border)
            .flex()
            .items_center()
            .gap_3()
            // Back button with icon
            .child(
                Button::new("back-button")
                    .icon(
                        Icon::new(IconName::ArrowLeft)
                            .with_size(ComponentSize::Small)
                            .text_color(theme.foreground),
                    )
                    .ghost()
                    .cursor_pointer()
                    .on_click(cx.listener(|view, _event, _window, cx| {
                        view.with_app(cx, |app, cx| app.close_message(cx));
                    })),
            )
            .child(
                div()
                    .flex()
                    .flex_col()
                    .flex_1()
                    .overflow_hidden()
                    .child(
                        div()
                            .text_lg()
                            .font_weight(FontWeight::BOLD)
                            .text_color(theme.foreground)
                            .text_ellipsis()
                            .child(subject),
                    )
                    .child(
                        div()
                            .text_xs()
                            .text_color(theme.muted_foreground)
                            .child(date),
                    ),
            )
            .child(
                div()
                    .flex()
                    .items_center()
                    .gap_1()
                    .child(
                        Button::new("release-button")
                            .icon(
                                Icon::new(IconName::ExternalLink)
                                    .with_size(ComponentSize::Small)
                                    .text_color(theme.muted_foreground),
                            )
                            .label("Release")
                            .small()
                            .ghost()
                            .cursor_pointer()
                            .on_click(cx.listener(|view, _event, window, cx| {
                                view.handle_release(&Release, window, cx);
                            })),
                    )
                    .child(
                        Button::new("delete-button")
                            .icon(
                                Icon::new(IconName::Delete)
                                    .with_size(ComponentSize::Small)
                                    .text_color(theme.muted_foreground),
                            )
                            .ghost()
                            .cursor_pointer()
                            .on_click(cx.listener(move |view, _event, _window, cx| {
                                let id = id.clone();
                                view.with_app(cx, |app, cx| app.delete_message(id, cx));
                            })),
                    ),
            )
    }

    fn render_addresses(&self, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        let row = |label: &'static str, value: String| {
            div()
                .flex()
                .gap_2()
                .text_sm()
                .child(
                    div()
                        .w(px(48.))
                        .flex_shrink_0()
                        .text_color(theme.muted_foreground)
                        .child(label),
                )
                .child(div().text_color(theme.foreground).child(value))
        };

        div()
            .px_4()
            .py_2()
            .flex()
            .flex_col()
            .gap_1()
            .border_b_1()
            .border_color(theme.border)
            .child(row("From", self.message.from.display()))
            .child(row("To", display_addresses(&self.message.to)))
            .when(!self.message.cc.is_empty(), |el| {
                el.child(row("Cc", display_addresses(&self.message.cc)))
            })
    }

    /// Version tabs and the external image toggle
    fn render_toolbar(&self, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        let images_shown = self.images_shown;
        let images_label = if images_shown {
            "Hide external images".to_string()
        } else if self.external_images > 0 {
            format!("Show external images ({})", self.external_images)
        } else {
            "Show external images".to_string()
        };

        div()
            .px_4()
            .py_2()
            .flex()
            .items_center()
            .justify_between()
            .border_b_1()
            .border_color(theme.border)
            .child(
                div().flex().items_center().gap_1().children(
                    self.versions.iter().enumerate().map(|(ix, tag)| {
                        let is_selected = *tag == self.selected_version;
                        let tag = tag.clone();
                        Button::new(("version", ix))
                            .label(tag.to_uppercase())
                            .small()
                            .when(is_selected, |b| b.primary())
                            .when(!is_selected, |b| b.ghost())
                            .on_click(cx.listener(move |view, _event, _window, cx| {
                                let tag = tag.clone();
                                view.with_app(cx, |app, cx| app.switch_version(&tag, cx));
                            }))
                    }),
                ),
            )
            .child(
                Button::new("images-toggle")
                    .icon(if images_shown {
                        IconName::EyeOff
                    } else {
                        IconName::Eye
                    })
                    .label(images_label)
                    .small()
                    .ghost()
                    .on_click(cx.listener(|view, _event, _window, cx| {
                        view.with_app(cx, |app, cx| app.toggle_images(cx));
                    })),
            )
    }

    fn render_attachments(&self, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        let attachments = self.attachments.clone().unwrap_or_default();

        div()
            .px_4()
            .py_2()
            .flex()
            .flex_wrap()
            .gap_1()
            .border_b_1()
            .border_color(theme.border)
            .children(attachments.into_iter().enumerate().map(|(ix, attachment)| {
                let label = format!("{} ({})", attachment.filename, attachment.size_label());
                let attachment_id = attachment.id.clone();
                Button::new(("attachment", ix))
                    .icon(IconName::File)
                    .label(label)
                    .small()
                    .ghost()
                    .on_click(cx.listener(move |view, _event, _window, cx| {
                        let attachment_id = attachment_id.clone();
                        view.with_app(cx, |app, cx| app.open_attachment(&attachment_id, cx));
                    }))
            }))
    }
}

impl Render for EmailView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let has_attachments = self
            .attachments
            .as_ref()
            .is_some_and(|attachments| !attachments.is_empty());

        // Escape is handled at SiftApp level via GoBack
        div()
            .key_context("EmailView")
            .track_focus(&self.focus_handle)
            .on_action(cx.listener(Self::handle_toggle_images))
            .on_action(cx.listener(Self::handle_release))
            .flex()
            .flex_col()
            .child(self.render_header(cx))
            .child(self.render_addresses(cx))
            .when(has_attachments, |el| el.child(self.render_attachments(cx)))
            .child(self.render_toolbar(cx))
    }
}
