//! Release dialog - sends a captured message on through a configured relay

use gpui::prelude::*;
use gpui::*;
use gpui_component::button::{Button, ButtonVariants};
use gpui_component::input::{Input, InputState};
use gpui_component::{ActiveTheme, Sizable};
use inspector::{AddressChoice, ApiError, MessageId, RelayDialog, RelayOutcome, RelayRequest};
use log::debug;

use crate::app::SiftApp;
use crate::input::CloseOverlay;

/// Modal form over a [`RelayDialog`]
pub struct RelayDialogView {
    dialog: RelayDialog,
    sender_input: Entity<InputState>,
    recipients_input: Entity<InputState>,
    override_sender: bool,
    override_recipients: bool,
    /// Validation error shown inline, never sent to the server
    form_error: Option<String>,
    app: Option<Entity<SiftApp>>,
    focus_handle: FocusHandle,
}

impl RelayDialogView {
    pub fn new(dialog: RelayDialog, window: &mut Window, cx: &mut Context<Self>) -> Self {
        let sender_input = cx.new(|cx| InputState::new(window, cx).placeholder("sender@example.com"));
        let recipients_input = cx.new(|cx| {
            InputState::new(window, cx).placeholder("one@example.com, two@example.com")
        });

        Self {
            dialog,
            sender_input,
            recipients_input,
            override_sender: false,
            override_recipients: false,
            form_error: None,
            app: None,
            focus_handle: cx.focus_handle(),
        }
    }

    pub fn set_app(&mut self, app: Entity<SiftApp>) {
        self.app = Some(app);
    }

    pub fn focus(&self, window: &mut Window, _cx: &mut Context<Self>) {
        window.focus(&self.focus_handle);
    }

    pub fn message_id(&self) -> &MessageId {
        self.dialog.message_id()
    }

    /// Apply the server's answer; the dialog keeps its inputs on failure
    pub fn finish(&mut self, result: Result<(), ApiError>, cx: &mut Context<Self>) -> RelayOutcome {
        let outcome = self.dialog.finish(result);
        cx.notify();
        outcome
    }

    fn choice(&self, overridden: bool, input: &Entity<InputState>, cx: &App) -> AddressChoice {
        if overridden {
            AddressChoice::Override(input.read(cx).text().to_string())
        } else {
            AddressChoice::Original
        }
    }

    fn release(&mut self, cx: &mut Context<Self>) {
        if self.dialog.is_pending() {
            return;
        }

        let sender = self.choice(self.override_sender, &self.sender_input, cx);
        let recipients = self.choice(self.override_recipients, &self.recipients_input, cx);
        self.dialog.set_sender(sender);
        self.dialog.set_recipients(recipients);

        match self.dialog.submit() {
            Ok(request) => {
                self.form_error = None;
                self.send(request, cx);
            }
            Err(e) => {
                debug!("Release form incomplete: {}", e);
                self.form_error = Some(e.to_string());
            }
        }
        cx.notify();
    }

    fn send(&mut self, request: RelayRequest, cx: &mut Context<Self>) {
        let id = self.dialog.message_id().clone();
        if let Some(app) = &self.app {
            app.update(cx, |app, cx| {
                app.release(id, request, cx);
            });
        }
    }

    fn close(&mut self, cx: &mut Context<Self>) {
        if let Some(app) = &self.app {
            app.update(cx, |app, cx| {
                app.close_relay_dialog(cx);
            });
        }
    }

    fn handle_close(&mut self, _: &CloseOverlay, _window: &mut Window, cx: &mut Context<Self>) {
        self.close(cx);
    }

    fn render_address_row(
        &self,
        id: &'static str,
        label: &'static str,
        original: String,
        overridden: bool,
        input: &Entity<InputState>,
        cx: &mut Context<Self>,
    ) -> impl IntoElement {
        let theme = cx.theme();
        let is_sender = id == "sender";

        div()
            .flex()
            .flex_col()
            .gap_1()
            .child(
                div()
                    .text_xs()
                    .font_weight(FontWeight::MEDIUM)
                    .text_color(theme.muted_foreground)
                    .child(label),
            )
            .child(
                div()
                    .flex()
                    .items_center()
                    .gap_2()
                    .child(
                        Button::new(SharedString::from(format!("{}-original", id)))
                            .label("Original")
                            .small()
                            .when(!overridden, |b| b.primary())
                            .when(overridden, |b| b.ghost())
                            .on_click(cx.listener(move |view, _event, _window, cx| {
                                if is_sender {
                                    view.override_sender = false;
                                } else {
                                    view.override_recipients = false;
                                }
                                cx.notify();
                            })),
                    )
                    .child(
                        Button::new(SharedString::from(format!("{}-override", id)))
                            .label("Other")
                            .small()
                            .when(overridden, |b| b.primary())
                            .when(!overridden, |b| b.ghost())
                            .on_click(cx.listener(move |view, _event, _window, cx| {
                                if is_sender {
                                    view.override_sender = true;
                                } else {
                                    view.override_recipients = true;
                                }
                                cx.notify();
                            })),
                    ),
            )
            .child(if overridden {
                Input::new(input).small().w_full().into_any_element()
            } else {
                div()
                    .text_sm()
                    .text_color(theme.foreground)
                    .text_ellipsis()
                    .child(original)
                    .into_any_element()
            })
    }
}

impl Render for RelayDialogView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        let background = theme.background;
        let border = theme.border;
        let foreground = theme.foreground;
        let muted = theme.muted_foreground;
        let danger = theme.danger;

        let relay_names: Vec<String> = self.dialog.relay_names().to_vec();
        let selected_relay = self.dialog.relay_name().map(str::to_string);
        let is_pending = self.dialog.is_pending();
        let error = self
            .form_error
            .clone()
            .or_else(|| self.dialog.last_error().map(str::to_string));

        let sender_input = self.sender_input.clone();
        let recipients_input = self.recipients_input.clone();
        let sender_row = self.render_address_row(
            "sender",
            "Sender",
            self.dialog.original_sender(),
            self.override_sender,
            &sender_input,
            cx,
        );
        let recipients_row = self.render_address_row(
            "recipients",
            "Recipients",
            self.dialog.original_recipients(),
            self.override_recipients,
            &recipients_input,
            cx,
        );

        div()
            .key_context("Overlay")
            .track_focus(&self.focus_handle)
            .on_action(cx.listener(Self::handle_close))
            .absolute()
            .inset_0()
            .flex()
            .items_center()
            .justify_center()
            .child(div().absolute().inset_0().bg(hsla(0., 0., 0., 0.5)))
            .child(
                div()
                    .relative()
                    .w(px(440.))
                    .bg(background)
                    .border_1()
                    .border_color(border)
                    .rounded_lg()
                    .shadow_lg()
                    .p_4()
                    .flex()
                    .flex_col()
                    .gap_3()
                    .child(
                        div()
                            .pb_3()
                            .border_b_1()
                            .border_color(border)
                            .text_lg()
                            .font_weight(FontWeight::BOLD)
                            .text_color(foreground)
                            .child("Release message"),
                    )
                    // Relay selection
                    .child(
                        div()
                            .flex()
                            .flex_col()
                            .gap_1()
                            .child(
                                div()
                                    .text_xs()
                                    .font_weight(FontWeight::MEDIUM)
                                    .text_color(muted)
                                    .child("Relay"),
                            )
                            .when(relay_names.is_empty(), |el| {
                                el.child(
                                    div()
                                        .text_sm()
                                        .text_color(muted)
                                        .child("No relay configured"),
                                )
                            })
                            .child(div().flex().flex_wrap().gap_1().children(
                                relay_names.into_iter().enumerate().map(|(ix, name)| {
                                    let is_selected = selected_relay.as_deref() == Some(&name);
                                    Button::new(("relay", ix))
                                        .label(name.clone())
                                        .small()
                                        .when(is_selected, |b| b.primary())
                                        .when(!is_selected, |b| b.ghost())
                                        .on_click(cx.listener(move |view, _event, _window, cx| {
                                            view.dialog.select_relay(&name);
                                            cx.notify();
                                        }))
                                }),
                            )),
                    )
                    .child(sender_row)
                    .child(recipients_row)
                    .when_some(error, |el, error| {
                        el.child(div().text_sm().text_color(danger).child(error))
                    })
                    // Footer
                    .child(
                        div()
                            .pt_3()
                            .border_t_1()
                            .border_color(border)
                            .flex()
                            .justify_end()
                            .gap_2()
                            .child(
                                Button::new("relay-cancel")
                                    .label("Close")
                                    .small()
                                    .ghost()
                                    .on_click(cx.listener(|view, _event, _window, cx| {
                                        view.close(cx);
                                    })),
                            )
                            .child(
                                Button::new("relay-submit")
                                    .label(if is_pending { "Releasing..." } else { "Release" })
                                    .small()
                                    .primary()
                                    .loading(is_pending)
                                    .on_click(cx.listener(|view, _event, _window, cx| {
                                        view.release(cx);
                                    })),
                            ),
                    ),
            )
    }
}
