//! Search box component with inline filter completion

use gpui::prelude::*;
use gpui::*;
use gpui_component::input::{Input, InputEvent, InputState};
use gpui_component::{ActiveTheme, Icon, IconName, Sizable};
use inspector::{ApiClient, AutocompleteInput, GhostText, KeyOutcome};
use log::debug;
use std::sync::Arc;
use std::time::Duration;

/// Events emitted by the SearchBox
pub enum SearchBoxEvent {
    /// Enter pressed - search with the literal input text
    Submitted(String),
}

impl EventEmitter<SearchBoxEvent> for SearchBox {}

/// Search box with ghost-text completion of filter tokens
pub struct SearchBox {
    input_state: Entity<InputState>,
    focus_handle: FocusHandle,
    input: AutocompleteInput,
    api: Arc<ApiClient>,
    #[allow(dead_code)]
    input_subscription: Subscription,
    /// Caret moves notify the input without a change event
    #[allow(dead_code)]
    caret_subscription: Subscription,
}

impl SearchBox {
    pub fn new(
        api: Arc<ApiClient>,
        blur_grace: Duration,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> Self {
        let input_state = cx.new(|cx| {
            InputState::new(window, cx).placeholder("Search (from:, subject:, mailbox:, has:...)")
        });

        let input_subscription = cx.subscribe(&input_state, Self::on_input_event);
        let caret_subscription = cx.observe(&input_state, |this, _, cx| this.on_input_change(cx));

        Self {
            input_state,
            focus_handle: cx.focus_handle(),
            input: AutocompleteInput::new(blur_grace),
            api,
            input_subscription,
            caret_subscription,
        }
    }

    fn on_input_event(
        &mut self,
        _: Entity<InputState>,
        event: &InputEvent,
        cx: &mut Context<Self>,
    ) {
        match event {
            InputEvent::Change => {
                self.on_input_change(cx);
            }
            InputEvent::PressEnter { .. } => {
                self.input.submit();
                cx.emit(SearchBoxEvent::Submitted(self.input.text().to_string()));
                cx.notify();
            }
            InputEvent::Focus => {
                self.input.focus();
            }
            InputEvent::Blur => {
                self.on_blur(cx);
            }
            _ => {}
        }
    }

    /// Get the current query text
    pub fn query(&self) -> &str {
        self.input.text()
    }

    /// Replace the query text without looking up suggestions
    pub fn set_query(&mut self, query: &str, window: &mut Window, cx: &mut Context<Self>) {
        self.input.set_text(query);
        let value = query.to_string();
        self.input_state.update(cx, |state, cx| {
            state.set_value(value, window, cx);
        });
        cx.notify();
    }

    /// Focus the search box
    pub fn focus(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        self.input_state.update(cx, |state, cx| {
            state.focus(window, cx);
        });
    }

    /// Issue a suggestion lookup for the token before the caret
    fn on_input_change(&mut self, cx: &mut Context<Self>) {
        let (text, caret) = {
            let state = self.input_state.read(cx);
            (state.text().to_string(), state.cursor())
        };

        // Programmatic updates (accept, set_query) are already applied
        if !self.input.differs(&text, caret) {
            return;
        }

        let Some(pending) = self.input.edit(text, caret) else {
            cx.notify();
            return;
        };
        cx.notify();

        let api = self.api.clone();
        let background = cx.background_executor().clone();
        cx.spawn(async move |this, cx| {
            let resolved = background
                .spawn(async move { pending.resolve(api.as_ref()) })
                .await;

            let _ = cx.update(|cx| {
                let _ = this.update(cx, |view, cx| {
                    let outcome = view.input.apply(resolved);
                    debug!("Suggestion lookup applied: {:?}", outcome);
                    cx.notify();
                });
            });
        })
        .detach();
    }

    /// Clear the suggestion once the grace delay passes without refocus
    fn on_blur(&mut self, cx: &mut Context<Self>) {
        let ticket = self.input.blur();
        let grace = self.input.blur_grace();

        cx.spawn(async move |this, cx| {
            cx.background_executor().timer(grace).await;

            let _ = cx.update(|cx| {
                let _ = this.update(cx, |view, cx| {
                    if view.input.blur_elapsed(ticket) {
                        cx.notify();
                    }
                });
            });
        })
        .detach();
    }

    /// Take the suggestion as the new input
    fn accept_suggestion(&mut self, window: &mut Window, cx: &mut Context<Self>) -> KeyOutcome {
        let outcome = self.input.accept();
        if outcome == KeyOutcome::Handled {
            let value = self.input.text().to_string();
            self.input_state.update(cx, |state, cx| {
                state.set_value(value, window, cx);
            });
            cx.notify();
        }
        outcome
    }

    fn handle_accept(
        &mut self,
        _: &AcceptSuggestion,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        if self.accept_suggestion(window, cx) == KeyOutcome::Propagate {
            cx.propagate();
        }
    }

    /// Clicking the ghost text accepts it; runs inside the blur grace delay
    fn handle_ghost_click(
        &mut self,
        _: &MouseDownEvent,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        if self.accept_suggestion(window, cx) == KeyOutcome::Handled {
            self.focus(window, cx);
        }
    }

    fn handle_dismiss(
        &mut self,
        _: &DismissSuggestion,
        _window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        match self.input.dismiss() {
            KeyOutcome::Handled => cx.notify(),
            KeyOutcome::Propagate => cx.propagate(),
        }
    }
}

impl Render for SearchBox {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        let has_text = !self.input.text().is_empty();
        let ghost = self.input.ghost_text().map(|ghost| match ghost {
            GhostText::Completion(rest) => rest.to_string(),
            GhostText::Replacement(query) => format!("→ {}", query),
        });

        div()
            .track_focus(&self.focus_handle)
            .key_context("SearchBox")
            .on_action(cx.listener(Self::handle_accept))
            .on_action(cx.listener(Self::handle_dismiss))
            .flex()
            .items_center()
            .w(px(420.))
            .gap_1()
            // Search icon
            .child(
                Icon::new(IconName::Search)
                    .small()
                    .text_color(theme.muted_foreground),
            )
            // Input field - using gpui-component Input
            .child(
                Input::new(&self.input_state)
                    .appearance(false)
                    .cleanable(true)
                    .w_full(),
            )
            // Ghost completion, accepted with Tab
            .when_some(ghost, |el, ghost| {
                el.child(
                    div()
                        .flex()
                        .items_center()
                        .gap_1()
                        .flex_shrink_0()
                        .cursor_pointer()
                        .on_mouse_down(MouseButton::Left, cx.listener(Self::handle_ghost_click))
                        .child(
                            div()
                                .text_sm()
                                .text_color(theme.muted_foreground)
                                .child(ghost),
                        )
                        .child(
                            div().px_1().py_px().rounded(px(4.)).bg(theme.border).child(
                                div()
                                    .text_xs()
                                    .text_color(theme.muted_foreground)
                                    .child("Tab"),
                            ),
                        ),
                )
            })
            // Keyboard shortcut hint (when empty)
            .when(!has_text, |el| {
                el.child(
                    div().px_1().py_px().rounded(px(4.)).bg(theme.border).child(
                        div()
                            .text_xs()
                            .text_color(theme.muted_foreground)
                            .child("/"),
                    ),
                )
            })
    }
}

// Actions for keyboard handling
actions!(search_box, [AcceptSuggestion, DismissSuggestion]);
