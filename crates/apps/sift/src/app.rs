//! Root application component for the Sift viewer

use gpui::prelude::*;
use gpui::*;
use gpui_component::button::{Button, ButtonVariants};
use gpui_component::webview::WebView;
use gpui_component::{ActiveTheme, Sizable};
use inspector::{
    ApiClient, AttachmentsRequest, BodyOutcome, BodyRequest, EmailListController,
    FilterSyntaxEntry, ListRequest, Mailbox, Message, MessageId, NavigationGuard, RelayDialog,
    RelayOutcome, RelayRequest, ViewerConfig,
};
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use wry::WebViewBuilder;

use crate::components::{FilterHelp, MailboxItem, RelayDialogView, SearchBox, SearchBoxEvent};
use crate::input::{CloseOverlay, FocusSearch, GoBack, Refresh, ShowFilterHelp};
use crate::templates;
use crate::views::{EmailListView, EmailView};

/// How long a notification banner stays up
const NOTIFICATION_TIMEOUT: Duration = Duration::from_secs(4);

/// Root application state
pub struct SiftApp {
    api: Arc<ApiClient>,
    config: ViewerConfig,
    controller: EmailListController,
    /// Mailboxes known to the server
    mailboxes: Vec<Mailbox>,
    /// Name of the mailbox shown in the list, `None` for all messages
    selected_mailbox: Option<String>,
    email_list_view: Entity<EmailListView>,
    email_view: Option<Entity<EmailView>>,
    /// Search box component (created on first render, it needs a window)
    search_box: Option<Entity<SearchBox>>,
    /// Shared WebView holding the body surface (created lazily)
    webview: Option<Entity<WebView>>,
    /// Lets exactly the documents loaded by the viewer through
    navigation: NavigationGuard,
    /// Currently loaded WebView content (to avoid reloading on every render)
    webview_loaded_html: Option<String>,
    /// Document for the open message's surface
    body_html: Option<String>,
    relay_dialog: Option<Entity<RelayDialogView>>,
    /// Relay defaults waiting for a window to build the dialog in
    pending_relay: Option<RelayDialog>,
    filter_help: Option<Vec<FilterSyntaxEntry>>,
    notification: Option<String>,
    notification_seq: u64,
    /// Text to put into the search box on next render
    pending_search_text: Option<String>,
    /// Flag to focus the list on next render
    pending_focus_list: bool,
    /// Flag to focus the message view on next render
    pending_focus_view: bool,
    focus_handle: FocusHandle,
}

impl SiftApp {
    pub fn new(config: ViewerConfig, cx: &mut Context<Self>) -> Self {
        let api = Arc::new(ApiClient::new(&config.server_url, config.request_timeout()));
        info!("Using capture server at {}", api.base_url());

        let controller = EmailListController::with_server_url(api.base_url());
        let email_list_view = cx.new(EmailListView::new);

        Self {
            api,
            config,
            controller,
            mailboxes: Vec::new(),
            selected_mailbox: None,
            email_list_view,
            email_view: None,
            search_box: None,
            webview: None,
            navigation: NavigationGuard::new(),
            webview_loaded_html: None,
            body_html: None,
            relay_dialog: None,
            pending_relay: None,
            filter_help: None,
            notification: None,
            notification_seq: 0,
            pending_search_text: None,
            pending_focus_list: true,
            pending_focus_view: false,
            focus_handle: cx.focus_handle(),
        }
    }

    /// Wire up navigation by setting app handle on child views
    pub fn wire_navigation(&mut self, app_handle: Entity<Self>, cx: &mut Context<Self>) {
        self.email_list_view
            .update(cx, |view, _| view.set_app(app_handle));
    }

    /// First page and mailbox list
    pub fn load_initial(&mut self, cx: &mut Context<Self>) {
        let request = self.controller.refresh();
        self.run_list(request, cx);
        self.load_mailboxes(cx);
    }

    // ---- Listing ----

    /// Run a listing fetch in the background and hand the page to the controller
    fn run_list(&mut self, request: ListRequest, cx: &mut Context<Self>) {
        debug!(
            "Listing page {} for query {:?} (seq {})",
            request.page, request.query, request.seq
        );
        self.email_list_view
            .update(cx, |view, cx| view.set_loading(cx));

        let api = self.api.clone();
        let background = cx.background_executor().clone();
        cx.spawn(async move |this, cx| {
            let fetch = request.clone();
            let result = background
                .spawn(async move { api.list_emails(&fetch.query, fetch.page) })
                .await;

            cx.update(|cx| {
                this.update(cx, |app, cx| {
                    match app.controller.receive_list(&request, result) {
                        Ok(true) => app.push_list(cx),
                        Ok(false) => {}
                        Err(e) => {
                            error!("Failed to list messages: {}", e);
                            let message = format!("Failed to load messages: {}", e.user_message());
                            app.email_list_view
                                .update(cx, |view, cx| view.set_error(message, cx));
                        }
                    }
                    cx.notify();
                })
            })
            .ok();
        })
        .detach();
    }

    fn push_list(&mut self, cx: &mut Context<Self>) {
        let state = self.controller.state();
        let query = state.query().to_string();
        let emails = state.emails().to_vec();
        let pagination = state.pagination().clone();
        info!(
            "Showing {} messages (page {} of {})",
            emails.len(),
            pagination.current_page,
            pagination.total_pages
        );
        self.email_list_view.update(cx, |view, cx| {
            view.set_page(&query, emails, pagination, cx);
        });
    }

    pub fn load_mailboxes(&mut self, cx: &mut Context<Self>) {
        let api = self.api.clone();
        let background = cx.background_executor().clone();
        cx.spawn(async move |this, cx| {
            let result = background.spawn(async move { api.mailboxes() }).await;

            cx.update(|cx| {
                this.update(cx, |app, cx| {
                    match result {
                        Ok(mailboxes) => {
                            debug!("Loaded {} mailboxes", mailboxes.len());
                            app.mailboxes = mailboxes;
                        }
                        Err(e) => warn!("Failed to load mailboxes: {}", e),
                    }
                    cx.notify();
                })
            })
            .ok();
        })
        .detach();
    }

    pub fn refresh(&mut self, cx: &mut Context<Self>) {
        let request = self.controller.refresh();
        self.run_list(request, cx);
        self.load_mailboxes(cx);
    }

    /// Search with the literal text of the search box
    fn submit_query(&mut self, query: &str, cx: &mut Context<Self>) {
        self.close_message(cx);
        self.selected_mailbox = self
            .mailboxes
            .iter()
            .find(|m| m.query() == query.trim())
            .map(|m| m.name.clone());
        let request = self.controller.submit_query(query);
        self.run_list(request, cx);
        self.pending_focus_list = true;
    }

    pub fn select_mailbox(&mut self, mailbox: Mailbox, cx: &mut Context<Self>) {
        self.close_message(cx);
        self.pending_search_text = Some(mailbox.query());
        self.selected_mailbox = Some(mailbox.name.clone());
        let request = self.controller.select_mailbox(&mailbox);
        self.run_list(request, cx);
        self.pending_focus_list = true;
    }

    pub fn show_all(&mut self, cx: &mut Context<Self>) {
        self.close_message(cx);
        self.pending_search_text = Some(String::new());
        self.selected_mailbox = None;
        let request = self.controller.show_all();
        self.run_list(request, cx);
        self.pending_focus_list = true;
    }

    pub fn next_page(&mut self, cx: &mut Context<Self>) {
        if let Some(request) = self.controller.next_page() {
            self.run_list(request, cx);
        }
    }

    pub fn prev_page(&mut self, cx: &mut Context<Self>) {
        if let Some(request) = self.controller.prev_page() {
            self.run_list(request, cx);
        }
    }

    // ---- Message view ----

    /// Open a message: fresh surface, images hidden, default body version
    pub fn open_message(&mut self, message: Message, cx: &mut Context<Self>) {
        info!("Opening message {}", message.id);
        let requests = self.controller.open_message(message);

        let app_handle = cx.entity().clone();
        if let Some(view) = self.controller.view() {
            self.email_view = Some(cx.new(|cx| {
                let mut email_view = EmailView::new(view, cx);
                email_view.set_app(app_handle);
                email_view
            }));
        }
        self.body_html = None;
        self.pending_focus_view = true;

        self.fetch_body(requests.body, cx);
        if let Some(request) = requests.attachments {
            self.fetch_attachments(request, cx);
        }
        cx.notify();
    }

    /// Back to the list
    pub fn close_message(&mut self, cx: &mut Context<Self>) {
        if self.controller.view().is_none() {
            return;
        }
        self.controller.close_message();
        self.after_close(cx);
        self.pending_focus_list = true;
    }

    /// Drop the message pane once the controller has left the message
    fn after_close(&mut self, cx: &mut Context<Self>) {
        if self.controller.view().is_some() {
            return;
        }
        self.email_view = None;
        self.body_html = None;
        self.relay_dialog = None;
        self.pending_relay = None;
        self.hide_webview(cx);
        cx.notify();
    }

    fn fetch_body(&mut self, request: BodyRequest, cx: &mut Context<Self>) {
        let api = self.api.clone();
        let background = cx.background_executor().clone();
        cx.spawn(async move |this, cx| {
            let fetch = request.clone();
            let result = background
                .spawn(async move { api.body(&fetch.message_id, &fetch.version) })
                .await;

            cx.update(|cx| {
                this.update(cx, |app, cx| {
                    if app.controller.receive_body(&request, result) == BodyOutcome::Rendered {
                        app.sync_message_view(cx);
                    }
                })
            })
            .ok();
        })
        .detach();
    }

    fn fetch_attachments(&mut self, request: AttachmentsRequest, cx: &mut Context<Self>) {
        let api = self.api.clone();
        let background = cx.background_executor().clone();
        cx.spawn(async move |this, cx| {
            let id = request.message_id.clone();
            let result = background.spawn(async move { api.attachments(&id) }).await;

            cx.update(|cx| {
                this.update(cx, |app, cx| {
                    if app.controller.receive_attachments(&request, result) {
                        app.sync_message_view(cx);
                    }
                })
            })
            .ok();
        })
        .detach();
    }

    /// Rebuild the body document and header from the controller's open message
    fn sync_message_view(&mut self, cx: &mut Context<Self>) {
        let css = templates::surface_css(cx.theme());
        let Some(view) = self.controller.view() else {
            return;
        };

        self.body_html = (!view.target().is_empty()).then(|| view.target().to_document(&css));
        if let Some(email_view) = &self.email_view {
            email_view.update(cx, |email_view, cx| email_view.sync(view, cx));
        }
        cx.notify();
    }

    pub fn switch_version(&mut self, tag: &str, cx: &mut Context<Self>) {
        match self.controller.switch_version(tag) {
            Ok(request) => {
                debug!("Switching to body version {}", request.version);
                self.sync_message_view(cx);
                self.fetch_body(request, cx);
            }
            Err(e) => {
                warn!("Cannot switch body version: {}", e);
                self.show_notification(e.to_string(), cx);
            }
        }
    }

    pub fn toggle_images(&mut self, cx: &mut Context<Self>) {
        if self.controller.toggle_images() {
            self.sync_message_view(cx);
        }
    }

    pub fn open_attachment(&mut self, attachment_id: &str, cx: &mut Context<Self>) {
        let Some(view) = self.controller.view() else {
            return;
        };
        let url = self.api.attachment_content_url(view.id(), attachment_id);
        info!("Opening attachment {}", url);
        if let Err(e) = open::that(&url) {
            error!("Failed to open attachment: {}", e);
            self.show_notification(format!("Could not open attachment: {}", e), cx);
        }
    }

    // ---- Deletion ----

    pub fn delete_message(&mut self, id: MessageId, cx: &mut Context<Self>) {
        info!("Deleting message {}", id);

        let api = self.api.clone();
        let background = cx.background_executor().clone();
        cx.spawn(async move |this, cx| {
            let target = id.clone();
            let result = background
                .spawn(async move { api.delete_email(&target) })
                .await;

            cx.update(|cx| {
                this.update(cx, |app, cx| {
                    match result {
                        Ok(()) => {
                            let request = app.controller.message_deleted(&id);
                            app.after_close(cx);
                            app.run_list(request, cx);
                            app.show_notification("Message deleted".to_string(), cx);
                        }
                        Err(e) => {
                            error!("Failed to delete message {}: {}", id, e);
                            app.show_notification(e.user_message(), cx);
                        }
                    }
                    cx.notify();
                })
            })
            .ok();
        })
        .detach();
    }

    pub fn delete_all(&mut self, cx: &mut Context<Self>) {
        info!("Deleting all messages");

        let api = self.api.clone();
        let background = cx.background_executor().clone();
        cx.spawn(async move |this, cx| {
            let result = background.spawn(async move { api.delete_all() }).await;

            cx.update(|cx| {
                this.update(cx, |app, cx| {
                    match result {
                        Ok(()) => {
                            let request = app.controller.all_deleted();
                            app.after_close(cx);
                            app.selected_mailbox = None;
                            app.pending_search_text = Some(String::new());
                            app.run_list(request, cx);
                            app.load_mailboxes(cx);
                            app.show_notification("All messages deleted".to_string(), cx);
                        }
                        Err(e) => {
                            error!("Failed to delete all messages: {}", e);
                            app.show_notification(e.user_message(), cx);
                        }
                    }
                    cx.notify();
                })
            })
            .ok();
        })
        .detach();
    }

    // ---- Release ----

    /// Fetch relay defaults and open the release dialog
    pub fn open_relay_dialog(&mut self, id: MessageId, _window: &mut Window, cx: &mut Context<Self>) {
        if self.relay_dialog.is_some() || self.pending_relay.is_some() {
            return;
        }

        let api = self.api.clone();
        let background = cx.background_executor().clone();
        cx.spawn(async move |this, cx| {
            let target = id.clone();
            let result = background.spawn(async move { api.relay_data(&target) }).await;

            cx.update(|cx| {
                this.update(cx, |app, cx| {
                    match result {
                        Ok(data) => {
                            if app.controller.view().is_some_and(|v| v.id() == &id) {
                                app.pending_relay = Some(RelayDialog::new(id, data));
                            }
                        }
                        Err(e) => {
                            error!("Failed to load relay settings: {}", e);
                            app.show_notification(e.user_message(), cx);
                        }
                    }
                    cx.notify();
                })
            })
            .ok();
        })
        .detach();
    }

    pub fn close_relay_dialog(&mut self, cx: &mut Context<Self>) {
        self.relay_dialog = None;
        self.pending_focus_view = true;
        cx.notify();
    }

    /// Send a validated release request
    pub fn release(&mut self, id: MessageId, request: RelayRequest, cx: &mut Context<Self>) {
        info!(
            "Releasing message {} via {} to {} recipients",
            id,
            request.relay_name,
            request.recipients.len()
        );

        let api = self.api.clone();
        let background = cx.background_executor().clone();
        cx.spawn(async move |this, cx| {
            let result = background
                .spawn(async move { api.relay(&id, &request) })
                .await;

            cx.update(|cx| {
                this.update(cx, |app, cx| {
                    let Some(dialog) = app.relay_dialog.clone() else {
                        return;
                    };
                    match dialog.update(cx, |dialog, cx| dialog.finish(result, cx)) {
                        RelayOutcome::Released => {
                            app.close_relay_dialog(cx);
                            app.show_notification("Message released".to_string(), cx);
                        }
                        RelayOutcome::Failed(message) => {
                            warn!("Release failed: {}", message);
                            app.show_notification(message, cx);
                        }
                    }
                })
            })
            .ok();
        })
        .detach();
    }

    // ---- Overlays and notifications ----

    pub fn show_filter_help(&mut self, cx: &mut Context<Self>) {
        let api = self.api.clone();
        let background = cx.background_executor().clone();
        cx.spawn(async move |this, cx| {
            let result = background.spawn(async move { api.filter_syntax() }).await;

            cx.update(|cx| {
                this.update(cx, |app, cx| {
                    match result {
                        Ok(entries) => app.filter_help = Some(entries),
                        Err(e) => {
                            warn!("Failed to load filter syntax: {}", e);
                            app.show_notification(e.user_message(), cx);
                        }
                    }
                    cx.notify();
                })
            })
            .ok();
        })
        .detach();
    }

    /// Show a transient banner; a newer one replaces it
    pub fn show_notification(&mut self, message: String, cx: &mut Context<Self>) {
        self.notification_seq += 1;
        let seq = self.notification_seq;
        self.notification = Some(message);
        cx.notify();

        cx.spawn(async move |this, cx| {
            cx.background_executor().timer(NOTIFICATION_TIMEOUT).await;

            cx.update(|cx| {
                this.update(cx, |app, cx| {
                    if app.notification_seq == seq {
                        app.notification = None;
                        cx.notify();
                    }
                })
            })
            .ok();
        })
        .detach();
    }

    fn has_overlay(&self) -> bool {
        self.relay_dialog.is_some() || self.filter_help.is_some()
    }

    // ---- WebView ----

    /// Get or create the shared WebView
    fn get_or_create_webview(
        &mut self,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> Option<Entity<WebView>> {
        if let Some(ref webview) = self.webview {
            return Some(webview.clone());
        }

        let theme = cx.theme();
        let bg = theme.background.to_rgb();
        let initial_html = templates::blank_html(theme);

        // Only documents generated in-process may load; links never navigate the surface
        let navigation = self.navigation.clone();
        navigation.arm();
        let result = WebViewBuilder::new()
            .with_html(&initial_html)
            .with_background_color((
                (bg.r * 255.0) as u8,
                (bg.g * 255.0) as u8,
                (bg.b * 255.0) as u8,
                255,
            ))
            .with_navigation_handler(move |url: String| {
                let allowed = navigation.allows(&url);
                if !allowed {
                    debug!("Blocked navigation to {}", url);
                }
                allowed
            })
            .build_as_child(window);

        match result {
            Ok(wry_webview) => {
                let webview_entity = cx.new(|cx| WebView::new(wry_webview, window, cx));
                self.webview = Some(webview_entity.clone());
                Some(webview_entity)
            }
            Err(e) => {
                error!("Failed to create WebView: {}", e);
                None
            }
        }
    }

    /// Hide the shared WebView
    pub fn hide_webview(&mut self, cx: &mut Context<Self>) {
        if let Some(ref webview) = self.webview {
            webview.update(cx, |wv, _| {
                wv.hide();
            });
        }
        // Clear loaded content so it will reload when shown again
        self.webview_loaded_html = None;
    }

    // ---- Search box ----

    /// Get or create the search box
    fn get_or_create_search_box(
        &mut self,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> Entity<SearchBox> {
        if let Some(ref search_box) = self.search_box {
            return search_box.clone();
        }

        let api = self.api.clone();
        let blur_grace = self.config.blur_grace();
        let search_box = cx.new(|cx| SearchBox::new(api, blur_grace, window, cx));

        cx.subscribe(&search_box, Self::handle_search_box_event)
            .detach();

        self.search_box = Some(search_box.clone());
        search_box
    }

    fn handle_search_box_event(
        &mut self,
        _: Entity<SearchBox>,
        event: &SearchBoxEvent,
        cx: &mut Context<Self>,
    ) {
        match event {
            SearchBoxEvent::Submitted(query) => {
                self.submit_query(query, cx);
            }
        }
    }

    // ---- Actions ----

    fn handle_focus_search(&mut self, _: &FocusSearch, window: &mut Window, cx: &mut Context<Self>) {
        let search_box = self.get_or_create_search_box(window, cx);
        search_box.update(cx, |view, cx| {
            view.focus(window, cx);
        });
    }

    fn handle_refresh(&mut self, _: &Refresh, _window: &mut Window, cx: &mut Context<Self>) {
        self.refresh(cx);
    }

    fn handle_show_filter_help(
        &mut self,
        _: &ShowFilterHelp,
        _window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        self.show_filter_help(cx);
    }

    fn handle_close_overlay(
        &mut self,
        _: &CloseOverlay,
        _window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        self.filter_help = None;
        self.close_relay_dialog(cx);
    }

    /// Escape: close the topmost overlay, otherwise leave the message
    fn handle_go_back(&mut self, _: &GoBack, _window: &mut Window, cx: &mut Context<Self>) {
        if self.filter_help.take().is_some() {
            cx.notify();
        } else if self.relay_dialog.is_some() {
            self.close_relay_dialog(cx);
        } else {
            self.close_message(cx);
        }
    }

    // ---- Rendering ----

    fn render_sidebar(&self, cx: &mut Context<Self>) -> impl IntoElement + use<> {
        let theme = cx.theme();
        let mailboxes = self.mailboxes.clone();
        let selected = self.selected_mailbox.clone();
        let server_url = self.api.base_url().to_string();

        div()
            .flex()
            .flex_col()
            .h_full()
            // Sidebar header with app branding
            .child(
                div()
                    .pt_8() // Extra top padding for window controls
                    .pb_4()
                    .px_3()
                    .child(
                        div()
                            .flex()
                            .items_center()
                            .gap_2()
                            .child(
                                div()
                                    .text_lg()
                                    .font_weight(FontWeight::BOLD)
                                    .text_color(theme.foreground)
                                    .child("Sift"),
                            )
                            .child(
                                div()
                                    .text_xs()
                                    .text_color(theme.muted_foreground)
                                    .child("Captured mail"),
                            ),
                    ),
            )
            // Mailboxes - fills remaining space
            .child(
                div()
                    .flex()
                    .flex_col()
                    .flex_1()
                    .overflow_y_hidden()
                    .px_2()
                    .py_1()
                    .child(
                        div()
                            .id("mailbox-all")
                            .on_click(cx.listener(|app, _event, _window, cx| {
                                app.show_all(cx);
                            }))
                            .child(MailboxItem::new("All messages", selected.is_none())),
                    )
                    .children(mailboxes.into_iter().map(|mailbox| {
                        let is_selected = selected.as_deref() == Some(mailbox.name.as_str());
                        let name = mailbox.name.clone();

                        div()
                            .id(ElementId::Name(format!("mailbox-{}", name).into()))
                            .on_click(cx.listener(move |app, _event, _window, cx| {
                                app.select_mailbox(mailbox.clone(), cx);
                            }))
                            .child(MailboxItem::new(name, is_selected))
                    })),
            )
            // Sidebar footer with server and refresh
            .child(
                div()
                    .px_3()
                    .py_2()
                    .border_t_1()
                    .border_color(theme.border)
                    .flex()
                    .items_center()
                    .justify_between()
                    .gap_2()
                    .child(
                        div()
                            .text_xs()
                            .text_color(theme.muted_foreground)
                            .text_ellipsis()
                            .child(server_url),
                    )
                    .child(
                        Button::new("refresh-button")
                            .label("Refresh")
                            .small()
                            .ghost()
                            .cursor_pointer()
                            .on_click(cx.listener(|app, _event, _window, cx| {
                                app.refresh(cx);
                            })),
                    ),
            )
    }

    fn render_content(
        &mut self,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> impl IntoElement + use<> {
        let theme = cx.theme();
        let bg = theme.background;
        let muted_fg = theme.muted_foreground;
        let blank = templates::blank_html(theme);

        let Some(email_view) = self.email_view.clone() else {
            return self.email_list_view.clone().into_any_element();
        };

        let Some(webview) = self.get_or_create_webview(window, cx) else {
            return div()
                .flex()
                .flex_col()
                .size_full()
                .bg(bg)
                .child(email_view)
                .child(
                    div()
                        .p_4()
                        .text_sm()
                        .text_color(muted_fg)
                        .child("Message bodies cannot be shown on this system"),
                )
                .into_any_element();
        };

        // The native WebView draws above GPUI content, so overlays hide it
        if self.has_overlay() {
            webview.update(cx, |wv, _| wv.hide());
            self.webview_loaded_html = None;
        } else {
            let html = self.body_html.clone().unwrap_or(blank);
            let needs_reload = self
                .webview_loaded_html
                .as_ref()
                .map(|loaded| loaded != &html)
                .unwrap_or(true);

            if needs_reload {
                debug!("Loading surface into WebView ({} bytes)", html.len());
                let navigation = self.navigation.clone();
                webview.update(cx, |wv, _| {
                    navigation.arm();
                    if let Err(e) = wv.load_html(&html) {
                        error!("Failed to load surface: {}", e);
                    }
                    wv.show();
                });
                self.webview_loaded_html = Some(html);
            }
        }

        // Message header + WebView container
        div()
            .flex()
            .flex_col()
            .size_full()
            .bg(bg)
            .child(email_view) // EmailView renders header only
            .child(
                div()
                    .id("webview-container")
                    .flex_1()
                    .w_full()
                    .min_h_0()
                    .p_4()
                    .child(webview),
            )
            .into_any_element()
    }

    fn render_notification(&self, cx: &mut Context<Self>) -> Option<impl IntoElement + use<>> {
        let theme = cx.theme();
        let message = self.notification.clone()?;

        Some(
            div()
                .absolute()
                .bottom_4()
                .right_4()
                .px_4()
                .py_2()
                .rounded_lg()
                .shadow_lg()
                .border_1()
                .border_color(theme.border)
                .bg(theme.secondary)
                .text_sm()
                .text_color(theme.secondary_foreground)
                .child(message),
        )
    }

    /// Apply work queued for a moment with window access
    fn apply_pending(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        if let Some(text) = self.pending_search_text.take() {
            let search_box = self.get_or_create_search_box(window, cx);
            search_box.update(cx, |view, cx| view.set_query(&text, window, cx));
        }

        if let Some(dialog) = self.pending_relay.take() {
            let app_handle = cx.entity().clone();
            let relay_view = cx.new(|cx| {
                let mut view = RelayDialogView::new(dialog, window, cx);
                view.set_app(app_handle);
                view
            });
            relay_view.update(cx, |view, cx| view.focus(window, cx));
            self.relay_dialog = Some(relay_view);
        } else if self.pending_focus_view {
            self.pending_focus_view = false;
            if let Some(email_view) = &self.email_view {
                email_view.update(cx, |view, cx| view.focus(window, cx));
            }
        } else if self.pending_focus_list {
            self.pending_focus_list = false;
            self.email_list_view
                .update(cx, |view, cx| view.focus(window, cx));
        }
    }
}

impl Render for SiftApp {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        self.apply_pending(window, cx);

        let theme = cx.theme();
        // Clone theme colors upfront to avoid borrow conflicts
        let bg = theme.background;
        let fg = theme.foreground;
        let secondary_bg = theme.secondary;
        let border = theme.border;

        let sidebar = self.render_sidebar(cx);
        let search_box = self.get_or_create_search_box(window, cx);
        let content = self.render_content(window, cx);
        let notification = self.render_notification(cx);
        let filter_help = self.filter_help.clone();
        let relay_dialog = self.relay_dialog.clone();

        div()
            .key_context("SiftApp")
            .track_focus(&self.focus_handle)
            .on_action(cx.listener(Self::handle_focus_search))
            .on_action(cx.listener(Self::handle_refresh))
            .on_action(cx.listener(Self::handle_show_filter_help))
            .on_action(cx.listener(Self::handle_close_overlay))
            .on_action(cx.listener(Self::handle_go_back))
            .relative()
            .flex()
            .flex_row()
            .size_full()
            .bg(bg)
            .text_color(fg)
            // Sidebar
            .child(
                div()
                    .w(px(240.))
                    .h_full()
                    .bg(secondary_bg)
                    .border_r_1()
                    .border_color(border)
                    .child(sidebar),
            )
            // Main content area with header
            .child(
                div()
                    .flex()
                    .flex_col()
                    .flex_1()
                    .overflow_hidden()
                    // Header with search box (right-aligned)
                    .child(
                        div()
                            .w_full()
                            .px_4()
                            .py_2()
                            .border_b_1()
                            .border_color(border)
                            .flex()
                            .justify_end()
                            .items_center()
                            .child(search_box),
                    )
                    .child(div().flex().flex_1().overflow_hidden().child(content)),
            )
            .when_some(filter_help, |el, entries| el.child(FilterHelp::new(entries)))
            .when_some(relay_dialog, |el, dialog| el.child(dialog))
            .children(notification)
    }
}
