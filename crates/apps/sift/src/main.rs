//! Sift - a viewer for messages held by an SMTP capture server
//!
//! This is the main entry point for the Sift application.

use gpui::prelude::*;
use gpui::{Application, WindowOptions, px, size};
use gpui_component::{Theme, ThemeMode, TitleBar};
use inspector::ViewerConfig;
use log::{error, info, warn};

mod app;
mod components;
mod input;
mod templates;
mod views;

use app::SiftApp;

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    // Bootstrap config directory
    if let Err(e) = config::init() {
        error!("Failed to initialize config directory: {}", e);
    }

    let viewer_config = match ViewerConfig::load() {
        Ok(viewer_config) => {
            match ViewerConfig::write_default_if_missing() {
                Ok(Some(path)) => info!("Wrote default configuration to {}", path.display()),
                Ok(None) => {}
                Err(e) => warn!("Failed to write default configuration: {:#}", e),
            }
            viewer_config
        }
        Err(e) => {
            warn!("Invalid viewer configuration, using defaults: {:#}", e);
            if let Some(path) = ViewerConfig::default_config_path() {
                warn!("Configuration is read from {}", path.display());
            }
            ViewerConfig::default()
        }
    };

    Application::new()
        .with_assets(gpui_component_assets::Assets)
        .run(move |cx| {
            // Initialize gpui-component and set dark mode
            gpui_component::init(cx);
            Theme::change(ThemeMode::Dark, None, cx);
            cx.bind_keys(input::bindings());

            let window_options = WindowOptions {
                window_bounds: Some(gpui::WindowBounds::Windowed(gpui::Bounds {
                    origin: gpui::Point::default(),
                    size: size(px(1200.), px(800.)),
                })),
                titlebar: Some(TitleBar::title_bar_options()),
                ..Default::default()
            };

            let result = cx.open_window(window_options, |_window, cx| {
                cx.new(|cx| {
                    let mut app = SiftApp::new(viewer_config, cx);

                    // Wire up navigation by passing app entity to child views
                    let app_handle = cx.entity().clone();
                    app.wire_navigation(app_handle, cx);
                    app.load_initial(cx);

                    app
                })
            });

            match result {
                Ok(_) => info!("Sift started successfully"),
                Err(e) => {
                    error!("Failed to open window: {}", e);
                    cx.quit();
                }
            }
        });
}
