//! Stylesheets and documents for the body WebView
//!
//! The surface document itself is produced by the inspector crate; this
//! module only supplies the theme-dependent CSS placed in its head.

use gpui_component::theme::Theme;

/// Convert HSLA color to CSS hex string
fn hsla_to_hex(color: gpui::Hsla) -> String {
    let rgba = color.to_rgb();
    format!(
        "#{:02x}{:02x}{:02x}",
        (rgba.r * 255.0) as u8,
        (rgba.g * 255.0) as u8,
        (rgba.b * 255.0) as u8
    )
}

/// Theme colors extracted for CSS usage
struct ThemeColors {
    background: String,
    foreground: String,
    secondary: String,
    border: String,
    muted_foreground: String,
    link: String,
    warning: String,
}

impl ThemeColors {
    fn from_theme(theme: &Theme) -> Self {
        Self {
            background: hsla_to_hex(theme.background),
            foreground: hsla_to_hex(theme.foreground),
            secondary: hsla_to_hex(theme.secondary),
            border: hsla_to_hex(theme.border),
            muted_foreground: hsla_to_hex(theme.muted_foreground),
            link: hsla_to_hex(theme.link),
            warning: hsla_to_hex(theme.warning),
        }
    }
}

/// CSS for the page chrome around the message body
fn base_styles(colors: &ThemeColors) -> String {
    format!(
        r#"* {{ box-sizing: border-box; }}
html, body {{
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, sans-serif;
    background: {bg};
    color: {fg};
    margin: 0;
    padding: 0;
    line-height: 1.5;
}}
::-webkit-scrollbar {{ width: 8px; height: 8px; }}
::-webkit-scrollbar-track {{ background: {bg}; }}
::-webkit-scrollbar-thumb {{ background: {border}; border-radius: 4px; }}
::-webkit-scrollbar-thumb:hover {{ background: {muted}; }}"#,
        bg = colors.background,
        fg = colors.foreground,
        border = colors.border,
        muted = colors.muted_foreground,
    )
}

/// CSS for the surface wrapper and the viewer's own nodes
fn surface_styles(colors: &ThemeColors) -> String {
    format!(
        r#".sift-surface {{
    background: {card_bg};
    border: 1px solid {border};
    border-radius: 8px;
    padding: 16px;
    overflow: auto;
}}
.sift-surface img {{ max-width: 100%; height: auto; }}
.sift-surface a {{ color: {link}; }}
pre.sift-text {{ margin: 0; font-size: 13px; line-height: 1.6; }}
.sift-notice {{
    border-left: 3px solid {warning};
    padding: 8px 12px;
    margin-bottom: 12px;
    font-size: 13px;
    color: {muted};
}}"#,
        card_bg = colors.secondary,
        border = colors.border,
        link = colors.link,
        warning = colors.warning,
        muted = colors.muted_foreground,
    )
}

/// Theme stylesheet passed to `RenderTarget::to_document`
pub fn surface_css(theme: &Theme) -> String {
    let colors = ThemeColors::from_theme(theme);
    format!("{}\n{}", base_styles(&colors), surface_styles(&colors))
}

/// Empty page shown before the first body arrives
pub fn blank_html(theme: &Theme) -> String {
    let colors = ThemeColors::from_theme(theme);
    format!(
        "<html><head><style>html,body{{margin:0;padding:0;background:{};}}</style></head><body></body></html>",
        colors.background
    )
}
