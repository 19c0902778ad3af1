//! Isolated rendering surface for one open message
//!
//! The surface holds the rendered body as a flat list of nodes. Images are
//! kept as separate nodes so the external-image policy can be re-applied
//! without parsing the body again. [`RenderTarget::to_document`] produces the
//! standalone document loaded into the sandboxed webview.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::models::MessageId;

/// Content-Security-Policy shared by every surface document.
///
/// No script, plugin, frame, form or base-URL capability; styles only inline.
/// `img-src` is added per document by [`RenderTarget::content_security_policy`].
pub const SURFACE_CSP: &str = "default-src 'none'; script-src 'none'; object-src 'none'; \
frame-src 'none'; style-src 'unsafe-inline'; font-src data:; base-uri 'none'; form-action 'none'";

/// Image sources that never reach a third party
const LOCAL_IMG_SRC: &str = "data: cid:";

/// Attribute carrying the source of a hidden external image
pub const HIDDEN_SRC_ATTR: &str = "data-external-src";

/// Marker attribute on hidden external images
pub const HIDDEN_MARKER_ATTR: &str = "data-sift-hidden";

/// Simple HTML escape for text content and attribute values
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Drop what a browser ignores before parsing a URL: leading C0 controls
/// and spaces, plus tab and newline characters anywhere
fn normalize_url(url: &str) -> String {
    url.trim_start_matches(|c: char| c <= ' ')
        .chars()
        .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
        .collect()
}

/// Lowercased scheme of a URL as a browser would parse it
pub fn url_scheme(url: &str) -> Option<String> {
    let url = normalize_url(url);
    let (scheme, _) = url.split_once(':')?;
    let mut chars = scheme.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then(|| scheme.to_ascii_lowercase())
}

/// Whether a URL points at a network host (http, https or scheme-relative)
pub fn is_network_url(url: &str) -> bool {
    if let Some(scheme) = url_scheme(url) {
        return matches!(scheme.as_str(), "http" | "https");
    }
    // Browsers read a backslash as a slash in these positions
    let url = normalize_url(url);
    let mut chars = url.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some('/' | '\\'), Some('/' | '\\'))
    )
}

/// Origin (`scheme://host[:port]`) of an absolute http(s) URL
pub fn url_origin(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    Some(parsed.origin().ascii_serialization())
}

/// An `<img>` element of a rendered markup body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageElement {
    /// Attributes other than `src`, values already HTML-escaped
    attributes: Vec<(String, String)>,
    /// Escaped source URL as produced by the sanitizer
    src: Option<String>,
    /// Origin of the capture server when the source was resolved against it
    server_origin: Option<String>,
    external: bool,
    visible: bool,
}

impl ImageElement {
    pub(crate) fn new(attributes: Vec<(String, String)>, src: Option<String>) -> Self {
        let external = src.as_deref().is_some_and(is_network_url);
        Self {
            attributes,
            src,
            server_origin: None,
            external,
            visible: true,
        }
    }

    /// Resolve a server-relative `/api/` source (inline `cid:` parts rewritten
    /// by the capture server) against `server_url`.
    ///
    /// Such images come from the viewer's own server and are not external.
    pub(crate) fn resolve_server_source(&mut self, server_url: &str) {
        let Some(src) = self.src.as_deref() else {
            return;
        };
        if !src.starts_with("/api/") {
            return;
        }
        let Some(origin) = url_origin(server_url) else {
            return;
        };
        self.src = Some(format!(
            "{}{}",
            html_escape(server_url.trim_end_matches('/')),
            src
        ));
        self.server_origin = Some(origin);
        self.external = false;
    }

    pub fn src(&self) -> Option<&str> {
        self.src.as_deref()
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Source is network-absolute and therefore subject to the image policy
    pub fn is_external(&self) -> bool {
        self.external
    }

    /// Capture server origin this image loads from, if it was resolved against it
    pub fn server_origin(&self) -> Option<&str> {
        self.server_origin.as_deref()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    fn write_html(&self, out: &mut String) {
        out.push_str("<img");
        for (name, value) in &self.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(value);
            out.push('"');
        }
        if let Some(src) = &self.src {
            let name = if self.visible { "src" } else { HIDDEN_SRC_ATTR };
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(src);
            out.push('"');
        }
        if !self.visible {
            out.push(' ');
            out.push_str(HIDDEN_MARKER_ATTR);
        }
        out.push('>');
    }
}

/// One node of the surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceNode {
    /// Viewer-generated notice (unsupported version, fetch failure)
    Notice(String),
    /// Literal text shown in a monospace container
    Preformatted(String),
    /// Sanitized markup between images
    Markup(String),
    Image(ImageElement),
}

/// The isolated surface bound to the currently displayed message
#[derive(Debug, Clone)]
pub struct RenderTarget {
    message_id: MessageId,
    nodes: Vec<SurfaceNode>,
    /// Version tag of the current content, if any
    rendered_version: Option<String>,
    /// External images are shown; network image loads are permitted
    network_images: bool,
    detached: bool,
}

impl RenderTarget {
    /// Create an empty surface for a newly opened message
    pub fn new(message_id: MessageId) -> Self {
        Self {
            message_id,
            nodes: Vec::new(),
            rendered_version: None,
            network_images: false,
            detached: false,
        }
    }

    pub fn message_id(&self) -> &MessageId {
        &self.message_id
    }

    pub fn nodes(&self) -> &[SurfaceNode] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn rendered_version(&self) -> Option<&str> {
        self.rendered_version.as_deref()
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }

    /// Every image element on the surface
    pub fn images(&self) -> impl Iterator<Item = &ImageElement> {
        self.nodes.iter().filter_map(|node| match node {
            SurfaceNode::Image(image) => Some(image),
            _ => None,
        })
    }

    /// Drop all content; the surface can no longer be rendered into
    pub fn detach(&mut self) {
        self.clear();
        self.detached = true;
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.rendered_version = None;
        self.network_images = false;
    }

    /// Replace the whole content. Returns false when the surface is detached.
    pub(crate) fn replace(&mut self, version: Option<&str>, nodes: Vec<SurfaceNode>) -> bool {
        if self.detached {
            return false;
        }
        self.nodes = nodes;
        self.rendered_version = version.map(str::to_string);
        true
    }

    /// Set visibility of every external image; returns how many were touched
    pub(crate) fn set_external_images_visible(&mut self, visible: bool) -> usize {
        self.network_images = visible;
        let mut touched = 0;
        for node in &mut self.nodes {
            if let SurfaceNode::Image(image) = node
                && image.external
            {
                image.visible = visible;
                touched += 1;
            }
        }
        touched
    }

    /// Serialize the surface content (without the document wrapper)
    pub fn body_html(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            match node {
                SurfaceNode::Notice(text) => {
                    out.push_str("<div class=\"sift-notice\">");
                    out.push_str(&html_escape(text));
                    out.push_str("</div>");
                }
                SurfaceNode::Preformatted(text) => {
                    out.push_str("<pre class=\"sift-text\">");
                    out.push_str(&html_escape(text));
                    out.push_str("</pre>");
                }
                SurfaceNode::Markup(html) => out.push_str(html),
                SurfaceNode::Image(image) => image.write_html(&mut out),
            }
        }
        out
    }

    /// Policy for the current content. Network image sources are granted only
    /// while external images are shown, so stylesheet `url()`s stay blocked too.
    pub fn content_security_policy(&self) -> String {
        let mut img_src = LOCAL_IMG_SRC.to_string();
        let mut origins: Vec<&str> = self
            .images()
            .filter_map(|image| image.server_origin())
            .collect();
        origins.sort_unstable();
        origins.dedup();
        for origin in origins {
            img_src.push(' ');
            img_src.push_str(origin);
        }
        if self.network_images {
            img_src.push_str(" http: https:");
        }
        format!("{}; img-src {}", SURFACE_CSP, img_src)
    }

    /// Standalone document for the sandboxed webview.
    ///
    /// `styles` is host-provided CSS (theme colors); it is placed before the
    /// surface rules so the hidden-image rule always wins.
    pub fn to_document(&self, styles: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<meta http-equiv="Content-Security-Policy" content="{csp}">
<meta name="referrer" content="no-referrer">
<style>
{styles}
pre.sift-text {{ font-family: ui-monospace, Menlo, Consolas, monospace; white-space: pre-wrap; word-break: break-word; }}
img[{marker}] {{ visibility: hidden !important; }}
</style>
</head>
<body>
<div class="sift-surface">{body}</div>
</body>
</html>"#,
            csp = self.content_security_policy(),
            styles = styles,
            marker = HIDDEN_MARKER_ATTR,
            body = self.body_html(),
        )
    }
}

/// Navigation gate for the webview hosting the surface.
///
/// Each document the viewer loads arms exactly one navigation; everything
/// else (link clicks, redirects, `data:` documents built by mail content) is
/// refused. Clones share the armed state.
#[derive(Debug, Clone, Default)]
pub struct NavigationGuard {
    armed: Arc<AtomicBool>,
}

impl NavigationGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call right before handing a document to the webview
    pub fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }

    /// Decide one navigation; consumes the armed load
    pub fn allows(&self, url: &str) -> bool {
        let armed = self.armed.swap(false, Ordering::SeqCst);
        armed && matches!(url_scheme(url).as_deref(), Some("about" | "data"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_with(src: &str) -> ImageElement {
        ImageElement::new(Vec::new(), Some(src.to_string()))
    }

    fn image(src: &str) -> ImageElement {
        ImageElement::new(
            vec![("alt".to_string(), "logo".to_string())],
            Some(src.to_string()),
        )
    }

    #[test]
    fn test_is_network_url() {
        assert!(is_network_url("http://example.com/a.png"));
        assert!(is_network_url("HTTPS://example.com/a.png"));
        assert!(is_network_url("  https://example.com"));
        assert!(is_network_url("//cdn.example.com/a.png"));
        assert!(!is_network_url("images/a.png"));
        assert!(!is_network_url("/images/a.png"));
        assert!(!is_network_url("data:image/png;base64,AAAA"));
        assert!(!is_network_url("cid:part1@example"));
        assert!(!is_network_url("httpfoo"));
    }

    #[test]
    fn test_network_url_with_ignored_characters() {
        assert!(is_network_url("ht\ttps://evil.test/track.gif"));
        assert!(is_network_url("\u{1}https://evil.test/track.gif"));
        assert!(is_network_url("h\nttp://evil.test/a.gif"));
        assert!(is_network_url("https:evil.test/a.gif"));
        assert!(is_network_url("\\\\evil.test/a.gif"));
        assert!(is_network_url("/\\evil.test/a.gif"));
        assert_eq!(url_scheme("\u{1f}Da\tTA:image/png"), Some("data".to_string()));
        assert_eq!(url_scheme("1x:y"), None);
    }

    #[test]
    fn test_server_source_is_resolved_and_local() {
        let mut image = image("/api/emails/m1/cid/logo@x");
        image.resolve_server_source("http://localhost:8080/");
        assert!(!image.is_external());
        assert_eq!(
            image.src(),
            Some("http://localhost:8080/api/emails/m1/cid/logo@x")
        );
        assert_eq!(image.server_origin(), Some("http://localhost:8080"));

        let mut relative = image_with("images/a.png");
        relative.resolve_server_source("http://localhost:8080");
        assert_eq!(relative.src(), Some("images/a.png"));
        assert_eq!(relative.server_origin(), None);
    }

    #[test]
    fn test_policy_grants_network_images_only_when_shown() {
        let mut server_image = image("/api/emails/m/cid/a");
        server_image.resolve_server_source("http://capture.test:8025");
        let mut target = RenderTarget::new(MessageId::new("m"));
        target.replace(
            Some("html"),
            vec![
                SurfaceNode::Markup(
                    "<style>body{background:url(https://evil.test/bg.gif)}</style>".to_string(),
                ),
                SurfaceNode::Image(server_image),
            ],
        );

        target.set_external_images_visible(false);
        let csp = target.content_security_policy();
        assert!(csp.ends_with("img-src data: cid: http://capture.test:8025"));
        assert!(!csp.contains("https:"));

        target.set_external_images_visible(true);
        let csp = target.content_security_policy();
        assert!(csp.ends_with("img-src data: cid: http://capture.test:8025 http: https:"));
        assert!(target.to_document("").contains(&csp));
    }

    #[test]
    fn test_navigation_guard_allows_one_load() {
        let guard = NavigationGuard::new();
        assert!(!guard.allows("data:text/html;base64,PHNjcmlwdD4="));

        guard.arm();
        let handler = guard.clone();
        assert!(handler.allows("data:text/html;charset=utf-8,<p>x</p>"));
        assert!(!handler.allows("data:text/html;base64,PHNjcmlwdD4="));

        guard.arm();
        assert!(!guard.allows("https://evil.test/"));
        assert!(!guard.allows("about:blank"));

        guard.arm();
        assert!(guard.allows("about:blank"));
    }

    #[test]
    fn test_hidden_image_serializes_without_src() {
        let mut target = RenderTarget::new(MessageId::new("m"));
        target.replace(Some("html"), vec![SurfaceNode::Image(image("http://x/a.png"))]);
        target.set_external_images_visible(false);

        let html = target.body_html();
        assert!(!html.contains(" src="));
        assert!(html.contains("data-external-src=\"http://x/a.png\""));
        assert!(html.contains(HIDDEN_MARKER_ATTR));
        assert!(html.contains("alt=\"logo\""));
    }

    #[test]
    fn test_visible_image_serializes_src() {
        let mut target = RenderTarget::new(MessageId::new("m"));
        target.replace(Some("html"), vec![SurfaceNode::Image(image("http://x/a.png"))]);
        target.set_external_images_visible(true);

        assert_eq!(
            target.body_html(),
            "<img alt=\"logo\" src=\"http://x/a.png\">"
        );
    }

    #[test]
    fn test_detached_target_refuses_content() {
        let mut target = RenderTarget::new(MessageId::new("m"));
        target.replace(Some("raw"), vec![SurfaceNode::Preformatted("x".to_string())]);
        target.detach();

        assert!(target.is_empty());
        assert!(!target.replace(Some("raw"), vec![SurfaceNode::Preformatted("y".to_string())]));
        assert!(target.is_empty());
    }

    #[test]
    fn test_document_carries_csp() {
        let target = RenderTarget::new(MessageId::new("m"));
        let doc = target.to_document("body { color: red; }");
        assert!(doc.contains("Content-Security-Policy"));
        assert!(doc.contains("script-src 'none'"));
        assert!(doc.contains("body { color: red; }"));
        assert!(doc.ends_with("</html>"));
    }

    #[test]
    fn test_text_nodes_are_escaped() {
        let mut target = RenderTarget::new(MessageId::new("m"));
        target.replace(
            Some("raw"),
            vec![
                SurfaceNode::Notice("<b>".to_string()),
                SurfaceNode::Preformatted("<script>x</script>".to_string()),
            ],
        );
        let html = target.body_html();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;x&lt;/script&gt;"));
        assert!(html.contains("&lt;b&gt;"));
    }
}
