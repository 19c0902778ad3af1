//! Isolated body renderer
//!
//! Markup bodies are parsed and re-serialized by html5ever (through
//! `ammonia`), so unbalanced or hostile markup cannot close the surface
//! wrapper. Script-capable elements, event handlers and unknown URL schemes
//! are dropped. The resulting markup is split around `<img>` elements so the
//! external-image policy can be applied per image.

use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::LazyLock;

use ammonia::Builder;
use log::debug;

use super::policy::ExternalImagePolicy;
use super::surface::{ImageElement, RenderTarget, SurfaceNode, url_scheme};
use super::version::BodyKind;

/// Attributes holding a URL
const URL_ATTRIBUTES: &[&str] = &["href", "src", "cite", "longdesc", "background", "action"];

static SANITIZER: LazyLock<Builder<'static>> = LazyLock::new(|| {
    let mut b = Builder::default();

    // Mail relies on embedded stylesheets; they only style the isolated document.
    b.rm_clean_content_tags(&["style"]);
    b.add_tags(&["style", "font", "big"]);

    b.add_generic_attributes(&[
        "style",
        "class",
        "align",
        "valign",
        "bgcolor",
        "width",
        "height",
        "border",
        "cellpadding",
        "cellspacing",
        "dir",
    ]);
    b.add_tag_attributes("font", &["face", "size", "color"]);
    b.add_tag_attributes("img", &["title"]);

    b.add_url_schemes(&["data", "cid"]);

    b.attribute_filter(|element, attribute, value| {
        // Inline style urls would load network resources outside the image policy.
        if attribute == "style" && value.to_ascii_lowercase().contains("url(") {
            return None;
        }
        // data: and cid: only as image sources
        if URL_ATTRIBUTES.contains(&attribute)
            && !(element == "img" && attribute == "src")
            && matches!(url_scheme(value).as_deref(), Some("data" | "cid"))
        {
            return None;
        }
        Some(Cow::Borrowed(value))
    });

    b
});

/// Renders body versions into a [`RenderTarget`]
#[derive(Debug, Clone, Default)]
pub struct IsolatedBodyRenderer {
    /// Capture server base URL; inline parts are served from its `/api/`
    server_url: Option<String>,
}

impl IsolatedBodyRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve server-relative image sources against `server_url`
    pub fn with_server_url(server_url: &str) -> Self {
        Self {
            server_url: Some(server_url.trim_end_matches('/').to_string()),
        }
    }

    /// Replace the surface content with `payload` interpreted as `tag`.
    ///
    /// The previous content is discarded first. External images get their
    /// visibility from `policy`.
    pub fn render(
        &self,
        target: &mut RenderTarget,
        tag: &str,
        payload: &str,
        policy: &ExternalImagePolicy,
    ) {
        target.clear();

        let kind = BodyKind::of(tag);
        let nodes = match kind {
            _ if payload.is_empty() && kind != BodyKind::Unsupported => Vec::new(),
            BodyKind::Text => vec![SurfaceNode::Preformatted(payload.to_string())],
            BodyKind::Markup => self.markup_nodes(payload),
            BodyKind::Unsupported => {
                let mut nodes = vec![SurfaceNode::Notice(format!(
                    "Unsupported body version: {}",
                    tag
                ))];
                if !payload.is_empty() {
                    nodes.push(SurfaceNode::Preformatted(payload.to_string()));
                }
                nodes
            }
        };

        if !target.replace(Some(tag), nodes) {
            debug!(
                "Ignoring {} render for detached surface of message {}",
                tag,
                target.message_id()
            );
            return;
        }

        self.apply_image_policy(target, policy);
    }

    fn markup_nodes(&self, payload: &str) -> Vec<SurfaceNode> {
        let mut nodes = split_images(&sanitize(payload));
        if let Some(server_url) = &self.server_url {
            for node in &mut nodes {
                if let SurfaceNode::Image(image) = node {
                    image.resolve_server_source(server_url);
                }
            }
        }
        nodes
    }

    /// Show an error state (e.g. the server has no such version)
    pub fn render_error(&self, target: &mut RenderTarget, message: &str) {
        target.clear();
        target.replace(None, vec![SurfaceNode::Notice(message.to_string())]);
    }

    /// Re-apply image visibility without re-rendering the body
    pub fn apply_image_policy(&self, target: &mut RenderTarget, policy: &ExternalImagePolicy) {
        let touched = target.set_external_images_visible(policy.display());
        if touched > 0 {
            debug!(
                "{} external image(s) {} for message {}",
                touched,
                if policy.display() { "shown" } else { "hidden" },
                target.message_id()
            );
        }
    }
}

/// Parse and re-serialize markup, dropping anything able to script or escape
pub fn sanitize(html: &str) -> String {
    SANITIZER.clean(html).to_string()
}

/// Split serializer output into markup runs and image elements.
///
/// Relies on html5ever's serialization: text never contains a raw `<`
/// (outside raw-text elements, which are skipped), tag names are lowercase
/// and attribute values are double-quoted.
fn split_images(html: &str) -> Vec<SurfaceNode> {
    let mut nodes = Vec::new();
    let mut markup_start = 0;
    let mut pos = 0;

    while let Some(offset) = html[pos..].find('<') {
        let tag_start = pos + offset;
        let rest = &html[tag_start..];

        if let Some(after) = strip_tag_name(rest, "style") {
            // Raw text: skip to the closing tag
            let body_start = tag_start + (rest.len() - after.len());
            pos = match html[body_start..].find("</style") {
                Some(end) => body_start + end + 1,
                None => html.len(),
            };
            continue;
        }

        let Some(after) = strip_tag_name(rest, "img") else {
            // Attribute values may hold a raw `<`; step over the whole tag
            pos = match other_tag_end(html, tag_start) {
                Some(end) => end,
                None => tag_start + 1,
            };
            continue;
        };

        let attrs_start = tag_start + (rest.len() - after.len());
        let Some((attributes, tag_end)) = parse_attributes(html, attrs_start) else {
            break;
        };

        if markup_start < tag_start {
            nodes.push(SurfaceNode::Markup(html[markup_start..tag_start].to_string()));
        }

        let mut src = None;
        let mut others = Vec::new();
        for (name, value) in attributes {
            if name == "src" {
                src = Some(value);
            } else {
                others.push((name, value));
            }
        }
        nodes.push(SurfaceNode::Image(ImageElement::new(others, src)));

        markup_start = tag_end;
        pos = tag_end;
    }

    if markup_start < html.len() {
        nodes.push(SurfaceNode::Markup(html[markup_start..].to_string()));
    }

    nodes
}

/// If `rest` starts with `<name` followed by a delimiter, return what follows the name
fn strip_tag_name<'a>(rest: &'a str, name: &str) -> Option<&'a str> {
    let after = rest.strip_prefix('<')?;
    let head = after.get(..name.len())?;
    if !head.eq_ignore_ascii_case(name) {
        return None;
    }
    let after = &after[name.len()..];
    match after.chars().next() {
        Some(c) if c.is_ascii_whitespace() || c == '>' || c == '/' => Some(after),
        _ => None,
    }
}

/// End of a start tag other than `<img>`, or `None` if `<` does not open one
fn other_tag_end(html: &str, tag_start: usize) -> Option<usize> {
    let bytes = html.as_bytes();
    let mut i = tag_start + 1;
    if !bytes.get(i)?.is_ascii_alphabetic() {
        return None;
    }
    while i < bytes.len() && bytes[i].is_ascii_alphanumeric() {
        i += 1;
    }
    parse_attributes(html, i).map(|(_, end)| end)
}

/// Parse `name="value"` pairs up to the closing `>`.
///
/// Returns the attributes and the byte index just past the tag.
fn parse_attributes(html: &str, start: usize) -> Option<(Vec<(String, String)>, usize)> {
    let bytes = html.as_bytes();
    let mut attributes = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut i = start;

    loop {
        while i < bytes.len() && (bytes[i].is_ascii_whitespace() || bytes[i] == b'/') {
            i += 1;
        }
        if i >= bytes.len() {
            return None;
        }
        if bytes[i] == b'>' {
            return Some((attributes, i + 1));
        }

        let name_start = i;
        while i < bytes.len()
            && !bytes[i].is_ascii_whitespace()
            && bytes[i] != b'='
            && bytes[i] != b'>'
            && bytes[i] != b'/'
        {
            i += 1;
        }
        let name = html[name_start..i].to_ascii_lowercase();

        let mut value = String::new();
        if i < bytes.len() && bytes[i] == b'=' {
            i += 1;
            let quote = *bytes.get(i)?;
            if quote == b'"' || quote == b'\'' {
                let value_start = i + 1;
                let len = html[value_start..].find(quote as char)?;
                value = html[value_start..value_start + len].to_string();
                i = value_start + len + 1;
            } else {
                let value_start = i;
                while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                    i += 1;
                }
                value = html[value_start..i].to_string();
            }
        }

        if !name.is_empty() && seen.insert(name.clone()) {
            attributes.push((name, value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MessageId;

    fn render(tag: &str, payload: &str, display: bool) -> RenderTarget {
        let mut target = RenderTarget::new(MessageId::new("m1"));
        let mut policy = ExternalImagePolicy::hidden();
        policy.set_display(display);
        IsolatedBodyRenderer::new().render(&mut target, tag, payload, &policy);
        target
    }

    #[test]
    fn test_raw_is_literal_text() {
        let target = render("raw", "Subject: hi\n\n<b>bold</b>", false);
        assert_eq!(
            target.nodes(),
            &[SurfaceNode::Preformatted("Subject: hi\n\n<b>bold</b>".to_string())]
        );
        assert!(target.body_html().contains("&lt;b&gt;bold&lt;/b&gt;"));
    }

    #[test]
    fn test_plain_text_is_literal_text() {
        let target = render("plain-text", "<img src=\"http://x/y.png\">", false);
        assert_eq!(target.images().count(), 0);
        assert!(matches!(target.nodes()[0], SurfaceNode::Preformatted(_)));
    }

    #[test]
    fn test_html_scripts_are_removed() {
        let target = render(
            "html",
            r#"<p onclick="steal()">Hi</p><script>alert(1)</script><a href="javascript:alert(2)">x</a>"#,
            false,
        );
        let html = target.body_html();
        assert!(html.contains("<p>Hi</p>"));
        assert!(!html.contains("script"));
        assert!(!html.contains("onclick"));
        assert!(!html.contains("javascript:"));
    }

    #[test]
    fn test_frames_and_forms_are_removed() {
        let target = render(
            "watch-html",
            r#"<iframe src="https://evil.test"></iframe><form action="https://evil.test"><input name="a"></form><base href="https://evil.test/"><div>ok</div>"#,
            false,
        );
        let html = target.body_html();
        assert!(!html.contains("iframe"));
        assert!(!html.contains("<form"));
        assert!(!html.contains("<base"));
        assert!(html.contains("<div>ok</div>"));
    }

    #[test]
    fn test_malformed_markup_stays_inside_surface() {
        let target = render(
            "html",
            "</div></body></html><div><table><tr><td>cell<script>x()</script>",
            false,
        );
        let doc = target.to_document("");
        assert_eq!(doc.matches("<div class=\"sift-surface\">").count(), 1);
        assert!(doc.ends_with("</div>\n</body>\n</html>"));
        assert!(!doc.contains("x()"));
        let body = target.body_html();
        assert_eq!(body.matches("<div").count(), body.matches("</div>").count());
    }

    #[test]
    fn test_external_images_hidden_by_default() {
        let target = render(
            "html",
            r#"<p>a</p><img src="http://tracker.test/p.gif"><img src="https://cdn.test/logo.png" alt="Logo"><img src="logo.png"><img src="data:image/png;base64,AAAA">"#,
            false,
        );

        let images: Vec<_> = target.images().collect();
        assert_eq!(images.len(), 4);
        assert!(images[0].is_external() && !images[0].is_visible());
        assert!(images[1].is_external() && !images[1].is_visible());
        assert!(!images[2].is_external() && images[2].is_visible());
        assert!(!images[3].is_external() && images[3].is_visible());
        assert_eq!(images[1].attribute("alt"), Some("Logo"));

        let html = target.body_html();
        assert!(!html.contains("src=\"http://tracker.test"));
        assert!(!html.contains("src=\"https://cdn.test"));
        assert!(html.contains("src=\"logo.png\""));
        assert!(html.contains("src=\"data:image/png;base64,AAAA\""));
    }

    #[test]
    fn test_toggle_reapplies_without_rerender() {
        let mut target = render(
            "html",
            r#"<img src="https://cdn.test/a.png"><img src="cid:part1">"#,
            false,
        );
        let before: Vec<SurfaceNode> = target.nodes().to_vec();

        let renderer = IsolatedBodyRenderer::new();
        let mut policy = ExternalImagePolicy::hidden();
        policy.set_display(true);
        renderer.apply_image_policy(&mut target, &policy);

        let images: Vec<_> = target.images().collect();
        assert!(images[0].is_visible());
        assert!(images[1].is_visible());
        assert_eq!(images[1].src(), Some("cid:part1"));
        assert!(target.body_html().contains("src=\"https://cdn.test/a.png\""));

        // Hiding again restores the original node list exactly
        policy.set_display(false);
        renderer.apply_image_policy(&mut target, &policy);
        assert_eq!(target.nodes(), before.as_slice());
    }

    #[test]
    fn test_switching_versions_replaces_everything() {
        let mut target = RenderTarget::new(MessageId::new("m1"));
        let policy = ExternalImagePolicy::hidden();
        let renderer = IsolatedBodyRenderer::new();

        renderer.render(
            &mut target,
            "html",
            r#"<h1>Title</h1><img src="http://x.test/a.png">"#,
            &policy,
        );
        assert!(target.images().count() > 0);

        renderer.render(&mut target, "raw", "raw source", &policy);
        assert_eq!(
            target.nodes(),
            &[SurfaceNode::Preformatted("raw source".to_string())]
        );
        assert_eq!(target.rendered_version(), Some("raw"));
        assert!(!target.body_html().contains("Title"));
    }

    #[test]
    fn test_unknown_version_renders_notice_and_text() {
        let target = render("amp-html", "<amp-img src=x>", false);
        assert_eq!(
            target.nodes(),
            &[
                SurfaceNode::Notice("Unsupported body version: amp-html".to_string()),
                SurfaceNode::Preformatted("<amp-img src=x>".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_payload_renders_empty_surface() {
        assert!(render("html", "", false).is_empty());
        assert!(render("raw", "", false).is_empty());
        assert!(render("plain-text", "", false).is_empty());
    }

    #[test]
    fn test_style_blocks_are_kept() {
        let target = render(
            "html",
            "<style>p { color: red; } /* <img src=x> */</style><p>styled</p>",
            false,
        );
        let html = target.body_html();
        assert!(html.contains("p { color: red; }"));
        assert_eq!(target.images().count(), 0);
    }

    #[test]
    fn test_inline_style_urls_are_dropped() {
        let target = render(
            "html",
            r#"<div style="background: url(http://x.test/bg.png)">a</div><p style="color: red">b</p>"#,
            false,
        );
        let html = target.body_html();
        assert!(!html.contains("x.test"));
        assert!(html.contains("color: red"));
    }

    #[test]
    fn test_render_error_replaces_content() {
        let mut target = render("raw", "body", false);
        IsolatedBodyRenderer::new().render_error(&mut target, "Body not available");
        assert_eq!(
            target.nodes(),
            &[SurfaceNode::Notice("Body not available".to_string())]
        );
    }

    #[test]
    fn test_img_text_inside_attribute_is_not_an_image() {
        let target = render(
            "html",
            r#"<a href="https://site.test" title="<img src=http://evil.test/x onerror=x()>">link</a>"#,
            false,
        );
        assert_eq!(target.images().count(), 0);
        assert!(target.body_html().contains("link</a>"));
    }

    #[test]
    fn test_obfuscated_external_sources_stay_hidden() {
        let target = render(
            "html",
            "<img src=\"ht\ttps://evil.test/track.gif\"><img src=\"\u{1}https://evil.test/track.gif\">",
            false,
        );

        let images: Vec<_> = target.images().collect();
        assert_eq!(images.len(), 2);
        assert!(images.iter().all(|i| i.is_external() && !i.is_visible()));
        assert!(!target.body_html().contains(" src="));
        assert!(!target.content_security_policy().contains("https:"));
    }

    #[test]
    fn test_style_block_urls_blocked_while_images_hidden() {
        let target = render(
            "html",
            "<style>body{background:url(https://evil.test/bg.gif)}</style><p>x</p>",
            false,
        );
        assert!(!target.content_security_policy().contains("https:"));

        let target = render(
            "html",
            "<style>body{background:url(https://evil.test/bg.gif)}</style><p>x</p>",
            true,
        );
        assert!(target.content_security_policy().contains("http: https:"));
    }

    #[test]
    fn test_data_urls_only_kept_on_images() {
        let target = render(
            "html",
            r#"<a href="data:text/html;base64,PHNjcmlwdD5hbGVydCgxKTwvc2NyaXB0Pg==">open</a><a href=" cid:part1">part</a><img src="data:image/gif;base64,R0lGOD" title="data: inline">"#,
            false,
        );
        let html = target.body_html();
        assert!(!html.contains("data:text/html"));
        assert!(!html.contains("cid:part1"));
        assert!(html.contains(">open</a>"));
        assert!(html.contains(r#"src="data:image/gif;base64,R0lGOD""#));
        assert!(html.contains(r#"title="data: inline""#));
    }

    #[test]
    fn test_inline_parts_resolve_against_server() {
        let mut target = RenderTarget::new(MessageId::new("m1"));
        let renderer = IsolatedBodyRenderer::with_server_url("http://localhost:8080/");
        renderer.render(
            &mut target,
            "html",
            r#"<img src="/api/emails/m1/cid/logo@x"><img src="https://cdn.test/a.png">"#,
            &ExternalImagePolicy::hidden(),
        );

        let images: Vec<_> = target.images().collect();
        assert!(!images[0].is_external() && images[0].is_visible());
        assert!(images[1].is_external() && !images[1].is_visible());

        let html = target.body_html();
        assert!(html.contains(r#"src="http://localhost:8080/api/emails/m1/cid/logo@x""#));
        assert!(
            target
                .content_security_policy()
                .ends_with("img-src data: cid: http://localhost:8080")
        );
    }

    #[test]
    fn test_parse_attributes_handles_quoted_gt() {
        let html = r#"<img alt="a > b" src="x.png">tail"#;
        let (attrs, end) = parse_attributes(html, 4).unwrap();
        assert_eq!(attrs[0], ("alt".to_string(), "a > b".to_string()));
        assert_eq!(attrs[1], ("src".to_string(), "x.png".to_string()));
        assert_eq!(&html[end..], "tail");
    }
}
