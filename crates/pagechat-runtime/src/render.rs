//! Markup rendering and the typewriter animation for assistant replies.

use std::time::Duration;

use futures::Stream;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Delay between revealed characters.
pub const TYPING_INTERVAL: Duration = Duration::from_millis(30);

static FENCED_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```[\w+-]*\n?(.*?)```").unwrap());
static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
static ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*([^*\n]+?)\*").unwrap());
static INLINE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`\n]+?)`").unwrap());
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

/// An assistant message ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedMessage {
    pub html: String,
    /// Text content of `html`, what the typewriter reveals.
    pub plain: String,
}

impl RenderedMessage {
    pub fn new(text: &str) -> Self {
        let html = render_markup(text);
        let plain = plain_text(&html);
        Self { html, plain }
    }
}

/// One step of the typewriter animation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "camelCase")]
pub enum TypingFrame {
    Partial(String),
    Complete(String),
}

/// Escape the HTML metacharacters in `text`.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn render_inline(text: &str) -> String {
    let out = INLINE_CODE.replace_all(text, "<code>$1</code>");
    let out = BOLD.replace_all(&out, "<strong>$1</strong>");
    let out = ITALIC.replace_all(&out, "<em>$1</em>");
    out.replace('\n', "<br>")
}

/// Escape `text`, then convert the markdown subset the panel understands
/// (bold, italic, inline code, fenced code blocks, line breaks) to HTML.
pub fn render_markup(text: &str) -> String {
    let escaped = escape_html(text);
    let mut html = String::with_capacity(escaped.len());
    let mut last = 0;

    for caps in FENCED_CODE.captures_iter(&escaped) {
        let (Some(block), Some(code)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        html.push_str(&render_inline(&escaped[last..block.start()]));
        html.push_str("<pre><code>");
        html.push_str(code.as_str());
        html.push_str("</code></pre>");
        last = block.end();
    }
    html.push_str(&render_inline(&escaped[last..]));
    html
}

/// Text content of rendered HTML.
pub fn plain_text(html: &str) -> String {
    let text = html.replace("<br>", "\n");
    TAG.replace_all(&text, "")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

/// Reveal `message` one character per `interval`, then yield its HTML.
pub fn typewriter(
    message: RenderedMessage,
    interval: Duration,
) -> impl Stream<Item = TypingFrame> + Send + 'static {
    async_stream::stream! {
        let mut shown = String::with_capacity(message.plain.len());
        for ch in message.plain.chars() {
            tokio::time::sleep(interval).await;
            shown.push(ch);
            yield TypingFrame::Partial(shown.clone());
        }
        yield TypingFrame::Complete(message.html);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[test]
    fn test_inline_markup() {
        assert_eq!(
            render_markup("**bold** and *it* with `x`\nnext"),
            "<strong>bold</strong> and <em>it</em> with <code>x</code><br>next"
        );
    }

    #[test]
    fn test_escapes_before_formatting() {
        assert_eq!(
            render_markup("<script>alert(1)</script> **ok**"),
            "&lt;script&gt;alert(1)&lt;/script&gt; <strong>ok</strong>"
        );
    }

    #[test]
    fn test_fenced_code_keeps_newlines() {
        let html = render_markup("Run:\n```rust\nfn main() {}\nlet a = 1;\n```\ndone");
        assert_eq!(
            html,
            "Run:<br><pre><code>fn main() {}\nlet a = 1;\n</code></pre><br>done"
        );
    }

    #[test]
    fn test_plain_text() {
        let message = RenderedMessage::new("**a** < b\nc");
        assert_eq!(message.plain, "a < b\nc");
    }

    #[tokio::test]
    async fn test_typewriter_frames() {
        let message = RenderedMessage::new("**hi**");
        let frames: Vec<TypingFrame> = typewriter(message, Duration::from_millis(1))
            .collect()
            .await;
        assert_eq!(
            frames,
            vec![
                TypingFrame::Partial("h".into()),
                TypingFrame::Partial("hi".into()),
                TypingFrame::Complete("<strong>hi</strong>".into()),
            ]
        );
    }
}
