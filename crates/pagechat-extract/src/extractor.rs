//! DOM reduction: denylist removal, content-root probing, text cleanup.

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use pagechat_core::{Error, Result};

use crate::record::PageContentRecord;
use crate::text::{clean_text, truncate_content};

/// Structural and noise elements dropped before any text is read.
pub const NOISE_SELECTORS: &[&str] = &[
    "script",
    "style",
    "noscript",
    "iframe",
    "embed",
    "object",
    "nav",
    "header",
    "footer",
    "aside",
    ".sidebar",
    ".menu",
    ".ad",
    ".advertisement",
    ".ads",
    ".popup",
    ".modal",
    ".cookie-banner",
    ".newsletter",
    ".social-share",
    r#"[role="banner"]"#,
    r#"[role="navigation"]"#,
    r#"[role="complementary"]"#,
];

/// Content roots in order of preference.
pub const CONTENT_SELECTORS: &[&str] = &[
    "main",
    "article",
    r#"[role="main"]"#,
    ".main-content",
    ".content",
    ".post-content",
    ".entry-content",
    ".article-content",
    "#content",
    "#main",
    "body",
];

/// A content root must carry more than this many trimmed characters.
pub const MIN_ROOT_CHARS: usize = 100;

/// Selector lists driving one extraction.
#[derive(Debug, Clone, Copy)]
pub struct Selectors<'a> {
    pub noise: &'a [&'a str],
    pub content: &'a [&'a str],
}

impl Selectors<'static> {
    pub const DEFAULT: Self = Self {
        noise: NOISE_SELECTORS,
        content: CONTENT_SELECTORS,
    };
}

/// Extract a record from `html`, never failing.
///
/// Any internal error yields a degraded record whose content carries the
/// error message.
pub fn extract(html: &str, url: &str) -> PageContentRecord {
    extract_with(html, url, Selectors::DEFAULT)
}

/// [`extract`] with custom selector lists.
pub fn extract_with(html: &str, url: &str, selectors: Selectors<'_>) -> PageContentRecord {
    match try_extract_with(html, url, selectors) {
        Ok(record) => record,
        Err(e) => {
            warn!("Extraction failed for {}: {}", url, e);
            let title = first_text(&Html::parse_document(html), "title").unwrap_or_default();
            PageContentRecord::degraded(&title, url, &e.to_string())
        }
    }
}

/// Extract a record from `html`, surfacing internal errors.
pub fn try_extract(html: &str, url: &str) -> Result<PageContentRecord> {
    try_extract_with(html, url, Selectors::DEFAULT)
}

pub fn try_extract_with(html: &str, url: &str, selectors: Selectors<'_>) -> Result<PageContentRecord> {
    let mut document = Html::parse_document(html);

    let title = first_text(&document, "title")?;
    let description = meta_description(&document)?;

    remove_noise(&mut document, selectors.noise)?;
    let raw = content_root_text(&document, selectors.content)?;
    let content = truncate_content(clean_text(&raw));

    debug!(
        "Extracted {} chars from {} (title: {:?})",
        content.chars().count(),
        url,
        title
    );

    Ok(PageContentRecord {
        title,
        url: url.to_string(),
        description,
        content,
        extracted_at: chrono::Utc::now().to_rfc3339(),
    })
}

fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| Error::Extraction(format!("invalid selector {:?}: {:?}", selector, e)))
}

fn first_text(document: &Html, selector: &str) -> Result<String> {
    let selector = compile(selector)?;
    Ok(document
        .root_element()
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default())
}

fn meta_description(document: &Html) -> Result<String> {
    let selector = compile(r#"meta[name="description"]"#)?;
    Ok(document
        .root_element()
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .unwrap_or("")
        .to_string())
}

/// Detach every element matching one of `noise` from the tree.
fn remove_noise(document: &mut Html, noise: &[&str]) -> Result<()> {
    let selectors = noise
        .iter()
        .map(|s| compile(s))
        .collect::<Result<Vec<_>>>()?;

    let doomed: Vec<_> = selectors
        .iter()
        .flat_map(|sel| document.root_element().select(sel).map(|el| el.id()).collect::<Vec<_>>())
        .collect();

    for id in doomed {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
    Ok(())
}

/// Text of the first content root that clears [`MIN_ROOT_CHARS`].
fn content_root_text(document: &Html, content: &[&str]) -> Result<String> {
    let root = document.root_element();

    for selector in content {
        let compiled = compile(selector)?;
        if let Some(candidate) = root.select(&compiled).next() {
            let text = element_text(candidate);
            if text.trim().chars().count() > MIN_ROOT_CHARS {
                debug!("Content root: {}", selector);
                return Ok(text);
            }
        }
    }

    let body = compile("body")?;
    let fallback = root.select(&body).next().unwrap_or(root);
    Ok(element_text(fallback))
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}
