//! Page-script context: answers extraction requests for one loaded document.

use tracing::debug;

use pagechat_extract::{extract, PageContentRecord};

use crate::protocol::{IncomingMessage, MessageResponse};

/// The content script attached to one page load.
#[derive(Debug, Clone)]
pub struct PageScript {
    url: String,
    html: String,
}

impl PageScript {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    /// Run the extractor against this page.
    pub fn extract(&self) -> PageContentRecord {
        extract(&self.html, &self.url)
    }

    /// The message pushed to the background once the page has loaded.
    pub fn auto_push(&self) -> IncomingMessage {
        IncomingMessage::PageContentExtracted {
            data: self.extract(),
        }
    }

    /// Answer a message addressed to this page script.
    pub fn handle_message(&self, message: &IncomingMessage) -> MessageResponse {
        match message {
            IncomingMessage::ExtractPageContent => {
                debug!("Page script extracting {}", self.url);
                MessageResponse::with_content(Some(self.extract()))
            }
            other => MessageResponse::failure(format!(
                "{} is not handled by page scripts",
                other.action()
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "<html><head><title>Hello</title></head><body><p>Hi there</p></body></html>";

    #[test]
    fn test_extract_request() {
        let script = PageScript::new("https://hello.test", PAGE);
        let response = script.handle_message(&IncomingMessage::ExtractPageContent);
        let content = response.usable_content().unwrap();
        assert_eq!(content.title, "Hello");
        assert_eq!(content.content, "Hi there");
    }

    #[test]
    fn test_other_actions_rejected() {
        let script = PageScript::new("https://hello.test", PAGE);
        let response = script.handle_message(&IncomingMessage::GetPageContent);
        assert!(!response.success);
    }

    #[test]
    fn test_auto_push_carries_record() {
        let script = PageScript::new("https://hello.test", PAGE);
        match script.auto_push() {
            IncomingMessage::PageContentExtracted { data } => assert_eq!(data.url, "https://hello.test"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
