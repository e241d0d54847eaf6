//! DOM access for chart extraction.
//!
//! The extraction engine never talks to a browser directly. It asks a [`Page`]
//! for elements and text, and hands the page back for teardown when done.
//!
//! ```text
//! ChromeSession (live page) ┐
//!                           ├→ Page → ChartExtractor → ChartResult
//! HtmlPage (saved snapshot) ┘
//! ```
//!
//! Missing elements are reported as `Ok(None)` or an empty vector. `Err` means
//! the page itself failed (browser crash, unparsable selector, ...).

mod chrome;
mod html;

pub use chrome::ChromeSession;
pub use html::{HtmlElement, HtmlPage};

use std::time::Duration;

use async_trait::async_trait;

use crate::app::Result;

/// A loaded document that can be queried and finally torn down.
#[async_trait(?Send)]
pub trait Page {
    /// Handle to an element of this page
    type Element;

    /// Name of the driver behind this page, for reports
    const DRIVER: &'static str;

    /// Wait until an element with class `class` exists, or fail with a timeout.
    async fn wait_for_class(&self, class: &str, timeout: Duration) -> Result<()>;

    /// Find the element with id `id` anywhere in the document.
    async fn find_by_id(&self, id: &str) -> Result<Option<Self::Element>>;

    /// Find the descendant of `scope` with id `id`.
    async fn find_by_id_within(
        &self,
        scope: &Self::Element,
        id: &str,
    ) -> Result<Option<Self::Element>>;

    /// Evaluate `query` under `scope`, in document order.
    async fn query_all(&self, scope: &Self::Element, query: &str) -> Result<Vec<Self::Element>>;

    /// Find the first descendant of `scope` with class `class`.
    async fn find_by_class(
        &self,
        scope: &Self::Element,
        class: &str,
    ) -> Result<Option<Self::Element>>;

    /// Read attribute `name` of `element`.
    async fn attribute(&self, element: &Self::Element, name: &str) -> Result<Option<String>>;

    /// Rendered text of the first element matching `selector` under `scope`.
    async fn select_text(&self, scope: &Self::Element, selector: &str) -> Result<Option<String>>;

    /// Release the page and whatever session backs it.
    async fn teardown(self) -> Result<()>
    where
        Self: Sized;
}

/// CSS selector matching elements that carry the class `class`.
pub(crate) fn class_selector(class: &str) -> String {
    format!("[class~=\"{}\"]", escape_attr(class))
}

/// CSS selector matching the element with id `id`.
pub(crate) fn id_selector(id: &str) -> String {
    format!("[id=\"{}\"]", escape_attr(id))
}

fn escape_attr(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Collapse runs of whitespace the way rendered text reads.
pub(crate) fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_selector() {
        assert_eq!(class_selector("title"), "[class~=\"title\"]");
    }

    #[test]
    fn test_id_selector_escapes_quotes() {
        assert_eq!(id_selector("a\"b"), "[id=\"a\\\"b\"]");
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  Daft \n  Punk "), "Daft Punk");
        assert_eq!(normalize_text(""), "");
    }
}
