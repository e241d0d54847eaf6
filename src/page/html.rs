use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use ego_tree::NodeId;
use scraper::{ElementRef, Html, Selector};

use crate::app::{DownchartsError, Result};
use crate::page::{class_selector, id_selector, normalize_text, Page};

/// A saved HTML document queried with scraper.
///
/// Useful for replaying a chart page captured earlier, and for tests.
pub struct HtmlPage {
    html: Html,
}

/// Node of an element in the parsed tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HtmlElement(NodeId);

impl HtmlPage {
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Ok(Self::parse(&source))
    }

    fn resolve(&self, handle: HtmlElement) -> Result<ElementRef<'_>> {
        self.html
            .tree
            .get(handle.0)
            .and_then(ElementRef::wrap)
            .ok_or_else(|| DownchartsError::NotFound(format!("element {:?}", handle.0)))
    }

    /// Elements under `scope` matching `selector`, as handles in document order.
    fn select_within(&self, scope: HtmlElement, selector: &str) -> Result<Vec<HtmlElement>> {
        let selector = parse_selector(selector)?;
        let scope = self.resolve(scope)?;

        Ok(scope
            .select(&selector)
            .filter(|element| element.id() != scope.id())
            .map(|element| HtmlElement(element.id()))
            .collect())
    }

    fn first_within(&self, scope: HtmlElement, selector: &str) -> Result<Option<HtmlElement>> {
        Ok(self.select_within(scope, selector)?.into_iter().next())
    }

    fn document(&self) -> HtmlElement {
        HtmlElement(self.html.root_element().id())
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| DownchartsError::Selector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

#[async_trait(?Send)]
impl Page for HtmlPage {
    type Element = HtmlElement;

    const DRIVER: &'static str = "HTML";

    /// A snapshot never changes, so the element is either there now or never.
    async fn wait_for_class(&self, class: &str, timeout: Duration) -> Result<()> {
        let selector = parse_selector(&class_selector(class))?;

        if self.html.select(&selector).next().is_some() {
            Ok(())
        } else {
            Err(DownchartsError::Timeout {
                selector: class.to_string(),
                secs: timeout.as_secs(),
            })
        }
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<HtmlElement>> {
        self.first_within(self.document(), &id_selector(id))
    }

    async fn find_by_id_within(
        &self,
        scope: &HtmlElement,
        id: &str,
    ) -> Result<Option<HtmlElement>> {
        self.first_within(*scope, &id_selector(id))
    }

    async fn query_all(&self, scope: &HtmlElement, query: &str) -> Result<Vec<HtmlElement>> {
        self.select_within(*scope, query)
    }

    async fn find_by_class(&self, scope: &HtmlElement, class: &str) -> Result<Option<HtmlElement>> {
        self.first_within(*scope, &class_selector(class))
    }

    async fn attribute(&self, element: &HtmlElement, name: &str) -> Result<Option<String>> {
        let element = self.resolve(*element)?;
        Ok(element.value().attr(name).map(str::to_string))
    }

    async fn select_text(&self, scope: &HtmlElement, selector: &str) -> Result<Option<String>> {
        let Some(found) = self.first_within(*scope, selector)? else {
            return Ok(None);
        };

        let element = self.resolve(found)?;
        Ok(Some(normalize_text(&element.text().collect::<String>())))
    }

    async fn teardown(self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"
        <html><body>
          <div id="charts" class="charts-list wide">
            <ul id="house"><li class="title"><a> One </a></li><li class="title"><a>Two</a></li></ul>
          </div>
        </body></html>
    "#;

    #[tokio::test]
    async fn test_wait_for_present_class() {
        let page = HtmlPage::parse(DOC);
        tokio_test::assert_ok!(page.wait_for_class("charts-list", Duration::from_secs(10)).await);
    }

    #[tokio::test]
    async fn test_wait_for_missing_class_times_out() {
        let page = HtmlPage::parse(DOC);
        let err = page
            .wait_for_class("loading", Duration::from_secs(10))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DownchartsError::Timeout { ref selector, secs: 10 } if selector == "loading"
        ));
    }

    #[tokio::test]
    async fn test_query_all_in_document_order() {
        let page = HtmlPage::parse(DOC);
        let root = page.find_by_id("charts").await.unwrap().unwrap();
        let items = page.query_all(&root, "li").await.unwrap();
        assert_eq!(items.len(), 2);

        let first = page.select_text(&items[0], "a").await.unwrap();
        let second = page.select_text(&items[1], "a").await.unwrap();
        assert_eq!(first.as_deref(), Some("One"));
        assert_eq!(second.as_deref(), Some("Two"));
    }

    #[tokio::test]
    async fn test_find_by_id_within_scope() {
        let page = HtmlPage::parse(DOC);
        let root = page.find_by_id("charts").await.unwrap().unwrap();
        let list = page.find_by_id_within(&root, "house").await.unwrap().unwrap();

        assert_eq!(page.attribute(&list, "id").await.unwrap().as_deref(), Some("house"));
        assert!(page.find_by_id_within(&list, "charts").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_query_excludes_scope_itself() {
        let page = HtmlPage::parse(DOC);
        let root = page.find_by_id("charts").await.unwrap().unwrap();
        assert!(page.query_all(&root, "div").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_text_is_none() {
        let page = HtmlPage::parse(DOC);
        let root = page.find_by_id("charts").await.unwrap().unwrap();
        assert!(page.select_text(&root, "span").await.unwrap().is_none());
        assert!(page.find_by_class(&root, "artist").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_nested_matches_keep_document_order() {
        let page = HtmlPage::parse(
            r#"<div id="outer"><section class="g"><p>a</p><section class="g"><p>b</p></section></section><section class="g"><p>c</p></section></div>"#,
        );
        let outer = page.find_by_id("outer").await.unwrap().unwrap();
        let groups = page.query_all(&outer, "section").await.unwrap();
        assert_eq!(groups.len(), 3);

        let mut texts = Vec::new();
        for group in &groups {
            texts.push(page.select_text(group, "p").await.unwrap().unwrap());
        }
        assert_eq!(texts, vec!["a", "b", "c"]);

        // Handles stay valid across queries.
        let again = page.query_all(&outer, "section").await.unwrap();
        assert_eq!(groups, again);
    }

    #[tokio::test]
    async fn test_invalid_selector() {
        let page = HtmlPage::parse(DOC);
        let root = page.find_by_id("charts").await.unwrap().unwrap();
        let err = page.query_all(&root, "li[").await.unwrap_err();
        assert!(matches!(err, DownchartsError::Selector { .. }));
    }
}
