//! HTML parsing and DOM navigation.
//!
//! This module provides the [`Document`] and [`Element`] types the extractors
//! query. They expose the query primitives the pipeline relies on: find by
//! class, find by tag, find by structural path (CSS child combinators stand in
//! for XPath), read an attribute, read inner content.
//!
//! # Example
//!
//! ```rust
//! use ascension_core::parse::{Document, compile_selector};
//!
//! let html = r#"
//!     <html>
//!         <body>
//!             <aside class="portable-infobox"><h2>Amber</h2></aside>
//!         </body>
//!     </html>
//! "#;
//!
//! let doc = Document::parse(html);
//! let name = compile_selector(".portable-infobox > h2").unwrap();
//! assert_eq!(doc.first(&name).map(|el| el.text()), Some("Amber".to_string()));
//! ```

use scraper::{Html, Selector};

use crate::{AscensionError, Result};

/// Compiles a CSS selector, mapping failures to [`AscensionError::HtmlParseError`].
pub fn compile_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| AscensionError::HtmlParseError(format!("Invalid selector '{}': {}", selector, e)))
}

/// Represents a parsed HTML document.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses HTML from a string.
    ///
    /// HTML parsing is error tolerant: malformed markup yields a best-effort
    /// tree rather than an error.
    pub fn parse(html: &str) -> Self {
        Self { html: Html::parse_document(html) }
    }

    /// Selects elements using a precompiled selector.
    pub fn select_with(&'_ self, selector: &Selector) -> Vec<Element<'_>> {
        self.html.select(selector).map(|el| Element { element: el }).collect()
    }

    /// Returns the first element matching a precompiled selector.
    pub fn first(&'_ self, selector: &Selector) -> Option<Element<'_>> {
        self.html.select(selector).next().map(|el| Element { element: el })
    }
}

/// A wrapper around scraper's ElementRef.
///
/// # Example
///
/// ```rust
/// use ascension_core::parse::{Document, compile_selector};
///
/// let html = r#"<a href="/wiki/Amber" title="Mondstadt City">Amber</a>"#;
/// let doc = Document::parse(html);
/// let link = doc.first(&compile_selector("a").unwrap()).unwrap();
///
/// assert_eq!(link.text(), "Amber");
/// assert_eq!(link.attr("title"), Some("Mondstadt City"));
/// ```
#[derive(Clone, Debug)]
pub struct Element<'a> {
    element: scraper::ElementRef<'a>,
}

impl<'a> Element<'a> {
    /// Gets the inner HTML of this element, excluding its own tags.
    pub fn inner_html(&self) -> String {
        self.element.inner_html()
    }

    /// Gets the text content of this element.
    ///
    /// Returns the concatenation of all text nodes within this element.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Gets the value of an attribute, or `None` if it is absent.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Gets the first token of the `class` attribute, if any.
    pub fn first_class(&self) -> Option<&'a str> {
        self.element.value().classes().next()
    }

    /// Selects descendant elements using a precompiled selector.
    pub fn select_with(&self, selector: &Selector) -> Vec<Element<'a>> {
        self.element.select(selector).map(|el| Element { element: el }).collect()
    }

    /// Returns the first descendant matching a precompiled selector.
    pub fn first(&self, selector: &Selector) -> Option<Element<'a>> {
        self.element.select(selector).next().map(|el| Element { element: el })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HTML: &str = r#"
        <!DOCTYPE html>
        <html lang="en">
        <head>
            <meta charset="UTF-8">
            <title>Test Page</title>
        </head>
        <body>
            <table class="ascension-stats">
                <tr><th>Lv</th></tr>
                <tr class="ascension extra"><td>Ascension 1</td></tr>
                <tr><td>1/20</td><td>793</td></tr>
            </table>
            <a href="/wiki/Amber" title="Tall Female">Link</a>
        </body>
        </html>
    "#;

    fn select<'a>(doc: &'a Document, selector: &str) -> Vec<Element<'a>> {
        doc.select_with(&compile_selector(selector).unwrap())
    }

    #[test]
    fn test_select_elements_through_implied_tbody() {
        let doc = Document::parse(SAMPLE_HTML);
        let rows = select(&doc, ".ascension-stats > tbody > tr");

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].first_class(), Some("ascension"));
        assert_eq!(rows[2].first_class(), None);
    }

    #[test]
    fn test_element_attributes() {
        let doc = Document::parse(SAMPLE_HTML);
        let elements = select(&doc, "a");

        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].attr("href"), Some("/wiki/Amber"));
        assert_eq!(elements[0].attr("missing"), None);
    }

    #[test]
    fn test_nested_first() {
        let doc = Document::parse(SAMPLE_HTML);
        let table = &select(&doc, "table")[0];
        let td = compile_selector("td").unwrap();

        assert_eq!(table.first(&td).map(|e| e.text()), Some("Ascension 1".to_string()));
        assert_eq!(table.select_with(&td).len(), 3);
    }

    #[test]
    fn test_invalid_selector() {
        let result = compile_selector("[[invalid");

        assert!(matches!(result, Err(AscensionError::HtmlParseError(_))));
    }
}
