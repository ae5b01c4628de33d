//! Document handle abstraction
//!
//! The inference engine only sees a loaded element tree through these two
//! traits. `HtmlDocument` is the bundled provider backed by the scraper crate;
//! anything else that can answer CSS queries and walk elements in document
//! order can stand in for it.

use scraper::{ElementRef, Html, Selector};

use crate::error::{InferError, Result};

/// One element of a loaded document
pub trait DocumentElement<'a>: Copy + PartialEq {
    /// Lowercase tag name
    fn tag_name(&self) -> &'a str;

    fn attr(&self, name: &str) -> Option<&'a str>;

    /// Class tokens in attribute order, as written (duplicates kept)
    fn classes(&self) -> Vec<&'a str>;

    /// Concatenated text of all descendant text nodes, untrimmed
    fn text_content(&self) -> String;

    fn parent_element(&self) -> Option<Self>;

    /// Element children only (text and comment nodes are skipped)
    fn child_elements(&self) -> Vec<Self>;

    /// Every descendant element in pre-order, not including `self`
    fn descendant_elements(&self) -> Vec<Self>;

    /// Outer HTML
    fn outer_html(&self) -> String;

    /// Number of element ancestors (the root element has depth 0)
    fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.parent_element();
        while let Some(parent) = current {
            depth += 1;
            current = parent.parent_element();
        }
        depth
    }

    /// True if `self` or one of its ancestors is in `roots`
    fn is_within(&self, roots: &[Self]) -> bool {
        let mut current = Some(*self);
        while let Some(el) = current {
            if roots.contains(&el) {
                return true;
            }
            current = el.parent_element();
        }
        false
    }
}

/// A loaded, read-only document
pub trait Document {
    type Element<'a>: DocumentElement<'a>
    where
        Self: 'a;

    /// Address the document was loaded from
    fn url(&self) -> &str;

    /// Document-order CSS query over the whole tree
    fn select(&self, selector: &str) -> Result<Vec<Self::Element<'_>>>;
}

/// Parse a CSS selector, mapping failures to `InvalidInput`
pub fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| InferError::InvalidInput {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// Static HTML snapshot parsed with scraper
#[derive(Debug)]
pub struct HtmlDocument {
    url: String,
    html: Html,
}

impl HtmlDocument {
    /// Parse an HTML string. html5ever never rejects input, so this cannot fail.
    pub fn parse(url: impl Into<String>, html: &str) -> Self {
        Self {
            url: url.into(),
            html: Html::parse_document(html),
        }
    }
}

impl Document for HtmlDocument {
    type Element<'a> = ElementRef<'a>;

    fn url(&self) -> &str {
        &self.url
    }

    fn select(&self, selector: &str) -> Result<Vec<ElementRef<'_>>> {
        let selector = parse_selector(selector)?;
        Ok(self.html.select(&selector).collect())
    }
}

impl<'a> DocumentElement<'a> for ElementRef<'a> {
    fn tag_name(&self) -> &'a str {
        self.value().name()
    }

    fn attr(&self, name: &str) -> Option<&'a str> {
        self.value().attr(name)
    }

    fn classes(&self) -> Vec<&'a str> {
        // scraper's Element::classes() is a sorted set; selectors need source order
        self.value()
            .attr("class")
            .map(|c| c.split_ascii_whitespace().collect())
            .unwrap_or_default()
    }

    fn text_content(&self) -> String {
        self.text().collect()
    }

    fn parent_element(&self) -> Option<Self> {
        self.parent().and_then(ElementRef::wrap)
    }

    fn child_elements(&self) -> Vec<Self> {
        self.children().filter_map(ElementRef::wrap).collect()
    }

    fn descendant_elements(&self) -> Vec<Self> {
        // NodeRef::descendants starts with the node itself
        self.descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .collect()
    }

    fn outer_html(&self) -> String {
        self.html()
    }
}
