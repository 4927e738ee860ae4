use scraper::{ElementRef, Html, Selector};

/// A parsed page that the rest of the pipeline queries structurally.
///
/// Selection never fails: a selector that matches nothing yields an empty
/// result, which callers treat as an absent field.
pub struct DocumentView {
    url: String,
    html: Html,
}

impl DocumentView {
    /// Malformed markup degrades to fewer matchable nodes, never an error.
    pub fn parse(url: impl Into<String>, body: &str) -> Self {
        Self {
            url: url.into(),
            html: Html::parse_document(body),
        }
    }

    /// URL the page was fetched from.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn select<'a>(&'a self, selector: &'a Selector) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        self.html.select(selector)
    }

    pub fn select_first<'a>(&'a self, selector: &'a Selector) -> Option<ElementRef<'a>> {
        self.html.select(selector).next()
    }

    pub fn select_last<'a>(&'a self, selector: &'a Selector) -> Option<ElementRef<'a>> {
        self.html.select(selector).last()
    }
}

/// Nodes matching `selector` beneath `node`.
pub fn select_within<'a>(node: ElementRef<'a>, selector: &'a Selector) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    node.select(selector)
}

/// The first node matching `selector` beneath `node`.
pub fn first_within<'a>(node: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    node.select(selector).next()
}

/// All text beneath `node`, trimmed at both ends. `None` when there is none.
pub fn text_of(node: ElementRef<'_>) -> Option<String> {
    let text = node.text().collect::<String>();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn attribute_of(node: ElementRef<'_>, name: &str) -> Option<String> {
    node.value()
        .attr(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
