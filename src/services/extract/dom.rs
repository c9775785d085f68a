//! Document traversal helpers.

use std::iter;

use scraper::{ElementRef, Selector};

/// Concatenated, trimmed text content of an element.
pub fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// First match of `selector` below `scope`.
pub fn select_first<'a>(scope: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    scope.select(selector).next()
}

/// How a label element's text is compared.
#[derive(Debug, Clone, Copy)]
pub enum LabelMatch {
    /// Trimmed text equals the label
    Exact(&'static str),
    /// Trimmed text starts with the label
    Prefix(&'static str),
}

impl LabelMatch {
    pub fn matches(self, text: &str) -> bool {
        match self {
            LabelMatch::Exact(label) => text == label,
            LabelMatch::Prefix(label) => text.starts_with(label),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LabelMatch::Exact(label) | LabelMatch::Prefix(label) => label,
        }
    }
}

/// First element matching `selector` whose text satisfies `label`.
pub fn find_label<'a>(
    scope: ElementRef<'a>,
    selector: &Selector,
    label: LabelMatch,
) -> Option<ElementRef<'a>> {
    scope
        .select(selector)
        .find(|el| label.matches(&text_of(*el)))
}

/// Next sibling element with the given tag name.
pub fn next_sibling_named<'a>(el: ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
    el.next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|sib| sib.value().name() == tag)
}

/// Next element with the given tag name in document order.
///
/// Descendants of `el` come first, then everything after it.
pub fn find_next<'a>(el: ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
    let inside = el.descendants().skip(1);
    let after = iter::successors(Some(*el), |node| node.parent())
        .flat_map(|node| node.next_siblings())
        .flat_map(|node| node.descendants());

    inside
        .chain(after)
        .filter_map(ElementRef::wrap)
        .find(|next| next.value().name() == tag)
}
