//! Field rule tables.
//!
//! A table maps every field of a page kind to one extraction closure plus
//! its presence requirement. Tables are built once and checked for
//! completeness against the field enum before use.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

use scraper::{ElementRef, Selector};
use url::Url;

use super::dom::{LabelMatch, find_label, find_next, next_sibling_named, select_first, text_of};
use super::parse_selector;
use crate::error::{AppError, Result};
use crate::models::{CountPayload, PersonInfo, Rating};

/// Field identifier of one page kind.
pub trait FieldKey: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static {
    /// Every field the page kind produces.
    const ALL: &'static [Self];

    /// Output name, used in errors and logs.
    fn name(self) -> &'static str;
}

/// Whether a field may be missing from the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
}

/// Value produced by a rule.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Rating(Rating),
    Count(CountPayload),
    Flag(bool),
    Names(Vec<String>),
    People(Vec<PersonInfo>),
}

/// Extraction closure. `Ok(None)` means the field is absent.
pub type ExtractFn = Box<dyn Fn(ElementRef<'_>) -> Result<Option<FieldValue>> + Send + Sync>;

/// One field's rule.
pub struct FieldRule<K> {
    key: K,
    presence: Presence,
    extract: ExtractFn,
}

impl<K: FieldKey> FieldRule<K> {
    pub fn required(key: K, extract: ExtractFn) -> Self {
        Self {
            key,
            presence: Presence::Required,
            extract,
        }
    }

    pub fn optional(key: K, extract: ExtractFn) -> Self {
        Self {
            key,
            presence: Presence::Optional,
            extract,
        }
    }
}

/// Complete, validated rule set for one page kind.
pub struct RuleTable<K> {
    rules: Vec<FieldRule<K>>,
}

impl<K: FieldKey> RuleTable<K> {
    /// Validate that every field has exactly one rule.
    pub fn new(rules: Vec<FieldRule<K>>) -> Result<Self> {
        let mut seen = HashSet::new();
        for rule in &rules {
            if !seen.insert(rule.key) {
                return Err(AppError::config(format!(
                    "duplicate rule for field '{}'",
                    rule.key.name()
                )));
            }
        }
        if let Some(missing) = K::ALL.iter().find(|k| !seen.contains(*k)) {
            return Err(AppError::config(format!(
                "no rule for field '{}'",
                missing.name()
            )));
        }
        Ok(Self { rules })
    }

    /// Apply every rule to `scope`.
    pub fn apply(&self, scope: ElementRef<'_>) -> Result<Fields<K>> {
        let mut values = HashMap::with_capacity(self.rules.len());
        for rule in &self.rules {
            match (rule.extract)(scope)? {
                Some(value) => {
                    values.insert(rule.key, value);
                }
                None if rule.presence == Presence::Required => {
                    return Err(AppError::MissingField(rule.key.name()));
                }
                None => {}
            }
        }
        Ok(Fields { values })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }
}

impl<K: FieldKey> fmt::Debug for RuleTable<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|r| (r.key, r.presence)))
            .finish()
    }
}

/// Values extracted by a [`RuleTable`], consumed by typed accessors.
#[derive(Debug)]
pub struct Fields<K> {
    values: HashMap<K, FieldValue>,
}

impl<K: FieldKey> Fields<K> {
    fn take(&mut self, key: K) -> Option<FieldValue> {
        self.values.remove(&key)
    }

    fn required<T>(
        &mut self,
        key: K,
        f: impl FnOnce(&mut Self, K) -> Result<Option<T>>,
    ) -> Result<T> {
        f(self, key)?.ok_or(AppError::MissingField(key.name()))
    }

    fn mismatch(key: K, value: &FieldValue) -> AppError {
        AppError::malformed(key.name(), format!("unexpected value {value:?}"))
    }

    pub fn opt_text(&mut self, key: K) -> Result<Option<String>> {
        match self.take(key) {
            None => Ok(None),
            Some(FieldValue::Text(s)) => Ok(Some(s)),
            Some(other) => Err(Self::mismatch(key, &other)),
        }
    }

    pub fn text(&mut self, key: K) -> Result<String> {
        self.required(key, Self::opt_text)
    }

    pub fn rating(&mut self, key: K) -> Result<Rating> {
        self.required(key, |fields, key| match fields.take(key) {
            None => Ok(None),
            Some(FieldValue::Rating(r)) => Ok(Some(r)),
            Some(other) => Err(Self::mismatch(key, &other)),
        })
    }

    pub fn count(&mut self, key: K) -> Result<CountPayload> {
        self.required(key, |fields, key| match fields.take(key) {
            None => Ok(None),
            Some(FieldValue::Count(c)) => Ok(Some(c)),
            Some(other) => Err(Self::mismatch(key, &other)),
        })
    }

    /// Flags default to `false` when absent.
    pub fn flag(&mut self, key: K) -> Result<bool> {
        match self.take(key) {
            None => Ok(false),
            Some(FieldValue::Flag(b)) => Ok(b),
            Some(other) => Err(Self::mismatch(key, &other)),
        }
    }

    pub fn names(&mut self, key: K) -> Result<Option<Vec<String>>> {
        match self.take(key) {
            None => Ok(None),
            Some(FieldValue::Names(v)) => Ok(Some(v)),
            Some(other) => Err(Self::mismatch(key, &other)),
        }
    }

    pub fn people(&mut self, key: K) -> Result<Option<Vec<PersonInfo>>> {
        match self.take(key) {
            None => Ok(None),
            Some(FieldValue::People(v)) => Ok(Some(v)),
            Some(other) => Err(Self::mismatch(key, &other)),
        }
    }
}

// --- Rule constructors ---

fn rule<F>(f: F) -> ExtractFn
where
    F: Fn(ElementRef<'_>) -> Result<Option<FieldValue>> + Send + Sync + 'static,
{
    Box::new(f)
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

fn non_empty_vec<T>(v: Vec<T>) -> Option<Vec<T>> {
    if v.is_empty() { None } else { Some(v) }
}

/// The scope itself, or its first descendant matching `selector`.
fn target<'a>(scope: ElementRef<'a>, selector: Option<&Selector>) -> Option<ElementRef<'a>> {
    match selector {
        Some(sel) => select_first(scope, sel),
        None => Some(scope),
    }
}

/// Text of the first element matching `selector`.
pub fn text(selector: &str) -> Result<ExtractFn> {
    let sel = parse_selector(selector)?;
    Ok(rule(move |scope| {
        Ok(select_first(scope, &sel)
            .map(text_of)
            .and_then(non_empty)
            .map(FieldValue::Text))
    }))
}

/// Attribute of the first element matching `selector`, resolved against `base`.
pub fn url_attr(selector: &str, attr: &'static str, base: &Url) -> Result<ExtractFn> {
    let sel = parse_selector(selector)?;
    let base = base.clone();
    Ok(rule(move |scope| {
        Ok(select_first(scope, &sel)
            .and_then(|el| el.value().attr(attr))
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| FieldValue::Text(crate::utils::resolve_url(&base, v))))
    }))
}

/// Rating text of the first element matching `selector`.
pub fn rating(selector: &str) -> Result<ExtractFn> {
    let sel = parse_selector(selector)?;
    Ok(rule(move |scope| {
        select_first(scope, &sel)
            .map(|el| Rating::parse(&text_of(el)).map(FieldValue::Rating))
            .transpose()
    }))
}

/// JSON count payload stored in `attr`, on the scope or on a descendant.
pub fn count(field: &'static str, selector: Option<&str>, attr: &'static str) -> Result<ExtractFn> {
    let sel = selector.map(parse_selector).transpose()?;
    Ok(rule(move |scope| {
        target(scope, sel.as_ref())
            .and_then(|el| el.value().attr(attr))
            .map(|raw| CountPayload::decode(field, raw).map(FieldValue::Count))
            .transpose()
    }))
}

/// `true` when any element matches `selector`.
pub fn flag(selector: &str) -> Result<ExtractFn> {
    let sel = parse_selector(selector)?;
    Ok(rule(move |scope| {
        Ok(Some(FieldValue::Flag(select_first(scope, &sel).is_some())))
    }))
}

/// Where a labelled value sits relative to its label.
#[derive(Debug, Clone, Copy)]
pub enum Adjacent {
    /// Text of the label's next sibling with this tag
    Sibling(&'static str),
    /// Text of the next element with this tag in document order
    Next(&'static str),
    /// Remainder of the label's own text after the label prefix
    Remainder,
}

/// Value located next to a label element.
pub fn labeled_text(label_selector: &str, label: LabelMatch, adjacent: Adjacent) -> Result<ExtractFn> {
    let sel = parse_selector(label_selector)?;
    Ok(rule(move |scope| {
        let Some(label_el) = find_label(scope, &sel, label) else {
            return Ok(None);
        };
        let value = match adjacent {
            Adjacent::Sibling(tag) => next_sibling_named(label_el, tag).map(text_of),
            Adjacent::Next(tag) => find_next(label_el, tag).map(text_of),
            Adjacent::Remainder => text_of(label_el)
                .strip_prefix(label.label())
                .map(|rest| rest.trim().to_string()),
        };
        Ok(value.and_then(non_empty).map(FieldValue::Text))
    }))
}

/// `href` of the next link after a label, resolved against `base`.
pub fn labeled_link(label_selector: &str, label: LabelMatch, base: &Url) -> Result<ExtractFn> {
    let sel = parse_selector(label_selector)?;
    let base = base.clone();
    Ok(rule(move |scope| {
        Ok(find_label(scope, &sel, label)
            .and_then(|el| find_next(el, "a"))
            .and_then(|a| a.value().attr("href"))
            .map(|href| FieldValue::Text(crate::utils::resolve_url(&base, href.trim()))))
    }))
}

/// Link texts of the list following a label.
pub fn labeled_names(label_selector: &str, label: LabelMatch) -> Result<ExtractFn> {
    let sel = parse_selector(label_selector)?;
    let link = parse_selector("a")?;
    Ok(rule(move |scope| {
        let names = find_label(scope, &sel, label)
            .and_then(|el| next_sibling_named(el, "ul"))
            .map(|list| {
                list.select(&link)
                    .map(text_of)
                    .filter(|name| !name.is_empty())
                    .collect::<Vec<_>>()
            });
        Ok(names.and_then(non_empty_vec).map(FieldValue::Names))
    }))
}

/// People listed in the list following a label.
pub fn labeled_people(
    field: &'static str,
    label_selector: &str,
    label: LabelMatch,
    base: &Url,
) -> Result<ExtractFn> {
    let sel = parse_selector(label_selector)?;
    let item = parse_selector("li")?;
    let name = parse_selector("div")?;
    let link = parse_selector("a[href]")?;
    let base = base.clone();
    Ok(rule(move |scope| {
        let Some(list) = find_label(scope, &sel, label).and_then(|el| next_sibling_named(el, "ul"))
        else {
            return Ok(None);
        };
        let mut people = Vec::new();
        for li in list.select(&item) {
            let person_name = select_first(li, &name)
                .map(text_of)
                .ok_or(AppError::MissingField(field))?;
            let href = select_first(li, &link)
                .and_then(|a| a.value().attr("href"))
                .ok_or(AppError::MissingField(field))?;
            people.push(PersonInfo::from_profile(&person_name, href, None, &base)?);
        }
        Ok(non_empty_vec(people).map(FieldValue::People))
    }))
}

/// Selectors describing a cast block.
#[derive(Debug, Clone, Copy)]
pub struct CastSelectors {
    pub container: &'static str,
    pub item: &'static str,
    pub name: &'static str,
    pub character: &'static str,
}

/// Cast entries with an optional character sub-label.
pub fn cast(field: &'static str, selectors: CastSelectors, base: &Url) -> Result<ExtractFn> {
    let container = parse_selector(selectors.container)?;
    let item = parse_selector(selectors.item)?;
    let name = parse_selector(selectors.name)?;
    let character = parse_selector(selectors.character)?;
    let link = parse_selector("a[href]")?;
    let base = base.clone();
    Ok(rule(move |scope| {
        let Some(block) = select_first(scope, &container) else {
            return Ok(None);
        };
        let mut people = Vec::new();
        for entry in block.select(&item) {
            let person_name = select_first(entry, &name)
                .map(text_of)
                .ok_or(AppError::MissingField(field))?;
            let href = select_first(entry, &link)
                .and_then(|a| a.value().attr("href"))
                .ok_or(AppError::MissingField(field))?;
            let role = select_first(entry, &character).map(text_of);
            people.push(PersonInfo::from_profile(
                &person_name,
                href,
                role.as_deref(),
                &base,
            )?);
        }
        Ok(non_empty_vec(people).map(FieldValue::People))
    }))
}

/// Attribute of an element nested in a container, with surrounding quotes removed.
pub fn quoted_attr(container: &str, inner: &str, attr: &'static str) -> Result<ExtractFn> {
    let container = parse_selector(container)?;
    let inner = parse_selector(inner)?;
    Ok(rule(move |scope| {
        Ok(select_first(scope, &container)
            .and_then(|block| select_first(block, &inner))
            .and_then(|el| el.value().attr(attr))
            .map(|v| v.trim().trim_matches('"').trim().to_string())
            .and_then(non_empty)
            .map(FieldValue::Text))
    }))
}

#[cfg(test)]
mod tests {
    use scraper::Html;

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Probe {
        Title,
        Note,
    }

    impl FieldKey for Probe {
        const ALL: &'static [Self] = &[Probe::Title, Probe::Note];

        fn name(self) -> &'static str {
            match self {
                Probe::Title => "title",
                Probe::Note => "note",
            }
        }
    }

    fn table() -> RuleTable<Probe> {
        RuleTable::new(vec![
            FieldRule::required(Probe::Title, text("h1").unwrap()),
            FieldRule::optional(Probe::Note, text("p.note").unwrap()),
        ])
        .unwrap()
    }

    #[test]
    fn incomplete_table_is_rejected() {
        let result = RuleTable::new(vec![FieldRule::required(Probe::Title, text("h1").unwrap())]);
        assert!(matches!(result, Err(AppError::Config(ref m)) if m.contains("note")));
    }

    #[test]
    fn duplicate_rule_is_rejected() {
        let result = RuleTable::new(vec![
            FieldRule::required(Probe::Title, text("h1").unwrap()),
            FieldRule::optional(Probe::Title, text("h2").unwrap()),
            FieldRule::optional(Probe::Note, text("p").unwrap()),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn optional_absence_is_tolerated() {
        let html = Html::parse_document("<h1> Title </h1>");
        let mut fields = table().apply(html.root_element()).unwrap();
        assert_eq!(fields.text(Probe::Title).unwrap(), "Title");
        assert_eq!(fields.opt_text(Probe::Note).unwrap(), None);
    }

    #[test]
    fn required_absence_fails() {
        let html = Html::parse_document("<p class='note'>x</p>");
        let err = table().apply(html.root_element()).unwrap_err();
        assert!(matches!(err, AppError::MissingField("title")));
    }

    #[test]
    fn type_mismatch_is_an_error() {
        let html = Html::parse_document("<h1>Title</h1>");
        let mut fields = table().apply(html.root_element()).unwrap();
        assert!(fields.names(Probe::Title).is_err());
    }

    #[test]
    fn rating_rule_propagates_parse_errors() {
        let extract = rating("div.score").unwrap();
        let html = Html::parse_document(r#"<div class="score">N/A</div>"#);
        assert!(extract(html.root_element()).is_err());
        let html = Html::parse_document(r#"<div class="score">-</div>"#);
        assert_eq!(
            extract(html.root_element()).unwrap(),
            Some(FieldValue::Rating(Rating::Unrated))
        );
    }

    #[test]
    fn remainder_strips_prefix() {
        let extract = labeled_text(
            "h3.info",
            LabelMatch::Prefix("再生時間："),
            Adjacent::Remainder,
        )
        .unwrap();
        let html = Html::parse_document(r#"<h3 class="info">再生時間：46分</h3>"#);
        assert_eq!(
            extract(html.root_element()).unwrap(),
            Some(FieldValue::Text("46分".to_string()))
        );
    }

    #[test]
    fn empty_list_is_absent() {
        let extract = labeled_names("h4.term", LabelMatch::Exact("監督")).unwrap();
        let html = Html::parse_document(r#"<h4 class="term">監督</h4><ul></ul>"#);
        assert_eq!(extract(html.root_element()).unwrap(), None);
    }

    #[test]
    fn person_without_numeric_link_fails() {
        let base = Url::parse("https://filmarks.com/").unwrap();
        let extract = labeled_people("creator", "h3.term", LabelMatch::Exact("原作"), &base).unwrap();
        let html = Html::parse_document(
            r#"<h3 class="term">原作</h3><ul><li><a href="/people/x"><div>someone</div></a></li></ul>"#,
        );
        assert!(extract(html.root_element()).is_err());
    }
}
