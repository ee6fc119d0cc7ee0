//! Selector-table extraction shared by every source adapter.
//!
//! Adapters only declare *where* a field lives ([`Locator`]) and *how* to
//! read it ([`Extract`]); walking the document, dropping incomplete entries
//! and resolving relative URLs happens here.

use nd_core::{Error, ExtractionError, Result};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// How a value is read out of a matched element.
#[derive(Debug, Clone, Copy)]
pub enum Extract {
    /// Trimmed inner text
    Text,
    /// First non-empty attribute among the given names
    Attr(&'static [&'static str]),
}

/// A structural locator plus its extraction rule.
#[derive(Debug, Clone, Copy)]
pub struct Locator {
    pub selector: &'static str,
    pub extract: Extract,
}

impl Locator {
    pub const fn text(selector: &'static str) -> Self {
        Self { selector, extract: Extract::Text }
    }

    pub const fn attr(selector: &'static str, names: &'static [&'static str]) -> Self {
        Self { selector, extract: Extract::Attr(names) }
    }

    pub fn compile(&self) -> Result<CompiledLocator> {
        Ok(CompiledLocator {
            selector: parse_selector(self.selector)?,
            extract: self.extract,
        })
    }
}

pub struct CompiledLocator {
    selector: Selector,
    extract: Extract,
}

impl CompiledLocator {
    /// First non-empty value found below `scope`.
    pub fn first(&self, scope: ElementRef<'_>) -> Option<String> {
        scope.select(&self.selector).find_map(|el| self.read(el))
    }

    fn read(&self, el: ElementRef<'_>) -> Option<String> {
        let value = match self.extract {
            Extract::Text => el.text().collect::<String>().trim().to_string(),
            Extract::Attr(names) => names
                .iter()
                .filter_map(|name| el.value().attr(name))
                .map(str::trim)
                .find(|v| !v.is_empty())?
                .to_string(),
        };
        (!value.is_empty()).then_some(value)
    }
}

/// Where the repeated entries of a category listing page live.
#[derive(Debug, Clone, Copy)]
pub struct ListingRules {
    pub container: &'static str,
    pub title: Locator,
    pub summary: Locator,
    pub link: Locator,
    pub image: Locator,
    pub published: Locator,
}

impl ListingRules {
    pub fn compile(&self) -> Result<CompiledListing> {
        Ok(CompiledListing {
            container: parse_selector(self.container)?,
            title: self.title.compile()?,
            summary: self.summary.compile()?,
            link: self.link.compile()?,
            image: self.image.compile()?,
            published: self.published.compile()?,
        })
    }
}

pub struct CompiledListing {
    pub container: Selector,
    pub title: CompiledLocator,
    pub summary: CompiledLocator,
    pub link: CompiledLocator,
    pub image: CompiledLocator,
    pub published: CompiledLocator,
}

/// Fields read from a single article page.
#[derive(Debug, Clone, Copy)]
pub struct DetailRules {
    pub content: &'static str,
    pub author: &'static str,
    pub tags: &'static str,
}

impl DetailRules {
    pub fn validate(&self) -> Result<()> {
        parse_selector(self.content)?;
        parse_selector(self.author)?;
        parse_selector(self.tags)?;
        Ok(())
    }
}

pub fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| {
        Error::Extraction(ExtractionError::InvalidSelector {
            selector: selector.to_string(),
            reason: e.to_string(),
        })
    })
}

/// Trimmed, non-empty texts of every element matching `selector`, in document order.
pub fn collect_texts(document: &Html, selector: &str) -> Result<Vec<String>> {
    let selector = parse_selector(selector)?;
    Ok(document
        .select(&selector)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect())
}

/// Keeps the first occurrence of every value.
pub fn dedup_preserving_order(values: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}

/// Resolves an article link against the source's base URL.
///
/// Only http(s) targets are accepted; anything else (`javascript:`,
/// `mailto:`) counts as a missing link.
pub fn absolute_url(href: &str, base_url: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    let resolved = Url::parse(base_url).ok()?.join(href).ok()?;
    matches!(resolved.scheme(), "http" | "https").then(|| resolved.to_string())
}

/// Normalizes an image reference found on a listing page.
///
/// `//host/a.jpg` gains an `https:` scheme, `/a.jpg` is prefixed with
/// `base_url`, absolute `http(s)` values pass through and everything else
/// becomes an empty string.
pub fn normalize_image_url(raw: &str, base_url: &str) -> String {
    let raw = raw.trim();
    if raw.starts_with("//") {
        format!("https:{}", raw)
    } else if raw.starts_with('/') {
        format!("{}{}", base_url.trim_end_matches('/'), raw)
    } else if raw.starts_with("http") {
        raw.to_string()
    } else {
        String::new()
    }
}
