use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::family::PageFamily;

/// Opaque token identifying one listed item within one family.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemIdentifier(String);

impl ItemIdentifier {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Identifier carried in a link's query string: the text after the first
    /// `=` up to the next `&` (`cardetail.cfm?c=52817&p=2` → `52817`).
    #[must_use]
    pub fn from_query_href(href: &str) -> Option<Self> {
        let (_, rest) = href.split_once('=')?;
        let value = rest.split('&').next().unwrap_or_default().trim();
        if value.is_empty() {
            None
        } else {
            Some(Self(value.to_string()))
        }
    }

    /// Identifier that is the link itself, resolved against the page it was
    /// found on with any fragment removed
    /// (`/ofertas/spa-day#top` on `https://www.yuplon.com/` →
    /// `https://www.yuplon.com/ofertas/spa-day`).
    #[must_use]
    pub fn from_link_href(href: &str, page: &Url) -> Option<Self> {
        let href = href.trim();
        if href.is_empty() || href.starts_with('#') {
            return None;
        }
        let mut link = page.join(href).ok()?;
        if !matches!(link.scheme(), "http" | "https") {
            return None;
        }
        link.set_fragment(None);
        Some(Self(link.into()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ItemIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered label → value mapping in source-document order.
pub type FieldMap = IndexMap<String, String>;

/// Fields extracted from one detail page, tagged with where they came from.
///
/// Constructed once per successful fetch and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub identifier: ItemIdentifier,
    pub family: PageFamily,
    pub fields: FieldMap,
}

impl RawRecord {
    #[must_use]
    pub fn new(identifier: ItemIdentifier, family: PageFamily, fields: FieldMap) -> Self {
        Self {
            identifier,
            family,
            fields,
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// A coerced cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Integer(i64),
    Missing,
}

impl FieldValue {
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, FieldValue::Missing)
    }

    /// Numeric view of `Number` and `Integer` values.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Text(_) | FieldValue::Missing => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Integer(i) => write!(f, "{i}"),
            FieldValue::Missing => Ok(()),
        }
    }
}

/// A [`RawRecord`] after renames, collision suffixing and type coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    pub identifier: ItemIdentifier,
    pub family: PageFamily,
    pub fields: IndexMap<String, FieldValue>,
}

impl NormalizedRecord {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Look a field up by its unsuffixed name, falling back to the
    /// family-suffixed column (`Precio` then `Precio_used`).
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&FieldValue> {
        match self.fields.get(name) {
            Some(value) if !value.is_missing() => Some(value),
            _ => self
                .fields
                .get(&format!("{name}_{}", self.family.suffix()))
                .filter(|v| !v.is_missing()),
        }
    }
}
