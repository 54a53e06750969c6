use serde::{Deserialize, Serialize};

use crate::records::ItemIdentifier;

/// The kind of detail page a record was extracted from.
///
/// Selects the extractor variant, the detail URL template, the provenance
/// label written to output tables and the suffix used when
/// a field name collides across families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PageFamily {
    NewItem,
    UsedItem,
    Campaign,
}

impl PageFamily {
    pub const ALL: [PageFamily; 3] = [
        PageFamily::NewItem,
        PageFamily::UsedItem,
        PageFamily::Campaign,
    ];

    /// Provenance label stored in the `family` column of output tables.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            PageFamily::NewItem => "Nuevo",
            PageFamily::UsedItem => "Usado",
            PageFamily::Campaign => "Campaña",
        }
    }

    /// Suffix appended to a colliding field name (`Precio` → `Precio_new`).
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            PageFamily::NewItem => "new",
            PageFamily::UsedItem => "used",
            PageFamily::Campaign => "campaign",
        }
    }

    /// Detail URL template containing a single `{id}` placeholder. Campaign
    /// identifiers are already the absolute link seen on the listing.
    #[must_use]
    pub fn detail_url_template(self) -> &'static str {
        match self {
            PageFamily::NewItem => "https://crautos.com/autosnuevos/cardetail.cfm?c={id}",
            PageFamily::UsedItem => "https://crautos.com/autosusados/cardetail.cfm?c={id}",
            PageFamily::Campaign => "{id}",
        }
    }

    /// Substitute `id` into this family's detail URL template.
    #[must_use]
    pub fn detail_url(self, id: &ItemIdentifier) -> String {
        fill_template(self.detail_url_template(), id)
    }

    /// Inverse of [`PageFamily::label`].
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.label() == label)
    }
}

impl std::fmt::Display for PageFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Replace every `{id}` placeholder in `template` with `id`.
#[must_use]
pub fn fill_template(template: &str, id: &ItemIdentifier) -> String {
    template.replace("{id}", id.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_url_substitutes_identifier() {
        let id = ItemIdentifier::new("52817");
        assert_eq!(
            PageFamily::UsedItem.detail_url(&id),
            "https://crautos.com/autosusados/cardetail.cfm?c=52817"
        );
        assert_eq!(
            PageFamily::Campaign.detail_url(&ItemIdentifier::new(
                "https://www.yuplon.com/ofertas/spa-day"
            )),
            "https://www.yuplon.com/ofertas/spa-day"
        );
    }

    #[test]
    fn labels_round_trip() {
        for family in PageFamily::ALL {
            assert_eq!(PageFamily::from_label(family.label()), Some(family));
        }
        assert_eq!(PageFamily::from_label("Seminuevo"), None);
    }
}
