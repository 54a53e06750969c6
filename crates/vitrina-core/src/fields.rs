//! Field names shared by extractors, the normalizer and the report layer.

use crate::family::PageFamily;

/// Fixed column holding the item identifier. Never renamed.
pub const IDENTIFIER: &str = "identifier";
/// Fixed column holding the provenance label. Never renamed.
pub const FAMILY: &str = "family";

pub const VERSION: &str = "Version";
pub const YEAR: &str = "Año";
pub const PRICE: &str = "Precio";

pub const MAIN_OFFER: &str = "Main Offer";
pub const SUB_OFFER_TITLE: &str = "Sub Offer Title";
pub const OFFER_PRICE: &str = "Price";
pub const ORIGINAL_PRICE: &str = "Original Price";
pub const DISCOUNT: &str = "Discount";
pub const RATING: &str = "Calificación";
pub const SOLD: &str = "Vendidas";
pub const START_DATE: &str = "Start Date";
pub const END_DATE: &str = "End Date";

/// How the normalizer coerces a field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    /// Monetary amount; unparsable values drop the row.
    Price,
    /// Percentage; unparsable values drop the row.
    Percent,
    /// Whole count; unparsable values become missing.
    Count,
    /// Model year; unparsable non-empty values are fatal.
    Year,
    Text,
}

/// Resolve the coercion role from a field name before any collision suffix.
#[must_use]
pub fn role_of(name: &str) -> FieldRole {
    match name {
        PRICE | OFFER_PRICE | ORIGINAL_PRICE => FieldRole::Price,
        DISCOUNT => FieldRole::Percent,
        SOLD => FieldRole::Count,
        YEAR => FieldRole::Year,
        _ => FieldRole::Text,
    }
}

const NEW_ITEM_RENAMES: &[(&str, &str)] = &[
    ("Versión", VERSION),
    ("# de puertas", "Número de Puertas"),
];

const USED_ITEM_RENAMES: &[(&str, &str)] = &[
    ("# de pasajeros", "Número de Pasajeros"),
    ("# de puertas", "Número de Puertas"),
    ("Color exterior", "Color Exterior"),
    ("Color interior", "Color Interior"),
];

/// Canonical spelling of a source label, if the family renames it.
#[must_use]
pub fn canonical_name(family: PageFamily, name: &str) -> Option<&'static str> {
    let table = match family {
        PageFamily::NewItem => NEW_ITEM_RENAMES,
        PageFamily::UsedItem => USED_ITEM_RENAMES,
        PageFamily::Campaign => return None,
    };
    table
        .iter()
        .find(|(from, _)| *from == name)
        .map(|(_, to)| *to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_resolve_on_unsuffixed_names() {
        assert_eq!(role_of("Precio"), FieldRole::Price);
        assert_eq!(role_of("Original Price"), FieldRole::Price);
        assert_eq!(role_of("Discount"), FieldRole::Percent);
        assert_eq!(role_of("Vendidas"), FieldRole::Count);
        assert_eq!(role_of("Año"), FieldRole::Year);
        assert_eq!(role_of("Precio_new"), FieldRole::Text);
        assert_eq!(role_of("Combustible"), FieldRole::Text);
    }

    #[test]
    fn renames_are_per_family() {
        assert_eq!(
            canonical_name(PageFamily::NewItem, "Versión"),
            Some("Version")
        );
        assert_eq!(canonical_name(PageFamily::UsedItem, "Versión"), None);
        assert_eq!(
            canonical_name(PageFamily::UsedItem, "Color exterior"),
            Some("Color Exterior")
        );
        assert_eq!(canonical_name(PageFamily::Campaign, "# de puertas"), None);
    }
}
