use super::*;

fn used_page(title: &str, price: &str, rows: &str) -> Html {
    Html::parse_document(&format!(
        r#"<html><body>
        <div class="header-text">
          <div class="carheader"><h1>{title}</h1><h3>{price}</h3></div>
        </div>
        <div class="tab-content">
          <div id="tab-1"><table>{rows}</table></div>
          <div id="tab-2"><table><tr><td>Extras</td><td>Aros de lujo</td></tr></table></div>
        </div>
        </body></html>"#
    ))
}

#[test]
fn spec_sheet_rows_map_label_to_value() {
    let html = Html::parse_document(
        r#"<table id="fichatecnica">
            <tr><th colspan="2">Ficha técnica</th></tr>
            <tr><td> Combustible </td><td> Gasolina </td></tr>
            <tr><td>Cilindrada</td><td>1800 cc</td></tr>
            <tr><td>Tracción</td><td>4x2</td><td>extra</td></tr>
            <tr><td>Combustible</td><td>Híbrido</td></tr>
        </table>"#,
    );

    let fields = extract_new_item(&html);

    assert_eq!(fields.get("Combustible").map(String::as_str), Some("Híbrido"));
    assert_eq!(fields.get("Cilindrada").map(String::as_str), Some("1800 cc"));
    assert!(!fields.contains_key("Tracción"));
    assert_eq!(fields.len(), 2);
}

#[test]
fn new_item_banner_becomes_version() {
    let html = Html::parse_document(
        r#"<div class="header-text"><h2>  Toyota RAV4 Limited  </h2></div>
           <table id="fichatecnica"><tr><td>Versión</td><td>Limited</td></tr></table>"#,
    );

    let fields = extract_new_item(&html);

    assert_eq!(fields.get("Version").map(String::as_str), Some("Toyota RAV4 Limited"));
    assert_eq!(fields.get("Versión").map(String::as_str), Some("Limited"));
}

#[test]
fn new_item_without_sheet_is_empty() {
    let fields = extract_new_item(&Html::parse_document("<p>Página no encontrada</p>"));
    assert!(fields.is_empty());
}

#[test]
fn title_splits_into_version_and_year() {
    assert_eq!(
        split_title("Toyota Corolla 2021"),
        Some(("Toyota Corolla".to_string(), "2021".to_string()))
    );
    assert_eq!(split_title("Corolla"), None);
    assert_eq!(split_title("Toyota 2021"), None);
}

#[test]
fn used_item_reads_header_price_and_table() {
    let html = used_page(
        "Hyundai  Tucson   GLS 2019",
        "¢ 1,000,000",
        "<tr><td>Cilindrada</td><td>2000 cc</td></tr><tr><td>Color exterior</td><td>Gris</td></tr>",
    );

    let (fields, gaps) = extract_used_item(&html);

    assert!(gaps.is_empty());
    assert_eq!(fields.get("Version").map(String::as_str), Some("Hyundai Tucson GLS"));
    assert_eq!(fields.get("Año").map(String::as_str), Some("2019"));
    assert_eq!(fields.get("Precio").map(String::as_str), Some("$ 1,886"));
    assert_eq!(fields.get("Color exterior").map(String::as_str), Some("Gris"));
    assert!(!fields.contains_key("Extras"));
}

#[test]
fn used_item_dollar_price() {
    let (fields, _) = extract_used_item(&used_page("Toyota Corolla 2021", "$12,500 *", ""));
    assert_eq!(fields.get("Precio").map(String::as_str), Some("$ 12,500"));
}

#[test]
fn short_title_yields_neither_version_nor_year() {
    let (fields, _) = extract_used_item(&used_page("Corolla", "$9,000", ""));
    assert!(!fields.contains_key("Version"));
    assert!(!fields.contains_key("Año"));
    assert!(fields.contains_key("Precio"));
}

#[test]
fn unpriced_listing_is_a_gap_but_keeps_the_text() {
    let (fields, gaps) = extract_used_item(&used_page("Nissan Frontier 2018", "$ND", ""));
    assert_eq!(fields.get("Precio").map(String::as_str), Some("$ ND"));
    assert_eq!(gaps.len(), 1);
    assert_eq!(gaps[0].field, "Precio");
}

#[test]
fn missing_header_is_reported() {
    let (fields, gaps) = extract_used_item(&Html::parse_document("<div class=\"tab-content\"></div>"));
    assert!(fields.is_empty());
    assert_eq!(gaps, vec![Gap::new("carheader", "no header block")]);
}
