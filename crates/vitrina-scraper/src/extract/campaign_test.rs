use super::*;

const SUB_OFFERS: &str = r#"
    <div class="pb-10">
      <span class="pb-2">Masaje relajante 60 min</span>
      <span class="font-medium text-2xl">₡ 15,000</span>
      <span class="line-through">₡ 30,000</span>
      <span class="font-medium text-2xl text-yuplon-black ml-auto w-[48px]">50%</span>
    </div>
    <div class="pb-10">
      <span class="pb-2">Masaje en pareja</span>
      <span class="font-medium text-2xl">₡ 27,000</span>
      <span class="line-through">₡ 60,000</span>
      <span class="font-medium text-2xl ml-auto">55%</span>
    </div>
"#;

fn campaign_page(title: &str, conditions: &str, sub_offers: &str) -> Html {
    Html::parse_document(&format!(
        r#"<html><body><div id="root">
          <div>menu</div><div>buscador</div><div>categorías</div>
          <div><section>
            <div>
              <div><div>
                <div><span class="text-3xl">{title}</span></div>
                <div>
                  <div><div><span>4.8</span></div></div>
                  <div><div><span>1,204</span></div></div>
                </div>
              </div></div>
              <div>galería</div>
              <div>
                <div>ubicación</div><div>horario</div>
                <div><div><ol><li>{conditions}</li><li>No acumulable.</li></ol></div></div>
              </div>
            </div>
            {sub_offers}
          </section></div>
        </div></body></html>"#
    ))
}

#[test]
fn each_sub_offer_becomes_a_record() {
    let html = campaign_page(
        "Spa  Day   en Escazú",
        "Válido para redimir del 01/08/2024 al 31/08/2024.",
        SUB_OFFERS,
    );

    let extraction = extract_campaign(&html).unwrap();

    assert!(extraction.gaps.is_empty());
    assert_eq!(extraction.records.len(), 2);
    let first = &extraction.records[0];
    let get = |k: &str| first.get(k).map(String::as_str);
    assert_eq!(get("Main Offer"), Some("Spa Day en Escazú"));
    assert_eq!(get("Sub Offer Title"), Some("Masaje relajante 60 min"));
    assert_eq!(get("Price"), Some("₡ 15,000"));
    assert_eq!(get("Original Price"), Some("₡ 30,000"));
    assert_eq!(get("Discount"), Some("50%"));
    assert_eq!(get("Calificación"), Some("4.8"));
    assert_eq!(get("Vendidas"), Some("1,204"));
    assert_eq!(get("Start Date"), Some("01/08/2024"));
    assert_eq!(get("End Date"), Some("31/08/2024"));
    assert_eq!(
        extraction.records[1].get("Discount").map(String::as_str),
        Some("55%")
    );
}

#[test]
fn record_fields_keep_a_stable_order() {
    let html = campaign_page("Spa", "Válido hasta 30/09/2024.", SUB_OFFERS);
    let extraction = extract_campaign(&html).unwrap();
    let names: Vec<&str> = extraction.records[0].keys().map(String::as_str).collect();
    assert_eq!(
        names,
        vec![
            "Main Offer",
            "Sub Offer Title",
            "Price",
            "Original Price",
            "Discount",
            "Calificación",
            "Vendidas",
            "Start Date",
            "End Date",
        ]
    );
}

#[test]
fn incomplete_sub_offer_is_skipped() {
    let broken = r#"<div class="pb-10"><span class="pb-2">Agotado</span></div>"#;
    let html = campaign_page(
        "Spa",
        "Válido únicamente el día del evento: 14/09/2024.",
        &format!("{SUB_OFFERS}{broken}"),
    );

    let extraction = extract_campaign(&html).unwrap();

    assert_eq!(extraction.records.len(), 2);
    assert_eq!(extraction.gaps.len(), 1);
    assert_eq!(extraction.gaps[0].field, "Price");
    assert_eq!(
        extraction.records[0].get("Start Date").map(String::as_str),
        Some("14/09/2024")
    );
}

#[test]
fn page_without_main_offer_is_a_gap() {
    let html = Html::parse_document(r#"<div id="root"><p>Oferta finalizada</p></div>"#);
    let gap = extract_campaign(&html).unwrap_err();
    assert_eq!(gap.field, "Main Offer");
}

#[test]
fn campaign_without_sub_offers_yields_nothing() {
    let html = campaign_page("Spa", "Válido del 01/08/2024 al 31/08/2024.", "");
    let extraction = extract_campaign(&html).unwrap();
    assert!(extraction.records.is_empty());
    assert!(extraction.gaps.is_empty());
}
