//! Listing surfaces of the two sites.

use vitrina_core::PageFamily;

use super::{PagedListing, ScrollListing, SelectStep};
use crate::browser::{Locator, SelectChoice};

const USED_SEARCH_ROW: &str = r#"//*[@id="searchform"]/div/div[2]/table/tbody"#;

/// New-car catalogue: a bare search submit with every result on one page.
#[must_use]
pub fn new_cars() -> PagedListing {
    PagedListing {
        name: "crautos new cars".to_string(),
        family: PageFamily::NewItem,
        url: "https://crautos.com/autosnuevos/".to_string(),
        form: Locator::xpath("/html/body/section[3]/div/div/div/div/form"),
        selections: Vec::new(),
        submit: Locator::xpath(
            "/html/body/section[3]/div/div/div/div/form/table/tbody/tr[8]/td/input",
        ),
        item: Locator::css(".dealerhlcar"),
        item_link: None,
        next: None,
    }
}

/// Used-car search filtered to `min_year` onwards, sorted by year, dealers excluded.
#[must_use]
pub fn used_cars(min_year: u16) -> PagedListing {
    let row = |n: u8| Locator::xpath(format!("{USED_SEARCH_ROW}/tr[{n}]/td[2]/select"));
    PagedListing {
        name: "crautos used cars".to_string(),
        family: PageFamily::UsedItem,
        url: "https://crautos.com/autosusados/".to_string(),
        form: row(1),
        selections: vec![
            SelectStep {
                control: row(1),
                choice: SelectChoice::Value(min_year.to_string()),
            },
            SelectStep {
                control: row(5),
                choice: SelectChoice::VisibleText("Año".to_string()),
            },
            SelectStep {
                control: row(6),
                choice: SelectChoice::VisibleText("Solo usados".to_string()),
            },
        ],
        submit: Locator::xpath(format!("{USED_SEARCH_ROW}/tr[8]/td/button")),
        item: Locator::css(".brandtitle"),
        item_link: Some(Locator::css("a")),
        next: Some(Locator::css("li.page-item.page-next a")),
    }
}

/// Campaign home grid, loaded by infinite scroll.
#[must_use]
pub fn campaigns() -> ScrollListing {
    ScrollListing {
        name: "yuplon campaigns".to_string(),
        family: PageFamily::Campaign,
        url: "https://www.yuplon.com/".to_string(),
        grid: Locator::css(".grid-cols-1"),
        link: Locator::xpath("//a[contains(text(), 'Ver Detalles')]"),
    }
}
