// Shared parsing for vendor storefront search pages
use crate::model::ListingRecord;
use crate::probe::{ListingPolicy, select_first, text_of};
use crate::utils::truncate_chars;
use reqwest::Url;
use scraper::{Html, Selector};
use tracing::debug;

/// Where a storefront keeps its product cards. Each list is tried in order
/// and the first selector that matches wins.
pub(crate) struct StorefrontLayout {
    pub vendor: &'static str,
    pub base_url: &'static str,
    pub products: Vec<Selector>,
    pub title: Vec<Selector>,
    pub price: Vec<Selector>,
    pub link: Selector,
}

pub(crate) fn parse_storefront(
    html: &str,
    layout: &StorefrontLayout,
    limit: usize,
    brand: &str,
    model: &str,
    policy: &ListingPolicy,
) -> Vec<ListingRecord> {
    let document = Html::parse_document(html);
    let base = Url::parse(layout.base_url).ok();

    let cards: Vec<_> = layout
        .products
        .iter()
        .map(|s| document.select(s).collect::<Vec<_>>())
        .find(|found| !found.is_empty())
        .unwrap_or_default();
    debug!(vendor = layout.vendor, found = cards.len(), "product cards");

    let title_selectors: Vec<&Selector> = layout.title.iter().collect();
    let price_selectors: Vec<&Selector> = layout.price.iter().collect();

    let mut listings = Vec::new();
    for card in cards.into_iter().take(limit) {
        let (Some(title_el), Some(link_el)) = (
            select_first(card, &title_selectors),
            card.select(&layout.link).next(),
        ) else {
            continue;
        };

        let title = text_of(title_el);
        if !policy.is_relevant(&title, brand, model) {
            continue;
        }

        let price = select_first(card, &price_selectors)
            .and_then(|el| policy.extractor.extract(&text_of(el)));
        let Some(price) = policy.price_display(price) else {
            continue;
        };

        let href = link_el.value().attr("href").unwrap_or("");
        let web_url = base
            .as_ref()
            .and_then(|b| b.join(href).ok())
            .map(|u| u.to_string())
            .unwrap_or_else(|| href.to_string());

        debug!(vendor = layout.vendor, price = %price, "listing: {}", truncate_chars(&title, 50));
        listings.push(ListingRecord {
            brand: brand.to_string(),
            model: model.to_string(),
            price,
            vendor: layout.vendor.to_string(),
            web_url,
            qty_available: "Check listing".to_string(),
            source: layout.vendor.to_string(),
        });
    }

    listings
}
