// eBay mobile search, sorted by price so the expensive listings come first
use crate::config::AppConfig;
use crate::fetch::FetchRequest;
use crate::model::{ListingRecord, format_price};
use crate::probe::{Probe, ProbeContext, css, select_first, text_of};
use reqwest::Url;
use scraper::{Html, Selector};
use std::sync::{Arc, LazyLock};
use tracing::debug;

const SOURCE: &str = "ebay";
const SEARCH_URL: &str = "https://m.ebay.com/sch/i.html";
/// `_sop=16`: price, highest first.
const SORT_BY_PRICE_DESC: &str = "16";

static ITEM_WRAPPER: LazyLock<Selector> = LazyLock::new(|| css("div.s-item__wrapper"));
static ITEM: LazyLock<Selector> = LazyLock::new(|| css("div.s-item"));
static ITEM_LINK: LazyLock<Selector> = LazyLock::new(|| css("a.s-item__link"));
static TITLE_HEADING: LazyLock<Selector> = LazyLock::new(|| css("h3.s-item__title"));
static TITLE_SPAN: LazyLock<Selector> = LazyLock::new(|| css("span.s-item__title"));
static ITEM_PRICE: LazyLock<Selector> = LazyLock::new(|| css("span.s-item__price"));

pub struct EbayProbe {
    ctx: Arc<ProbeContext>,
    limit: usize,
}

impl EbayProbe {
    pub fn new(ctx: Arc<ProbeContext>, cfg: &AppConfig) -> Self {
        Self { ctx, limit: cfg.search_result_limit }
    }

    pub fn search_url(brand: &str, model: &str) -> String {
        let query = format!("{} {}", brand, model);
        Url::parse_with_params(SEARCH_URL, &[("_nkw", query.as_str()), ("_sop", SORT_BY_PRICE_DESC)])
            .map(|u| u.to_string())
            .unwrap_or_else(|_| SEARCH_URL.to_string())
    }

    /// Unlike the storefront probes, an item needs a confident price at or
    /// above the listing floor to be kept.
    pub fn parse(&self, html: &str, brand: &str, model: &str) -> Vec<ListingRecord> {
        let document = Html::parse_document(html);
        let mut items: Vec<_> = document.select(&ITEM_WRAPPER).collect();
        if items.is_empty() {
            items = document.select(&ITEM).collect();
        }
        debug!(found = items.len(), "eBay items");

        let policy = &self.ctx.policy;
        let mut listings = Vec::new();

        for item in items.into_iter().take(self.limit) {
            let Some(href) = item
                .select(&ITEM_LINK)
                .next()
                .and_then(|a| a.value().attr("href"))
            else {
                continue;
            };
            if href.is_empty() || href.contains("ebay.com/sch/") {
                continue;
            }

            let (Some(title_el), Some(price_el)) = (
                select_first(item, &[&*TITLE_HEADING, &*TITLE_SPAN]),
                item.select(&ITEM_PRICE).next(),
            ) else {
                continue;
            };

            let title = text_of(title_el);
            if !policy.is_relevant(&title, brand, model) {
                continue;
            }

            let Some(price) = policy
                .extractor
                .extract(&text_of(price_el))
                .filter(|p| *p >= policy.min_listing_price)
            else {
                continue;
            };

            let web_url = href.split('?').next().unwrap_or(href).to_string();

            listings.push(ListingRecord {
                brand: brand.to_string(),
                model: model.to_string(),
                price: format_price(price),
                vendor: "eBay".to_string(),
                web_url,
                qty_available: "1 available".to_string(),
                source: SOURCE.to_string(),
            });
        }

        listings
    }
}

#[async_trait::async_trait]
impl Probe for EbayProbe {
    fn name(&self) -> &str {
        "ebay"
    }

    async fn probe(&self, brand: &str, model: &str) -> Vec<ListingRecord> {
        let req = FetchRequest::mobile(Self::search_url(brand, model));
        match self.ctx.fetch_page(SOURCE, &req).await {
            Some(html) => self.parse(&html, brand, model),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::HeaderProfile;
    use crate::probe::testing::{FakeFetcher, context};

    fn item(href: &str, title: &str, price: &str) -> String {
        format!(
            r#"<div class="s-item__wrapper">
                 <a class="s-item__link" href="{href}"><h3 class="s-item__title">{title}</h3></a>
                 <span class="s-item__price">{price}</span>
               </div>"#
        )
    }

    fn probe() -> EbayProbe {
        EbayProbe::new(context(Arc::new(FakeFetcher::default())), &AppConfig::default())
    }

    #[test]
    fn search_url_sorts_by_price_descending() {
        assert_eq!(
            EbayProbe::search_url("Anritsu", "MS2090A"),
            "https://m.ebay.com/sch/i.html?_nkw=Anritsu+MS2090A&_sop=16"
        );
    }

    #[test]
    fn keeps_only_priced_items_over_floor() {
        let html = [
            item("https://www.ebay.com/itm/1?hash=abc", "Anritsu MS2090A Field Master Pro", "$18,500.00"),
            item("https://www.ebay.com/itm/2", "Anritsu MS2090A carrying case", "$120.00"),
            item("https://www.ebay.com/itm/3", "Anritsu MS2090A, offers welcome", "See price"),
            item("https://www.ebay.com/sch/i.html?_nkw=x", "Anritsu MS2090A more", "$9,000.00"),
            item("https://www.ebay.com/itm/5", "Keysight N9917A", "$9,000.00"),
        ]
        .concat();

        let listings = probe().parse(&html, "Anritsu", "MS2090A");

        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].web_url, "https://www.ebay.com/itm/1");
        assert_eq!(listings[0].price, "$18500.00");
        assert_eq!(listings[0].vendor, "eBay");
        assert_eq!(listings[0].qty_available, "1 available");
    }

    #[test]
    fn falls_back_to_plain_item_cards() {
        let html = r#"<div class="s-item">
              <a class="s-item__link" href="https://www.ebay.com/itm/7"></a>
              <span class="s-item__title">Anritsu MS2090A</span>
              <span class="s-item__price">$21,000.00</span>
            </div>"#;

        let listings = probe().parse(html, "Anritsu", "MS2090A");

        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].price, "$21000.00");
    }

    #[tokio::test]
    async fn uses_mobile_request() {
        struct ProfileCheck;

        #[async_trait::async_trait]
        impl crate::fetch::Fetcher for ProfileCheck {
            async fn fetch(&self, req: &FetchRequest) -> Result<String, crate::model::FetchError> {
                assert_eq!(req.profile, HeaderProfile::Mobile);
                Ok(String::new())
            }
        }

        let ctx = context(Arc::new(ProfileCheck));

        assert!(EbayProbe::new(ctx, &AppConfig::default()).probe("Anritsu", "MS2090A").await.is_empty());
    }
}
