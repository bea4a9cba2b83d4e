use crate::config::AppConfig;
use crate::fetch::FetchRequest;
use crate::model::ListingRecord;
use crate::probe::vendor::{StorefrontLayout, parse_storefront};
use crate::probe::{Probe, ProbeContext, css};
use reqwest::Url;
use std::sync::{Arc, LazyLock};
use tracing::debug;

const SOURCE: &str = "Valuetronics";
const SEARCH_URL: &str = "https://www.valuetronics.com/search.php";

static LAYOUT: LazyLock<StorefrontLayout> = LazyLock::new(|| StorefrontLayout {
    vendor: SOURCE,
    base_url: "https://www.valuetronics.com",
    products: vec![css("div.product-item"), css("li.product")],
    title: vec![css("a.product-title"), css("h3"), css("h4")],
    price: vec![css("span.price"), css("div.price")],
    link: css("a"),
});

pub struct ValuetronicsProbe {
    ctx: Arc<ProbeContext>,
    limit: usize,
}

impl ValuetronicsProbe {
    pub fn new(ctx: Arc<ProbeContext>, cfg: &AppConfig) -> Self {
        Self { ctx, limit: cfg.vendor_result_limit }
    }

    /// Search terms in the order they are tried: the full name, then the
    /// bare model number.
    pub fn search_terms(brand: &str, model: &str) -> Vec<String> {
        vec![format!("{} {}", brand, model), model.to_string()]
    }

    pub fn search_url(term: &str) -> String {
        Url::parse_with_params(SEARCH_URL, &[("search_query", term)])
            .map(|u| u.to_string())
            .unwrap_or_else(|_| SEARCH_URL.to_string())
    }

    pub fn parse(&self, html: &str, brand: &str, model: &str) -> Vec<ListingRecord> {
        parse_storefront(html, &LAYOUT, self.limit, brand, model, &self.ctx.policy)
    }
}

#[async_trait::async_trait]
impl Probe for ValuetronicsProbe {
    fn name(&self) -> &str {
        "valuetronics"
    }

    async fn probe(&self, brand: &str, model: &str) -> Vec<ListingRecord> {
        for term in Self::search_terms(brand, model) {
            let req = FetchRequest::desktop(Self::search_url(&term));
            let Some(html) = self.ctx.fetch_page(SOURCE, &req).await else {
                continue;
            };

            let listings = self.parse(&html, brand, model);
            if !listings.is_empty() {
                return listings;
            }
            debug!(term = %term, "no Valuetronics listings, trying next term");
        }
        Vec::new()
    }
}
