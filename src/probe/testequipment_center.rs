use crate::config::AppConfig;
use crate::fetch::FetchRequest;
use crate::model::ListingRecord;
use crate::probe::vendor::{StorefrontLayout, parse_storefront};
use crate::probe::{Probe, ProbeContext, css};
use reqwest::Url;
use std::sync::{Arc, LazyLock};

const SOURCE: &str = "TestEquipment.center";
const SEARCH_URL: &str = "https://testequipment.center/search";

static LAYOUT: LazyLock<StorefrontLayout> = LazyLock::new(|| StorefrontLayout {
    vendor: SOURCE,
    base_url: "https://testequipment.center",
    products: vec![css("div.product"), css("div.item")],
    title: vec![css("h3"), css("h4"), css("a")],
    price: vec![css("span.price"), css("div.price")],
    link: css("a"),
});

pub struct TestEquipmentCenterProbe {
    ctx: Arc<ProbeContext>,
    limit: usize,
}

impl TestEquipmentCenterProbe {
    pub fn new(ctx: Arc<ProbeContext>, cfg: &AppConfig) -> Self {
        Self { ctx, limit: cfg.vendor_result_limit }
    }

    pub fn search_url(brand: &str, model: &str) -> String {
        let query = format!("{} {}", brand, model);
        Url::parse_with_params(SEARCH_URL, &[("q", query.as_str())])
            .map(|u| u.to_string())
            .unwrap_or_else(|_| SEARCH_URL.to_string())
    }

    pub fn parse(&self, html: &str, brand: &str, model: &str) -> Vec<ListingRecord> {
        parse_storefront(html, &LAYOUT, self.limit, brand, model, &self.ctx.policy)
    }
}

#[async_trait::async_trait]
impl Probe for TestEquipmentCenterProbe {
    fn name(&self) -> &str {
        "testequipment_center"
    }

    async fn probe(&self, brand: &str, model: &str) -> Vec<ListingRecord> {
        let req = FetchRequest::desktop(Self::search_url(brand, model));
        match self.ctx.fetch_page(SOURCE, &req).await {
            Some(html) => self.parse(&html, brand, model),
            None => Vec::new(),
        }
    }
}
