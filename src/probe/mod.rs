// Source probes: one per site, each turning a (brand, model) into listings
pub mod duckduckgo;
pub mod ebay;
pub mod testequipment_center;
pub mod valuetronics;
mod vendor;

pub use duckduckgo::DuckDuckGoProbe;
pub use ebay::EbayProbe;
pub use testequipment_center::TestEquipmentCenterProbe;
pub use valuetronics::ValuetronicsProbe;

use crate::config::{AppConfig, ProbeKind};
use crate::fetch::{FetchRequest, Session};
use crate::model::{CONTACT_VENDOR, ListingRecord, format_price};
use crate::price::PriceExtractor;
use scraper::{ElementRef, Selector};
use std::sync::Arc;
use tracing::{debug, warn};

#[async_trait::async_trait]
pub trait Probe: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Best effort: failures are logged and yield no listings.
    async fn probe(&self, brand: &str, model: &str) -> Vec<ListingRecord>;
}

/// Filters every probe applies before a candidate becomes a listing.
#[derive(Debug, Clone, Copy)]
pub struct ListingPolicy {
    pub extractor: PriceExtractor,
    pub min_listing_price: f64,
}

impl ListingPolicy {
    pub fn from_config(cfg: &AppConfig) -> Self {
        Self {
            extractor: PriceExtractor::new(cfg.price_bounds),
            min_listing_price: cfg.min_listing_price,
        }
    }

    /// True when the title mentions the brand or the model.
    pub fn is_relevant(&self, title: &str, brand: &str, model: &str) -> bool {
        let title = title.to_lowercase();
        [brand, model]
            .iter()
            .any(|term| title.contains(&term.to_lowercase()))
    }

    /// Display price for a candidate, or `None` when it is too cheap to keep.
    pub fn price_display(&self, price: Option<f64>) -> Option<String> {
        match price {
            None => Some(CONTACT_VENDOR.to_string()),
            Some(p) if p >= self.min_listing_price => Some(format_price(p)),
            Some(_) => None,
        }
    }
}

impl Default for ListingPolicy {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

/// What a probe needs to reach the network and judge candidates.
pub struct ProbeContext {
    pub session: Arc<Session>,
    pub policy: ListingPolicy,
}

impl ProbeContext {
    /// Fetches a page, logging and swallowing any failure.
    pub async fn fetch_page(&self, source: &str, req: &FetchRequest) -> Option<String> {
        debug!(source, url = %req.url, "fetching");
        match self.session.get(req).await {
            Ok(body) => Some(body),
            Err(e) => {
                warn!(source, url = %req.url, error = %e, "fetch failed");
                None
            }
        }
    }
}

/// Builds the configured probes in order, all sharing one context.
pub fn build_probes(cfg: &AppConfig, ctx: Arc<ProbeContext>) -> Vec<Box<dyn Probe>> {
    cfg.probes
        .iter()
        .map(|kind| -> Box<dyn Probe> {
            match kind {
                ProbeKind::DuckDuckGo => Box::new(DuckDuckGoProbe::new(ctx.clone(), cfg)),
                ProbeKind::Ebay => Box::new(EbayProbe::new(ctx.clone(), cfg)),
                ProbeKind::Valuetronics => Box::new(ValuetronicsProbe::new(ctx.clone(), cfg)),
                ProbeKind::TestEquipmentCenter => {
                    Box::new(TestEquipmentCenterProbe::new(ctx.clone(), cfg))
                }
            }
        })
        .collect()
}

pub(crate) fn css(selector: &'static str) -> Selector {
    Selector::parse(selector).expect("static selector is valid")
}

/// First element matching any of the selectors, tried in order.
pub(crate) fn select_first<'a>(el: ElementRef<'a>, selectors: &[&Selector]) -> Option<ElementRef<'a>> {
    selectors.iter().find_map(|s| el.select(s).next())
}

/// Visible text with whitespace collapsed.
pub(crate) fn text_of(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PRICE_NOT_AVAILABLE;

    #[test]
    fn relevance_is_case_insensitive_on_brand_or_model() {
        let policy = ListingPolicy::default();
        assert!(policy.is_relevant("AGILENT pulse generator", "Agilent", "8116A"));
        assert!(policy.is_relevant("HP 8116a 50MHz", "Agilent", "8116A"));
        assert!(!policy.is_relevant("Tektronix TDS744A", "Agilent", "8116A"));
    }

    #[test]
    fn price_policy_keeps_unknown_and_expensive_only() {
        let policy = ListingPolicy::default();
        assert_eq!(policy.price_display(None).as_deref(), Some(CONTACT_VENDOR));
        assert_eq!(policy.price_display(Some(1000.0)).as_deref(), Some("$1000.00"));
        assert_eq!(policy.price_display(Some(999.99)), None);
        assert_ne!(policy.price_display(None).as_deref(), Some(PRICE_NOT_AVAILABLE));
    }

    #[test]
    fn build_probes_follows_configured_order() {
        let ctx = testing::context(Arc::new(testing::FakeFetcher::default()));
        let mut cfg = AppConfig::default();
        cfg.probes = vec![ProbeKind::Ebay, ProbeKind::DuckDuckGo, ProbeKind::Valuetronics];

        let names: Vec<String> = build_probes(&cfg, ctx)
            .iter()
            .map(|p| p.name().to_string())
            .collect();
        assert_eq!(names, vec!["ebay", "duckduckgo", "valuetronics"]);
    }
}
