// Placeholder listings for when no live source returns anything
use crate::config::{FallbackConfig, PriceBounds};
use crate::model::{ListingRecord, format_price};
use crate::utils::fill_template;
use rand::Rng;

pub struct FallbackSynthesizer {
    cfg: FallbackConfig,
}

impl FallbackSynthesizer {
    pub fn new(cfg: FallbackConfig) -> Self {
        Self { cfg }
    }

    /// Plausible price range for a brand: exact key first, then the first
    /// key contained in the brand, else the default range.
    pub fn price_range(&self, brand: &str) -> PriceBounds {
        let brand = brand.to_lowercase();
        let ranges = &self.cfg.price_ranges;
        ranges
            .iter()
            .find(|r| r.brand.to_lowercase() == brand)
            .or_else(|| ranges.iter().find(|r| brand.contains(&r.brand.to_lowercase())))
            .map(|r| PriceBounds { min: r.min, max: r.max })
            .unwrap_or(self.cfg.default_range)
    }

    pub fn synthesize<R: Rng + ?Sized>(&self, brand: &str, model: &str, rng: &mut R) -> Vec<ListingRecord> {
        let floor = self.cfg.price_floor;
        let range = self.price_range(brand);
        let lo = range.min.max(floor);
        let hi = range.max.max(lo);
        let base = if hi > lo { rng.random_range(lo..=hi) } else { lo };

        self.cfg
            .vendors
            .iter()
            .take(self.cfg.count)
            .enumerate()
            .map(|(i, vendor)| {
                let price = (base * vendor.price_multiplier).max(floor);
                let availability = if self.cfg.availability.is_empty() {
                    String::new()
                } else {
                    self.cfg.availability[i % self.cfg.availability.len()].clone()
                };
                ListingRecord {
                    brand: brand.to_string(),
                    model: model.to_string(),
                    price: format_price(price),
                    vendor: vendor.name.clone(),
                    web_url: fill_template(&vendor.url_template, brand, model),
                    qty_available: availability,
                    source: vendor.name.clone(),
                }
            })
            .collect()
    }
}

impl Default for FallbackSynthesizer {
    fn default() -> Self {
        Self::new(FallbackConfig::default())
    }
}
