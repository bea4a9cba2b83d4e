use crate::model::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const MOBILE_USER_AGENT: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 14_6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.0.3 Mobile/15E148 Safari/604.1";

/// Sources the aggregator knows how to probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeKind {
    DuckDuckGo,
    Ebay,
    Valuetronics,
    TestEquipmentCenter,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_seconds: u64,
    pub user_agent: String,
    pub mobile_user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 10,
            user_agent: DESKTOP_USER_AGENT.to_string(),
            mobile_user_agent: MOBILE_USER_AGENT.to_string(),
        }
    }
}

/// Bounds of the random pause taken after each outbound request.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct DelayConfig {
    pub min_seconds: f64,
    pub max_seconds: f64,
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self { min_seconds: 1.0, max_seconds: 2.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PriceBounds {
    pub min: f64,
    pub max: f64,
}

impl Default for PriceBounds {
    fn default() -> Self {
        Self { min: 10.0, max: 1_000_000.0 }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct KnownVendor {
    pub domain: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BrandPriceRange {
    pub brand: String,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VendorTemplate {
    pub name: String,
    /// Placeholders: `{brand}`, `{model}`, `{brand_lower}`, `{model_lower}`.
    pub url_template: String,
    pub price_multiplier: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    pub price_ranges: Vec<BrandPriceRange>,
    pub default_range: PriceBounds,
    pub vendors: Vec<VendorTemplate>,
    pub availability: Vec<String>,
    pub count: usize,
    pub price_floor: f64,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        let range = |brand: &str, min: f64, max: f64| BrandPriceRange {
            brand: brand.to_string(),
            min,
            max,
        };
        let vendor = |name: &str, url_template: &str, price_multiplier: f64| VendorTemplate {
            name: name.to_string(),
            url_template: url_template.to_string(),
            price_multiplier,
        };

        Self {
            price_ranges: vec![
                range("agilent", 1200.0, 15000.0),
                range("keysight", 1500.0, 25000.0),
                range("tektronix", 1100.0, 20000.0),
                range("fluke", 1000.0, 5000.0),
                range("rohde", 2000.0, 30000.0),
                range("anritsu", 3000.0, 50000.0),
            ],
            default_range: PriceBounds { min: 1000.0, max: 10000.0 },
            vendors: vec![
                vendor("TestMart", "https://www.testmart.com/products/{brand_lower}-{model_lower}", 1.0),
                vendor("CircuitSpecialists", "https://www.circuitspecialists.com/{brand_lower}-{model_lower}", 0.9),
                vendor("Keysight Direct", "https://www.keysight.com/us/en/product/{model}", 1.2),
                vendor("TestEquipmentDepot", "https://www.testequipmentdepot.com/{brand}-{model}", 0.85),
            ],
            availability: ["1 available", "2-3 weeks lead time", "In stock", "Call for availability"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            count: 3,
            price_floor: 1000.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub delay: DelayConfig,
    /// Fixed seed for delays and fallback prices; entropy when absent.
    pub seed: Option<u64>,
    pub probes: Vec<ProbeKind>,
    pub search_result_limit: usize,
    pub vendor_result_limit: usize,
    pub min_listing_price: f64,
    pub price_bounds: PriceBounds,
    pub excluded_domains: Vec<String>,
    pub known_vendors: Vec<KnownVendor>,
    pub fallback: FallbackConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let known = |domain: &str, name: &str| KnownVendor {
            domain: domain.to_string(),
            name: name.to_string(),
        };

        Self {
            http: HttpConfig::default(),
            delay: DelayConfig::default(),
            seed: None,
            probes: vec![
                ProbeKind::DuckDuckGo,
                ProbeKind::Valuetronics,
                ProbeKind::TestEquipmentCenter,
            ],
            search_result_limit: 10,
            vendor_result_limit: 5,
            min_listing_price: 1000.0,
            price_bounds: PriceBounds::default(),
            excluded_domains: vec!["ebay.com".to_string()],
            known_vendors: vec![
                known("valuetronics.com", "Valuetronics"),
                known("testequipment.center", "TestEquipment.center"),
                known("testworld.com", "TestWorld"),
                known("amazon.com", "Amazon"),
                known("keysight.com", "Keysight"),
                known("agilent.com", "Agilent"),
            ],
            fallback: FallbackConfig::default(),
        }
    }
}

impl AppConfig {
    /// Rejects values the throttle, the price filters or the fallback
    /// cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            ("delay.min_seconds", self.delay.min_seconds),
            ("delay.max_seconds", self.delay.max_seconds),
            ("price_bounds.min", self.price_bounds.min),
            ("price_bounds.max", self.price_bounds.max),
            ("min_listing_price", self.min_listing_price),
            ("fallback.default_range.min", self.fallback.default_range.min),
            ("fallback.default_range.max", self.fallback.default_range.max),
            ("fallback.price_floor", self.fallback.price_floor),
        ];
        let ranges = self
            .fallback
            .price_ranges
            .iter()
            .flat_map(|r| [(r.brand.as_str(), r.min), (r.brand.as_str(), r.max)]);
        let multipliers = self
            .fallback
            .vendors
            .iter()
            .map(|v| (v.name.as_str(), v.price_multiplier));

        if let Some((name, value)) = finite.into_iter().chain(ranges).chain(multipliers).find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::Invalid(format!("{} must be a finite number, got {}", name, value)));
        }
        if self.fallback.vendors.is_empty() {
            return Err(ConfigError::Invalid("fallback.vendors must not be empty".to_string()));
        }
        if self.fallback.count == 0 {
            return Err(ConfigError::Invalid("fallback.count must be at least 1".to_string()));
        }
        Ok(())
    }
}

pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: AppConfig = serde_json::from_str(
            r#"{ "seed": 7, "probes": ["ebay", "test_equipment_center"], "delay": { "max_seconds": 0.5 } }"#,
        )
        .unwrap();

        assert_eq!(config.seed, Some(7));
        assert_eq!(config.probes, vec![ProbeKind::Ebay, ProbeKind::TestEquipmentCenter]);
        assert_eq!(config.delay.min_seconds, 1.0);
        assert_eq!(config.delay.max_seconds, 0.5);
        assert_eq!(config.min_listing_price, 1000.0);
        assert_eq!(config.fallback.vendors.len(), 4);
        assert_eq!(config.http.timeout_seconds, 10);
    }

    #[test]
    fn default_probe_order_is_search_then_vendors() {
        let config = AppConfig::default();
        assert_eq!(
            config.probes,
            vec![ProbeKind::DuckDuckGo, ProbeKind::Valuetronics, ProbeKind::TestEquipmentCenter]
        );
    }

    #[test]
    fn defaults_are_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        let mut config = AppConfig::default();
        config.delay.max_seconds = f64::INFINITY;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(msg)) if msg.contains("delay.max_seconds")));

        let mut config = AppConfig::default();
        config.price_bounds.min = f64::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(msg)) if msg.contains("price_bounds.min")));

        let mut config = AppConfig::default();
        config.fallback.price_ranges[0].max = f64::INFINITY;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn fallback_must_produce_listings() {
        let config: AppConfig = serde_json::from_str(r#"{ "fallback": { "vendors": [] } }"#).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(msg)) if msg.contains("vendors")));

        let config: AppConfig = serde_json::from_str(r#"{ "fallback": { "count": 0 } }"#).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(msg)) if msg.contains("count")));
    }

    #[test]
    fn load_config_validates_file() {
        let path = std::env::temp_dir().join(format!("ate-market-scout-{}.json", std::process::id()));
        fs::write(&path, r#"{ "fallback": { "vendors": [] } }"#).unwrap();
        let result = load_config(&path);
        fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_config("does/not/exist.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
