// Price extraction from free-form listing text
use crate::config::PriceBounds;
use regex::Regex;
use std::sync::LazyLock;

const AMOUNT: &str = r"(\d{1,3}(?:,\d{3})+(?:\.\d{1,2})?|\d+(?:\.\d{1,2})?)";

/// Currency-marked amounts, most explicit first.
static CURRENCY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        format!(r"(?i)\${AMOUNT}"),
        format!(r"(?i)USD\s*{AMOUNT}"),
        format!(r"(?i){AMOUNT}\s*USD"),
        format!(r"(?i)Price:\s*\$?{AMOUNT}"),
    ]
    .iter()
    .map(|p| Regex::new(p).expect("currency pattern is valid"))
    .collect()
});

/// Shapes like `8116A`, `3458A` or `HP8116A`.
static MODEL_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b\d{4}[A-Z]?\b|\b[A-Z]{1,3}\d{4}[A-Z]?\b").expect("model pattern is valid")
});

static CURRENCY_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\$|USD|Price|Cost").expect("marker pattern is valid"));

/// Pulls a plausible equipment price out of listing text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriceExtractor {
    bounds: PriceBounds,
}

impl PriceExtractor {
    pub fn new(bounds: PriceBounds) -> Self {
        Self { bounds }
    }

    /// Returns the first currency-marked amount inside the plausible bounds.
    ///
    /// Text that carries a model number but no currency marker never yields
    /// a price, so `8116A` is not read as dollars.
    pub fn extract(&self, text: &str) -> Option<f64> {
        if text.trim().is_empty() {
            return None;
        }
        if MODEL_NUMBER.is_match(text) && !CURRENCY_MARKER.is_match(text) {
            return None;
        }

        CURRENCY_PATTERNS.iter().find_map(|pattern| {
            pattern
                .captures_iter(text)
                .filter_map(|caps| caps.get(1)?.as_str().replace(',', "").parse::<f64>().ok())
                .find(|price| self.in_bounds(*price))
        })
    }

    fn in_bounds(&self, price: f64) -> bool {
        price >= self.bounds.min && price <= self.bounds.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> Option<f64> {
        PriceExtractor::default().extract(text)
    }

    #[test]
    fn labelled_price_with_separators() {
        assert_eq!(extract("Price: $1,234.56"), Some(1234.56));
    }

    #[test]
    fn bare_model_number_is_not_a_price() {
        assert_eq!(extract("Model 8116A"), None);
        assert_eq!(extract("HP8116A pulse generator 50 MHz"), None);
    }

    #[test]
    fn below_floor_is_rejected() {
        assert_eq!(extract("$5.00"), None);
    }

    #[test]
    fn bounds_are_inclusive() {
        assert_eq!(extract("$10"), Some(10.0));
        assert_eq!(extract("$1,000,000"), Some(1_000_000.0));
        assert_eq!(extract("$9.99"), None);
        assert_eq!(extract("$1,000,000.01"), None);
    }

    #[test]
    fn above_ceiling_is_skipped_for_next_match() {
        assert_eq!(extract("$2,000,000 or $4,500"), Some(4500.0));
    }

    #[test]
    fn usd_prefix_and_suffix() {
        assert_eq!(extract("USD 2500"), Some(2500.0));
        assert_eq!(extract("asking 1,750.00 USD obo"), Some(1750.0));
        assert_eq!(extract("usd1999.99"), Some(1999.99));
    }

    #[test]
    fn unseparated_amount_keeps_all_digits() {
        assert_eq!(extract("$1234.56"), Some(1234.56));
    }

    #[test]
    fn model_number_with_currency_still_prices() {
        assert_eq!(extract("Agilent 8116A - $3,450.00"), Some(3450.0));
    }

    #[test]
    fn text_without_marker_has_no_price() {
        assert_eq!(extract("Call for quote"), None);
        assert_eq!(extract(""), None);
        assert_eq!(extract("1500"), None);
    }

    #[test]
    fn custom_bounds_apply() {
        let extractor = PriceExtractor::new(PriceBounds { min: 1.0, max: 100.0 });
        assert_eq!(extractor.extract("$5.00"), Some(5.0));
        assert_eq!(extractor.extract("$500"), None);
    }
}
