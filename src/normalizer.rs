// Turns free-text equipment queries into brand, model and option codes
use crate::model::{NormalizeError, NormalizedQuery, NormalizerPayload};
use tracing::warn;

const FILLER_WORDS: &[&str] = &["with", "options", "option", "like", "such", "as", "enter", "a", "query"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    pub brand: String,
    pub model: String,
    pub raw_options: String,
}

fn is_filler(word: &str) -> bool {
    let word = word.trim_end_matches(':').to_lowercase();
    FILLER_WORDS.contains(&word.as_str())
}

/// Splits `"Agilent 8116A /160/EEC/PLK/UK6 has to be delivered soon"` into
/// brand `Agilent`, model `8116A` and raw options `/160/EEC/PLK/UK6`.
///
/// Brand and model are the first two non-filler words before the first `/`.
/// The raw options run from the word holding the first `/` through the word
/// holding the last; anything after that is ignored.
pub fn parse_query(text: &str) -> ParsedQuery {
    let text = text.trim();
    let head = match text.find('/') {
        Some(idx) => &text[..idx],
        None => text,
    };

    let mut words = head.split_whitespace().filter(|w| !is_filler(w));
    let brand = words.next().unwrap_or("").to_string();
    let model = words.next().unwrap_or("").to_string();

    ParsedQuery { brand, model, raw_options: options_span(text).to_string() }
}

/// From the start of the word holding the first `/` to the end of the word
/// holding the last one.
fn options_span(text: &str) -> &str {
    let (Some(first), Some(last)) = (text.find('/'), text.rfind('/')) else {
        return "";
    };
    let start = text[..first]
        .rfind(char::is_whitespace)
        .map(|idx| idx + text[idx..].chars().next().map_or(1, char::len_utf8))
        .unwrap_or(0);
    let end = text[last..]
        .find(char::is_whitespace)
        .map(|idx| last + idx)
        .unwrap_or(text.len());
    &text[start..end]
}

/// Splits on `/`, trimming and dropping empty entries.
pub fn split_options(raw_options: &str) -> Vec<String> {
    raw_options
        .split('/')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

/// Option codes for a known piece of equipment, without entries that merely
/// repeat its brand or model.
pub fn equipment_options(raw_options: &str, brand: &str, model: &str) -> Vec<String> {
    let brand = brand.to_lowercase();
    let model = model.to_lowercase();
    split_options(raw_options)
        .into_iter()
        .filter(|o| {
            let o = o.to_lowercase();
            o != brand && o != model
        })
        .collect()
}

/// Text handed to a normalizer for one piece of equipment.
pub fn normalizer_input(brand: &str, model: &str, options: &[String]) -> String {
    if options.is_empty() {
        format!("{} {}", brand, model)
    } else {
        format!("{} {} {}", brand, model, options.join("/"))
    }
}

/// Reads a normalizer reply such as a model completion. The reply must be a
/// JSON object carrying a `normalized` member.
pub fn parse_payload(content: &str) -> Result<NormalizerPayload, NormalizeError> {
    serde_json::from_str(content.trim()).map_err(|e| NormalizeError::Malformed(e.to_string()))
}

/// Structures free text into brand, model and options. A language-model
/// backed implementation plugs in here.
#[async_trait::async_trait]
pub trait Normalizer: Send + Sync {
    async fn normalize(&self, text: &str) -> Result<NormalizerPayload, NormalizeError>;
}

/// Deterministic normalizer built on [`parse_query`].
pub struct RuleBasedNormalizer;

impl RuleBasedNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RuleBasedNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Normalizer for RuleBasedNormalizer {
    async fn normalize(&self, text: &str) -> Result<NormalizerPayload, NormalizeError> {
        let parsed = parse_query(text);
        let options = equipment_options(&parsed.raw_options, &parsed.brand, &parsed.model);
        Ok(NormalizerPayload {
            normalized: NormalizedQuery {
                brand: parsed.brand,
                model: parsed.model,
                options,
            },
            results: Vec::new(),
        })
    }
}

/// Normalizes a known brand/model/options triple. The brand and model the
/// caller already knows always win over what the normalizer returns; a
/// failing normalizer leaves the options empty.
pub async fn normalize_equipment(
    normalizer: &dyn Normalizer,
    brand: &str,
    model: &str,
    raw_options: &str,
) -> NormalizerPayload {
    let options = equipment_options(raw_options, brand, model);
    let input = normalizer_input(brand, model, &options);

    let mut payload = match normalizer.normalize(&input).await {
        Ok(payload) => payload,
        Err(e) => {
            warn!("Normalizer failed for '{}': {}", input, e);
            NormalizerPayload::default()
        }
    };
    payload.normalized.brand = brand.to_string();
    payload.normalized.model = model.to_string();
    payload
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_query_with_trailing_text() {
        let parsed = parse_query("Enter a query like: Agilent 8116A /160/EEC/PLK/UK6 has to be delivered soon");
        assert_eq!(parsed.brand, "Agilent");
        assert_eq!(parsed.model, "8116A");
        assert_eq!(parsed.raw_options, "/160/EEC/PLK/UK6");
        assert_eq!(split_options(&parsed.raw_options), vec!["160", "EEC", "PLK", "UK6"]);
    }

    #[test]
    fn first_option_glued_to_slash_is_kept() {
        let parsed = parse_query("Agilent 8116A with options like 160/EEC/PLK/UK6 please deliver quickly");
        assert_eq!((parsed.brand.as_str(), parsed.model.as_str()), ("Agilent", "8116A"));
        assert_eq!(split_options(&parsed.raw_options), vec!["160", "EEC", "PLK", "UK6"]);
    }

    #[test]
    fn options_separated_by_spaces() {
        let parsed = parse_query("Agilent 8116A /160 /EEC/PLK trailing");
        assert_eq!(parsed.raw_options, "/160 /EEC/PLK");
        assert_eq!(split_options(&parsed.raw_options), vec!["160", "EEC", "PLK"]);

        let parsed = parse_query("Agilent 8116A / 160 / EEC");
        assert_eq!(parsed.brand, "Agilent");
        assert_eq!(parsed.raw_options, "/ 160 /");
        assert_eq!(split_options(&parsed.raw_options), vec!["160"]);
    }

    #[test]
    fn query_without_options() {
        let parsed = parse_query("  Tektronix TDS744A  ");
        assert_eq!(
            parsed,
            ParsedQuery { brand: "Tektronix".into(), model: "TDS744A".into(), raw_options: String::new() }
        );
        assert_eq!(parse_query(""), ParsedQuery::default());
    }

    #[test]
    fn equipment_options_drop_brand_and_model() {
        assert_eq!(
            equipment_options("8116A/001//UK6 ", "Agilent", "8116a"),
            vec!["001", "UK6"]
        );
        assert!(equipment_options("", "Agilent", "8116A").is_empty());
    }

    #[test]
    fn input_joins_options() {
        let options = vec!["B711".to_string(), "B86".to_string()];
        assert_eq!(normalizer_input("R&S", "SMA100B", &options), "R&S SMA100B B711/B86");
        assert_eq!(normalizer_input("Anritsu", "MS2090A", &[]), "Anritsu MS2090A");
    }

    #[test]
    fn payload_requires_normalized_member() {
        let payload = parse_payload(
            r#"{"normalized": {"brand": "Agilent", "model": "8116A", "options": ["160"]}, "results": []}"#,
        )
        .unwrap();
        assert_eq!(payload.normalized.options, vec!["160"]);

        assert!(matches!(parse_payload(r#"{"results": []}"#), Err(NormalizeError::Malformed(_))));
        assert!(matches!(parse_payload("not json"), Err(NormalizeError::Malformed(_))));
    }

    #[tokio::test]
    async fn rule_based_round_trips_known_equipment() {
        let payload = normalize_equipment(
            &RuleBasedNormalizer::new(),
            "Rohde & Schwarz",
            "SMA100B",
            "B711/B86/B93/B35",
        )
        .await;

        assert_eq!(payload.normalized.brand, "Rohde & Schwarz");
        assert_eq!(payload.normalized.model, "SMA100B");
        assert_eq!(payload.normalized.options, vec!["B711", "B86", "B93", "B35"]);
        assert!(payload.results.is_empty());
    }

    #[tokio::test]
    async fn failing_normalizer_keeps_brand_and_model() {
        struct Offline;

        #[async_trait::async_trait]
        impl Normalizer for Offline {
            async fn normalize(&self, _text: &str) -> Result<NormalizerPayload, NormalizeError> {
                Err(NormalizeError::Unavailable("no api key".into()))
            }
        }

        let payload = normalize_equipment(&Offline, "Boonton", "4500C", "006").await;

        assert_eq!(payload.normalized.brand, "Boonton");
        assert_eq!(payload.normalized.model, "4500C");
        assert!(payload.normalized.options.is_empty());
    }
}
