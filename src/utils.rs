// Utility functions

/// Capitalises the first letter of every alphabetic run and lowercases the
/// rest, so `test-equip.co.uk` becomes `Test-Equip.Co.Uk`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

/// Fills `{brand}`, `{model}`, `{brand_lower}` and `{model_lower}` in a URL template.
pub fn fill_template(template: &str, brand: &str, model: &str) -> String {
    template
        .replace("{brand_lower}", &brand.to_lowercase())
        .replace("{model_lower}", &model.to_lowercase())
        .replace("{brand}", brand)
        .replace("{model}", model)
}

/// Cuts text to at most `max` characters for log lines.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
