// Plain-text table of listings for terminal output
use crate::model::{AggregateResult, NormalizedQuery};
use std::fmt::Write;

const HEADERS: [&str; 5] = ["Vendor", "Price", "Availability", "Source", "URL"];

pub fn render_listings(result: &AggregateResult) -> String {
    let rows: Vec<[&str; 5]> = result
        .search_results
        .iter()
        .map(|r| [r.vendor.as_str(), r.price.as_str(), r.qty_available.as_str(), r.source.as_str(), r.web_url.as_str()])
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    write_row(&mut out, &HEADERS, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let rule: Vec<&str> = rule.iter().map(String::as_str).collect();
    write_row(&mut out, &rule, &widths);
    for row in &rows {
        write_row(&mut out, row, &widths);
    }
    let _ = writeln!(out, "{} listing(s) from {} source(s)", result.total_found, result.sources.len());
    out
}

pub fn render_options(query: &NormalizedQuery) -> String {
    if query.options.is_empty() {
        return "No options found for this equipment model.\n".to_string();
    }
    let mut out = String::new();
    for (i, option) in query.options.iter().enumerate() {
        let _ = writeln!(out, "{:>3}. {}", i + 1, option);
    }
    out
}

fn write_row(out: &mut String, cells: &[&str], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, w)| format!("{:<width$}", cell, width = *w))
        .collect();
    let _ = writeln!(out, "{}", line.join(" | ").trim_end());
}
