use serde_json::json;
use std::collections::BTreeMap;
use tscat::{Catalog, MessageStatus, resolve_rule, validation::collect_plural_issues};

use crate::inputs::Input;

#[derive(Default)]
struct CatalogStats {
    total: usize,
    by_status: BTreeMap<&'static str, usize>,
    translated: usize,
    denominator: usize,
    numerus: usize,
    plural_issues: usize,
}

fn collect(catalog: &Catalog) -> CatalogStats {
    let mut stats = CatalogStats::default();
    for status in [
        MessageStatus::Translated,
        MessageStatus::Unfinished,
        MessageStatus::Obsolete,
    ] {
        stats.by_status.insert(status.as_str(), 0);
    }
    for (_, message) in catalog.messages() {
        stats.total += 1;
        *stats.by_status.entry(message.status.as_str()).or_insert(0) += 1;
        if message.status == MessageStatus::Translated {
            stats.translated += 1;
        }
        // Obsolete messages are not expected to be translated.
        if message.status != MessageStatus::Obsolete {
            stats.denominator += 1;
        }
        if message.numerus {
            stats.numerus += 1;
        }
    }
    stats.plural_issues = collect_plural_issues(catalog, resolve_rule(&catalog.locale)).len();
    stats
}

fn completion(stats: &CatalogStats) -> f64 {
    if stats.denominator == 0 {
        100.0
    } else {
        (stats.translated as f64) * 100.0 / (stats.denominator as f64)
    }
}

pub fn print_stats(inputs: &[Input<Catalog>], json_output: bool) -> Result<(), String> {
    let mut catalogs = Vec::with_capacity(inputs.len());
    for input in inputs {
        match &input.result {
            Ok(catalog) => catalogs.push((input.path.as_str(), catalog)),
            Err(e) => return Err(format!("Error reading {}: {}", input.path, e)),
        }
    }
    let total_messages: usize = catalogs.iter().map(|(_, c)| c.message_count()).sum();

    if json_output {
        let per_catalog: Vec<_> = catalogs
            .iter()
            .map(|(path, catalog)| {
                let stats = collect(catalog);
                json!({
                    "file": path,
                    "language": catalog.locale,
                    "contexts": catalog.contexts.len(),
                    "total": stats.total,
                    "by_status": stats.by_status,
                    "numerus": stats.numerus,
                    "completion_percent": (completion(&stats) * 100.0).round() / 100.0,
                    "plural_issues": stats.plural_issues,
                })
            })
            .collect();
        let body = json!({
            "summary": {
                "catalogs": catalogs.len(),
                "messages": total_messages,
            },
            "catalogs": per_catalog,
        });
        let text = serde_json::to_string_pretty(&body)
            .map_err(|e| format!("Error serializing stats: {}", e))?;
        println!("{}", text);
        return Ok(());
    }

    println!("=== Stats ===");
    println!("Catalogs: {}", catalogs.len());
    println!("Messages: {}", total_messages);

    for (path, catalog) in &catalogs {
        let stats = collect(catalog);
        println!("\nLanguage: {} ({})", catalog.locale, path);
        println!("  Contexts: {}", catalog.contexts.len());
        println!("  Total: {}", stats.total);
        println!("  By status:");
        for (status, count) in &stats.by_status {
            println!("    {}: {}", status, count);
        }
        println!("  Numerus messages: {}", stats.numerus);
        println!("  Completion: {:.2}%", completion(&stats));
        println!("  Plural form mismatches: {}", stats.plural_issues);
    }
    Ok(())
}
