use tscat::{Catalog, Translation, locale::normalize_tag};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::inputs::Input;

const MAX_WIDTH: usize = 50;

/// Truncates `value` to `max` terminal columns, appending `...` when cut.
pub fn truncate(value: &str, max: usize) -> String {
    if value.width() <= max {
        return value.to_string();
    }
    let mut out = String::new();
    let mut width = 0;
    for c in value.chars() {
        let w = c.width().unwrap_or(0);
        if width + w > max {
            break;
        }
        width += w;
        out.push(c);
    }
    out.push_str("...");
    out
}

/// Print the contexts and messages of each catalog.
///
/// Returns an error when no catalog matches `lang_filter`.
pub fn print_view(
    inputs: &[Input<Catalog>],
    lang_filter: Option<&str>,
    full: bool,
) -> Result<(), String> {
    // Piped output is never truncated.
    let full = full || !atty::is(atty::Stream::Stdout);
    let show = |value: &str| {
        if full {
            value.to_string()
        } else {
            truncate(value, MAX_WIDTH)
        }
    };

    let wanted = lang_filter.map(normalize_tag);
    let mut shown = 0;
    for input in inputs {
        let catalog = match &input.result {
            Ok(catalog) => catalog,
            Err(e) => return Err(format!("Error reading {}: {}", input.path, e)),
        };
        if wanted.as_ref().is_some_and(|w| *w != catalog.locale_key()) {
            continue;
        }
        shown += 1;

        println!("\n=== Catalog {} ===", shown);
        println!("File: {}", input.path);
        println!("Language: {}", catalog.locale);
        if let Some(source_locale) = &catalog.source_locale {
            println!("Source language: {}", source_locale);
        }
        println!("Contexts: {}", catalog.contexts.len());
        println!("Messages: {}", catalog.message_count());

        for context in &catalog.contexts {
            println!("\n  [{}]", context.name);
            for message in &context.messages {
                println!("\n    Source: {}", show(&message.source));
                if let Some(comment) = message.disambiguation() {
                    println!("      Comment: {}", comment);
                }
                if let Some(extra) = &message.extra_comment {
                    println!("      Note: {}", show(extra));
                }
                println!("      Status: {}", message.status);
                match &message.translation {
                    None => println!("      Translation: <none>"),
                    Some(Translation::Singular(value)) => {
                        println!("      Translation: {}", show(value))
                    }
                    Some(Translation::Plural(forms)) => {
                        let rule = tscat::resolve_rule(&catalog.locale);
                        for (i, form) in forms.iter().enumerate() {
                            let category = rule
                                .categories()
                                .get(i)
                                .map(|c| c.as_str())
                                .unwrap_or("?");
                            println!("      {}: {}", category, show(form));
                        }
                    }
                }
            }
        }
    }

    if shown == 0 {
        return Err(match lang_filter {
            Some(lang) => format!("No catalogs found for language: {}", lang),
            None => "No catalogs found".to_string(),
        });
    }
    Ok(())
}
