use serde_json::json;
use tscat::{
    CatalogHandle,
    validation::{PlaceholderIssue, PluralIssue, collect_placeholder_issues, collect_plural_issues},
};

use crate::inputs::Input;

/// Outcome of validating a set of catalogs.
#[derive(Debug, Default)]
pub struct ValidationSummary {
    pub load_failures: usize,
    pub lint_issues: usize,
}

impl ValidationSummary {
    /// Whether the run should exit non-zero.
    pub fn failed(&self, strict: bool) -> bool {
        self.load_failures > 0 || (strict && self.lint_issues > 0)
    }
}

struct Report<'a> {
    path: &'a str,
    error: Option<String>,
    locale: Option<&'a str>,
    messages: usize,
    plural: Vec<PluralIssue>,
    placeholders: Vec<PlaceholderIssue>,
}

fn report(input: &Input<CatalogHandle>) -> Report<'_> {
    match &input.result {
        Ok(handle) => Report {
            path: &input.path,
            error: None,
            locale: Some(handle.locale()),
            messages: handle.catalog().message_count(),
            plural: collect_plural_issues(handle.catalog(), handle.rule()),
            placeholders: collect_placeholder_issues(handle.catalog()),
        },
        Err(e) => Report {
            path: &input.path,
            error: Some(e.to_string()),
            locale: None,
            messages: 0,
            plural: Vec::new(),
            placeholders: Vec::new(),
        },
    }
}

/// Prints load errors and lint for each catalog.
pub fn run_validate(
    inputs: &[Input<CatalogHandle>],
    json_output: bool,
) -> Result<ValidationSummary, String> {
    let reports: Vec<Report> = inputs.iter().map(report).collect();
    let summary = ValidationSummary {
        load_failures: reports.iter().filter(|r| r.error.is_some()).count(),
        lint_issues: reports
            .iter()
            .map(|r| r.plural.len() + r.placeholders.len())
            .sum(),
    };

    if json_output {
        let catalogs: Vec<_> = reports
            .iter()
            .map(|r| {
                json!({
                    "file": r.path,
                    "ok": r.error.is_none(),
                    "error": r.error,
                    "language": r.locale,
                    "messages": r.messages,
                    "plural_issues": r.plural,
                    "placeholder_issues": r.placeholders,
                })
            })
            .collect();
        let body = json!({
            "summary": {
                "catalogs": reports.len(),
                "load_failures": summary.load_failures,
                "lint_issues": summary.lint_issues,
            },
            "catalogs": catalogs,
        });
        let text = serde_json::to_string_pretty(&body)
            .map_err(|e| format!("Error serializing report: {}", e))?;
        println!("{}", text);
        return Ok(summary);
    }

    for r in &reports {
        match &r.error {
            Some(error) => {
                eprintln!("❌ {}: {}", r.path, error);
                continue;
            }
            None => println!(
                "✅ {} ({}, {} messages)",
                r.path,
                r.locale.unwrap_or_default(),
                r.messages
            ),
        }
        for issue in &r.plural {
            println!(
                "  ⚠️  [{}] {:?}: expected {} plural forms, found {}",
                issue.context, issue.source, issue.expected, issue.found
            );
        }
        for issue in &r.placeholders {
            let form = issue
                .form
                .map(|f| format!(" (form {})", f))
                .unwrap_or_default();
            let what = match issue.kind {
                tscat::validation::PlaceholderIssueKind::UnknownPositional => {
                    "translation uses a placeholder the source does not have"
                }
                tscat::validation::PlaceholderIssueKind::MissingCount => {
                    "plural form does not use %n"
                }
            };
            println!(
                "  ⚠️  [{}] {:?}{}: {} ({})",
                issue.context, issue.source, form, what, issue.token
            );
        }
    }
    println!(
        "\n{} catalog(s), {} failed to load, {} lint issue(s)",
        reports.len(),
        summary.load_failures,
        summary.lint_issues
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_failure_rules() {
        let clean = ValidationSummary::default();
        assert!(!clean.failed(true));

        let lint = ValidationSummary {
            load_failures: 0,
            lint_issues: 2,
        };
        assert!(!lint.failed(false));
        assert!(lint.failed(true));

        let broken = ValidationSummary {
            load_failures: 1,
            lint_issues: 0,
        };
        assert!(broken.failed(false));
    }
}
