//! Placeholder expansion for resolved strings.
//!
//! Syntax:
//! - `%1`, `%2`, … `%k`: the k-th argument (1-indexed, any number of digits),
//! - `%n`: the count,
//! - `%%`: a literal `%`.
//!
//! Any other `%` is copied through. Expansion is a single left-to-right pass:
//! substituted text is never scanned again, so an argument containing `%1`
//! stays as written.

use std::collections::BTreeSet;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref PLACEHOLDER_REGEX: Regex = Regex::new(r"%(?:(%)|(n)|([0-9]+))").unwrap();
}

/// A placeholder token referenced by a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Placeholder {
    /// `%k`; holds `k` as written (so `%0` is `Positional(0)`).
    Positional(usize),
    /// `%n`.
    Count,
}

impl std::fmt::Display for Placeholder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Placeholder::Positional(k) => write!(f, "%{}", k),
            Placeholder::Count => f.write_str("%n"),
        }
    }
}

/// A token that could not be expanded and was left in the output as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedPlaceholder {
    /// Token text exactly as it appears in the template.
    pub token: String,
    /// `None` when the digits do not fit a `usize`.
    pub placeholder: Option<Placeholder>,
}

/// Result of an expansion with the tokens that were left unexpanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpolated {
    pub text: String,
    pub unresolved: Vec<UnresolvedPlaceholder>,
}

/// Expands `template` against `args` and `count`.
///
/// Tokens without a value are left as written and logged at `warn`; they
/// never cause an error.
///
/// # Example
///
/// ```rust
/// use tscat::placeholder::interpolate;
///
/// assert_eq!(
///     interpolate("%1 downloaded in %2", &["video.mp4", "3s"], None),
///     "video.mp4 downloaded in 3s"
/// );
/// assert_eq!(interpolate("%n Download(s)", &[], Some(5)), "5 Download(s)");
/// assert_eq!(interpolate("100%% of %3", &["a"], None), "100% of %3");
/// ```
pub fn interpolate(template: &str, args: &[&str], count: Option<u64>) -> String {
    let result = interpolate_detailed(template, args, count);
    for missing in &result.unresolved {
        tracing::warn!(
            token = %missing.token,
            template,
            args = args.len(),
            "unresolved placeholder left in output"
        );
    }
    result.text
}

/// Like [`interpolate`], but returns unexpanded tokens instead of logging them.
pub fn interpolate_detailed(template: &str, args: &[&str], count: Option<u64>) -> Interpolated {
    let mut unresolved = Vec::new();
    let text = PLACEHOLDER_REGEX.replace_all(template, |caps: &Captures| {
        if caps.get(1).is_some() {
            return "%".to_string();
        }
        let token = &caps[0];
        if caps.get(2).is_some() {
            return match count {
                Some(n) => n.to_string(),
                None => {
                    unresolved.push(UnresolvedPlaceholder {
                        token: token.to_string(),
                        placeholder: Some(Placeholder::Count),
                    });
                    token.to_string()
                }
            };
        }
        let index = caps[3].parse::<usize>().ok();
        match index
            .and_then(|k| k.checked_sub(1))
            .and_then(|i| args.get(i))
        {
            Some(arg) => (*arg).to_string(),
            None => {
                unresolved.push(UnresolvedPlaceholder {
                    token: token.to_string(),
                    placeholder: index.map(Placeholder::Positional),
                });
                token.to_string()
            }
        }
    });
    Interpolated {
        text: text.into_owned(),
        unresolved,
    }
}

/// Extracts placeholder tokens in occurrence order. `%%` is skipped.
pub fn extract_placeholders(input: &str) -> Vec<Placeholder> {
    PLACEHOLDER_REGEX
        .captures_iter(input)
        .filter_map(|caps| {
            if caps.get(1).is_some() {
                None
            } else if caps.get(2).is_some() {
                Some(Placeholder::Count)
            } else {
                caps[3].parse().ok().map(Placeholder::Positional)
            }
        })
        .collect()
}

/// The set of distinct placeholders a string references.
pub fn signature(input: &str) -> BTreeSet<Placeholder> {
    extract_placeholders(input).into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_arguments() {
        assert_eq!(
            interpolate("%1 downloaded in %2", &["video.mp4", "3s"], None),
            "video.mp4 downloaded in 3s"
        );
        assert_eq!(interpolate("%2 before %1", &["a", "b"], None), "b before a");
    }

    #[test]
    fn test_count_token() {
        assert_eq!(interpolate("%n Download(s)", &[], Some(5)), "5 Download(s)");
        assert_eq!(interpolate("%n", &[], Some(0)), "0");
    }

    #[test]
    fn test_missing_count_is_left_unexpanded() {
        let result = interpolate_detailed("%n items", &[], None);
        assert_eq!(result.text, "%n items");
        assert_eq!(
            result.unresolved,
            vec![UnresolvedPlaceholder {
                token: "%n".into(),
                placeholder: Some(Placeholder::Count)
            }]
        );
    }

    #[test]
    fn test_escaped_percent() {
        assert_eq!(interpolate("50%% off", &[], None), "50% off");
        assert_eq!(interpolate("%%1", &["x"], None), "%1");
    }

    #[test]
    fn test_other_percent_passes_through() {
        assert_eq!(interpolate("100% sure", &[], None), "100% sure");
        assert_eq!(interpolate("trailing %", &[], None), "trailing %");
        assert_eq!(interpolate("%s and %d", &["x"], None), "%s and %d");
    }

    #[test]
    fn test_missing_argument_is_not_fatal() {
        let result = interpolate_detailed("%1 of %3", &["2"], None);
        assert_eq!(result.text, "2 of %3");
        assert_eq!(result.unresolved.len(), 1);
        assert_eq!(result.unresolved[0].token, "%3");
        assert_eq!(
            result.unresolved[0].placeholder,
            Some(Placeholder::Positional(3))
        );
    }

    #[test]
    fn test_zero_index_is_unresolved() {
        let result = interpolate_detailed("%0", &["a"], None);
        assert_eq!(result.text, "%0");
        assert_eq!(result.unresolved.len(), 1);
    }

    #[test]
    fn test_huge_index_is_unresolved() {
        let template = "%123456789012345678901234567890";
        let result = interpolate_detailed(template, &["a"], None);
        assert_eq!(result.text, template);
        assert_eq!(result.unresolved[0].placeholder, None);
    }

    #[test]
    fn test_multi_digit_index() {
        let args: Vec<String> = (1..=12).map(|i| format!("a{}", i)).collect();
        let refs: Vec<&str> = args.iter().map(String::as_str).collect();
        assert_eq!(interpolate("%12/%1", &refs, None), "a12/a1");
    }

    #[test]
    fn test_no_recursive_expansion() {
        assert_eq!(interpolate("%1", &["%2"], None), "%2");
        assert_eq!(interpolate("%1 %2", &["%2", "x"], None), "%2 x");
        assert_eq!(interpolate("%1", &["%n"], Some(3)), "%n");
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(interpolate("", &[], None), "");
        assert_eq!(interpolate("plain", &[], Some(1)), "plain");
    }

    #[test]
    fn test_extract_and_signature() {
        assert_eq!(
            extract_placeholders("%2 of %1, %n total, 5%%"),
            vec![
                Placeholder::Positional(2),
                Placeholder::Positional(1),
                Placeholder::Count
            ]
        );
        let sig = signature("%1 %1 %2");
        assert_eq!(sig.len(), 2);
        assert!(sig.contains(&Placeholder::Positional(1)));
        assert_eq!(Placeholder::Count.to_string(), "%n");
        assert_eq!(Placeholder::Positional(4).to_string(), "%4");
    }
}
