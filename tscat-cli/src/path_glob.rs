use std::collections::HashSet;
use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobSetBuilder};
use ignore::WalkBuilder;
use rayon::prelude::*;

fn has_glob_meta(s: &str) -> bool {
    s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
}

// Directory part of a pattern before its first glob meta-character
fn static_prefix_dir(pattern: &str) -> PathBuf {
    let idx = pattern
        .bytes()
        .position(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
        .unwrap_or(pattern.len());
    let prefix = Path::new(&pattern[..idx]);
    if prefix.is_dir() {
        prefix.to_path_buf()
    } else {
        prefix
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Expands glob patterns in `inputs` into concrete catalog paths.
///
/// Plain paths pass through untouched so a missing file is reported by the
/// loader. Directories are walked in parallel with .gitignore rules applied.
pub fn expand_input_globs(inputs: &[String]) -> Result<Vec<String>, String> {
    let patterns: Vec<&String> = inputs.iter().filter(|s| has_glob_meta(s)).collect();

    let mut builder = GlobSetBuilder::new();
    for pat in &patterns {
        let normalized = pat.strip_prefix("./").unwrap_or(pat);
        let glob = GlobBuilder::new(normalized)
            .literal_separator(true)
            .build()
            .map_err(|e| format!("Invalid glob pattern '{}': {}", pat, e))?;
        builder.add(glob);
    }
    let set = builder
        .build()
        .map_err(|e| format!("Failed to build glob set: {}", e))?;

    let mut roots: Vec<PathBuf> = Vec::new();
    for pat in &patterns {
        let root = static_prefix_dir(pat);
        if !roots.contains(&root) {
            roots.push(root);
        }
    }

    let matched: Vec<String> = roots
        .par_iter()
        .flat_map_iter(|root| {
            WalkBuilder::new(root)
                .hidden(false)
                .parents(true)
                .build()
                .filter_map(Result::ok)
                .filter(|dent| dent.file_type().is_some_and(|t| t.is_file()))
                .filter_map(|dent| {
                    let path = dent.path();
                    let relative = path.strip_prefix("./").unwrap_or(path);
                    set.is_match(relative)
                        .then(|| relative.to_string_lossy().into_owned())
                })
                .collect::<Vec<_>>()
        })
        .collect();

    let mut seen: HashSet<String> = HashSet::new();
    let mut results = Vec::with_capacity(inputs.len() + matched.len());
    for input in inputs.iter().filter(|s| !has_glob_meta(s)) {
        if seen.insert(input.clone()) {
            results.push(input.clone());
        }
    }
    let mut matched = matched;
    matched.sort();
    for path in matched {
        if seen.insert(path.clone()) {
            results.push(path);
        }
    }

    if results.is_empty() && !patterns.is_empty() {
        return Err(format!(
            "No files matched: {}",
            patterns
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_plain_paths_pass_through() {
        let inputs = vec!["a.ts".to_string(), "b.ts".to_string(), "a.ts".to_string()];
        assert_eq!(
            expand_input_globs(&inputs).unwrap(),
            vec!["a.ts".to_string(), "b.ts".to_string()]
        );
    }

    #[test]
    fn test_glob_matches_files() {
        let dir = tempfile::tempdir().unwrap();
        let locale = dir.path().join("locale");
        fs::create_dir_all(&locale).unwrap();
        fs::write(locale.join("es_AR.ts"), "").unwrap();
        fs::write(locale.join("ja_JP.ts"), "").unwrap();
        fs::write(locale.join("notes.txt"), "").unwrap();

        let pattern = format!("{}/*.ts", locale.display());
        let found = expand_input_globs(&[pattern]).unwrap();
        assert_eq!(found.len(), 2);
        assert!(found[0].ends_with("es_AR.ts"));
        assert!(found[1].ends_with("ja_JP.ts"));
    }

    #[test]
    fn test_unmatched_glob_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = format!("{}/*.ts", dir.path().display());
        assert!(expand_input_globs(&[pattern]).is_err());
    }

    #[test]
    fn test_invalid_glob() {
        assert!(expand_input_globs(&["locale/[.ts".to_string()]).is_err());
    }
}
