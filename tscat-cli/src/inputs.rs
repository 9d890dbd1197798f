//! Reading the catalogs named on the command line.

use rayon::prelude::*;
use tscat::{Catalog, CatalogHandle, LoadOptions, codec};

use crate::path_glob::expand_input_globs;

/// A catalog file and the outcome of reading it.
pub struct Input<T> {
    pub path: String,
    pub result: Result<T, tscat::Error>,
}

fn expand(inputs: &[String]) -> Result<Vec<String>, String> {
    if inputs.is_empty() {
        return Err("No input catalogs given (use -i or `catalogs` in tscat.toml)".to_string());
    }
    expand_input_globs(inputs)
}

/// Parses every input in parallel without validating, preserving input order.
pub fn read_catalogs(inputs: &[String], lang: Option<&str>) -> Result<Vec<Input<Catalog>>, String> {
    let options = LoadOptions::new().with_language_hint(lang.map(str::to_string));
    let paths = expand(inputs)?;
    Ok(paths
        .into_par_iter()
        .map(|path| {
            let result = codec::read_catalog(&path, &options);
            Input { path, result }
        })
        .collect())
}

/// Parses, validates and indexes every input in parallel.
pub fn load_catalogs(inputs: &[String]) -> Result<Vec<Input<CatalogHandle>>, String> {
    let options = LoadOptions::default();
    let paths = expand(inputs)?;
    Ok(paths
        .into_par_iter()
        .map(|path| {
            let result = codec::read_catalog_file(&path, &options);
            if let Err(e) = &result {
                tracing::warn!(path = %path, error = %e, "failed to load catalog");
            }
            Input { path, result }
        })
        .collect())
}
