use clap::ValueEnum;
use tscat::{
    Diagnostic, Outcome, Registry, Request, Resolution, Truncation, count_from_quantity,
};

use crate::{config::Config, inputs::load_catalogs};

/// How `--count` is rounded when it has a fractional part.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Rounding {
    #[default]
    Floor,
    Ceil,
    Round,
}

impl From<Rounding> for Truncation {
    fn from(value: Rounding) -> Self {
        match value {
            Rounding::Floor => Truncation::Floor,
            Rounding::Ceil => Truncation::Ceil,
            Rounding::Round => Truncation::Round,
        }
    }
}

/// One `tscat resolve` invocation.
#[derive(Debug, Clone, Default)]
pub struct ResolveArgs {
    pub inputs: Vec<String>,
    pub locale: String,
    pub context: String,
    pub source: String,
    pub comment: Option<String>,
    pub count: Option<f64>,
    pub rounding: Rounding,
    pub args: Vec<String>,
}

/// Builds a registry from the inputs and resolves one message.
///
/// Any input that fails to load aborts the command.
pub fn resolve_message(request: &ResolveArgs, config: &Config) -> Result<Resolution, String> {
    let inputs = if request.inputs.is_empty() {
        config.catalogs.clone()
    } else {
        request.inputs.clone()
    };

    let registry = Registry::with_options(config.resolver_options(&request.locale));
    for input in load_catalogs(&inputs)? {
        let handle = input
            .result
            .map_err(|e| format!("Error loading {}: {}", input.path, e))?;
        registry.install(handle);
    }
    registry.set_active_locale(&request.locale);

    let args: Vec<&str> = request.args.iter().map(String::as_str).collect();
    let mut query = Request::new(&request.context, &request.source)
        .with_disambiguation(request.comment.as_deref())
        .with_args(&args);
    if let Some(quantity) = request.count {
        query = query.with_count(count_from_quantity(quantity, request.rounding.into()));
    }
    Ok(registry.resolve_detailed(&query))
}

/// Human-readable account of how the text was found.
pub fn explain(resolution: &Resolution) -> Vec<String> {
    let mut lines = vec![match &resolution.outcome {
        Outcome::Translated { locale } => format!("outcome: translated ({})", locale),
        Outcome::Unfinished { locale } => format!("outcome: unfinished ({})", locale),
        Outcome::SourceFallback => "outcome: source text".to_string(),
    }];
    for diagnostic in &resolution.diagnostics {
        lines.push(match diagnostic {
            Diagnostic::UnresolvedPlaceholder(p) => {
                format!("warning: unresolved placeholder {}", p.token)
            }
            Diagnostic::UnfinishedTranslation { locale } => {
                format!("note: translation in {} is unfinished", locale)
            }
            Diagnostic::MissingTranslation => "note: no catalog has this message".to_string(),
        });
    }
    lines
}
