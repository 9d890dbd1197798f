//! CLI library for testing purposes

pub mod config;
pub mod inputs;
pub mod path_glob;
pub mod resolve;
pub mod stats;
pub mod validate;
pub mod view;

pub use config::{Config, EnvProvider, SystemEnv, load_config, resolve_locale};
pub use resolve::{ResolveArgs, Rounding, explain, resolve_message};
pub use view::truncate;
