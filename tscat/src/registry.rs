//! The catalog registry: installed catalogs plus the active locale.
//!
//! Both are published through [`ArcSwap`], so resolution is a lock-free read
//! of whatever snapshot was current when it started. Installing a catalog or
//! switching the locale replaces the snapshot; readers holding the old one
//! finish against it.
//!
//! Fallback chains are cached for installed locales and the active one, so
//! resolving against arbitrary tags cannot grow the cache.

use std::{
    collections::HashMap,
    path::Path,
    sync::Arc,
};

use arc_swap::ArcSwap;
use lazy_static::lazy_static;

use crate::{
    codec::{self, CatalogHandle},
    error::Error,
    locale::{self, FallbackChain},
    options::{LoadOptions, ResolverOptions},
    resolver::{self, Request, Resolution},
};

#[derive(Debug)]
struct ActiveLocale {
    tag: String,
    chain: Arc<FallbackChain>,
}

/// Installed catalogs keyed by normalized locale tag, and the active locale.
///
/// # Example
///
/// ```rust
/// use tscat::Registry;
///
/// let registry = Registry::new();
/// registry.load_catalog(
///     br#"<TS language="es"><context><name>MainWindow</name>
///         <message><source>Quit</source><translation>Salir</translation></message>
///         </context></TS>"#,
/// )?;
/// registry.set_active_locale("es_AR");
/// assert_eq!(registry.tr("MainWindow", "Quit"), "Salir");
/// assert_eq!(registry.tr("MainWindow", "Help"), "Help");
/// # Ok::<(), tscat::Error>(())
/// ```
pub struct Registry {
    catalogs: ArcSwap<HashMap<String, CatalogHandle>>,
    active: ArcSwap<ActiveLocale>,
    chains: ArcSwap<HashMap<String, Arc<FallbackChain>>>,
    options: ResolverOptions,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("locales", &self.locales())
            .field("active", &self.active_locale())
            .field("options", &self.options)
            .finish()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::with_options(ResolverOptions::default())
    }

    pub fn with_options(options: ResolverOptions) -> Self {
        let tag = locale::normalize_tag(&options.default_locale);
        let chain = Arc::new(FallbackChain::with_extra_locales(
            &tag,
            &options.fallback_locales,
        ));
        let mut chains = HashMap::new();
        chains.insert(tag.clone(), chain.clone());
        Registry {
            catalogs: ArcSwap::from_pointee(HashMap::new()),
            active: ArcSwap::from_pointee(ActiveLocale { tag, chain }),
            chains: ArcSwap::from_pointee(chains),
            options,
        }
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Loads a TS document and installs it. On failure nothing is replaced.
    pub fn load_catalog(&self, bytes: &[u8]) -> Result<CatalogHandle, Error> {
        self.load_catalog_with(bytes, &LoadOptions::default())
    }

    pub fn load_catalog_with(
        &self,
        bytes: &[u8],
        options: &LoadOptions,
    ) -> Result<CatalogHandle, Error> {
        let handle = codec::load_catalog_with(bytes, options).inspect_err(|e| {
            tracing::warn!(error = %e, "catalog rejected; keeping the installed one");
        })?;
        self.install(handle.clone());
        Ok(handle)
    }

    /// Loads a catalog file (format from the extension) and installs it.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<CatalogHandle, Error> {
        let path = path.as_ref();
        let handle = codec::read_catalog_file(path, &LoadOptions::default()).inspect_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "catalog rejected; keeping the installed one");
        })?;
        self.install(handle.clone());
        Ok(handle)
    }

    /// Installs `handle` under its locale, returning the catalog it replaced.
    pub fn install(&self, handle: CatalogHandle) -> Option<CatalogHandle> {
        let key = handle.locale().to_string();
        let mut previous = None;
        self.catalogs.rcu(|current| {
            let mut next = (**current).clone();
            previous = next.insert(key.clone(), handle.clone());
            next
        });
        tracing::info!(
            locale = %key,
            messages = handle.index().len(),
            replaced = previous.is_some(),
            "installed catalog"
        );
        previous
    }

    /// Uninstalls the catalog for `locale`.
    pub fn remove(&self, locale: &str) -> Option<CatalogHandle> {
        let key = locale::normalize_tag(locale);
        let mut removed = None;
        self.catalogs.rcu(|current| {
            let mut next = (**current).clone();
            removed = next.remove(&key);
            next
        });
        if removed.is_some() {
            let active = self.active.load();
            if active.tag != key {
                self.chains.rcu(|current| {
                    let mut next = (**current).clone();
                    next.remove(&key);
                    next
                });
            }
            tracing::info!(locale = %key, "removed catalog");
        }
        removed
    }

    pub fn catalog(&self, locale: &str) -> Option<CatalogHandle> {
        self.catalogs
            .load()
            .get(&locale::normalize_tag(locale))
            .cloned()
    }

    /// Installed locales, sorted.
    pub fn locales(&self) -> Vec<String> {
        let mut locales: Vec<String> = self.catalogs.load().keys().cloned().collect();
        locales.sort();
        locales
    }

    pub fn set_active_locale(&self, tag: &str) {
        let chain = self.fallback_chain(tag);
        let tag = chain.requested().to_string();
        let installed = self.catalogs.load();
        // Drop the previous active locale's chain unless it is installed.
        self.chains.rcu(|current| {
            let mut next: HashMap<String, Arc<FallbackChain>> = current
                .iter()
                .filter(|(key, _)| installed.contains_key(key.as_str()))
                .map(|(key, chain)| (key.clone(), chain.clone()))
                .collect();
            next.insert(tag.clone(), chain.clone());
            next
        });
        let previous = self.active.swap(Arc::new(ActiveLocale {
            tag: tag.clone(),
            chain,
        }));
        if previous.tag != tag {
            tracing::info!(from = %previous.tag, to = %tag, "switched active locale");
        }
    }

    /// Normalized tag of the active locale.
    pub fn active_locale(&self) -> String {
        self.active.load().tag.clone()
    }

    /// The fallback chain for `tag`.
    ///
    /// Chains of installed locales are cached on first use. Any other tag
    /// gets a fresh chain that is not kept.
    pub fn fallback_chain(&self, tag: &str) -> Arc<FallbackChain> {
        let key = locale::normalize_tag(tag);
        if let Some(chain) = self.chains.load().get(&key) {
            return chain.clone();
        }
        let chain = Arc::new(FallbackChain::with_extra_locales(
            &key,
            &self.options.fallback_locales,
        ));
        if self.catalogs.load().contains_key(&key) {
            self.chains.rcu(|current| {
                let mut next = (**current).clone();
                next.entry(key.clone()).or_insert_with(|| chain.clone());
                next
            });
        }
        chain
    }

    /// Resolves against the active locale.
    pub fn resolve(
        &self,
        context: &str,
        source: &str,
        disambiguation: Option<&str>,
        count: Option<u64>,
        args: &[&str],
    ) -> String {
        let request = Request {
            context,
            source,
            disambiguation,
            count,
            args,
        };
        self.resolve_detailed(&request).text
    }

    /// Resolves against an explicit locale instead of the active one.
    pub fn resolve_in(
        &self,
        locale: &str,
        context: &str,
        source: &str,
        disambiguation: Option<&str>,
        count: Option<u64>,
        args: &[&str],
    ) -> String {
        let request = Request {
            context,
            source,
            disambiguation,
            count,
            args,
        };
        self.resolve_detailed_in(locale, &request).text
    }

    /// Resolves against the active locale, reporting how the text was found.
    pub fn resolve_detailed(&self, request: &Request<'_>) -> Resolution {
        let active = self.active.load();
        let catalogs = self.catalogs.load();
        resolver::resolve_with(&catalogs, &active.chain, request, &self.options)
    }

    pub fn resolve_detailed_in(&self, locale: &str, request: &Request<'_>) -> Resolution {
        let chain = self.fallback_chain(locale);
        let catalogs = self.catalogs.load();
        resolver::resolve_with(&catalogs, &chain, request, &self.options)
    }

    /// Shortcut for a message without disambiguation, count or arguments.
    pub fn tr(&self, context: &str, source: &str) -> String {
        self.resolve(context, source, None, None, &[])
    }
}

lazy_static! {
    static ref GLOBAL: Registry = Registry::new();
}

/// The process-wide registry used by the free functions.
pub fn global() -> &'static Registry {
    &GLOBAL
}

/// Loads a TS document into the process-wide registry.
pub fn load_catalog(bytes: &[u8]) -> Result<CatalogHandle, Error> {
    GLOBAL.load_catalog(bytes)
}

pub fn set_active_locale(tag: &str) {
    GLOBAL.set_active_locale(tag);
}

pub fn active_locale() -> String {
    GLOBAL.active_locale()
}

/// Resolves against the process-wide registry's active locale.
pub fn resolve(
    context: &str,
    source: &str,
    disambiguation: Option<&str>,
    count: Option<u64>,
    args: &[&str],
) -> String {
    GLOBAL.resolve(context, source, disambiguation, count, args)
}

pub fn tr(context: &str, source: &str) -> String {
    GLOBAL.tr(context, source)
}
