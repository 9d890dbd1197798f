use std::path::{Path, PathBuf};

use tscat::codec::{LoadedCatalog, read_catalog};
use tscat::formats::{FormatType, TsFormat};
use tscat::traits::Document;
use tscat::validation::collect_plural_issues;
use tscat::{
    Catalog, LoadOptions, MessageStatus, Outcome, Registry, Request, ResolverOptions,
    read_catalog_file,
};

struct CorpusCase {
    file: &'static str,
    locale: &'static str,
    translated: usize,
    unfinished: usize,
}

const CASES: &[CorpusCase] = &[
    CorpusCase {
        file: "es_AR.ts",
        locale: "es-AR",
        translated: 187,
        unfinished: 89,
    },
    CorpusCase {
        file: "ja_JP.ts",
        locale: "ja-JP",
        translated: 190,
        unfinished: 86,
    },
];

fn corpus_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join("corpus")
}

fn corpus_catalog(file: &str) -> Catalog {
    read_catalog(corpus_root().join(file), &LoadOptions::default())
        .unwrap_or_else(|e| panic!("failed to read {}: {}", file, e))
}

#[test]
fn test_corpus_catalogs_load_and_validate() {
    for case in CASES {
        let handle = read_catalog_file(corpus_root().join(case.file), &LoadOptions::default())
            .unwrap_or_else(|e| panic!("{} failed to load: {}", case.file, e));
        let catalog = handle.catalog();

        assert_eq!(handle.locale(), case.locale, "{}", case.file);
        assert_eq!(catalog.version.as_deref(), Some("2.0"));
        assert_eq!(catalog.default_codec.as_deref(), Some("UTF-8"));
        assert_eq!(catalog.contexts.len(), 27, "{}", case.file);
        assert_eq!(catalog.message_count(), 276, "{}", case.file);
        assert_eq!(handle.index().len(), 276, "{}", case.file);

        let count = |status| {
            catalog
                .messages()
                .filter(|(_, m)| m.status == status)
                .count()
        };
        assert_eq!(count(MessageStatus::Translated), case.translated, "{}", case.file);
        assert_eq!(count(MessageStatus::Unfinished), case.unfinished, "{}", case.file);
        assert_eq!(count(MessageStatus::Obsolete), 0, "{}", case.file);
        assert!(collect_plural_issues(catalog, handle.rule()).is_empty());
    }
}

#[test]
fn test_corpus_values() {
    let es = corpus_catalog("es_AR.ts");
    let handle = LoadedCatalog::new(es).unwrap();

    let version = handle.lookup("AboutView", "Version %1", None).unwrap();
    assert_eq!(version.translation.as_ref().unwrap().to_string(), "Versión %1");

    let donate = handle
        .lookup(
            "AboutView",
            "Please <a href='%1'>donate</a> to support the continued development of %2.",
            None,
        )
        .unwrap();
    assert!(
        donate
            .translation
            .as_ref()
            .unwrap()
            .to_string()
            .starts_with("Por favor, <a href='%1'>")
    );

    let player = handle.lookup("AboutView", "%1, a music player", None).unwrap();
    assert_eq!(
        player.translation.as_ref().unwrap().to_string(),
        "%1, un reproductor de música ",
        "trailing whitespace must survive parsing"
    );

    let of = handle
        .lookup("MediaView", "of", Some("Used in video parts, as in '2 of 3'"))
        .unwrap();
    assert_eq!(of.translation.as_ref().unwrap().to_string(), "de");
    assert_eq!(of.locations[0].filename.as_deref(), Some("src/mediaview.cpp"));
    assert!(handle.lookup("MediaView", "of", None).is_none());
}

#[test]
fn test_corpus_numerus_messages() {
    let registry = Registry::new();
    registry.load_file(corpus_root().join("es_AR.ts")).unwrap();
    registry.load_file(corpus_root().join("ja_JP.ts")).unwrap();

    assert_eq!(
        registry.resolve_in("es_AR", "DownloadManager", "%n Download(s)", None, Some(3), &[]),
        "3 Descarga(s)"
    );

    // The Japanese form list is a single empty form: unfinished, so source text.
    let ja = registry.resolve_detailed_in(
        "ja_JP",
        &Request::new("DownloadManager", "%n Download(s)").with_count(2),
    );
    assert_eq!(ja.text, "2 Download(s)");
    assert_eq!(ja.outcome, Outcome::SourceFallback);
}

#[test]
fn test_corpus_cross_locale_fallback() {
    let registry =
        Registry::with_options(ResolverOptions::new().with_fallback_locales(vec!["es_AR".into()]));
    registry.load_file(corpus_root().join("es_AR.ts")).unwrap();
    registry.load_file(corpus_root().join("ja_JP.ts")).unwrap();
    registry.set_active_locale("ja_JP");

    assert_eq!(registry.tr("AboutView", "Version %1"), "バージョン %1");
    assert_eq!(
        registry.resolve("AboutView", "Version %1", None, None, &["2.4"]),
        "バージョン 2.4"
    );

    let finished = registry.resolve_detailed(&Request::new("DownloadManager", "Download finished"));
    assert_eq!(finished.text, "Descarga finalizada");
    assert_eq!(
        finished.outcome,
        Outcome::Translated {
            locale: "es-AR".to_string()
        }
    );

    assert_eq!(registry.tr("AboutView", "Licensed to: %1"), "Licensed to: %1");
}

#[test]
fn test_corpus_ts_round_trip() {
    for case in CASES {
        let original = corpus_catalog(case.file);
        let bytes = TsFormat::from(original.clone()).to_bytes().unwrap();
        let reparsed = Catalog::from(TsFormat::from_bytes(&bytes).unwrap());
        assert_eq!(reparsed, original, "{} changed after a TS round trip", case.file);
    }
}

#[test]
fn test_corpus_json_round_trip() {
    for case in CASES {
        let original = corpus_catalog(case.file);
        let mut json = Vec::new();
        FormatType::Json.write(&original, &mut json).unwrap();
        let reparsed = FormatType::Json.parse(&json).unwrap();
        assert_eq!(reparsed, original, "{} changed after a JSON round trip", case.file);
    }
}
