//! Bulk locale loading.

use std::path::{Path, PathBuf};

use tscat_core::{Result, read_catalog};

use crate::translator::Translator;

/// Read a catalog file and build its lookup snapshot.
///
/// Fails with the catalog's `Io` or `Schema` error; no partial snapshot is
/// ever returned.
pub fn load_locale(path: impl AsRef<Path>) -> Result<Translator> {
    let path = path.as_ref();
    let catalog = read_catalog(path)?;
    let translator = Translator::new(&catalog);
    tracing::info!(
        target: "tscat.lookup",
        path = %path.display(),
        locale = %translator.locale(),
        translations = translator.len(),
        "locale loaded"
    );
    Ok(translator)
}

/// Path of `locale`'s catalog under `dir`, with `{locale}` in `pattern`
/// replaced by the locale tag.
#[must_use]
pub fn locale_path(dir: impl AsRef<Path>, pattern: &str, locale: &str) -> PathBuf {
    dir.as_ref().join(pattern.replace("{locale}", locale))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tscat_core::CatalogError;

    #[test]
    fn loads_finished_translations() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("base_fr.ts");
        fs::write(
            &path,
            r#"<TS version="2.1" language="fr_FR">
<context><name>Instance</name>
<message><source>Instance expected</source><translation>Instance attendue</translation></message>
<message><source>Locked</source><translation type="unfinished">Verrouillé</translation></message>
</context></TS>"#,
        )
        .expect("write fixture");

        let translator = load_locale(&path).expect("loads");
        assert_eq!(translator.len(), 1);
        assert_eq!(
            translator.resolve("Instance", "Instance expected", None),
            "Instance attendue"
        );
        assert_eq!(translator.resolve("Instance", "Locked", None), "Locked");
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let error = load_locale(dir.path().join("base_de.ts")).expect_err("missing");
        assert!(matches!(error, CatalogError::Io { .. }));
    }

    #[test]
    fn malformed_file_is_schema_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("base_fr.ts");
        fs::write(&path, r#"<TS language="fr_FR"><context><message/></context></TS>"#)
            .expect("write fixture");
        let error = load_locale(&path).expect_err("malformed");
        assert!(error.is_schema());
    }

    #[test]
    fn locale_path_substitutes_tag() {
        assert_eq!(
            locale_path("i18n", "base_{locale}.ts", "fr_FR"),
            PathBuf::from("i18n/base_fr_FR.ts")
        );
        assert_eq!(
            locale_path("i18n", "{locale}.ts", "de"),
            PathBuf::from("i18n").join("de.ts")
        );
    }
}
