//! A filesystem backed data source
//!
//! The [`JsonDirectory`] reads the same JSON documents the remote API serves,
//! laid out in a directory:
//!
//! ```text
//! <root>/companies.json
//! <root>/companies/<company id>/locations.json
//! <root>/companies/<company id>/assets.json
//! ```
//!
//! Asset pages are slices of `assets.json`.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::de::DeserializeOwned;
use tracing::instrument;

use super::{AssetSource, SourceError};
use crate::domain::{AssetRecord, Company, LocationRecord, RecordId};

/// A directory of JSON documents.
#[derive(Debug, Clone)]
pub struct JsonDirectory {
    root: PathBuf,
}

impl JsonDirectory {
    /// File listing the companies.
    pub const COMPANIES: &'static str = "companies.json";
    /// Per-company file listing the locations.
    pub const LOCATIONS: &'static str = "locations.json";
    /// Per-company file listing the assets.
    pub const ASSETS: &'static str = "assets.json";

    /// Opens a directory at the given path.
    #[must_use]
    pub const fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn company_dir(&self, company: &RecordId) -> Result<PathBuf, SourceError> {
        let dir = self.root.join("companies").join(company.as_str());
        if dir.is_dir() {
            Ok(dir)
        } else {
            Err(SourceError::UnknownCompany(company.clone()))
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, SourceError> {
    let content = fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| SourceError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

impl AssetSource for JsonDirectory {
    #[instrument(level = "debug", skip(self))]
    fn companies(&self) -> Result<Vec<Company>, SourceError> {
        read_json(&self.root.join(Self::COMPANIES))
    }

    #[instrument(level = "debug", skip(self))]
    fn locations(&self, company: &RecordId) -> Result<Vec<LocationRecord>, SourceError> {
        read_json(&self.company_dir(company)?.join(Self::LOCATIONS))
    }

    #[instrument(level = "debug", skip(self))]
    fn assets_page(
        &self,
        company: &RecordId,
        page: usize,
        page_size: usize,
    ) -> Result<Vec<AssetRecord>, SourceError> {
        let assets: Vec<AssetRecord> = read_json(&self.company_dir(company)?.join(Self::ASSETS))?;
        let start = page.saturating_mul(page_size);
        Ok(assets.into_iter().skip(start).take(page_size).collect())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn setup_temp_directory() -> (TempDir, JsonDirectory) {
        let tmp = TempDir::new().expect("failed to create temp dir");
        let root = tmp.path();

        fs::write(
            root.join(JsonDirectory::COMPANIES),
            r#"[{"id": "acme", "name": "Acme"}, {"id": 2, "name": "Globex"}]"#,
        )
        .unwrap();

        let acme = root.join("companies").join("acme");
        fs::create_dir_all(&acme).unwrap();
        fs::write(
            acme.join(JsonDirectory::LOCATIONS),
            r#"[{"id": "1", "name": "Plant A", "parentId": null}]"#,
        )
        .unwrap();
        fs::write(
            acme.join(JsonDirectory::ASSETS),
            r#"[
                {"id": "10", "name": "Motor", "locationId": "1"},
                {"id": "11", "name": "Sensor", "parentId": "10", "sensorType": "energy"},
                {"id": "12", "name": "Fan"}
            ]"#,
        )
        .unwrap();

        let source = JsonDirectory::new(root.to_path_buf());
        (tmp, source)
    }

    fn acme() -> RecordId {
        RecordId::new("acme").unwrap()
    }

    #[test]
    fn lists_companies() {
        let (_tmp, source) = setup_temp_directory();
        let companies = source.companies().unwrap();

        assert_eq!(companies.len(), 2);
        assert_eq!(companies[0].name, "Acme");
        assert_eq!(companies[1].id.as_str(), "2");
    }

    #[test]
    fn reads_locations() {
        let (_tmp, source) = setup_temp_directory();
        let locations = source.locations(&acme()).unwrap();

        assert_eq!(locations.len(), 1);
        assert!(locations[0].parent_id.is_none());
    }

    #[test]
    fn pages_through_assets() {
        let (_tmp, source) = setup_temp_directory();

        let first = source.assets_page(&acme(), 0, 2).unwrap();
        let second = source.assets_page(&acme(), 1, 2).unwrap();
        let third = source.assets_page(&acme(), 2, 2).unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].name, "Fan");
        assert!(third.is_empty());
    }

    #[test]
    fn malformed_records_do_not_fail_the_page() {
        let (tmp, source) = setup_temp_directory();
        fs::write(
            tmp.path()
                .join("companies")
                .join("acme")
                .join(JsonDirectory::ASSETS),
            r#"[
                {"id": 2.5, "name": "Fractional id"},
                {"id": -4, "name": null, "locationId": "1"},
                {"id": "10", "name": "Motor", "parentId": false}
            ]"#,
        )
        .unwrap();

        let page = source.assets_page(&acme(), 0, 10).unwrap();

        assert_eq!(page.len(), 3);
        assert!(page[0].id.is_none());
        assert_eq!(page[1].id.as_deref(), Some("-4"));
        assert_eq!(page[1].name, "");
        assert!(page[2].parent_id.is_none());
    }

    #[test]
    fn unknown_company_is_an_error() {
        let (_tmp, source) = setup_temp_directory();
        let missing = RecordId::new("initech").unwrap();

        let error = source.locations(&missing).unwrap_err();
        assert!(matches!(error, SourceError::UnknownCompany(id) if id == missing));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let (tmp, source) = setup_temp_directory();
        fs::write(tmp.path().join(JsonDirectory::COMPANIES), "{not json").unwrap();

        assert!(matches!(
            source.companies().unwrap_err(),
            SourceError::Parse { .. }
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let tmp = TempDir::new().unwrap();
        let source = JsonDirectory::new(tmp.path().to_path_buf());

        assert!(matches!(
            source.companies().unwrap_err(),
            SourceError::Io { .. }
        ));
    }
}
