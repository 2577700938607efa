//! Static reference data: pallet catalog, locations and product categories.
//!
//! The default catalog is embedded in the binary. A JSON file with the same
//! shape can replace it at startup.

use std::path::{Path, PathBuf};

use rust_embed::RustEmbed;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::model::{CUSTOM_PALLET_ID, Location, PalletSize, ProductCategory, ValidationError};

const CATALOG_FILE: &str = "catalog.json";

#[derive(RustEmbed)]
#[folder = "data/"]
struct CatalogAssets;

/// Errors while loading reference data.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("embedded catalog '{0}' is missing")]
    MissingEmbedded(&'static str),
    #[error("could not read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("pallet '{id}' is invalid: {source}")]
    InvalidPallet {
        id: String,
        #[source]
        source: ValidationError,
    },
    #[error("pallet id '{0}' is reserved for custom pallets")]
    ReservedPalletId(String),
    #[error("duplicate {kind} id '{id}'")]
    DuplicateId { kind: &'static str, id: String },
}

/// Reference data offered to the user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Catalog {
    pub pallet_sizes: Vec<PalletSize>,
    pub locations: Vec<Location>,
    #[serde(default)]
    pub product_categories: Vec<ProductCategory>,
}

impl Catalog {
    /// The catalog compiled into the binary.
    pub fn embedded() -> Result<Self, CatalogError> {
        let file =
            CatalogAssets::get(CATALOG_FILE).ok_or(CatalogError::MissingEmbedded(CATALOG_FILE))?;
        Self::from_json(&file.data)
    }

    /// Reads a catalog from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Uses `path` when given, the embedded catalog otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => Self::from_path(path),
            None => Self::embedded(),
        }
    }

    pub fn from_json(raw: &[u8]) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_slice(raw)?;
        catalog.validate()?;
        Ok(catalog)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        for (idx, pallet) in self.pallet_sizes.iter().enumerate() {
            if pallet.is_custom() {
                return Err(CatalogError::ReservedPalletId(pallet.id.clone()));
            }
            pallet
                .validate()
                .map_err(|source| CatalogError::InvalidPallet {
                    id: pallet.id.clone(),
                    source,
                })?;
            if self.pallet_sizes[..idx].iter().any(|p| p.id == pallet.id) {
                return Err(CatalogError::DuplicateId {
                    kind: "pallet",
                    id: pallet.id.clone(),
                });
            }
        }
        for (idx, location) in self.locations.iter().enumerate() {
            if self.locations[..idx].iter().any(|l| l.id == location.id) {
                return Err(CatalogError::DuplicateId {
                    kind: "location",
                    id: location.id.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn pallet(&self, id: &str) -> Option<&PalletSize> {
        if id == CUSTOM_PALLET_ID {
            return None;
        }
        self.pallet_sizes.iter().find(|p| p.id == id)
    }

    pub fn location(&self, id: &str) -> Option<&Location> {
        self.locations.iter().find(|l| l.id == id)
    }

    pub fn category(&self, id: &str) -> Option<&ProductCategory> {
        self.product_categories.iter().find(|c| c.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::LengthUnit;

    #[test]
    fn embedded_catalog_loads() {
        let catalog = Catalog::embedded().expect("embedded catalog must parse");
        assert!(!catalog.pallet_sizes.is_empty());
        assert!(catalog.locations.len() >= 2);

        let euro = catalog.pallet("eur1").expect("EUR 1 pallet missing");
        assert_eq!(euro.length_unit, LengthUnit::Centimeter);
        assert_eq!(euro.max_weight, 1500.0);
        assert!(catalog.location("kingston").is_some());
        assert!(catalog.category("general").is_some());
    }

    #[test]
    fn custom_id_is_never_a_catalog_pallet() {
        let catalog = Catalog::embedded().unwrap();
        assert!(catalog.pallet(CUSTOM_PALLET_ID).is_none());
        assert!(catalog.pallet("does-not-exist").is_none());
    }

    #[test]
    fn rejects_reserved_and_duplicate_ids() {
        let reserved = br#"{
            "pallet_sizes": [
                {"id": "custom", "name": "x", "length": 1, "width": 1, "height": 1,
                 "max_weight": 1, "length_unit": "cm"}
            ],
            "locations": []
        }"#;
        assert!(matches!(
            Catalog::from_json(reserved),
            Err(CatalogError::ReservedPalletId(_))
        ));

        let duplicate = br#"{
            "pallet_sizes": [],
            "locations": [
                {"id": "a", "name": "A", "country": "X", "zip_code": "1", "tax_rate": 0, "currency_code": "USD"},
                {"id": "a", "name": "B", "country": "X", "zip_code": "2", "tax_rate": 0, "currency_code": "USD"}
            ]
        }"#;
        assert!(matches!(
            Catalog::from_json(duplicate),
            Err(CatalogError::DuplicateId { kind: "location", .. })
        ));
    }

    #[test]
    fn rejects_invalid_pallet_dimensions() {
        let raw = br#"{
            "pallet_sizes": [
                {"id": "bad", "name": "x", "length": -1, "width": 1, "height": 1,
                 "max_weight": 1, "length_unit": "cm"}
            ],
            "locations": []
        }"#;
        let err = Catalog::from_json(raw).unwrap_err();
        assert!(err.to_string().starts_with("pallet 'bad' is invalid"));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Catalog::from_path(Path::new("/nonexistent/catalog.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/catalog.json"));
    }
}
