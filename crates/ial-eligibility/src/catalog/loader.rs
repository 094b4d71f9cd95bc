use std::io::Read;
use std::path::Path;

use tracing::debug;

use super::{CatalogError, QualificationCatalog};

#[derive(Debug)]
pub enum CatalogLoadError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Invalid(CatalogError),
}

impl std::fmt::Display for CatalogLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogLoadError::Io(err) => write!(f, "failed to read qualification catalog: {}", err),
            CatalogLoadError::Json(err) => write!(f, "invalid qualification catalog JSON: {}", err),
            CatalogLoadError::Invalid(err) => {
                write!(f, "qualification catalog failed validation: {}", err)
            }
        }
    }
}

impl std::error::Error for CatalogLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogLoadError::Io(err) => Some(err),
            CatalogLoadError::Json(err) => Some(err),
            CatalogLoadError::Invalid(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for CatalogLoadError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for CatalogLoadError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<CatalogError> for CatalogLoadError {
    fn from(err: CatalogError) -> Self {
        Self::Invalid(err)
    }
}

impl QualificationCatalog {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogLoadError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading qualification catalog");
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogLoadError> {
        let catalog: QualificationCatalog = serde_json::from_reader(reader)?;
        catalog.validate()?;
        debug!(
            subjects = catalog.subjects.len(),
            qualifications = catalog.qualifications.len(),
            "qualification catalog loaded"
        );
        Ok(catalog)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
