use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

use crate::models::{Catalog, CatalogError, Question};

const BUILT_IN_QUESTIONS: &str = include_str!("sample_questions.json");

/// Where the question catalog comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    BuiltIn,
    File(PathBuf),
}

impl CatalogSource {
    pub fn from_path(path: Option<PathBuf>) -> Self {
        path.map_or(Self::BuiltIn, Self::File)
    }

    fn describe(&self) -> String {
        match self {
            Self::BuiltIn => "built-in questions".to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid catalog in {origin}: {source}")]
    Invalid {
        origin: String,
        #[source]
        source: CatalogError,
    },
}

/// Parse and validate a JSON array of questions.
pub fn parse_catalog(json: &str, origin: &str) -> Result<Catalog, LoadError> {
    let questions: Vec<Question> =
        serde_json::from_str(json).map_err(|source| LoadError::Parse {
            origin: origin.to_string(),
            source,
        })?;

    Catalog::new(questions).map_err(|source| LoadError::Invalid {
        origin: origin.to_string(),
        source,
    })
}

/// Load the catalog without blocking the caller's runtime thread.
pub async fn load_catalog(source: CatalogSource) -> Result<Catalog, LoadError> {
    let origin = source.describe();
    let catalog = match &source {
        CatalogSource::BuiltIn => parse_catalog(BUILT_IN_QUESTIONS, &origin)?,
        CatalogSource::File(path) => {
            let json = tokio::fs::read_to_string(path)
                .await
                .map_err(|source| LoadError::Read {
                    path: origin.clone(),
                    source,
                })?;
            parse_catalog(&json, &origin)?
        }
    };

    info!(origin = %origin, questions = catalog.len(), "question catalog loaded");
    Ok(catalog)
}
