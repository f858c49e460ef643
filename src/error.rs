//! Error type for catalog loading.
//!
//! The UI collapses every variant into one "error loading data" placeholder;
//! the variants only exist so the log says which dataset failed and why.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read {dataset} from {path}: {source}")]
    Read {
        dataset: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("failed to fetch {dataset} from {url}: {source}")]
    Fetch {
        dataset: &'static str,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid {dataset} json: {source}")]
    Parse {
        dataset: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{dataset} loader thread panicked")]
    Worker { dataset: &'static str },
}

impl LoadError {
    pub fn dataset(&self) -> Option<&'static str> {
        match self {
            LoadError::Read { dataset, .. }
            | LoadError::Fetch { dataset, .. }
            | LoadError::Parse { dataset, .. }
            | LoadError::Worker { dataset } => Some(*dataset),
            LoadError::Client(_) => None,
        }
    }
}
