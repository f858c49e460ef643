use std::fs;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle, ScopedJoinHandle};
use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::error::LoadError;
use crate::http_client::http_client;
use crate::state::{Car, Catalog, Champion, Delta, Driver};

pub const CARS_FILE: &str = "cars.json";
pub const DRIVERS_FILE: &str = "drivers.json";
pub const CHAMPIONS_FILE: &str = "champions.json";

/// Where the three dataset files live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Dir(PathBuf),
    Http { base_url: String, timeout: Duration },
}

impl DataSource {
    pub fn location(&self, file: &str) -> String {
        match self {
            DataSource::Dir(dir) => dir.join(file).display().to_string(),
            DataSource::Http { base_url, .. } => {
                format!("{}/{file}", base_url.trim_end_matches('/'))
            }
        }
    }

    fn read(&self, dataset: &'static str) -> Result<String, LoadError> {
        match self {
            DataSource::Dir(dir) => {
                let path = dir.join(dataset);
                fs::read_to_string(&path).map_err(|source| LoadError::Read {
                    dataset,
                    path,
                    source,
                })
            }
            DataSource::Http { timeout, .. } => {
                let client = http_client(*timeout).map_err(LoadError::Client)?;
                let url = self.location(dataset);
                client
                    .get(&url)
                    .send()
                    .and_then(|resp| resp.error_for_status())
                    .and_then(|resp| resp.text())
                    .map_err(|source| LoadError::Fetch {
                        dataset,
                        url,
                        source,
                    })
            }
        }
    }
}

/// Fetches all three datasets in parallel. Any single failure fails the load.
pub fn load_catalog(source: &DataSource) -> Result<Catalog, LoadError> {
    thread::scope(|scope| {
        let cars = scope.spawn(|| fetch_collection::<Car>(source, CARS_FILE));
        let drivers = scope.spawn(|| fetch_collection::<Driver>(source, DRIVERS_FILE));
        let champions = scope.spawn(|| fetch_collection::<Champion>(source, CHAMPIONS_FILE));

        // All three complete before the first error is surfaced.
        let cars = join(cars, CARS_FILE);
        let drivers = join(drivers, DRIVERS_FILE);
        let champions = join(champions, CHAMPIONS_FILE);

        Ok(Catalog {
            cars: cars?,
            drivers: drivers?,
            champions: champions?,
        })
    })
}

fn fetch_collection<T: DeserializeOwned>(
    source: &DataSource,
    dataset: &'static str,
) -> Result<Vec<T>, LoadError> {
    let body = source.read(dataset)?;
    let rows = parse_collection(dataset, &body)?;
    tracing::debug!(dataset, rows = rows.len(), "dataset parsed");
    Ok(rows)
}

fn join<T>(
    handle: ScopedJoinHandle<'_, Result<Vec<T>, LoadError>>,
    dataset: &'static str,
) -> Result<Vec<T>, LoadError> {
    handle
        .join()
        .unwrap_or(Err(LoadError::Worker { dataset }))
}

pub fn parse_collection<T: DeserializeOwned>(
    dataset: &'static str,
    raw: &str,
) -> Result<Vec<T>, LoadError> {
    serde_json::from_str(raw).map_err(|source| LoadError::Parse { dataset, source })
}

/// Runs [`load_catalog`] on a background thread and reports the outcome as a
/// single [`Delta`].
pub fn spawn_loader(source: DataSource, tx: Sender<Delta>) -> JoinHandle<()> {
    thread::spawn(move || {
        tracing::info!(
            cars = %source.location(CARS_FILE),
            drivers = %source.location(DRIVERS_FILE),
            champions = %source.location(CHAMPIONS_FILE),
            "loading catalog"
        );
        let _ = tx.send(Delta::Log(format!(
            "[INFO] Loading catalog from {}",
            source.location("")
        )));
        let delta = match load_catalog(&source) {
            Ok(catalog) => {
                tracing::info!(
                    cars = catalog.cars.len(),
                    drivers = catalog.drivers.len(),
                    champions = catalog.champions.len(),
                    "catalog loaded"
                );
                Delta::CatalogLoaded(catalog)
            }
            Err(err) => {
                tracing::error!(error = %err, dataset = ?err.dataset(), "error loading data");
                Delta::LoadFailed(err.to_string())
            }
        };
        let _ = tx.send(delta);
    })
}
