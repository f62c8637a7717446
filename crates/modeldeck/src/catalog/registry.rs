#[cfg(feature = "http-client")]
use super::types::Catalog;
#[cfg(feature = "http-client")]
use crate::error::CatalogError;

#[cfg(feature = "http-client")]
use reqwest::Client;
#[cfg(feature = "http-client")]
use url::Url;
#[cfg(feature = "http-client")]
use std::fs::{self, File};
#[cfg(feature = "http-client")]
use std::io::{Read, Write};
#[cfg(feature = "http-client")]
use std::path::PathBuf;

#[cfg(feature = "http-client")]
const CACHE_FILE: &str = "models.dev.json";

/// Canonical upstream endpoint for the provider→model dataset.
pub const API_URL: &str = "https://models.dev/api.json";

/// Session-scoped storage for the raw catalog payload.
///
/// The loader tolerates the cache being absent or corrupted; a corrupt entry
/// is removed and the fetch falls through to the network.
pub trait SessionCache {
    fn get(&self) -> Option<String>;
    fn put(&mut self, payload: &str);
    fn remove(&mut self);
}

/// In-memory cache, used in tests and by callers that manage their own
/// session lifetime.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entry: Option<String>,
}

impl MemoryCache {
    pub fn with_payload(payload: impl Into<String>) -> Self {
        MemoryCache {
            entry: Some(payload.into()),
        }
    }
}

impl SessionCache for MemoryCache {
    fn get(&self) -> Option<String> {
        self.entry.clone()
    }

    fn put(&mut self, payload: &str) {
        self.entry = Some(payload.to_string());
    }

    fn remove(&mut self) {
        self.entry = None;
    }
}

/// On-disk cache under `~/.mdk`.
#[cfg(feature = "http-client")]
#[derive(Debug)]
pub struct DirCache {
    path: PathBuf,
}

#[cfg(feature = "http-client")]
impl DirCache {
    pub fn new() -> Result<Self, CatalogError> {
        let home_dir = dirs::home_dir().ok_or_else(|| {
            CatalogError::GenericError("Could not find home directory".to_string())
        })?;
        Ok(DirCache {
            path: home_dir.join(".mdk").join(CACHE_FILE),
        })
    }

    pub fn at(path: PathBuf) -> Self {
        DirCache { path }
    }
}

#[cfg(feature = "http-client")]
impl SessionCache for DirCache {
    fn get(&self) -> Option<String> {
        let mut file = File::open(&self.path).ok()?;
        let mut contents = String::new();
        file.read_to_string(&mut contents).ok()?;
        Some(contents)
    }

    fn put(&mut self, payload: &str) {
        let write = || -> std::io::Result<()> {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut file = File::create(&self.path)?;
            file.write_all(payload.as_bytes())
        };
        if let Err(e) = write() {
            log::warn!("failed to write catalog cache: {}", e);
        }
    }

    fn remove(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

#[cfg(feature = "http-client")]
async fn fetch_payload(url: &str) -> Result<String, CatalogError> {
    let url = Url::parse(url)?;
    let client = Client::new();
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        return Err(CatalogError::HttpError(format!(
            "HTTP Error: {}",
            response.status()
        )));
    }

    Ok(response.text().await?)
}

/// Fetch the catalog from the upstream endpoint.
#[cfg(feature = "http-client")]
pub async fn fetch_catalog(url: &str) -> Result<Catalog, CatalogError> {
    let payload = fetch_payload(url).await?;
    let catalog: Catalog = serde_json::from_str(&payload)?;
    Ok(catalog)
}

/// Load the catalog, preferring the session cache over the network.
///
/// A cache hit that fails to parse is discarded and the load falls through to
/// a live fetch; the fresh payload is written back best-effort.
#[cfg(feature = "http-client")]
pub async fn load_catalog<C: SessionCache>(
    cache: &mut C,
    url: &str,
) -> Result<Catalog, CatalogError> {
    if let Some(cached) = cache.get() {
        match serde_json::from_str::<Catalog>(&cached) {
            Ok(catalog) => {
                log::debug!("catalog served from session cache");
                return Ok(catalog);
            }
            Err(e) => {
                log::warn!("discarding corrupt catalog cache: {}", e);
                cache.remove();
            }
        }
    }

    let payload = fetch_payload(url).await?;
    let catalog: Catalog = serde_json::from_str(&payload)?;
    cache.put(&payload);
    Ok(catalog)
}
