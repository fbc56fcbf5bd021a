//! Fetching elevation and rotation payloads over HTTP or from disk.

use crate::cache::{Cache, NoCache};
use crate::error::{Error, Result};
use paleoglobe_rotation::{RotationIndex, parse_catalog};
use paleoglobe_surface::{ElevationGrid, GridDimensions};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

/// Where a payload comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Source {
    /// An absolute `http(s)://` URL, or a path joined onto the client's base URL.
    Url(String),
    /// A local file.
    File(PathBuf),
}

impl Source {
    /// Whether `url` already names a scheme the client can fetch directly.
    #[must_use]
    pub fn is_absolute_url(url: &str) -> bool {
        url.starts_with("http://") || url.starts_with("https://")
    }
}

impl FromStr for Source {
    type Err = std::convert::Infallible;

    /// `http(s)://` strings become URLs, anything else a file path.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(if Self::is_absolute_url(s) {
            Self::Url(s.to_owned())
        } else {
            Self::File(PathBuf::from(s))
        })
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => f.write_str(url),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Async client for globe data payloads.
///
/// Every fetch consults the cache first and stores successful downloads in
/// it. Decoding is synchronous and happens after the bytes are in hand.
///
/// # Example
///
/// ```ignore
/// let client = Client::new().with_base_url("https://data.example.org/".to_string());
/// let grid = client
///     .fetch_elevation(&Source::Url("elevation/etopo1_simplified.bin".into()), GridDimensions::default())
///     .await?;
/// ```
pub struct Client<C: Cache = NoCache> {
    http: reqwest::Client,
    cache: Arc<C>,
    base_url: Option<String>,
}

impl Client<NoCache> {
    /// Create a client with no caching and no base URL.
    #[must_use]
    pub fn new() -> Self {
        Self::with_cache(NoCache)
    }
}

impl Default for Client<NoCache> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Cache> Client<C> {
    /// Create a client backed by `cache`.
    #[must_use]
    pub fn with_cache(cache: C) -> Self {
        Self::with_http_and_cache(reqwest::Client::new(), cache)
    }

    /// Create a client with a custom HTTP client and cache.
    #[must_use]
    pub fn with_http_and_cache(http: reqwest::Client, cache: C) -> Self {
        Self {
            http,
            cache: Arc::new(cache),
            base_url: None,
        }
    }

    /// Set the base URL that relative [`Source::Url`] paths are joined onto.
    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// The configured base URL, if any.
    #[must_use]
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// The cache this client reads and fills.
    #[must_use]
    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Canonical form of a source, used as cache key and in logs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] for a relative URL when no base URL is set.
    pub fn resolve(&self, source: &Source) -> Result<String> {
        match source {
            Source::Url(url) if Source::is_absolute_url(url) => Ok(url.clone()),
            Source::Url(path) => {
                let base = self.base_url.as_deref().ok_or_else(|| Error::InvalidData {
                    context: "source url",
                    detail: format!("relative url {path} without a base url"),
                })?;
                Ok(format!(
                    "{}/{}",
                    base.trim_end_matches('/'),
                    path.trim_start_matches('/')
                ))
            }
            Source::File(path) => Ok(format!("file://{}", path.display())),
        }
    }

    /// Fetch the raw bytes of `source`, using the cache if available.
    ///
    /// [`Source::File`] is read synchronously with `std::fs`, blocking the
    /// executor thread for the duration of the read. On wasm there is no
    /// filesystem and file sources always fail with [`Error::Io`].
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the server answers with a
    /// non-success status, the file cannot be read or the cache fails.
    pub async fn fetch_bytes(&self, source: &Source) -> Result<Vec<u8>> {
        let key = self.resolve(source)?;

        if let Some(data) = self.cache.get(&key).await? {
            tracing::debug!(source = %key, bytes = data.len(), "cache hit");
            return Ok(data);
        }

        tracing::debug!(source = %key, "fetching");

        let data = match source {
            Source::Url(_) => self.download(&key).await?,
            Source::File(path) => std::fs::read(path).map_err(|e| Error::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            })?,
        };

        self.cache.put(&key, data.clone()).await?;

        Ok(data)
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Http {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let data = response.bytes().await.map_err(|e| Error::Http {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        Ok(data.to_vec())
    }

    /// Fetch and decode an elevation grid of the given dimensions.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch fails or the payload length does not
    /// match `dims`.
    pub async fn fetch_elevation(
        &self,
        source: &Source,
        dims: GridDimensions,
    ) -> Result<ElevationGrid> {
        let data = self.fetch_bytes(source).await?;
        Ok(ElevationGrid::from_le_bytes(dims, &data)?)
    }

    /// Fetch, parse and index a rotation catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch fails, the text is not UTF-8 or the
    /// catalog holds no rotation.
    pub async fn fetch_rotations(&self, source: &Source) -> Result<RotationIndex> {
        let data = self.fetch_bytes(source).await?;
        let text = String::from_utf8(data).map_err(|e| Error::InvalidData {
            context: "rotation catalog",
            detail: e.to_string(),
        })?;
        Ok(RotationIndex::build(parse_catalog(&text))?)
    }
}
