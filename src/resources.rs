// ABOUTME: Resource handling for the his-poster application
// ABOUTME: Loads slide background images from local paths or remote URLs

use crate::errors::{DeckError, Result};
use image::ImageFormat;
use log::{info, warn};
use reqwest::blocking::Client;
use std::fs;
use std::path::Path;
use std::thread;
use std::time::Duration;
use url::Url;

const FETCH_ATTEMPTS: u32 = 3;
const FETCH_TIMEOUT_SECS: u64 = 10;

/// A background image that can be either local or remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResource {
    pub location: String,
    pub is_remote: bool,
}

/// Image bytes together with the format sniffed from them.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub format: ImageFormat,
    pub data: Vec<u8>,
}

impl LoadedImage {
    /// File extension to use when the bytes are stored inside a package.
    pub fn extension(&self) -> &'static str {
        match self.format {
            ImageFormat::Png => "png",
            ImageFormat::Gif => "gif",
            ImageFormat::WebP => "webp",
            _ => "jpeg",
        }
    }
}

impl ImageResource {
    /// Create a resource from a path string or URL.
    pub fn new(location: &str) -> Self {
        let is_remote = location.starts_with("http://") || location.starts_with("https://");
        Self {
            location: location.to_string(),
            is_remote,
        }
    }

    /// Load the image bytes and check they decode as a known image format.
    pub fn load(&self) -> Result<LoadedImage> {
        let data = if self.is_remote {
            self.fetch_remote()?
        } else {
            self.read_local()?
        };
        let format = image::guess_format(&data)?;
        Ok(LoadedImage { format, data })
    }

    /// Fetch bytes from a remote URL with retry capability
    fn fetch_remote(&self) -> Result<Vec<u8>> {
        let url = Url::parse(&self.location).map_err(|e| {
            DeckError::InvalidResourcePath(format!("Invalid URL {}: {}", self.location, e))
        })?;
        info!("Fetching remote image: {}", url);

        let client = Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()?;

        let mut retry_delay = 1000;
        let mut last_error = None;

        for attempt in 1..=FETCH_ATTEMPTS {
            match client.get(url.clone()).send() {
                Ok(response) if response.status().is_success() => {
                    return Ok(response.bytes()?.to_vec());
                }
                Ok(response) => {
                    last_error = Some(DeckError::ValidationError(format!(
                        "HTTP error: {}",
                        response.status()
                    )));
                }
                Err(e) => last_error = Some(DeckError::FetchError(e)),
            }

            if attempt < FETCH_ATTEMPTS {
                warn!(
                    "Fetch attempt {} failed, retrying in {} ms",
                    attempt, retry_delay
                );
                thread::sleep(Duration::from_millis(retry_delay));
                retry_delay *= 2;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            DeckError::UnknownError("Unknown error fetching resource".to_string())
        }))
    }

    fn read_local(&self) -> Result<Vec<u8>> {
        info!("Reading local image: {}", self.location);
        let path = Path::new(&self.location);
        if !path.exists() {
            return Err(DeckError::PathNotFoundError(path.to_path_buf()));
        }
        fs::read(path).map_err(DeckError::FileError)
    }
}
