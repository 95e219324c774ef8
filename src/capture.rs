// ABOUTME: Capture module for the his-poster application
// ABOUTME: Rasterizes the capture region of a rendered page using a headless browser

use crate::errors::{DeckError, Result};
use crate::utils;
use headless_chrome::protocol::cdp::Page;
use headless_chrome::{Browser, LaunchOptionsBuilder, Tab};
use log::{debug, info, warn};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use url::Url;

/// Encoding of a captured raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageEncoding {
    Png,
    Jpeg { quality: u8 },
}

impl ImageEncoding {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageEncoding::Png => "png",
            ImageEncoding::Jpeg { .. } => "jpeg",
        }
    }
}

/// An encoded raster as produced by a capturer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub encoding: ImageEncoding,
    pub data: Vec<u8>,
}

/// How a single capture is taken.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureSettings {
    /// Device-pixel upscale applied to the capture region.
    pub scale: f64,
    /// CSS color painted behind the capture region so no pixel stays transparent.
    pub background: String,
    pub encoding: ImageEncoding,
}

/// A live surface that can show a slide and rasterize its capture region.
///
/// The export pipeline only talks to this trait, so it runs unchanged against
/// a headless browser or an in-memory fake.
pub trait Capturer {
    /// Whether the page has a capture region at all.
    fn has_capture_region(&mut self) -> Result<bool>;

    /// Show or hide the export-trigger control.
    fn set_export_control_visible(&mut self, visible: bool) -> Result<()>;

    /// Make slide `index` the visible one.
    fn show_slide(&mut self, index: usize) -> Result<()>;

    /// Block until the visible content has finished loading.
    fn wait_until_ready(&mut self) -> Result<()>;

    /// Rasterize and encode the capture region.
    fn capture(&mut self, settings: &CaptureSettings) -> Result<EncodedImage>;
}

/// Configuration for browser capture
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    pub width: u32,
    pub height: u32,
    pub browser_path: Option<String>,
    /// Upper bound on waiting for the page to report itself ready.
    pub ready_timeout_ms: u64,
    /// Minimum pause after switching slides before polling readiness.
    pub settle_delay_ms: u64,
    pub poll_interval_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            width: 1400,
            height: 900,
            browser_path: None,
            ready_timeout_ms: 30000, // 30 seconds
            settle_delay_ms: 500,
            poll_interval_ms: 50,
        }
    }
}

/// Capturer backed by a headless Chrome tab showing a generated page.
pub struct ChromeCapturer {
    // Keeps the browser process alive for as long as the tab is in use.
    _browser: Browser,
    tab: Arc<Tab>,
    page_file: PathBuf,
    config: CaptureConfig,
}

impl ChromeCapturer {
    /// Launch a headless browser and load `html` into a fresh tab.
    pub fn launch(html: &str, config: &CaptureConfig) -> Result<Self> {
        let page_file = env::temp_dir().join(format!("his-poster-{}.html", uuid::Uuid::new_v4()));
        fs::write(&page_file, html).map_err(DeckError::FileError)?;

        match Self::open(&page_file, config) {
            Ok((browser, tab)) => Ok(Self {
                _browser: browser,
                tab,
                page_file,
                config: config.clone(),
            }),
            Err(e) => {
                let _ = fs::remove_file(&page_file);
                Err(e)
            }
        }
    }

    fn open(page_file: &Path, config: &CaptureConfig) -> Result<(Browser, Arc<Tab>)> {
        let mut launch_options_builder = LaunchOptionsBuilder::default();
        launch_options_builder.window_size(Some((config.width, config.height)));
        launch_options_builder.headless(true);

        if let Some(browser_path) = &config.browser_path {
            launch_options_builder.path(Some(browser_path.into()));
        } else if let Ok(path) = env::var("BROWSER_PATH") {
            if !path.is_empty() {
                launch_options_builder.path(Some(path.into()));
            }
        }

        let launch_options = launch_options_builder
            .build()
            .map_err(|e| DeckError::BrowserError {
                message: format!("Failed to build browser options: {:?}", e),
                source: None,
            })?;

        info!("Launching headless browser");
        let browser = Browser::new(launch_options).map_err(|e| {
            warn!("Failed to launch browser: {}", e);
            DeckError::browser("Failed to launch browser", e)
        })?;

        let absolute = utils::get_absolute_path(page_file)?;
        let url = Url::from_file_path(&absolute).map_err(|_| {
            DeckError::InvalidResourcePath(format!("Cannot build file URL for {:?}", absolute))
        })?;
        info!("Opening page at URL: {}", url);

        let tab = browser
            .new_tab()
            .map_err(|e| DeckError::browser("Failed to create new tab", e))?;
        tab.navigate_to(url.as_str())
            .map_err(|e| DeckError::browser("Failed to navigate to page", e))?;
        tab.wait_until_navigated()
            .map_err(|e| DeckError::browser("Navigation failed", e))?;
        tab.wait_for_element_with_custom_timeout(
            "body",
            Duration::from_millis(config.ready_timeout_ms),
        )
        .map_err(|e| DeckError::browser("Failed to wait for body element", e))?;

        Ok((browser, tab))
    }

    fn evaluate_bool(&self, expression: &str) -> Result<bool> {
        let result = self
            .tab
            .evaluate(expression, false)
            .map_err(|e| DeckError::browser("Script evaluation failed", e))?;
        Ok(result.value.and_then(|v| v.as_bool()).unwrap_or(false))
    }
}

impl Capturer for ChromeCapturer {
    fn has_capture_region(&mut self) -> Result<bool> {
        self.evaluate_bool("typeof captureRegionPresent === 'function' && captureRegionPresent()")
    }

    fn set_export_control_visible(&mut self, visible: bool) -> Result<()> {
        let found = self.evaluate_bool(&format!("setExportControlVisible({})", visible))?;
        if !found {
            debug!("Page has no export control to toggle");
        }
        Ok(())
    }

    fn show_slide(&mut self, index: usize) -> Result<()> {
        if self.evaluate_bool(&format!("showSlide({})", index))? {
            Ok(())
        } else {
            Err(DeckError::ValidationError(format!(
                "Page has no slide at index {}",
                index
            )))
        }
    }

    fn wait_until_ready(&mut self) -> Result<()> {
        thread::sleep(Duration::from_millis(self.config.settle_delay_ms));

        let timeout = Duration::from_millis(self.config.ready_timeout_ms);
        let started = Instant::now();
        loop {
            if self.evaluate_bool("captureReady()")? {
                debug!("Page ready after {:?}", started.elapsed());
                return Ok(());
            }
            if started.elapsed() >= timeout {
                return Err(DeckError::TimeoutError(format!(
                    "Page content did not finish loading within {} ms",
                    self.config.ready_timeout_ms
                )));
            }
            thread::sleep(Duration::from_millis(self.config.poll_interval_ms));
        }
    }

    fn capture(&mut self, settings: &CaptureSettings) -> Result<EncodedImage> {
        let background = settings.background.replace('\'', "");
        self.evaluate_bool(&format!("setCaptureBackground('{}')", background))?;

        let region = self
            .tab
            .find_element("#capture-region")
            .map_err(|e| DeckError::ScreenshotError(format!("Capture region not found: {}", e)))?;
        let box_model = region
            .get_box_model()
            .map_err(|e| DeckError::ScreenshotError(format!("Failed to measure region: {}", e)))?;
        let mut clip = box_model.content_viewport();
        clip.scale = settings.scale;

        let (format, quality) = match settings.encoding {
            ImageEncoding::Png => (Page::CaptureScreenshotFormatOption::Png, None),
            ImageEncoding::Jpeg { quality } => (
                Page::CaptureScreenshotFormatOption::Jpeg,
                Some(u32::from(quality)),
            ),
        };

        let data = self
            .tab
            .capture_screenshot(format, quality, Some(clip), true)
            .map_err(|e| DeckError::ScreenshotError(e.to_string()))?;

        debug!(
            "Captured {} bytes as {}",
            data.len(),
            settings.encoding.extension()
        );
        Ok(EncodedImage {
            encoding: settings.encoding,
            data,
        })
    }
}

impl Drop for ChromeCapturer {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.page_file) {
            warn!("Failed to clean up page file {:?}: {}", self.page_file, e);
        }
    }
}
