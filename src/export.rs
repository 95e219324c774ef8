// ABOUTME: Export pipeline for the his-poster application
// ABOUTME: Walks the deck or the poster through capture and collects the pages into a PDF

use crate::capture::{CaptureConfig, CaptureSettings, Capturer, ChromeCapturer, ImageEncoding};
use crate::content::{Deck, Poster};
use crate::errors::Result;
use crate::html;
use crate::navigation::Navigator;
use crate::pdf::{PageGeometry, PdfDocument};
use crate::utils;
use log::{error, info, warn};
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use std::time::Instant;

pub const POSTER_PDF_FILE: &str = "Health-Information-Systems-Poster-A2.pdf";
pub const DECK_PDF_FILE: &str = "healthcare-presentation.pdf";

/// Message shown to the user when the poster export fails.
pub const POSTER_FAILURE_MESSAGE: &str = "Error generating PDF. Please try again.";

/// Everything fixed about one kind of rasterized export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportProfile {
    pub page: PageGeometry,
    pub capture: CaptureSettings,
    pub file_name: &'static str,
    pub title: &'static str,
}

impl ExportProfile {
    /// One A4 landscape PNG page per slide, 2x, over the deck background.
    pub fn deck() -> Self {
        Self {
            page: PageGeometry::A4_LANDSCAPE,
            capture: CaptureSettings {
                scale: 2.0,
                background: "#1f2937".to_string(),
                encoding: ImageEncoding::Png,
            },
            file_name: DECK_PDF_FILE,
            title: "Healthcare Information Systems Presentation",
        }
    }

    /// A single A2 portrait JPEG page, 3x, over white.
    pub fn poster() -> Self {
        Self {
            page: PageGeometry::A2_PORTRAIT,
            capture: CaptureSettings {
                scale: 3.0,
                background: "#ffffff".to_string(),
                encoding: ImageEncoding::Jpeg { quality: 100 },
            },
            file_name: POSTER_PDF_FILE,
            title: "Health Information Systems Poster",
        }
    }
}

/// Keeps the export control hidden while alive and shows it again on drop,
/// whichever way the export ends.
pub struct HiddenControl<'a, C: Capturer + ?Sized> {
    capturer: &'a mut C,
}

impl<'a, C: Capturer + ?Sized> HiddenControl<'a, C> {
    pub fn hide(capturer: &'a mut C) -> Result<Self> {
        capturer.set_export_control_visible(false)?;
        Ok(Self { capturer })
    }
}

impl<C: Capturer + ?Sized> Deref for HiddenControl<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.capturer
    }
}

impl<C: Capturer + ?Sized> DerefMut for HiddenControl<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        self.capturer
    }
}

impl<C: Capturer + ?Sized> Drop for HiddenControl<'_, C> {
    fn drop(&mut self) {
        if let Err(e) = self.capturer.set_export_control_visible(true) {
            warn!("Failed to restore export control: {}", e);
        }
    }
}

/// Capture every slide in deck order into one document.
///
/// The navigator is walked through each index before the matching capture and
/// is left on the last slide. Any failure aborts the whole run.
pub fn capture_deck<C: Capturer + ?Sized>(
    capturer: &mut C,
    navigator: &mut Navigator,
    profile: &ExportProfile,
) -> Result<PdfDocument> {
    let slide_count = navigator.len();
    info!("Capturing {} slides", slide_count);

    let start_time = Instant::now();
    let mut document = PdfDocument::new(profile.page, profile.title);
    let mut control = HiddenControl::hide(capturer)?;

    for index in 0..slide_count {
        navigator.jump_to(index)?;
        control.show_slide(index)?;
        control.wait_until_ready()?;
        let image = control.capture(&profile.capture)?;
        document.add_image_page(&image)?;
        info!("Captured slide {}/{}", index + 1, slide_count);
    }
    drop(control);

    info!(
        "Capture complete. {} pages in {:.2} seconds",
        document.page_count(),
        start_time.elapsed().as_secs_f64()
    );
    Ok(document)
}

/// Capture the poster into a one-page document.
///
/// Returns `None` without touching anything when the page has no capture region.
pub fn capture_poster<C: Capturer + ?Sized>(
    capturer: &mut C,
    profile: &ExportProfile,
) -> Result<Option<PdfDocument>> {
    if !capturer.has_capture_region()? {
        warn!("No poster capture region present; nothing to export");
        return Ok(None);
    }

    let mut document = PdfDocument::new(profile.page, profile.title);
    let mut control = HiddenControl::hide(capturer)?;
    control.wait_until_ready()?;
    let image = control.capture(&profile.capture)?;
    document.add_image_page(&image)?;
    drop(control);

    Ok(Some(document))
}

/// Serialize `document` and write it under the profile's file name in `output_dir`.
pub fn save_document(
    document: &PdfDocument,
    output_dir: &Path,
    profile: &ExportProfile,
) -> Result<PathBuf> {
    let bytes = document.finish()?;
    let path = output_dir.join(profile.file_name);
    utils::write_atomically(&path, &bytes)?;
    info!("Saved {:?} ({} bytes)", path, bytes.len());
    Ok(path)
}

/// Capturer configuration sized for the deck page.
pub fn deck_capture_config(base: &CaptureConfig) -> CaptureConfig {
    CaptureConfig {
        width: base.width.max(html::STAGE_WIDTH_PX + 120),
        height: base.height.max(html::STAGE_HEIGHT_PX + 180),
        ..base.clone()
    }
}

/// Capturer configuration sized so the whole poster fits the window.
pub fn poster_capture_config(base: &CaptureConfig) -> CaptureConfig {
    CaptureConfig {
        width: base.width.max(html::POSTER_WIDTH_PX + 100),
        height: base.height.max(html::POSTER_HEIGHT_PX + 100),
        ..base.clone()
    }
}

/// Render the deck in a headless browser and capture it into a document.
pub fn render_deck_pdf(
    deck: &Deck,
    navigator: &mut Navigator,
    config: &CaptureConfig,
) -> Result<PdfDocument> {
    let profile = ExportProfile::deck();
    let page = html::generate_deck_html(deck, navigator)?;
    let mut capturer = ChromeCapturer::launch(&page, &deck_capture_config(config))?;
    capture_deck(&mut capturer, navigator, &profile)
}

/// Render the poster in a headless browser and capture it into a document,
/// or `None` when there was nothing to capture.
pub fn render_poster_pdf(poster: &Poster, config: &CaptureConfig) -> Result<Option<PdfDocument>> {
    let profile = ExportProfile::poster();
    let page = html::generate_poster_html(poster)?;
    let mut capturer = ChromeCapturer::launch(&page, &poster_capture_config(config))?;
    capture_poster(&mut capturer, &profile)
}

/// Capture the deck with `capturer` and save it under `output_dir`.
///
/// Nothing is written unless every slide was captured.
pub fn export_deck_with<C: Capturer + ?Sized>(
    capturer: &mut C,
    navigator: &mut Navigator,
    output_dir: &Path,
) -> Result<PathBuf> {
    let profile = ExportProfile::deck();
    let document = capture_deck(capturer, navigator, &profile)?;
    save_document(&document, output_dir, &profile)
}

/// Capture the poster with `capturer` and save it under `output_dir`.
pub fn export_poster_with<C: Capturer + ?Sized>(
    capturer: &mut C,
    output_dir: &Path,
) -> Result<Option<PathBuf>> {
    let profile = ExportProfile::poster();
    match capture_poster(capturer, &profile)? {
        Some(document) => save_document(&document, output_dir, &profile).map(Some),
        None => Ok(None),
    }
}

/// Export the deck to `output_dir`. Failures are logged only.
pub fn export_deck_pdf(
    deck: &Deck,
    navigator: &mut Navigator,
    config: &CaptureConfig,
    output_dir: &Path,
) -> Result<PathBuf> {
    utils::validate_directory_writable(output_dir)?;
    let result = html::generate_deck_html(deck, navigator)
        .and_then(|page| ChromeCapturer::launch(&page, &deck_capture_config(config)))
        .and_then(|mut capturer| export_deck_with(&mut capturer, navigator, output_dir));
    if let Err(e) = &result {
        error!("Error generating PDF: {}", e);
    }
    result
}

/// Export the poster to `output_dir`. Returns `Ok(None)` when nothing was captured.
pub fn export_poster_pdf(
    poster: &Poster,
    config: &CaptureConfig,
    output_dir: &Path,
) -> Result<Option<PathBuf>> {
    utils::validate_directory_writable(output_dir)?;
    let result = html::generate_poster_html(poster)
        .and_then(|page| ChromeCapturer::launch(&page, &poster_capture_config(config)))
        .and_then(|mut capturer| export_poster_with(&mut capturer, output_dir));
    if let Err(e) = &result {
        error!("Error generating PDF: {}", e);
    }
    result
}
