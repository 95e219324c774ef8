use his_poster::export::{self, ExportProfile, HiddenControl};
use his_poster::{
    CaptureSettings, Capturer, Deck, DeckError, EncodedImage, ImageEncoding, Navigator,
    PageGeometry, Result,
};
use image::{ImageOutputFormat, Rgb, RgbImage};
use std::fs;
use std::io::Cursor;
use tempfile::TempDir;

#[derive(Debug, Clone, PartialEq)]
enum Event {
    ControlVisible(bool),
    Show(usize),
    Ready,
    Capture(usize),
}

/// In-memory capture surface that records every call it receives.
struct FakeCapturer {
    region: bool,
    shown: Option<usize>,
    fail_on: Option<usize>,
    control_visible: bool,
    events: Vec<Event>,
}

impl FakeCapturer {
    fn new() -> Self {
        Self {
            region: true,
            shown: Some(0),
            fail_on: None,
            control_visible: true,
            events: Vec::new(),
        }
    }

    fn captured(&self) -> Vec<usize> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Capture(i) => Some(*i),
                _ => None,
            })
            .collect()
    }
}

fn encoded(encoding: ImageEncoding, width: u32, height: u32) -> Vec<u8> {
    let image = RgbImage::from_pixel(width, height, Rgb([0x1f, 0x29, 0x37]));
    let format = match encoding {
        ImageEncoding::Png => ImageOutputFormat::Png,
        ImageEncoding::Jpeg { quality } => ImageOutputFormat::Jpeg(quality),
    };
    let mut bytes = Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, format)
        .expect("Failed to encode test image");
    bytes.into_inner()
}

impl Capturer for FakeCapturer {
    fn has_capture_region(&mut self) -> Result<bool> {
        Ok(self.region)
    }

    fn set_export_control_visible(&mut self, visible: bool) -> Result<()> {
        self.control_visible = visible;
        self.events.push(Event::ControlVisible(visible));
        Ok(())
    }

    fn show_slide(&mut self, index: usize) -> Result<()> {
        self.shown = Some(index);
        self.events.push(Event::Show(index));
        Ok(())
    }

    fn wait_until_ready(&mut self) -> Result<()> {
        self.events.push(Event::Ready);
        Ok(())
    }

    fn capture(&mut self, settings: &CaptureSettings) -> Result<EncodedImage> {
        let index = self.shown.unwrap_or(0);
        if self.fail_on == Some(index) {
            return Err(DeckError::ScreenshotError(format!(
                "simulated failure on slide {}",
                index
            )));
        }
        self.events.push(Event::Capture(index));
        // Width encodes the slide index so page order can be checked.
        Ok(EncodedImage {
            encoding: settings.encoding,
            data: encoded(settings.encoding, 16 + index as u32, 9),
        })
    }
}

#[test]
fn test_deck_export_visits_every_slide_in_order() {
    let deck = Deck::healthcare();
    let mut navigator = Navigator::new(deck.len()).unwrap();
    let mut capturer = FakeCapturer::new();
    let profile = ExportProfile::deck();

    let document = export::capture_deck(&mut capturer, &mut navigator, &profile).unwrap();

    assert_eq!(capturer.captured(), (0..11).collect::<Vec<_>>());
    assert_eq!(document.page_count(), 11);
    assert_eq!(document.geometry(), PageGeometry::A4_LANDSCAPE);
    let widths: Vec<u32> = document.page_image_sizes().iter().map(|s| s.0).collect();
    assert_eq!(widths, (16..27).collect::<Vec<u32>>());

    // Each capture follows a switch to the same slide and a readiness wait.
    for i in 0..11 {
        let at = capturer
            .events
            .iter()
            .position(|e| *e == Event::Capture(i))
            .unwrap();
        assert_eq!(capturer.events[at - 1], Event::Ready);
        assert_eq!(capturer.events[at - 2], Event::Show(i));
    }

    assert_eq!(capturer.events.first(), Some(&Event::ControlVisible(false)));
    assert_eq!(capturer.events.last(), Some(&Event::ControlVisible(true)));
    assert!(capturer.control_visible);
    assert_eq!(navigator.current(), 10);
}

#[test]
fn test_deck_export_failure_restores_control_and_writes_nothing() {
    let deck = Deck::healthcare();
    let mut navigator = Navigator::new(deck.len()).unwrap();
    let mut capturer = FakeCapturer::new();
    capturer.fail_on = Some(5);
    let output_dir = TempDir::new().expect("Failed to create temp dir");

    let result = export::export_deck_with(&mut capturer, &mut navigator, output_dir.path());

    assert!(matches!(result, Err(DeckError::ScreenshotError(_))));
    assert_eq!(capturer.captured(), vec![0, 1, 2, 3, 4]);
    assert!(capturer.control_visible, "control must be visible again");
    assert_eq!(
        fs::read_dir(output_dir.path()).unwrap().count(),
        0,
        "no file may be written after a failed export"
    );
}

#[test]
fn test_deck_export_saves_pdf() {
    let deck = Deck::healthcare();
    let mut navigator = Navigator::new(deck.len()).unwrap();
    let mut capturer = FakeCapturer::new();
    let output_dir = TempDir::new().expect("Failed to create temp dir");

    let path =
        export::export_deck_with(&mut capturer, &mut navigator, output_dir.path()).unwrap();

    assert_eq!(path, output_dir.path().join("healthcare-presentation.pdf"));
    let bytes = fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
    let text = String::from_utf8_lossy(&bytes);
    let pages = text.matches("/Type /Page").count() - text.matches("/Type /Pages").count();
    assert_eq!(pages, 11);
    assert!(text.contains("/Count 11"));
    assert!(text.contains("/MediaBox [0 0 841.8"));
    assert!(text.contains("/FlateDecode"));
}

#[test]
fn test_poster_export_single_jpeg_page() {
    let mut capturer = FakeCapturer::new();
    let profile = ExportProfile::poster();
    let output_dir = TempDir::new().expect("Failed to create temp dir");

    let document = export::capture_poster(&mut capturer, &profile)
        .unwrap()
        .expect("poster region is present");
    assert_eq!(document.page_count(), 1);
    assert_eq!(document.geometry(), PageGeometry::A2_PORTRAIT);

    let path = export::save_document(&document, output_dir.path(), &profile).unwrap();
    assert_eq!(
        path.file_name().unwrap(),
        "Health-Information-Systems-Poster-A2.pdf"
    );
    let bytes = fs::read(&path).unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains("/DCTDecode"));
    assert!(capturer.control_visible);
}

#[test]
fn test_poster_export_without_region_is_noop() {
    let mut capturer = FakeCapturer::new();
    capturer.region = false;

    let document = export::capture_poster(&mut capturer, &ExportProfile::poster()).unwrap();

    assert!(document.is_none());
    assert!(capturer.events.is_empty(), "nothing may be touched");
}

#[test]
fn test_poster_export_writes_file_only_when_captured() {
    let output_dir = TempDir::new().expect("Failed to create temp dir");

    let mut empty = FakeCapturer::new();
    empty.region = false;
    assert_eq!(export::export_poster_with(&mut empty, output_dir.path()).unwrap(), None);
    assert_eq!(fs::read_dir(output_dir.path()).unwrap().count(), 0);

    let mut failing = FakeCapturer::new();
    failing.fail_on = Some(0);
    let result = export::export_poster_with(&mut failing, output_dir.path());
    assert!(matches!(result, Err(DeckError::ScreenshotError(_))));
    assert!(failing.control_visible);
    assert_eq!(fs::read_dir(output_dir.path()).unwrap().count(), 0);

    let mut capturer = FakeCapturer::new();
    let path = export::export_poster_with(&mut capturer, output_dir.path())
        .unwrap()
        .expect("poster region is present");
    assert_eq!(
        path,
        output_dir.path().join("Health-Information-Systems-Poster-A2.pdf")
    );
    assert!(fs::read(&path).unwrap().starts_with(b"%PDF-"));
    assert_eq!(fs::read_dir(output_dir.path()).unwrap().count(), 1);
}

#[test]
fn test_profiles() {
    let deck = ExportProfile::deck();
    assert_eq!(deck.page.width_mm, 297.0);
    assert_eq!(deck.page.height_mm, 210.0);
    assert_eq!(deck.capture.scale, 2.0);
    assert_eq!(deck.capture.background, "#1f2937");
    assert_eq!(deck.capture.encoding, ImageEncoding::Png);

    let poster = ExportProfile::poster();
    assert_eq!(poster.page.width_mm, 420.0);
    assert_eq!(poster.page.height_mm, 594.0);
    assert_eq!(poster.capture.scale, 3.0);
    assert_eq!(poster.capture.background, "#ffffff");
    assert_eq!(poster.capture.encoding, ImageEncoding::Jpeg { quality: 100 });
}

#[test]
fn test_hidden_control_restores_on_drop() {
    let mut capturer = FakeCapturer::new();
    {
        let mut control = HiddenControl::hide(&mut capturer).unwrap();
        control.show_slide(3).unwrap();
        assert!(!control.control_visible);
    }
    assert!(capturer.control_visible);
    assert_eq!(
        capturer.events,
        vec![
            Event::ControlVisible(false),
            Event::Show(3),
            Event::ControlVisible(true)
        ]
    );
}

#[test]
fn test_empty_document_cannot_be_saved() {
    let output_dir = TempDir::new().expect("Failed to create temp dir");
    let profile = ExportProfile::deck();
    let document = his_poster::PdfDocument::new(profile.page, profile.title);

    let result = export::save_document(&document, output_dir.path(), &profile);
    assert!(matches!(result, Err(DeckError::PdfError(_))));
    assert_eq!(fs::read_dir(output_dir.path()).unwrap().count(), 0);
}
