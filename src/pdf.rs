// ABOUTME: PDF module for the his-poster application
// ABOUTME: Accumulates captured images as full-bleed pages of a single PDF document

use crate::capture::{EncodedImage, ImageEncoding};
use crate::errors::{DeckError, Result};
use image::io::Reader as ImageReader;
use log::{debug, info};
use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, TextStr};
use std::io::Cursor;

const POINTS_PER_MM: f64 = 72.0 / 25.4;

/// Physical page size in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width_mm: f64,
    pub height_mm: f64,
}

impl PageGeometry {
    /// A4 landscape, one page per slide.
    pub const A4_LANDSCAPE: PageGeometry = PageGeometry {
        width_mm: 297.0,
        height_mm: 210.0,
    };

    /// A2 portrait, the poster page.
    pub const A2_PORTRAIT: PageGeometry = PageGeometry {
        width_mm: 420.0,
        height_mm: 594.0,
    };

    pub fn width_pt(&self) -> f32 {
        (self.width_mm * POINTS_PER_MM) as f32
    }

    pub fn height_pt(&self) -> f32 {
        (self.height_mm * POINTS_PER_MM) as f32
    }
}

/// Pixel data ready to be embedded as an image XObject.
#[derive(Debug, Clone)]
struct PageImage {
    width: u32,
    height: u32,
    filter: Filter,
    data: Vec<u8>,
}

impl PageImage {
    fn from_encoded(image: &EncodedImage) -> Result<Self> {
        match image.encoding {
            // JPEG bytes embed as-is; only the dimensions are needed.
            ImageEncoding::Jpeg { .. } => {
                let (width, height) = ImageReader::new(Cursor::new(&image.data))
                    .with_guessed_format()
                    .map_err(DeckError::FileError)?
                    .into_dimensions()?;
                Ok(Self {
                    width,
                    height,
                    filter: Filter::DctDecode,
                    data: image.data.clone(),
                })
            }
            ImageEncoding::Png => {
                let decoded =
                    image::load_from_memory_with_format(&image.data, image::ImageFormat::Png)?;
                let rgb = decoded.to_rgb8();
                let (width, height) = rgb.dimensions();
                let compressed = miniz_oxide::deflate::compress_to_vec_zlib(rgb.as_raw(), 6);
                Ok(Self {
                    width,
                    height,
                    filter: Filter::FlateDecode,
                    data: compressed,
                })
            }
        }
    }
}

/// An in-memory PDF built one page at a time. Every page has the same geometry
/// and carries exactly one image stretched to fill it.
#[derive(Debug, Clone)]
pub struct PdfDocument {
    geometry: PageGeometry,
    title: String,
    pages: Vec<PageImage>,
}

impl PdfDocument {
    pub fn new(geometry: PageGeometry, title: &str) -> Self {
        Self {
            geometry,
            title: title.to_string(),
            pages: Vec::new(),
        }
    }

    pub fn geometry(&self) -> PageGeometry {
        self.geometry
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Pixel dimensions of each page's image, in page order.
    pub fn page_image_sizes(&self) -> Vec<(u32, u32)> {
        self.pages.iter().map(|p| (p.width, p.height)).collect()
    }

    /// Append `image` as the next page. The first image fills the initial page.
    pub fn add_image_page(&mut self, image: &EncodedImage) -> Result<()> {
        let page = PageImage::from_encoded(image)?;
        debug!(
            "Adding page {} ({}x{} px)",
            self.pages.len() + 1,
            page.width,
            page.height
        );
        self.pages.push(page);
        Ok(())
    }

    /// Serialize the document.
    pub fn finish(&self) -> Result<Vec<u8>> {
        if self.pages.is_empty() {
            return Err(DeckError::PdfError(
                "Document has no pages to write".to_string(),
            ));
        }
        info!(
            "Serializing PDF: {} page(s) of {}x{} mm",
            self.pages.len(),
            self.geometry.width_mm,
            self.geometry.height_mm
        );

        let mut pdf = Pdf::new();
        let mut next_id = 1i32;
        let mut alloc = || {
            let r = Ref::new(next_id);
            next_id += 1;
            r
        };

        let catalog_id = alloc();
        let pages_id = alloc();
        let info_id = alloc();

        let (width, height) = (self.geometry.width_pt(), self.geometry.height_pt());
        let mut page_ids = Vec::with_capacity(self.pages.len());

        for page in &self.pages {
            let page_id = alloc();
            let content_id = alloc();
            let image_id = alloc();
            page_ids.push(page_id);

            let mut xobj = pdf.image_xobject(image_id, &page.data);
            xobj.filter(page.filter);
            xobj.width(page.width as i32);
            xobj.height(page.height as i32);
            xobj.color_space().device_rgb();
            xobj.bits_per_component(8);
            drop(xobj);

            let mut content = Content::new();
            content.save_state();
            content.transform([width, 0.0, 0.0, height, 0.0, 0.0]);
            content.x_object(Name(b"Im1"));
            content.restore_state();
            let raw = content.finish();
            pdf.stream(content_id, raw.as_slice());

            let mut pdf_page = pdf.page(page_id);
            pdf_page
                .media_box(Rect::new(0.0, 0.0, width, height))
                .parent(pages_id)
                .contents(content_id);
            pdf_page
                .resources()
                .x_objects()
                .pair(Name(b"Im1"), image_id);
        }

        pdf.catalog(catalog_id).pages(pages_id);
        pdf.pages(pages_id)
            .kids(page_ids.iter().copied())
            .count(page_ids.len() as i32);
        pdf.document_info(info_id)
            .title(TextStr(&self.title))
            .producer(TextStr("his-poster"));

        Ok(pdf.finish())
    }
}
