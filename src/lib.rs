// ABOUTME: Library module for the his-poster program.
// ABOUTME: Contains the poster and deck content, renderers, exporters and the viewer server.

// Reexport modules
pub mod capture;
pub mod config;
pub mod content;
pub mod errors;
pub mod export;
pub mod html;
pub mod layout;
pub mod navigation;
pub mod pdf;
pub mod pptx;
pub mod resources;
pub mod server;
pub mod utils;

// Reexport common types and functions
pub use capture::{
    CaptureConfig, CaptureSettings, Capturer, ChromeCapturer, EncodedImage, ImageEncoding,
};
pub use config::Config;
pub use content::{Deck, Poster, Slide, SlideKind};
pub use errors::{DeckError, Result};
pub use export::{
    capture_deck, capture_poster, export_deck_pdf, export_deck_with, export_poster_pdf,
    export_poster_with, ExportProfile,
};
pub use html::{generate_deck_html, generate_poster_html, write_html_to_file};
pub use layout::{layout_slide, SlideLayout, Template};
pub use navigation::Navigator;
pub use pdf::{PageGeometry, PdfDocument};
pub use pptx::{build_pptx, generate_pptx, PptxConfig};
pub use resources::ImageResource;
pub use server::{serve, Route, ServeConfig, Viewer};

#[cfg(test)]
mod tests;
