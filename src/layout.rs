// ABOUTME: Slide layout module for the his-poster application
// ABOUTME: Defines every slide template once as positioned elements on a fixed canvas

use crate::content::{Feature, Layer, LayerColor, Section, Slide, SlideKind};

/// Canvas width in canvas units (inches of a 16:9 slide).
pub const CANVAS_WIDTH: f64 = 10.0;
/// Canvas height in canvas units.
pub const CANVAS_HEIGHT: f64 = 5.625;

const MARGIN: f64 = 0.5;
const BODY_WIDTH: f64 = CANVAS_WIDTH - 2.0 * MARGIN;
const BODY_TOP: f64 = 1.25;
const BODY_HEIGHT: f64 = 4.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Rgb = Rgb(0x00, 0x00, 0x00);
    pub const SLATE: Rgb = Rgb(0x1F, 0x29, 0x37);
    pub const GRAY_300: Rgb = Rgb(0xD1, 0xD5, 0xDB);
    pub const GRAY_400: Rgb = Rgb(0x9C, 0xA3, 0xAF);
    pub const BLUE_300: Rgb = Rgb(0x93, 0xC5, 0xFD);
    pub const BLUE_400: Rgb = Rgb(0x60, 0xA5, 0xFA);
    pub const BLUE_500: Rgb = Rgb(0x3B, 0x82, 0xF6);
    pub const BLUE_600: Rgb = Rgb(0x25, 0x63, 0xEB);
    pub const GREEN_500: Rgb = Rgb(0x22, 0xC5, 0x5E);
    pub const YELLOW_500: Rgb = Rgb(0xEA, 0xB3, 0x08);
    pub const ORANGE_500: Rgb = Rgb(0xF9, 0x73, 0x16);
    pub const RED_500: Rgb = Rgb(0xEF, 0x44, 0x44);

    /// Uppercase hex without a leading `#`, as OOXML expects.
    pub fn hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }

    /// CSS color with the given opacity.
    pub fn css(&self, alpha: f64) -> String {
        if alpha >= 1.0 {
            format!("#{}", self.hex().to_lowercase())
        } else {
            format!("rgba({}, {}, {}, {:.2})", self.0, self.1, self.2, alpha)
        }
    }
}

impl From<LayerColor> for Rgb {
    fn from(color: LayerColor) -> Self {
        match color {
            LayerColor::Blue => Rgb::BLUE_500,
            LayerColor::Green => Rgb::GREEN_500,
            LayerColor::Yellow => Rgb::YELLOW_500,
            LayerColor::Orange => Rgb::ORANGE_500,
            LayerColor::Red => Rgb::RED_500,
        }
    }
}

/// Position and size of an element in canvas units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Frame {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Whether the frame lies entirely within the canvas.
    pub fn within_canvas(&self) -> bool {
        const EPS: f64 = 1e-9;
        self.x >= -EPS
            && self.y >= -EPS
            && self.w >= 0.0
            && self.h >= 0.0
            && self.right() <= CANVAS_WIDTH + EPS
            && self.bottom() <= CANVAS_HEIGHT + EPS
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Font size in points relative to the 10 in canvas.
    pub size: f64,
    pub bold: bool,
    pub color: Rgb,
    pub align: Align,
}

impl TextStyle {
    fn new(size: f64, color: Rgb) -> Self {
        Self {
            size,
            bold: false,
            color,
            align: Align::Left,
        }
    }

    fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    fn centered(mut self) -> Self {
        self.align = Align::Center;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fill {
    pub color: Rgb,
    pub alpha: f64,
}

impl Fill {
    pub const fn solid(color: Rgb) -> Self {
        Self { color, alpha: 1.0 }
    }

    pub const fn translucent(color: Rgb, alpha: f64) -> Self {
        Self { color, alpha }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Filled rectangle with an optional outline color.
    Panel { fill: Fill, outline: Option<Rgb> },
    Text { text: String, style: TextStyle },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub frame: Frame,
    pub shape: Shape,
}

/// The rendering template a slide variant maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    Title,
    Content,
    Architecture,
    Diagram,
    Features,
    Conclusion,
    References,
}

impl Template {
    pub fn name(&self) -> &'static str {
        match self {
            Template::Title => "title",
            Template::Content => "content",
            Template::Architecture => "architecture",
            Template::Diagram => "diagram",
            Template::Features => "features",
            Template::Conclusion => "conclusion",
            Template::References => "references",
        }
    }

    pub fn for_kind(kind: &SlideKind) -> Self {
        match kind {
            SlideKind::Title { .. } => Template::Title,
            SlideKind::Content(_) => Template::Content,
            SlideKind::Architecture(_) => Template::Architecture,
            SlideKind::Diagram => Template::Diagram,
            SlideKind::Features(_) => Template::Features,
            SlideKind::Conclusion(_) => Template::Conclusion,
            SlideKind::References(_) => Template::References,
        }
    }
}

/// A slide laid out as positioned elements, drawn back to front.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideLayout {
    pub template: Template,
    pub background: String,
    pub elements: Vec<Element>,
}

impl SlideLayout {
    /// All text carried by the layout, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(|e| match &e.shape {
            Shape::Text { text, .. } => Some(text.as_str()),
            Shape::Panel { .. } => None,
        })
    }
}

struct Builder {
    elements: Vec<Element>,
}

impl Builder {
    fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    fn panel(&mut self, frame: Frame, fill: Fill) {
        self.elements.push(Element {
            frame,
            shape: Shape::Panel {
                fill,
                outline: None,
            },
        });
    }

    fn outlined_panel(&mut self, frame: Frame, fill: Fill, outline: Rgb) {
        self.elements.push(Element {
            frame,
            shape: Shape::Panel {
                fill,
                outline: Some(outline),
            },
        });
    }

    fn text(&mut self, frame: Frame, text: impl Into<String>, style: TextStyle) {
        self.elements.push(Element {
            frame,
            shape: Shape::Text {
                text: text.into(),
                style,
            },
        });
    }

    /// Filled box with a centered label.
    fn labelled_box(&mut self, frame: Frame, color: Rgb, label: &str, size: f64) {
        self.panel(frame, Fill::solid(color));
        self.text(
            frame,
            label,
            TextStyle::new(size, Rgb::WHITE).bold().centered(),
        );
    }

    /// The heading shared by every template except the title slide.
    fn heading(&mut self, title: &str) {
        self.text(
            Frame::new(MARGIN, 0.3, BODY_WIDTH, 0.65),
            title,
            TextStyle::new(32.0, Rgb::WHITE).bold().centered(),
        );
        self.panel(Frame::new(MARGIN, 1.0, BODY_WIDTH, 0.04), Fill::solid(Rgb::BLUE_500));
    }

    fn finish(self, template: Template, background: &str) -> SlideLayout {
        SlideLayout {
            template,
            background: background.to_string(),
            elements: self.elements,
        }
    }
}

/// Splits the body area into `count` equal rows separated by `gap`.
fn rows(count: usize, gap: f64) -> impl Iterator<Item = (f64, f64)> {
    let height = if count == 0 {
        0.0
    } else {
        (BODY_HEIGHT - gap * (count as f64 - 1.0)) / count as f64
    };
    (0..count).map(move |i| (BODY_TOP + i as f64 * (height + gap), height))
}

/// Lay out a slide using the template selected by its variant.
pub fn layout_slide(slide: &Slide) -> SlideLayout {
    let template = Template::for_kind(&slide.kind);
    let mut b = Builder::new();
    match &slide.kind {
        SlideKind::Title {
            subtitle,
            author,
            institution,
        } => title_slide(&mut b, slide.title, subtitle, author, institution),
        SlideKind::Content(sections) => content_slide(&mut b, slide.title, sections),
        SlideKind::Architecture(layers) => architecture_slide(&mut b, slide.title, layers),
        SlideKind::Diagram => diagram_slide(&mut b, slide.title),
        SlideKind::Features(features) => features_slide(&mut b, slide.title, features),
        SlideKind::Conclusion(points) => conclusion_slide(&mut b, slide.title, points),
        SlideKind::References(refs) => references_slide(&mut b, slide.title, refs),
    }
    b.finish(template, &slide.background)
}

fn title_slide(b: &mut Builder, title: &str, subtitle: &str, author: &str, institution: &str) {
    b.text(
        Frame::new(MARGIN, 1.2, BODY_WIDTH, 1.7),
        title,
        TextStyle::new(40.0, Rgb::WHITE).bold().centered(),
    );
    if !subtitle.is_empty() {
        b.text(
            Frame::new(MARGIN, 3.0, BODY_WIDTH, 0.5),
            subtitle,
            TextStyle::new(22.0, Rgb::BLUE_300).centered(),
        );
    }
    b.text(
        Frame::new(MARGIN, 3.75, BODY_WIDTH, 0.45),
        author,
        TextStyle::new(22.0, Rgb::WHITE).bold().centered(),
    );
    b.text(
        Frame::new(MARGIN, 4.2, BODY_WIDTH, 0.4),
        institution,
        TextStyle::new(18.0, Rgb::GRAY_300).centered(),
    );
}

fn content_slide(b: &mut Builder, title: &str, sections: &[Section]) {
    b.heading(title);
    for (section, (y, h)) in sections.iter().zip(rows(sections.len(), 0.15)) {
        b.panel(
            Frame::new(MARGIN, y, BODY_WIDTH, h),
            Fill::translucent(Rgb::BLACK, 0.5),
        );
        b.panel(Frame::new(MARGIN, y, 0.06, h), Fill::solid(Rgb::BLUE_500));
        b.text(
            Frame::new(0.7, y + 0.1, 8.6, 0.4),
            section.heading,
            TextStyle::new(20.0, Rgb::BLUE_300).bold(),
        );
        b.text(
            Frame::new(0.7, y + 0.5, 8.6, (h - 0.6).max(0.0)),
            section.text,
            TextStyle::new(15.0, Rgb::WHITE),
        );
    }
}

fn architecture_slide(b: &mut Builder, title: &str, layers: &[Layer]) {
    b.heading(title);
    for (layer, (y, h)) in layers.iter().zip(rows(layers.len(), 0.1)) {
        b.panel(Frame::new(MARGIN, y, BODY_WIDTH, h), Fill::solid(layer.color.into()));
        b.text(
            Frame::new(0.7, y + 0.06, 8.6, h * 0.45),
            layer.name,
            TextStyle::new(18.0, Rgb::WHITE).bold(),
        );
        b.text(
            Frame::new(0.7, y + h * 0.5, 8.6, h * 0.4),
            layer.description,
            TextStyle::new(13.0, Rgb::WHITE),
        );
    }
}

fn diagram_slide(b: &mut Builder, title: &str) {
    const INNER_X: f64 = 0.7;
    const INNER_W: f64 = 8.6;
    const GAP: f64 = 0.2;
    const BOX_H: f64 = 0.4;
    const BAND_H: f64 = 0.55;

    b.heading(title);
    b.panel(
        Frame::new(MARGIN, 1.2, BODY_WIDTH, 4.25),
        Fill::translucent(Rgb::WHITE, 0.95),
    );

    let connector = |b: &mut Builder, y: f64| {
        b.panel(
            Frame::new(CANVAS_WIDTH / 2.0 - 0.02, y, 0.04, 0.15),
            Fill::solid(Rgb::GRAY_400),
        );
    };
    let row = |b: &mut Builder, y: f64, color: Rgb, labels: &[&str], size: f64| {
        let n = labels.len() as f64;
        let w = (INNER_W - GAP * (n - 1.0)) / n;
        for (i, label) in labels.iter().enumerate() {
            let x = INNER_X + i as f64 * (w + GAP);
            b.labelled_box(Frame::new(x, y, w, BOX_H), color, label, size);
        }
    };
    let band = |b: &mut Builder, y: f64, color: Rgb, heading: &str, detail: &str| {
        b.panel(Frame::new(INNER_X, y, INNER_W, BAND_H), Fill::solid(color));
        b.text(
            Frame::new(INNER_X, y + 0.04, INNER_W, 0.26),
            heading,
            TextStyle::new(14.0, Rgb::WHITE).bold().centered(),
        );
        b.text(
            Frame::new(INNER_X, y + 0.3, INNER_W, 0.22),
            detail,
            TextStyle::new(10.0, Rgb::WHITE).centered(),
        );
    };

    b.labelled_box(
        Frame::new(3.25, 1.3, 3.5, BOX_H),
        Rgb::BLUE_600,
        "Healthcare Providers & Patients",
        15.0,
    );
    connector(b, 1.7);
    row(
        b,
        1.85,
        Rgb::BLUE_500,
        &["Web Portal", "Mobile App", "Admin Dashboard"],
        13.0,
    );
    connector(b, 2.25);
    row(
        b,
        2.4,
        Rgb::GREEN_500,
        &["Electronic Health Records", "Appointment Management"],
        13.0,
    );
    connector(b, 2.8);
    band(
        b,
        2.95,
        Rgb::YELLOW_500,
        "Integration & Interoperability Layer",
        "HL7 FHIR API | REST Services | Message Queue",
    );
    connector(b, 3.5);
    row(
        b,
        3.65,
        Rgb::ORANGE_500,
        &["Patient Database", "Clinical Data", "Analytics Store"],
        11.0,
    );
    connector(b, 4.05);
    band(
        b,
        4.2,
        Rgb::RED_500,
        "Infrastructure Layer",
        "Hybrid Cloud | Security | Monitoring | Backup",
    );
}

/// Left offsets of the two feature-card columns.
pub const FEATURE_COLUMNS: [f64; 2] = [MARGIN, 5.1];
const FEATURE_WIDTH: f64 = 4.4;

fn features_slide(b: &mut Builder, title: &str, features: &[Feature]) {
    b.heading(title);
    let row_count = (features.len() + 1) / 2;
    let row_frames: Vec<(f64, f64)> = rows(row_count, 0.15).collect();
    for (i, feature) in features.iter().enumerate() {
        let (y, h) = row_frames[i / 2];
        let x = FEATURE_COLUMNS[i % 2];
        b.outlined_panel(
            Frame::new(x, y, FEATURE_WIDTH, h),
            Fill::translucent(Rgb::BLACK, 0.5),
            Rgb::BLUE_500,
        );
        b.text(
            Frame::new(x + 0.15, y + 0.1, 0.6, 0.5),
            feature.icon,
            TextStyle::new(24.0, Rgb::WHITE),
        );
        b.text(
            Frame::new(x + 0.8, y + 0.15, FEATURE_WIDTH - 0.95, 0.4),
            feature.title,
            TextStyle::new(17.0, Rgb::BLUE_300).bold(),
        );
        b.text(
            Frame::new(x + 0.15, y + 0.62, FEATURE_WIDTH - 0.3, (h - 0.7).max(0.0)),
            feature.description,
            TextStyle::new(12.0, Rgb::WHITE),
        );
    }
}

fn conclusion_slide(b: &mut Builder, title: &str, points: &[&str]) {
    b.heading(title);
    b.panel(
        Frame::new(MARGIN, BODY_TOP, BODY_WIDTH, BODY_HEIGHT),
        Fill::translucent(Rgb::BLACK, 0.5),
    );
    let step = list_step(points.len(), 0.75);
    for (i, point) in points.iter().enumerate() {
        let y = BODY_TOP + 0.2 + i as f64 * step;
        b.text(
            Frame::new(0.75, y, 0.4, step.min(0.5)),
            "✓",
            TextStyle::new(22.0, Rgb::BLUE_400).bold(),
        );
        b.text(
            Frame::new(1.2, y, 7.9, step.min(0.6)),
            *point,
            TextStyle::new(17.0, Rgb::WHITE),
        );
    }
}

fn references_slide(b: &mut Builder, title: &str, refs: &[&str]) {
    b.heading(title);
    b.panel(
        Frame::new(MARGIN, BODY_TOP, BODY_WIDTH, BODY_HEIGHT),
        Fill::translucent(Rgb::BLACK, 0.5),
    );
    let step = list_step(refs.len(), 0.78);
    for (i, reference) in refs.iter().enumerate() {
        let y = BODY_TOP + 0.15 + i as f64 * step;
        b.text(
            Frame::new(0.7, y, 0.5, 0.3),
            format!("[{}]", i + 1),
            TextStyle::new(12.0, Rgb::BLUE_400).bold(),
        );
        b.text(
            Frame::new(1.2, y, 7.9, step * 0.92),
            *reference,
            TextStyle::new(11.0, Rgb::WHITE),
        );
    }
}

/// Vertical spacing of list entries inside the body panel.
fn list_step(count: usize, preferred: f64) -> f64 {
    if count == 0 {
        return preferred;
    }
    preferred.min((BODY_HEIGHT - 0.3) / count as f64)
}
