// ABOUTME: HTML generation module for the his-poster application
// ABOUTME: Renders the poster and the slide deck as standalone HTML pages

use crate::content::{Deck, Poster, PosterSection, Slide};
use crate::errors::{DeckError, Result};
use crate::layout::{layout_slide, Align, Element, Shape, SlideLayout, CANVAS_WIDTH};
use crate::navigation::Navigator;
use crate::server::routes;
use crate::utils::{ensure_parent_directory_exists, escape_markup};
use log::info;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use url::Url;

const QR_SERVICE: &str = "https://api.qrserver.com/v1/create-qr-code/";

/// Element id of the container whose pixels are captured on export.
pub const CAPTURE_REGION_ID: &str = "capture-region";
/// Element id of the control hidden while an export runs.
pub const EXPORT_CONTROL_ID: &str = "export-control";

/// Slide stage size in CSS pixels.
pub const STAGE_WIDTH_PX: u32 = 1280;
pub const STAGE_HEIGHT_PX: u32 = 720;
/// Poster container width in CSS pixels (A2 portrait aspect).
pub const POSTER_WIDTH_PX: u32 = 1200;
pub const POSTER_HEIGHT_PX: u32 = 1697;

const PX_PER_UNIT: f64 = STAGE_WIDTH_PX as f64 / CANVAS_WIDTH;
// Points are relative to a 720pt-wide canvas.
const PX_PER_PT: f64 = STAGE_WIDTH_PX as f64 / 720.0;

/// Hooks used by the capture side: slide switching, readiness and control visibility.
const PAGE_SCRIPT: &str = r#"<script>
(function () {
    function region() { return document.getElementById('capture-region'); }
    window.showSlide = function (index) {
        var slides = document.querySelectorAll('#capture-region > section.slide');
        if (index < 0 || index >= slides.length) { return false; }
        for (var i = 0; i < slides.length; i++) {
            slides[i].style.display = i === index ? 'block' : 'none';
        }
        return true;
    };
    window.captureRegionPresent = function () { return !!region(); };
    window.captureReady = function () {
        var root = region();
        if (!root) { return false; }
        var images = root.querySelectorAll('img');
        for (var i = 0; i < images.length; i++) {
            if (images[i].offsetParent === null) { continue; }
            if (!images[i].complete) { return false; }
        }
        return !document.fonts || document.fonts.status === 'loaded';
    };
    window.setExportControlVisible = function (visible) {
        var control = document.getElementById('export-control');
        if (control) { control.style.display = visible ? '' : 'none'; }
        return !!control;
    };
    window.setCaptureBackground = function (color) {
        var root = region();
        if (root) { root.style.backgroundColor = color; }
        return !!root;
    };
})();
</script>"#;

const DECK_STYLE: &str = r#"<style>
* { box-sizing: border-box; margin: 0; padding: 0; }
body { background: #111827; font-family: "Segoe UI", Helvetica, Arial, sans-serif; color: #fff; }
#capture-region { position: relative; width: 1280px; height: 720px; margin: 0 auto; overflow: hidden; background: #1f2937; }
section.slide { position: absolute; inset: 0; }
section.slide .backdrop { position: absolute; inset: 0; width: 100%; height: 100%; object-fit: cover; filter: brightness(0.3); }
.el { position: absolute; overflow: hidden; }
.el.text { line-height: 1.3; white-space: normal; }
.el.panel { border-radius: 10px; }
nav.controls { display: flex; align-items: center; justify-content: space-between; max-width: 1280px; margin: 0 auto; padding: 18px 24px; background: #1f2937; border-top: 2px solid #374151; }
nav .group { display: flex; align-items: center; gap: 12px; }
.btn { display: inline-flex; align-items: center; padding: 10px 20px; border-radius: 8px; background: #374151; color: #fff; text-decoration: none; }
.btn.export { background: #16a34a; }
.btn.step { background: #2563eb; }
.btn.disabled { background: #374151; color: #6b7280; cursor: not-allowed; }
.counter { font-size: 18px; font-weight: 600; }
.dots { display: flex; gap: 8px; }
.dot { width: 12px; height: 12px; border-radius: 50%; background: #4b5563; }
.dot.active { background: #3b82f6; }
</style>"#;

const POSTER_STYLE: &str = r#"<style>
* { box-sizing: border-box; margin: 0; padding: 0; }
body { background: linear-gradient(135deg, #0f172a, #1e3a8a, #1e293b); padding: 32px; font-family: "Segoe UI", Helvetica, Arial, sans-serif; color: #1f2937; }
#capture-region { position: relative; width: 1200px; min-height: 1697px; margin: 0 auto; background: #fff; border-radius: 8px; overflow: hidden; }
.toolbar { position: absolute; top: 24px; right: 24px; display: flex; gap: 12px; z-index: 5; }
.toolbar a { padding: 12px 24px; border-radius: 12px; color: #fff; font-weight: 600; text-decoration: none; }
.toolbar .view { background: #16a34a; }
.toolbar .export { background: #2563eb; }
header { background: linear-gradient(90deg, #2563eb, #1e40af); color: #fff; padding: 48px; }
header h1 { font-size: 46px; line-height: 1.2; margin: 24px 0 32px; }
header .meta { display: flex; justify-content: space-between; }
header .card { background: rgba(255, 255, 255, 0.1); padding: 16px; border-radius: 8px; }
header .right { text-align: right; }
main { padding: 48px; }
.grid { display: grid; gap: 32px; margin-bottom: 40px; }
.grid.three { grid-template-columns: 2fr 1fr; }
.grid.two { grid-template-columns: 1fr 1fr; }
.stack { display: flex; flex-direction: column; gap: 32px; }
section.block { padding: 32px; border-radius: 12px; border: 2px solid #bfdbfe; background: #eff6ff; }
section.block.problem { background: #fff7ed; border-color: #fca5a5; }
section.block.aim { background: #ecfdf5; border-color: #86efac; }
section.block.neutral { background: #f1f5f9; border-color: #cbd5e1; }
section.block.conclusion { background: linear-gradient(90deg, #2563eb, #1e40af); color: #fff; border-color: #3b82f6; margin-bottom: 32px; }
section.block h2 { font-size: 30px; margin-bottom: 16px; }
section.block p { font-size: 18px; line-height: 1.6; }
ol.objectives, ul.bullets { list-style: none; display: flex; flex-direction: column; gap: 10px; font-size: 16px; }
.marker { color: #2563eb; font-weight: 700; margin-right: 8px; }
.feature { background: #fff; padding: 12px; border-radius: 8px; margin-top: 12px; font-weight: 500; }
.references { display: flex; justify-content: space-between; gap: 32px; }
.references p { font-size: 14px; margin-bottom: 12px; }
.qr { flex-shrink: 0; background: #fff; padding: 24px; border: 4px solid #2563eb; border-radius: 12px; text-align: center; font-size: 12px; }
.qr img { width: 192px; height: 192px; margin: 12px 0; }
footer { background: linear-gradient(90deg, #374151, #111827); color: #fff; padding: 16px; text-align: center; font-size: 14px; }
</style>"#;

fn document_head(title: &str, style: &str) -> String {
    let mut html = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"UTF-8\">\n");
    html.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    html.push_str(&format!("<title>{}</title>\n", escape_markup(title)));
    html.push_str(style);
    html.push_str("\n</head>\n<body>\n");
    html
}

fn px(units: f64) -> String {
    format!("{:.1}px", units * PX_PER_UNIT)
}

fn render_element(element: &Element) -> String {
    let f = &element.frame;
    let geometry = format!(
        "left:{};top:{};width:{};height:{}",
        px(f.x),
        px(f.y),
        px(f.w),
        px(f.h)
    );
    match &element.shape {
        Shape::Panel { fill, outline } => {
            let border = outline
                .map(|c| format!(";border:2px solid {}", c.css(1.0)))
                .unwrap_or_default();
            format!(
                r#"<div class="el panel" style="{};background:{}{}"></div>"#,
                geometry,
                fill.color.css(fill.alpha),
                border
            )
        }
        Shape::Text { text, style } => {
            let align = match style.align {
                Align::Left => "left",
                Align::Center => "center",
            };
            format!(
                r#"<div class="el text" style="{};font-size:{:.1}px;font-weight:{};color:{};text-align:{}">{}</div>"#,
                geometry,
                style.size * PX_PER_PT,
                if style.bold { 700 } else { 400 },
                style.color.css(1.0),
                align,
                escape_markup(text)
            )
        }
    }
}

/// Render one slide layout as a `<section>` of absolutely positioned elements.
pub fn render_layout(index: usize, layout: &SlideLayout, visible: bool) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        r#"<section class="slide" data-index="{}" data-template="{}" style="display:{}">"#,
        index,
        layout.template.name(),
        if visible { "block" } else { "none" }
    );
    let _ = write!(
        html,
        r#"<img class="backdrop" src="{}" alt="">"#,
        escape_markup(&layout.background)
    );
    for element in &layout.elements {
        html.push_str(&render_element(element));
    }
    html.push_str("</section>\n");
    html
}

/// Render a single slide.
pub fn render_slide(index: usize, slide: &Slide, visible: bool) -> String {
    render_layout(index, &layout_slide(slide), visible)
}

fn deck_controls(deck: &Deck, navigator: &Navigator) -> String {
    let mut html = String::from("<nav class=\"controls\">\n<div class=\"group\">\n");
    let _ = writeln!(html, r#"<a class="btn" href="{}">Back to Poster</a>"#, routes::POSTER);
    let _ = writeln!(
        html,
        r#"<a class="btn export" id="{}" href="{}">Download PDF</a>"#,
        EXPORT_CONTROL_ID,
        routes::DECK_PDF
    );
    let _ = writeln!(
        html,
        r#"<a class="btn export" href="{}">Download PowerPoint</a>"#,
        routes::DECK_PPTX
    );
    html.push_str("</div>\n<div class=\"group\">\n");

    let step = |enabled: bool, href: &str, label: &str| {
        if enabled {
            format!(r#"<a class="btn step" href="{}">{}</a>"#, href, label)
        } else {
            format!(r#"<span class="btn disabled">{}</span>"#, label)
        }
    };
    html.push_str(&step(!navigator.is_first(), routes::PREVIOUS, "&#8249;"));
    let _ = write!(
        html,
        r#"<span class="counter">{} / {}</span>"#,
        navigator.current() + 1,
        deck.len()
    );
    html.push_str(&step(!navigator.is_last(), routes::NEXT, "&#8250;"));
    html.push_str("\n</div>\n<div class=\"dots\">\n");
    for index in 0..deck.len() {
        let _ = writeln!(
            html,
            r#"<a class="dot{}" href="{}/{}" title="Slide {}"></a>"#,
            if index == navigator.current() { " active" } else { "" },
            routes::DECK,
            index,
            index + 1
        );
    }
    html.push_str("</div>\n</nav>\n");
    html
}

/// Generate the slide deck page with the navigator's slide visible.
pub fn generate_deck_html(deck: &Deck, navigator: &Navigator) -> Result<String> {
    if navigator.len() != deck.len() {
        return Err(DeckError::ValidationError(format!(
            "Navigator covers {} slides but the deck has {}",
            navigator.len(),
            deck.len()
        )));
    }
    info!(
        "Generating deck HTML at slide {}/{}",
        navigator.current() + 1,
        deck.len()
    );

    let title = deck.get(0).map(|s| s.title).unwrap_or("Presentation");
    let mut html = document_head(title, DECK_STYLE);
    let _ = writeln!(html, r#"<main id="{}">"#, CAPTURE_REGION_ID);
    for (index, slide) in deck.slides().iter().enumerate() {
        html.push_str(&render_slide(index, slide, index == navigator.current()));
    }
    html.push_str("</main>\n");
    html.push_str(&deck_controls(deck, navigator));
    html.push_str(PAGE_SCRIPT);
    html.push_str("\n</body>\n</html>");
    Ok(html)
}

fn poster_bullets(section: &PosterSection, marker: &str) -> String {
    let mut html = String::from("<ul class=\"bullets\">\n");
    for (label, text) in &section.bullets {
        let _ = writeln!(
            html,
            r#"<li><span class="marker">{}</span><strong>{}:</strong> {}</li>"#,
            marker,
            escape_markup(label),
            escape_markup(text)
        );
    }
    html.push_str("</ul>\n");
    html
}

fn block(class: &str, heading: &str, body: &str) -> String {
    format!(
        "<section class=\"block {}\">\n<h2>{}</h2>\n<p>{}</p>\n</section>\n",
        class,
        escape_markup(heading),
        escape_markup(body)
    )
}

/// Generate the poster page.
pub fn generate_poster_html(poster: &Poster) -> Result<String> {
    info!("Generating poster HTML");
    let mut html = document_head(poster.title, POSTER_STYLE);
    let _ = writeln!(html, r#"<div id="{}">"#, CAPTURE_REGION_ID);

    let _ = writeln!(
        html,
        r#"<div class="toolbar" id="{}"><a class="view" href="{}">View Presentation</a><a class="export" href="{}">Download A2 PDF</a></div>"#,
        EXPORT_CONTROL_ID,
        routes::DECK,
        routes::POSTER_PDF
    );

    let _ = writeln!(
        html,
        "<header>\n<h1>{}</h1>\n<div class=\"meta\">\n<div class=\"card\"><p><strong>{}</strong></p><p>Student No. {}</p></div>\n<div class=\"card right\"><p><strong>{}</strong></p><p>{}</p></div>\n</div>\n</header>",
        escape_markup(poster.title),
        escape_markup(poster.author),
        escape_markup(poster.student_number),
        escape_markup(poster.institution),
        escape_markup(poster.programme)
    );

    html.push_str("<main>\n<div class=\"grid three\">\n<div class=\"stack\">\n");
    html.push_str(&block("", "Introduction", poster.introduction));
    html.push_str(&block("problem", "Research Problem", poster.problem));
    html.push_str(&block("aim", "Aim", poster.aim));
    html.push_str("</div>\n<div class=\"stack\">\n");

    html.push_str("<section class=\"block\">\n<h2>Objectives</h2>\n<ol class=\"objectives\">\n");
    for (i, objective) in poster.objectives.iter().enumerate() {
        let _ = writeln!(
            html,
            r#"<li><span class="marker">{}.</span>{}</li>"#,
            i + 1,
            escape_markup(objective)
        );
    }
    html.push_str("</ol>\n</section>\n");

    html.push_str("<section class=\"block neutral\">\n<h2>Key Features</h2>\n");
    for (icon, label) in &poster.key_features {
        let _ = writeln!(
            html,
            r#"<div class="feature">{} {}</div>"#,
            icon,
            escape_markup(label)
        );
    }
    html.push_str("</section>\n</div>\n</div>\n");

    html.push_str("<div class=\"grid two\">\n");
    for (section, marker, class) in [
        (&poster.methodology, "&#8226;", "neutral"),
        (&poster.findings, "&#10003;", "aim"),
    ] {
        let _ = writeln!(
            html,
            "<section class=\"block {}\">\n<h2>{}</h2>\n<p>{}</p>",
            class,
            escape_markup(section.heading),
            escape_markup(section.body)
        );
        html.push_str(&poster_bullets(section, marker));
        html.push_str("</section>\n");
    }
    html.push_str("</div>\n");

    html.push_str(&block("conclusion", "Conclusion", poster.conclusion));

    html.push_str("<section class=\"block neutral\">\n<div class=\"references\">\n<div>\n<h2>References</h2>\n");
    for (i, reference) in poster.references.iter().enumerate() {
        let _ = writeln!(
            html,
            r#"<p><span class="marker">{}.</span>{}</p>"#,
            i + 1,
            escape_markup(reference)
        );
    }
    let qr_src = Url::parse_with_params(
        QR_SERVICE,
        &[("size", "200x200"), ("data", poster.report_url)],
    )
    .map_err(|e| DeckError::InvalidResourcePath(format!("QR code URL: {}", e)))?;
    let _ = writeln!(
        html,
        "</div>\n<div class=\"qr\"><p><strong>Scan for Full Study Report</strong></p><img src=\"{}\" alt=\"QR Code to Study Report\"><p>Access Complete Research</p></div>",
        escape_markup(qr_src.as_str())
    );
    html.push_str("</div>\n</section>\n</main>\n");

    let _ = writeln!(html, "<footer>{}</footer>", escape_markup(poster.footer));
    html.push_str("</div>\n");
    html.push_str(PAGE_SCRIPT);
    html.push_str("\n</body>\n</html>");
    Ok(html)
}

/// Utility function to write HTML content to a file
pub fn write_html_to_file(html_content: &str, output_path: &Path) -> Result<()> {
    info!("Writing HTML to file: {:?}", output_path);
    ensure_parent_directory_exists(output_path)?;
    fs::write(output_path, html_content).map_err(DeckError::FileError)?;
    Ok(())
}
