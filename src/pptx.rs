// ABOUTME: PPTX generation module for the his-poster application
// ABOUTME: Builds a native PowerPoint deck from the shared slide layouts

use crate::content::{Deck, AUTHOR};
use crate::errors::Result;
use crate::layout::{
    layout_slide, Align, Element, Fill, Frame, Rgb, Shape, SlideLayout, TextStyle, CANVAS_HEIGHT,
    CANVAS_WIDTH,
};
use crate::resources::{ImageResource, LoadedImage};
use crate::utils::{escape_markup, write_atomically};
use log::{debug, info, warn};
use std::fmt::Write as _;
use std::io::{Cursor, Write};
use std::path::Path;
use zip::{write::FileOptions, ZipWriter};

pub const PPTX_FILE: &str = "Healthcare-Information-Systems-Presentation.pptx";

/// English Metric Units per canvas inch.
const EMU_PER_INCH: f64 = 914_400.0;
const SLIDE_CX: i64 = 9_144_000;
const SLIDE_CY: i64 = 5_143_500;

/// Opacity of the black layer drawn over an embedded background photograph.
const OVERLAY_ALPHA: f64 = 0.7;

const NS_DECL: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Configuration for PPTX generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PptxConfig {
    pub title: String,
    pub author: String,
    pub subject: String,
    /// Fetch each slide's background photograph and embed it behind a dark overlay.
    pub embed_backgrounds: bool,
}

impl Default for PptxConfig {
    fn default() -> Self {
        Self {
            title: "Healthcare Information Systems".to_string(),
            author: AUTHOR.to_string(),
            subject: "Health Information Systems Research".to_string(),
            embed_backgrounds: false,
        }
    }
}

fn emu(inches: f64) -> i64 {
    (inches * EMU_PER_INCH).round() as i64
}

fn alpha_val(alpha: f64) -> i64 {
    (alpha.clamp(0.0, 1.0) * 100_000.0).round() as i64
}

fn color_xml(color: Rgb, alpha: f64) -> String {
    if alpha >= 1.0 {
        format!(r#"<a:srgbClr val="{}"/>"#, color.hex())
    } else {
        format!(
            r#"<a:srgbClr val="{}"><a:alpha val="{}"/></a:srgbClr>"#,
            color.hex(),
            alpha_val(alpha)
        )
    }
}

fn xfrm_xml(x: f64, y: f64, w: f64, h: f64) -> String {
    format!(
        r#"<a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
        emu(x),
        emu(y),
        emu(w),
        emu(h)
    )
}

fn panel_xml(id: usize, element: &Element, fill: &Fill, outline: Option<Rgb>) -> String {
    let f = &element.frame;
    let mut xml = String::with_capacity(512);
    xml.push_str("<p:sp><p:nvSpPr>");
    let _ = write!(xml, r#"<p:cNvPr id="{}" name="Rectangle {}"/>"#, id, id);
    xml.push_str("<p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr>");
    xml.push_str(&xfrm_xml(f.x, f.y, f.w, f.h));
    xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
    let _ = write!(xml, "<a:solidFill>{}</a:solidFill>", color_xml(fill.color, fill.alpha));
    match outline {
        Some(color) => {
            let _ = write!(
                xml,
                r#"<a:ln w="12700"><a:solidFill>{}</a:solidFill></a:ln>"#,
                color_xml(color, 1.0)
            );
        }
        None => xml.push_str("<a:ln><a:noFill/></a:ln>"),
    }
    xml.push_str("</p:spPr></p:sp>");
    xml
}

fn text_xml(id: usize, element: &Element, text: &str, style: &TextStyle) -> String {
    let f = &element.frame;
    let (algn, anchor) = match style.align {
        Align::Left => ("l", "t"),
        Align::Center => ("ctr", "ctr"),
    };

    let mut xml = String::with_capacity(512);
    xml.push_str("<p:sp><p:nvSpPr>");
    let _ = write!(xml, r#"<p:cNvPr id="{}" name="Text Box {}"/>"#, id, id);
    xml.push_str(r#"<p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr>"#);
    xml.push_str(&xfrm_xml(f.x, f.y, f.w, f.h));
    xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr>"#);
    let _ = write!(
        xml,
        r#"<p:txBody><a:bodyPr wrap="square" lIns="0" tIns="0" rIns="0" bIns="0" rtlCol="0" anchor="{}"><a:normAutofit/></a:bodyPr><a:lstStyle/>"#,
        anchor
    );
    for line in text.split('\n') {
        let _ = write!(xml, r#"<a:p><a:pPr algn="{}"/><a:r>"#, algn);
        let _ = write!(
            xml,
            r#"<a:rPr lang="en-US" sz="{}" b="{}" dirty="0"><a:solidFill>{}</a:solidFill></a:rPr>"#,
            (style.size * 100.0).round() as i64,
            if style.bold { 1 } else { 0 },
            color_xml(style.color, 1.0)
        );
        let _ = write!(xml, "<a:t>{}</a:t></a:r></a:p>", escape_markup(line));
    }
    xml.push_str("</p:txBody></p:sp>");
    xml
}

fn shape_xml(id: usize, element: &Element) -> String {
    match &element.shape {
        Shape::Panel { fill, outline } => panel_xml(id, element, fill, *outline),
        Shape::Text { text, style } => text_xml(id, element, text, style),
    }
}

fn background_xml(has_image: bool) -> String {
    if has_image {
        r#"<p:bg><p:bgPr><a:blipFill dpi="0" rotWithShape="1"><a:blip r:embed="rId2"/><a:srcRect/><a:stretch><a:fillRect/></a:stretch></a:blipFill><a:effectLst/></p:bgPr></p:bg>"#.to_string()
    } else {
        format!(
            r#"<p:bg><p:bgPr><a:solidFill>{}</a:solidFill><a:effectLst/></p:bgPr></p:bg>"#,
            color_xml(Rgb::SLATE, 1.0)
        )
    }
}

/// Serialize one slide layout as a `p:sld` part.
pub fn slide_xml(layout: &SlideLayout, has_background_image: bool) -> String {
    let mut xml = String::with_capacity(4096);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    let _ = write!(xml, "<p:sld {}>", NS_DECL);
    let _ = write!(
        xml,
        r#"<p:cSld name="{}">"#,
        escape_markup(layout.template.name())
    );
    xml.push_str(&background_xml(has_background_image));
    xml.push_str(
        r#"<p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#,
    );

    let mut next_id = 2;
    if has_background_image {
        let overlay = Element {
            frame: Frame::new(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT),
            shape: Shape::Panel {
                fill: Fill::translucent(Rgb::BLACK, OVERLAY_ALPHA),
                outline: None,
            },
        };
        xml.push_str(&shape_xml(next_id, &overlay));
        next_id += 1;
    }

    for element in &layout.elements {
        xml.push_str(&shape_xml(next_id, element));
        next_id += 1;
    }

    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>");
    xml
}

fn content_types_xml(slide_count: usize) -> String {
    let slides = (1..=slide_count)
        .map(|n| {
            format!(
                r#"<Override PartName="/ppt/slides/slide{}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#,
                n
            )
        })
        .collect::<Vec<String>>()
        .join("\n    ");
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="xml" ContentType="application/xml"/>
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="jpeg" ContentType="image/jpeg"/>
    <Default Extension="png" ContentType="image/png"/>
    <Default Extension="gif" ContentType="image/gif"/>
    <Default Extension="webp" ContentType="image/webp"/>
    <Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>
    <Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/>
    <Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/>
    <Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>
    <Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
    <Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>
    {slides}
</Types>"#,
        slides = slides
    )
}

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/>
    <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
    <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>
</Relationships>"#;

fn app_xml(slide_count: usize) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">
    <Application>his-poster</Application>
    <PresentationFormat>On-screen Show (16:9)</PresentationFormat>
    <Slides>{}</Slides>
</Properties>"#,
        slide_count
    )
}

fn core_xml(config: &PptxConfig) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
    <dc:title>{}</dc:title>
    <dc:subject>{}</dc:subject>
    <dc:creator>{}</dc:creator>
    <dcterms:created xsi:type="dcterms:W3CDTF">{}</dcterms:created>
    <cp:revision>1</cp:revision>
</cp:coreProperties>"#,
        escape_markup(&config.title),
        escape_markup(&config.subject),
        escape_markup(&config.author),
        chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ")
    )
}

fn presentation_rels_xml(slide_count: usize) -> String {
    let mut rels = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
"#,
    );
    let _ = writeln!(
        rels,
        r#"    <Relationship Id="rId1" Type="{}/slideMaster" Target="slideMasters/slideMaster1.xml"/>"#,
        REL_NS
    );
    for n in 1..=slide_count {
        let _ = writeln!(
            rels,
            r#"    <Relationship Id="rId{}" Type="{}/slide" Target="slides/slide{}.xml"/>"#,
            n + 1,
            REL_NS,
            n
        );
    }
    let _ = writeln!(
        rels,
        r#"    <Relationship Id="rId{}" Type="{}/theme" Target="theme/theme1.xml"/>"#,
        slide_count + 2,
        REL_NS
    );
    rels.push_str("</Relationships>");
    rels
}

fn presentation_xml(slide_count: usize) -> String {
    let slide_ids = (0..slide_count)
        .map(|i| format!(r#"        <p:sldId id="{}" r:id="rId{}"/>"#, 256 + i, i + 2))
        .collect::<Vec<String>>()
        .join("\n");
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation {ns} saveSubsetFonts="1">
    <p:sldMasterIdLst>
        <p:sldMasterId id="2147483648" r:id="rId1"/>
    </p:sldMasterIdLst>
    <p:sldIdLst>
{slide_ids}
    </p:sldIdLst>
    <p:sldSz cx="{cx}" cy="{cy}"/>
    <p:notesSz cx="6858000" cy="9144000"/>
</p:presentation>"#,
        ns = NS_DECL,
        slide_ids = slide_ids,
        cx = SLIDE_CX,
        cy = SLIDE_CY
    )
}

const EMPTY_SP_TREE: &str = r#"<p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr></p:spTree>"#;

fn slide_master_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldMaster {ns}><p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg>{tree}</p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst><p:txStyles><p:titleStyle/><p:bodyStyle/><p:otherStyle/></p:txStyles></p:sldMaster>"#,
        ns = NS_DECL,
        tree = EMPTY_SP_TREE
    )
}

fn slide_master_rels_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="{ns}/slideLayout" Target="../slideLayouts/slideLayout1.xml"/>
    <Relationship Id="rId2" Type="{ns}/theme" Target="../theme/theme1.xml"/>
</Relationships>"#,
        ns = REL_NS
    )
}

fn slide_layout_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldLayout {ns} type="blank" preserve="1"><p:cSld name="Blank">{tree}</p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#,
        ns = NS_DECL,
        tree = EMPTY_SP_TREE
    )
}

fn slide_layout_rels_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="{}/slideMaster" Target="../slideMasters/slideMaster1.xml"/>
</Relationships>"#,
        REL_NS
    )
}

fn slide_rels_xml(background: Option<&str>) -> String {
    let mut rels = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
"#,
    );
    let _ = writeln!(
        rels,
        r#"    <Relationship Id="rId1" Type="{}/slideLayout" Target="../slideLayouts/slideLayout1.xml"/>"#,
        REL_NS
    );
    if let Some(media) = background {
        let _ = writeln!(
            rels,
            r#"    <Relationship Id="rId2" Type="{}/image" Target="../media/{}"/>"#,
            REL_NS, media
        );
    }
    rels.push_str("</Relationships>");
    rels
}

fn theme_xml() -> String {
    let fill = r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#;
    let line = r#"<a:ln w="9525"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#;
    let effect = "<a:effectStyle><a:effectLst/></a:effectStyle>";
    let font = |typeface: &str| {
        format!(
            r#"<a:latin typeface="{}"/><a:ea typeface=""/><a:cs typeface=""/>"#,
            typeface
        )
    };
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="HIS"><a:themeElements><a:clrScheme name="HIS"><a:dk1><a:srgbClr val="000000"/></a:dk1><a:lt1><a:srgbClr val="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="{slate}"/></a:dk2><a:lt2><a:srgbClr val="{gray}"/></a:lt2><a:accent1><a:srgbClr val="{blue}"/></a:accent1><a:accent2><a:srgbClr val="{green}"/></a:accent2><a:accent3><a:srgbClr val="{yellow}"/></a:accent3><a:accent4><a:srgbClr val="{orange}"/></a:accent4><a:accent5><a:srgbClr val="{red}"/></a:accent5><a:accent6><a:srgbClr val="{blue_dark}"/></a:accent6><a:hlink><a:srgbClr val="{blue_light}"/></a:hlink><a:folHlink><a:srgbClr val="{gray_dark}"/></a:folHlink></a:clrScheme><a:fontScheme name="HIS"><a:majorFont>{major}</a:majorFont><a:minorFont>{minor}</a:minorFont></a:fontScheme><a:fmtScheme name="HIS"><a:fillStyleLst>{fill}{fill}{fill}</a:fillStyleLst><a:lnStyleLst>{line}{line}{line}</a:lnStyleLst><a:effectStyleLst>{effect}{effect}{effect}</a:effectStyleLst><a:bgFillStyleLst>{fill}{fill}{fill}</a:bgFillStyleLst></a:fmtScheme></a:themeElements><a:objectDefaults/><a:extraClrSchemeLst/></a:theme>"#,
        slate = Rgb::SLATE.hex(),
        gray = Rgb::GRAY_300.hex(),
        blue = Rgb::BLUE_500.hex(),
        green = Rgb::GREEN_500.hex(),
        yellow = Rgb::YELLOW_500.hex(),
        orange = Rgb::ORANGE_500.hex(),
        red = Rgb::RED_500.hex(),
        blue_dark = Rgb::BLUE_600.hex(),
        blue_light = Rgb::BLUE_400.hex(),
        gray_dark = Rgb::GRAY_400.hex(),
        major = font("Calibri Light"),
        minor = font("Calibri"),
        fill = fill,
        line = line,
        effect = effect
    )
}

fn add_part<W: Write + std::io::Seek>(
    zip: &mut ZipWriter<W>,
    name: &str,
    data: &[u8],
) -> Result<()> {
    debug!("Adding PPTX part: {}", name);
    zip.start_file(name, FileOptions::default())?;
    zip.write_all(data)?;
    Ok(())
}

fn load_background(location: &str) -> Option<LoadedImage> {
    match ImageResource::new(location).load() {
        Ok(image) => Some(image),
        Err(e) => {
            warn!(
                "Failed to load background {}: {}. Using solid background instead.",
                location, e
            );
            None
        }
    }
}

/// Build the complete PPTX package in memory.
pub fn build_pptx(deck: &Deck, config: &PptxConfig) -> Result<Vec<u8>> {
    let slide_count = deck.len();
    info!("Building PPTX with {} slides", slide_count);

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    add_part(&mut zip, "[Content_Types].xml", content_types_xml(slide_count).as_bytes())?;
    add_part(&mut zip, "_rels/.rels", PACKAGE_RELS.as_bytes())?;
    add_part(&mut zip, "docProps/app.xml", app_xml(slide_count).as_bytes())?;
    add_part(&mut zip, "docProps/core.xml", core_xml(config).as_bytes())?;
    add_part(
        &mut zip,
        "ppt/_rels/presentation.xml.rels",
        presentation_rels_xml(slide_count).as_bytes(),
    )?;
    add_part(&mut zip, "ppt/presentation.xml", presentation_xml(slide_count).as_bytes())?;
    add_part(&mut zip, "ppt/slideMasters/slideMaster1.xml", slide_master_xml().as_bytes())?;
    add_part(
        &mut zip,
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        slide_master_rels_xml().as_bytes(),
    )?;
    add_part(&mut zip, "ppt/slideLayouts/slideLayout1.xml", slide_layout_xml().as_bytes())?;
    add_part(
        &mut zip,
        "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
        slide_layout_rels_xml().as_bytes(),
    )?;
    add_part(&mut zip, "ppt/theme/theme1.xml", theme_xml().as_bytes())?;

    for (i, slide) in deck.slides().iter().enumerate() {
        let slide_num = i + 1;
        let layout = layout_slide(slide);
        info!(
            "Writing slide {}/{} ({})",
            slide_num,
            slide_count,
            layout.template.name()
        );

        let background = if config.embed_backgrounds {
            load_background(&layout.background)
        } else {
            None
        };

        let media_name = match &background {
            Some(image) => {
                let name = format!("image{}.{}", slide_num, image.extension());
                add_part(&mut zip, &format!("ppt/media/{}", name), &image.data)?;
                Some(name)
            }
            None => None,
        };

        add_part(
            &mut zip,
            &format!("ppt/slides/_rels/slide{}.xml.rels", slide_num),
            slide_rels_xml(media_name.as_deref()).as_bytes(),
        )?;
        add_part(
            &mut zip,
            &format!("ppt/slides/slide{}.xml", slide_num),
            slide_xml(&layout, media_name.is_some()).as_bytes(),
        )?;
    }

    let bytes = zip.finish()?.into_inner();
    info!("PPTX package built ({} bytes)", bytes.len());
    Ok(bytes)
}

/// Build the deck and write it to `output_file`.
pub fn generate_pptx(deck: &Deck, output_file: &Path, config: &PptxConfig) -> Result<()> {
    let bytes = build_pptx(deck, config)?;
    write_atomically(output_file, &bytes)?;
    info!("PPTX file created at {:?}", output_file);
    Ok(())
}
