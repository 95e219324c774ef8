use his_poster::content::{Section, Slide, SlideKind};
use his_poster::{build_pptx, Deck, PptxConfig};
use image::{ImageBuffer, Rgb};
use std::fs;
use std::io::{Cursor, Read};
use std::process::{Command, Output};
use tempfile::TempDir;
use zip::ZipArchive;

fn run_command(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_his-poster"))
        .args(args)
        .env_remove("EMBED_BACKGROUNDS")
        .output()
        .expect("Failed to execute command")
}

fn read_part<R: Read + std::io::Seek>(archive: &mut ZipArchive<R>, name: &str) -> String {
    let mut part = archive
        .by_name(name)
        .unwrap_or_else(|_| panic!("missing part {}", name));
    let mut xml = String::new();
    part.read_to_string(&mut xml).expect("Failed to read part");
    xml
}

fn part_names<R: Read + std::io::Seek>(archive: &mut ZipArchive<R>) -> Vec<String> {
    (0..archive.len())
        .filter_map(|i| archive.by_index(i).ok().map(|f| f.name().to_string()))
        .collect()
}

#[test]
fn test_deck_pptx_command() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output_path = temp_dir.path().join("deck.pptx");

    let output = run_command(&[
        "deck-pptx",
        "-o",
        output_path.to_str().unwrap(),
        "--title",
        "Test Presentation",
    ]);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(output_path.exists(), "PPTX file was not created");

    let file = fs::File::open(&output_path).expect("Failed to open PPTX file");
    let mut archive = ZipArchive::new(file).expect("Failed to read PPTX as ZIP");
    let names = part_names(&mut archive);

    let slide_files: Vec<&String> = names
        .iter()
        .filter(|name| name.starts_with("ppt/slides/slide") && name.ends_with(".xml"))
        .collect();
    assert_eq!(slide_files.len(), 11, "Expected one slide part per slide");
    for n in 1..=11 {
        assert!(names.contains(&format!("ppt/slides/slide{}.xml", n)));
    }
    for part in [
        "[Content_Types].xml",
        "_rels/.rels",
        "ppt/presentation.xml",
        "ppt/slideMasters/slideMaster1.xml",
        "ppt/slideLayouts/slideLayout1.xml",
        "ppt/theme/theme1.xml",
        "docProps/core.xml",
        "docProps/app.xml",
    ] {
        assert!(names.contains(&part.to_string()), "missing {}", part);
    }
    assert!(
        !names.iter().any(|n| n.starts_with("ppt/media/")),
        "backgrounds are not embedded by default"
    );

    let first = read_part(&mut archive, "ppt/slides/slide1.xml");
    assert!(first.contains("Designing Reference Architecture"));
    assert!(first.contains("Okuhle Gebashe"));

    let last = read_part(&mut archive, "ppt/slides/slide11.xml");
    assert!(last.contains("<a:t>References</a:t>"));
    assert!(last.contains("<a:t>[5]</a:t>"));
    assert!(!last.contains("<a:t>[6]</a:t>"));

    let presentation = read_part(&mut archive, "ppt/presentation.xml");
    assert!(presentation.contains(r#"<p:sldSz cx="9144000" cy="5143500"/>"#));
    assert_eq!(presentation.matches("<p:sldId ").count(), 11);

    let core = read_part(&mut archive, "docProps/core.xml");
    assert!(core.contains("<dc:title>Test Presentation</dc:title>"));
    assert!(core.contains("<dc:creator>Okuhle Gebashe</dc:creator>"));
}

#[test]
fn test_embedded_backgrounds_and_fallback() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let background = temp_dir.path().join("bg.png");
    ImageBuffer::from_fn(32, 18, |_, _| Rgb([30u8, 60u8, 90u8]))
        .save(&background)
        .expect("Failed to save background image");
    let missing = temp_dir.path().join("missing.jpg");

    let section = Section {
        heading: "Heading",
        text: "Body text",
    };
    let deck = Deck::new(vec![
        Slide {
            title: "With Photo",
            background: background.to_string_lossy().to_string(),
            kind: SlideKind::Content(vec![section.clone()]),
        },
        Slide {
            title: "Without Photo",
            background: missing.to_string_lossy().to_string(),
            kind: SlideKind::Content(vec![section]),
        },
    ]);
    let config = PptxConfig {
        embed_backgrounds: true,
        ..PptxConfig::default()
    };

    let bytes = build_pptx(&deck, &config).expect("Failed to build PPTX");
    let mut archive = ZipArchive::new(Cursor::new(bytes)).expect("Failed to read PPTX as ZIP");
    let names = part_names(&mut archive);

    assert!(names.contains(&"ppt/media/image1.png".to_string()));
    assert!(!names.iter().any(|n| n.starts_with("ppt/media/image2")));

    let rels = read_part(&mut archive, "ppt/slides/_rels/slide1.xml.rels");
    assert!(rels.contains("../media/image1.png"));

    let with_photo = read_part(&mut archive, "ppt/slides/slide1.xml");
    assert!(with_photo.contains(r#"<a:blip r:embed="rId2"/>"#));
    assert!(with_photo.contains(r#"<a:alpha val="70000"/>"#));

    let without_photo = read_part(&mut archive, "ppt/slides/slide2.xml");
    assert!(!without_photo.contains("r:embed"));
    assert!(without_photo.contains(r#"<a:srgbClr val="1F2937"/>"#));
}
