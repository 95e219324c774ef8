use super::*;
use crate::config::parse_setting;
use crate::export::POSTER_FAILURE_MESSAGE;
use crate::layout::{Shape, CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::server::{routes, Reply};
use std::fs;
use tempfile::TempDir;

fn expected_templates() -> Vec<Template> {
    vec![
        Template::Title,
        Template::Content,
        Template::Content,
        Template::Content,
        Template::Architecture,
        Template::Diagram,
        Template::Features,
        Template::Content,
        Template::Content,
        Template::Conclusion,
        Template::References,
    ]
}

fn visible_sections(html: &str) -> Vec<&str> {
    html.split("<section class=\"slide\"")
        .skip(1)
        .filter(|section| section.contains("style=\"display:block\""))
        .collect()
}

#[test]
fn test_healthcare_deck_order() {
    let deck = Deck::healthcare();
    assert_eq!(deck.len(), 11);

    let templates: Vec<Template> = deck
        .slides()
        .iter()
        .map(|slide| Template::for_kind(&slide.kind))
        .collect();
    assert_eq!(templates, expected_templates());
    assert_eq!(deck.get(10).map(|s| s.title), Some("References"));
    assert!(deck.get(11).is_none());
}

#[test]
fn test_navigator_clamps_at_both_ends() {
    let mut navigator = Navigator::new(11).unwrap();
    assert!(navigator.is_first());
    assert_eq!(navigator.previous(), 0);

    for _ in 0..20 {
        navigator.next();
    }
    assert_eq!(navigator.current(), 10);
    assert!(navigator.is_last());
    assert_eq!(navigator.next(), 10);

    assert_eq!(navigator.previous(), 9);
    assert!(!navigator.is_last());
}

#[test]
fn test_navigator_jump_rejects_out_of_range() {
    let mut navigator = Navigator::new(11).unwrap();
    assert_eq!(navigator.jump_to(4).unwrap(), 4);

    let result = navigator.jump_to(11);
    assert!(matches!(result, Err(DeckError::ValidationError(_))));
    assert_eq!(navigator.current(), 4, "cursor must not move on a bad jump");
}

#[test]
fn test_navigator_requires_slides() {
    assert!(Navigator::new(0).is_err());
}

#[test]
fn test_every_element_inside_canvas() {
    for (i, slide) in Deck::healthcare().slides().iter().enumerate() {
        let layout = layout_slide(slide);
        assert!(!layout.elements.is_empty(), "slide {} has no elements", i);
        for element in &layout.elements {
            assert!(
                element.frame.within_canvas(),
                "slide {} element {:?} leaves the {}x{} canvas",
                i,
                element.frame,
                CANVAS_WIDTH,
                CANVAS_HEIGHT
            );
        }
    }
}

#[test]
fn test_layout_carries_slide_text() {
    let deck = Deck::healthcare();

    let title = layout_slide(&deck.slides()[0]);
    assert_eq!(title.template, Template::Title);
    assert!(title
        .texts()
        .any(|t| t.contains("Reference Architecture for Healthcare")));
    assert!(title.texts().any(|t| t.contains(content::AUTHOR)));

    let references = layout_slide(&deck.slides()[10]);
    for n in 1..=5 {
        let label = format!("[{}]", n);
        assert!(
            references.texts().any(|t| t == label),
            "missing reference label {}",
            label
        );
    }
    assert!(!references.texts().any(|t| t == "[6]"));
}

#[test]
fn test_features_use_two_columns() {
    let deck = Deck::healthcare();
    let layout = layout_slide(&deck.slides()[6]);
    let mut panel_columns: Vec<f64> = layout
        .elements
        .iter()
        .filter(|e| matches!(e.shape, Shape::Panel { .. }) && e.frame.y > 1.1)
        .map(|e| e.frame.x)
        .collect();
    panel_columns.sort_by(|a, b| a.partial_cmp(b).unwrap());
    panel_columns.dedup();
    assert_eq!(panel_columns, layout::FEATURE_COLUMNS.to_vec());
}

#[test]
fn test_deck_html_shows_exactly_one_matching_slide() {
    let deck = Deck::healthcare();
    let templates = expected_templates();
    let mut navigator = Navigator::new(deck.len()).unwrap();

    for i in 0..deck.len() {
        navigator.jump_to(i).unwrap();
        let html = generate_deck_html(&deck, &navigator).unwrap();
        let visible = visible_sections(&html);
        assert_eq!(visible.len(), 1, "slide {} should be the only one shown", i);
        assert!(visible[0].contains(&format!("data-index=\"{}\"", i)));
        assert!(visible[0].contains(&format!("data-template=\"{}\"", templates[i].name())));
    }
}

#[test]
fn test_deck_html_controls() {
    let deck = Deck::healthcare();
    let mut navigator = Navigator::new(deck.len()).unwrap();

    let first = generate_deck_html(&deck, &navigator).unwrap();
    assert!(first.contains("1 / 11"));
    assert!(first.contains("id=\"capture-region\""));
    assert!(first.contains("id=\"export-control\""));
    assert!(!first.contains(&format!("href=\"{}\"", routes::PREVIOUS)));
    assert!(first.contains(&format!("href=\"{}\"", routes::NEXT)));
    assert!(first.contains(&format!("href=\"{}\"", routes::DECK_PPTX)));

    navigator.jump_to(10).unwrap();
    let last = generate_deck_html(&deck, &navigator).unwrap();
    assert!(last.contains("11 / 11"));
    assert!(last.contains(&format!("href=\"{}\"", routes::PREVIOUS)));
    assert!(!last.contains(&format!("href=\"{}\"", routes::NEXT)));
}

#[test]
fn test_show_slide_rejects_out_of_range_before_hiding() {
    let deck = Deck::healthcare();
    let navigator = Navigator::new(deck.len()).unwrap();
    let html = generate_deck_html(&deck, &navigator).unwrap();

    let guard = html
        .find("if (index < 0 || index >= slides.length) { return false; }")
        .expect("range check missing");
    let hide = html.find("slides[i].style.display").unwrap();
    assert!(guard < hide, "range check must run before any slide is hidden");
}

#[test]
fn test_deck_html_rejects_mismatched_navigator() {
    let deck = Deck::healthcare();
    let navigator = Navigator::new(3).unwrap();
    assert!(generate_deck_html(&deck, &navigator).is_err());
}

#[test]
fn test_poster_html() {
    let html = generate_poster_html(&Poster::healthcare()).unwrap();

    assert!(html.contains("<!DOCTYPE html>"));
    assert!(html.contains("id=\"capture-region\""));
    assert!(html.contains("id=\"export-control\""));
    assert!(html.contains("Download A2 PDF"));
    assert!(html.contains("View Presentation"));
    assert!(html.contains("api.qrserver.com"));
    assert!(html.contains("size=200x200"));
    assert!(html.contains("Okuhle Gebashe"));
}

#[test]
fn test_html_escapes_text() {
    let deck = Deck::new(vec![Slide {
        title: "Risks & <Rewards>",
        background: "https://example.com/bg.jpg?a=1&b=2".to_string(),
        kind: SlideKind::Conclusion(vec!["Say \"hello\""]),
    }]);
    let navigator = Navigator::new(1).unwrap();
    let html = generate_deck_html(&deck, &navigator).unwrap();

    assert!(html.contains("Risks &amp; &lt;Rewards&gt;"));
    assert!(html.contains("bg.jpg?a=1&amp;b=2"));
    assert!(!html.contains("<Rewards>"));
}

#[test]
fn test_slide_xml_uses_emu_and_points() {
    let deck = Deck::healthcare();
    let layout = layout_slide(&deck.slides()[1]);
    let xml = pptx::slide_xml(&layout, false);

    assert!(xml.starts_with("<?xml"));
    assert!(xml.contains("<p:sld "));
    assert!(xml.contains("val=\"1F2937\""));
    assert!(xml.contains("txBox=\"1\""));
    assert!(xml.contains("sz=\"3200\""), "32pt heading expected");
    assert!(xml.contains("<a:t>Introduction</a:t>"));
    assert!(!xml.contains("r:embed"));
}

#[test]
fn test_slide_xml_with_background_adds_overlay() {
    let deck = Deck::healthcare();
    let layout = layout_slide(&deck.slides()[0]);
    let xml = pptx::slide_xml(&layout, true);

    assert!(xml.contains("<a:blip r:embed=\"rId2\"/>"));
    assert!(xml.contains("<a:alpha val=\"70000\"/>"));
    assert!(xml.contains("<a:ext cx=\"9144000\" cy=\"5143500\"/>"));
}

#[test]
fn test_route_parse() {
    assert_eq!(Route::parse("/"), Route::Poster);
    assert_eq!(Route::parse("/presentation"), Route::Deck);
    assert_eq!(Route::parse("/presentation/"), Route::Deck);
    assert_eq!(Route::parse("/presentation/next"), Route::Next);
    assert_eq!(Route::parse("/presentation/previous?x=1"), Route::Previous);
    assert_eq!(Route::parse("/presentation/7"), Route::Jump(7));
    assert_eq!(Route::parse("/presentation/-1"), Route::NotFound);
    assert_eq!(Route::parse("/download/poster.pdf"), Route::PosterPdf);
    assert_eq!(Route::parse("/download/presentation.pdf"), Route::DeckPdf);
    assert_eq!(Route::parse("/download/presentation.pptx"), Route::DeckPptx);
    assert_eq!(Route::parse("/favicon.ico"), Route::NotFound);
}

#[test]
fn test_viewer_navigation() {
    let mut viewer =
        Viewer::new(Deck::healthcare(), Poster::healthcare(), ServeConfig::default()).unwrap();

    assert_eq!(viewer.handle(Route::Next), Reply::Redirect(routes::DECK));
    assert_eq!(viewer.navigator().current(), 1);

    assert_eq!(viewer.handle(Route::Jump(10)), Reply::Redirect(routes::DECK));
    assert_eq!(viewer.handle(Route::Next), Reply::Redirect(routes::DECK));
    assert_eq!(viewer.navigator().current(), 10);

    assert_eq!(viewer.handle(Route::Jump(42)), Reply::NotFound);
    assert_eq!(viewer.navigator().current(), 10);

    match viewer.handle(Route::Deck) {
        Reply::Html(html) => assert!(html.contains("11 / 11")),
        other => panic!("expected deck page, got {:?}", other),
    }
}

#[test]
fn test_viewer_pptx_download() {
    let mut viewer =
        Viewer::new(Deck::healthcare(), Poster::healthcare(), ServeConfig::default()).unwrap();

    match viewer.handle(Route::DeckPptx) {
        Reply::Attachment {
            file_name, data, ..
        } => {
            assert_eq!(file_name, pptx::PPTX_FILE);
            assert_eq!(&data[..2], b"PK");
        }
        other => panic!("expected attachment, got {:?}", other),
    }
}

#[test]
fn test_viewer_export_failures_are_reported_per_target() {
    let config = ServeConfig {
        capture: CaptureConfig {
            browser_path: Some("/nonexistent/chrome".to_string()),
            ..CaptureConfig::default()
        },
        ..ServeConfig::default()
    };
    let mut viewer = Viewer::new(Deck::healthcare(), Poster::healthcare(), config).unwrap();

    assert_eq!(
        viewer.handle(Route::PosterPdf),
        Reply::Failure(POSTER_FAILURE_MESSAGE.to_string())
    );
    assert_eq!(viewer.handle(Route::DeckPdf), Reply::Redirect(routes::DECK));
}

#[test]
fn test_write_atomically_replaces_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("nested").join("out.bin");

    utils::write_atomically(&path, b"first").unwrap();
    utils::write_atomically(&path, b"second").unwrap();

    assert_eq!(fs::read(&path).unwrap(), b"second");
    let leftovers: Vec<_> = fs::read_dir(path.parent().unwrap())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".part"))
        .collect();
    assert!(leftovers.is_empty(), "staging files left behind");
}

#[test]
fn test_config_builders() {
    let config = Config {
        browser_path: Some("/usr/bin/chromium".to_string()),
        ready_timeout_ms: 1234,
        ..Config::default()
    };

    let capture = config.get_capture_config(None, Some(10));
    assert_eq!(capture.ready_timeout_ms, 1234);
    assert_eq!(capture.settle_delay_ms, 10);
    assert_eq!(capture.browser_path.as_deref(), Some("/usr/bin/chromium"));

    let pptx = config.get_pptx_config(Some("Custom".to_string()), true);
    assert_eq!(pptx.title, "Custom");
    assert!(pptx.embed_backgrounds);
    assert_eq!(pptx.author, content::AUTHOR);

    let serve = config.get_serve_config(None, Some(9000));
    assert_eq!(serve.port, 9000);
    assert_eq!(serve.capture.ready_timeout_ms, 1234);
}

#[test]
fn test_page_geometry_in_points() {
    let a4 = PageGeometry::A4_LANDSCAPE;
    assert!((a4.width_pt() - 841.89).abs() < 0.01);
    assert!((a4.height_pt() - 595.28).abs() < 0.01);

    let a2 = PageGeometry::A2_PORTRAIT;
    assert!((a2.width_pt() - 1190.55).abs() < 0.01);
    assert!((a2.height_pt() - 1683.78).abs() < 0.01);
}

#[test]
fn test_parse_setting() {
    assert_eq!(parse_setting("PORT", None, 8080u16).unwrap(), 8080);
    assert_eq!(parse_setting("PORT", Some("  ".to_string()), 8080u16).unwrap(), 8080);
    assert_eq!(parse_setting("PORT", Some(" 9000 ".to_string()), 8080u16).unwrap(), 9000);

    match parse_setting("READY_TIMEOUT_MS", Some("soon".to_string()), 30000u64) {
        Err(DeckError::ConfigError(message)) => {
            assert!(message.contains("READY_TIMEOUT_MS"));
            assert!(message.contains("soon"));
        }
        other => panic!("expected config error, got {:?}", other),
    }
    assert!(matches!(
        parse_setting("PORT", Some("70000".to_string()), 8080u16),
        Err(DeckError::ConfigError(_))
    ));
}
