use super::*;

fn element(id: &str, kind: ElementKind) -> Element {
    Element {
        id: id.to_string(),
        position: Point::new(10.0, 20.0),
        size: Size::new(300.0, 200.0),
        z_index: 0,
        kind,
    }
}

#[test]
fn element_json_uses_authoring_field_names() {
    let json = r#"{
        "id": "v1",
        "type": "video",
        "position": {"x": 0, "y": 0},
        "size": {"width": 640, "height": 360},
        "zIndex": 3,
        "src": "",
        "videos": [{"src": "a.mp4"}, {"src": "b.mp4"}],
        "autoPlay": true,
        "loop": true,
        "muted": false
    }"#;
    let el: Element = serde_json::from_str(json).unwrap();
    assert_eq!(el.z_index, 3);
    assert_eq!(el.element_type(), ElementType::Video);
    let ElementKind::Video(video) = &el.kind else {
        panic!("expected video");
    };
    assert!(video.looping);
    assert_eq!(video.playlist(), vec!["a.mp4", "b.mp4"]);

    let back = serde_json::to_value(&el).unwrap();
    assert_eq!(back["type"], "video");
    assert_eq!(back["zIndex"], 3);
    assert_eq!(back["autoPlay"], true);
    assert_eq!(back["loop"], true);
}

#[test]
fn missing_optional_fields_take_defaults() {
    let json = r#"{"id":"t","type":"text","position":{"x":1,"y":2},"size":{"width":3,"height":4}}"#;
    let el: Element = serde_json::from_str(json).unwrap();
    let ElementKind::Text(text) = el.kind else {
        panic!("expected text");
    };
    assert_eq!(text.font_size, 32.0);
    assert_eq!(text.text_align, TextAlign::Center);
    assert_eq!(text.font_family, "sans-serif");

    let json = r#"{"id":"i","type":"image","position":{"x":0,"y":0},"size":{"width":1,"height":1}}"#;
    let el: Element = serde_json::from_str(json).unwrap();
    let ElementKind::Image(image) = el.kind else {
        panic!("expected image");
    };
    assert!(image.src.is_empty());
    assert_eq!(image.object_fit, ObjectFit::Cover);
}

#[test]
fn legacy_video_source_is_one_item_playlist() {
    let mut v = VideoContent {
        src: "legacy.mp4".to_string(),
        ..VideoContent::default()
    };
    assert_eq!(v.playlist(), vec!["legacy.mp4"]);
    v.videos.push(VideoSource {
        src: "new.mp4".to_string(),
    });
    assert_eq!(v.playlist(), vec!["new.mp4"]);
    assert!(VideoContent::default().playlist().is_empty());
}

#[test]
fn validate_rejects_degenerate_geometry() {
    let mut el = element("a", ElementKind::Image(ImageContent::default()));
    el.validate().unwrap();

    el.size = Size::new(0.0, 10.0);
    assert!(matches!(el.validate().unwrap_err(), SignageError::Domain(_)));

    el.size = Size::new(10.0, f64::NAN);
    assert!(el.validate().is_err());

    el.size = Size::new(10.0, 10.0);
    el.position = Point::new(f64::INFINITY, 0.0);
    assert!(el.validate().is_err());
}

#[test]
fn validate_rejects_bad_content() {
    let audio = element(
        "a",
        ElementKind::Audio(AudioContent {
            volume: 1.5,
            ..AudioContent::default()
        }),
    );
    assert!(audio.validate().is_err());

    let ticker = element(
        "t",
        ElementKind::Ticker(TickerContent {
            font_size: 0.0,
            ..TickerContent::default()
        }),
    );
    assert!(ticker.validate().is_err());
}

#[test]
fn project_validate_checks_canvas_and_ids() {
    let mut p = Project::new("demo", AspectRatio::resolve("16:9"));
    assert_eq!(p.canvas(), Canvas { width: 1920, height: 1080 });
    p.elements.push(element("x", ElementKind::Text(TextContent::default())));
    p.validate().unwrap();

    p.elements.push(element("x", ElementKind::Text(TextContent::default())));
    let err = p.validate().unwrap_err();
    assert!(err.to_string().contains("duplicate element id"));

    p.elements.pop();
    p.canvas_height = 0;
    assert!(matches!(p.validate().unwrap_err(), SignageError::Domain(_)));
}

#[test]
fn project_document_roundtrips_through_json() {
    let json = r#"{
        "id": "p1",
        "name": "Lobby",
        "ratio": "9:16",
        "canvasWidth": 1080,
        "canvasHeight": 1920,
        "elements": [],
        "isPublished": true,
        "publishCode": "ABC234"
    }"#;
    let p = Project::from_json_str(json).unwrap();
    assert_eq!(p.publish_code.as_deref(), Some("ABC234"));
    assert!(p.is_published);
    let v = serde_json::to_value(&p).unwrap();
    assert_eq!(v["canvasHeight"], 1920);
    assert_eq!(v["publishCode"], "ABC234");
}

#[test]
fn default_content_matches_new_element_presets() {
    let ElementKind::Ticker(t) = ElementKind::default_for(ElementType::Ticker) else {
        panic!("expected ticker");
    };
    assert_eq!(t.speed, Some(5.0));
    assert_eq!(t.font_size, 24.0);

    let ElementKind::Video(v) = ElementKind::default_for(ElementType::Video) else {
        panic!("expected video");
    };
    assert!(v.auto_play && v.looping && v.muted);
    assert_eq!(ElementType::Slideshow.to_string(), "slideshow");
}
