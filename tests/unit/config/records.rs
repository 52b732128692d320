use super::*;

fn props(pairs: &[(&str, &str)]) -> Properties {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn general_resolves_background_against_base_dir() {
    let doc = ConfigDocument::parse("[general]\nbg = img/back.png\nfps = 25\n").unwrap();
    let g = GeneralConfig::from_document(&doc, Path::new("/data/show")).unwrap();
    assert_eq!(g.background, PathBuf::from("/data/show/img/back.png"));
    assert_eq!(g.fps.get(), 25);
}

#[test]
fn general_requires_section_and_valid_fps() {
    let doc = ConfigDocument::parse("[layer]\naudio = a.wav\n").unwrap();
    assert!(matches!(
        GeneralConfig::from_document(&doc, Path::new(".")),
        Err(ZvisError::Config(_))
    ));

    for bad in ["0", "-3", "twenty", "25.5"] {
        let text = format!("[general]\nbg = b.png\nfps = {bad}\n");
        let doc = ConfigDocument::parse(&text).unwrap();
        let err = GeneralConfig::from_document(&doc, Path::new(".")).unwrap_err();
        assert!(err.to_string().contains("fps"), "{bad}: {err}");
    }

    let doc = ConfigDocument::parse("[general]\nfps = 25\n").unwrap();
    let err = GeneralConfig::from_document(&doc, Path::new(".")).unwrap_err();
    assert!(err.to_string().contains("'bg'"));
}

#[test]
fn image_layer_defaults_inertia() {
    let p = props(&[("audio", "a.wav"), ("image", "i.png")]);
    let c = ImageLayerConfig::from_properties("drums", &p, Path::new("base")).unwrap();
    assert_eq!(c.audio, PathBuf::from("base/a.wav"));
    assert_eq!(c.image, PathBuf::from("base/i.png"));
    assert_eq!(c.inertia, DEFAULT_INERTIA);

    let p = props(&[("audio", "a.wav"), ("image", "i.png"), ("inertia", "0.1")]);
    let c = ImageLayerConfig::from_properties("drums", &p, Path::new("base")).unwrap();
    assert_eq!(c.inertia, 0.1);

    let p = props(&[("audio", "a.wav"), ("image", "i.png"), ("inertia", "-1")]);
    assert!(ImageLayerConfig::from_properties("drums", &p, Path::new("base")).is_err());
}

#[test]
fn missing_audio_names_section() {
    let p = props(&[("image", "i.png")]);
    let err = ImageLayerConfig::from_properties("drums", &p, Path::new(".")).unwrap_err();
    assert!(err.to_string().contains("[drums]"));
    assert!(err.to_string().contains("'audio'"));
}

#[test]
fn spectro_layer_defaults_and_overrides() {
    let p = props(&[("audio", "a.wav"), ("colour", "10,20,30")]);
    let c = SpectroLayerConfig::from_properties("bass", &p, Path::new(".")).unwrap();
    assert_eq!(c.colour, [10, 20, 30]);
    assert_eq!(c.rate, 1);
    assert_eq!(c.yscale, 1);

    let p = props(&[
        ("audio", "a.wav"),
        ("colour", " 255 , 0 , 7 "),
        ("rate", "2"),
        ("yscale", "4"),
    ]);
    let c = SpectroLayerConfig::from_properties("bass", &p, Path::new(".")).unwrap();
    assert_eq!(c.colour, [255, 0, 7]);
    assert_eq!(c.rate, 2);
    assert_eq!(c.yscale, 4);
}

#[test]
fn spectro_layer_rejects_bad_numbers() {
    for (key, value) in [("rate", "0"), ("yscale", "-1"), ("rate", "fast")] {
        let p = props(&[("audio", "a.wav"), ("colour", "1,2,3"), (key, value)]);
        let err = SpectroLayerConfig::from_properties("bass", &p, Path::new(".")).unwrap_err();
        assert!(matches!(err, ZvisError::Config(_)));
        assert!(err.to_string().contains(key));
    }
}

#[test]
fn colour_must_be_three_bytes() {
    assert_eq!(parse_colour("s", "0,0,0").unwrap(), [0, 0, 0]);
    assert!(parse_colour("s", "1,2").is_err());
    assert!(parse_colour("s", "1,2,3,4").is_err());
    assert!(parse_colour("s", "256,0,0").is_err());
    assert!(parse_colour("s", "red").is_err());
}
