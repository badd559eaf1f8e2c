use filetext::capability::{Capabilities, Engine};
use filetext::codec::{CodecError, ErrorKind, FormatId};
use filetext::dispatch::Dispatcher;
use filetext::registry;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// decode → encode(same path) → decode must reproduce the first decode.
fn assert_idempotent(files: &Dispatcher<'_>, path: &Path) -> String {
    let first = files.read(path).unwrap();
    files.write(path, &first).unwrap();
    let second = files.read(path).unwrap();
    assert_eq!(second, first, "{}", path.display());
    second
}

#[test]
fn test_registry_is_symmetric_for_every_extension() {
    for (ext, _) in registry::EXTENSIONS {
        let codec = registry::lookup(ext).expect(ext);
        assert_eq!(registry::format_for(ext), Some(codec.format()));
    }
    assert!(registry::lookup(".xyz").is_none());
}

#[test]
fn test_plain_text_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("poem.txt");
    fs::write(&path, "roses are red\n\tviolets are blue\n").unwrap();

    let text = assert_idempotent(&Dispatcher::new(), &path);
    assert_eq!(text, "roses are red\n\tviolets are blue\n");
}

#[test]
fn test_json_round_trip_canonicalizes_once() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("user.json");
    fs::write(&path, r#"{"name":"Zoë","tags":["a","b"],"age":41}"#).unwrap();

    let text = assert_idempotent(&Dispatcher::new(), &path);
    assert_eq!(
        text,
        "{\n  \"name\": \"Zoë\",\n  \"tags\": [\n    \"a\",\n    \"b\"\n  ],\n  \"age\": 41\n}"
    );
}

#[test]
fn test_json_malformed_input() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(&path, "{not json").unwrap();

    let err = Dispatcher::new().read(&path).unwrap_err();
    assert!(matches!(err, CodecError::MalformedInput { format: FormatId::Json, .. }));
}

#[cfg(feature = "yaml")]
#[test]
fn test_yaml_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("compose.yml");
    fs::write(&path, "services:\n  web: {ports: [80, 443], image: nginx}\nversion: '3'\n").unwrap();

    let text = assert_idempotent(&Dispatcher::new(), &path);
    assert_eq!(
        text,
        "services:\n  web:\n    image: nginx\n    ports:\n    - 80\n    - 443\nversion: '3'\n"
    );
}

#[test]
fn test_yaml_without_engine_is_missing_dependency() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("conf.yaml");
    fs::write(&path, "a: 1\n").unwrap();
    let caps = Capabilities::detected().without(Engine::Yaml);
    let files = Dispatcher::with_capabilities(&caps);

    let err = files.read(&path).unwrap_err();
    assert!(matches!(err, CodecError::MissingDependency { engine: Engine::Yaml }));
    assert!(err.to_string().contains("yaml-engine"));

    let err = files.write(&path, "b: 2\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingDependency);
    assert_eq!(fs::read_to_string(&path).unwrap(), "a: 1\n");
}

#[test]
fn test_csv_fallback_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("grid.csv");
    fs::write(&path, "x,y,z\n1,2,3\n4,5,6\n").unwrap();
    let caps = Capabilities::none();

    let text = assert_idempotent(&Dispatcher::with_capabilities(&caps), &path);
    assert_eq!(text, "x,y,z\n1,2,3\n4,5,6");
}

#[cfg(feature = "tabular")]
#[test]
fn test_csv_engine_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("grid.csv");
    fs::write(&path, "x,y\r\n\"1\",\"two, three\"\r\n").unwrap();

    let text = assert_idempotent(&Dispatcher::new(), &path);
    assert_eq!(text, "x,y\n1,\"two, three\"\n");
}

#[cfg(feature = "tabular")]
#[test]
fn test_csv_text_moves_into_spreadsheet() {
    let dir = tempdir().unwrap();
    let csv = dir.path().join("in.csv");
    let xlsx = dir.path().join("out.xlsx");
    fs::write(&csv, "city,pop\nOslo,709000\n").unwrap();
    let files = Dispatcher::new();

    let text = files.read(&csv).unwrap();
    files.write(&xlsx, &text).unwrap();
    assert_eq!(files.read(&xlsx).unwrap(), text);
}

#[cfg(feature = "docx")]
#[test]
fn test_docx_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("memo.docx");
    let files = Dispatcher::new();

    files.write(&path, "Title\nBody line").unwrap();
    assert_idempotent(&files, &path);
    assert_eq!(files.read(&path).unwrap(), "Title\nBody line");
}

#[cfg(feature = "image")]
#[test]
fn test_image_summary_and_conversion() {
    use image::{GrayImage, Luma};

    let dir = tempdir().unwrap();
    let src = dir.path().join("gray.png");
    GrayImage::from_pixel(12, 5, Luma([128u8])).save(&src).unwrap();
    let files = Dispatcher::new();

    assert_eq!(files.read(&src).unwrap(), "Image format: PNG, size: (12, 5), mode: L");

    let dst = dir.path().join("gray.jpeg");
    files.write(&dst, src.to_str().unwrap()).unwrap();
    assert!(files.read(&dst).unwrap().starts_with("Image format: JPEG, size: (12, 5)"));

    let err = files.write(&dst, "/no/such/image.png").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidContent);
}

#[test]
fn test_every_engine_family_reports_its_engine_when_disabled() {
    let dir = tempdir().unwrap();
    let caps = Capabilities::none();
    let files = Dispatcher::with_capabilities(&caps);

    let cases = [
        ("a.yaml", Engine::Yaml),
        ("a.xlsx", Engine::Tabular),
        ("a.pdf",  Engine::Pdf),
        ("a.docx", Engine::Docx),
        ("a.png",  Engine::Image),
    ];
    for (name, engine) in cases {
        let path = dir.path().join(name);
        let err = files.write(&path, "anything").unwrap_err();
        assert!(
            matches!(err, CodecError::MissingDependency { engine: e } if e == engine),
            "{name}: {err}"
        );
        assert!(!path.exists(), "{name} was created");
    }
}

#[test]
fn test_unsupported_extension() {
    let dir = tempdir().unwrap();
    let err = Dispatcher::new().write(dir.path().join("a.xyz"), "x").unwrap_err();
    assert!(matches!(err, CodecError::UnsupportedFormat { ref extension } if extension == ".xyz"));
}
