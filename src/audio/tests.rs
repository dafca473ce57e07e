use super::loader::ThreadedLoader;
use super::sink::read_preview;
use crate::error::QuizError;
use crate::quiz::PreviewLoader;
use std::sync::mpsc;
use std::time::Duration;

#[test]
fn read_preview_loads_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.mp3");
    std::fs::write(&path, b"ID3 fake").unwrap();

    let data = read_preview(path.to_str().unwrap()).unwrap();
    assert_eq!(&data[..], b"ID3 fake");
}

#[test]
fn read_preview_reports_missing_and_empty_files() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.mp3");
    assert!(matches!(
        read_preview(missing.to_str().unwrap()),
        Err(QuizError::ResourceLoadFailure { .. })
    ));

    let empty = dir.path().join("empty.mp3");
    std::fs::write(&empty, b"").unwrap();
    assert!(matches!(
        read_preview(empty.to_str().unwrap()),
        Err(QuizError::ResourceLoadFailure { .. })
    ));
}

#[test]
fn threaded_loader_reports_through_the_channel() {
    let dir = tempfile::tempdir().unwrap();
    let ok = dir.path().join("ok.mp3");
    std::fs::write(&ok, b"bytes").unwrap();
    let ok = ok.to_str().unwrap().to_string();
    let bad = dir.path().join("bad.mp3").to_str().unwrap().to_string();

    let (tx, rx) = mpsc::channel();
    let loader = ThreadedLoader::new(tx);
    loader.request(&ok);
    loader.request(&bad);

    let mut events = Vec::new();
    for _ in 0..2 {
        events.push(rx.recv_timeout(Duration::from_secs(5)).unwrap());
    }
    let ok_event = events.iter().find(|e| e.uri == ok).unwrap();
    assert_eq!(&ok_event.result.as_ref().unwrap()[..], b"bytes");
    let bad_event = events.iter().find(|e| e.uri == bad).unwrap();
    assert!(bad_event.result.is_err());
}
