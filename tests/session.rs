//! End-to-end scan cycle tests over the upload path and the offline
//! analyzer: acquire → normalize → identify, with every failure class
//! leaving the caller free to return to idle.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use image::{ImageFormat, Rgb, RgbImage};
use prospector_pal::analysis::{MockAnalyzer, RockAnalysis, RockAnalyzer, pyrite_fixture};
use prospector_pal::error::{PalError, PalResult};
use prospector_pal::gallery::{GalleryStore, MemoryStorage};
use prospector_pal::normalize::{EncodedImage, MAX_UPLOAD_BYTES};
use prospector_pal::session::ScanSession;
use prospector_pal::source::{FileSource, ImageSource};

fn write_test_image(dir: &std::path::Path, w: u32, h: u32) -> std::path::PathBuf {
    let path = dir.join("specimen.png");
    let img = RgbImage::from_pixel(w, h, Rgb([150, 120, 90]));
    let mut buf = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, ImageFormat::Png)
        .unwrap();
    std::fs::write(&path, buf.into_inner()).unwrap();
    path
}

#[tokio::test]
async fn file_to_analysis_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_test_image(dir.path(), 320, 240);

    let mut session = ScanSession::builder()
        .with_source(FileSource::new(&path, MAX_UPLOAD_BYTES))
        .with_analyzer(Box::new(MockAnalyzer))
        .build()
        .unwrap();

    let outcome = session.run().await.unwrap();
    assert_eq!(outcome.analysis.name, "Pyrite");
    assert_eq!((outcome.image.width, outcome.image.height), (320, 240));
    assert_eq!(outcome.image.mime, "image/jpeg");
}

#[tokio::test]
async fn oversized_input_is_rejected_before_decode() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_test_image(dir.path(), 64, 64);

    // A 16-byte ceiling guarantees the metadata precheck fires.
    let mut session = ScanSession::builder()
        .with_source(FileSource::new(&path, 16))
        .with_analyzer(Box::new(MockAnalyzer))
        .build()
        .unwrap();

    let err = session.run().await.unwrap_err();
    assert_eq!(err.category(), "validation");
}

#[tokio::test]
async fn missing_file_is_an_acquisition_error() {
    let mut session = ScanSession::builder()
        .with_source(FileSource::new("/no/such/specimen.jpg", MAX_UPLOAD_BYTES))
        .with_analyzer(Box::new(MockAnalyzer))
        .build()
        .unwrap();

    let err = session.run().await.unwrap_err();
    assert_eq!(err.category(), "acquire");
    assert!(err.user_message().unwrap().contains("uploading a file"));
}

#[tokio::test]
async fn unreadable_image_is_a_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("not_an_image.jpg");
    std::fs::write(&path, b"plain text pretending to be a photo").unwrap();

    let mut session = ScanSession::builder()
        .with_source(FileSource::new(&path, MAX_UPLOAD_BYTES))
        .with_analyzer(Box::new(MockAnalyzer))
        .build()
        .unwrap();

    let err = session.run().await.unwrap_err();
    assert_eq!(err.category(), "decode");
}

/// Source that records its release and fails the read.
struct RecordingSource {
    released: Arc<AtomicBool>,
}

impl RecordingSource {
    fn new() -> (Self, Arc<AtomicBool>) {
        let released = Arc::new(AtomicBool::new(false));
        (
            Self {
                released: released.clone(),
            },
            released,
        )
    }
}

#[async_trait]
impl ImageSource for RecordingSource {
    async fn acquire(&mut self) -> PalResult<()> {
        Ok(())
    }

    async fn next_image(&mut self) -> PalResult<Vec<u8>> {
        Err(PalError::acquire("stream went away"))
    }

    async fn release(&mut self) -> PalResult<()> {
        self.released.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        "recording".to_string()
    }
}

/// Analyzer that rejects every payload as off-contract.
struct RejectingAnalyzer;

#[async_trait]
impl RockAnalyzer for RejectingAnalyzer {
    async fn identify(&self, _image: &EncodedImage) -> PalResult<RockAnalysis> {
        Err(PalError::malformed("missing field `alternatives`"))
    }
}

#[tokio::test]
async fn source_is_released_when_the_read_fails() {
    let (source, released) = RecordingSource::new();
    let mut session = ScanSession::builder()
        .with_source(source)
        .with_analyzer(Box::new(MockAnalyzer))
        .build()
        .unwrap();

    let err = session.run().await.unwrap_err();
    assert_eq!(err.category(), "acquire");
    assert!(released.load(Ordering::SeqCst));
}

#[tokio::test]
async fn failed_identification_leaves_the_gallery_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_test_image(dir.path(), 64, 64);

    let backend = MemoryStorage::new();
    let mut store = GalleryStore::load(Box::new(backend.clone())).await;
    store
        .append(
            &EncodedImage {
                mime: "image/jpeg".into(),
                bytes: vec![0xFF, 0xD8, 0xFF, 0xD9],
                width: 2,
                height: 2,
            },
            pyrite_fixture(),
        )
        .await
        .unwrap();
    let before = backend.raw();

    let mut session = ScanSession::builder()
        .with_source(FileSource::new(&path, MAX_UPLOAD_BYTES))
        .with_analyzer(Box::new(RejectingAnalyzer))
        .build()
        .unwrap();

    let err = session.run().await.unwrap_err();
    assert_eq!(err.category(), "malformed_analysis");

    // Neither the in-memory collection nor the persisted snapshot moved.
    assert_eq!(store.len(), 1);
    assert_eq!(backend.raw(), before);
}

#[test]
fn builder_requires_source_and_analyzer() {
    let err = ScanSession::builder().build().unwrap_err();
    assert_eq!(err.category(), "config");

    let err = ScanSession::builder()
        .with_analyzer(Box::new(MockAnalyzer))
        .build()
        .unwrap_err();
    assert_eq!(err.category(), "config");
}
