// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Conversion service: read → synthesize → write, then optionally open.
//
// Synthesis and the bridge calls are blocking, so each pipeline run is moved
// onto `spawn_blocking` and the caller simply awaits the result. Only one
// conversion is in flight per call; nothing is shared between runs except
// the config snapshot.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use folio_bridge::{Base64Codec, DocumentStore, FilePicker, PlatformBridge, ViewerLauncher};
use folio_core::error::{FolioError, Result};
use folio_core::{ConversionConfig, SourceFile};
use folio_document::Synthesizer;
use tracing::{error, info, instrument};

use super::config_store;

/// MIME filters handed to the picker. Anything may be picked; types other
/// than text and images get the details page.
pub const PICKER_MIME_TYPES: &[&str] = &["*/*"];

/// Result of one successful conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionOutcome {
    pub source: SourceFile,
    /// Final location of the PDF.
    pub pdf_path: PathBuf,
    pub page_count: usize,
    pub bytes_written: usize,
    pub converted_at: DateTime<Utc>,
}

/// Shared conversion service. Cheap to clone; clones share config.
#[derive(Clone)]
pub struct ConversionService {
    bridge: Arc<dyn PlatformBridge>,
    codec: Arc<dyn Base64Codec>,
    config: Arc<Mutex<ConversionConfig>>,
    data_dir: PathBuf,
}

impl ConversionService {
    pub fn new(
        bridge: Arc<dyn PlatformBridge>,
        codec: Arc<dyn Base64Codec>,
        config: ConversionConfig,
        data_dir: PathBuf,
    ) -> Self {
        Self {
            bridge,
            codec,
            config: Arc::new(Mutex::new(config)),
            data_dir,
        }
    }

    /// Build the desktop service: data directory, persisted config, and a
    /// filesystem bridge rooted at the documents directory.
    #[cfg(not(any(target_os = "ios", target_os = "android")))]
    pub fn init() -> Self {
        let data_dir = super::data_dir::data_dir();
        let config = config_store::load_or_default(&data_dir);
        let documents = super::data_dir::documents_dir(&data_dir, &config);
        info!(
            data_dir = %data_dir.display(),
            documents = %documents.display(),
            "initialising conversion service"
        );

        let bridge: Arc<dyn PlatformBridge> = Arc::from(folio_bridge::platform_bridge(documents));
        Self::new(
            bridge,
            Arc::new(folio_bridge::StandardBase64),
            config,
            data_dir,
        )
    }

    pub fn platform_name(&self) -> &str {
        self.bridge.platform_name()
    }

    // -- Config --------------------------------------------------------------

    /// A snapshot of the current config.
    pub fn config(&self) -> ConversionConfig {
        self.config
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace and persist the config. Applies to the next conversion.
    pub fn save_config(&self, config: &ConversionConfig) -> Result<()> {
        *self.config.lock().unwrap_or_else(PoisonError::into_inner) = config.clone();
        config_store::persist_config(&self.data_dir, config)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    // -- Pipeline ------------------------------------------------------------

    /// Where the PDF for `source` will be written.
    pub fn destination_for(&self, source: &SourceFile) -> PathBuf {
        self.bridge.documents_root().join(source.pdf_file_name())
    }

    /// Show the picker, then convert whatever was picked.
    #[instrument(skip(self))]
    pub async fn pick_and_convert(&self) -> Result<ConversionOutcome> {
        let bridge = Arc::clone(&self.bridge);
        let picked = tokio::task::spawn_blocking(move || bridge.pick_file(PICKER_MIME_TYPES))
            .await
            .map_err(|err| FolioError::SourceUnreadable(format!("picker task failed: {err}")))??;
        self.convert(picked).await
    }

    /// Convert `source` and write the PDF to the documents root.
    ///
    /// `None` (the picker was cancelled) fails with `NoFileSelected`. On any
    /// failure nothing is written.
    pub async fn convert(&self, source: Option<SourceFile>) -> Result<ConversionOutcome> {
        let source = source.ok_or(FolioError::NoFileSelected)?;
        let service = self.clone();
        let result = tokio::task::spawn_blocking(move || service.convert_blocking(source))
            .await
            .map_err(|err| FolioError::Serialization(format!("conversion task failed: {err}")))
            .and_then(|result| result);

        if let Err(err) = &result {
            error!(error = %err, "conversion failed");
        }
        result
    }

    #[instrument(skip(self, source), fields(name = %source.display_name))]
    fn convert_blocking(&self, source: SourceFile) -> Result<ConversionOutcome> {
        let config = self.config();
        let converted_at = Utc::now();
        let pdf = Synthesizer::new(&*self.bridge, &*self.codec, &config)
            .synthesize_at(&source, converted_at)?;

        let pdf_path = self.destination_for(&source);
        let encoded = self.codec.encode(&pdf.bytes);
        self.bridge
            .write_bytes_base64(&pdf_path, &encoded)
            .map_err(|err| match err {
                FolioError::Persistence(_) => err,
                other => FolioError::Persistence(other.to_string()),
            })?;

        info!(
            path = %pdf_path.display(),
            pages = pdf.page_count,
            bytes = pdf.bytes.len(),
            "conversion complete"
        );
        Ok(ConversionOutcome {
            source,
            pdf_path,
            page_count: pdf.page_count,
            bytes_written: pdf.bytes.len(),
            converted_at,
        })
    }

    /// Hand a produced PDF to the platform's default viewer.
    pub async fn open_pdf(&self, path: PathBuf) -> Result<()> {
        let bridge = Arc::clone(&self.bridge);
        tokio::task::spawn_blocking(move || bridge.open_with_default(&path))
            .await
            .map_err(|err| FolioError::ViewerUnavailable(format!("viewer task failed: {err}")))?
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use folio_bridge::{FileSource, StandardBase64};
    use folio_core::FileProbe;

    use super::*;

    /// In-memory bridge: sources keyed by locator, written PDFs captured.
    #[derive(Default)]
    struct FakeBridge {
        sources: HashMap<String, Vec<u8>>,
        picked: Option<SourceFile>,
        written: Mutex<HashMap<PathBuf, Vec<u8>>>,
        fail_writes: bool,
        opened: Mutex<Vec<PathBuf>>,
    }

    impl FakeBridge {
        fn with_source(mut self, locator: &str, bytes: impl Into<Vec<u8>>) -> Self {
            self.sources.insert(locator.into(), bytes.into());
            self
        }

        fn written(&self) -> HashMap<PathBuf, Vec<u8>> {
            self.written.lock().unwrap().clone()
        }
    }

    impl PlatformBridge for FakeBridge {
        fn platform_name(&self) -> &str {
            "Fake"
        }
    }

    impl FileSource for FakeBridge {
        fn read_text(&self, locator: &str) -> Result<String> {
            let bytes = self
                .sources
                .get(locator)
                .ok_or_else(|| FolioError::SourceUnreadable(locator.into()))?;
            Ok(String::from_utf8_lossy(bytes).into_owned())
        }

        fn read_bytes_base64(&self, locator: &str) -> Result<String> {
            let bytes = self
                .sources
                .get(locator)
                .ok_or_else(|| FolioError::SourceUnreadable(locator.into()))?;
            Ok(StandardBase64.encode(bytes))
        }

        fn probe_exists(&self, locator: &str) -> Result<FileProbe> {
            Ok(self
                .sources
                .get(locator)
                .map(|b| FileProbe::found(b.len() as u64))
                .unwrap_or_default())
        }
    }

    impl FilePicker for FakeBridge {
        fn pick_file(&self, _mime_types: &[&str]) -> Result<Option<SourceFile>> {
            Ok(self.picked.clone())
        }
    }

    impl DocumentStore for FakeBridge {
        fn documents_root(&self) -> PathBuf {
            PathBuf::from("/docs")
        }

        fn write_bytes_base64(&self, destination: &Path, base64: &str) -> Result<()> {
            if self.fail_writes {
                return Err(FolioError::Io(std::io::Error::other("disk full")));
            }
            let bytes = StandardBase64.decode(base64)?;
            self.written
                .lock()
                .unwrap()
                .insert(destination.to_path_buf(), bytes);
            Ok(())
        }
    }

    impl ViewerLauncher for FakeBridge {
        fn open_with_default(&self, path: &Path) -> Result<()> {
            if !self.written.lock().unwrap().contains_key(path) {
                return Err(FolioError::ViewerUnavailable(path.display().to_string()));
            }
            self.opened.lock().unwrap().push(path.to_path_buf());
            Ok(())
        }
    }

    fn service(bridge: FakeBridge) -> (ConversionService, Arc<FakeBridge>, tempfile::TempDir) {
        let bridge = Arc::new(bridge);
        let tmp = tempfile::tempdir().unwrap();
        let service = ConversionService::new(
            bridge.clone(),
            Arc::new(StandardBase64),
            ConversionConfig::default(),
            tmp.path().to_path_buf(),
        );
        (service, bridge, tmp)
    }

    #[tokio::test]
    async fn converts_text_to_named_pdf() {
        let text: String = (1..=120).map(|i| format!("line {i}\n")).collect();
        let (service, bridge, _tmp) = service(FakeBridge::default().with_source("n", text));
        let source = SourceFile::new("n", "notes.txt", Some("text/plain".into()));

        let outcome = service.convert(Some(source)).await.unwrap();
        assert_eq!(outcome.pdf_path, PathBuf::from("/docs/notes.pdf"));
        assert_eq!(outcome.page_count, 3);

        let written = bridge.written();
        let bytes = &written[&outcome.pdf_path];
        assert!(bytes.starts_with(b"%PDF-"));
        assert_eq!(bytes.len(), outcome.bytes_written);
    }

    #[tokio::test]
    async fn no_selection_is_reported() {
        let (service, bridge, _tmp) = service(FakeBridge::default());
        let err = service.convert(None).await.unwrap_err();
        assert!(matches!(err, FolioError::NoFileSelected));
        assert!(bridge.written().is_empty());

        let err = service.pick_and_convert().await.unwrap_err();
        assert!(matches!(err, FolioError::NoFileSelected));
    }

    #[tokio::test]
    async fn picked_file_is_converted() {
        let bridge = FakeBridge {
            picked: Some(SourceFile::new("z", "archive.zip", Some("application/zip".into()))),
            ..FakeBridge::default()
        }
        .with_source("z", vec![0u8; 2048]);
        let (service, _bridge, _tmp) = service(bridge);

        let outcome = service.pick_and_convert().await.unwrap();
        assert_eq!(outcome.pdf_path, PathBuf::from("/docs/archive.pdf"));
        assert_eq!(outcome.page_count, 1);
    }

    #[tokio::test]
    async fn failed_synthesis_writes_nothing() {
        let (service, bridge, _tmp) =
            service(FakeBridge::default().with_source("g", b"GIF89a".to_vec()));
        let source = SourceFile::new("g", "anim.gif", Some("image/gif".into()));

        let err = service.convert(Some(source)).await.unwrap_err();
        assert!(matches!(err, FolioError::UnsupportedImageFormat(_)));
        assert!(bridge.written().is_empty());
    }

    #[tokio::test]
    async fn store_errors_become_persistence() {
        let bridge = FakeBridge {
            fail_writes: true,
            ..FakeBridge::default()
        }
        .with_source("a", "hello");
        let (service, _bridge, _tmp) = service(bridge);
        let source = SourceFile::new("a", "a.txt", Some("text/plain".into()));

        let err = service.convert(Some(source)).await.unwrap_err();
        assert!(matches!(err, FolioError::Persistence(_)));
    }

    #[tokio::test]
    async fn opens_written_pdf_and_rejects_missing() {
        let (service, bridge, _tmp) = service(FakeBridge::default().with_source("a", "hi"));
        let outcome = service
            .convert(Some(SourceFile::new("a", "a.txt", Some("text/plain".into()))))
            .await
            .unwrap();

        service.open_pdf(outcome.pdf_path.clone()).await.unwrap();
        assert_eq!(*bridge.opened.lock().unwrap(), [outcome.pdf_path]);

        let err = service
            .open_pdf(PathBuf::from("/docs/missing.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, FolioError::ViewerUnavailable(_)));
    }

    #[tokio::test]
    async fn saved_config_applies_to_next_conversion() {
        let (service, bridge, tmp) = service(FakeBridge::default().with_source("a", "hi"));
        let config = ConversionConfig {
            paper_size: folio_core::PaperSize::Letter,
            ..ConversionConfig::default()
        };
        service.save_config(&config).unwrap();

        assert_eq!(service.config(), config);
        assert_eq!(config_store::load_config(tmp.path()), Some(config));

        let outcome = service
            .convert(Some(SourceFile::new("a", "a.txt", Some("text/plain".into()))))
            .await
            .unwrap();
        let pdf = lopdf::Document::load_mem(&bridge.written()[&outcome.pdf_path]).unwrap();
        let pages = pdf.get_pages();
        let page = pdf.get_dictionary(pages[&1]).unwrap();
        let media_box: Vec<f32> = page
            .get(b"MediaBox")
            .and_then(lopdf::Object::as_array)
            .unwrap()
            .iter()
            .map(|value| value.as_float().unwrap())
            .collect();
        assert_eq!(media_box, [0.0, 0.0, 612.0, 792.0]);
    }

    #[tokio::test]
    async fn outcome_time_matches_the_details_page() {
        let (service, bridge, _tmp) =
            service(FakeBridge::default().with_source("z", vec![0u8; 512]));
        let source = SourceFile::new("z", "archive.zip", Some("application/zip".into()));

        let outcome = service.convert(Some(source)).await.unwrap();
        let pdf = lopdf::Document::load_mem(&bridge.written()[&outcome.pdf_path]).unwrap();
        let content = pdf.get_page_content(pdf.get_pages()[&1]).unwrap();
        let shown: Vec<Vec<u8>> = lopdf::content::Content::decode(&content)
            .unwrap()
            .operations
            .into_iter()
            .filter(|op| op.operator == "Tj")
            .map(|op| op.operands[0].as_str().unwrap().to_vec())
            .collect();

        let stamp = format!(
            "Converted: {}",
            outcome.converted_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        assert!(shown.iter().any(|line| line == stamp.as_bytes()));
    }
}
