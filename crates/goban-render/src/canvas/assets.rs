//! Image assets loaded asynchronously for the raster backend.
//!
//! A board asks the [`AssetStore`] for an image by path every time it paints.
//! The first request starts a load through the [`AssetLoader`]; until the
//! result is delivered the asset stays `Pending` and painters fall back to
//! something they can draw right away.

use peniko::{Blob, ImageAlphaType, ImageData, ImageFormat};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};
use thiserror::Error;

/// Asset loading errors.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: String,
        source: image::ImageError,
    },
}

/// Result type for asset operations.
pub type AssetResult<T> = Result<T, AssetError>;

/// A decoded RGBA8 image.
#[derive(Clone)]
pub struct ImageAsset {
    data: ImageData,
}

impl ImageAsset {
    /// Wrap raw RGBA8 pixels (straight alpha).
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            data: ImageData {
                data: Blob::new(Arc::new(pixels)),
                format: ImageFormat::Rgba8,
                width,
                height,
                alpha_type: ImageAlphaType::Alpha,
            },
        }
    }

    /// Decode PNG, JPEG or WebP bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, image::ImageError> {
        let rgba = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self::from_rgba8(width, height, rgba.into_vec()))
    }

    pub fn width(&self) -> u32 {
        self.data.width
    }

    pub fn height(&self) -> u32 {
        self.data.height
    }

    pub fn image_data(&self) -> &ImageData {
        &self.data
    }
}

impl fmt::Debug for ImageAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageAsset")
            .field("width", &self.data.width)
            .field("height", &self.data.height)
            .finish()
    }
}

/// Load state of one asset path.
#[derive(Debug, Clone)]
pub enum AssetState {
    Pending,
    Ready(ImageAsset),
    Failed,
}

impl AssetState {
    pub fn ready(&self) -> Option<&ImageAsset> {
        match self {
            AssetState::Ready(image) => Some(image),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, AssetState::Pending)
    }
}

/// A finished load.
#[derive(Debug)]
pub struct AssetEvent {
    pub path: String,
    pub result: AssetResult<ImageAsset>,
}

/// Source of asset bytes.
///
/// `begin` must not block; results are handed back through `poll`, which the
/// board calls from its own thread.
pub trait AssetLoader {
    fn begin(&mut self, path: &str);

    fn poll(&mut self) -> Vec<AssetEvent>;
}

/// Loader that never completes; assets stay pending until
/// [`AssetStore::complete`] is called by the host.
#[derive(Debug, Default)]
pub struct ManualLoader {
    requested: Vec<String>,
}

impl ManualLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths requested so far.
    pub fn requested(&self) -> &[String] {
        &self.requested
    }
}

impl AssetLoader for ManualLoader {
    fn begin(&mut self, path: &str) {
        self.requested.push(path.to_string());
    }

    fn poll(&mut self) -> Vec<AssetEvent> {
        Vec::new()
    }
}

/// Reads and decodes files on worker threads.
pub struct FileLoader {
    root: PathBuf,
    sender: Sender<AssetEvent>,
    receiver: Receiver<AssetEvent>,
}

impl FileLoader {
    /// Loader resolving asset paths relative to `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let (sender, receiver) = channel();
        Self {
            root: root.into(),
            sender,
            receiver,
        }
    }
}

impl Default for FileLoader {
    fn default() -> Self {
        Self::new(".")
    }
}

impl AssetLoader for FileLoader {
    fn begin(&mut self, path: &str) {
        let sender = self.sender.clone();
        let file = self.root.join(path);
        let path = path.to_string();
        std::thread::spawn(move || {
            let result = load_file(&path, &file);
            if sender.send(AssetEvent { path, result }).is_err() {
                log::debug!("asset {} finished after its board was dropped", file.display());
            }
        });
    }

    fn poll(&mut self) -> Vec<AssetEvent> {
        self.receiver.try_iter().collect()
    }
}

fn load_file(path: &str, file: &std::path::Path) -> AssetResult<ImageAsset> {
    let bytes = std::fs::read(file).map_err(|source| AssetError::Io {
        path: path.to_string(),
        source,
    })?;
    ImageAsset::decode(&bytes).map_err(|source| AssetError::Decode {
        path: path.to_string(),
        source,
    })
}

/// Per-board cache of asset states.
pub struct AssetStore {
    loader: Box<dyn AssetLoader>,
    states: HashMap<String, AssetState>,
}

impl AssetStore {
    pub fn new(loader: Box<dyn AssetLoader>) -> Self {
        Self {
            loader,
            states: HashMap::new(),
        }
    }

    /// State of `path`, starting a load on first reference.
    pub fn request(&mut self, path: &str) -> &AssetState {
        if !self.states.contains_key(path) {
            log::debug!("loading asset {}", path);
            self.loader.begin(path);
        }
        self.states
            .entry(path.to_string())
            .or_insert(AssetState::Pending)
    }

    /// Ready image for `path`, if loaded. Starts the load when needed.
    pub fn image(&mut self, path: &str) -> Option<ImageAsset> {
        self.request(path).ready().cloned()
    }

    /// Record a finished load. Returns true when the asset became ready.
    pub fn complete(&mut self, path: &str, result: AssetResult<ImageAsset>) -> bool {
        let state = match result {
            Ok(image) => AssetState::Ready(image),
            Err(err) => {
                log::warn!("{}", err);
                AssetState::Failed
            }
        };
        let ready = matches!(state, AssetState::Ready(_));
        self.states.insert(path.to_string(), state);
        ready
    }

    /// Drain loads finished since the last poll.
    pub fn poll_loader(&mut self) -> Vec<AssetEvent> {
        self.loader.poll()
    }

    pub fn state(&self, path: &str) -> Option<&AssetState> {
        self.states.get(path)
    }

    pub fn pending_count(&self) -> usize {
        self.states.values().filter(|state| state.is_pending()).count()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl fmt::Debug for AssetStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetStore")
            .field("assets", &self.states.len())
            .field("pending", &self.pending_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn pixel() -> ImageAsset {
        ImageAsset::from_rgba8(1, 1, vec![0, 0, 0, 255])
    }

    #[test]
    fn test_request_begins_load_once() {
        let mut store = AssetStore::new(Box::new(ManualLoader::new()));
        assert!(store.request("a.png").is_pending());
        assert!(store.request("a.png").is_pending());
        assert_eq!(store.pending_count(), 1);
        assert!(store.image("a.png").is_none());

        assert!(store.complete("a.png", Ok(pixel())));
        assert_eq!(store.image("a.png").map(|image| image.width()), Some(1));
        assert_eq!(store.pending_count(), 0);
    }

    #[test]
    fn test_failed_load() {
        let mut store = AssetStore::new(Box::new(ManualLoader::new()));
        store.request("missing.png");
        let err = AssetError::Io {
            path: "missing.png".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(!store.complete("missing.png", Err(err)));
        assert!(matches!(store.state("missing.png"), Some(AssetState::Failed)));
        // Failed assets are not retried.
        assert!(store.image("missing.png").is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_file_loader_decodes_png() {
        let dir = tempfile::tempdir().unwrap();
        image::RgbaImage::from_pixel(3, 2, image::Rgba([255, 0, 0, 255]))
            .save(dir.path().join("stone.png"))
            .unwrap();

        let mut loader = FileLoader::new(dir.path());
        loader.begin("stone.png");
        loader.begin("nothing.png");

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut events = Vec::new();
        while events.len() < 2 && Instant::now() < deadline {
            events.extend(loader.poll());
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(events.len(), 2);

        for event in events {
            match event.path.as_str() {
                "stone.png" => {
                    let image = event.result.unwrap();
                    assert_eq!((image.width(), image.height()), (3, 2));
                    assert_eq!(&image.image_data().data.data()[..4], &[255, 0, 0, 255]);
                }
                _ => assert!(matches!(event.result, Err(AssetError::Io { .. }))),
            }
        }
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(ImageAsset::decode(b"not an image").is_err());
    }
}
