//! The profile header that hosts the drawing editor.
//!
//! The header shows the last flattened drawing and opens a [`Canvas`] on
//! demand. Saving exports the canvas, uploads the image, persists the vector
//! session and closes the editor. Cancelling discards whatever was drawn.

use artfolio_core::storage::{BlobStore, Storage, StorageError};
use artfolio_core::{Canvas, CanvasConfig, ExportError, SavedSession, SurfaceCapture};
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced by the header.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("The drawing editor is not open")]
    NotEditing,
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("Storage failed: {0}")]
    Storage(#[from] StorageError),
}

pub type HostResult<T> = Result<T, HostError>;

/// Profile header owning the saved drawing and the (optional) open editor.
pub struct WhiteboardHeader {
    config: CanvasConfig,
    session_id: String,
    header_height: Option<f64>,
    storage: Arc<dyn Storage>,
    blobs: Arc<dyn BlobStore>,
    surface: Arc<dyn SurfaceCapture>,
    drawing_uri: Option<String>,
    saved: SavedSession,
    editor: Option<Canvas>,
}

impl WhiteboardHeader {
    pub fn new(
        config: CanvasConfig,
        session_id: impl Into<String>,
        storage: Arc<dyn Storage>,
        blobs: Arc<dyn BlobStore>,
        surface: Arc<dyn SurfaceCapture>,
    ) -> Self {
        Self {
            config,
            session_id: session_id.into(),
            header_height: None,
            storage,
            blobs,
            surface,
            drawing_uri: None,
            saved: SavedSession::default(),
            editor: None,
        }
    }

    /// Clamp the editor surface to the header height.
    pub fn with_header_height(mut self, height: Option<f64>) -> Self {
        self.header_height = height;
        self
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Id the next [`Self::save`] writes under.
    pub fn set_session_id(&mut self, id: impl Into<String>) {
        self.session_id = id.into();
    }

    /// URI of the last saved flattened drawing.
    pub fn drawing_uri(&self) -> Option<&str> {
        self.drawing_uri.as_deref()
    }

    pub fn saved_session(&self) -> &SavedSession {
        &self.saved
    }

    pub fn is_editing(&self) -> bool {
        self.editor.is_some()
    }

    pub fn editor(&self) -> Option<&Canvas> {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut Canvas> {
        self.editor.as_mut()
    }

    /// Open the editor seeded with the saved session. Reopening returns the
    /// canvas that is already open.
    pub fn open_editor(&mut self) -> &mut Canvas {
        let config = &self.config;
        let saved = &self.saved;
        let height = self.header_height;
        self.editor.get_or_insert_with(|| {
            log::debug!(
                "Opening editor with {} strokes and {} stickers",
                saved.strokes.len(),
                saved.stickers.len()
            );
            Canvas::with_session(config.clone(), height, saved.clone())
        })
    }

    /// Export, upload and persist the open drawing, then close the editor.
    ///
    /// Returns the URI of the uploaded image. If the export fails the editor
    /// stays open so the user can retry or cancel.
    pub async fn save(&mut self) -> HostResult<String> {
        let canvas = self.editor.as_ref().ok_or(HostError::NotEditing)?;
        let snapshot = canvas.export_snapshot(self.surface.as_ref()).await?;

        let name = format!("{}.png", self.session_id);
        let uri = self.blobs.put(&name, &snapshot.image.data).await?;
        let session = SavedSession::from(&snapshot).with_drawing_uri(uri.clone());
        self.storage.save(&self.session_id, &session).await?;

        log::info!(
            "Saved drawing {:?} ({} strokes, {} stickers) to {}",
            self.session_id,
            session.strokes.len(),
            session.stickers.len(),
            uri
        );
        self.saved = session;
        self.drawing_uri = Some(uri.clone());
        self.editor = None;
        Ok(uri)
    }

    /// Close the editor, discarding everything drawn since it was opened.
    pub fn cancel(&mut self) {
        if let Some(mut canvas) = self.editor.take() {
            canvas.cancel();
            log::debug!("Editor cancelled for {:?}", self.session_id);
        }
    }

    /// Restore a previously saved session. Closes any open editor.
    pub async fn load(&mut self, id: &str) -> HostResult<()> {
        let session = self.storage.load(id).await?;
        log::info!(
            "Loaded session {:?} ({} strokes, {} stickers)",
            id,
            session.strokes.len(),
            session.stickers.len()
        );
        self.session_id = id.to_string();
        self.drawing_uri = session.drawing_uri.clone();
        self.saved = session;
        self.editor = None;
        Ok(())
    }
}
