//! Fuentes de landmarks.
//!
//! La estimación de pose (cámara + modelo de mano) vive fuera de este crate;
//! aquí solo se define la interfaz y una fuente que reproduce grabaciones.

use std::path::Path;

use anyhow::{anyhow, Result};

use crate::csv_loader::{load_recording, RecordedFrame};
use crate::types::Landmark;

/// Cualquier cosa que, dado un frame, devuelve como mucho una mano.
///
/// Devuelve los puntos crudos del detector: normalmente 21, pero el
/// clasificador tolera cualquier otra cantidad tratándola como "sin gesto".
pub trait LandmarkProvider {
    type Frame;

    fn detect(&mut self, frame: &Self::Frame) -> Result<Option<Vec<Landmark>>>;
}

/// Reproduce una grabación de landmarks; el "frame" es la posición en la grabación
#[derive(Debug, Clone)]
pub struct RecordingProvider {
    frames: Vec<RecordedFrame>,
}

impl RecordingProvider {
    pub fn new(frames: Vec<RecordedFrame>) -> Self {
        Self { frames }
    }

    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(load_recording(path)?))
    }

    pub fn frames(&self) -> &[RecordedFrame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl LandmarkProvider for RecordingProvider {
    type Frame = usize;

    fn detect(&mut self, frame: &usize) -> Result<Option<Vec<Landmark>>> {
        self.frames
            .get(*frame)
            .map(|f| f.points.clone())
            .ok_or_else(|| anyhow!("Frame {} fuera de la grabación ({} frames)", frame, self.frames.len()))
    }
}
