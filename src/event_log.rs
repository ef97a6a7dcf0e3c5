use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local};
use thiserror::Error;

use crate::types::{Detection, GestureLabel};

pub const LOG_HEADER: [&str; 4] = ["Timestamp", "Gesture", "Confidence", "Success"];
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

#[derive(Error, Debug)]
pub enum EventLogError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

/// Registro de un gesto aceptado
#[derive(Debug, Clone, PartialEq)]
pub struct GestureLogEntry {
    pub timestamp: DateTime<Local>,
    pub label: GestureLabel,
    pub confidence: f32,
    pub success: bool,
}

impl GestureLogEntry {
    /// Entrada para una emisión aceptada, fechada ahora
    pub fn accepted(detection: Detection) -> Self {
        Self {
            timestamp: Local::now(),
            label: detection.label,
            confidence: detection.confidence,
            success: true,
        }
    }

    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Destino de los gestos emitidos. Solo recibe emisiones aceptadas.
pub trait GestureLogSink: Send {
    fn record(&mut self, entry: &GestureLogEntry) -> Result<(), EventLogError>;
}

/// Log CSV: Timestamp,Gesture,Confidence,Success
pub struct CsvGestureLog<W: Write> {
    writer: csv::Writer<W>,
}

impl CsvGestureLog<File> {
    /// Crea (o trunca) el fichero de log y escribe el encabezado
    pub fn create(path: impl AsRef<Path>) -> Result<Self, EventLogError> {
        let file = File::create(path)?;
        Self::new(file)
    }
}

impl<W: Write> CsvGestureLog<W> {
    pub fn new(inner: W) -> Result<Self, EventLogError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(inner);
        writer.write_record(LOG_HEADER)?;
        writer.flush()?;
        Ok(Self { writer })
    }

    pub fn into_inner(self) -> Result<W, EventLogError> {
        self.writer
            .into_inner()
            .map_err(|e| EventLogError::IoError(io::Error::new(io::ErrorKind::Other, e.to_string())))
    }
}

impl<W: Write + Send> GestureLogSink for CsvGestureLog<W> {
    fn record(&mut self, entry: &GestureLogEntry) -> Result<(), EventLogError> {
        self.writer.write_record([
            entry.formatted_timestamp(),
            entry.label.as_str().to_string(),
            entry.confidence.to_string(),
            entry.success.to_string(),
        ])?;
        // Un registro por línea visible en disco aunque el proceso muera
        self.writer.flush()?;
        Ok(())
    }
}

/// Log en memoria. Los clones comparten el mismo vector, así que se puede
/// inspeccionar después de entregar el sink al detector.
#[derive(Debug, Clone, Default)]
pub struct MemoryGestureLog {
    entries: Arc<Mutex<Vec<GestureLogEntry>>>,
}

impl MemoryGestureLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<GestureLogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl GestureLogSink for MemoryGestureLog {
    fn record(&mut self, entry: &GestureLogEntry) -> Result<(), EventLogError> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(entry.clone());
        Ok(())
    }
}
