//! Reconocimiento de gestos de mano a partir de los 21 landmarks del modelo
//! de mano: test de extensión de dedos, clasificación por reglas, cooldown
//! global entre gestos y registro de los gestos aceptados.

pub mod config;
pub mod cooldown;
pub mod csv_loader;
pub mod detector;
pub mod event_log;
pub mod finger;
pub mod gesture_classifier;
pub mod provider;
pub mod stats;
pub mod types;

pub use config::DetectorConfig;
pub use detector::GestureDetector;
pub use types::{Detection, GestureLabel, HandLandmarks, Landmark};
