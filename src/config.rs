use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Valor inválido para {field}: {value}")]
    InvalidValue { field: &'static str, value: f64 },
}

/// Parámetros del detector de gestos.
///
/// Los valores por defecto reproducen los umbrales calibrados a mano de la
/// aplicación de escritorio; cualquier campo ausente en el JSON toma su default.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Ventana mínima entre dos gestos aceptados, en segundos (default: 0.8)
    pub cooldown_secs: f64,
    /// La punta debe estar más lejos de la muñeca que este factor por la
    /// distancia de la articulación media (default: 0.9)
    pub extension_distance_ratio: f32,
    /// Producto escalar mínimo entre muñeca→base y base→punta (default: 0.3)
    pub extension_min_alignment: f32,
    /// |x| mínima de la dirección muñeca→índice para señalar (default: 0.5)
    pub pointing_min_x: f32,
    /// Distancia máxima pulgar-índice para el gesto OK (default: 0.08)
    pub ok_touch_distance: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: 0.8,
            extension_distance_ratio: 0.9,
            extension_min_alignment: 0.3,
            pointing_min_x: 0.5,
            ok_touch_distance: 0.08,
        }
    }
}

impl DetectorConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: DetectorConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("cooldown_secs", self.cooldown_secs),
            ("extension_distance_ratio", self.extension_distance_ratio as f64),
            ("ok_touch_distance", self.ok_touch_distance as f64),
            ("pointing_min_x", self.pointing_min_x as f64),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue { field, value });
            }
        }
        // Finito no basta: tiene que caber en un Duration
        if Duration::try_from_secs_f64(self.cooldown_secs).is_err() {
            return Err(ConfigError::InvalidValue {
                field: "cooldown_secs",
                value: self.cooldown_secs,
            });
        }
        // El umbral de alineación es un coseno
        if !(-1.0..=1.0).contains(&self.extension_min_alignment) {
            return Err(ConfigError::InvalidValue {
                field: "extension_min_alignment",
                value: self.extension_min_alignment as f64,
            });
        }
        Ok(())
    }

    /// Ventana de cooldown. Sobre una configuración sin validar, un valor
    /// negativo o NaN da cero y uno demasiado grande satura a `Duration::MAX`.
    pub fn cooldown(&self) -> Duration {
        Duration::try_from_secs_f64(self.cooldown_secs.max(0.0)).unwrap_or(Duration::MAX)
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown_secs = cooldown.as_secs_f64();
        self
    }
}
