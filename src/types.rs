use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// Landmarks por mano (convención del modelo de mano de MediaPipe)
pub const NUM_LANDMARKS: usize = 21;

/// Índices de landmarks usados por el clasificador
pub const WRIST: usize = 0;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LandmarkError {
    #[error("Número de landmarks inválido: se esperaban {expected}, llegaron {actual}")]
    WrongCount { expected: usize, actual: usize },
}

/// Un landmark de la mano en coordenadas normalizadas de imagen
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Landmark {
    /// X normalizada al ancho de la imagen (0.0 a 1.0)
    pub x: f32,
    /// Y normalizada al alto de la imagen (0.0 a 1.0)
    pub y: f32,
    /// Profundidad relativa a la muñeca
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Vector plano (x, y) desde `self` hasta `other`
    pub fn planar_delta(&self, other: &Landmark) -> (f32, f32) {
        (other.x - self.x, other.y - self.y)
    }

    /// Distancia euclídea en el plano de la imagen, ignorando z
    pub fn planar_distance(&self, other: &Landmark) -> f32 {
        let (dx, dy) = self.planar_delta(other);
        (dx * dx + dy * dy).sqrt()
    }
}

/// Esqueleto completo de una mano: exactamente 21 landmarks
#[derive(Debug, Clone, PartialEq)]
pub struct HandLandmarks {
    points: [Landmark; NUM_LANDMARKS],
}

impl HandLandmarks {
    pub fn new(points: [Landmark; NUM_LANDMARKS]) -> Self {
        Self { points }
    }

    /// Construye el esqueleto desde la salida cruda del detector.
    /// Falla si no hay exactamente 21 puntos.
    pub fn from_points(points: &[Landmark]) -> Result<Self, LandmarkError> {
        let points: [Landmark; NUM_LANDMARKS] =
            points.try_into().map_err(|_| LandmarkError::WrongCount {
                expected: NUM_LANDMARKS,
                actual: points.len(),
            })?;
        Ok(Self { points })
    }

    pub fn point(&self, idx: usize) -> &Landmark {
        &self.points[idx]
    }

    pub fn wrist(&self) -> &Landmark {
        &self.points[WRIST]
    }

    pub fn points(&self) -> &[Landmark; NUM_LANDMARKS] {
        &self.points
    }
}

/// Conjunto cerrado de gestos reconocibles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureLabel {
    Right,
    Left,
    TwoFingers,
    Ok,
    Palm,
    None,
}

impl GestureLabel {
    /// Todos los gestos reales (sin `None`), en orden de prioridad del clasificador
    pub const GESTURES: [GestureLabel; 5] = [
        GestureLabel::Right,
        GestureLabel::Left,
        GestureLabel::TwoFingers,
        GestureLabel::Ok,
        GestureLabel::Palm,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GestureLabel::Right => "right",
            GestureLabel::Left => "left",
            GestureLabel::TwoFingers => "two_fingers",
            GestureLabel::Ok => "ok",
            GestureLabel::Palm => "palm",
            GestureLabel::None => "none",
        }
    }

    /// Texto mostrado en pantalla por la aplicación
    pub fn display_text(self) -> &'static str {
        match self {
            GestureLabel::Right => "DREAPTA",
            GestureLabel::Left => "STANGA",
            GestureLabel::TwoFingers => "DOUA DEGETE",
            GestureLabel::Ok => "OK",
            GestureLabel::Palm => "PALMA",
            GestureLabel::None => "",
        }
    }

    pub fn is_none(self) -> bool {
        self == GestureLabel::None
    }
}

impl fmt::Display for GestureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Gesto desconocido: {0:?}")]
pub struct ParseLabelError(pub String);

impl FromStr for GestureLabel {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "right" => Ok(GestureLabel::Right),
            "left" => Ok(GestureLabel::Left),
            "two_fingers" => Ok(GestureLabel::TwoFingers),
            "ok" => Ok(GestureLabel::Ok),
            "palm" => Ok(GestureLabel::Palm),
            "none" => Ok(GestureLabel::None),
            other => Err(ParseLabelError(other.to_string())),
        }
    }
}

/// Resultado de un frame: gesto y confianza heurística
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Detection {
    pub label: GestureLabel,
    pub confidence: f32,
}

impl Detection {
    pub fn new(label: GestureLabel, confidence: f32) -> Self {
        Self { label, confidence }
    }

    /// "Sin gesto": etiqueta `None` con confianza 0
    pub fn none() -> Self {
        Self {
            label: GestureLabel::None,
            confidence: 0.0,
        }
    }

    pub fn is_gesture(&self) -> bool {
        !self.label.is_none()
    }
}

impl Default for Detection {
    fn default() -> Self {
        Self::none()
    }
}
