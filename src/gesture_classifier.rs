use crate::config::DetectorConfig;
use crate::finger::{normalize_planar, FingerStates};
use crate::types::{Detection, GestureLabel, HandLandmarks, Landmark, INDEX_TIP, THUMB_TIP};

/// Confianzas fijas por regla (heurísticas, no probabilidades)
pub const POINTING_CONFIDENCE: f32 = 0.85;
pub const TWO_FINGERS_CONFIDENCE: f32 = 0.9;
pub const OK_CONFIDENCE: f32 = 0.85;
pub const PALM_CONFIDENCE: f32 = 0.9;

/// Clasificador por reglas sobre la geometría de los landmarks.
///
/// Las reglas se evalúan en orden fijo y gana la primera que coincide:
/// señalar derecha, señalar izquierda, dos dedos, OK, palma. OK va antes que
/// palma: una palma abierta con pulgar e índice juntos se reporta como OK.
#[derive(Debug, Clone, Default)]
pub struct GestureClassifier {
    config: DetectorConfig,
}

impl GestureClassifier {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Clasifica la salida cruda del detector de landmarks.
    /// Cualquier número de puntos distinto de 21 se trata como "sin gesto".
    pub fn classify_points(&self, points: &[Landmark]) -> Detection {
        match HandLandmarks::from_points(points) {
            Ok(hand) => self.classify(&hand),
            Err(e) => {
                log::trace!("Landmarks descartados: {}", e);
                Detection::none()
            }
        }
    }

    pub fn classify(&self, hand: &HandLandmarks) -> Detection {
        let fingers = FingerStates::measure(hand, &self.config);
        let (dir_x, _) = normalize_planar(hand.wrist().planar_delta(hand.point(INDEX_TIP)));

        let index_only = fingers.index && !fingers.middle && !fingers.ring && !fingers.pinky;

        if index_only && dir_x > self.config.pointing_min_x {
            return Detection::new(GestureLabel::Right, POINTING_CONFIDENCE);
        }

        if index_only && dir_x < -self.config.pointing_min_x {
            return Detection::new(GestureLabel::Left, POINTING_CONFIDENCE);
        }

        // Signo de paz: el pulgar no importa
        if fingers.index && fingers.middle && !fingers.ring && !fingers.pinky {
            return Detection::new(GestureLabel::TwoFingers, TWO_FINGERS_CONFIDENCE);
        }

        if fingers.middle && fingers.ring && fingers.pinky {
            let touch = hand.point(THUMB_TIP).planar_distance(hand.point(INDEX_TIP));
            if touch < self.config.ok_touch_distance {
                return Detection::new(GestureLabel::Ok, OK_CONFIDENCE);
            }
        }

        if fingers.all_extended() {
            return Detection::new(GestureLabel::Palm, PALM_CONFIDENCE);
        }

        Detection::none()
    }
}
