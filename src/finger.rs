//! Geometría de dedos: decide si cada dedo está extendido o plegado.
//!
//! Todas las medidas son planas (x, y); la profundidad del detector es
//! demasiado ruidosa para este test.

use crate::config::DetectorConfig;
use crate::types::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

/// Índices de landmarks de un dedo: punta, articulación media y base
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FingerJoints {
    pub tip: usize,
    pub mid: usize,
    pub base: usize,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    pub fn joints(self) -> FingerJoints {
        let (tip, mid, base) = match self {
            Finger::Thumb => (THUMB_TIP, THUMB_IP, THUMB_MCP),
            Finger::Index => (INDEX_TIP, INDEX_DIP, INDEX_MCP),
            Finger::Middle => (MIDDLE_TIP, MIDDLE_DIP, MIDDLE_MCP),
            Finger::Ring => (RING_TIP, RING_DIP, RING_MCP),
            Finger::Pinky => (PINKY_TIP, PINKY_DIP, PINKY_MCP),
        };
        FingerJoints { tip, mid, base }
    }

    pub fn from_tip(tip: usize) -> Option<Finger> {
        Finger::ALL.into_iter().find(|f| f.joints().tip == tip)
    }
}

/// Normaliza un vector plano. Un vector de longitud cero se devuelve tal cual.
pub fn normalize_planar(v: (f32, f32)) -> (f32, f32) {
    let norm = (v.0 * v.0 + v.1 * v.1).sqrt();
    if norm > 0.0 {
        (v.0 / norm, v.1 / norm)
    } else {
        v
    }
}

fn dot(a: (f32, f32), b: (f32, f32)) -> f32 {
    a.0 * b.0 + a.1 * b.1
}

/// Test de extensión para el dedo cuya punta es `tip_idx`.
///
/// Dos criterios, ambos obligatorios:
/// * distancia: |punta - muñeca| > ratio * |media - muñeca|
/// * dirección: unit(base - muñeca) · unit(punta - base) > alineación mínima
///
/// Una punta fuera de la tabla de dedos nunca está extendida.
pub fn is_finger_extended(hand: &HandLandmarks, tip_idx: usize, config: &DetectorConfig) -> bool {
    let Some(finger) = Finger::from_tip(tip_idx) else {
        return false;
    };
    let joints = finger.joints();

    let wrist = hand.wrist();
    let tip = hand.point(joints.tip);
    let mid = hand.point(joints.mid);
    let base = hand.point(joints.base);

    let tip_to_wrist = tip.planar_distance(wrist);
    let mid_to_wrist = mid.planar_distance(wrist);
    let distance_ok = tip_to_wrist > mid_to_wrist * config.extension_distance_ratio;

    let wrist_to_base = normalize_planar(wrist.planar_delta(base));
    let base_to_tip = normalize_planar(base.planar_delta(tip));
    let direction_ok = dot(wrist_to_base, base_to_tip) > config.extension_min_alignment;

    distance_ok && direction_ok
}

/// Estado extendido/plegado de los cinco dedos de una mano
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FingerStates {
    pub thumb: bool,
    pub index: bool,
    pub middle: bool,
    pub ring: bool,
    pub pinky: bool,
}

impl FingerStates {
    pub fn measure(hand: &HandLandmarks, config: &DetectorConfig) -> Self {
        let ext = |finger: Finger| is_finger_extended(hand, finger.joints().tip, config);
        Self {
            thumb: ext(Finger::Thumb),
            index: ext(Finger::Index),
            middle: ext(Finger::Middle),
            ring: ext(Finger::Ring),
            pinky: ext(Finger::Pinky),
        }
    }

    pub fn get(&self, finger: Finger) -> bool {
        match finger {
            Finger::Thumb => self.thumb,
            Finger::Index => self.index,
            Finger::Middle => self.middle,
            Finger::Ring => self.ring,
            Finger::Pinky => self.pinky,
        }
    }

    pub fn all_extended(&self) -> bool {
        Finger::ALL.into_iter().all(|f| self.get(f))
    }

    /// Representación compacta para diagnóstico, p.ej. "T I - - -"
    pub fn to_flags(&self) -> String {
        Finger::ALL
            .into_iter()
            .zip(["T", "I", "M", "R", "P"])
            .map(|(f, c)| if self.get(f) { c } else { "-" })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Mano apoyada con la muñeca en (0.5, 0.9) y los dedos hacia arriba.
    /// `extended` decide, por dedo, si la punta sigue hacia fuera o se
    /// pliega de vuelta hacia la palma.
    pub fn hand_with(extended: [bool; 5]) -> HandLandmarks {
        let mut points = [Landmark::default(); NUM_LANDMARKS];
        let wrist = Landmark::new(0.5, 0.9, 0.0);
        points[WRIST] = wrist;

        // Dirección de cada dedo en el plano (muñeca → base)
        let dirs: [(f32, f32); 5] = [
            normalize_planar((-0.8, -0.6)),
            normalize_planar((-0.25, -1.0)),
            (0.0, -1.0),
            normalize_planar((0.2, -1.0)),
            normalize_planar((0.4, -1.0)),
        ];

        for (finger, (dx, dy)) in Finger::ALL.into_iter().zip(dirs) {
            let j = finger.joints();
            let at = |d: f32, z: f32| Landmark::new(wrist.x + dx * d, wrist.y + dy * d, z);
            points[j.base] = at(0.2, 0.0);
            if extended[finger as usize] {
                points[j.base + 1] = at(0.27, 0.0);
                points[j.mid] = at(0.33, 0.0);
                points[j.tip] = at(0.38, 0.0);
            } else {
                // Plegado: la punta vuelve hacia la muñeca
                points[j.base + 1] = at(0.25, 0.0);
                points[j.mid] = at(0.2, 0.0);
                points[j.tip] = at(0.12, 0.0);
            }
        }
        // El pulgar tiene CMC en 1; lo colocamos entre la muñeca y su base
        points[1] = Landmark::new(wrist.x + dirs[0].0 * 0.1, wrist.y + dirs[0].1 * 0.1, 0.0);

        HandLandmarks::new(points)
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::hand_with;
    use super::*;

    #[test]
    fn table_matches_landmark_convention() {
        assert_eq!(
            Finger::Index.joints(),
            FingerJoints {
                tip: 8,
                mid: 7,
                base: 5
            }
        );
        assert_eq!(
            Finger::Thumb.joints(),
            FingerJoints {
                tip: 4,
                mid: 3,
                base: 2
            }
        );
        assert_eq!(Finger::from_tip(20), Some(Finger::Pinky));
        assert_eq!(Finger::from_tip(6), None);
    }

    #[test]
    fn straight_and_folded_fingers() {
        let cfg = DetectorConfig::default();
        let hand = hand_with([true, false, true, false, true]);
        let states = FingerStates::measure(&hand, &cfg);
        assert_eq!(
            states,
            FingerStates {
                thumb: true,
                index: false,
                middle: true,
                ring: false,
                pinky: true
            }
        );
        assert!(!states.all_extended());
        assert_eq!(states.to_flags(), "T - M - P");
    }

    #[test]
    fn unknown_tip_is_never_extended() {
        let cfg = DetectorConfig::default();
        let hand = hand_with([true; 5]);
        assert!(!is_finger_extended(&hand, 6, &cfg));
        assert!(!is_finger_extended(&hand, 99, &cfg));
    }

    #[test]
    fn degenerate_hand_is_not_extended() {
        // Todos los puntos coinciden: vectores nulos, sin división por cero
        let hand = HandLandmarks::new([Landmark::new(0.5, 0.5, 0.0); NUM_LANDMARKS]);
        let states = FingerStates::measure(&hand, &DetectorConfig::default());
        assert_eq!(states, FingerStates::default());
    }

    #[test]
    fn zero_vector_stays_zero() {
        assert_eq!(normalize_planar((0.0, 0.0)), (0.0, 0.0));
        let (x, y) = normalize_planar((3.0, 4.0));
        assert!((x - 0.6).abs() < 1e-6 && (y - 0.8).abs() < 1e-6);
    }

    #[test]
    fn pushing_tip_outward_keeps_finger_extended() {
        let cfg = DetectorConfig::default();
        let hand = hand_with([true; 5]);
        for finger in Finger::ALL {
            let j = finger.joints();
            assert!(is_finger_extended(&hand, j.tip, &cfg));

            let base = *hand.point(j.base);
            let dir = normalize_planar(base.planar_delta(hand.point(j.tip)));
            for step in 1..=10 {
                let mut points = *hand.points();
                let s = step as f32 * 0.05;
                points[j.tip].x += dir.0 * s;
                points[j.tip].y += dir.1 * s;
                let moved = HandLandmarks::new(points);
                assert!(
                    is_finger_extended(&moved, j.tip, &cfg),
                    "{:?} dejó de estar extendido tras mover {}",
                    finger,
                    s
                );
            }
        }
    }

    #[test]
    fn slightly_bent_finger_still_counts() {
        // Punta apenas más cerca que la articulación media: dentro del 10%
        let cfg = DetectorConfig::default();
        let mut points = *hand_with([true; 5]).points();
        let j = Finger::Middle.joints();
        points[j.tip] = Landmark::new(0.5, 0.9 - 0.31, 0.0);
        let hand = HandLandmarks::new(points);
        assert!(is_finger_extended(&hand, j.tip, &cfg));
    }
}
