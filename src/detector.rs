use std::time::{Duration, Instant};

use crate::config::DetectorConfig;
use crate::cooldown::{CooldownGate, GateDecision};
use crate::event_log::{GestureLogEntry, GestureLogSink};
use crate::gesture_classifier::GestureClassifier;
use crate::provider::LandmarkProvider;
use crate::stats::GestureStats;
use crate::types::{Detection, GestureLabel, HandLandmarks, Landmark};

/// Clasificador + compuerta de cooldown + registro de eventos.
///
/// Cada instancia tiene su propia ventana de cooldown; dos detectores (p.ej.
/// dos cámaras) no se suprimen entre sí. No es `Sync`: lo debe poseer un
/// único hilo, que es quien recibe los frames.
pub struct GestureDetector {
    classifier: GestureClassifier,
    gate: CooldownGate,
    sink: Option<Box<dyn GestureLogSink>>,
    stats: GestureStats,
}

impl GestureDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            gate: CooldownGate::new(config.cooldown()),
            classifier: GestureClassifier::new(config),
            sink: None,
            stats: GestureStats::new(),
        }
    }

    pub fn with_sink(mut self, sink: Box<dyn GestureLogSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn set_sink(&mut self, sink: Box<dyn GestureLogSink>) {
        self.sink = Some(sink);
    }

    /// Clasifica un frame. Sin mano → "sin gesto".
    pub fn classify(&mut self, landmarks: Option<&HandLandmarks>, now: Instant) -> Detection {
        self.decide(landmarks, now).output()
    }

    /// Igual que [`classify`](Self::classify) pero con los puntos crudos del
    /// detector; una cantidad distinta de 21 se trata como "sin gesto".
    pub fn classify_points(&mut self, points: Option<&[Landmark]>, now: Instant) -> Detection {
        self.decide_points(points, now).output()
    }

    /// Consulta al proveedor y clasifica. Un error del proveedor se registra
    /// y cuenta como frame sin mano.
    pub fn process<P: LandmarkProvider>(
        &mut self,
        provider: &mut P,
        frame: &P::Frame,
        now: Instant,
    ) -> Detection {
        match provider.detect(frame) {
            Ok(points) => self.classify_points(points.as_deref(), now),
            Err(e) => {
                log::warn!("Error del proveedor de landmarks: {:#}", e);
                self.decide_points(None, now).output()
            }
        }
    }

    /// Decisión completa de la compuerta, incluida la supresión (para diagnóstico)
    pub fn decide(&mut self, landmarks: Option<&HandLandmarks>, now: Instant) -> GateDecision {
        let raw = match landmarks {
            Some(hand) => self.classifier.classify(hand),
            None => Detection::none(),
        };
        self.gate_raw(landmarks.is_some(), raw, now)
    }

    pub fn decide_points(&mut self, points: Option<&[Landmark]>, now: Instant) -> GateDecision {
        let raw = match points {
            Some(points) => self.classifier.classify_points(points),
            None => Detection::none(),
        };
        self.gate_raw(points.is_some(), raw, now)
    }

    fn gate_raw(&mut self, hand_present: bool, raw: Detection, now: Instant) -> GateDecision {
        log::trace!("Clasificación cruda: {} ({:.2})", raw.label, raw.confidence);
        let decision = self.gate.decide(raw, now);
        self.stats.observe(hand_present, &decision);

        if let GateDecision::Emitted(det) = decision {
            if let Some(sink) = self.sink.as_mut() {
                if let Err(e) = sink.record(&GestureLogEntry::accepted(det)) {
                    log::warn!("No se pudo registrar el gesto {}: {}", det.label, e);
                }
            }
        }

        decision
    }

    pub fn last_label(&self) -> Option<GestureLabel> {
        self.gate.last_label()
    }

    pub fn cooldown(&self) -> Duration {
        self.gate.cooldown()
    }

    pub fn classifier(&self) -> &GestureClassifier {
        &self.classifier
    }

    pub fn stats(&self) -> &GestureStats {
        &self.stats
    }
}

impl Default for GestureDetector {
    fn default() -> Self {
        Self::new(DetectorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv_loader::RecordedFrame;
    use crate::event_log::{EventLogError, MemoryGestureLog};
    use crate::finger::fixtures::hand_with;
    use crate::gesture_classifier::fixtures::{ok_hand, pointing_hand};
    use crate::provider::RecordingProvider;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn detector_with_log() -> (GestureDetector, MemoryGestureLog) {
        let log = MemoryGestureLog::new();
        let detector = GestureDetector::default().with_sink(Box::new(log.clone()));
        (detector, log)
    }

    #[test]
    fn no_hand_is_no_gesture_and_not_logged() {
        let (mut detector, log) = detector_with_log();
        let det = detector.classify(None, Instant::now());
        assert_eq!(det, Detection::none());
        assert!(log.is_empty());
        assert_eq!(detector.last_label(), None);
    }

    #[test]
    fn palm_is_emitted_and_logged() {
        let (mut detector, log) = detector_with_log();
        let det = detector.classify(Some(&hand_with([true; 5])), Instant::now());
        assert_eq!(det, Detection::new(GestureLabel::Palm, 0.9));

        let entries = log.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].label, GestureLabel::Palm);
        assert_eq!(entries[0].confidence, 0.9);
        assert!(entries[0].success);
    }

    #[test]
    fn switching_gesture_inside_window_is_suppressed() {
        let (mut detector, log) = detector_with_log();
        let t0 = Instant::now();
        detector.classify(Some(&hand_with([true; 5])), t0);

        let det = detector.classify(Some(&ok_hand(0.05)), t0 + ms(400));
        assert_eq!(det, Detection::none());
        assert_eq!(log.len(), 1);
        assert_eq!(detector.last_label(), Some(GestureLabel::Palm));

        let det = detector.classify(Some(&ok_hand(0.05)), t0 + ms(850));
        assert_eq!(det.label, GestureLabel::Ok);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn held_pose_fires_once_per_window() {
        let (mut detector, log) = detector_with_log();
        let hand = pointing_hand((0.9, 0.1));
        let t0 = Instant::now();
        // 2 segundos a 30 fps
        let emitted = (0..60u64)
            .filter(|i| detector.classify(Some(&hand), t0 + ms(i * 33)).is_gesture())
            .count();
        assert_eq!(emitted, 3);
        assert_eq!(log.len(), 3);
        assert_eq!(detector.stats().count(GestureLabel::Right), 3);
    }

    #[test]
    fn fresh_detectors_agree() {
        let hand = hand_with([false, true, true, false, false]);
        let now = Instant::now();
        let a = GestureDetector::default().classify(Some(&hand), now);
        let b = GestureDetector::default().classify(Some(&hand), now);
        assert_eq!(a, b);
        assert_eq!(a.label, GestureLabel::TwoFingers);
    }

    #[test]
    fn independent_detectors_do_not_share_cooldown() {
        let hand = hand_with([true; 5]);
        let t0 = Instant::now();
        let mut cam_a = GestureDetector::default();
        let mut cam_b = GestureDetector::default();
        assert!(cam_a.classify(Some(&hand), t0).is_gesture());
        assert!(cam_b.classify(Some(&hand), t0 + ms(100)).is_gesture());
    }

    #[test]
    fn malformed_points_do_not_emit_or_touch_cooldown() {
        let (mut detector, log) = detector_with_log();
        let t0 = Instant::now();
        let mut points = hand_with([true; 5]).points().to_vec();
        points.truncate(20);
        assert_eq!(detector.classify_points(Some(points.as_slice()), t0), Detection::none());
        assert!(log.is_empty());

        // La ventana sigue libre
        let full = hand_with([true; 5]);
        assert!(detector.classify_points(Some(&full.points()[..]), t0 + ms(10)).is_gesture());
    }

    #[test]
    fn custom_cooldown_from_config() {
        let config = DetectorConfig::default().with_cooldown(ms(200));
        let mut detector = GestureDetector::new(config);
        let hand = hand_with([true; 5]);
        let t0 = Instant::now();
        assert_eq!(detector.cooldown(), ms(200));
        assert!(detector.classify(Some(&hand), t0).is_gesture());
        assert!(!detector.classify(Some(&hand), t0 + ms(150)).is_gesture());
        assert!(detector.classify(Some(&hand), t0 + ms(250)).is_gesture());
    }

    #[test]
    fn oversized_cooldown_saturates_instead_of_panicking() {
        let config = DetectorConfig {
            cooldown_secs: 1e300,
            ..DetectorConfig::default()
        };
        let mut detector = GestureDetector::new(config);
        let hand = hand_with([true; 5]);
        let t0 = Instant::now();
        assert_eq!(detector.cooldown(), Duration::MAX);
        assert!(detector.classify(Some(&hand), t0).is_gesture());
        assert!(!detector.classify(Some(&hand), t0 + ms(60_000)).is_gesture());
    }

    #[test]
    fn process_reads_from_provider() {
        let frames = vec![
            RecordedFrame {
                index: 0,
                time: Duration::ZERO,
                points: None,
            },
            RecordedFrame {
                index: 1,
                time: ms(33),
                points: Some(hand_with([true; 5]).points().to_vec()),
            },
        ];
        let mut provider = RecordingProvider::new(frames);
        let mut detector = GestureDetector::default();
        let t0 = Instant::now();

        assert_eq!(detector.process(&mut provider, &0, t0), Detection::none());
        assert_eq!(
            detector.process(&mut provider, &1, t0 + ms(33)).label,
            GestureLabel::Palm
        );
        // Frame inexistente: error del proveedor, sin gesto
        assert_eq!(detector.process(&mut provider, &7, t0 + ms(2000)), Detection::none());
        assert_eq!(detector.stats().frames(), 3);
    }

    struct FailingSink;

    impl GestureLogSink for FailingSink {
        fn record(&mut self, _entry: &GestureLogEntry) -> Result<(), EventLogError> {
            Err(EventLogError::IoError(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disco lleno",
            )))
        }
    }

    #[test]
    fn sink_failure_does_not_change_result() {
        let mut detector = GestureDetector::default().with_sink(Box::new(FailingSink));
        let det = detector.classify(Some(&hand_with([true; 5])), Instant::now());
        assert_eq!(det.label, GestureLabel::Palm);
    }
}
