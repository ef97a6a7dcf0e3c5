use std::time::{Duration, Instant};

use crate::types::{Detection, GestureLabel};

/// Ventana por defecto entre dos gestos aceptados
pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(800);

/// Estados de la compuerta
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Nada pendiente de suprimir
    Idle,
    /// Dentro de la ventana del último gesto emitido
    Suppressing,
}

/// Decisión de la compuerta para un frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateDecision {
    /// El clasificador no encontró gesto
    NoGesture,
    /// Hubo gesto pero cayó dentro del cooldown
    Suppressed(Detection),
    /// Gesto aceptado
    Emitted(Detection),
}

impl GateDecision {
    /// Lo que ve el llamador: el gesto emitido o "sin gesto"
    pub fn output(&self) -> Detection {
        match self {
            GateDecision::Emitted(det) => *det,
            GateDecision::NoGesture | GateDecision::Suppressed(_) => Detection::none(),
        }
    }
}

/// Limita la emisión a un gesto por ventana de cooldown.
///
/// La ventana es global: cualquier gesto, sea cual sea su etiqueta, queda
/// suprimido mientras no haya pasado `cooldown` desde la última emisión.
/// Un gesto suprimido no reinicia la ventana.
#[derive(Debug, Clone)]
pub struct CooldownGate {
    cooldown: Duration,
    last_label: Option<GestureLabel>,
    last_emission: Option<Instant>,
}

impl CooldownGate {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_label: None,
            last_emission: None,
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn last_label(&self) -> Option<GestureLabel> {
        self.last_label
    }

    pub fn last_emission(&self) -> Option<Instant> {
        self.last_emission
    }

    fn in_window(&self, now: Instant) -> bool {
        // Un reloj que retrocede cuenta como tiempo transcurrido cero
        self.last_emission
            .map(|last| now.saturating_duration_since(last) < self.cooldown)
            .unwrap_or(false)
    }

    pub fn state(&self, now: Instant) -> GateState {
        if self.in_window(now) {
            GateState::Suppressing
        } else {
            GateState::Idle
        }
    }

    /// Decide si el gesto crudo de este frame se emite
    pub fn decide(&mut self, raw: Detection, now: Instant) -> GateDecision {
        if !raw.is_gesture() {
            return GateDecision::NoGesture;
        }

        if self.in_window(now) {
            log::debug!("Gesto {} suprimido por cooldown", raw.label);
            return GateDecision::Suppressed(raw);
        }

        self.last_emission = Some(now);
        self.last_label = Some(raw.label);
        log::debug!("Gesto {} emitido (conf: {:.2})", raw.label, raw.confidence);
        GateDecision::Emitted(raw)
    }
}

impl Default for CooldownGate {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN)
    }
}
