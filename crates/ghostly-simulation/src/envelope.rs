//! Amplitude envelope applied across a single contraction

/// Phase of a contraction burst
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopePhase {
    /// Quick quadratic rise
    Rise,
    /// Held at peak
    Plateau,
    /// Smoother decay back to baseline
    Decay,
}

/// Bell-shaped rise/plateau/decay envelope over normalized progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContractionEnvelope {
    /// Progress at which the rise reaches the plateau
    pub rise_end: f32,
    /// Progress at which the decay begins
    pub decay_start: f32,
    pub rise_exponent: f32,
    pub decay_exponent: f32,
}

impl Default for ContractionEnvelope {
    fn default() -> Self {
        Self {
            rise_end: 0.3,
            decay_start: 0.7,
            rise_exponent: 2.0,
            decay_exponent: 1.5,
        }
    }
}

impl ContractionEnvelope {
    pub fn phase_at(&self, progress: f32) -> EnvelopePhase {
        if progress < self.rise_end {
            EnvelopePhase::Rise
        } else if progress < self.decay_start {
            EnvelopePhase::Plateau
        } else {
            EnvelopePhase::Decay
        }
    }

    /// Envelope gain in [0, 1] at `progress` (0.0 = onset, 1.0 = offset)
    pub fn gain_at(&self, progress: f32) -> f32 {
        let progress = progress.max(0.0).min(1.0);

        match self.phase_at(progress) {
            EnvelopePhase::Rise => (progress / self.rise_end).powf(self.rise_exponent),
            EnvelopePhase::Plateau => 1.0,
            EnvelopePhase::Decay => {
                let tail = 1.0 - self.decay_start;
                ((1.0 - progress) / tail).powf(self.decay_exponent)
            }
        }
    }
}
