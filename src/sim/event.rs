use crate::control::Mode;
use crate::ship::TickOutcome;
use super::runner::Sample;

// ---------------------------------------------------------------------------
// Trace events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    ModeChange { from: Mode, to: Mode },
    Settled,
    OutcomeChange { from: Option<TickOutcome>, to: Option<TickOutcome> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimEvent {
    pub tick: u64,
    pub time: f64,
    pub kind: EventKind,
}

/// Passive detector over consecutive samples.
pub trait EventDetector {
    fn check(&mut self, prev: &Sample, current: &Sample) -> Option<EventKind>;
}

pub struct ModeChangeDetector;

impl EventDetector for ModeChangeDetector {
    fn check(&mut self, prev: &Sample, current: &Sample) -> Option<EventKind> {
        (prev.mode != current.mode).then_some(EventKind::ModeChange { from: prev.mode, to: current.mode })
    }
}

pub struct OutcomeChangeDetector;

impl EventDetector for OutcomeChangeDetector {
    fn check(&mut self, prev: &Sample, current: &Sample) -> Option<EventKind> {
        (prev.outcome != current.outcome)
            .then_some(EventKind::OutcomeChange { from: prev.outcome, to: current.outcome })
    }
}

/// Fires once, the first time an alignment ends.
#[derive(Default)]
pub struct SettledDetector {
    fired: bool,
}

impl SettledDetector {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventDetector for SettledDetector {
    fn check(&mut self, prev: &Sample, current: &Sample) -> Option<EventKind> {
        if self.fired || prev.mode != Mode::Aligning || current.mode != Mode::Settled {
            return None;
        }
        self.fired = true;
        Some(EventKind::Settled)
    }
}

/// Run every detector over the trace, in tick order.
pub fn detect(samples: &[Sample], detectors: &mut [Box<dyn EventDetector>]) -> Vec<SimEvent> {
    let mut events = Vec::new();
    for pair in samples.windows(2) {
        let (prev, current) = (&pair[0], &pair[1]);
        for det in detectors.iter_mut() {
            if let Some(kind) = det.check(prev, current) {
                events.push(SimEvent { tick: current.tick, time: current.time, kind });
            }
        }
    }
    events
}

pub fn default_detectors() -> Vec<Box<dyn EventDetector>> {
    vec![Box::new(ModeChangeDetector), Box::new(SettledDetector::new())]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(tick: u64, mode: Mode) -> Sample {
        Sample {
            tick,
            time: tick as f64 / 60.0,
            pitch_deg: 0.0,
            roll_deg: 0.0,
            heading_deg: 0.0,
            mode,
            outcome: Some(TickOutcome::Idle),
            power: 0.001,
        }
    }

    #[test]
    fn settled_fires_once() {
        let mut det = SettledDetector::new();
        let a = sample(0, Mode::Aligning);
        let b = sample(1, Mode::Settled);
        assert_eq!(det.check(&a, &b), Some(EventKind::Settled));
        assert!(det.check(&a, &b).is_none());
    }

    #[test]
    fn detect_reports_mode_changes_in_order() {
        let trace = vec![
            sample(0, Mode::Settled),
            sample(1, Mode::IdleCorrectPending),
            sample(2, Mode::Aligning),
            sample(3, Mode::Aligning),
            sample(4, Mode::Settled),
        ];
        let events = detect(&trace, &mut default_detectors());
        let ticks: Vec<u64> = events.iter().map(|e| e.tick).collect();
        assert_eq!(ticks, vec![1, 2, 4, 4]);
        assert_eq!(events[3].kind, EventKind::Settled);
    }
}
