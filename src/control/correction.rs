// ---------------------------------------------------------------------------
// Hysteretic correction state machine
// ---------------------------------------------------------------------------

/// Sustained pitch beyond this (deg) arms an idle correction.
pub const IDLE_PITCH_DEG: f64 = 5.0;
/// Sustained roll beyond this (deg) arms an idle correction.
pub const IDLE_ROLL_DEG: f64 = 3.0;
/// Ticks an idle correction waits before it starts aligning.
pub const IDLE_WINDOW_TICKS: u32 = 90;
/// Both axes inside this band (deg) means the vessel has settled.
pub const SETTLE_BAND_DEG: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Settled,
    IdleCorrectPending,
    Aligning,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Settled => "settled",
            Mode::IdleCorrectPending => "idle-pending",
            Mode::Aligning => "aligning",
        }
    }
}

/// Hard pitch/roll limits (deg), taken from the live config.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HardLimits {
    pub pitch_deg: f64,
    pub roll_deg: f64,
}

/// Adjustable normalization thresholds (deg). Only grow, except on settle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub pitch_deg: f64,
    pub roll_deg: f64,
}

#[derive(Debug, Clone)]
pub struct CorrectionState {
    thresholds: Thresholds,
    aligning: bool,
    idle_pending: bool,
    idle_ticks: u32,
}

impl CorrectionState {
    pub fn new(limits: HardLimits) -> Self {
        Self {
            thresholds: Thresholds { pitch_deg: limits.pitch_deg, roll_deg: limits.roll_deg },
            aligning: false,
            idle_pending: false,
            idle_ticks: 0,
        }
    }

    /// Feed one tick of absolute pitch/roll error (deg).
    ///
    /// Rules run in fixed order; each raise is an independent max-update, so
    /// when the idle and hard rules fire together the largest value wins.
    pub fn evaluate(&mut self, pitch_deg: f64, roll_deg: f64, limits: HardLimits) -> Mode {
        let pitch_deg = pitch_deg.abs();
        let roll_deg = roll_deg.abs();

        // Soft correction: arm the idle window
        if !self.aligning && pitch_deg > IDLE_PITCH_DEG {
            self.idle_pending = true;
            self.thresholds.pitch_deg = self.thresholds.pitch_deg.max(pitch_deg);
        }
        if !self.aligning && roll_deg > IDLE_ROLL_DEG {
            self.idle_pending = true;
            self.thresholds.roll_deg = self.thresholds.roll_deg.max(roll_deg);
        }
        if self.idle_pending && self.idle_ticks == IDLE_WINDOW_TICKS {
            self.aligning = true;
            self.idle_pending = false;
            self.idle_ticks = 0;
        }

        // Hard limits bypass the window
        if pitch_deg > limits.pitch_deg {
            self.aligning = true;
            self.thresholds.pitch_deg = self.thresholds.pitch_deg.max(pitch_deg);
        }
        if roll_deg > limits.roll_deg {
            self.aligning = true;
            self.thresholds.roll_deg = self.thresholds.roll_deg.max(roll_deg);
        }

        if pitch_deg <= SETTLE_BAND_DEG && roll_deg <= SETTLE_BAND_DEG {
            self.settle(limits);
        }

        self.mode()
    }

    /// Advance the idle window by one tick (saturates at the window length).
    pub fn advance(&mut self) {
        if self.idle_pending && self.idle_ticks < IDLE_WINDOW_TICKS {
            self.idle_ticks += 1;
        }
    }

    fn settle(&mut self, limits: HardLimits) {
        self.aligning = false;
        self.idle_pending = false;
        self.idle_ticks = 0;
        self.thresholds = Thresholds { pitch_deg: limits.pitch_deg, roll_deg: limits.roll_deg };
    }

    pub fn mode(&self) -> Mode {
        if self.aligning {
            Mode::Aligning
        } else if self.idle_pending {
            Mode::IdleCorrectPending
        } else {
            Mode::Settled
        }
    }

    pub fn is_aligning(&self) -> bool {
        self.aligning
    }

    pub fn is_idle_pending(&self) -> bool {
        self.idle_pending
    }

    pub fn idle_ticks(&self) -> u32 {
        self.idle_ticks
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }
}
