// ---------------------------------------------------------------------------
// PID Controller (single axis, per-tick, no dt)
// ---------------------------------------------------------------------------

/// Default gains for the leveling loops. The integral term stays wired
/// through but is off.
pub const KP: f64 = 2.0;
pub const KI: f64 = 0.0;
pub const KD: f64 = 5.0;

#[derive(Debug, Clone)]
pub struct Pid {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    setpoint: f64,
    integral: f64,
    prev_error: f64,
}

impl Pid {
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self { kp, ki, kd, setpoint: 0.0, integral: 0.0, prev_error: 0.0 }
    }

    /// Pitch/roll leveling loop: setpoint 0, default gains.
    pub fn leveling() -> Self {
        Self::new(KP, KI, KD)
    }

    /// Change the target and forget accumulated history.
    pub fn set_setpoint(&mut self, value: f64) {
        self.setpoint = value;
        self.reset();
    }

    pub fn setpoint(&self) -> f64 {
        self.setpoint
    }

    /// One tick: error = setpoint - measurement. Derivative is per tick.
    pub fn update(&mut self, measurement: f64) -> f64 {
        let error = self.setpoint - measurement;
        self.integral += error;
        let derivative = self.kd * (error - self.prev_error);
        self.prev_error = error;
        self.kp * error + self.ki * self.integral + derivative
    }

    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.prev_error = 0.0;
    }
}

impl Default for Pid {
    fn default() -> Self {
        Self::leveling()
    }
}
