use std::ops::RangeInclusive;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use log::{debug, warn};
use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::ControlConfig;
use crate::control::allocator::{correction_vector, TorqueAllocator, FULL_POWER, IDLE_POWER};
use crate::control::attitude::{self, Attitude};
use crate::control::correction::{CorrectionState, Mode, Thresholds};
use crate::control::pid::Pid;
use crate::control::shaping::{easing_gain, forward_speed, yaw_command};
use crate::error::{ControlError, DiscoveryError};
use crate::host::{DeviceDiscovery, GravityField};
use crate::snapshot::SnapshotCell;
use crate::vessel::{ControlSeat, Device, DeviceSet, SeatReading, Vessel};

/// Ticks between discovery passes once a vessel is ready.
pub const DISCOVERY_PERIOD_TICKS: u32 = 300;
/// Range of the per-vessel stagger applied after the first discovery.
pub const DISCOVERY_STAGGER_TICKS: RangeInclusive<u32> = 60..=180;

/// Which branch of the control cycle a tick ended in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Discovery has not produced both seats and actuators.
    NotReady,
    /// Vessel is static; nothing to level.
    Static,
    /// No seat readable this tick.
    NoController,
    /// No gravity at the reference seat; override released.
    NoGravity,
    /// Holding: zero command at idle power.
    Idle,
    /// Actively driving the actuators at full power.
    Driving,
}

impl TickOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            TickOutcome::NotReady => "not-ready",
            TickOutcome::Static => "static",
            TickOutcome::NoController => "no-controller",
            TickOutcome::NoGravity => "no-gravity",
            TickOutcome::Idle => "idle",
            TickOutcome::Driving => "driving",
        }
    }
}

/// Everything a tick reads from outside the vessel. The config is one
/// snapshot for the whole tick.
#[derive(Clone, Copy)]
pub struct TickContext<'a> {
    pub config: &'a ControlConfig,
    pub discovery: &'a dyn DeviceDiscovery,
    pub gravity: &'a dyn GravityField,
}

// ---------------------------------------------------------------------------
// Per-vessel leveling controller
// ---------------------------------------------------------------------------

pub struct ShipController {
    vessel: Arc<Vessel>,
    devices: SnapshotCell<DeviceSet>,
    ready: bool,
    discovery_ticks: u32,
    stagger: Option<u32>, // consumed by the first successful discovery
    correction: CorrectionState,
    attitude: Attitude,
    pitch_pid: Pid,
    roll_pid: Pid,
}

impl ShipController {
    pub fn new(vessel: Arc<Vessel>, config: &ControlConfig) -> Self {
        let stagger = StdRng::seed_from_u64(vessel.id()).gen_range(DISCOVERY_STAGGER_TICKS);
        let mut pitch_pid = Pid::leveling();
        let mut roll_pid = Pid::leveling();
        pitch_pid.set_setpoint(0.0);
        roll_pid.set_setpoint(0.0);
        Self {
            vessel,
            devices: SnapshotCell::default(),
            ready: false,
            discovery_ticks: 0,
            stagger: Some(stagger),
            correction: CorrectionState::new(config.hard_limits()),
            attitude: Attitude::default(),
            pitch_pid,
            roll_pid,
        }
    }

    /// One control tick. All effects are actuator writes; the outcome only
    /// reports which branch ran.
    pub fn update(&mut self, ctx: &TickContext<'_>) -> Result<TickOutcome, ControlError> {
        if !self.ready || self.discovery_ticks >= DISCOVERY_PERIOD_TICKS {
            self.refresh_devices(ctx);
        }
        if self.vessel.is_static() {
            return Ok(TickOutcome::Static);
        }
        if !self.ready {
            return Ok(TickOutcome::NotReady);
        }

        // Hold this snapshot for the whole tick, even if discovery swaps it
        let devices = self.devices.load();
        let seat = match select_seat(devices.seats())? {
            Some(seat) => seat,
            None => return Ok(TickOutcome::NoController),
        };
        let allocator = TorqueAllocator::new(devices.actuators());

        let gravity = ctx.gravity.gravity_at(&seat.position);
        if !attitude::has_gravity(&gravity) {
            allocator.disengage();
            self.attitude = Attitude::default();
            return Ok(TickOutcome::NoGravity);
        }

        let basis = seat.orientation;
        self.attitude = attitude::estimate(&basis.forward(), &basis.left(), &gravity);
        let pitch_deg = self.attitude.pitch_deg().abs();
        let roll_deg = self.attitude.roll_deg().abs();

        let before = self.correction.mode();
        let mode = self.correction.evaluate(pitch_deg, roll_deg, ctx.config.hard_limits());
        if mode != before {
            debug!(
                "vessel {}: {:?} -> {:?} (pitch {:.2}°, roll {:.2}°)",
                self.vessel.id(),
                before,
                mode,
                pitch_deg,
                roll_deg
            );
        }

        let turn = seat.move_indicator.x;
        if !self.correction.is_aligning() && turn == 0.0 {
            allocator.drive(&basis, &Vector3::zeros(), IDLE_POWER);
            return Ok(TickOutcome::Idle);
        }

        let thresholds = self.correction.thresholds();
        let cap = ctx.config.correction_speed;
        let pitch_out =
            self.pitch_pid.update(self.attitude.pitch) * easing_gain(pitch_deg, thresholds.pitch_deg, cap);
        let roll_out =
            self.roll_pid.update(self.attitude.roll) * easing_gain(roll_deg, thresholds.roll_deg, cap);

        let speed = forward_speed(&seat.linear_velocity, &basis.forward());
        let yaw = yaw_command(turn, speed, ctx.config);

        allocator.drive(&basis, &correction_vector(pitch_out, yaw, roll_out), FULL_POWER);
        Ok(TickOutcome::Driving)
    }

    /// Advance the discovery and idle-correction counters by one tick.
    /// Kept apart from `update` so counters move even on skipped ticks.
    pub fn advance_tick_counters(&mut self) {
        if self.discovery_ticks < DISCOVERY_PERIOD_TICKS {
            self.discovery_ticks += 1;
        }
        self.correction.advance();
    }

    fn refresh_devices(&mut self, ctx: &TickContext<'_>) {
        let id = self.vessel.id();
        let result = discover_guarded(ctx.discovery, &self.vessel).and_then(|devices| DeviceSet::classify(devices, ctx.config.allow_relaxed_actuators));

        match result {
            Ok(set) => {
                debug!(
                    "vessel {}: {} actuators, {} seats",
                    id,
                    set.actuators().len(),
                    set.seats().len()
                );
                self.devices.store(set);
                self.ready = true;
                self.discovery_ticks = self.stagger.take().unwrap_or(0);
            }
            Err(err) => {
                log_discovery_failure(id, &err);
                self.devices.store(DeviceSet::default());
                self.ready = false;
                self.discovery_ticks = 0;
            }
        }
    }

    /// Drop the device set; the vessel receives no more commands.
    pub fn release(&mut self) {
        self.vessel.mark_for_removal();
        self.devices.store(DeviceSet::default());
        self.ready = false;
        self.pitch_pid.reset();
        self.roll_pid.reset();
    }

    pub fn vessel(&self) -> &Arc<Vessel> {
        &self.vessel
    }

    pub fn is_marked_for_removal(&self) -> bool {
        self.vessel.is_marked_for_removal()
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn actuator_count(&self) -> usize {
        self.devices.load().actuators().len()
    }

    pub fn devices(&self) -> Arc<DeviceSet> {
        self.devices.load()
    }

    pub fn attitude(&self) -> Attitude {
        self.attitude
    }

    pub fn mode(&self) -> Mode {
        self.correction.mode()
    }

    pub fn thresholds(&self) -> Thresholds {
        self.correction.thresholds()
    }

    pub fn idle_ticks(&self) -> u32 {
        self.correction.idle_ticks()
    }

    pub fn discovery_ticks(&self) -> u32 {
        self.discovery_ticks
    }
}

/// Run the collaborator with panics contained: a panicking enumeration is
/// just another unavailable discovery pass.
fn discover_guarded(discovery: &dyn DeviceDiscovery, vessel: &Vessel) -> Result<Vec<Device>, DiscoveryError> {
    panic::catch_unwind(AssertUnwindSafe(|| discovery.discover(vessel))).unwrap_or_else(|payload| {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "discovery panicked".to_string());
        Err(DiscoveryError::Unavailable(reason))
    })
}

fn log_discovery_failure(id: u64, err: &DiscoveryError) {
    match err {
        DiscoveryError::Unavailable(_) => warn!("vessel {}: discovery failed: {}", id, err),
        _ => debug!("vessel {}: not ready: {}", id, err),
    }
}

/// Prefer a seat a pilot is sitting in; otherwise the first capable one.
fn select_seat(seats: &[Arc<ControlSeat>]) -> Result<Option<SeatReading>, ControlError> {
    let mut fallback = None;
    for seat in seats {
        let reading = seat.reading()?;
        if !reading.can_control {
            continue;
        }
        if reading.under_control {
            return Ok(Some(reading));
        }
        if fallback.is_none() {
            fallback = Some(reading);
        }
    }
    Ok(fallback)
}
