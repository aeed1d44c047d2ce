use nalgebra::Vector3;

use crate::error::DiscoveryError;
use crate::vessel::{Device, Vessel};

// ---------------------------------------------------------------------------
// Collaborator seams: everything the control core needs from the host
// ---------------------------------------------------------------------------

/// Enumerates and tags the devices of a vessel. How a device is recognized
/// as a rudder or a seat is entirely up to the implementation.
pub trait DeviceDiscovery: Send + Sync {
    fn discover(&self, vessel: &Vessel) -> Result<Vec<Device>, DiscoveryError>;
}

/// Local gravity sampler (m/s², world frame). Zero means no gravity.
pub trait GravityField: Send + Sync {
    fn gravity_at(&self, position: &Vector3<f64>) -> Vector3<f64>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// User-visible message sink.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, severity: Severity);
}

/// Same field everywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformGravity(pub Vector3<f64>);

impl UniformGravity {
    pub fn none() -> Self {
        Self(Vector3::zeros())
    }
}

impl GravityField for UniformGravity {
    fn gravity_at(&self, _position: &Vector3<f64>) -> Vector3<f64> {
        self.0
    }
}

/// Notifier that routes everything into the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Info => log::info!("{}", message),
            Severity::Warning => log::warn!("{}", message),
            Severity::Error => log::error!("{}", message),
        }
    }
}
