use nalgebra::{Matrix3, Rotation3, Unit, Vector3};

// ---------------------------------------------------------------------------
// Device orientation basis
// ---------------------------------------------------------------------------

/// World-from-local rotation of a device.
///
/// Local axes follow the host convention: +X right, +Y up, -Z forward.
/// Column `i` of the matrix is local axis `i` expressed in world space, so
/// `to_world` is a plain matrix product and `to_local` is the transpose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    rot: Rotation3<f64>,
}

impl Orientation {
    pub fn identity() -> Self {
        Self { rot: Rotation3::identity() }
    }

    pub fn from_rotation(rot: Rotation3<f64>) -> Self {
        Self { rot }
    }

    /// Build a basis from a forward and an approximate up direction.
    /// Returns `None` if the two are parallel or either is zero.
    pub fn from_forward_up(forward: Vector3<f64>, up: Vector3<f64>) -> Option<Self> {
        let fwd = forward.try_normalize(1e-12)?;
        let right = fwd.cross(&up).try_normalize(1e-12)?;
        let up = right.cross(&fwd);
        let m = Matrix3::from_columns(&[right, up, -fwd]);
        Some(Self { rot: Rotation3::from_matrix_unchecked(m) })
    }

    /// Rotation by `angle` (rad) about a local axis, applied on top of `self`.
    pub fn rotated_local(&self, axis: &Vector3<f64>, angle: f64) -> Self {
        match Unit::try_new(*axis, 1e-12) {
            Some(a) => Self { rot: self.rot * Rotation3::from_axis_angle(&a, angle) },
            None => *self,
        }
    }

    /// Apply a world-frame rotation increment (rotation vector, rad).
    pub fn rotated_world(&self, rotation_vec: &Vector3<f64>) -> Self {
        let delta = Rotation3::new(*rotation_vec);
        Self { rot: Rotation3::from_matrix(&(delta * self.rot).into_inner()) }
    }

    /// World orientation of something mounted on this body at `mount`
    /// (mount expressed in this body's local frame).
    pub fn mounted(&self, mount: &Orientation) -> Self {
        Self { rot: self.rot * mount.rot }
    }

    pub fn rotation(&self) -> &Rotation3<f64> {
        &self.rot
    }

    pub fn right(&self) -> Vector3<f64> {
        self.rot * Vector3::x()
    }

    pub fn left(&self) -> Vector3<f64> {
        -self.right()
    }

    pub fn up(&self) -> Vector3<f64> {
        self.rot * Vector3::y()
    }

    pub fn forward(&self) -> Vector3<f64> {
        self.rot * -Vector3::z()
    }

    /// Local-frame vector → world frame.
    pub fn to_world(&self, local: &Vector3<f64>) -> Vector3<f64> {
        self.rot * local
    }

    /// World-frame vector → local frame (transpose of the basis).
    pub fn to_local(&self, world: &Vector3<f64>) -> Vector3<f64> {
        self.rot.transpose() * world
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_axes() {
        let o = Orientation::identity();
        assert_eq!(o.forward(), Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(o.left(), Vector3::new(-1.0, 0.0, 0.0));
        assert_eq!(o.up(), Vector3::y());
    }

    #[test]
    fn forward_up_roundtrip() {
        let fwd = Vector3::new(0.0, 0.0, 1.0);
        let o = Orientation::from_forward_up(fwd, Vector3::y()).unwrap();
        assert!((o.forward() - fwd).norm() < 1e-12);
        assert!((o.up() - Vector3::y()).norm() < 1e-12);
        // Right-handed: facing +Z with +Y up puts left on +X
        assert!((o.left() - Vector3::x()).norm() < 1e-12);
    }

    #[test]
    fn parallel_forward_up_rejected() {
        assert!(Orientation::from_forward_up(Vector3::y(), Vector3::y()).is_none());
        assert!(Orientation::from_forward_up(Vector3::zeros(), Vector3::y()).is_none());
    }

    #[test]
    fn local_world_inverse() {
        let o = Orientation::identity()
            .rotated_local(&Vector3::x(), 0.3)
            .rotated_local(&Vector3::y(), -1.1);
        let v = Vector3::new(0.2, -0.7, 1.5);
        assert!((o.to_local(&o.to_world(&v)) - v).norm() < 1e-12);
    }

    #[test]
    fn mounted_composes_frames() {
        let body = Orientation::identity().rotated_local(&Vector3::y(), 0.4);
        let mount = Orientation::identity().rotated_local(&Vector3::x(), -0.9);
        let world = body.mounted(&mount);
        let v = Vector3::new(1.0, 2.0, 3.0);
        assert!((world.to_world(&v) - body.to_world(&mount.to_world(&v))).norm() < 1e-12);
    }

    #[test]
    fn positive_pitch_about_right_axis_raises_nose() {
        let o = Orientation::identity().rotated_local(&Vector3::x(), 0.2);
        assert!(o.forward().y > 0.0);
    }
}
