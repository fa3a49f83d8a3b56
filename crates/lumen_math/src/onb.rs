use crate::Vec3;

/// Orthonormal basis with `w` aligned to a given normal.
///
/// Used to carry hemisphere samples expressed around +Z into world space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Onb {
    pub u: Vec3,
    pub v: Vec3,
    pub w: Vec3,
}

impl Onb {
    /// Build a basis around `normal` (need not be unit length).
    pub fn from_w(normal: Vec3) -> Self {
        let w = normal.normalize();
        // Pick a helper axis that is not nearly parallel to w
        let a = if w.x.abs() > 0.9 { Vec3::Y } else { Vec3::X };
        let v = w.cross(a).normalize();
        let u = w.cross(v);
        Self { u, v, w }
    }

    /// Express a local-space vector in world space.
    #[inline]
    pub fn local(&self, a: Vec3) -> Vec3 {
        a.x * self.u + a.y * self.v + a.z * self.w
    }
}
