//! A single damped spring.

use biocrowds_core::{AgentId, Vec3};
use serde::{Deserialize, Serialize};

/// Unordered agent pair. `lo <= hi` always holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairKey {
    /// Smaller id.
    pub lo: AgentId,
    /// Larger id.
    pub hi: AgentId,
}

impl PairKey {
    /// The key of `{a, b}` regardless of order.
    pub fn new(a: AgentId, b: AgentId) -> Self {
        if a <= b {
            Self { lo: a, hi: b }
        } else {
            Self { lo: b, hi: a }
        }
    }

    /// Whether `id` is one of the two endpoints.
    pub fn touches(&self, id: AgentId) -> bool {
        self.lo == id || self.hi == id
    }
}

/// Stiffness, damping and rest length given to newly created springs.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpringParams {
    /// Spring constant. Negative values pull stretched endpoints together.
    pub stiffness: f32,
    /// Damping coefficient.
    pub damping: f32,
    /// Rest length.
    pub rest_length: f32,
}

impl Default for SpringParams {
    fn default() -> Self {
        Self {
            stiffness: -500.0,
            damping: 3.0,
            rest_length: 0.1,
        }
    }
}

/// An undirected link between two agents.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Spring {
    /// First endpoint.
    pub a: AgentId,
    /// Second endpoint.
    pub b: AgentId,
    /// Stiffness `k`.
    pub k: f32,
    /// Damping `kd`.
    pub kd: f32,
    /// Rest length `l0`.
    pub l0: f32,
}

impl Spring {
    /// A spring from `a` to `b` with the given parameters.
    pub fn new(a: AgentId, b: AgentId, params: &SpringParams) -> Self {
        Self {
            a,
            b,
            k: params.stiffness,
            kd: params.damping,
            l0: params.rest_length,
        }
    }

    /// The unordered pair this spring links.
    pub fn key(&self) -> PairKey {
        PairKey::new(self.a, self.b)
    }

    /// Forces on `a` and on `b` given both endpoints' positions and steps.
    ///
    /// The elastic term acts along `p_a - p_b` with opposite signs on the
    /// two ends; the damping term is shared. Coincident endpoints yield no
    /// force.
    pub fn forces(&self, pa: Vec3, va: Vec3, pb: Vec3, vb: Vec3) -> (Vec3, Vec3) {
        let offset = pa - pb;
        let delta = offset.length();
        let scalar = self.k * (delta - self.l0);
        let dir = offset.normalize_or_zero();
        let damping = -self.kd * (va.dot(dir) + vb.dot(dir));
        ((scalar + damping) * dir, (-scalar + damping) * dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_key_is_order_independent() {
        assert_eq!(
            PairKey::new(AgentId(4), AgentId(1)),
            PairKey::new(AgentId(1), AgentId(4))
        );
        let k = PairKey::new(AgentId(9), AgentId(2));
        assert_eq!(k.lo, AgentId(2));
        assert!(k.touches(AgentId(9)));
        assert!(!k.touches(AgentId(3)));
    }

    #[test]
    fn stretched_spring_pulls_endpoints_together() {
        let s = Spring::new(AgentId(0), AgentId(1), &SpringParams::default());
        let pa = Vec3::new(2.0, 0.0, 0.0);
        let pb = Vec3::ZERO;
        let (fa, fb) = s.forces(pa, Vec3::ZERO, pb, Vec3::ZERO);
        // a sits on +x, so it must be pushed towards -x and b towards +x.
        assert!(fa.x < 0.0);
        assert!(fb.x > 0.0);
        assert!((fa + fb).length() < 1e-3);
        assert!((fa.x - (-500.0 * 1.9)).abs() < 1e-2);
    }

    #[test]
    fn damping_is_shared_by_both_ends() {
        let s = Spring {
            a: AgentId(0),
            b: AgentId(1),
            k: 0.0,
            kd: 2.0,
            l0: 0.0,
        };
        let (fa, fb) = s.forces(Vec3::X, Vec3::X, Vec3::ZERO, Vec3::ZERO);
        assert_eq!(fa, Vec3::new(-2.0, 0.0, 0.0));
        assert_eq!(fb, fa);
    }

    #[test]
    fn coincident_endpoints_are_inert() {
        let s = Spring::new(AgentId(0), AgentId(1), &SpringParams::default());
        let (fa, fb) = s.forces(Vec3::ONE, Vec3::X, Vec3::ONE, Vec3::Z);
        assert_eq!(fa, Vec3::ZERO);
        assert_eq!(fb, Vec3::ZERO);
    }
}
