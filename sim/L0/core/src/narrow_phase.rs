//! Capsule-versus-obstacle contact generation.
//!
//! Cable proxies are treated as capsules: the segment between the end caps
//! inflated by the proxy radius. A thin cylinder and a capsule of the same
//! radius differ only at the rounded caps, which sit inside the anchor
//! bodies anyway.
//!
//! Every query returns points in Bullet's convention with the proxy as
//! object A and the obstacle as object B: `position_on_b` lies on the
//! obstacle surface, `normal_on_b` points from the obstacle toward the
//! capsule, and `distance` is negative while they overlap.

use nalgebra::{Point3, Unit, Vector3};
use sim_contact::ContactPoint;
use sim_types::Pose;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::broad_phase::Aabb;

/// Below this, vectors are treated as zero length.
const EPSILON: f64 = 1e-12;

/// Iterations of the golden-section search on the capsule axis.
const SEGMENT_SEARCH_ITERATIONS: usize = 64;

/// Weight of the pull toward the box centre on flat stretches of the
/// distance function.
const CENTRE_BIAS: f64 = 1e-9;

/// Collision geometry of an obstacle body.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ObstacleShape {
    /// Sphere centred on the body origin.
    Sphere {
        /// Sphere radius.
        radius: f64,
    },
    /// Box centred on the body origin, aligned with the body frame.
    Box {
        /// Half-extents along local X, Y, Z.
        half_extents: Vector3<f64>,
    },
    /// Infinite plane through the body origin; the normal is given in the
    /// body frame and solid lies on its negative side.
    Plane {
        /// Outward plane normal (local frame).
        normal: Unit<Vector3<f64>>,
    },
}

impl ObstacleShape {
    /// Create a sphere.
    #[must_use]
    pub const fn sphere(radius: f64) -> Self {
        Self::Sphere { radius }
    }

    /// Create a box from half-extents.
    #[must_use]
    pub const fn cuboid(half_extents: Vector3<f64>) -> Self {
        Self::Box { half_extents }
    }

    /// Create a plane with the given outward normal.
    #[must_use]
    pub fn plane(normal: Vector3<f64>) -> Self {
        Self::Plane {
            normal: Unit::new_normalize(normal),
        }
    }

    /// Horizontal ground plane (normal +Z).
    #[must_use]
    pub fn ground() -> Self {
        Self::Plane {
            normal: Vector3::z_axis(),
        }
    }

    /// World bounds at `pose`, or `None` for unbounded shapes.
    #[must_use]
    pub fn aabb(&self, pose: &Pose) -> Option<Aabb> {
        match *self {
            Self::Sphere { radius } => Some(Aabb::from_center(
                pose.position,
                Vector3::repeat(radius),
            )),
            Self::Box { half_extents } => {
                // World extent of a rotated box: |R| · h
                let rot = pose.rotation.to_rotation_matrix();
                let extent = rot.matrix().abs() * half_extents;
                Some(Aabb::from_center(pose.position, extent))
            }
            Self::Plane { .. } => None,
        }
    }

    /// Whether the shape parameters are positive and finite.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        match self {
            Self::Sphere { radius } => *radius > 0.0 && radius.is_finite(),
            Self::Box { half_extents } => half_extents.iter().all(|h| *h > 0.0 && h.is_finite()),
            Self::Plane { normal } => normal.iter().all(|n| n.is_finite()),
        }
    }
}

/// A capsule in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capsule {
    /// First end of the axis.
    pub start: Point3<f64>,
    /// Second end of the axis.
    pub end: Point3<f64>,
    /// Radius around the axis.
    pub radius: f64,
}

impl Capsule {
    /// Create a capsule.
    #[must_use]
    pub const fn new(start: Point3<f64>, end: Point3<f64>, radius: f64) -> Self {
        Self { start, end, radius }
    }

    /// Capsule centred on `pose` with its axis along local +Y.
    #[must_use]
    pub fn from_pose(pose: &Pose, half_height: f64, radius: f64) -> Self {
        let half = pose.axis_y() * half_height;
        Self::new(pose.position - half, pose.position + half, radius)
    }

    /// Point on the axis at parameter `t` in `[0, 1]`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point3<f64> {
        self.start + (self.end - self.start) * t
    }

    /// Closest point on the axis to `p`.
    #[must_use]
    pub fn closest_on_axis(&self, p: &Point3<f64>) -> Point3<f64> {
        let axis = self.end - self.start;
        let len_sq = axis.norm_squared();
        if len_sq < EPSILON {
            return self.start;
        }
        let t = ((p - self.start).dot(&axis) / len_sq).clamp(0.0, 1.0);
        self.point_at(t)
    }
}

/// Contact points between a capsule and an obstacle, within `margin`.
#[must_use]
pub fn capsule_contacts(
    capsule: &Capsule,
    shape: &ObstacleShape,
    pose: &Pose,
    margin: f64,
) -> Vec<ContactPoint> {
    let points: Vec<ContactPoint> = match *shape {
        ObstacleShape::Sphere { radius } => vec![capsule_sphere(capsule, &pose.position, radius)],
        ObstacleShape::Box { half_extents } => vec![capsule_box(capsule, pose, &half_extents)],
        ObstacleShape::Plane { normal } => {
            capsule_plane(capsule, &pose.position, &(pose.rotation * normal.into_inner()))
        }
    };
    points
        .into_iter()
        .filter(|p| p.distance < margin)
        .collect()
}

fn capsule_sphere(capsule: &Capsule, centre: &Point3<f64>, radius: f64) -> ContactPoint {
    let on_axis = capsule.closest_on_axis(centre);
    let delta = on_axis - centre;
    let dist = delta.norm();
    let normal = if dist > EPSILON {
        delta / dist
    } else {
        // Axis passes through the centre: any direction perpendicular to it
        perpendicular(&(capsule.end - capsule.start))
    };
    ContactPoint::new(centre + normal * radius, normal, dist - radius - capsule.radius)
}

/// One point per end cap; both report when the capsule lies on the plane.
fn capsule_plane(
    capsule: &Capsule,
    origin: &Point3<f64>,
    normal: &Vector3<f64>,
) -> Vec<ContactPoint> {
    [capsule.start, capsule.end]
        .iter()
        .map(|end| {
            let height = (end - origin).dot(normal);
            ContactPoint::new(end - normal * height, *normal, height - capsule.radius)
        })
        .collect()
}

fn capsule_box(capsule: &Capsule, pose: &Pose, half_extents: &Vector3<f64>) -> ContactPoint {
    let a = pose.inverse_transform_point(&capsule.start);
    let b = pose.inverse_transform_point(&capsule.end);
    let local = Capsule::new(a, b, capsule.radius);

    // Distance from the axis to the box is convex in t; the bias makes it
    // strictly convex so a segment lying inside picks its deepest point
    let distance_at = |t: f64| {
        let p = local.point_at(t);
        box_signed_distance(&p, half_extents) + CENTRE_BIAS * p.coords.norm_squared()
    };
    let t = golden_section_min(distance_at);
    let q = local.point_at(t);

    let clamped = q.coords.zip_map(half_extents, |v, h| v.clamp(-h, h));
    let outside = q.coords - clamped;
    let (surface, normal, separation) = if outside.norm() > EPSILON {
        let d = outside.norm();
        (Point3::from(clamped), outside / d, d)
    } else {
        // Inside: push out through the nearest face
        let depth = half_extents - q.coords.abs();
        let axis = depth.imin();
        let sign = if q[axis] >= 0.0 { 1.0 } else { -1.0 };
        let mut normal = Vector3::zeros();
        normal[axis] = sign;
        let mut surface = q;
        surface[axis] = sign * half_extents[axis];
        (surface, normal, -depth[axis])
    };

    ContactPoint::new(
        pose.transform_point(&surface),
        pose.transform_vector(&normal),
        separation - capsule.radius,
    )
}

/// Signed distance from a local point to a box centred at the origin.
fn box_signed_distance(p: &Point3<f64>, half_extents: &Vector3<f64>) -> f64 {
    let q = p.coords.abs() - half_extents;
    let outside = q.map(|v| v.max(0.0)).norm();
    let inside = q.max().min(0.0);
    outside + inside
}

fn golden_section_min(f: impl Fn(f64) -> f64) -> f64 {
    let ratio = (5.0_f64.sqrt() - 1.0) / 2.0;
    let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
    for _ in 0..SEGMENT_SEARCH_ITERATIONS {
        let x1 = hi - ratio * (hi - lo);
        let x2 = lo + ratio * (hi - lo);
        if f(x1) <= f(x2) {
            hi = x2;
        } else {
            lo = x1;
        }
    }
    0.5 * (lo + hi)
}

fn perpendicular(v: &Vector3<f64>) -> Vector3<f64> {
    let candidate = if v.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    let p = v.cross(&candidate);
    if p.norm() > EPSILON {
        p.normalize()
    } else {
        Vector3::z()
    }
}
