//! Broad-phase overlap detection using Sweep-and-Prune (SAP).
//!
//! # Algorithm
//!
//! Sweep-and-Prune works by:
//! 1. Computing axis-aligned bounding boxes (AABBs) for all entries
//! 2. Projecting AABBs onto the axis with the largest spread
//! 3. Sorting intervals by their minimum endpoint
//! 4. Sweeping through sorted intervals to find overlaps
//!
//! Only pairs with at least one cable proxy are reported: body-body
//! contact belongs to the host engine, not to the cable world.

use nalgebra::{Point3, Vector3};
use sim_contact::{CollisionObject, OverlapPair, ProxyShape};
use sim_types::Pose;

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Point3<f64>,
    /// Maximum corner of the bounding box.
    pub max: Point3<f64>,
}

impl Aabb {
    /// Create a new AABB from minimum and maximum corners.
    #[must_use]
    pub const fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a point with the given half-extents.
    #[must_use]
    pub fn from_center(center: Point3<f64>, half_extents: Vector3<f64>) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Bounds of a segment inflated by `radius`.
    #[must_use]
    pub fn from_segment(a: &Point3<f64>, b: &Point3<f64>, radius: f64) -> Self {
        let r = Vector3::repeat(radius);
        Self {
            min: a.inf(b) - r,
            max: a.sup(b) + r,
        }
    }

    /// Bounds of a proxy shape at a pose (cylinders are bounded as capsules).
    #[must_use]
    pub fn from_proxy(shape: &ProxyShape, pose: &Pose) -> Self {
        let half = pose.axis_y() * shape.half_height();
        Self::from_segment(&(pose.position - half), &(pose.position + half), shape.radius())
    }

    /// Check if this AABB overlaps with another AABB.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Expand this AABB by a margin on all sides.
    #[must_use]
    pub fn expanded(&self, margin: f64) -> Self {
        let m = Vector3::repeat(margin);
        Self {
            min: self.min - m,
            max: self.max + m,
        }
    }

    /// Get the minimum value along a specific axis.
    #[must_use]
    pub fn min_on_axis(&self, axis: Axis) -> f64 {
        self.min[axis.index()]
    }

    /// Get the maximum value along a specific axis.
    #[must_use]
    pub fn max_on_axis(&self, axis: Axis) -> f64 {
        self.max[axis.index()]
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::new(Point3::origin(), Point3::origin())
    }
}

/// Coordinate axis for sweep direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// X-axis (left-right).
    X,
    /// Y-axis (front-back).
    Y,
    /// Z-axis (up-down).
    Z,
}

impl Axis {
    const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }
}

/// An interval on the sweep axis.
#[derive(Debug, Clone, Copy)]
struct Interval {
    object: CollisionObject,
    aabb: Aabb,
    min: f64,
    max: f64,
}

/// Sweep-and-Prune broad phase over bodies and cable proxies.
#[derive(Debug, Clone)]
pub struct SweepAndPrune {
    intervals: Vec<Interval>,
    sweep_axis: Axis,
    margin: f64,
}

impl Default for SweepAndPrune {
    fn default() -> Self {
        Self::new()
    }
}

impl SweepAndPrune {
    /// Create a new sweep-and-prune broad phase.
    #[must_use]
    pub fn new() -> Self {
        Self {
            intervals: Vec::new(),
            sweep_axis: Axis::X,
            margin: 0.0,
        }
    }

    /// Create with a margin added to every AABB.
    #[must_use]
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// The axis chosen on the last sweep.
    #[must_use]
    pub fn sweep_axis(&self) -> Axis {
        self.sweep_axis
    }

    /// Pick the axis with the largest spread of AABB centres.
    fn choose_sweep_axis(entries: &[(CollisionObject, Aabb)]) -> Axis {
        if entries.is_empty() {
            return Axis::X;
        }

        let mut min_pos = Vector3::repeat(f64::INFINITY);
        let mut max_pos = Vector3::repeat(f64::NEG_INFINITY);
        for (_, aabb) in entries {
            let centre = nalgebra::center(&aabb.min, &aabb.max).coords;
            min_pos = min_pos.inf(&centre);
            max_pos = max_pos.sup(&centre);
        }

        let extent = max_pos - min_pos;
        if extent.x >= extent.y && extent.x >= extent.z {
            Axis::X
        } else if extent.y >= extent.z {
            Axis::Y
        } else {
            Axis::Z
        }
    }

    /// Find overlapping pairs that involve at least one proxy.
    pub fn find_pairs(&mut self, entries: &[(CollisionObject, Aabb)]) -> Vec<OverlapPair> {
        self.sweep_axis = Self::choose_sweep_axis(entries);
        let axis = self.sweep_axis;
        let margin = self.margin;

        self.intervals.clear();
        self.intervals.extend(entries.iter().map(|(object, aabb)| {
            let aabb = aabb.expanded(margin);
            Interval {
                object: *object,
                aabb,
                min: aabb.min_on_axis(axis),
                max: aabb.max_on_axis(axis),
            }
        }));
        self.intervals.sort_by(|a, b| a.min.total_cmp(&b.min));

        let mut pairs = Vec::new();
        for (i, current) in self.intervals.iter().enumerate() {
            for other in &self.intervals[i + 1..] {
                if other.min > current.max {
                    break;
                }
                let involves_proxy = matches!(current.object, CollisionObject::Proxy(_))
                    || matches!(other.object, CollisionObject::Proxy(_));
                if involves_proxy && current.aabb.overlaps(&other.aabb) {
                    pairs.push(OverlapPair::new(current.object, other.object));
                }
            }
        }
        pairs.sort_unstable();
        pairs
    }
}
