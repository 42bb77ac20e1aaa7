//! Minimal geometry types for world crates: vectors, boxes and rays.
#![forbid(unsafe_code)]

use core::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    pub const UP: Vec3 = Vec3 {
        x: 0.0,
        y: 1.0,
        z: 0.0,
    };

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn splat(v: f32) -> Self {
        Self { x: v, y: v, z: v }
    }

    #[inline]
    pub fn dot(self, rhs: Vec3) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    #[inline]
    pub fn cross(self, rhs: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * rhs.z - self.z * rhs.y,
            y: self.z * rhs.x - self.x * rhs.z,
            z: self.x * rhs.y - self.y * rhs.x,
        }
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    #[inline]
    pub fn distance_to(self, other: Vec3) -> f32 {
        (other - self).length()
    }

    #[inline]
    pub fn normalized(self) -> Vec3 {
        let len = self.length();
        if len > 0.0 { self / len } else { self }
    }

    /// Component-wise rounding to the nearest integer (half away from zero).
    #[inline]
    pub fn round(self) -> Vec3 {
        Vec3::new(self.x.round(), self.y.round(), self.z.round())
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec3) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for Vec3 {
    #[inline]
    fn sub_assign(&mut self, rhs: Vec3) {
        self.x -= rhs.x;
        self.y -= rhs.y;
        self.z -= rhs.z;
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn div(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    #[inline]
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn from_center(center: Vec3, half: Vec3) -> Self {
        Self::new(center - half, center + half)
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) / 2.0
    }

    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) / 2.0
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn translated(&self, by: Vec3) -> Aabb {
        Aabb::new(self.min + by, self.max + by)
    }

    /// Strict overlap: boxes that only share a face do not overlap.
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.max.x > other.min.x
            && self.min.x < other.max.x
            && self.max.y > other.min.y
            && self.min.y < other.max.y
            && self.max.z > other.min.z
            && self.min.z < other.max.z
    }

    /// Strict containment of a point.
    #[inline]
    pub fn contains_point(&self, p: Vec3) -> bool {
        p.x > self.min.x
            && p.x < self.max.x
            && p.y > self.min.y
            && p.y < self.max.y
            && p.z > self.min.z
            && p.z < self.max.z
    }

    /// Inflate `self` by the half extents of `other`.
    ///
    /// Testing `other.center()` against the result is equivalent to testing
    /// `other` against `self`, which reduces box-vs-box sweeps to a ray cast.
    #[inline]
    pub fn minkowski_sum(&self, other: &Aabb) -> Aabb {
        let h = other.half_extents();
        Aabb::new(self.min - h, self.max + h)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length unless constructed from a zero vector.
    pub direction: Vec3,
}

impl Ray {
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalized(),
        }
    }

    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Parametric interval `(t_enter, t_exit)` where the ray's line crosses `aabb`.
    ///
    /// `t_enter` is negative when the origin already lies inside. Returns `None`
    /// when the box is missed or lies entirely behind the origin.
    pub fn slab_interval(&self, aabb: &Aabb) -> Option<(f32, f32)> {
        fn slab(min: f32, max: f32, origin: f32, direction: f32) -> (f32, f32) {
            if direction != 0.0 {
                let inv_d = 1.0 / direction;
                let t0 = (min - origin) * inv_d;
                let t1 = (max - origin) * inv_d;
                if t0 > t1 { (t1, t0) } else { (t0, t1) }
            } else if origin < min || origin > max {
                (f32::INFINITY, f32::NEG_INFINITY)
            } else {
                (f32::NEG_INFINITY, f32::INFINITY)
            }
        }

        let (tx0, tx1) = slab(aabb.min.x, aabb.max.x, self.origin.x, self.direction.x);
        let (ty0, ty1) = slab(aabb.min.y, aabb.max.y, self.origin.y, self.direction.y);
        let (tz0, tz1) = slab(aabb.min.z, aabb.max.z, self.origin.z, self.direction.z);

        let t_enter = tx0.max(ty0).max(tz0);
        let t_exit = tx1.min(ty1).min(tz1);
        if t_exit < t_enter.max(0.0) {
            return None;
        }
        Some((t_enter, t_exit))
    }

    /// Distance along the ray to the first point inside `aabb` (0 when the origin is inside).
    #[inline]
    pub fn intersect_aabb(&self, aabb: &Aabb) -> Option<f32> {
        self.slab_interval(aabb).map(|(t_enter, _)| t_enter.max(0.0))
    }
}
