/*!
Core query types and math aliases shared by the collision submodules.

This module contains no query algorithms. It defines the data exchanged between:
- the world seam (`world::FixtureWorld`) that reports candidate fixtures
- broad phase (AABB shortlisting)
- narrow phase (parry2d time-of-impact and distance queries)
- the ray and swept-shape query families

Notes
- Units are simulation meters. Use `crate::units` to convert from presentation pixels.
- Result types are generic over the fixture handle `F` so the same policy code runs
  against rapier `ColliderHandle`s and against scripted test worlds.
*/

use std::num::NonZeroU128;

use nalgebra as na;

/// Common math aliases for clarity and consistency.
pub type Vec2 = na::Vector2<f32>;
pub type Point2 = na::Point2<f32>;
pub type Iso = na::Isometry2<f32>;

/// Marks user data that carries a packed [`FixtureFilter`].
const FILTER_PRESENT: u128 = 1 << 32;

/// Per-fixture collision filter data: the fixture's own category and the
/// categories it is willing to collide with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FixtureFilter {
    pub category_bits: u16,
    pub mask_bits: u16,
}

impl Default for FixtureFilter {
    /// One category bit set, colliding with everything.
    fn default() -> Self {
        Self {
            category_bits: 0x0001,
            mask_bits: 0xFFFF,
        }
    }
}

impl FixtureFilter {
    #[inline]
    pub const fn new(category_bits: u16, mask_bits: u16) -> Self {
        Self {
            category_bits,
            mask_bits,
        }
    }

    /// Pack into collider user data.
    ///
    /// Layout: category in bits 0..16, mask in bits 16..32, bit 32 flags the
    /// presence of filter data so that an all-zero filter survives a round trip.
    #[inline]
    pub fn to_user_data(self) -> u128 {
        FILTER_PRESENT | (self.mask_bits as u128) << 16 | self.category_bits as u128
    }

    /// Unpack from collider user data. Data without the presence bit yields the default.
    #[inline]
    pub fn from_user_data(data: u128) -> Self {
        if data & FILTER_PRESENT == 0 {
            return Self::default();
        }
        Self {
            category_bits: (data & 0xFFFF) as u16,
            mask_bits: ((data >> 16) & 0xFFFF) as u16,
        }
    }
}

/// Opaque identity of a body, used only to exclude that body from a query.
///
/// Taken from the body's user data; a body whose user data is zero has no tag
/// and can never be ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BodyTag(NonZeroU128);

impl BodyTag {
    #[inline]
    pub fn new(raw: u128) -> Option<Self> {
        NonZeroU128::new(raw).map(Self)
    }

    #[inline]
    pub fn get(self) -> u128 {
        self.0.get()
    }
}

/// A single ray contact, as reported by the world and as returned to callers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit<F> {
    /// Fixture hit by the ray.
    pub fixture: F,
    /// World-space point of initial intersection.
    pub point: Point2,
    /// World-space surface normal at `point`.
    pub normal: Vec2,
    /// Fraction (0..1) along `from -> to` where the hit occurred.
    pub fraction: f32,
}

/// Contact data recovered from a swept-shape test between two known shapes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepContact {
    /// Unit normal pointing from the struck shape toward the moving shape.
    /// Zero when the distance solver could not provide one.
    pub normal: Vec2,
    /// Contact point on the struck shape (world space).
    pub contact_point: Point2,
    /// World translation of the moving shape at the time of impact.
    pub toi_position: Vec2,
    /// Time of impact as a fraction (0..1) of the motion.
    pub time: f32,
}

impl SweepContact {
    #[inline]
    pub fn with_fixture<F>(self, fixture: F) -> SweepHit<F> {
        SweepHit {
            fixture,
            normal: self.normal,
            contact_point: self.contact_point,
            toi_position: self.toi_position,
            time: self.time,
        }
    }
}

/// A swept-shape hit against a fixture found in the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepHit<F> {
    pub fixture: F,
    pub normal: Vec2,
    pub contact_point: Point2,
    pub toi_position: Vec2,
    pub time: f32,
}

/// Motion of one body over a test interval: translation only, angle held constant.
///
/// `c0`/`c` are world-space centers of mass at the start and end of the interval;
/// `local_center` is the center of mass in the body frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sweep {
    pub local_center: Point2,
    pub c0: Point2,
    pub c: Point2,
    pub angle: f32,
}

impl Sweep {
    /// A body starting at `start` and translating by `motion`.
    pub fn moving(start: &Iso, local_center: Point2, motion: Vec2) -> Self {
        let c0 = start * local_center;
        Self {
            local_center,
            c0,
            c: c0 + motion,
            angle: start.rotation.angle(),
        }
    }

    /// A body that stays at `transform` for the whole interval.
    #[inline]
    pub fn stationary(transform: &Iso, local_center: Point2) -> Self {
        Self::moving(transform, local_center, Vec2::zeros())
    }

    #[inline]
    pub fn motion(&self) -> Vec2 {
        self.c - self.c0
    }

    /// Body transform at fraction `t` of the interval.
    pub fn transform_at(&self, t: f32) -> Iso {
        let center = self.c0 + self.motion() * t;
        let rotation = na::UnitComplex::new(self.angle);
        let translation = center - rotation * self.local_center;
        Iso::from_parts(na::Translation2::from(translation), rotation)
    }
}
