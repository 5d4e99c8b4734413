//! Rapier-backed query world.
//!
//! Builds an in-memory Rapier scene (bodies plus attached colliders) from
//! schema-agnostic definitions and exposes it to the query layer through
//! [`FixtureWorld`]. Region queries and ray casts run over a parry `Bvh` of fixture
//! AABBs that this module owns.
//!
//! Design goals
//! - Deterministic: given the same inputs (sorted by `id`), build identical sets and
//!   report candidates in the same order.
//! - Query-only: no dynamics step is run here. Move bodies with
//!   [`RapierQueryWorld::set_body_position`] and call [`RapierQueryWorld::refresh`]
//!   before querying again.

// Re-export Rapier so downstream crates can use its types without depending on
// `rapier2d` directly.
pub use rapier2d;

use rapier2d::parry::{
    bounding_volume::{Aabb, BoundingVolume},
    query::{PointQuery, Ray, RayCast},
};
use rapier2d::prelude::*;

use crate::collision::{
    broad::{WorldAccel, segment_aabb},
    types::{BodyTag, FixtureFilter, Iso, Point2, RayHit, Vec2},
    world::{FixtureView, FixtureWorld, RayControl},
};

/// How the engine treats a body. Queries see every kind the same way.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BodyKind {
    #[default]
    Fixed,
    Dynamic,
    Kinematic,
}

/// Canonical definition of one body and its fixtures.
///
/// Conventions
/// - Units are meters; use [`crate::units`] to convert from pixels.
/// - `user_data` becomes the body's [`BodyTag`]; 0 means the body has no identity
///   and can never be ignored by a query.
#[derive(Clone, Debug)]
pub struct BodyDef {
    /// Stable unique identifier used to ensure deterministic insertion order.
    pub id: u32,
    pub kind: BodyKind,
    /// World-space translation.
    pub translation: Vec2,
    /// World-space rotation in radians.
    pub angle: f32,
    pub user_data: u128,
    pub fixtures: Vec<FixtureDef>,
}

impl BodyDef {
    /// A fixed body at `translation` with no rotation and no fixtures yet.
    pub fn fixed(id: u32, translation: Vec2) -> Self {
        Self {
            id,
            kind: BodyKind::Fixed,
            translation,
            angle: 0.0,
            user_data: 0,
            fixtures: Vec::new(),
        }
    }

    pub fn with_user_data(mut self, user_data: u128) -> Self {
        self.user_data = user_data;
        self
    }

    pub fn with_fixture(mut self, fixture: FixtureDef) -> Self {
        self.fixtures.push(fixture);
        self
    }

    #[inline]
    fn pose(&self) -> Iso {
        Iso::new(self.translation, self.angle)
    }
}

/// One collider attached to a body.
#[derive(Clone, Debug)]
pub struct FixtureDef {
    pub shape: ColliderShapeDef,
    /// Offset from the body origin, in the body frame.
    pub offset: Vec2,
    pub filter: FixtureFilter,
}

impl FixtureDef {
    /// A fixture at the body origin with the default filter.
    pub fn new(shape: ColliderShapeDef) -> Self {
        Self {
            shape,
            offset: Vec2::zeros(),
            filter: FixtureFilter::default(),
        }
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_filter(mut self, filter: FixtureFilter) -> Self {
        self.filter = filter;
        self
    }
}

/// Supported collider shapes (meters).
#[derive(Clone, Debug)]
pub enum ColliderShapeDef {
    Ball { radius: f32 },

    Cuboid { half_extents: Vec2 },

    /// Y-aligned capsule.
    CapsuleY { radius: f32, half_height: f32 },

    /// Cuboid whose corners are rounded by `border_radius`.
    RoundCuboid { half_extents: Vec2, border_radius: f32 },

    /// Convex hull of the given points. Degenerate hulls are skipped at build time.
    ConvexPolygon { points: Vec<Point2> },
}

struct BodyRecord {
    id: u32,
    handle: RigidBodyHandle,
    pose: Iso,
    /// Colliders with their offset from the body origin, in definition order.
    fixtures: Vec<(ColliderHandle, Iso)>,
}

/// In-memory Rapier sets plus the fixture accelerator used by the query layer.
pub struct RapierQueryWorld {
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    accel: WorldAccel<ColliderHandle>,
    /// Sorted by `id`.
    records: Vec<BodyRecord>,
}

impl RapierQueryWorld {
    /// Build a query world from a list of body definitions.
    ///
    /// Determinism
    /// - The input is sorted by `id` before insertion.
    /// - Any NaN/invalid values should be filtered/validated by the caller.
    pub fn build(mut defs: Vec<BodyDef>) -> Self {
        defs.sort_by_key(|d| d.id);

        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();
        let mut records = Vec::with_capacity(defs.len());

        for def in defs.iter() {
            let pose = def.pose();
            let rb = body_builder(def.kind)
                .pose(pose)
                .user_data(def.user_data)
                .build();
            let handle = bodies.insert(rb);

            let mut fixtures = Vec::with_capacity(def.fixtures.len());
            for fixture in def.fixtures.iter() {
                let Some(collider) = collider_from_def(fixture) else {
                    log::warn!(
                        "body {}: skipping fixture with degenerate convex hull",
                        def.id
                    );
                    continue;
                };
                let co_handle = colliders.insert_with_parent(collider, handle, &mut bodies);
                fixtures.push((co_handle, Iso::translation(fixture.offset.x, fixture.offset.y)));
            }

            records.push(BodyRecord {
                id: def.id,
                handle,
                pose,
                fixtures,
            });
        }

        let mut world = Self {
            bodies,
            colliders,
            accel: WorldAccel::build([]),
            records,
        };
        world.refresh();
        world
    }

    /// Place every collider at its body's pose and rebuild the fixture accelerator.
    pub fn refresh(&mut self) {
        for record in self.records.iter() {
            for (co_handle, offset) in record.fixtures.iter() {
                if let Some(collider) = self.colliders.get_mut(*co_handle) {
                    collider.set_position(record.pose * offset);
                }
            }
        }

        let colliders = &self.colliders;
        self.accel = WorldAccel::build(self.records.iter().flat_map(|record| {
            record.fixtures.iter().filter_map(|(co_handle, _)| {
                colliders
                    .get(*co_handle)
                    .map(|collider| (*co_handle, collider.compute_aabb()))
            })
        }));
        log::debug!(
            "rebuilt fixture accelerator: {} bodies, {} fixtures",
            self.records.len(),
            self.accel.len()
        );
    }

    fn record(&self, id: u32) -> Option<&BodyRecord> {
        let idx = self.records.binary_search_by_key(&id, |r| r.id).ok()?;
        self.records.get(idx)
    }

    /// Handle of the body built from the definition with this `id`.
    pub fn body(&self, id: u32) -> Option<RigidBodyHandle> {
        self.record(id).map(|r| r.handle)
    }

    /// Fixtures of the body with this `id`, in definition order.
    pub fn fixtures_of(&self, id: u32) -> impl Iterator<Item = ColliderHandle> + '_ {
        self.record(id)
            .into_iter()
            .flat_map(|r| r.fixtures.iter().map(|(h, _)| *h))
    }

    /// Move a body. Takes effect for queries after the next [`Self::refresh`].
    ///
    /// Returns `false` if no body has this `id`.
    pub fn set_body_position(&mut self, id: u32, pose: Iso) -> bool {
        let Ok(idx) = self.records.binary_search_by_key(&id, |r| r.id) else {
            return false;
        };
        let record = &mut self.records[idx];
        record.pose = pose;
        if let Some(rb) = self.bodies.get_mut(record.handle) {
            rb.set_position(pose, true);
        }
        true
    }

    /// Bounds of all fixtures of the body with this `id` at its current pose.
    ///
    /// `None` when the body is unknown or has no fixtures.
    pub fn body_aabb(&self, id: u32) -> Option<Aabb> {
        self.record(id)?
            .fixtures
            .iter()
            .filter_map(|(co_handle, _)| self.colliders.get(*co_handle))
            .map(|collider| collider.compute_aabb())
            .reduce(|acc, aabb| acc.merged(&aabb))
    }
}

impl FixtureWorld for RapierQueryWorld {
    type Fixture = ColliderHandle;

    fn query_aabb(&self, aabb: &Aabb, report: impl FnMut(ColliderHandle) -> bool) {
        self.accel.for_each_overlap(aabb, report);
    }

    fn ray_cast(
        &self,
        from: Point2,
        to: Point2,
        mut report: impl FnMut(RayHit<ColliderHandle>) -> RayControl,
    ) {
        let ray = Ray::new(from, to - from);
        let mut max_fraction = 1.0;

        // Candidates come from the bounds of the whole segment; the clip only
        // narrows which of them can still produce a hit.
        self.accel
            .for_each_overlap(&segment_aabb(from, to), |co_handle| {
                let Some(collider) = self.colliders.get(co_handle) else {
                    return true;
                };
                let shape = collider.shape();
                let iso = collider.position();
                // Rays that start inside a fixture do not report it.
                if shape.contains_point(iso, &from) {
                    return true;
                }
                let Some(hit) = shape.cast_ray_and_get_normal(iso, &ray, max_fraction, true)
                else {
                    return true;
                };

                let control = report(RayHit {
                    fixture: co_handle,
                    point: ray.point_at(hit.time_of_impact),
                    normal: hit.normal,
                    fraction: hit.time_of_impact,
                });
                match control {
                    RayControl::Ignore => true,
                    RayControl::Terminate => false,
                    RayControl::Clip(fraction) => {
                        max_fraction = fraction;
                        fraction > 0.0
                    }
                    RayControl::Continue => {
                        max_fraction = 1.0;
                        true
                    }
                }
            });
    }

    fn fixture(&self, fixture: ColliderHandle) -> Option<FixtureView<'_>> {
        let collider = self.colliders.get(fixture)?;
        let transform = *collider.position();
        let rb = collider.parent().and_then(|h| self.bodies.get(h));

        Some(FixtureView {
            shape: collider.shape(),
            filter: FixtureFilter::from_user_data(collider.user_data),
            transform,
            local_center: rb
                .map(|rb| transform.inverse_transform_point(rb.center_of_mass()))
                .unwrap_or_else(Point2::origin),
            body: rb.and_then(|rb| BodyTag::new(rb.user_data)),
        })
    }
}

fn body_builder(kind: BodyKind) -> RigidBodyBuilder {
    match kind {
        BodyKind::Fixed => RigidBodyBuilder::fixed(),
        BodyKind::Dynamic => RigidBodyBuilder::dynamic(),
        BodyKind::Kinematic => RigidBodyBuilder::kinematic_position_based(),
    }
}

/// Build a Rapier collider from a `FixtureDef`, offset from its parent body.
///
/// Returns `None` for a convex polygon whose hull cannot be computed.
fn collider_from_def(def: &FixtureDef) -> Option<Collider> {
    let builder = match &def.shape {
        ColliderShapeDef::Ball { radius } => ColliderBuilder::ball(*radius),

        ColliderShapeDef::Cuboid { half_extents } => {
            ColliderBuilder::cuboid(half_extents.x, half_extents.y)
        }

        ColliderShapeDef::CapsuleY {
            radius,
            half_height,
        } => ColliderBuilder::capsule_y(*half_height, *radius),

        ColliderShapeDef::RoundCuboid {
            half_extents,
            border_radius,
        } => ColliderBuilder::round_cuboid(half_extents.x, half_extents.y, *border_radius),

        // parry asserts on hulls of fewer than two points; a polygon needs three.
        ColliderShapeDef::ConvexPolygon { points } if points.len() < 3 => return None,
        ColliderShapeDef::ConvexPolygon { points } => ColliderBuilder::convex_hull(points)?,
    };

    Some(
        builder
            .translation(def.offset)
            .user_data(def.filter.to_user_data())
            .build(),
    )
}
