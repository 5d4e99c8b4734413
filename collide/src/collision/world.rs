use std::fmt;

use rapier2d::parry::{bounding_volume::Aabb, shape::Shape};

use super::types::{BodyTag, FixtureFilter, Iso, Point2, RayHit};

/// What a ray-cast visitor tells the world to do after each reported fixture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RayControl {
    /// Skip this fixture and keep searching with the current clip.
    Ignore,
    /// Stop the ray cast.
    Terminate,
    /// Only report fixtures at or before this fraction from now on.
    Clip(f32),
    /// Keep searching along the full ray.
    Continue,
}

/// Everything a query needs to know about one fixture.
pub struct FixtureView<'a> {
    pub shape: &'a dyn Shape,
    pub filter: FixtureFilter,
    /// World transform of `shape`.
    pub transform: Iso,
    /// Owning body's center of mass, in the frame of `transform`.
    pub local_center: Point2,
    /// Identity of the owning body, if it has one.
    pub body: Option<BodyTag>,
}

/// The physics world as seen by the query layer.
///
/// Implementations report candidates one at a time to a borrowed closure; the
/// closure's return value controls continuation. The world is borrowed shared for
/// the whole query, so it cannot be mutated from inside a visitor.
pub trait FixtureWorld {
    /// Handle identifying a fixture for the duration of a query.
    type Fixture: Copy + PartialEq + fmt::Debug;

    /// Report every fixture whose bounds overlap `aabb`, in the world's own order,
    /// until `report` returns `false`.
    fn query_aabb(&self, aabb: &Aabb, report: impl FnMut(Self::Fixture) -> bool);

    /// Report every fixture intersecting the segment `from -> to`.
    ///
    /// Fractions are measured along `to - from`. A `RayControl::Clip` restricts later
    /// reports to fixtures at or before the clip fraction; `Continue` lifts the clip.
    fn ray_cast(
        &self,
        from: Point2,
        to: Point2,
        report: impl FnMut(RayHit<Self::Fixture>) -> RayControl,
    );

    /// Shape, filter data and owning-body pose of `fixture`.
    fn fixture(&self, fixture: Self::Fixture) -> Option<FixtureView<'_>>;
}
