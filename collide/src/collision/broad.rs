use rapier2d::parry::{
    bounding_volume::Aabb,
    partitioning::{Bvh, BvhBuildStrategy},
    shape::Shape,
};

use super::{
    collector::BoundedCollector,
    filter::QueryFilter,
    types::{Iso, Point2, Vec2},
    world::FixtureWorld,
};

/// Acceleration structure for region-overlap queries over a world's fixtures.
///
/// Notes:
/// - Each fixture is stored as a world-space AABB computed at build time. Rebuild after
///   bodies move.
/// - `leaves` maps each BVH leaf index back to the fixture handle it was built from.
pub struct WorldAccel<T> {
    /// BVH over fixture AABBs.
    pub bvh: Bvh,
    /// Fixture handles, indexed by BVH leaf.
    pub leaves: Vec<T>,
}

impl<T: Copy> WorldAccel<T> {
    /// Build the accelerator from `(fixture, world AABB)` pairs.
    pub fn build(entries: impl IntoIterator<Item = (T, Aabb)>) -> Self {
        let (leaves, aabbs): (Vec<T>, Vec<Aabb>) = entries.into_iter().unzip();
        Self {
            bvh: Bvh::from_leaves(BvhBuildStrategy::Binned, &aabbs),
            leaves,
        }
    }

    /// Return true if this accelerator has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Number of entries in this accelerator.
    #[inline]
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// Visit every fixture whose AABB intersects `aabb` until `visit` returns `false`.
    pub fn for_each_overlap(&self, aabb: &Aabb, mut visit: impl FnMut(T) -> bool) {
        for leaf_idx in self.bvh.intersect_aabb(aabb) {
            if !visit(self.leaves[leaf_idx as usize]) {
                break;
            }
        }
    }
}

/// Collect the fixtures whose bounds overlap `aabb` and pass the category/mask test.
///
/// The ignored body is not consulted here. At most `max_results` handles are written
/// to `out` (which is cleared first), in the world's report order; the count is returned.
pub fn query_aabb<W: FixtureWorld>(
    world: &W,
    aabb: &Aabb,
    filter: &QueryFilter,
    out: &mut Vec<W::Fixture>,
    max_results: usize,
) -> usize {
    let mut collector = BoundedCollector::new(out, max_results);
    if collector.is_full() {
        return 0;
    }

    world.query_aabb(aabb, |fixture| {
        let accepted = world
            .fixture(fixture)
            .is_some_and(|view| filter.accepts(&view.filter));
        if accepted {
            collector.offer(fixture)
        } else {
            true
        }
    });

    collector.len()
}

/// Compute the region covered by `shape` translating from `start` by `motion`.
pub fn swept_aabb(shape: &dyn Shape, start: &Iso, motion: Vec2) -> Aabb {
    let aabb_start = shape.compute_aabb(start);
    let aabb_end = Aabb::new(aabb_start.mins + motion, aabb_start.maxs + motion);
    aabb_union(&aabb_start, &aabb_end)
}

/// Bounds of the segment `from -> to`.
pub fn segment_aabb(from: Point2, to: Point2) -> Aabb {
    Aabb::new(from.inf(&to), from.sup(&to))
}

/// Compute the union of two AABBs.
pub fn aabb_union(a: &Aabb, b: &Aabb) -> Aabb {
    Aabb::new(a.mins.inf(&b.mins), a.maxs.sup(&b.maxs))
}

/// Test two AABBs for intersection (touching counts).
pub fn aabb_intersects(a: &Aabb, b: &Aabb) -> bool {
    !(a.maxs.x < b.mins.x || a.mins.x > b.maxs.x || a.maxs.y < b.mins.y || a.mins.y > b.maxs.y)
}
