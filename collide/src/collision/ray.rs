use super::{
    collector::BoundedCollector,
    filter::QueryFilter,
    types::{Point2, RayHit},
    world::{FixtureWorld, RayControl},
};

/// Ignore check against the owning body, then the category/mask test.
fn passes<W: FixtureWorld>(world: &W, filter: &QueryFilter, fixture: W::Fixture) -> bool {
    world
        .fixture(fixture)
        .is_some_and(|view| !filter.ignores(view.body) && filter.accepts(&view.filter))
}

/// Collect every accepted fixture along `from -> to`.
///
/// Hits are written to `out` (cleared first) in the order the world reports them,
/// not sorted by fraction. The ray is never clipped; once `max_results` hits are
/// stored the cast is terminated. Returns the number of hits written.
pub fn collide_ray<W: FixtureWorld>(
    world: &W,
    from: Point2,
    to: Point2,
    filter: &QueryFilter,
    out: &mut Vec<RayHit<W::Fixture>>,
    max_results: usize,
) -> usize {
    let mut collector = BoundedCollector::new(out, max_results);
    if collector.is_full() {
        return 0;
    }

    world.ray_cast(from, to, |hit| {
        if passes(world, filter, hit.fixture) && !collector.offer(hit) {
            return RayControl::Terminate;
        }
        RayControl::Continue
    });

    collector.len()
}

/// Return the accepted hit closest to `from`, if any.
///
/// Each accepted hit at or before the best fraction so far replaces it and clips the
/// ray there; rejected fixtures are skipped without changing the clip.
pub fn collide_ray_closest<W: FixtureWorld>(
    world: &W,
    from: Point2,
    to: Point2,
    filter: &QueryFilter,
) -> Option<RayHit<W::Fixture>> {
    let mut best: Option<RayHit<W::Fixture>> = None;
    let mut best_fraction = 1.0;

    world.ray_cast(from, to, |hit| {
        if passes(world, filter, hit.fixture) && hit.fraction <= best_fraction {
            best_fraction = hit.fraction;
            best = Some(hit);
            RayControl::Clip(hit.fraction)
        } else {
            RayControl::Ignore
        }
    });

    best
}
