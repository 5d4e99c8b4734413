use rapier2d::parry::shape::Shape;

use super::{
    broad,
    collector::BoundedCollector,
    filter::QueryFilter,
    narrow_phase::{self, DistanceInput, DistanceOutput, ToiInput, ToiState},
    settings::{DEFAULT_MAX_SWEEP_CANDIDATES, NORMAL_DISTANCE_EPS, TOI_END_TIME},
    types::{Iso, Point2, Sweep, SweepContact, SweepHit, Vec2},
    world::FixtureWorld,
};

/// Reusable broad-phase shortlist for swept queries.
///
/// A swept query first collects the fixtures overlapping the swept AABB into this
/// buffer, up to `max_candidates`. Fixtures past the cap are dropped without a
/// time-of-impact test, even if they would have been hit. Keep one scratch per
/// caller and pass it to every sweep to avoid reallocating.
pub struct SweepScratch<F> {
    candidates: Vec<F>,
    max_candidates: usize,
}

impl<F> Default for SweepScratch<F> {
    fn default() -> Self {
        Self::with_max_candidates(DEFAULT_MAX_SWEEP_CANDIDATES)
    }
}

impl<F> SweepScratch<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_candidates(max_candidates: usize) -> Self {
        Self {
            candidates: Vec::with_capacity(max_candidates),
            max_candidates,
        }
    }

    #[inline]
    pub fn max_candidates(&self) -> usize {
        self.max_candidates
    }

    /// Fixtures shortlisted by the most recent sweep.
    #[inline]
    pub fn candidates(&self) -> &[F] {
        &self.candidates
    }
}

/// Run the time-of-impact solver for `sweep_a` against a stationary shape.
///
/// # Panics
/// Panics when the solver reports `ToiState::Failed`, which parry only does for
/// shape pairs it cannot cast.
fn touching_time(
    shape_a: &dyn Shape,
    sweep_a: &Sweep,
    shape_b: &dyn Shape,
    transform_b: &Iso,
    local_center_b: Point2,
) -> Option<f32> {
    let output = narrow_phase::time_of_impact(&ToiInput {
        shape_a,
        sweep_a: *sweep_a,
        shape_b,
        sweep_b: Sweep::stationary(transform_b, local_center_b),
        t_max: TOI_END_TIME,
    });

    match output.state {
        ToiState::Touching => Some(output.t),
        ToiState::Separated | ToiState::Overlapped => None,
        ToiState::Failed => {
            log::error!(
                "time-of-impact solve failed for {:?} vs {:?}",
                shape_a.shape_type(),
                shape_b.shape_type()
            );
            panic!("time-of-impact query is unsupported for this shape pair");
        }
    }
}

/// Unit normal from B toward A.
///
/// Witness points closer than `NORMAL_DISTANCE_EPS` do not define a direction; the
/// solver's own normal is used for them.
fn contact_normal(output: &DistanceOutput) -> Vec2 {
    if output.distance > NORMAL_DISTANCE_EPS {
        (output.point_a - output.point_b) / output.distance
    } else {
        output.normal
    }
}

/// Rebuild contact data for a touching pair at time `t`.
fn recover_contact(
    shape_a: &dyn Shape,
    sweep_a: &Sweep,
    t: f32,
    shape_b: &dyn Shape,
    transform_b: &Iso,
) -> SweepContact {
    let transform_a = sweep_a.transform_at(t);
    let toi_position = transform_a.translation.vector;

    let Some(output) = narrow_phase::distance(&DistanceInput {
        shape_a,
        transform_a,
        shape_b,
        transform_b: *transform_b,
    }) else {
        log::warn!(
            "no distance query for {:?} vs {:?}; reporting a zero normal",
            shape_a.shape_type(),
            shape_b.shape_type()
        );
        return SweepContact {
            normal: Vec2::zeros(),
            contact_point: Point2::from(toi_position),
            toi_position,
            time: t,
        };
    };

    SweepContact {
        normal: contact_normal(&output),
        contact_point: output.point_b,
        toi_position,
        time: t,
    }
}

/// Sweep `shape_a` from `start_a` by `motion` against a stationary `shape_b`.
///
/// Only a first contact inside the motion counts: shapes that never meet, and
/// shapes that already overlap at the start, both return `None`. The contact point
/// is taken on `shape_b`.
///
/// # Panics
/// Panics if parry cannot cast this shape pair.
pub fn collide_swept_pair(
    shape_a: &dyn Shape,
    start_a: &Iso,
    local_center_a: Point2,
    shape_b: &dyn Shape,
    transform_b: &Iso,
    local_center_b: Point2,
    motion: Vec2,
) -> Option<SweepContact> {
    let sweep_a = Sweep::moving(start_a, local_center_a, motion);
    let t = touching_time(shape_a, &sweep_a, shape_b, transform_b, local_center_b)?;
    Some(recover_contact(shape_a, &sweep_a, t, shape_b, transform_b))
}

/// Sweep a shape against one known fixture of `world`.
pub fn collide_swept_fixture<W: FixtureWorld>(
    world: &W,
    shape: &dyn Shape,
    start: &Iso,
    local_center: Point2,
    fixture: W::Fixture,
    motion: Vec2,
) -> Option<SweepHit<W::Fixture>> {
    let view = world.fixture(fixture)?;
    collide_swept_pair(
        shape,
        start,
        local_center,
        view.shape,
        &view.transform,
        view.local_center,
        motion,
    )
    .map(|contact| contact.with_fixture(fixture))
}

/// Fill `scratch` with filtered fixtures overlapping the region the shape sweeps through.
fn shortlist<W: FixtureWorld>(
    world: &W,
    scratch: &mut SweepScratch<W::Fixture>,
    shape: &dyn Shape,
    start: &Iso,
    motion: Vec2,
    filter: &QueryFilter,
) {
    let swept = broad::swept_aabb(shape, start, motion);
    let cap = scratch.max_candidates;
    let count = broad::query_aabb(world, &swept, filter, &mut scratch.candidates, cap);
    if count > 0 && count == cap {
        log::debug!("swept shortlist is full at {cap} candidates; any further fixtures are dropped");
    }
}

/// Return every fixture the shape would hit moving from `start` by `motion`.
///
/// Two phases: fixtures overlapping the swept AABB are shortlisted (see
/// [`SweepScratch`] for the cap), then each one not owned by the ignored body gets
/// an exact time-of-impact test. Hits are written to `out` (cleared first) in
/// shortlist order, up to `max_results`. Returns the number written.
///
/// # Panics
/// Panics if parry cannot cast the shape against a candidate.
pub fn collide_swept<W: FixtureWorld>(
    world: &W,
    scratch: &mut SweepScratch<W::Fixture>,
    shape: &dyn Shape,
    start: &Iso,
    local_center: Point2,
    motion: Vec2,
    filter: &QueryFilter,
    out: &mut Vec<SweepHit<W::Fixture>>,
    max_results: usize,
) -> usize {
    let mut collector = BoundedCollector::new(out, max_results);
    if collector.is_full() {
        return 0;
    }

    let sweep = Sweep::moving(start, local_center, motion);
    shortlist(world, scratch, shape, start, motion, filter);

    for &fixture in &scratch.candidates {
        let Some(view) = world.fixture(fixture) else {
            continue;
        };
        if filter.ignores(view.body) {
            continue;
        }
        let Some(t) = touching_time(shape, &sweep, view.shape, &view.transform, view.local_center)
        else {
            continue;
        };

        let contact = recover_contact(shape, &sweep, t, view.shape, &view.transform);
        if !collector.offer(contact.with_fixture(fixture)) {
            break;
        }
    }

    collector.len()
}

/// Return the first fixture the shape would hit moving from `start` by `motion`.
///
/// Uses the same shortlist as [`collide_swept`] but keeps only the smallest time of
/// impact (strictly below 1), then recovers contact data once for the winner.
///
/// # Panics
/// Panics if parry cannot cast the shape against a candidate.
pub fn collide_swept_closest<W: FixtureWorld>(
    world: &W,
    scratch: &mut SweepScratch<W::Fixture>,
    shape: &dyn Shape,
    start: &Iso,
    local_center: Point2,
    motion: Vec2,
    filter: &QueryFilter,
) -> Option<SweepHit<W::Fixture>> {
    let sweep = Sweep::moving(start, local_center, motion);
    shortlist(world, scratch, shape, start, motion, filter);

    let mut closest = None;
    let mut smallest_toi = TOI_END_TIME;

    for &fixture in &scratch.candidates {
        let Some(view) = world.fixture(fixture) else {
            continue;
        };
        if filter.ignores(view.body) {
            continue;
        }
        let Some(t) = touching_time(shape, &sweep, view.shape, &view.transform, view.local_center)
        else {
            continue;
        };
        if t < smallest_toi {
            smallest_toi = t;
            closest = Some(fixture);
        }
    }

    let fixture = closest?;
    let view = world.fixture(fixture)?;
    let contact = recover_contact(shape, &sweep, smallest_toi, view.shape, &view.transform);
    Some(contact.with_fixture(fixture))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{
        test_world::ScriptedWorld,
        types::{BodyTag, FixtureFilter},
    };
    use rapier2d::parry::shape::{Ball, Cuboid};

    const TOL: f32 = 1.0e-2;

    fn at(x: f32, y: f32) -> Iso {
        Iso::translation(x, y)
    }

    /// Balls of radius 0.5 on the x axis, hit by a radius 0.5 ball starting at the
    /// origin and moving 10 m along +x at t = (x - 1) / 10.
    fn lane(xs: &[f32]) -> ScriptedWorld {
        let mut world = ScriptedWorld::default();
        for &x in xs {
            world.push_ball(Point2::new(x, 0.0), 0.5);
        }
        world
    }

    fn sweep_lane(
        world: &ScriptedWorld,
        filter: &QueryFilter,
        max_results: usize,
    ) -> Vec<SweepHit<usize>> {
        let mut scratch = SweepScratch::new();
        let mut out = Vec::new();
        collide_swept(
            world,
            &mut scratch,
            &Ball::new(0.5),
            &at(0.0, 0.0),
            Point2::origin(),
            Vec2::new(10.0, 0.0),
            filter,
            &mut out,
            max_results,
        );
        out
    }

    #[test]
    fn pair_with_zero_motion_and_gap_is_none() {
        let hit = collide_swept_pair(
            &Ball::new(0.5),
            &at(0.0, 0.0),
            Point2::origin(),
            &Ball::new(0.5),
            &at(3.0, 0.0),
            Point2::origin(),
            Vec2::zeros(),
        );
        assert!(hit.is_none());
    }

    #[test]
    fn pair_touching_at_midpoint() {
        let contact = collide_swept_pair(
            &Ball::new(0.5),
            &at(0.0, 0.0),
            Point2::origin(),
            &Ball::new(0.5),
            &at(3.0, 0.0),
            Point2::origin(),
            Vec2::new(4.0, 0.0),
        )
        .expect("balls meet halfway");

        assert!((contact.time - 0.5).abs() < TOL, "time = {}", contact.time);
        assert!((contact.toi_position - Vec2::new(2.0, 0.0)).norm() < 4.0 * TOL);
        assert!((contact.contact_point - Point2::new(2.5, 0.0)).norm() < 4.0 * TOL);
        // Normal points from the struck ball back toward the mover.
        assert!((contact.normal - Vec2::new(-1.0, 0.0)).norm() < TOL);
    }

    #[test]
    fn pair_long_motion_reports_early_contact() {
        let contact = collide_swept_pair(
            &Ball::new(0.5),
            &at(0.0, 0.0),
            Point2::origin(),
            &Ball::new(0.5),
            &at(3.0, 0.0),
            Point2::origin(),
            Vec2::new(10.0, 0.0),
        )
        .expect("ball lies well inside the motion");

        assert!((contact.time - 0.2).abs() < TOL, "time = {}", contact.time);
        assert!((contact.toi_position - Vec2::new(2.0, 0.0)).norm() < 4.0 * TOL);
        assert!((contact.normal - Vec2::new(-1.0, 0.0)).norm() < TOL);

        let shorter = collide_swept_pair(
            &Ball::new(0.5),
            &at(0.0, 0.0),
            Point2::origin(),
            &Ball::new(0.5),
            &at(3.0, 0.0),
            Point2::origin(),
            Vec2::new(6.0, 0.0),
        )
        .expect("ball lies inside the motion");
        assert!((shorter.time - 1.0 / 3.0).abs() < TOL, "time = {}", shorter.time);
    }

    #[test]
    fn pair_already_overlapping_is_none() {
        let hit = collide_swept_pair(
            &Ball::new(0.5),
            &at(0.0, 0.0),
            Point2::origin(),
            &Cuboid::new(Vec2::new(1.0, 1.0)),
            &at(0.5, 0.0),
            Point2::origin(),
            Vec2::new(5.0, 0.0),
        );
        assert!(hit.is_none());
    }

    #[test]
    fn pair_normal_is_finite_for_cuboid_face() {
        let contact = collide_swept_pair(
            &Cuboid::new(Vec2::new(0.5, 0.5)),
            &at(0.0, 3.0),
            Point2::origin(),
            &Cuboid::new(Vec2::new(5.0, 0.5)),
            &at(0.0, 0.0),
            Point2::origin(),
            Vec2::new(0.0, -4.0),
        )
        .expect("box lands on the floor");

        assert!(contact.normal.iter().all(|c| c.is_finite()));
        assert!((contact.normal - Vec2::new(0.0, 1.0)).norm() < TOL);
        assert!((contact.time - 0.5).abs() < TOL);
    }

    #[test]
    fn fixture_variant_stamps_the_fixture() {
        let world = lane(&[4.0]);
        let hit = collide_swept_fixture(
            &world,
            &Ball::new(0.5),
            &at(0.0, 0.0),
            Point2::origin(),
            0,
            Vec2::new(10.0, 0.0),
        )
        .expect("fixture is on the path");
        assert_eq!(hit.fixture, 0);
        assert!((hit.time - 0.3).abs() < TOL);
        assert!(collide_swept_fixture(
            &world,
            &Ball::new(0.5),
            &at(0.0, 0.0),
            Point2::origin(),
            5,
            Vec2::new(10.0, 0.0),
        )
        .is_none());
    }

    #[test]
    fn world_returns_all_three_candidates() {
        let world = lane(&[3.0, 5.0, 8.0]);
        let hits = sweep_lane(&world, &QueryFilter::default(), 3);
        assert_eq!(hits.iter().map(|h| h.fixture).collect::<Vec<_>>(), vec![0, 1, 2]);
        for (hit, expected) in hits.iter().zip([0.2, 0.4, 0.7]) {
            assert!((hit.time - expected).abs() < TOL, "time = {}", hit.time);
        }
        assert_eq!(sweep_lane(&world, &QueryFilter::default(), 8).len(), 3);
    }

    #[test]
    fn world_capacity_two_keeps_query_order_prefix() {
        let world = lane(&[8.0, 3.0, 5.0]);
        let all = sweep_lane(&world, &QueryFilter::default(), 3);
        let two = sweep_lane(&world, &QueryFilter::default(), 2);
        assert_eq!(two.len(), 2);
        assert_eq!(two.as_slice(), &all[..2]);
        assert_eq!(two.iter().map(|h| h.fixture).collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn world_skips_ignored_body_and_misses() {
        let me = BodyTag::new(11).unwrap();
        let mut world = lane(&[3.0, 5.0]);
        world.entries[0].body = Some(me);
        // Off the path.
        world.push_ball(Point2::new(5.0, 4.0), 0.5);

        let hits = sweep_lane(&world, &QueryFilter::default().ignoring(me), 8);
        assert_eq!(hits.iter().map(|h| h.fixture).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn world_applies_category_filter_to_shortlist() {
        let mut world = lane(&[3.0, 5.0]);
        world.entries[0].filter = FixtureFilter::new(0x0004, 0x0004);
        let hits = sweep_lane(&world, &QueryFilter::new(0x0001, 0), 8);
        assert_eq!(hits.iter().map(|h| h.fixture).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn shortlist_cap_drops_later_candidates() {
        let world = lane(&[2.0, 3.0, 4.0, 5.0, 6.0]);
        let mut scratch = SweepScratch::with_max_candidates(2);
        let mut out = Vec::new();
        let count = collide_swept(
            &world,
            &mut scratch,
            &Ball::new(0.5),
            &at(0.0, 0.0),
            Point2::origin(),
            Vec2::new(10.0, 0.0),
            &QueryFilter::default(),
            &mut out,
            8,
        );
        assert_eq!(count, 2);
        assert_eq!(scratch.candidates(), &[0, 1]);
    }

    #[test]
    fn world_capacity_zero_returns_zero() {
        let world = lane(&[3.0]);
        assert!(sweep_lane(&world, &QueryFilter::default(), 0).is_empty());
        assert_eq!(world.reported(), 0);
    }

    #[test]
    fn closest_picks_earliest_impact() {
        // Impacts at t = 0.6 and t = 0.2, in that query order.
        let world = lane(&[7.0, 3.0]);
        let mut scratch = SweepScratch::new();
        let hit = collide_swept_closest(
            &world,
            &mut scratch,
            &Ball::new(0.5),
            &at(0.0, 0.0),
            Point2::origin(),
            Vec2::new(10.0, 0.0),
            &QueryFilter::default(),
        )
        .expect("two candidates on the path");

        assert_eq!(hit.fixture, 1);
        assert!((hit.time - 0.2).abs() < TOL);
        assert!((hit.toi_position - Vec2::new(2.0, 0.0)).norm() < 4.0 * TOL);
        assert!((hit.normal - Vec2::new(-1.0, 0.0)).norm() < TOL);
    }

    #[test]
    fn closest_without_candidates_is_none() {
        let world = lane(&[3.0]);
        let mut scratch = SweepScratch::new();
        let hit = collide_swept_closest(
            &world,
            &mut scratch,
            &Ball::new(0.5),
            &at(0.0, 5.0),
            Point2::origin(),
            Vec2::new(10.0, 0.0),
            &QueryFilter::default(),
        );
        assert!(hit.is_none());
    }

    #[test]
    fn repeated_sweeps_are_identical() {
        let world = lane(&[3.0, 5.0, 8.0]);
        let first = sweep_lane(&world, &QueryFilter::default(), 8);
        let second = sweep_lane(&world, &QueryFilter::default(), 8);
        assert_eq!(first, second);
    }

    #[test]
    fn degenerate_distance_falls_back_to_solver_normal() {
        let output = DistanceOutput {
            point_a: Point2::new(1.0, 1.0),
            point_b: Point2::new(1.0, 1.0),
            distance: 0.0,
            normal: Vec2::new(0.0, 1.0),
        };
        assert_eq!(contact_normal(&output), Vec2::new(0.0, 1.0));

        let separated = DistanceOutput {
            point_a: Point2::new(0.0, 2.0),
            point_b: Point2::new(0.0, 0.0),
            distance: 2.0,
            normal: Vec2::zeros(),
        };
        assert_eq!(contact_normal(&separated), Vec2::new(0.0, 1.0));
    }
}
