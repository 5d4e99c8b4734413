//! Scripted world for exercising query policy with a fixed report order.

use std::cell::Cell;

use rapier2d::parry::{bounding_volume::Aabb, shape::Ball};

use super::{
    broad::aabb_intersects,
    types::{BodyTag, FixtureFilter, Iso, Point2, RayHit, Vec2},
    world::{FixtureView, FixtureWorld, RayControl},
};

pub(crate) struct ScriptedEntry {
    pub center: Point2,
    pub ball: Ball,
    pub filter: FixtureFilter,
    pub body: Option<BodyTag>,
    /// Fraction at which a ray reports this entry, if it is on the ray at all.
    pub ray_fraction: Option<f32>,
}

impl ScriptedEntry {
    fn aabb(&self) -> Aabb {
        let r = Vec2::repeat(self.ball.radius);
        Aabb::new(self.center - r, self.center + r)
    }
}

/// Reports entries strictly in insertion order and counts every report.
#[derive(Default)]
pub(crate) struct ScriptedWorld {
    pub entries: Vec<ScriptedEntry>,
    /// Keep reporting after a visitor asked to stop.
    pub ignore_stop: bool,
    reported: Cell<usize>,
}

impl ScriptedWorld {
    pub fn push_ball(&mut self, center: Point2, radius: f32) -> usize {
        self.entries.push(ScriptedEntry {
            center,
            ball: Ball::new(radius),
            filter: FixtureFilter::default(),
            body: None,
            ray_fraction: None,
        });
        self.entries.len() - 1
    }

    /// Entry that only a ray can see, at `fraction` along it.
    pub fn push_ray_target(&mut self, fraction: f32) -> usize {
        let idx = self.push_ball(Point2::new(1000.0, 1000.0), 0.5);
        self.entries[idx].ray_fraction = Some(fraction);
        idx
    }

    pub fn reported(&self) -> usize {
        self.reported.get()
    }

    fn bump(&self) {
        self.reported.set(self.reported.get() + 1);
    }
}

impl FixtureWorld for ScriptedWorld {
    type Fixture = usize;

    fn query_aabb(&self, aabb: &Aabb, mut report: impl FnMut(usize) -> bool) {
        for (idx, entry) in self.entries.iter().enumerate() {
            if !aabb_intersects(&entry.aabb(), aabb) {
                continue;
            }
            self.bump();
            if !report(idx) && !self.ignore_stop {
                return;
            }
        }
    }

    fn ray_cast(
        &self,
        from: Point2,
        to: Point2,
        mut report: impl FnMut(RayHit<usize>) -> RayControl,
    ) {
        let dir = to - from;
        let mut max_fraction = 1.0;
        for (idx, entry) in self.entries.iter().enumerate() {
            let Some(fraction) = entry.ray_fraction else {
                continue;
            };
            if fraction > max_fraction {
                continue;
            }
            self.bump();
            let hit = RayHit {
                fixture: idx,
                point: from + dir * fraction,
                normal: -dir.normalize(),
                fraction,
            };
            match report(hit) {
                RayControl::Ignore => {}
                RayControl::Terminate => {
                    if !self.ignore_stop {
                        return;
                    }
                }
                RayControl::Clip(clip) => max_fraction = clip,
                RayControl::Continue => max_fraction = 1.0,
            }
        }
    }

    fn fixture(&self, fixture: usize) -> Option<FixtureView<'_>> {
        let entry = self.entries.get(fixture)?;
        Some(FixtureView {
            shape: &entry.ball,
            filter: entry.filter,
            transform: Iso::translation(entry.center.x, entry.center.y),
            local_center: Point2::origin(),
            body: entry.body,
        })
    }
}
