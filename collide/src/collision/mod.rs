/*!
Collision root module.

Filtered spatial queries and swept-shape casting over a world of fixtures,
using parry2d for narrow-phase queries. The world itself is reached only through
the `FixtureWorld` trait. The code is split for clarity:

- types:        shared data types (FixtureFilter, BodyTag, RayHit, SweepHit, Sweep)
- settings:     query defaults and tolerances
- filter:       category/mask acceptance plus one ignored body
- collector:    bounded result accumulator with a stop signal
- world:        the `FixtureWorld` seam and ray-cast control
- broad:        AABB queries, swept AABBs, BVH accelerator
- narrow_phase: thin wrappers over parry2d (time of impact, distance)
- ray:          all-hits and closest-hit ray queries
- swept:        swept-shape queries (pairwise, one fixture, all hits, closest)
*/

pub mod broad;
pub mod collector;
pub mod filter;
pub mod narrow_phase;
pub mod ray;
pub mod settings;
pub mod swept;
pub mod types;
pub mod world;

#[cfg(test)]
pub(crate) mod test_world;

// Re-export commonly used types and functions.
pub use broad::query_aabb;
pub use filter::QueryFilter;
pub use ray::{collide_ray, collide_ray_closest};
pub use swept::{
    SweepScratch, collide_swept, collide_swept_closest, collide_swept_fixture, collide_swept_pair,
};
pub use types::{BodyTag, FixtureFilter, Iso, Point2, RayHit, SweepContact, SweepHit, Vec2};
pub use world::{FixtureView, FixtureWorld, RayControl};
