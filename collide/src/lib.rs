pub mod category;
pub mod collision;
pub mod rapier_world;
pub mod units;

pub use category::{Category, CategorySet, category_bits};
pub use collision::{
    BodyTag, FixtureFilter, FixtureView, FixtureWorld, QueryFilter, RayControl, RayHit,
    SweepContact, SweepHit, SweepScratch, collide_ray, collide_ray_closest, collide_swept,
    collide_swept_closest, collide_swept_fixture, collide_swept_pair, query_aabb,
};
pub use rapier_world::{BodyDef, BodyKind, ColliderShapeDef, FixtureDef, RapierQueryWorld};
pub use units::{PTM_RATIO, PTM_RATIO_INV, from_sim, to_sim};
