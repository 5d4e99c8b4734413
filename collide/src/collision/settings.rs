/*!
Query defaults and tolerances.

These constants centralize the parameters used by the filter, the swept-shape
shortlist, and contact recovery. Per-call customization goes through the builder
methods on `QueryFilter` and `SweepScratch`; these are the defaults they start from.

Notes
- Distances are in simulation meters.
- Times are fractions of the tested motion, in [0, 1].
*/

/// Mask a default `QueryFilter` accepts: every category.
pub const DEFAULT_MASK_BITS: u16 = 0xFFFF;

/// Category a default `QueryFilter` advertises: none.
pub const DEFAULT_CATEGORY_BITS: u16 = 0;

/// Capacity of the broad-phase shortlist a swept query builds before running
/// time-of-impact tests. Fixtures past this count are dropped without being tested.
pub const DEFAULT_MAX_SWEEP_CANDIDATES: usize = 16;

/// End of the swept-shape test interval.
pub const TOI_END_TIME: f32 = 1.0;

/// Below this separation (meters) the witness points are too close to define a
/// direction, and the solver's own contact normal is used instead.
pub const NORMAL_DISTANCE_EPS: f32 = 1.0e-6;

/// How far apart (meters) two shapes may be and still get witness points from the
/// distance solver.
pub const DISTANCE_QUERY_RANGE: f32 = 1.0e4;
