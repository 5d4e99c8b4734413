use rapier2d::parry::{
    query::{self, ShapeCastOptions, ShapeCastStatus},
    shape::Shape,
};

use super::{
    settings::DISTANCE_QUERY_RANGE,
    types::{Iso, Point2, Sweep, Vec2},
};

/// Outcome of a time-of-impact solve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToiState {
    /// The shapes first touch at `ToiOutput::t`.
    Touching,
    /// The shapes never touch within the interval.
    Separated,
    /// The shapes already overlap at the start of the interval.
    Overlapped,
    /// parry has no shape cast for this pair.
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToiOutput {
    pub state: ToiState,
    pub t: f32,
}

pub struct ToiInput<'a> {
    pub shape_a: &'a dyn Shape,
    pub sweep_a: Sweep,
    pub shape_b: &'a dyn Shape,
    pub sweep_b: Sweep,
    /// Upper bound of the interval, usually `TOI_END_TIME`.
    pub t_max: f32,
}

pub struct DistanceInput<'a> {
    pub shape_a: &'a dyn Shape,
    pub transform_a: Iso,
    pub shape_b: &'a dyn Shape,
    pub transform_b: Iso,
}

/// Witness points and separation between two shapes at fixed transforms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistanceOutput {
    /// Closest point on shape A (world space).
    pub point_a: Point2,
    /// Closest point on shape B (world space).
    pub point_b: Point2,
    /// Signed separation; negative when the shapes penetrate.
    pub distance: f32,
    /// Outward unit normal of shape B at `point_b`, facing shape A.
    pub normal: Vec2,
}

/// Find the first time in `[0, t_max]` at which the two swept shapes touch.
///
/// Sweeps never rotate, so this is a linear shape cast: each shape starts at its
/// sweep's start transform and moves by the sweep's motion per unit time.
/// `stop_at_penetration` is set, so shapes overlapping at the start come back as
/// `Overlapped` rather than being cast through. `Failed` is reserved for shape
/// pairs parry cannot cast.
pub fn time_of_impact(input: &ToiInput<'_>) -> ToiOutput {
    let mut opts = ShapeCastOptions::with_max_time_of_impact(input.t_max);
    opts.stop_at_penetration = true;

    let cast = query::cast_shapes(
        &input.sweep_a.transform_at(0.0),
        &input.sweep_a.motion(),
        input.shape_a,
        &input.sweep_b.transform_at(0.0),
        &input.sweep_b.motion(),
        input.shape_b,
        opts,
    );

    match cast {
        Ok(None) => ToiOutput {
            state: ToiState::Separated,
            t: input.t_max,
        },
        Ok(Some(hit)) => {
            let state = match hit.status {
                ShapeCastStatus::PenetratingOrWithinTargetDist if hit.time_of_impact <= 0.0 => {
                    ToiState::Overlapped
                }
                _ => ToiState::Touching,
            };
            ToiOutput {
                state,
                t: hit.time_of_impact,
            }
        }
        Err(_) => ToiOutput {
            state: ToiState::Failed,
            t: 0.0,
        },
    }
}

/// Closest points between two shapes at fixed transforms.
///
/// Returns `None` when parry has no contact algorithm for the pair. Nothing is
/// cached between calls.
pub fn distance(input: &DistanceInput<'_>) -> Option<DistanceOutput> {
    let contact = query::contact(
        &input.transform_a,
        input.shape_a,
        &input.transform_b,
        input.shape_b,
        DISTANCE_QUERY_RANGE,
    )
    .ok()??;

    let normal = contact.normal2.into_inner();
    // Polygon pairs report support points that need not face each other; rebuild
    // A's witness along B's normal so separated pairs get an aligned closest pair.
    let point_a = if contact.dist > 0.0 {
        contact.point2 + normal * contact.dist
    } else {
        contact.point1
    };

    Some(DistanceOutput {
        point_a,
        point_b: contact.point2,
        distance: contact.dist,
        normal,
    })
}
