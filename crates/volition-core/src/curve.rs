#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A 1-D response curve mapping a normalized input in `[0, 1]` to a score
/// factor (typically also in `[0, 1]`).
///
/// Analytic variants cover the usual utility shapes; `Polyline` handles
/// anything hand-drawn. Points in a polyline must be sorted by x.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Curve {
    Constant(f32),
    Linear {
        slope: f32,
        intercept: f32,
    },
    /// `slope * (u - x_shift)^exponent + y_shift`
    Polynomial {
        exponent: f32,
        slope: f32,
        x_shift: f32,
        y_shift: f32,
    },
    /// `1 / (1 + e^(-steepness * (u - midpoint)))`
    Logistic {
        steepness: f32,
        midpoint: f32,
    },
    Step {
        threshold: f32,
        low: f32,
        high: f32,
    },
    /// Piecewise-linear over `[x, y]` points; clamps outside the span.
    Polyline(Vec<[f32; 2]>),
}

impl Default for Curve {
    fn default() -> Self {
        Curve::Linear {
            slope: 1.0,
            intercept: 0.0,
        }
    }
}

impl Curve {
    pub fn evaluate(&self, u: f32) -> f32 {
        match self {
            Curve::Constant(v) => *v,
            Curve::Linear { slope, intercept } => slope * u + intercept,
            Curve::Polynomial {
                exponent,
                slope,
                x_shift,
                y_shift,
            } => slope * (u - x_shift).powf(*exponent) + y_shift,
            Curve::Logistic {
                steepness,
                midpoint,
            } => 1.0 / (1.0 + (-steepness * (u - midpoint)).exp()),
            Curve::Step {
                threshold,
                low,
                high,
            } => {
                if u < *threshold {
                    *low
                } else {
                    *high
                }
            }
            Curve::Polyline(points) => evaluate_polyline(points, u),
        }
    }
}

fn evaluate_polyline(points: &[[f32; 2]], u: f32) -> f32 {
    let Some(first) = points.first() else {
        return 0.0;
    };
    if u <= first[0] {
        return first[1];
    }
    for pair in points.windows(2) {
        let [x0, y0] = pair[0];
        let [x1, y1] = pair[1];
        if u <= x1 {
            if x1 <= x0 {
                return y1;
            }
            let t = (u - x0) / (x1 - x0);
            return y0 + (y1 - y0) * t;
        }
    }
    points[points.len() - 1][1]
}
