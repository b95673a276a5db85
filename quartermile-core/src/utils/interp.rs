//! 1-D interpolation over monotonically increasing, non-repeating grids
//!
//! Three strategies are provided:
//! - `Linear`: piecewise linear
//! - `Pchip`: piecewise cubic Hermite with Fritsch-Carlson slopes; smooth and
//!   shape preserving, so a flat run of samples stays flat
//! - `CubicSpline`: natural cubic spline (zero curvature at both ends); smooth
//!   in the second derivative but may overshoot between samples
//!
//! Every strategy returns the sampled value exactly at a grid point.
//! What happens when the requested point is outside of the grid is decided by
//! the `Extrapolate` enum.

use crate::imports::*;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    Linear,
    #[default]
    Pchip,
    CubicSpline,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Extrapolate {
    /// Return an error when the point is outside of the grid
    #[default]
    Error,
    /// Restrict the point to the grid bounds
    Clamp,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Interp1D {
    x: Vec<f64>,
    f_x: Vec<f64>,
    strategy: Strategy,
    extrapolate: Extrapolate,
    /// Per-point derivative data: slopes for `Pchip`, second derivatives for
    /// `CubicSpline`, empty for `Linear`
    coefs: Array1<f64>,
}

impl Interp1D {
    /// Create and validate 1-D interpolator
    pub fn new(
        x: Vec<f64>,
        f_x: Vec<f64>,
        strategy: Strategy,
        extrapolate: Extrapolate,
    ) -> anyhow::Result<Self> {
        validate(&x, &f_x)?;
        let coefs = match strategy {
            Strategy::Linear => Array1::zeros(0),
            Strategy::Pchip => pchip_slopes(&x, &f_x),
            Strategy::CubicSpline => natural_spline_second_derivs(&x, &f_x),
        };
        Ok(Self {
            x,
            f_x,
            strategy,
            extrapolate,
            coefs,
        })
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn f_x(&self) -> &[f64] {
        &self.f_x
    }

    /// Smallest and largest grid point
    pub fn domain(&self) -> (f64, f64) {
        // `validate` guarantees at least 2 points
        (self.x[0], self.x[self.x.len() - 1])
    }

    pub fn contains(&self, point: f64) -> bool {
        let (lo, hi) = self.domain();
        lo <= point && point <= hi
    }

    pub fn interpolate(&self, point: f64) -> anyhow::Result<f64> {
        ensure!(point.is_finite(), "{}", format_dbg!(point));
        let point = if self.contains(point) {
            point
        } else {
            match self.extrapolate {
                Extrapolate::Error => bail!(
                    "Supplied point must be within grid: point = {point:?}, x = {:?}",
                    self.x
                ),
                Extrapolate::Clamp => {
                    let (lo, hi) = self.domain();
                    point.clamp(lo, hi)
                }
            }
        };
        if let Some(i) = self.x.iter().position(|&x_val| x_val == point) {
            return Ok(self.f_x[i]);
        }
        let i = find_nearest_index(&self.x, point);
        Ok(match self.strategy {
            Strategy::Linear => self.linear(i, point),
            Strategy::Pchip => self.hermite(i, point),
            Strategy::CubicSpline => self.spline(i, point),
        })
    }

    fn linear(&self, i: usize, point: f64) -> f64 {
        let diff = (point - self.x[i]) / (self.x[i + 1] - self.x[i]);
        self.f_x[i] * (1.0 - diff) + self.f_x[i + 1] * diff
    }

    fn hermite(&self, i: usize, point: f64) -> f64 {
        let h = self.x[i + 1] - self.x[i];
        let t = (point - self.x[i]) / h;
        let t2 = t * t;
        let t3 = t2 * t;
        let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
        let h10 = t3 - 2.0 * t2 + t;
        let h01 = -2.0 * t3 + 3.0 * t2;
        let h11 = t3 - t2;
        h00 * self.f_x[i]
            + h10 * h * self.coefs[i]
            + h01 * self.f_x[i + 1]
            + h11 * h * self.coefs[i + 1]
    }

    fn spline(&self, i: usize, point: f64) -> f64 {
        let h = self.x[i + 1] - self.x[i];
        let to_right = self.x[i + 1] - point;
        let from_left = point - self.x[i];
        let (m_l, m_r) = (self.coefs[i], self.coefs[i + 1]);
        m_l * to_right.powi(3) / (6.0 * h)
            + m_r * from_left.powi(3) / (6.0 * h)
            + (self.f_x[i] / h - m_l * h / 6.0) * to_right
            + (self.f_x[i + 1] / h - m_r * h / 6.0) * from_left
    }
}

fn validate(x: &[f64], f_x: &[f64]) -> anyhow::Result<()> {
    ensure!(
        x.len() >= 2,
        "At least 2 data points are required for interpolation: x = {x:?}"
    );
    // Check that grid and values are compatible shapes
    ensure!(
        x.len() == f_x.len(),
        "Supplied grid and values are not compatible shapes"
    );
    ensure!(
        x.iter().chain(f_x.iter()).all(|v| v.is_finite()),
        "Supplied grid and values must be finite"
    );
    // Check that grid points are monotonically increasing
    ensure!(
        x.windows(2).all(|w| w[0] < w[1]),
        "Supplied x-coordinates must be sorted and non-repeating"
    );
    Ok(())
}

// Binary search for the lower index of the interval containing `target`;
// `arr` must be sorted with at least 2 entries.
fn find_nearest_index(arr: &[f64], target: f64) -> usize {
    if target >= arr[arr.len() - 1] {
        return arr.len() - 2;
    }

    let mut low = 0;
    let mut high = arr.len() - 1;

    while low < high {
        let mid = low + (high - low) / 2;

        if arr[mid] >= target {
            high = mid;
        } else {
            low = mid + 1;
        }
    }

    if low > 0 && arr[low] >= target {
        low - 1
    } else {
        low
    }
}

/// Fritsch-Carlson derivative estimates, with the shape-preserving
/// three-point formula at both ends
fn pchip_slopes(x: &[f64], y: &[f64]) -> Array1<f64> {
    let n = x.len();
    let h: Array1<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
    let delta: Array1<f64> = y
        .windows(2)
        .zip(h.iter())
        .map(|(w, h)| (w[1] - w[0]) / h)
        .collect();
    let mut slopes = Array1::zeros(n);
    if n == 2 {
        slopes.fill(delta[0]);
        return slopes;
    }
    for k in 1..n - 1 {
        if delta[k - 1] * delta[k] > 0.0 {
            let w1 = 2.0 * h[k] + h[k - 1];
            let w2 = h[k] + 2.0 * h[k - 1];
            slopes[k] = (w1 + w2) / (w1 / delta[k - 1] + w2 / delta[k]);
        }
    }
    slopes[0] = pchip_end_slope(h[0], h[1], delta[0], delta[1]);
    slopes[n - 1] = pchip_end_slope(h[n - 2], h[n - 3], delta[n - 2], delta[n - 3]);
    slopes
}

fn pchip_end_slope(h0: f64, h1: f64, delta0: f64, delta1: f64) -> f64 {
    let d = ((2.0 * h0 + h1) * delta0 - h0 * delta1) / (h0 + h1);
    if d.signum() != delta0.signum() || delta0 == 0.0 {
        0.0
    } else if delta0.signum() != delta1.signum() && d.abs() > 3.0 * delta0.abs() {
        3.0 * delta0
    } else {
        d
    }
}

/// Second derivatives of the natural cubic spline, solved with the Thomas
/// algorithm for the tridiagonal system
fn natural_spline_second_derivs(x: &[f64], y: &[f64]) -> Array1<f64> {
    let n = x.len();
    let mut m = Array1::zeros(n);
    if n < 3 {
        return m;
    }
    let h: Array1<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
    // interior unknowns m[1..n-1]
    let size = n - 2;
    let mut diag = Array1::<f64>::zeros(size);
    let mut upper = Array1::<f64>::zeros(size);
    let mut rhs = Array1::<f64>::zeros(size);
    for k in 0..size {
        let i = k + 1;
        diag[k] = 2.0 * (h[i - 1] + h[i]);
        upper[k] = h[i];
        rhs[k] = 6.0 * ((y[i + 1] - y[i]) / h[i] - (y[i] - y[i - 1]) / h[i - 1]);
    }
    // forward sweep; the sub-diagonal entry for row k is h[k]
    for k in 1..size {
        let w = h[k] / diag[k - 1];
        diag[k] -= w * upper[k - 1];
        rhs[k] -= w * rhs[k - 1];
    }
    // back substitution
    m[size] = rhs[size - 1] / diag[size - 1];
    for k in (0..size - 1).rev() {
        m[k + 1] = (rhs[k] - upper[k] * m[k + 2]) / diag[k];
    }
    m
}
