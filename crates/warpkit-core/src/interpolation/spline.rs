//! Host-side B-spline engine.
//!
//! Recursive prefiltering turns samples into spline coefficients so that the
//! spline passes through the samples. Evaluation then sums the separable
//! B-spline kernel over the `(order + 1)^ndim` support around each point.
//! Supports orders 0 through 5 on arrays of any rank.

use crate::error::{Result, WarpError};
use crate::tensor::{num_elements, strides};
use super::config::{BoundaryMode, MAX_ORDER};

/// Poles of the recursive prefilter for the given spline order.
fn poles(order: usize) -> Vec<f64> {
    match order {
        2 => vec![8f64.sqrt() - 3.0],
        3 => vec![3f64.sqrt() - 2.0],
        4 => vec![
            (664.0 - 438_976f64.sqrt()).sqrt() + 304f64.sqrt() - 19.0,
            (664.0 + 438_976f64.sqrt()).sqrt() - 304f64.sqrt() - 19.0,
        ],
        5 => vec![
            (67.5 - 4436.25f64.sqrt()).sqrt() + 26.25f64.sqrt() - 6.5,
            (67.5 + 4436.25f64.sqrt()).sqrt() - 26.25f64.sqrt() - 6.5,
        ],
        _ => Vec::new(),
    }
}

/// Signal extension assumed by the prefilter for a sampling mode.
///
/// `Constant` and `Nearest` have no exact recursive initialization and use
/// the mirror extension.
pub fn filter_extension(mode: BoundaryMode) -> BoundaryMode {
    match mode {
        BoundaryMode::Reflect => BoundaryMode::Reflect,
        BoundaryMode::Wrap => BoundaryMode::Wrap,
        _ => BoundaryMode::Mirror,
    }
}

fn causal_init(c: &[f64], z: f64, extension: BoundaryMode) -> f64 {
    let n = c.len();
    match extension {
        BoundaryMode::Wrap => {
            let mut z_i = z;
            let mut c0 = c[0];
            for i in 1..n {
                c0 += z_i * c[n - i];
                z_i *= z;
            }
            c0 / (1.0 - z_i)
        }
        BoundaryMode::Reflect => {
            let z_n = z.powi(n as i32);
            let mut z_i = z;
            let mut c0 = c[0] + z_n * c[n - 1];
            for i in 1..n {
                c0 += z_i * (c[i] + z_n * c[n - 1 - i]);
                z_i *= z;
            }
            c0 * z / (1.0 - z_n * z_n) + c[0]
        }
        _ => {
            let z_n_1 = z.powi(n as i32 - 1);
            let mut z_i = z;
            let mut c0 = c[0] + z_n_1 * c[n - 1];
            for i in 1..n - 1 {
                c0 += z_i * (c[i] + z_n_1 * c[n - 1 - i]);
                z_i *= z;
            }
            c0 / (1.0 - z_n_1 * z_n_1)
        }
    }
}

fn anticausal_init(c: &[f64], z: f64, extension: BoundaryMode) -> f64 {
    let n = c.len();
    match extension {
        BoundaryMode::Wrap => {
            let mut z_i = z;
            let mut cn = c[n - 1];
            for &value in &c[..n - 1] {
                cn += z_i * value;
                z_i *= z;
            }
            cn * z / (z_i - 1.0)
        }
        BoundaryMode::Reflect => c[n - 1] * z / (z - 1.0),
        _ => (z * c[n - 2] + c[n - 1]) * z / (z * z - 1.0),
    }
}

/// Prefilter one line of samples in place.
fn filter_line(line: &mut [f64], poles: &[f64], extension: BoundaryMode) {
    let n = line.len();
    if n < 2 || poles.is_empty() {
        return;
    }

    let gain: f64 = poles.iter().map(|&z| (1.0 - z) * (1.0 - 1.0 / z)).product();
    line.iter_mut().for_each(|v| *v *= gain);

    for &z in poles {
        line[0] = causal_init(line, z, extension);
        for i in 1..n {
            line[i] += z * line[i - 1];
        }
        line[n - 1] = anticausal_init(line, z, extension);
        for i in (0..n - 1).rev() {
            line[i] = z * (line[i + 1] - line[i]);
        }
    }
}

/// Compute spline coefficients of a row-major array, one axis at a time.
pub fn spline_filter(data: &[f32], shape: &[usize], order: usize, mode: BoundaryMode) -> Result<Vec<f64>> {
    check_array(data.len(), shape)?;
    check_order(order)?;

    let mut coeffs: Vec<f64> = data.iter().map(|&v| f64::from(v)).collect();
    let poles = poles(order);
    if poles.is_empty() {
        return Ok(coeffs);
    }

    let extension = filter_extension(mode);
    let strides = strides(shape);
    let mut line = Vec::new();

    for (axis, &n) in shape.iter().enumerate() {
        if n < 2 {
            continue;
        }
        let stride = strides[axis];
        for start in 0..coeffs.len() {
            if (start / stride) % n != 0 {
                continue;
            }
            line.clear();
            line.extend((0..n).map(|i| coeffs[start + i * stride]));
            filter_line(&mut line, &poles, extension);
            for (i, &v) in line.iter().enumerate() {
                coeffs[start + i * stride] = v;
            }
        }
    }

    Ok(coeffs)
}

/// Centered B-spline kernel of the given order.
pub fn bspline_kernel(order: usize, t: f64) -> f64 {
    let t = t.abs();
    match order {
        0 => {
            if t < 0.5 {
                1.0
            } else {
                0.0
            }
        }
        1 => (1.0 - t).max(0.0),
        2 => {
            if t < 0.5 {
                0.75 - t * t
            } else if t < 1.5 {
                0.5 * (1.5 - t).powi(2)
            } else {
                0.0
            }
        }
        3 => {
            if t < 1.0 {
                2.0 / 3.0 - t * t + 0.5 * t.powi(3)
            } else if t < 2.0 {
                (2.0 - t).powi(3) / 6.0
            } else {
                0.0
            }
        }
        4 => {
            if t < 0.5 {
                115.0 / 192.0 - 5.0 * t * t / 8.0 + t.powi(4) / 4.0
            } else if t < 1.5 {
                55.0 / 96.0 + 5.0 * t / 24.0 - 5.0 * t * t / 4.0 + 5.0 * t.powi(3) / 6.0
                    - t.powi(4) / 6.0
            } else if t < 2.5 {
                (2.5 - t).powi(4) / 24.0
            } else {
                0.0
            }
        }
        5 => {
            if t < 1.0 {
                11.0 / 20.0 - t * t / 2.0 + t.powi(4) / 4.0 - t.powi(5) / 12.0
            } else if t < 2.0 {
                17.0 / 40.0 + 5.0 * t / 8.0 - 7.0 * t * t / 4.0 + 5.0 * t.powi(3) / 4.0
                    - 3.0 * t.powi(4) / 8.0
                    + t.powi(5) / 24.0
            } else if t < 3.0 {
                (3.0 - t).powi(5) / 120.0
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}

/// Map a possibly out-of-range index onto `[0, n)`.
pub fn map_index(index: i64, n: usize, mode: BoundaryMode) -> usize {
    if n == 1 {
        return 0;
    }
    let n = n as i64;
    let mapped = match mode {
        BoundaryMode::Wrap => index.rem_euclid(n),
        BoundaryMode::Reflect => {
            let k = index.rem_euclid(2 * n);
            if k >= n {
                2 * n - 1 - k
            } else {
                k
            }
        }
        _ => {
            let period = 2 * n - 2;
            let k = index.rem_euclid(period);
            if k >= n {
                period - k
            } else {
                k
            }
        }
    };
    mapped as usize
}

/// Shift `x` by whole periods of the extension into `[0, period)`.
///
/// The extended coefficients repeat with that period, so the spline value
/// is unchanged and the support indices stay small.
fn fold_coordinate(x: f64, n: usize, mode: BoundaryMode) -> f64 {
    if n == 1 {
        return 0.0;
    }
    let period = match mode {
        BoundaryMode::Wrap => n,
        BoundaryMode::Reflect => 2 * n,
        _ => 2 * n - 2,
    } as f64;
    if (0.0..period).contains(&x) {
        x
    } else {
        x.rem_euclid(period)
    }
}

/// First index of the kernel support around `x`.
fn support_start(x: f64, order: usize) -> i64 {
    let half = (order / 2) as i64;
    if order % 2 == 1 {
        x.floor() as i64 - half
    } else {
        (x + 0.5).floor() as i64 - half
    }
}

/// Spline coefficients of an N-d array, ready for evaluation.
#[derive(Debug, Clone)]
pub struct SplineCoefficients {
    values: Vec<f64>,
    shape: Vec<usize>,
    strides: Vec<usize>,
    order: usize,
    extension: BoundaryMode,
}

impl SplineCoefficients {
    /// Prefilter `data` (row-major, `shape`) for sampling with `order` and `mode`.
    pub fn new(data: &[f32], shape: &[usize], order: usize, mode: BoundaryMode) -> Result<Self> {
        if shape.is_empty() {
            return Err(WarpError::unsupported_input("Cannot interpolate a 0-dimensional array"));
        }
        let values = spline_filter(data, shape, order, mode)?;
        Ok(Self {
            values,
            shape: shape.to_vec(),
            strides: strides(shape),
            order,
            extension: filter_extension(mode),
        })
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Whether these coefficients can serve a sample with `order` and `mode`.
    pub fn matches(&self, order: usize, mode: BoundaryMode) -> bool {
        self.order == order && self.extension == filter_extension(mode)
    }

    /// Evaluate the spline at points in index space.
    ///
    /// `points` is a row-major `[ndim, N]` buffer. Returns one value per point.
    pub fn sample(&self, points: &[f32], mode: BoundaryMode, cval: f32) -> Result<Vec<f32>> {
        let ndim = self.shape.len();
        if points.len() % ndim != 0 {
            return Err(WarpError::data(format!(
                "Point buffer of length {} does not hold {}D points",
                points.len(),
                ndim
            )));
        }
        let n_points = points.len() / ndim;

        let mut point = vec![0.0f64; ndim];
        let mut workspace = Workspace::new(ndim, self.order);
        let values = (0..n_points)
            .map(|p| {
                for (axis, x) in point.iter_mut().enumerate() {
                    *x = f64::from(points[axis * n_points + p]);
                }
                self.evaluate(&point, mode, cval, &mut workspace)
            })
            .collect();
        Ok(values)
    }

    fn evaluate(&self, point: &[f64], mode: BoundaryMode, cval: f32, ws: &mut Workspace) -> f32 {
        let width = self.order + 1;

        for (axis, (&x, &n)) in point.iter().zip(&self.shape).enumerate() {
            let last = (n - 1) as f64;
            let x = match mode {
                _ if x.is_nan() => return cval,
                BoundaryMode::Constant if !(0.0..=last).contains(&x) => return cval,
                BoundaryMode::Nearest => x.clamp(0.0, last),
                BoundaryMode::Constant => x,
                _ if x.is_infinite() => return cval,
                _ => fold_coordinate(x, n, self.extension),
            };

            let start = support_start(x, self.order);
            for k in 0..width {
                let index = start + k as i64;
                ws.offsets[axis * width + k] = map_index(index, n, self.extension) * self.strides[axis];
                ws.weights[axis * width + k] = if self.order == 0 {
                    1.0
                } else {
                    bspline_kernel(self.order, x - index as f64)
                };
            }
        }

        // Odometer over the separable support
        let ndim = self.shape.len();
        ws.counter.iter_mut().for_each(|c| *c = 0);
        let mut total = 0.0;
        loop {
            let mut weight = 1.0;
            let mut offset = 0;
            for axis in 0..ndim {
                let slot = axis * width + ws.counter[axis];
                weight *= ws.weights[slot];
                offset += ws.offsets[slot];
            }
            total += weight * self.values[offset];

            let mut axis = ndim;
            loop {
                if axis == 0 {
                    return total as f32;
                }
                axis -= 1;
                ws.counter[axis] += 1;
                if ws.counter[axis] < width {
                    break;
                }
                ws.counter[axis] = 0;
            }
        }
    }
}

/// Per-axis scratch buffers reused across points.
struct Workspace {
    offsets: Vec<usize>,
    weights: Vec<f64>,
    counter: Vec<usize>,
}

impl Workspace {
    fn new(ndim: usize, order: usize) -> Self {
        let width = order + 1;
        Self {
            offsets: vec![0; ndim * width],
            weights: vec![0.0; ndim * width],
            counter: vec![0; ndim],
        }
    }
}

fn check_array(len: usize, shape: &[usize]) -> Result<()> {
    if len != num_elements(shape) || shape.iter().any(|&n| n == 0) {
        return Err(WarpError::unsupported_input(format!(
            "Buffer of length {} does not match non-empty shape {:?}",
            len, shape
        )));
    }
    Ok(())
}

pub(crate) fn check_order(order: usize) -> Result<()> {
    if order > MAX_ORDER {
        return Err(WarpError::invalid_configuration(format!(
            "Spline order must be between 0 and {}, got {}",
            MAX_ORDER, order
        )));
    }
    Ok(())
}
