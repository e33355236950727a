//! Geodesy math helpers
//!
//! Conformal-latitude conversions, exact degree trigonometry, and angle
//! normalization used by the transverse Mercator projection. The formulas
//! follow GeographicLib (Karney 2011).

/// Error-compensated sum of two doubles (two-sum).
///
/// Returns `(s, t)` where `s = round(u + v)` and `t` is the exact residual.
#[inline]
pub fn sum_exact(u: f64, v: f64) -> (f64, f64) {
    let s = u + v;
    let up = s - v;
    let vpp = s - up;
    let up = up - u;
    let vpp = vpp - v;
    let t = -(up + vpp);
    (s, t)
}

/// Stable evaluation of `e * atanh(e * x)` for either ellipsoid sign.
#[inline]
pub fn eatanhe(x: f64, es: f64) -> f64 {
    if es > 0.0 {
        es * (es * x).atanh()
    } else if es < 0.0 {
        -es * (-es * x).atan()
    } else {
        0.0
    }
}

/// Forward conformal-latitude conversion: tan(phi) -> tan(chi).
///
/// Karney (2011), equations 7-9.
#[inline]
pub fn taupf(tau: f64, es: f64) -> f64 {
    let tau1 = (1.0 + tau * tau).sqrt();
    let sig = eatanhe(tau / tau1, es).sinh();
    (1.0 + sig * sig).sqrt() * tau - sig * tau1
}

/// Inverse conformal-latitude conversion: tan(chi) -> tan(phi).
///
/// Newton iteration on [`taupf`]; converges in a handful of steps for any
/// geodetically sensible eccentricity. Karney (2011), equations 19-21.
pub fn tauf(taup: f64, es: f64) -> f64 {
    const MAX_ITER: usize = 8;
    // sqrt(f64::EPSILON), precomputed since sqrt is not const.
    const TOL: f64 = 1.490_116_119_384_765_6e-8;

    let e2m = 1.0 - es * es;
    let mut tau = taup / e2m.sqrt();
    let stol = TOL * taup.abs().max(1.0);

    for _ in 0..MAX_ITER {
        let taupa = taupf(tau, es);
        let dtau = (taup - taupa) * (1.0 + e2m * tau * tau)
            / (e2m * (1.0 + tau * tau).sqrt() * (1.0 + taupa * taupa).sqrt());
        tau += dtau;
        if dtau.abs() < stol {
            break;
        }
    }
    tau
}

/// Normalize an angle in degrees to [-180, 180).
#[inline]
pub fn ang_normalize(x: f64) -> f64 {
    let mut x = x % 360.0;
    if x < -180.0 {
        x += 360.0;
    }
    if x >= 180.0 {
        x -= 360.0;
    }
    x
}

/// Exact angular difference `y - x` in degrees, compensated for rounding.
pub fn ang_diff(x: f64, y: f64) -> f64 {
    let (d, t) = sum_exact(ang_normalize(-x), ang_normalize(y));
    ang_normalize(d) + t
}

/// Sine and cosine of an angle in degrees, exact at multiples of 90.
pub fn sincosd(x: f64) -> (f64, f64) {
    let mut r = x % 360.0;
    if r < 0.0 {
        r += 360.0;
    }
    let q = (r / 90.0 + 0.5).floor() as i32;
    r -= 90.0 * f64::from(q);
    let r = r.to_radians();
    let (s, c) = r.sin_cos();

    match q & 3 {
        0 => (s, c),
        1 => (c, -s),
        2 => (-s, -c),
        _ => (-c, s),
    }
}

/// Polynomial evaluation by Horner's method, highest coefficient first.
#[inline]
pub fn polyval(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().fold(0.0, |acc, &c| acc * x + c)
}
