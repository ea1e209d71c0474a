//! Closed-form polynomial roots and bounded Newton refinement.
//!
//! The profile shapes without a direct solution reduce to a monic quartic in
//! one segment duration. Ferrari's method through the cubic resolvent gives
//! all real roots in a fixed number of operations; only the non-negative ones
//! are kept since every unknown is a time.

use heapless::Vec;

/// Non-negative real roots of a polynomial of degree four or less.
pub type Roots = Vec<f64, 4>;

const COS_120: f64 = -0.5;
const SIN_120: f64 = 0.866_025_403_784_438_6;

/// Number of Newton steps applied to every root candidate.
pub const NEWTON_STEPS: usize = 2;

/// Real roots of the monic cubic `x³ + a·x² + b·x + c`.
///
/// Returns either one real root or three (possibly repeated) real roots.
pub fn solve_resolvent(a: f64, b: f64, c: f64) -> Vec<f64, 3> {
    let mut roots = Vec::new();

    let a = a / 3.0;
    let a2 = a * a;
    let q = a2 - b / 3.0;
    let r = (a * (2.0 * a2 - b) + c) / 2.0;
    let r2 = r * r;
    let q3 = q * q * q;

    if r2 < q3 {
        let q_sqrt = q.sqrt();
        let t = (r / (q * q_sqrt)).clamp(-1.0, 1.0);
        let q = -2.0 * q_sqrt;
        let theta = t.acos() / 3.0;
        let ux = theta.cos() * q;
        let uyi = theta.sin() * q;
        let _ = roots.push(ux - a);
        let _ = roots.push(ux * COS_120 - uyi * SIN_120 - a);
        let _ = roots.push(ux * COS_120 + uyi * SIN_120 - a);
        return roots;
    }

    let mut big_a = -(r.abs() + (r2 - q3).sqrt()).cbrt();
    if r < 0.0 {
        big_a = -big_a;
    }
    let big_b = if big_a == 0.0 { 0.0 } else { q / big_a };

    let x0 = (big_a + big_b) - a;
    let x1 = -(big_a + big_b) / 2.0 - a;
    let imaginary = 3f64.sqrt() * (big_a - big_b) / 2.0;

    let _ = roots.push(x0);
    if imaginary.abs() < f64::EPSILON {
        let _ = roots.push(x1);
        let _ = roots.push(x1);
    }
    roots
}

/// Non-negative real roots of the monic quartic `x⁴ + a·x³ + b·x² + c·x + d`.
pub fn solve_quartic_monic(a: f64, b: f64, c: f64, d: f64) -> Roots {
    let mut roots = Roots::new();

    if d.abs() < f64::EPSILON {
        if c.abs() < f64::EPSILON {
            // x²·(x² + a·x + b)
            insert(&mut roots, 0.0);
            let discriminant = a * a - 4.0 * b;
            if discriminant.abs() < f64::EPSILON {
                insert(&mut roots, -a / 2.0);
            } else if discriminant > 0.0 {
                let s = discriminant.sqrt();
                insert(&mut roots, (-a - s) / 2.0);
                insert(&mut roots, (-a + s) / 2.0);
            }
            return roots;
        }

        if a.abs() < f64::EPSILON && b.abs() < f64::EPSILON {
            // x·(x³ + c)
            insert(&mut roots, 0.0);
            insert(&mut roots, -c.cbrt());
            return roots;
        }
    }

    let resolvent = solve_resolvent(-b, a * c - 4.0 * d, -a * a * d - c * c + 4.0 * b * d);
    // the largest magnitude root keeps the factorization well conditioned
    let y = resolvent
        .iter()
        .copied()
        .fold(resolvent[0], |best, y| if y.abs() > best.abs() { y } else { best });

    let (p1, p2, q1, q2);
    let discriminant = y * y - 4.0 * d;
    if discriminant.abs() < f64::EPSILON {
        q1 = y / 2.0;
        q2 = q1;
        let discriminant = a * a - 4.0 * (b - y);
        if discriminant.abs() < f64::EPSILON {
            p1 = a / 2.0;
            p2 = p1;
        } else {
            let s = discriminant.sqrt();
            p1 = (a + s) / 2.0;
            p2 = (a - s) / 2.0;
        }
    } else {
        let s = discriminant.sqrt();
        q1 = (y + s) / 2.0;
        q2 = (y - s) / 2.0;
        p1 = (a * q1 - c) / (q1 - q2);
        p2 = (c - a * q2) / (q1 - q2);
    }

    const EPS: f64 = 16.0 * f64::EPSILON;
    for (p, q) in [(p1, q1), (p2, q2)] {
        let discriminant = p * p - 4.0 * q;
        if discriminant.abs() < EPS {
            insert(&mut roots, -p / 2.0);
        } else if discriminant > 0.0 {
            let s = discriminant.sqrt();
            insert(&mut roots, (-p - s) / 2.0);
            insert(&mut roots, (-p + s) / 2.0);
        }
    }

    roots
}

#[inline]
fn insert(roots: &mut Roots, x: f64) {
    if x >= 0.0 {
        // a quartic has at most four roots
        let _ = roots.push(x);
    }
}

/// Evaluates a polynomial given by its coefficients, highest degree first.
#[inline]
pub fn poly_eval<const N: usize>(coefficients: &[f64; N], x: f64) -> f64 {
    coefficients.iter().fold(0.0, |acc, c| acc * x + c)
}

/// Evaluates the derivative of a polynomial given highest degree first.
#[inline]
pub fn poly_derivative_eval<const N: usize>(coefficients: &[f64; N], x: f64) -> f64 {
    let degree = N.saturating_sub(1);
    coefficients[..degree]
        .iter()
        .enumerate()
        .fold(0.0, |acc, (i, c)| acc * x + c * (degree - i) as f64)
}

/// Applies a fixed number of Newton steps to `x`.
///
/// `residual` is the quantity driven to zero and `derivative` its slope in
/// `x`. A step is skipped once the slope is too flat to divide by.
pub fn refine(
    mut x: f64,
    steps: usize,
    mut residual: impl FnMut(f64) -> f64,
    mut derivative: impl FnMut(f64) -> f64,
) -> f64 {
    for _ in 0..steps {
        let slope = derivative(x);
        if slope.is_nan() || slope.abs() < 16.0 * f64::EPSILON {
            break;
        }
        x -= residual(x) / slope;
    }
    x
}
