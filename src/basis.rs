//! One-dimensional polynomial basis generation.
//!
//! A TNX distortion surface is built from two independent 1D bases, one per
//! plate axis. Three families are supported; the normalized families map
//! the configured domain onto [-1, 1] before applying their recurrence.

use crate::constants::EPS;
use crate::error::{TnxError, TnxResult};

/// Polynomial family used for the distortion surfaces.
///
/// The discriminants match the type codes stored in TNX surface strings
/// and plate-solution records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    Chebyshev = 1,
    Legendre = 2,
    Polynomial = 3,
}

impl SurfaceKind {
    pub fn from_code(code: u32) -> TnxResult<Self> {
        match code {
            1 => Ok(Self::Chebyshev),
            2 => Ok(Self::Legendre),
            3 => Ok(Self::Polynomial),
            _ => Err(TnxError::invalid_parameter(format!(
                "invalid TNX surface type code: {}",
                code
            ))),
        }
    }
}

/// Normalization bounds for one plate axis.
///
/// Both bounds zero means "no normalization": the raw coordinate feeds the
/// recurrence directly. Otherwise `max > min` is required and the
/// coordinate is mapped onto [-1, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisDomain {
    min: f64,
    max: f64,
}

impl AxisDomain {
    /// Raw-coordinate domain (no normalization).
    pub const UNBOUNDED: Self = Self { min: 0.0, max: 0.0 };

    pub fn new(min: f64, max: f64) -> TnxResult<Self> {
        let domain = Self { min, max };
        if !domain.is_unbounded() && max <= min {
            return Err(TnxError::numeric_domain(format!(
                "axis domain bounds must satisfy max > min, got [{}, {}]",
                min, max
            )));
        }
        Ok(domain)
    }

    #[inline]
    pub fn min(&self) -> f64 {
        self.min
    }

    #[inline]
    pub fn max(&self) -> f64 {
        self.max
    }

    #[inline]
    pub fn is_unbounded(&self) -> bool {
        self.min.abs() < EPS && self.max.abs() < EPS
    }

    /// Maps a raw coordinate onto [-1, 1], or passes it through when
    /// unbounded. Collapsed bounds are rejected at construction, so the
    /// division is always safe here.
    #[inline]
    pub fn normalize(&self, x: f64) -> f64 {
        if self.is_unbounded() {
            x
        } else {
            (2.0 * x - (self.max + self.min)) / (self.max - self.min)
        }
    }
}

/// Computes the ordered 1D basis `b[0..order-1]` for one axis.
///
/// Power basis: monomials of the raw coordinate. Legendre and Chebyshev:
/// their standard three-term recurrences over the normalized coordinate.
pub fn basis_values(kind: SurfaceKind, x: f64, order: usize, domain: &AxisDomain) -> Vec<f64> {
    match kind {
        SurfaceKind::Polynomial => power_values(x, order),
        SurfaceKind::Legendre => legendre_values(domain.normalize(x), order),
        SurfaceKind::Chebyshev => chebyshev_values(domain.normalize(x), order),
    }
}

fn power_values(x: f64, order: usize) -> Vec<f64> {
    let mut b = Vec::with_capacity(order);
    b.push(1.0);
    for i in 1..order {
        b.push(x * b[i - 1]);
    }
    b
}

fn legendre_values(xn: f64, order: usize) -> Vec<f64> {
    let mut b = Vec::with_capacity(order);
    b.push(1.0);
    if order > 1 {
        b.push(xn);
    }
    for i in 2..order {
        let next = ((2 * i - 1) as f64 * xn * b[i - 1] - (i - 1) as f64 * b[i - 2]) / i as f64;
        b.push(next);
    }
    b
}

fn chebyshev_values(xn: f64, order: usize) -> Vec<f64> {
    let mut b = Vec::with_capacity(order);
    b.push(1.0);
    if order > 1 {
        b.push(xn);
    }
    for i in 2..order {
        b.push(2.0 * xn * b[i - 1] - b[i - 2]);
    }
    b
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_ulp_lt;

    #[test]
    fn test_surface_kind_codes() {
        assert_eq!(SurfaceKind::from_code(1).unwrap(), SurfaceKind::Chebyshev);
        assert_eq!(SurfaceKind::from_code(2).unwrap(), SurfaceKind::Legendre);
        assert_eq!(SurfaceKind::from_code(3).unwrap(), SurfaceKind::Polynomial);
        assert!(SurfaceKind::from_code(0).is_err());
        assert!(SurfaceKind::from_code(4).is_err());
    }

    #[test]
    fn test_domain_unbounded() {
        let d = AxisDomain::UNBOUNDED;
        assert!(d.is_unbounded());
        assert_eq!(d.normalize(42.0), 42.0);
    }

    #[test]
    fn test_domain_normalize_center_and_edges() {
        let d = AxisDomain::new(0.0, 100.0).unwrap();
        assert_eq!(d.normalize(0.0), -1.0);
        assert_eq!(d.normalize(50.0), 0.0);
        assert_eq!(d.normalize(100.0), 1.0);
    }

    #[test]
    fn test_domain_collapsed_bounds_rejected() {
        assert!(AxisDomain::new(10.0, 10.0).is_err());
        assert!(AxisDomain::new(20.0, 10.0).is_err());
    }

    #[test]
    fn test_power_basis_monomials() {
        for x in [-2.5, 0.0, 0.3, 7.0] {
            let b = basis_values(SurfaceKind::Polynomial, x, 5, &AxisDomain::UNBOUNDED);
            assert_eq!(b.len(), 5);
            for (i, v) in b.iter().enumerate() {
                assert_ulp_lt!(*v, x.powi(i as i32), 2);
            }
        }
    }

    #[test]
    fn test_order_one_returns_unit() {
        for kind in [
            SurfaceKind::Polynomial,
            SurfaceKind::Legendre,
            SurfaceKind::Chebyshev,
        ] {
            let b = basis_values(kind, 0.7, 1, &AxisDomain::UNBOUNDED);
            assert_eq!(b, vec![1.0]);
        }
    }

    #[test]
    fn test_order_two_is_one_and_xn() {
        let d = AxisDomain::new(0.0, 2.0).unwrap();
        for kind in [SurfaceKind::Legendre, SurfaceKind::Chebyshev] {
            let b = basis_values(kind, 1.5, 2, &d);
            assert_eq!(b, vec![1.0, 0.5]);
        }
    }

    #[test]
    fn test_legendre_closed_forms() {
        let xn: f64 = 0.6;
        let b = basis_values(SurfaceKind::Legendre, xn, 5, &AxisDomain::UNBOUNDED);
        assert_eq!(b[0], 1.0);
        assert_eq!(b[1], xn);
        assert_ulp_lt!(b[2], (3.0 * xn * xn - 1.0) / 2.0, 2);
        assert_ulp_lt!(b[3], (5.0 * xn.powi(3) - 3.0 * xn) / 2.0, 4);
        assert_ulp_lt!(
            b[4],
            (35.0 * xn.powi(4) - 30.0 * xn.powi(2) + 3.0) / 8.0,
            8
        );
    }

    #[test]
    fn test_chebyshev_closed_forms() {
        let xn: f64 = 0.4;
        let b = basis_values(SurfaceKind::Chebyshev, xn, 5, &AxisDomain::UNBOUNDED);
        assert_eq!(b[0], 1.0);
        assert_eq!(b[1], xn);
        assert_ulp_lt!(b[2], 2.0 * xn * xn - 1.0, 2);
        assert_ulp_lt!(b[3], 4.0 * xn.powi(3) - 3.0 * xn, 4);
        assert_ulp_lt!(b[4], 8.0 * xn.powi(4) - 8.0 * xn.powi(2) + 1.0, 8);
    }

    #[test]
    fn test_normalized_family_uses_domain() {
        // x = 75 over [50, 100] normalizes to 0.
        let d = AxisDomain::new(50.0, 100.0).unwrap();
        let b = basis_values(SurfaceKind::Chebyshev, 75.0, 3, &d);
        assert_eq!(b[1], 0.0);
        assert_eq!(b[2], -1.0);
    }
}
