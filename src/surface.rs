//! Two-dimensional distortion surfaces.
//!
//! A surface is an ordered 2D basis vector (built from the two 1D bases of
//! [`crate::basis`] under a cross-term policy) dotted against a stored
//! coefficient vector. The basis layout is fixed by the fitting convention:
//!
//! ```text
//! X0Y0  X1Y0 .. X(order-1)Y0       row j = 0, all x terms
//! X0Y1  X1Y1 .. (per policy)       row j = 1
//! ...
//! X0Y(order-1) ..                  row j = order-1
//! ```
//!
//! Stored coefficients are only meaningful against the exact same layout,
//! so `order` and the cross-term policy always validate as one unit.

use crate::basis::{basis_values, AxisDomain, SurfaceKind};
use crate::coordinate::PlaneCoord;
use crate::error::{TnxError, TnxResult};
use crate::math::dot;

/// Which cross-products of the two 1D bases are retained.
///
/// Codes follow the TNX surface-string convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossTerms {
    None = 0,
    Full = 1,
    Half = 2,
}

impl CrossTerms {
    pub fn from_code(code: u32) -> TnxResult<Self> {
        match code {
            0 => Ok(Self::None),
            1 => Ok(Self::Full),
            2 => Ok(Self::Half),
            _ => Err(TnxError::invalid_parameter(format!(
                "invalid TNX cross-terms code: {}",
                code
            ))),
        }
    }

    /// Basis-vector (and coefficient-vector) length for a given order.
    pub fn coefficient_count(&self, order: usize) -> usize {
        match self {
            Self::None => 2 * order - 1,
            Self::Full => order * order,
            Self::Half => order * (order + 1) / 2,
        }
    }
}

/// Assembles the ordered 2D basis vector from two precomputed 1D bases.
///
/// Row j = 0 always carries every x term against `Y[0]`. For `None`, rows
/// j >= 1 carry only `X[0]*Y[j]`; for `Half`, row j is truncated to
/// `i < order - j`; for `Full`, every pair appears, i varying fastest.
pub fn cross_basis(x: &[f64], y: &[f64], cross: CrossTerms) -> Vec<f64> {
    let order = x.len();
    debug_assert_eq!(order, y.len());

    let mut basis = Vec::with_capacity(cross.coefficient_count(order));
    for (j, &yj) in y.iter().enumerate() {
        let row_len = if j == 0 {
            order
        } else {
            match cross {
                CrossTerms::None => 1,
                CrossTerms::Full => order,
                CrossTerms::Half => order - j,
            }
        };
        for &xi in &x[..row_len] {
            basis.push(xi * yj);
        }
    }
    basis
}

/// Exponent pairs (i, j) in the same order as [`cross_basis`] produces
/// its terms.
fn term_exponents(order: usize, cross: CrossTerms) -> Vec<(usize, usize)> {
    let mut exponents = Vec::with_capacity(cross.coefficient_count(order));
    for j in 0..order {
        let row_len = if j == 0 {
            order
        } else {
            match cross {
                CrossTerms::None => 1,
                CrossTerms::Full => order,
                CrossTerms::Half => order - j,
            }
        };
        for i in 0..row_len {
            exponents.push((i, j));
        }
    }
    exponents
}

/// One fitted distortion surface: basis configuration plus coefficients.
#[derive(Debug, Clone, PartialEq)]
pub struct DistortionSurface {
    kind: SurfaceKind,
    cross: CrossTerms,
    order: usize,
    x_domain: AxisDomain,
    y_domain: AxisDomain,
    coefficients: Vec<f64>,
}

impl DistortionSurface {
    pub fn new(
        kind: SurfaceKind,
        cross: CrossTerms,
        order: usize,
        x_domain: AxisDomain,
        y_domain: AxisDomain,
        coefficients: Vec<f64>,
    ) -> TnxResult<Self> {
        if order < 1 {
            return Err(TnxError::invalid_parameter(
                "surface order must be at least 1",
            ));
        }
        let expected = cross.coefficient_count(order);
        if coefficients.len() != expected {
            return Err(TnxError::invalid_parameter(format!(
                "surface of order {} with {:?} cross terms expects {} coefficients, got {}",
                order,
                cross,
                expected,
                coefficients.len()
            )));
        }
        Ok(Self {
            kind,
            cross,
            order,
            x_domain,
            y_domain,
            coefficients,
        })
    }

    #[inline]
    pub fn kind(&self) -> SurfaceKind {
        self.kind
    }

    #[inline]
    pub fn cross(&self) -> CrossTerms {
        self.cross
    }

    #[inline]
    pub fn order(&self) -> usize {
        self.order
    }

    #[inline]
    pub fn x_domain(&self) -> &AxisDomain {
        &self.x_domain
    }

    #[inline]
    pub fn y_domain(&self) -> &AxisDomain {
        &self.y_domain
    }

    #[inline]
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Evaluates the surface at a point in its input space.
    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        let bx = basis_values(self.kind, x, self.order, &self.x_domain);
        let by = basis_values(self.kind, y, self.order, &self.y_domain);
        dot(&cross_basis(&bx, &by, self.cross), &self.coefficients)
    }

    /// Returns the same surface with its input domain and output values
    /// rescaled. Used by the loaders to carry file-unit (degree) fits into
    /// the radian-valued plane.
    ///
    /// Legendre and Chebyshev normalize the input over the domain, so the
    /// basis is invariant to a uniform input scaling and a single output
    /// factor on the coefficients preserves the fitted shape exactly. The
    /// power basis consumes the raw coordinate, so each monomial of total
    /// degree i+j absorbs its own input scaling.
    pub fn rescaled(&self, input_scale: f64, output_scale: f64) -> TnxResult<Self> {
        let x_domain = if self.x_domain.is_unbounded() {
            self.x_domain
        } else {
            AxisDomain::new(
                self.x_domain.min() * input_scale,
                self.x_domain.max() * input_scale,
            )?
        };
        let y_domain = if self.y_domain.is_unbounded() {
            self.y_domain
        } else {
            AxisDomain::new(
                self.y_domain.min() * input_scale,
                self.y_domain.max() * input_scale,
            )?
        };
        let coefficients: Vec<f64> = match self.kind {
            SurfaceKind::Polynomial => term_exponents(self.order, self.cross)
                .into_iter()
                .zip(&self.coefficients)
                .map(|((i, j), c)| {
                    c * output_scale / libm::pow(input_scale, (i + j) as f64)
                })
                .collect(),
            SurfaceKind::Legendre | SurfaceKind::Chebyshev => {
                self.coefficients.iter().map(|c| c * output_scale).collect()
            }
        };
        Self::new(
            self.kind,
            self.cross,
            self.order,
            x_domain,
            y_domain,
            coefficients,
        )
    }

    /// Parses a TNX surface string: eight header values (type code,
    /// x order, y order, cross-terms code, xmin, xmax, ymin, ymax)
    /// followed by the coefficients.
    pub fn parse(content: &str) -> TnxResult<Self> {
        let tokens: Vec<&str> = content.split_whitespace().collect();
        if tokens.len() < 8 {
            return Err(TnxError::malformed_record(
                "TNX surface requires at least 8 header values",
            ));
        }

        let kind = SurfaceKind::from_code(parse_code(tokens[0], "surface type")?)?;
        let x_order = parse_code(tokens[1], "x order")? as usize;
        let y_order = parse_code(tokens[2], "y order")? as usize;
        let cross = CrossTerms::from_code(parse_code(tokens[3], "cross terms")?)?;
        let xmin = parse_value(tokens[4], "xmin")?;
        let xmax = parse_value(tokens[5], "xmax")?;
        let ymin = parse_value(tokens[6], "ymin")?;
        let ymax = parse_value(tokens[7], "ymax")?;

        if x_order != y_order {
            return Err(TnxError::invalid_parameter(format!(
                "surface orders must match across axes, got x={} y={}",
                x_order, y_order
            )));
        }

        let coefficients: TnxResult<Vec<f64>> = tokens[8..]
            .iter()
            .enumerate()
            .map(|(i, s)| parse_value(s, &format!("coefficient[{}]", i)))
            .collect();

        Self::new(
            kind,
            cross,
            x_order,
            AxisDomain::new(xmin, xmax)?,
            AxisDomain::new(ymin, ymax)?,
            coefficients?,
        )
    }
}

fn parse_code(s: &str, name: &str) -> TnxResult<u32> {
    // Surface strings store integer codes as floats ("2." etc).
    s.parse::<f64>()
        .map(|v| v as u32)
        .map_err(|_| TnxError::malformed_record(format!("invalid {}: '{}'", name, s)))
}

fn parse_value(s: &str, name: &str) -> TnxResult<f64> {
    s.parse()
        .map_err(|_| TnxError::malformed_record(format!("invalid {}: '{}'", name, s)))
}

/// The pair of fitted surfaces producing the plane residuals (dxi, deta).
///
/// Both surfaces must share one basis configuration: a plate solution has
/// a single surface type, cross-term policy, order, and domain.
#[derive(Debug, Clone, PartialEq)]
pub struct DistortionCorrector {
    xi_surface: DistortionSurface,
    eta_surface: DistortionSurface,
}

impl DistortionCorrector {
    pub fn new(xi_surface: DistortionSurface, eta_surface: DistortionSurface) -> TnxResult<Self> {
        if xi_surface.kind() != eta_surface.kind()
            || xi_surface.cross() != eta_surface.cross()
            || xi_surface.order() != eta_surface.order()
            || xi_surface.x_domain() != eta_surface.x_domain()
            || xi_surface.y_domain() != eta_surface.y_domain()
        {
            return Err(TnxError::invalid_parameter(
                "xi and eta surfaces must share type, cross terms, order and domains",
            ));
        }
        Ok(Self {
            xi_surface,
            eta_surface,
        })
    }

    /// A corrector whose residuals are identically zero.
    pub fn zero(
        kind: SurfaceKind,
        cross: CrossTerms,
        order: usize,
        x_domain: AxisDomain,
        y_domain: AxisDomain,
    ) -> TnxResult<Self> {
        if order < 1 {
            return Err(TnxError::invalid_parameter(
                "surface order must be at least 1",
            ));
        }
        let n = cross.coefficient_count(order);
        let surface = DistortionSurface::new(kind, cross, order, x_domain, y_domain, vec![0.0; n])?;
        Self::new(surface.clone(), surface)
    }

    #[inline]
    pub fn xi_surface(&self) -> &DistortionSurface {
        &self.xi_surface
    }

    #[inline]
    pub fn eta_surface(&self) -> &DistortionSurface {
        &self.eta_surface
    }

    /// Evaluates both surfaces at a plane position, returning the
    /// residuals (dxi, deta) to add onto it.
    pub fn correct(&self, plane: PlaneCoord) -> PlaneCoord {
        let dxi = self.xi_surface.evaluate(plane.xi(), plane.eta());
        let deta = self.eta_surface.evaluate(plane.xi(), plane.eta());
        PlaneCoord::new(dxi, deta)
    }
}
