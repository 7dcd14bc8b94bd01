use crate::constants::{DEG_TO_RAD, RAD_TO_DEG};
use crate::math::wrap_0_2pi;

/// A position in detector pixel space (FITS convention: 1-based axes).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelCoord {
    x: f64,
    y: f64,
}

impl PixelCoord {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.y
    }
}

/// Tangent-plane coordinates (xi, eta) in radians.
///
/// The plane is tangent to the celestial sphere at the plate reference
/// point; xi increases toward positive RA, eta toward positive Dec.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneCoord {
    xi: f64,
    eta: f64,
}

impl PlaneCoord {
    #[inline]
    pub fn new(xi: f64, eta: f64) -> Self {
        Self { xi, eta }
    }

    #[inline]
    pub fn xi(&self) -> f64 {
        self.xi
    }

    #[inline]
    pub fn eta(&self) -> f64 {
        self.eta
    }

    /// Radial distance from the tangent point.
    #[inline]
    pub fn radius(&self) -> f64 {
        libm::sqrt(self.xi * self.xi + self.eta * self.eta)
    }
}

/// Celestial equatorial coordinates, stored in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyCoord {
    ra: f64,
    dec: f64,
}

impl SkyCoord {
    #[inline]
    pub fn new(ra_rad: f64, dec_rad: f64) -> Self {
        Self {
            ra: ra_rad,
            dec: dec_rad,
        }
    }

    #[inline]
    pub fn from_degrees(ra_deg: f64, dec_deg: f64) -> Self {
        Self {
            ra: ra_deg * DEG_TO_RAD,
            dec: dec_deg * DEG_TO_RAD,
        }
    }

    #[inline]
    pub fn ra(&self) -> f64 {
        self.ra
    }

    #[inline]
    pub fn dec(&self) -> f64 {
        self.dec
    }

    #[inline]
    pub fn ra_deg(&self) -> f64 {
        self.ra * RAD_TO_DEG
    }

    #[inline]
    pub fn dec_deg(&self) -> f64 {
        self.dec * RAD_TO_DEG
    }

    /// Returns the same position with RA folded into [0, 2*pi).
    #[inline]
    pub fn normalized(&self) -> Self {
        Self {
            ra: wrap_0_2pi(self.ra),
            dec: self.dec,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::TWOPI;

    #[test]
    fn test_pixel_coord_accessors() {
        let p = PixelCoord::new(100.5, 200.5);
        assert_eq!(p.x(), 100.5);
        assert_eq!(p.y(), 200.5);
    }

    #[test]
    fn test_plane_coord_radius() {
        let c = PlaneCoord::new(3.0e-4, 4.0e-4);
        assert!((c.radius() - 5.0e-4).abs() < 1e-18);
    }

    #[test]
    fn test_plane_coord_origin_radius() {
        assert_eq!(PlaneCoord::new(0.0, 0.0).radius(), 0.0);
    }

    #[test]
    fn test_sky_coord_degrees_roundtrip() {
        let c = SkyCoord::from_degrees(150.0, 30.0);
        assert!((c.ra_deg() - 150.0).abs() < 1e-12);
        assert!((c.dec_deg() - 30.0).abs() < 1e-12);
    }

    #[test]
    fn test_sky_coord_normalized() {
        let c = SkyCoord::new(-0.25, 0.5).normalized();
        assert!((c.ra() - (TWOPI - 0.25)).abs() < 1e-15);
        assert_eq!(c.dec(), 0.5);
    }
}
