//! Gnomonic (tangent-plane) projection between the plate plane and the sky.
//!
//! All angles are radians. The deprojection is the transform pipeline's
//! final stage; the forward projection exists for consistency checks and
//! for callers preparing reference positions.

use crate::constants::EPS;
use crate::coordinate::{PlaneCoord, SkyCoord};
use crate::error::{TnxError, TnxResult};

/// Inverse tangent-plane projection: plane coordinates about the tangent
/// point to celestial coordinates. RA comes back normalized to [0, 2*pi).
///
/// A point at (or numerically indistinguishable from) the plane origin
/// returns the tangent point exactly, avoiding the division by rho.
pub fn plane_to_sky(plane: PlaneCoord, tangent: SkyCoord) -> SkyCoord {
    let rho = plane.radius();
    if rho < EPS {
        return tangent.normalized();
    }

    let c = libm::atan(rho);
    let (sin_c, cos_c) = c.sin_cos();
    let (sin_dec0, cos_dec0) = tangent.dec().sin_cos();

    let dec = libm::asin(cos_c * sin_dec0 + plane.eta() * sin_c * cos_dec0 / rho);
    let ra = tangent.ra()
        + libm::atan2(
            plane.xi() * sin_c,
            rho * cos_dec0 * cos_c - plane.eta() * sin_dec0 * sin_c,
        );

    SkyCoord::new(ra, dec).normalized()
}

/// Forward tangent-plane projection: celestial coordinates to plane
/// coordinates about the tangent point. Fails for points on the far
/// hemisphere, where the tangent plane does not intersect the ray.
pub fn sky_to_plane(sky: SkyCoord, tangent: SkyCoord) -> TnxResult<PlaneCoord> {
    let (sin_dec0, cos_dec0) = tangent.dec().sin_cos();
    let (sin_dec, cos_dec) = sky.dec().sin_cos();
    let (sin_dra, cos_dra) = (sky.ra() - tangent.ra()).sin_cos();

    let cos_c = sin_dec0 * sin_dec + cos_dec0 * cos_dec * cos_dra;
    if cos_c <= EPS {
        return Err(TnxError::singularity(
            "gnomonic projection undefined at or beyond 90 degrees from the tangent point",
        ));
    }

    let xi = cos_dec * sin_dra / cos_c;
    let eta = (cos_dec0 * sin_dec - sin_dec0 * cos_dec * cos_dra) / cos_c;
    Ok(PlaneCoord::new(xi, eta))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{DEG_TO_RAD, HALF_PI};

    #[test]
    fn test_plane_origin_returns_tangent_point() {
        let tangent = SkyCoord::from_degrees(150.0, 30.0);
        let sky = plane_to_sky(PlaneCoord::new(0.0, 0.0), tangent);
        assert_eq!(sky.ra(), tangent.ra());
        assert_eq!(sky.dec(), tangent.dec());
    }

    #[test]
    fn test_deprojection_normalizes_ra() {
        // Tangent point just below RA = 0; a point west of it wraps.
        let tangent = SkyCoord::from_degrees(0.5, 10.0);
        let sky = plane_to_sky(PlaneCoord::new(-0.02, 0.0), tangent);
        assert!(sky.ra() >= 0.0 && sky.ra() < crate::constants::TWOPI);
        assert!(sky.ra_deg() > 350.0);
    }

    #[test]
    fn test_eta_offset_moves_declination() {
        let tangent = SkyCoord::from_degrees(0.0, 0.0);
        let sky = plane_to_sky(PlaneCoord::new(0.0, 1e-3), tangent);
        assert!((sky.dec() - libm::atan(1e-3)).abs() < 1e-15);
        assert!(sky.ra().abs() < 1e-15);
    }

    #[test]
    fn test_forward_at_tangent_point_is_origin() {
        let tangent = SkyCoord::from_degrees(210.0, -45.0);
        let plane = sky_to_plane(tangent, tangent).unwrap();
        assert!(plane.xi().abs() < 1e-15);
        assert!(plane.eta().abs() < 1e-15);
    }

    #[test]
    fn test_forward_fails_on_far_hemisphere() {
        let tangent = SkyCoord::from_degrees(0.0, 0.0);
        let antipode = SkyCoord::from_degrees(180.0, 0.0);
        assert!(sky_to_plane(antipode, tangent).is_err());
    }

    #[test]
    fn test_forward_fails_at_ninety_degrees() {
        let tangent = SkyCoord::new(0.0, 0.0);
        let pole = SkyCoord::new(0.0, HALF_PI);
        assert!(sky_to_plane(pole, tangent).is_err());
    }

    #[test]
    fn test_small_angle_forward_inverse_consistency() {
        let tangent = SkyCoord::from_degrees(150.0, 30.0);
        for &xi in &[-0.009, -0.003, 0.0, 0.004, 0.009] {
            for &eta in &[-0.008, -0.001, 0.0, 0.002, 0.0095] {
                let plane = PlaneCoord::new(xi, eta);
                let sky = plane_to_sky(plane, tangent);
                let recovered = sky_to_plane(sky, tangent).unwrap();
                assert!((recovered.xi() - xi).abs() < 1e-10);
                assert!((recovered.eta() - eta).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn test_roundtrip_near_pole() {
        let tangent = SkyCoord::from_degrees(10.0, 88.0);
        let plane = PlaneCoord::new(0.005, -0.003);
        let sky = plane_to_sky(plane, tangent);
        let recovered = sky_to_plane(sky, tangent).unwrap();
        assert!((recovered.xi() - 0.005).abs() < 1e-10);
        assert!((recovered.eta() + 0.003).abs() < 1e-10);
    }

    #[test]
    fn test_offset_in_ra_scales_with_cos_dec() {
        // A pure xi offset of 0.01 rad at Dec = 60 shifts RA by roughly
        // 0.01 / cos(60 deg) = 0.02 rad.
        let tangent = SkyCoord::from_degrees(100.0, 60.0);
        let sky = plane_to_sky(PlaneCoord::new(0.01, 0.0), tangent);
        let dra = sky.ra() - tangent.ra();
        assert!((dra - 0.02).abs() < 2e-4);
        assert!((sky.dec_deg() - 60.0).abs() < 0.01);
    }

    #[test]
    fn test_plane_origin_exactness_with_odd_tangent() {
        let tangent = SkyCoord::new(100.0 * DEG_TO_RAD, -0.3);
        let sky = plane_to_sky(PlaneCoord::new(0.0, 0.0), tangent);
        assert_eq!(sky.dec(), -0.3);
    }
}
