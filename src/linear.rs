use crate::coordinate::{PixelCoord, PlaneCoord};
use crate::error::{TnxError, TnxResult};

/// Singularity test is relative to the matrix magnitude: plate scales in
/// radians/pixel put legitimate determinants near 1e-18.
const RELATIVE_DETERMINANT_THRESHOLD: f64 = 1e-12;

/// The linear plate transform: pixel offsets about the reference pixel
/// mapped through the CD matrix (rotation, scale, shear) into the tangent
/// plane. The matrix must be invertible; its inverse is computed once at
/// construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlateLinearTransform {
    ref_pixel: [f64; 2],
    cd: [[f64; 2]; 2],
    cd_inverse: [[f64; 2]; 2],
    determinant: f64,
}

impl PlateLinearTransform {
    pub fn new(ref_pixel: [f64; 2], cd: [[f64; 2]; 2]) -> TnxResult<Self> {
        let determinant = cd[0][0] * cd[1][1] - cd[0][1] * cd[1][0];
        let norm = cd
            .iter()
            .flatten()
            .fold(0.0_f64, |acc, &v| acc.max(v.abs()));
        if determinant.abs() <= RELATIVE_DETERMINANT_THRESHOLD * norm * norm {
            return Err(TnxError::non_invertible_matrix(determinant));
        }
        let cd_inverse = compute_inverse(cd, determinant);
        Ok(Self {
            ref_pixel,
            cd,
            cd_inverse,
            determinant,
        })
    }

    /// Pixel position to tangent-plane position. Pure affine map, no
    /// failure modes.
    pub fn pixel_to_plane(&self, pixel: PixelCoord) -> PlaneCoord {
        let dx = pixel.x() - self.ref_pixel[0];
        let dy = pixel.y() - self.ref_pixel[1];
        let xi = self.cd[0][0] * dx + self.cd[0][1] * dy;
        let eta = self.cd[1][0] * dx + self.cd[1][1] * dy;
        PlaneCoord::new(xi, eta)
    }

    /// Reverse map through the precomputed CD inverse.
    pub fn plane_to_pixel(&self, plane: PlaneCoord) -> PixelCoord {
        let xi = plane.xi();
        let eta = plane.eta();
        let x = self.cd_inverse[0][0] * xi + self.cd_inverse[0][1] * eta + self.ref_pixel[0];
        let y = self.cd_inverse[1][0] * xi + self.cd_inverse[1][1] * eta + self.ref_pixel[1];
        PixelCoord::new(x, y)
    }

    #[inline]
    pub fn ref_pixel(&self) -> [f64; 2] {
        self.ref_pixel
    }

    #[inline]
    pub fn cd_matrix(&self) -> [[f64; 2]; 2] {
        self.cd
    }

    /// Mean plate scale (plane units per pixel).
    #[inline]
    pub fn pixel_scale(&self) -> f64 {
        libm::sqrt(self.determinant.abs())
    }
}

fn compute_inverse(m: [[f64; 2]; 2], det: f64) -> [[f64; 2]; 2] {
    let inv_det = 1.0 / det;
    [
        [m[1][1] * inv_det, -m[0][1] * inv_det],
        [-m[1][0] * inv_det, m[0][0] * inv_det],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PI;

    #[test]
    fn test_reference_pixel_maps_to_origin() {
        let t = PlateLinearTransform::new([512.0, 512.0], [[1e-4, 0.0], [0.0, 1e-4]]).unwrap();
        let plane = t.pixel_to_plane(PixelCoord::new(512.0, 512.0));
        assert_eq!(plane.xi(), 0.0);
        assert_eq!(plane.eta(), 0.0);
    }

    #[test]
    fn test_known_values() {
        let t = PlateLinearTransform::new([512.0, 512.0], [[1e-4, 0.0], [0.0, 1e-4]]).unwrap();
        let plane = t.pixel_to_plane(PixelCoord::new(612.0, 412.0));
        assert!((plane.xi() - 0.01).abs() < 1e-15);
        assert!((plane.eta() + 0.01).abs() < 1e-15);
    }

    #[test]
    fn test_roundtrip_pixel_plane_pixel() {
        let t = PlateLinearTransform::new([512.0, 512.0], [[1e-4, 2e-6], [-3e-6, 1e-4]]).unwrap();
        let original = PixelCoord::new(256.0, 768.0);
        let recovered = t.plane_to_pixel(t.pixel_to_plane(original));
        assert!((original.x() - recovered.x()).abs() < 1e-9);
        assert!((original.y() - recovered.y()).abs() < 1e-9);
    }

    #[test]
    fn test_rotated_matrix_roundtrip() {
        let angle = PI / 6.0;
        let scale = 5e-5;
        let (s, c) = angle.sin_cos();
        let cd = [[scale * c, -scale * s], [scale * s, scale * c]];
        let t = PlateLinearTransform::new([256.0, 256.0], cd).unwrap();

        let original = PixelCoord::new(100.0, 400.0);
        let recovered = t.plane_to_pixel(t.pixel_to_plane(original));
        assert!((original.x() - recovered.x()).abs() < 1e-9);
        assert!((original.y() - recovered.y()).abs() < 1e-9);
    }

    #[test]
    fn test_singular_matrix_rejected() {
        let result = PlateLinearTransform::new([512.0, 512.0], [[1.0, 2.0], [2.0, 4.0]]);
        assert!(result.is_err());
        match result {
            Err(TnxError::NonInvertibleMatrix { determinant }) => {
                assert_eq!(determinant, 0.0);
            }
            _ => panic!("expected NonInvertibleMatrix error"),
        }
    }

    #[test]
    fn test_fine_plate_scale_accepted() {
        // ~0.1 arcsec/px in radians.
        let s = 4.85e-10;
        assert!(PlateLinearTransform::new([0.0, 0.0], [[s, 0.0], [0.0, s]]).is_ok());
    }

    #[test]
    fn test_pixel_scale() {
        let t = PlateLinearTransform::new([512.0, 512.0], [[1e-4, 0.0], [0.0, 1e-4]]).unwrap();
        assert!((t.pixel_scale() - 1e-4).abs() < 1e-19);
    }
}
