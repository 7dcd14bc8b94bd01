//! The end-to-end pixel-to-sky transform.
//!
//! `TnxTransform` owns at most one plate solution. Loading replaces the
//! solution atomically: a failed load leaves the previous one in place,
//! and evaluation against an empty transform is `NotLoaded` rather than
//! garbage output.

use crate::coordinate::{PixelCoord, PlaneCoord, SkyCoord};
use crate::error::{TnxError, TnxResult};
use crate::header::{self, KeywordProvider};
use crate::params::PlateParameters;
use crate::projection;
use crate::text;

#[derive(Debug, Clone, Default)]
pub struct TnxTransform {
    params: Option<PlateParameters>,
}

impl TnxTransform {
    /// An empty transform; every evaluation fails with `NotLoaded` until
    /// a plate solution is installed.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parameters(params: PlateParameters) -> Self {
        Self {
            params: Some(params),
        }
    }

    /// Installs a plate solution, replacing any previous one.
    pub fn load(&mut self, params: PlateParameters) {
        self.params = Some(params);
    }

    /// Loads a plate solution from header keywords. On error the current
    /// solution is untouched.
    pub fn load_header<P: KeywordProvider>(&mut self, provider: &P) -> TnxResult<()> {
        self.params = Some(header::load_header(provider)?);
        Ok(())
    }

    /// Loads a plate solution from a text database record. On error the
    /// current solution is untouched.
    pub fn load_database(&mut self, record: &str) -> TnxResult<()> {
        self.params = Some(text::load_database(record)?);
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.params.is_some()
    }

    pub fn parameters(&self) -> Option<&PlateParameters> {
        self.params.as_ref()
    }

    fn require_params(&self) -> TnxResult<&PlateParameters> {
        self.params.as_ref().ok_or(TnxError::NotLoaded)
    }

    /// Pixel to corrected tangent-plane coordinates, radians.
    pub fn pixel_to_plane(&self, pixel: PixelCoord) -> TnxResult<PlaneCoord> {
        let params = self.require_params()?;
        let plane = params.linear().pixel_to_plane(pixel);
        let residual = params.corrector().correct(plane);
        Ok(PlaneCoord::new(
            plane.xi() + residual.xi(),
            plane.eta() + residual.eta(),
        ))
    }

    /// Full pixel-to-sky evaluation: linear transform, distortion
    /// correction, then gnomonic deprojection about the tangent point.
    pub fn pixel_to_sky(&self, pixel: PixelCoord) -> TnxResult<SkyCoord> {
        let params = self.require_params()?;
        let plane = self.pixel_to_plane(pixel)?;
        Ok(projection::plane_to_sky(plane, params.ref_sky()))
    }

    /// Convenience wrapper over [`pixel_to_sky`](Self::pixel_to_sky)
    /// taking raw pixel components.
    pub fn xy_to_sky(&self, x: f64, y: f64) -> TnxResult<SkyCoord> {
        self.pixel_to_sky(PixelCoord::new(x, y))
    }

    /// Inverse evaluation: sky to pixel through the forward projection
    /// and the linear inverse. The distortion residual is evaluated at
    /// the uncorrected plane position, so this is exact only for a
    /// distortion-free plate; for fitted plates it carries the fit-level
    /// approximation of evaluating the surfaces once.
    pub fn sky_to_pixel(&self, sky: SkyCoord) -> TnxResult<PixelCoord> {
        let params = self.require_params()?;
        let plane = projection::sky_to_plane(sky, params.ref_sky())?;
        let residual = params.corrector().correct(plane);
        let uncorrected = PlaneCoord::new(plane.xi() - residual.xi(), plane.eta() - residual.eta());
        Ok(params.linear().plane_to_pixel(uncorrected))
    }
}
