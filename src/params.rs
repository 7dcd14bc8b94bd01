//! The validated plate-solution parameter set.
//!
//! `PlateParameters` is immutable and valid by construction: every
//! structural constraint (coefficient counts, CD invertibility, domain
//! bounds) is checked once in [`PlateBuilder::build`], so evaluation never
//! has to re-validate. "Not loaded" is represented by the absence of a
//! value in the pipeline, not by a flag on the value.

use crate::basis::{AxisDomain, SurfaceKind};
use crate::coordinate::SkyCoord;
use crate::error::{TnxError, TnxResult};
use crate::linear::PlateLinearTransform;
use crate::surface::{CrossTerms, DistortionCorrector, DistortionSurface};

/// Descriptive fields carried along from the loaders. Never consumed by
/// the transform path; everything here is opaque pass-through.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlateMetadata {
    pub pixel_system: Option<String>,
    pub sky_system: Option<String>,
    pub projection: Option<String>,
    pub function: Option<String>,
    pub shift: Option<[f64; 2]>,
    pub scale: Option<[f64; 2]>,
    pub rotation: Option<[f64; 2]>,
    pub fit_rms: Option<[f64; 2]>,
    pub wcs_rms: Option<[f64; 2]>,
}

/// A complete, validated TNX plate solution.
#[derive(Debug, Clone, PartialEq)]
pub struct PlateParameters {
    linear: PlateLinearTransform,
    corrector: DistortionCorrector,
    ref_sky: SkyCoord,
    metadata: PlateMetadata,
}

impl PlateParameters {
    pub fn builder() -> PlateBuilder {
        PlateBuilder::new()
    }

    #[inline]
    pub fn linear(&self) -> &PlateLinearTransform {
        &self.linear
    }

    #[inline]
    pub fn corrector(&self) -> &DistortionCorrector {
        &self.corrector
    }

    /// Plate tangent point in sky space, radians.
    #[inline]
    pub fn ref_sky(&self) -> SkyCoord {
        self.ref_sky
    }

    #[inline]
    pub fn ref_pixel(&self) -> [f64; 2] {
        self.linear.ref_pixel()
    }

    #[inline]
    pub fn surface_kind(&self) -> SurfaceKind {
        self.corrector.xi_surface().kind()
    }

    #[inline]
    pub fn cross_terms(&self) -> CrossTerms {
        self.corrector.xi_surface().cross()
    }

    #[inline]
    pub fn order(&self) -> usize {
        self.corrector.xi_surface().order()
    }

    #[inline]
    pub fn metadata(&self) -> &PlateMetadata {
        &self.metadata
    }
}

/// Staged construction of [`PlateParameters`]. All consistency checks run
/// in [`build`](Self::build); a failed build installs nothing.
#[derive(Debug, Clone, Default)]
pub struct PlateBuilder {
    ref_pixel: Option<[f64; 2]>,
    ref_sky: Option<SkyCoord>,
    cd: Option<[[f64; 2]; 2]>,
    surfaces: Option<(DistortionSurface, DistortionSurface)>,
    metadata: PlateMetadata,
}

impl PlateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ref_pixel(mut self, x0: f64, y0: f64) -> Self {
        self.ref_pixel = Some([x0, y0]);
        self
    }

    pub fn ref_sky(mut self, sky: SkyCoord) -> Self {
        self.ref_sky = Some(sky);
        self
    }

    pub fn ref_sky_deg(mut self, ra_deg: f64, dec_deg: f64) -> Self {
        self.ref_sky = Some(SkyCoord::from_degrees(ra_deg, dec_deg));
        self
    }

    pub fn cd_matrix(mut self, cd: [[f64; 2]; 2]) -> Self {
        self.cd = Some(cd);
        self
    }

    /// The two fitted distortion surfaces (xi first, eta second).
    pub fn surfaces(mut self, xi: DistortionSurface, eta: DistortionSurface) -> Self {
        self.surfaces = Some((xi, eta));
        self
    }

    /// All-zero distortion: the plate degenerates exactly to the linear
    /// transform followed by the projection.
    pub fn zero_distortion(
        self,
        kind: SurfaceKind,
        cross: CrossTerms,
        order: usize,
        x_domain: AxisDomain,
        y_domain: AxisDomain,
    ) -> TnxResult<Self> {
        let corrector = DistortionCorrector::zero(kind, cross, order, x_domain, y_domain)?;
        Ok(self.surfaces(
            corrector.xi_surface().clone(),
            corrector.eta_surface().clone(),
        ))
    }

    pub fn metadata(mut self, metadata: PlateMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn build(self) -> TnxResult<PlateParameters> {
        let ref_pixel = self
            .ref_pixel
            .ok_or_else(|| TnxError::invalid_parameter("missing reference pixel"))?;
        let ref_sky = self
            .ref_sky
            .ok_or_else(|| TnxError::invalid_parameter("missing reference sky point"))?;
        let cd = self
            .cd
            .ok_or_else(|| TnxError::invalid_parameter("missing CD matrix"))?;
        let (xi, eta) = self
            .surfaces
            .ok_or_else(|| TnxError::invalid_parameter("missing distortion surfaces"))?;

        let linear = PlateLinearTransform::new(ref_pixel, cd)?;
        let corrector = DistortionCorrector::new(xi, eta)?;

        Ok(PlateParameters {
            linear,
            corrector,
            ref_sky,
            metadata: self.metadata,
        })
    }
}
