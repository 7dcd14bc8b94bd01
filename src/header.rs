//! Loading a plate solution from FITS-style header keywords.
//!
//! The loader is decoupled from any FITS reader through the
//! [`KeywordProvider`] trait; [`KeywordMap`] is the in-memory
//! implementation used by callers and tests.
//!
//! Header values are in the FITS convention (degrees, degrees/pixel);
//! everything is converted to radians on the way in, including the WAT
//! distortion surfaces.

use std::collections::HashMap;

use crate::basis::{AxisDomain, SurfaceKind};
use crate::constants::DEG_TO_RAD;
use crate::coordinate::SkyCoord;
use crate::error::{TnxError, TnxResult};
use crate::params::{PlateMetadata, PlateParameters};
use crate::surface::{CrossTerms, DistortionCorrector, DistortionSurface};

pub trait KeywordProvider {
    fn get_string(&self, key: &str) -> Option<String>;
    fn get_float(&self, key: &str) -> Option<f64>;
    fn get_int(&self, key: &str) -> Option<i64>;

    fn require_float(&self, key: &str) -> TnxResult<f64> {
        self.get_float(key)
            .ok_or_else(|| TnxError::missing_keyword(key))
    }

    fn require_string(&self, key: &str) -> TnxResult<String> {
        self.get_string(key)
            .ok_or_else(|| TnxError::missing_keyword(key))
    }
}

#[derive(Debug, Clone, Default)]
pub struct KeywordMap {
    strings: HashMap<String, String>,
    floats: HashMap<String, f64>,
    ints: HashMap<String, i64>,
}

impl KeywordMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_string(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.strings.insert(key.into(), value.into());
        self
    }

    pub fn set_float(&mut self, key: impl Into<String>, value: f64) -> &mut Self {
        self.floats.insert(key.into(), value);
        self
    }

    pub fn set_int(&mut self, key: impl Into<String>, value: i64) -> &mut Self {
        self.ints.insert(key.into(), value);
        self
    }
}

impl KeywordProvider for KeywordMap {
    fn get_string(&self, key: &str) -> Option<String> {
        self.strings.get(key).cloned()
    }

    fn get_float(&self, key: &str) -> Option<f64> {
        self.floats.get(key).copied()
    }

    fn get_int(&self, key: &str) -> Option<i64> {
        self.ints.get(key).copied()
    }
}

impl PlateParameters {
    /// See [`load_header`].
    pub fn from_header<P: KeywordProvider>(header: &P) -> TnxResult<Self> {
        load_header(header)
    }
}

/// Builds a plate solution from header keywords.
///
/// Required: CRPIX1/2, CRVAL1/2 and the four CD keywords. Distortion
/// comes from the TNX `lngcor`/`latcor` strings in the WAT1/WAT2 card
/// sequences; headers without them load with zero distortion.
pub fn load_header<P: KeywordProvider>(header: &P) -> TnxResult<PlateParameters> {
    let crpix1 = header.require_float("CRPIX1")?;
    let crpix2 = header.require_float("CRPIX2")?;
    let crval1 = header.require_float("CRVAL1")?;
    let crval2 = header.require_float("CRVAL2")?;

    let cd = [
        [
            header.require_float("CD1_1")? * DEG_TO_RAD,
            header.require_float("CD1_2")? * DEG_TO_RAD,
        ],
        [
            header.require_float("CD2_1")? * DEG_TO_RAD,
            header.require_float("CD2_2")? * DEG_TO_RAD,
        ],
    ];

    let corrector = load_wat_corrector(header)?;

    let metadata = PlateMetadata {
        projection: header
            .get_string("CTYPE1")
            .map(|c| c.trim_start_matches(['R', 'A', '-']).to_lowercase()),
        ..Default::default()
    };

    PlateParameters::builder()
        .ref_pixel(crpix1, crpix2)
        .ref_sky(SkyCoord::from_degrees(crval1, crval2))
        .cd_matrix(cd)
        .surfaces(corrector.xi_surface().clone(), corrector.eta_surface().clone())
        .metadata(metadata)
        .build()
}

fn load_wat_corrector<P: KeywordProvider>(header: &P) -> TnxResult<DistortionCorrector> {
    let wat1 = collect_wat(header, 1);
    let wat2 = collect_wat(header, 2);

    if !wat1.contains("lngcor") && !wat2.contains("latcor") {
        return DistortionCorrector::zero(
            SurfaceKind::Polynomial,
            CrossTerms::None,
            1,
            AxisDomain::UNBOUNDED,
            AxisDomain::UNBOUNDED,
        );
    }

    let lng = extract_correction(&wat1, "lngcor")?;
    let lat = extract_correction(&wat2, "latcor")?;

    // lngcor/latcor are fitted in degrees on the degree-valued plane.
    let xi = DistortionSurface::parse(&lng)?.rescaled(DEG_TO_RAD, DEG_TO_RAD)?;
    let eta = DistortionSurface::parse(&lat)?.rescaled(DEG_TO_RAD, DEG_TO_RAD)?;

    DistortionCorrector::new(xi, eta)
}

/// Concatenates the WATn_001, WATn_002, ... card sequence for one axis.
fn collect_wat<P: KeywordProvider>(header: &P, axis: u8) -> String {
    let mut combined = String::new();
    for index in 1.. {
        match header.get_string(&format!("WAT{}_{:03}", axis, index)) {
            Some(card) => combined.push_str(&card),
            None => break,
        }
    }
    combined
}

fn extract_correction(wat: &str, key: &str) -> TnxResult<String> {
    let pattern = format!("{} = \"", key);
    let start = wat
        .find(&pattern)
        .ok_or_else(|| TnxError::missing_keyword(format!("TNX {} not found in WAT string", key)))?;

    let after_key = &wat[start + pattern.len()..];
    let end = after_key
        .find('"')
        .ok_or_else(|| TnxError::invalid_keyword(key, "unterminated correction string"))?;

    Ok(after_key[..end].to_string())
}
