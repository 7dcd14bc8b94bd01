//! Loading a plate solution from a ccmap-style text database record.
//!
//! The record is line oriented: a `begin <name>` line, then one
//! `keyword value` pair per line, then an optional `surface2 <n>` block
//! of n two-column rows carrying the xi and eta distortion surfaces in
//! parallel (eight header rows followed by the coefficients).
//!
//! Angles and the CD matrix are stored in degrees and converted to
//! radians on load, like the header path.

use crate::basis::{AxisDomain, SurfaceKind};
use crate::constants::DEG_TO_RAD;
use crate::coordinate::SkyCoord;
use crate::error::{TnxError, TnxResult};
use crate::params::{PlateMetadata, PlateParameters};
use crate::surface::{CrossTerms, DistortionCorrector, DistortionSurface};

impl PlateParameters {
    /// See [`load_database`].
    pub fn from_database(record: &str) -> TnxResult<Self> {
        load_database(record)
    }
}

/// Parses one plate-solution record.
pub fn load_database(record: &str) -> TnxResult<PlateParameters> {
    let mut lines = record
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'));

    match lines.next() {
        Some(l) if l.starts_with("begin") => {}
        _ => return Err(TnxError::malformed_record("record must start with 'begin'")),
    }

    let mut fields = RecordFields::default();
    let mut xi_tokens: Vec<String> = Vec::new();
    let mut eta_tokens: Vec<String> = Vec::new();

    while let Some(line) = lines.next() {
        let mut parts = line.split_whitespace();
        let keyword = match parts.next() {
            Some(k) => k,
            None => continue,
        };
        let rest: Vec<&str> = parts.collect();

        if keyword == "surface2" {
            let rows: usize = rest
                .first()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| TnxError::malformed_record("surface2 requires a row count"))?;
            for i in 0..rows {
                let row = lines
                    .next()
                    .ok_or_else(|| TnxError::malformed_record("surface2 block ended early"))?;
                let mut cols = row.split_whitespace();
                match (cols.next(), cols.next()) {
                    (Some(a), Some(b)) => {
                        xi_tokens.push(a.to_string());
                        eta_tokens.push(b.to_string());
                    }
                    _ => {
                        return Err(TnxError::malformed_record(format!(
                            "surface2 row {} needs two columns",
                            i + 1
                        )))
                    }
                }
            }
        } else {
            fields.set(keyword, &rest)?;
        }
    }

    let corrector = if xi_tokens.is_empty() {
        DistortionCorrector::zero(
            SurfaceKind::Polynomial,
            CrossTerms::None,
            1,
            AxisDomain::UNBOUNDED,
            AxisDomain::UNBOUNDED,
        )?
    } else {
        let xi = DistortionSurface::parse(&xi_tokens.join(" "))?.rescaled(DEG_TO_RAD, DEG_TO_RAD)?;
        let eta =
            DistortionSurface::parse(&eta_tokens.join(" "))?.rescaled(DEG_TO_RAD, DEG_TO_RAD)?;
        DistortionCorrector::new(xi, eta)?
    };

    fields.into_parameters(corrector)
}

#[derive(Default)]
struct RecordFields {
    xpixref: Option<f64>,
    ypixref: Option<f64>,
    lngref: Option<f64>,
    latref: Option<f64>,
    cd: [[Option<f64>; 2]; 2],
    metadata: PlateMetadata,
}

impl RecordFields {
    fn set(&mut self, keyword: &str, rest: &[&str]) -> TnxResult<()> {
        let float = |name: &str| -> TnxResult<f64> {
            rest.first()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| TnxError::malformed_record(format!("invalid value for '{}'", name)))
        };
        let string = || rest.first().map(|s| s.to_string());

        match keyword {
            "xpixref" => self.xpixref = Some(float(keyword)?),
            "ypixref" => self.ypixref = Some(float(keyword)?),
            "lngref" => self.lngref = Some(float(keyword)?),
            "latref" => self.latref = Some(float(keyword)?),
            "cd1_1" => self.cd[0][0] = Some(float(keyword)?),
            "cd1_2" => self.cd[0][1] = Some(float(keyword)?),
            "cd2_1" => self.cd[1][0] = Some(float(keyword)?),
            "cd2_2" => self.cd[1][1] = Some(float(keyword)?),
            "pixsystem" => self.metadata.pixel_system = string(),
            "coosystem" => self.metadata.sky_system = string(),
            "projection" => self.metadata.projection = string(),
            "function" => self.metadata.function = string(),
            "xishift" => set_pair(&mut self.metadata.shift, 0, float(keyword)?),
            "etashift" => set_pair(&mut self.metadata.shift, 1, float(keyword)?),
            "xmag" => set_pair(&mut self.metadata.scale, 0, float(keyword)?),
            "ymag" => set_pair(&mut self.metadata.scale, 1, float(keyword)?),
            "xrotation" => set_pair(&mut self.metadata.rotation, 0, float(keyword)?),
            "yrotation" => set_pair(&mut self.metadata.rotation, 1, float(keyword)?),
            "wcsxirms" => set_pair(&mut self.metadata.wcs_rms, 0, float(keyword)?),
            "wcsetarms" => set_pair(&mut self.metadata.wcs_rms, 1, float(keyword)?),
            "xirms" => set_pair(&mut self.metadata.fit_rms, 0, float(keyword)?),
            "etarms" => set_pair(&mut self.metadata.fit_rms, 1, float(keyword)?),
            // Fit bookkeeping we do not evaluate (xrefmean, surface1, ...).
            _ => {}
        }
        Ok(())
    }

    fn into_parameters(self, corrector: DistortionCorrector) -> TnxResult<PlateParameters> {
        let require = |value: Option<f64>, name: &str| {
            value.ok_or_else(|| TnxError::malformed_record(format!("missing '{}'", name)))
        };

        let cd = [
            [
                require(self.cd[0][0], "cd1_1")? * DEG_TO_RAD,
                require(self.cd[0][1], "cd1_2")? * DEG_TO_RAD,
            ],
            [
                require(self.cd[1][0], "cd2_1")? * DEG_TO_RAD,
                require(self.cd[1][1], "cd2_2")? * DEG_TO_RAD,
            ],
        ];

        PlateParameters::builder()
            .ref_pixel(
                require(self.xpixref, "xpixref")?,
                require(self.ypixref, "ypixref")?,
            )
            .ref_sky(SkyCoord::from_degrees(
                require(self.lngref, "lngref")?,
                require(self.latref, "latref")?,
            ))
            .cd_matrix(cd)
            .surfaces(
                corrector.xi_surface().clone(),
                corrector.eta_surface().clone(),
            )
            .metadata(self.metadata)
            .build()
    }
}

fn set_pair(slot: &mut Option<[f64; 2]>, index: usize, value: f64) {
    let pair = slot.get_or_insert([0.0, 0.0]);
    pair[index] = value;
}
