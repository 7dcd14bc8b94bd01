//! TNX plate-solution transforms: pixel coordinates to sky coordinates
//! through a linear CD transform, a fitted polynomial distortion
//! correction, and gnomonic deprojection about the tangent point.
//!
//! All sky and plane angles are radians internally; the loaders convert
//! from the degree-valued header and database conventions at the
//! boundary.

pub mod basis;
pub mod constants;
pub mod coordinate;
pub mod error;
pub mod header;
pub mod linear;
mod math;
pub mod params;
pub mod pipeline;
pub mod projection;
pub mod surface;
pub mod test_helpers;
pub mod text;

pub use basis::{basis_values, AxisDomain, SurfaceKind};
pub use coordinate::{PixelCoord, PlaneCoord, SkyCoord};
pub use error::{TnxError, TnxResult};
pub use header::{load_header, KeywordMap, KeywordProvider};
pub use linear::PlateLinearTransform;
pub use params::{PlateBuilder, PlateMetadata, PlateParameters};
pub use pipeline::TnxTransform;
pub use projection::{plane_to_sky, sky_to_plane};
pub use surface::{CrossTerms, DistortionCorrector, DistortionSurface};
pub use text::load_database;
