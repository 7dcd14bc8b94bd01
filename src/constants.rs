//! Mathematical constants for plate-solution computations.

/// Pi to full f64 precision.
pub const PI: f64 = 3.141592653589793238462643;

/// Pi/2 radians (90 degrees).
pub const HALF_PI: f64 = 1.5707963267948966192313216;

/// 2*Pi radians (full circle).
pub const TWOPI: f64 = 6.283185307179586476925287;

/// Degrees to radians conversion factor (Pi/180).
pub const DEG_TO_RAD: f64 = 1.745329251994329576923691e-2;

/// Radians to degrees conversion factor (180/Pi).
pub const RAD_TO_DEG: f64 = 57.29577951308232087679815;

/// Threshold below which a quantity is treated as zero.
///
/// Used for the "both bounds zero means no normalization" test on surface
/// domains and for the tangent-point short circuit in the deprojection.
pub const EPS: f64 = 1e-12;
