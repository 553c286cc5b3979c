/// An error caused by a misuse of the geometry API.
///
/// Degenerate geometry (parallel lines, coincident points, curves without
/// inflections...) is never an error; these are only returned when the
/// caller broke the contract of a function.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GeometryError {
    /// The normal of a cubic bézier curve was requested at a parameter other
    /// than the endpoints `t = 0` and `t = 1`.
    NormalAtInteriorParameter,
    /// A Chebyshev approximation was requested with zero sample nodes.
    InvalidSampleCount,
}

#[cfg(feature = "std")]
impl core::fmt::Display for GeometryError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            GeometryError::NormalAtInteriorParameter => {
                std::write!(f, "Normal requested at an interior curve parameter")
            }
            GeometryError::InvalidSampleCount => {
                std::write!(f, "Invalid number of sample nodes")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for GeometryError {}
