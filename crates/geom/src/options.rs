use crate::quadrature::GaussLegendre;

/// Parameters for the flattening and stroking algorithms.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub struct FlattenOptions {
    /// Maximum allowed distance between the curve and its approximation.
    ///
    /// Default value: `FlattenOptions::DEFAULT_TOLERANCE`.
    pub tolerance: f64,

    /// Distance between the curve and the generated polyline, measured along
    /// the normal on the right side of the curve. Typically half of the
    /// stroke width, or zero to flatten the curve itself.
    ///
    /// Default value: `FlattenOptions::DEFAULT_OFFSET`.
    pub offset: f64,
}

impl FlattenOptions {
    pub const DEFAULT_TOLERANCE: f64 = 0.01;
    pub const DEFAULT_OFFSET: f64 = 0.0;

    pub const DEFAULT: Self = FlattenOptions {
        tolerance: Self::DEFAULT_TOLERANCE,
        offset: Self::DEFAULT_OFFSET,
    };

    #[inline]
    pub fn tolerance(tolerance: f64) -> Self {
        Self::DEFAULT.with_tolerance(tolerance)
    }

    #[inline]
    pub const fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    #[inline]
    pub const fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Parameters for building arc length parametrizations of segments.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub struct ArcLengthOptions {
    /// Integration rule used to measure the length of the segment.
    ///
    /// Default value: `ArcLengthOptions::DEFAULT_QUADRATURE`.
    pub quadrature: GaussLegendre,

    /// Number of Chebyshev nodes of the length to parameter approximation.
    ///
    /// Must be at least 1.
    /// Default value: `ArcLengthOptions::DEFAULT_SAMPLES`.
    pub samples: usize,
}

impl ArcLengthOptions {
    pub const DEFAULT_QUADRATURE: GaussLegendre = GaussLegendre::Order7;
    pub const DEFAULT_SAMPLES: usize = 12;

    pub const DEFAULT: Self = ArcLengthOptions {
        quadrature: Self::DEFAULT_QUADRATURE,
        samples: Self::DEFAULT_SAMPLES,
    };

    #[inline]
    pub const fn with_quadrature(mut self, quadrature: GaussLegendre) -> Self {
        self.quadrature = quadrature;
        self
    }

    #[inline]
    pub const fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }
}

impl Default for ArcLengthOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[test]
fn test_option_builders() {
    let options = FlattenOptions::tolerance(0.5).with_offset(2.0);
    assert_eq!(options.tolerance, 0.5);
    assert_eq!(options.offset, 2.0);
    assert_eq!(FlattenOptions::default(), FlattenOptions::DEFAULT);

    let options = ArcLengthOptions::DEFAULT
        .with_samples(20)
        .with_quadrature(GaussLegendre::Order5);
    assert_eq!(options.samples, 20);
    assert_eq!(options.quadrature, GaussLegendre::Order5);
}
