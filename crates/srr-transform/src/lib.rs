pub mod normalize;
pub mod outliers;
pub mod stats;

pub use normalize::Normalizer;
pub use outliers::{CapReport, cap_outliers};
pub use stats::{
    FieldMeans, IqrBounds, compute_means, count_unparseable, iqr_bounds, parse_f64, round2, round3,
};
