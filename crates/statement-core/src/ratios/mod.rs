pub mod benchmark;
pub mod engine;
pub mod table;

pub use benchmark::{
    benchmark_ratios, classify, BenchmarkComparator, BenchmarkEntry, BenchmarkReport,
    BenchmarkTable, BenchmarkedRatio, Classification, Comparison,
};
pub use engine::{compute_ratios, Ratio, RatioInput};
pub use table::{RatioRecord, RatioSource, RatioTable};
