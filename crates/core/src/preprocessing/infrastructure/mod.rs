pub mod canonical_preprocessor;
mod gaussian;
pub mod parallel_preprocessor;
