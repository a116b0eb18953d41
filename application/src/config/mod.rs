//! Application-level configuration.
//!
//! - [`ExecutionParams`] — turn loop limits (tool iterations, output size, history window)

pub mod execution_params;

pub use execution_params::ExecutionParams;
