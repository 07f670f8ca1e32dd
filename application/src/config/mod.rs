//! Application-level configuration.
//!
//! - [`ExecutionParams`] - agent loop control (turn and retry budgets, history window)

pub mod execution_params;

pub use execution_params::ExecutionParams;
