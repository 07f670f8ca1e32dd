//! Progress reporting for the agent loop

pub mod reporter;
