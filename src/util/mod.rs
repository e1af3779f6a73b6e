//! Small shared utilities.

/// Smoothed frame rate.
pub mod frame_timing;
