//! Pure transforms over trajectories.
//!
//! This module provides:
//! - [`stacking`]: downsampling and concatenation along either axis
//! - [`interpolation`]: pauses and linear interpolation between postures

pub mod interpolation;
pub mod stacking;

pub use interpolation::{interpolate, interpolate_windowed, make_pause};
pub use stacking::{downsample, stack_all_timesteps, stack_joints, stack_timesteps};
