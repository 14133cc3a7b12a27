//! Motion Composer Library
//!
//! Synthetic robot-motion dataset composition from recorded joint-trajectory
//! primitives.
//!
//! Short recordings ("primitives", `(timesteps, joints)` tables of joint
//! angles) are downsampled, extended with extra joints (e.g. a held head
//! posture) and padded with pauses, then drawn at random with relative
//! weights and concatenated into long sequences. Cycle boundaries can be
//! smoothed for a subset of joints with windowed linear interpolation, so
//! those joints never jump from one cycle to the next.
//!
//! # Quick Start
//!
//! ```
//! use motion_composer::{Dataset, InterpolationParams, Primitive, Trajectory};
//! use ndarray::Array2;
//!
//! // Two 400- and 600-step recordings of 12 arm joints.
//! let touch = Trajectory::new(Array2::from_elem((400, 12), 0.1))?;
//! let lift = Trajectory::new(Array2::from_elem((600, 12), 0.7))?;
//!
//! let mut touch = Primitive::from_trajectory(touch).with_variation("left");
//! let mut lift = Primitive::from_trajectory(lift).with_variation("right");
//!
//! // Look left while touching, right while lifting.
//! touch.add_held_joints(&Trajectory::position(&[0.4, -0.1])?)?;
//! lift.add_held_joints(&Trajectory::position(&[-0.4, -0.1])?)?;
//!
//! // Equal lengths are required before composing a dataset.
//! touch.downsample(50)?;
//! lift.downsample(50)?;
//!
//! let mut dataset = Dataset::with_seed(vec![touch, lift], 42);
//! let head = InterpolationParams::new(10, vec![12, 13]);
//! let table = dataset.compose_dataset(6, 40, &[20.0, 80.0], Some(&head))?;
//! assert_eq!(table.dim(), (6, 2000, 14));
//! # Ok::<(), motion_composer::ComposeError>(())
//! ```
//!
//! # Modules
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`trajectory`] | The `(timesteps, joints)` table type |
//! | [`math`] | Downsampling, stacking, pauses, interpolation |
//! | [`primitive`] | Labelled primitives and their sources |
//! | [`composer`] | Weighted sequencing and boundary smoothing |
//! | [`dataset`] | Repeated composition into a 3-D table |
//! | [`io`] | `.npy` / `.npz` persistence |
//! | [`plot`] | Plotting seam |

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::missing_panics_doc)]

pub mod composer;
pub mod config;
pub mod dataset;
pub mod error;
pub mod io;
pub mod math;
pub mod plot;
pub mod primitive;
pub mod trajectory;

// Re-exports for convenient access
pub use composer::{compose_sequence, smooth_cycle_boundaries, ComposedSequence};
pub use config::{ComposerConfig, InterpolationParams};
pub use dataset::Dataset;
pub use error::{ComposeError, Result};
pub use io::{load_dataset, load_trajectory, save_dataset, save_playback_npz, save_trajectory};
pub use math::{
    downsample, interpolate, interpolate_windowed, make_pause, stack_joints, stack_timesteps,
};
pub use plot::{plot_joints, Plotter};
pub use primitive::{Primitive, PrimitiveSource};
pub use trajectory::Trajectory;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
