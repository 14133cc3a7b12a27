//! Recorded motion primitives.
//!
//! A [`Primitive`] is one reusable motion segment: a trajectory plus an
//! optional free-form variation label that distinguishes similar recordings
//! (e.g. `"object left"` vs `"object right"`). The label never affects
//! composition.

use std::path::PathBuf;

use crate::error::Result;
use crate::io::load_trajectory;
use crate::math::{make_pause, stack_timesteps};
use crate::trajectory::Trajectory;

/// Where a primitive's trajectory comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveSource {
    /// A `.npy` file on disk.
    FromPath(PathBuf),
    /// An in-memory trajectory.
    FromTable(Trajectory),
}

impl From<Trajectory> for PrimitiveSource {
    fn from(traj: Trajectory) -> Self {
        Self::FromTable(traj)
    }
}

impl From<PathBuf> for PrimitiveSource {
    fn from(path: PathBuf) -> Self {
        Self::FromPath(path)
    }
}

impl From<&std::path::Path> for PrimitiveSource {
    fn from(path: &std::path::Path) -> Self {
        Self::FromPath(path.to_path_buf())
    }
}

/// A motion primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    trajectory: Trajectory,
    variation: Option<String>,
}

impl Primitive {
    /// Resolve a source into a primitive, loading from disk if needed.
    ///
    /// # Errors
    ///
    /// Propagates I/O and decoding errors from [`load_trajectory`].
    pub fn new(source: impl Into<PrimitiveSource>) -> Result<Self> {
        let trajectory = match source.into() {
            PrimitiveSource::FromPath(path) => load_trajectory(&path)?,
            PrimitiveSource::FromTable(traj) => traj,
        };
        Ok(Self::from_trajectory(trajectory))
    }

    /// Wrap an in-memory trajectory.
    #[must_use]
    pub const fn from_trajectory(trajectory: Trajectory) -> Self {
        Self {
            trajectory,
            variation: None,
        }
    }

    /// Attach a variation label.
    #[must_use]
    pub fn with_variation(mut self, variation: impl Into<String>) -> Self {
        self.variation = Some(variation.into());
        self
    }

    /// The variation label, if any.
    #[must_use]
    pub fn variation(&self) -> Option<&str> {
        self.variation.as_deref()
    }

    /// The current trajectory.
    #[must_use]
    pub const fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    /// Replace the trajectory wholesale.
    pub fn set_trajectory(&mut self, trajectory: Trajectory) {
        self.trajectory = trajectory;
    }

    /// Take the trajectory, dropping the label.
    #[must_use]
    pub fn into_trajectory(self) -> Trajectory {
        self.trajectory
    }

    /// Number of timesteps in the current trajectory.
    #[must_use]
    pub fn num_timesteps(&self) -> usize {
        self.trajectory.num_timesteps()
    }

    /// Number of joints in the current trajectory.
    #[must_use]
    pub fn num_joints(&self) -> usize {
        self.trajectory.num_joints()
    }

    /// Reduce the primitive to `target_timesteps` rows.
    ///
    /// # Errors
    ///
    /// See [`Trajectory::downsample_in_place`].
    pub fn downsample(&mut self, target_timesteps: usize) -> Result<()> {
        self.trajectory.downsample_in_place(target_timesteps)
    }

    /// Append extra joint columns, e.g. a head trajectory.
    ///
    /// # Errors
    ///
    /// See [`Trajectory::add_joints`].
    pub fn add_joints(&mut self, extra: &Trajectory) -> Result<()> {
        self.trajectory.add_joints(extra)
    }

    /// Attach a constant posture as extra joints for every timestep.
    ///
    /// Used to give a primitive a fixed head orientation for its whole length.
    ///
    /// # Errors
    ///
    /// Returns a dimension error if `position` is not a single posture.
    pub fn add_held_joints(&mut self, position: &Trajectory) -> Result<()> {
        let held = make_pause(position, self.num_timesteps())?;
        self.add_joints(&held)
    }

    /// Hold the first posture for `timesteps` rows before the motion starts.
    ///
    /// # Errors
    ///
    /// Returns a dimension error if `timesteps` is zero.
    pub fn prepend_pause(&mut self, timesteps: usize) -> Result<()> {
        let pause = make_pause(&self.trajectory.first_position(), timesteps)?;
        self.trajectory = stack_timesteps(&pause, &self.trajectory)?;
        Ok(())
    }
}

impl From<Trajectory> for Primitive {
    fn from(trajectory: Trajectory) -> Self {
        Self::from_trajectory(trajectory)
    }
}
