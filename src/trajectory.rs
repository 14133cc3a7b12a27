//! Time-indexed joint trajectories.
//!
//! A [`Trajectory`] is a `(T, J)` table of joint angles: rows are timesteps in
//! time order, columns are joints. A single-row trajectory doubles as a static
//! posture ("position") and seeds pauses and interpolations.
//!
//! # Example
//!
//! ```
//! use motion_composer::Trajectory;
//!
//! let traj = Trajectory::from_rows(&[
//!     vec![0.0, 1.0, 2.0],
//!     vec![0.5, 1.5, 2.5],
//! ])?;
//! assert_eq!(traj.shape(), (2, 3));
//!
//! let head = traj.select_joints(&[2])?;
//! assert_eq!(head.num_joints(), 1);
//! # Ok::<(), motion_composer::ComposeError>(())
//! ```

use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

use crate::error::{ComposeError, Result};
use crate::math::{downsample, interpolate, make_pause, stack_joints, stack_timesteps};

/// A `(timesteps, joints)` table of joint angles.
///
/// Always has at least one row and one column.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    data: Array2<f64>,
}

impl Trajectory {
    /// Wrap a 2D array.
    ///
    /// # Errors
    ///
    /// Returns a dimension error if the array has no rows or no columns.
    pub fn new(data: Array2<f64>) -> Result<Self> {
        let (rows, cols) = data.dim();
        if rows == 0 || cols == 0 {
            return Err(ComposeError::dimension(
                "Trajectory::new",
                format!("trajectory must be non-empty, got shape ({rows}, {cols})"),
            ));
        }
        Ok(Self { data })
    }

    /// Build a trajectory from row vectors, one per timestep.
    ///
    /// # Errors
    ///
    /// Returns a dimension error if there are no rows, a row is empty, or the
    /// rows disagree on their joint count.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let joints = rows.first().map_or(0, Vec::len);
        if let Some((t, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != joints) {
            return Err(ComposeError::dimension(
                "Trajectory::from_rows",
                format!("row {t} has {} joints, expected {joints}", row.len()),
            ));
        }
        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        let data = Array2::from_shape_vec((rows.len(), joints), flat)
            .map_err(|e| ComposeError::dimension("Trajectory::from_rows", e.to_string()))?;
        Self::new(data)
    }

    /// Build a single-timestep posture.
    ///
    /// # Errors
    ///
    /// Returns a dimension error if `joint_angles` is empty.
    pub fn position(joint_angles: &[f64]) -> Result<Self> {
        Self::from_rows(&[joint_angles.to_vec()])
    }

    /// Hold `position` still for `timesteps` rows.
    ///
    /// # Errors
    ///
    /// See [`make_pause`].
    pub fn pause(position: &Self, timesteps: usize) -> Result<Self> {
        make_pause(position, timesteps)
    }

    /// Linear path from `from` to `to` over `timesteps` rows.
    ///
    /// # Errors
    ///
    /// See [`interpolate`].
    pub fn interpolated(from: &Self, to: &Self, timesteps: usize) -> Result<Self> {
        interpolate(from, to, timesteps)
    }

    /// Wrap an array the caller has already shown to be non-empty.
    pub(crate) fn from_array_unchecked(data: Array2<f64>) -> Self {
        debug_assert!(data.nrows() > 0 && data.ncols() > 0);
        Self { data }
    }

    /// `(timesteps, joints)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Number of rows.
    #[must_use]
    pub fn num_timesteps(&self) -> usize {
        self.data.nrows()
    }

    /// Number of columns.
    #[must_use]
    pub fn num_joints(&self) -> usize {
        self.data.ncols()
    }

    /// Whether this trajectory is a single posture.
    #[must_use]
    pub fn is_position(&self) -> bool {
        self.data.nrows() == 1
    }

    /// Borrow the underlying table.
    #[must_use]
    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }

    /// Borrow the underlying array.
    #[must_use]
    pub const fn as_array(&self) -> &Array2<f64> {
        &self.data
    }

    /// Take the underlying array.
    #[must_use]
    pub fn into_array(self) -> Array2<f64> {
        self.data
    }

    /// Posture at `timestep`, as a single-row trajectory.
    ///
    /// # Errors
    ///
    /// Returns an index error if `timestep` is out of range.
    pub fn row(&self, timestep: usize) -> Result<Self> {
        if timestep >= self.num_timesteps() {
            return Err(ComposeError::index("timestep", timestep, self.num_timesteps()));
        }
        let row = self.data.row(timestep).insert_axis(Axis(0)).to_owned();
        Ok(Self::from_array_unchecked(row))
    }

    /// Posture at the first timestep.
    #[must_use]
    pub fn first_position(&self) -> Self {
        Self::from_array_unchecked(self.data.row(0).insert_axis(Axis(0)).to_owned())
    }

    /// Posture at the last timestep.
    #[must_use]
    pub fn last_position(&self) -> Self {
        let last = self.num_timesteps() - 1;
        Self::from_array_unchecked(self.data.row(last).insert_axis(Axis(0)).to_owned())
    }

    /// Values of one joint over time.
    ///
    /// # Errors
    ///
    /// Returns an index error if `joint` is out of range.
    pub fn joint(&self, joint: usize) -> Result<ArrayView1<'_, f64>> {
        if joint >= self.num_joints() {
            return Err(ComposeError::index("joint", joint, self.num_joints()));
        }
        Ok(self.data.column(joint))
    }

    /// A new trajectory holding only the listed joint columns, in list order.
    ///
    /// # Errors
    ///
    /// Returns an index error if the list is empty or names a missing joint.
    pub fn select_joints(&self, joints: &[usize]) -> Result<Self> {
        check_joint_indices(joints, self.num_joints())?;
        Ok(Self::from_array_unchecked(self.data.select(Axis(1), joints)))
    }

    /// Replace this trajectory with its downsampled version.
    ///
    /// # Errors
    ///
    /// See [`downsample`]. On error the trajectory is unchanged.
    pub fn downsample_in_place(&mut self, target_timesteps: usize) -> Result<()> {
        *self = downsample(self, target_timesteps)?;
        Ok(())
    }

    /// Append `extra` as additional joint columns.
    ///
    /// # Errors
    ///
    /// See [`stack_joints`]. On error the trajectory is unchanged.
    pub fn add_joints(&mut self, extra: &Self) -> Result<()> {
        *self = stack_joints(self, extra)?;
        Ok(())
    }

    /// Append `extra` as additional timesteps.
    ///
    /// # Errors
    ///
    /// See [`stack_timesteps`]. On error the trajectory is unchanged.
    pub fn add_timesteps(&mut self, extra: &Self) -> Result<()> {
        *self = stack_timesteps(self, extra)?;
        Ok(())
    }
}

impl TryFrom<Array2<f64>> for Trajectory {
    type Error = ComposeError;

    fn try_from(data: Array2<f64>) -> Result<Self> {
        Self::new(data)
    }
}

/// Validate a joint index list against a joint count.
pub(crate) fn check_joint_indices(joints: &[usize], num_joints: usize) -> Result<()> {
    if joints.is_empty() {
        return Err(ComposeError::EmptySelection("joint"));
    }
    match joints.iter().find(|&&j| j >= num_joints) {
        Some(&bad) => Err(ComposeError::index("joint", bad, num_joints)),
        None => Ok(()),
    }
}
