//! Shape-changing transforms: downsampling and concatenation.
//!
//! All functions validate row/column counts up front and return a new
//! trajectory; inputs are never modified.

use ndarray::{concatenate, s, Axis};
use tracing::debug;

use crate::error::{ComposeError, Result};
use crate::trajectory::Trajectory;

/// Keep every `T / target_timesteps`-th row, starting at row 0.
///
/// # Errors
///
/// Returns a dimension error if `target_timesteps` is zero or does not
/// divide the current number of timesteps.
///
/// # Example
///
/// ```
/// use motion_composer::{math::downsample, Trajectory};
///
/// let traj = Trajectory::from_rows(&[vec![0.0], vec![1.0], vec![2.0], vec![3.0]])?;
/// let half = downsample(&traj, 2)?;
/// assert_eq!(half.joint(0)?.to_vec(), vec![0.0, 2.0]);
/// # Ok::<(), motion_composer::ComposeError>(())
/// ```
pub fn downsample(traj: &Trajectory, target_timesteps: usize) -> Result<Trajectory> {
    let timesteps = traj.num_timesteps();
    if target_timesteps == 0 || timesteps % target_timesteps != 0 {
        return Err(ComposeError::dimension(
            "downsample",
            format!("{timesteps} timesteps is not a multiple of {target_timesteps}"),
        ));
    }

    let stride = timesteps / target_timesteps;
    debug!(timesteps, target_timesteps, stride, "downsampling trajectory");

    let step = isize::try_from(stride)
        .map_err(|_| ComposeError::dimension("downsample", "stride overflows isize"))?;
    let data = traj.view().slice(s![..;step, ..]).to_owned();
    Ok(Trajectory::from_array_unchecked(data))
}

/// Place `b`'s joints after `a`'s joints.
///
/// # Errors
///
/// Returns a dimension error if the timestep counts differ.
pub fn stack_joints(a: &Trajectory, b: &Trajectory) -> Result<Trajectory> {
    if a.num_timesteps() != b.num_timesteps() {
        return Err(ComposeError::dimension(
            "stack_joints",
            format!(
                "{} timesteps vs {} timesteps",
                a.num_timesteps(),
                b.num_timesteps()
            ),
        ));
    }
    let data = concatenate(Axis(1), &[a.view(), b.view()])
        .map_err(|e| ComposeError::dimension("stack_joints", e.to_string()))?;
    Ok(Trajectory::from_array_unchecked(data))
}

/// Place `b`'s timesteps after `a`'s timesteps.
///
/// # Errors
///
/// Returns a dimension error if the joint counts differ.
pub fn stack_timesteps(a: &Trajectory, b: &Trajectory) -> Result<Trajectory> {
    stack_all_timesteps(&[a, b])
}

/// Concatenate any number of trajectories along time, in slice order.
///
/// # Errors
///
/// Returns a dimension error if `parts` is empty or the joint counts differ.
pub fn stack_all_timesteps(parts: &[&Trajectory]) -> Result<Trajectory> {
    let Some(first) = parts.first() else {
        return Err(ComposeError::dimension(
            "stack_timesteps",
            "nothing to concatenate",
        ));
    };
    let joints = first.num_joints();
    if let Some(bad) = parts.iter().find(|p| p.num_joints() != joints) {
        return Err(ComposeError::dimension(
            "stack_timesteps",
            format!("{joints} joints vs {} joints", bad.num_joints()),
        ));
    }

    let views: Vec<_> = parts.iter().map(|p| p.view()).collect();
    let data = concatenate(Axis(0), &views)
        .map_err(|e| ComposeError::dimension("stack_timesteps", e.to_string()))?;
    Ok(Trajectory::from_array_unchecked(data))
}
