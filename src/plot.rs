//! Plotting seam.
//!
//! The crate ships no rendering backend. A [`Plotter`] receives the selected
//! joint columns of one trajectory, rows in time order, and draws them however
//! it likes (one line per column against the timestep index).

use ndarray::{ArrayView2, Axis};

use crate::error::Result;
use crate::trajectory::{check_joint_indices, Trajectory};

/// Something that can draw joint angles over time.
pub trait Plotter {
    /// Draw every column of `series` against its row index.
    ///
    /// # Errors
    ///
    /// Backend-specific failures.
    fn plot(&mut self, series: ArrayView2<'_, f64>) -> Result<()>;
}

/// Plot the listed joints of `traj`, or all joints if `joints` is empty.
///
/// # Errors
///
/// Returns an index error for an out-of-range joint, otherwise propagates
/// the plotter's error.
pub fn plot_joints<P: Plotter + ?Sized>(
    traj: &Trajectory,
    joints: &[usize],
    plotter: &mut P,
) -> Result<()> {
    plot_table(traj.view(), joints, plotter)
}

pub(crate) fn plot_table<P: Plotter + ?Sized>(
    table: ArrayView2<'_, f64>,
    joints: &[usize],
    plotter: &mut P,
) -> Result<()> {
    if joints.is_empty() {
        return plotter.plot(table);
    }
    check_joint_indices(joints, table.ncols())?;
    let selected = table.select(Axis(1), joints);
    plotter.plot(selected.view())
}
