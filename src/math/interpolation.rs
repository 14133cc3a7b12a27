//! Pauses and component-wise linear interpolation between postures.
//!
//! Each joint is interpolated independently; there is no coupling between
//! columns.

use ndarray::{Array2, ArrayView1};

use crate::error::{ComposeError, Result};
use crate::trajectory::Trajectory;

/// Repeat a single posture for `repeat_count` timesteps.
///
/// # Errors
///
/// Returns a dimension error if `position` has more than one row or
/// `repeat_count` is zero.
pub fn make_pause(position: &Trajectory, repeat_count: usize) -> Result<Trajectory> {
    check_position("make_pause", position)?;
    if repeat_count == 0 {
        return Err(ComposeError::dimension(
            "make_pause",
            "pause must last at least one timestep",
        ));
    }
    let held = hold_row(position.view().row(0), repeat_count);
    Ok(Trajectory::from_array_unchecked(held))
}

/// Evenly spaced path from `pos1` to `pos2` over `steps` rows, both
/// endpoints included.
///
/// With `steps == 1` the result is `pos1`.
///
/// # Errors
///
/// Returns a dimension error if either argument is not a single posture, the
/// joint counts differ, or `steps` is zero.
///
/// # Example
///
/// ```
/// use motion_composer::{math::interpolate, Trajectory};
///
/// let a = Trajectory::position(&[0.0, 10.0])?;
/// let b = Trajectory::position(&[4.0, 6.0])?;
/// let path = interpolate(&a, &b, 5)?;
/// assert_eq!(path.joint(0)?.to_vec(), vec![0.0, 1.0, 2.0, 3.0, 4.0]);
/// assert_eq!(path.joint(1)?.to_vec(), vec![10.0, 9.0, 8.0, 7.0, 6.0]);
/// # Ok::<(), motion_composer::ComposeError>(())
/// ```
pub fn interpolate(pos1: &Trajectory, pos2: &Trajectory, steps: usize) -> Result<Trajectory> {
    check_position_pair("interpolate", pos1, pos2)?;
    if steps == 0 {
        return Err(ComposeError::dimension(
            "interpolate",
            "interpolation needs at least one timestep",
        ));
    }
    let data = interpolate_rows(pos1.view().row(0), pos2.view().row(0), steps);
    Ok(Trajectory::from_array_unchecked(data))
}

/// Interpolate over the first `interp_steps` rows, then hold `pos2` until
/// `cycle_length` rows are filled.
///
/// # Errors
///
/// Returns a dimension error if the positions are malformed (see
/// [`interpolate`]) or unless `1 <= interp_steps <= cycle_length`.
pub fn interpolate_windowed(
    pos1: &Trajectory,
    pos2: &Trajectory,
    cycle_length: usize,
    interp_steps: usize,
) -> Result<Trajectory> {
    check_position_pair("interpolate_windowed", pos1, pos2)?;
    check_window(cycle_length, interp_steps)?;
    let data = windowed_rows(
        pos1.view().row(0),
        pos2.view().row(0),
        cycle_length,
        interp_steps,
    );
    Ok(Trajectory::from_array_unchecked(data))
}

/// Validate a windowed interpolation against its cycle length.
pub(crate) fn check_window(cycle_length: usize, interp_steps: usize) -> Result<()> {
    if interp_steps == 0 || interp_steps > cycle_length {
        return Err(ComposeError::dimension(
            "interpolate_windowed",
            format!("window of {interp_steps} steps does not fit a cycle of {cycle_length}"),
        ));
    }
    Ok(())
}

/// Row-level kernel shared with the composer. Callers validate shapes.
pub(crate) fn windowed_rows(
    from: ArrayView1<'_, f64>,
    to: ArrayView1<'_, f64>,
    cycle_length: usize,
    interp_steps: usize,
) -> Array2<f64> {
    let ramp = interpolate_rows(from, to, interp_steps);
    Array2::from_shape_fn((cycle_length, from.len()), |(t, j)| {
        if t < interp_steps {
            ramp[[t, j]]
        } else {
            to[j]
        }
    })
}

fn interpolate_rows(from: ArrayView1<'_, f64>, to: ArrayView1<'_, f64>, steps: usize) -> Array2<f64> {
    let last = steps - 1;
    Array2::from_shape_fn((steps, from.len()), |(t, j)| {
        if t == 0 {
            from[j]
        } else if t == last {
            to[j]
        } else {
            let frac = t as f64 / last as f64;
            from[j] + (to[j] - from[j]) * frac
        }
    })
}

fn hold_row(row: ArrayView1<'_, f64>, timesteps: usize) -> Array2<f64> {
    Array2::from_shape_fn((timesteps, row.len()), |(_, j)| row[j])
}

fn check_position(operation: &'static str, position: &Trajectory) -> Result<()> {
    if position.is_position() {
        Ok(())
    } else {
        Err(ComposeError::dimension(
            operation,
            format!(
                "expected a single posture, got {} timesteps",
                position.num_timesteps()
            ),
        ))
    }
}

fn check_position_pair(operation: &'static str, pos1: &Trajectory, pos2: &Trajectory) -> Result<()> {
    check_position(operation, pos1)?;
    check_position(operation, pos2)?;
    if pos1.num_joints() != pos2.num_joints() {
        return Err(ComposeError::dimension(
            operation,
            format!("{} joints vs {} joints", pos1.num_joints(), pos2.num_joints()),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pos(values: &[f64]) -> Trajectory {
        Trajectory::position(values).unwrap()
    }

    #[test]
    fn test_make_pause() {
        let pause = make_pause(&pos(&[0.1, 0.2, 0.3]), 4).unwrap();
        assert_eq!(pause.shape(), (4, 3));
        for row in pause.view().rows() {
            assert_eq!(row.to_vec(), vec![0.1, 0.2, 0.3]);
        }
    }

    #[test]
    fn test_make_pause_rejects_bad_input() {
        let two_rows = Trajectory::from_rows(&[vec![0.0], vec![1.0]]).unwrap();
        assert!(make_pause(&two_rows, 3).unwrap_err().is_dimension_error());
        assert!(make_pause(&pos(&[0.0]), 0).unwrap_err().is_dimension_error());
    }

    #[test]
    fn test_interpolate_endpoints_exact() {
        let a = pos(&[0.1, -2.7, 3.3]);
        let b = pos(&[1.9, 0.4, -8.1]);
        for steps in [2, 3, 7, 50] {
            let path = interpolate(&a, &b, steps).unwrap();
            assert_eq!(path.num_timesteps(), steps);
            assert_eq!(path.first_position(), a);
            assert_eq!(path.last_position(), b);
        }
    }

    #[test]
    fn test_interpolate_evenly_spaced() {
        let path = interpolate(&pos(&[0.0]), &pos(&[1.0]), 5).unwrap();
        let col = path.joint(0).unwrap();
        for (t, &v) in col.iter().enumerate() {
            assert_relative_eq!(v, t as f64 * 0.25, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_interpolate_single_step_is_start() {
        let a = pos(&[3.0, 4.0]);
        let path = interpolate(&a, &pos(&[5.0, 6.0]), 1).unwrap();
        assert_eq!(path, a);
    }

    #[test]
    fn test_interpolate_rejects_bad_input() {
        let a = pos(&[0.0, 1.0]);
        assert!(interpolate(&a, &pos(&[0.0, 1.0, 2.0]), 3)
            .unwrap_err()
            .is_dimension_error());
        assert!(interpolate(&a, &a, 0).unwrap_err().is_dimension_error());
        let two_rows = Trajectory::from_rows(&[vec![0.0, 1.0], vec![1.0, 2.0]]).unwrap();
        assert!(interpolate(&two_rows, &a, 3).unwrap_err().is_dimension_error());
    }

    #[test]
    fn test_windowed_holds_after_window() {
        let a = pos(&[0.0, 5.0]);
        let b = pos(&[2.0, 1.0]);
        let out = interpolate_windowed(&a, &b, 10, 3).unwrap();
        assert_eq!(out.shape(), (10, 2));
        assert_eq!(out.first_position(), a);
        for t in 2..10 {
            assert_eq!(out.view().row(t).to_vec(), vec![2.0, 1.0]);
        }
        assert_relative_eq!(out.view()[[1, 0]], 1.0);
        assert_relative_eq!(out.view()[[1, 1]], 3.0);
    }

    #[test]
    fn test_windowed_full_window() {
        let a = pos(&[0.0]);
        let b = pos(&[9.0]);
        let out = interpolate_windowed(&a, &b, 10, 10).unwrap();
        assert_eq!(out, interpolate(&a, &b, 10).unwrap());
    }

    #[test]
    fn test_windowed_rejects_oversized_window() {
        let a = pos(&[0.0]);
        assert!(interpolate_windowed(&a, &a, 5, 6).unwrap_err().is_dimension_error());
        assert!(interpolate_windowed(&a, &a, 5, 0).unwrap_err().is_dimension_error());
    }
}
