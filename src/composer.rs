//! Weighted random sequencing of primitives and cycle-boundary smoothing.
//!
//! # Algorithm
//!
//! 1. Draw `num_cycles` primitive indices with replacement, index `i` with
//!    probability `weights[i] / sum(weights)`
//! 2. Concatenate the drawn trajectories along time in draw order
//! 3. Optionally, for every cycle after the first, replace the leading rows
//!    of the selected joints with a windowed interpolation from the previous
//!    cycle's last posture to the current cycle's last posture
//!
//! The random source is always supplied by the caller, so a seeded generator
//! reproduces a composition exactly.

use ndarray::{s, ArrayViewMut2, Axis};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use tracing::debug;

use crate::config::{validate_weights, InterpolationParams};
use crate::error::{ComposeError, Result};
use crate::math::interpolation::{check_window, windowed_rows};
use crate::math::stack_all_timesteps;
use crate::primitive::Primitive;
use crate::trajectory::{check_joint_indices, Trajectory};

/// One composed sequence and the layout of its cycles.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedSequence {
    trajectory: Trajectory,
    cycle_starts: Vec<usize>,
    picks: Vec<usize>,
}

impl ComposedSequence {
    /// The concatenated trajectory.
    #[must_use]
    pub const fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    /// Take the concatenated trajectory.
    #[must_use]
    pub fn into_trajectory(self) -> Trajectory {
        self.trajectory
    }

    /// Row at which each cycle starts, in order. The first entry is 0.
    #[must_use]
    pub fn cycle_starts(&self) -> &[usize] {
        &self.cycle_starts
    }

    /// Index of the primitive drawn for each cycle.
    #[must_use]
    pub fn picks(&self) -> &[usize] {
        &self.picks
    }

    /// Number of drawn cycles.
    #[must_use]
    pub fn num_cycles(&self) -> usize {
        self.picks.len()
    }

    /// The shared length of all cycles, or `None` if the drawn primitives
    /// differ in length.
    #[must_use]
    pub fn uniform_cycle_length(&self) -> Option<usize> {
        let total = self.trajectory.num_timesteps();
        let ends = self.cycle_starts.iter().skip(1).chain(std::iter::once(&total));
        let mut lengths = self.cycle_starts.iter().zip(ends).map(|(s, e)| e - s);
        let first = lengths.next()?;
        lengths.all(|len| len == first).then_some(first)
    }
}

/// Check that a primitive set and weight vector can be composed.
///
/// # Errors
///
/// Returns an invalid configuration error for an empty set or unusable
/// weights, and a dimension error if the weight count or joint counts do
/// not line up with the primitives.
pub fn check_composable(primitives: &[Primitive], weights: &[f64]) -> Result<()> {
    let Some(first) = primitives.first() else {
        return Err(ComposeError::invalid_config("no primitives to compose"));
    };
    if weights.len() != primitives.len() {
        return Err(ComposeError::dimension(
            "compose_sequence",
            format!(
                "{} weights for {} primitives",
                weights.len(),
                primitives.len()
            ),
        ));
    }
    let joints = first.num_joints();
    if let Some((i, p)) = primitives
        .iter()
        .enumerate()
        .find(|(_, p)| p.num_joints() != joints)
    {
        return Err(ComposeError::dimension(
            "compose_sequence",
            format!("primitive {i} has {} joints, expected {joints}", p.num_joints()),
        ));
    }
    validate_weights(weights)
}

/// Draw `num_cycles` primitives and concatenate them into one sequence.
///
/// # Errors
///
/// See [`check_composable`]; also rejects `num_cycles == 0`.
///
/// # Example
///
/// ```
/// use motion_composer::{compose_sequence, Primitive, Trajectory};
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let walk = Primitive::from_trajectory(Trajectory::from_rows(&[vec![0.0], vec![1.0]])?);
/// let wave = Primitive::from_trajectory(Trajectory::from_rows(&[vec![5.0], vec![6.0]])?);
/// let mut rng = ChaCha8Rng::seed_from_u64(1);
///
/// let seq = compose_sequence(&[walk, wave], &[1.0, 0.0], 3, &mut rng)?;
/// assert_eq!(seq.picks(), &[0, 0, 0]);
/// assert_eq!(seq.cycle_starts(), &[0, 2, 4]);
/// # Ok::<(), motion_composer::ComposeError>(())
/// ```
pub fn compose_sequence<R: Rng + ?Sized>(
    primitives: &[Primitive],
    weights: &[f64],
    num_cycles: usize,
    rng: &mut R,
) -> Result<ComposedSequence> {
    check_composable(primitives, weights)?;
    if num_cycles == 0 {
        return Err(ComposeError::invalid_config("num_cycles must be at least 1"));
    }

    let dist = WeightedIndex::new(weights)
        .map_err(|e| ComposeError::invalid_config(format!("weights: {e}")))?;
    let picks: Vec<usize> = (0..num_cycles).map(|_| dist.sample(rng)).collect();

    let mut cycle_starts = Vec::with_capacity(num_cycles);
    let mut offset = 0;
    for &pick in &picks {
        cycle_starts.push(offset);
        offset += primitives[pick].num_timesteps();
    }

    let parts: Vec<&Trajectory> = picks.iter().map(|&i| primitives[i].trajectory()).collect();
    let trajectory = stack_all_timesteps(&parts)?;
    debug!(
        num_cycles,
        timesteps = trajectory.num_timesteps(),
        "sequence composed"
    );

    Ok(ComposedSequence {
        trajectory,
        cycle_starts,
        picks,
    })
}

/// Check smoothing parameters against a `(timesteps, joints)` sequence
/// layout, returning the cycle length.
///
/// # Errors
///
/// Returns a dimension error if the sequence does not split into
/// `num_cycles` equal cycles or the window exceeds a cycle, and an index
/// error for a bad joint list.
pub fn check_smoothing(
    shape: (usize, usize),
    num_cycles: usize,
    params: &InterpolationParams,
) -> Result<usize> {
    let (timesteps, joints) = shape;
    if num_cycles == 0 || timesteps % num_cycles != 0 {
        return Err(ComposeError::dimension(
            "smooth_cycle_boundaries",
            format!("{timesteps} timesteps do not split into {num_cycles} equal cycles"),
        ));
    }
    let cycle_length = timesteps / num_cycles;
    check_window(cycle_length, params.steps)?;
    check_joint_indices(&params.joints, joints)?;
    Ok(cycle_length)
}

/// Smooth every cycle boundary after the first, in place.
///
/// For the cycle starting at row `c * L` (`c >= 1`), the selected joints of
/// rows `c*L .. (c+1)*L` are replaced by a windowed interpolation from the
/// posture at row `c*L - 1` to the posture at row `(c+1)*L - 1`. Both
/// postures are taken from the sequence as it was before smoothing.
/// Unselected joints are not touched.
///
/// # Errors
///
/// See [`check_smoothing`]. On error the sequence is unchanged.
pub fn smooth_cycle_boundaries(
    sequence: &mut ArrayViewMut2<'_, f64>,
    num_cycles: usize,
    params: &InterpolationParams,
) -> Result<()> {
    let cycle_length = check_smoothing(sequence.dim(), num_cycles, params)?;
    let selected = sequence.select(Axis(1), &params.joints);

    for start in (cycle_length..sequence.nrows()).step_by(cycle_length) {
        let block = windowed_rows(
            selected.row(start - 1),
            selected.row(start + cycle_length - 1),
            cycle_length,
            params.steps,
        );
        for (k, &joint) in params.joints.iter().enumerate() {
            sequence
                .slice_mut(s![start..start + cycle_length, joint])
                .assign(&block.column(k));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::Array2;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn constant(timesteps: usize, joints: usize, value: f64) -> Primitive {
        Primitive::from_trajectory(
            Trajectory::new(Array2::from_elem((timesteps, joints), value)).unwrap(),
        )
    }

    fn ramp(timesteps: usize, joints: usize, offset: f64) -> Primitive {
        Primitive::from_trajectory(
            Trajectory::new(Array2::from_shape_fn((timesteps, joints), |(t, j)| {
                offset + t as f64 + j as f64 * 0.1
            }))
            .unwrap(),
        )
    }

    #[test]
    fn test_degenerate_weights_always_pick_first() {
        let prims = [constant(4, 2, 1.0), constant(4, 2, 2.0)];
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..20 {
            let seq = compose_sequence(&prims, &[1.0, 0.0], 8, &mut rng).unwrap();
            assert!(seq.picks().iter().all(|&p| p == 0));
            assert!(seq.trajectory().view().iter().all(|&v| v == 1.0));
        }
    }

    #[test]
    fn test_rows_are_sum_of_picked_lengths() {
        let prims = [ramp(3, 2, 0.0), ramp(5, 2, 100.0)];
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let seq = compose_sequence(&prims, &[1.0, 1.0], 10, &mut rng).unwrap();

        let expected: usize = seq.picks().iter().map(|&p| prims[p].num_timesteps()).sum();
        assert_eq!(seq.trajectory().num_timesteps(), expected);
        assert_eq!(seq.num_cycles(), 10);

        for (&start, &pick) in seq.cycle_starts().iter().zip(seq.picks()) {
            assert_eq!(
                seq.trajectory().row(start).unwrap(),
                prims[pick].trajectory().first_position()
            );
        }
    }

    #[test]
    fn test_weights_are_relative() {
        let prims = [constant(1, 1, 0.0), constant(1, 1, 1.0)];
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let seq = compose_sequence(&prims, &[20.0, 80.0], 5000, &mut rng).unwrap();
        let second = seq.picks().iter().filter(|&&p| p == 1).count() as f64 / 5000.0;
        assert!((second - 0.8).abs() < 0.03, "observed share {second}");
    }

    #[test]
    fn test_uniform_cycle_length() {
        let prims = [ramp(2, 1, 0.0), ramp(4, 1, 100.0)];
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let same = compose_sequence(&prims, &[1.0, 0.0], 3, &mut rng).unwrap();
        assert_eq!(same.uniform_cycle_length(), Some(2));

        let mixed = (0..50)
            .map(|_| compose_sequence(&prims, &[1.0, 1.0], 2, &mut rng).unwrap())
            .find(|seq| seq.picks()[0] != seq.picks()[1])
            .unwrap();
        assert_eq!(mixed.uniform_cycle_length(), None);
    }

    #[test]
    fn test_seeded_composition_is_reproducible() {
        let prims = [ramp(4, 2, 0.0), ramp(4, 2, 10.0), ramp(4, 2, 20.0)];
        let a = compose_sequence(&prims, &[1.0, 2.0, 3.0], 12, &mut ChaCha8Rng::seed_from_u64(5));
        let b = compose_sequence(&prims, &[1.0, 2.0, 3.0], 12, &mut ChaCha8Rng::seed_from_u64(5));
        assert_eq!(a.unwrap(), b.unwrap());
    }

    #[test]
    fn test_rejects_mismatched_inputs() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let prims = [constant(4, 2, 0.0), constant(4, 3, 0.0)];
        assert!(compose_sequence(&prims, &[1.0, 1.0], 2, &mut rng)
            .unwrap_err()
            .is_dimension_error());

        let prims = [constant(4, 2, 0.0), constant(4, 2, 0.0)];
        assert!(compose_sequence(&prims, &[1.0], 2, &mut rng)
            .unwrap_err()
            .is_dimension_error());
        assert!(compose_sequence(&prims, &[0.0, 0.0], 2, &mut rng).is_err());
        assert!(compose_sequence(&prims, &[1.0, 1.0], 0, &mut rng).is_err());
        assert!(matches!(
            compose_sequence(&prims, &[f64::MAX, f64::MAX], 3, &mut rng),
            Err(ComposeError::InvalidConfig(_))
        ));
        assert!(compose_sequence(&[], &[], 2, &mut rng).is_err());
    }

    #[test]
    fn test_smoothing_skips_first_cycle_and_other_joints() {
        let prims = [ramp(5, 3, 0.0)];
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let seq = compose_sequence(&prims, &[1.0], 3, &mut rng).unwrap();
        let original = seq.trajectory().as_array().clone();

        let mut table = original.clone();
        let params = InterpolationParams::new(2, vec![2]);
        smooth_cycle_boundaries(&mut table.view_mut(), 3, &params).unwrap();

        // first cycle and unselected joints unchanged
        assert_eq!(table.slice(s![0..5, ..]), original.slice(s![0..5, ..]));
        assert_eq!(table.slice(s![.., 0..2]), original.slice(s![.., 0..2]));

        for start in [5, 10] {
            let from = original[[start - 1, 2]];
            let to = original[[start + 4, 2]];
            assert_relative_eq!(table[[start, 2]], from);
            assert_relative_eq!(table[[start + 1, 2]], to);
            for t in start + 1..start + 5 {
                assert_relative_eq!(table[[t, 2]], to);
            }
        }
    }

    #[test]
    fn test_smoothing_window_interpolates() {
        let mut table = Array2::from_shape_fn((8, 1), |(t, _)| if t < 4 { 0.0 } else { 4.0 });
        // previous cycle ends at 0.0, current cycle ends at 4.0
        let params = InterpolationParams::new(3, vec![0]);
        smooth_cycle_boundaries(&mut table.view_mut(), 2, &params).unwrap();
        let col: Vec<f64> = table.column(0).to_vec();
        assert_eq!(col[..4], [0.0; 4]);
        assert_relative_eq!(col[4], 0.0);
        assert_relative_eq!(col[5], 2.0);
        assert_relative_eq!(col[6], 4.0);
        assert_relative_eq!(col[7], 4.0);
    }

    #[test]
    fn test_smoothing_rejects_bad_params() {
        let mut table = Array2::<f64>::zeros((10, 3));
        let before = table.clone();

        let too_long = InterpolationParams::new(6, vec![0]);
        assert!(smooth_cycle_boundaries(&mut table.view_mut(), 2, &too_long)
            .unwrap_err()
            .is_dimension_error());

        let bad_joint = InterpolationParams::new(2, vec![3]);
        assert!(smooth_cycle_boundaries(&mut table.view_mut(), 2, &bad_joint)
            .unwrap_err()
            .is_index_error());

        let params = InterpolationParams::new(2, vec![0]);
        assert!(smooth_cycle_boundaries(&mut table.view_mut(), 3, &params)
            .unwrap_err()
            .is_dimension_error());

        assert_eq!(table, before);
    }
}
