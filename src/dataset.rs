//! Datasets of independently composed sequences.
//!
//! A [`Dataset`] owns a primitive set and a random source. Each composition
//! draws `num_sequences` fresh sequences and replaces the owned
//! `(sequences, timesteps, joints)` table wholesale.
//!
//! # Example
//!
//! ```
//! use motion_composer::{Dataset, InterpolationParams, Primitive, Trajectory};
//! use ndarray::Array2;
//!
//! let reach = Primitive::from_trajectory(Trajectory::new(Array2::zeros((50, 14)))?);
//! let lift = Primitive::from_trajectory(Trajectory::new(Array2::ones((50, 14)))?);
//!
//! let mut dataset = Dataset::with_seed(vec![reach, lift], 7);
//! let smoothing = InterpolationParams::new(10, vec![12, 13]);
//! let table = dataset.compose_dataset(6, 40, &[20.0, 80.0], Some(&smoothing))?;
//! assert_eq!(table.dim(), (6, 2000, 14));
//! # Ok::<(), motion_composer::ComposeError>(())
//! ```

use std::path::Path;

use ndarray::{stack, Array3, ArrayView2, Axis};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::composer::{
    check_composable, check_smoothing, compose_sequence, smooth_cycle_boundaries, ComposedSequence,
};
use crate::config::{ComposerConfig, InterpolationParams};
use crate::error::{ComposeError, Result};
use crate::io::save_dataset;
use crate::plot::{plot_table, Plotter};
use crate::primitive::Primitive;
use crate::trajectory::Trajectory;

/// A composed motion dataset.
#[derive(Debug, Clone)]
pub struct Dataset<R = ChaCha8Rng> {
    primitives: Vec<Primitive>,
    table: Option<Array3<f64>>,
    rng: R,
    seed: Option<u64>,
}

impl Dataset<ChaCha8Rng> {
    /// Create a dataset whose draws are seeded from OS entropy.
    #[must_use]
    pub fn new(primitives: Vec<Primitive>) -> Self {
        Self::with_rng(primitives, ChaCha8Rng::from_entropy())
    }

    /// Create a dataset with reproducible draws.
    #[must_use]
    pub fn with_seed(primitives: Vec<Primitive>, seed: u64) -> Self {
        let mut dataset = Self::with_rng(primitives, ChaCha8Rng::seed_from_u64(seed));
        dataset.seed = Some(seed);
        dataset
    }

    /// Create a dataset seeded from `config.seed`, or from entropy if unset.
    #[must_use]
    pub fn for_config(primitives: Vec<Primitive>, config: &ComposerConfig) -> Self {
        match config.seed {
            Some(seed) => Self::with_seed(primitives, seed),
            None => Self::new(primitives),
        }
    }

    /// Restart the random source from `seed`. The next composition draws
    /// exactly what a fresh [`Dataset::with_seed`] would.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self.seed = Some(seed);
    }
}

impl<R: Rng> Dataset<R> {
    /// Create a dataset drawing from a caller-supplied random source.
    #[must_use]
    pub const fn with_rng(primitives: Vec<Primitive>, rng: R) -> Self {
        Self {
            primitives,
            table: None,
            rng,
            seed: None,
        }
    }

    /// The seed the random source was last started from, if known.
    #[must_use]
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// The primitives this dataset composes from.
    #[must_use]
    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    /// The current dataset table, if composed.
    #[must_use]
    pub const fn table(&self) -> Option<&Array3<f64>> {
        self.table.as_ref()
    }

    /// Take the current dataset table, if composed.
    #[must_use]
    pub fn into_table(self) -> Option<Array3<f64>> {
        self.table
    }

    /// `(sequences, timesteps, joints)` of the current table.
    #[must_use]
    pub fn shape(&self) -> Option<(usize, usize, usize)> {
        self.table.as_ref().map(|t| t.dim())
    }

    /// Draw a single sequence without touching the owned table.
    ///
    /// # Errors
    ///
    /// See [`compose_sequence`].
    pub fn compose_sequence(
        &mut self,
        weights: &[f64],
        num_cycles: usize,
    ) -> Result<ComposedSequence> {
        compose_sequence(&self.primitives, weights, num_cycles, &mut self.rng)
    }

    /// Compose `num_sequences` sequences of `num_cycles` draws each, smooth
    /// their cycle boundaries if `interpolation` is given, and store the
    /// result as the dataset table.
    ///
    /// # Errors
    ///
    /// Returns a dimension error if the weights or joint counts do not match
    /// the primitives, if the drawn sequences differ in length, if smoothing
    /// is requested over cycles of different lengths, or if the smoothing
    /// window does not fit a cycle; an index error for bad joint
    /// indices; an invalid configuration error for zero counts or unusable
    /// weights. On error the previous table is kept.
    pub fn compose_dataset(
        &mut self,
        num_sequences: usize,
        num_cycles: usize,
        weights: &[f64],
        interpolation: Option<&InterpolationParams>,
    ) -> Result<&Array3<f64>> {
        if num_sequences == 0 {
            return Err(ComposeError::invalid_config("num_sequences must be at least 1"));
        }
        check_composable(&self.primitives, weights)?;
        if let Some(params) = interpolation {
            params.validate()?;
        }

        let mut sequences = Vec::with_capacity(num_sequences);
        for index in 0..num_sequences {
            let seq = compose_sequence(&self.primitives, weights, num_cycles, &mut self.rng)?;
            debug!(index, picks = ?seq.picks(), "drew sequence");
            if interpolation.is_some() && seq.uniform_cycle_length().is_none() {
                return Err(ComposeError::dimension(
                    "compose_dataset",
                    format!(
                        "sequence {index} mixes cycles of different lengths; \
                         smoothing needs equal primitive lengths"
                    ),
                ));
            }
            sequences.push(seq.into_trajectory());
        }

        let expected = sequences[0].shape();
        if let Some((index, seq)) = sequences
            .iter()
            .enumerate()
            .find(|(_, s)| s.shape() != expected)
        {
            return Err(ComposeError::dimension(
                "compose_dataset",
                format!(
                    "sequence {index} has {} timesteps, sequence 0 has {}; \
                     equalize primitive lengths before composing",
                    seq.num_timesteps(),
                    expected.0
                ),
            ));
        }
        if let Some(params) = interpolation {
            check_smoothing(expected, num_cycles, params)?;
        }

        let views: Vec<ArrayView2<'_, f64>> = sequences.iter().map(Trajectory::view).collect();
        let mut table = stack(Axis(0), &views)
            .map_err(|e| ComposeError::dimension("compose_dataset", e.to_string()))?;

        if let Some(params) = interpolation {
            for mut seq in table.outer_iter_mut() {
                smooth_cycle_boundaries(&mut seq, num_cycles, params)?;
            }
        }

        info!(shape = ?table.dim(), smoothed = interpolation.is_some(), "dataset composed");
        Ok(&*self.table.insert(table))
    }

    /// Compose from a configuration.
    ///
    /// The configuration's seed is applied when the dataset is built (see
    /// [`Dataset::for_config`]) or through [`Dataset::reseed`]. A
    /// configuration seed that differs from the dataset's is logged as a
    /// warning and the composition draws from the current random source.
    ///
    /// # Errors
    ///
    /// Returns [`ComposerConfig::validate`] errors, then those of
    /// [`Self::compose_dataset`].
    pub fn compose(&mut self, config: &ComposerConfig) -> Result<&Array3<f64>> {
        config.validate()?;
        if let Some(seed) = config.seed.filter(|&s| self.seed != Some(s)) {
            warn!(
                config_seed = seed,
                dataset_seed = ?self.seed,
                "configuration seed not applied; build the dataset with for_config or reseed it"
            );
        }
        self.compose_dataset(
            config.num_sequences,
            config.num_cycles,
            &config.weights,
            config.interpolation.as_ref(),
        )
    }

    /// One composed sequence as a trajectory.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError::NotComposed`] before the first composition and
    /// an index error for an out-of-range sequence.
    pub fn sequence(&self, index: usize) -> Result<Trajectory> {
        let seq = self.sequence_view(index)?;
        Trajectory::new(seq.to_owned())
    }

    /// Save the dataset table as a 3-D `.npy` file.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError::NotComposed`] before the first composition,
    /// otherwise propagates I/O errors.
    pub fn save_npy(&self, path: &Path) -> Result<()> {
        let table = self.table.as_ref().ok_or(ComposeError::NotComposed)?;
        save_dataset(table, path)
    }

    /// Plot the listed joints of one sequence, or all joints if `joints` is
    /// empty.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError::NotComposed`] before the first composition, an
    /// index error for a bad sequence or joint index, and otherwise the
    /// plotter's error.
    pub fn plot<P: Plotter + ?Sized>(
        &self,
        sequence: usize,
        joints: &[usize],
        plotter: &mut P,
    ) -> Result<()> {
        plot_table(self.sequence_view(sequence)?, joints, plotter)
    }

    fn sequence_view(&self, index: usize) -> Result<ArrayView2<'_, f64>> {
        let table = self.table.as_ref().ok_or(ComposeError::NotComposed)?;
        let len = table.len_of(Axis(0));
        if index >= len {
            return Err(ComposeError::index("sequence", index, len));
        }
        Ok(table.index_axis(Axis(0), index))
    }
}
