//! `.npy` / `.npz` persistence for trajectories and datasets.
//!
//! Arrays are stored as little-endian `float64` NumPy files so recordings and
//! composed datasets can be exchanged with NumPy-based tooling.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use ndarray::{arr0, Array1, Array3, ArrayD, Axis, Ix2, Ix3};
use ndarray_npy::{NpzWriter, ReadNpyExt, WriteNpyExt};
use tracing::{debug, info};

use crate::error::{ComposeError, Result};
use crate::trajectory::Trajectory;

/// Load a trajectory from a `.npy` file.
///
/// A 2-D array is read as `(timesteps, joints)`; a 1-D array is read as a
/// single posture.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be opened, a read error if it is
/// not a `float64` array of one or two dimensions, and a dimension error if
/// the array is empty.
pub fn load_trajectory(path: &Path) -> Result<Trajectory> {
    let arr = read_npy_f64(path)?;
    let shape = arr.shape().to_vec();
    let arr = match arr.ndim() {
        1 => arr.insert_axis(Axis(0)),
        2 => arr,
        _ => {
            return Err(ComposeError::npy_read(
                path,
                format!("expected 1-D or 2-D array, got shape {shape:?}"),
            ))
        }
    };
    let table = arr
        .into_dimensionality::<Ix2>()
        .map_err(|e| ComposeError::npy_read(path, e.to_string()))?;
    debug!(path = %path.display(), ?shape, "loaded trajectory");
    Trajectory::new(table)
}

/// Load a `(sequences, timesteps, joints)` dataset from a `.npy` file.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be opened and a read error if it
/// is not a 3-D `float64` array.
pub fn load_dataset(path: &Path) -> Result<Array3<f64>> {
    let arr = read_npy_f64(path)?;
    let shape = arr.shape().to_vec();
    arr.into_dimensionality::<Ix3>().map_err(|_e| {
        ComposeError::npy_read(path, format!("expected 3-D array, got shape {shape:?}"))
    })
}

/// Save a trajectory as a 2-D `.npy` file.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be created and a write error if
/// encoding fails.
pub fn save_trajectory(traj: &Trajectory, path: &Path) -> Result<()> {
    let writer = create(path)?;
    traj.as_array()
        .write_npy(writer)
        .map_err(|e| ComposeError::npy_write(path, e.to_string()))?;
    info!(path = %path.display(), shape = ?traj.shape(), "trajectory saved");
    Ok(())
}

/// Save a dataset as a 3-D `.npy` file.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be created and a write error if
/// encoding fails.
pub fn save_dataset(dataset: &Array3<f64>, path: &Path) -> Result<()> {
    let writer = create(path)?;
    dataset
        .write_npy(writer)
        .map_err(|e| ComposeError::npy_write(path, e.to_string()))?;
    info!(path = %path.display(), shape = ?dataset.dim(), "dataset saved");
    Ok(())
}

/// Save one trajectory as a compressed `.npz` playback bundle.
///
/// The bundle holds `positions` plus empty `joint_names`, `velocities`,
/// `efforts` and `timestamps` arrays and a scalar `fps` of zero, the layout
/// robot playback tools expect when only positions are known.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be created and a write error if
/// encoding fails.
pub fn save_playback_npz(traj: &Trajectory, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| ComposeError::io(path, e))?;
    let write_err = |e: ndarray_npy::WriteNpzError| ComposeError::npy_write(path, e.to_string());

    let empty = Array1::<f64>::zeros(0);
    let mut npz = NpzWriter::new_compressed(file);
    npz.add_array("joint_names", &empty).map_err(write_err)?;
    npz.add_array("positions", traj.as_array()).map_err(write_err)?;
    npz.add_array("velocities", &empty).map_err(write_err)?;
    npz.add_array("efforts", &empty).map_err(write_err)?;
    npz.add_array("timestamps", &empty).map_err(write_err)?;
    npz.add_array("fps", &arr0(0_i64)).map_err(write_err)?;
    npz.finish().map_err(write_err)?;

    info!(path = %path.display(), shape = ?traj.shape(), "playback bundle saved");
    Ok(())
}

fn read_npy_f64(path: &Path) -> Result<ArrayD<f64>> {
    let file = File::open(path).map_err(|e| ComposeError::io(path, e))?;
    ArrayD::<f64>::read_npy(BufReader::new(file))
        .map_err(|e| ComposeError::npy_read(path, e.to_string()))
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| ComposeError::io(path, e))
}
