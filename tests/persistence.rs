//! File round-trips for trajectories, datasets and run configurations.

use std::fs::File;

use approx::assert_relative_eq;
use motion_composer::{
    load_dataset, load_trajectory, save_playback_npz, save_trajectory, ComposeError,
    ComposerConfig, Dataset, InterpolationParams, Primitive, PrimitiveSource, Trajectory,
};
use ndarray::{array, Array1, Array2};
use ndarray_npy::{NpzReader, WriteNpyExt};
use tempfile::tempdir;

fn sample(timesteps: usize, joints: usize) -> Trajectory {
    Trajectory::new(Array2::from_shape_fn((timesteps, joints), |(t, j)| {
        t as f64 * 0.5 - j as f64 * 0.25
    }))
    .unwrap()
}

#[test]
fn test_trajectory_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("touch_left.npy");
    let traj = sample(40, 12);

    save_trajectory(&traj, &path).unwrap();
    let loaded = load_trajectory(&path).unwrap();
    assert_eq!(loaded.shape(), (40, 12));
    for (a, b) in loaded.view().iter().zip(traj.view().iter()) {
        assert_relative_eq!(*a, *b);
    }
}

#[test]
fn test_one_dimensional_array_loads_as_position() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("head_left.npy");
    array![0.45, -0.2]
        .write_npy(File::create(&path).unwrap())
        .unwrap();

    let head = load_trajectory(&path).unwrap();
    assert!(head.is_position());
    assert_eq!(head, Trajectory::position(&[0.45, -0.2]).unwrap());
}

#[test]
fn test_primitive_from_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("lift_right.npy");
    save_trajectory(&sample(60, 3), &path).unwrap();

    let prim = Primitive::new(PrimitiveSource::FromPath(path)).unwrap();
    assert_eq!(prim.trajectory(), &sample(60, 3));
}

#[test]
fn test_load_errors() {
    let dir = tempdir().unwrap();

    let missing = dir.path().join("missing.npy");
    assert!(matches!(
        load_trajectory(&missing),
        Err(ComposeError::Io { .. })
    ));

    let garbage = dir.path().join("garbage.npy");
    std::fs::write(&garbage, b"not an array").unwrap();
    assert!(matches!(
        load_trajectory(&garbage),
        Err(ComposeError::NpyRead { .. })
    ));

    let empty = dir.path().join("empty.npy");
    Array1::<f64>::zeros(0)
        .write_npy(File::create(&empty).unwrap())
        .unwrap();
    assert!(load_trajectory(&empty).unwrap_err().is_dimension_error());
}

#[test]
fn test_dataset_save_and_reload() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("dataset.npy");

    let prims = vec![
        Primitive::from_trajectory(sample(10, 4)),
        Primitive::from_trajectory(sample(10, 4)),
    ];
    let mut dataset = Dataset::with_seed(prims, 5);
    let params = InterpolationParams::new(4, vec![3]);
    dataset
        .compose_dataset(3, 5, &[1.0, 2.0], Some(&params))
        .unwrap();
    dataset.save_npy(&path).unwrap();

    let reloaded = load_dataset(&path).unwrap();
    assert_eq!(Some(&reloaded), dataset.table());

    // a 3-D file is not a trajectory
    assert!(matches!(
        load_trajectory(&path),
        Err(ComposeError::NpyRead { .. })
    ));
}

#[test]
fn test_playback_bundle() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("playback.npz");
    save_playback_npz(&sample(25, 14), &path).unwrap();

    let npz = NpzReader::new(File::open(&path).unwrap()).unwrap();
    assert_eq!(npz.len(), 6);
}

#[test]
fn test_config_json_round_trip() {
    let config = ComposerConfig::demo().with_seed(11);
    let json = serde_json::to_string_pretty(&config).unwrap();
    let parsed: ComposerConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, config);

    let minimal: ComposerConfig =
        serde_json::from_str(r#"{"num_sequences": 2, "num_cycles": 3, "weights": [1.0]}"#)
            .unwrap();
    assert_eq!(minimal.seed, None);
    assert_eq!(minimal.interpolation, None);
    assert!(minimal.validate().is_ok());
}

#[test]
fn test_seeded_runs_write_identical_files() {
    let dir = tempdir().unwrap();
    let config = ComposerConfig::new(2, 6, vec![1.0, 1.0]).with_seed(3);
    let prims = vec![
        Primitive::from_trajectory(sample(8, 2)),
        Primitive::from_trajectory(Trajectory::new(Array2::ones((8, 2))).unwrap()),
    ];

    let mut paths = Vec::new();
    for run in 0..2 {
        let mut dataset = Dataset::for_config(prims.clone(), &config);
        dataset.compose(&config).unwrap();
        let path = dir.path().join(format!("run{run}.npy"));
        dataset.save_npy(&path).unwrap();
        paths.push(path);
    }
    assert_eq!(
        std::fs::read(&paths[0]).unwrap(),
        std::fs::read(&paths[1]).unwrap()
    );
}
