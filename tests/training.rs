use shape_perceptron::{
    load_layer_bin, save_layer_bin, ConsoleObserver, OutputLayout, PerceptronConfig, TrainingDriver,
};

#[test]
fn reference_setup_learns_to_separate_shapes() {
    // 50x50 grid, bias 10, 100 samples, check seed 666, train seed 69.
    let config = PerceptronConfig::default();
    let mut driver = TrainingDriver::new(config).unwrap();

    let report = driver.run(&mut ()).unwrap();

    assert_eq!(report.attempts, 200);
    assert!(report.baseline_fails > 0);
    assert!(
        report.final_fails < report.baseline_fails,
        "fails went from {} to {}",
        report.baseline_fails,
        report.final_fails
    );
    assert!(report.passes.len() <= 100);
}

#[test]
fn resumed_weights_pick_up_where_training_stopped() {
    let dir = tempfile::tempdir().unwrap();
    let layout = OutputLayout::new(dir.path());
    layout.create_dirs().unwrap();

    let config = PerceptronConfig {
        width: 20,
        height: 20,
        samples_per_pass: 30,
        max_train_passes: 3,
        ..PerceptronConfig::default()
    };

    let mut first = TrainingDriver::new(config.clone()).unwrap();
    let first_report = first.run(&mut ()).unwrap();
    let checkpoint = layout.weights_checkpoint_path();
    save_layer_bin(first.weights(), &checkpoint).unwrap();

    let restored = load_layer_bin(&checkpoint, 20, 20).unwrap();
    assert_eq!(&restored, first.weights());

    let mut resumed = TrainingDriver::with_weights(config, restored).unwrap();
    assert_eq!(resumed.evaluate(), first_report.final_fails);
}

#[test]
fn console_run_writes_one_snapshot_per_adjustment() {
    let dir = tempfile::tempdir().unwrap();
    let layout = OutputLayout::new(dir.path());
    layout.create_dirs().unwrap();

    let config = PerceptronConfig {
        width: 8,
        height: 8,
        samples_per_pass: 5,
        max_train_passes: 2,
        ppm_scale: 1,
        ..PerceptronConfig::default()
    };
    let mut observer = ConsoleObserver::with_snapshots(
        layout.clone(),
        shape_perceptron::PpmEncoder::new(
            shape_perceptron::ColorMap::Diverging,
            config.ppm_scale,
            config.ppm_range,
        ),
    );
    let mut driver = TrainingDriver::new(config).unwrap();
    let report = driver.run(&mut observer).unwrap();

    assert!(report.snapshots > 0);
    let written = std::fs::read_dir(dir.path().join("ppm/weights")).unwrap().count();
    assert_eq!(written, report.snapshots);
    assert!(layout.weight_snapshot_path(report.snapshots - 1).is_file());
}
