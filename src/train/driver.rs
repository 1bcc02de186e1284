use std::time::Instant;

use tracing::{debug, info};

use crate::error::{PerceptronError, Result};
use crate::layer::grid::Layer;
use crate::layer::shapes::ShapeGenerator;
use crate::perceptron::perceptron::Perceptron;
use crate::rng::source::RandomSource;
use crate::train::observer::TrainingObserver;
use crate::train::pass_stats::{PassStats, TrainingReport};
use crate::train::train_config::PerceptronConfig;

/// Where a [`TrainingDriver::run`] currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    EvaluateBaseline,
    TrainLoop,
    EvaluateFinal,
    Done,
}

/// Owns the input buffer, the weights and the random source for a run.
///
/// Both pass kinds restart the random source from a fixed seed, so every
/// evaluation sees the same samples and every training pass replays the same
/// sample stream against the weights left by the previous pass.
///
/// A rectangle counts as a miss when its score is above the bias and a circle
/// when its score is below it. Training inhibits missed rectangles and
/// reinforces missed circles.
#[derive(Debug)]
pub struct TrainingDriver {
    config: PerceptronConfig,
    rng: RandomSource,
    generator: ShapeGenerator,
    input: Layer,
    perceptron: Perceptron,
    phase: Phase,
    snapshots: usize,
}

impl TrainingDriver {
    /// A driver with all weights at zero.
    pub fn new(config: PerceptronConfig) -> Result<TrainingDriver> {
        let weights = Layer::zeros(config.width, config.height);
        TrainingDriver::with_weights(config, weights)
    }

    /// A driver that continues from previously saved weights.
    pub fn with_weights(config: PerceptronConfig, weights: Layer) -> Result<TrainingDriver> {
        config.validate()?;
        let expected = (config.width, config.height);
        if weights.dimensions() != expected {
            return Err(PerceptronError::DimensionMismatch {
                left: expected,
                right: weights.dimensions(),
            });
        }
        Ok(TrainingDriver {
            rng: RandomSource::new(config.check_seed),
            generator: ShapeGenerator::new(config.border_offset),
            input: Layer::zeros(config.width, config.height),
            perceptron: Perceptron::from_weights(weights),
            phase: Phase::EvaluateBaseline,
            snapshots: 0,
            config,
        })
    }

    pub fn config(&self) -> &PerceptronConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn weights(&self) -> &Layer {
        self.perceptron.weights()
    }

    pub fn into_weights(self) -> Layer {
        self.perceptron.into_weights()
    }

    /// Check pass: counts misses over `N` rectangles and `N` circles drawn
    /// from the check seed. Leaves the weights untouched.
    pub fn evaluate(&mut self) -> usize {
        self.rng.reset(self.config.check_seed);
        let bias = self.config.bias;
        let mut fails = 0;

        for _ in 0..self.config.samples_per_pass {
            self.generator.random_rectangle(&mut self.rng, &mut self.input);
            if self.perceptron.score(&self.input) > bias {
                fails += 1;
            }

            self.generator.random_circle(&mut self.rng, &mut self.input);
            if self.perceptron.score(&self.input) < bias {
                fails += 1;
            }
        }

        fails
    }

    /// Train pass: replays the train seed and corrects every miss in place.
    /// Returns the number of adjustments, in `[0, 2N]`.
    pub fn train_pass<O: TrainingObserver>(&mut self, observer: &mut O) -> Result<usize> {
        self.rng.reset(self.config.train_seed);
        let bias = self.config.bias;
        let mut adjusted = 0;

        for _ in 0..self.config.samples_per_pass {
            self.generator.random_rectangle(&mut self.rng, &mut self.input);
            if self.perceptron.score(&self.input) > bias {
                self.perceptron.inhibit(&self.input);
                self.adjusted(observer)?;
                adjusted += 1;
            }

            self.generator.random_circle(&mut self.rng, &mut self.input);
            if self.perceptron.score(&self.input) < bias {
                self.perceptron.reinforce(&self.input);
                self.adjusted(observer)?;
                adjusted += 1;
            }
        }

        Ok(adjusted)
    }

    fn adjusted<O: TrainingObserver>(&mut self, observer: &mut O) -> Result<()> {
        let snapshot = self.snapshots;
        self.snapshots += 1;
        observer.weights_adjusted(snapshot, self.perceptron.weights())
    }

    /// Baseline evaluation, training passes until one makes no adjustment
    /// or the budget runs out, then the final evaluation.
    pub fn run<O: TrainingObserver>(&mut self, observer: &mut O) -> Result<TrainingReport> {
        let attempts = self.config.attempts_per_pass();
        let max_passes = self.config.max_train_passes;
        let mut baseline_fails = 0;
        let mut final_fails = 0;
        let mut passes = Vec::new();
        let mut converged = false;

        self.phase = Phase::EvaluateBaseline;
        loop {
            match self.phase {
                Phase::EvaluateBaseline => {
                    baseline_fails = self.evaluate();
                    info!(fails = baseline_fails, attempts, "baseline evaluation done");
                    observer.evaluated(Phase::EvaluateBaseline, baseline_fails, attempts)?;
                    self.phase = Phase::TrainLoop;
                }
                Phase::TrainLoop => {
                    for pass in 0..max_passes {
                        let t_start = Instant::now();
                        let adjustments = self.train_pass(observer)?;
                        let stats = PassStats {
                            pass,
                            max_passes,
                            adjustments,
                            elapsed_ms: t_start.elapsed().as_millis() as u64,
                        };
                        debug!(pass, adjustments, "training pass done");
                        observer.pass_finished(&stats)?;
                        passes.push(stats);

                        if adjustments == 0 {
                            converged = true;
                            break;
                        }
                    }
                    self.phase = Phase::EvaluateFinal;
                }
                Phase::EvaluateFinal => {
                    final_fails = self.evaluate();
                    info!(fails = final_fails, attempts, converged, "final evaluation done");
                    observer.evaluated(Phase::EvaluateFinal, final_fails, attempts)?;
                    self.phase = Phase::Done;
                }
                Phase::Done => break,
            }
        }

        Ok(TrainingReport {
            attempts,
            baseline_fails,
            final_fails,
            passes,
            converged,
            snapshots: self.snapshots,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        evaluations: Vec<(Phase, usize)>,
        snapshots: Vec<usize>,
        passes: Vec<usize>,
    }

    impl TrainingObserver for Recorder {
        fn evaluated(&mut self, phase: Phase, fails: usize, _attempts: usize) -> Result<()> {
            self.evaluations.push((phase, fails));
            Ok(())
        }

        fn weights_adjusted(&mut self, snapshot: usize, _weights: &Layer) -> Result<()> {
            self.snapshots.push(snapshot);
            Ok(())
        }

        fn pass_finished(&mut self, stats: &PassStats) -> Result<()> {
            self.passes.push(stats.adjustments);
            Ok(())
        }
    }

    struct Failing;

    impl TrainingObserver for Failing {
        fn weights_adjusted(&mut self, _snapshot: usize, _weights: &Layer) -> Result<()> {
            Err(PerceptronError::Config("disk full".into()))
        }
    }

    fn small_config() -> PerceptronConfig {
        PerceptronConfig {
            width: 16,
            height: 16,
            bias: 5.0,
            samples_per_pass: 20,
            max_train_passes: 30,
            ..PerceptronConfig::default()
        }
    }

    #[test]
    fn zero_weights_miss_every_circle_and_no_rectangle() {
        // Every score is 0: never above the bias, always below it.
        let mut driver = TrainingDriver::new(small_config()).unwrap();
        assert_eq!(driver.evaluate(), 20);
    }

    #[test]
    fn evaluation_is_reproducible_and_read_only() {
        let mut driver = TrainingDriver::new(small_config()).unwrap();
        driver.train_pass(&mut ()).unwrap();
        let weights = driver.weights().clone();

        let first = driver.evaluate();
        let second = driver.evaluate();
        assert_eq!(first, second);
        assert_eq!(driver.weights(), &weights);
    }

    #[test]
    fn train_pass_reports_each_adjustment() {
        let mut driver = TrainingDriver::new(small_config()).unwrap();
        let mut recorder = Recorder::default();

        let first = driver.train_pass(&mut recorder).unwrap();
        assert!(first > 0 && first <= 40);
        assert_eq!(recorder.snapshots, (0..first).collect::<Vec<_>>());

        let second = driver.train_pass(&mut recorder).unwrap();
        assert_eq!(recorder.snapshots.len(), first + second);
    }

    #[test]
    fn identical_drivers_train_identically() {
        let mut a = TrainingDriver::new(small_config()).unwrap();
        let mut b = TrainingDriver::new(small_config()).unwrap();
        let report_a = a.run(&mut ()).unwrap();
        let report_b = b.run(&mut ()).unwrap();

        let adjustments = |r: &TrainingReport| r.passes.iter().map(|p| p.adjustments).collect::<Vec<_>>();
        assert_eq!(adjustments(&report_a), adjustments(&report_b));
        assert_eq!(report_a.final_fails, report_b.final_fails);
        assert_eq!(a.weights(), b.weights());
    }

    #[test]
    fn run_walks_every_phase() {
        let mut driver = TrainingDriver::new(small_config()).unwrap();
        let mut recorder = Recorder::default();
        let report = driver.run(&mut recorder).unwrap();

        assert_eq!(driver.phase(), Phase::Done);
        assert_eq!(recorder.evaluations.len(), 2);
        assert_eq!(recorder.evaluations[0], (Phase::EvaluateBaseline, report.baseline_fails));
        assert_eq!(recorder.evaluations[1], (Phase::EvaluateFinal, report.final_fails));
        assert_eq!(report.attempts, 40);
        assert!(report.final_fails <= 40);

        assert!(!report.passes.is_empty() && report.passes.len() <= 30);
        assert_eq!(recorder.passes.len(), report.passes.len());
        let total: usize = report.passes.iter().map(|p| p.adjustments).sum();
        assert_eq!(report.snapshots, total);

        // Only the last pass may be clean, and only if the run converged.
        let last = report.passes.last().unwrap();
        assert_eq!(report.converged, last.adjustments == 0);
        assert!(report.passes[..report.passes.len() - 1].iter().all(|p| p.adjustments > 0));
    }

    #[test]
    fn zero_pass_budget_skips_training() {
        let config = PerceptronConfig { max_train_passes: 0, ..small_config() };
        let mut driver = TrainingDriver::new(config).unwrap();
        let report = driver.run(&mut ()).unwrap();
        assert!(report.passes.is_empty());
        assert!(!report.converged);
        assert_eq!(report.baseline_fails, report.final_fails);
    }

    #[test]
    fn observer_errors_abort_training() {
        let mut driver = TrainingDriver::new(small_config()).unwrap();
        let err = driver.run(&mut Failing).unwrap_err();
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn saved_weights_must_match_the_grid() {
        let err = TrainingDriver::with_weights(small_config(), Layer::zeros(8, 16)).unwrap_err();
        assert!(matches!(
            err,
            PerceptronError::DimensionMismatch { left: (16, 16), right: (8, 16) }
        ));
    }
}
