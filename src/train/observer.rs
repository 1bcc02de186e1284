use std::io::{self, Stdout, Write};

use tracing::debug;

use crate::codec::ppm::PpmEncoder;
use crate::error::{PerceptronError, Result};
use crate::layer::grid::Layer;
use crate::output::layout::OutputLayout;
use crate::train::driver::Phase;
use crate::train::pass_stats::{fail_rate, PassStats};

/// Hooks the driver calls while a run progresses. Every method defaults to
/// doing nothing; `()` is the silent observer. An error from any hook aborts
/// the run.
pub trait TrainingObserver {
    /// An evaluation pass finished with `fails` out of `attempts`.
    fn evaluated(&mut self, _phase: Phase, _fails: usize, _attempts: usize) -> Result<()> {
        Ok(())
    }

    /// The weights were just updated; `snapshot` counts updates over the whole run.
    fn weights_adjusted(&mut self, _snapshot: usize, _weights: &Layer) -> Result<()> {
        Ok(())
    }

    fn pass_finished(&mut self, _stats: &PassStats) -> Result<()> {
        Ok(())
    }
}

impl TrainingObserver for () {}

/// Writes progress lines (stdout by default) and optionally a weight PPM
/// after every adjustment.
///
/// ```text
/// [INFO] fail rate of untrained model is 0.500000
/// [INFO] Pass 0: adjusted 103 times
/// [INFO] fail rate of trained model is 0.475000
/// ```
#[derive(Debug)]
pub struct ConsoleObserver<W: Write = Stdout> {
    out: W,
    snapshots: Option<(OutputLayout, PpmEncoder)>,
}

impl ConsoleObserver {
    pub fn new() -> ConsoleObserver {
        ConsoleObserver::with_writer(io::stdout())
    }

    /// Writes snapshots to `layout.weight_snapshot_path(n)` using `encoder`.
    pub fn with_snapshots(layout: OutputLayout, encoder: PpmEncoder) -> ConsoleObserver {
        ConsoleObserver::new().snapshots_to(layout, encoder)
    }
}

impl Default for ConsoleObserver {
    fn default() -> Self {
        ConsoleObserver::new()
    }
}

impl<W: Write> ConsoleObserver<W> {
    pub fn with_writer(out: W) -> ConsoleObserver<W> {
        ConsoleObserver { out, snapshots: None }
    }

    pub fn snapshots_to(mut self, layout: OutputLayout, encoder: PpmEncoder) -> ConsoleObserver<W> {
        self.snapshots = Some((layout, encoder));
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, args: std::fmt::Arguments<'_>) -> Result<()> {
        writeln!(self.out, "{}", args)
            .and_then(|_| self.out.flush())
            .map_err(|e| PerceptronError::io("<progress output>", e))
    }
}

impl<W: Write> TrainingObserver for ConsoleObserver<W> {
    fn evaluated(&mut self, phase: Phase, fails: usize, attempts: usize) -> Result<()> {
        let which = match phase {
            Phase::EvaluateBaseline => "untrained",
            _ => "trained",
        };
        self.line(format_args!(
            "[INFO] fail rate of {} model is {:.6}",
            which,
            fail_rate(fails, attempts)
        ))
    }

    fn weights_adjusted(&mut self, snapshot: usize, weights: &Layer) -> Result<()> {
        if let Some((layout, encoder)) = self.snapshots.as_mut() {
            let path = layout.weight_snapshot_path(snapshot);
            debug!("saving {}", path.display());
            encoder.save_ppm(weights, &path)?;
        }
        Ok(())
    }

    fn pass_finished(&mut self, stats: &PassStats) -> Result<()> {
        self.line(format_args!(
            "[INFO] Pass {}: adjusted {} times",
            stats.pass, stats.adjustments
        ))
    }
}
