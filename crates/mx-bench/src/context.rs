use mx_core::{
    AcceleratorEngine, AcceleratorRegistry, CpuEngine, DeviceDescriptor, Matrix, MultiplyEngine,
};
use tracing::{error, info, warn};

use crate::config::{BenchConfig, DevicePolicy};
use crate::error::Result;
use crate::inputs;
use crate::report;
use crate::timing::{whole_millis, Stopwatch};

/// How one engine's run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed { elapsed_ms: u64, output: Matrix },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineRun {
    pub engine: String,
    pub outcome: RunOutcome,
}

/// Result of a full benchmark: one entry per engine, in run order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub runs: Vec<EngineRun>,
    /// `None` when verification is off or fewer than two engines completed.
    pub outputs_match: Option<bool>,
}

impl Summary {
    pub fn run(&self, engine: &str) -> Option<&EngineRun> {
        self.runs.iter().find(|r| r.engine == engine)
    }
}

/// Owns the device registry and settings for a benchmark session.
#[derive(Debug)]
pub struct BenchContext {
    config: BenchConfig,
    registry: AcceleratorRegistry,
}

impl BenchContext {
    pub fn new(config: BenchConfig, registry: AcceleratorRegistry) -> Self {
        Self { config, registry }
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    pub fn registry(&self) -> &AcceleratorRegistry {
        &self.registry
    }

    /// Select the accelerator device according to the configured policy.
    ///
    /// Falls back to the system default when the policy matches nothing.
    pub fn apply_device_policy(&mut self) -> &DeviceDescriptor {
        let policy = self.config.device.clone();
        match policy {
            DevicePolicy::SystemDefault => self.registry.reset_to_default(),
            _ => {
                if !self.registry.select_device(|d| policy.matches(d)) {
                    warn!(policy = ?policy, "falling back to system default device");
                    self.registry.reset_to_default();
                }
            }
        }
        self.registry.active_device()
    }

    /// The engines to run, host reference first.
    ///
    /// If the active device cannot be started its engine is left out and the
    /// failure is logged.
    pub fn engines(&mut self) -> Vec<Box<dyn MultiplyEngine>> {
        let mut engines: Vec<Box<dyn MultiplyEngine>> = vec![Box::new(CpuEngine::new())];
        match self.registry.accelerator() {
            Ok(acc) => engines.push(Box::new(AcceleratorEngine::new(acc))),
            Err(e) => error!(error = %e, "accelerator unavailable"),
        }
        engines
    }

    /// List devices, pick one, time every engine and report.
    ///
    /// A failing engine is reported and skipped; the other engines still run.
    pub fn run(&mut self) -> Result<Summary> {
        report::log_devices(self.registry.list_devices());
        let active = self.apply_device_policy().clone();
        report::log_active_device(&active);
        report::log_device_properties(&active);

        let (a, b) = inputs::generate(&self.config);
        info!(
            m = self.config.m,
            w = self.config.w,
            n = self.config.n,
            fill = ?self.config.fill,
            "beginning calc"
        );

        let runs: Vec<EngineRun> = self
            .engines()
            .iter()
            .map(|engine| run_engine(engine.as_ref(), &a, &b))
            .collect();

        let outputs_match = if self.config.verify {
            compare_outputs(&runs)
        } else {
            None
        };
        let summary = Summary {
            runs,
            outputs_match,
        };
        report::log_summary(&summary);
        Ok(summary)
    }
}

/// Time one engine on `a @ b`.
///
/// Output allocation happens before the clock starts and counts as a failed
/// run when the output extent is too large.
pub fn run_engine(engine: &dyn MultiplyEngine, a: &Matrix, b: &Matrix) -> EngineRun {
    let result = Matrix::zeros((a.extent().rows(), b.extent().cols())).and_then(|mut output| {
        let stopwatch = Stopwatch::start(engine.name());
        engine.multiply(&a.view(), &b.view(), &mut output.view_mut())?;
        Ok((whole_millis(stopwatch.finish()), output))
    });

    let outcome = match result {
        Ok((elapsed_ms, output)) => RunOutcome::Completed { elapsed_ms, output },
        Err(e) => {
            error!(engine = %engine.name(), error = %e, "run failed");
            RunOutcome::Failed {
                reason: e.to_string(),
            }
        }
    };
    EngineRun {
        engine: engine.name().to_string(),
        outcome,
    }
}

fn compare_outputs(runs: &[EngineRun]) -> Option<bool> {
    let outputs: Vec<&Matrix> = runs
        .iter()
        .filter_map(|r| match &r.outcome {
            RunOutcome::Completed { output, .. } => Some(output),
            RunOutcome::Failed { .. } => None,
        })
        .collect();
    match outputs.split_first() {
        Some((first, rest)) if !rest.is_empty() => Some(rest.iter().all(|o| o == first)),
        _ => None,
    }
}
