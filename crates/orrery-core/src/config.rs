use crate::profiling::{self, ProfilingBackend};

/// Configurations for the Orrery engine
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub benchmark: BenchmarkMode,
}

impl Config {
    pub fn with_benchmark(mut self, benchmark: BenchmarkMode) -> Self {
        self.benchmark = benchmark;
        self
    }

    /// Start whatever profiling backend the benchmark mode asks for.
    pub fn apply_profiling(&self) {
        match self.benchmark {
            BenchmarkMode::Off => {}
            BenchmarkMode::On => profiling::init_profiling(ProfilingBackend::InProcess),
            BenchmarkMode::WithWebserver => {
                profiling::init_profiling(ProfilingBackend::PuffinHttp)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BenchmarkMode {
    /// Benchmarking is disabled
    #[default]
    Off,
    /// Benchmarking is enabled, and can be viewed using the built-in viewer
    On,
    /// Benchmarking is enabled, and can be viewed either using the built-in viewer or
    /// using external tools such as 'puffin_viewer'
    WithWebserver,
}
