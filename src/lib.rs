pub mod simulation;
pub mod configuration;
pub mod report;
pub mod benchmark;

pub use simulation::states::{Body, System, NVec3};
pub use simulation::quadtree::{Quad, QuadNode, QuadTree};
pub use simulation::forces::{ForceModel, ForceSet, DirectSummation, TreeGravity};
pub use simulation::integrator::euler_step;
pub use simulation::params::Parameters;
pub use simulation::engine::Engine;
pub use simulation::scenario::Scenario;
pub use simulation::simulator::{Phase, SimError, Simulator};

pub use configuration::config::{EngineConfig, ForceConfig, RootConfig, ConfigError};
pub use configuration::input::{parse_input, load_input, BodyConfig, ScenarioConfig, InputError};

pub use report::{Reporter, ConsoleReporter, CsvTrace};

pub use benchmark::benchmark::bench_forces;
