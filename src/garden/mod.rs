//! The flower garden: construction, population and per-frame animation

pub mod animate;
pub mod flower;
pub mod populate;
pub mod run_loop;

pub use animate::Animator;
pub use flower::{FlowerMeshes, FlowerPlacement, build_flower};
pub use populate::{Flower, Garden, SparkleField, populate};
pub use run_loop::{FrameSink, RunLoop, StopHandle, TickOutcome};
