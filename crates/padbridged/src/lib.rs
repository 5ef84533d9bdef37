pub mod logging;

mod app;

pub use app::{
    describe_event, mapping_yaml, probe, run_bridge, run_remap, system_simulator, AppError,
    RemapSession, RemapStep,
};
