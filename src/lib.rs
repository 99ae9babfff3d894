#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Mesh refinement, attribute synthesis, connectivity and spatial queries.
//!
//! Everything lives in [`geom`]; the most used entry points are re-exported here.

pub mod geom;

pub use geom::{
    ExecPath, Float2, Float3, Float4, Float4x4, MeshRefiner, Quatf, RefineDiagnostics,
    RefineError, RefineSettings, RefinedMesh, Tolerance, TriangulationPolicy,
};

cfg_if::cfg_if! {
    if #[cfg(feature = "debug_logs")] {
        /// Route `log` output to stderr, filtered by `RUST_LOG` (default `debug`).
        /// Calling it more than once is harmless.
        pub fn init_logger() {
            let _ = env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or("debug"),
            )
            .is_test(cfg!(test))
            .try_init();
        }
    } else {
        pub fn init_logger() {
            // no-op fallback when debug logs are disabled
        }
    }
}
