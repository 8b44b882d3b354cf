//! Lakerunner values compiler.
//!
//! Turns an install-wizard configuration snapshot into a Helm `values.yaml`
//! for the Lakerunner chart, or refuses when the snapshot is incomplete.
//! [`validate`] is the completeness gate and [`compile`] the renderer; both
//! are pure and share one [`Policy`] for the constants they stamp in.

pub mod compile;
pub mod policy;
pub mod render;
pub mod tools;
pub mod types;
pub mod validate;

pub use compile::{compile, ValuesCompiler};
pub use policy::{Policy, PolicyError};
pub use types::ValuesConfig;
pub use validate::{is_complete, Incomplete};
