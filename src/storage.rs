//! Dataset I/O adapters.
//!
//! Thin wrappers around the Polars readers/writers, dispatched on file
//! extension. The schema engine never touches these; they exist so the CLI
//! can turn a path into a `DataFrame` and back.

pub mod loader;
pub mod saver;

pub use loader::load_dataset;
pub use saver::save_dataset;
