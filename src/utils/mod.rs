//! Generic utility primitives with zero Blender knowledge.
//!
//! - `args` - `--` separator handling and script-side argument parsing
//! - `command` - Process execution with captured output
//! - `io` - File I/O with consistent error handling

pub mod args;
pub mod command;
pub mod io;
