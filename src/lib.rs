// Library root
// -----------
// The binary (`main.rs`) wires these modules into a single run: resolve
// settings, POST the sequence to ESMFold, pull out the first PDB structure
// and render it as a 3Dmol.js viewer page.
//
// Module responsibilities:
// - `api`: request/response types and the blocking client behind a
//   `Transport` seam.
// - `config`: credential, sequence and output settings from CLI and env.
// - `viewer`: HTML rendering and export/display of the page.
// - `pipeline`: the request -> extract -> render sequence.
// - `ui`: spinner and terminal messages.
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod ui;
pub mod viewer;

pub use error::{FoldError, Result};
