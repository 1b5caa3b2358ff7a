//! Driver-facing compilation session for Linxc (`spec.md` §6): resolving
//! `#include`s against registered directories, holding the parsed-file
//! table a driver and the C emitter both read from, and transpiling
//! clean files to portable C.
//!
//! `linxc-lang` never touches a filesystem or a terminal; everything
//! here does.

pub mod codegen_c;
pub mod diagnostic;
pub mod loader;
pub mod session;
pub mod style;

pub use session::{ParsedFile, Session};
