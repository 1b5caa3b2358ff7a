//! Pure structural atoms shared by the linxc front-end and back-end.
//!
//! # Design Principles
//!
//! - **Slab-addressed, not arena-allocated.** The namespace tree and
//!   everything hung off it (types, functions, variables, expressions,
//!   statements) lives in index-addressed `Vec<T>` slabs owned by
//!   `linxc_lang::namespace::World`, referenced by small `u32` newtype
//!   IDs rather than by long-lived `&T`. This crate supplies the atoms
//!   those slabs are built from but does not itself own any allocator —
//!   see `linxc_lang::namespace`'s module doc for why IDs were chosen
//!   over raw references.
//! - **Interned identifiers.** [`Symbol`] turns identifier comparison
//!   during scope lookup into an integer compare.
//! - **Spans everywhere.** Every token and diagnostic carries a [`Span`]
//!   so errors can be reported in source order.
//!
//! ```
//! use linxc_base::Interner;
//!
//! let mut interner = Interner::new();
//! let sym = interner.intern("main");
//! assert_eq!(interner.resolve(sym), "main");
//! ```

pub mod error;
pub mod intern;
pub mod span;

pub use error::{ErrorKind, Result, SpannedError};
pub use intern::{Interner, Symbol};
pub use span::Span;
