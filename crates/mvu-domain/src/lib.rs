//! Pure reactor model and version-alignment engine (no IO).
//!
//! Input: parsed descriptors and the local artifacts resolved from them.
//! Output: dependency maps, indexes, mismatch reports, and rewritten descriptor text.

#![forbid(unsafe_code)]

pub mod analysis;
pub mod codec;
pub mod expand;
pub mod extract;
pub mod identity;
pub mod index;
pub mod mismatch;
pub mod model;
pub mod protect;
pub mod rewrite;

mod error;

pub use error::ReactorError;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;
