//! A systematic MDS erasure code over GF(2^n) Cauchy matrices.
//!
//! Given `K` data shards, [`Coder::encode`] produces `N ≥ K` shards such
//! that any `K` of the `N` suffice to reconstruct the original byte stream;
//! [`Coder::decode`] performs that reconstruction given any `K`-subset of
//! shards and the indices of the excluded ones.
//!
//! The crate is organized as three layers, leaves first:
//! - [`field`]: scalar arithmetic in GF(2^n).
//! - [`matrix`]: matrix algebra over GF(2^n), including Cauchy matrix
//!   construction and expansion into a binary (GF(2)) block matrix.
//! - [`coder`]: the streaming encoder/decoder built on top of the two.
//!
//! File I/O, the command-line front end, and logging configuration are
//! left to callers; this crate only ever touches the `Read`/`Write` values
//! handed to it.

pub mod block;
pub mod coder;
pub mod error;
pub mod field;
pub mod matrix;

pub use coder::Coder;
pub use error::{Error, Result};
pub use field::Field;
pub use matrix::FieldMatrix;
