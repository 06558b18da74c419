//! The crate's error taxonomy: a small tagged union callers pattern-match on.

/// Errors surfaced from field arithmetic, matrix algebra, and the streaming
/// coder.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// A parameter was out of range: an invalid field degree, word width,
	/// or shard count.
	#[error("value out of range: {0}")]
	ValueError(String),
	/// Requested the multiplicative inverse of zero, or the inverse of a
	/// singular matrix.
	#[error("no multiplicative inverse exists")]
	NoInverse,
	/// Propagated unchanged from a reader or writer.
	#[error(transparent)]
	Io(#[from] std::io::Error),
	/// A backing buffer could not be allocated for the requested
	/// dimensions.
	#[error("allocation failed: {0}")]
	AllocationFailure(String),
}

impl Error {
	pub(crate) fn value(msg: impl Into<String>) -> Self {
		Self::ValueError(msg.into())
	}

	pub(crate) fn alloc(msg: impl Into<String>) -> Self {
		Self::AllocationFailure(msg.into())
	}
}

/// Result type used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;
