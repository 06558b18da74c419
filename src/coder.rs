//! Streaming encode/decode over shard fan-out/fan-in: applies the binary
//! expansion of a Cauchy matrix to each block read from the input, XORing
//! word slots instead of performing field multiplications per byte.

use std::io::{Read, Write};

use crate::block::{self, PeekReader};
use crate::error::{Error, Result};
use crate::field::Field;
use crate::matrix::FieldMatrix;

const SUPPORTED_WORD_WIDTHS: [usize; 4] = [1, 2, 4, 8];

/// Immutable configuration for one `(N, K, w)` erasure code: `N` total
/// shards, `K` data shards, `w` bytes per word. Any `K` of the `N` shards
/// produced by [`Coder::encode`] suffice to reconstruct the original stream
/// via [`Coder::decode`].
#[derive(Debug, Clone)]
pub struct Coder {
	data_shards: usize,
	total_shards: usize,
	word_width: usize,
	field: Field,
	encoder: FieldMatrix,
	encoder_binary: FieldMatrix,
	chunk_size: usize,
	data_block_size: usize,
	code_block_size: usize,
}

impl Coder {
	/// Builds a coder for `total_shards` total shards, `data_shards` of
	/// which carry the original data, with `word_width` bytes per word.
	///
	/// # Arguments
	/// * `total_shards` - `N`, the number of shards `encode` writes.
	/// * `data_shards` - `K`, the number of shards `decode` needs.
	/// * `word_width` - bytes per word; must be one of `1, 2, 4, 8`.
	///
	/// # Errors
	/// * `Error::ValueError` - `word_width` is not in `{1,2,4,8}`, or
	///   `data_shards` is zero or exceeds `total_shards`, or no field degree
	///   `n ≤ 7` satisfies `2^n ≥ total_shards + data_shards`, or the
	///   resulting `data_block_size` would not fit the one-byte
	///   end-of-stream length tag (`word_width · n · data_shards > 255`).
	/// * `Error::NoInverse` - propagated from Cauchy matrix construction if
	///   the chosen field is somehow too small (should not happen given the
	///   degree search above).
	pub fn new(total_shards: usize, data_shards: usize, word_width: usize) -> Result<Self> {
		if !SUPPORTED_WORD_WIDTHS.contains(&word_width) {
			return Err(Error::value(format!(
				"word width {word_width} must be one of {SUPPORTED_WORD_WIDTHS:?}"
			)));
		}
		if data_shards == 0 || data_shards > total_shards {
			return Err(Error::value(format!(
				"data shard count {data_shards} must be in [1, {total_shards}]"
			)));
		}

		let needed = total_shards + data_shards;
		let mut n = 2u32;
		while (1u64 << n) < needed as u64 {
			n += 1;
			if n > 7 {
				return Err(Error::value(format!(
					"no field degree <= 7 satisfies 2^n >= {needed} (N={total_shards}, K={data_shards})"
				)));
			}
		}

		let field = Field::new(n)?;
		let encoder = FieldMatrix::cauchy(total_shards, data_shards, field)?;

		let chunk_size = word_width * n as usize;
		let data_block_size = chunk_size * data_shards;
		let code_block_size = chunk_size * total_shards;

		if data_block_size > 255 {
			return Err(Error::value(format!(
				"data_block_size {data_block_size} exceeds the 255-byte limit of the end-of-stream length tag (w={word_width}, n={n}, K={data_shards})"
			)));
		}

		let encoder_binary = encoder.to_binary()?;

		tracing::debug!(
			total_shards,
			data_shards,
			word_width,
			field_degree = n,
			data_block_size,
			code_block_size,
			"constructed erasure coder"
		);

		Ok(Coder {
			data_shards,
			total_shards,
			word_width,
			field,
			encoder,
			encoder_binary,
			chunk_size,
			data_block_size,
			code_block_size,
		})
	}

	pub fn total_shards(&self) -> usize {
		self.total_shards
	}

	pub fn data_shards(&self) -> usize {
		self.data_shards
	}

	pub fn word_width(&self) -> usize {
		self.word_width
	}

	pub fn field(&self) -> Field {
		self.field
	}

	pub fn data_block_size(&self) -> usize {
		self.data_block_size
	}

	pub fn code_block_size(&self) -> usize {
		self.code_block_size
	}

	/// Reads `reader` to exhaustion, writing `N` shard streams to `writers`
	/// (in index order). Returns the exact byte length of the original
	/// stream.
	///
	/// # Errors
	/// * `Error::ValueError` - `writers.len() != total_shards()`.
	/// * `Error::Io` - propagated from the reader or any writer.
	#[tracing::instrument(skip(self, reader, writers), fields(total_shards = self.total_shards))]
	pub fn encode<R: Read, W: Write>(&self, reader: &mut R, writers: &mut [W]) -> Result<u64> {
		if writers.len() != self.total_shards {
			return Err(Error::value(format!(
				"expected {} writers, got {}",
				self.total_shards,
				writers.len()
			)));
		}

		let n = self.field.degree() as usize;
		let word_count = n * self.data_shards;
		let mut total_bytes: u64 = 0;

		loop {
			let (data_words, done) =
				block::read_data_block(reader, self.word_width, word_count, self.data_block_size)?;
			let code_words = apply_binary_matrix(&self.encoder_binary, &data_words)?;
			block::write_code_block(writers, &code_words, self.word_width, n)?;

			if done {
				let tag = *data_words.last().expect("non-empty data block") & 0xFF;
				total_bytes += tag;
				tracing::trace!(block_bytes = tag, "wrote final block");
				break;
			}
			total_bytes += self.data_block_size as u64;
			tracing::trace!(block_bytes = self.data_block_size, "wrote block");
		}

		tracing::debug!(total_bytes, "encode complete");
		Ok(total_bytes)
	}

	/// Reconstructs the original stream from `readers` (exactly
	/// `data_shards()` of them, supplying the shards of `[0, total_shards())`
	/// not listed in `excluded_shards`, in ascending shard-index order),
	/// writing the result to `writer`. Returns the number of bytes written,
	/// equal to the original stream length.
	///
	/// # Errors
	/// * `Error::ValueError` - `excluded_shards` does not contain exactly
	///   `total_shards() - data_shards()` distinct indices in
	///   `[0, total_shards())`, or `readers.len() != data_shards()`.
	/// * `Error::NoInverse` - the submatrix selected by `excluded_shards` is
	///   singular (cannot happen for a genuine Cauchy encoder).
	/// * `Error::Io` - propagated from a reader or the writer.
	#[tracing::instrument(skip(self, readers, writer), fields(total_shards = self.total_shards))]
	pub fn decode<R: Read, W: Write>(
		&self,
		excluded_shards: &[usize],
		readers: Vec<R>,
		writer: &mut W,
	) -> Result<u64> {
		let expected_excluded = self.total_shards - self.data_shards;
		if excluded_shards.len() != expected_excluded {
			return Err(Error::value(format!(
				"expected {expected_excluded} excluded shards, got {}",
				excluded_shards.len()
			)));
		}
		if excluded_shards.iter().any(|&i| i >= self.total_shards) {
			return Err(Error::value(format!(
				"excluded shard index out of range [0, {})",
				self.total_shards
			)));
		}
		{
			let mut seen = excluded_shards.to_vec();
			seen.sort_unstable();
			seen.dedup();
			if seen.len() != excluded_shards.len() {
				return Err(Error::value("excluded_shards contains duplicates".into()));
			}
		}
		if readers.len() != self.data_shards {
			return Err(Error::value(format!(
				"expected {} readers, got {}",
				self.data_shards,
				readers.len()
			)));
		}

		let decoder = self.encoder.submatrix(excluded_shards, &[])?.invert()?;
		let decoder_binary = decoder.to_binary()?;

		let n = self.field.degree() as usize;
		let mut peek_readers: Vec<PeekReader<R>> =
			readers.into_iter().map(PeekReader::new).collect();
		let mut total_bytes: u64 = 0;

		loop {
			let (code_words, is_last) = block::read_code_block(&mut peek_readers, self.word_width, n)?;
			let data_words = apply_binary_matrix(&decoder_binary, &code_words)?;
			let written = block::write_data_block(
				writer,
				&data_words,
				self.word_width,
				self.data_block_size,
				is_last,
			)?;
			total_bytes += written as u64;
			tracing::trace!(block_bytes = written, is_last, "wrote block");
			if is_last {
				break;
			}
		}

		tracing::debug!(total_bytes, "decode complete");
		Ok(total_bytes)
	}
}

/// `output[r] = XOR over c where matrix[r,c] = 1 of input[c]`: the
/// conditional-XOR inner loop that makes multiplying by a binary-expanded
/// matrix cheap relative to a genuine field multiply.
fn apply_binary_matrix(matrix: &FieldMatrix, input: &[u64]) -> Result<Vec<u64>> {
	let mut output = vec![0u64; matrix.rows()];
	for r in 0..matrix.rows() {
		let mut acc = 0u64;
		for c in 0..matrix.cols() {
			if matrix.get(r, c)? == 1 {
				acc ^= input[c];
			}
		}
		output[r] = acc;
	}
	Ok(output)
}
