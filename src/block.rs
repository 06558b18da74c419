//! Block-level packing/unpacking of words and the end-of-stream
//! length-tagging convention.
//!
//! A "word" here is an opaque `w`-byte, big-endian chunk of stream bytes,
//! represented as a `u64` zero-extended from its low-order `w` bytes. The
//! matrix layer only ever XORs these words together (per the binary
//! expansion of the Cauchy encoder/decoder), so this module never interprets
//! a word's value beyond reading and writing it byte-for-byte.

use std::io::{self, Read, Write};

/// A `Read` adapter answering "is at least one more byte available?"
/// without consuming it: reads one byte eagerly and pushes it back on the
/// next `read` call.
pub struct PeekReader<R> {
	inner: R,
	peeked: Option<u8>,
}

impl<R: Read> PeekReader<R> {
	pub fn new(inner: R) -> Self {
		PeekReader { inner, peeked: None }
	}

	/// After consuming a full code block, answers whether any byte remains
	/// in the underlying stream.
	pub fn has_more(&mut self) -> io::Result<bool> {
		if self.peeked.is_some() {
			return Ok(true);
		}
		let mut byte = [0u8; 1];
		let n = self.inner.read(&mut byte)?;
		if n == 0 {
			Ok(false)
		} else {
			self.peeked = Some(byte[0]);
			Ok(true)
		}
	}
}

impl<R: Read> Read for PeekReader<R> {
	fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		if buf.is_empty() {
			return Ok(0);
		}
		let mut written = 0;
		if let Some(b) = self.peeked.take() {
			buf[0] = b;
			written = 1;
		}
		if written < buf.len() {
			written += self.inner.read(&mut buf[written..])?;
		}
		Ok(written)
	}
}

fn be_bytes_to_word(buf: &[u8]) -> u64 {
	let mut value: u64 = 0;
	for &b in buf {
		value = (value << 8) | b as u64;
	}
	value
}

fn word_to_be_bytes(word: u64, w: usize) -> Vec<u8> {
	word.to_be_bytes()[8 - w..].to_vec()
}

fn write_word<W: Write>(writer: &mut W, word: u64, w: usize) -> io::Result<()> {
	let bytes = word_to_be_bytes(word, w);
	writer.write_all(&bytes)
}

/// Reads one data block (`word_count = n·K` words of `w` bytes) from
/// `reader`, implementing the end-of-stream tagging convention: when a read
/// returns fewer than `w` bytes, the last byte of that word's buffer is
/// overwritten with the running byte count (cast to `u8`); this is safe
/// because `data_block_size < 256` is enforced at coder construction.
///
/// Returns the words read and whether this was the final (short or empty)
/// block.
pub fn read_data_block<R: Read>(
	reader: &mut R,
	w: usize,
	word_count: usize,
	data_block_size: usize,
) -> io::Result<(Vec<u64>, bool)> {
	let mut words = Vec::with_capacity(word_count);
	let mut block_size: usize = 0;
	for _ in 0..word_count {
		let mut buf = [0u8; 8];
		let mut read_so_far = 0;
		while read_so_far < w {
			let n = reader.read(&mut buf[read_so_far..w])?;
			if n == 0 {
				break;
			}
			read_so_far += n;
		}
		block_size += read_so_far;
		if read_so_far < w {
			buf[w - 1] = block_size as u8;
		}
		words.push(be_bytes_to_word(&buf[..w]));
	}
	let done = block_size < data_block_size;
	Ok((words, done))
}

/// Writes one code block (`code.len() = n·N` words), distributing word `i`
/// to writer `⌊i / n⌋`.
pub fn write_code_block<W: Write>(
	writers: &mut [W],
	code: &[u64],
	w: usize,
	n: usize,
) -> io::Result<()> {
	for (i, &word) in code.iter().enumerate() {
		write_word(&mut writers[i / n], word, w)?;
	}
	Ok(())
}

/// Reads one code block from `readers` (one per surviving shard, in
/// shard-index order), `n` words each. End-of-stream is detected by peeking
/// a single byte on the last reader after the block is fully consumed; all
/// readers are assumed to be in lockstep.
pub fn read_code_block<R: Read>(
	readers: &mut [PeekReader<R>],
	w: usize,
	n: usize,
) -> io::Result<(Vec<u64>, bool)> {
	let mut code = Vec::with_capacity(readers.len() * n);
	for reader in readers.iter_mut() {
		for _ in 0..n {
			let mut buf = [0u8; 8];
			reader.read_exact(&mut buf[..w])?;
			code.push(be_bytes_to_word(&buf[..w]));
		}
	}
	let is_last = !readers
		.last_mut()
		.expect("at least one surviving shard reader")
		.has_more()?;
	Ok((code, is_last))
}

/// Writes one data block. On the final block, the last byte of the last
/// word carries `data_block_size_last` (written there by `read_data_block`
/// at encode time); only that many bytes are emitted, flattened across the
/// data words in order.
pub fn write_data_block<W: Write>(
	writer: &mut W,
	data: &[u64],
	w: usize,
	data_block_size: usize,
	is_last: bool,
) -> io::Result<usize> {
	let emit_len = if is_last {
		let tag = (*data.last().expect("non-empty data block") & 0xFF) as usize;
		debug_assert!(
			tag < data_block_size,
			"length tag {tag} must be strictly less than data_block_size {data_block_size}"
		);
		tag
	} else {
		data_block_size
	};
	let mut emitted = 0;
	for &word in data {
		if emitted >= emit_len {
			break;
		}
		let bytes = word_to_be_bytes(word, w);
		let take = (emit_len - emitted).min(bytes.len());
		writer.write_all(&bytes[..take])?;
		emitted += take;
	}
	Ok(emitted)
}
