//! Matrix algebra over GF(2^n): construction, Cauchy matrices, submatrix
//! extraction, determinant/cofactor/inverse, and expansion into a binary
//! (GF(2)) block matrix.

use crate::error::{Error, Result};
use crate::field::{Elt, Field};

/// A dense R×C matrix over a fixed `Field`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMatrix {
	field: Field,
	rows: usize,
	cols: usize,
	data: Vec<Elt>,
}

impl FieldMatrix {
	/// Allocates a zeroed R×C matrix. Fails with `Error::ValueError` if
	/// either dimension is zero, or `Error::AllocationFailure` if the
	/// backing buffer cannot be reserved.
	pub fn new(rows: usize, cols: usize, field: Field) -> Result<Self> {
		if rows == 0 || cols == 0 {
			return Err(Error::value(format!(
				"matrix dimensions must be positive, got {rows}x{cols}"
			)));
		}
		let mut data = Vec::new();
		data.try_reserve_exact(rows * cols).map_err(|e| {
			Error::alloc(format!("could not allocate {rows}x{cols} matrix: {e}"))
		})?;
		data.resize(rows * cols, 0);
		Ok(FieldMatrix { field, rows, cols, data })
	}

	pub fn field(&self) -> Field {
		self.field
	}

	pub fn rows(&self) -> usize {
		self.rows
	}

	pub fn cols(&self) -> usize {
		self.cols
	}

	fn index(&self, r: usize, c: usize) -> Result<usize> {
		if r >= self.rows || c >= self.cols {
			return Err(Error::value(format!(
				"index ({r},{c}) out of bounds for {}x{} matrix",
				self.rows, self.cols
			)));
		}
		Ok(r * self.cols + c)
	}

	pub fn get(&self, r: usize, c: usize) -> Result<Elt> {
		Ok(self.data[self.index(r, c)?])
	}

	pub fn set(&mut self, r: usize, c: usize, v: Elt) -> Result<()> {
		self.field.validate(v);
		let i = self.index(r, c)?;
		self.data[i] = v;
		Ok(())
	}

	/// Fills this matrix with the Cauchy matrix `M[r,c] = 1/((r+cols) - c)`.
	/// Requires `order ≥ rows + cols`; the `+ cols` offset on the row index
	/// keeps the row and column index sets disjoint, so every
	/// `(r + cols) - c` is nonzero and invertible.
	pub fn set_cauchy(&mut self) -> Result<()> {
		if (self.field.order() as usize) < self.rows + self.cols {
			return Err(Error::value(format!(
				"field order {} too small for a {}x{} Cauchy matrix",
				self.field.order(),
				self.rows,
				self.cols
			)));
		}
		for r in 0..self.rows {
			for c in 0..self.cols {
				let x = self.field.sub((r + self.cols) as Elt, c as Elt);
				let v = self.field.invert(x)?;
				self.set(r, c, v)?;
			}
		}
		Ok(())
	}

	/// Builds a new rows×cols Cauchy matrix over `field`.
	pub fn cauchy(rows: usize, cols: usize, field: Field) -> Result<Self> {
		let mut m = FieldMatrix::new(rows, cols, field)?;
		m.set_cauchy()?;
		Ok(m)
	}

	/// Returns the matrix obtained by deleting `excluded_rows` and
	/// `excluded_cols`, preserving relative order.
	pub fn submatrix(&self, excluded_rows: &[usize], excluded_cols: &[usize]) -> Result<Self> {
		let kept_rows: Vec<usize> =
			(0..self.rows).filter(|r| !excluded_rows.contains(r)).collect();
		let kept_cols: Vec<usize> =
			(0..self.cols).filter(|c| !excluded_cols.contains(c)).collect();
		let mut out = FieldMatrix::new(kept_rows.len(), kept_cols.len(), self.field)?;
		for (out_r, &r) in kept_rows.iter().enumerate() {
			for (out_c, &c) in kept_cols.iter().enumerate() {
				out.set(out_r, out_c, self.get(r, c)?)?;
			}
		}
		Ok(out)
	}

	fn require_square(&self) -> Result<()> {
		if self.rows != self.cols {
			return Err(Error::value(format!(
				"operation requires a square matrix, got {}x{}",
				self.rows, self.cols
			)));
		}
		Ok(())
	}

	/// Laplace expansion along row 0. Arithmetic is in the field, so
	/// `negate` is the identity and the alternating sign has no effect.
	pub fn determinant(&self) -> Result<Elt> {
		self.require_square()?;
		if self.rows == 1 {
			return self.get(0, 0);
		}
		let mut det = 0;
		for c in 0..self.cols {
			let minor = self.submatrix(&[0], &[c])?;
			let term = self.field.multiply(self.get(0, c)?, minor.determinant()?);
			det = self.field.add(det, term);
		}
		Ok(det)
	}

	/// The cofactor matrix: `C[r,c] = det(minor(r,c))` (characteristic 2
	/// makes the `(-1)^(r+c)` sign a no-op).
	pub fn cofactors(&self) -> Result<Self> {
		self.require_square()?;
		let mut out = FieldMatrix::new(self.rows, self.cols, self.field)?;
		for r in 0..self.rows {
			for c in 0..self.cols {
				let minor = self.submatrix(&[r], &[c])?;
				out.set(r, c, minor.determinant()?)?;
			}
		}
		Ok(out)
	}

	/// `T[r,c] = M[c,r]`.
	pub fn transpose(&self) -> Result<Self> {
		self.require_square()?;
		let mut out = FieldMatrix::new(self.rows, self.cols, self.field)?;
		for r in 0..self.rows {
			for c in 0..self.cols {
				out.set(r, c, self.get(c, r)?)?;
			}
		}
		Ok(out)
	}

	/// `S[r,c] = multiply(M[r,c], f)`.
	///
	/// The source this crate is modeled on restricts `scale` to square
	/// matrices; nothing in this crate ever calls it on a non-square
	/// matrix (its only caller is `invert`, always on a square
	/// cofactor/transpose), so the restriction is kept rather than
	/// speculatively relaxed.
	pub fn scale(&self, f: Elt) -> Result<Self> {
		self.require_square()?;
		let mut out = FieldMatrix::new(self.rows, self.cols, self.field)?;
		for r in 0..self.rows {
			for c in 0..self.cols {
				out.set(r, c, self.field.multiply(self.get(r, c)?, f))?;
			}
		}
		Ok(out)
	}

	/// `invert = scale(transpose(cofactors(M)), invert(det(M)))`. Fails with
	/// `Error::NoInverse` when `det = 0`.
	pub fn invert(&self) -> Result<Self> {
		self.require_square()?;
		let det = self.determinant()?;
		let det_inv = self.field.invert(det)?;
		self.cofactors()?.transpose()?.scale(det_inv)
	}

	/// Standard matrix multiplication: requires `self.cols == other.rows`.
	pub fn multiply(&self, other: &FieldMatrix) -> Result<Self> {
		if self.cols != other.rows {
			return Err(Error::value(format!(
				"cannot multiply {}x{} by {}x{}",
				self.rows, self.cols, other.rows, other.cols
			)));
		}
		let mut out = FieldMatrix::new(self.rows, other.cols, self.field)?;
		for r in 0..self.rows {
			for c in 0..other.cols {
				let mut acc = 0;
				for k in 0..self.cols {
					let term = self.field.multiply(self.get(r, k)?, other.get(k, c)?);
					acc = self.field.add(acc, term);
				}
				out.set(r, c, acc)?;
			}
		}
		Ok(out)
	}

	/// Expands this R×C matrix over GF(2^n) into an (R·n)×(C·n) matrix over
	/// GF(2): the block at `(r·n..r·n+n, c·n..c·n+n)` is `field.matrix_of(M[r,c])`.
	pub fn to_binary(&self) -> Result<Self> {
		let n = self.field.degree() as usize;
		let gf2 = Field::new(1)?;
		let mut out = FieldMatrix::new(self.rows * n, self.cols * n, gf2)?;
		for r in 0..self.rows {
			for c in 0..self.cols {
				let block = self.field.matrix_of(self.get(r, c)?)?;
				for br in 0..n {
					for bc in 0..n {
						out.set(r * n + br, c * n + bc, block.get(br, bc)?)?;
					}
				}
			}
		}
		Ok(out)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn identity(size: usize, field: Field) -> FieldMatrix {
		let mut m = FieldMatrix::new(size, size, field).unwrap();
		for i in 0..size {
			m.set(i, i, 1).unwrap();
		}
		m
	}

	// S2
	#[test]
	fn scenario_s2_cauchy_5x3_over_f3() {
		let f3 = Field::new(3).unwrap();
		let m = FieldMatrix::cauchy(5, 3, f3).unwrap();
		let expected = [
			[6, 5, 1],
			[7, 2, 3],
			[2, 7, 4],
			[3, 4, 7],
			[4, 3, 2],
		];
		for (r, row) in expected.iter().enumerate() {
			for (c, &v) in row.iter().enumerate() {
				assert_eq!(m.get(r, c).unwrap(), v, "mismatch at ({r},{c})");
			}
		}
	}

	// S3, S4
	#[test]
	fn scenario_s3_s4_submatrix_and_inverse() {
		let f3 = Field::new(3).unwrap();
		let m = FieldMatrix::cauchy(5, 3, f3).unwrap();
		let sub = m.submatrix(&[0, 1], &[]).unwrap();
		let expected_sub = [[2, 7, 4], [3, 4, 7], [4, 3, 2]];
		for (r, row) in expected_sub.iter().enumerate() {
			for (c, &v) in row.iter().enumerate() {
				assert_eq!(sub.get(r, c).unwrap(), v);
			}
		}

		let inv = sub.invert().unwrap();
		let expected_inv = [[3, 6, 4], [2, 6, 6], [5, 2, 3]];
		for (r, row) in expected_inv.iter().enumerate() {
			for (c, &v) in row.iter().enumerate() {
				assert_eq!(inv.get(r, c).unwrap(), v);
			}
		}

		let product = sub.multiply(&inv).unwrap();
		assert_eq!(product, identity(3, f3));
		let product = inv.multiply(&sub).unwrap();
		assert_eq!(product, identity(3, f3));
	}

	// S5
	#[test]
	fn scenario_s5_cauchy_determinants() {
		let f2 = Field::new(2).unwrap();
		assert_eq!(FieldMatrix::cauchy(2, 2, f2).unwrap().determinant().unwrap(), 1);

		let f3 = Field::new(3).unwrap();
		assert_eq!(FieldMatrix::cauchy(3, 3, f3).unwrap().determinant().unwrap(), 7);

		let f4 = Field::new(4).unwrap();
		assert_eq!(FieldMatrix::cauchy(4, 4, f4).unwrap().determinant().unwrap(), 7);
	}

	#[test]
	fn every_square_submatrix_of_a_cauchy_matrix_is_invertible() {
		use itertools::Itertools;

		let n_total = 6usize;
		let k = 3usize;
		let field = Field::new(4).unwrap();
		let m = FieldMatrix::cauchy(n_total, k, field).unwrap();
		for excluded in (0..n_total).combinations(n_total - k) {
			let sub = m.submatrix(&excluded, &[]).unwrap();
			let inv = sub.invert().unwrap();
			assert_eq!(sub.multiply(&inv).unwrap(), identity(k, field));
			assert_eq!(inv.multiply(&sub).unwrap(), identity(k, field));
		}
	}

	#[test]
	fn to_binary_expands_dimensions_and_roundtrips_identity() {
		let field = Field::new(4).unwrap();
		let id = identity(3, field);
		let binary = id.to_binary().unwrap();
		assert_eq!(binary.rows(), 12);
		assert_eq!(binary.cols(), 12);
		let gf2 = Field::new(1).unwrap();
		assert_eq!(binary, identity(12, gf2));
	}

	#[test]
	fn scale_rejects_non_square() {
		let field = Field::new(3).unwrap();
		let m = FieldMatrix::new(2, 3, field).unwrap();
		assert!(m.scale(1).is_err());
	}
}
