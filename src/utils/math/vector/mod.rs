use num::Num;
use serde::{Deserialize, Serialize};

/// ZeroSpVec is a sparse vector that treats zero as the implicit element.
/// It keeps indices and values side by side;
/// indices are always sorted in ascending order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZeroSpVec<N>
where
    N: Num,
{
    len: usize,
    inds: Vec<usize>,
    vals: Vec<N>,
}

impl<N> ZeroSpVec<N>
where
    N: Num + Copy,
{
    #[inline]
    pub fn new() -> Self {
        ZeroSpVec {
            len: 0,
            inds: Vec::new(),
            vals: Vec::new(),
        }
    }

    /// Reserve room for `cap` non-zero entries
    #[inline]
    pub fn with_capacity(cap: usize) -> Self {
        ZeroSpVec {
            len: 0,
            inds: Vec::with_capacity(cap),
            vals: Vec::with_capacity(cap),
        }
    }

    /// Build from (index, value) pairs in any order.
    /// Zero values are dropped, and duplicate indices are summed.
    ///
    /// # Arguments
    /// * `len` - dense length of the vector
    /// * `pairs` - non-zero entries; indices must be `< len`
    pub fn from_sparse(len: usize, mut pairs: Vec<(usize, N)>) -> Self {
        pairs.sort_by_key(|(idx, _)| *idx);
        let mut vec = ZeroSpVec::with_capacity(pairs.len());
        vec.len = len;
        for (idx, val) in pairs {
            debug_assert!(idx < len, "index {idx} out of bounds for length {len}");
            match vec.inds.last() {
                Some(&last) if last == idx => {
                    if let Some(acc) = vec.vals.last_mut() {
                        *acc = *acc + val;
                    }
                }
                _ => {
                    vec.inds.push(idx);
                    vec.vals.push(val);
                }
            }
        }
        vec.drop_zeros();
        vec
    }

    /// Append one dense element; zeros only grow the length
    #[inline]
    pub fn push(&mut self, value: N) {
        if value != N::zero() {
            self.inds.push(self.len);
            self.vals.push(value);
        }
        self.len += 1;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of stored non-zero entries
    #[inline]
    pub fn nnz(&self) -> usize {
        self.inds.len()
    }

    /// Value at `index`, zero when the entry is not stored
    #[inline]
    pub fn get(&self, index: usize) -> N {
        match self.inds.binary_search(&index) {
            Ok(pos) => self.vals[pos],
            Err(_) => N::zero(),
        }
    }

    /// Iterate over stored (index, value) pairs in index order
    #[inline]
    pub fn raw_iter(&self) -> impl Iterator<Item = (usize, N)> + '_ {
        self.inds.iter().copied().zip(self.vals.iter().copied())
    }

    /// Iterate over stored indices
    #[inline]
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.inds.iter().copied()
    }

    /// Apply `f` to every stored value; entries that become zero are removed
    pub fn map_values<F>(&mut self, mut f: F)
    where
        F: FnMut(usize, N) -> N,
    {
        for (idx, val) in self.inds.iter().zip(self.vals.iter_mut()) {
            *val = f(*idx, *val);
        }
        self.drop_zeros();
    }

    pub fn to_dense(&self) -> Vec<N> {
        let mut dense = vec![N::zero(); self.len];
        for (idx, val) in self.raw_iter() {
            dense[idx] = val;
        }
        dense
    }

    fn drop_zeros(&mut self) {
        if self.vals.iter().all(|v| *v != N::zero()) {
            return;
        }
        let mut keep_inds = Vec::with_capacity(self.inds.len());
        let mut keep_vals = Vec::with_capacity(self.vals.len());
        for (idx, val) in self.raw_iter() {
            if val != N::zero() {
                keep_inds.push(idx);
                keep_vals.push(val);
            }
        }
        self.inds = keep_inds;
        self.vals = keep_vals;
    }
}

impl<N> ZeroSpVec<N>
where
    N: Num + Copy + Into<f64>,
{
    /// Euclidean norm
    /// ||a|| = sqrt(Σ(a_i^2))
    #[inline]
    pub fn norm(&self) -> f64 {
        self.vals
            .iter()
            .map(|&v| {
                let v: f64 = v.into();
                v * v
            })
            .sum::<f64>()
            .sqrt()
    }
}

impl<N> Default for ZeroSpVec<N>
where
    N: Num + Copy,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<N> From<Vec<N>> for ZeroSpVec<N>
where
    N: Num + Copy,
{
    fn from(dense: Vec<N>) -> Self {
        let mut vec = ZeroSpVec::with_capacity(dense.len());
        for value in dense {
            vec.push(value);
        }
        vec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_dense_keeps_only_non_zero() {
        let v: ZeroSpVec<f64> = ZeroSpVec::from(vec![0.0, 1.5, 0.0, 2.0]);
        assert_eq!(v.len(), 4);
        assert_eq!(v.nnz(), 2);
        assert_eq!(v.get(1), 1.5);
        assert_eq!(v.get(2), 0.0);
        assert_eq!(v.to_dense(), vec![0.0, 1.5, 0.0, 2.0]);
    }

    #[test]
    fn from_sparse_sorts_and_merges_duplicates() {
        let v: ZeroSpVec<f32> = ZeroSpVec::from_sparse(5, vec![(3, 1.0), (0, 2.0), (3, 1.0), (1, 0.0)]);
        let pairs: Vec<(usize, f32)> = v.raw_iter().collect();
        assert_eq!(pairs, vec![(0, 2.0), (3, 2.0)]);
        assert_eq!(v.len(), 5);
    }

    #[test]
    fn norm_of_empty_vector_is_zero() {
        let v: ZeroSpVec<f64> = ZeroSpVec::from(vec![0.0; 3]);
        assert_eq!(v.norm(), 0.0);
        assert!(!v.is_empty());
        assert_eq!(ZeroSpVec::<f64>::new().len(), 0);
    }

    #[test]
    fn map_values_drops_new_zeros() {
        let mut v: ZeroSpVec<f64> = ZeroSpVec::from(vec![3.0, 0.0, 4.0]);
        assert_eq!(v.norm(), 5.0);
        v.map_values(|idx, val| if idx == 0 { 0.0 } else { val / 4.0 });
        assert_eq!(v.nnz(), 1);
        assert_eq!(v.get(2), 1.0);
    }
}
