use num::Num;
use std::cmp::Ordering;

pub trait Compare<N>
where
    N: Num + Copy,
{
    /// dot product over sparse (index, value) pairs sorted by index
    /// d(a, b) = Σ(a_i * b_i)
    fn dot(vec: impl Iterator<Item = (usize, N)>, other: impl Iterator<Item = (usize, N)>) -> f64;
    /// cosine similarity over sparse (index, value) pairs sorted by index
    /// cos(θ) = Σ(a_i * b_i) / (||a|| * ||b||)
    /// 0 when either norm is 0
    fn cosine_similarity(vec: impl Iterator<Item = (usize, N)>, other: impl Iterator<Item = (usize, N)>) -> f64;
}

#[derive(Debug)]
pub struct DefaultCompare;

impl<N> Compare<N> for DefaultCompare
where
    N: Num + Copy + Into<f64>,
{
    #[inline]
    fn dot(vec: impl Iterator<Item = (usize, N)>, other: impl Iterator<Item = (usize, N)>) -> f64 {
        let mut a_it = vec.fuse();
        let mut b_it = other.fuse();
        let mut a_next = a_it.next();
        let mut b_next = b_it.next();
        let mut dot = 0_f64;
        while let (Some((ia, va)), Some((ib, vb))) = (a_next, b_next) {
            match ia.cmp(&ib) {
                Ordering::Equal => {
                    dot += va.into() * vb.into();
                    a_next = a_it.next();
                    b_next = b_it.next();
                }
                Ordering::Less => a_next = a_it.next(),
                Ordering::Greater => b_next = b_it.next(),
            }
        }
        dot
    }

    #[inline]
    fn cosine_similarity(vec: impl Iterator<Item = (usize, N)>, other: impl Iterator<Item = (usize, N)>) -> f64 {
        let mut a_it = vec.fuse();
        let mut b_it = other.fuse();
        let mut a_next = a_it.next();
        let mut b_next = b_it.next();
        let mut norm_a = 0_f64;
        let mut norm_b = 0_f64;
        let mut dot = 0_f64;
        while let (Some((ia, va)), Some((ib, vb))) = (a_next, b_next) {
            let (va, vb): (f64, f64) = (va.into(), vb.into());
            match ia.cmp(&ib) {
                Ordering::Equal => {
                    norm_a += va * va;
                    norm_b += vb * vb;
                    dot += va * vb;
                    a_next = a_it.next();
                    b_next = b_it.next();
                }
                Ordering::Less => {
                    norm_a += va * va;
                    a_next = a_it.next();
                }
                Ordering::Greater => {
                    norm_b += vb * vb;
                    b_next = b_it.next();
                }
            }
        }
        // Remaining terms on either side
        while let Some((_, va)) = a_next {
            let va: f64 = va.into();
            norm_a += va * va;
            a_next = a_it.next();
        }
        while let Some((_, vb)) = b_next {
            let vb: f64 = vb.into();
            norm_b += vb * vb;
            b_next = b_it.next();
        }
        if norm_a == 0.0 || norm_b == 0.0 {
            0.0
        } else {
            dot / (norm_a.sqrt() * norm_b.sqrt())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cos(a: &[(usize, f64)], b: &[(usize, f64)]) -> f64 {
        DefaultCompare::cosine_similarity(a.iter().copied(), b.iter().copied())
    }

    #[test]
    fn identical_direction_is_one() {
        let score = cos(&[(0, 1.0), (3, 2.0)], &[(0, 2.0), (3, 4.0)]);
        assert!((score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn disjoint_vectors_are_zero() {
        assert_eq!(cos(&[(0, 1.0)], &[(1, 1.0)]), 0.0);
    }

    #[test]
    fn zero_norm_short_circuits() {
        assert_eq!(cos(&[], &[(1, 1.0)]), 0.0);
        assert_eq!(cos(&[], &[]), 0.0);
    }

    #[test]
    fn does_not_assume_unit_vectors() {
        // a = (3, 4), b = (4, 0)
        let score = cos(&[(0, 3.0), (1, 4.0)], &[(0, 4.0)]);
        assert!((score - 0.6).abs() < 1e-12);
        let dot = DefaultCompare::dot([(0, 3.0_f32), (1, 4.0)].into_iter(), [(0, 4.0_f32)].into_iter());
        assert_eq!(dot, 12.0);
    }
}
