//! Uniform sampling without replacement.

use rand::Rng;
use thiserror::Error;

/// Errors from drawing out of a pool
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum DrawError {
    #[error("can't draw from an empty pool")]
    EmptyPool,
}

/// Draw one value uniformly at random from `pool`.
///
/// Returns the drawn value and a new pool without it. The remaining values
/// keep their relative order. The input pool is left untouched so the caller
/// decides when to swap its state.
///
/// # Errors
///
/// Returns [`DrawError::EmptyPool`] when `pool` is empty.
pub fn draw_without_replacement<T, R>(pool: &[T], rng: &mut R) -> Result<(T, Vec<T>), DrawError>
where
    T: Clone,
    R: Rng + ?Sized,
{
    if pool.is_empty() {
        return Err(DrawError::EmptyPool);
    }

    let idx = rng.random_range(0..pool.len());
    let mut remaining = pool.to_vec();
    let value = remaining.remove(idx);
    Ok((value, remaining))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_draw_from_empty_pool() {
        let mut rng = StdRng::seed_from_u64(7);
        let pool: Vec<u8> = Vec::new();
        assert_eq!(
            draw_without_replacement(&pool, &mut rng),
            Err(DrawError::EmptyPool)
        );
    }

    #[test]
    fn test_draw_single_value() {
        let mut rng = StdRng::seed_from_u64(7);
        let (value, remaining) = draw_without_replacement(&[42u8], &mut rng).unwrap();
        assert_eq!(value, 42);
        assert!(remaining.is_empty());
    }

    #[test]
    fn test_draw_preserves_order_of_remaining() {
        let mut rng = StdRng::seed_from_u64(11);
        let pool: Vec<u8> = (1..=10).collect();
        let (value, remaining) = draw_without_replacement(&pool, &mut rng).unwrap();
        let expected: Vec<u8> = pool.iter().copied().filter(|&v| v != value).collect();
        assert_eq!(remaining, expected);
    }

    #[test]
    fn test_draw_leaves_input_untouched() {
        let mut rng = StdRng::seed_from_u64(3);
        let pool: Vec<u8> = (1..=15).collect();
        let _ = draw_without_replacement(&pool, &mut rng).unwrap();
        assert_eq!(pool.len(), 15);
    }

    #[test]
    fn test_draw_is_deterministic_for_seed() {
        let pool: Vec<u8> = (1..=75).collect();
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        assert_eq!(
            draw_without_replacement(&pool, &mut a),
            draw_without_replacement(&pool, &mut b)
        );
    }

    #[test]
    fn test_draw_reaches_every_value() {
        // Every value in a small pool should come up over enough draws
        let mut rng = StdRng::seed_from_u64(5);
        let pool = [1u8, 2, 3, 4];
        let mut seen = [false; 4];
        for _ in 0..200 {
            let (value, _) = draw_without_replacement(&pool, &mut rng).unwrap();
            seen[usize::from(value) - 1] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
