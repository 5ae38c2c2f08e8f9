use rand::seq::SliceRandom;
use rand::Rng;

/// Returns a uniformly random permutation of `items`.
///
/// `SliceRandom::shuffle` is a Fisher–Yates shuffle, so every permutation is
/// equally likely. Never sort with a random comparator instead.
pub fn shuffled<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    out.shuffle(rng);
    out
}

/// Uniform index into a slice of length `len`, or `None` when empty.
pub fn pick_index<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Option<usize> {
    if len == 0 {
        None
    } else {
        Some(rng.gen_range(0..len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_shuffled_is_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        let items: Vec<u32> = (0..50).collect();
        let mut out = shuffled(&items, &mut rng);
        assert_eq!(out.len(), items.len());
        out.sort_unstable();
        assert_eq!(out, items);
    }

    #[test]
    fn test_shuffled_empty_and_single() {
        let mut rng = StdRng::seed_from_u64(1);
        let empty: Vec<u8> = vec![];
        assert!(shuffled(&empty, &mut rng).is_empty());
        assert_eq!(shuffled(&[42], &mut rng), vec![42]);
    }

    #[test]
    fn test_first_position_is_uniform() {
        // 每個元素出現在第一位的次數應接近 trials / n
        let mut rng = StdRng::seed_from_u64(2024);
        let items = [0usize, 1, 2, 3];
        let trials = 40_000;
        let mut counts = [0usize; 4];
        for _ in 0..trials {
            counts[shuffled(&items, &mut rng)[0]] += 1;
        }
        let expected = trials as f64 / 4.0;
        let chi2: f64 = counts
            .iter()
            .map(|&c| (c as f64 - expected).powi(2) / expected)
            .sum();
        // df = 3, p = 0.001 critical value is 16.27
        assert!(chi2 < 16.27, "chi-square too large: {} ({:?})", chi2, counts);
    }

    #[test]
    fn test_pick_index_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(pick_index(0, &mut rng), None);
        for _ in 0..100 {
            let i = pick_index(3, &mut rng).unwrap();
            assert!(i < 3);
        }
    }
}
