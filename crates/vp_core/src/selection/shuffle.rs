//! Uniform shuffling and picking over an injected RNG stream.

use rand::Rng;

/// In-place Fisher–Yates: for i from the last index down to 1, swap i with a
/// uniform j in 0..=i. Every permutation is equally likely.
pub fn fisher_yates<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

pub fn shuffled<T, R: Rng + ?Sized>(mut items: Vec<T>, rng: &mut R) -> Vec<T> {
    fisher_yates(&mut items, rng);
    items
}

/// Uniform choice; `None` on an empty slice.
pub fn pick_one<'a, T, R: Rng + ?Sized>(items: &'a [T], rng: &mut R) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    let idx = rng.gen_range(0..items.len());
    items.get(idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut items: Vec<u32> = (0..20).collect();
        fisher_yates(&mut items, &mut rng);

        let mut sorted = items.clone();
        sorted.sort();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_shuffle_empty_and_single() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut empty: Vec<u8> = vec![];
        fisher_yates(&mut empty, &mut rng);
        assert!(empty.is_empty());

        let mut one = vec![9];
        fisher_yates(&mut one, &mut rng);
        assert_eq!(one, vec![9]);
    }

    #[test]
    fn test_shuffle_reaches_every_permutation_of_three() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..600 {
            seen.insert(shuffled(vec![1, 2, 3], &mut rng));
        }
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn test_pick_one() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let empty: [u8; 0] = [];
        assert!(pick_one(&empty, &mut rng).is_none());
        assert_eq!(pick_one(&[5], &mut rng), Some(&5));
    }
}
