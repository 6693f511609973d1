use rand::Rng;

/// Capitalize the first letter of `word` with probability `frequency` percent.
pub fn apply_capitalization<R: Rng>(word: &str, frequency: u32, rng: &mut R) -> String {
    if frequency == 0 || !rng.gen_bool(percent(frequency)) {
        return word.to_string();
    }
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub(crate) fn percent(frequency: u32) -> f64 {
    f64::from(frequency.min(100)) / 100.0
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn zero_frequency_is_identity() {
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..50 {
            assert_eq!(apply_capitalization("hello", 0, &mut rng), "hello");
        }
    }

    #[test]
    fn full_frequency_always_capitalizes() {
        let mut rng = SmallRng::seed_from_u64(42);
        assert_eq!(apply_capitalization("hello", 100, &mut rng), "Hello");
        assert_eq!(apply_capitalization("", 100, &mut rng), "");
    }

    #[test]
    fn frequency_above_hundred_is_clamped() {
        let mut rng = SmallRng::seed_from_u64(9);
        assert_eq!(apply_capitalization("world", 250, &mut rng), "World");
    }

    #[test]
    fn partial_frequency_mixes() {
        let mut capitalized = 0;
        for seed in 0..200 {
            let mut rng = SmallRng::seed_from_u64(seed);
            if apply_capitalization("word", 50, &mut rng) == "Word" {
                capitalized += 1;
            }
        }
        assert!(
            (50..150).contains(&capitalized),
            "expected roughly half capitalized, got {capitalized}"
        );
    }
}
