use super::*;
use crate::foundation::rng::Rng64;

#[test]
fn default_pool_has_no_duplicates() {
    let s = CharSampler::default();
    let rebuilt = CharSampler::new(DEFAULT_CHARSET).unwrap();
    assert_eq!(s.len(), rebuilt.len());
    assert!(s.contains('A'));
    assert!(s.contains('?'));
}

#[test]
fn rejects_degenerate_pools() {
    assert!(CharSampler::new("").is_err());
    assert!(CharSampler::new("aaaa").is_err());
    assert!(CharSampler::new("ab").is_ok());
}

#[test]
fn sample_other_never_repeats_current() {
    let s = CharSampler::new("xyz").unwrap();
    let mut rng = Rng64::new(1);
    for _ in 0..500 {
        for cur in ['x', 'y', 'z'] {
            assert_ne!(s.sample_other(&mut rng, cur), cur);
        }
    }
}

#[test]
fn sample_other_reaches_every_other_char() {
    let s = CharSampler::new("ab").unwrap();
    let mut rng = Rng64::new(2);
    for _ in 0..20 {
        assert_eq!(s.sample_other(&mut rng, 'a'), 'b');
    }
}

#[test]
fn sample_other_with_foreign_current_samples_pool() {
    let s = CharSampler::new("ab").unwrap();
    let mut rng = Rng64::new(3);
    let c = s.sample_other(&mut rng, 'H');
    assert!(s.contains(c));
}
