use super::*;

struct Fixed(f64);

impl RandomSource for Fixed {
    fn next_f64(&mut self) -> f64 {
        self.0
    }
}

#[test]
fn rng_is_deterministic() {
    let mut a = Rng64::new(123);
    let mut b = Rng64::new(123);
    for _ in 0..10 {
        assert_eq!(a.next_u64(), b.next_u64());
    }
}

#[test]
fn samples_stay_in_unit_interval() {
    let mut rng = Rng64::new(9);
    for _ in 0..10_000 {
        let v = rng.next_f64();
        assert!((0.0..1.0).contains(&v));
    }
}

#[test]
fn next_index_never_reaches_len() {
    let mut hi = Fixed(0.999_999_999_999);
    assert_eq!(hi.next_index(5), 4);
    let mut lo = Fixed(0.0);
    assert_eq!(lo.next_index(5), 0);
}

#[test]
fn chance_is_strictly_below() {
    let mut r = Fixed(0.02);
    assert!(!r.chance(0.02));
    assert!(r.chance(0.021));
}

#[test]
fn boxed_and_borrowed_sources_forward() {
    let mut boxed: Box<dyn RandomSource> = Box::new(Fixed(0.25));
    assert_eq!(boxed.next_f64(), 0.25);
    let mut inner = Fixed(0.75);
    let mut borrowed = &mut inner;
    assert_eq!(RandomSource::next_index(&mut borrowed, 4), 3);
}

#[test]
fn seed_or_entropy_honours_seed() {
    let mut a = Rng64::from_seed_or_entropy(Some(5));
    let mut b = Rng64::new(5);
    assert_eq!(a.next_u64(), b.next_u64());
}
