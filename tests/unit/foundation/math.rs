use super::*;

#[test]
fn rng_is_deterministic() {
    let mut a = Rng64::new(123);
    let mut b = Rng64::new(123);
    for _ in 0..10 {
        assert_eq!(a.next_u64(), b.next_u64());
    }
}

#[test]
fn range_and_index_stay_in_bounds() {
    let mut rng = Rng64::new(7);
    for _ in 0..1000 {
        let v = rng.range(-0.6, 0.6);
        assert!((-0.6..0.6).contains(&v));
        assert!(rng.index(3) < 3);
    }
}

#[test]
fn mount_seed_depends_on_slug_and_time() {
    assert_eq!(mount_seed("particle", 1.0), mount_seed("particle", 1.0));
    assert_ne!(mount_seed("particle", 1.0), mount_seed("particle", 2.0));
    assert_ne!(mount_seed("particle", 1.0), mount_seed("solar-system", 1.0));
}

#[test]
fn cell_phase_is_stable_and_bounded() {
    let p = cell_phase(9, 3, 4);
    assert_eq!(p, cell_phase(9, 3, 4));
    assert!((0.0..std::f64::consts::TAU).contains(&p));
}
