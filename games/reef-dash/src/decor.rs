use reef_engine::Rng;

/// Order in which `count` decorative nodes play their idle animation.
/// A permutation of `0..count`, fixed by `seed`.
pub fn animation_order(seed: u64, count: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..count).collect();
    Rng::new(seed).shuffle(&mut order);
    order
}
