use rand::rngs::StdRng;
use rand::SeedableRng;
use statrs::distribution::Normal;

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// `n` reproducible draws from Normal(mean, sd).
///
/// # Panics
/// Panics if `sd` is not positive.
pub fn normal_sample(seed: u64, mean: f64, sd: f64, n: usize) -> Vec<f64> {
    use rand::distributions::Distribution;

    let dist = Normal::new(mean, sd).expect("valid normal parameters");
    let mut rng = seeded_rng(seed);
    (0..n).map(|_| dist.sample(&mut rng)).collect()
}
