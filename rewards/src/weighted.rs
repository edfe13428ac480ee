use rand::Rng;

/// Order candidates by weighted random draw, heaviest-favored first.
/// Uses one exponential key per entry, so a single pass gives a full
/// preference order instead of just one winner. Entries with zero or
/// negative weight always sort last.
pub fn weighted_order<T, R: Rng + ?Sized>(rng: &mut R, entries: Vec<(f32, T)>) -> Vec<T> {
    let mut keyed: Vec<(f64, T)> = entries
        .into_iter()
        .map(|(weight, value)| {
            let key = if weight > 0.0 {
                // ln of a uniform draw is negative; dividing by the
                // weight pulls heavy entries toward zero.
                rng.random_range(f64::MIN_POSITIVE..1.0).ln() / weight as f64
            } else {
                f64::NEG_INFINITY
            };
            (key, value)
        })
        .collect();
    keyed.sort_by(|a, b| b.0.total_cmp(&a.0));
    keyed.into_iter().map(|(_, value)| value).collect()
}
