use crate::api::Pos;

/// Wraps a signed coordinate onto `0..len`.
#[inline(always)]
pub fn wrap_coord(value: isize, len: usize) -> usize {
    value.rem_euclid(len as isize) as usize
}

/// Shortest distance between two coordinates on a ring of `len` cells.
#[inline(always)]
pub fn torus_delta(a: usize, b: usize, len: usize) -> usize {
    let d = a.abs_diff(b);
    d.min(len - d)
}

/// Squared Euclidean distance on a `width` x `height` torus.
/// Kept integral so equal distances compare equal.
#[inline(always)]
pub fn torus_distance_sq(a: Pos, b: Pos, width: usize, height: usize) -> usize {
    let dx = torus_delta(a.x, b.x, width);
    let dy = torus_delta(a.y, b.y, height);
    dx * dx + dy * dy
}

/// Euclidean distance on a `width` x `height` torus.
pub fn torus_distance(a: Pos, b: Pos, width: usize, height: usize) -> f64 {
    (torus_distance_sq(a, b, width, height) as f64).sqrt()
}

/// Shannon entropy (natural log) of the empirical distribution given by
/// occupancy counts. Zero counts are ignored; an empty input has entropy 0.
pub fn shannon_entropy<I>(counts: I) -> f64
where
    I: IntoIterator<Item = usize>,
{
    let counts: Vec<usize> = counts.into_iter().filter(|&c| c > 0).collect();
    let total: usize = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    -counts
        .iter()
        .map(|&c| {
            let p = c as f64 / total;
            p * p.ln()
        })
        .sum::<f64>()
}
