use crate::foundation::math::{fade, lerp};
use crate::foundation::rng::Rng64;

const LEHMER_MOD: u64 = 2_147_483_647;
const LEHMER_MUL: u64 = 16_807;

/// Seeded 2-D gradient noise.
///
/// Continuous everywhere (including across integer lattice lines), repeatable for a given seed,
/// and bounded to `[-1, 1]`. Lattice points evaluate to exactly zero.
#[derive(Clone)]
pub struct Noise2D {
    perm: [u8; 512],
}

impl std::fmt::Debug for Noise2D {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Noise2D")
            .field("perm", &&self.perm[..8])
            .finish_non_exhaustive()
    }
}

impl Noise2D {
    /// Permutation from a Lehmer (Park-Miller) shuffle of `0..256`, doubled to 512 entries.
    pub fn new(seed: u64) -> Self {
        let mut table = [0u8; 256];
        for (i, v) in table.iter_mut().enumerate() {
            *v = i as u8;
        }
        // Lehmer state must be in 1..LEHMER_MOD.
        let mut state = seed % (LEHMER_MOD - 1) + 1;
        for i in (1..256u64).rev() {
            state = state * LEHMER_MUL % LEHMER_MOD;
            let j = (state * (i + 1) / LEHMER_MOD) as usize;
            table.swap(i as usize, j);
        }

        let mut perm = [0u8; 512];
        perm[..256].copy_from_slice(&table);
        perm[256..].copy_from_slice(&table);
        Self { perm }
    }

    pub fn from_entropy() -> Self {
        Self::new(Rng64::from_entropy().next_u64())
    }

    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let x0 = x.floor();
        let y0 = y.floor();
        let xi = (x0 as i64 & 255) as usize;
        let yi = (y0 as i64 & 255) as usize;
        let xf = x - x0;
        let yf = y - y0;

        let u = fade(xf);
        let v = fade(yf);

        let p = &self.perm;
        let aa = p[p[xi] as usize + yi];
        let ab = p[p[xi] as usize + yi + 1];
        let ba = p[p[xi + 1] as usize + yi];
        let bb = p[p[xi + 1] as usize + yi + 1];

        let x1 = lerp(grad(aa, xf, yf), grad(ba, xf - 1.0, yf), u);
        let x2 = lerp(grad(ab, xf, yf - 1.0), grad(bb, xf - 1.0, yf - 1.0), u);
        lerp(x1, x2, v)
    }
}

/// Dot product with one of the four diagonal gradients.
fn grad(hash: u8, x: f64, y: f64) -> f64 {
    let h = hash & 3;
    let (u, v) = if h < 2 { (x, y) } else { (y, x) };
    let u = if h & 1 == 0 { u } else { -u };
    let v = if h & 2 == 0 { v } else { -v };
    u + v
}

#[cfg(test)]
#[path = "../../tests/unit/wave/noise.rs"]
mod tests;
