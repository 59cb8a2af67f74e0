//! Preliminary surface estimation for the aquifer.
//!
//! The aquifer needs a rough idea of where the terrain surface is around each
//! of its lattice centers long before the chunk's blocks exist. The estimate
//! scans cell tops of the initial density (without jaggedness) from the top of
//! the world down, and is memoized per quart column for the whole session.

use rustc_hash::FxHashMap;

use super::chunk_density_function::{SampleOptions, biome_coords, chunk_pos};
use super::component::chunk_noise_router::ChunkNoiseRouter;
use super::density_function::UnblendedNoisePos;
use super::settings::NoiseSettings;

/// Added to the initial density before it is clamped and slid.
const DENSITY_BIAS: f64 = -0.703_125;
/// A slid density above this counts as solid ground.
const SURFACE_THRESHOLD: f64 = 0.390_625;
/// Returned when a column has no solid cell at all.
pub const NO_SURFACE: i32 = i32::MAX;

/// Memoized preliminary surface levels of one session.
pub struct SurfaceHeightEstimator {
    cache: FxHashMap<u64, i32>,
    settings: NoiseSettings,
}

impl SurfaceHeightEstimator {
    #[must_use]
    pub fn new(settings: NoiseSettings) -> Self {
        Self {
            cache: FxHashMap::default(),
            settings,
        }
    }

    /// Estimated surface Y of the quart column containing block `(x, z)`.
    pub fn estimate_height(&mut self, router: &mut ChunkNoiseRouter, x: i32, z: i32) -> i32 {
        let quart_x = biome_coords::from_block(x);
        let quart_z = biome_coords::from_block(z);
        let key = chunk_pos::packed(quart_x, quart_z);
        if let Some(&height) = self.cache.get(&key) {
            return height;
        }

        let height = self.scan(
            router,
            biome_coords::to_block(quart_x),
            biome_coords::to_block(quart_z),
        );
        self.cache.insert(key, height);
        height
    }

    /// Number of memoized columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    fn scan(&self, router: &mut ChunkNoiseRouter, x: i32, z: i32) -> i32 {
        let options = SampleOptions::foreign();
        let min_cell_y = self.settings.min_cell_y();
        let cell_height = self.settings.cell_height();

        for cell_y in (min_cell_y..=min_cell_y + self.settings.cell_count_y()).rev() {
            let y = cell_y * cell_height;
            let pos = UnblendedNoisePos::new(x, y, z);
            let density = router.initial_density_without_jaggedness(&pos, &options) + DENSITY_BIAS;
            let density = self
                .settings
                .apply_slide(density.clamp(-64.0, 64.0), f64::from(y));
            if density > SURFACE_THRESHOLD {
                return y;
            }
        }
        NO_SURFACE
    }
}
