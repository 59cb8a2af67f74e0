//! The per-chunk session stack.
//!
//! [`ChunkNoiseRouter::generate`] maps a [`ProtoNoiseRouter`] stack entry for
//! entry into [`ChunkNoiseFunctionComponent`]s. Stateless entries are borrowed
//! from the proto stack; every wrapper becomes its own cache or interpolator,
//! created exactly once for the session, so a sub-graph shared by several
//! named outputs shares its memoized state too.
//!
//! | Variant | Holds |
//! |---------|-------|
//! | [`Independent`](ChunkNoiseFunctionComponent::Independent) | borrowed leaf (constant, noise, gradient) |
//! | [`Dependent`](ChunkNoiseFunctionComponent::Dependent) | borrowed combinator reading earlier entries |
//! | [`Chunk`](ChunkNoiseFunctionComponent::Chunk) | owned cache or interpolator |
//! | [`PassThrough`](ChunkNoiseFunctionComponent::PassThrough) | forwarder with its own bounds |

use enum_dispatch::enum_dispatch;

use super::base_noise_router::WrapperType;
use super::proto_noise_router::{
    DependentProtoNoiseFunctionComponent, IndependentProtoNoiseFunctionComponent,
    ProtoNoiseFunctionComponent, ProtoNoiseRouter,
};
use crate::noise_router::chunk_density_function::{
    Cache2D, CacheOnce, CellCache, ChunkNoiseFunctionBuilderOptions,
    ChunkSpecificNoiseFunctionComponent, DensityInterpolator, FlatCache, SampleOptions,
};
use crate::noise_router::density_function::{
    IndexToNoisePos, NoiseFunctionComponentRange, NoisePos, PassThrough,
    StaticIndependentChunkNoiseFunctionComponentImpl,
};

#[enum_dispatch]
pub trait StaticChunkNoiseFunctionComponentImpl {
    fn sample(
        &self,
        component_stack: &mut [ChunkNoiseFunctionComponent],
        pos: &impl NoisePos,
        sample_options: &SampleOptions,
    ) -> f64;

    fn fill(
        &self,
        component_stack: &mut [ChunkNoiseFunctionComponent],
        array: &mut [f64],
        mapper: &impl IndexToNoisePos,
        sample_options: &mut SampleOptions,
    ) {
        array.iter_mut().enumerate().for_each(|(index, value)| {
            let pos = mapper.at(index, Some(sample_options));
            *value = self.sample(component_stack, &pos, sample_options);
        });
    }
}

#[enum_dispatch]
pub trait MutableChunkNoiseFunctionComponentImpl {
    fn sample(
        &mut self,
        component_stack: &mut [ChunkNoiseFunctionComponent],
        pos: &impl NoisePos,
        sample_options: &SampleOptions,
    ) -> f64;

    fn fill(
        &mut self,
        component_stack: &mut [ChunkNoiseFunctionComponent],
        array: &mut [f64],
        mapper: &impl IndexToNoisePos,
        sample_options: &mut SampleOptions,
    ) {
        array.iter_mut().enumerate().for_each(|(index, value)| {
            let pos = mapper.at(index, Some(sample_options));
            *value = self.sample(component_stack, &pos, sample_options);
        });
    }
}

/// One entry of a session stack.
pub enum ChunkNoiseFunctionComponent<'a> {
    Independent(&'a IndependentProtoNoiseFunctionComponent),
    Dependent(&'a DependentProtoNoiseFunctionComponent),
    Chunk(ChunkSpecificNoiseFunctionComponent),
    PassThrough(PassThrough),
}

impl NoiseFunctionComponentRange for ChunkNoiseFunctionComponent<'_> {
    #[inline]
    fn min(&self) -> f64 {
        match self {
            Self::Independent(independent) => independent.min(),
            Self::Dependent(dependent) => dependent.min(),
            Self::Chunk(chunk) => chunk.min(),
            Self::PassThrough(pass_through) => pass_through.min(),
        }
    }

    #[inline]
    fn max(&self) -> f64 {
        match self {
            Self::Independent(independent) => independent.max(),
            Self::Dependent(dependent) => dependent.max(),
            Self::Chunk(chunk) => chunk.max(),
            Self::PassThrough(pass_through) => pass_through.max(),
        }
    }
}

impl MutableChunkNoiseFunctionComponentImpl for ChunkNoiseFunctionComponent<'_> {
    #[inline]
    fn sample(
        &mut self,
        component_stack: &mut [ChunkNoiseFunctionComponent],
        pos: &impl NoisePos,
        sample_options: &SampleOptions,
    ) -> f64 {
        match self {
            Self::Independent(independent) => independent.sample(pos),
            Self::Dependent(dependent) => dependent.sample(component_stack, pos, sample_options),
            Self::Chunk(chunk) => chunk.sample(component_stack, pos, sample_options),
            Self::PassThrough(pass_through) => ChunkNoiseFunctionComponent::sample_from_stack(
                &mut component_stack[..=pass_through.input_index()],
                pos,
                sample_options,
            ),
        }
    }

    #[inline]
    fn fill(
        &mut self,
        component_stack: &mut [ChunkNoiseFunctionComponent],
        array: &mut [f64],
        mapper: &impl IndexToNoisePos,
        sample_options: &mut SampleOptions,
    ) {
        match self {
            Self::Independent(independent) => independent.fill(array, mapper),
            Self::Dependent(dependent) => {
                dependent.fill(component_stack, array, mapper, sample_options);
            }
            Self::Chunk(chunk) => chunk.fill(component_stack, array, mapper, sample_options),
            Self::PassThrough(pass_through) => ChunkNoiseFunctionComponent::fill_from_stack(
                &mut component_stack[..=pass_through.input_index()],
                array,
                mapper,
                sample_options,
            ),
        }
    }
}

impl ChunkNoiseFunctionComponent<'_> {
    /// Samples the last entry of `component_stack`, which may read any entry
    /// before it.
    ///
    /// # Panics
    ///
    /// Panics if `component_stack` is empty.
    pub fn sample_from_stack(
        component_stack: &mut [ChunkNoiseFunctionComponent],
        pos: &impl NoisePos,
        sample_options: &SampleOptions,
    ) -> f64 {
        let Some((top, rest)) = component_stack.split_last_mut() else {
            unreachable!("sampled an empty component stack");
        };
        top.sample(rest, pos, sample_options)
    }

    /// Fills `array` from the last entry of `component_stack`.
    ///
    /// # Panics
    ///
    /// Panics if `component_stack` is empty.
    pub fn fill_from_stack(
        component_stack: &mut [ChunkNoiseFunctionComponent],
        array: &mut [f64],
        mapper: &impl IndexToNoisePos,
        sample_options: &mut SampleOptions,
    ) {
        let Some((top, rest)) = component_stack.split_last_mut() else {
            unreachable!("filled from an empty component stack");
        };
        top.fill(rest, array, mapper, sample_options);
    }

    #[inline]
    fn as_interpolator(&mut self) -> Option<&mut DensityInterpolator> {
        match self {
            Self::Chunk(ChunkSpecificNoiseFunctionComponent::DensityInterpolator(interpolator)) => {
                Some(interpolator)
            }
            _ => None,
        }
    }
}

macro_rules! sample_function {
    ($($name:ident),* $(,)?) => {
        $(
            #[inline]
            pub fn $name(&mut self, pos: &impl NoisePos, sample_options: &SampleOptions) -> f64 {
                ChunkNoiseFunctionComponent::sample_from_stack(
                    &mut self.component_stack[..=self.$name],
                    pos,
                    sample_options,
                )
            }
        )*
    };
}

/// A session's component stack with the indices of its named outputs.
pub struct ChunkNoiseRouter<'a> {
    barrier_noise: usize,
    fluid_level_floodedness_noise: usize,
    fluid_level_spread_noise: usize,
    lava_noise: usize,
    temperature: usize,
    vegetation: usize,
    continents: usize,
    erosion: usize,
    depth: usize,
    ridges: usize,
    initial_density_without_jaggedness: usize,
    final_density: usize,
    vein_toggle: usize,
    vein_ridged: usize,
    vein_gap: usize,
    component_stack: Box<[ChunkNoiseFunctionComponent<'a>]>,
    interpolator_indices: Box<[usize]>,
    cell_cache_indices: Box<[usize]>,
}

impl ChunkNoiseRouter<'_> {
    sample_function!(
        barrier_noise,
        fluid_level_floodedness_noise,
        fluid_level_spread_noise,
        lava_noise,
        temperature,
        vegetation,
        continents,
        erosion,
        depth,
        ridges,
        initial_density_without_jaggedness,
        final_density,
        vein_toggle,
        vein_ridged,
        vein_gap,
    );
}

impl<'a> ChunkNoiseRouter<'a> {
    /// Builds the session stack for one chunk (or one column).
    ///
    /// Flat caches are filled here, so the entries they read must already be
    /// on the stack; stack order guarantees that.
    #[must_use]
    pub fn generate(base: &'a ProtoNoiseRouter, options: &ChunkNoiseFunctionBuilderOptions) -> Self {
        let mut component_stack =
            Vec::<ChunkNoiseFunctionComponent>::with_capacity(base.full_component_stack.len());
        let mut interpolator_indices = Vec::new();
        let mut cell_cache_indices = Vec::new();

        for (index, proto) in base.full_component_stack.iter().enumerate() {
            let component = match proto {
                ProtoNoiseFunctionComponent::Independent(independent) => {
                    ChunkNoiseFunctionComponent::Independent(independent)
                }
                ProtoNoiseFunctionComponent::Dependent(dependent) => {
                    ChunkNoiseFunctionComponent::Dependent(dependent)
                }
                ProtoNoiseFunctionComponent::PassThrough(pass_through) => {
                    ChunkNoiseFunctionComponent::PassThrough(*pass_through)
                }
                ProtoNoiseFunctionComponent::Wrapper(wrapper) => {
                    // Wrappers report the bounds of what they wrap.
                    let min_value = component_stack[wrapper.input_index].min();
                    let max_value = component_stack[wrapper.input_index].max();
                    let input = wrapper.input_index;

                    let chunk = match wrapper.wrapper_type {
                        WrapperType::Interpolated => {
                            interpolator_indices.push(index);
                            ChunkSpecificNoiseFunctionComponent::DensityInterpolator(
                                DensityInterpolator::new(input, min_value, max_value, options),
                            )
                        }
                        WrapperType::CellCache => {
                            cell_cache_indices.push(index);
                            ChunkSpecificNoiseFunctionComponent::CellCache(CellCache::new(
                                input, min_value, max_value, options,
                            ))
                        }
                        WrapperType::CacheOnce => ChunkSpecificNoiseFunctionComponent::CacheOnce(
                            CacheOnce::new(input, min_value, max_value),
                        ),
                        WrapperType::Cache2D => ChunkSpecificNoiseFunctionComponent::Cache2D(
                            Cache2D::new(input, min_value, max_value),
                        ),
                        WrapperType::CacheFlat => {
                            let mut flat_cache = FlatCache::new(input, min_value, max_value, options);
                            flat_cache.prefill(&mut component_stack);
                            ChunkSpecificNoiseFunctionComponent::FlatCache(flat_cache)
                        }
                    };
                    ChunkNoiseFunctionComponent::Chunk(chunk)
                }
            };
            component_stack.push(component);
        }

        log::trace!(
            "session stack: {} entries, {} interpolators, {} cell caches",
            component_stack.len(),
            interpolator_indices.len(),
            cell_cache_indices.len()
        );

        Self {
            barrier_noise: base.barrier_noise,
            fluid_level_floodedness_noise: base.fluid_level_floodedness_noise,
            fluid_level_spread_noise: base.fluid_level_spread_noise,
            lava_noise: base.lava_noise,
            temperature: base.temperature,
            vegetation: base.vegetation,
            continents: base.continents,
            erosion: base.erosion,
            depth: base.depth,
            ridges: base.ridges,
            initial_density_without_jaggedness: base.initial_density_without_jaggedness,
            final_density: base.final_density,
            vein_toggle: base.vein_toggle,
            vein_ridged: base.vein_ridged,
            vein_gap: base.vein_gap,
            component_stack: component_stack.into_boxed_slice(),
            interpolator_indices: interpolator_indices.into_boxed_slice(),
            cell_cache_indices: cell_cache_indices.into_boxed_slice(),
        }
    }

    /// Number of entries in the session stack.
    #[must_use]
    pub fn len(&self) -> usize {
        self.component_stack.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.component_stack.is_empty()
    }

    /// Samples an arbitrary stack entry.
    pub fn sample_index(
        &mut self,
        index: usize,
        pos: &impl NoisePos,
        sample_options: &SampleOptions,
    ) -> f64 {
        ChunkNoiseFunctionComponent::sample_from_stack(
            &mut self.component_stack[..=index],
            pos,
            sample_options,
        )
    }

    /// Declared `(min, max)` of a stack entry.
    #[must_use]
    pub fn bounds(&self, index: usize) -> (f64, f64) {
        let component = &self.component_stack[index];
        (component.min(), component.max())
    }

    /// Fills every cell cache for the selected cell, in stack order.
    pub fn fill_cell_caches(
        &mut self,
        mapper: &impl IndexToNoisePos,
        sample_options: &mut SampleOptions,
    ) {
        for &index in &self.cell_cache_indices {
            let (below, rest) = self.component_stack.split_at_mut(index);
            if let Some(ChunkNoiseFunctionComponent::Chunk(
                ChunkSpecificNoiseFunctionComponent::CellCache(cell_cache),
            )) = rest.first_mut()
            {
                ChunkNoiseFunctionComponent::fill_from_stack(
                    &mut below[..=cell_cache.input_index],
                    &mut cell_cache.cache,
                    mapper,
                    sample_options,
                );
            }
        }
    }

    /// Samples every interpolator's input along the corner column at `cell_z`
    /// into the start or end slice.
    pub fn fill_interpolator_buffers(
        &mut self,
        start: bool,
        cell_z: usize,
        mapper: &impl IndexToNoisePos,
        sample_options: &mut SampleOptions,
    ) {
        for &index in &self.interpolator_indices {
            let (below, rest) = self.component_stack.split_at_mut(index);
            if let Some(interpolator) = rest
                .first_mut()
                .and_then(ChunkNoiseFunctionComponent::as_interpolator)
            {
                let input_index = interpolator.input_index;
                ChunkNoiseFunctionComponent::fill_from_stack(
                    &mut below[..=input_index],
                    interpolator.column_mut(start, cell_z),
                    mapper,
                    sample_options,
                );
            }
        }
    }

    fn for_each_interpolator(&mut self, mut f: impl FnMut(&mut DensityInterpolator)) {
        for &index in &self.interpolator_indices {
            if let Some(interpolator) = self.component_stack[index].as_interpolator() {
                f(interpolator);
            }
        }
    }

    /// Loads the eight corners of cell `(cell_y, cell_z)` of the current slice
    /// pair into every interpolator.
    pub fn on_sampled_cell_corners(&mut self, cell_y: usize, cell_z: usize) {
        self.for_each_interpolator(|interpolator| interpolator.select_cell(cell_y, cell_z));
    }

    pub fn interpolate_y(&mut self, delta: f64) {
        self.for_each_interpolator(|interpolator| interpolator.interpolate_y(delta));
    }

    pub fn interpolate_x(&mut self, delta: f64) {
        self.for_each_interpolator(|interpolator| interpolator.interpolate_x(delta));
    }

    pub fn interpolate_z(&mut self, delta: f64) {
        self.for_each_interpolator(|interpolator| interpolator.interpolate_z(delta));
    }

    /// Makes the end slice the start slice of the next X cell.
    pub fn swap_buffers(&mut self) {
        self.for_each_interpolator(DensityInterpolator::swap_slices);
    }
}
