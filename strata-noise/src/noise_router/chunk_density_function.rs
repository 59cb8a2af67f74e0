//! Per-session caches and the cell interpolator.
//!
//! Every wrapper in a proto stack becomes one of the components here when a
//! chunk session is built. They are the only stateful parts of a density
//! graph, and they all key their state on the [`SampleOptions`] threaded
//! through every sample call:
//!
//! - [`SampleContext`] says whether a query comes from the session's own sweep
//!   cursor or from a foreign single point. Wrappers that depend on sweep order
//!   fall back to evaluating their input for foreign queries.
//! - [`Generation`] holds the session's point and array stamps. A cached value
//!   is reused only while its stamp matches the current one.

// Uses in-cell coordinate names (in_cell_x, in_cell_y, in_cell_z)
#![allow(clippy::similar_names)]

use std::cell::RefCell;
use std::mem;

use enum_dispatch::enum_dispatch;

use super::component::chunk_noise_router::{
    ChunkNoiseFunctionComponent, MutableChunkNoiseFunctionComponentImpl,
};
use super::density_function::{
    IndexToNoisePos, NoiseFunctionComponentRange, NoisePos, UnblendedNoisePos,
};
use crate::math::{lerp, lerp3};

thread_local! {
    static F64_BUFFER_POOL: RefCell<Vec<Vec<f64>>> = const {
        RefCell::new(Vec::new())
    };
}

#[inline]
fn take_buffer(len: usize) -> Box<[f64]> {
    F64_BUFFER_POOL.with(|pool| match pool.borrow_mut().pop() {
        Some(mut buf) => {
            buf.clear();
            buf.resize(len, 0.0);
            buf.into_boxed_slice()
        }
        None => vec![0.0; len].into_boxed_slice(),
    })
}

#[inline]
fn recycle_buffer(buf: &mut Box<[f64]>) {
    let buf = mem::take(buf);
    if !buf.is_empty() {
        F64_BUFFER_POOL.with(|pool| pool.borrow_mut().push(Vec::from(buf)));
    }
}

/// Quart (4-block) coordinate conversions.
pub mod biome_coords {
    #[inline]
    #[must_use]
    pub const fn from_block(coord: i32) -> i32 {
        coord >> 2
    }

    #[inline]
    #[must_use]
    pub const fn to_block(coord: i32) -> i32 {
        coord << 2
    }
}

/// Packed column keys.
pub mod chunk_pos {
    /// A column no real query lands on.
    pub const MARKER: u64 = packed(1_875_016, 1_875_016);

    #[inline]
    #[must_use]
    pub const fn packed(x: i32, z: i32) -> u64 {
        (x as u32 as u64) | ((z as u32 as u64) << 32)
    }
}

/// The sweep cursor's position inside the current interpolation cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellCursor {
    pub in_cell_x: usize,
    pub in_cell_y: usize,
    pub in_cell_z: usize,
    cell_width: usize,
    cell_height: usize,
}

impl CellCursor {
    #[must_use]
    pub const fn new(cell_width: usize, cell_height: usize) -> Self {
        Self {
            in_cell_x: 0,
            in_cell_y: 0,
            in_cell_z: 0,
            cell_width,
            cell_height,
        }
    }

    #[inline]
    pub fn set(&mut self, in_cell_x: usize, in_cell_y: usize, in_cell_z: usize) {
        self.in_cell_x = in_cell_x;
        self.in_cell_y = in_cell_y;
        self.in_cell_z = in_cell_z;
    }

    #[inline]
    #[must_use]
    pub const fn cell_width(&self) -> usize {
        self.cell_width
    }

    #[inline]
    #[must_use]
    pub const fn cell_height(&self) -> usize {
        self.cell_height
    }

    /// Index of the cursor in a cell array filled top layer first.
    #[inline]
    #[must_use]
    pub const fn cell_index(&self) -> Option<usize> {
        if self.in_cell_x < self.cell_width
            && self.in_cell_y < self.cell_height
            && self.in_cell_z < self.cell_width
        {
            Some(
                ((self.cell_height - 1 - self.in_cell_y) * self.cell_width + self.in_cell_x)
                    * self.cell_width
                    + self.in_cell_z,
            )
        } else {
            None
        }
    }

    #[inline]
    fn deltas(&self) -> (f64, f64, f64) {
        (
            self.in_cell_x as f64 / self.cell_width as f64,
            self.in_cell_y as f64 / self.cell_height as f64,
            self.in_cell_z as f64 / self.cell_width as f64,
        )
    }
}

/// Who is asking for a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleContext {
    /// A single point outside the sweep: aquifer lookups, flat-cache prefill,
    /// surface estimation, climate sampling.
    Foreign,
    /// The session's own sweep cursor.
    Cursor(CellCursor),
}

/// The session's cache stamps.
///
/// `point` advances once per swept block and once per slice-fill entry.
/// `array` advances around every whole-array fill. Neither is ever reset
/// within a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Generation {
    pub point: u64,
    pub array: u64,
}

impl Generation {
    #[inline]
    pub fn advance_point(&mut self) {
        self.point += 1;
    }

    #[inline]
    pub fn advance_array(&mut self) {
        self.array += 1;
    }
}

/// Everything a sample call needs besides the position.
#[derive(Clone, Copy, Debug)]
pub struct SampleOptions {
    /// Set while cell caches are being filled for a freshly selected cell.
    pub populating_caches: bool,
    pub context: SampleContext,
    pub generation: Generation,
    /// Entry of the array currently being filled.
    pub fill_index: usize,
}

impl SampleOptions {
    #[must_use]
    pub const fn new(
        populating_caches: bool,
        context: SampleContext,
        generation: Generation,
        fill_index: usize,
    ) -> Self {
        Self {
            populating_caches,
            context,
            generation,
            fill_index,
        }
    }

    /// Options for a single point outside the sweep.
    #[must_use]
    pub const fn foreign() -> Self {
        Self {
            populating_caches: false,
            context: SampleContext::Foreign,
            generation: Generation { point: 0, array: 0 },
            fill_index: 0,
        }
    }

    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> Option<&CellCursor> {
        match &self.context {
            SampleContext::Cursor(cursor) => Some(cursor),
            SampleContext::Foreign => None,
        }
    }
}

/// Shape of the chunk a session covers.
#[derive(Clone, Copy, Debug)]
pub struct ChunkNoiseFunctionBuilderOptions {
    pub cell_width: usize,
    pub cell_height: usize,
    pub cell_count_y: usize,
    pub cell_count_xz: usize,
    pub start_biome_x: i32,
    pub start_biome_z: i32,
    /// Quart extent of the chunk; flat caches hold `(biome_size_xz + 1)^2` entries.
    pub biome_size_xz: usize,
}

impl ChunkNoiseFunctionBuilderOptions {
    #[must_use]
    pub const fn new(
        cell_width: usize,
        cell_height: usize,
        cell_count_y: usize,
        cell_count_xz: usize,
        start_biome_x: i32,
        start_biome_z: i32,
        biome_size_xz: usize,
    ) -> Self {
        Self {
            cell_width,
            cell_height,
            cell_count_y,
            cell_count_xz,
            start_biome_x,
            start_biome_z,
            biome_size_xz,
        }
    }
}

/// Samples its input only at cell corners and reconstructs the values in
/// between.
///
/// Corner samples for two X slices are kept, each laid out `z * (cell_count_y
/// + 1) + y`. Inside the sweep the value is blended one axis at a time as the
/// cursor moves (Y, then X, then Z). While a cell is being populated it is
/// interpolated in one step from the cursor offsets, and foreign queries
/// evaluate the input directly.
pub struct DensityInterpolator {
    pub(crate) input_index: usize,
    pub(crate) start_slice: Box<[f64]>,
    pub(crate) end_slice: Box<[f64]>,
    /// Corners of the selected cell, indexed `x << 2 | y << 1 | z`.
    corners: [f64; 8],
    /// Y-blended edges, indexed `x << 1 | z`.
    edges: [f64; 4],
    /// X-blended pair, indexed by `z`.
    sides: [f64; 2],
    value: f64,
    pub(crate) cell_count_y: usize,
    min_value: f64,
    max_value: f64,
}

impl NoiseFunctionComponentRange for DensityInterpolator {
    #[inline]
    fn min(&self) -> f64 {
        self.min_value
    }

    #[inline]
    fn max(&self) -> f64 {
        self.max_value
    }
}

impl DensityInterpolator {
    #[must_use]
    pub fn new(
        input_index: usize,
        min_value: f64,
        max_value: f64,
        options: &ChunkNoiseFunctionBuilderOptions,
    ) -> Self {
        let len = (options.cell_count_y + 1) * (options.cell_count_xz + 1);
        Self {
            input_index,
            start_slice: take_buffer(len),
            end_slice: take_buffer(len),
            corners: [0.0; 8],
            edges: [0.0; 4],
            sides: [0.0; 2],
            value: 0.0,
            cell_count_y: options.cell_count_y,
            min_value,
            max_value,
        }
    }

    #[inline]
    pub(crate) const fn slice_index(&self, cell_y: usize, cell_z: usize) -> usize {
        cell_z * (self.cell_count_y + 1) + cell_y
    }

    /// The column of corner samples at `cell_z` in one of the two slices.
    pub(crate) fn column_mut(&mut self, start: bool, cell_z: usize) -> &mut [f64] {
        let from = self.slice_index(0, cell_z);
        let to = from + self.cell_count_y + 1;
        if start {
            &mut self.start_slice[from..to]
        } else {
            &mut self.end_slice[from..to]
        }
    }

    pub(crate) fn select_cell(&mut self, cell_y: usize, cell_z: usize) {
        for dy in 0..2 {
            for dz in 0..2 {
                let index = self.slice_index(cell_y + dy, cell_z + dz);
                self.corners[dy << 1 | dz] = self.start_slice[index];
                self.corners[4 | dy << 1 | dz] = self.end_slice[index];
            }
        }
    }

    pub(crate) fn interpolate_y(&mut self, delta: f64) {
        let c = &self.corners;
        self.edges[0b00] = lerp(delta, c[0b000], c[0b010]);
        self.edges[0b10] = lerp(delta, c[0b100], c[0b110]);
        self.edges[0b01] = lerp(delta, c[0b001], c[0b011]);
        self.edges[0b11] = lerp(delta, c[0b101], c[0b111]);
    }

    #[inline]
    pub(crate) fn interpolate_x(&mut self, delta: f64) {
        self.sides[0] = lerp(delta, self.edges[0b00], self.edges[0b10]);
        self.sides[1] = lerp(delta, self.edges[0b01], self.edges[0b11]);
    }

    #[inline]
    pub(crate) fn interpolate_z(&mut self, delta: f64) {
        self.value = lerp(delta, self.sides[0], self.sides[1]);
    }

    #[inline]
    pub(crate) fn swap_slices(&mut self) {
        mem::swap(&mut self.start_slice, &mut self.end_slice);
    }

    #[inline]
    fn interpolate_at(&self, cursor: &CellCursor) -> f64 {
        let (dx, dy, dz) = cursor.deltas();
        let c = &self.corners;
        lerp3(
            dx, dy, dz, c[0b000], c[0b100], c[0b010], c[0b110], c[0b001], c[0b101], c[0b011],
            c[0b111],
        )
    }
}

impl Drop for DensityInterpolator {
    fn drop(&mut self) {
        recycle_buffer(&mut self.start_slice);
        recycle_buffer(&mut self.end_slice);
    }
}

impl MutableChunkNoiseFunctionComponentImpl for DensityInterpolator {
    fn sample(
        &mut self,
        component_stack: &mut [ChunkNoiseFunctionComponent],
        pos: &impl NoisePos,
        sample_options: &SampleOptions,
    ) -> f64 {
        match &sample_options.context {
            SampleContext::Cursor(cursor) if sample_options.populating_caches => {
                self.interpolate_at(cursor)
            }
            SampleContext::Cursor(_) => self.value,
            SampleContext::Foreign => ChunkNoiseFunctionComponent::sample_from_stack(
                &mut component_stack[..=self.input_index],
                pos,
                sample_options,
            ),
        }
    }

    fn fill(
        &mut self,
        component_stack: &mut [ChunkNoiseFunctionComponent],
        array: &mut [f64],
        mapper: &impl IndexToNoisePos,
        sample_options: &mut SampleOptions,
    ) {
        if sample_options.populating_caches {
            array.iter_mut().enumerate().for_each(|(index, value)| {
                let pos = mapper.at(index, Some(sample_options));
                *value = self.sample(component_stack, &pos, sample_options);
            });
        } else {
            ChunkNoiseFunctionComponent::fill_from_stack(
                &mut component_stack[..=self.input_index],
                array,
                mapper,
                sample_options,
            );
        }
    }
}

/// Quart-resolution grid over the chunk, filled once when the session is
/// built. Queries outside the grid evaluate the input.
pub struct FlatCache {
    pub(crate) input_index: usize,
    pub(crate) cache: Box<[f64]>,
    start_biome_x: i32,
    start_biome_z: i32,
    biome_size_xz: usize,
    min_value: f64,
    max_value: f64,
}

impl NoiseFunctionComponentRange for FlatCache {
    #[inline]
    fn min(&self) -> f64 {
        self.min_value
    }

    #[inline]
    fn max(&self) -> f64 {
        self.max_value
    }
}

impl FlatCache {
    #[must_use]
    pub fn new(
        input_index: usize,
        min_value: f64,
        max_value: f64,
        options: &ChunkNoiseFunctionBuilderOptions,
    ) -> Self {
        let side = options.biome_size_xz + 1;
        Self {
            input_index,
            cache: take_buffer(side * side),
            start_biome_x: options.start_biome_x,
            start_biome_z: options.start_biome_z,
            biome_size_xz: options.biome_size_xz,
            min_value,
            max_value,
        }
    }

    #[inline]
    #[must_use]
    pub const fn grid_index(&self, biome_x: usize, biome_z: usize) -> usize {
        biome_x * (self.biome_size_xz + 1) + biome_z
    }

    /// Evaluates the input at every grid point with foreign options.
    pub(crate) fn prefill(&mut self, component_stack: &mut [ChunkNoiseFunctionComponent]) {
        let options = SampleOptions::foreign();
        for biome_x in 0..=self.biome_size_xz {
            let block_x = biome_coords::to_block(self.start_biome_x + biome_x as i32);
            for biome_z in 0..=self.biome_size_xz {
                let block_z = biome_coords::to_block(self.start_biome_z + biome_z as i32);
                let pos = UnblendedNoisePos::new(block_x, 0, block_z);
                let index = self.grid_index(biome_x, biome_z);
                self.cache[index] = ChunkNoiseFunctionComponent::sample_from_stack(
                    &mut component_stack[..=self.input_index],
                    &pos,
                    &options,
                );
            }
        }
    }
}

impl Drop for FlatCache {
    fn drop(&mut self) {
        recycle_buffer(&mut self.cache);
    }
}

impl MutableChunkNoiseFunctionComponentImpl for FlatCache {
    fn sample(
        &mut self,
        component_stack: &mut [ChunkNoiseFunctionComponent],
        pos: &impl NoisePos,
        sample_options: &SampleOptions,
    ) -> f64 {
        let biome_x = biome_coords::from_block(pos.x()) - self.start_biome_x;
        let biome_z = biome_coords::from_block(pos.z()) - self.start_biome_z;
        let side = self.biome_size_xz as i32 + 1;

        if (0..side).contains(&biome_x) && (0..side).contains(&biome_z) {
            self.cache[self.grid_index(biome_x as usize, biome_z as usize)]
        } else {
            ChunkNoiseFunctionComponent::sample_from_stack(
                &mut component_stack[..=self.input_index],
                pos,
                sample_options,
            )
        }
    }
}

/// Remembers the last column it was asked about.
///
/// Only sound under the sweep's guarantee that repeated queries for one
/// column arrive back to back.
#[derive(Clone, Debug)]
pub struct Cache2D {
    pub(crate) input_index: usize,
    last_column: u64,
    last_value: f64,
    min_value: f64,
    max_value: f64,
}

impl NoiseFunctionComponentRange for Cache2D {
    #[inline]
    fn min(&self) -> f64 {
        self.min_value
    }

    #[inline]
    fn max(&self) -> f64 {
        self.max_value
    }
}

impl Cache2D {
    #[must_use]
    pub const fn new(input_index: usize, min_value: f64, max_value: f64) -> Self {
        Self {
            input_index,
            last_column: chunk_pos::MARKER,
            last_value: 0.0,
            min_value,
            max_value,
        }
    }
}

impl MutableChunkNoiseFunctionComponentImpl for Cache2D {
    fn sample(
        &mut self,
        component_stack: &mut [ChunkNoiseFunctionComponent],
        pos: &impl NoisePos,
        sample_options: &SampleOptions,
    ) -> f64 {
        let column = chunk_pos::packed(pos.x(), pos.z());
        if column == self.last_column {
            return self.last_value;
        }
        let value = ChunkNoiseFunctionComponent::sample_from_stack(
            &mut component_stack[..=self.input_index],
            pos,
            sample_options,
        );
        self.last_column = column;
        self.last_value = value;
        value
    }

    fn fill(
        &mut self,
        component_stack: &mut [ChunkNoiseFunctionComponent],
        array: &mut [f64],
        mapper: &impl IndexToNoisePos,
        sample_options: &mut SampleOptions,
    ) {
        ChunkNoiseFunctionComponent::fill_from_stack(
            &mut component_stack[..=self.input_index],
            array,
            mapper,
            sample_options,
        );
    }
}

/// Reuses the last value while the point stamp is unchanged, and the last
/// filled array while the array stamp is unchanged.
pub struct CacheOnce {
    pub(crate) input_index: usize,
    point_stamp: u64,
    array_stamp: u64,
    last_value: f64,
    last_array: Option<Box<[f64]>>,
    min_value: f64,
    max_value: f64,
}

impl NoiseFunctionComponentRange for CacheOnce {
    #[inline]
    fn min(&self) -> f64 {
        self.min_value
    }

    #[inline]
    fn max(&self) -> f64 {
        self.max_value
    }
}

impl CacheOnce {
    #[must_use]
    pub const fn new(input_index: usize, min_value: f64, max_value: f64) -> Self {
        Self {
            input_index,
            point_stamp: 0,
            array_stamp: 0,
            last_value: 0.0,
            last_array: None,
            min_value,
            max_value,
        }
    }

    #[inline]
    fn current_array(&self, generation: Generation) -> Option<&[f64]> {
        self.last_array
            .as_deref()
            .filter(|_| self.array_stamp == generation.array)
    }
}

impl Drop for CacheOnce {
    fn drop(&mut self) {
        if let Some(array) = &mut self.last_array {
            recycle_buffer(array);
        }
    }
}

impl MutableChunkNoiseFunctionComponentImpl for CacheOnce {
    fn sample(
        &mut self,
        component_stack: &mut [ChunkNoiseFunctionComponent],
        pos: &impl NoisePos,
        sample_options: &SampleOptions,
    ) -> f64 {
        if sample_options.context == SampleContext::Foreign {
            return ChunkNoiseFunctionComponent::sample_from_stack(
                &mut component_stack[..=self.input_index],
                pos,
                sample_options,
            );
        }
        if let Some(array) = self.current_array(sample_options.generation) {
            return array[sample_options.fill_index];
        }
        if self.point_stamp == sample_options.generation.point {
            return self.last_value;
        }

        let value = ChunkNoiseFunctionComponent::sample_from_stack(
            &mut component_stack[..=self.input_index],
            pos,
            sample_options,
        );
        self.point_stamp = sample_options.generation.point;
        self.last_value = value;
        value
    }

    fn fill(
        &mut self,
        component_stack: &mut [ChunkNoiseFunctionComponent],
        array: &mut [f64],
        mapper: &impl IndexToNoisePos,
        sample_options: &mut SampleOptions,
    ) {
        if let Some(cached) = self.current_array(sample_options.generation) {
            array.copy_from_slice(cached);
            return;
        }

        ChunkNoiseFunctionComponent::fill_from_stack(
            &mut component_stack[..=self.input_index],
            array,
            mapper,
            sample_options,
        );

        let reusable = self
            .last_array
            .as_ref()
            .is_some_and(|cached| cached.len() == array.len());
        if !reusable {
            if let Some(old) = &mut self.last_array {
                recycle_buffer(old);
            }
            self.last_array = Some(take_buffer(array.len()));
        }
        if let Some(cached) = &mut self.last_array {
            cached.copy_from_slice(array);
        }
        self.array_stamp = sample_options.generation.array;
    }
}

/// Holds its input for every block of the selected cell.
///
/// The session fills it once per cell; cursor queries inside the cell are
/// lookups and everything else evaluates the input.
pub struct CellCache {
    pub(crate) input_index: usize,
    pub(crate) cache: Box<[f64]>,
    min_value: f64,
    max_value: f64,
}

impl NoiseFunctionComponentRange for CellCache {
    #[inline]
    fn min(&self) -> f64 {
        self.min_value
    }

    #[inline]
    fn max(&self) -> f64 {
        self.max_value
    }
}

impl CellCache {
    #[must_use]
    pub fn new(
        input_index: usize,
        min_value: f64,
        max_value: f64,
        options: &ChunkNoiseFunctionBuilderOptions,
    ) -> Self {
        Self {
            input_index,
            cache: take_buffer(options.cell_width * options.cell_width * options.cell_height),
            min_value,
            max_value,
        }
    }
}

impl Drop for CellCache {
    fn drop(&mut self) {
        recycle_buffer(&mut self.cache);
    }
}

impl MutableChunkNoiseFunctionComponentImpl for CellCache {
    fn sample(
        &mut self,
        component_stack: &mut [ChunkNoiseFunctionComponent],
        pos: &impl NoisePos,
        sample_options: &SampleOptions,
    ) -> f64 {
        match sample_options.cursor().and_then(CellCursor::cell_index) {
            Some(index) => self.cache[index],
            None => ChunkNoiseFunctionComponent::sample_from_stack(
                &mut component_stack[..=self.input_index],
                pos,
                sample_options,
            ),
        }
    }
}

/// The stateful components a chunk session substitutes for wrappers.
#[enum_dispatch(MutableChunkNoiseFunctionComponentImpl, NoiseFunctionComponentRange)]
pub enum ChunkSpecificNoiseFunctionComponent {
    DensityInterpolator(DensityInterpolator),
    FlatCache(FlatCache),
    Cache2D(Cache2D),
    CacheOnce(CacheOnce),
    CellCache(CellCache),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise_router::component::base_noise_router::ClampedYGradientData;
    use crate::noise_router::component::proto_noise_router::{
        IndependentProtoNoiseFunctionComponent,
    };
    use crate::noise_router::density_function::ClampedYGradient;

    fn y_gradient() -> IndependentProtoNoiseFunctionComponent {
        IndependentProtoNoiseFunctionComponent::ClampedYGradient(ClampedYGradient::new(
            ClampedYGradientData {
                from_y: -64.0,
                to_y: 320.0,
                from_value: 1.0,
                to_value: -1.0,
            },
        ))
    }

    fn live(stack: &mut [ChunkNoiseFunctionComponent], pos: UnblendedNoisePos) -> f64 {
        ChunkNoiseFunctionComponent::sample_from_stack(stack, &pos, &SampleOptions::foreign())
    }

    fn cursor_options(generation: Generation, fill_index: usize) -> SampleOptions {
        SampleOptions::new(
            false,
            SampleContext::Cursor(CellCursor::new(4, 8)),
            generation,
            fill_index,
        )
    }

    /// Every eighth block of column (3, 5), from the bottom of the world.
    struct ColumnMapper;

    impl IndexToNoisePos for ColumnMapper {
        fn at(
            &self,
            index: usize,
            _sample_options: Option<&mut SampleOptions>,
        ) -> impl NoisePos + 'static {
            UnblendedNoisePos::new(3, index as i32 * 8 - 64, 5)
        }
    }

    #[test]
    fn test_cache_once_point_hit_matches_live_value() {
        let gradient = y_gradient();
        let mut stack = [ChunkNoiseFunctionComponent::Independent(&gradient)];
        let mut cache = CacheOnce::new(0, -1.0, 1.0);
        let first = UnblendedNoisePos::new(3, 10, 5);
        let second = UnblendedNoisePos::new(3, 200, 5);
        let expected = live(&mut stack, first);

        let generation = Generation { point: 1, array: 0 };
        let options = cursor_options(generation, 0);
        assert_eq!(cache.sample(&mut stack, &first, &options), expected);
        // Same stamp, so the stored value comes back even for another point.
        assert_eq!(cache.sample(&mut stack, &first, &options), expected);
        assert_eq!(cache.sample(&mut stack, &second, &options), expected);

        let options = cursor_options(Generation { point: 2, array: 0 }, 0);
        assert_eq!(cache.sample(&mut stack, &second, &options), live(&mut stack, second));
    }

    #[test]
    fn test_cache_once_array_hit_matches_live_value() {
        let gradient = y_gradient();
        let mut stack = [ChunkNoiseFunctionComponent::Independent(&gradient)];
        let mut cache = CacheOnce::new(0, -1.0, 1.0);

        let mut options = cursor_options(Generation { point: 1, array: 1 }, 0);
        let mut filled = [0.0; 8];
        cache.fill(&mut stack, &mut filled, &ColumnMapper, &mut options);
        for (index, value) in filled.iter().enumerate() {
            let pos = UnblendedNoisePos::new(3, index as i32 * 8 - 64, 5);
            assert_eq!(*value, live(&mut stack, pos));
        }

        let elsewhere = UnblendedNoisePos::new(0, 300, 0);
        for fill_index in 0..filled.len() {
            let options = cursor_options(Generation { point: 7, array: 1 }, fill_index);
            assert_eq!(cache.sample(&mut stack, &elsewhere, &options), filled[fill_index]);
        }

        let mut again = [0.0; 8];
        cache.fill(&mut stack, &mut again, &ColumnMapper, &mut options);
        assert_eq!(again, filled);

        // A new array stamp sends samples back to the input.
        let options = cursor_options(Generation { point: 8, array: 2 }, 5);
        assert_eq!(cache.sample(&mut stack, &elsewhere, &options), live(&mut stack, elsewhere));
    }

    #[test]
    fn test_cache_once_foreign_queries_evaluate_input() {
        let gradient = y_gradient();
        let mut stack = [ChunkNoiseFunctionComponent::Independent(&gradient)];
        let mut cache = CacheOnce::new(0, -1.0, 1.0);
        let cached = UnblendedNoisePos::new(3, -40, 5);
        let options = cursor_options(Generation { point: 1, array: 0 }, 0);
        cache.sample(&mut stack, &cached, &options);

        let foreign = SampleOptions::foreign();
        for y in [-64, 0, 63, 150, 319] {
            let pos = UnblendedNoisePos::new(3, y, 5);
            assert_eq!(cache.sample(&mut stack, &pos, &foreign), live(&mut stack, pos));
        }
    }

    #[test]
    fn test_cell_cache_cursor_lookup_matches_live_value() {
        let gradient = y_gradient();
        let mut stack = [ChunkNoiseFunctionComponent::Independent(&gradient)];
        let options = ChunkNoiseFunctionBuilderOptions::new(4, 8, 48, 4, 0, 0, 4);
        let mut cache = CellCache::new(0, -1.0, 1.0, &options);
        let base_y = 56;

        let mut cursor = CellCursor::new(4, 8);
        for in_cell_y in 0..8 {
            for in_cell_x in 0..4 {
                for in_cell_z in 0..4 {
                    cursor.set(in_cell_x, in_cell_y, in_cell_z);
                    let pos = UnblendedNoisePos::new(
                        in_cell_x as i32,
                        base_y + in_cell_y as i32,
                        in_cell_z as i32,
                    );
                    let index = cursor.cell_index().unwrap();
                    cache.cache[index] = live(&mut stack, pos);
                }
            }
        }

        for (in_cell_x, in_cell_y, in_cell_z) in [(0, 0, 0), (1, 7, 2), (3, 4, 3)] {
            cursor.set(in_cell_x, in_cell_y, in_cell_z);
            let pos = UnblendedNoisePos::new(
                in_cell_x as i32,
                base_y + in_cell_y as i32,
                in_cell_z as i32,
            );
            let sample_options = SampleOptions::new(
                false,
                SampleContext::Cursor(cursor),
                Generation::default(),
                0,
            );
            assert_eq!(
                cache.sample(&mut stack, &pos, &sample_options),
                live(&mut stack, pos)
            );
        }
    }

    #[test]
    fn test_cell_cache_falls_back_outside_the_cell() {
        let gradient = y_gradient();
        let mut stack = [ChunkNoiseFunctionComponent::Independent(&gradient)];
        let options = ChunkNoiseFunctionBuilderOptions::new(4, 8, 48, 4, 0, 0, 4);
        let mut cache = CellCache::new(0, -1.0, 1.0, &options);
        cache.cache.fill(42.0);
        let pos = UnblendedNoisePos::new(2, 100, 1);

        let mut cursor = CellCursor::new(4, 8);
        cursor.set(2, 3, 1);
        let inside =
            SampleOptions::new(false, SampleContext::Cursor(cursor), Generation::default(), 0);
        assert_eq!(cache.sample(&mut stack, &pos, &inside), 42.0);

        cursor.set(2, 8, 1);
        let outside =
            SampleOptions::new(false, SampleContext::Cursor(cursor), Generation::default(), 0);
        assert_eq!(cache.sample(&mut stack, &pos, &outside), live(&mut stack, pos));
        assert_eq!(
            cache.sample(&mut stack, &pos, &SampleOptions::foreign()),
            live(&mut stack, pos)
        );
    }

    #[test]
    fn test_cell_index_matches_top_down_fill_order() {
        let mut cursor = CellCursor::new(4, 8);
        cursor.set(0, 7, 0);
        assert_eq!(cursor.cell_index(), Some(0));
        cursor.set(0, 7, 1);
        assert_eq!(cursor.cell_index(), Some(1));
        cursor.set(1, 7, 0);
        assert_eq!(cursor.cell_index(), Some(4));
        cursor.set(3, 0, 3);
        assert_eq!(cursor.cell_index(), Some(127));
    }

    #[test]
    fn test_cell_index_out_of_cell() {
        let mut cursor = CellCursor::new(4, 8);
        cursor.set(4, 0, 0);
        assert_eq!(cursor.cell_index(), None);
        cursor.set(0, 8, 0);
        assert_eq!(cursor.cell_index(), None);
    }

    #[test]
    fn test_packed_column_sign_extension() {
        assert_eq!(chunk_pos::packed(-1, 0), 0xFFFF_FFFF);
        assert_eq!(chunk_pos::packed(0, -1), 0xFFFF_FFFF_0000_0000);
        assert_ne!(chunk_pos::packed(0, 0), chunk_pos::MARKER);
    }

    #[test]
    fn test_interpolator_axes_match_one_shot() {
        let options = ChunkNoiseFunctionBuilderOptions::new(4, 8, 2, 1, 0, 0, 1);
        let mut interpolator = DensityInterpolator::new(0, -10.0, 10.0, &options);
        for (i, v) in interpolator.start_slice.iter_mut().enumerate() {
            *v = i as f64 * 0.5 - 1.0;
        }
        for (i, v) in interpolator.end_slice.iter_mut().enumerate() {
            *v = (i as f64).sin() * 3.0;
        }
        interpolator.select_cell(1, 0);

        let mut cursor = CellCursor::new(4, 8);
        cursor.set(3, 5, 2);
        interpolator.interpolate_y(5.0 / 8.0);
        interpolator.interpolate_x(3.0 / 4.0);
        interpolator.interpolate_z(2.0 / 4.0);

        let one_shot = interpolator.interpolate_at(&cursor);
        assert!((interpolator.value - one_shot).abs() < 1e-12);
    }

    #[test]
    fn test_interpolator_corner_is_stored_sample() {
        let options = ChunkNoiseFunctionBuilderOptions::new(4, 8, 1, 1, 0, 0, 1);
        let mut interpolator = DensityInterpolator::new(0, -10.0, 10.0, &options);
        interpolator.start_slice.copy_from_slice(&[1.0, 2.0, 3.0, 4.0]);
        interpolator.end_slice.copy_from_slice(&[5.0, 6.0, 7.0, 8.0]);
        interpolator.select_cell(0, 0);

        let cursor = CellCursor::new(4, 8);
        assert_eq!(interpolator.interpolate_at(&cursor), 1.0);

        interpolator.swap_slices();
        interpolator.select_cell(0, 0);
        assert_eq!(interpolator.interpolate_at(&cursor), 5.0);
    }
}
