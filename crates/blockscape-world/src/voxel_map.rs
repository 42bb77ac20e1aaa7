use blockscape_blocks::{AIR, BlockId};

/// Block id returned for reads outside the map. The catalog has no entry for
/// it, so it behaves as an opaque block everywhere.
pub const OUT_OF_BOUNDS: BlockId = BlockId::MAX;

/// Which half of a voxel's packed light byte to address.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum LightChannel {
    /// Light from emissive blocks, low nibble.
    Block,
    /// Skylight, high nibble.
    Sun,
}

impl LightChannel {
    #[inline]
    fn unpack(self, packed: u8) -> u8 {
        match self {
            LightChannel::Block => packed & 0x0F,
            LightChannel::Sun => packed >> 4,
        }
    }

    #[inline]
    fn pack(self, packed: u8, level: u8) -> u8 {
        let level = level.min(0x0F);
        match self {
            LightChannel::Block => (packed & 0xF0) | level,
            LightChannel::Sun => (packed & 0x0F) | (level << 4),
        }
    }
}

/// Dense block grid with one packed light byte per cell.
///
/// Cells are laid out `y * width * length + z * width + x`. Every accessor is
/// bounds checked: reads outside return [`OUT_OF_BOUNDS`] or zero light, writes
/// outside are ignored.
#[derive(Clone, Debug)]
pub struct VoxelMap {
    width: i32,
    length: i32,
    height: i32,
    blocks: Vec<BlockId>,
    light: Vec<u8>,
}

impl VoxelMap {
    pub fn new(width: usize, length: usize, height: usize) -> Self {
        let len = width * length * height;
        Self {
            width: width as i32,
            length: length as i32,
            height: height as i32,
            blocks: vec![AIR; len],
            light: vec![0; len],
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn length(&self) -> i32 {
        self.length
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32, z: i32) -> bool {
        x >= 0 && y >= 0 && z >= 0 && x < self.width && y < self.height && z < self.length
    }

    #[inline]
    pub fn index(&self, x: i32, y: i32, z: i32) -> Option<usize> {
        if !self.in_bounds(x, y, z) {
            return None;
        }
        let (w, l) = (self.width as usize, self.length as usize);
        Some(y as usize * w * l + z as usize * w + x as usize)
    }

    /// Inverse of [`VoxelMap::index`].
    pub fn offset_of(&self, index: usize) -> Option<(i32, i32, i32)> {
        if index >= self.len() {
            return None;
        }
        let (w, l) = (self.width as usize, self.length as usize);
        let y = index / (w * l);
        let rem = index % (w * l);
        Some(((rem % w) as i32, y as i32, (rem / w) as i32))
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32, z: i32) -> BlockId {
        self.index(x, y, z)
            .map(|i| self.blocks[i])
            .unwrap_or(OUT_OF_BOUNDS)
    }

    #[inline]
    pub fn set(&mut self, x: i32, y: i32, z: i32, id: BlockId) {
        if let Some(i) = self.index(x, y, z) {
            self.blocks[i] = id;
        }
    }

    #[inline]
    pub fn light(&self, x: i32, y: i32, z: i32, channel: LightChannel) -> u8 {
        self.index(x, y, z)
            .map(|i| channel.unpack(self.light[i]))
            .unwrap_or(0)
    }

    #[inline]
    pub fn set_light(&mut self, x: i32, y: i32, z: i32, channel: LightChannel, level: u8) {
        if let Some(i) = self.index(x, y, z) {
            self.light[i] = channel.pack(self.light[i], level);
        }
    }

    /// Brighter of the two channels.
    #[inline]
    pub fn brightness(&self, x: i32, y: i32, z: i32) -> u8 {
        self.light(x, y, z, LightChannel::Block)
            .max(self.light(x, y, z, LightChannel::Sun))
    }

    pub fn clear_light(&mut self, channel: LightChannel) {
        for packed in self.light.iter_mut() {
            *packed = channel.pack(*packed, 0);
        }
    }

    /// Overwrite the column at `(x, z)` bottom-up with `column`; extra entries are dropped.
    pub fn write_column(&mut self, x: i32, z: i32, column: &[BlockId]) {
        for (y, &id) in column.iter().enumerate().take(self.height as usize) {
            self.set(x, y as i32, z, id);
        }
    }

    #[inline]
    pub fn blocks(&self) -> &[BlockId] {
        &self.blocks
    }
}
