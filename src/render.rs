use blockscape_blocks::BlockId;
use blockscape_chunk::{BlockRecord, FaceMask};
use blockscape_geom::{Aabb, Vec3};
use blockscape_world::BLOCK_SIZE;

/// One positioned, textured cube handed to the renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderInstance {
    pub block_id: BlockId,
    pub position: Vec3,
    /// Uniform scale applied to a unit cube.
    pub scale: f32,
    pub texture_offset: [f32; 2],
    pub single_texture: bool,
    pub visible_faces: FaceMask,
    pub light: u8,
    pub damage: f32,
    pub is_target: bool,
}

impl From<&BlockRecord> for RenderInstance {
    fn from(r: &BlockRecord) -> Self {
        Self {
            block_id: r.block_id,
            position: r.position,
            scale: BLOCK_SIZE,
            texture_offset: r.texture_offset,
            single_texture: r.single_texture,
            visible_faces: r.visible_faces,
            light: r.light,
            damage: r.damage,
            is_target: r.is_target,
        }
    }
}

/// Rendering collaborator: receives one draw call per loaded chunk.
pub trait BlockRenderer {
    /// `bounds` is the chunk's world-space box, for frustum tests.
    fn draw_chunk(&mut self, chunk_id: usize, bounds: Aabb, instances: &[RenderInstance]);
}

/// Counts draw calls and instances; logs at trace level.
#[derive(Debug, Default)]
pub struct LogRenderer {
    pub draw_calls: usize,
    pub instances: usize,
}

impl BlockRenderer for LogRenderer {
    fn draw_chunk(&mut self, chunk_id: usize, _bounds: Aabb, instances: &[RenderInstance]) {
        self.draw_calls += 1;
        self.instances += instances.len();
        log::trace!("draw chunk {chunk_id}: {} instances", instances.len());
    }
}
