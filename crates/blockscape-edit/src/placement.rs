use blockscape_geom::Aabb;
use blockscape_geom::Vec3;

/// Face of a target box the look ray hit, in selection priority order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HitFace {
    /// +Z
    Front,
    /// -Z
    Back,
    /// +X
    Right,
    /// -X
    Left,
    Top,
    Bottom,
}

impl HitFace {
    /// Voxel step from the target to the cell in front of this face.
    pub fn step(self) -> (i32, i32, i32) {
        match self {
            HitFace::Front => (0, 0, 1),
            HitFace::Back => (0, 0, -1),
            HitFace::Right => (1, 0, 0),
            HitFace::Left => (-1, 0, 0),
            HitFace::Top => (0, 1, 0),
            HitFace::Bottom => (0, -1, 0),
        }
    }
}

/// Which face of `bbox` contains `hit`, comparing the rounded hit point with
/// each face plane. The first match wins.
pub fn hit_face(bbox: &Aabb, hit: Vec3) -> Option<HitFace> {
    let r = hit.round();
    [
        (r.z == bbox.max.z, HitFace::Front),
        (r.z == bbox.min.z, HitFace::Back),
        (r.x == bbox.max.x, HitFace::Right),
        (r.x == bbox.min.x, HitFace::Left),
        (r.y == bbox.max.y, HitFace::Top),
        (r.y == bbox.min.y, HitFace::Bottom),
    ]
    .into_iter()
    .find_map(|(on_plane, face)| on_plane.then_some(face))
}

/// Voxel a new block would occupy when placed against `target` at `hit`.
pub fn placement_offset(target: (i32, i32, i32), bbox: &Aabb, hit: Vec3) -> Option<(i32, i32, i32)> {
    let (dx, dy, dz) = hit_face(bbox, hit)?.step();
    Some((target.0 + dx, target.1 + dy, target.2 + dz))
}

/// Broad phase: inflate the block box by the body's half extents and test the
/// body's centre against it.
#[inline]
pub fn blocks_body(block: &Aabb, body: &Aabb) -> bool {
    block.minkowski_sum(body).contains_point(body.center())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_at(x: f32, y: f32, z: f32) -> Aabb {
        Aabb::from_center(Vec3::new(x, y, z) * 16.0, Vec3::splat(8.0))
    }

    #[test]
    fn top_face_places_one_cell_up() {
        let bbox = unit_at(3.0, 2.0, 5.0);
        let hit = Vec3::new(50.2, 40.0001, 79.6);
        assert_eq!(hit_face(&bbox, hit), Some(HitFace::Top));
        assert_eq!(placement_offset((3, 2, 5), &bbox, hit), Some((3, 3, 5)));
    }

    #[test]
    fn z_planes_win_over_other_faces() {
        let bbox = unit_at(0.0, 0.0, 0.0);
        // an edge point lies on both +Z and +Y planes
        assert_eq!(hit_face(&bbox, Vec3::new(0.0, 8.0, 8.0)), Some(HitFace::Front));
        assert_eq!(hit_face(&bbox, Vec3::new(-8.0, 0.0, 3.0)), Some(HitFace::Left));
        assert_eq!(hit_face(&bbox, Vec3::new(1.0, 2.0, 3.0)), None);
    }

    #[test]
    fn body_overlap_is_strict() {
        let block = unit_at(0.0, 0.0, 0.0);
        let body = Aabb::new(Vec3::new(-3.2, 8.0, -3.2), Vec3::new(3.2, 36.8, 3.2));
        assert!(!blocks_body(&block, &body), "standing on top is fine");
        let sunk = body.translated(Vec3::new(0.0, -1.0, 0.0));
        assert!(blocks_body(&block, &sunk));
    }
}
