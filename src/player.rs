use blockscape_geom::{Aabb, Ray, Vec3};
use blockscape_world::VOXEL_SIZE;

use crate::config::PlayerConfig;

/// Interval between footstep sounds while walking on ground.
pub const STEP_SOUND_INTERVAL: f32 = 0.3;

/// Candidates farther than this from the player skip the swept test.
const BROAD_PHASE_RANGE: f32 = VOXEL_SIZE * 3.0;

/// Left stick deflection in `-1..=1` per axis and the jump button.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MoveInput {
    /// Sideways deflection.
    pub strafe: f32,
    /// Forward deflection along the camera heading.
    pub forward: f32,
    pub jump: bool,
}

impl MoveInput {
    #[inline]
    pub fn is_centered(&self) -> bool {
        self.strafe == 0.0 && self.forward == 0.0
    }
}

/// What happened to the player this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerStep {
    pub moved: bool,
    /// Index into the solids slice of the block under the feet.
    pub ground: Option<usize>,
    pub respawned: bool,
    pub play_step: bool,
}

/// Walking body with an axis-aligned hitbox anchored at the feet centre.
#[derive(Clone, Debug)]
pub struct Player {
    position: Vec3,
    spawn: Vec3,
    /// Positive falls.
    fall_velocity: f32,
    on_ground: bool,
    half_width: f32,
    height: f32,
    step_timer: f32,
    cfg: PlayerConfig,
    /// Chunk the streamer last saw the player in.
    pub current_chunk: Option<usize>,
}

impl Player {
    pub fn new(spawn: Vec3, cfg: PlayerConfig) -> Self {
        Self {
            position: spawn,
            spawn,
            fall_velocity: 0.0,
            on_ground: false,
            half_width: VOXEL_SIZE * cfg.width_ratio / 2.0,
            height: VOXEL_SIZE * cfg.height_ratio,
            step_timer: 0.0,
            cfg,
            current_chunk: None,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, p: Vec3) {
        self.position = p;
    }

    #[inline]
    pub fn spawn(&self) -> Vec3 {
        self.spawn
    }

    #[inline]
    pub fn is_on_ground(&self) -> bool {
        self.on_ground
    }

    #[inline]
    pub fn fall_velocity(&self) -> f32 {
        self.fall_velocity
    }

    /// Eye height above the feet.
    pub fn eye_position(&self) -> Vec3 {
        self.position + Vec3::new(0.0, self.height * 0.9, 0.0)
    }

    pub fn hitbox_at(&self, feet: Vec3) -> Aabb {
        Aabb::new(
            Vec3::new(feet.x - self.half_width, feet.y, feet.z - self.half_width),
            Vec3::new(feet.x + self.half_width, feet.y + self.height, feet.z + self.half_width),
        )
    }

    #[inline]
    pub fn hitbox(&self) -> Aabb {
        self.hitbox_at(self.position)
    }

    /// Leave the ground. Ignored while airborne.
    pub fn jump(&mut self) {
        if self.on_ground {
            self.fall_velocity += self.cfg.jump_lift * self.cfg.speed;
            self.on_ground = false;
        }
    }

    /// Intended feet position after `dt`: stick input projected onto the
    /// camera heading in the XZ plane.
    pub fn next_position(&self, dt: f32, input: MoveInput, cam_dir: Vec3) -> Vec3 {
        if input.is_centered() {
            return self.position;
        }
        let heading = Vec3::new(cam_dir.x, 0.0, cam_dir.z).normalized();
        let (s, f) = (input.strafe, input.forward);
        let dir = Vec3::new(heading.x * f + heading.z * s, 0.0, heading.z * f - heading.x * s).normalized();
        let magnitude = (s * s + f * f).sqrt().min(1.0);
        self.position + dir * (self.cfg.speed * magnitude * dt.min(self.cfg.max_dt))
    }

    /// Full frame: horizontal move with collision, then gravity.
    ///
    /// `solids` are the boxes of nearby rendered blocks. `world` is the
    /// world-space box the player may move inside.
    pub fn update(&mut self, dt: f32, input: MoveInput, cam_dir: Vec3, solids: &[Aabb], world: &Aabb) -> PlayerStep {
        let mut step = PlayerStep::default();
        if input.jump {
            self.jump();
        }

        let next = self.next_position(dt, input, cam_dir);
        let inside = next.x >= world.min.x && next.x <= world.max.x && next.z >= world.min.z && next.z <= world.max.z;
        if next != self.position && inside {
            step.moved = self.try_move(solids, dt, next, false);
        }

        let (ground_y, ground) = self.terrain_height_at(solids);
        step.ground = ground;
        let ceiling = self.ceiling_at(solids);
        step.respawned = self.apply_gravity(dt, ground_y, ceiling, world);

        if step.moved && self.on_ground {
            self.step_timer += dt;
            if self.step_timer > STEP_SOUND_INTERVAL {
                self.step_timer = 0.0;
                step.play_step = true;
            }
        } else {
            self.step_timer = 0.0;
        }
        step
    }

    /// Nearest distance along `dir` from the current hitbox centre to any
    /// solid, using boxes inflated by the hitbox.
    fn nearest_hit(&self, solids: &[Aabb], ray: &Ray) -> Option<f32> {
        let body = self.hitbox();
        solids
            .iter()
            .filter(|b| body.min.y <= b.center().y)
            .filter(|b| b.center().distance_to(body.center()) <= BROAD_PHASE_RANGE)
            .filter_map(|b| {
                let inflated = b.minkowski_sum(&body);
                let (t0, t1) = ray.slab_interval(&inflated)?;
                // grazing contact and moving away are not hits
                (t0 >= 0.0 && inflated.contains_point(ray.at((t0 + t1) / 2.0))).then_some(t0)
            })
            .min_by(f32::total_cmp)
    }

    /// Swept move toward `next`. On a blocked direct move, retries X-only and
    /// then Z-only once each.
    fn try_move(&mut self, solids: &[Aabb], dt: f32, next: Vec3, retry: bool) -> bool {
        let current = self.position;
        let delta = next - current;
        let wanted = delta.length();
        if wanted == 0.0 {
            return false;
        }
        let ray = Ray::new(self.hitbox().center(), delta);
        let blocked = self
            .nearest_hit(solids, &ray)
            .is_some_and(|t| t / self.cfg.speed < dt || t < wanted);
        if !blocked {
            self.position.x = next.x;
            self.position.z = next.z;
            return true;
        }
        if retry {
            return false;
        }
        let x_only = Vec3::new(next.x, current.y, current.z);
        if x_only != current && self.try_move(solids, dt, x_only, true) {
            return true;
        }
        let z_only = Vec3::new(current.x, current.y, next.z);
        z_only != current && self.try_move(solids, dt, z_only, true)
    }

    /// Highest block top under the hitbox footprint that is not above the feet.
    pub fn terrain_height_at(&self, solids: &[Aabb]) -> (Option<f32>, Option<usize>) {
        let body = self.hitbox();
        let mut best: Option<(f32, usize)> = None;
        for (i, b) in solids.iter().enumerate() {
            let top = b.max.y;
            if body.min.y < top {
                continue;
            }
            let under = body.min.x < b.max.x && body.max.x > b.min.x && body.min.z < b.max.z && body.max.z > b.min.z;
            if under && best.is_none_or(|(y, _)| top > y) {
                best = Some((top, i));
            }
        }
        (best.map(|(y, _)| y), best.map(|(_, i)| i))
    }

    /// Lowest block bottom over the hitbox footprint that is not below the head.
    fn ceiling_at(&self, solids: &[Aabb]) -> Option<f32> {
        let body = self.hitbox();
        solids
            .iter()
            .filter(|b| b.min.y >= body.max.y)
            .filter(|b| body.min.x < b.max.x && body.max.x > b.min.x && body.min.z < b.max.z && body.max.z > b.min.z)
            .map(|b| b.min.y)
            .min_by(f32::total_cmp)
    }

    /// Fall, land on `ground_y`, bump into `ceiling`, or respawn after
    /// leaving the world vertically.
    fn apply_gravity(&mut self, dt: f32, ground_y: Option<f32>, ceiling: Option<f32>, world: &Aabb) -> bool {
        let dt = dt.min(self.cfg.max_dt);
        self.fall_velocity += self.cfg.gravity * dt;
        let mut y = self.position.y - self.fall_velocity * dt;

        if y >= world.max.y || y < world.min.y {
            log::info!("player left the world at {:?}; back to spawn", self.position);
            self.position = self.spawn;
            self.fall_velocity = 0.0;
            self.on_ground = false;
            return true;
        }

        if let Some(top) = ceiling {
            if y + self.height > top {
                y = top - self.height;
                self.fall_velocity = self.fall_velocity.max(0.0);
            }
        }

        self.on_ground = false;
        if let Some(ground) = ground_y {
            if y <= ground {
                y = ground;
                self.fall_velocity = 0.0;
                self.on_ground = true;
            }
        }
        self.position.y = y;
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockscape_world::{BLOCK_SIZE, voxel_center};

    fn block(x: i32, y: i32, z: i32) -> Aabb {
        Aabb::from_center(voxel_center(x, y, z), Vec3::splat(BLOCK_SIZE))
    }

    fn floor(n: i32) -> Vec<Aabb> {
        let mut v = Vec::new();
        for z in -n..=n {
            for x in -n..=n {
                v.push(block(x, 0, z));
            }
        }
        v
    }

    fn world() -> Aabb {
        Aabb::new(Vec3::new(-1000.0, -8.0, -1000.0), Vec3::new(1000.0, 1000.0, 1000.0))
    }

    fn standing_player() -> Player {
        Player::new(Vec3::new(0.0, BLOCK_SIZE, 0.0), PlayerConfig::default())
    }

    #[test]
    fn hitbox_matches_configured_ratios() {
        let p = standing_player();
        let hb = p.hitbox();
        assert!((hb.max.x - hb.min.x - 6.4).abs() < 1e-4);
        assert!((hb.height() - 28.8).abs() < 1e-4);
        assert_eq!(hb.min.y, BLOCK_SIZE);
    }

    #[test]
    fn standing_on_the_floor_stays_put() {
        let mut p = standing_player();
        let solids = floor(2);
        let step = p.update(0.016, MoveInput::default(), Vec3::new(0.0, 0.0, 1.0), &solids, &world());
        assert!(p.is_on_ground());
        assert_eq!(p.position().y, BLOCK_SIZE);
        assert!(step.ground.is_some());
    }

    #[test]
    fn falls_onto_the_highest_supporting_block() {
        let mut p = Player::new(Vec3::new(0.0, 60.0, 0.0), PlayerConfig::default());
        let mut solids = floor(1);
        solids.push(block(0, 1, 0));
        for _ in 0..120 {
            p.update(0.016, MoveInput::default(), Vec3::new(0.0, 0.0, 1.0), &solids, &world());
        }
        assert!(p.is_on_ground());
        assert_eq!(p.position().y, 24.0);
    }

    #[test]
    fn diagonal_move_into_a_z_wall_slides_along_x() {
        let mut p = standing_player();
        let mut solids = floor(3);
        // wall just ahead on +Z, one cell wide, level with the body
        solids.push(block(0, 1, 1));
        solids.push(block(0, 2, 1));
        let before = p.position();
        p.set_position(Vec3::new(0.0, BLOCK_SIZE, 16.0 - 8.0 - 3.2 - 0.5));
        let start = p.position();
        let next = start + Vec3::new(2.0, 0.0, 2.0);
        assert!(p.try_move(&solids, 0.016, next, false));
        assert_eq!(p.position().x, next.x);
        assert_eq!(p.position().z, start.z);
        assert_ne!(before, p.position());
    }

    #[test]
    fn walking_away_from_a_touching_wall_is_free() {
        let mut p = standing_player();
        let solids = vec![block(0, 1, 1)];
        p.set_position(Vec3::new(0.0, BLOCK_SIZE, 16.0 - 8.0 - 3.2));
        let start = p.position();
        assert!(p.try_move(&solids, 0.016, start + Vec3::new(0.0, 0.0, -1.0), false));
        assert!(p.try_move(&solids, 0.016, p.position() + Vec3::new(1.0, 0.0, 0.0), false));
    }

    #[test]
    fn jumping_under_a_low_ceiling_stops_at_the_block() {
        let mut p = standing_player();
        let mut solids = floor(1);
        solids.push(block(0, 3, 0));
        p.update(0.016, MoveInput::default(), Vec3::new(0.0, 0.0, 1.0), &solids, &world());
        p.jump();
        for _ in 0..5 {
            p.update(0.016, MoveInput::default(), Vec3::new(0.0, 0.0, 1.0), &solids, &world());
            assert!(p.hitbox().max.y <= 40.0 + 1e-3);
        }
    }

    #[test]
    fn next_position_follows_camera_heading() {
        let p = standing_player();
        let fwd = MoveInput {
            forward: 1.0,
            ..MoveInput::default()
        };
        let next = p.next_position(0.01, fwd, Vec3::new(1.0, -0.5, 0.0));
        assert!(next.x > 0.0 && next.z.abs() < 1e-5);
        assert_eq!(next.y, p.position().y);
        assert_eq!(p.next_position(0.01, MoveInput::default(), Vec3::new(1.0, 0.0, 0.0)), p.position());
    }

    #[test]
    fn jump_only_from_ground_and_leaving_the_world_respawns() {
        let mut p = standing_player();
        p.jump();
        assert_eq!(p.fall_velocity(), 0.0, "airborne players cannot jump");
        let solids = floor(1);
        p.update(0.016, MoveInput::default(), Vec3::new(0.0, 0.0, 1.0), &solids, &world());
        p.jump();
        assert!(p.fall_velocity() < 0.0);

        let mut lost = Player::new(Vec3::new(0.0, -7.0, 0.0), PlayerConfig::default());
        lost.set_position(Vec3::new(5.0, -7.9, 5.0));
        let step = lost.update(0.05, MoveInput::default(), Vec3::new(0.0, 0.0, 1.0), &[], &world());
        assert!(step.respawned);
        assert_eq!(lost.position(), lost.spawn());
    }
}
