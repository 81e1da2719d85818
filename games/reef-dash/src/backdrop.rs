use std::collections::VecDeque;

use glam::Vec2;
use reef_engine::{EngineContext, Entity, EntityId, SpriteComponent};

use crate::decor::animation_order;

/// Number of reef tile variants in the atlas row.
pub const TILE_VARIANTS: usize = 4;

/// One full-screen background tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackdropTile {
    pub id: EntityId,
    /// Center in world space.
    pub position: Vec2,
    pub size: Vec2,
}

impl BackdropTile {
    pub fn bottom(&self) -> f32 {
        self.position.y - self.size.y / 2.0
    }

    pub fn top(&self) -> f32 {
        self.position.y + self.size.y / 2.0
    }
}

/// What one `stream` pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreamStats {
    pub added: usize,
    pub removed: usize,
}

/// Recycles scene-sized tiles around the camera so the reef never ends.
///
/// Tiles are kept sorted by height, bottom first, and sit on a fixed grid
/// of tile centers so neighbours always meet edge to edge. After each pass
/// they cover `[cam - H, cam + H]` and none lies wholly outside it.
#[derive(Debug)]
pub struct Backdrop {
    tiles: VecDeque<BackdropTile>,
    size: Vec2,
    variants: Vec<usize>,
    serial: usize,
}

impl Backdrop {
    pub fn new(size: Vec2, seed: u64) -> Self {
        Self {
            tiles: VecDeque::new(),
            size,
            variants: animation_order(seed, TILE_VARIANTS),
            serial: 0,
        }
    }

    pub fn tiles(&self) -> impl Iterator<Item = &BackdropTile> {
        self.tiles.iter()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Bottom of the lowest tile and top of the highest.
    pub fn covered(&self) -> Option<(f32, f32)> {
        Some((self.tiles.front()?.bottom(), self.tiles.back()?.top()))
    }

    /// Bring the tile set in line with a camera centered at `camera_y`.
    pub fn stream(&mut self, camera_y: f32, ctx: &mut EngineContext, sprite: Option<&SpriteComponent>) -> StreamStats {
        let h = self.size.y;
        let ahead = camera_y + h;
        let behind = camera_y - h;
        let mut stats = StreamStats::default();

        let detached = match self.covered() {
            None => true,
            Some((bottom, top)) => top < behind || bottom > ahead,
        };
        if detached {
            let snapped = match self.tiles.front() {
                Some(t) => t.position.y + ((camera_y - t.position.y) / h).round() * h,
                None => camera_y,
            };
            stats.removed += self.clear(ctx);
            let tile = self.make_tile(snapped, ctx, sprite);
            self.tiles.push_back(tile);
            stats.added += 1;
        }

        while let Some(last) = self.tiles.back().copied() {
            if last.top() >= ahead {
                break;
            }
            let tile = self.make_tile(last.position.y + h, ctx, sprite);
            self.tiles.push_back(tile);
            stats.added += 1;
        }
        while let Some(first) = self.tiles.front().copied() {
            if first.bottom() <= behind {
                break;
            }
            let tile = self.make_tile(first.position.y - h, ctx, sprite);
            self.tiles.push_front(tile);
            stats.added += 1;
        }

        while let Some(first) = self.tiles.front().copied() {
            if first.top() >= behind {
                break;
            }
            self.tiles.pop_front();
            ctx.despawn(first.id);
            stats.removed += 1;
        }
        while let Some(last) = self.tiles.back().copied() {
            if last.bottom() <= ahead {
                break;
            }
            self.tiles.pop_back();
            ctx.despawn(last.id);
            stats.removed += 1;
        }

        if stats.added > 0 || stats.removed > 0 {
            log::debug!("backdrop: +{} -{} ({} live)", stats.added, stats.removed, self.tiles.len());
        }
        stats
    }

    /// Despawn every tile. Returns how many were removed.
    pub fn clear(&mut self, ctx: &mut EngineContext) -> usize {
        let n = self.tiles.len();
        for tile in self.tiles.drain(..) {
            ctx.despawn(tile.id);
        }
        n
    }

    fn make_tile(&mut self, center_y: f32, ctx: &mut EngineContext, sprite: Option<&SpriteComponent>) -> BackdropTile {
        let id = ctx.next_id();
        let position = Vec2::new(0.0, center_y);
        let sprite = sprite.map(|s| {
            let mut s = s.clone();
            if !self.variants.is_empty() {
                s.col += self.variants[self.serial % self.variants.len()] as f32;
            }
            s
        });
        self.serial += 1;

        ctx.scene.spawn(
            Entity::new(id)
                .with_tag("tile")
                .with_pos(position)
                .with_scale(self.size)
                .with_sprite(sprite),
        );
        BackdropTile { id, position, size: self.size }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reef_engine::AtlasId;

    const H: f32 = 800.0;

    fn backdrop() -> (Backdrop, EngineContext) {
        (Backdrop::new(Vec2::new(400.0, H), 1), EngineContext::new())
    }

    fn assert_invariants(b: &Backdrop, cam: f32) {
        let (bottom, top) = b.covered().unwrap();
        assert!(bottom <= cam - H + 1e-3, "bottom {} cam {}", bottom, cam);
        assert!(top >= cam + H - 1e-3, "top {} cam {}", top, cam);
        let tiles: Vec<_> = b.tiles().copied().collect();
        for t in &tiles {
            assert!(t.top() > cam - 2.0 * H && t.bottom() < cam + 2.0 * H, "tile {:?} cam {}", t.position, cam);
        }
        for pair in tiles.windows(2) {
            assert!(pair[0].position.y < pair[1].position.y);
            assert!((pair[1].bottom() - pair[0].top()).abs() < 1e-3);
        }
    }

    #[test]
    fn initial_pass_covers_both_sides() {
        let (mut b, mut ctx) = backdrop();
        let stats = b.stream(0.0, &mut ctx, None);
        assert_eq!(stats.added, 3);
        assert_eq!(b.len(), 3);
        assert_eq!(ctx.scene.count_tagged("tile"), 3);
        assert_invariants(&b, 0.0);
    }

    #[test]
    fn climbing_streams_and_prunes() {
        let (mut b, mut ctx) = backdrop();
        let mut cam = 0.0;
        while cam < 5000.0 {
            b.stream(cam, &mut ctx, None);
            assert_invariants(&b, cam);
            cam += 50.0;
        }
        assert!(b.len() <= 4);
        assert_eq!(ctx.scene.count_tagged("tile"), b.len());
    }

    #[test]
    fn descending_also_works() {
        let (mut b, mut ctx) = backdrop();
        let mut cam = 0.0;
        while cam > -3000.0 {
            b.stream(cam, &mut ctx, None);
            assert_invariants(&b, cam);
            cam -= 50.0;
        }
    }

    #[test]
    fn large_jump_reseeds_on_grid() {
        let (mut b, mut ctx) = backdrop();
        b.stream(0.0, &mut ctx, None);
        b.stream(100_000.0, &mut ctx, None);
        assert_invariants(&b, 100_000.0);
        for t in b.tiles() {
            assert!((t.position.y / H).fract().abs() < 1e-3);
        }
        assert_eq!(ctx.scene.count_tagged("tile"), b.len());
    }

    #[test]
    fn still_camera_is_stable() {
        let (mut b, mut ctx) = backdrop();
        b.stream(120.0, &mut ctx, None);
        assert_eq!(b.stream(120.0, &mut ctx, None), StreamStats::default());
    }

    #[test]
    fn tiles_cycle_variants() {
        let (mut b, mut ctx) = backdrop();
        let sprite = SpriteComponent { atlas: AtlasId(0), col: 0.0, row: 1.0, cell_span: 1.0, alpha: 1.0 };
        b.stream(0.0, &mut ctx, Some(&sprite));
        for t in b.tiles() {
            let col = ctx.scene.get(t.id).unwrap().sprite.as_ref().unwrap().col;
            assert!(col >= 0.0 && col < TILE_VARIANTS as f32);
        }
    }
}
