use glam::Vec2;

/// A horizontal travel corridor across the screen.
///
/// Coordinates are screen-relative: the origin is the camera center, so
/// `y` runs from `-height/2` (bottom) to `height/2` (top). The spawner adds
/// the camera position when it places an obstacle, which is what makes the
/// lane field scroll with the player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lane {
    pub start: Vec2,
    pub end: Vec2,
    /// Unit travel direction: `+X` or `-X`.
    pub direction: Vec2,
}

impl Lane {
    /// Band-center height of this lane.
    pub fn y(&self) -> f32 {
        self.start.y
    }

    /// Horizontal distance covered from start to end.
    pub fn span(&self) -> f32 {
        (self.end.x - self.start.x).abs()
    }
}

/// Partition a `size.x × size.y` screen into `count` equal horizontal bands,
/// bottom to top. Even lanes run left→right, odd lanes right→left.
/// `count == 0` yields no lanes.
pub fn build_lanes(size: Vec2, count: usize) -> Vec<Lane> {
    if count == 0 {
        return Vec::new();
    }
    let band = size.y / count as f32;
    let half_w = size.x / 2.0;
    let bottom = -size.y / 2.0;

    (0..count)
        .map(|i| {
            let y = bottom + band * (i as f32 + 0.5);
            let dir = if i % 2 == 0 { 1.0 } else { -1.0 };
            Lane {
                start: Vec2::new(-half_w * dir, y),
                end: Vec2::new(half_w * dir, y),
                direction: Vec2::new(dir, 0.0),
            }
        })
        .collect()
}
