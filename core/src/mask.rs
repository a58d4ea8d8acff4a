//! Pixel-accurate collision masks.

use crate::{ENEMY_FRAME_COUNT, ENEMY_SIZE, PLAYER_SIZE};

/// Opaque-pixel bitmap used for precise overlap checks.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CollisionMask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl CollisionMask {
    /// Builds a mask by asking `opaque` about every pixel in row-major order.
    #[must_use]
    pub fn from_fn(width: u32, height: u32, mut opaque: impl FnMut(u32, u32) -> bool) -> Self {
        let mut bits = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                bits.push(opaque(x, y));
            }
        }
        Self {
            width,
            height,
            bits,
        }
    }

    /// Mask with every pixel set.
    #[must_use]
    pub fn filled(width: u32, height: u32) -> Self {
        Self::from_fn(width, height, |_, _| true)
    }

    /// Mask covering the ellipse inscribed in the `width` x `height` box.
    #[must_use]
    pub fn ellipse(width: u32, height: u32) -> Self {
        let radius_x = width as f32 / 2.0;
        let radius_y = height as f32 / 2.0;
        Self::from_fn(width, height, |x, y| {
            let dx = (x as f32 + 0.5 - radius_x) / radius_x;
            let dy = (y as f32 + 0.5 - radius_y) / radius_y;
            dx * dx + dy * dy <= 1.0
        })
    }

    /// Width of the mask in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the mask in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the pixel is opaque. Pixels outside the mask are clear.
    #[must_use]
    pub fn is_set(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return false;
        }
        let index = y as usize * self.width as usize + x as usize;
        self.bits.get(index).copied().unwrap_or(false)
    }

    /// Number of opaque pixels.
    #[must_use]
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|bit| **bit).count()
    }

    /// Returns the mask flipped along its vertical axis.
    #[must_use]
    pub fn mirrored(&self) -> Self {
        let width = i64::from(self.width);
        Self::from_fn(self.width, self.height, |x, y| {
            self.is_set(width - 1 - i64::from(x), i64::from(y))
        })
    }

    /// Reports whether any opaque pixel of `other`, placed with its origin at
    /// `(offset_x, offset_y)` relative to this mask's origin, coincides with
    /// an opaque pixel of this mask.
    #[must_use]
    pub fn overlaps(&self, other: &CollisionMask, offset_x: i64, offset_y: i64) -> bool {
        let start_x = offset_x.max(0);
        let start_y = offset_y.max(0);
        let end_x = (offset_x + i64::from(other.width)).min(i64::from(self.width));
        let end_y = (offset_y + i64::from(other.height)).min(i64::from(self.height));

        (start_y..end_y).any(|y| {
            (start_x..end_x)
                .any(|x| self.is_set(x, y) && other.is_set(x - offset_x, y - offset_y))
        })
    }
}

/// Failures raised while assembling [`SpriteMasks`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SpriteMaskError {
    /// Enemies need at least one animation frame.
    #[error("enemy animation requires at least one frame mask")]
    NoEnemyFrames,
}

/// Collision masks for every sprite that takes part in death checks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpriteMasks {
    player: CollisionMask,
    player_mirrored: CollisionMask,
    enemy_frames: Vec<CollisionMask>,
}

impl SpriteMasks {
    /// Bundles the player mask (facing right) with one mask per enemy frame.
    pub fn new(
        player: CollisionMask,
        enemy_frames: Vec<CollisionMask>,
    ) -> Result<Self, SpriteMaskError> {
        if enemy_frames.is_empty() {
            return Err(SpriteMaskError::NoEnemyFrames);
        }
        Ok(Self {
            player_mirrored: player.mirrored(),
            player,
            enemy_frames,
        })
    }

    /// Player mask for a sprite facing right.
    #[must_use]
    pub const fn player(&self) -> &CollisionMask {
        &self.player
    }

    /// Player mask for a sprite facing left.
    #[must_use]
    pub const fn player_mirrored(&self) -> &CollisionMask {
        &self.player_mirrored
    }

    /// Number of enemy animation frames.
    #[must_use]
    pub fn enemy_frame_count(&self) -> usize {
        self.enemy_frames.len()
    }

    /// Mask of the provided enemy frame, wrapping out-of-range indices.
    #[must_use]
    pub fn enemy_frame(&self, frame: usize) -> &CollisionMask {
        &self.enemy_frames[frame % self.enemy_frames.len()]
    }
}

impl Default for SpriteMasks {
    /// Elliptical stand-ins sized like the real sprites, used when no artwork is loaded.
    fn default() -> Self {
        let player = CollisionMask::ellipse(PLAYER_SIZE as u32, PLAYER_SIZE as u32);
        let frame = CollisionMask::ellipse(ENEMY_SIZE as u32, ENEMY_SIZE as u32);
        Self {
            player_mirrored: player.mirrored(),
            player,
            enemy_frames: vec![frame; ENEMY_FRAME_COUNT],
        }
    }
}
