use std::path::Path;

use anyhow::{bail, Context, Result};
use image::{imageops, imageops::FilterType, Rgba, RgbaImage};
use jumpy_core::{CollisionMask, SpriteMasks, ENEMY_FRAME_COUNT, ENEMY_SIZE, PLAYER_SIZE};
use tracing::debug;

use crate::{AssetManifest, SpriteKey};

/// Side length of a single frame in the unscaled enemy sheet.
pub const ENEMY_FRAME_SOURCE_SIZE: u32 = 32;

const OPAQUE_ALPHA: u8 = 127;

/// Builds the collision masks for the player and every enemy frame from the
/// images named by `manifest`.
pub fn sprite_masks(manifest: &AssetManifest) -> Result<SpriteMasks> {
    let character = open_rgba(manifest, SpriteKey::Character)?;
    let sheet = open_rgba(manifest, SpriteKey::EnemySheet)?;

    let player = mask_from_image(&character, PLAYER_SIZE as u32, PLAYER_SIZE as u32, false);
    let frames = enemy_frame_masks(&sheet)?;
    debug!(
        player_pixels = player.count(),
        enemy_frames = frames.len(),
        "collision masks extracted"
    );

    SpriteMasks::new(player, frames).context("enemy sheet produced no frames")
}

/// Scales `image` to `width` x `height` and marks every pixel with alpha
/// above 127 as opaque. With `black_key` set, pure black pixels count as
/// transparent.
#[must_use]
pub fn mask_from_image(
    image: &RgbaImage,
    width: u32,
    height: u32,
    black_key: bool,
) -> CollisionMask {
    let scaled = imageops::resize(image, width, height, FilterType::Nearest);
    CollisionMask::from_fn(width, height, |x, y| {
        let pixel = scaled.get_pixel(x, y);
        pixel.0[3] > OPAQUE_ALPHA && !(black_key && is_black(pixel))
    })
}

/// Whether `key` is drawn with pure black treated as transparent.
#[must_use]
pub const fn uses_black_key(key: SpriteKey) -> bool {
    matches!(key, SpriteKey::EnemySheet)
}

/// Makes every pure black pixel of `image` fully transparent.
pub fn apply_black_key(image: &mut RgbaImage) {
    for pixel in image.pixels_mut().filter(|pixel| is_black(pixel)) {
        pixel.0[3] = 0;
    }
}

/// Decodes the sprite stored at `path` into RGBA pixels, with the black
/// colour key applied for keyed sprites.
pub fn sprite_pixels(key: SpriteKey, path: &Path) -> Result<RgbaImage> {
    let mut image = image::open(path)
        .with_context(|| format!("failed to decode sprite {key:?} at {}", path.display()))?
        .to_rgba8();
    if uses_black_key(key) {
        apply_black_key(&mut image);
    }
    Ok(image)
}

fn is_black(pixel: &Rgba<u8>) -> bool {
    let [red, green, blue, _] = pixel.0;
    red == 0 && green == 0 && blue == 0
}

/// Cuts the enemy sheet into its animation frames and scales each to the
/// on-screen enemy size.
pub fn enemy_frame_masks(sheet: &RgbaImage) -> Result<Vec<CollisionMask>> {
    let required_width = ENEMY_FRAME_SOURCE_SIZE * ENEMY_FRAME_COUNT as u32;
    if sheet.width() < required_width || sheet.height() < ENEMY_FRAME_SOURCE_SIZE {
        bail!(
            "enemy sheet is {}x{}; expected at least {required_width}x{ENEMY_FRAME_SOURCE_SIZE}",
            sheet.width(),
            sheet.height()
        );
    }

    let size = ENEMY_SIZE as u32;
    Ok((0..ENEMY_FRAME_COUNT as u32)
        .map(|frame| {
            let cell = imageops::crop_imm(
                sheet,
                frame * ENEMY_FRAME_SOURCE_SIZE,
                0,
                ENEMY_FRAME_SOURCE_SIZE,
                ENEMY_FRAME_SOURCE_SIZE,
            )
            .to_image();
            mask_from_image(&cell, size, size, true)
        })
        .collect())
}

fn open_rgba(manifest: &AssetManifest, key: SpriteKey) -> Result<RgbaImage> {
    sprite_pixels(key, manifest.sprite(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alpha_threshold_is_exclusive() {
        let mut image = RgbaImage::new(2, 1);
        image.put_pixel(0, 0, Rgba([255, 255, 255, 127]));
        image.put_pixel(1, 0, Rgba([255, 255, 255, 128]));

        let mask = mask_from_image(&image, 2, 1, false);

        assert!(!mask.is_set(0, 0));
        assert!(mask.is_set(1, 0));
    }

    #[test]
    fn black_key_clears_black_pixels_only_when_requested() {
        let image = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 255]));

        assert!(mask_from_image(&image, 1, 1, false).is_set(0, 0));
        assert!(!mask_from_image(&image, 1, 1, true).is_set(0, 0));
    }

    #[test]
    fn black_key_only_clears_pure_black() {
        let mut image = RgbaImage::new(3, 1);
        image.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
        image.put_pixel(1, 0, Rgba([1, 0, 0, 255]));
        image.put_pixel(2, 0, Rgba([90, 90, 90, 200]));

        apply_black_key(&mut image);

        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0, 0]);
        assert_eq!(image.get_pixel(1, 0).0, [1, 0, 0, 255]);
        assert_eq!(image.get_pixel(2, 0).0, [90, 90, 90, 200]);
    }

    #[test]
    fn only_enemy_sheet_is_keyed() {
        let keyed: Vec<_> = SpriteKey::ALL
            .into_iter()
            .filter(|key| uses_black_key(*key))
            .collect();
        assert_eq!(keyed, vec![SpriteKey::EnemySheet]);
    }

    #[test]
    fn nearest_scaling_preserves_halves() {
        let mut image = RgbaImage::new(2, 2);
        for y in 0..2 {
            image.put_pixel(0, y, Rgba([200, 10, 10, 255]));
        }

        let mask = mask_from_image(&image, 4, 4, false);

        assert_eq!(mask.count(), 8);
        assert!(mask.is_set(0, 3));
        assert!(!mask.is_set(3, 0));
    }

    #[test]
    fn undersized_sheet_is_rejected() {
        let sheet = RgbaImage::new(ENEMY_FRAME_SOURCE_SIZE * 4, ENEMY_FRAME_SOURCE_SIZE);
        assert!(enemy_frame_masks(&sheet).is_err());
    }
}
