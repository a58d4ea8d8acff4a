#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Asset manifest loading and collision mask extraction for Jumpy.
//!
//! The manifest is a TOML document mapping logical sprite and sound keys to
//! files relative to the manifest's directory. Every key must be present and
//! every referenced file must exist; anything else is a startup error.

mod manifest;
mod masks;

pub use self::{
    manifest::{AssetManifest, SoundKey, SpriteKey},
    masks::{
        apply_black_key, enemy_frame_masks, mask_from_image, sprite_masks, sprite_pixels,
        uses_black_key, ENEMY_FRAME_SOURCE_SIZE,
    },
};
