use std::{collections::HashMap, path::Path};

use anyhow::{bail, Context, Result};
use jumpy_assets::{sprite_pixels, AssetManifest, SpriteKey};
use jumpy_core::Rect;
use macroquad::{
    color::WHITE,
    math::{Rect as MacroquadRect, Vec2 as MacroquadVec2},
    texture::{self, DrawTextureParams, FilterMode, Texture2D},
};
use tracing::info;

/// Region of a texture and how to place it on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Blit {
    pub(crate) dest: Rect,
    pub(crate) source: Option<Rect>,
    pub(crate) flip_x: bool,
}

impl Blit {
    pub(crate) const fn to(dest: Rect) -> Self {
        Self {
            dest,
            source: None,
            flip_x: false,
        }
    }

    pub(crate) fn from_region(mut self, source: Rect) -> Self {
        self.source = Some(source);
        self
    }

    pub(crate) fn flipped(mut self, flip_x: bool) -> Self {
        self.flip_x = flip_x;
        self
    }
}

/// Cache of textures loaded from the asset manifest.
#[derive(Debug)]
pub(crate) struct SpriteAtlas {
    textures: HashMap<SpriteKey, Texture2D>,
}

impl SpriteAtlas {
    /// Loads every sprite listed in the manifest. Requires a live window.
    pub(crate) fn from_manifest(manifest: &AssetManifest) -> Result<Self> {
        let atlas = Self::from_entries(manifest.sprites(), &mut default_loader)?;
        info!(textures = atlas.textures.len(), "sprite atlas ready");
        Ok(atlas)
    }

    pub(crate) fn draw(&self, key: SpriteKey, blit: Blit) -> Result<()> {
        let texture = *self
            .textures
            .get(&key)
            .with_context(|| format!("sprite {key:?} missing from atlas"))?;

        let params = DrawTextureParams {
            dest_size: Some(MacroquadVec2::new(blit.dest.width(), blit.dest.height())),
            source: blit.source.map(to_macroquad_rect),
            flip_x: blit.flip_x,
            ..DrawTextureParams::default()
        };
        texture::draw_texture_ex(texture, blit.dest.left(), blit.dest.top(), WHITE, params);

        Ok(())
    }

    fn from_entries<'a>(
        entries: impl IntoIterator<Item = (SpriteKey, &'a Path)>,
        loader: &mut impl FnMut(SpriteKey, &Path) -> Result<Texture2D>,
    ) -> Result<Self> {
        let mut textures = HashMap::new();
        for (key, path) in entries {
            let texture = loader(key, path).with_context(|| {
                format!("failed to load sprite {key:?} from {}", path.display())
            })?;
            if textures.insert(key, texture).is_some() {
                bail!("duplicate sprite entry for {key:?}");
            }
        }
        Ok(Self { textures })
    }
}

fn default_loader(key: SpriteKey, path: &Path) -> Result<Texture2D> {
    let image = sprite_pixels(key, path)?;
    let width = texture_extent(image.width())?;
    let height = texture_extent(image.height())?;
    let texture = Texture2D::from_rgba8(width, height, image.as_raw());
    texture.set_filter(FilterMode::Nearest);
    Ok(texture)
}

fn texture_extent(pixels: u32) -> Result<u16> {
    u16::try_from(pixels).with_context(|| format!("sprite dimension {pixels} exceeds 65535"))
}

fn to_macroquad_rect(rect: Rect) -> MacroquadRect {
    MacroquadRect::new(rect.left(), rect.top(), rect.width(), rect.height())
}
