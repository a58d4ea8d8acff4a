use std::{
    collections::HashMap,
    fmt::Debug,
    fs,
    hash::Hash,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use tracing::info;

const SUPPORTED_MANIFEST_VERSION: u32 = 1;

/// Images referenced by the manifest's `[sprites]` table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteKey {
    /// Player character, facing right.
    Character,
    /// Platform plank, stretched to each platform's width.
    Platform,
    /// Horizontal strip of enemy animation frames.
    EnemySheet,
    /// Full-screen menu backdrop.
    MenuBackground,
    /// Full-screen game-over backdrop.
    GameOverBackground,
    /// Playfield backdrop for low scores.
    DayBackground,
    /// Playfield backdrop for medium scores.
    EveningBackground,
    /// Playfield backdrop for high scores.
    NightBackground,
    /// Menu start button.
    StartButton,
    /// Menu quit button.
    QuitButton,
    /// Game-over restart button.
    RestartButton,
}

impl SpriteKey {
    /// Every sprite key in canonical load order.
    pub const ALL: [SpriteKey; 11] = [
        SpriteKey::Character,
        SpriteKey::Platform,
        SpriteKey::EnemySheet,
        SpriteKey::MenuBackground,
        SpriteKey::GameOverBackground,
        SpriteKey::DayBackground,
        SpriteKey::EveningBackground,
        SpriteKey::NightBackground,
        SpriteKey::StartButton,
        SpriteKey::QuitButton,
        SpriteKey::RestartButton,
    ];
}

/// Audio files referenced by the manifest's `[sounds]` table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundKey {
    /// Looping background music.
    Music,
    /// Played when the player bounces off a platform.
    Jump,
    /// Played when the player dies.
    Death,
}

impl SoundKey {
    /// Every sound key in canonical load order.
    pub const ALL: [SoundKey; 3] = [SoundKey::Music, SoundKey::Jump, SoundKey::Death];
}

trait ManifestKey: Copy + Debug + Eq + Hash + 'static {
    const SECTION: &'static str;

    fn all() -> &'static [Self];

    fn parse(name: &str) -> Option<Self>;
}

impl ManifestKey for SpriteKey {
    const SECTION: &'static str = "sprites";

    fn all() -> &'static [Self] {
        &Self::ALL
    }

    fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|key| format!("{key:?}") == name)
    }
}

impl ManifestKey for SoundKey {
    const SECTION: &'static str = "sounds";

    fn all() -> &'static [Self] {
        &Self::ALL
    }

    fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|key| format!("{key:?}") == name)
    }
}

/// Resolved asset locations, one per key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetManifest {
    // One entry per key, in declaration order.
    sprites: Vec<(SpriteKey, PathBuf)>,
    sounds: Vec<(SoundKey, PathBuf)>,
}

impl AssetManifest {
    /// Returns the default manifest path relative to the working directory.
    #[must_use]
    pub fn default_path() -> PathBuf {
        PathBuf::from("assets/manifest.toml")
    }

    /// Reads the manifest at `path` and verifies that every referenced file exists.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_probe(path, Path::is_file)
    }

    fn load_with_probe(path: impl AsRef<Path>, exists: impl Fn(&Path) -> bool) -> Result<Self> {
        let manifest_path = path.as_ref();
        let contents = fs::read_to_string(manifest_path).with_context(|| {
            format!(
                "failed to read asset manifest at {}",
                manifest_path.display()
            )
        })?;
        let base = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let manifest = parse_manifest(&contents, &base)?;

        for path in manifest.paths() {
            if !exists(path) {
                bail!("asset file {} does not exist", path.display());
            }
        }

        info!(
            manifest = %manifest_path.display(),
            sprites = manifest.sprites.len(),
            sounds = manifest.sounds.len(),
            "asset manifest loaded"
        );
        Ok(manifest)
    }

    /// Location of the image registered for `key`.
    #[must_use]
    pub fn sprite(&self, key: SpriteKey) -> &Path {
        &self.sprites[key as usize].1
    }

    /// Location of the audio file registered for `key`.
    #[must_use]
    pub fn sound(&self, key: SoundKey) -> &Path {
        &self.sounds[key as usize].1
    }

    /// Sprite entries in canonical order.
    pub fn sprites(&self) -> impl Iterator<Item = (SpriteKey, &Path)> {
        self.sprites.iter().map(|(key, path)| (*key, path.as_path()))
    }

    /// Sound entries in canonical order.
    pub fn sounds(&self) -> impl Iterator<Item = (SoundKey, &Path)> {
        self.sounds.iter().map(|(key, path)| (*key, path.as_path()))
    }

    fn paths(&self) -> impl Iterator<Item = &Path> {
        self.sprites()
            .map(|(_, path)| path)
            .chain(self.sounds().map(|(_, path)| path))
    }
}

#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    version: u32,
    sprites: HashMap<String, String>,
    sounds: HashMap<String, String>,
}

fn parse_manifest(contents: &str, base_path: &Path) -> Result<AssetManifest> {
    let manifest: Manifest =
        toml::from_str(contents).context("failed to parse asset manifest toml contents")?;
    if manifest.version != SUPPORTED_MANIFEST_VERSION {
        bail!(
            "unsupported asset manifest version {}; expected {}",
            manifest.version,
            SUPPORTED_MANIFEST_VERSION
        );
    }

    Ok(AssetManifest {
        sprites: resolve_section(manifest.sprites, base_path)?,
        sounds: resolve_section(manifest.sounds, base_path)?,
    })
}

fn resolve_section<K: ManifestKey>(
    entries: HashMap<String, String>,
    base_path: &Path,
) -> Result<Vec<(K, PathBuf)>> {
    let mut resolved = HashMap::new();
    for (name, relative_path) in entries {
        let Some(key) = K::parse(&name) else {
            bail!("unknown {} key `{name}` in asset manifest", K::SECTION);
        };
        if resolved.insert(key, base_path.join(relative_path)).is_some() {
            bail!("asset manifest contains duplicate entry for {key:?}");
        }
    }

    let mut ordered = Vec::with_capacity(K::all().len());
    for &key in K::all() {
        let Some(path) = resolved.remove(&key) else {
            bail!("asset manifest [{}] missing entry for {key:?}", K::SECTION);
        };
        ordered.push((key, path));
    }

    Ok(ordered)
}
