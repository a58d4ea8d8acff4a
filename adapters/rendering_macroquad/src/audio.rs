//! Sound playback. Real playback needs the `audio` feature, which pulls in
//! macroquad's native audio stack; without it cues are only logged.

use anyhow::Result;
use jumpy_assets::AssetManifest;
use jumpy_core::Sound;

#[cfg(feature = "audio")]
pub(crate) use self::enabled::Audio;

#[cfg(not(feature = "audio"))]
pub(crate) use self::disabled::Audio;

#[cfg(feature = "audio")]
mod enabled {
    use std::fs;

    use anyhow::{anyhow, Context, Result};
    use jumpy_assets::{AssetManifest, SoundKey};
    use jumpy_core::Sound;
    use macroquad::audio::{self, PlaySoundParams, Sound as Clip};
    use tracing::info;

    #[derive(Debug)]
    pub(crate) struct Audio {
        music: Clip,
        jump: Clip,
        death: Clip,
    }

    impl Audio {
        pub(crate) async fn load(manifest: &AssetManifest) -> Result<Self> {
            let audio = Self {
                music: load_clip(manifest, SoundKey::Music).await?,
                jump: load_clip(manifest, SoundKey::Jump).await?,
                death: load_clip(manifest, SoundKey::Death).await?,
            };
            info!("audio ready");
            Ok(audio)
        }

        pub(crate) fn start_music(&self) {
            audio::play_sound(
                self.music,
                PlaySoundParams {
                    looped: true,
                    volume: 1.0,
                },
            );
        }

        pub(crate) fn play(&self, sound: Sound) {
            let clip = match sound {
                Sound::Jump => self.jump,
                Sound::Death => self.death,
            };
            audio::play_sound_once(clip);
        }
    }

    async fn load_clip(manifest: &AssetManifest, key: SoundKey) -> Result<Clip> {
        let path = manifest.sound(key);
        let bytes = fs::read(path)
            .with_context(|| format!("failed to read sound {key:?} at {}", path.display()))?;
        audio::load_sound_from_bytes(&bytes)
            .await
            .map_err(|error| anyhow!("failed to decode sound {key:?}: {error:?}"))
    }
}

#[cfg(not(feature = "audio"))]
mod disabled {
    use anyhow::Result;
    use jumpy_assets::AssetManifest;
    use jumpy_core::Sound;
    use tracing::{debug, info};

    #[derive(Debug)]
    pub(crate) struct Audio;

    impl Audio {
        pub(crate) async fn load(_manifest: &AssetManifest) -> Result<Self> {
            info!("built without the `audio` feature; sound cues are logged only");
            Ok(Self)
        }

        pub(crate) fn start_music(&self) {
            debug!("music cue");
        }

        pub(crate) fn play(&self, sound: Sound) {
            debug!(?sound, "sound cue");
        }
    }
}

/// Plays every queued cue and empties the queue.
pub(crate) fn drain(audio: &Audio, cues: &mut Vec<Sound>) {
    for sound in cues.drain(..) {
        audio.play(sound);
    }
}

/// Loads the audio stack and starts the background music loop.
pub(crate) async fn start(manifest: &AssetManifest) -> Result<Audio> {
    let audio = Audio::load(manifest).await?;
    audio.start_music();
    Ok(audio)
}
