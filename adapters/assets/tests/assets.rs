use std::{fs, path::Path};

use image::{Rgba, RgbaImage};
use jumpy_assets::{
    sprite_masks, sprite_pixels, AssetManifest, SoundKey, SpriteKey, ENEMY_FRAME_SOURCE_SIZE,
};
use jumpy_core::{ENEMY_FRAME_COUNT, ENEMY_SIZE, PLAYER_SIZE};
use tempfile::tempdir;

const MANIFEST: &str = r#"
version = 1

[sprites]
Character = "sprites/character.png"
Platform = "sprites/wood.png"
EnemySheet = "sprites/bird.png"
MenuBackground = "backgrounds/menu.png"
GameOverBackground = "backgrounds/gameover.png"
DayBackground = "backgrounds/day.png"
EveningBackground = "backgrounds/evening.png"
NightBackground = "backgrounds/night.png"
StartButton = "buttons/start.png"
QuitButton = "buttons/exit.png"
RestartButton = "buttons/restart.png"

[sounds]
Music = "audio/bgm.ogg"
Jump = "audio/jump.wav"
Death = "audio/death.wav"
"#;

fn write_png(path: &Path, image: &RgbaImage) {
    fs::create_dir_all(path.parent().expect("asset has a parent")).expect("create dir");
    image.save(path).expect("write png");
}

fn write_assets(root: &Path) {
    fs::write(root.join("manifest.toml"), MANIFEST).expect("write manifest");

    let filler = RgbaImage::from_pixel(4, 4, Rgba([10, 120, 200, 255]));
    for name in [
        "sprites/wood.png",
        "backgrounds/menu.png",
        "backgrounds/gameover.png",
        "backgrounds/day.png",
        "backgrounds/evening.png",
        "backgrounds/night.png",
        "buttons/start.png",
        "buttons/exit.png",
        "buttons/restart.png",
    ] {
        write_png(&root.join(name), &filler);
    }

    let character = RgbaImage::from_fn(90, 90, |x, _| {
        if x < 45 {
            Rgba([255, 200, 0, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    });
    write_png(&root.join("sprites/character.png"), &character);

    let sheet_width = ENEMY_FRAME_SOURCE_SIZE * ENEMY_FRAME_COUNT as u32;
    let sheet = RgbaImage::from_fn(sheet_width, ENEMY_FRAME_SOURCE_SIZE, |x, y| {
        let local_x = x % ENEMY_FRAME_SOURCE_SIZE;
        if (8..24).contains(&local_x) && (8..24).contains(&y) {
            Rgba([180, 30, 30, 255])
        } else {
            Rgba([0, 0, 0, 255])
        }
    });
    write_png(&root.join("sprites/bird.png"), &sheet);

    fs::create_dir_all(root.join("audio")).expect("create audio dir");
    for name in ["audio/bgm.ogg", "audio/jump.wav", "audio/death.wav"] {
        fs::write(root.join(name), b"RIFF").expect("write sound");
    }
}

#[test]
fn complete_asset_directory_loads() {
    let dir = tempdir().expect("temp dir");
    write_assets(dir.path());

    let manifest = AssetManifest::load(dir.path().join("manifest.toml")).expect("manifest loads");

    assert_eq!(
        manifest.sprite(SpriteKey::EnemySheet),
        dir.path().join("sprites/bird.png")
    );
    assert_eq!(
        manifest.sound(SoundKey::Music),
        dir.path().join("audio/bgm.ogg")
    );
}

#[test]
fn missing_asset_file_is_fatal() {
    let dir = tempdir().expect("temp dir");
    write_assets(dir.path());
    fs::remove_file(dir.path().join("audio/jump.wav")).expect("remove sound");

    let error = AssetManifest::load(dir.path().join("manifest.toml")).expect_err("jump is gone");

    assert!(error.to_string().contains("jump.wav"), "{error}");
}

#[test]
fn missing_manifest_is_fatal() {
    let dir = tempdir().expect("temp dir");

    assert!(AssetManifest::load(dir.path().join("manifest.toml")).is_err());
}

#[test]
fn masks_follow_sprite_opacity() {
    let dir = tempdir().expect("temp dir");
    write_assets(dir.path());
    let manifest = AssetManifest::load(dir.path().join("manifest.toml")).expect("manifest loads");

    let masks = sprite_masks(&manifest).expect("masks extract");

    let player = masks.player();
    assert_eq!(player.width(), PLAYER_SIZE as u32);
    assert!(player.is_set(0, 20));
    assert!(!player.is_set(44, 20));
    assert!(masks.player_mirrored().is_set(44, 20));

    assert_eq!(masks.enemy_frame_count(), ENEMY_FRAME_COUNT);
    let frame = masks.enemy_frame(3);
    assert_eq!(frame.width(), ENEMY_SIZE as u32);
    assert!(frame.is_set(24, 24), "red body is opaque");
    assert!(!frame.is_set(1, 1), "black background is keyed out");
}

#[test]
fn enemy_sheet_pixels_are_colour_keyed() {
    let dir = tempdir().expect("temp dir");
    write_assets(dir.path());
    let manifest = AssetManifest::load(dir.path().join("manifest.toml")).expect("manifest loads");

    let sheet = sprite_pixels(SpriteKey::EnemySheet, manifest.sprite(SpriteKey::EnemySheet))
        .expect("sheet decodes");
    assert_eq!(sheet.get_pixel(1, 1).0, [0, 0, 0, 0]);
    assert_eq!(sheet.get_pixel(12, 12).0, [180, 30, 30, 255]);

    let platform = sprite_pixels(SpriteKey::Platform, manifest.sprite(SpriteKey::Platform))
        .expect("platform decodes");
    assert_eq!(platform.get_pixel(0, 0).0, [10, 120, 200, 255]);
}

#[test]
fn corrupt_character_image_is_reported() {
    let dir = tempdir().expect("temp dir");
    write_assets(dir.path());
    fs::write(dir.path().join("sprites/character.png"), b"not a png").expect("overwrite");
    let manifest = AssetManifest::load(dir.path().join("manifest.toml")).expect("manifest loads");

    let error = sprite_masks(&manifest).expect_err("character cannot be decoded");

    assert!(format!("{error:#}").contains("Character"), "{error:#}");
}
