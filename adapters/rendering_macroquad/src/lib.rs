#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Jumpy.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! Playback is therefore behind this crate's `audio` feature, which enables
//! `macroquad/audio`. Without it sound cues are logged instead of played.
//!
//! The simulation runs on a fixed 60 Hz step regardless of the display's
//! refresh rate; see [`TickScheduler`].

mod audio;
mod textures;

use std::{mem, sync::mpsc};

use anyhow::Result;
use glam::Vec2;
use jumpy_assets::{AssetManifest, SpriteKey, ENEMY_FRAME_SOURCE_SIZE};
use jumpy_core::{
    Backdrop, ButtonKind, Flow, FrameInput, GameState, HorizontalDirection, MovementInput, Rect,
    UiEvent, FRAMES_PER_SECOND, SCREEN_HEIGHT, SCREEN_WIDTH,
};
use jumpy_rendering::{Color, Label, Presentation, RenderingBackend, Scene};
use macroquad::input::{
    is_key_down, is_mouse_button_pressed, is_quit_requested, mouse_position, prevent_quit,
    KeyCode, MouseButton,
};
use tracing::error;

use self::textures::{Blit, SpriteAtlas};

/// Most simulation ticks run in a single rendered frame before the backlog is dropped.
pub const MAX_TICKS_PER_FRAME: u32 = 4;

/// Converts wall-clock frame times into fixed simulation ticks.
///
/// Interface events queued between ticks are held back and delivered with
/// the next tick so no click is lost on frames that run zero ticks.
#[doc(hidden)]
#[derive(Clone, Debug, Default)]
pub struct TickScheduler {
    accumulator: f32,
    pending: Vec<UiEvent>,
}

impl TickScheduler {
    /// Duration of one simulation tick in seconds.
    pub const STEP_SECONDS: f32 = 1.0 / FRAMES_PER_SECOND as f32;

    /// Holds interface events until the next tick.
    pub fn queue(&mut self, events: impl IntoIterator<Item = UiEvent>) {
        self.pending.extend(events);
    }

    /// Advances the clock by `elapsed` seconds and returns one input per tick
    /// that is due. The first tick carries every queued interface event.
    pub fn advance(&mut self, elapsed: f32, movement: MovementInput) -> Vec<FrameInput> {
        self.accumulator += elapsed.max(0.0);

        let mut ticks = 0;
        while self.accumulator >= Self::STEP_SECONDS && ticks < MAX_TICKS_PER_FRAME {
            self.accumulator -= Self::STEP_SECONDS;
            ticks += 1;
        }
        if ticks == MAX_TICKS_PER_FRAME {
            self.accumulator = self.accumulator.min(Self::STEP_SECONDS);
        }

        (0..ticks)
            .map(|tick| FrameInput {
                movement,
                ui_events: if tick == 0 {
                    mem::take(&mut self.pending)
                } else {
                    Vec::new()
                },
            })
            .collect()
    }

    /// Number of interface events waiting for the next tick.
    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.pending.len()
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug)]
pub struct MacroquadBackend {
    manifest: AssetManifest,
    swap_interval: Option<i32>,
}

impl MacroquadBackend {
    /// Returns a backend that draws the sprites named by `manifest`.
    #[must_use]
    pub fn new(manifest: AssetManifest) -> Self {
        Self {
            manifest,
            swap_interval: None,
        }
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(FrameInput, &mut Scene) -> Flow + 'static,
    {
        let Self {
            manifest,
            swap_interval,
        } = self;

        let Presentation {
            window_title,
            window_size,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: window_size.x as i32,
            window_height: window_size.y as i32,
            window_resizable: false,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        let (init_sender, init_receiver) = mpsc::channel::<Result<()>>();

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            prevent_quit();

            let atlas = match SpriteAtlas::from_manifest(&manifest) {
                Ok(atlas) => atlas,
                Err(error) => {
                    let _ = init_sender.send(Err(error));
                    return;
                }
            };
            let audio = match audio::start(&manifest).await {
                Ok(audio) => audio,
                Err(error) => {
                    let _ = init_sender.send(Err(error));
                    return;
                }
            };
            let _ = init_sender.send(Ok(()));

            let background = to_macroquad_color(clear_color);
            let mut scheduler = TickScheduler::default();

            loop {
                scheduler.queue(poll_ui_events());
                let movement = poll_movement();
                let elapsed = macroquad::time::get_frame_time();

                let mut flow = Flow::Continue;
                for input in scheduler.advance(elapsed, movement) {
                    flow = update_scene(input, &mut scene);
                    audio::drain(&audio, &mut scene.sounds);
                    if flow == Flow::Quit {
                        break;
                    }
                }
                if flow == Flow::Quit {
                    break;
                }

                macroquad::window::clear_background(background);
                if let Err(error) = draw_scene(&scene, &atlas) {
                    error!(%error, "failed to draw frame");
                    break;
                }

                macroquad::window::next_frame().await;
            }
        });

        init_receiver.recv().unwrap_or_else(|_| Ok(()))?;

        Ok(())
    }
}

fn poll_movement() -> MovementInput {
    MovementInput {
        left: is_key_down(KeyCode::Left) || is_key_down(KeyCode::A),
        right: is_key_down(KeyCode::Right) || is_key_down(KeyCode::D),
    }
}

fn poll_ui_events() -> Vec<UiEvent> {
    let mut events = Vec::new();
    if is_mouse_button_pressed(MouseButton::Left) {
        let (x, y) = mouse_position();
        events.push(UiEvent::PrimaryClick { x, y });
    }
    if is_quit_requested() {
        events.push(UiEvent::Quit);
    }
    events
}

fn draw_scene(scene: &Scene, atlas: &SpriteAtlas) -> Result<()> {
    let screen = Rect::new(0.0, 0.0, SCREEN_WIDTH, SCREEN_HEIGHT);
    match scene.state {
        GameState::Menu => atlas.draw(SpriteKey::MenuBackground, Blit::to(screen))?,
        GameState::GameOver => atlas.draw(SpriteKey::GameOverBackground, Blit::to(screen))?,
        GameState::Playing => draw_playfield(scene, atlas)?,
    }

    for label in scene.labels() {
        draw_label(&label);
    }

    for button in scene.buttons() {
        atlas.draw(button_sprite(button.kind), Blit::to(button.rect))?;
    }

    Ok(())
}

fn draw_playfield(scene: &Scene, atlas: &SpriteAtlas) -> Result<()> {
    let backdrop = backdrop_sprite(scene.backdrop);
    for top in scene.backdrop_tops() {
        let dest = Rect::new(0.0, top, SCREEN_WIDTH, SCREEN_HEIGHT);
        atlas.draw(backdrop, Blit::to(dest))?;
    }

    for platform in &scene.platforms {
        atlas.draw(SpriteKey::Platform, Blit::to(*platform))?;
    }

    for enemy in &scene.enemies {
        let blit = Blit::to(enemy.rect).from_region(enemy_frame_region(enemy.frame));
        atlas.draw(SpriteKey::EnemySheet, blit)?;
    }

    if let Some(player) = scene.player {
        let blit = Blit::to(player.rect).flipped(player.facing == HorizontalDirection::Left);
        atlas.draw(SpriteKey::Character, blit)?;
    }

    Ok(())
}

fn draw_label(label: &Label) {
    let font_size = label.size.pixels();
    let dimensions = macroquad::text::measure_text(&label.text, None, font_size as u16, 1.0);
    let origin = label_origin(label, dimensions.width, dimensions.offset_y);
    macroquad::text::draw_text(
        &label.text,
        origin.x,
        origin.y,
        font_size,
        to_macroquad_color(Color::WHITE),
    );
}

/// Text baseline position for a label whose rendered width and ascent are known.
fn label_origin(label: &Label, text_width: f32, ascent: f32) -> Vec2 {
    let x = if label.centered {
        label.anchor.x - text_width / 2.0
    } else {
        label.anchor.x
    };
    Vec2::new(x, label.anchor.y + ascent)
}

fn enemy_frame_region(frame: usize) -> Rect {
    let size = ENEMY_FRAME_SOURCE_SIZE as f32;
    Rect::new(frame as f32 * size, 0.0, size, size)
}

fn backdrop_sprite(backdrop: Backdrop) -> SpriteKey {
    match backdrop {
        Backdrop::Day => SpriteKey::DayBackground,
        Backdrop::Evening => SpriteKey::EveningBackground,
        Backdrop::Night => SpriteKey::NightBackground,
    }
}

fn button_sprite(kind: ButtonKind) -> SpriteKey {
    match kind {
        ButtonKind::Start => SpriteKey::StartButton,
        ButtonKind::Quit => SpriteKey::QuitButton,
        ButtonKind::Restart => SpriteKey::RestartButton,
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jumpy_rendering::TextSize;

    #[test]
    fn enemy_frames_are_laid_out_horizontally() {
        assert_eq!(enemy_frame_region(0), Rect::new(0.0, 0.0, 32.0, 32.0));
        assert_eq!(enemy_frame_region(3), Rect::new(96.0, 0.0, 32.0, 32.0));
    }

    #[test]
    fn every_backdrop_and_button_has_a_sprite() {
        assert_eq!(backdrop_sprite(Backdrop::Day), SpriteKey::DayBackground);
        assert_eq!(backdrop_sprite(Backdrop::Night), SpriteKey::NightBackground);
        assert_eq!(button_sprite(ButtonKind::Quit), SpriteKey::QuitButton);
        assert_eq!(button_sprite(ButtonKind::Restart), SpriteKey::RestartButton);
    }

    #[test]
    fn centred_labels_straddle_their_anchor() {
        let label = Label {
            text: "Score: 10".to_owned(),
            anchor: Vec2::new(200.0, 240.0),
            centered: true,
            size: TextSize::Large,
        };

        assert_eq!(label_origin(&label, 80.0, 20.0), Vec2::new(160.0, 260.0));

        let left = Label {
            centered: false,
            ..label
        };
        assert_eq!(label_origin(&left, 80.0, 20.0), Vec2::new(200.0, 260.0));
    }

    #[test]
    fn colors_convert_channel_for_channel() {
        let color = to_macroquad_color(Color::new(0.1, 0.2, 0.3, 0.4));
        assert_eq!((color.r, color.g, color.b, color.a), (0.1, 0.2, 0.3, 0.4));
    }
}
