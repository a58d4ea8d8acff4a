#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Jumpy adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use jumpy_core::{
    buttons_for, Backdrop, Button, Flow, FrameInput, GameState, HorizontalDirection, Rect, Sound,
    SCREEN_HEIGHT, SCREEN_WIDTH,
};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Opaque white, used for all text.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Player sprite placement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerPresentation {
    /// Bounding box of the sprite in screen pixels.
    pub rect: Rect,
    /// Direction the sprite faces; left-facing sprites are mirrored.
    pub facing: HorizontalDirection,
}

/// Enemy sprite placement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyPresentation {
    /// Bounding box of the sprite in screen pixels.
    pub rect: Rect,
    /// Index into the enemy sprite sheet.
    pub frame: usize,
    /// Direction of travel. The sheet is drawn unmirrored either way.
    pub direction: HorizontalDirection,
}

/// Font sizes used by the interface, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextSize {
    /// In-game score readout.
    Small,
    /// Menu and game-over scores.
    Large,
}

impl TextSize {
    /// Point size of the font.
    #[must_use]
    pub const fn pixels(self) -> f32 {
        match self {
            Self::Small => 20.0,
            Self::Large => 28.0,
        }
    }
}

/// A line of interface text.
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    /// Text to draw.
    pub text: String,
    /// Top-left corner, or the top-centre when `centered` is set.
    pub anchor: Vec2,
    /// Whether `anchor.x` marks the horizontal centre of the text.
    pub centered: bool,
    /// Font size.
    pub size: TextSize,
}

impl Label {
    fn left_aligned(text: String, anchor: Vec2, size: TextSize) -> Self {
        Self {
            text,
            anchor,
            centered: false,
            size,
        }
    }

    fn centered(text: String, top: f32, size: TextSize) -> Self {
        Self {
            text,
            anchor: Vec2::new(SCREEN_WIDTH / 2.0, top),
            centered: true,
            size,
        }
    }
}

/// Everything a backend needs to draw one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    /// Screen currently shown.
    pub state: GameState,
    /// Playfield backdrop selected by score.
    pub backdrop: Backdrop,
    /// Vertical offset of the looping playfield backdrop.
    pub background_offset: f32,
    /// Platform boxes in insertion order.
    pub platforms: Vec<Rect>,
    /// Enemies in insertion order.
    pub enemies: Vec<EnemyPresentation>,
    /// The player, once a run has started.
    pub player: Option<PlayerPresentation>,
    /// Score of the current or last run.
    pub score: u64,
    /// Best score.
    pub highscore: u64,
    /// Sound cues raised since the previous frame, drained by the backend.
    pub sounds: Vec<Sound>,
}

impl Scene {
    /// Buttons visible on the current screen.
    #[must_use]
    pub fn buttons(&self) -> &'static [Button] {
        buttons_for(self.state)
    }

    /// Text lines shown on the current screen.
    #[must_use]
    pub fn labels(&self) -> Vec<Label> {
        let score = format!("Score: {}", self.score);
        let best = format!("Best Score: {}", self.highscore);
        match self.state {
            GameState::Menu => vec![Label::left_aligned(
                best,
                Vec2::new(SCREEN_WIDTH / 2.0 - 100.0, 270.0),
                TextSize::Large,
            )],
            GameState::Playing => vec![Label::left_aligned(
                score,
                Vec2::new(10.0, 10.0),
                TextSize::Small,
            )],
            GameState::GameOver => vec![
                Label::centered(score, 200.0, TextSize::Large),
                Label::centered(best, 240.0, TextSize::Large),
            ],
        }
    }

    /// Vertical positions of the two stacked backdrop copies that together
    /// cover the screen.
    #[must_use]
    pub fn backdrop_tops(&self) -> [f32; 2] {
        [self.background_offset, self.background_offset - SCREEN_HEIGHT]
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Window size in pixels.
    pub window_size: Vec2,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor sized to the playfield.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            window_size: Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Jumpy scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until the update closure returns
    /// [`Flow::Quit`].
    ///
    /// The closure is called once per simulation tick with the input gathered
    /// since the previous tick and may mutate the scene before it is drawn.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(FrameInput, &mut Scene) -> Flow + 'static;
}
