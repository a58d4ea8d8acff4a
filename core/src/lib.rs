#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Jumpy engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

mod mask;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub use self::mask::{CollisionMask, SpriteMaskError, SpriteMasks};

/// Title shown by adapters that open a window.
pub const WINDOW_TITLE: &str = "Jumpy";

/// Width of the playfield measured in pixels.
pub const SCREEN_WIDTH: f32 = 400.0;
/// Height of the playfield measured in pixels.
pub const SCREEN_HEIGHT: f32 = 600.0;
/// Number of simulation ticks per second.
pub const FRAMES_PER_SECOND: u32 = 60;

/// Once the player's top edge rises to this height the world starts scrolling.
pub const SCROLL_THRESHOLD: f32 = 200.0;
/// Downward acceleration applied to the player every tick.
pub const GRAVITY: f32 = 0.75;
/// Vertical velocity assigned to the player after landing on a platform.
pub const JUMP_VELOCITY: f32 = -14.0;
/// Terminal falling velocity.
pub const MAX_FALL_SPEED: f32 = 10.0;
/// Horizontal displacement per tick while a movement key is held.
pub const HORIZONTAL_SPEED: f32 = 5.0;
/// Side length of the square player sprite.
pub const PLAYER_SIZE: f32 = 45.0;

/// Upper bound on live platforms before the generator stops spawning.
pub const MAX_PLATFORMS: usize = 10;
/// Fixed height of every platform.
pub const PLATFORM_HEIGHT: f32 = 12.0;
/// Vertical position of the first ladder platform, directly below the spawn point.
pub const LADDER_BASE_Y: f32 = SCREEN_HEIGHT - 80.0;
/// Distance between the ladder base platform and the player's spawn centre.
pub const PLAYER_SPAWN_LIFT: f32 = 20.0;

/// Side length of the square enemy sprite (32 px frames scaled by 1.5).
pub const ENEMY_SIZE: f32 = 48.0;
/// Horizontal displacement of an enemy per tick.
pub const ENEMY_SPEED: f32 = 2.0;
/// Number of animation frames in the enemy sprite sheet.
pub const ENEMY_FRAME_COUNT: usize = 8;
/// An enemy advances to its next frame once its timer exceeds this many ticks.
pub const ENEMY_FRAME_HOLD: u32 = 6;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the pixel masks used for player and enemy collision checks.
    ConfigureSpriteMasks {
        /// Masks derived from the loaded sprites.
        masks: SpriteMasks,
    },
    /// Seeds the in-memory highscore, typically from the persisted record.
    ConfigureHighscore {
        /// Best score recorded by previous sessions.
        highscore: u64,
    },
    /// Resets the world and enters [`GameState::Playing`].
    ///
    /// Accepted from the menu and from the game-over screen.
    StartRun,
    /// Advances the simulation by one frame using the provided movement input.
    Tick {
        /// Movement keys held during the frame.
        input: MovementInput,
    },
    /// Requests that a platform be added to the world.
    SpawnPlatform {
        /// Left edge of the platform.
        x: f32,
        /// Top edge of the platform.
        y: f32,
        /// Width of the platform.
        width: f32,
    },
    /// Requests that an enemy be added to the world.
    SpawnEnemy {
        /// Horizontal centre of the enemy.
        center_x: f32,
        /// Vertical centre of the enemy.
        center_y: f32,
        /// Direction the enemy travels in.
        direction: HorizontalDirection,
    },
    /// Ends the current run. Ignored unless the world is playing.
    EndRun {
        /// What killed the player.
        cause: DeathCause,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Announces that the game entered a new state.
    GameStateChanged {
        /// State that became active.
        state: GameState,
    },
    /// Confirms that the world was reset and a fresh run begins.
    RunStarted,
    /// Indicates that a played frame completed.
    FrameAdvanced {
        /// Scroll delta applied to every entity during the frame.
        scroll: f32,
        /// Score after the frame.
        score: u64,
    },
    /// The player bounced off a platform.
    PlayerLanded {
        /// Top edge of the platform that was landed on.
        platform_top: f32,
    },
    /// Confirms that a platform joined the world.
    PlatformSpawned {
        /// Bounding box of the new platform.
        rect: Rect,
    },
    /// Confirms that an enemy joined the world.
    EnemySpawned {
        /// Bounding box of the new enemy.
        rect: Rect,
        /// Direction the enemy travels in.
        direction: HorizontalDirection,
    },
    /// The player died and the run is over.
    PlayerDied {
        /// What killed the player.
        cause: DeathCause,
        /// Final score of the run.
        score: u64,
    },
    /// The run beat the previous best score.
    HighscoreRaised {
        /// New best score.
        highscore: u64,
    },
}

/// Top-level screens of the game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    /// Title screen with start and quit buttons.
    #[default]
    Menu,
    /// A run is in progress.
    Playing,
    /// The run ended; the restart button is shown.
    GameOver,
}

/// Reasons a run ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathCause {
    /// The player's mask overlapped an enemy's mask.
    Enemy,
    /// The player dropped below the bottom edge of the screen.
    Fell,
}

/// Horizontal orientation shared by the player's facing and enemy travel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HorizontalDirection {
    /// Toward decreasing x.
    Left,
    /// Toward increasing x.
    #[default]
    Right,
}

impl HorizontalDirection {
    /// Unit sign of the direction along the x axis.
    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// Background theme chosen from the current score.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Backdrop {
    /// Shown for scores below 200.
    #[default]
    Day,
    /// Shown for scores below 800.
    Evening,
    /// Shown from 800 onward.
    Night,
}

impl Backdrop {
    /// Selects the backdrop that matches the provided score.
    #[must_use]
    pub const fn for_score(score: u64) -> Self {
        if score < 200 {
            Self::Day
        } else if score < 800 {
            Self::Evening
        } else {
            Self::Night
        }
    }
}

/// Axis-aligned rectangle in screen pixels. `y` grows downward.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle of the given size centred on the provided point.
    #[must_use]
    pub fn from_center(center_x: f32, center_y: f32, width: f32, height: f32) -> Self {
        Self::new(
            center_x - width / 2.0,
            center_y - height / 2.0,
            width,
            height,
        )
    }

    /// Left edge.
    #[must_use]
    pub const fn left(&self) -> f32 {
        self.x
    }

    /// Top edge.
    #[must_use]
    pub const fn top(&self) -> f32 {
        self.y
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Width of the rectangle.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height of the rectangle.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Horizontal centre.
    #[must_use]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Vertical centre.
    #[must_use]
    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Reports whether the two rectangles share interior area.
    ///
    /// Rectangles that only touch along an edge do not intersect.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Reports whether the point lies inside the rectangle.
    ///
    /// The left and top edges are inclusive, the right and bottom edges exclusive.
    #[must_use]
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.left() && x < self.right() && y >= self.top() && y < self.bottom()
    }

    /// Returns the rectangle moved by the provided offset.
    #[must_use]
    pub fn translated(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    /// Returns the rectangle moved vertically so that its bottom edge sits at `bottom`.
    #[must_use]
    pub fn with_bottom(self, bottom: f32) -> Self {
        Self {
            y: bottom - self.height,
            ..self
        }
    }
}

/// Immutable representation of the player's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot<'a> {
    /// Bounding box of the player sprite.
    pub rect: Rect,
    /// Vertical velocity; negative values point upward.
    pub velocity: f32,
    /// Direction the sprite faces.
    pub facing: HorizontalDirection,
    /// Collision mask matching the sprite's current orientation.
    pub mask: &'a CollisionMask,
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot<'a> {
    /// Bounding box of the enemy sprite.
    pub rect: Rect,
    /// Direction the enemy travels in.
    pub direction: HorizontalDirection,
    /// Index of the animation frame currently shown.
    pub frame: usize,
    /// Collision mask of the current animation frame.
    pub mask: &'a CollisionMask,
}

/// Read-only snapshot describing all live enemies in insertion order.
#[derive(Clone, Debug, Default)]
pub struct EnemyView<'a> {
    snapshots: Vec<EnemySnapshot<'a>>,
}

impl<'a> EnemyView<'a> {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<EnemySnapshot<'a>>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot<'a>> {
        self.snapshots.iter()
    }

    /// Number of captured enemies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no enemies were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Movement keys held during a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MovementInput {
    /// Left arrow or `A`.
    pub left: bool,
    /// Right arrow or `D`.
    pub right: bool,
}

impl MovementInput {
    /// Input with no keys held.
    pub const IDLE: Self = Self {
        left: false,
        right: false,
    };
    /// Input holding only the left key.
    pub const LEFT: Self = Self {
        left: true,
        right: false,
    };
    /// Input holding only the right key.
    pub const RIGHT: Self = Self {
        left: false,
        right: true,
    };
}

/// Discrete interface events queued by the input source.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UiEvent {
    /// The window was asked to close.
    Quit,
    /// The primary mouse button was pressed at the given screen position.
    PrimaryClick {
        /// Horizontal cursor position in screen pixels.
        x: f32,
        /// Vertical cursor position in screen pixels.
        y: f32,
    },
}

/// Input snapshot consumed once per frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameInput {
    /// Movement keys currently held.
    pub movement: MovementInput,
    /// Interface events received since the previous frame.
    pub ui_events: Vec<UiEvent>,
}

/// Whether the frame loop keeps running after the current frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Flow {
    /// Keep running.
    Continue,
    /// Leave the loop.
    Quit,
}

/// Interactive buttons drawn on the menu and game-over screens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ButtonKind {
    /// Starts a run from the menu.
    Start,
    /// Quits the game from the menu.
    Quit,
    /// Starts a new run from the game-over screen.
    Restart,
}

/// A clickable button and its screen region.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Button {
    /// What the button does.
    pub kind: ButtonKind,
    /// Region that reacts to clicks.
    pub rect: Rect,
}

/// Buttons on the menu, in hit-test order.
pub const MENU_BUTTONS: [Button; 2] = [
    Button {
        kind: ButtonKind::Start,
        rect: Rect::new(90.0, 370.0, 220.0, 80.0),
    },
    Button {
        kind: ButtonKind::Quit,
        rect: Rect::new(90.0, 440.0, 220.0, 80.0),
    },
];

/// Buttons on the game-over screen, in hit-test order.
pub const GAME_OVER_BUTTONS: [Button; 1] = [Button {
    kind: ButtonKind::Restart,
    rect: Rect::new(90.0, 340.0, 220.0, 80.0),
}];

/// Buttons visible while the game is in the provided state.
#[must_use]
pub fn buttons_for(state: GameState) -> &'static [Button] {
    match state {
        GameState::Menu => &MENU_BUTTONS,
        GameState::Playing => &[],
        GameState::GameOver => &GAME_OVER_BUTTONS,
    }
}

/// Returns the first button under the cursor for the provided state.
#[must_use]
pub fn hit_button(state: GameState, x: f32, y: f32) -> Option<ButtonKind> {
    buttons_for(state)
        .iter()
        .find(|button| button.rect.contains_point(x, y))
        .map(|button| button.kind)
}

/// Sound effects triggered by gameplay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sound {
    /// The player bounced off a platform.
    Jump,
    /// The player died.
    Death,
}

/// Receives sound effects requested by the simulation.
pub trait SoundSink {
    /// Plays or queues the provided sound.
    fn play(&mut self, sound: Sound);
}

impl SoundSink for Vec<Sound> {
    fn play(&mut self, sound: Sound) {
        self.push(sound);
    }
}

/// Persistent storage for the best score.
pub trait HighscoreStore {
    /// Loads the stored best score, returning 0 when no record exists.
    fn load(&mut self) -> Result<u64, HighscoreError>;

    /// Replaces the stored best score.
    fn save(&mut self, highscore: u64) -> Result<(), HighscoreError>;
}

/// Failures reported by a [`HighscoreStore`].
#[derive(Debug, thiserror::Error)]
pub enum HighscoreError {
    /// The record could not be read or written.
    #[error("failed to access highscore record at {}", path.display())]
    Io {
        /// Location of the record.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The record exists but does not hold a non-negative integer.
    #[error("highscore record at {} holds {contents:?}, not a non-negative integer", path.display())]
    Corrupt {
        /// Location of the record.
        path: PathBuf,
        /// Raw contents found in the record.
        contents: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn game_state_round_trips_through_bincode() {
        assert_round_trip(&GameState::GameOver);
    }

    #[test]
    fn rect_round_trips_through_bincode() {
        assert_round_trip(&Rect::new(12.0, -40.0, 64.0, PLATFORM_HEIGHT));
    }

    #[test]
    fn rect_edges_follow_origin_and_size() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(rect.right(), 40.0);
        assert_eq!(rect.bottom(), 60.0);
        assert_eq!(rect.center_x(), 25.0);
        assert_eq!(rect.center_y(), 40.0);
    }

    #[test]
    fn from_center_places_rect_around_point() {
        let rect = Rect::from_center(200.0, 500.0, PLAYER_SIZE, PLAYER_SIZE);
        assert_eq!(rect.left(), 177.5);
        assert_eq!(rect.top(), 477.5);
        assert_eq!(rect.center_x(), 200.0);
    }

    #[test]
    fn touching_rects_do_not_intersect() {
        let upper = Rect::new(0.0, 0.0, 10.0, 10.0);
        let lower = Rect::new(0.0, 10.0, 10.0, 10.0);
        let overlapping = Rect::new(5.0, 9.5, 10.0, 10.0);

        assert!(!upper.intersects(&lower));
        assert!(upper.intersects(&overlapping));
        assert!(overlapping.intersects(&upper));
    }

    #[test]
    fn with_bottom_keeps_height() {
        let rect = Rect::new(3.0, 100.0, 45.0, 45.0).with_bottom(520.0);
        assert_eq!(rect.top(), 475.0);
        assert_eq!(rect.bottom(), 520.0);
        assert_eq!(rect.left(), 3.0);
    }

    #[test]
    fn backdrop_follows_score_thresholds() {
        assert_eq!(Backdrop::for_score(0), Backdrop::Day);
        assert_eq!(Backdrop::for_score(199), Backdrop::Day);
        assert_eq!(Backdrop::for_score(200), Backdrop::Evening);
        assert_eq!(Backdrop::for_score(799), Backdrop::Evening);
        assert_eq!(Backdrop::for_score(800), Backdrop::Night);
    }

    #[test]
    fn menu_hit_test_prefers_start_where_buttons_overlap() {
        assert_eq!(
            hit_button(GameState::Menu, 200.0, 410.0),
            Some(ButtonKind::Start)
        );
        assert_eq!(
            hit_button(GameState::Menu, 200.0, 445.0),
            Some(ButtonKind::Start)
        );
        assert_eq!(
            hit_button(GameState::Menu, 200.0, 480.0),
            Some(ButtonKind::Quit)
        );
        assert_eq!(hit_button(GameState::Menu, 20.0, 410.0), None);
    }

    #[test]
    fn playing_state_has_no_buttons() {
        assert!(buttons_for(GameState::Playing).is_empty());
        assert_eq!(hit_button(GameState::Playing, 200.0, 410.0), None);
    }

    #[test]
    fn restart_button_only_on_game_over() {
        assert_eq!(
            hit_button(GameState::GameOver, 200.0, 380.0),
            Some(ButtonKind::Restart)
        );
        assert_eq!(hit_button(GameState::Menu, 200.0, 360.0), None);
    }

    #[test]
    fn vec_sink_records_sounds_in_order() {
        let mut sink: Vec<Sound> = Vec::new();
        sink.play(Sound::Jump);
        sink.play(Sound::Death);
        assert_eq!(sink, vec![Sound::Jump, Sound::Death]);
    }

    #[test]
    fn direction_sign_matches_axis() {
        assert_eq!(HorizontalDirection::Left.sign(), -1.0);
        assert_eq!(HorizontalDirection::Right.sign(), 1.0);
    }
}
