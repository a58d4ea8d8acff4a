#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Game state machine that drives the world and its systems one frame at a time.
//!
//! A [`Session`] translates [`FrameInput`] into commands, pumps the resulting
//! events through the spawning and collision systems until no system has
//! anything left to say, and forwards side effects to the injected
//! [`SoundSink`] and [`HighscoreStore`].

use jumpy_core::{
    hit_button, ButtonKind, Command, Event, Flow, FrameInput, GameState, HighscoreStore, Sound,
    SoundSink, SpriteMasks, UiEvent,
};
use jumpy_system_collision::Collision;
use jumpy_system_spawning::{Config as SpawningConfig, Spawning};
use jumpy_world::{self as world, query, World};
use tracing::{debug, error, info, warn};

/// Wiring parameters for a [`Session`].
#[derive(Clone, Debug)]
pub struct SessionConfig {
    spawning: SpawningConfig,
    masks: Option<SpriteMasks>,
}

impl SessionConfig {
    /// Creates a configuration with the provided generator settings and the
    /// world's stand-in collision masks.
    #[must_use]
    pub const fn new(spawning: SpawningConfig) -> Self {
        Self {
            spawning,
            masks: None,
        }
    }

    /// Uses collision masks extracted from the loaded sprites.
    #[must_use]
    pub fn with_masks(mut self, masks: SpriteMasks) -> Self {
        self.masks = Some(masks);
        self
    }
}

/// Owns the world, the systems and the injected collaborators.
#[derive(Debug)]
pub struct Session<S, H> {
    world: World,
    spawning: Spawning,
    collision: Collision,
    sounds: S,
    store: H,
    frame_events: Vec<Event>,
}

impl<S: SoundSink, H: HighscoreStore> Session<S, H> {
    /// Creates a session showing the menu.
    ///
    /// The persisted highscore is loaded from `store`; an unreadable record is
    /// reported and treated as 0.
    pub fn new(config: SessionConfig, sounds: S, mut store: H) -> Self {
        let highscore = match store.load() {
            Ok(highscore) => highscore,
            Err(error) => {
                warn!(%error, "ignoring unreadable highscore record");
                0
            }
        };

        let mut session = Self {
            world: World::new(),
            spawning: Spawning::new(config.spawning),
            collision: Collision::new(),
            sounds,
            store,
            frame_events: Vec::new(),
        };

        session.submit(Command::ConfigureHighscore { highscore });
        if let Some(masks) = config.masks {
            session.submit(Command::ConfigureSpriteMasks { masks });
        }
        info!(
            highscore,
            seed = config.spawning.rng_seed(),
            "session ready"
        );
        session.frame_events.clear();
        session
    }

    /// Processes one frame of input.
    ///
    /// Interface events are handled first; a run that was already in progress
    /// then advances by one tick. Returns [`Flow::Quit`] once the quit button
    /// was clicked or the window was asked to close.
    pub fn frame(&mut self, input: &FrameInput) -> Flow {
        self.frame_events.clear();
        let state = query::game_state(&self.world);
        let mut flow = Flow::Continue;

        for ui_event in &input.ui_events {
            match *ui_event {
                UiEvent::Quit => flow = Flow::Quit,
                UiEvent::PrimaryClick { x, y } => match hit_button(state, x, y) {
                    Some(ButtonKind::Start | ButtonKind::Restart) => {
                        self.submit(Command::StartRun);
                    }
                    Some(ButtonKind::Quit) => flow = Flow::Quit,
                    None => {}
                },
            }
        }

        if state == GameState::Playing {
            self.submit(Command::Tick {
                input: input.movement,
            });
        }

        if flow == Flow::Quit {
            info!(score = query::score(&self.world), "quit requested");
        }
        flow
    }

    /// Applies `command` to the world and runs every system until no further
    /// commands are produced.
    pub fn submit(&mut self, command: Command) {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);

        loop {
            if events.is_empty() {
                break;
            }
            self.observe(&events);

            let mut commands = Vec::new();
            self.spawning.handle(
                &events,
                query::platform_count(&self.world),
                &mut commands,
            );
            self.collision.handle(
                &events,
                query::player(&self.world),
                &query::enemy_view(&self.world),
                &mut commands,
            );

            if commands.is_empty() {
                break;
            }

            events.clear();
            for command in commands {
                world::apply(&mut self.world, command, &mut events);
            }
        }
    }

    fn observe(&mut self, events: &[Event]) {
        for event in events {
            match *event {
                Event::GameStateChanged { state } => info!(?state, "game state changed"),
                Event::RunStarted => debug!("run started"),
                Event::PlayerLanded { .. } => self.sounds.play(Sound::Jump),
                Event::PlayerDied { cause, score } => {
                    self.sounds.play(Sound::Death);
                    info!(?cause, score, "player died");
                }
                Event::HighscoreRaised { highscore } => match self.store.save(highscore) {
                    Ok(()) => info!(highscore, "new highscore saved"),
                    Err(error) => error!(%error, highscore, "failed to save highscore"),
                },
                Event::FrameAdvanced { .. }
                | Event::PlatformSpawned { .. }
                | Event::EnemySpawned { .. } => {}
            }
        }
        self.frame_events.extend_from_slice(events);
    }

    /// Read-only access to the world for rendering and inspection.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Events emitted while processing the most recent [`Session::frame`] or
    /// [`Session::submit`] calls since the last frame began.
    #[must_use]
    pub fn frame_events(&self) -> &[Event] {
        &self.frame_events
    }

    /// Sound sink receiving gameplay cues.
    #[must_use]
    pub fn sounds(&self) -> &S {
        &self.sounds
    }

    /// Mutable access to the sound sink, used to drain queued cues.
    pub fn sounds_mut(&mut self) -> &mut S {
        &mut self.sounds
    }

    /// Highscore store the session persists to.
    #[must_use]
    pub fn store(&self) -> &H {
        &self.store
    }
}
