#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Jumpy.
//!
//! The world owns the player, the platforms and the enemies, couples them
//! through the per-frame scroll delta and keeps score. Every mutation flows
//! through [`apply`]; systems observe the result through [`query`].

mod enemy;
mod platform;
mod player;

use jumpy_core::{
    Command, DeathCause, Event, GameState, HorizontalDirection, MovementInput, SpriteMasks,
    SCREEN_HEIGHT,
};

use self::{enemy::Enemy, platform::Platform, player::Player};

/// Represents the authoritative Jumpy world state.
#[derive(Debug)]
pub struct World {
    state: GameState,
    masks: SpriteMasks,
    player: Option<Player>,
    platforms: Vec<Platform>,
    enemies: Vec<Enemy>,
    scroll: f32,
    background_offset: f32,
    score: u64,
    highscore: u64,
}

impl World {
    /// Creates a new world showing the menu, with stand-in collision masks.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: GameState::Menu,
            masks: SpriteMasks::default(),
            player: None,
            platforms: Vec::new(),
            enemies: Vec::new(),
            scroll: 0.0,
            background_offset: 0.0,
            score: 0,
            highscore: 0,
        }
    }

    fn reset_run(&mut self) {
        self.player = Some(Player::spawn());
        self.platforms.clear();
        self.enemies.clear();
        self.scroll = 0.0;
        self.background_offset = 0.0;
        self.score = 0;
    }

    fn advance_frame(&mut self, input: MovementInput, out_events: &mut Vec<Event>) {
        let Some(player) = self.player.as_mut() else {
            return;
        };

        let advance = player.advance(input, &self.platforms);
        if let Some(platform_top) = advance.landed_on {
            out_events.push(Event::PlayerLanded { platform_top });
        }

        let scroll = advance.scroll;
        self.scroll = scroll;
        self.background_offset += scroll;
        if self.background_offset >= SCREEN_HEIGHT {
            self.background_offset = 0.0;
        }

        self.platforms.retain_mut(|platform| platform.update(scroll));
        let frame_count = self.masks.enemy_frame_count();
        self.enemies
            .retain_mut(|enemy| enemy.update(scroll, frame_count));

        if scroll > 0.0 {
            self.score = self.score.saturating_add(1);
        }

        out_events.push(Event::FrameAdvanced {
            scroll,
            score: self.score,
        });
    }

    fn end_run(&mut self, cause: DeathCause, out_events: &mut Vec<Event>) {
        self.state = GameState::GameOver;
        out_events.push(Event::PlayerDied {
            cause,
            score: self.score,
        });

        if self.score > self.highscore {
            self.highscore = self.score;
            out_events.push(Event::HighscoreRaised {
                highscore: self.highscore,
            });
        }

        out_events.push(Event::GameStateChanged {
            state: GameState::GameOver,
        });
    }

    fn spawn_enemy(
        &mut self,
        center_x: f32,
        center_y: f32,
        direction: HorizontalDirection,
        out_events: &mut Vec<Event>,
    ) {
        let enemy = Enemy::new(center_x, center_y, direction);
        out_events.push(Event::EnemySpawned {
            rect: enemy.rect(),
            direction,
        });
        self.enemies.push(enemy);
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Commands that make no sense in the current [`GameState`] are ignored
/// without emitting events.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureSpriteMasks { masks } => {
            world.masks = masks;
        }
        Command::ConfigureHighscore { highscore } => {
            world.highscore = world.highscore.max(highscore);
        }
        Command::StartRun => {
            if world.state == GameState::Playing {
                return;
            }
            world.reset_run();
            world.state = GameState::Playing;
            out_events.push(Event::GameStateChanged {
                state: GameState::Playing,
            });
            out_events.push(Event::RunStarted);
        }
        Command::Tick { input } => {
            if world.state == GameState::Playing {
                world.advance_frame(input, out_events);
            }
        }
        Command::SpawnPlatform { x, y, width } => {
            if world.state != GameState::Playing {
                return;
            }
            let platform = Platform::new(x, y, width);
            out_events.push(Event::PlatformSpawned {
                rect: platform.rect(),
            });
            world.platforms.push(platform);
        }
        Command::SpawnEnemy {
            center_x,
            center_y,
            direction,
        } => {
            if world.state == GameState::Playing {
                world.spawn_enemy(center_x, center_y, direction, out_events);
            }
        }
        Command::EndRun { cause } => {
            if world.state == GameState::Playing {
                world.end_run(cause, out_events);
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use jumpy_core::{
        Backdrop, EnemySnapshot, EnemyView, GameState, PlayerSnapshot, Rect, SpriteMasks,
    };

    use super::World;

    /// Screen the game currently shows.
    #[must_use]
    pub fn game_state(world: &World) -> GameState {
        world.state
    }

    /// Score of the current or most recent run.
    #[must_use]
    pub fn score(world: &World) -> u64 {
        world.score
    }

    /// Best score known to the world.
    #[must_use]
    pub fn highscore(world: &World) -> u64 {
        world.highscore
    }

    /// Scroll delta applied during the most recent frame.
    #[must_use]
    pub fn scroll(world: &World) -> f32 {
        world.scroll
    }

    /// Vertical offset of the looping background, in `[0, SCREEN_HEIGHT)`.
    #[must_use]
    pub fn background_offset(world: &World) -> f32 {
        world.background_offset
    }

    /// Background theme matching the current score.
    #[must_use]
    pub fn backdrop(world: &World) -> Backdrop {
        Backdrop::for_score(world.score)
    }

    /// Collision masks currently configured.
    #[must_use]
    pub fn sprite_masks(world: &World) -> &SpriteMasks {
        &world.masks
    }

    /// Captures the player's state, if a run has been started.
    #[must_use]
    pub fn player(world: &World) -> Option<PlayerSnapshot<'_>> {
        world.player.as_ref().map(|player| PlayerSnapshot {
            rect: player.rect(),
            velocity: player.velocity(),
            facing: player.facing(),
            mask: player.mask(&world.masks),
        })
    }

    /// Number of live platforms.
    #[must_use]
    pub fn platform_count(world: &World) -> usize {
        world.platforms.len()
    }

    /// Bounding boxes of the live platforms in insertion order.
    #[must_use]
    pub fn platforms(world: &World) -> Vec<Rect> {
        world.platforms.iter().map(|platform| platform.rect()).collect()
    }

    /// Captures a read-only view of the live enemies in insertion order.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView<'_> {
        EnemyView::from_snapshots(
            world
                .enemies
                .iter()
                .map(|enemy| EnemySnapshot {
                    rect: enemy.rect(),
                    direction: enemy.direction(),
                    frame: enemy.frame(),
                    mask: world.masks.enemy_frame(enemy.frame()),
                })
                .collect(),
        )
    }
}
