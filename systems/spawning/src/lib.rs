#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Seeded procedural generator emitting platform and enemy spawn commands.

use jumpy_core::{
    Command, Event, HorizontalDirection, LADDER_BASE_Y, MAX_PLATFORMS, SCREEN_WIDTH,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const PLATFORM_MIN_WIDTH: i32 = 50;
const PLATFORM_MAX_WIDTH: i32 = 90;
const EDGE_MARGIN: i32 = 40;
const SPAWN_MIN_Y: i32 = -100;
const SPAWN_MAX_Y: i32 = -20;
const ENEMY_LIFT: f32 = 40.0;

const LADDER_BASE_WIDTH: f32 = 100.0;
const LADDER_RUNGS: i32 = 8;
const LADDER_SPACING: f32 = 65.0;
const LADDER_MAX_SHIFT: i32 = 120;

const DEFAULT_PLATFORM_CHANCE: f64 = 0.4;
const DEFAULT_ENEMY_CHANCE: f64 = 0.12;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    rng_seed: u64,
    platform_chance: f64,
    enemy_chance: f64,
}

impl Config {
    /// Creates a configuration with the default spawn probabilities.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self {
            rng_seed,
            platform_chance: DEFAULT_PLATFORM_CHANCE,
            enemy_chance: DEFAULT_ENEMY_CHANCE,
        }
    }

    /// Overrides the per-frame probability of spawning a platform.
    ///
    /// Values are clamped into `[0, 1]`; NaN disables spawning.
    #[must_use]
    pub fn with_platform_chance(mut self, chance: f64) -> Self {
        self.platform_chance = probability(chance);
        self
    }

    /// Overrides the probability that a new platform carries an enemy.
    ///
    /// Values are clamped into `[0, 1]`; NaN disables spawning.
    #[must_use]
    pub fn with_enemy_chance(mut self, chance: f64) -> Self {
        self.enemy_chance = probability(chance);
        self
    }

    /// Seed used for the default generator.
    #[must_use]
    pub const fn rng_seed(&self) -> u64 {
        self.rng_seed
    }
}

fn probability(chance: f64) -> f64 {
    if chance.is_nan() {
        0.0
    } else {
        chance.clamp(0.0, 1.0)
    }
}

/// Pure system that turns world events into spawn commands.
#[derive(Debug)]
pub struct Spawning<R = ChaCha8Rng> {
    rng: R,
    platform_chance: f64,
    enemy_chance: f64,
}

impl Spawning<ChaCha8Rng> {
    /// Creates a new spawning system backed by a seeded ChaCha generator.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::with_rng(config, ChaCha8Rng::seed_from_u64(config.rng_seed))
    }
}

impl<R: Rng> Spawning<R> {
    /// Creates a spawning system drawing from the supplied generator.
    ///
    /// The seed stored in `config` is ignored.
    #[must_use]
    pub fn with_rng(config: Config, rng: R) -> Self {
        Self {
            rng,
            platform_chance: config.platform_chance,
            enemy_chance: config.enemy_chance,
        }
    }

    /// Consumes events to emit spawn commands.
    ///
    /// `platform_count` is the number of live platforms after the frame that
    /// produced `events`.
    pub fn handle(&mut self, events: &[Event], platform_count: usize, out: &mut Vec<Command>) {
        let mut live = platform_count;
        for event in events {
            match event {
                Event::RunStarted => {
                    live = self.emit_ladder(out);
                }
                Event::FrameAdvanced { .. } => {
                    if self.emit_random(live, out) {
                        live += 1;
                    }
                }
                _ => {}
            }
        }
    }

    fn emit_ladder(&mut self, out: &mut Vec<Command>) -> usize {
        out.push(Command::SpawnPlatform {
            x: SCREEN_WIDTH / 2.0 - LADDER_BASE_WIDTH / 2.0,
            y: LADDER_BASE_Y,
            width: LADDER_BASE_WIDTH,
        });

        let screen_width = SCREEN_WIDTH as i32;
        let mut previous_x = screen_width / 2;
        for rung in 1..=LADDER_RUNGS {
            let width = self
                .rng
                .gen_range(PLATFORM_MIN_WIDTH..=PLATFORM_MAX_WIDTH);
            let shift = self.rng.gen_range(-LADDER_MAX_SHIFT..=LADDER_MAX_SHIFT);
            let x = (previous_x + shift).clamp(EDGE_MARGIN, screen_width - width - EDGE_MARGIN);
            previous_x = x;

            out.push(Command::SpawnPlatform {
                x: x as f32,
                y: LADDER_BASE_Y - LADDER_SPACING * rung as f32,
                width: width as f32,
            });
        }

        1 + LADDER_RUNGS as usize
    }

    fn emit_random(&mut self, platform_count: usize, out: &mut Vec<Command>) -> bool {
        if platform_count >= MAX_PLATFORMS || !self.rng.gen_bool(self.platform_chance) {
            return false;
        }

        let width = self
            .rng
            .gen_range(PLATFORM_MIN_WIDTH..=PLATFORM_MAX_WIDTH);
        let x = self
            .rng
            .gen_range(EDGE_MARGIN..=SCREEN_WIDTH as i32 - width - EDGE_MARGIN);
        let y = self.rng.gen_range(SPAWN_MIN_Y..=SPAWN_MAX_Y);
        out.push(Command::SpawnPlatform {
            x: x as f32,
            y: y as f32,
            width: width as f32,
        });

        if self.rng.gen_bool(self.enemy_chance) {
            let direction = if self.rng.gen_bool(0.5) {
                HorizontalDirection::Right
            } else {
                HorizontalDirection::Left
            };
            out.push(Command::SpawnEnemy {
                center_x: (x + width / 2) as f32,
                center_y: y as f32 - ENEMY_LIFT,
                direction,
            });
        }

        true
    }
}
