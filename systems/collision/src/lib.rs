#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Death detection: pixel-accurate enemy contact and falling off the screen.

use jumpy_core::{
    Command, DeathCause, EnemySnapshot, EnemyView, Event, PlayerSnapshot, SCREEN_HEIGHT,
};

/// Pure system that ends the run when the player touches an enemy or falls.
#[derive(Debug, Default)]
pub struct Collision;

impl Collision {
    /// Creates a new collision system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Inspects the state reached after a played frame and emits at most one
    /// [`Command::EndRun`].
    pub fn handle(
        &mut self,
        events: &[Event],
        player: Option<PlayerSnapshot<'_>>,
        enemies: &EnemyView<'_>,
        out: &mut Vec<Command>,
    ) {
        let frame_advanced = events
            .iter()
            .any(|event| matches!(event, Event::FrameAdvanced { .. }));
        if !frame_advanced {
            return;
        }

        let Some(player) = player else {
            return;
        };

        if let Some(cause) = death_cause(&player, enemies) {
            out.push(Command::EndRun { cause });
        }
    }
}

/// Determines whether the player died during the last frame.
///
/// Enemy contact is checked before falling.
#[must_use]
pub fn death_cause(player: &PlayerSnapshot<'_>, enemies: &EnemyView<'_>) -> Option<DeathCause> {
    if enemies.iter().any(|enemy| touches(player, enemy)) {
        return Some(DeathCause::Enemy);
    }

    if player.rect.top() > SCREEN_HEIGHT {
        return Some(DeathCause::Fell);
    }

    None
}

fn touches(player: &PlayerSnapshot<'_>, enemy: &EnemySnapshot<'_>) -> bool {
    if !player.rect.intersects(&enemy.rect) {
        return false;
    }

    let offset_x = (enemy.rect.left() - player.rect.left()).round() as i64;
    let offset_y = (enemy.rect.top() - player.rect.top()).round() as i64;
    player.mask.overlaps(enemy.mask, offset_x, offset_y)
}
