//! Player controller: input and gravity integration, platform landings and
//! the scroll delta that keeps the player below the scroll threshold.

use jumpy_core::{
    CollisionMask, HorizontalDirection, MovementInput, Rect, SpriteMasks, GRAVITY,
    HORIZONTAL_SPEED, JUMP_VELOCITY, LADDER_BASE_Y, MAX_FALL_SPEED, PLAYER_SIZE,
    PLAYER_SPAWN_LIFT, SCREEN_WIDTH, SCROLL_THRESHOLD,
};

use crate::platform::Platform;

/// Outcome of a single controller step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Advance {
    /// Vertical displacement the rest of the world must follow.
    pub(crate) scroll: f32,
    /// Top edge of the platform the player bounced off, if any.
    pub(crate) landed_on: Option<f32>,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Player {
    rect: Rect,
    velocity: f32,
    facing: HorizontalDirection,
}

impl Player {
    pub(crate) const fn new(rect: Rect, velocity: f32, facing: HorizontalDirection) -> Self {
        Self {
            rect,
            velocity,
            facing,
        }
    }

    /// Player standing just above the ladder's base platform.
    pub(crate) fn spawn() -> Self {
        let rect = Rect::from_center(
            SCREEN_WIDTH / 2.0,
            LADDER_BASE_Y - PLAYER_SPAWN_LIFT,
            PLAYER_SIZE,
            PLAYER_SIZE,
        );
        Self::new(rect, 0.0, HorizontalDirection::Right)
    }

    pub(crate) const fn rect(&self) -> Rect {
        self.rect
    }

    pub(crate) const fn velocity(&self) -> f32 {
        self.velocity
    }

    pub(crate) const fn facing(&self) -> HorizontalDirection {
        self.facing
    }

    pub(crate) fn mask<'m>(&self, masks: &'m SpriteMasks) -> &'m CollisionMask {
        match self.facing {
            HorizontalDirection::Right => masks.player(),
            HorizontalDirection::Left => masks.player_mirrored(),
        }
    }

    /// Integrates one frame of movement and returns the resulting scroll delta.
    pub(crate) fn advance(&mut self, input: MovementInput, platforms: &[Platform]) -> Advance {
        let mut dx = 0.0;
        if input.left {
            dx = -HORIZONTAL_SPEED;
            self.facing = HorizontalDirection::Left;
        }
        if input.right {
            dx = HORIZONTAL_SPEED;
            self.facing = HorizontalDirection::Right;
        }

        self.velocity = (self.velocity + GRAVITY).min(MAX_FALL_SPEED);
        let mut dy = self.velocity;

        if self.rect.left() + dx < 0.0 {
            dx = -self.rect.left();
        }
        if self.rect.right() + dx > SCREEN_WIDTH {
            dx = SCREEN_WIDTH - self.rect.right();
        }

        let landed_on = self.landing_target(dy, platforms);
        if let Some(top) = landed_on {
            self.rect = self.rect.with_bottom(top);
            dy = 0.0;
            self.velocity = JUMP_VELOCITY;
        }

        let scroll = if self.rect.top() <= SCROLL_THRESHOLD && self.velocity < 0.0 {
            0.0 - dy
        } else {
            0.0
        };

        self.rect = self.rect.translated(dx, dy + scroll);
        Advance { scroll, landed_on }
    }

    /// Picks the platform to land on: among the platforms hit by the tentative
    /// move whose centre is at or below the player's feet, the one whose top is
    /// nearest to the feet. Earlier platforms win ties.
    fn landing_target(&self, dy: f32, platforms: &[Platform]) -> Option<f32> {
        if self.velocity <= 0.0 {
            return None;
        }

        let probe = self.rect.translated(0.0, dy);
        let feet = self.rect.bottom();
        platforms
            .iter()
            .map(Platform::rect)
            .filter(|platform| platform.intersects(&probe) && feet <= platform.center_y())
            .map(|platform| platform.top())
            .fold(None, |nearest: Option<f32>, top| match nearest {
                Some(current) if (current - feet).abs() <= (top - feet).abs() => Some(current),
                _ => Some(top),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jumpy_core::PLATFORM_HEIGHT;

    fn player_with_bottom(left: f32, bottom: f32, velocity: f32) -> Player {
        let rect = Rect::new(left, 0.0, PLAYER_SIZE, PLAYER_SIZE).with_bottom(bottom);
        Player::new(rect, velocity, HorizontalDirection::Right)
    }

    #[test]
    fn falling_player_lands_on_platform_just_below() {
        let mut player = player_with_bottom(100.0, 500.0, 5.0);
        let platforms = [Platform::new(90.0, 505.0, 80.0)];

        let advance = player.advance(MovementInput::IDLE, &platforms);

        assert_eq!(advance.landed_on, Some(505.0));
        assert_eq!(player.velocity(), JUMP_VELOCITY);
        assert_eq!(player.rect().bottom(), 505.0);
        assert_eq!(advance.scroll, 0.0);
    }

    #[test]
    fn rising_player_passes_through_platforms() {
        let mut player = player_with_bottom(100.0, 500.0, -10.0);
        let platforms = [Platform::new(90.0, 480.0, 80.0)];

        let advance = player.advance(MovementInput::IDLE, &platforms);

        assert_eq!(advance.landed_on, None);
        assert_eq!(player.velocity(), -10.0 + GRAVITY);
        assert_eq!(player.rect().bottom(), 500.0 - 10.0 + GRAVITY);
    }

    #[test]
    fn player_below_platform_centre_does_not_land() {
        let mut player = player_with_bottom(100.0, 510.0, 2.0);
        let platforms = [Platform::new(90.0, 500.0, 80.0)];

        let advance = player.advance(MovementInput::IDLE, &platforms);

        assert_eq!(advance.landed_on, None);
        assert!(player.velocity() > 0.0);
    }

    #[test]
    fn nearest_platform_wins_over_insertion_order() {
        let mut player = player_with_bottom(100.0, 500.0, 5.0);
        let platforms = [
            Platform::new(90.0, 505.0, 80.0),
            Platform::new(90.0, 502.0, 80.0),
        ];

        let advance = player.advance(MovementInput::IDLE, &platforms);

        assert_eq!(advance.landed_on, Some(502.0));
        assert_eq!(player.rect().bottom(), 502.0);
    }

    #[test]
    fn equally_near_platforms_resolve_to_first() {
        let mut player = player_with_bottom(100.0, 500.0, 5.0);
        let platforms = [
            Platform::new(90.0, 503.0, 80.0),
            Platform::new(120.0, 503.0, 40.0),
        ];

        let advance = player.advance(MovementInput::IDLE, &platforms);

        assert_eq!(advance.landed_on, Some(503.0));
    }

    #[test]
    fn fall_speed_is_capped() {
        let mut player = player_with_bottom(100.0, 100.0, MAX_FALL_SPEED);

        let _ = player.advance(MovementInput::IDLE, &[]);

        assert_eq!(player.velocity(), MAX_FALL_SPEED);
        assert_eq!(player.rect().bottom(), 100.0 + MAX_FALL_SPEED);
    }

    #[test]
    fn horizontal_motion_is_clamped_to_screen() {
        let mut left = player_with_bottom(2.0, 300.0, 0.0);
        let _ = left.advance(MovementInput::LEFT, &[]);
        assert_eq!(left.rect().left(), 0.0);
        assert_eq!(left.facing(), HorizontalDirection::Left);

        let mut right = player_with_bottom(SCREEN_WIDTH - PLAYER_SIZE - 1.0, 300.0, 0.0);
        let _ = right.advance(MovementInput::RIGHT, &[]);
        assert_eq!(right.rect().right(), SCREEN_WIDTH);
        assert_eq!(right.facing(), HorizontalDirection::Right);
    }

    #[test]
    fn right_key_wins_when_both_are_held() {
        let mut player = player_with_bottom(100.0, 300.0, 0.0);
        let both = MovementInput {
            left: true,
            right: true,
        };

        let _ = player.advance(both, &[]);

        assert_eq!(player.rect().left(), 100.0 + HORIZONTAL_SPEED);
        assert_eq!(player.facing(), HorizontalDirection::Right);
    }

    #[test]
    fn rising_above_threshold_scrolls_world_instead_of_player() {
        let mut player = player_with_bottom(100.0, 150.0 + PLAYER_SIZE, -10.0);

        let advance = player.advance(MovementInput::IDLE, &[]);

        assert_eq!(advance.scroll, 10.0 - GRAVITY);
        assert_eq!(player.rect().top(), 150.0);
    }

    #[test]
    fn landing_above_threshold_does_not_scroll() {
        let mut player = player_with_bottom(100.0, 190.0, 4.0);
        let platforms = [Platform::new(100.0, 192.0, 60.0)];

        let advance = player.advance(MovementInput::IDLE, &platforms);

        assert_eq!(advance.landed_on, Some(192.0));
        assert_eq!(advance.scroll, 0.0);
        assert_eq!(player.rect().bottom(), 192.0);
    }

    #[test]
    fn mask_follows_facing() {
        let masks = SpriteMasks::default();
        let mut player = player_with_bottom(100.0, 300.0, 0.0);
        assert!(std::ptr::eq(player.mask(&masks), masks.player()));

        let _ = player.advance(MovementInput::LEFT, &[]);
        assert!(std::ptr::eq(player.mask(&masks), masks.player_mirrored()));
    }

    #[test]
    fn spawned_player_overlaps_base_platform() {
        let player = Player::spawn();
        let base = Platform::new(SCREEN_WIDTH / 2.0 - 50.0, LADDER_BASE_Y, 100.0);

        assert_eq!(player.rect().center_x(), SCREEN_WIDTH / 2.0);
        assert!(player.rect().intersects(&base.rect()));
        assert!(player.rect().bottom() <= LADDER_BASE_Y + PLATFORM_HEIGHT / 2.0);
    }
}
