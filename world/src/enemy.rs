use jumpy_core::{
    HorizontalDirection, Rect, ENEMY_FRAME_HOLD, ENEMY_SIZE, ENEMY_SPEED, SCREEN_HEIGHT,
    SCREEN_WIDTH,
};

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Enemy {
    rect: Rect,
    direction: HorizontalDirection,
    frame: usize,
    timer: u32,
}

impl Enemy {
    pub(crate) fn new(center_x: f32, center_y: f32, direction: HorizontalDirection) -> Self {
        Self {
            rect: Rect::from_center(center_x, center_y, ENEMY_SIZE, ENEMY_SIZE),
            direction,
            frame: 0,
            timer: 0,
        }
    }

    pub(crate) const fn rect(&self) -> Rect {
        self.rect
    }

    pub(crate) const fn direction(&self) -> HorizontalDirection {
        self.direction
    }

    pub(crate) const fn frame(&self) -> usize {
        self.frame
    }

    /// Animates, flies and follows the scroll delta. Returns `false` once the
    /// enemy left the screen through the left, right or bottom edge.
    pub(crate) fn update(&mut self, scroll: f32, frame_count: usize) -> bool {
        self.timer += 1;
        if self.timer > ENEMY_FRAME_HOLD {
            self.timer = 0;
            self.frame = (self.frame + 1) % frame_count.max(1);
        }

        self.rect = self
            .rect
            .translated(self.direction.sign() * ENEMY_SPEED, scroll);

        self.rect.right() > 0.0 && self.rect.left() < SCREEN_WIDTH && self.rect.top() <= SCREEN_HEIGHT
    }
}
