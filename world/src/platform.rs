use jumpy_core::{Rect, PLATFORM_HEIGHT, SCREEN_HEIGHT};

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Platform {
    rect: Rect,
}

impl Platform {
    pub(crate) const fn new(x: f32, y: f32, width: f32) -> Self {
        Self {
            rect: Rect::new(x, y, width, PLATFORM_HEIGHT),
        }
    }

    pub(crate) const fn rect(&self) -> Rect {
        self.rect
    }

    /// Follows the scroll delta. Returns `false` once the platform dropped
    /// below the bottom of the screen.
    pub(crate) fn update(&mut self, scroll: f32) -> bool {
        self.rect = self.rect.translated(0.0, scroll);
        self.rect.top() <= SCREEN_HEIGHT
    }
}
