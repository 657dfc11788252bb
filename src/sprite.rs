//! Drawable entity definitions.

use std::sync::{Arc, RwLock};

use crate::canvas::Canvas;

/// A drawable entity that can be added to a [`crate::group::Group`].
///
/// Implement this for every object the render pass should draw.
/// Game state that needs to be mutated between ticks should be kept behind the
/// same shared handle that is added to a group:
///
/// ```
/// use std::sync::{Arc, RwLock};
///
/// use pretzel::{vek::Vec2, Canvas, Sprite};
///
/// struct Ball {
///     x: f64,
///     y: f64,
/// }
///
/// impl Sprite for Ball {
///     fn draw(&self, canvas: &mut Canvas) {
///         canvas.set_pixel(Vec2::new(self.x, self.y), 0xFFFFFFFF);
///     }
/// }
///
/// // The game keeps the concrete handle to mutate the ball in `update`..
/// let ball = Arc::new(RwLock::new(Ball { x: 1.0, y: 2.0 }));
/// // ..and a clone of it is what gets added to a group
/// let sprite: pretzel::SpriteRef = ball.clone();
/// ```
pub trait Sprite {
    /// Draw the sprite on the canvas.
    ///
    /// Called once per sprite per rendered frame, in group order and then
    /// insertion order.
    fn draw(&self, canvas: &mut Canvas);
}

/// Shared handle to a sprite.
///
/// Groups hold these while the game keeps its own concrete `Arc<RwLock<S>>`
/// clone for mutating the sprite between ticks.
/// Handle identity ([`Arc::ptr_eq`]) is what removal operations match on.
pub type SpriteRef = Arc<RwLock<dyn Sprite>>;

/// Draw a shared sprite, locking it for the duration of the call.
pub(crate) fn draw_sprite(sprite: &SpriteRef, canvas: &mut Canvas) {
    sprite
        .read()
        .expect("Sprite RwLock is poisoned")
        .draw(canvas);
}
