//! User-facing context passed to [`crate::Game::initialize`] and [`crate::Game::update`].

use std::sync::{Arc, RwLock};

use vek::Extent2;
use winit::{event::MouseButton, keyboard::KeyCode};

use crate::{
    canvas::Canvas,
    config::Config,
    group::{GroupRegistry, UnknownGroupError},
    input::Input,
    sprite::SpriteRef,
};

/// Context containing most functionality for interfacing with the game scaffold.
///
/// Exposed in [`crate::Game::initialize`] and [`crate::Game::update`].
///
/// [`Context`] is safe and cheap to clone due to being a `Arc<RwLock<..>>` under the hood.
#[derive(Clone)]
pub struct Context {
    /// Implementation of all non-primitive parts.
    inner: Arc<RwLock<ContextInner>>,
}

impl Context {
    /// Create a new group and append it to the registry.
    ///
    /// Always appends, even when a group with the same name already exists;
    /// lookups by that name keep resolving to the first group created with it.
    ///
    /// The created group is not returned, it stays owned by the context and
    /// is reachable only by name through the other group operations.
    ///
    /// # Arguments
    ///
    /// * `name` - Name the group is looked up by in all other group operations.
    #[inline]
    pub fn create_group(&self, name: impl Into<String>) {
        self.write(|ctx| {
            ctx.groups.create(name);
        });
    }

    /// Add a sprite to the group with the given name.
    ///
    /// The sprite is appended at the tail of the group, no duplicate check is done.
    ///
    /// # Errors
    ///
    /// - When no group with the given name exists.
    #[inline]
    pub fn add_sprite_to_group(
        &self,
        sprite: SpriteRef,
        group_name: &str,
    ) -> Result<(), UnknownGroupError> {
        self.write(|ctx| {
            ctx.groups.get_mut(group_name)?.add_sprite(sprite);

            Ok(())
        })
    }

    /// Remove a sprite from the group with the given name.
    ///
    /// The first sprite matching the handle identity is removed, returns
    /// whether a sprite was removed; removing an absent sprite is a no-op.
    ///
    /// # Errors
    ///
    /// - When no group with the given name exists.
    #[inline]
    pub fn remove_sprite_from_group(
        &self,
        sprite: SpriteRef,
        group_name: &str,
    ) -> Result<bool, UnknownGroupError> {
        self.write(|ctx| Ok(ctx.groups.get_mut(group_name)?.remove_sprite(&sprite)))
    }

    /// Get the sprites of the group with the given name, in insertion order.
    ///
    /// Returns a snapshot of cheap shared handles; mutating the returned list
    /// never affects the group itself.
    ///
    /// # Errors
    ///
    /// - When no group with the given name exists.
    #[inline]
    pub fn group_sprites(&self, group_name: &str) -> Result<Vec<SpriteRef>, UnknownGroupError> {
        self.read(|ctx| Ok(ctx.groups.get(group_name)?.sprites().to_vec()))
    }

    /// Get the amount of sprites in the group with the given name.
    ///
    /// # Errors
    ///
    /// - When no group with the given name exists.
    #[inline]
    pub fn group_sprite_count(&self, group_name: &str) -> Result<usize, UnknownGroupError> {
        self.read(|ctx| Ok(ctx.groups.get(group_name)?.sprite_count()))
    }

    /// Tell the game to exit, this will close the window and return from [`crate::Game::run`].
    ///
    /// The rest of the tick will still be executed.
    #[inline]
    pub fn exit(&self) {
        self.write(|ctx| ctx.exit = true);
    }

    /// Get the delta time in seconds, how long since the previous fired tick.
    #[inline]
    pub fn delta_time(&self) -> f32 {
        self.read(|ctx| ctx.delta_time)
    }

    /// Get the time in seconds since the game loop started.
    #[inline]
    pub fn elapsed_time(&self) -> f32 {
        self.read(|ctx| ctx.elapsed_time)
    }

    /// Ticks fired during the last full second.
    ///
    /// Zero until the first second of the game loop has accumulated.
    #[inline]
    pub fn frames_per_second(&self) -> u32 {
        self.read(|ctx| ctx.frames_per_second)
    }

    /// Width of the canvas in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.read(|ctx| ctx.buffer_size.w as u32)
    }

    /// Height of the canvas in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.read(|ctx| ctx.buffer_size.h as u32)
    }

    /// Get the position if the mouse is on the canvas.
    ///
    /// The coordinates correspond to canvas pixels, not window pixels.
    #[inline]
    pub fn mouse(&self) -> Option<(f32, f32)> {
        self.read(|ctx| ctx.input.mouse())
    }

    /// Whether the mouse button goes from "not pressed" to "pressed".
    ///
    /// # Arguments
    ///
    /// * `mouse_button` - Mouse button to check the state of.
    #[inline]
    pub fn mouse_pressed(&self, mouse_button: MouseButton) -> bool {
        self.read(|ctx| ctx.input.mouse_pressed(mouse_button))
    }

    /// Whether the mouse button goes from "pressed" to "not pressed".
    ///
    /// # Arguments
    ///
    /// * `mouse_button` - Mouse button to check the state of.
    #[inline]
    pub fn mouse_released(&self, mouse_button: MouseButton) -> bool {
        self.read(|ctx| ctx.input.mouse_released(mouse_button))
    }

    /// Whether the mouse button is in a "pressed" state.
    ///
    /// # Arguments
    ///
    /// * `mouse_button` - Mouse button to check the state of.
    #[inline]
    pub fn mouse_held(&self, mouse_button: MouseButton) -> bool {
        self.read(|ctx| ctx.input.mouse_held(mouse_button))
    }

    /// How much the mouse scrolled this tick.
    #[inline]
    pub fn scroll_diff(&self) -> (f32, f32) {
        self.read(|ctx| ctx.input.scroll_diff())
    }

    /// Whether the key goes from "not pressed" to "pressed".
    ///
    /// Uses physical keys in the US layout.
    ///
    /// # Arguments
    ///
    /// * `keycode` - Key to check the state of.
    #[inline]
    pub fn key_pressed(&self, keycode: KeyCode) -> bool {
        self.read(|ctx| ctx.input.key_pressed(keycode))
    }

    /// Whether the key goes from "pressed" to "not pressed".
    ///
    /// Uses physical keys in the US layout.
    ///
    /// # Arguments
    ///
    /// * `keycode` - Key to check the state of.
    #[inline]
    pub fn key_released(&self, keycode: KeyCode) -> bool {
        self.read(|ctx| ctx.input.key_released(keycode))
    }

    /// Whether the key is in a "pressed" state.
    ///
    /// Uses physical keys in the US layout.
    ///
    /// # Arguments
    ///
    /// * `keycode` - Key to check the state of.
    #[inline]
    pub fn key_held(&self, keycode: KeyCode) -> bool {
        self.read(|ctx| ctx.input.key_held(keycode))
    }

    /// Create a new context for the given configuration.
    pub(crate) fn new(config: &Config) -> Self {
        let buffer_size = Extent2::new(config.width as usize, config.height as usize);

        Self {
            inner: Arc::new(RwLock::new(ContextInner {
                exit: false,
                input: Input::default(),
                groups: GroupRegistry::default(),
                buffer: vec![0; buffer_size.w * buffer_size.h],
                buffer_size,
                background_color: config.background_color,
                delta_time: 0.0,
                elapsed_time: 0.0,
                frames_per_second: 0,
            })),
        }
    }

    /// Get a read-only reference to the inner struct.
    ///
    /// # Panics
    ///
    /// - When internal [`RwLock`] is poisoned.
    pub(crate) fn read<R>(&self, reader: impl FnOnce(&ContextInner) -> R) -> R {
        reader(&self.inner.read().expect("RwLock is poisoned"))
    }

    /// Get a mutable reference to the inner struct.
    ///
    /// # Panics
    ///
    /// - When internal [`RwLock`] is poisoned.
    pub(crate) fn write<R>(&self, writer: impl FnOnce(&mut ContextInner) -> R) -> R {
        writer(&mut self.inner.write().expect("RwLock is poisoned"))
    }
}

/// Internal wrapped implementation for [`Context`].
pub(crate) struct ContextInner {
    /// Whether to exit after the current tick.
    pub(crate) exit: bool,
    /// Parsed game input.
    pub(crate) input: Input,
    /// All groups of the running game.
    pub(crate) groups: GroupRegistry,
    /// Logical pixel buffer the sprites draw into.
    pub(crate) buffer: Vec<u32>,
    /// Size of the pixel buffer.
    pub(crate) buffer_size: Extent2<usize>,
    /// Color the buffer is cleared to before every render pass.
    pub(crate) background_color: u32,
    /// Seconds since the previous fired tick.
    pub(crate) delta_time: f32,
    /// Seconds since the game loop started.
    pub(crate) elapsed_time: f32,
    /// Ticks fired during the last full second.
    pub(crate) frames_per_second: u32,
}

impl ContextInner {
    /// Run the render pass over the pixel buffer.
    ///
    /// Clears the buffer to the background color, then draws all groups in
    /// creation order with their sprites in insertion order.
    pub(crate) fn render(&mut self) {
        let Self {
            buffer,
            buffer_size,
            groups,
            background_color,
            ..
        } = self;

        let mut canvas = Canvas {
            size: *buffer_size,
            buffer,
        };

        canvas.fill(*background_color);
        groups.draw(&mut canvas);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, RwLock};

    use super::Context;
    use crate::{config::Config, sprite::SpriteRef, Canvas, Sprite};

    /// Sprite that draws nothing.
    struct Still;

    impl Sprite for Still {
        fn draw(&self, _canvas: &mut Canvas) {}
    }

    fn sprite() -> SpriteRef {
        Arc::new(RwLock::new(Still))
    }

    #[test]
    fn group_operations_delegate_to_the_registry() {
        let ctx = Context::new(&Config::default());
        ctx.create_group("enemies");

        let enemy = sprite();
        ctx.add_sprite_to_group(enemy.clone(), "enemies").unwrap();
        assert_eq!(ctx.group_sprite_count("enemies").unwrap(), 1);

        let sprites = ctx.group_sprites("enemies").unwrap();
        assert!(Arc::ptr_eq(&sprites[0], &enemy));

        assert!(ctx.remove_sprite_from_group(enemy, "enemies").unwrap());
        assert_eq!(ctx.group_sprite_count("enemies").unwrap(), 0);
    }

    #[test]
    fn unknown_group_error_propagates_through_every_operation() {
        let ctx = Context::new(&Config::default());

        assert!(ctx.add_sprite_to_group(sprite(), "ghosts").is_err());
        assert!(ctx.remove_sprite_from_group(sprite(), "ghosts").is_err());
        assert!(ctx.group_sprites("ghosts").is_err());
        assert!(ctx.group_sprite_count("").is_err());
    }

    #[test]
    fn group_sprites_returns_a_defensive_snapshot() {
        let ctx = Context::new(&Config::default());
        ctx.create_group("enemies");
        ctx.add_sprite_to_group(sprite(), "enemies").unwrap();

        let mut snapshot = ctx.group_sprites("enemies").unwrap();
        snapshot.clear();

        // The group still holds the sprite
        assert_eq!(ctx.group_sprite_count("enemies").unwrap(), 1);
    }

    #[test]
    fn frames_per_second_reflects_the_last_tick_report() {
        let ctx = Context::new(&Config::default());

        // No second has accumulated yet
        assert_eq!(ctx.frames_per_second(), 0);

        // The game loop stores the per-second report on the context
        ctx.write(|ctx| ctx.frames_per_second = 60);
        assert_eq!(ctx.frames_per_second(), 60);
    }

    #[test]
    fn render_pass_clears_to_the_background_color() {
        let config = Config::default()
            .with_window_size(2, 2)
            .with_background_color(0xFF123456);
        let ctx = Context::new(&config);

        ctx.write(|ctx| {
            ctx.render();
            assert!(ctx.buffer.iter().all(|pixel| *pixel == 0xFF123456));
        });
    }
}
