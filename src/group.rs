//! Named, ordered collections of sprites.

use std::sync::Arc;

use miette::Diagnostic;
use thiserror::Error;

use crate::{
    canvas::Canvas,
    sprite::{draw_sprite, SpriteRef},
};

/// Lookup failure for a group name that was never registered.
///
/// Referencing a group that doesn't exist is a programmer error, there is no
/// silent-skip path: every operation that takes a group name returns this
/// error when the name is unknown.
#[derive(Debug, Error, Diagnostic)]
#[error("there is no group with the name: {name}")]
#[diagnostic(
    code(pretzel::unknown_group),
    help("register the group with `Context::create_group` before using it")
)]
pub struct UnknownGroupError {
    /// The name that was looked up.
    pub name: String,
}

/// A named, ordered collection of sprites.
///
/// Sprites are drawn in insertion order.
/// Duplicates are permitted and never checked for.
pub struct Group {
    /// Name the group is looked up by.
    ///
    /// Intended to be unique, never validated.
    name: String,
    /// Sprites in insertion order.
    sprites: Vec<SpriteRef>,
}

impl Group {
    /// Create an empty group.
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sprites: Vec::new(),
        }
    }

    /// Name of the group.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a sprite to the group.
    ///
    /// No duplicate check is done, adding the same handle twice draws it twice.
    #[inline]
    pub fn add_sprite(&mut self, sprite: SpriteRef) {
        self.sprites.push(sprite);
    }

    /// Remove the first sprite matching the handle identity.
    ///
    /// Returns whether a sprite was removed, removal of an absent sprite is a no-op.
    pub fn remove_sprite(&mut self, sprite: &SpriteRef) -> bool {
        match self
            .sprites
            .iter()
            .position(|other| Arc::ptr_eq(other, sprite))
        {
            Some(index) => {
                self.sprites.remove(index);

                true
            }
            None => false,
        }
    }

    /// Sprites in insertion order.
    #[inline]
    pub fn sprites(&self) -> &[SpriteRef] {
        &self.sprites
    }

    /// Amount of sprites in the group.
    #[inline]
    pub fn sprite_count(&self) -> usize {
        self.sprites.len()
    }

    /// Draw all sprites in insertion order.
    pub(crate) fn draw(&self, canvas: &mut Canvas) {
        for sprite in &self.sprites {
            draw_sprite(sprite, canvas);
        }
    }
}

/// Ordered registry of all groups of a running game.
///
/// Groups live as long as the game, there is no removal operation.
#[derive(Default)]
pub(crate) struct GroupRegistry {
    /// Groups in creation order.
    groups: Vec<Group>,
}

impl GroupRegistry {
    /// Create a new group and append it to the registry.
    ///
    /// Always appends, even when a group with the same name already exists.
    /// Lookups will keep resolving to the first group created with the name.
    pub(crate) fn create(&mut self, name: impl Into<String>) -> &mut Group {
        self.groups.push(Group::new(name));

        self.groups
            .last_mut()
            .expect("Group registry can't be empty after a push")
    }

    /// Get the first group with the given name.
    pub(crate) fn get(&self, name: &str) -> Result<&Group, UnknownGroupError> {
        self.groups
            .iter()
            .find(|group| group.name() == name)
            .ok_or_else(|| UnknownGroupError { name: name.into() })
    }

    /// Get the first group with the given name, mutably.
    pub(crate) fn get_mut(&mut self, name: &str) -> Result<&mut Group, UnknownGroupError> {
        self.groups
            .iter_mut()
            .find(|group| group.name() == name)
            .ok_or_else(|| UnknownGroupError { name: name.into() })
    }

    /// Draw all groups in creation order.
    pub(crate) fn draw(&self, canvas: &mut Canvas) {
        for group in &self.groups {
            group.draw(canvas);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, RwLock};

    use vek::Rect;

    use super::GroupRegistry;
    use crate::{canvas::Canvas, sprite::SpriteRef, Sprite};

    /// Sprite that paints a single fixed color over the whole canvas.
    struct Fill(u32);

    impl Sprite for Fill {
        fn draw(&self, canvas: &mut Canvas) {
            canvas.fill(self.0);
        }
    }

    /// Sprite that paints a single pixel row with a fixed color.
    struct Row(usize, u32);

    impl Sprite for Row {
        fn draw(&self, canvas: &mut Canvas) {
            canvas.fill_rect(
                Rect::new(0.0, self.0 as f64, canvas.width() as f64, 1.0),
                self.1,
            );
        }
    }

    fn sprite(color: u32) -> SpriteRef {
        Arc::new(RwLock::new(Fill(color)))
    }

    #[test]
    fn create_then_get_returns_the_created_group() {
        let mut registry = GroupRegistry::default();

        registry.create("enemies").add_sprite(sprite(1));

        let enemies = registry.get("enemies").unwrap();
        assert_eq!(enemies.name(), "enemies");
        assert_eq!(enemies.sprite_count(), 1);
    }

    #[test]
    fn unknown_names_fail_for_every_unregistered_string() {
        let mut registry = GroupRegistry::default();
        registry.create("enemies");

        for name in ["players", "Enemies", ""] {
            let err = registry.get(name).err().expect("lookup must fail");
            assert_eq!(err.name, name);
        }
    }

    #[test]
    fn added_sprite_lands_at_the_tail_preserving_order() {
        let mut registry = GroupRegistry::default();

        let first = sprite(1);
        let second = sprite(2);

        let group = registry.create("enemies");
        group.add_sprite(first.clone());
        group.add_sprite(second.clone());

        let sprites = registry.get("enemies").unwrap().sprites();
        assert_eq!(sprites.len(), 2);
        assert!(Arc::ptr_eq(&sprites[0], &first));
        assert!(Arc::ptr_eq(&sprites[1], &second));
    }

    #[test]
    fn count_matches_list_length_across_add_and_remove() {
        let mut registry = GroupRegistry::default();

        let tracked = sprite(1);

        let group = registry.create("enemies");
        group.add_sprite(tracked.clone());
        group.add_sprite(sprite(2));
        group.add_sprite(tracked.clone());

        let group = registry.get_mut("enemies").unwrap();
        assert_eq!(group.sprite_count(), group.sprites().len());

        assert!(group.remove_sprite(&tracked));
        assert_eq!(group.sprite_count(), group.sprites().len());
        assert_eq!(group.sprite_count(), 2);

        // The second duplicate is still present
        assert!(group.remove_sprite(&tracked));
        // Removing an absent sprite is a no-op
        assert!(!group.remove_sprite(&tracked));
        assert_eq!(group.sprite_count(), 1);
    }

    #[test]
    fn duplicate_names_resolve_to_the_first_created_group() {
        let mut registry = GroupRegistry::default();

        registry.create("enemies");
        registry.create("enemies").add_sprite(sprite(1));

        // The first created group is empty, the second one holds the sprite
        assert_eq!(registry.get("enemies").unwrap().sprite_count(), 0);
    }

    #[test]
    fn draw_iterates_groups_in_creation_order_and_sprites_in_insertion_order() {
        let mut registry = GroupRegistry::default();

        // The background group paints everything, the foreground group paints
        // a single row over it
        let background = registry.create("background");
        background.add_sprite(Arc::new(RwLock::new(Fill(0xFF000001))));
        let foreground = registry.create("foreground");
        foreground.add_sprite(Arc::new(RwLock::new(Row(0, 0xFF000002))));
        foreground.add_sprite(Arc::new(RwLock::new(Row(0, 0xFF000003))));

        let mut buffer = vec![0; 2 * 2];
        let mut canvas = Canvas {
            size: vek::Extent2::new(2, 2),
            buffer: &mut buffer,
        };
        registry.draw(&mut canvas);

        // Last inserted foreground sprite wins on the top row
        assert_eq!(buffer[0], 0xFF000003);
        // Background still visible on the bottom row
        assert_eq!(buffer[2], 0xFF000001);
    }
}
