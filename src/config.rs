//! Game configuration.

/// Initial game configuration passed to [`crate::Game::run`].
///
/// There's two ways to initialize the config:
///
/// # Example
///
/// ```rust
/// # use pretzel::Config;
/// Config {
///   title: "My Game".to_owned(),
///   ..Default::default()
/// };
/// ```
///
/// # Example
///
/// ```rust
/// # use pretzel::Config;
/// Config::default().with_title("My Game");
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Name in the title bar.
    ///
    /// Defaults to `""`.
    pub title: String,
    /// Width of the canvas in pixels.
    ///
    /// Defaults to `800`.
    pub width: u32,
    /// Height of the canvas in pixels.
    ///
    /// Defaults to `600`.
    pub height: u32,
    /// Color the canvas is cleared to before every render pass.
    ///
    /// Defaults to `0xFF9BADB7` (gray).
    pub background_color: u32,
}

impl Config {
    /// Set the name in the title bar.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();

        self
    }

    /// Set the size of the canvas in pixels.
    pub const fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;

        self
    }

    /// Set the color the canvas is cleared to before every render pass.
    pub const fn with_background_color(mut self, background_color: u32) -> Self {
        self.background_color = background_color;

        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: String::new(),
            width: 800,
            height: 600,
            background_color: 0xFF9BADB7,
        }
    }
}
