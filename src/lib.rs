#![forbid(unsafe_code)]

//! Minimal 2D game application scaffold.
//!
//! # Features
//!
//! - Window creation with a fixed-rate update loop targeting 60 ticks per second.
//! - A flat registry of named sprite groups, drawn in creation order.
//! - Per-tick keyboard and mouse snapshots with pressed/released edge detection.
//! - A once-per-second `FPS : <count>` diagnostic line.
//!
//! # Non-Goals
//!
//! - An ECS, asset pipeline, physics, audio or networking. This crate is the
//!   loop, the window and the sprite registry; everything else belongs to the
//!   game built on top of it.
//!
//! # Usage
//!
//! There is a single trait [`Game`] with two required functions,
//! [`Game::initialize`] and [`Game::update`], that need to be implemented for
//! a game state object. [`Game::run`] then opens the window and blocks until
//! the window is closed or [`Context::exit`] is called.
//!
//! ```no_run
//! use pretzel::{Config, Context, Game, KeyCode};
//!
//! struct MyGame;
//!
//! impl Game for MyGame {
//!     fn initialize(&mut self, ctx: Context) {
//!         // Register the groups the game draws from
//!         ctx.create_group("actors");
//!     }
//!
//!     fn update(&mut self, ctx: Context, delta_time: f32) {
//!         // Exit the game if 'Escape' is pressed
//!         if ctx.key_pressed(KeyCode::Escape) {
//!             ctx.exit();
//!         }
//!     }
//! }
//!
//! fn main() -> miette::Result<()> {
//!     MyGame.run(Config::default().with_title("My Game"))
//! }
//! ```

pub mod canvas;
mod clock;
pub mod config;
pub mod context;
pub mod group;
mod input;
pub mod sprite;

use std::{sync::Arc, time::Instant};

pub use canvas::Canvas;
use clock::FrameClock;
pub use config::Config;
pub use context::Context;
pub use group::{Group, UnknownGroupError};
use log::{error, info};
use miette::{IntoDiagnostic, Result, WrapErr};
use pixels::{Pixels, PixelsBuilder, SurfaceTexture};
pub use sprite::{Sprite, SpriteRef};
pub use vek;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};
pub use winit::{event::MouseButton, keyboard::KeyCode};

/// Main entrypoint containing game state for running the game.
///
/// This is the main interface with the game scaffold.
///
/// See [`Context`] for all functions interfacing with the scaffold from both
/// required functions.
pub trait Game: Sized
where
    Self: 'static,
{
    /// Initialize the objects used in this game.
    ///
    /// Called exactly once, after the window, canvas and input are
    /// constructed and before the first tick fires.
    /// Must be used for registering groups and populating them with sprites.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Game context, used to register groups and sprites.
    ///
    /// # Example
    ///
    /// ```
    /// use pretzel::{Context, Game};
    ///
    /// struct MyGame;
    ///
    /// impl Game for MyGame {
    ///     fn initialize(&mut self, ctx: Context) {
    ///         ctx.create_group("enemies");
    ///         ctx.create_group("bullets");
    ///     }
    ///
    ///     fn update(&mut self, ctx: Context, delta_time: f32) {
    ///         // ..
    ///     }
    /// }
    /// ```
    fn initialize(&mut self, ctx: Context);

    /// Update the objects used in this game.
    ///
    /// Called once per fired tick, 60 times per second when the loop keeps up.
    /// Loop iterations where the frame budget hasn't elapsed don't advance
    /// time and don't call this function.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Game context, used to obtain information and mutate the game state.
    /// * `delta_time` - Seconds since the previous fired tick.
    ///
    /// # Example
    ///
    /// ```
    /// use pretzel::{Context, Game, KeyCode};
    ///
    /// struct MyGame;
    ///
    /// impl Game for MyGame {
    ///     fn update(&mut self, ctx: Context, delta_time: f32) {
    ///         // Stop the game and close the window when 'Escape' is pressed
    ///         if ctx.key_pressed(KeyCode::Escape) {
    ///             ctx.exit();
    ///         }
    ///     }
    ///
    ///     fn initialize(&mut self, ctx: Context) {
    ///         // ..
    ///     }
    /// }
    /// ```
    fn update(&mut self, ctx: Context, delta_time: f32);

    /// Run the game, spawning the window.
    ///
    /// <div class="warning">
    ///
    /// Don't implement/override this method.
    ///
    /// </div>
    ///
    /// Blocks until the window is closed or [`Context::exit`] is called.
    ///
    /// # Arguments
    ///
    /// * `config` - Configuration for the window, can be used to set the
    ///   canvas size, the window title and the background color.
    ///
    /// # Errors
    ///
    /// - When the event loop could not be created.
    /// - When the game loop exits with an error.
    #[inline(always)]
    fn run(self, config: Config) -> Result<()> {
        // Enable environment logger for winit and the per-second FPS line
        env_logger::init();

        // Create a polling event loop, which redraws the window whenever possible
        let event_loop = EventLoop::new()
            .into_diagnostic()
            .wrap_err("Error creating event loop")?;
        event_loop.set_control_flow(ControlFlow::Poll);

        // The clock is reset again once the window is up
        let clock = FrameClock::new(Instant::now(), clock::TICKS_PER_SECOND);

        // Run the game
        event_loop
            .run_app(&mut State {
                ctx: None,
                game: self,
                config,
                clock,
                window: None,
                pixels: None,
            })
            .into_diagnostic()
            .wrap_err("Error running game loop")
    }
}

/// State of setting up a window that can still be uninitialized.
///
/// All optional fields are tied to the window creation flow of winit.
struct State<G: Game> {
    /// Game context.
    ///
    /// `None` if the window still needs to be initialized.
    ctx: Option<Context>,
    /// User supplied game.
    game: G,
    /// User supplied configuration.
    config: Config,
    /// Tick source deciding when the update fires.
    clock: FrameClock,
    /// Window handle, shared with the pixel surface.
    window: Option<Arc<Window>>,
    /// Surface presenting the logical pixel buffer.
    pixels: Option<Pixels<'static>>,
}

impl<G: Game> ApplicationHandler for State<G> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        // Setup the window
        if self.ctx.is_some() {
            return;
        }

        // Define the properties of the window
        let window_attributes = WindowAttributes::default()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height))
            // Don't allow the window to be smaller than the canvas
            .with_min_inner_size(LogicalSize::new(self.config.width, self.config.height));

        // Spawn a new window using the event loop
        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .expect("Error creating window"),
        );

        // Create a surface on the window, the logical buffer is upscaled to it
        let surface_size = window.inner_size();
        let surface_texture = SurfaceTexture::new(
            surface_size.width,
            surface_size.height,
            Arc::clone(&window),
        );
        let pixels = PixelsBuilder::new(self.config.width, self.config.height, surface_texture)
            .build()
            .expect("Error creating pixel surface");

        // Setup the context
        let ctx = Context::new(&self.config);

        self.window = Some(window);
        self.pixels = Some(pixels);
        self.ctx = Some(ctx.clone());

        // Time starts counting before the user init, a slow init shows up in
        // the first delta time
        self.clock.reset(Instant::now());

        // Call user passed initialize function
        self.game.initialize(ctx);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Do nothing if the window is not set up yet
        let Some(ctx) = self.ctx.clone() else {
            return;
        };

        // Handle the window events
        match event {
            // Handle the game loop tick
            WindowEvent::RedrawRequested => {
                // Poll the clock, under budget nothing happens
                let Some(tick) = self.clock.tick(Instant::now()) else {
                    return;
                };

                // Repaint the canvas, all groups in creation order with their
                // sprites in insertion order
                ctx.write(|ctx| {
                    ctx.delta_time = tick.delta_time;
                    ctx.elapsed_time = tick.elapsed_time;
                    if let Some(count) = tick.ticks_last_second {
                        ctx.frames_per_second = count;
                    }

                    ctx.render();
                });

                // Present the canvas on the window surface
                if let Some(pixels) = &mut self.pixels {
                    ctx.read(|ctx| {
                        // The canvas holds 0xAARRGGBB pixels, the surface
                        // expects RGBA bytes
                        pixels
                            .frame_mut()
                            .chunks_exact_mut(4)
                            .zip(ctx.buffer.iter())
                            .for_each(|(target, source)| {
                                let source = source.to_ne_bytes();
                                target[0] = source[2];
                                target[1] = source[1];
                                target[2] = source[0];
                                target[3] = source[3];
                            });
                    });

                    if let Err(err) = pixels.render() {
                        error!("Error presenting the pixel surface: {err}");
                        event_loop.exit();

                        return;
                    }
                }

                // Report the tick rate once per second
                if let Some(count) = tick.ticks_last_second {
                    info!("FPS : {count}");
                }

                // Update game state
                self.game.update(ctx.clone(), tick.delta_time);

                ctx.write(|ctx| {
                    // Roll the input over so pressed and released events can
                    // be detected on the next tick
                    ctx.input.update();

                    if ctx.exit {
                        // Tell winit that we want to exit
                        event_loop.exit();
                    }
                });
            }
            // Resize the window surface, the canvas keeps its logical size
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if let Some(pixels) = &mut self.pixels {
                    if let Err(err) = pixels.resize_surface(width, height) {
                        error!("Error resizing the pixel surface: {err}");
                        event_loop.exit();
                    }
                }
            }
            // Close the window if requested
            WindowEvent::CloseRequested => {
                // Tell winit that we want to exit
                event_loop.exit();
            }
            // Map the mouse position to canvas coordinates
            WindowEvent::CursorMoved { position, .. } => {
                let mouse = self
                    .pixels
                    .as_ref()
                    .and_then(|pixels| {
                        pixels
                            .window_pos_to_pixel((position.x as f32, position.y as f32))
                            .ok()
                    })
                    .map(|(x, y)| (x as f32, y as f32));

                ctx.write(|ctx| ctx.input.set_mouse(mouse));
            }
            // Handle other window events with the input manager
            WindowEvent::KeyboardInput { .. }
            | WindowEvent::MouseWheel { .. }
            | WindowEvent::MouseInput { .. } => {
                ctx.write(|ctx| ctx.input.handle_event(&event));
            }
            // Ignore the rest of the events
            _ => (),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = &self.window else {
            return;
        };

        // Ensure the control flow doesn't change
        event_loop.set_control_flow(ControlFlow::Poll);

        // Application is about to wait, request a redraw
        window.request_redraw();
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // Destroy all state(s)
        self.pixels = None;
        self.window = None;
        self.ctx = None;
    }
}
