//! Bouncing squares, one spawned for every mouse click.
//!
//! Run with `RUST_LOG=info` to see the per-second FPS line.

use std::sync::{Arc, RwLock};

use pretzel::{vek::Rect, Canvas, Config, Context, Game, KeyCode, MouseButton, Sprite};

/// Size of a square in pixels.
const SIZE: f64 = 16.0;

/// A square bouncing off the canvas edges.
struct Square {
    /// Top-left position in pixels.
    position: (f64, f64),
    /// Velocity in pixels per second.
    velocity: (f64, f64),
    /// Fill color.
    color: u32,
}

impl Square {
    /// Move the square, reflecting the velocity on the canvas edges.
    fn step(&mut self, delta_time: f64, width: f64, height: f64) {
        self.position.0 += self.velocity.0 * delta_time;
        self.position.1 += self.velocity.1 * delta_time;

        if self.position.0 < 0.0 || self.position.0 + SIZE > width {
            self.velocity.0 = -self.velocity.0;
        }
        if self.position.1 < 0.0 || self.position.1 + SIZE > height {
            self.velocity.1 = -self.velocity.1;
        }
    }
}

impl Sprite for Square {
    fn draw(&self, canvas: &mut Canvas) {
        canvas.fill_rect(
            Rect::new(self.position.0, self.position.1, SIZE, SIZE),
            self.color,
        );
    }
}

/// Game state holding concrete handles to all squares.
struct Bounce {
    /// The same squares the "squares" group holds, kept for mutation.
    squares: Vec<Arc<RwLock<Square>>>,
}

impl Bounce {
    /// Spawn a square and register it in the group.
    fn spawn(&mut self, ctx: &Context, position: (f64, f64)) {
        let count = self.squares.len() as u32;
        let square = Arc::new(RwLock::new(Square {
            position,
            velocity: (60.0 + 10.0 * f64::from(count % 7), 45.0),
            color: 0xFF00_0000 | count.wrapping_mul(0x003B_9AC9) | 0x0040_4040,
        }));

        ctx.add_sprite_to_group(square.clone(), "squares")
            .expect("squares group is registered in initialize");
        self.squares.push(square);
    }
}

impl Game for Bounce {
    fn initialize(&mut self, ctx: Context) {
        ctx.create_group("squares");

        self.spawn(&ctx, (100.0, 80.0));
    }

    fn update(&mut self, ctx: Context, delta_time: f32) {
        if ctx.key_pressed(KeyCode::Escape) {
            ctx.exit();
        }

        // Spawn a new square where the mouse was clicked
        if ctx.mouse_pressed(MouseButton::Left) {
            if let Some((x, y)) = ctx.mouse() {
                self.spawn(&ctx, (f64::from(x), f64::from(y)));
            }
        }

        let width = f64::from(ctx.width());
        let height = f64::from(ctx.height());
        for square in &self.squares {
            square
                .write()
                .expect("Square RwLock is poisoned")
                .step(f64::from(delta_time), width, height);
        }
    }
}

fn main() -> miette::Result<()> {
    let game = Bounce {
        squares: Vec::new(),
    };

    game.run(
        Config::default()
            .with_title("Bounce")
            .with_window_size(640, 480),
    )
}
