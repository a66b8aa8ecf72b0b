use std::io;
use tui::backend::CrosstermBackend;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::symbols::Marker;
use tui::widgets::canvas::{Canvas, Points};
use tui::widgets::{Block, Borders};
use tui::Terminal;

/// PixelSurface is what the interpreter draws sprites onto. It should
/// abstract the implementation details, so a variety of kinds of screen would
/// work; size and edge behaviour are up to the surface.
pub trait PixelSurface {
    /// toggle one pixel, returning true if it was lit before (a collision)
    fn plot_xor(&mut self, x: usize, y: usize) -> bool;

    /// turn every pixel off
    fn clear(&mut self);

    /// put pending changes on the screen, if there are any
    fn present(&mut self) -> Result<(), io::Error> {
        Ok(())
    }
}

pub const SCREEN_WIDTH: usize = 64;
pub const SCREEN_HEIGHT: usize = 32;

// width and height in pixels, one bit per pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Resolution(usize, usize);

impl Resolution {
    fn pixel_count(&self) -> usize {
        self.0 * self.1
    }

    fn byte_count(&self) -> usize {
        (self.pixel_count() + 7) / 8
    }

    fn x_bounds(&self) -> [f64; 2] {
        [0.0, (self.0 - 1) as f64]
    }

    fn y_bounds(&self) -> [f64; 2] {
        [-1.0 * (self.1 - 1) as f64, 0.0]
    }

    /// canvas coordinates of every lit pixel in `data`
    fn lit_points<'a>(&self, data: &'a [u8]) -> impl std::iter::Iterator<Item = (f64, f64)> + 'a {
        let w = self.0;
        (0..self.pixel_count())
            .filter(move |count| 1 & (data[count / 8] >> (7 - count % 8)) == 1)
            .map(move |count| {
                (
                    (count % w) as f64,        // x
                    -1.0 * (count / w) as f64, // y
                )
            })
    }
}

/// monochrome pixels packed MSB-first, row-major. coordinates wrap around the
/// edges
#[derive(Debug, Clone)]
pub struct Framebuffer {
    resolution: Resolution,
    bytes: Vec<u8>,
    dirty: bool,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        let resolution = Resolution(width, height);
        Framebuffer {
            resolution,
            bytes: vec![0; resolution.byte_count()],
            dirty: true,
        }
    }

    pub fn width(&self) -> usize {
        self.resolution.0
    }

    pub fn height(&self) -> usize {
        self.resolution.1
    }

    fn bit(&self, x: usize, y: usize) -> (usize, u8) {
        let count = (y % self.height()) * self.width() + (x % self.width());
        (count / 8, 0x80 >> (count % 8))
    }

    pub fn is_set(&self, x: usize, y: usize) -> bool {
        let (byte, mask) = self.bit(x, y);
        self.bytes[byte] & mask != 0
    }

    pub fn lit_count(&self) -> usize {
        self.bytes.iter().map(|b| b.count_ones() as usize).sum()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// whether anything changed since the last call
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Framebuffer::new(SCREEN_WIDTH, SCREEN_HEIGHT)
    }
}

impl PixelSurface for Framebuffer {
    fn plot_xor(&mut self, x: usize, y: usize) -> bool {
        let (byte, mask) = self.bit(x, y);
        let was_set = self.bytes[byte] & mask != 0;
        self.bytes[byte] ^= mask;
        self.dirty = true;
        was_set
    }

    fn clear(&mut self) {
        self.bytes.iter_mut().for_each(|b| *b = 0);
        self.dirty = true;
    }
}

/// monochrome display in a terminal, rendered using TUI and Crossterm. it
/// keeps its own framebuffer and only redraws when that changed
pub struct MonoTermDisplay {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    framebuffer: Framebuffer,
}

impl MonoTermDisplay {
    pub fn new(x: usize, y: usize) -> Result<MonoTermDisplay, io::Error> {
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;
        terminal.hide_cursor()?;
        Ok(MonoTermDisplay {
            terminal,
            framebuffer: Framebuffer::new(x, y),
        })
    }

    fn render(&mut self) -> Result<(), io::Error> {
        let resolution = self.framebuffer.resolution;
        let lit: Vec<(f64, f64)> = resolution
            .lit_points(self.framebuffer.as_bytes())
            .collect();

        // for now this assumes a 1:1 ratio between terminal, chip8 and the
        // internal TUI canvas
        self.terminal.draw(|f| {
            let size = Rect::new(0, 0, 2 + resolution.0 as u16, 2 + resolution.1 as u16);

            let canvas = Canvas::default()
                .block(
                    Block::default()
                        .title("CHIP-8")
                        .borders(Borders::ALL)
                        .style(Style::default().bg(Color::Black)),
                )
                .x_bounds(resolution.x_bounds())
                .y_bounds(resolution.y_bounds())
                .marker(Marker::Block)
                .paint(|ctx| {
                    ctx.draw(&Points {
                        coords: &lit,
                        color: Color::White,
                    });
                });
            f.render_widget(canvas, size);
        })?;
        Ok(())
    }
}

impl PixelSurface for MonoTermDisplay {
    fn plot_xor(&mut self, x: usize, y: usize) -> bool {
        self.framebuffer.plot_xor(x, y)
    }

    fn clear(&mut self) {
        self.framebuffer.clear()
    }

    fn present(&mut self) -> Result<(), io::Error> {
        if self.framebuffer.take_dirty() {
            self.render()?;
        }
        Ok(())
    }
}

impl Drop for MonoTermDisplay {
    fn drop(&mut self) {
        // leave the shell usable even if this fails
        let _ = self.terminal.show_cursor();
    }
}
