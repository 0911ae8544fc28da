//! Balloon animation shown after a successful prediction.
//!
//! Balloons rise from the bottom of the area over a fixed number of ticks
//! (one tick per event-loop poll), then the animation ends.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

const BALLOON_COUNT: usize = 24;
pub const DURATION_TICKS: u16 = 30;

const COLORS: [Color; 6] = [
    Color::Red,
    Color::Yellow,
    Color::Green,
    Color::Magenta,
    Color::Cyan,
    Color::LightBlue,
];

#[derive(Debug, Clone)]
struct Balloon {
    /// Horizontal position as a fraction of the width.
    x: f64,
    /// Rows climbed per tick.
    speed: f64,
    /// Ticks to wait before rising.
    delay: u16,
    color: Color,
}

#[derive(Debug, Clone)]
pub struct Celebration {
    balloons: Vec<Balloon>,
    tick: u16,
}

impl Celebration {
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let balloons = (0..BALLOON_COUNT)
            .map(|_| Balloon {
                x: rng.gen_range(0.0..1.0),
                speed: rng.gen_range(0.8..2.0),
                delay: rng.gen_range(0..8),
                color: COLORS[rng.gen_range(0..COLORS.len())],
            })
            .collect();
        Self { balloons, tick: 0 }
    }

    /// Advance one frame. Returns `false` once the animation is over.
    pub fn advance(&mut self) -> bool {
        self.tick = self.tick.saturating_add(1);
        self.tick < DURATION_TICKS
    }

    /// Cell positions of visible balloons inside `area`.
    pub fn positions(&self, area: Rect) -> Vec<(u16, u16, Color)> {
        if area.width == 0 || area.height == 0 {
            return Vec::new();
        }
        let bottom = f64::from(area.y + area.height - 1);
        self.balloons
            .iter()
            .filter(|b| self.tick >= b.delay)
            .filter_map(|b| {
                let climbed = f64::from(self.tick - b.delay) * b.speed;
                let y = bottom - climbed;
                if y < f64::from(area.y) {
                    return None;
                }
                let x = area.x + (b.x * f64::from(area.width - 1)).round() as u16;
                Some((x, y.round() as u16, b.color))
            })
            .collect()
    }
}

impl Widget for &Celebration {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for (x, y, color) in self.positions(area) {
            buf.set_string(x, y, "●", Style::default().fg(color));
            if y + 1 < area.y + area.height {
                buf.set_string(x, y + 1, "│", Style::default().fg(Color::Gray));
            }
        }
    }
}
