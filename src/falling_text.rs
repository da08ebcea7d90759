//! Falling-text animation engine.
//!
//! Text groups hold one 40-character identifier each; every slot on screen is
//! bound to group `slot % GROUP_COUNT` and shows the character the group is
//! currently revealing. A group's `count` starts in the high `u8` range and
//! wraps through zero, so the wrap point doubles as the group's reveal time.
//!
//! The engine paints into its own [`Buffer`] so trails persist between frames;
//! the screen copies that canvas and puts overlays on top.

use std::time::Instant;

use rand::{rngs::StdRng, Rng};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
};

use crate::constants::animation::{COLOR_COUNT, FALL_DELAY, FILL_PERCENT, GROUP_COUNT, TEXT_SIZE};

/// One base85 rendering of a 32-byte hash.
pub type Text = [u8; TEXT_SIZE];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slot {
    x: i32,
    y: i32,
    prev_x: i32,
    prev_y: i32,
}

impl Default for Slot {
    fn default() -> Self {
        // off screen until the bound group is seeded
        Self {
            x: i32::MAX,
            y: i32::MAX,
            prev_x: i32::MAX,
            prev_y: i32::MAX,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    text: Text,
    count: u8,
}

impl Group {
    pub fn text(&self) -> &Text {
        &self.text
    }

    /// `0..TEXT_SIZE` reveals that character; the high range is a countdown.
    pub fn count(&self) -> u8 {
        self.count
    }

    fn active_char(&self) -> Option<char> {
        self.text.get(usize::from(self.count)).map(|b| char::from(*b))
    }
}

/// Number of slots for a terminal `cols` wide.
pub fn slot_count(cols: u16) -> usize {
    let fill = (usize::from(cols) * usize::from(FILL_PERCENT) + 50) / 100;
    fill.max(GROUP_COUNT)
}

/// Staggered starting count for group `g`.
pub fn initial_count(g: usize) -> u8 {
    let lag = (TEXT_SIZE * g) / GROUP_COUNT;
    u8::MAX - lag as u8 - 1
}

pub struct FallingText {
    canvas: Buffer,
    groups: Vec<Group>,
    slots: Vec<Slot>,
    offset: usize,
    next_fall: Option<Instant>,
    styles: [Style; COLOR_COUNT],
    rng: StdRng,
}

impl FallingText {
    /// `styles[0]` is the primary band and also the canvas background.
    pub fn new(area: Rect, styles: [Style; COLOR_COUNT], rng: StdRng) -> Self {
        let groups = (0..GROUP_COUNT)
            .map(|g| Group {
                text: [b' '; TEXT_SIZE],
                count: initial_count(g),
            })
            .collect();

        Self {
            canvas: blank_canvas(area, styles[0]),
            groups,
            slots: vec![Slot::default(); slot_count(area.width)],
            offset: 0,
            next_fall: None,
            styles,
            rng,
        }
    }

    pub fn canvas(&self) -> &Buffer {
        &self.canvas
    }

    pub fn area(&self) -> Rect {
        self.canvas.area
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn slot_len(&self) -> usize {
        self.slots.len()
    }

    /// Index of the group `add_text` will load next.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Next paint deadline; `None` before the first frame (always due).
    pub fn next_fall(&self) -> Option<Instant> {
        self.next_fall
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.next_fall.map_or(true, |t| t <= now)
    }

    /// Rebuilds the canvas at a new terminal size, keeping group progress.
    pub fn resize(&mut self, area: Rect) {
        if area == self.canvas.area {
            return;
        }
        log::debug!("falling text resized to {}x{}", area.width, area.height);
        self.canvas = blank_canvas(area, self.styles[0]);
        self.slots = vec![Slot::default(); slot_count(area.width)];
    }

    /// Loads `text` into the current group and scatters its slots.
    pub fn add_text(&mut self, text: &Text) {
        let cols = i32::from(self.canvas.area.width);
        let lines = i32::from(self.canvas.area.height);
        let text_size = TEXT_SIZE as i32;
        let max_line = if text_size <= lines {
            lines - text_size
        } else {
            lines
        };

        let group = &mut self.groups[self.offset];
        group.text = *text;
        group.count = u8::MAX;

        for (i, slot) in self.slots.iter_mut().enumerate() {
            if i % GROUP_COUNT != self.offset {
                continue;
            }
            slot.prev_x = slot.x;
            slot.prev_y = slot.y.saturating_sub(text_size);
            slot.x = self.rng.gen_range(0..=cols);
            slot.y = self.rng.gen_range(-1..=max_line);
        }

        self.offset = (self.offset + 1) % GROUP_COUNT;
    }

    /// Paints one frame. Returns `false` without painting when the group at
    /// `offset` needs new text first.
    pub fn draw_next(&mut self, now: Instant) -> bool {
        let active = self.groups[self.offset].count;
        if usize::from(active) == TEXT_SIZE || active == u8::MAX - 1 {
            return false;
        }

        let len = self.slots.len();
        let band = len / COLOR_COUNT;

        // erase old trails and repaint the pre-step frame
        for color in 0..COLOR_COUNT {
            let style = self.styles[color];
            for i in band * color..len {
                let slot = self.slots[i];
                put(&mut self.canvas, slot.prev_x, slot.prev_y, ' ', self.styles[0]);
                if let Some(ch) = self.groups[i % GROUP_COUNT].active_char() {
                    put(&mut self.canvas, slot.x, slot.y, ch, style);
                }
            }
        }

        for group in &mut self.groups {
            group.count = group.count.wrapping_add(1);
        }

        // step every slot and paint the bright head
        for color in 0..COLOR_COUNT {
            let style = self.styles[color].add_modifier(Modifier::BOLD);
            let end = if color + 1 == COLOR_COUNT {
                len
            } else {
                band * (color + 1)
            };
            for i in band * color..end {
                let slot = &mut self.slots[i];
                slot.y = slot.y.saturating_add(1);
                slot.prev_y = slot.prev_y.saturating_add(1);
                let (x, y) = (slot.x, slot.y);
                if let Some(ch) = self.groups[i % GROUP_COUNT].active_char() {
                    put(&mut self.canvas, x, y, ch, style);
                }
            }
        }

        self.next_fall = Some(now + FALL_DELAY);
        true
    }
}

fn blank_canvas(area: Rect, style: Style) -> Buffer {
    let mut canvas = Buffer::empty(area);
    canvas.set_style(area, style);
    canvas
}

fn put(canvas: &mut Buffer, x: i32, y: i32, ch: char, style: Style) {
    let area = canvas.area;
    let (Ok(x), Ok(y)) = (u16::try_from(x), u16::try_from(y)) else {
        return;
    };
    if x >= area.width || y >= area.height {
        return;
    }
    if let Some(cell) = canvas.cell_mut((area.x + x, area.y + y)) {
        cell.reset();
        cell.set_char(ch).set_style(style);
    }
}
