use std::io::Stdout;

use ratatui::{
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Style,
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame, Terminal,
};

use crate::{
    engine::Screen,
    error::{Error, Result},
    theme::Palette,
    view::{BlockNotice, Overlay, SyncMeter},
};

const METER_WIDTH_PERCENT: u16 = 75;
const METER_HEIGHT: u16 = 8;
const NOTICE_WIDTH: u16 = 80;
const NOTICE_HEIGHT: u16 = 6;

/// Full-screen display over crossterm.
pub struct TuiScreen {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    palette: Palette,
}

impl TuiScreen {
    pub fn new(stdout: Stdout, palette: Palette) -> std::io::Result<Self> {
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        terminal.clear()?;
        Ok(Self { terminal, palette })
    }
}

impl Screen for TuiScreen {
    fn area(&mut self) -> Result<Rect> {
        let size = self
            .terminal
            .size()
            .map_err(|e| Error::io("terminal size", e))?;
        Ok(Rect::new(0, 0, size.width, size.height))
    }

    fn present(&mut self, canvas: &Buffer, overlay: Overlay<'_>) -> Result<()> {
        let palette = self.palette;
        self.terminal
            .draw(|f| draw(f, canvas, overlay, &palette))
            .map_err(|e| Error::io("draw frame", e))?;
        Ok(())
    }
}

// ===============================
// Top-level draw
// ===============================
pub fn draw(f: &mut Frame, canvas: &Buffer, overlay: Overlay<'_>, palette: &Palette) {
    copy_canvas(f.buffer_mut(), canvas);
    match overlay {
        Overlay::None => {}
        Overlay::Sync(meter) => draw_sync_meter(f, meter, palette),
        Overlay::NewBlock(notice) => draw_block_notice(f, notice, palette),
    }
}

fn copy_canvas(dst: &mut Buffer, src: &Buffer) {
    let area = dst.area.intersection(src.area);
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            if let (Some(from), Some(to)) = (src.cell((x, y)), dst.cell_mut((x, y))) {
                *to = from.clone();
            }
        }
    }
}

// ===============================
// Overlays
// ===============================
fn draw_sync_meter(f: &mut Frame, meter: &SyncMeter, palette: &Palette) {
    let area = f.area();
    let width = u16::try_from(u32::from(area.width) * u32::from(METER_WIDTH_PERCENT) / 100)
        .unwrap_or(area.width);
    let overlay = centered(area, width, METER_HEIGHT);
    f.render_widget(Clear, overlay);

    let container = Block::default()
        .title(meter.header().title())
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Plain)
        .style(palette.info_text);
    let inner = container.inner(overlay);
    f.render_widget(container, overlay);
    if inner.height == 0 || inner.width == 0 {
        return;
    }

    // three bar rows, percentage on the middle one
    let split = ((meter.fraction() * f64::from(inner.width)) as u16).min(inner.width);
    let buf = f.buffer_mut();
    for row in 1..=3u16 {
        let y = inner.y + row;
        if y >= inner.bottom() {
            break;
        }
        for dx in 0..inner.width {
            let style = if dx < split {
                palette.meter_highlight
            } else {
                palette.meter_plain
            };
            if let Some(cell) = buf.cell_mut((inner.x + dx, y)) {
                cell.reset();
                cell.set_char(' ').set_style(style);
            }
        }
    }

    let percent = format!("{}%", meter.percent());
    let y = inner.y + 2;
    if y < inner.bottom() {
        let x = inner.x + (inner.width / 2).saturating_sub(percent.len() as u16 / 2);
        for (i, ch) in percent.chars().enumerate() {
            if let Some(cell) = buf.cell_mut((x + i as u16, y)) {
                cell.set_char(ch);
            }
        }
    }

    if let Some(footer) = meter.footer() {
        let row = Rect {
            x: inner.x,
            y: inner.y + 5,
            width: inner.width,
            height: 1,
        };
        if row.y < inner.bottom() {
            f.render_widget(centered_line(footer, palette.info_text), row);
        }
    }
}

fn draw_block_notice(f: &mut Frame, notice: &BlockNotice, palette: &Palette) {
    let overlay = centered(f.area(), NOTICE_WIDTH, NOTICE_HEIGHT);
    f.render_widget(Clear, overlay);

    let [title, txs, height, id] = notice.lines();
    let container = Block::default()
        .title(title)
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .style(palette.info_text);
    let inner = container.inner(overlay);
    f.render_widget(container, overlay);

    for (i, line) in [txs, height, id].into_iter().enumerate() {
        let row = Rect {
            x: inner.x,
            y: inner.y + i as u16,
            width: inner.width,
            height: 1,
        };
        if row.y >= inner.bottom() {
            break;
        }
        f.render_widget(centered_line(line, palette.info_text), row);
    }
}

fn centered_line(text: String, style: Style) -> Paragraph<'static> {
    Paragraph::new(text)
        .style(style)
        .alignment(Alignment::Center)
}

/// `width` x `height` box centred in `area`, clamped to it.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
