//! Plain-text rendering of a display frame, one box per grid slot.

use std::fmt::Write;

use panel::display::DisplayFrame;
use panel::layout::{GRID_COLUMNS, GridCell, format_price};
use panel::model::PanelProduct;

/// Inner width of one cell, in characters.
pub const CELL_WIDTH: usize = 18;

fn fit(text: &str, width: usize) -> String {
    let mut out: String = text.chars().take(width).collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat_n(' ', width - len));
    out
}

fn cell_lines(index: usize, slot: Option<&PanelProduct>) -> [String; 2] {
    let position = GridCell::of(index).position();
    match slot {
        Some(p) => {
            let price = match p.unit.as_deref() {
                Some(unit) => format!("{}/{}", format_price(p.price), unit),
                None => format_price(p.price),
            };
            [
                fit(&format!("{position:02} {}", p.name), CELL_WIDTH),
                fit(&format!("   {price}"), CELL_WIDTH),
            ]
        }
        None => [fit(&format!("{position:02}"), CELL_WIDTH), fit("", CELL_WIDTH)],
    }
}

fn separator() -> String {
    let mut line = String::from("+");
    for _ in 0..GRID_COLUMNS {
        line.push_str(&"-".repeat(CELL_WIDTH));
        line.push('+');
    }
    line
}

pub fn render_frame(frame: &DisplayFrame) -> String {
    let config = &frame.view.config;
    let mut out = String::new();

    let _ = writeln!(out, "== {} ==", config.title);
    if let Some(subtitle) = &config.subtitle {
        let _ = writeln!(out, "{subtitle}");
    }

    let sep = separator();
    let _ = writeln!(out, "{sep}");
    for (row, slots) in frame.grid.rows().enumerate() {
        for line in 0..2 {
            out.push('|');
            for (column, slot) in slots.iter().enumerate() {
                let lines = cell_lines(row * GRID_COLUMNS + column, slot.as_ref());
                out.push_str(&lines[line]);
                out.push('|');
            }
            out.push('\n');
        }
        let _ = writeln!(out, "{sep}");
    }

    if let Some(footer) = &config.footer_text {
        let _ = writeln!(out, "{footer}");
    }
    let _ = writeln!(
        out,
        "{} products, {} free slots, updated {}",
        frame.stats.active, frame.stats.available_positions, frame.fetched_at
    );
    out
}
