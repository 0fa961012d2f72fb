//! Text map of a finished layout

use dg_core::{FinalLayout, GridPos};

const EMPTY: char = '·';
const START: char = '@';

/// Draw the layout one character per cell, north at the top.
///
/// The start room is drawn as `@`, every other room by the glyph of its
/// door mask.
pub fn render_map<H>(layout: &FinalLayout<H>) -> String {
    let Some((min, max)) = layout.bounds() else {
        return String::new();
    };
    let start = layout.rooms.first().map(|r| r.cell);

    let mut out = String::new();
    for y in (min.y..=max.y).rev() {
        let line: String = (min.x..=max.x)
            .map(|x| {
                let cell = GridPos::new(x, y);
                if Some(cell) == start {
                    START
                } else if layout.room_at(cell).is_some() {
                    layout.door_mask(cell).glyph()
                } else {
                    EMPTY
                }
            })
            .collect();
        out.push_str(line.trim_end_matches(EMPTY));
        out.push('\n');
    }
    out
}
