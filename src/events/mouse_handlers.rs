// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::time::Instant;

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::App;

/// Maps mouse input onto the interface.
///
/// Hit testing uses the areas recorded by the most recent draw.
pub(super) fn process_mouse_event(app: &mut App, mouse: MouseEvent) {
    let (column, row) = (mouse.column, mouse.row);

    if let Some(delta) = wheel_delta(mouse.kind, app.config.wheel_step) {
        app.controller.on_wheel(delta, Instant::now());
        return;
    }

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(ratio) = app.hit_areas.progress_ratio(column, row) {
                app.scrubbing = true;
                app.controller.scrub(ratio);
            } else if let Some(index) = app.hit_areas.card_at(column, row) {
                app.controller.click_slide(index);
            }
        }

        MouseEventKind::Drag(MouseButton::Left) if app.scrubbing => {
            if let Some(ratio) = app.hit_areas.progress_ratio_at_column(column) {
                app.controller.scrub(ratio);
            }
        }

        MouseEventKind::Up(MouseButton::Left) => app.scrubbing = false,

        _ => {}
    }

    app.follower.set_target(column, row);
}

/// Converts wheel notches into the signed deltas of the gesture accumulator,
/// positive meaning forward.
fn wheel_delta(kind: MouseEventKind, step: f64) -> Option<f64> {
    match kind {
        MouseEventKind::ScrollDown | MouseEventKind::ScrollRight => Some(step),
        MouseEventKind::ScrollUp | MouseEventKind::ScrollLeft => Some(-step),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wheel_notches_become_signed_deltas() {
        assert_eq!(wheel_delta(MouseEventKind::ScrollDown, 25.0), Some(25.0));
        assert_eq!(wheel_delta(MouseEventKind::ScrollUp, 25.0), Some(-25.0));
        assert_eq!(wheel_delta(MouseEventKind::Moved, 25.0), None);
    }
}
