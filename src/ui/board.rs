use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gettextrs::gettext;
use gtk4 as gtk;
use gtk4::glib;
use gtk4::pango;
use gtk4::prelude::*;

use crate::game::{KEY_COUNT, KeySlot, Round, RoundEvent};

use super::app::handle_key_click;
use super::state::AppState;

pub const CONTENT_MARGIN: i32 = 12;
const GRID_COLS: i32 = 2;
const ROW_GAP: u32 = 20;
const COLUMN_GAP: u32 = 50;
const KEY_GLYPH: &str = "🔑";
const SLIDE_MICROS: i64 = 250_000;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct KeySlide {
    from: (f64, f64),
    started_at: Option<i64>,
}

impl KeySlide {
    fn starting(from: (f64, f64), now: i64) -> Self {
        KeySlide {
            from,
            started_at: (from != (0.0, 0.0)).then_some(now),
        }
    }

    // Glyph offset in cell units, or None once the slide has landed.
    fn offset(self, now: i64) -> Option<(f64, f64)> {
        let started_at = self.started_at?;
        let progress = (now - started_at) as f64 / SLIDE_MICROS as f64;
        if progress >= 1.0 {
            return None;
        }
        let remaining = 1.0 - progress.max(0.0);
        let ease = remaining * remaining;
        Some((self.from.0 * ease, self.from.1 * ease))
    }
}

pub struct KeyTile {
    pub button: gtk::Button,
    area: gtk::DrawingArea,
    slide: Rc<Cell<KeySlide>>,
}

fn grid_cell(slot: usize) -> (i32, i32) {
    let i = slot as i32;
    (i % GRID_COLS, i / GRID_COLS)
}

// Where the icon now at `slot` sat before the last shuffle, relative to `slot`,
// clamped to one cell since each glyph is clipped to its own button.
fn slide_origin(previous: &Round, current: &Round, slot: KeySlot) -> (f64, f64) {
    let icon = current.icon_at(slot);
    let Some(from) = previous.order().iter().position(|&i| i == icon) else {
        return (0.0, 0.0);
    };
    let (from_col, from_row) = grid_cell(from);
    let (col, row) = grid_cell(slot.index());
    (
        f64::from((from_col - col).clamp(-1, 1)),
        f64::from((from_row - row).clamp(-1, 1)),
    )
}

fn key_label(icon: usize) -> String {
    format!("{} {}", gettext("Key"), icon + 1)
}

fn draw_key(
    area: &gtk::DrawingArea,
    cr: &cairo::Context,
    width: i32,
    height: i32,
    slide: KeySlide,
) {
    let min_dim = f64::from(width.min(height));
    cr.set_antialias(cairo::Antialias::Best);

    let layout = pangocairo::functions::create_layout(cr);
    let mut font_desc = pango::FontDescription::new();
    font_desc.set_family("Noto Color Emoji, Apple Color Emoji, Segoe UI Emoji, sans");
    font_desc.set_size((min_dim * 0.5 * f64::from(pango::SCALE)) as i32);
    layout.set_font_description(Some(&font_desc));
    layout.set_text(KEY_GLYPH);

    #[allow(deprecated)]
    let fg = area.style_context().color();
    cr.set_source_rgba(
        f64::from(fg.red()),
        f64::from(fg.green()),
        f64::from(fg.blue()),
        f64::from(fg.alpha()),
    );

    let (dx, dy) = slide
        .offset(glib::monotonic_time())
        .unwrap_or((0.0, 0.0));
    let (text_width, text_height) = layout.pixel_size();
    cr.move_to(
        (f64::from(width) - f64::from(text_width)) / 2.0 + dx * f64::from(width),
        (f64::from(height) - f64::from(text_height)) / 2.0 + dy * f64::from(height),
    );
    pangocairo::functions::show_layout(cr, &layout);
}

fn start_slide(tile: &KeyTile, from: (f64, f64)) {
    tile.slide
        .set(KeySlide::starting(from, glib::monotonic_time()));
    if tile.slide.get().started_at.is_none() {
        return;
    }
    let slide = Rc::clone(&tile.slide);
    tile.area.add_tick_callback(move |area, _| {
        area.queue_draw();
        if slide.get().offset(glib::monotonic_time()).is_some() {
            glib::ControlFlow::Continue
        } else {
            slide.set(KeySlide::default());
            glib::ControlFlow::Break
        }
    });
}

pub fn build_key_grid(state: &Rc<RefCell<AppState>>) -> gtk::Grid {
    let grid = gtk::Grid::new();
    grid.add_css_class("limbo-board");
    grid.set_row_spacing(ROW_GAP);
    grid.set_column_spacing(COLUMN_GAP);
    grid.set_row_homogeneous(true);
    grid.set_column_homogeneous(true);
    grid.set_halign(gtk::Align::Center);
    grid.set_valign(gtk::Align::Center);

    let mut keys = Vec::with_capacity(KEY_COUNT);

    for slot in KeySlot::all() {
        let button = gtk::Button::builder()
            .css_classes(vec!["limbo-key", "flat"])
            .width_request(72)
            .height_request(72)
            .build();
        button.set_can_target(false);
        button.update_property(&[gtk::accessible::Property::Label(&key_label(slot.index()))]);

        let slide = Rc::new(Cell::new(KeySlide::default()));
        let area = gtk::DrawingArea::builder()
            .hexpand(true)
            .vexpand(true)
            .build();
        area.add_css_class("limbo-key-glyph");
        area.set_draw_func({
            let slide = Rc::clone(&slide);
            move |area, cr, width, height| draw_key(area, cr, width, height, slide.get())
        });
        button.set_child(Some(&area));

        let state_clone = state.clone();
        button.connect_clicked(move |_| {
            handle_key_click(&state_clone, slot);
        });

        let (col, row) = grid_cell(slot.index());
        grid.attach(&button, col, row, 1, 1);
        keys.push(KeyTile {
            button,
            area,
            slide,
        });
    }

    state.borrow_mut().keys = keys;

    grid
}

fn clear_round_classes(button: &gtk::Button) {
    for class in [
        "highlighted",
        "shuffle-a",
        "shuffle-b",
        "answer",
        "chosen-correct",
        "chosen-incorrect",
    ] {
        button.remove_css_class(class);
    }
}

pub(super) fn render_round(
    st: &mut AppState,
    previous: Option<&Round>,
    round: &Round,
    event: RoundEvent,
) {
    match event {
        RoundEvent::Started => st.shuffle_anim_phase = false,
        RoundEvent::Shuffled { .. } => st.shuffle_anim_phase = !st.shuffle_anim_phase,
        _ => {}
    }

    for (slot, tile) in KeySlot::all().zip(st.keys.iter()) {
        let button = &tile.button;
        if event == RoundEvent::Started {
            clear_round_classes(button);
            tile.slide.set(KeySlide::default());
        }

        button.set_can_target(round.input_enabled());
        if round.highlighted_slot() == Some(slot) {
            button.add_css_class("highlighted");
        } else {
            button.remove_css_class("highlighted");
        }
        button.update_property(&[gtk::accessible::Property::Label(&key_label(
            round.icon_at(slot),
        ))]);

        match event {
            RoundEvent::Shuffled { .. } => {
                button.remove_css_class("shuffle-a");
                button.remove_css_class("shuffle-b");
                button.add_css_class(if st.shuffle_anim_phase {
                    "shuffle-a"
                } else {
                    "shuffle-b"
                });
                if let Some(previous) = previous {
                    start_slide(tile, slide_origin(previous, round, slot));
                }
            }
            RoundEvent::Resolved(outcome) => {
                if slot == round.answer() {
                    button.add_css_class("answer");
                }
                if round.chosen() == Some(slot) {
                    button.add_css_class(if outcome.is_correct() {
                        "chosen-correct"
                    } else {
                        "chosen-incorrect"
                    });
                }
            }
            _ => {}
        }

        tile.area.queue_draw();
    }
}

pub(super) fn reset_board(st: &AppState) {
    for tile in &st.keys {
        clear_round_classes(&tile.button);
        tile.button.set_can_target(false);
        tile.slide.set(KeySlide::default());
        tile.area.queue_draw();
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn slot(index: usize) -> KeySlot {
        KeySlot::new(index).expect("slot in range")
    }

    fn shuffled_once(seed: u64) -> (Round, Round) {
        let mut round = Round::new(slot(0));
        round.end_highlight();
        let previous = round.clone();
        round.shuffle(&mut StdRng::seed_from_u64(seed));
        (previous, round)
    }

    #[test]
    fn slide_starts_where_the_icon_used_to_be() {
        let (previous, current) = shuffled_once(11);
        for target in KeySlot::all() {
            let icon = current.icon_at(target);
            let from = previous
                .order()
                .iter()
                .position(|&i| i == icon)
                .expect("icon present");
            let (from_col, from_row) = grid_cell(from);
            let (col, row) = grid_cell(target.index());
            let (dx, dy) = slide_origin(&previous, &current, target);
            assert_eq!(dx, f64::from((from_col - col).signum()));
            assert_eq!(dy, f64::from((from_row - row).signum()));
        }
    }

    #[test]
    fn labels_name_the_icon_one_based() {
        assert_eq!(key_label(0), "Key 1");
        assert_eq!(key_label(KEY_COUNT - 1), "Key 8");
    }

    #[test]
    fn unmoved_icon_does_not_slide() {
        let round = Round::new(slot(4));
        assert_eq!(slide_origin(&round, &round, slot(4)), (0.0, 0.0));
        assert_eq!(KeySlide::starting((0.0, 0.0), 10).offset(10), None);
    }

    #[test]
    fn slide_eases_back_to_the_cell() {
        let slide = KeySlide::starting((1.0, -1.0), 1_000);
        assert_eq!(slide.offset(1_000), Some((1.0, -1.0)));
        let (dx, dy) = slide.offset(1_000 + SLIDE_MICROS / 2).expect("mid slide");
        assert!(dx > 0.0 && dx < 1.0);
        assert!(dy < 0.0 && dy > -1.0);
        assert_eq!(slide.offset(1_000 + SLIDE_MICROS), None);
    }
}
