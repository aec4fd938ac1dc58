use std::cell::RefCell;
use std::rc::Rc;

use gtk4 as gtk;
use gtk4::pango;
use gtk4::prelude::*;

use crate::game::{CardState, InputEvent};

use super::app::dispatch;
use super::state::AppState;

pub const CONTENT_MARGIN: i32 = 12;
pub const TILE_GAP: i32 = 6;

/// Share of the cell a face label may take before it is scaled down.
const FACE_MAX_WIDTH: f64 = 0.86;

pub fn build_board_grid(state: &Rc<RefCell<AppState>>) -> gtk::Grid {
    let grid = gtk::Grid::new();
    grid.add_css_class("pairs-board");
    grid.set_row_spacing(TILE_GAP as u32);
    grid.set_column_spacing(TILE_GAP as u32);
    grid.set_halign(gtk::Align::Fill);
    grid.set_valign(gtk::Align::Fill);
    grid.set_hexpand(true);
    grid.set_vexpand(true);

    let (css_provider, grid_cols, grid_rows) = {
        let st = state.borrow();
        (st.dynamic_css_provider.clone(), st.grid_cols, st.grid_rows)
    };

    let update_styles = move |grid: &gtk::Grid| {
        let width = grid.width();
        let height = grid.height();
        if width <= 0 || height <= 0 || grid_cols <= 0 || grid_rows <= 0 {
            return;
        }
        let cell_width = (width - (grid_cols - 1) * TILE_GAP) / grid_cols;
        let cell_height = (height - (grid_rows - 1) * TILE_GAP) / grid_rows;
        let card_radius = (cell_width.min(cell_height) as f64 * 0.15) as i32;
        if let Some(provider) = &css_provider {
            provider.load_from_data(&format!(
                ".pairs-card {{ border-radius: {card_radius}px; }}"
            ));
        }
    };

    let update_styles_clone = update_styles.clone();
    grid.connect_closure(
        "notify::width",
        false,
        glib::closure_local!(move |grid: gtk::Grid, _: glib::ParamSpec| {
            update_styles_clone(&grid);
        }),
    );
    grid.connect_closure(
        "notify::height",
        false,
        glib::closure_local!(move |grid: gtk::Grid, _: glib::ParamSpec| {
            update_styles(&grid);
        }),
    );

    let mut buttons = Vec::new();

    for i in 0..(grid_rows * grid_cols) {
        let index = i as usize;
        let aspect_frame = gtk::AspectFrame::builder()
            .ratio(1.0)
            .obey_child(false)
            .halign(gtk::Align::Fill)
            .valign(gtk::Align::Fill)
            .hexpand(true)
            .vexpand(true)
            .build();

        let button = gtk::Button::builder()
            .css_classes(vec!["pairs-card"])
            .build();
        button.set_hexpand(true);
        button.set_vexpand(true);

        let drawing_area = gtk::DrawingArea::builder()
            .hexpand(true)
            .vexpand(true)
            .build();
        drawing_area.add_css_class("pairs-card-label");

        let state_draw = state.clone();
        drawing_area.set_draw_func(move |area, cr, width, height| {
            let st = state_draw.borrow();
            let Some(cell) = st.rendered.get(index) else {
                return;
            };
            let is_hidden = cell.state == CardState::Hidden;
            let text = cell.display();

            let min_dim = width.min(height) as f64;
            let mut font_size = if is_hidden {
                min_dim * 0.34
            } else {
                min_dim * 0.2
            };

            cr.set_antialias(cairo::Antialias::Best);

            let layout = pangocairo::functions::create_layout(cr);
            let mut font_desc = pango::FontDescription::new();
            font_desc.set_family("Cantarell, Noto Sans, sans");
            if is_hidden {
                font_desc.set_weight(pango::Weight::Bold);
            } else {
                font_desc.set_weight(pango::Weight::Semibold);
            }
            font_desc.set_size((font_size * pango::SCALE as f64) as i32);
            layout.set_font_description(Some(&font_desc));
            layout.set_text(text);

            let max_width = width as f64 * FACE_MAX_WIDTH;
            let (text_width, _) = layout.pixel_size();
            if text_width as f64 > max_width && text_width > 0 {
                font_size *= max_width / text_width as f64;
                font_desc.set_size((font_size * pango::SCALE as f64) as i32);
                layout.set_font_description(Some(&font_desc));
            }

            #[allow(deprecated)]
            let fg = area.style_context().color();
            cr.set_source_rgba(
                fg.red() as f64,
                fg.green() as f64,
                fg.blue() as f64,
                fg.alpha() as f64,
            );

            let (text_width, text_height) = layout.pixel_size();
            cr.move_to(
                (width as f64 - text_width as f64) / 2.0,
                (height as f64 - text_height as f64) / 2.0,
            );

            pangocairo::functions::show_layout(cr, &layout);
        });

        button.set_child(Some(&drawing_area));

        if let Some(cell) = state.borrow().rendered.get(index) {
            match cell.state {
                CardState::Matched => button.add_css_class("matched"),
                CardState::Revealed => button.add_css_class("active"),
                CardState::Hidden => (),
            }
        }

        let state_clone = state.clone();
        button.connect_clicked(move |_| {
            dispatch(&state_clone, InputEvent::CardClicked(index));
        });

        aspect_frame.set_child(Some(&button));

        let x = i % grid_cols;
        let y = i / grid_cols;
        grid.attach(&aspect_frame, x, y, 1, 1);
        buttons.push(button);
    }

    state.borrow_mut().grid_buttons = buttons;

    grid
}
