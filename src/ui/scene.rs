use std::cell::RefCell;
use std::rc::Rc;

use gettextrs::gettext;
use gtk4 as gtk;
use gtk4::prelude::*;

use crate::game::{CardState, CellView};

use super::board::build_board_grid;
use super::hud::{
    set_header_difficulty, set_header_game, set_header_menu, set_header_themes,
    set_header_victory, update_subtitle,
};
use super::state::AppState;

fn clear_flip_classes(button: &gtk::Button) {
    button.remove_css_class("flip-show-a");
    button.remove_css_class("flip-show-b");
}

fn redraw_button_child(button: &gtk::Button) {
    if let Some(child) = button.child() {
        child.queue_draw();
    }
}

fn play_flip_show(st: &mut AppState, index: usize) {
    let Some(button) = st.grid_buttons.get(index).cloned() else {
        return;
    };
    clear_flip_classes(&button);
    // Alternate classes so the same animation restarts on back-to-back flips.
    st.flip_anim_phase = !st.flip_anim_phase;
    if st.flip_anim_phase {
        button.add_css_class("flip-show-a");
    } else {
        button.add_css_class("flip-show-b");
    }
}

fn set_visible_page(st: &AppState, name: &str, transition: gtk::StackTransitionType) {
    if let Some(stack) = &st.view_stack {
        stack.set_transition_type(transition);
        stack.set_visible_child_name(name);
    }
}

/// Replaces the board widgets for the game now on screen.
pub(super) fn rebuild_board(state: &Rc<RefCell<AppState>>) {
    let board_container = {
        let mut st = state.borrow_mut();
        let Some((rows, columns, game_id, cells)) = st.screen.session().map(|session| {
            let board = session.controller().board();
            (
                board.rows() as i32,
                board.columns() as i32,
                session.controller().game_id(),
                board.cells(),
            )
        }) else {
            return;
        };
        st.grid_rows = rows;
        st.grid_cols = columns;
        st.shown_game_id = Some(game_id);
        st.rendered = cells;
        st.board_container.clone()
    };
    let Some(board_container) = board_container else {
        return;
    };

    while let Some(child) = board_container.first_child() {
        board_container.remove(&child);
    }
    let grid = build_board_grid(state);
    let (grid_cols, grid_rows) = {
        let st = state.borrow();
        (st.grid_cols, st.grid_rows)
    };
    let grid_ratio = if grid_rows > 0 {
        grid_cols as f32 / grid_rows as f32
    } else {
        1.0
    };
    let grid_frame = gtk::AspectFrame::new(0.5, 0.5, grid_ratio, false);
    grid_frame.set_halign(gtk::Align::Fill);
    grid_frame.set_valign(gtk::Align::Fill);
    grid_frame.set_hexpand(true);
    grid_frame.set_vexpand(true);
    grid_frame.set_child(Some(&grid));
    board_container.append(&grid_frame);
}

/// Pushes a frame from the core onto the board buttons.
pub(super) fn render_cells(state: &Rc<RefCell<AppState>>, cells: Vec<CellView>) {
    let mut st = state.borrow_mut();
    let previous = std::mem::take(&mut st.rendered);
    st.rendered = cells;

    for idx in 0..st.grid_buttons.len() {
        let Some(cell) = st.rendered.get(idx).cloned() else {
            continue;
        };
        let was_hidden = previous
            .get(idx)
            .is_none_or(|old| old.state == CardState::Hidden);
        let button = st.grid_buttons[idx].clone();
        button.remove_css_class("active");
        button.remove_css_class("matched");
        match cell.state {
            CardState::Revealed => button.add_css_class("active"),
            CardState::Matched => button.add_css_class("matched"),
            CardState::Hidden => {}
        }
        if was_hidden != (cell.state == CardState::Hidden) {
            play_flip_show(&mut st, idx);
        }
        redraw_button_child(&button);
    }
    update_subtitle(&st);
}

pub(super) fn show_start_page(state: &Rc<RefCell<AppState>>) {
    set_header_menu(state);
    let st = state.borrow();
    set_visible_page(&st, "menu", gtk::StackTransitionType::SlideRight);
}

pub(super) fn show_theme_selection(state: &Rc<RefCell<AppState>>) {
    set_header_themes(state);
    let st = state.borrow();
    let transition = if st.visible_page().as_deref() == Some("menu") {
        gtk::StackTransitionType::SlideLeft
    } else {
        gtk::StackTransitionType::SlideRight
    };
    set_visible_page(&st, "themes", transition);
}

pub(super) fn show_difficulty_selection(state: &Rc<RefCell<AppState>>) {
    {
        let st = state.borrow();
        if let (Some(label), Some(theme)) = (&st.difficulty_title_label, st.screen.theme()) {
            label.set_text(&format!("{} · {}", gettext(theme.name()), gettext("Select Difficulty")));
        }
    }
    set_header_difficulty(state);
    let st = state.borrow();
    let transition = if st.visible_page().as_deref() == Some("themes") {
        gtk::StackTransitionType::SlideLeft
    } else {
        gtk::StackTransitionType::SlideRight
    };
    set_visible_page(&st, "difficulty", transition);
}

pub(super) fn show_game(state: &Rc<RefCell<AppState>>) {
    let needs_rebuild = {
        let st = state.borrow();
        let current = st.screen.session().map(|session| session.controller().game_id());
        current.is_some() && current != st.shown_game_id
    };
    if needs_rebuild {
        rebuild_board(state);
    }
    {
        let st = state.borrow();
        if let Some(container) = &st.board_container {
            container.remove_css_class("no-hover");
        }
    }
    set_header_game(state);
    let st = state.borrow();
    set_visible_page(&st, "game", gtk::StackTransitionType::SlideLeft);
}

pub(super) fn show_victory(state: &Rc<RefCell<AppState>>) {
    {
        let st = state.borrow();
        if let (Some(label), Some(theme), Some(difficulty)) = (
            &st.victory_message_label,
            st.screen.theme(),
            st.screen.difficulty(),
        ) {
            label.set_text(&format!(
                "{} ({} {})",
                gettext("Congratulations! You've matched all pairs!"),
                gettext(theme.name()),
                difficulty.name()
            ));
        }
    }
    set_header_victory(state);
    let st = state.borrow();
    set_visible_page(&st, "victory", gtk::StackTransitionType::SlideLeft);
}
