use std::cell::RefCell;
use std::rc::Rc;

use gettextrs::gettext;
use gtk4::prelude::*;

use crate::game::Screen;

use super::state::AppState;

pub(super) fn set_header_menu(state: &Rc<RefCell<AppState>>) {
    let st = state.borrow();
    if let (Some(header), Some(title)) = (&st.header, &st.title_menu) {
        header.set_title_widget(Some(title));
    }
    if let Some(back) = &st.back_button {
        back.set_visible(false);
    }
    if let Some(restart) = &st.restart_button {
        restart.set_visible(false);
    }
}

pub(super) fn set_header_themes(state: &Rc<RefCell<AppState>>) {
    set_header_menu(state);
    if let Some(back) = &state.borrow().back_button {
        back.set_visible(true);
    }
}

pub(super) fn set_header_difficulty(state: &Rc<RefCell<AppState>>) {
    let st = state.borrow();
    if let (Some(header), Some(title)) = (&st.header, &st.title_menu) {
        header.set_title_widget(Some(title));
    }
    if let Some(back) = &st.back_button {
        back.set_visible(true);
    }
    if let Some(restart) = &st.restart_button {
        restart.set_visible(false);
    }
}

pub(super) fn set_header_game(state: &Rc<RefCell<AppState>>) {
    let st = state.borrow();
    if let (Some(header), Some(title_box)) = (&st.header, &st.title_game) {
        update_subtitle(&st);
        header.set_title_widget(Some(title_box));
    }
    if let Some(back) = &st.back_button {
        back.set_visible(true);
    }
    if let Some(restart) = &st.restart_button {
        restart.set_visible(true);
    }
}

pub(super) fn set_header_victory(state: &Rc<RefCell<AppState>>) {
    let st = state.borrow();
    if let (Some(header), Some(title)) = (&st.header, &st.title_menu) {
        header.set_title_widget(Some(title));
    }
    if let Some(back) = &st.back_button {
        back.set_visible(true);
    }
    if let Some(restart) = &st.restart_button {
        restart.set_visible(false);
    }
}

pub(super) fn update_subtitle(st: &AppState) {
    let Some(subtitle) = &st.title_game_subtitle else {
        return;
    };
    let text = match &st.screen {
        Screen::Playing(session) => {
            let controller = session.controller();
            let board = controller.board();
            format!(
                "{} {} | {}/{} {} | {} {} | {} {}",
                gettext(session.theme().name()),
                session.difficulty().name(),
                board.matched_pairs(),
                board.total_pairs(),
                gettext("pairs"),
                controller.attempts(),
                gettext("tries"),
                controller.mismatches(),
                gettext("misses"),
            )
        }
        Screen::GameOver { theme, difficulty } => {
            format!("{} {} | {}", gettext(theme.name()), difficulty.name(), gettext("Cleared"))
        }
        _ => String::new(),
    };
    subtitle.set_text(&text);
}
