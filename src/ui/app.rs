use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::Once;
use std::time::Duration;

use adw::prelude::*;
use gettextrs::gettext;
use gio::SimpleAction;
use gtk4 as gtk;
use gtk4::gdk;
use gtk4::glib;
use gtk4::prelude::*;
use libadwaita as adw;
use tracing::{debug, info};

use crate::config::Settings;
use crate::game::{Difficulty, InputEvent, Notification, ScheduledTask, ScreenKind, Transition};

use super::board::CONTENT_MARGIN;
use super::dialogs::{show_about_dialog, show_instructions_dialog};
use super::scene::{
    render_cells, show_difficulty_selection, show_game, show_start_page, show_theme_selection,
    show_victory,
};
use super::scheduler::GlibScheduler;
use super::state::AppState;

pub const APP_ID: &str = "io.basshift.Pairs";
const START_PAGE: &str = "menu";

/// Beat between the last match and the victory page.
const VICTORY_DELAY_MS: u64 = 700;

/// Feeds one input event through the core and presents the result.
pub(super) fn dispatch(state: &Rc<RefCell<AppState>>, event: InputEvent) {
    let (before, transition) = {
        let mut guard = state.borrow_mut();
        let st = &mut *guard;
        let screen = std::mem::take(&mut st.screen);
        let before = screen.kind();
        let transition = st.flow.handle(screen, event, &mut st.rng, &mut st.scheduler);
        (before, transition)
    };
    present(state, before, transition);
}

fn run_scheduled_task(state: &Rc<RefCell<AppState>>, task: ScheduledTask) {
    let (before, transition) = {
        let mut st = state.borrow_mut();
        let screen = std::mem::take(&mut st.screen);
        let before = screen.kind();
        (before, st.flow.run_task(screen, task))
    };
    present(state, before, transition);
}

fn present(state: &Rc<RefCell<AppState>>, before: ScreenKind, transition: Transition) {
    let Transition {
        screen,
        notifications,
    } = transition;
    let after = screen.kind();
    let new_game = {
        let mut st = state.borrow_mut();
        st.screen = screen;
        let current = st.screen.session().map(|session| session.controller().game_id());
        current.is_some() && current != st.shown_game_id
    };
    if before != after {
        debug!(?before, ?after, "screen changed");
    }

    if before != after || new_game {
        match after {
            ScreenKind::ThemeSelection => show_theme_selection(state),
            ScreenKind::DifficultySelection => show_difficulty_selection(state),
            ScreenKind::Playing => show_game(state),
            // The victory page follows GameWon after a short beat.
            ScreenKind::GameOver => {}
        }
    }

    for notification in notifications {
        match notification {
            Notification::BoardRendered(cells) => render_cells(state, cells),
            Notification::GameWon => schedule_victory(state),
            Notification::Error(message) => show_toast(state, &message),
        }
    }
}

fn schedule_victory(state: &Rc<RefCell<AppState>>) {
    {
        let st = state.borrow();
        if let Some(container) = &st.board_container {
            container.add_css_class("no-hover");
        }
    }
    let state_victory = Rc::downgrade(state);
    glib::timeout_add_local_once(Duration::from_millis(VICTORY_DELAY_MS), move || {
        let Some(state) = state_victory.upgrade() else {
            return;
        };
        let still_over = state.borrow().screen.kind() == ScreenKind::GameOver;
        if still_over {
            show_victory(&state);
        }
    });
}

fn show_toast(state: &Rc<RefCell<AppState>>, message: &str) {
    let st = state.borrow();
    if let Some(overlay) = &st.toast_overlay {
        overlay.add_toast(adw::Toast::new(message));
    }
}

#[derive(Debug, PartialEq)]
enum Back {
    Stay,
    StartPage,
    Send(InputEvent),
}

fn back_from(kind: ScreenKind, page: Option<&str>) -> Back {
    match kind {
        ScreenKind::ThemeSelection if page == Some(START_PAGE) => Back::Stay,
        ScreenKind::ThemeSelection => Back::StartPage,
        ScreenKind::DifficultySelection => Back::Send(InputEvent::ChangeThemeRequested),
        ScreenKind::Playing | ScreenKind::GameOver => {
            Back::Send(InputEvent::ChangeDifficultyRequested)
        }
    }
}

fn go_back(state: &Rc<RefCell<AppState>>) {
    let back = {
        let st = state.borrow();
        back_from(st.screen.kind(), st.visible_page().as_deref())
    };
    match back {
        Back::Stay => {}
        Back::StartPage => show_start_page(state),
        Back::Send(event) => dispatch(state, event),
    }
}

pub fn run(settings: Settings) -> glib::ExitCode {
    glib::set_prgname(Some(APP_ID));
    let app = adw::Application::builder().application_id(APP_ID).build();

    app.connect_activate(move |app| {
        load_css();

        let state = Rc::new_cyclic(|weak: &Weak<RefCell<AppState>>| {
            let weak = weak.clone();
            let scheduler = GlibScheduler::new(move |task| {
                if let Some(state) = weak.upgrade() {
                    run_scheduled_task(&state, task);
                }
            });
            RefCell::new(AppState::new(&settings, scheduler))
        });

        let instructions_action = SimpleAction::new("instructions", None);
        instructions_action.connect_activate({
            let app = app.clone();
            move |_, _| {
                show_instructions_dialog(&app);
            }
        });
        app.add_action(&instructions_action);

        let about_action = SimpleAction::new("about", None);
        about_action.connect_activate({
            let app = app.clone();
            move |_, _| {
                show_about_dialog(&app);
            }
        });
        app.add_action(&about_action);

        let quit_action = SimpleAction::new("quit", None);
        quit_action.connect_activate({
            let app = app.clone();
            move |_, _| app.quit()
        });
        app.add_action(&quit_action);
        app.set_accels_for_action("app.quit", &["<Control>q"]);

        let dynamic_css_provider = gtk::CssProvider::new();
        if let Some(display) = gdk::Display::default() {
            gtk::style_context_add_provider_for_display(
                &display,
                &dynamic_css_provider,
                gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
            );
        }

        let title_menu = gtk::Label::new(None);
        title_menu.set_markup("<b>Pairs</b>");
        title_menu.set_halign(gtk::Align::Center);

        let title_game_box = gtk::Box::new(gtk::Orientation::Vertical, 0);
        title_game_box.set_valign(gtk::Align::Center);
        title_game_box.set_halign(gtk::Align::Center);
        title_game_box.set_hexpand(true);

        let title_game_main = gtk::Label::builder()
            .label("Pairs")
            .halign(gtk::Align::Center)
            .css_classes(vec!["game-title-main"])
            .build();

        let title_game_subtitle = gtk::Label::builder()
            .label("")
            .halign(gtk::Align::Center)
            .css_classes(vec!["game-title-subtitle", "caption"])
            .build();

        title_game_box.append(&title_game_main);
        title_game_box.append(&title_game_subtitle);

        let header = adw::HeaderBar::builder()
            .title_widget(&title_menu)
            .build();
        header.add_css_class("app-header");
        header.add_css_class("flat");

        let back_button = gtk::Button::builder()
            .icon_name("go-previous-symbolic")
            .build();
        back_button.set_tooltip_text(Some(gettext("Back").as_str()));
        back_button.connect_clicked({
            let state = state.clone();
            move |_| go_back(&state)
        });
        header.pack_start(&back_button);

        let menu_model = gio::Menu::new();
        menu_model.append(Some(gettext("Instructions").as_str()), Some("app.instructions"));
        menu_model.append(Some(gettext("About Pairs").as_str()), Some("app.about"));
        menu_model.append(Some(gettext("Quit").as_str()), Some("app.quit"));
        let menu_button = gtk::MenuButton::builder()
            .icon_name("open-menu-symbolic")
            .menu_model(&menu_model)
            .build();

        let restart_button = gtk::Button::builder()
            .icon_name("view-refresh-symbolic")
            .build();
        restart_button.set_tooltip_text(Some(gettext("New Game").as_str()));
        restart_button.connect_clicked({
            let state = state.clone();
            move |_| dispatch(&state, InputEvent::RestartRequested)
        });
        let end_box = gtk::Box::new(gtk::Orientation::Horizontal, 6);
        end_box.append(&restart_button);
        end_box.append(&menu_button);
        header.pack_end(&end_box);

        let view_stack = gtk::Stack::new();
        view_stack.set_hexpand(true);
        view_stack.set_vexpand(true);
        view_stack.set_hhomogeneous(false);
        view_stack.set_vhomogeneous(false);
        view_stack.set_interpolate_size(false);
        view_stack.set_transition_duration(300);

        let start_view = build_start_view(&state);
        view_stack.add_named(&start_view, Some(START_PAGE));

        let theme_view = build_theme_view(&state);
        view_stack.add_named(&theme_view, Some("themes"));

        let difficulty_view = build_difficulty_view(&state);
        view_stack.add_named(&difficulty_view, Some("difficulty"));

        let game_view = build_game_view(&state);
        view_stack.add_named(&game_view, Some("game"));

        let victory_view = build_victory_view(&state);
        view_stack.add_named(&victory_view, Some("victory"));

        view_stack.set_visible_child_name(START_PAGE);

        let toast_overlay = adw::ToastOverlay::new();
        toast_overlay.set_child(Some(&view_stack));

        let toolbar = adw::ToolbarView::new();
        toolbar.set_hexpand(true);
        toolbar.set_vexpand(true);
        toolbar.add_top_bar(&header);
        toolbar.set_content(Some(&toast_overlay));

        let win = adw::ApplicationWindow::builder()
            .application(app)
            .title("Pairs")
            .default_width(860)
            .default_height(680)
            .content(&toolbar)
            .build();
        win.set_size_request(360, 560);
        win.add_css_class("app-window");

        {
            let mut st = state.borrow_mut();
            st.view_stack = Some(view_stack.clone());
            st.header = Some(header.clone());
            st.back_button = Some(back_button);
            st.restart_button = Some(restart_button);
            st.title_menu = Some(title_menu);
            st.title_game = Some(title_game_box.upcast::<gtk::Widget>());
            st.title_game_subtitle = Some(title_game_subtitle);
            st.toast_overlay = Some(toast_overlay);
            st.dynamic_css_provider = Some(dynamic_css_provider);
        }

        let global_key = gtk::EventControllerKey::new();
        global_key.set_propagation_phase(gtk::PropagationPhase::Capture);
        global_key.connect_key_pressed({
            let state = state.clone();
            move |_, key, _, _| {
                if key == gdk::Key::Escape {
                    let on_start_page =
                        state.borrow().visible_page().as_deref() == Some(START_PAGE);
                    if !on_start_page {
                        go_back(&state);
                        return glib::Propagation::Stop;
                    }
                }
                glib::Propagation::Proceed
            }
        });
        win.add_controller(global_key);

        show_start_page(&state);
        info!("main window ready");
        win.present();
    });

    // Options are handled by the binary, not by GApplication.
    app.run_with_args::<&str>(&[])
}

fn load_css() {
    static RESOURCES_INIT: Once = Once::new();
    RESOURCES_INIT.call_once(|| {
        gio::resources_register_include!("pairs.gresource")
            .expect("failed to register embedded resources");
    });

    let Some(display) = gdk::Display::default() else {
        return;
    };

    let provider = gtk::CssProvider::new();
    provider.load_from_resource("/io/basshift/Pairs/style.css");
    gtk::style_context_add_provider_for_display(
        &display,
        &provider,
        gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
    );
}

fn menu_page(title_text: &str) -> (gtk::Box, gtk::Label, gtk::Box) {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 0);
    root.set_hexpand(true);
    root.set_vexpand(true);
    root.add_css_class("main-menu-root");

    let center = gtk::CenterBox::new();
    center.set_hexpand(true);
    center.set_vexpand(true);

    let content = gtk::Box::new(gtk::Orientation::Vertical, 6);
    content.set_halign(gtk::Align::Center);
    content.set_valign(gtk::Align::Center);
    content.add_css_class("main-menu-content");

    let title = gtk::Label::new(Some(title_text));
    title.add_css_class("main-menu-title");
    title.add_css_class("title-1");

    let buttons_box = gtk::Box::new(gtk::Orientation::Vertical, 13);
    buttons_box.set_halign(gtk::Align::Center);
    buttons_box.set_margin_top(18);

    content.append(&title);
    content.append(&buttons_box);
    center.set_center_widget(Some(&content));
    root.append(&center);

    (root, title, buttons_box)
}

fn menu_button(label: &str, on_click: impl Fn() + 'static) -> gtk::Button {
    let button = gtk::Button::with_label(label);
    button.add_css_class("main-menu-button");
    button.set_size_request(200, 44);
    button.connect_clicked(move |_| on_click());
    button
}

fn build_start_view(state: &Rc<RefCell<AppState>>) -> gtk::Box {
    let (root, _, buttons_box) = menu_page("Pairs");

    let start = menu_button(&gettext("Start"), {
        let state = state.clone();
        move || show_theme_selection(&state)
    });
    start.add_css_class("suggested-action");
    let help = menu_button(&gettext("How to Play"), {
        let state = state.clone();
        move || {
            let app = state
                .borrow()
                .view_stack
                .as_ref()
                .and_then(|stack| stack.root())
                .and_downcast::<gtk::Window>()
                .and_then(|window| window.application())
                .and_downcast::<adw::Application>();
            if let Some(app) = app {
                show_instructions_dialog(&app);
            }
        }
    });
    help.add_css_class("flat");

    buttons_box.append(&start);
    buttons_box.append(&help);
    root
}

fn build_theme_view(state: &Rc<RefCell<AppState>>) -> gtk::Box {
    let (root, _, buttons_box) = menu_page(&gettext("Select Theme"));

    let names: Vec<String> = state
        .borrow()
        .flow
        .catalog()
        .names()
        .map(str::to_string)
        .collect();
    for name in names {
        let button = menu_button(&gettext(name.as_str()), {
            let state = state.clone();
            move || dispatch(&state, InputEvent::ThemeChosen(name.clone()))
        });
        buttons_box.append(&button);
    }

    root
}

fn build_difficulty_view(state: &Rc<RefCell<AppState>>) -> gtk::Box {
    let (root, title, buttons_box) = menu_page(&gettext("Select Difficulty"));

    for difficulty in Difficulty::ALL {
        let (rows, columns) = difficulty.config();
        let button = menu_button(difficulty.name(), {
            let state = state.clone();
            move || dispatch(&state, InputEvent::DifficultyChosen { rows, columns })
        });
        buttons_box.append(&button);
    }

    let back = menu_button(&gettext("Back"), {
        let state = state.clone();
        move || dispatch(&state, InputEvent::ChangeThemeRequested)
    });
    back.add_css_class("flat");
    buttons_box.append(&back);

    state.borrow_mut().difficulty_title_label = Some(title);
    root
}

fn build_game_view(state: &Rc<RefCell<AppState>>) -> gtk::Box {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 0);
    root.set_hexpand(true);
    root.set_vexpand(true);
    root.add_css_class("game-root");

    let content = gtk::Box::new(gtk::Orientation::Vertical, 12);
    content.set_hexpand(true);
    content.set_vexpand(true);
    content.set_halign(gtk::Align::Fill);
    content.set_valign(gtk::Align::Fill);
    content.set_margin_top(CONTENT_MARGIN);
    content.set_margin_bottom(CONTENT_MARGIN);
    content.set_margin_start(CONTENT_MARGIN);
    content.set_margin_end(CONTENT_MARGIN);

    let board_card = gtk::Box::new(gtk::Orientation::Vertical, 0);
    board_card.set_halign(gtk::Align::Fill);
    board_card.set_valign(gtk::Align::Fill);
    board_card.set_hexpand(true);
    board_card.set_vexpand(true);
    board_card.add_css_class("pairs-card-container");

    content.append(&board_card);
    root.append(&content);

    state.borrow_mut().board_container = Some(board_card);

    root
}

fn build_victory_view(state: &Rc<RefCell<AppState>>) -> gtk::Box {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 0);
    root.set_hexpand(true);
    root.set_vexpand(true);
    root.add_css_class("victory-root");

    let center = gtk::CenterBox::new();
    center.set_hexpand(true);
    center.set_vexpand(true);

    let content = gtk::Box::new(gtk::Orientation::Vertical, 14);
    content.set_halign(gtk::Align::Center);
    content.set_valign(gtk::Align::Center);
    content.add_css_class("victory-card");
    content.set_margin_top(28);
    content.set_margin_bottom(28);
    content.set_margin_start(28);
    content.set_margin_end(28);

    let title = gtk::Label::new(Some(gettext("You Win!").as_str()));
    title.add_css_class("victory-title");
    title.add_css_class("title-1");

    let message = gtk::Label::new(None);
    message.add_css_class("victory-message");
    message.add_css_class("body");
    message.set_wrap(true);
    message.set_justify(gtk::Justification::Center);
    message.set_max_width_chars(36);

    let buttons = gtk::Box::new(gtk::Orientation::Vertical, 12);
    buttons.set_halign(gtk::Align::Center);
    buttons.set_margin_top(6);

    let again_btn = menu_button(&gettext("Play Again!"), {
        let state = state.clone();
        move || dispatch(&state, InputEvent::RestartRequested)
    });
    again_btn.add_css_class("suggested-action");
    let difficulty_btn = menu_button(&gettext("Change Difficulty"), {
        let state = state.clone();
        move || dispatch(&state, InputEvent::ChangeDifficultyRequested)
    });
    let theme_btn = menu_button(&gettext("Change Theme"), {
        let state = state.clone();
        move || dispatch(&state, InputEvent::ChangeThemeRequested)
    });

    buttons.append(&again_btn);
    buttons.append(&difficulty_btn);
    buttons.append(&theme_btn);

    content.append(&title);
    content.append(&message);
    content.append(&buttons);
    center.set_center_widget(Some(&content));
    root.append(&center);

    state.borrow_mut().victory_message_label = Some(message);

    root
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn back_walks_toward_the_start_page() {
        assert_eq!(back_from(ScreenKind::ThemeSelection, Some(START_PAGE)), Back::Stay);
        assert_eq!(back_from(ScreenKind::ThemeSelection, Some("themes")), Back::StartPage);
        assert_eq!(
            back_from(ScreenKind::DifficultySelection, Some("difficulty")),
            Back::Send(InputEvent::ChangeThemeRequested)
        );
    }

    #[test]
    fn back_from_a_game_picks_a_new_size() {
        for kind in [ScreenKind::Playing, ScreenKind::GameOver] {
            assert_eq!(
                back_from(kind, Some("game")),
                Back::Send(InputEvent::ChangeDifficultyRequested)
            );
        }
    }
}
