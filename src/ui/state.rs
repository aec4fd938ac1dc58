use gtk4 as gtk;
use libadwaita as adw;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::Settings;
use crate::game::{CellView, Flow, Screen, ThemeCatalog};

use super::scheduler::GlibScheduler;

pub struct AppState {
    pub view_stack: Option<gtk::Stack>,
    pub header: Option<adw::HeaderBar>,
    pub back_button: Option<gtk::Button>,
    pub restart_button: Option<gtk::Button>,
    pub title_menu: Option<gtk::Label>,
    pub title_game: Option<gtk::Widget>,
    pub title_game_subtitle: Option<gtk::Label>,
    pub difficulty_title_label: Option<gtk::Label>,
    pub victory_message_label: Option<gtk::Label>,
    pub board_container: Option<gtk::Box>,
    pub toast_overlay: Option<adw::ToastOverlay>,
    pub dynamic_css_provider: Option<gtk::CssProvider>,

    // Last frame pushed by the core; draw funcs read only this.
    pub rendered: Vec<CellView>,
    pub grid_buttons: Vec<gtk::Button>,
    pub grid_cols: i32,
    pub grid_rows: i32,
    pub shown_game_id: Option<u64>,
    pub flip_anim_phase: bool,

    // Game state
    pub flow: Flow,
    pub screen: Screen,
    pub rng: ChaCha8Rng,
    pub scheduler: GlibScheduler,
}

impl AppState {
    pub fn new(settings: &Settings, scheduler: GlibScheduler) -> Self {
        let rng = match settings.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_rng(&mut rand::rng()),
        };
        AppState {
            view_stack: None,
            header: None,
            back_button: None,
            restart_button: None,
            title_menu: None,
            title_game: None,
            title_game_subtitle: None,
            difficulty_title_label: None,
            victory_message_label: None,
            board_container: None,
            toast_overlay: None,
            dynamic_css_provider: None,
            rendered: Vec::new(),
            grid_buttons: Vec::new(),
            grid_cols: 0,
            grid_rows: 0,
            shown_game_id: None,
            flip_anim_phase: false,
            flow: Flow::new(ThemeCatalog::builtin(), settings.mismatch_delay()),
            screen: Screen::default(),
            rng,
            scheduler,
        }
    }

    pub fn visible_page(&self) -> Option<String> {
        self.view_stack
            .as_ref()
            .and_then(|stack| stack.visible_child_name())
            .map(|name| name.to_string())
    }
}
