use gettextrs::gettext;
use gtk4 as gtk;
use libadwaita as adw;

use adw::prelude::*;

pub fn show_instructions_dialog(app: &adw::Application) -> adw::AlertDialog {
    let body = gettext(
        "Pick a theme and a board size.\n\
Turn two cards at a time to find matching pairs.\n\
A wrong pair turns back over after a moment.\n\
Clear the board to win.",
    );
    let dialog = adw::AlertDialog::new(Some(gettext("Instructions").as_str()), Some(body.as_str()));
    dialog.add_response("ok", &gettext("Got it"));
    dialog.set_default_response(Some("ok"));
    dialog.set_close_response("ok");
    dialog.present(app.active_window().as_ref());
    dialog
}

pub fn show_about_dialog(app: &adw::Application) -> adw::AboutDialog {
    let dialog = adw::AboutDialog::builder()
        .application_name("Pairs")
        .version(env!("CARGO_PKG_VERSION"))
        .comments(gettext("A memory game for finding pairs."))
        .build();
    dialog.add_legal_section("Pairs", None, gtk::License::MitX11, None);
    dialog.present(app.active_window().as_ref());
    dialog
}
