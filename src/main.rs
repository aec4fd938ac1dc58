use gettextrs::{LocaleCategory, bind_textdomain_codeset, bindtextdomain, setlocale, textdomain};
use gtk4::glib;
use tracing::warn;

use pairs::config::Settings;
use pairs::{logging, ui};

const GETTEXT_PACKAGE: &str = "pairs";
const LOCALEDIR: &str = "/usr/share/locale";

fn main() -> glib::ExitCode {
    let (settings, problems) = Settings::load();
    logging::init(&settings.log_filter);
    for problem in &problems {
        warn!(error = %problem, "settings problem, using defaults");
    }

    setlocale(LocaleCategory::LcAll, "");
    if let Err(err) = bindtextdomain(GETTEXT_PACKAGE, LOCALEDIR) {
        warn!(error = %err, "translations unavailable");
    }
    if let Err(err) = bind_textdomain_codeset(GETTEXT_PACKAGE, "UTF-8") {
        warn!(error = %err, "cannot set translation codeset");
    }
    if let Err(err) = textdomain(GETTEXT_PACKAGE) {
        warn!(error = %err, "cannot select text domain");
    }

    ui::app::run(settings)
}
