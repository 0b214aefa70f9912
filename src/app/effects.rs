use crate::app::model::Panel;
use crate::app::{App, Message, Model, ToastLevel};

impl App {
    /// Run the I/O that follows a state transition.
    ///
    /// Loads, deletes and store writes happen here; failures become toasts
    /// or the error placeholder, never a crash.
    pub(super) fn handle_message_side_effects(model: &mut Model, msg: &Message) {
        match msg {
            Message::OpenFile(path) => match model.open_file(path) {
                Ok(()) => {
                    let title = model.title().to_string();
                    model.show_toast(ToastLevel::Info, format!("Opened {title}"));
                }
                Err(err) => model.show_load_error(&err),
            },
            Message::OpenBook(name) => {
                if let Err(err) = model.open_saved_book(name) {
                    model.show_load_error(&err);
                }
            }
            Message::DeleteBook(name) => match model.delete_book(name) {
                Ok(true) => model.show_toast(ToastLevel::Info, format!("Deleted {name}")),
                Ok(false) => {
                    model.show_toast(ToastLevel::Warning, format!("No saved book named {name}"));
                }
                Err(err) => {
                    tracing::warn!(%err, name, "delete failed");
                    model.show_toast(ToastLevel::Error, format!("Could not delete {name}: {err}"));
                }
            },
            Message::ToggleLibrary if model.is_panel_open(Panel::Library) => {
                model.refresh_library();
            }
            _ => {}
        }

        if msg.changes_preferences()
            && let Err(err) = model.save_preferences()
        {
            model.report_store_error("Could not save preferences", &err);
        }

        if msg.moves_reading_position() {
            match model.save_reading_progress() {
                Ok(true) => tracing::trace!(offset = model.viewport.offset(), "saved progress"),
                Ok(false) => {}
                Err(err) => model.report_store_error("Could not save progress", &err),
            }
        }
    }
}
