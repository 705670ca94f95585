/// Notifies the application that the map content has changed and should be drawn again.
///
/// Feed loading and tile loading happen in background tasks. When such a task finishes it calls
/// [`Messenger::request_redraw`] so that the UI can repaint without polling.
pub trait Messenger: Send + Sync {
    /// Requests the map to be redrawn.
    fn request_redraw(&self);
}
