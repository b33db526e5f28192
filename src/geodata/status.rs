/// One-way status notification sink, e.g. an on-screen panel. Notifications are
/// fire-and-forget and never influence the data returned by the provider.
pub trait StatusSink {
    fn notify(&self, message: &str);
}

/// Forwards status messages to the log.
pub struct LogStatusSink;

impl StatusSink for LogStatusSink {
    fn notify(&self, message: &str) {
        log::info!("[status] {}", message);
    }
}

impl<F: Fn(&str)> StatusSink for F {
    fn notify(&self, message: &str) {
        self(message)
    }
}
