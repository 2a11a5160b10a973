/// Sink for user-visible notifications (timer completion, server pushes)
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, body: &str);
}
