/// Transient, user-visible notifications (toasts).
pub trait Notifier {
    fn notify(&self, message: &str);
}
