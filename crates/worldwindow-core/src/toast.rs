use std::time::{Duration, Instant};

/// How long a toast stays up unless replaced
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(2400);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastKind {
    #[default]
    Info,
    Success,
    Error,
}

/// Single transient notification
///
/// Only one message exists at a time. A new `show` replaces the current
/// one and restarts the countdown. Hiding only flips `visible`; the last
/// message and kind stay readable.
#[derive(Debug, Clone)]
pub struct Toast {
    message: String,
    kind: ToastKind,
    visible: bool,
    hide_at: Option<Instant>,
    duration: Duration,
}

impl Toast {
    pub fn new(duration: Duration) -> Self {
        Self {
            message: String::new(),
            kind: ToastKind::Info,
            visible: false,
            hide_at: None,
            duration,
        }
    }

    pub fn show(&mut self, message: impl Into<String>, kind: ToastKind) {
        self.show_at(message, kind, Instant::now());
    }

    pub fn show_at(&mut self, message: impl Into<String>, kind: ToastKind, now: Instant) {
        self.message = message.into();
        self.kind = kind;
        self.visible = true;
        self.hide_at = Some(now + self.duration);
    }

    /// Advance the clock; hides the toast once its deadline has passed.
    /// Returns true when this call changed visibility.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.hide_at {
            Some(deadline) if now >= deadline => {
                self.visible = false;
                self.hide_at = None;
                true
            }
            _ => false,
        }
    }

    /// Hide right away, keeping the last message and kind
    pub fn hide(&mut self) {
        self.visible = false;
        self.hide_at = None;
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> ToastKind {
        self.kind
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl Default for Toast {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_DURATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_hidden() {
        let toast = Toast::default();
        assert!(!toast.is_visible());
        assert_eq!(toast.duration(), Duration::from_millis(2400));
    }

    #[test]
    fn test_visible_until_deadline() {
        let start = Instant::now();
        let mut toast = Toast::default();
        toast.show_at("x", ToastKind::Info, start);

        assert!(!toast.tick(start + Duration::from_millis(2399)));
        assert!(toast.is_visible());

        assert!(toast.tick(start + Duration::from_millis(2400)));
        assert!(!toast.is_visible());
    }

    #[test]
    fn test_hide_keeps_last_message() {
        let start = Instant::now();
        let mut toast = Toast::default();
        toast.show_at("saved", ToastKind::Success, start);
        toast.tick(start + Duration::from_secs(3));

        assert!(!toast.is_visible());
        assert_eq!(toast.message(), "saved");
        assert_eq!(toast.kind(), ToastKind::Success);
    }

    #[test]
    fn test_new_show_restarts_countdown() {
        let start = Instant::now();
        let mut toast = Toast::default();
        toast.show_at("first", ToastKind::Info, start);
        toast.show_at("second", ToastKind::Error, start + Duration::from_millis(2000));

        // the first deadline has passed but the second hasn't
        toast.tick(start + Duration::from_millis(2500));
        assert!(toast.is_visible());
        assert_eq!(toast.message(), "second");
        assert_eq!(toast.kind(), ToastKind::Error);

        toast.tick(start + Duration::from_millis(4400));
        assert!(!toast.is_visible());
    }

    #[test]
    fn test_hide_cancels_deadline() {
        let start = Instant::now();
        let mut toast = Toast::default();
        toast.show_at("loading", ToastKind::Info, start);
        toast.hide();

        assert!(!toast.is_visible());
        assert!(!toast.tick(start + Duration::from_secs(5)));
        assert_eq!(toast.message(), "loading");
    }

    #[test]
    fn test_tick_without_show_is_noop() {
        let mut toast = Toast::new(Duration::from_millis(10));
        assert!(!toast.tick(Instant::now() + Duration::from_secs(1)));
        assert!(!toast.is_visible());
    }
}
