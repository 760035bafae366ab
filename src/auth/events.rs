//! Auth lifecycle callbacks exposed to the surrounding application.

/// Receives auth lifecycle events.
///
/// `on_auth_expired` fires when the session cannot be recovered (no refresh
/// token, or the refresh call failed). Both tokens have already been cleared
/// when it runs; the application typically routes to its sign-in screen.
///
/// Any `Fn() + Send + Sync` closure implements this trait.
pub trait AuthEvents: Send + Sync {
    fn on_auth_expired(&self);
}

impl<F> AuthEvents for F
where
    F: Fn() + Send + Sync,
{
    fn on_auth_expired(&self) {
        self()
    }
}

/// Ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAuthEvents;

impl AuthEvents for NoopAuthEvents {
    fn on_auth_expired(&self) {}
}
