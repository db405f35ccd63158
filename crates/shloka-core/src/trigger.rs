//! Unlock trigger abstraction.

/// Polled source of unlock events.
///
/// Delivery is at-least-once; duplicates are absorbed by the engine's
/// debounce and throttle, so implementations only need to report that an
/// unlock happened since the previous poll.
pub trait UnlockSource {
    type Error;

    fn poll_unlock(&mut self) -> Result<bool, Self::Error>;
}
