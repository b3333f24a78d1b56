//! Host page surface
//!
//! Abstracts the two things the flows need from the page that mounts them:
//! the anti-forgery token and navigation.

/// Surface of the page that hosts a handshake component
pub trait PageContext: Send + Sync {
    /// Read the anti-forgery token from the page context.
    ///
    /// The token is read at call time on every state-changing request, never
    /// cached at load time, so it always reflects the freshest value. `None`
    /// means the token element is absent, a configuration error that aborts
    /// the calling flow.
    fn csrf_token(&self) -> Option<String>;

    /// Navigate the page to `url` (the success path after authentication).
    fn visit(&self, url: &str);

    /// Force a full reload of the current page.
    fn reload(&self);
}
