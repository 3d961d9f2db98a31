use axum::Router;

/// A service module that contributes HTTP routes.
///
/// Each module's router already carries its own prefix (the panel module
/// serves `/panel/v1/...`); the server binary merges them side by side.
pub trait Module: Send + Sync {
    /// Module name, used for logging.
    fn name(&self) -> &str;

    /// Return the module's routes, fully prefixed and with state applied.
    fn routes(&self) -> Router;
}
