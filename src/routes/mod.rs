/// Router Module Index
///
/// Organizes the application's routing into security-segregated modules so
/// access control is applied explicitly at the module level (via Axum
/// layers) instead of per-handler remembering.
///
/// The three modules map directly to the access roles.

/// Routes accessible without a session (registration, login, public reads).
pub mod public;

/// Routes protected by the `AuthUser` extractor middleware.
pub mod authenticated;

/// Routes restricted to administrators; the `AdminUser` extractor enforces
/// the role check inside each handler.
pub mod admin;
