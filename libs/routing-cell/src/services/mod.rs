pub mod guard;
pub mod navigator;

pub use guard::RouteGuard;
pub use navigator::{Navigator, HISTORY_LIMIT, MAX_REDIRECT_HOPS};
