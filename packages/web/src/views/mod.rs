mod auth;
pub use auth::Auth;

mod guard;
pub use guard::RouteGuard;

mod notes;
pub use notes::Notes;
