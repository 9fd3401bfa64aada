pub mod context;
pub mod cookies;
pub mod guard;
pub mod role;
pub mod session;

pub use context::{AuthContext, AuthState, LOGIN_PATH};
pub use guard::RouteGuard;
pub use role::Role;
pub use session::{Session, SessionStore, Storage, UserProfile};
