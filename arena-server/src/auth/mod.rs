pub mod middleware;

pub use middleware::{AuthUser, admin_middleware, auth_middleware};
