//! Resource services: typed path/payload mapping over [`crate::ApiClient`].
//!
//! Services add no caching, batching, or request deduplication, and errors
//! pass through from the client untouched.

mod auth;
mod categories;
mod todos;

pub use auth::AuthService;
pub use categories::CategoryService;
pub use todos::TodoService;
