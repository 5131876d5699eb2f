//! Typed client for the todo REST API.
//!
//! # Overview
//! Everything the backend owns — persistence, auth checks, filtering, stats —
//! stays behind HTTP; this crate is the typed glue plus the client-state
//! synchronization layer:
//!
//! - [`ApiClient`]: bearer injection, JSON bodies, error normalization, and
//!   the unconditional invalidate-session-on-401 side effect.
//! - [`SessionManager`]: single authority over the persisted token and user
//!   profile, with change notifications instead of ad hoc global mutation.
//! - Resource services ([`AuthService`], [`TodoService`], [`CategoryService`]):
//!   pure path/payload mapping, no caching or dedup.
//! - [`Tracker`]: observable `{data, loading, error}` around any fallible
//!   operation, with generation-based discarding of superseded settlements.
//! - [`TodoListController`]: the local list cache and its reconciliation
//!   rules (fetch replaces, create prepends, update/toggle replace by id,
//!   delete removes by id).
//!
//! # Design
//! The network sits behind the [`http::Transport`] trait; production uses the
//! ureq-backed [`transport::UreqTransport`] with a fixed timeout and no
//! retries, tests script a fake. DTOs are defined independently from the
//! mock-server crate; integration tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod list;
pub mod services;
pub mod session;
pub mod tracker;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use list::{StatusFilter, TodoListController};
pub use services::{AuthService, CategoryService, TodoService};
pub use session::{SessionEvent, SessionManager, SessionStore};
pub use tracker::{AsyncState, Tracker};
pub use types::{
    Category, CreateCategoryRequest, CreateTodoRequest, LoginRequest, LoginResponse, Priority,
    RegisterRequest, Role, Todo, TodoFilters, TodoStats, UpdateCategoryRequest, UpdateTodoRequest,
    User, UserRef,
};
