//! Request-level enforcement gateway
//!
//! Wraps protected operations behind the permission system. A guarded
//! endpoint declares the capability it requires and a rule for locating
//! the project scope on the request; the gateway resolves the scope,
//! checks membership and permissions, and either runs the operation or
//! refuses with a single uniform outcome.
//!
//! Every refusal looks identical from the outside. The concrete reason
//! (missing identifier, unknown project, non-membership, permission
//! denial) is only visible in the log.

pub mod error;
pub mod guard;
pub mod scope;

pub use error::{Forbidden, Result};
pub use guard::PermissionGuard;
pub use scope::{ProtectedRequest, ScopeRule};
