//! Authentication adapters.
//!
//! Implementations of the `SessionValidator` port:
//! - [`JwtSessionValidator`]: verifies externally-issued HS256 session tokens
//! - [`MockSessionValidator`]: configurable mock for tests

mod jwt;
mod mock;

pub use jwt::JwtSessionValidator;
pub use mock::MockSessionValidator;
