//! OAuth2 authorization-code authentication against Google.

pub mod flow;
pub mod oauth;
pub mod scopes;
pub mod secrets;
pub mod tokens;

pub use oauth::{AuthorizationRequest, OAuth2Client};
pub use scopes::Scopes;
pub use secrets::{AppType, Secrets};
pub use tokens::{TokenResponse, Tokens};
