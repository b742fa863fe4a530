//! Bearer-token authentication: minting, verification, and the
//! access guard for protected routes.

mod guard;
mod token;

pub use guard::AuthUser;
pub use token::{Claims, TokenService};
