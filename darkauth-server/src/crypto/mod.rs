pub mod b64;
pub mod hash;
pub mod jws;
pub mod pkce;
pub mod totp;

pub use b64::*;
pub use hash::*;
pub use pkce::*;
