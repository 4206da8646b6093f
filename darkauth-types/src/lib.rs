pub mod audit;
pub mod client;
pub mod install;
pub mod oidc;
pub mod org;
pub mod otp;
pub mod pagination;
pub mod pake;
pub mod session;
pub mod user;
pub mod zk;

pub use audit::*;
pub use client::*;
pub use install::*;
pub use oidc::*;
pub use org::*;
pub use otp::*;
pub use pagination::*;
pub use pake::*;
pub use session::*;
pub use user::*;
pub use zk::*;
