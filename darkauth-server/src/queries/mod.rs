pub mod admins;
pub mod audit;
pub mod auth_codes;
pub mod clients;
pub mod install;
pub mod otp;
pub mod pake;
pub mod pending_auths;
pub mod permissions;
pub mod rbac;
pub mod refresh_tokens;
pub mod sessions;
pub mod settings;
pub mod users;
pub mod zk;
