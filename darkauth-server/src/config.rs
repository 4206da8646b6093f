use std::path::PathBuf;

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("missing required environment variable `{0}`")]
    Missing(&'static str),

    #[error("invalid value for `{name}`: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Every key in spec §6 "Configuration (enumerated)", loaded from the
/// process environment with a `DARKAUTH_` prefix and validated eagerly at
/// startup — the same "collect everything, then reject on the first
/// structural problem" shape the teacher's `ServerConfig::from_toml_file`
/// used for its cluster file.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub postgres_uri: String,
    pub user_port: u16,
    pub admin_port: u16,
    pub issuer: String,
    pub kek_passphrase: String,
    pub install_token: Option<String>,
    pub id_token_lifetime_seconds: i64,
    pub refresh_token_lifetime_seconds: i64,
    pub otp_require_for_users: bool,
    pub self_registration: bool,
    pub consent_ui_origin: String,
    pub key_dir: PathBuf,
}

impl ServerConfig {
    pub fn from_env() -> ConfigResult<Self> {
        let postgres_uri = required("DARKAUTH_POSTGRES_URI")?;
        let user_port = parse_or("DARKAUTH_USER_PORT", 9080)?;
        let admin_port = parse_or("DARKAUTH_ADMIN_PORT", 9081)?;
        let issuer = required("DARKAUTH_ISSUER")?;
        let kek_passphrase = required("DARKAUTH_KEK_PASSPHRASE")?;
        let install_token = std::env::var("DARKAUTH_INSTALL_TOKEN").ok();
        let id_token_lifetime_seconds =
            parse_or("DARKAUTH_ID_TOKEN_LIFETIME_SECONDS", 300)?;
        let refresh_token_lifetime_seconds =
            parse_or("DARKAUTH_REFRESH_TOKEN_LIFETIME_SECONDS", 2_592_000)?;
        let otp_require_for_users =
            parse_or("DARKAUTH_OTP_REQUIRE_FOR_USERS", false)?;
        let self_registration = parse_or("DARKAUTH_SELF_REGISTRATION", false)?;
        let consent_ui_origin = std::env::var("DARKAUTH_CONSENT_UI_ORIGIN")
            .unwrap_or_else(|_| format!("{issuer}/consent"));
        let key_dir = std::env::var("DARKAUTH_KEY_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_key_dir());

        if !issuer.starts_with("http://") && !issuer.starts_with("https://") {
            return Err(ConfigError::Invalid {
                name: "DARKAUTH_ISSUER",
                reason: "must be an absolute URL".into(),
            });
        }
        if kek_passphrase.len() < 16 {
            return Err(ConfigError::Invalid {
                name: "DARKAUTH_KEK_PASSPHRASE",
                reason: "must be at least 16 characters in production".into(),
            });
        }
        if user_port == 0 || admin_port == 0 {
            return Err(ConfigError::Invalid {
                name: "DARKAUTH_USER_PORT/DARKAUTH_ADMIN_PORT",
                reason: "ports must be non-zero".into(),
            });
        }

        Ok(Self {
            postgres_uri,
            user_port,
            admin_port,
            issuer,
            kek_passphrase,
            install_token,
            id_token_lifetime_seconds,
            refresh_token_lifetime_seconds,
            otp_require_for_users,
            self_registration,
            consent_ui_origin,
            key_dir,
        })
    }
}

fn required(name: &'static str) -> ConfigResult<String> {
    std::env::var(name).map_err(|_| ConfigError::Missing(name))
}

fn parse_or<T: std::str::FromStr>(name: &'static str, default: T) -> ConfigResult<T> {
    match std::env::var(name) {
        Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
            name,
            reason: "could not parse value".into(),
        }),
        Err(_) => Ok(default),
    }
}

fn default_key_dir() -> PathBuf {
    let mut path = dirs_next::home_dir().expect("failed to get home directory");
    path.extend([".local", "share", "darkauth", "keys"]);
    path
}
