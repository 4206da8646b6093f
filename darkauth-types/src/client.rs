use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "client_type", rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum ClientType {
    Public,
    Confidential,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "token_endpoint_auth_method"))]
#[serde(rename_all = "snake_case")]
pub enum TokenEndpointAuthMethod {
    None,
    ClientSecretBasic,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "zk_delivery", rename_all = "kebab-case"))]
#[serde(rename_all = "kebab-case")]
pub enum ZkDelivery {
    None,
    FragmentJwe,
}

/// A registered OIDC relying party.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Client {
    pub client_id: String,
    pub client_type: ClientType,
    pub token_endpoint_auth_method: TokenEndpointAuthMethod,
    pub require_pkce: bool,
    pub redirect_uris: Vec<String>,
    pub post_logout_redirect_uris: Vec<String>,
    pub grant_types: Vec<String>,
    pub response_types: Vec<String>,
    pub scopes: Vec<String>,
    pub allowed_zk_origins: Vec<String>,
    pub zk_delivery: ZkDelivery,
    pub zk_required: bool,
    pub id_token_lifetime_seconds: Option<i64>,
    pub refresh_token_lifetime_seconds: Option<i64>,
    /// KEK-wrapped client secret ciphertext; `None` for public clients.
    pub client_secret_enc: Option<Vec<u8>>,
}

impl Client {
    pub fn is_confidential(&self) -> bool {
        matches!(self.client_type, ClientType::Confidential)
    }

    pub fn requires_pkce(&self) -> bool {
        self.require_pkce || matches!(self.client_type, ClientType::Public)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewClient {
    pub client_id: String,
    pub client_type: ClientType,
    pub redirect_uris: Vec<String>,
    #[serde(default)]
    pub post_logout_redirect_uris: Vec<String>,
    #[serde(default)]
    pub grant_types: Vec<String>,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub require_pkce: bool,
    #[serde(default)]
    pub allowed_zk_origins: Vec<String>,
    #[serde(default)]
    pub zk_delivery: Option<ZkDelivery>,
    #[serde(default)]
    pub zk_required: bool,
    #[serde(default)]
    pub id_token_lifetime_seconds: Option<i64>,
    #[serde(default)]
    pub refresh_token_lifetime_seconds: Option<i64>,
}
