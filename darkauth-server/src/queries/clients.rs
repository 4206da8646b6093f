use darkauth_types::{Client, ClientType, TokenEndpointAuthMethod, ZkDelivery};
use sqlx::PgPool;

struct ClientRow {
    client_id: String,
    client_type: ClientType,
    token_endpoint_auth_method: TokenEndpointAuthMethod,
    require_pkce: bool,
    redirect_uris: Vec<String>,
    post_logout_redirect_uris: Vec<String>,
    grant_types: Vec<String>,
    response_types: Vec<String>,
    scopes: Vec<String>,
    allowed_zk_origins: Vec<String>,
    zk_delivery: ZkDelivery,
    zk_required: bool,
    id_token_lifetime_seconds: Option<i64>,
    refresh_token_lifetime_seconds: Option<i64>,
    client_secret_enc: Option<Vec<u8>>,
}

impl From<ClientRow> for Client {
    fn from(r: ClientRow) -> Self {
        Client {
            client_id: r.client_id,
            client_type: r.client_type,
            token_endpoint_auth_method: r.token_endpoint_auth_method,
            require_pkce: r.require_pkce,
            redirect_uris: r.redirect_uris,
            post_logout_redirect_uris: r.post_logout_redirect_uris,
            grant_types: r.grant_types,
            response_types: r.response_types,
            scopes: r.scopes,
            allowed_zk_origins: r.allowed_zk_origins,
            zk_delivery: r.zk_delivery,
            zk_required: r.zk_required,
            id_token_lifetime_seconds: r.id_token_lifetime_seconds,
            refresh_token_lifetime_seconds: r.refresh_token_lifetime_seconds,
            client_secret_enc: r.client_secret_enc,
        }
    }
}

pub async fn find(pool: &PgPool, client_id: &str) -> sqlx::Result<Option<Client>> {
    let row = sqlx::query_as!(
        ClientRow,
        r#"SELECT client_id, client_type as "client_type: ClientType",
            token_endpoint_auth_method as "token_endpoint_auth_method: TokenEndpointAuthMethod",
            require_pkce, redirect_uris, post_logout_redirect_uris, grant_types, response_types,
            scopes, allowed_zk_origins, zk_delivery as "zk_delivery: ZkDelivery", zk_required,
            id_token_lifetime_seconds, refresh_token_lifetime_seconds, client_secret_enc
           FROM clients WHERE client_id = $1"#,
        client_id
    )
    .fetch_optional(pool)
    .await?;
    Ok(row.map(Into::into))
}

pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> sqlx::Result<Vec<Client>> {
    let rows = sqlx::query_as!(
        ClientRow,
        r#"SELECT client_id, client_type as "client_type: ClientType",
            token_endpoint_auth_method as "token_endpoint_auth_method: TokenEndpointAuthMethod",
            require_pkce, redirect_uris, post_logout_redirect_uris, grant_types, response_types,
            scopes, allowed_zk_origins, zk_delivery as "zk_delivery: ZkDelivery", zk_required,
            id_token_lifetime_seconds, refresh_token_lifetime_seconds, client_secret_enc
           FROM clients ORDER BY client_id LIMIT $1 OFFSET $2"#,
        limit,
        offset
    )
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn count(pool: &PgPool) -> sqlx::Result<i64> {
    sqlx::query_scalar!(r#"SELECT count(*) as "count!" FROM clients"#)
        .fetch_one(pool)
        .await
}

#[allow(clippy::too_many_arguments)]
pub async fn insert(pool: &PgPool, client: &Client) -> sqlx::Result<()> {
    sqlx::query!(
        r#"INSERT INTO clients (client_id, client_type, token_endpoint_auth_method, require_pkce,
            redirect_uris, post_logout_redirect_uris, grant_types, response_types, scopes,
            allowed_zk_origins, zk_delivery, zk_required, id_token_lifetime_seconds,
            refresh_token_lifetime_seconds, client_secret_enc)
           VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)"#,
        client.client_id,
        client.client_type as ClientType,
        client.token_endpoint_auth_method as TokenEndpointAuthMethod,
        client.require_pkce,
        &client.redirect_uris,
        &client.post_logout_redirect_uris,
        &client.grant_types,
        &client.response_types,
        &client.scopes,
        &client.allowed_zk_origins,
        client.zk_delivery as ZkDelivery,
        client.zk_required,
        client.id_token_lifetime_seconds,
        client.refresh_token_lifetime_seconds,
        client.client_secret_enc.as_deref(),
    )
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn set_secret(pool: &PgPool, client_id: &str, secret_enc: &[u8]) -> sqlx::Result<()> {
    sqlx::query!(
        r#"UPDATE clients SET client_secret_enc = $2 WHERE client_id = $1"#,
        client_id,
        secret_enc
    )
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn delete(pool: &PgPool, client_id: &str) -> sqlx::Result<u64> {
    let result = sqlx::query!(r#"DELETE FROM clients WHERE client_id = $1"#, client_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
