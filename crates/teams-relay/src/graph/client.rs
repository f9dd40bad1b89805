//! Graph-backed [`MessagingPlatform`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use super::types::{
    ChatMessageRequest, CreateChatRequest, IdResponse, ItemBody, TokenRequest, TokenResponse,
};
use crate::config::ServiceCredentials;
use crate::email::EmailAddress;
use crate::relay::{
    AccessToken, CallError, ConversationId, MessagingPlatform, RelayError, SendResult, UserId,
};

/// Build the shared HTTP client. `timeout` applies to every outbound call.
pub fn build_http_client(timeout: Option<Duration>) -> Result<Client, RelayError> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| RelayError::Unexpected(format!("failed to build http client: {e}")))
}

/// Talks to the Microsoft identity platform and Graph API.
pub struct GraphClient {
    client: Client,
    credentials: ServiceCredentials,
    token_url: Url,
    api_base: Url,
}

impl GraphClient {
    pub fn new(
        client: Client,
        credentials: ServiceCredentials,
        api_base_url: &str,
    ) -> Result<Self, RelayError> {
        let authority = strip_tenant(
            parse_base(&credentials.authority_url)?,
            &credentials.tenant_id,
        );
        let token_url = join(
            &authority,
            &[credentials.tenant_id.as_str(), "oauth2", "v2.0", "token"],
        )?;
        let api_base = parse_base(api_base_url)?;

        Ok(Self {
            client,
            credentials,
            token_url,
            api_base,
        })
    }

    pub fn token_url(&self) -> &Url {
        &self.token_url
    }

    /// `{api_base}/users('{id}')`, the form Graph expects in `user@odata.bind`.
    fn user_bind(&self, user: &UserId) -> String {
        format!(
            "{}/users('{}')",
            self.api_base.as_str().trim_end_matches('/'),
            user.as_str()
        )
    }

    /// POST or GET, then fail with `Status` on a non-success response.
    async fn send_checked(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, CallError> {
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(CallError::from_response(response).await);
        }
        Ok(response)
    }

    async fn read_id(response: reqwest::Response) -> Result<String, CallError> {
        let body: IdResponse = response.json().await.map_err(CallError::Decode)?;
        body.id
            .filter(|id| !id.is_empty())
            .ok_or(CallError::MissingField("id"))
    }
}

#[async_trait]
impl MessagingPlatform for GraphClient {
    async fn acquire_token(&self) -> Result<AccessToken, RelayError> {
        let form = TokenRequest {
            client_id: &self.credentials.client_id,
            client_secret: self.credentials.client_secret.expose(),
            scope: &self.credentials.scope,
            grant_type: "client_credentials",
        };
        debug!(
            url = %self.token_url,
            client_id = %self.credentials.client_id,
            "requesting token"
        );

        let request = self.client.post(self.token_url.clone()).form(&form);
        let response = self.send_checked(request).await.map_err(RelayError::Auth)?;
        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| RelayError::Auth(CallError::Decode(e)))?;

        body.access_token
            .filter(|t| !t.is_empty())
            .map(AccessToken::new)
            .ok_or(RelayError::Auth(CallError::MissingField("access_token")))
    }

    async fn resolve_user(
        &self,
        token: &AccessToken,
        email: &EmailAddress,
    ) -> Result<UserId, RelayError> {
        let url = join(&self.api_base, &["users", email.as_str()])?;
        debug!(%url, "looking up user");

        let request = self.client.get(url).bearer_auth(token.bearer());
        let response = self
            .send_checked(request)
            .await
            .map_err(RelayError::Resolution)?;
        let id = Self::read_id(response)
            .await
            .map_err(RelayError::Resolution)?;
        Ok(UserId::new(id))
    }

    async fn establish_conversation(
        &self,
        token: &AccessToken,
        user: &UserId,
    ) -> Result<ConversationId, RelayError> {
        let url = join(&self.api_base, &["chats"])?;
        let body = CreateChatRequest::one_on_one(self.user_bind(user));
        debug!(%url, user_id = %user, "creating one-on-one chat");

        let request = self
            .client
            .post(url)
            .bearer_auth(token.bearer())
            .json(&body);
        let response = self
            .send_checked(request)
            .await
            .map_err(RelayError::Conversation)?;
        let id = Self::read_id(response)
            .await
            .map_err(RelayError::Conversation)?;
        Ok(ConversationId::new(id))
    }

    async fn dispatch(
        &self,
        token: &AccessToken,
        conversation: &ConversationId,
        content: &str,
    ) -> Result<SendResult, RelayError> {
        let url = join(&self.api_base, &["chats", conversation.as_str(), "messages"])?;
        let body = ChatMessageRequest {
            body: ItemBody { content },
        };
        debug!(%url, "posting chat message");

        let request = self
            .client
            .post(url)
            .bearer_auth(token.bearer())
            .json(&body);
        let response = self
            .send_checked(request)
            .await
            .map_err(RelayError::Dispatch)?;

        // The message was accepted; an unreadable body only loses the echo.
        let bytes = response
            .bytes()
            .await
            .map_err(|e| RelayError::Dispatch(CallError::Transport(e)))?;
        let data = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        Ok(SendResult::sent(data))
    }
}

// ============================================================================
// URL helpers
// ============================================================================

fn parse_base(raw: &str) -> Result<Url, RelayError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| RelayError::Unexpected(format!("invalid base url {raw:?}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(RelayError::Unexpected(format!(
            "base url {raw:?} cannot carry a path"
        )));
    }
    Ok(url)
}

/// Drop a trailing `tenant` segment so a tenant-specific authority such as
/// `https://login.microsoftonline.com/{tenant}` is not joined twice.
fn strip_tenant(mut authority: Url, tenant: &str) -> Url {
    let ends_with_tenant = authority
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .is_some_and(|last| last == tenant);
    if ends_with_tenant && let Ok(mut segments) = authority.path_segments_mut() {
        segments.pop_if_empty().pop();
    }
    authority
}

/// Append percent-encoded path segments to `base`.
fn join(base: &Url, segments: &[&str]) -> Result<Url, RelayError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| RelayError::Unexpected(format!("base url {base} cannot carry a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
