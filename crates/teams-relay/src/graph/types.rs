//! Microsoft identity and Graph wire formats.

use serde::{Deserialize, Serialize};

// ============================================================================
// Token endpoint
// ============================================================================

#[derive(Serialize)]
pub(super) struct TokenRequest<'a> {
    pub client_id: &'a str,
    pub client_secret: &'a str,
    pub scope: &'a str,
    pub grant_type: &'static str,
}

#[derive(Deserialize)]
pub(super) struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
}

// ============================================================================
// Graph resources
// ============================================================================

/// Any Graph resource where only the `id` matters to us.
#[derive(Deserialize)]
pub(super) struct IdResponse {
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Serialize)]
pub(super) struct CreateChatRequest {
    #[serde(rename = "chatType")]
    pub chat_type: &'static str,
    pub members: Vec<ChatMember>,
}

#[derive(Serialize)]
pub(super) struct ChatMember {
    #[serde(rename = "@odata.type")]
    pub odata_type: &'static str,
    pub roles: Vec<&'static str>,
    #[serde(rename = "user@odata.bind")]
    pub user_bind: String,
}

impl CreateChatRequest {
    /// A one-to-one chat whose other member is the bound user, as owner.
    pub fn one_on_one(user_bind: String) -> Self {
        Self {
            chat_type: "oneOnOne",
            members: vec![ChatMember {
                odata_type: "#microsoft.graph.aadUserConversationMember",
                roles: vec!["owner"],
                user_bind,
            }],
        }
    }
}

#[derive(Serialize)]
pub(super) struct ChatMessageRequest<'a> {
    pub body: ItemBody<'a>,
}

#[derive(Serialize)]
pub(super) struct ItemBody<'a> {
    pub content: &'a str,
}
