// User endpoints (user-service).
//
// `get_user` is the fetch behind the client-side user lookup cache --
// it is called at most once per distinct id per session.

use serde::Deserialize;
use uuid::Uuid;

use crate::client::ApiClient;
use crate::envelope::{Page, PageRequest};
use crate::error::Error;

const USERS: &str = "v1/user-service/users";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub account: Option<AccountDto>,
}

impl ApiClient {
    pub async fn get_user(&self, user_id: Uuid) -> Result<UserResponse, Error> {
        self.get(&format!("{USERS}/{user_id}")).await
    }

    /// Paginated user listing (admin view).
    pub async fn list_users(&self, page: PageRequest) -> Result<Page<UserResponse>, Error> {
        self.get_page(USERS, &page.to_query()).await
    }
}
