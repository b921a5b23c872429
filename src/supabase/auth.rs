use serde::{Deserialize, Serialize};

use super::client::{check, SupabaseClient};
use crate::error::SupabaseError;
use crate::models::database::{AuthUser, Session, UserMetadata};

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct SignUp<'a> {
    email: &'a str,
    password: &'a str,
    data: &'a UserMetadata,
}

/// Sign-up answers with a session when auto-confirm is on, or the bare user when email confirmation is pending.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SignUpOutcome {
    Session(Session),
    PendingConfirmation(AuthUser),
}

impl SupabaseClient {
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, SupabaseError> {
        let url = format!("{}/auth/v1/token", self.base_url());
        let request = self
            .authorize(self.http().post(url), None)
            .query(&[("grant_type", "password")])
            .json(&PasswordGrant { email, password });
        let response = check(request.send().await?).await?;
        Ok(response.json().await?)
    }

    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: &UserMetadata,
    ) -> Result<SignUpOutcome, SupabaseError> {
        let url = format!("{}/auth/v1/signup", self.base_url());
        let request = self.authorize(self.http().post(url), None).json(&SignUp {
            email,
            password,
            data: metadata,
        });
        let response = check(request.send().await?).await?;
        Ok(response.json().await?)
    }

    pub async fn sign_out(&self, access_token: &str) -> Result<(), SupabaseError> {
        let url = format!("{}/auth/v1/logout", self.base_url());
        let request = self.authorize(self.http().post(url), Some(access_token));
        check(request.send().await?).await?;
        Ok(())
    }

    /// Resolves the user owning `access_token`.
    pub async fn get_user(&self, access_token: &str) -> Result<AuthUser, SupabaseError> {
        let url = format!("{}/auth/v1/user", self.base_url());
        let request = self.authorize(self.http().get(url), Some(access_token));
        let response = check(request.send().await?).await?;
        Ok(response.json().await?)
    }
}
