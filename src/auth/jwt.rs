use async_trait::async_trait;
use chrono::{Duration, Utc};
use error_stack::{Report, Result, ResultExt};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{AuthError, Authenticator};
use crate::schema::User;
use crate::store::CredentialStore;

const ALGORITHM: Algorithm = Algorithm::HS512;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Claims {
    /// Username of the token holder.
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues HS512 access tokens and resolves them against the
/// credential store on every call.
#[derive(Clone)]
pub struct JwtAuthenticator {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime: Duration,
    store: Arc<dyn CredentialStore>,
}

impl JwtAuthenticator {
    #[must_use]
    pub fn new(secret: &[u8], lifetime: Duration, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            lifetime,
            store,
        }
    }

    pub fn encode(&self, claims: &Claims) -> Result<String, AuthError> {
        jsonwebtoken::encode(&Header::new(ALGORITHM), claims, &self.encoding)
            .change_context(AuthError::Issue)
    }

    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::new(ALGORITHM);
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .change_context(AuthError::InvalidToken)
    }
}

impl std::fmt::Debug for JwtAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtAuthenticator")
            .field("algorithm", &ALGORITHM)
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Authenticator for JwtAuthenticator {
    #[tracing::instrument(skip_all, name = "auth.resolve")]
    async fn resolve(&self, token: &str) -> Result<User, AuthError> {
        let claims = self.decode(token)?;
        let user = self
            .store
            .find(&claims.sub)
            .await
            .change_context(AuthError::Store)?;

        user.ok_or_else(|| {
            Report::new(AuthError::UnknownUser).attach_printable("token subject no longer exists")
        })
    }

    #[tracing::instrument(skip_all, name = "auth.issue", fields(user.name = %user.username))]
    fn issue(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.username.clone(),
            iat: now.timestamp(),
            exp: (now + self.lifetime).timestamp(),
        };
        self.encode(&claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::NewUser;
    use crate::store::MemoryStore;

    const SECRET: &[u8] = b"unit test signing key";

    async fn setup() -> (JwtAuthenticator, User) {
        let store = MemoryStore::new();
        let user = store.insert(NewUser::new("bob", "hash")).await.unwrap();
        let auth = JwtAuthenticator::new(SECRET, Duration::minutes(5), Arc::new(store));
        (auth, user)
    }

    #[tokio::test]
    async fn issued_tokens_resolve_to_the_user() {
        let (auth, user) = setup().await;
        let token = auth.issue(&user).unwrap();

        let resolved = auth.resolve(&token).await.unwrap();
        assert_eq!(resolved.username, "bob");
    }

    #[tokio::test]
    async fn rejects_garbage_and_foreign_tokens() {
        let (auth, user) = setup().await;

        let error = auth.resolve("not.a.token").await.unwrap_err();
        assert_eq!(error.current_context(), &AuthError::InvalidToken);

        let store = Arc::new(MemoryStore::new());
        let other = JwtAuthenticator::new(b"some other signing key", Duration::minutes(5), store);
        let token = other.issue(&user).unwrap();
        let error = auth.resolve(&token).await.unwrap_err();
        assert_eq!(error.current_context(), &AuthError::InvalidToken);
    }

    #[tokio::test]
    async fn rejects_expired_tokens() {
        let (auth, _) = setup().await;
        let now = Utc::now();
        let token = auth
            .encode(&Claims {
                sub: "bob".into(),
                iat: (now - Duration::hours(2)).timestamp(),
                exp: (now - Duration::hours(1)).timestamp(),
            })
            .unwrap();

        let error = auth.resolve(&token).await.unwrap_err();
        assert_eq!(error.current_context(), &AuthError::InvalidToken);
    }

    #[tokio::test]
    async fn rejects_tokens_of_missing_users() {
        let (auth, _) = setup().await;
        let ghost = NewUser::new("ghost", "hash").into_user();
        let token = auth.issue(&ghost).unwrap();

        let error = auth.resolve(&token).await.unwrap_err();
        assert_eq!(error.current_context(), &AuthError::UnknownUser);
    }
}
