//! Common test utilities and fixtures for integration tests
//!
//! Every test gets its own application over a fresh in-memory store seeded
//! with the ranking scale, one movie, and one account per role.

use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, TimeDelta, Utc};
use marquee_auth::{jwt, AuthConfig, Claims, Identity, Role, TokenIssuer, TokenPair};
use marquee_classifier::mock::MockClassifier;
use marquee_common::{collections, hash_password, Config, Document, DocumentStore, Filter};
use marquee_store::MemoryDocumentStore;
use serde_json::{json, Value};
use tower::ServiceExt;

pub const SEEDED_MOVIE: &str = "tt0111161";
pub const USER_PASSWORD: &str = "viewer-password";
pub const ADMIN_PASSWORD: &str = "curator-password";

const ACCESS_SECRET: &str = "integration-access-secret";
const REFRESH_SECRET: &str = "integration-refresh-secret";

/// Test configuration: memory store, mock classifier, distinct secrets
pub fn test_config() -> Config {
    let vars = [
        ("STORE", "memory"),
        ("CLASSIFIER_PROVIDER", "mock"),
        ("SECRET_ACCESS_KEY", ACCESS_SECRET),
        ("SECRET_REFRESH_KEY", REFRESH_SECRET),
        ("TOKEN_ISSUER", "marquee-test"),
    ];
    Config::from_lookup(|name| {
        vars.iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.to_string())
    })
    .unwrap()
}

/// A seeded account and the identity its tokens carry
#[derive(Debug, Clone)]
pub struct AccountFixture {
    pub identity: Identity,
    pub password: &'static str,
}

/// Test application with direct access to its store
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryDocumentStore>,
    pub auth_config: AuthConfig,
    pub user: AccountFixture,
    pub admin: AccountFixture,
}

impl TestApp {
    pub async fn new() -> Result<Self> {
        let config = test_config();
        let store = Arc::new(MemoryDocumentStore::new());

        seed_rankings(store.as_ref()).await?;
        seed_movie(store.as_ref()).await?;
        let user = seed_account(store.as_ref(), "viewer", Role::User, USER_PASSWORD).await?;
        let admin = seed_account(store.as_ref(), "curator", Role::Admin, ADMIN_PASSWORD).await?;

        let router =
            marquee_app::create_app(&config, store.clone(), Arc::new(MockClassifier::new()))?;
        let auth_config = AuthConfig::from_config(&config)?;

        Ok(Self {
            router,
            store,
            auth_config,
            user,
            admin,
        })
    }

    /// Issue a token pair the way the running application would
    pub fn tokens_for(&self, account: &AccountFixture) -> TokenPair {
        TokenIssuer::new(self.auth_config.clone())
            .issue(&account.identity)
            .unwrap()
    }

    pub fn access_token(&self, account: &AccountFixture) -> String {
        self.tokens_for(account).access_token
    }

    /// Access token for `account` issued at `issued_at` and valid for `ttl`
    pub fn access_token_with(
        &self,
        account: &AccountFixture,
        issued_at: DateTime<Utc>,
        ttl: TimeDelta,
    ) -> String {
        let claims = Claims::new(&account.identity, self.auth_config.issuer(), issued_at, ttl);
        jwt::encode(&claims, self.auth_config.access_secret()).unwrap()
    }

    /// Send a request with an optional raw `Authorization` header value
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Value,
        authorization: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(value) = authorization {
            request = request.header(header::AUTHORIZATION, value);
        }
        let body = if body.is_null() {
            Body::empty()
        } else {
            Body::from(body.to_string())
        };

        let response = self
            .router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    /// Send a request carrying `Bearer <token>`
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Value,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let header = token.map(|token| format!("Bearer {}", token));
        self.request(method, uri, body, header.as_deref()).await
    }

    /// Raw stored movie document
    pub async fn stored_movie(&self, imdb_id: &str) -> Option<Document> {
        self.store
            .find_one(collections::MOVIES, &Filter::eq("imdb_id", imdb_id))
            .await
            .unwrap()
    }

    /// Raw stored user document
    pub async fn stored_user(&self, user_id: &str) -> Option<Document> {
        self.store
            .find_one(collections::USERS, &Filter::eq("user_id", user_id))
            .await
            .unwrap()
    }
}

fn object(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        other => panic!("fixture is not an object: {}", other),
    }
}

async fn seed_rankings(store: &MemoryDocumentStore) -> Result<()> {
    for (value, name) in [
        (1, "Excellent"),
        (2, "Good"),
        (3, "Okay"),
        (4, "Bad"),
        (5, "Terrible"),
        (0, "Not_Ranked"),
    ] {
        store
            .insert_one(
                collections::RANKINGS,
                object(json!({"ranking_value": value, "ranking_name": name})),
            )
            .await?;
    }
    Ok(())
}

async fn seed_movie(store: &MemoryDocumentStore) -> Result<()> {
    store
        .insert_one(
            collections::MOVIES,
            object(json!({
                "imdb_id": SEEDED_MOVIE,
                "title": "The Shawshank Redemption",
                "poster_path": "https://image.tmdb.org/t/p/original/q6y0Go1tsGEsmtFryDOJo3dEmqu.jpg",
                "youtube_id": "PLl99DlL6b4",
                "genre": [{"genre_id": 1, "genre_name": "Drama"}],
                "admin_review": "",
                "ranking": {"ranking_value": 0, "ranking_name": "Not_Ranked"}
            })),
        )
        .await?;
    Ok(())
}

async fn seed_account(
    store: &MemoryDocumentStore,
    name: &str,
    role: Role,
    password: &'static str,
) -> Result<AccountFixture> {
    let identity = Identity {
        user_id: format!("{}-0001", name),
        email: format!("{}@marquee.test", name),
        first_name: name.to_string(),
        last_name: "Fixture".to_string(),
        role,
    };
    let now = Utc::now();

    store
        .insert_one(
            collections::USERS,
            object(json!({
                "user_id": identity.user_id,
                "first_name": identity.first_name,
                "last_name": identity.last_name,
                "email": identity.email,
                "password": hash_password(password)?,
                "role": role,
                "created_at": now,
                "updated_at": now,
                "favourite_genres": [{"genre_id": 1, "genre_name": "Drama"}]
            })),
        )
        .await?;

    Ok(AccountFixture { identity, password })
}
