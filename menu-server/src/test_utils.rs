use crate::config::MenuConfig;
use crate::create_app;
use crate::models::{DrinkLong, Ingredient, Recipe};
use crate::state::AppState;
use axum::body::Body;
use axum::Router;
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use log::LevelFilter;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};
use tower::ServiceExt;
use wiremock::matchers;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;

/// Public half of [`SIGNING_KEY`], published as the issuer's key set
pub(crate) const TEST_JWKS: &str = include_str!("../fixtures/jwks.json");
/// Key identifier of the only key in [`TEST_JWKS`]
pub(crate) const TEST_KID: &str = "menu-test-key";
pub(crate) const TEST_AUDIENCE: &str = "drinks";

const SIGNING_KEY: &str = include_str!("../fixtures/signing_key.pem");
/// Private key unrelated to anything in [`TEST_JWKS`]
const ROGUE_KEY: &str = include_str!("../fixtures/rogue_key.pem");

/// Mints RS256 tokens the way the identity provider would.
///
/// Defaults produce a token the test fixture accepts: known key id, the test
/// audience, valid for an hour and carrying an empty permission list.
///
/// ```rust
/// let token = TokenBuilder::new(&fixture.config.auth.issuer)
///     .permissions(&["post:drinks"])
///     .expires_in(-60)
///     .build();
/// ```
pub(crate) struct TokenBuilder {
    issuer: String,
    audience: String,
    kid: Option<String>,
    permissions: Option<Vec<String>>,
    expires_in: i64,
    rogue: bool,
    secret: Option<Vec<u8>>,
}

impl TokenBuilder {
    pub(crate) fn new(issuer: &str) -> Self {
        Self {
            issuer: issuer.to_string(),
            audience: TEST_AUDIENCE.to_string(),
            kid: Some(TEST_KID.to_string()),
            permissions: Some(Vec::new()),
            expires_in: 3600,
            rogue: false,
            secret: None,
        }
    }

    pub(crate) fn permissions(mut self, permissions: &[&str]) -> Self {
        self.permissions = Some(permissions.iter().map(|p| p.to_string()).collect());
        self
    }

    /// Leave the `permissions` claim out entirely
    pub(crate) fn without_permissions(mut self) -> Self {
        self.permissions = None;
        self
    }

    pub(crate) fn audience(mut self, audience: &str) -> Self {
        self.audience = audience.to_string();
        self
    }

    pub(crate) fn kid(mut self, kid: Option<&str>) -> Self {
        self.kid = kid.map(str::to_string);
        self
    }

    /// Seconds until expiry, negative for an already expired token
    pub(crate) fn expires_in(mut self, seconds: i64) -> Self {
        self.expires_in = seconds;
        self
    }

    /// Sign with a key the issuer never published, keeping the known key id
    pub(crate) fn signed_by_rogue_key(mut self) -> Self {
        self.rogue = true;
        self
    }

    /// Sign with HS256 and a shared secret instead of the RSA key, keeping the known key id
    pub(crate) fn signed_with_secret(mut self, secret: &[u8]) -> Self {
        self.secret = Some(secret.to_vec());
        self
    }

    pub(crate) fn build(self) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("System time before epoch")
            .as_secs() as i64;

        let mut claims = json!({
            "sub": "auth0|barista",
            "iss": self.issuer,
            "aud": self.audience,
            "iat": now,
            "exp": now + self.expires_in,
        });
        if let Some(permissions) = self.permissions {
            claims["permissions"] = json!(permissions);
        }

        let (algorithm, key) = match self.secret {
            Some(secret) => (Algorithm::HS256, EncodingKey::from_secret(&secret)),
            None => {
                let pem = if self.rogue { ROGUE_KEY } else { SIGNING_KEY };
                let key = EncodingKey::from_rsa_pem(pem.as_bytes())
                    .expect("Invalid test signing key");
                (Algorithm::RS256, key)
            }
        };
        let mut header = Header::new(algorithm);
        header.kid = self.kid;

        encode(&header, &claims, &key).expect("Failed to sign test token")
    }
}

/// Recipe with a single ingredient, handy for seeding drinks
pub(crate) fn single_ingredient(name: &str, color: &str, parts: u32) -> Recipe {
    Recipe(vec![Ingredient {
        name: name.to_string(),
        color: color.to_string(),
        parts,
    }])
}

/// Test fixture for setting up a complete test environment with a mocked
/// identity provider and an in-memory drink store.
///
/// The fixture starts a mock issuer publishing the test key set, configures
/// the application against it and provides helpers for minting tokens and
/// making requests.
///
/// # Examples
///
/// ```rust
/// #[tokio::test]
/// async fn test_endpoint() {
///     let fixture = TestFixture::new().await;
///     fixture.seed("Latte").await;
///
///     let token = fixture.token(&["get:drinks-detail"]);
///     let response = fixture.get_with_token("/drinks-detail", &token).await;
///
///     response.assert_ok();
///     assert_eq!(response.json["drinks"][0]["title"], "Latte");
/// }
/// ```
pub struct TestFixture {
    /// The application router
    pub app: Router,
    /// Configuration settings
    pub config: MenuConfig,
    /// Shared state behind the router, for seeding and inspecting the store
    pub state: AppState,
    /// Mock token issuer; held so it keeps serving the key set until the fixture drops
    _issuer_mock: MockServer,
}

impl TestFixture {
    /// Creates a new test fixture with a mock issuer serving the test key set.
    pub async fn new() -> Self {
        Self::setup_logger(LevelFilter::Debug);

        let issuer_mock = MockServer::start().await;
        Mock::given(matchers::method("GET"))
            .and(matchers::path("/.well-known/jwks.json"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(TEST_JWKS, "application/json"))
            .mount(&issuer_mock)
            .await;

        let config = MenuConfig::for_test_with_mock(&issuer_mock);
        let state = AppState::new(config.clone())
            .await
            .expect("Failed to create test state");
        let app = create_app(state.clone());

        Self {
            app,
            config,
            state,
            _issuer_mock: issuer_mock,
        }
    }

    /// Initializes the test logger with customized settings.
    pub fn setup_logger(level: LevelFilter) {
        let _ = env_logger::builder()
            .filter_level(level)
            .is_test(true)
            .try_init();
    }

    /// Token accepted by the app, granting the given permissions
    pub fn token(&self, permissions: &[&str]) -> String {
        self.token_builder().permissions(permissions).build()
    }

    /// Token builder preconfigured with the fixture's issuer
    pub(crate) fn token_builder(&self) -> TokenBuilder {
        TokenBuilder::new(&self.config.auth.issuer)
    }

    /// Insert a drink straight into the store
    pub async fn seed(&self, title: &str) -> DrinkLong {
        self.state
            .drinks
            .create(title, single_ingredient("Milk", "white", 1))
            .await
            .expect("Failed to seed drink")
    }

    /// Creates a request builder with a JSON content type and, when given,
    /// a bearer token.
    pub fn request_builder(
        &self,
        method: Method,
        uri: impl AsRef<str>,
        token: Option<&str>,
    ) -> http::request::Builder {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri.as_ref())
            .header("Content-Type", "application/json");
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        builder
    }

    /// Sends an unauthenticated GET request to the specified URI.
    pub async fn get(&self, uri: impl AsRef<str>) -> TestResponse {
        let request = self
            .request_builder(Method::GET, uri, None)
            .body(Body::empty())
            .expect("Failed to build request");
        self.send(request).await
    }

    /// Sends a GET request carrying the given bearer token.
    pub async fn get_with_token(&self, uri: impl AsRef<str>, token: &str) -> TestResponse {
        let request = self
            .request_builder(Method::GET, uri, Some(token))
            .body(Body::empty())
            .expect("Failed to build request");
        self.send(request).await
    }

    /// Sends a request with a JSON body and an optional bearer token.
    pub async fn send_json<T: Serialize>(
        &self,
        method: Method,
        uri: impl AsRef<str>,
        token: Option<&str>,
        body: &T,
    ) -> TestResponse {
        let json_body = serde_json::to_vec(body).expect("Failed to serialize body to JSON");
        self.send_raw(method, uri, token, json_body).await
    }

    /// Sends a request with a raw body, used for malformed payloads.
    pub async fn send_raw(
        &self,
        method: Method,
        uri: impl AsRef<str>,
        token: Option<&str>,
        body: impl Into<Body>,
    ) -> TestResponse {
        let request = self
            .request_builder(method, uri, token)
            .body(body.into())
            .expect("Failed to build request");
        self.send(request).await
    }

    /// Sends a request and returns a TestResponse.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();

        // Try to parse as JSON, defaulting to empty object if parsing fails or empty body
        let json = if !body.is_empty() {
            serde_json::from_slice(&body).unwrap_or_else(|_| json!({}))
        } else {
            json!({})
        };

        TestResponse { status, json }
    }
}

/// Response from a test request that provides convenient access to status and JSON body.
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response body as JSON (if present and valid JSON)
    pub json: Value,
}

impl TestResponse {
    /// Asserts that the response has the expected status code.
    ///
    /// # Panics
    ///
    /// Panics if the status code doesn't match the expected value.
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status,
            expected,
            "Expected status {} but got {} with body: {}",
            expected,
            self.status,
            serde_json::to_string_pretty(&self.json).unwrap_or_default()
        );
        self
    }

    /// Asserts that the response status is OK (200).
    pub fn assert_ok(&self) -> &Self {
        self.assert_status(StatusCode::OK)
    }

    /// Asserts the uniform error body and returns the auth failure code, if any.
    pub fn assert_error(&self, expected: StatusCode) -> Option<&str> {
        self.assert_status(expected);
        assert_eq!(self.json["success"], false);
        assert_eq!(self.json["error"], expected.as_u16());
        assert!(self.json["message"].is_string(), "missing message");
        self.json["code"].as_str()
    }

    /// Converts the response body to the specified type.
    ///
    /// # Panics
    ///
    /// Panics if deserialization fails.
    pub fn json_as<T: DeserializeOwned>(&self) -> T {
        serde_json::from_value(self.json.clone()).expect("Failed to deserialize response JSON")
    }
}
