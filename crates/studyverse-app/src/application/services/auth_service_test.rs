use super::*;
use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Duration;
use mockall::mock;
use std::sync::Mutex;
use url::Url;

use studyverse_domain::events::{DomainEvent, DynamicEventHandler};
use studyverse_domain::session::{LoginGrant, SessionUser};
use studyverse_domain::shared::{SubscriptionId, UserId};
use studyverse_infrastructure::persistence::InMemoryTokenStore;

mock! {
    pub Gateway {}

    #[async_trait]
    impl AuthGateway for Gateway {
        async fn login(&self, email: &str, password: &str) -> Result<LoginGrant, DomainError>;
        async fn verify(&self, token: &str) -> Result<SessionUser, DomainError>;
        async fn register(&self, registration: &Registration) -> Result<(), DomainError>;
        async fn request_password_reset(&self, email: &str) -> Result<(), DomainError>;
        async fn update_password(&self, reset_token: &str, new_password: &str) -> Result<(), DomainError>;
    }
}

mock! {
    pub Store {}

    #[async_trait]
    impl TokenStore for Store {
        async fn load(&self) -> Result<Option<String>, DomainError>;
        async fn save(&self, token: &str) -> Result<(), DomainError>;
        async fn clear(&self) -> Result<(), DomainError>;
    }
}

/// Records the type name of every published event
#[derive(Default)]
struct RecordingEventBus {
    published: Mutex<Vec<&'static str>>,
}

impl RecordingEventBus {
    fn published(&self) -> Vec<&'static str> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventBus for RecordingEventBus {
    async fn publish(&self, event: Box<dyn DomainEvent>) -> Result<(), DomainError> {
        self.published.lock().unwrap().push(event.event_type_name());
        Ok(())
    }

    async fn subscribe(
        &self,
        _handler: Arc<dyn DynamicEventHandler>,
    ) -> Result<SubscriptionId, DomainError> {
        Ok(SubscriptionId::new())
    }

    async fn unsubscribe(&self, _id: &SubscriptionId) -> bool {
        false
    }
}

fn make_token(user_id: &str, exp: Option<i64>) -> String {
    let mut claims = serde_json::json!({ "userId": user_id, "name": "Ada", "email": "ada@example.com" });
    if let Some(exp) = exp {
        claims["exp"] = exp.into();
    }
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{}.{}.sig", header, payload)
}

fn live_token() -> String {
    make_token("u1", Some((Utc::now() + Duration::hours(6)).timestamp()))
}

fn user() -> SessionUser {
    SessionUser {
        id: UserId::from_string("u1"),
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        role: Some("student".to_string()),
    }
}

struct Fixture {
    service: AuthService,
    api_client: Arc<ApiClient>,
    bus: Arc<RecordingEventBus>,
}

fn fixture(gateway: MockGateway, store: Arc<dyn TokenStore>) -> Fixture {
    let api_client = Arc::new(ApiClient::new(Url::parse("http://localhost:5000/api/").unwrap()).unwrap());
    let bus = Arc::new(RecordingEventBus::default());
    let service = AuthService::new(
        Arc::new(gateway),
        store,
        api_client.clone(),
        SessionContext::new(),
        bus.clone(),
    );
    Fixture {
        service,
        api_client,
        bus,
    }
}

#[tokio::test]
async fn test_login_stores_token_and_starts_session() {
    let token = live_token();
    let grant_token = token.clone();
    let mut gateway = MockGateway::new();
    gateway
        .expect_login()
        .withf(|email, password| email == "ada@example.com" && password == "Secret1!")
        .times(1)
        .returning(move |_, _| {
            Ok(LoginGrant {
                token: grant_token.clone(),
                user: user(),
            })
        });

    let store = Arc::new(InMemoryTokenStore::new());
    let f = fixture(gateway, store.clone());

    let session = f.service.login("ada@example.com", "Secret1!").await.unwrap();

    assert_eq!(session.user().role.as_deref(), Some("student"));
    assert!(session.expires_at().is_some());
    assert!(f.service.session().is_authenticated().await);
    assert_eq!(store.load().await.unwrap(), Some(token.clone()));
    assert_eq!(f.api_client.bearer_token().await, Some(token));
    assert_eq!(f.bus.published(), vec![std::any::type_name::<SessionStarted>()]);
}

#[tokio::test]
async fn test_login_validates_before_calling_backend() {
    let mut gateway = MockGateway::new();
    gateway.expect_login().times(0);
    let f = fixture(gateway, Arc::new(InMemoryTokenStore::new()));

    let err = f.service.login("not-an-email", "x").await.unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let err = f.service.login("ada@example.com", "").await.unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn test_login_failure_leaves_no_session() {
    let mut gateway = MockGateway::new();
    gateway
        .expect_login()
        .returning(|_, _| Err(DomainError::InvalidCredentials("Invalid email or password".into())));
    let store = Arc::new(InMemoryTokenStore::new());
    let f = fixture(gateway, store.clone());

    let err = f.service.login("ada@example.com", "wrong").await.unwrap_err();

    assert!(matches!(err, DomainError::InvalidCredentials(_)));
    assert!(!f.service.session().is_authenticated().await);
    assert_eq!(store.load().await.unwrap(), None);
    assert!(f.bus.published().is_empty());
}

#[tokio::test]
async fn test_logout_clears_everything() {
    let token = live_token();
    let store = Arc::new(InMemoryTokenStore::with_token(token));
    let f = fixture(MockGateway::new(), store.clone());

    f.service.restore().await.unwrap().unwrap();
    assert!(f.service.session().is_authenticated().await);

    f.service.logout().await.unwrap();

    assert!(f.service.session().current().await.is_none());
    assert_eq!(store.load().await.unwrap(), None);
    assert_eq!(f.api_client.bearer_token().await, None);
    assert_eq!(
        f.bus.published(),
        vec![
            std::any::type_name::<SessionStarted>(),
            std::any::type_name::<SessionEnded>()
        ]
    );

    // Second logout publishes nothing
    f.service.logout().await.unwrap();
    assert_eq!(f.bus.published().len(), 2);
}

#[tokio::test]
async fn test_restore_without_token_is_anonymous() {
    let f = fixture(MockGateway::new(), Arc::new(InMemoryTokenStore::new()));
    assert!(f.service.restore().await.unwrap().is_none());
    assert!(!f.service.session().is_authenticated().await);
}

#[tokio::test]
async fn test_restore_discards_expired_token() {
    let expired = make_token("u1", Some((Utc::now() - Duration::hours(1)).timestamp()));
    let mut store = MockStore::new();
    store
        .expect_load()
        .times(1)
        .returning(move || Ok(Some(expired.clone())));
    store.expect_clear().times(1).returning(|| Ok(()));
    store.expect_save().times(0);

    let f = fixture(MockGateway::new(), Arc::new(store));

    assert!(f.service.restore().await.unwrap().is_none());
    assert!(f.service.session().current().await.is_none());
    assert_eq!(f.api_client.bearer_token().await, None);
}

#[tokio::test]
async fn test_restore_verifies_token_without_expiry() {
    let token = make_token("u1", None);
    let mut gateway = MockGateway::new();
    gateway.expect_verify().times(1).returning(|_| Ok(user()));
    let f = fixture(gateway, Arc::new(InMemoryTokenStore::with_token(token)));

    let session = f.service.restore().await.unwrap().unwrap();
    assert_eq!(session.user().role.as_deref(), Some("student"));
    assert_eq!(f.bus.published(), vec![std::any::type_name::<SessionStarted>()]);
}

#[tokio::test]
async fn test_restore_drops_token_the_backend_rejects() {
    let store = Arc::new(InMemoryTokenStore::with_token(make_token("u1", None)));
    let mut gateway = MockGateway::new();
    gateway
        .expect_verify()
        .returning(|_| Err(DomainError::ExpiredSession("jwt expired".into())));
    let f = fixture(gateway, store.clone());

    assert!(f.service.restore().await.unwrap().is_none());
    assert_eq!(store.load().await.unwrap(), None);
}

#[tokio::test]
async fn test_register_checks_password_rules() {
    let mut gateway = MockGateway::new();
    gateway.expect_register().times(1).returning(|_| Ok(()));
    let f = fixture(gateway, Arc::new(InMemoryTokenStore::new()));

    let weak = Registration {
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        password: "short".to_string(),
    };
    assert!(f.service.register(&weak).await.is_err());

    let strong = Registration {
        password: "Secret1!".to_string(),
        ..weak
    };
    f.service.register(&strong).await.unwrap();
}

#[tokio::test]
async fn test_update_password_requires_reset_token() {
    let mut gateway = MockGateway::new();
    gateway
        .expect_update_password()
        .withf(|token, password| token == "reset-123" && password == "Secret1!")
        .times(1)
        .returning(|_, _| Ok(()));
    let f = fixture(gateway, Arc::new(InMemoryTokenStore::new()));

    assert!(f.service.update_password(" ", "Secret1!").await.is_err());
    f.service.update_password("reset-123", "Secret1!").await.unwrap();
}
