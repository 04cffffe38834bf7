#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::AuthConfig;
use auth::Authenticator;
use auth::JwtHandler;
use auth::PasswordCost;
use axum::body::Body;
use axum::Router;
use blog_service::config::CorsConfig;
use blog_service::domain::post::errors::PostError;
use blog_service::domain::post::models::AuthorPostCount;
use blog_service::domain::post::models::AuthorSummary;
use blog_service::domain::post::models::Post;
use blog_service::domain::post::models::PostId;
use blog_service::domain::post::models::PostTitle;
use blog_service::domain::post::models::PostWithAuthor;
use blog_service::domain::post::ports::PostRepository;
use blog_service::domain::post::service::PostService;
use blog_service::domain::user::errors::UserError;
use blog_service::domain::user::models::EmailAddress;
use blog_service::domain::user::models::User;
use blog_service::domain::user::models::UserId;
use blog_service::domain::user::models::Username;
use blog_service::domain::user::ports::UserRepository;
use blog_service::domain::user::service::UserService;
use blog_service::inbound::http::router::create_router;
use http::Method;
use http::Request;
use http::StatusCode;
use serde_json::json;
use serde_json::Value;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Rows shared by both in-memory repositories, so deleting a user can drop its posts.
#[derive(Default)]
pub struct Store {
    users: HashMap<UserId, User>,
    posts: HashMap<PostId, Post>,
}

#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    store: Arc<Mutex<Store>>,
}

#[derive(Clone, Default)]
pub struct InMemoryPostRepository {
    store: Arc<Mutex<Store>>,
}

fn lock(store: &Mutex<Store>) -> std::sync::MutexGuard<'_, Store> {
    store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl InMemoryUserRepository {
    fn check_unique(store: &Store, user: &User) -> Result<(), UserError> {
        for other in store.users.values().filter(|u| u.id != user.id) {
            if other.username == user.username {
                return Err(UserError::UsernameAlreadyExists(
                    user.username.as_str().to_string(),
                ));
            }
            if other.email == user.email {
                return Err(UserError::EmailAlreadyExists(user.email.as_str().to_string()));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut store = lock(&self.store);
        Self::check_unique(&store, &user)?;
        store.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(lock(&self.store).users.get(id).cloned())
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        Ok(lock(&self.store)
            .users
            .values()
            .find(|u| &u.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        Ok(lock(&self.store)
            .users
            .values()
            .find(|u| &u.email == email)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        let mut users: Vec<User> = lock(&self.store).users.values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let mut store = lock(&self.store);
        if !store.users.contains_key(&user.id) {
            return Err(UserError::NotFound(user.id.to_string()));
        }
        Self::check_unique(&store, &user)?;
        store.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        let mut store = lock(&self.store);
        if store.users.remove(id).is_none() {
            return Err(UserError::NotFound(id.to_string()));
        }
        store.posts.retain(|_, post| post.author_id != *id);
        Ok(())
    }
}

impl InMemoryPostRepository {
    fn with_author(store: &Store, post: &Post) -> Option<PostWithAuthor> {
        store.users.get(&post.author_id).map(|author| PostWithAuthor {
            post: post.clone(),
            author: AuthorSummary::from(author),
        })
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create(&self, post: Post) -> Result<Post, PostError> {
        let mut store = lock(&self.store);
        if store.posts.values().any(|p| p.title == post.title) {
            return Err(PostError::TitleAlreadyExists(post.title.as_str().to_string()));
        }
        if !store.users.contains_key(&post.author_id) {
            return Err(PostError::AuthorNotFound(post.author_id.to_string()));
        }
        store.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn find_by_id(&self, id: &PostId) -> Result<Option<PostWithAuthor>, PostError> {
        let store = lock(&self.store);
        Ok(store
            .posts
            .get(id)
            .and_then(|post| Self::with_author(&store, post)))
    }

    async fn find_by_title(&self, title: &PostTitle) -> Result<Option<Post>, PostError> {
        Ok(lock(&self.store)
            .posts
            .values()
            .find(|p| &p.title == title)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<PostWithAuthor>, PostError> {
        let store = lock(&self.store);
        let mut posts: Vec<PostWithAuthor> = store
            .posts
            .values()
            .filter_map(|post| Self::with_author(&store, post))
            .collect();
        posts.sort_by(|a, b| b.post.created_at.cmp(&a.post.created_at));
        Ok(posts)
    }

    async fn count_by_author(&self) -> Result<Vec<AuthorPostCount>, PostError> {
        let store = lock(&self.store);
        let mut totals: HashMap<UserId, i64> = HashMap::new();
        for post in store.posts.values() {
            *totals.entry(post.author_id).or_default() += 1;
        }

        let mut counts: Vec<AuthorPostCount> = totals
            .into_iter()
            .filter_map(|(author_id, total_posts)| {
                store.users.get(&author_id).map(|author| AuthorPostCount {
                    author: AuthorSummary::from(author),
                    total_posts,
                })
            })
            .collect();
        counts.sort_by(|a, b| {
            b.total_posts
                .cmp(&a.total_posts)
                .then_with(|| a.author.username.cmp(&b.author.username))
        });
        Ok(counts)
    }

    async fn update(&self, post: Post) -> Result<Post, PostError> {
        let mut store = lock(&self.store);
        if !store.posts.contains_key(&post.id) {
            return Err(PostError::NotFound(post.id.to_string()));
        }
        if store
            .posts
            .values()
            .any(|p| p.id != post.id && p.title == post.title)
        {
            return Err(PostError::TitleAlreadyExists(post.title.as_str().to_string()));
        }
        store.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: &PostId) -> Result<(), PostError> {
        match lock(&self.store).posts.remove(id) {
            Some(_) => Ok(()),
            None => Err(PostError::NotFound(id.to_string())),
        }
    }
}

/// Router wired to in-memory repositories, driven without a network socket.
pub struct TestApp {
    pub router: Router,
    pub jwt_handler: JwtHandler,
    pub store: Arc<Mutex<Store>>,
}

impl TestApp {
    pub fn new() -> Self {
        let auth_config = AuthConfig::new(TEST_SECRET, "HS256", chrono::Duration::minutes(30))
            .expect("valid auth config")
            .with_password_cost(PasswordCost::new(8, 1, 1).expect("valid password cost"));

        let store = Arc::new(Mutex::new(Store::default()));
        let users = Arc::new(InMemoryUserRepository {
            store: Arc::clone(&store),
        });
        let posts = Arc::new(InMemoryPostRepository {
            store: Arc::clone(&store),
        });

        let authenticator = Arc::new(Authenticator::new(&auth_config).expect("valid authenticator"));
        let user_service = Arc::new(UserService::new(
            Arc::clone(&users),
            authenticator.password_hasher().clone(),
        ));
        let post_service = Arc::new(PostService::new(posts, users));

        let router = create_router(
            user_service,
            post_service,
            authenticator,
            &CorsConfig::default(),
        );

        Self {
            router,
            jwt_handler: JwtHandler::new(&auth_config),
            store,
        }
    }

    pub fn post_count(&self) -> usize {
        lock(&self.store).posts.len()
    }

    /// Send one request through the router and decode the JSON body (Null when empty).
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        self.send_request(request).await
    }

    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("Response body is not JSON")
        };

        (status, value)
    }

    /// Register an account and return its id.
    pub async fn signup(&self, username: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/auth/signup",
                None,
                Some(json!({
                    "username": username,
                    "email": format!("{}@example.com", username),
                    "phone": "+33612345678",
                    "password": "correct-horse-battery",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "signup failed: {}", body);
        body["data"]["id"]
            .as_str()
            .expect("user id in signup response")
            .to_string()
    }

    /// Log in with the password used by [`TestApp::signup`] and return the access token.
    pub async fn login(&self, username: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/auth/login",
                None,
                Some(json!({
                    "username": username,
                    "password": "correct-horse-battery",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["data"]["access_token"]
            .as_str()
            .expect("access token in login response")
            .to_string()
    }

    /// Register and log in, returning `(user_id, token)`.
    pub async fn register(&self, username: &str) -> (String, String) {
        let id = self.signup(username).await;
        let token = self.login(username).await;
        (id, token)
    }
}
