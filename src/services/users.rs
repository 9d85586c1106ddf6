//! User management and password authentication

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        user::{CreateUser, UpdateUser},
        ListQuery, Page, UserPublic,
    },
    repository::{
        users::{NewUser, UserChanges},
        Repository,
    },
    services::webhooks::{events, WebhookService},
};

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Check `password` against a stored PHC hash; an unreadable hash never matches
pub fn verify_password(hash: &str, password: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    webhooks: WebhookService,
}

impl UsersService {
    pub fn new(repository: Repository, webhooks: WebhookService) -> Self {
        Self { repository, webhooks }
    }

    /// Look up by username and verify the password; the hash is stripped
    pub async fn authenticate(&self, username: Option<String>, password: Option<String>) -> AppResult<UserPublic> {
        let (username, password) = match (required(username), required(password)) {
            (Some(u), Some(p)) => (u, p),
            _ => {
                return Err(AppError::Validation(
                    "Username and password are required".to_string(),
                ))
            }
        };

        let invalid = || AppError::Authentication("Invalid username or password".to_string());
        let user = self
            .repository
            .users
            .get_by_username(&username)
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(&user.password, &password) {
            tracing::info!("Failed login for {}", username);
            return Err(invalid());
        }
        Ok(user.into())
    }

    pub async fn search(&self, query: &ListQuery) -> AppResult<Page<UserPublic>> {
        let page = query.page_request()?;
        Ok(self
            .repository
            .users
            .search(query.search(), page)
            .await?
            .map(UserPublic::from))
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<UserPublic> {
        Ok(self.repository.users.get_by_id(id).await?.into())
    }

    pub async fn register(&self, request: CreateUser) -> AppResult<UserPublic> {
        request.validate()?;
        let (username, password) = match (required(request.username), required(request.password)) {
            (Some(u), Some(p)) => (u, p),
            _ => {
                return Err(AppError::Validation(
                    "Username and password are required".to_string(),
                ))
            }
        };

        let user: UserPublic = self
            .repository
            .users
            .create(NewUser {
                username,
                password_hash: hash_password(&password)?,
                role: request.role.unwrap_or_default(),
                full_name: request.full_name,
            })
            .await?
            .into();

        tracing::info!("Registered user id={} username={}", user.id, user.username);
        self.webhooks.notify(events::USER_REGISTERED, &user);
        Ok(user)
    }

    pub async fn update(&self, id: &str, request: UpdateUser) -> AppResult<UserPublic> {
        request.validate()?;
        let password_hash = match request.password {
            Some(ref password) => Some(hash_password(password)?),
            None => None,
        };

        Ok(self
            .repository
            .users
            .update(
                id,
                UserChanges {
                    username: request.username,
                    password_hash,
                    role: request.role,
                    full_name: request.full_name,
                },
            )
            .await?
            .into())
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.repository.users.delete(id).await
    }
}
