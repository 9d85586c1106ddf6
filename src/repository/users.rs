//! Users repository

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{user::Role, Page, PageRequest, User},
    storage::{JsonCollection, Mutation},
};

/// Fields of a user about to be inserted; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub full_name: Option<String>,
}

/// Changes to merge over a stored user; the password is already hashed
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
    pub full_name: Option<String>,
}

#[derive(Clone)]
pub struct UsersRepository {
    collection: Arc<JsonCollection<User>>,
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("User with id {} not found", id))
}

fn duplicate() -> AppError {
    AppError::Conflict("Username already exists".to_string())
}

impl UsersRepository {
    pub fn new(collection: Arc<JsonCollection<User>>) -> Self {
        Self { collection }
    }

    pub async fn search(&self, search: Option<&str>, page: PageRequest) -> AppResult<Page<User>> {
        let mut users = self.collection.read().await?;
        if let Some(needle) = search {
            users.retain(|u| u.matches(needle));
        }
        Ok(page.paginate(users))
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<User> {
        self.collection
            .read()
            .await?
            .into_iter()
            .find(|u| u.id == id)
            .ok_or_else(|| not_found(id))
    }

    /// Exact, case-sensitive username lookup
    pub async fn get_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self
            .collection
            .read()
            .await?
            .into_iter()
            .find(|u| u.username == username))
    }

    /// Insert a user; the uniqueness check shares the write's critical section
    pub async fn create(&self, user: NewUser) -> AppResult<User> {
        self.collection
            .mutate(|users| {
                if users.iter().any(|u| u.username == user.username) {
                    return Err(duplicate());
                }
                let user = User {
                    id: JsonCollection::<User>::next_id(users),
                    username: user.username,
                    password: user.password_hash,
                    role: user.role,
                    full_name: user.full_name,
                };
                users.push(user.clone());
                Ok(Mutation::Changed(user))
            })
            .await
    }

    pub async fn update(&self, id: &str, changes: UserChanges) -> AppResult<User> {
        self.collection
            .mutate(|users| {
                if let Some(ref username) = changes.username {
                    if users.iter().any(|u| &u.username == username && u.id != id) {
                        return Err(duplicate());
                    }
                }

                let user = users.iter_mut().find(|u| u.id == id).ok_or_else(|| not_found(id))?;
                if let Some(username) = changes.username {
                    user.username = username;
                }
                if let Some(hash) = changes.password_hash {
                    user.password = hash;
                }
                if let Some(role) = changes.role {
                    user.role = role;
                }
                if changes.full_name.is_some() {
                    user.full_name = changes.full_name;
                }
                Ok(Mutation::Changed(user.clone()))
            })
            .await
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.collection
            .mutate(|users| {
                let index = users.iter().position(|u| u.id == id).ok_or_else(|| not_found(id))?;
                users.remove(index);
                Ok(Mutation::Changed(()))
            })
            .await
    }
}
