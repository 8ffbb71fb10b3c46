//! Cached-session helpers
//!
//! A logged-in user is cached twice: under their token reference and under
//! `<id>-token`, so lookups work from either direction. The user object is
//! any JSON value carrying non-empty `id` and `tokenRef` string fields.

use serde::Serialize;
use serde_json::Value;
use service_errors::AppError;

use crate::{Cache, Ttl};

/// Default lifetime of a cached session
pub const DEFAULT_SESSION_TTL: &str = "1 day";

/// Mutation applied by [`Cache::update_auth_data`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthDataAction {
    /// Append the value when absent
    Add,
    /// Remove every occurrence of the value
    Remove,
}

impl Cache {
    /// Caches a user session under both of its lookup keys
    ///
    /// # Errors
    /// Returns `AppError(Validation)` when the user lacks `id` or
    /// `tokenRef`, `AppError(Server)` on transport failure.
    pub async fn cache_user<T: Serialize>(
        &self,
        user: &T,
        ttl: impl Into<Ttl>,
    ) -> Result<(), AppError> {
        let user = serde_json::to_value(user)
            .map_err(|err| AppError::validation("Invalid user object for caching").with_source(err))?;
        let (id, token_ref) = session_identity(&user)?;
        let seconds = ttl.into().into_seconds()?;

        let id_key = token_key(&id);
        tokio::try_join!(
            self.set_ex(&token_ref, &user, seconds),
            self.set_ex(&id_key, &user, seconds),
        )?;

        Ok(())
    }

    /// Looks up a cached user session by user id
    ///
    /// In strict mode a miss is an authentication failure; otherwise the
    /// miss is returned as `None`.
    ///
    /// # Errors
    /// Returns `AppError(Authentication)` on a strict-mode miss,
    /// `AppError(Server)` on transport failure.
    pub async fn cached_user(&self, id: &str, strict: bool) -> Result<Option<Value>, AppError> {
        let user = self.get::<Value>(&token_key(id)).await?;

        if user.is_none() && strict {
            return Err(AppError::authentication("Kindly login, user not found"));
        }

        Ok(user)
    }

    /// Adds or removes a value in an array field of the cached user
    ///
    /// Missing sessions yield `None`; a non-array field leaves the user
    /// untouched. The updated user is re-cached with the default session
    /// TTL and returned.
    ///
    /// # Errors
    /// Returns `AppError(Server)` on transport failure and
    /// `AppError(Validation)` when the cached object lost its identity
    /// fields.
    pub async fn update_auth_data(
        &self,
        user_id: &str,
        key: &str,
        value: &str,
        action: AuthDataAction,
    ) -> Result<Option<Value>, AppError> {
        let Some(mut user) = self.cached_user(user_id, false).await? else {
            return Ok(None);
        };

        if apply_auth_data(&mut user, key, value, action) {
            self.cache_user(&user, DEFAULT_SESSION_TTL).await?;
        }

        Ok(Some(user))
    }
}

fn token_key(id: &str) -> String {
    format!("{id}-token")
}

/// Extracts the `id` and `tokenRef` fields a cacheable user must carry
fn session_identity(user: &Value) -> Result<(String, String), AppError> {
    let field = |name: &str| {
        user.get(name)
            .and_then(Value::as_str)
            .filter(|value| !value.trim().is_empty())
            .map(str::to_owned)
    };

    match (field("id"), field("tokenRef")) {
        (Some(id), Some(token_ref)) => Ok((id, token_ref)),
        _ => Err(AppError::validation("Invalid user object for caching")),
    }
}

/// Mutates the array field in place; `false` when nothing changed
fn apply_auth_data(user: &mut Value, key: &str, value: &str, action: AuthDataAction) -> bool {
    let Some(entries) = user.get_mut(key).and_then(Value::as_array_mut) else {
        return false;
    };

    match action {
        AuthDataAction::Add => {
            if entries.iter().any(|entry| entry == value) {
                false
            } else {
                entries.push(Value::String(value.to_owned()));
                true
            }
        }
        AuthDataAction::Remove => {
            let before = entries.len();
            entries.retain(|entry| entry != value);
            entries.len() != before
        }
    }
}
