use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::database::models::ColorScheme;
use crate::database::SchemeStore;

use super::ServiceError;

const MAX_ID_LENGTH: usize = 128;

/// Color scheme operations scoped through the authenticated caller.
///
/// Reads by id are open to any signed-in user; listing is limited to the
/// caller's own schemes and only the author may replace or delete a scheme.
#[derive(Clone)]
pub struct SchemeService {
    store: Arc<dyn SchemeStore>,
}

impl SchemeService {
    pub fn new(store: Arc<dyn SchemeStore>) -> Self {
        Self { store }
    }

    pub async fn get_all_by_author(&self, user: &AuthUser) -> Result<Vec<ColorScheme>, ServiceError> {
        let schemes = self.store.list_by_author(&user.username).await?;
        debug!("Loaded {} color schemes for {}", schemes.len(), user.username);
        Ok(schemes)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<ColorScheme, ServiceError> {
        Ok(self.store.get_by_id(id).await?)
    }

    /// Store a new scheme authored by `user`. An empty id is replaced with a
    /// generated UUID.
    pub async fn create(&self, user: &AuthUser, mut scheme: ColorScheme) -> Result<ColorScheme, ServiceError> {
        if scheme.id.trim().is_empty() {
            scheme.id = Uuid::new_v4().to_string();
        }
        scheme.author = user.username.clone();
        validate_scheme(&scheme)?;

        self.store.create(&scheme).await?;
        info!("{} created color scheme {}", user.username, scheme.id);
        Ok(scheme)
    }

    /// Replace header and colors of a scheme the caller owns.
    ///
    /// Schemes owned by someone else are reported exactly like missing ones.
    pub async fn update(&self, user: &AuthUser, mut scheme: ColorScheme) -> Result<ColorScheme, ServiceError> {
        if scheme.id.trim().is_empty() {
            return Err(ServiceError::Validation("Color scheme id is required".to_string()));
        }
        scheme.author = user.username.clone();
        validate_scheme(&scheme)?;

        self.store.update(&scheme, &user.username).await?;
        info!("{} replaced color scheme {}", user.username, scheme.id);
        Ok(scheme)
    }

    pub async fn delete(&self, user: &AuthUser, id: &str) -> Result<(), ServiceError> {
        self.store.delete(id, &user.username).await?;
        info!("{} deleted color scheme {}", user.username, id);
        Ok(())
    }
}

fn validate_scheme(scheme: &ColorScheme) -> Result<(), ServiceError> {
    if scheme.id.len() > MAX_ID_LENGTH {
        return Err(ServiceError::Validation(format!(
            "Color scheme id must be at most {} characters",
            MAX_ID_LENGTH
        )));
    }
    if scheme.id.chars().any(|c| c == '/' || c.is_whitespace() || c.is_control()) {
        return Err(ServiceError::Validation(
            "Color scheme id cannot contain '/', whitespace, or control characters".to_string(),
        ));
    }
    if scheme.name.trim().is_empty() {
        return Err(ServiceError::Validation("Color scheme name is required".to_string()));
    }
    if scheme.colors.keys().any(|key| key.trim().is_empty()) {
        return Err(ServiceError::Validation("Color slot names cannot be empty".to_string()));
    }
    Ok(())
}
