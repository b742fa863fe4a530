//! In-memory collections with uniqueness and schema enforcement.

use crate::error::StoreError;
use crate::types::{Advertisement, AdvertisementDraft, Credential, User};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};
use uuid::Uuid;

/// In-memory document store for users and advertisements.
///
/// Cloning is cheap; all clones share the same collections. Every
/// operation is a single write or read under the collection lock.
#[derive(Clone, Default)]
pub struct MarketStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    advertisements: Arc<RwLock<HashMap<Uuid, Advertisement>>>,
}

impl MarketStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Find a user by credential.
    #[instrument(skip(self, credential))]
    pub async fn find_user(&self, credential: &Credential) -> Option<User> {
        let users = self.users.read().await;
        users.values().find(|u| u.matches(credential)).cloned()
    }

    /// Find a user by internal id.
    pub async fn find_user_by_id(&self, id: Uuid) -> Option<User> {
        let users = self.users.read().await;
        users.get(&id).cloned()
    }

    /// Find a user by email.
    pub async fn find_user_by_email(&self, email: &str) -> Option<User> {
        let users = self.users.read().await;
        users
            .values()
            .find(|u| u.email.as_deref() == Some(email))
            .cloned()
    }

    /// Insert a new user, enforcing uniqueness on phone and google id.
    #[instrument(skip(self, user))]
    pub async fn insert_user(&self, user: User) -> Result<User, StoreError> {
        let mut users = self.users.write().await;

        if let Some(phone) = &user.phone {
            if users.values().any(|u| u.phone.as_deref() == Some(phone.as_str())) {
                return Err(StoreError::Duplicate {
                    field: "phone",
                    value: phone.clone(),
                });
            }
        }
        if let Some(google_id) = &user.google_id {
            if users
                .values()
                .any(|u| u.google_id.as_deref() == Some(google_id.as_str()))
            {
                return Err(StoreError::Duplicate {
                    field: "googleId",
                    value: google_id.clone(),
                });
            }
        }

        debug!(user = %user.id, "User created");
        users.insert(user.id, user.clone());
        Ok(user)
    }

    /// Update a user's display name, returning the updated record.
    pub async fn rename_user(&self, id: Uuid, name: &str) -> Option<User> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&id)?;
        user.rename(name);
        Some(user.clone())
    }

    /// Validate and persist a listing owned by the given user.
    #[instrument(skip(self, draft))]
    pub async fn insert_advertisement(
        &self,
        user: Uuid,
        draft: AdvertisementDraft,
    ) -> Result<Advertisement, StoreError> {
        draft.validate()?;

        let now = Utc::now();
        let advertisement = Advertisement {
            id: Uuid::new_v4(),
            category: draft.category,
            sub_category: draft.sub_category,
            title: draft.title,
            description: draft.description,
            price: draft.price,
            location: draft.location,
            phone: draft.phone,
            images: draft.images,
            user,
            created_at: now,
            updated_at: now,
        };

        let mut advertisements = self.advertisements.write().await;
        advertisements.insert(advertisement.id, advertisement.clone());
        debug!(advertisement = %advertisement.id, "Advertisement created");
        Ok(advertisement)
    }

    /// Fetch a single listing.
    pub async fn get_advertisement(&self, id: Uuid) -> Option<Advertisement> {
        let advertisements = self.advertisements.read().await;
        advertisements.get(&id).cloned()
    }

    /// All listings, newest first.
    pub async fn list_advertisements(&self) -> Vec<Advertisement> {
        let advertisements = self.advertisements.read().await;
        let mut all: Vec<Advertisement> = advertisements.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all
    }

    /// Number of users.
    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }

    /// Number of listings.
    pub async fn advertisement_count(&self) -> usize {
        self.advertisements.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> AdvertisementDraft {
        AdvertisementDraft {
            category: "Vehicles".into(),
            sub_category: "Bikes".into(),
            title: "Commuter bicycle".into(),
            description: "Well maintained, new tires fitted last month.".into(),
            price: 85.0,
            location: "Riverside".into(),
            phone: "9876543210".into(),
            images: vec!["https://img.example/bike.jpg".into()],
        }
    }

    #[tokio::test]
    async fn test_insert_and_find_user_by_phone() {
        let store = MarketStore::new();
        let user = User::new("Alice", Credential::Phone("9999999999".into()), None);
        store.insert_user(user.clone()).await.unwrap();

        let found = store
            .find_user(&Credential::Phone("9999999999".into()))
            .await
            .unwrap();
        assert_eq!(found.id, user.id);
        assert!(store
            .find_user(&Credential::Phone("8888888888".into()))
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_phone_rejected() {
        let store = MarketStore::new();
        store
            .insert_user(User::new("Alice", Credential::Phone("9999999999".into()), None))
            .await
            .unwrap();

        let err = store
            .insert_user(User::new("Mallory", Credential::Phone("9999999999".into()), None))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { field: "phone", .. }));
        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn test_duplicate_google_id_rejected() {
        let store = MarketStore::new();
        store
            .insert_user(User::new(
                "Bob",
                Credential::Google("g-1".into()),
                Some("bob@example.com".into()),
            ))
            .await
            .unwrap();

        let err = store
            .insert_user(User::new(
                "Bobby",
                Credential::Google("g-1".into()),
                Some("bobby@example.com".into()),
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { field: "googleId", .. }));
    }

    #[tokio::test]
    async fn test_phone_and_google_users_do_not_collide() {
        let store = MarketStore::new();
        store
            .insert_user(User::new("Alice", Credential::Phone("9999999999".into()), None))
            .await
            .unwrap();
        store
            .insert_user(User::new(
                "Bob",
                Credential::Google("g-1".into()),
                Some("bob@example.com".into()),
            ))
            .await
            .unwrap();
        assert_eq!(store.user_count().await, 2);
    }

    #[tokio::test]
    async fn test_find_user_by_email() {
        let store = MarketStore::new();
        let user = User::new(
            "Bob",
            Credential::Google("g-1".into()),
            Some("bob@example.com".into()),
        );
        store.insert_user(user.clone()).await.unwrap();

        let found = store.find_user_by_email("bob@example.com").await.unwrap();
        assert_eq!(found.id, user.id);
        assert!(store.find_user_by_email("nobody@example.com").await.is_none());
    }

    #[tokio::test]
    async fn test_rename_user() {
        let store = MarketStore::new();
        let user = User::new("Bob", Credential::Google("g-1".into()), None);
        store.insert_user(user.clone()).await.unwrap();

        let renamed = store.rename_user(user.id, "Robert").await.unwrap();
        assert_eq!(renamed.name, "Robert");
        assert_eq!(store.find_user_by_id(user.id).await.unwrap().name, "Robert");
        assert!(store.rename_user(Uuid::new_v4(), "Ghost").await.is_none());
    }

    #[tokio::test]
    async fn test_insert_advertisement_assigns_id_and_timestamps() {
        let store = MarketStore::new();
        let owner = Uuid::new_v4();
        let ad = store.insert_advertisement(owner, draft()).await.unwrap();

        assert_eq!(ad.user, owner);
        assert_eq!(ad.created_at, ad.updated_at);
        assert_eq!(store.get_advertisement(ad.id).await.unwrap().title, ad.title);
    }

    #[tokio::test]
    async fn test_invalid_advertisement_not_persisted() {
        let store = MarketStore::new();
        let mut bad = draft();
        bad.price = -5.0;

        let err = store.insert_advertisement(Uuid::new_v4(), bad).await.unwrap_err();
        assert!(matches!(err, StoreError::Schema { .. }));
        assert_eq!(store.advertisement_count().await, 0);
    }

    #[tokio::test]
    async fn test_list_advertisements_newest_first() {
        let store = MarketStore::new();
        let owner = Uuid::new_v4();
        let first = store.insert_advertisement(owner, draft()).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = store.insert_advertisement(owner, draft()).await.unwrap();

        let all = store.list_advertisements().await;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, second.id);
        assert_eq!(all[1].id, first.id);
    }
}
