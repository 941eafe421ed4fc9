//! User store operations

use chrono::Utc;
use fluenta_common::models::User;

use super::Store;

impl Store {
    /// Insert a new user, assigning its id and creation timestamp
    pub async fn insert_user(&self, username: String, display_name: String) -> User {
        let user = User {
            id: Self::next_id(&self.next_user_id),
            username,
            display_name,
            created_at: Utc::now(),
        };
        self.users.write().await.insert(user.id, user.clone());
        user
    }

    /// Fetch a user by id
    pub async fn get_user(&self, id: i64) -> Option<User> {
        self.users.read().await.get(&id).cloned()
    }

    /// Fetch a user by username (registration conflict check)
    pub async fn get_user_by_username(&self, username: &str) -> Option<User> {
        self.users
            .read()
            .await
            .values()
            .find(|u| u.username == username)
            .cloned()
    }
}
