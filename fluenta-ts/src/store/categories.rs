//! Test category store operations

use fluenta_common::models::TestCategory;

use super::Store;

impl Store {
    /// Insert a seeded category, assigning its id
    pub(crate) async fn insert_category(&self, mut category: TestCategory) -> TestCategory {
        category.id = Self::next_id(&self.next_category_id);
        self.categories
            .write()
            .await
            .insert(category.id, category.clone());
        category
    }

    /// All categories, ordered by id
    pub async fn all_categories(&self) -> Vec<TestCategory> {
        let mut categories: Vec<TestCategory> =
            self.categories.read().await.values().cloned().collect();
        categories.sort_by_key(|c| c.id);
        categories
    }
}
