//! Learning resource store operations

use fluenta_common::models::{LearningResource, SkillArea};

use super::Store;

impl Store {
    /// Insert a seeded resource, assigning its id
    pub(crate) async fn insert_resource(&self, mut resource: LearningResource) -> LearningResource {
        resource.id = Self::next_id(&self.next_resource_id);
        self.resources
            .write()
            .await
            .insert(resource.id, resource.clone());
        resource
    }

    /// All learning resources, ordered by id
    pub async fn all_resources(&self) -> Vec<LearningResource> {
        let mut resources: Vec<LearningResource> =
            self.resources.read().await.values().cloned().collect();
        resources.sort_by_key(|r| r.id);
        resources
    }

    /// Resources targeting one skill area, ordered by id
    pub async fn resources_by_skill(&self, skill: SkillArea) -> Vec<LearningResource> {
        let mut resources: Vec<LearningResource> = self
            .resources
            .read()
            .await
            .values()
            .filter(|r| r.skill == skill)
            .cloned()
            .collect();
        resources.sort_by_key(|r| r.id);
        resources
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_skill_filter_matches_only_that_skill() {
        let store = Store::new();
        store.seed().await;

        let vocab = store.resources_by_skill(SkillArea::Vocabulary).await;
        assert!(!vocab.is_empty());
        assert!(vocab.iter().all(|r| r.skill == SkillArea::Vocabulary));

        let all = store.all_resources().await;
        assert!(all.len() >= vocab.len());
    }
}
