use tracing::{info, instrument};
use validator::Validate;

use crate::{
    client::RegistryClient,
    errors::{OperationResultExt, ServiceError},
    models::{Category, CategoryFields, CategoryFilter, RecordId, RecordStatus},
};

#[derive(Clone, Debug)]
pub struct CategoryService {
    client: RegistryClient,
}

impl CategoryService {
    pub fn new(client: RegistryClient) -> Self {
        Self { client }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, status: Option<RecordStatus>) -> Result<Vec<Category>, ServiceError> {
        self.client
            .categories()
            .list(&CategoryFilter { status })
            .await
            .or_failed("fetch categories")
    }

    /// Categories offered when registering an asset.
    pub async fn active(&self) -> Result<Vec<Category>, ServiceError> {
        self.list(Some(RecordStatus::Active)).await
    }

    /// Looks a category up in the full listing; the API has no item endpoint
    /// for categories.
    #[instrument(skip(self))]
    pub async fn find(&self, id: RecordId) -> Result<Category, ServiceError> {
        self.list(None)
            .await?
            .into_iter()
            .find(|category| category.id == id)
            .ok_or_else(|| ServiceError::NotFound(format!("category {id}")))
    }

    #[instrument(skip(self, fields))]
    pub async fn create(&self, fields: CategoryFields) -> Result<Category, ServiceError> {
        let fields = fields.normalized();
        fields.validate()?;
        let category = self
            .client
            .categories()
            .create(&fields)
            .await
            .or_failed("save category")?;
        info!(id = category.id, name = %category.name, "category created");
        Ok(category)
    }

    #[instrument(skip(self, fields))]
    pub async fn update(
        &self,
        id: RecordId,
        fields: CategoryFields,
    ) -> Result<Category, ServiceError> {
        let fields = fields.normalized();
        fields.validate()?;
        self.client
            .categories()
            .update(id, &fields)
            .await
            .or_failed("save category")
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: RecordId) -> Result<(), ServiceError> {
        self.client
            .categories()
            .delete(id)
            .await
            .or_failed("delete category")?;
        info!(id, "category deleted");
        Ok(())
    }
}
