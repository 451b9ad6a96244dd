use std::sync::Arc;
use tracing::instrument;

use crate::models::{
    paginate, query_items, CreateFoodItemRequest, FoodItem, FoodItemFilters, Page, Pagination,
    ServiceError, ServiceResult, SortSpec, UpdateFoodItemRequest, Validate,
};
use crate::observability::{Metrics, StoreTracingMiddleware};
use crate::repositories::FoodItemRepository;

const TABLE: &str = "items";

/// Catalog browsing and admin maintenance of food items
pub struct ItemsService {
    repository: Arc<dyn FoodItemRepository>,
    store_tracing: StoreTracingMiddleware,
}

impl ItemsService {
    pub fn new(repository: Arc<dyn FoodItemRepository>) -> Self {
        Self {
            repository,
            store_tracing: StoreTracingMiddleware::default(),
        }
    }

    pub fn new_with_metrics(repository: Arc<dyn FoodItemRepository>, metrics: Arc<Metrics>) -> Self {
        Self {
            repository,
            store_tracing: StoreTracingMiddleware::new(Some(metrics)),
        }
    }

    /// Filter, sort and paginate a snapshot of the catalog
    #[instrument(skip(self), fields(filters = ?filters, sort = ?sort, page = pagination.page, per_page = pagination.per_page))]
    pub async fn query_items(
        &self,
        filters: FoodItemFilters,
        sort: SortSpec,
        pagination: Pagination,
    ) -> ServiceResult<Page<FoodItem>> {
        crate::info_with_trace!("Querying food items");

        pagination.validate()?;
        filters.validate()?;

        let items = self
            .store_tracing
            .trace_operation("find_all", TABLE, self.repository.find_all())
            .await?;

        let matched = query_items(items, &filters, &sort);
        let page = paginate(matched, &pagination);

        crate::info_with_trace!(
            total = page.total,
            returned = page.items.len(),
            "Found {} items matching criteria",
            page.total
        );
        self.record("query", true);

        Ok(page)
    }

    #[instrument(skip(self), fields(id = %id))]
    pub async fn get_item(&self, id: &str) -> ServiceResult<FoodItem> {
        crate::info_with_trace!("Retrieving food item");

        match self
            .store_tracing
            .trace_operation("find_by_id", TABLE, self.repository.find_by_id(id))
            .await?
        {
            Some(item) => Ok(item),
            None => {
                crate::warn_with_trace!("Food item not found");
                self.record("get", false);
                Err(ServiceError::ItemNotFound { id: id.to_string() })
            }
        }
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_item(&self, request: CreateFoodItemRequest) -> ServiceResult<FoodItem> {
        crate::info_with_trace!("Creating food item");

        if let Err(e) = request.validate() {
            self.record("create", false);
            return Err(e.into());
        }

        let item = FoodItem::new(request);
        let created = self
            .store_tracing
            .trace_operation("create", TABLE, self.repository.create(item))
            .await?;

        crate::info_with_trace!(item_id = %created.id, "Food item created");
        self.record("create", true);

        Ok(created)
    }

    /// Merge patch: only the fields present in `request` are written
    #[instrument(skip(self, request), fields(id = %id))]
    pub async fn update_item(
        &self,
        id: &str,
        request: UpdateFoodItemRequest,
    ) -> ServiceResult<FoodItem> {
        crate::info_with_trace!("Updating food item");

        if let Err(e) = request.validate() {
            self.record("update", false);
            return Err(e.into());
        }

        match self
            .store_tracing
            .trace_operation("update", TABLE, self.repository.update(id, request))
            .await?
        {
            Some(item) => {
                crate::info_with_trace!("Food item updated");
                self.record("update", true);
                Ok(item)
            }
            None => {
                crate::warn_with_trace!("Food item not found for update");
                self.record("update", false);
                Err(ServiceError::ItemNotFound { id: id.to_string() })
            }
        }
    }

    /// Ratings and feedback of a deleted item are kept
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete_item(&self, id: &str) -> ServiceResult<()> {
        crate::info_with_trace!("Deleting food item");

        let removed = self
            .store_tracing
            .trace_operation("delete", TABLE, self.repository.delete(id))
            .await?;

        self.record("delete", removed);
        if removed {
            crate::info_with_trace!("Food item deleted");
            Ok(())
        } else {
            crate::warn_with_trace!("Food item not found for delete");
            Err(ServiceError::ItemNotFound { id: id.to_string() })
        }
    }

    pub async fn count_items(&self) -> ServiceResult<usize> {
        Ok(self
            .store_tracing
            .trace_operation("count", TABLE, self.repository.count())
            .await?)
    }

    fn record(&self, operation: &str, success: bool) {
        if let Some(metrics) = self.store_tracing.metrics() {
            metrics.record_item_operation(operation, success);
        }
    }
}
