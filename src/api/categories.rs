use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    api::products::Product,
    core::common::{http_client_factory::AuthenticatedHttpClientFactory, transport::ApiError},
};

#[derive(Deserialize, Clone, Debug)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub products: Vec<Product>,
}

/// Slim listing without the product payload (the `categories-only` endpoint).
#[derive(Deserialize, Clone, Debug)]
pub struct CategorySummary {
    pub id: i64,
    pub name: String,
}

#[derive(Serialize, Debug)]
struct NewCategory {
    name: String,
}

/// Finds the category containing the given product, the way the search view
/// joins products to categories on the client side.
pub fn category_of(categories: &[Category], product_id: i64) -> Option<&Category> {
    categories
        .iter()
        .find(|c| c.products.iter().any(|p| p.id == Some(product_id)))
}

pub struct CategoryClient<'a> {
    factory: &'a AuthenticatedHttpClientFactory,
}

impl<'a> CategoryClient<'a> {
    pub fn new(factory: &'a AuthenticatedHttpClientFactory) -> Self {
        Self { factory }
    }

    pub async fn list(&self) -> Result<Vec<Category>, ApiError> {
        debug!("listing categories");

        let client = self.factory.create_client()?;

        let resp = client
            .get(format!("{}categories", self.factory.api_url))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ApiError::UnexpectedStatus(resp.status().as_u16()));
        }

        Ok(resp.json::<Vec<Category>>().await?)
    }

    /// Category names and ids only, sorted ascending by id.
    pub async fn list_summaries(&self) -> Result<Vec<CategorySummary>, ApiError> {
        debug!("listing category summaries");

        let client = self.factory.create_client()?;

        let resp = client
            .get(format!("{}categories/categories-only", self.factory.api_url))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ApiError::UnexpectedStatus(resp.status().as_u16()));
        }

        let mut summaries = resp.json::<Vec<CategorySummary>>().await?;
        summaries.sort_by_key(|c| c.id);

        Ok(summaries)
    }

    pub async fn create(&self, name: &str) -> Result<(), ApiError> {
        if name.trim().is_empty() {
            return Err(ApiError::Validation(
                "Category name is required.".to_string(),
            ));
        }

        debug!("creating category");

        let client = self.factory.create_client()?;

        let resp = client
            .post(format!("{}categories", self.factory.api_url))
            .json(&NewCategory {
                name: name.to_string(),
            })
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ApiError::from_status(
                resp.status(),
                "Category not found",
                "Category name already exists",
            ));
        }

        Ok(())
    }

    pub async fn assign_product(
        &self,
        category_id: i64,
        product_id: i64,
    ) -> Result<(), ApiError> {
        debug!("assigning product to category");

        let client = self.factory.create_client()?;

        let resp = client
            .post(format!(
                "{}categories/{}/products/{}",
                self.factory.api_url, category_id, product_id
            ))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ApiError::from_status(
                resp.status(),
                "Product not found",
                "Product is already in this category",
            ));
        }

        Ok(())
    }
}
