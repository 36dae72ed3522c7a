use log::debug;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::core::common::{
    http_client_factory::AuthenticatedHttpClientFactory, transport::ApiError,
};

/// A product record as the API returns it. The id is server-assigned and
/// absent when creating.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub sku: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "imageUrl", default)]
    pub image_url: String,
    #[serde(default)]
    pub price: f64,
}

/// Typed access to the product endpoints. The SKU is the natural key, every
/// single-product operation addresses it.
pub struct ProductClient<'a> {
    factory: &'a AuthenticatedHttpClientFactory,
}

impl<'a> ProductClient<'a> {
    pub fn new(factory: &'a AuthenticatedHttpClientFactory) -> Self {
        Self { factory }
    }

    pub async fn search_by_name(&self, name: &str) -> Result<Vec<Product>, ApiError> {
        debug!("searching products by name");

        let client = self.factory.create_client()?;

        let resp = client
            .get(format!("{}products", self.factory.api_url))
            .query(&[("name", name)])
            .send()
            .await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound("Product not found".to_string()));
        }

        if !resp.status().is_success() {
            return Err(ApiError::UnexpectedStatus(resp.status().as_u16()));
        }

        Ok(resp.json::<Vec<Product>>().await?)
    }

    pub async fn get_by_sku(&self, sku: &str) -> Result<Product, ApiError> {
        debug!("fetching product by sku");

        let client = self.factory.create_client()?;

        let resp = client
            .get(format!("{}products/{}", self.factory.api_url, sku))
            .send()
            .await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound("Product not found".to_string()));
        }

        if !resp.status().is_success() {
            return Err(ApiError::UnexpectedStatus(resp.status().as_u16()));
        }

        Ok(resp.json::<Product>().await?)
    }

    pub async fn create(&self, product: &Product) -> Result<(), ApiError> {
        debug!("registering product");

        let client = self.factory.create_client()?;

        let resp = client
            .post(format!("{}products", self.factory.api_url))
            .json(product)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ApiError::from_status(
                resp.status(),
                "Product not found",
                "SKU already exists",
            ));
        }

        Ok(())
    }

    /// Whole-record update, addressed by the SKU carried in the record.
    pub async fn update(&self, product: &Product) -> Result<(), ApiError> {
        debug!("updating product");

        let client = self.factory.create_client()?;

        let resp = client
            .put(format!("{}products/{}", self.factory.api_url, product.sku))
            .json(product)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ApiError::from_status(
                resp.status(),
                "Product not found",
                "SKU already exists",
            ));
        }

        Ok(())
    }

    pub async fn delete(&self, sku: &str) -> Result<(), ApiError> {
        debug!("deleting product");

        let client = self.factory.create_client()?;

        let resp = client
            .delete(format!("{}products/{}", self.factory.api_url, sku))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ApiError::from_status(
                resp.status(),
                "Product not found",
                "SKU already exists",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use serde_json::json;
    use wiremock::{
        matchers::{header, method, path, query_param},
        Mock, MockServer,
    };

    fn factory_for(mock_server: &MockServer) -> AuthenticatedHttpClientFactory {
        AuthenticatedHttpClientFactory::new(
            format!("{}/", mock_server.uri()),
            "abc.def.ghi".to_string(),
        )
    }

    #[tokio::test]
    async fn search_by_name_attaches_the_bearer_token() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/products"))
            .and(query_param("name", "chair"))
            .and(header("Authorization", "Bearer abc.def.ghi"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_json(json!([
                { "id": 1, "name": "chair", "sku": "CH-1", "description": "", "imageUrl": "", "price": 49.0 }
            ])))
            .mount(&mock_server)
            .await;

        let factory = factory_for(&mock_server);
        let client = ProductClient::new(&factory);

        let products = client.search_by_name("chair").await.unwrap();

        assert_eq!(1, products.len());
        assert_eq!("CH-1", products[0].sku);
    }

    #[tokio::test]
    async fn search_miss_maps_to_product_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(wiremock::ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let factory = factory_for(&mock_server);
        let client = ProductClient::new(&factory);

        let err = client.search_by_name("ghost").await.unwrap_err();

        assert_eq!(ApiError::NotFound("Product not found".to_string()), err);
    }

    #[tokio::test]
    async fn create_conflict_maps_to_sku_already_exists() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/products"))
            .respond_with(wiremock::ResponseTemplate::new(400))
            .mount(&mock_server)
            .await;

        let factory = factory_for(&mock_server);
        let client = ProductClient::new(&factory);

        let product = Product {
            id: None,
            name: "chair".to_string(),
            sku: "CH-1".to_string(),
            description: "a chair".to_string(),
            image_url: "https://example.org/chair.png".to_string(),
            price: 49.0,
        };

        let err = client.create(&product).await.unwrap_err();

        assert_eq!(ApiError::Conflict("SKU already exists".to_string()), err);
    }

    #[tokio::test]
    async fn delete_missing_product_maps_to_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/products/CH-1"))
            .respond_with(wiremock::ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let factory = factory_for(&mock_server);
        let client = ProductClient::new(&factory);

        let err = client.delete("CH-1").await.unwrap_err();

        assert_eq!(ApiError::NotFound("Product not found".to_string()), err);
    }

    #[tokio::test]
    async fn update_puts_the_whole_record() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/products/CH-1"))
            .respond_with(wiremock::ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let factory = factory_for(&mock_server);
        let client = ProductClient::new(&factory);

        let product = Product {
            id: Some(1),
            name: "chair".to_string(),
            sku: "CH-1".to_string(),
            description: "a better chair".to_string(),
            image_url: String::new(),
            price: 59.0,
        };

        client.update(&product).await.unwrap();
    }
}
