use gloo::net::http::{Request, RequestBuilder};
use shared::{
    AddToCartRequest, CartPayload, CartSnapshot, CheckoutRequest, CheckoutResponse,
    ServiceSummary, UpdateCartItemRequest,
};

/// API client for the resort backend.
///
/// All payloads are JSON; the bearer token is supplied by the auth layer and
/// attached to every request when present.
#[derive(Clone, PartialEq)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client with the default base URL
    pub fn new() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            token: None,
        }
    }

    /// Create a new API client with a custom base URL
    pub fn with_base_url(base_url: String) -> Self {
        Self { base_url, token: None }
    }

    /// Attach a bearer token to all subsequent requests
    pub fn with_token(mut self, token: String) -> Self {
        self.token = Some(token);
        self
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
            None => builder,
        }
    }

    /// Get or create the active cart for the current user
    pub async fn get_active_cart(&self) -> Result<CartSnapshot, String> {
        let url = format!("{}/api/v1/cart/get-my-cart/", self.base_url);

        match self.authorize(Request::get(&url)).send().await {
            Ok(response) => {
                if response.ok() {
                    match response.json::<CartSnapshot>().await {
                        Ok(cart) => Ok(cart),
                        Err(e) => Err(format!("Failed to parse cart: {}", e)),
                    }
                } else {
                    let error_text = response.text().await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    Err(error_text)
                }
            }
            Err(e) => Err(format!("Network error: {}", e)),
        }
    }

    /// Add a service to the cart
    pub async fn add_to_cart(&self, request: &AddToCartRequest) -> Result<CartSnapshot, String> {
        let url = format!("{}/api/v1/cart/add-to-cart/", self.base_url);

        match self.authorize(Request::post(&url))
            .json(request)
            .map_err(|e| format!("Failed to serialize request: {}", e))?
            .send()
            .await
        {
            Ok(response) => {
                if response.ok() {
                    match response.json::<CartPayload>().await {
                        Ok(payload) => Ok(payload.into_snapshot()),
                        Err(e) => Err(format!("Failed to parse cart: {}", e)),
                    }
                } else {
                    let error_text = response.text().await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    Err(error_text)
                }
            }
            Err(e) => Err(format!("Network error: {}", e)),
        }
    }

    /// Update one cart item's quantity and (optionally) its schedule
    pub async fn update_cart_item(
        &self,
        item_id: &str,
        request: &UpdateCartItemRequest,
    ) -> Result<CartSnapshot, String> {
        let url = format!("{}/api/v1/cart/items/{}/", self.base_url, item_id);

        match self.authorize(Request::patch(&url))
            .json(request)
            .map_err(|e| format!("Failed to serialize request: {}", e))?
            .send()
            .await
        {
            Ok(response) => {
                if response.ok() {
                    match response.json::<CartPayload>().await {
                        Ok(payload) => Ok(payload.into_snapshot()),
                        Err(e) => Err(format!("Failed to parse cart: {}", e)),
                    }
                } else {
                    let error_text = response.text().await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    Err(error_text)
                }
            }
            Err(e) => Err(format!("Network error: {}", e)),
        }
    }

    /// Remove one cart item. The endpoint may answer 204 with an empty body,
    /// so absence of a snapshot is not an error.
    pub async fn remove_cart_item(&self, item_id: &str) -> Result<Option<CartSnapshot>, String> {
        let url = format!("{}/api/v1/cart/items/{}/remove/", self.base_url, item_id);

        match self.authorize(Request::delete(&url)).send().await {
            Ok(response) => {
                if response.ok() {
                    let text = response.text().await.unwrap_or_default();
                    if text.is_empty() {
                        return Ok(None);
                    }
                    match serde_json::from_str::<CartPayload>(&text) {
                        Ok(payload) => Ok(Some(payload.into_snapshot())),
                        Err(_) => Ok(None),
                    }
                } else {
                    let error_text = response.text().await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    Err(error_text)
                }
            }
            Err(e) => Err(format!("Network error: {}", e)),
        }
    }

    /// Clear the entire cart
    pub async fn clear_cart(&self) -> Result<(), String> {
        let url = format!("{}/api/v1/cart/clear-cart/", self.base_url);

        match self.authorize(Request::delete(&url)).send().await {
            Ok(response) => {
                if response.ok() {
                    Ok(())
                } else {
                    let error_text = response.text().await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    Err(error_text)
                }
            }
            Err(e) => Err(format!("Network error: {}", e)),
        }
    }

    /// Check out the active cart. The response is either the created order
    /// or a hosted-payment redirect URL.
    pub async fn checkout(&self, request: &CheckoutRequest) -> Result<CheckoutResponse, String> {
        let url = format!("{}/api/v1/cart/checkout/", self.base_url);

        match self.authorize(Request::post(&url))
            .json(request)
            .map_err(|e| format!("Failed to serialize request: {}", e))?
            .send()
            .await
        {
            Ok(response) => {
                if response.ok() {
                    match response.json::<CheckoutResponse>().await {
                        Ok(outcome) => Ok(outcome),
                        Err(e) => Err(format!("Failed to parse checkout response: {}", e)),
                    }
                } else {
                    let error_text = response.text().await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    Err(error_text)
                }
            }
            Err(e) => Err(format!("Network error: {}", e)),
        }
    }

    /// List the bookable services
    pub async fn list_services(&self) -> Result<Vec<ServiceSummary>, String> {
        let url = format!("{}/api/v1/services/", self.base_url);

        match self.authorize(Request::get(&url)).send().await {
            Ok(response) => {
                if response.ok() {
                    match response.json::<Vec<ServiceSummary>>().await {
                        Ok(services) => Ok(services),
                        Err(e) => Err(format!("Failed to parse services: {}", e)),
                    }
                } else {
                    let error_text = response.text().await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    Err(error_text)
                }
            }
            Err(e) => Err(format!("Network error: {}", e)),
        }
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}
