//! Typed wrappers over the backend's REST routes.
//!
//! Each wrapper supplies a fixed path, method, and payload shape and
//! forwards to [`ApiClient::request`]; resilience and classification
//! live in the client, not here. Delete routes answer 204 No Content,
//! which the wrappers surface as a plain `Ok(())`.

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::model::{
    AuthResponse, Expense, InventoryItem, LoginRequest, NewExpense, NewInventoryItem, NewOrder,
    NewRecipe, NewStaffMember, Order, Recipe, RegisterRequest, StaffMember,
};
use crate::monitor::Probe;
use crate::retry::RetryPolicy;
use crate::token::Credential;
use crate::transport::Method;
use async_trait::async_trait;

impl ApiClient {
    /// Sign in with a username or email.
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.post("/auth/login", None, request).await?.parse()
    }

    /// Register a new account.
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.post("/auth/register", None, request).await?.parse()
    }

    /// Fetch the full recipe catalog.
    pub async fn fetch_recipes(&self, token: &Credential) -> Result<Vec<Recipe>, ApiError> {
        self.get("/recipes", Some(token)).await?.parse()
    }

    /// Fetch one recipe.
    pub async fn fetch_recipe(&self, id: i64, token: &Credential) -> Result<Recipe, ApiError> {
        self.get(&format!("/recipes/{}", id), Some(token)).await?.parse()
    }

    /// Create a recipe.
    pub async fn create_recipe(
        &self,
        recipe: &NewRecipe,
        token: &Credential,
    ) -> Result<Recipe, ApiError> {
        self.post("/recipes", Some(token), recipe).await?.parse()
    }

    /// Update a recipe.
    pub async fn update_recipe(
        &self,
        id: i64,
        recipe: &NewRecipe,
        token: &Credential,
    ) -> Result<Recipe, ApiError> {
        self.put(&format!("/recipes/{}", id), Some(token), recipe).await?.parse()
    }

    /// Delete a recipe.
    pub async fn delete_recipe(&self, id: i64, token: &Credential) -> Result<(), ApiError> {
        self.delete(&format!("/recipes/{}", id), Some(token)).await?;
        Ok(())
    }

    /// Fetch all POS orders.
    pub async fn fetch_orders(&self, token: &Credential) -> Result<Vec<Order>, ApiError> {
        self.get("/pos/orders", Some(token)).await?.parse()
    }

    /// Create a POS order. Not idempotent: a retried create may record
    /// the order more than once server-side.
    pub async fn create_order(
        &self,
        order: &NewOrder,
        token: &Credential,
    ) -> Result<Order, ApiError> {
        self.post("/pos/orders", Some(token), order).await?.parse()
    }

    /// Fetch all inventory items.
    pub async fn fetch_inventory(
        &self,
        token: &Credential,
    ) -> Result<Vec<InventoryItem>, ApiError> {
        self.get("/inventory/items", Some(token)).await?.parse()
    }

    /// Create an inventory item.
    pub async fn create_inventory_item(
        &self,
        item: &NewInventoryItem,
        token: &Credential,
    ) -> Result<InventoryItem, ApiError> {
        self.post("/inventory/items", Some(token), item).await?.parse()
    }

    /// Update an inventory item.
    pub async fn update_inventory_item(
        &self,
        id: i64,
        item: &NewInventoryItem,
        token: &Credential,
    ) -> Result<InventoryItem, ApiError> {
        self.put(&format!("/inventory/items/{}", id), Some(token), item).await?.parse()
    }

    /// Delete an inventory item by its stable product code.
    pub async fn delete_inventory_item(
        &self,
        product_id: &str,
        token: &Credential,
    ) -> Result<(), ApiError> {
        self.delete(&format!("/inventory/items/product/{}", product_id), Some(token)).await?;
        Ok(())
    }

    /// Fetch all staff records.
    pub async fn fetch_staff(&self, token: &Credential) -> Result<Vec<StaffMember>, ApiError> {
        self.get("/staff", Some(token)).await?.parse()
    }

    /// Create a staff record.
    pub async fn create_staff(
        &self,
        staff: &NewStaffMember,
        token: &Credential,
    ) -> Result<StaffMember, ApiError> {
        self.post("/staff", Some(token), staff).await?.parse()
    }

    /// Update a staff record.
    pub async fn update_staff(
        &self,
        id: i64,
        staff: &NewStaffMember,
        token: &Credential,
    ) -> Result<StaffMember, ApiError> {
        self.put(&format!("/staff/{}", id), Some(token), staff).await?.parse()
    }

    /// Delete a staff record.
    pub async fn delete_staff(&self, id: i64, token: &Credential) -> Result<(), ApiError> {
        self.delete(&format!("/staff/{}", id), Some(token)).await?;
        Ok(())
    }

    /// Fetch all expenses.
    pub async fn fetch_expenses(&self, token: &Credential) -> Result<Vec<Expense>, ApiError> {
        self.get("/expenses", Some(token)).await?.parse()
    }

    /// Record an expense.
    pub async fn create_expense(
        &self,
        expense: &NewExpense,
        token: &Credential,
    ) -> Result<Expense, ApiError> {
        self.post("/expenses", Some(token), expense).await?.parse()
    }

    /// Update an expense.
    pub async fn update_expense(
        &self,
        id: i64,
        expense: &NewExpense,
        token: &Credential,
    ) -> Result<Expense, ApiError> {
        self.put(&format!("/expenses/{}", id), Some(token), expense).await?.parse()
    }

    /// Delete an expense.
    pub async fn delete_expense(&self, id: i64, token: &Credential) -> Result<(), ApiError> {
        self.delete(&format!("/expenses/{}", id), Some(token)).await?;
        Ok(())
    }

    /// Authenticated health probe: a single attempt against the
    /// lightweight health route, with no retries, used to test whether
    /// the backend still accepts a credential.
    pub async fn health_probe(&self, token: &Credential) -> Result<(), ApiError> {
        self.request_with_policy::<serde_json::Value>(
            &RetryPolicy::none(),
            Method::Get,
            "/recipes/health",
            Some(token),
            None,
        )
        .await?;
        Ok(())
    }
}

#[async_trait]
impl Probe for ApiClient {
    async fn probe(&self, credential: &Credential) -> Result<(), ApiError> {
        self.health_probe(credential).await
    }
}
