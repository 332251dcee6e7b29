//! Wire models for the backend's JSON contract.
//!
//! Field names follow the backend's camelCase JSON. Response models keep
//! fields the backend may omit as `Option` (or defaulted collections) so
//! older server versions deserialize cleanly.

use serde::{Deserialize, Serialize};

/// Account type accepted at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserType {
    /// Full administrative access.
    Admin,
    /// Day-to-day operational access.
    Employee,
}

/// Login request; the backend accepts either a username or an email in
/// the same field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Username or email.
    pub username_or_email: String,
    /// Plain-text password (sent over TLS).
    pub password: String,
}

/// Successful login/registration payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// Bearer token under the newer field name.
    #[serde(default)]
    pub token: Option<String>,
    /// Bearer token under the legacy field name.
    #[serde(default)]
    pub access_token: Option<String>,
    /// Username of the signed-in account.
    #[serde(default)]
    pub username: Option<String>,
    /// Email of the signed-in account.
    #[serde(default)]
    pub email: Option<String>,
    /// First name, when the backend includes it.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Last name, when the backend includes it.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Granted roles, e.g. `ROLE_ADMIN`.
    #[serde(default)]
    pub roles: Vec<String>,
}

impl AuthResponse {
    /// The bearer token, whichever field the backend used.
    pub fn bearer_token(&self) -> Option<&str> {
        self.token.as_deref().or(self.access_token.as_deref())
    }
}

/// Registration request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Desired username.
    pub username: String,
    /// Account email.
    pub email: String,
    /// Plain-text password (sent over TLS).
    pub password: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Contact number.
    pub phone_number: String,
    /// Account type.
    pub user_type: UserType,
}

/// Identity of the signed-in user, kept alongside the credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Username.
    pub username: String,
    /// Email, when known.
    #[serde(default)]
    pub email: Option<String>,
    /// First name, when known.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Last name, when known.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Granted roles.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Legacy single-role string, still emitted by older backends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl UserProfile {
    /// Whether the user holds the admin role, accepting both the role
    /// array (`ROLE_ADMIN`) and the legacy single-role string (`admin`).
    pub fn is_admin(&self) -> bool {
        self.has_role("ROLE_ADMIN", "admin")
    }

    /// Whether the user holds the employee role.
    pub fn is_employee(&self) -> bool {
        self.has_role("ROLE_EMPLOYEE", "employee")
    }

    fn has_role(&self, role: &str, legacy: &str) -> bool {
        if !self.roles.is_empty() {
            return self.roles.iter().any(|r| r == role);
        }
        self.role.as_deref() == Some(legacy)
    }
}

/// One ingredient line of a recipe.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    /// Ingredient name.
    pub name: String,
    /// Quantity, free-form ("2", "to taste").
    #[serde(default)]
    pub quantity: Option<String>,
    /// Unit, free-form.
    #[serde(default)]
    pub unit: Option<String>,
}

/// A dish in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Backend-assigned identifier.
    pub id: i64,
    /// Dish title.
    pub title: String,
    /// Longer description.
    #[serde(default)]
    pub description: Option<String>,
    /// Image URL.
    #[serde(default)]
    pub image: Option<String>,
    /// Menu category.
    #[serde(default)]
    pub category: Option<String>,
    /// Preparation time in minutes.
    #[serde(default)]
    pub prep_time: Option<u32>,
    /// Cooking time in minutes.
    #[serde(default)]
    pub cook_time: Option<u32>,
    /// Serving count.
    #[serde(default)]
    pub servings: Option<u32>,
    /// Average rating, 0.0 to 5.0.
    #[serde(default)]
    pub rating: Option<f64>,
    /// Menu price.
    #[serde(default)]
    pub price: Option<f64>,
    /// Search tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Ingredient lines.
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
}

/// Recipe creation/update payload (no id; the backend assigns one).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecipe {
    /// Dish title.
    pub title: String,
    /// Longer description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Menu category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Preparation time in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<u32>,
    /// Cooking time in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<u32>,
    /// Serving count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<u32>,
    /// Menu price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Ingredient lines.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ingredients: Vec<Ingredient>,
}

/// Payment instrument for a POS order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
    /// Cash at the counter.
    Cash,
    /// Card terminal.
    Card,
    /// UPI transfer.
    Upi,
}

/// Settlement state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    /// Fully settled.
    Paid,
    /// Awaiting settlement.
    Pending,
}

/// One cart line of an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Catalog id of the dish.
    pub food_item_id: i64,
    /// Units ordered.
    pub quantity: u32,
}

/// POS order creation payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    /// Customer's 10-digit mobile number.
    pub customer_mobile: String,
    /// Cart lines.
    pub order_items: Vec<OrderItem>,
    /// Tax charged.
    pub tax_amount: f64,
    /// Discount applied.
    pub discount_amount: f64,
    /// Grand total.
    pub total_amount: f64,
    /// Payment instrument.
    pub payment_method: PaymentMethod,
    /// Settlement state.
    pub payment_status: PaymentStatus,
    /// Promo code, when one was applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promo_code: Option<String>,
}

/// A persisted POS order as the backend returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Backend-assigned identifier.
    pub id: i64,
    /// Customer's mobile number.
    #[serde(default)]
    pub customer_mobile: Option<String>,
    /// Cart lines.
    #[serde(default)]
    pub order_items: Vec<OrderItem>,
    /// Tax charged.
    #[serde(default)]
    pub tax_amount: Option<f64>,
    /// Discount applied.
    #[serde(default)]
    pub discount_amount: Option<f64>,
    /// Grand total.
    #[serde(default)]
    pub total_amount: Option<f64>,
    /// Payment instrument.
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    /// Settlement state.
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
    /// Creation timestamp, backend-formatted.
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A stocked item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    /// Backend-assigned identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Stable product code (uppercase letters, digits, underscores).
    pub product_id: String,
    /// Unit price.
    pub price: f64,
    /// Quantity on hand.
    pub stock: f64,
    /// Stock unit ("kg", "pieces").
    #[serde(default)]
    pub unit: Option<String>,
    /// Item category code.
    #[serde(default, rename = "type")]
    pub item_type: Option<String>,
    /// Availability status.
    #[serde(default)]
    pub status: Option<String>,
}

/// Inventory creation/update payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInventoryItem {
    /// Display name.
    pub name: String,
    /// Stable product code.
    pub product_id: String,
    /// Unit price.
    pub price: f64,
    /// Quantity on hand.
    pub stock: f64,
    /// Stock unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Item category code.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
    /// Availability status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// A staff member record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    /// Backend-assigned identifier.
    pub id: i64,
    /// Full name.
    pub name: String,
    /// Role in the kitchen or front of house.
    #[serde(default)]
    pub responsibility: Option<String>,
    /// Weekly day off.
    #[serde(default)]
    pub off_day: Option<String>,
    /// Daily rest window.
    #[serde(default)]
    pub rest_time: Option<String>,
    /// Monthly salary.
    #[serde(default)]
    pub salary: Option<f64>,
    /// Joining date, backend-formatted.
    #[serde(default)]
    pub joining_date: Option<String>,
}

/// Staff creation/update payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStaffMember {
    /// Full name.
    pub name: String,
    /// Role in the kitchen or front of house.
    pub responsibility: String,
    /// Weekly day off.
    pub off_day: String,
    /// Daily rest window.
    pub rest_time: String,
    /// Monthly salary.
    pub salary: f64,
    /// Joining date.
    pub joining_date: String,
}

/// A recorded expense.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// Backend-assigned identifier.
    pub id: i64,
    /// Expense category.
    pub category: String,
    /// Amount spent.
    pub amount: f64,
    /// Free-form note.
    #[serde(default)]
    pub description: Option<String>,
}

/// Expense creation/update payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    /// Expense category.
    pub category: String,
    /// Amount spent.
    pub amount: f64,
    /// Free-form note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
