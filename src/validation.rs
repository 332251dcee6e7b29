//! Client-side field validation.
//!
//! Mirrors the backend's validation annotations (patterns, size bounds,
//! messages) so forms can reject bad input before a round trip. The
//! backend remains the authority; these checks only pre-screen.
//!
//! Each validator returns the list of violated rules, empty when the
//! value passes. Messages are fixed strings matching the backend's.

use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

fn regex(cell: &'static OnceLock<Regex>, pattern: &'static str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("pattern is valid"))
}

fn username_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"^[a-zA-Z0-9_]+$")
}

fn email_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
}

fn name_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"^[a-zA-Z\s'-]+$")
}

fn phone_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"^[0-9\s\-+().]*$")
}

fn mobile_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"^[6-9][0-9]{9}$")
}

fn product_id_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"^[A-Z0-9_]+$")
}

fn inventory_name_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"^[a-zA-Z0-9\s\-_&().,']+$")
}

fn push_required(errors: &mut Vec<String>, value: &str, message: &str) -> bool {
    if value.trim().is_empty() {
        errors.push(message.to_string());
        return true;
    }
    false
}

fn push_size(errors: &mut Vec<String>, value: &str, min: usize, max: usize, message: &str) {
    let len = value.chars().count();
    if len < min || len > max {
        errors.push(message.to_string());
    }
}

/// Username: 3-30 characters, letters, digits, and underscores.
pub fn validate_username(value: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if push_required(&mut errors, value, "Username is required") {
        return errors;
    }
    push_size(&mut errors, value, 3, 30, "Username must be between 3 and 30 characters");
    if !username_pattern().is_match(value) {
        errors.push("Username must contain only letters, numbers, and underscores".to_string());
    }
    errors
}

/// Email: required, at most 100 characters, standard shape.
pub fn validate_email(value: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if push_required(&mut errors, value, "Email is required") {
        return errors;
    }
    push_size(&mut errors, value, 0, 100, "Email must not exceed 100 characters");
    if !email_pattern().is_match(value) {
        errors.push("Email should be valid".to_string());
    }
    errors
}

/// Password: 8-128 characters with at least one lowercase letter, one
/// uppercase letter, one digit, and one special character from
/// `@$!%*?&`, drawn only from that alphabet. The backend expresses this
/// with lookaheads; here it is explicit character-class checks.
pub fn validate_password(value: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if push_required(&mut errors, value, "Password is required") {
        return errors;
    }
    push_size(&mut errors, value, 8, 128, "Password must be between 8 and 128 characters");
    const SPECIALS: &[char] = &['@', '$', '!', '%', '*', '?', '&'];
    let has_lower = value.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = value.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = value.chars().any(|c| c.is_ascii_digit());
    let has_special = value.chars().any(|c| SPECIALS.contains(&c));
    let only_allowed = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || SPECIALS.contains(&c));
    if !(has_lower && has_upper && has_digit && has_special && only_allowed) {
        errors.push(
            "Password must contain at least one lowercase letter, one uppercase letter, \
             one digit, and one special character"
                .to_string(),
        );
    }
    errors
}

/// Person name: 2-30 characters, letters, spaces, hyphens, apostrophes.
pub fn validate_name(value: &str, field: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if push_required(&mut errors, value, &format!("{} is required", field)) {
        return errors;
    }
    push_size(
        &mut errors,
        value,
        2,
        30,
        &format!("{} must be between 2 and 30 characters", field),
    );
    if !name_pattern().is_match(value) {
        errors.push(format!(
            "{} must contain only letters, spaces, hyphens, and apostrophes",
            field
        ));
    }
    errors
}

/// Phone: at most 15 characters of digits and phone punctuation.
pub fn validate_phone(value: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if push_required(&mut errors, value, "Phone number is required") {
        return errors;
    }
    push_size(&mut errors, value, 0, 15, "Phone number must not exceed 15 characters");
    if !phone_pattern().is_match(value) {
        errors.push(
            "Phone number must contain only numbers, spaces, and phone symbols".to_string(),
        );
    }
    errors
}

/// Customer mobile: a valid 10-digit Indian mobile number.
pub fn validate_mobile_number(value: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if push_required(&mut errors, value, "Customer mobile number is required") {
        return errors;
    }
    if !mobile_pattern().is_match(value) {
        errors.push("Mobile number must be a valid 10-digit Indian mobile number".to_string());
    }
    errors
}

/// Inventory display name: 2-100 characters with common punctuation.
pub fn validate_inventory_name(value: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if push_required(&mut errors, value, "Name is required") {
        return errors;
    }
    push_size(&mut errors, value, 2, 100, "Name must be between 2 and 100 characters");
    if !inventory_name_pattern().is_match(value) {
        errors.push(
            "Name must contain only letters, numbers, spaces, and common punctuation".to_string(),
        );
    }
    errors
}

/// Product code: 3-50 uppercase letters, digits, underscores.
pub fn validate_product_id(value: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if push_required(&mut errors, value, "Product ID is required") {
        return errors;
    }
    push_size(&mut errors, value, 3, 50, "Product ID must be between 3 and 50 characters");
    if !product_id_pattern().is_match(value) {
        errors.push(
            "Product ID must contain only uppercase letters, numbers, and underscores"
                .to_string(),
        );
    }
    errors
}

/// Price: zero or positive, at most 999999.99.
pub fn validate_price(value: f64) -> Vec<String> {
    let mut errors = Vec::new();
    if value.is_nan() {
        errors.push("Price is required".to_string());
        return errors;
    }
    if value < 0.0 {
        errors.push("Price must be zero or positive".to_string());
    }
    if value > 999_999.99 {
        errors.push("Price must not exceed 999999.99".to_string());
    }
    errors
}

/// Recipe title: required, at most 255 characters.
pub fn validate_recipe_title(value: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if push_required(&mut errors, value, "Title is required") {
        return errors;
    }
    push_size(&mut errors, value, 0, 255, "Title must not exceed 255 characters");
    errors
}

/// Recipe description: at most 2000 characters, optional.
pub fn validate_recipe_description(value: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if value.trim().is_empty() {
        return errors;
    }
    push_size(&mut errors, value, 0, 2000, "Description must not exceed 2000 characters");
    errors
}

/// Prep time: 0-999 minutes.
pub fn validate_prep_time(value: u32) -> Vec<String> {
    bounded(value, 999, "Prep time must not exceed 999 minutes")
}

/// Cook time: 0-999 minutes.
pub fn validate_cook_time(value: u32) -> Vec<String> {
    bounded(value, 999, "Cook time must not exceed 999 minutes")
}

/// Servings: 1-50.
pub fn validate_servings(value: u32) -> Vec<String> {
    let mut errors = Vec::new();
    if value < 1 {
        errors.push("Servings must be at least 1".to_string());
    }
    if value > 50 {
        errors.push("Servings must not exceed 50".to_string());
    }
    errors
}

/// Rating: 0.0-5.0.
pub fn validate_rating(value: f64) -> Vec<String> {
    let mut errors = Vec::new();
    if value < 0.0 {
        errors.push("Rating must be at least 0.0".to_string());
    }
    if value > 5.0 {
        errors.push("Rating must be at most 5.0".to_string());
    }
    errors
}

fn bounded(value: u32, max: u32, max_message: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if value > max {
        errors.push(max_message.to_string());
    }
    errors
}

/// Per-field validation outcome for a whole form; keeps the first error
/// of each failing field.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FormErrors {
    errors: HashMap<String, String>,
}

impl FormErrors {
    /// Whether every field passed.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// First error for a field, if it failed.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// All failing fields.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }
}

/// Aggregate per-field results, keeping the first error per field.
pub fn validate_form<'a>(
    results: impl IntoIterator<Item = (&'a str, Vec<String>)>,
) -> FormErrors {
    let mut errors = HashMap::new();
    for (field, mut field_errors) in results {
        if !field_errors.is_empty() {
            errors.insert(field.to_string(), field_errors.remove(0));
        }
    }
    FormErrors { errors }
}
