// Payload shapes for every route that accepts input.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{present, Field, Rule, Schema};

const NON_EMPTY: Rule = Rule::Text { min: 1 };
const ANY_TEXT: Rule = Rule::Text { min: 0 };
const NON_NEGATIVE: Rule = Rule::Integer { min: 0, max: None };
const POSITIVE: Rule = Rule::Integer { min: 1, max: None };

pub const MAX_TAKE: i64 = 100;
pub const DEFAULT_TAKE: i64 = 20;

// ---- auth ----

#[derive(Debug, Deserialize)]
pub struct SignupInput {
    pub email: String,
    pub password: String,
}

impl Schema for SignupInput {
    const FIELDS: &'static [Field] = &[
        Field::required("email", Rule::Email),
        Field::required("password", Rule::Secret { min: 6 }),
    ];
}

#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

impl Schema for LoginInput {
    const FIELDS: &'static [Field] = &[
        Field::required("email", Rule::Email),
        Field::required("password", Rule::Secret { min: 1 }),
    ];
}

// ---- products ----

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    pub unit_price: i32,
    pub unit: String,
}

impl Schema for ProductInput {
    const FIELDS: &'static [Field] = &[
        Field::required("name", NON_EMPTY),
        Field::required("unitPrice", NON_NEGATIVE),
        Field::required("unit", NON_EMPTY),
    ];
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub unit_price: Option<i32>,
    pub unit: Option<String>,
}

impl Schema for ProductPatch {
    const FIELDS: &'static [Field] = &[
        Field::optional("name", NON_EMPTY),
        Field::optional("unitPrice", NON_NEGATIVE),
        Field::optional("unit", NON_EMPTY),
    ];
}

// ---- customers ----

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInput {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub memo: Option<String>,
}

impl Schema for CustomerInput {
    const FIELDS: &'static [Field] = &[
        Field::required("name", NON_EMPTY),
        Field::required("phone", NON_EMPTY),
        Field::nullable("memo", ANY_TEXT),
    ];
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    #[serde(deserialize_with = "present")]
    pub memo: Option<Option<String>>,
}

impl Schema for CustomerPatch {
    const FIELDS: &'static [Field] = &[
        Field::optional("name", NON_EMPTY),
        Field::optional("phone", NON_EMPTY),
        Field::nullable("memo", ANY_TEXT),
    ];
}

// ---- sales ----

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleInput {
    pub date: DateTime<Utc>,
    pub quantity: i32,
    pub total_price: i32,
    pub product_id: i32,
    #[serde(default)]
    pub customer_id: Option<i32>,
}

impl Schema for SaleInput {
    const FIELDS: &'static [Field] = &[
        Field::required("date", Rule::Date),
        Field::required("quantity", POSITIVE),
        Field::required("totalPrice", NON_NEGATIVE),
        Field::required("productId", POSITIVE),
        Field::nullable("customerId", POSITIVE),
    ];
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SalePatch {
    pub date: Option<DateTime<Utc>>,
    pub quantity: Option<i32>,
    pub total_price: Option<i32>,
    pub product_id: Option<i32>,
    #[serde(deserialize_with = "present")]
    pub customer_id: Option<Option<i32>>,
}

impl Schema for SalePatch {
    const FIELDS: &'static [Field] = &[
        Field::optional("date", Rule::Date),
        Field::optional("quantity", POSITIVE),
        Field::optional("totalPrice", NON_NEGATIVE),
        Field::optional("productId", POSITIVE),
        Field::nullable("customerId", POSITIVE),
    ];
}

// ---- posts ----

#[derive(Debug, Deserialize)]
pub struct PostInput {
    pub title: String,
    pub content: String,
}

impl Schema for PostInput {
    const FIELDS: &'static [Field] = &[
        Field::required("title", NON_EMPTY),
        Field::required("content", NON_EMPTY),
    ];
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl Schema for PostPatch {
    const FIELDS: &'static [Field] = &[
        Field::optional("title", NON_EMPTY),
        Field::optional("content", NON_EMPTY),
    ];
}

// ---- list queries ----

fn default_take() -> i64 {
    DEFAULT_TAKE
}

/// `?skip=&take=&search=` for collection listings
#[derive(Debug, Clone, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_take")]
    pub take: i64,
    #[serde(default)]
    pub search: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            skip: 0,
            take: DEFAULT_TAKE,
            search: None,
        }
    }
}

impl ListQuery {
    /// `ILIKE` pattern for the search term, with wildcards in the term escaped.
    /// Blank terms mean no filter.
    pub fn search_pattern(&self) -> Option<String> {
        let term = self.search.as_deref()?.trim();
        if term.is_empty() {
            return None;
        }
        let escaped = term
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        Some(format!("%{escaped}%"))
    }
}

impl Schema for ListQuery {
    const FIELDS: &'static [Field] = &[
        Field::optional("skip", NON_NEGATIVE),
        Field::optional("take", Rule::Integer { min: 1, max: Some(MAX_TAKE) }),
        Field::optional("search", ANY_TEXT),
    ];
}

/// `/sales` listing: pagination plus optional product/customer filters
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleListQuery {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_take")]
    pub take: i64,
    #[serde(default)]
    pub product_id: Option<i32>,
    #[serde(default)]
    pub customer_id: Option<i32>,
}

impl Schema for SaleListQuery {
    const FIELDS: &'static [Field] = &[
        Field::optional("skip", NON_NEGATIVE),
        Field::optional("take", Rule::Integer { min: 1, max: Some(MAX_TAKE) }),
        Field::optional("productId", POSITIVE),
        Field::optional("customerId", POSITIVE),
    ];
}
