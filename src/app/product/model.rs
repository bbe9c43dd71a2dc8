//! 产品数据模型与请求校验

use chrono::{DateTime, Utc};
use rust_decimal::{prelude::FromPrimitive, Decimal};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use crate::core::error::FieldErrors;

pub const NAME_MAX_LEN: usize = 255;
pub const DESCRIPTION_MAX_LEN: usize = 2000;
/// `NUMERIC(10, 2)` 列可存储的最大值
pub const PRICE_MAX: f64 = 99_999_999.99;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 已校验、待写入的新产品
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i32,
}

/// 已校验的部分更新；`None` 表示保持原值
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub name: Option<String>,
    /// `Some(None)` 表示清空描述
    pub description: Option<Option<String>>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
}

impl ProductChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.stock.is_none()
    }

    pub fn apply_to(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
    }
}

// 创建产品请求
#[derive(Debug, Default, Validate)]
pub struct CreateProductRequest {
    #[validate(
        required(message = "The name field is required."),
        length(max = 255, message = "The name field must not be greater than 255 characters.")
    )]
    pub name: Option<String>,

    #[validate(length(
        max = 2000,
        message = "The description field must not be greater than 2000 characters."
    ))]
    pub description: Option<String>,

    #[validate(
        required(message = "The price field is required."),
        range(min = 0.0, message = "The price field must be at least 0.")
    )]
    pub price: Option<f64>,

    #[validate(range(min = 0, message = "The stock field must be at least 0."))]
    pub stock: Option<i32>,

    /// 反序列化时类型不符的字段
    pub(crate) type_errors: FieldErrors,
}

impl<'de> Deserialize<'de> for CreateProductRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields = RequestFields::deserialize(deserializer)?;
        Ok(Self {
            name: fields.string("name").flatten(),
            description: fields.string("description").flatten(),
            price: fields.number("price").flatten(),
            stock: fields.integer("stock").flatten(),
            type_errors: fields.errors,
        })
    }
}

impl CreateProductRequest {
    /// 执行全部规则，所有失败字段一并返回
    pub fn into_new_product(self) -> Result<NewProduct, FieldErrors> {
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => e.into(),
        };
        if self.name.as_deref().is_some_and(is_blank) && !errors.contains("name") {
            errors.add("name", "The name field is required.");
        }
        let price = self.price.and_then(|p| to_price(p, &mut errors));
        errors.overlay(self.type_errors);
        errors.into_result()?;

        // 上面的校验保证 name 与 price 均存在
        match (self.name, price) {
            (Some(name), Some(price)) => Ok(NewProduct {
                name: name.trim().to_string(),
                description: normalize_description(self.description),
                price,
                stock: self.stock.unwrap_or(0),
            }),
            _ => {
                let mut errors = FieldErrors::new();
                errors.add("price", "The price field is required.");
                Err(errors)
            }
        }
    }
}

// 更新产品请求
#[derive(Debug, Default, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(
        max = 255,
        message = "The name field must not be greater than 255 characters."
    ))]
    pub name: Option<String>,

    /// 缺省为 `None`，显式 `null` 为 `Some(None)`
    pub description: Option<Option<String>>,

    #[validate(range(min = 0.0, message = "The price field must be at least 0."))]
    pub price: Option<f64>,

    #[validate(range(min = 0, message = "The stock field must be at least 0."))]
    pub stock: Option<i32>,

    pub(crate) type_errors: FieldErrors,
}

impl<'de> Deserialize<'de> for UpdateProductRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields = RequestFields::deserialize(deserializer)?;
        Ok(Self {
            name: fields.string("name").flatten(),
            description: fields.string("description"),
            price: fields.number("price").flatten(),
            stock: fields.integer("stock").flatten(),
            type_errors: fields.errors,
        })
    }
}

impl UpdateProductRequest {
    /// 只校验请求中出现的字段
    pub fn into_changes(self) -> Result<ProductChanges, FieldErrors> {
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => e.into(),
        };
        if self.name.as_deref().is_some_and(is_blank) {
            errors.add("name", "The name field is required.");
        }
        if let Some(Some(description)) = &self.description {
            if description.chars().count() > DESCRIPTION_MAX_LEN {
                errors.add(
                    "description",
                    "The description field must not be greater than 2000 characters.",
                );
            }
        }
        let price = self.price.and_then(|p| to_price(p, &mut errors));
        errors.overlay(self.type_errors);
        errors.into_result()?;

        Ok(ProductChanges {
            name: self.name.map(|n| n.trim().to_string()),
            description: self.description.map(normalize_description),
            price,
            stock: self.stock,
        })
    }
}

/// 宽松读取请求体字段
///
/// 外层 `None` 表示字段缺省，`Some(None)` 表示 `null` 或类型不符；
/// 类型不符的字段记入 `errors`，不会中断其他字段的校验。
#[derive(Deserialize)]
#[serde(transparent)]
struct RequestFields {
    values: Map<String, Value>,
    #[serde(skip)]
    errors: FieldErrors,
}

impl RequestFields {
    fn string(&mut self, field: &str) -> Option<Option<String>> {
        match self.values.remove(field)? {
            Value::Null => Some(None),
            Value::String(s) => Some(Some(s)),
            _ => self.mistyped(field, "must be a string"),
        }
    }

    fn number(&mut self, field: &str) -> Option<Option<f64>> {
        let parsed = match self.values.remove(field)? {
            Value::Null => return Some(None),
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        };
        match parsed {
            Some(v) => Some(Some(v)),
            None => self.mistyped(field, "must be a number"),
        }
    }

    fn integer(&mut self, field: &str) -> Option<Option<i32>> {
        let parsed = match self.values.remove(field)? {
            Value::Null => return Some(None),
            Value::Number(n) => n.as_i64().and_then(|v| i32::try_from(v).ok()),
            Value::String(s) => s.trim().parse::<i32>().ok(),
            _ => None,
        };
        match parsed {
            Some(v) => Some(Some(v)),
            None => self.mistyped(field, "must be an integer"),
        }
    }

    fn mistyped<T>(&mut self, field: &str, rule: &str) -> Option<Option<T>> {
        self.errors
            .add(field, format!("The {} field {}.", field, rule));
        Some(None)
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// 空白描述按 NULL 存储
fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

/// 转为两位小数的价格，`100` 与 `100.00` 结果相同
fn to_price(value: f64, errors: &mut FieldErrors) -> Option<Decimal> {
    if value > PRICE_MAX {
        errors.add(
            "price",
            "The price field must not be greater than 99999999.99.",
        );
        return None;
    }
    match Decimal::from_f64(value) {
        Some(price) => {
            let mut price = price.round_dp(2);
            price.rescale(2);
            Some(price)
        }
        None => {
            errors.add("price", "The price field must be a number.");
            None
        }
    }
}
