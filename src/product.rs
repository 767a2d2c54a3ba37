//! Inventory records
//!
//! `Shop` and `Product` mirror the two stored tables; `ProductRow` is the
//! joined shape returned by listing queries.

use serde::{Deserialize, Serialize};

/// A named place products are bought at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shop {
    pub id: i64,
    pub title: String,
}

/// A priced item as stored, referencing its shop by id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub shop_id: i64,
    pub cost: f64,
}

/// A product joined with its shop title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRow {
    pub name: String,
    pub shop: String,
    pub cost: f64,
}

impl ProductRow {
    pub fn new(name: impl Into<String>, shop: impl Into<String>, cost: f64) -> Self {
        Self {
            name: name.into(),
            shop: shop.into(),
            cost,
        }
    }
}

/// Threshold at which costs switch to exponent notation
const EXPONENT_CUTOFF: f64 = 1e16;

/// Format a cost the way a float literal reads: whole numbers keep one
/// decimal (`30.0`), fractional values use the shortest exact form (`44.4`),
/// and magnitudes from `1e16` up use a signed exponent (`1e+16`).
pub fn format_cost(cost: f64) -> String {
    if !cost.is_finite() {
        return format!("{}", cost);
    }
    if cost.abs() >= EXPONENT_CUTOFF {
        let formatted = format!("{:e}", cost);
        return match formatted.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => formatted,
        };
    }
    if cost.fract() == 0.0 {
        format!("{:.1}", cost)
    } else {
        format!("{}", cost)
    }
}
