//! Domain models shared by the Marlin services

pub mod analytics;
pub mod category;
pub mod inventory;
pub mod product;
pub mod promo_code;
pub mod tag;
