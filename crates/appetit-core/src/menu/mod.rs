//! Menu domain model.
//!
//! Mirrors the wire shapes served by the dining API: locations with their
//! menu types, per-dish nutrition, and the daily/monthly menu views.

pub mod model;

pub use model::{
    DatedMenuItem, FoodProperty, Location, Menu, MenuItem, MenuItemHash, MenuSection, MenuType,
    MonthlyViewDay, NutritionFact, ServingSize,
};
