// src/models/mod.rs

//! Contains data structures representing database entities.

// Declare child modules for each model
pub mod category;
pub mod order;
pub mod product;
pub mod reference_image;

// Re-export the model structs for convenient access
pub use category::Category;
pub use order::{Order, OrderStatus, PaymentStatus};
pub use product::Product;
pub use reference_image::ReferenceImage;
