//! Shared utilities.

mod matrix;

pub use matrix::{cross_product, cross_product_inverse, hat_diagonal};
