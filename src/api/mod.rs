//! REST API handlers and shared response types

pub mod health;
pub mod introspect;
pub mod session;

use serde::Serialize;

/// Standard success envelope
#[derive(Debug, Serialize)]
pub struct SuccessResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> SuccessResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}
