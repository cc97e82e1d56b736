//! Category domain entity.

use serde::Serialize;
use utoipa::ToSchema;

/// Product category
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Category {
    pub id: i32,
    #[schema(example = "Kitchen Tools")]
    pub name: String,
    /// URL-friendly identifier derived from the name
    #[schema(example = "kitchen-tools")]
    pub slug: String,
    #[schema(example = "kitchen-tools")]
    pub reference: String,
}

/// Derive a slug from a display name (lowercase, spaces to dashes).
pub fn slugify(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}
