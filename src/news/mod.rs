//! News model and the generative news gateway.

mod article;
mod category;
pub mod gemini;

pub use article::Article;
#[cfg(test)]
pub(crate) use article::test_article;
pub use category::{Category, CATEGORIES, SAVED_CATEGORY_ID};
pub use gemini::{GatewayError, GeminiClient};
