pub mod vision;

use async_trait::async_trait;
use crate::core::Label;
use crate::error::Result;

pub use vision::VisionProvider;

/// Trait for image-labeling services
#[async_trait]
pub trait LabelProvider: Send + Sync {
    /// Fail fast when the provider cannot be called at all (e.g. no credentials)
    fn check_configured(&self) -> Result<()> {
        Ok(())
    }

    /// Labels for a base64-encoded image, in the service's ranking order
    async fn detect_labels(&self, image_base64: &str) -> Result<Vec<Label>>;

    /// Get provider name
    fn name(&self) -> &str;
}
