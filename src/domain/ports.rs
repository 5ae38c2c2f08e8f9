use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// External text generation used only for cosmetic text.
///
/// Callers never branch on availability: an offline implementation that
/// always fails stands in when no credential is configured, and the caller
/// resolves every failure to a local template.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_congratulation(&self, name: &str, style_hint: &str) -> Result<String>;
    async fn generate_team_names(&self, count: usize, theme: &str) -> Result<Vec<String>>;
}
