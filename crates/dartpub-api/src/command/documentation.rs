use super::require_package_name;
use crate::client::PubClient;
use crate::error::Result;
use crate::result::PackageDocumentation;
use crate::transport::Transport;
use serde_json::Value;

/// `GET <api>/documentation/<name>`.
#[derive(Debug)]
pub struct DocumentationCommand<'a, T> {
    client: &'a PubClient<T>,
}

impl<'a, T: Transport> DocumentationCommand<'a, T> {
    pub(crate) const fn new(client: &'a PubClient<T>) -> Self {
        Self { client }
    }

    pub async fn execute(&self, package_name: &str) -> Result<Value> {
        require_package_name(package_name)?;
        let url = self.client.cursor().package_documentation_url(package_name);
        self.client.get_json(&url).await
    }

    pub async fn fetch(&self, package_name: &str) -> Result<PackageDocumentation> {
        PackageDocumentation::from_json(&self.execute(package_name).await?)
    }
}
