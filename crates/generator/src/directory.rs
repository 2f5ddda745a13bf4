//! Expands a discovery service document into compiled APIs

use crate::fetcher::Fetcher;
use crate::tree::{ApiDirectory, ApiTree};
use crate::walker::compile_api;
use discovery_client_common::{DocumentSource, GenerateError, Result};
use discovery_client_parser::{DiscoveryParser, ServiceDirectory};
use futures::future::try_join_all;
use tracing::{debug, warn};

/// Fetch and compile every preferred API listed in `directory`
///
/// Entries that are not preferred, or have no `discoveryRestUrl`, are
/// skipped. All remaining APIs are fetched concurrently and the first
/// failure fails the whole expansion.
pub async fn expand(
    fetcher: &Fetcher,
    api_key: Option<&str>,
    directory: &ServiceDirectory,
    source_id: &str,
) -> Result<ApiDirectory> {
    let items = directory
        .items
        .as_ref()
        .ok_or_else(|| GenerateError::MissingItems {
            source_id: source_id.to_string(),
        })?;

    let expansions = items
        .iter()
        .filter_map(|entry| match entry.expandable_url() {
            Some(url) => Some((entry.name.as_str(), url)),
            None => {
                if entry.preferred == Some(true) {
                    warn!(api = %entry.name, "Preferred API has no discoveryRestUrl, skipping");
                } else {
                    debug!(api = %entry.name, "Skipping non-preferred API");
                }
                None
            }
        })
        .map(|(name, url)| async move {
            let tree = expand_entry(fetcher, api_key, url).await?;
            Ok::<_, GenerateError>((name.to_string(), tree))
        });

    let apis = try_join_all(expansions).await?;
    Ok(apis.into_iter().collect())
}

async fn expand_entry(fetcher: &Fetcher, api_key: Option<&str>, url: &str) -> Result<ApiTree> {
    let doc = fetcher.fetch(&DocumentSource::Url(url.to_string())).await?;
    let api = DiscoveryParser::from_value(doc, url).into_rest()?;
    compile_api(fetcher.transport(), api_key, &api).await
}
