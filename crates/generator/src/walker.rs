//! Recursively compiles a resource tree into an [`ApiTree`]
//!
//! Methods and nested resources of a node are compiled concurrently; the
//! node completes only once every child has. The first failure fails the
//! whole subtree and the partially built node is dropped.

use crate::method::{compile, ApiMethod, BindingContext};
use crate::transport::Transport;
use crate::tree::ApiTree;
use discovery_client_common::Result;
use discovery_client_parser::{MethodDescriptor, ResourceDescriptor, RestDescription};
use futures::future::{try_join_all, BoxFuture};
use futures::FutureExt;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Compile a whole API rooted at its own base URL
pub async fn compile_api(
    transport: &Arc<dyn Transport>,
    api_key: Option<&str>,
    api: &RestDescription,
) -> Result<ApiTree> {
    let base_url = api.resolved_base_url().unwrap_or_else(|| {
        warn!(api = %api.display_name(), "No baseUrl or rootUrl declared, binding an empty base URL");
        String::new()
    });

    let context = BindingContext {
        api_key: api_key.map(str::to_string),
        base_url,
        transport: Arc::clone(transport),
    };

    let tree = walk(&context, &api.root).await?;
    debug!(
        api = %api.display_name(),
        methods = tree.method_count(),
        "Compiled API"
    );
    Ok(tree)
}

/// Compile one resource and everything beneath it
pub fn walk<'a>(
    context: &'a BindingContext,
    resource: &'a ResourceDescriptor,
) -> BoxFuture<'a, Result<ApiTree>> {
    async move {
        let (methods, resources) = futures::try_join!(
            compile_methods(context, &resource.methods),
            walk_resources(context, &resource.resources),
        )?;
        Ok(ApiTree::from_parts(methods, resources))
    }
    .boxed()
}

async fn compile_methods(
    context: &BindingContext,
    methods: &BTreeMap<String, MethodDescriptor>,
) -> Result<BTreeMap<String, ApiMethod>> {
    let compiled = try_join_all(methods.iter().map(|(name, descriptor)| async move {
        compile(name, descriptor, context).map(|method| (name.clone(), method))
    }))
    .await?;

    Ok(compiled.into_iter().collect())
}

async fn walk_resources(
    context: &BindingContext,
    resources: &BTreeMap<String, ResourceDescriptor>,
) -> Result<BTreeMap<String, ApiTree>> {
    let walked = try_join_all(resources.iter().map(|(name, resource)| async move {
        walk(context, resource)
            .await
            .map(|tree| (name.clone(), tree))
    }))
    .await?;

    Ok(walked.into_iter().collect())
}
