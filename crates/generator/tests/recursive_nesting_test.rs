//! Integration test for compiling deeply nested resource trees
//!
//! Builds descriptors programmatically and checks that the compiled tree
//! has exactly the same names and nesting as its source.

use async_trait::async_trait;
use discovery_client_generator::{walk, ApiTree, BindingContext, Transport, TransportError};
use discovery_client_parser::{MethodDescriptor, ResourceDescriptor};
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;

struct UnreachableTransport;

#[async_trait]
impl Transport for UnreachableTransport {
    async fn send(
        &self,
        _method: Method,
        url: &str,
        _body: Option<Value>,
    ) -> Result<Option<String>, TransportError> {
        Err(TransportError(format!("unexpected request to {}", url)))
    }
}

fn method(path: &str) -> MethodDescriptor {
    MethodDescriptor {
        http_method: Some("GET".to_string()),
        path: Some(path.to_string()),
        ..Default::default()
    }
}

/// A resource with `width` methods and `width` children, `depth` levels deep
fn build(depth: usize, width: usize, prefix: &str) -> ResourceDescriptor {
    let mut resource = ResourceDescriptor::default();
    for i in 0..width {
        resource
            .methods
            .insert(format!("m{}", i), method(&format!("{}/m{}", prefix, i)));
    }
    if depth > 0 {
        for i in 0..width {
            let child_prefix = format!("{}/r{}", prefix, i);
            resource
                .resources
                .insert(format!("r{}", i), build(depth - 1, width, &child_prefix));
        }
    }
    resource
}

fn assert_same_shape(tree: &ApiTree, descriptor: &ResourceDescriptor) {
    let tree_methods: Vec<&str> = tree.methods().map(|(name, _)| name).collect();
    let source_methods: Vec<&str> = descriptor.methods.keys().map(String::as_str).collect();
    assert_eq!(tree_methods, source_methods);

    for (name, compiled) in tree.methods() {
        assert_eq!(Some(compiled.path()), descriptor.methods[name].path.as_deref());
    }

    let tree_resources: Vec<&str> = tree.resources().map(|(name, _)| name).collect();
    let source_resources: Vec<&str> = descriptor.resources.keys().map(String::as_str).collect();
    assert_eq!(tree_resources, source_resources);

    for (name, child) in tree.resources() {
        assert_same_shape(child, &descriptor.resources[name]);
    }
}

fn context() -> BindingContext {
    BindingContext {
        api_key: None,
        base_url: "https://deep.example".to_string(),
        transport: Arc::new(UnreachableTransport),
    }
}

#[tokio::test]
async fn test_shape_is_preserved_at_every_depth() {
    for depth in 0..5 {
        let descriptor = build(depth, 2, "");
        let tree = walk(&context(), &descriptor).await.unwrap();

        assert_same_shape(&tree, &descriptor);
        assert_eq!(tree.method_count(), descriptor.method_count());
    }
}

#[tokio::test]
async fn test_deep_chain() {
    let descriptor = build(24, 1, "");
    let tree = walk(&context(), &descriptor).await.unwrap();

    let deepest = std::iter::repeat("r0").take(24).collect::<Vec<_>>().join(".");
    let leaf = tree.lookup(&format!("{}.m0", deepest)).unwrap();
    assert_eq!(leaf.binding().base_url, "https://deep.example");
    assert_eq!(leaf.path(), format!("{}/m0", "/r0".repeat(24)));
}

#[tokio::test]
async fn test_failure_at_the_bottom_discards_everything() {
    let mut descriptor = build(3, 2, "");

    let mut node = &mut descriptor;
    for _ in 0..3 {
        node = node.resources.get_mut("r1").unwrap();
    }
    node.methods.insert(
        "broken".to_string(),
        MethodDescriptor {
            http_method: Some("NOT A VERB".to_string()),
            path: Some("/x".to_string()),
            ..Default::default()
        },
    );

    assert!(walk(&context(), &descriptor).await.is_err());
}
