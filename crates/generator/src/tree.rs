//! Compiled API trees and directories

use crate::method::ApiMethod;
use std::collections::BTreeMap;

/// A compiled resource: methods and nested resources under their
/// discovery-document names
#[derive(Debug, Clone, Default)]
pub struct ApiTree {
    methods: BTreeMap<String, ApiMethod>,
    resources: BTreeMap<String, ApiTree>,
}

impl ApiTree {
    pub(crate) fn from_parts(
        methods: BTreeMap<String, ApiMethod>,
        resources: BTreeMap<String, ApiTree>,
    ) -> Self {
        Self { methods, resources }
    }

    pub fn method(&self, name: &str) -> Option<&ApiMethod> {
        self.methods.get(name)
    }

    pub fn resource(&self, name: &str) -> Option<&ApiTree> {
        self.resources.get(name)
    }

    pub fn methods(&self) -> impl Iterator<Item = (&str, &ApiMethod)> {
        self.methods.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn resources(&self) -> impl Iterator<Item = (&str, &ApiTree)> {
        self.resources.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty() && self.resources.is_empty()
    }

    /// Find a method by dotted path, e.g. `"people.search"`
    pub fn lookup(&self, path: &str) -> Option<&ApiMethod> {
        match path.rsplit_once('.') {
            None => self.method(path),
            Some((resources, method)) => {
                let mut node = self;
                for name in resources.split('.') {
                    node = node.resource(name)?;
                }
                node.method(method)
            }
        }
    }

    /// Dotted paths of every method in this tree, sorted
    pub fn method_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        self.collect_paths("", &mut paths);
        paths.sort();
        paths
    }

    pub fn method_count(&self) -> usize {
        self.methods.len()
            + self
                .resources
                .values()
                .map(ApiTree::method_count)
                .sum::<usize>()
    }

    fn collect_paths(&self, prefix: &str, paths: &mut Vec<String>) {
        for name in self.methods.keys() {
            paths.push(format!("{}{}", prefix, name));
        }
        for (name, resource) in &self.resources {
            resource.collect_paths(&format!("{}{}.", prefix, name), paths);
        }
    }
}

/// Compiled APIs of a discovery service document, keyed by API name
#[derive(Debug, Clone, Default)]
pub struct ApiDirectory {
    apis: BTreeMap<String, ApiTree>,
}

impl FromIterator<(String, ApiTree)> for ApiDirectory {
    fn from_iter<I: IntoIterator<Item = (String, ApiTree)>>(iter: I) -> Self {
        Self {
            apis: iter.into_iter().collect(),
        }
    }
}

impl ApiDirectory {
    pub fn get(&self, name: &str) -> Option<&ApiTree> {
        self.apis.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.apis.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ApiTree)> {
        self.apis.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.apis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apis.is_empty()
    }

    /// Find a method by `api.resource...method`
    pub fn lookup(&self, path: &str) -> Option<&ApiMethod> {
        let (api, rest) = path.split_once('.')?;
        self.get(api)?.lookup(rest)
    }
}

/// Result of a generation run
#[derive(Debug, Clone)]
pub enum GeneratedApi {
    /// A single API's compiled tree
    Api(ApiTree),
    /// Every preferred API of a discovery service document
    Directory(ApiDirectory),
}

impl GeneratedApi {
    /// Find a method by dotted path; directories take the API name first
    pub fn lookup(&self, path: &str) -> Option<&ApiMethod> {
        match self {
            GeneratedApi::Api(tree) => tree.lookup(path),
            GeneratedApi::Directory(directory) => directory.lookup(path),
        }
    }

    pub fn as_api(&self) -> Option<&ApiTree> {
        match self {
            GeneratedApi::Api(tree) => Some(tree),
            GeneratedApi::Directory(_) => None,
        }
    }

    pub fn as_directory(&self) -> Option<&ApiDirectory> {
        match self {
            GeneratedApi::Directory(directory) => Some(directory),
            GeneratedApi::Api(_) => None,
        }
    }

    pub fn into_api(self) -> Option<ApiTree> {
        match self {
            GeneratedApi::Api(tree) => Some(tree),
            GeneratedApi::Directory(_) => None,
        }
    }

    pub fn into_directory(self) -> Option<ApiDirectory> {
        match self {
            GeneratedApi::Directory(directory) => Some(directory),
            GeneratedApi::Api(_) => None,
        }
    }
}
