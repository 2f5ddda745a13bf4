//! Compiles a method descriptor into a callable HTTP operation

use crate::transport::Transport;
use discovery_client_common::{CallError, GenerateError, Result};
use discovery_client_parser::MethodDescriptor;
use reqwest::Method;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Per-API state shared by every method compiled under that API
#[derive(Clone)]
pub struct BindingContext {
    pub api_key: Option<String>,
    pub base_url: String,
    pub transport: Arc<dyn Transport>,
}

impl fmt::Debug for BindingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingContext")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// The fixed data one compiled method closes over
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub api_key: Option<String>,
    pub base_url: String,
    pub http_method: Method,
    pub path: String,
}

/// Arguments for one call, in the order they were supplied
///
/// Keys matching a `{placeholder}` in the method path are substituted into
/// it; every other key becomes a query parameter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs(Vec<(String, Value)>);

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.push((key.into(), value.into()));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for CallArgs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<serde_json::Map<String, Value>> for CallArgs {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        map.into_iter().collect()
    }
}

/// A generated API method
///
/// Cloning is cheap; clones share the transport.
#[derive(Clone)]
pub struct ApiMethod {
    label: String,
    binding: Binding,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for ApiMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiMethod")
            .field("label", &self.label)
            .field("http_method", &self.binding.http_method)
            .field("base_url", &self.binding.base_url)
            .field("path", &self.binding.path)
            .finish_non_exhaustive()
    }
}

/// Compile one method descriptor under `context`
pub fn compile(
    name: &str,
    descriptor: &MethodDescriptor,
    context: &BindingContext,
) -> Result<ApiMethod> {
    let malformed = |reason: String| GenerateError::MalformedMethod {
        method: name.to_string(),
        reason,
    };

    let verb = descriptor
        .http_method
        .as_deref()
        .ok_or_else(|| malformed("missing httpMethod".to_string()))?;
    let http_method = Method::from_bytes(verb.to_ascii_uppercase().as_bytes())
        .map_err(|_| malformed(format!("invalid HTTP method '{}'", verb)))?;
    let path = descriptor
        .path
        .clone()
        .ok_or_else(|| malformed("missing path".to_string()))?;

    let method = ApiMethod {
        label: method_label(name),
        binding: Binding {
            api_key: context.api_key.clone(),
            base_url: context.base_url.clone(),
            http_method,
            path,
        },
        transport: Arc::clone(&context.transport),
    };
    debug!(label = %method.label, http_method = %method.binding.http_method, path = %method.binding.path, "Compiled method");

    Ok(method)
}

/// Diagnostic label for a method: `$` followed by its word characters
pub fn method_label(name: &str) -> String {
    let safe: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    format!("${}", safe)
}

impl ApiMethod {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn http_method(&self) -> &Method {
        &self.binding.http_method
    }

    pub fn path(&self) -> &str {
        &self.binding.path
    }

    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    /// URL this method would request for `args`
    ///
    /// The `?` is always present, even when no query parameter is produced.
    /// Placeholders with no matching argument are left in the path as-is.
    pub fn request_url(&self, args: &CallArgs) -> String {
        let mut path = self.binding.path.clone();
        let mut search = Vec::with_capacity(args.len() + 1);

        if let Some(key) = &self.binding.api_key {
            search.push(format!("key={}", key));
        }

        for (name, value) in args.iter() {
            let token = format!("{{{}}}", name);
            // Stricter than encodeURIComponent: `!'()*` are escaped too
            let value = urlencoding::encode(&query_value(value)).into_owned();
            if path.contains(&token) {
                path = path.replacen(&token, &value, 1);
            } else {
                search.push(format!("{}={}", name, value));
            }
        }

        format!("{}{}?{}", self.binding.base_url, path, search.join("&"))
    }

    /// Invoke the method and return the parsed JSON response body
    pub async fn call(&self, args: &CallArgs) -> std::result::Result<Value, CallError> {
        self.call_with_body(args, None).await
    }

    /// Invoke the method with an optional JSON request body
    pub async fn call_with_body(
        &self,
        args: &CallArgs,
        body: Option<Value>,
    ) -> std::result::Result<Value, CallError> {
        let url = self.request_url(args);
        debug!(label = %self.label, http_method = %self.binding.http_method, %url, "Calling method");

        let response = self
            .transport
            .send(self.binding.http_method.clone(), &url, body)
            .await
            .map_err(|e| CallError::Transport {
                url: url.clone(),
                message: e.to_string(),
            })?;

        match response {
            None => Ok(Value::Null),
            Some(text) => serde_json::from_str(&text).map_err(|e| CallError::Decode { url, source: e }),
        }
    }
}

/// Render an argument value the way it appears in a URL, before escaping
fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(query_value).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{MockTransport, TransportError};
    use serde_json::json;

    fn context(api_key: Option<&str>, transport: MockTransport) -> BindingContext {
        BindingContext {
            api_key: api_key.map(str::to_string),
            base_url: "https://api.x/v1".to_string(),
            transport: Arc::new(transport),
        }
    }

    fn descriptor(http_method: &str, path: &str) -> MethodDescriptor {
        MethodDescriptor {
            http_method: Some(http_method.to_string()),
            path: Some(path.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_placeholder_substitution() {
        let ctx = context(None, MockTransport::new());
        let method = compile("get", &descriptor("GET", "/people/{id}"), &ctx).unwrap();

        let url = method.request_url(&CallArgs::new().with("id", "abc"));
        assert_eq!(url, "https://api.x/v1/people/abc?");
        assert!(!url.contains("id=abc"));
    }

    #[test]
    fn test_unmatched_args_become_query() {
        let ctx = context(None, MockTransport::new());
        let method = compile("list", &descriptor("GET", "/items"), &ctx).unwrap();

        let url = method.request_url(&CallArgs::new().with("max", 5).with("q", "a b"));
        assert_eq!(url, "https://api.x/v1/items?max=5&q=a%20b");
    }

    #[test]
    fn test_api_key_always_first() {
        let ctx = context(Some("secret"), MockTransport::new());
        let method = compile("get", &descriptor("GET", "/people/{id}"), &ctx).unwrap();

        assert_eq!(
            method.request_url(&CallArgs::new()),
            "https://api.x/v1/people/{id}?key=secret"
        );
        assert_eq!(
            method.request_url(&CallArgs::new().with("id", "me").with("fields", "name")),
            "https://api.x/v1/people/me?key=secret&fields=name"
        );
        // "key" is not a placeholder for the configured API key
        assert_eq!(
            method.request_url(&CallArgs::new().with("key", "other")),
            "https://api.x/v1/people/{id}?key=secret&key=other"
        );
    }

    #[test]
    fn test_only_first_occurrence_replaced() {
        let ctx = context(None, MockTransport::new());
        let method = compile("m", &descriptor("GET", "/{a}/{a}"), &ctx).unwrap();
        assert_eq!(
            method.request_url(&CallArgs::new().with("a", "x/y")),
            "https://api.x/v1/x%2Fy/{a}?"
        );
    }

    #[test]
    fn test_value_rendering() {
        assert_eq!(query_value(&json!("s")), "s");
        assert_eq!(query_value(&json!(true)), "true");
        assert_eq!(query_value(&json!(1.5)), "1.5");
        assert_eq!(query_value(&json!(null)), "null");
        assert_eq!(query_value(&json!(["a", 2])), "a,2");
        assert_eq!(query_value(&json!({"k": 1})), r#"{"k":1}"#);
    }

    #[test]
    fn test_method_label() {
        assert_eq!(method_label("delete"), "$delete");
        assert_eq!(method_label("list-all.v2"), "$listallv2");
        assert_eq!(method_label("get_one"), "$get_one");
    }

    #[test]
    fn test_malformed_descriptors() {
        let ctx = context(None, MockTransport::new());

        let missing_verb = MethodDescriptor {
            path: Some("/x".to_string()),
            ..Default::default()
        };
        let err = compile("broken", &missing_verb, &ctx).unwrap_err();
        assert!(matches!(
            err,
            GenerateError::MalformedMethod { ref method, .. } if method == "broken"
        ));

        let missing_path = MethodDescriptor {
            http_method: Some("GET".to_string()),
            ..Default::default()
        };
        assert!(compile("broken", &missing_path, &ctx).is_err());

        assert!(compile("broken", &descriptor("GE T", "/x"), &ctx).is_err());
    }

    #[test]
    fn test_lowercase_verb_is_normalized() {
        let ctx = context(None, MockTransport::new());
        let method = compile("patch", &descriptor("patch", "/x"), &ctx).unwrap();
        assert_eq!(method.http_method(), &Method::PATCH);
    }

    #[tokio::test]
    async fn test_call_issues_request() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|method, url, body| {
                *method == Method::GET && url == "https://api.x/v1/items?max=5" && body.is_none()
            })
            .times(1)
            .returning(|_, _, _| Ok(Some(r#"{"items": [1, 2]}"#.to_string())));

        let ctx = context(None, transport);
        let method = compile("list", &descriptor("GET", "/items"), &ctx).unwrap();
        let response = method.call(&CallArgs::new().with("max", 5)).await.unwrap();
        assert_eq!(response, json!({"items": [1, 2]}));
    }

    #[tokio::test]
    async fn test_call_with_body() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|method, _, body| {
                *method == Method::POST && body.as_ref() == Some(&json!({"name": "b"}))
            })
            .returning(|_, _, _| Ok(None));

        let ctx = context(None, transport);
        let method = compile("insert", &descriptor("POST", "/b"), &ctx).unwrap();
        let response = method
            .call_with_body(&CallArgs::new(), Some(json!({"name": "b"})))
            .await
            .unwrap();
        assert_eq!(response, Value::Null);
    }

    #[tokio::test]
    async fn test_call_errors_stay_with_the_call() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .returning(|_, _, _| Err(TransportError("timed out".to_string())));

        let ctx = context(None, transport);
        let method = compile("list", &descriptor("GET", "/items"), &ctx).unwrap();
        match method.call(&CallArgs::new()).await {
            Err(CallError::Transport { url, message }) => {
                assert_eq!(url, "https://api.x/v1/items?");
                assert_eq!(message, "timed out");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_response_is_decode_error() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .returning(|_, _, _| Ok(Some("Service Unavailable".to_string())));

        let ctx = context(None, transport);
        let method = compile("list", &descriptor("GET", "/items"), &ctx).unwrap();
        assert!(matches!(
            method.call(&CallArgs::new()).await,
            Err(CallError::Decode { .. })
        ));
    }
}
