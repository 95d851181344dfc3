//! Client surface: module call stubs over the compiled-request pipeline.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use modgraph_schema::ModuleRegistry;

use crate::{
    args::CallArgs,
    compile::compile_call,
    error::{ClientError, Result, TransportError},
    observe::{CallEvent, CallObserver},
    transport::{HttpRequest, HttpTransport, Transport, WireRequest},
    unwrap::ResponseEnvelope,
};

/// Construction-time wiring for [`GraphQlClient`].
pub struct ClientOptions {
    pub endpoint: String,
    pub registry: ModuleRegistry,
    pub transport: Arc<dyn Transport>,
    pub observer: Option<Arc<dyn CallObserver>>,
}

impl ClientOptions {
    /// Options with the stock HTTP transport and no observer.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, registry: ModuleRegistry) -> Self {
        Self {
            endpoint: endpoint.into(),
            registry,
            transport: Arc::new(HttpTransport::new()),
            observer: None,
        }
    }

    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn CallObserver>) -> Self {
        self.observer = Some(observer);
        self
    }
}

/// Compiles module method calls into GraphQL exchanges.
///
/// Cheap to clone. Holds no mutable state: the registry and transport are
/// read-only behind an `Arc`, everything else is call-scoped, so concurrent
/// calls interleave freely without synchronization.
#[derive(Clone)]
pub struct GraphQlClient {
    inner: Arc<Inner>,
}

struct Inner {
    endpoint: String,
    registry: ModuleRegistry,
    transport: Arc<dyn Transport>,
    observer: Option<Arc<dyn CallObserver>>,
}

impl GraphQlClient {
    #[must_use]
    pub fn new(options: ClientOptions) -> Self {
        Self {
            inner: Arc::new(Inner {
                endpoint: options.endpoint,
                registry: options.registry,
                transport: options.transport,
                observer: options.observer,
            }),
        }
    }

    #[must_use]
    pub fn registry(&self) -> &ModuleRegistry {
        &self.inner.registry
    }

    /// Build a call stub for one module, validated against the registry.
    pub fn module(&self, name: &str) -> Result<ModuleClient> {
        if !self.inner.registry.has_module(name) {
            return Err(ClientError::UnknownModule(name.to_string()));
        }
        Ok(ModuleClient {
            client: self.clone(),
            module: name.to_string(),
        })
    }

    /// Call stubs for every registered module, in registration order.
    #[must_use]
    pub fn modules(&self) -> Vec<ModuleClient> {
        self.inner
            .registry
            .module_names()
            .map(|name| ModuleClient {
                client: self.clone(),
                module: name.to_string(),
            })
            .collect()
    }

    /// Compile and execute one method call, returning the unwrapped value.
    pub async fn call(&self, module: &str, method: &str, args: CallArgs) -> Result<Value> {
        let descriptor = self.inner.registry.method(module, method).ok_or_else(|| {
            ClientError::UnknownMethod {
                module: module.to_string(),
                method: method.to_string(),
            }
        })?;
        self.notify(|| CallEvent::MethodCallStarted {
            module: module.to_string(),
            method: method.to_string(),
        });

        let compiled = compile_call(&self.inner.registry, module, method, descriptor, &args)?;
        debug!(module, method, query = %compiled.query, "compiled call");

        let request = WireRequest {
            query: compiled.query,
            variables: compiled.variables,
        };
        let envelope = self.execute(&request).await?;
        let value = envelope.unwrap_method(module, method)?;

        self.notify(|| CallEvent::CallProcessed {
            module: module.to_string(),
            method: method.to_string(),
            return_value: value.clone(),
        });
        Ok(value)
    }

    /// Serialize and execute one raw wire request, returning the parsed
    /// envelope. Exactly one exchange; transport failures and non-JSON
    /// bodies propagate unmodified.
    pub async fn execute(&self, request: &WireRequest) -> Result<ResponseEnvelope> {
        let body = serde_json::to_string(request).map_err(ClientError::Encode)?;
        self.notify(|| CallEvent::RequestCompiled {
            query: request.query.clone(),
            variables: request.variables.clone(),
            body: body.clone(),
        });

        let bytes = self
            .inner
            .transport
            .send(&self.inner.endpoint, HttpRequest::post(body))
            .await?;
        let parsed: Value = serde_json::from_slice(&bytes).map_err(TransportError::Body)?;
        self.notify(|| CallEvent::ResponseReceived {
            body: parsed.clone(),
        });

        let envelope = serde_json::from_value(parsed).map_err(TransportError::Body)?;
        Ok(envelope)
    }

    fn notify(&self, event: impl FnOnce() -> CallEvent) {
        if let Some(observer) = &self.inner.observer {
            observer.observe(&event());
        }
    }
}

/// Call stub bound to one module name.
#[derive(Clone)]
pub struct ModuleClient {
    client: GraphQlClient,
    module: String,
}

impl ModuleClient {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.module
    }

    /// Invoke one method of this module.
    pub async fn call(&self, method: &str, args: CallArgs) -> Result<Value> {
        self.client.call(&self.module, method, args).await
    }

    /// Invoke one method and decode the unwrapped value into `T`.
    pub async fn call_as<T: DeserializeOwned>(&self, method: &str, args: CallArgs) -> Result<T> {
        let value = self.call(method, args).await?;
        serde_json::from_value(value).map_err(ClientError::Decode)
    }
}
