//! GraphQL request compiler for module/method schemas.
//!
//! Given a [`modgraph_schema`] descriptor for a remote method and a concrete
//! set of call arguments, this crate classifies each argument as an inline
//! literal or a promoted variable, renders the query document and its
//! detached variable set, performs exactly one exchange through an injected
//! [`Transport`], and unwraps the response envelope back into the value the
//! caller expects. The same descriptors drive the server-side schema
//! generator, so the rendering rules here are a cross-component contract.
//!
//! The compiler holds no mutable state across calls: the registry and
//! transport are shared read-only, everything else is call-scoped, and
//! concurrent calls interleave freely. Retry, timeout, and cancellation
//! policy belong to the injected transport.

pub mod args;
pub mod client;
pub mod compile;
pub mod error;
pub mod observe;
pub mod transport;
pub mod unwrap;

pub use {
    args::CallArgs,
    client::{ClientOptions, GraphQlClient, ModuleClient},
    compile::{CompiledRequest, compile_call},
    error::{ClientError, Result, TransportError},
    observe::{CallEvent, CallObserver, TracingObserver},
    transport::{HttpRequest, HttpTransport, Transport, WireRequest},
    unwrap::{RemoteErrorEntry, ResponseEnvelope},
};
