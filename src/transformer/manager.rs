use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, error, field, info_span, Instrument, Span};

use super::Transformer;
use crate::error::{BridgeError, BridgeResult};
use crate::qtum::{NodeClient, RawReply, TranslatedCall};

/// Everything the response phase needs from the request phase.
pub struct RequestContext {
    method: &'static str,
    span: Span,
    state: Box<dyn Any + Send>,
}

impl RequestContext {
    /// Ethereum method this context belongs to.
    pub fn method(&self) -> &'static str {
        self.method
    }

    /// Span correlating the request and response phases.
    pub fn span(&self) -> &Span {
        &self.span
    }
}

/// Output of the request phase: the call to make and the context to finish it.
pub struct PreparedCall {
    pub call: TranslatedCall,
    pub context: RequestContext,
}

/// Object-safe form of [`Transformer`] so differently typed transformers can
/// share one registry.
#[async_trait]
trait DynTransformer: Send + Sync {
    async fn prepare(
        &self,
        params: Value,
        node: &dyn NodeClient,
    ) -> BridgeResult<(TranslatedCall, Box<dyn Any + Send>)>;

    fn finish(&self, state: Box<dyn Any + Send>, reply: RawReply) -> BridgeResult<Value>;
}

#[async_trait]
impl<T: Transformer> DynTransformer for T {
    async fn prepare(
        &self,
        params: Value,
        node: &dyn NodeClient,
    ) -> BridgeResult<(TranslatedCall, Box<dyn Any + Send>)> {
        let params: T::Params = serde_json::from_value(params).map_err(|e| {
            BridgeError::invalid_params(format!("invalid params for {}: {}", T::METHOD, e))
        })?;
        let (call, state) = Transformer::prepare(self, params, node).await?;
        Ok((call, Box::new(state)))
    }

    fn finish(&self, state: Box<dyn Any + Send>, reply: RawReply) -> BridgeResult<Value> {
        let state = state.downcast::<T::State>().map_err(|_| {
            BridgeError::protocol(format!("request context does not belong to {}", T::METHOD))
        })?;
        let response = Transformer::finish(self, *state, reply)?;
        serde_json::to_value(response)
            .map_err(|e| BridgeError::protocol(format!("cannot encode {} result: {}", T::METHOD, e)))
    }
}

/// Registry from Ethereum method name to transformer, plus the node the
/// translated calls go to.
pub struct Manager {
    node: Arc<dyn NodeClient>,
    transformers: BTreeMap<&'static str, Box<dyn DynTransformer>>,
}

impl Manager {
    pub fn new(node: Arc<dyn NodeClient>) -> Self {
        Self {
            node,
            transformers: BTreeMap::new(),
        }
    }

    /// Add a transformer, replacing any previous one for the same method.
    pub fn register<T: Transformer>(mut self, transformer: T) -> Self {
        self.transformers.insert(T::METHOD, Box::new(transformer));
        self
    }

    /// Registered Ethereum method names.
    pub fn methods(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.transformers.keys().copied()
    }

    /// Request phase: look up the transformer and translate `params`.
    pub async fn dispatch(&self, method: &str, params: Value) -> BridgeResult<PreparedCall> {
        let (&method, transformer) = self
            .transformers
            .get_key_value(method)
            .ok_or_else(|| BridgeError::MethodNotSupported(method.to_string()))?;

        let span = info_span!("transform", method, node_method = field::Empty);
        let (call, state) = transformer
            .prepare(params, self.node.as_ref())
            .instrument(span.clone())
            .await
            .map_err(|e| span.in_scope(|| log_failure(method, "request", e)))?;
        span.record("node_method", call.method);

        span.in_scope(|| debug!("translated {} -> {}", method, call.method));

        Ok(PreparedCall {
            call,
            context: RequestContext { method, span, state },
        })
    }

    /// Response phase: shape the node's reply for the caller.
    pub fn finish(&self, context: RequestContext, reply: RawReply) -> BridgeResult<Value> {
        let RequestContext { method, span, state } = context;
        let _entered = span.enter();

        let transformer = self
            .transformers
            .get(method)
            .ok_or_else(|| BridgeError::MethodNotSupported(method.to_string()))?;

        let result = transformer
            .finish(state, reply)
            .map_err(|e| log_failure(method, "response", e))?;
        debug!("{} done", method);
        Ok(result)
    }

    /// Execute a prepared call against the node.
    pub async fn execute(&self, call: &TranslatedCall) -> BridgeResult<RawReply> {
        Ok(self.node.send(call.method, call.params.clone()).await?)
    }

    /// Full pipeline: dispatch, call the node, finish.
    pub async fn handle(&self, method: &str, params: Value) -> BridgeResult<Value> {
        let PreparedCall { call, context } = self.dispatch(method, params).await?;
        let reply = self
            .execute(&call)
            .instrument(context.span().clone())
            .await
            .map_err(|e| {
                context
                    .span()
                    .in_scope(|| log_failure(context.method(), "node call", e))
            })?;
        self.finish(context, reply)
    }
}

/// Log a failed phase in the current span; protocol violations at error level.
fn log_failure(method: &str, phase: &str, err: BridgeError) -> BridgeError {
    match &err {
        BridgeError::Protocol(message) => {
            error!("{} ({}): node reply violates protocol: {}", method, phase, message)
        }
        other => debug!("{} ({}) failed: {}", method, phase, other),
    }
    err
}
