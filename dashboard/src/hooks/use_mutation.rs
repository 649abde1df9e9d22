use std::marker::PhantomData;
use std::sync::Arc;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::watch;

use crate::cache::CacheKey;
use crate::{DataContext, MutationError, Severity};

/// One HTTP write.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

impl WriteRequest {
    pub fn post(
        path: impl Into<String>,
        body: &impl Serialize,
    ) -> Result<Self, MutationError> {
        Ok(Self {
            method: Method::POST,
            path: path.into(),
            body: Some(to_body(body)?),
        })
    }

    pub fn put(
        path: impl Into<String>,
        body: &impl Serialize,
    ) -> Result<Self, MutationError> {
        Ok(Self {
            method: Method::PUT,
            path: path.into(),
            body: Some(to_body(body)?),
        })
    }

    /// A PUT with no body, for actions like cancel and checkout.
    pub fn put_empty(path: impl Into<String>) -> Self {
        Self {
            method: Method::PUT,
            path: path.into(),
            body: None,
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::DELETE,
            path: path.into(),
            body: None,
        }
    }
}

fn to_body(body: &impl Serialize) -> Result<Value, MutationError> {
    serde_json::to_value(body).map_err(|e| MutationError::InvalidInput(e.to_string()))
}

type RequestFn<I> =
    Box<dyn Fn(&I) -> Result<WriteRequest, MutationError> + Send + Sync>;
type InvalidatesFn<I> = Box<dyn Fn(&I) -> Vec<CacheKey> + Send + Sync>;

/// Declarative description of a write: how to build the request from the
/// caller's input and which keys the write makes stale.
///
/// ```ignore
/// MutationDef::new("cancel booking", |id: &BookingId| {
///     Ok(WriteRequest::put_empty(BOOKING.action_path(CANCEL, id.as_str())))
/// })
/// .invalidates(|id| vec![list_key(), detail_key(id)].into_iter().flatten().collect())
/// .messages("Booking cancelled", "Could not cancel booking")
/// ```
pub struct MutationDef<I, O> {
    name: String,
    request: RequestFn<I>,
    invalidates: InvalidatesFn<I>,
    success_message: String,
    failure_message: String,
    _output: PhantomData<fn() -> O>,
}

impl<I, O> MutationDef<I, O> {
    pub fn new(
        name: impl Into<String>,
        request: impl Fn(&I) -> Result<WriteRequest, MutationError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        let name = name.into();
        Self {
            request: Box::new(request),
            invalidates: Box::new(|_: &I| Vec::new()),
            success_message: format!("{name} succeeded"),
            failure_message: format!("{name} failed"),
            name,
            _output: PhantomData,
        }
    }

    pub fn invalidates(
        self,
        keys: impl Fn(&I) -> Vec<CacheKey> + Send + Sync + 'static,
    ) -> Self {
        Self {
            invalidates: Box::new(keys),
            ..self
        }
    }

    /// Add keys on top of the ones already declared.
    pub fn also_invalidates(
        self,
        extra: impl Fn(&I) -> Vec<CacheKey> + Send + Sync + 'static,
    ) -> Self
    where
        I: 'static,
    {
        let declared = self.invalidates;
        Self {
            invalidates: Box::new(move |input: &I| {
                let mut keys = declared(input);
                keys.extend(extra(input));
                keys
            }),
            ..self
        }
    }

    pub fn messages(
        self,
        success: impl Into<String>,
        failure: impl Into<String>,
    ) -> Self {
        Self {
            success_message: success.into(),
            failure_message: failure.into(),
            ..self
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The request this definition would send for `input`.
    pub fn request_for(&self, input: &I) -> Result<WriteRequest, MutationError> {
        (self.request)(input)
    }

    /// The keys a successful write with `input` invalidates.
    pub fn keys_for(&self, input: &I) -> Vec<CacheKey> {
        (self.invalidates)(input)
    }
}

/// Local state of one mutation hook.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MutationState {
    pub is_in_flight: bool,
    pub error: Option<MutationError>,
}

/// A mounted mutation. Clones share state.
pub struct MutationHook<I, O> {
    ctx: DataContext,
    def: Arc<MutationDef<I, O>>,
    state: Arc<watch::Sender<MutationState>>,
}

impl<I, O> Clone for MutationHook<I, O> {
    fn clone(&self) -> Self {
        Self {
            ctx: self.ctx.clone(),
            def: Arc::clone(&self.def),
            state: Arc::clone(&self.state),
        }
    }
}

pub fn use_mutation<I, O>(ctx: &DataContext, def: MutationDef<I, O>) -> MutationHook<I, O> {
    MutationHook {
        ctx: ctx.clone(),
        def: Arc::new(def),
        state: Arc::new(watch::channel(MutationState::default()).0),
    }
}

impl<I, O: DeserializeOwned> MutationHook<I, O> {
    /// Send the write, then invalidate the declared keys and resolve with
    /// the server's response.
    ///
    /// Invalidations only start once the write succeeded and have all
    /// settled by the time this resolves. A failed write invalidates
    /// nothing.
    pub async fn trigger(&self, input: I) -> Result<O, MutationError> {
        let def = &self.def;
        let request = match def.request_for(&input) {
            Ok(request) => request,
            Err(error) => return Err(self.fail(error)),
        };

        self.state.send_replace(MutationState {
            is_in_flight: true,
            error: None,
        });
        tracing::debug!(
            mutation = def.name(),
            method = %request.method,
            path = %request.path,
            "sending write"
        );

        let response = self
            .ctx
            .cache()
            .client()
            .write_json(request.method, &request.path, request.body.as_ref())
            .await;
        let body = match response {
            Ok(body) => body,
            Err(error) => return Err(self.fail(error.into())),
        };

        let keys = def.keys_for(&input);
        self.ctx.cache().invalidate_all(&keys).await;

        let output = O::deserialize(&body)
            .map_err(|e| self.fail(MutationError::Decode(e.to_string())))?;

        tracing::info!(
            mutation = def.name(),
            invalidated = keys.len(),
            "write succeeded"
        );
        self.state.send_replace(MutationState::default());
        self.ctx
            .notifier()
            .notify(&def.success_message, Severity::Success);
        Ok(output)
    }

    fn fail(&self, error: MutationError) -> MutationError {
        tracing::error!(mutation = self.def.name(), %error, "write failed");
        self.state.send_replace(MutationState {
            is_in_flight: false,
            error: Some(error.clone()),
        });
        self.ctx.notifier().notify(
            &format!("{}: {error}", self.def.failure_message),
            Severity::Error,
        );
        error
    }

    pub fn state(&self) -> MutationState {
        self.state.borrow().clone()
    }
}
