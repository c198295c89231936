use crate::BoxError;
use crate::extract::{Arguments, FromArgs};
use crate::fn_trait::{FnTrait, SyncFnTrait};
use crate::reply::{IntoReply, Reply};
use async_trait::async_trait;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use uniweb_route::{ArgType, ReturnKind, Signature};

/// A routable handler: its signature plus a uniform way to invoke it.
///
/// Implementations built with [`handler_fn`] or [`sync_handler_fn`] derive the signature
/// from the function's argument and return types. Implementing the trait by hand is the way
/// to describe a handler with an explicit [`Signature`].
#[async_trait]
pub trait RouteHandler: Send + Sync + fmt::Debug {
    fn signature(&self) -> &Signature;

    async fn invoke(&self, args: Arguments) -> Result<Reply, BoxError>;
}

pub type BoxedHandler = Arc<dyn RouteHandler>;

/// Builds the signature of a typed handler.
///
/// `names` are given in order to the arguments that can be bound from the path; request and
/// response arguments are skipped. Arguments left without a name can't be captured.
fn typed_signature(arg_types: Vec<ArgType>, returns: ReturnKind, names: &[String]) -> Signature {
    let mut names = names.iter();
    arg_types.into_iter().fold(Signature::new(returns), |signature, ty| {
        let name = if ty.is_context() { "" } else { names.next().map_or("", String::as_str) };
        signature.arg(name, ty)
    })
}

/// a `FnTrait` holder which represents any async Fn
pub struct FnHandler<F, Args> {
    f: F,
    signature: Signature,
    _phantom: PhantomData<fn(Args)>,
}

impl<F, Args> FnHandler<F, Args>
where
    F: FnTrait<Args>,
    F::Output: IntoReply,
    Args: FromArgs,
{
    fn new(f: F) -> Self {
        let signature = typed_signature(Args::arg_types(), F::Output::return_kind(), &[]);
        Self { f, signature, _phantom: PhantomData }
    }

    /// Names the path-bindable arguments, in order.
    pub fn named<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names = names.into_iter().map(Into::into).collect::<Vec<_>>();
        self.signature = typed_signature(Args::arg_types(), F::Output::return_kind(), &names);
        self
    }
}

impl<F, Args> fmt::Debug for FnHandler<F, Args> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHandler").field("signature", &self.signature).finish_non_exhaustive()
    }
}

/// Wraps an async function as a [`RouteHandler`].
///
/// # Example
/// ```
/// use uniweb::handler_fn;
///
/// async fn number(number: i32) -> String {
///     format!("number: {number}")
/// }
///
/// let handler = handler_fn(number).named(["number"]);
/// # let _ = handler;
/// ```
pub fn handler_fn<F, Args>(f: F) -> FnHandler<F, Args>
where
    F: FnTrait<Args>,
    F::Output: IntoReply,
    Args: FromArgs,
{
    FnHandler::new(f)
}

#[async_trait]
impl<F, Args> RouteHandler for FnHandler<F, Args>
where
    F: FnTrait<Args> + Send + Sync,
    F::Output: IntoReply,
    Args: FromArgs + Send,
{
    fn signature(&self) -> &Signature {
        &self.signature
    }

    async fn invoke(&self, args: Arguments) -> Result<Reply, BoxError> {
        let args = Args::from_args(args)?;
        FnTrait::call(&self.f, args).await.into_reply()
    }
}

/// a `SyncFnTrait` holder which represents any plain Fn
pub struct SyncFnHandler<F, Args> {
    f: F,
    signature: Signature,
    _phantom: PhantomData<fn(Args)>,
}

impl<F, Args> SyncFnHandler<F, Args>
where
    F: SyncFnTrait<Args>,
    F::Output: IntoReply,
    Args: FromArgs,
{
    fn new(f: F) -> Self {
        let signature = typed_signature(Args::arg_types(), F::Output::return_kind(), &[]);
        Self { f, signature, _phantom: PhantomData }
    }

    /// Names the path-bindable arguments, in order.
    pub fn named<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names = names.into_iter().map(Into::into).collect::<Vec<_>>();
        self.signature = typed_signature(Args::arg_types(), F::Output::return_kind(), &names);
        self
    }
}

impl<F, Args> fmt::Debug for SyncFnHandler<F, Args> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncFnHandler").field("signature", &self.signature).finish_non_exhaustive()
    }
}

/// Wraps a plain function as a [`RouteHandler`].
pub fn sync_handler_fn<F, Args>(f: F) -> SyncFnHandler<F, Args>
where
    F: SyncFnTrait<Args>,
    F::Output: IntoReply,
    Args: FromArgs,
{
    SyncFnHandler::new(f)
}

#[async_trait]
impl<F, Args> RouteHandler for SyncFnHandler<F, Args>
where
    F: SyncFnTrait<Args> + Send + Sync,
    F::Output: IntoReply,
    Args: FromArgs + Send,
{
    fn signature(&self) -> &Signature {
        &self.signature
    }

    async fn invoke(&self, args: Arguments) -> Result<Reply, BoxError> {
        let args = Args::from_args(args)?;
        SyncFnTrait::call(&self.f, args).into_reply()
    }
}
