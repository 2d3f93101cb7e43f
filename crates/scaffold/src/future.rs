use std::future::Future;
use std::pin::Pin;

/// A pinned, boxed future that is required to be Send.
///
/// Resolution recurses through tasks, so each level is boxed.
pub(crate) type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
