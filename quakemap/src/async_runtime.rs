use std::future::Future;

/// Runs the future in the background on the current tokio runtime.
///
/// Must be called from within a runtime context.
pub fn spawn<T>(future: T)
where
    T: Future + Send + 'static,
    T::Output: Send + 'static,
{
    tokio::spawn(future);
}
