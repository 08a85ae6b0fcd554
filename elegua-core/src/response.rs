//! Response conversion traits.

use crate::{error::BoxError, hook::HookResult};

/// Trait for converting a callback's output into a [`HookResult`].
///
/// This is what lets plain closures act as hooks and guards.
///
/// # Default Implementations
///
/// - `()` → Next
/// - `bool` → `true` = Stop, `false` = Next
/// - `HookResult` → As is
/// - `Option<T>` → `None` = Next, otherwise delegates
/// - `Result<T, E>` → Delegates to inner `T` or propagates error
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not an `IntoResponse`",
    label = "missing `IntoResponse` implementation",
    note = "IntoResponse must implement the `into_response` method."
)]
pub trait IntoResponse {
    /// Convert the output into propagation behavior and optional error.
    fn into_response(self) -> Result<HookResult, BoxError>;
}

impl IntoResponse for () {
    fn into_response(self) -> Result<HookResult, BoxError> {
        Ok(HookResult::Next)
    }
}

impl IntoResponse for bool {
    fn into_response(self) -> Result<HookResult, BoxError> {
        Ok(if self {
            HookResult::Stop
        } else {
            HookResult::Next
        })
    }
}

impl IntoResponse for HookResult {
    fn into_response(self) -> Result<HookResult, BoxError> {
        Ok(self)
    }
}

impl<T: IntoResponse> IntoResponse for Option<T> {
    fn into_response(self) -> Result<HookResult, BoxError> {
        match self {
            Some(t) => t.into_response(),
            None => Ok(HookResult::Next),
        }
    }
}

impl<T, E> IntoResponse for Result<T, E>
where
    T: IntoResponse,
    E: std::error::Error + Send + Sync + 'static,
{
    fn into_response(self) -> Result<HookResult, BoxError> {
        match self {
            Ok(t) => t.into_response(),
            Err(e) => Err(Box::new(e)),
        }
    }
}
