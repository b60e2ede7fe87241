/// Classification for retry policy.
///
/// | Class | Meaning |
/// |-------|---------|
/// | `Never` | The request is invalid or the feed has no data; retrying won't help |
/// | `WithBackoff` | Transient failure (429, timeout, 5xx, network); a later attempt may succeed |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    Never,
    WithBackoff,
}

impl RetryClass {
    pub fn is_retryable(self) -> bool {
        matches!(self, RetryClass::WithBackoff)
    }
}
