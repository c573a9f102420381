// Panic isolation for handler calls
use std::panic::{catch_unwind, UnwindSafe};
use tracing::error;

/// Result of a panic-guarded execution
#[derive(Debug)]
pub enum PanicGuardResult<T> {
    /// Execution completed successfully
    Success(T),
    /// Execution panicked
    Panicked(String),
}

/// Execute a closure with panic isolation
///
/// If the closure panics, the panic is caught and returned as PanicGuardResult::Panicked.
/// The dispatch thread keeps running either way.
pub fn execute_guarded<F, T>(worker: &str, f: F) -> PanicGuardResult<T>
where
    F: FnOnce() -> T + UnwindSafe,
{
    match catch_unwind(f) {
        Ok(result) => PanicGuardResult::Success(result),
        Err(panic_info) => {
            let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_info.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };

            error!(worker = %worker, panic_msg = %panic_msg, "Message handler panicked");
            PanicGuardResult::Panicked(panic_msg)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_passes_value_through() {
        match execute_guarded("W1", || 42) {
            PanicGuardResult::Success(v) => assert_eq!(v, 42),
            PanicGuardResult::Panicked(msg) => panic!("unexpected panic: {}", msg),
        }
    }

    #[test]
    fn test_str_panic_captured() {
        let result = execute_guarded("W1", || -> () { panic!("static message") });
        match result {
            PanicGuardResult::Panicked(msg) => assert_eq!(msg, "static message"),
            PanicGuardResult::Success(_) => panic!("expected a panic"),
        }
    }

    #[test]
    fn test_formatted_panic_captured() {
        let value = 7;
        let result = execute_guarded("W1", move || -> () { panic!("value was {}", value) });
        match result {
            PanicGuardResult::Panicked(msg) => assert_eq!(msg, "value was 7"),
            PanicGuardResult::Success(_) => panic!("expected a panic"),
        }
    }
}
