//! The process-wide fatal-error hook. Arena indices are `u32`, so a
//! document holding more than ~4 billion live settings cannot be
//! addressed; that is the one condition this library treats as fatal
//! rather than recoverable, mirroring how the C library calls its
//! installed fatal-error handler on allocation failure and otherwise
//! aborts the process.

use std::sync::OnceLock;

static HANDLER: OnceLock<Box<dyn Fn(&str) + Send + Sync>> = OnceLock::new();

/// Installs a process-wide handler invoked on conditions the library
/// cannot continue from. Only the first call takes effect; later calls
/// are ignored, matching `OnceLock`'s semantics.
pub fn set_fatal_error_handler(handler: impl Fn(&str) + Send + Sync + 'static) {
    let _ = HANDLER.set(Box::new(handler));
}

/// Reports a fatal condition. Calls the installed handler if one is set,
/// then panics unconditionally: a handler is a notification hook, not a
/// substitute for unwinding out of code that already assumes success.
pub(crate) fn fatal(message: &str) -> ! {
    if let Some(handler) = HANDLER.get() {
        handler(message);
    }
    panic!("{message}");
}
