pub mod shared;

/// Initialize client-side logging via the `log` crate.
/// Called once at application startup, before the first screen mounts.
pub fn init_logging() {
    _ = console_log::init_with_level(log::Level::Debug);
    console_error_panic_hook::set_once();
}
