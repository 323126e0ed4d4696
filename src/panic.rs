use std::panic::PanicHookInfo;

/// The custom panic hook.
///
/// This panic hook is responsible for reporting the panic message through the logger, so that it
/// shows up with the same format as the rest of the output.
fn custom_panic_hook(info: &PanicHookInfo) {
    // Get the panic message out of the payload.
    let mut message = info
        .payload()
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| info.payload().downcast_ref::<String>().map(String::as_str))
        .unwrap_or("no further information")
        .to_owned();

    if let Some(location) = info.location() {
        use std::fmt::Write;

        let _ = write!(
            message,
            " (at {}:{}:{})",
            location.file(),
            location.line(),
            location.column()
        );
    }

    let thread = std::thread::current();
    match thread.name() {
        Some(name) => log::error!("thread `{name}` panicked: {message}"),
        None => log::error!("panic: {message}"),
    }
}

/// Installs the custom panic hook.
pub fn install_custom_panic_hook() {
    log::trace!("installing custom panic hook...");
    std::panic::set_hook(Box::new(custom_panic_hook));
}
