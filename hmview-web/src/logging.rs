/// Log setup for the browser build
///
/// Events are formatted by a `tracing-subscriber` fmt layer and handed to the
/// browser console method matching their level.
use std::io;
use tracing::{Level, Metadata};
use tracing_subscriber::{
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};
use wasm_bindgen::JsValue;

pub const DEFAULT_FILTER: &str = "info,hmview_core=debug,hmview_web=debug";

/// Install the panic hook and a console-backed subscriber. Safe to call twice.
pub fn init_logging() {
    console_error_panic_hook::set_once();

    let installed = tracing_subscriber::registry()
        .with(EnvFilter::new(DEFAULT_FILTER))
        .with(
            fmt::layer()
                .with_writer(MakeConsoleWriter)
                .with_ansi(false)
                .without_time()
                .with_level(false),
        )
        .try_init();

    if installed.is_ok() {
        tracing::debug!("console logging ready");
    }
}

/// Hands out one [`ConsoleWriter`] per event
pub struct MakeConsoleWriter;

impl<'a> MakeWriter<'a> for MakeConsoleWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(*meta.level())
    }
}

/// Buffers one formatted event and emits it on drop
pub struct ConsoleWriter {
    level: Level,
    buffer: Vec<u8>,
}

impl ConsoleWriter {
    fn new(level: Level) -> Self {
        Self {
            level,
            buffer: Vec::new(),
        }
    }

    fn message(&self) -> String {
        String::from_utf8_lossy(&self.buffer).trim_end().to_string()
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let message = JsValue::from_str(&self.message());
        if self.level == Level::ERROR {
            web_sys::console::error_1(&message);
        } else if self.level == Level::WARN {
            web_sys::console::warn_1(&message);
        } else if self.level == Level::INFO {
            web_sys::console::info_1(&message);
        } else {
            web_sys::console::debug_1(&message);
        }
    }
}
