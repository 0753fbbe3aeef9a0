//! tracing setup. In the browser each formatted event goes to the devtools
//! console; natively it goes to stdout.

pub fn init() {
    #[cfg(target_arch = "wasm32")]
    {
        let _ = tracing_subscriber::fmt()
            .with_writer(console::ConsoleWriter::default)
            .with_ansi(false)
            .without_time()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = tracing_subscriber::fmt().try_init();
    }
}

#[cfg(target_arch = "wasm32")]
mod console {
    use std::io;

    use wasm_bindgen::JsValue;

    /// Buffers one formatted event and logs it on flush or drop.
    #[derive(Default)]
    pub struct ConsoleWriter {
        buf: Vec<u8>,
    }

    impl io::Write for ConsoleWriter {
        fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
            self.buf.extend_from_slice(bytes);
            Ok(bytes.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            if !self.buf.is_empty() {
                let line = String::from_utf8_lossy(&self.buf);
                web_sys::console::log_1(&JsValue::from_str(line.trim_end()));
                self.buf.clear();
            }
            Ok(())
        }
    }

    impl Drop for ConsoleWriter {
        fn drop(&mut self) {
            let _ = io::Write::flush(self);
        }
    }
}
