//! Line-oriented diagnostic report output.
//!
//! The report lines are the tool's contract and own stdout; tracing output
//! goes to stderr and never interleaves with them. The writer is injectable so
//! tests can capture the report without a terminal.

use std::{
    fmt,
    io::{self, Write},
    sync::{Mutex, PoisonError},
};

/// Maximum characters of element text included in an `ERROR ELEMENT:` line.
const ERROR_ELEMENT_TEXT_LIMIT: usize = 200;

/// Writes the prefixed report lines.
pub struct Reporter {
    out: Mutex<Box<dyn Write + Send>>,
}

impl Reporter {
    /// Reporter writing to standard output.
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// `CONSOLE: <text>` — one per console message, any time after
    /// registration.
    pub fn console(&self, text: &str) {
        self.line(format_args!("CONSOLE: {text}"));
    }

    /// `FAILED REQUEST: <url> - <reason>` — one per failed network request.
    pub fn failed_request(&self, url: &str, reason: &str) {
        self.line(format_args!("FAILED REQUEST: {url} - {reason}"));
    }

    /// `PAGE TITLE: <title>` — exactly one after a successful load.
    pub fn page_title(&self, title: &str) {
        self.line(format_args!("PAGE TITLE: {title}"));
    }

    /// `PAGE CONTENT LENGTH: <n>` — character count of the serialized HTML.
    pub fn content_length(&self, chars: usize) {
        self.line(format_args!("PAGE CONTENT LENGTH: {chars}"));
    }

    /// `ERROR ELEMENT: <text>...` — element text truncated to 200 characters,
    /// always followed by the ellipsis marker.
    pub fn error_element(&self, text: &str) {
        let truncated: String = text.chars().take(ERROR_ELEMENT_TEXT_LIMIT).collect();
        self.line(format_args!("ERROR ELEMENT: {truncated}..."));
    }

    /// `ERROR: <message>` — at most one, only when the run faulted.
    pub fn fault(&self, message: &str) {
        self.line(format_args!("ERROR: {message}"));
    }

    fn line(&self, args: fmt::Arguments<'_>) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        // A report we cannot write is not worth a panic during cleanup.
        let _ = writeln!(out, "{args}");
        let _ = out.flush();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture() -> (SharedBuf, Reporter) {
        let buf = SharedBuf::default();
        let reporter = Reporter::new(Box::new(buf.clone()));
        (buf, reporter)
    }

    #[test]
    fn test_console_line() {
        let (buf, reporter) = capture();
        reporter.console("ready");
        assert_eq!(buf.contents(), "CONSOLE: ready\n");
    }

    #[test]
    fn test_failed_request_line() {
        let (buf, reporter) = capture();
        reporter.failed_request("https://cdn.example.com/app.js", "net::ERR_FAILED");
        assert_eq!(
            buf.contents(),
            "FAILED REQUEST: https://cdn.example.com/app.js - net::ERR_FAILED\n"
        );
    }

    #[test]
    fn test_title_and_content_length_lines() {
        let (buf, reporter) = capture();
        reporter.page_title("Status — bandlab");
        reporter.content_length(48213);
        assert_eq!(
            buf.contents(),
            "PAGE TITLE: Status — bandlab\nPAGE CONTENT LENGTH: 48213\n"
        );
    }

    #[test]
    fn test_error_element_short_text_keeps_ellipsis() {
        let (buf, reporter) = capture();
        reporter.error_element("build failed");
        assert_eq!(buf.contents(), "ERROR ELEMENT: build failed...\n");
    }

    #[test]
    fn test_error_element_truncates_at_200_chars() {
        let (buf, reporter) = capture();
        let text = "x".repeat(300);
        reporter.error_element(&text);
        let expected = format!("ERROR ELEMENT: {}...\n", "x".repeat(200));
        assert_eq!(buf.contents(), expected);
    }

    #[test]
    fn test_error_element_truncates_by_char_not_byte() {
        let (buf, reporter) = capture();
        let text = "é".repeat(250);
        reporter.error_element(&text);
        let expected = format!("ERROR ELEMENT: {}...\n", "é".repeat(200));
        assert_eq!(buf.contents(), expected);
    }

    #[test]
    fn test_fault_line() {
        let (buf, reporter) = capture();
        reporter.fault("navigation timed out after 30000ms");
        assert_eq!(buf.contents(), "ERROR: navigation timed out after 30000ms\n");
    }
}
