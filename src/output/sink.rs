//! Dual-sink console writer.
//!
//! Every write goes to a primary stream (stdout or stderr) and, when one is
//! configured, to the process-wide mirror log as well. The mirror is handed
//! in already opened; this module only writes to and flushes it.

use std::borrow::Cow;
use std::fmt;
use std::io::{self, IsTerminal, Write};

use super::color::{platform_backend, ColorChoice, ColorController, TermColor};

/// Owned writer used for primary streams and the mirror log.
pub type BoxedWriter = Box<dyn Write + Send>;

/// Which primary stream a [`DualSink`] targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// Remove every carriage return, keeping all other bytes in order.
///
/// Captured tool output often redraws progress lines with `\r`, which
/// garbles both log files and terminals once replayed after the fact.
/// Input is not required to be UTF-8.
pub fn strip_carriage_returns(bytes: &[u8]) -> Cow<'_, [u8]> {
    if bytes.contains(&b'\r') {
        Cow::Owned(bytes.iter().copied().filter(|&b| b != b'\r').collect())
    } else {
        Cow::Borrowed(bytes)
    }
}

/// A primary stream paired with the optional mirror log.
///
/// Obtained from [`Console::out`] or [`Console::err`]. Both writers receive
/// identical bytes; a failure on one does not stop the other from being
/// written.
pub struct DualSink<'a> {
    primary: &'a mut BoxedWriter,
    mirror: Option<&'a mut BoxedWriter>,
}

impl<'a> DualSink<'a> {
    pub fn new(primary: &'a mut BoxedWriter, mirror: Option<&'a mut BoxedWriter>) -> Self {
        Self { primary, mirror }
    }

    fn replicate(&mut self, bytes: &[u8]) -> io::Result<()> {
        let primary = self.primary.write_all(bytes);
        let mirror = match self.mirror.as_deref_mut() {
            Some(mirror) => mirror.write_all(bytes),
            None => Ok(()),
        };
        primary.and(mirror)
    }

    /// Write `text` verbatim.
    pub fn write_raw(&mut self, text: &str) -> io::Result<()> {
        self.replicate(text.as_bytes())
    }

    /// Write `text` followed by a newline.
    pub fn write_line(&mut self, text: &str) -> io::Result<()> {
        let mut line = String::with_capacity(text.len() + 1);
        line.push_str(text);
        line.push('\n');
        self.replicate(line.as_bytes())
    }

    pub fn write_char(&mut self, c: char) -> io::Result<()> {
        let mut buf = [0u8; 4];
        self.replicate(c.encode_utf8(&mut buf).as_bytes())
    }

    /// Format `args` once and replicate the resulting bytes.
    ///
    /// Use with `format_args!`.
    pub fn write_formatted(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        match args.as_str() {
            Some(text) => self.replicate(text.as_bytes()),
            None => self.replicate(fmt::format(args).as_bytes()),
        }
    }

    /// Write captured subprocess output with every `\r` removed.
    ///
    /// Takes raw bytes: tools may emit text in any encoding and it is
    /// passed through untouched apart from the carriage returns.
    pub fn write_normalized(&mut self, bytes: &[u8]) -> io::Result<()> {
        let stripped = strip_carriage_returns(bytes);
        self.replicate(&stripped)
    }

    /// Flush the primary stream and the mirror.
    pub fn flush(&mut self) -> io::Result<()> {
        let primary = self.primary.flush();
        let mirror = match self.mirror.as_deref_mut() {
            Some(mirror) => mirror.flush(),
            None => Ok(()),
        };
        primary.and(mirror)
    }

    pub fn has_mirror(&self) -> bool {
        self.mirror.is_some()
    }

    /// The primary stream alone, bypassing the mirror.
    pub(crate) fn primary(&mut self) -> &mut BoxedWriter {
        &mut *self.primary
    }
}

/// The process's console: stdout, stderr, the mirror log and color state.
///
/// Color transitions always target stdout and never reach the mirror.
pub struct Console {
    stdout: BoxedWriter,
    stderr: BoxedWriter,
    mirror: Option<BoxedWriter>,
    color: ColorController,
}

impl Console {
    pub fn new(stdout: BoxedWriter, stderr: BoxedWriter, color: ColorController) -> Self {
        Self {
            stdout,
            stderr,
            mirror: None,
            color,
        }
    }

    /// Console over the real process streams.
    ///
    /// With [`ColorChoice::Auto`] the terminal check on stdout happens here,
    /// once, and the result is kept for the console's lifetime.
    pub fn stdio(choice: ColorChoice) -> Self {
        let enabled = choice.resolve(io::stdout().is_terminal());
        tracing::debug!(choice = choice.name(), enabled, "console color mode resolved");
        Self::new(
            Box::new(io::stdout()),
            Box::new(io::stderr()),
            ColorController::new(platform_backend(), enabled),
        )
    }

    /// Attach the mirror log. Everything written afterwards is duplicated into it.
    pub fn with_mirror(mut self, mirror: BoxedWriter) -> Self {
        self.mirror = Some(mirror);
        self
    }

    pub fn has_mirror(&self) -> bool {
        self.mirror.is_some()
    }

    pub fn color_enabled(&self) -> bool {
        self.color.is_enabled()
    }

    pub fn sink(&mut self, stream: Stream) -> DualSink<'_> {
        let primary = match stream {
            Stream::Stdout => &mut self.stdout,
            Stream::Stderr => &mut self.stderr,
        };
        DualSink::new(primary, self.mirror.as_mut())
    }

    pub fn out(&mut self) -> DualSink<'_> {
        self.sink(Stream::Stdout)
    }

    pub fn err(&mut self) -> DualSink<'_> {
        self.sink(Stream::Stderr)
    }

    pub fn flush_out(&mut self) -> io::Result<()> {
        self.out().flush()
    }

    pub fn flush_err(&mut self) -> io::Result<()> {
        self.err().flush()
    }

    /// Switch the stdout color, flushing pending output first.
    pub fn set_color(&mut self, color: TermColor) -> io::Result<()> {
        let Console {
            stdout,
            mirror,
            color: controller,
            ..
        } = self;
        let mut sink = DualSink::new(stdout, mirror.as_mut());
        controller.set_color(&mut sink, color)
    }

    /// Like [`Console::set_color`] but from a raw code; unknown codes do nothing.
    pub fn set_color_code(&mut self, code: i32) -> io::Result<()> {
        match TermColor::from_code(code) {
            Some(color) => self.set_color(color),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{Event, FailingWriter, SharedBuffer};
    use std::fs;
    use tempfile::NamedTempFile;

    struct Harness {
        stdout: SharedBuffer,
        stderr: SharedBuffer,
        mirror: SharedBuffer,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                stdout: SharedBuffer::new(),
                stderr: SharedBuffer::new(),
                mirror: SharedBuffer::new(),
            }
        }

        fn console(&self) -> Console {
            Console::new(
                self.stdout.boxed(),
                self.stderr.boxed(),
                ColorController::ansi(false),
            )
        }

        fn mirrored(&self) -> Console {
            self.console().with_mirror(self.mirror.boxed())
        }
    }

    #[test]
    fn test_strip_carriage_returns() {
        assert_eq!(&strip_carriage_returns(b"line1\rline2\r\r")[..], b"line1line2");
        assert_eq!(&strip_carriage_returns(b"\r\r\r")[..], b"");
        assert_eq!(&strip_carriage_returns(b"a\r\nb\r\n")[..], b"a\nb\n");
    }

    #[test]
    fn test_strip_carriage_returns_borrows_clean_text() {
        assert!(matches!(
            strip_carriage_returns(b"no returns here\n"),
            Cow::Borrowed(_)
        ));
    }

    #[test]
    fn test_strip_carriage_returns_keeps_multibyte_text() {
        let text = "caf\u{e9}\r 50%\r100%";
        assert_eq!(
            &strip_carriage_returns(text.as_bytes())[..],
            "caf\u{e9} 50%100%".as_bytes()
        );
    }

    #[test]
    fn test_write_normalized_passes_non_utf8_bytes_through() {
        let h = Harness::new();
        let mut console = h.mirrored();
        console.out().write_normalized(b"caf\xe9\r!\n").unwrap();

        assert_eq!(h.stdout.bytes(), b"caf\xe9!\n");
        assert_eq!(h.mirror.bytes(), h.stdout.bytes());
    }

    #[test]
    fn test_write_raw_without_mirror_hits_only_primary() {
        let h = Harness::new();
        let mut console = h.console();
        console.out().write_raw("hello").unwrap();
        console.err().write_raw("oops").unwrap();

        assert_eq!(h.stdout.contents(), "hello");
        assert_eq!(h.stderr.contents(), "oops");
        assert_eq!(h.mirror.contents(), "");
        assert!(!console.has_mirror());
    }

    #[test]
    fn test_mirror_receives_identical_bytes() {
        let h = Harness::new();
        let mut console = h.mirrored();
        {
            let mut out = console.out();
            out.write_raw("raw ").unwrap();
            out.write_line("line").unwrap();
            out.write_char('!').unwrap();
            out.write_formatted(format_args!("{:<6}|{}", "ab", 7)).unwrap();
        }

        assert_eq!(h.stdout.contents(), "raw line\n!ab    |7");
        assert_eq!(h.mirror.contents(), h.stdout.contents());
    }

    #[test]
    fn test_stdout_and_stderr_share_one_mirror() {
        let h = Harness::new();
        let mut console = h.mirrored();
        console.out().write_line("to out").unwrap();
        console.err().write_line("to err").unwrap();

        assert_eq!(h.mirror.contents(), "to out\nto err\n");
    }

    #[test]
    fn test_write_normalized_strips_only_that_path() {
        let h = Harness::new();
        let mut console = h.mirrored();
        {
            let mut out = console.out();
            out.write_line("banner\r").unwrap();
            out.write_normalized(b"10%\r50%\r100%\n").unwrap();
        }

        assert_eq!(h.stdout.contents(), "banner\r\n10%50%100%\n");
        assert_eq!(h.mirror.contents(), "banner\r\n10%50%100%\n");
    }

    #[test]
    fn test_flush_reaches_primary_and_mirror() {
        let h = Harness::new();
        let mut console = h.mirrored();
        console.flush_err().unwrap();

        assert_eq!(h.stderr.flush_count(), 1);
        assert_eq!(h.mirror.flush_count(), 1);
        assert_eq!(h.stdout.flush_count(), 0);
    }

    #[test]
    fn test_mirror_written_even_when_primary_fails() {
        let h = Harness::new();
        let mut console = Console::new(
            Box::new(FailingWriter),
            h.stderr.boxed(),
            ColorController::ansi(false),
        )
        .with_mirror(h.mirror.boxed());

        assert!(console.out().write_line("kept").is_err());
        assert_eq!(h.mirror.contents(), "kept\n");
    }

    #[test]
    fn test_mirror_to_file() {
        let file = NamedTempFile::new().unwrap();
        let handle = file.reopen().unwrap();
        let h = Harness::new();
        let mut console = h.console().with_mirror(Box::new(handle));

        console.out().write_line("Compile file.o").unwrap();
        console.err().write_normalized(b"warn\r\n").unwrap();
        console.flush_out().unwrap();

        let logged = fs::read_to_string(file.path()).unwrap();
        assert_eq!(logged, "Compile file.o\nwarn\n");
    }

    #[test]
    fn test_set_color_flushes_before_escape() {
        let h = Harness::new();
        let mut console = Console::new(
            h.stdout.boxed(),
            h.stderr.boxed(),
            ColorController::ansi(true),
        )
        .with_mirror(h.mirror.boxed());

        console.out().write_raw("before").unwrap();
        console.set_color(TermColor::Highlight).unwrap();

        assert_eq!(
            h.stdout.events(),
            vec![
                Event::Write(b"before".to_vec()),
                Event::Flush,
                Event::Write(b"\x1b[33m".to_vec()),
            ]
        );
        assert_eq!(h.mirror.contents(), "before");
        assert_eq!(h.mirror.flush_count(), 1);
    }

    #[test]
    fn test_set_color_disabled_still_flushes() {
        let h = Harness::new();
        let mut console = h.console();
        console.set_color(TermColor::Highlight).unwrap();
        console.set_color(TermColor::Default).unwrap();

        assert_eq!(h.stdout.contents(), "");
        assert_eq!(h.stdout.flush_count(), 2);
    }

    #[test]
    fn test_set_color_code_ignores_unknown_codes() {
        let h = Harness::new();
        let mut console = Console::new(
            h.stdout.boxed(),
            h.stderr.boxed(),
            ColorController::ansi(true),
        );
        console.set_color_code(42).unwrap();
        assert!(h.stdout.events().is_empty());

        console.set_color_code(0).unwrap();
        assert_eq!(h.stdout.contents(), "\x1b[0m");
    }
}
