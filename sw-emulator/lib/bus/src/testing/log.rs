/*++

Licensed under the Apache-2.0 license.

File Name:

    log.rs

Abstract:

    File contains a shared text log for recording bus traffic in unit tests.

--*/
use std::{
    cell::{Ref, RefCell},
    fmt::Write,
    ops::Deref,
    rc::Rc,
};

/// Append-only text log that can be written through a shared reference.
/// Fakes record every call they receive here so tests can assert on the
/// exact traffic a component produced.
///
/// Clones share one buffer, so a test can keep a clone of the log of a fake
/// that has been moved into the component under test.
///
/// # Example
///
/// ```
/// use smz_emu_bus::testing::Log;
/// use std::fmt::Write;
///
/// let log = Log::new();
/// let observer = log.clone();
/// writeln!(log.w(), "read(0x10000)").unwrap();
/// assert_eq!(observer.lines(), vec!["read(0x10000)"]);
/// assert_eq!("read(0x10000)\n", observer.take());
/// assert!(log.is_empty());
/// ```
#[derive(Clone, Default)]
pub struct Log {
    buf: Rc<RefCell<String>>,
}

impl Log {
    /// Construct an empty `Log`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the contents without consuming them.
    pub fn as_str(&self) -> impl Deref<Target = str> + '_ {
        Ref::map(self.buf.borrow(), String::as_str)
    }

    /// Return everything logged so far and leave the log empty.
    pub fn take(&self) -> String {
        std::mem::take(&mut *self.buf.borrow_mut())
    }

    /// Contents split into lines, without consuming them.
    pub fn lines(&self) -> Vec<String> {
        self.buf.borrow().lines().map(str::to_owned).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.borrow().is_empty()
    }

    /// Writer usable with `write!()` and `writeln!()`.
    pub fn w(&self) -> impl Write + '_ {
        LogWriter { buf: &self.buf }
    }
}

struct LogWriter<'a> {
    buf: &'a RefCell<String>,
}

impl Write for LogWriter<'_> {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        self.buf.borrow_mut().push_str(s);
        Ok(())
    }
}
