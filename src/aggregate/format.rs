use core::fmt::{self, Write};

const MULTILINE_HEADER: &str = "the following errors occurred:";
const MULTILINE_BULLET: &str = "\n -  ";
const MULTILINE_INDENT: &str = "    ";

pub(super) fn write_joined<E: fmt::Display>(
    errors: &[E],
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    for (index, error) in errors.iter().enumerate() {
        if index > 0 {
            f.write_str("; ")?;
        }
        write!(f, "{error}")?;
    }
    Ok(())
}

pub(super) fn write_multiline<E: fmt::Display>(
    errors: &[E],
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    f.write_str(MULTILINE_HEADER)?;
    for error in errors {
        f.write_str(MULTILINE_BULLET)?;
        write!(Indented { inner: &mut *f }, "{error:#}")?;
    }
    Ok(())
}

/// Indents every line after the first one.
struct Indented<'a, W> {
    inner: &'a mut W,
}

impl<W: Write> Write for Indented<'_, W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut lines = s.split('\n');
        if let Some(first) = lines.next() {
            self.inner.write_str(first)?;
        }
        for line in lines {
            self.inner.write_char('\n')?;
            self.inner.write_str(MULTILINE_INDENT)?;
            self.inner.write_str(line)?;
        }
        Ok(())
    }
}
