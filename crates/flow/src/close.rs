//! Ordered teardown of layered resources

use std::io;

use crate::stream::Close;

#[cfg(test)]
#[path = "close_test.rs"]
mod tests;

/// Close `first`, then `second` if `first` closed cleanly
///
/// The first failure is returned as is and `second` is left untouched, so
/// an inner layer (a decoder, a compressor) can flush before the transport
/// under it goes away. With `second` absent only `first` is closed.
pub fn close_sequentially(first: &mut dyn Close, second: Option<&mut dyn Close>) -> io::Result<()> {
    first.close()?;
    match second {
        Some(second) => second.close(),
        None => Ok(()),
    }
}
