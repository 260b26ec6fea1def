// ABOUTME: Per-foundation capture of platform output.
// ABOUTME: Actions write through OutputBuffer; the engine drains the paired CapturedOutput.

use std::io::{self, Write};

use bytes::{Bytes, BytesMut};
use tokio::sync::mpsc;

/// Append-only sink an action writes its human-readable output into.
///
/// Writes hand chunks over a channel to the matching [`CapturedOutput`], so the
/// action's worker and the engine never share a buffer.
#[derive(Debug, Clone)]
pub struct OutputBuffer {
    tx: mpsc::UnboundedSender<Bytes>,
}

/// Receiving end of an [`OutputBuffer`], held by the engine.
#[derive(Debug)]
pub struct CapturedOutput {
    rx: mpsc::UnboundedReceiver<Bytes>,
}

impl OutputBuffer {
    /// Create a connected buffer/capture pair.
    pub fn channel() -> (OutputBuffer, CapturedOutput) {
        let (tx, rx) = mpsc::unbounded_channel();
        (OutputBuffer { tx }, CapturedOutput { rx })
    }
}

impl Write for OutputBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !buf.is_empty() {
            // The capture side outlives every action; a closed channel means
            // the run is over and the bytes have nowhere to go.
            let _ = self.tx.send(Bytes::copy_from_slice(buf));
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl CapturedOutput {
    /// Take everything written so far.
    pub fn drain(&mut self) -> Bytes {
        let mut collected = BytesMut::new();
        while let Ok(chunk) = self.rx.try_recv() {
            collected.extend_from_slice(&chunk);
        }
        collected.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_writes_in_order() {
        let (mut buffer, mut captured) = OutputBuffer::channel();
        write!(buffer, "logging in").unwrap();
        writeln!(buffer, " to foundation").unwrap();
        buffer.write_all(b"done").unwrap();

        assert_eq!(&captured.drain()[..], b"logging in to foundation\ndone");
        assert!(captured.drain().is_empty());
    }

    #[test]
    fn clones_share_one_capture() {
        let (mut buffer, mut captured) = OutputBuffer::channel();
        let mut clone = buffer.clone();
        buffer.write_all(b"a").unwrap();
        clone.write_all(b"b").unwrap();

        assert_eq!(&captured.drain()[..], b"ab");
    }

    #[test]
    fn writes_after_capture_dropped_are_discarded() {
        let (mut buffer, captured) = OutputBuffer::channel();
        drop(captured);
        assert_eq!(buffer.write(b"late").unwrap(), 4);
    }
}
