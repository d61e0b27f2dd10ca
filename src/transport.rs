//! Chunked byte transport.
//!
//! Any [`Sink`] can receive a buffer: a hex file writer, an in-memory
//! vector, or a [`SerialPort`]. The buffer is written in fixed-size chunks,
//! one blocking write each, with progress reported after every chunk. A
//! failure ends the transfer immediately; nothing is retried or resumed.

use std::io::{self, Write};

use tracing::{debug, info};

use crate::config::TransportConfig;
use crate::error::TransportError;

// ============================================================================
// Sink
// ============================================================================

/// Destination for produced byte streams.
pub trait Sink {
    /// Blocking write of one chunk. Returns the number of bytes accepted.
    fn write_chunk(&mut self, chunk: &[u8]) -> io::Result<usize>;

    /// Called once after the last chunk.
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<W: Write> Sink for W {
    fn write_chunk(&mut self, chunk: &[u8]) -> io::Result<usize> {
        self.write_all(chunk)?;
        Ok(chunk.len())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.flush()
    }
}

/// Send `buffer` to `sink` in chunks of `chunk_size` bytes.
///
/// Args:
///     sink: destination
///     buffer: bytes to send
///     chunk_size: bytes per write call, the last chunk may be shorter
///     progress: optional callback receiving (sent, total) after each chunk
///
/// Returns the total number of bytes the sink accepted.
pub fn send<S: Sink + ?Sized>(
    sink: &mut S,
    buffer: &[u8],
    chunk_size: usize,
    mut progress: Option<&mut dyn FnMut(usize, usize)>,
) -> Result<usize, TransportError> {
    if chunk_size == 0 {
        return Err(TransportError::InvalidChunkSize);
    }
    let total = buffer.len();
    info!("Sending {} bytes in chunks of {}", total, chunk_size);

    let mut sent = 0usize;
    for chunk in buffer.chunks(chunk_size) {
        let accepted = sink
            .write_chunk(chunk)
            .map_err(|source| TransportError::Write { sent, total, source })?;
        sent += accepted;
        info!("Sent {}/{} bytes", sent, total);
        if let Some(ref mut cb) = progress {
            cb(sent, total);
        }
    }
    sink.finish()
        .map_err(|source| TransportError::Write { sent, total, source })?;

    info!("Sent {} bytes total", sent);
    Ok(sent)
}

// ============================================================================
// Serial port
// ============================================================================

#[cfg(unix)]
pub use serial::SerialPort;

#[cfg(unix)]
mod serial {
    use std::fs::{File, OpenOptions};
    use std::io::{self, Write};
    use std::os::unix::io::AsRawFd;

    use termios::os::target::speed_t;
    use termios::{cfmakeraw, cfsetspeed, tcdrain, tcsetattr, Termios, CLOCAL, CREAD, TCSANOW, VMIN, VTIME};
    use tracing::debug;

    use crate::error::TransportError;

    /// Map a numeric baud rate to its termios speed constant.
    fn speed_for(baud_rate: u32) -> Option<speed_t> {
        use termios::os::target::{B115200, B19200, B230400, B38400, B57600, B9600};
        let speed = match baud_rate {
            9600 => B9600,
            19200 => B19200,
            38400 => B38400,
            57600 => B57600,
            115_200 => B115200,
            230_400 => B230400,
            _ => return extended_speed(baud_rate),
        };
        Some(speed)
    }

    #[cfg(target_os = "linux")]
    fn extended_speed(baud_rate: u32) -> Option<speed_t> {
        use termios::os::linux::{B1000000, B2000000, B460800, B921600};
        match baud_rate {
            460_800 => Some(B460800),
            921_600 => Some(B921600),
            1_000_000 => Some(B1000000),
            2_000_000 => Some(B2000000),
            _ => None,
        }
    }

    #[cfg(not(target_os = "linux"))]
    fn extended_speed(_baud_rate: u32) -> Option<speed_t> {
        None
    }

    /// A tty device in raw 8N1 mode.
    pub struct SerialPort {
        file: File,
        path: String,
    }

    impl SerialPort {
        /// Open `path` for writing and configure raw mode at `baud_rate`.
        pub fn open(path: &str, baud_rate: u32) -> Result<Self, TransportError> {
            let speed = speed_for(baud_rate).ok_or(TransportError::UnsupportedBaudRate(baud_rate))?;
            let file = OpenOptions::new()
                .read(true)
                .write(true)
                .open(path)
                .map_err(|source| TransportError::Open {
                    path: path.to_string(),
                    source,
                })?;

            let configure = |source: io::Error| TransportError::Configure {
                path: path.to_string(),
                source,
            };
            let fd = file.as_raw_fd();
            let mut tio = Termios::from_fd(fd).map_err(configure)?;
            cfmakeraw(&mut tio);
            tio.c_cflag |= CLOCAL | CREAD;
            tio.c_cc[VMIN] = 0;
            // One second read timeout, in deciseconds
            tio.c_cc[VTIME] = 10;
            cfsetspeed(&mut tio, speed).map_err(configure)?;
            tcsetattr(fd, TCSANOW, &tio).map_err(configure)?;

            debug!("Opened {} at {} baud", path, baud_rate);
            Ok(Self {
                file,
                path: path.to_string(),
            })
        }

        pub fn path(&self) -> &str {
            &self.path
        }
    }

    impl Write for SerialPort {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.file.write(buf)
        }

        /// Block until the driver has transmitted everything written.
        fn flush(&mut self) -> io::Result<()> {
            self.file.flush()?;
            tcdrain(self.file.as_raw_fd())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_speed_table() {
            assert!(speed_for(115_200).is_some());
            assert!(speed_for(9600).is_some());
            assert!(speed_for(12345).is_none());
        }

        #[test]
        fn test_unsupported_baud_checked_before_open() {
            match SerialPort::open("/nonexistent/tty", 12345) {
                Err(TransportError::UnsupportedBaudRate(12345)) => {}
                Err(e) => panic!("unexpected error: {}", e),
                Ok(_) => panic!("expected failure"),
            }
        }

        #[test]
        fn test_open_missing_device() {
            assert!(matches!(
                SerialPort::open("/nonexistent/tty", 115_200),
                Err(TransportError::Open { .. })
            ));
        }
    }
}

/// Open the configured serial device and send `buffer` to it.
#[cfg(unix)]
pub fn send_to_device(
    config: &TransportConfig,
    buffer: &[u8],
    progress: Option<&mut dyn FnMut(usize, usize)>,
) -> Result<usize, TransportError> {
    info!("Sending {} bytes to {} at {} baud", buffer.len(), config.device, config.baud_rate);
    let mut port = SerialPort::open(&config.device, config.baud_rate)?;
    let sent = send(&mut port, buffer, config.chunk_size, progress)?;
    debug!("Closed {}", port.path());
    Ok(sent)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records the size of every write call it receives.
    #[derive(Default)]
    struct RecordingSink {
        writes: Vec<usize>,
        data: Vec<u8>,
        fail_after: Option<usize>,
    }

    impl Write for RecordingSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.fail_after == Some(self.writes.len()) {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "link down"));
            }
            self.writes.push(buf.len());
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_chunked_writes() {
        let buffer: Vec<u8> = (0..2500).map(|i| (i % 256) as u8).collect();
        let mut sink = RecordingSink::default();
        let mut reports = Vec::new();
        let mut cb = |sent: usize, total: usize| reports.push((sent, total));
        let sent = send(&mut sink, &buffer, 1024, Some(&mut cb)).unwrap();
        assert_eq!(sent, 2500);
        assert_eq!(sink.writes, vec![1024, 1024, 452]);
        assert_eq!(sink.data, buffer);
        assert_eq!(reports, vec![(1024, 2500), (2048, 2500), (2500, 2500)]);
    }

    #[test]
    fn test_exact_multiple() {
        let mut sink = RecordingSink::default();
        send(&mut sink, &[0u8; 20160], 1024, None).unwrap();
        assert_eq!(sink.writes.len(), 20);
        assert_eq!(*sink.writes.last().unwrap(), 20160 - 19 * 1024);
    }

    #[test]
    fn test_empty_buffer() {
        let mut sink = RecordingSink::default();
        assert_eq!(send(&mut sink, &[], 1024, None).unwrap(), 0);
        assert!(sink.writes.is_empty());
    }

    #[test]
    fn test_zero_chunk_size() {
        let mut sink = RecordingSink::default();
        assert!(matches!(
            send(&mut sink, &[1, 2, 3], 0, None),
            Err(TransportError::InvalidChunkSize)
        ));
    }

    #[test]
    fn test_write_failure_aborts() {
        let mut sink = RecordingSink {
            fail_after: Some(1),
            ..Default::default()
        };
        match send(&mut sink, &[0u8; 2500], 1024, None) {
            Err(TransportError::Write { sent, total, .. }) => {
                assert_eq!((sent, total), (1024, 2500));
            }
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
        // No retry: the failed chunk is not attempted again
        assert_eq!(sink.writes, vec![1024]);
    }

    #[test]
    fn test_vec_sink() {
        let mut out: Vec<u8> = Vec::new();
        send(&mut out, b"hello", 2, None).unwrap();
        assert_eq!(out, b"hello");
    }
}
