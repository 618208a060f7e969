use std::io::{self, Read, Write};
use std::time::Duration;

use serialport::SerialPort;

use crate::antenna::{Antenna, AntennaError, AntennaOrientation, Direction};

const QUERY_POSITION: u8 = b'?';
const MAX_REPLY_LEN: usize = 64;

/// Rotor controller on a serial line.
///
/// Steps are single command bytes (`u`, `d`, `l`, `r`). A `?` query is answered with one
/// line holding azimuth and elevation in degrees, separated by whitespace or a comma.
pub struct SerialAntenna<P = Box<dyn SerialPort>> {
    port: P,
}

impl SerialAntenna {
    pub fn open(path: &str, baud_rate: u32, timeout: Duration) -> Result<Self, AntennaError> {
        let port = serialport::new(path, baud_rate)
            .timeout(timeout)
            .open()
            .map_err(|source| AntennaError::Open {
                port: path.to_string(),
                source,
            })?;
        log::info!("Opened rotor on {} at {} baud", path, baud_rate);
        Ok(Self::new(port))
    }
}

impl<P: Read + Write> SerialAntenna<P> {
    pub fn new(port: P) -> Self {
        Self { port }
    }

    fn query(&mut self) -> io::Result<String> {
        self.port.write_all(&[QUERY_POSITION])?;
        self.port.flush()?;

        let mut reply = Vec::new();
        let mut byte = [0u8; 1];
        loop {
            if self.port.read(&mut byte)? == 0 {
                return Err(io::ErrorKind::UnexpectedEof.into());
            }
            match byte[0] {
                b'\n' => break,
                b'\r' => {}
                b => reply.push(b),
            }
            if reply.len() > MAX_REPLY_LEN {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "rotor reply too long",
                ));
            }
        }

        String::from_utf8(reply).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

impl<P: Read + Write> Antenna for SerialAntenna<P> {
    fn read_orientation(&mut self) -> Option<AntennaOrientation> {
        let reply = match self.query() {
            Ok(reply) => reply,
            Err(e) => {
                log::debug!("Rotor position query failed: {}", e);
                return None;
            }
        };
        let orientation = parse_orientation(&reply);
        if orientation.is_none() {
            log::debug!("Unparsable rotor reply: {:?}", reply);
        }
        orientation
    }

    fn nudge(&mut self, direction: Direction) {
        let result = self
            .port
            .write_all(&[direction.command_byte()])
            .and_then(|_| self.port.flush());
        if let Err(e) = result {
            log::warn!("Failed to send {} to rotor: {}", direction, e);
        }
    }
}

fn parse_orientation(reply: &str) -> Option<AntennaOrientation> {
    let mut fields = reply
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|f| !f.is_empty());
    let azimuth: f64 = fields.next()?.parse().ok()?;
    let elevation: f64 = fields.next()?.parse().ok()?;
    if fields.next().is_some() || !azimuth.is_finite() || !elevation.is_finite() {
        return None;
    }
    Some(AntennaOrientation::new(azimuth, elevation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    struct FakePort {
        input: Cursor<Vec<u8>>,
        written: Vec<u8>,
    }

    impl FakePort {
        fn replying(reply: &str) -> Self {
            Self {
                input: Cursor::new(reply.as_bytes().to_vec()),
                written: Vec::new(),
            }
        }
    }

    impl Read for FakePort {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.input.read(buf)
        }
    }

    impl Write for FakePort {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn queries_position() {
        let mut antenna = SerialAntenna::new(FakePort::replying("165.5 5.25\r\n"));
        assert_eq!(
            antenna.read_orientation(),
            Some(AntennaOrientation::new(165.5, 5.25))
        );
        assert_eq!(antenna.port.written, b"?");
    }

    #[test]
    fn accepts_comma_separated_reply() {
        let mut antenna = SerialAntenna::new(FakePort::replying("160,10\n"));
        assert_eq!(
            antenna.read_orientation(),
            Some(AntennaOrientation::new(160.0, 10.0))
        );
    }

    #[test]
    fn silent_rotor_reads_as_unavailable() {
        let mut antenna = SerialAntenna::new(FakePort::replying(""));
        assert_eq!(antenna.read_orientation(), None);
    }

    #[test]
    fn garbage_reads_as_unavailable() {
        let mut antenna = SerialAntenna::new(FakePort::replying("ERR\n"));
        assert_eq!(antenna.read_orientation(), None);
        let mut antenna = SerialAntenna::new(FakePort::replying("1 2 3\n"));
        assert_eq!(antenna.read_orientation(), None);
    }

    #[test]
    fn nudges_are_single_bytes() {
        let mut antenna = SerialAntenna::new(FakePort::replying(""));
        antenna.nudge(Direction::Up);
        antenna.nudge(Direction::Down);
        antenna.nudge(Direction::Left);
        antenna.nudge(Direction::Right);
        assert_eq!(antenna.port.written, b"udlr");
    }
}
