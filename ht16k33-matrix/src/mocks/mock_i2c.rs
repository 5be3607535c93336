use std::collections::VecDeque;
use embedded_hal::i2c::{Error, ErrorKind, ErrorType, I2c, Operation};

struct ReadWrite {
    address: u8,
    bytes_in: Vec<u8>,
    bytes_out: Vec<u8>,
    ret: Result<(), MockError>,
}

/// A mock of the embedded_hal::i2c::I2c trait for testing purposes.
///
/// Reads and writes are checked against queues of expectations, in order.
/// Any call without a matching expectation panics.
pub struct MockI2c {
    reads: VecDeque<ReadWrite>,
    writes: VecDeque<ReadWrite>,
}

impl MockI2c {
    pub fn new() -> Self {
        Self {
            reads: VecDeque::new(),
            writes: VecDeque::new(),
        }
    }

    pub fn expect_read(&mut self, address: u8, bytes_out: &[u8]) {
        self.reads.push_back(ReadWrite {
            address,
            bytes_in: vec!(),
            bytes_out: bytes_out.to_vec(),
            ret: Ok(())
        });
    }

    pub fn expect_read_err(&mut self, address: u8, err: MockError) {
        self.reads.push_back(ReadWrite {
            address,
            bytes_in: vec!(),
            bytes_out: vec!(),
            ret: Err(err)
        });
    }

    pub fn expect_write(&mut self, address: u8, bytes: &[u8]) {
        self.writes.push_back(ReadWrite {
            address,
            bytes_in: bytes.to_vec(),
            bytes_out: vec!(),
            ret: Ok(())
        });
    }

    pub fn expect_write_err(&mut self, address: u8, err: MockError) {
        self.writes.push_back(ReadWrite {
            address,
            bytes_in: vec!(),
            bytes_out: vec!(),
            ret: Err(err)
        });
    }

    /// Queues the writes the HT16K33 receives when its whole display data is
    /// pushed one row at a time.
    pub fn expect_rows(&mut self, address: u8, rows: &[u8; 16]) {
        for (i, row) in rows.iter().enumerate() {
            self.expect_write(address, &[i as u8, *row]);
        }
    }

    /// Queues the writes performed when an HT16K33 driver is constructed with
    /// per-row refreshes.
    pub fn expect_ht16k33_init(&mut self, address: u8) {
        self.expect_write(address, &[0x21]);
        self.expect_write(address, &[0xEF]);
        self.expect_write(address, &[0x80]);
        self.expect_rows(address, &[0u8; 16]);
    }

    pub fn verify(&self) {
        assert_eq!(self.reads.len(), 0, "less reads were performed than expected");
        assert_eq!(self.writes.len(), 0, "less writes were performed than expected");
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MockError {
    Bad,
}

impl Error for MockError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

impl ErrorType for MockI2c {
    type Error = MockError;
}

impl I2c for MockI2c {
    fn read(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), Self::Error> {
        if let Some(read) = self.reads.pop_front() {
            assert_eq!(address, read.address, "Unexpected address");

            if read.ret.is_ok() {
                assert_eq!(buffer.len(), read.bytes_out.len());
                buffer.copy_from_slice(&read.bytes_out);
            }

            read.ret
        } else {
            panic!("Unexpected read({:x})", address);
        }
    }

    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        if let Some(write) = self.writes.pop_front() {
            assert_eq!(address, write.address, "Unexpected address");

            if write.ret.is_ok() {
                assert_eq!(bytes, write.bytes_in, "Unexpected write bytes: {:x?}", bytes);
            }

            write.ret
        } else {
            panic!("Unexpected write({:x}, {:x?})", address, bytes);
        }
    }

    fn transaction(&mut self, _address: u8, _operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
        unimplemented!()
    }
}

mod tests {
    use super::*;

    #[test]
    fn test_read() {
        let mut i2c = MockI2c::new();
        let address = 0x70;
        let bytes = [1, 2, 3, 4];
        let mut buffer = [0u8; 4];

        i2c.expect_read(address, &bytes);
        i2c.read(address, &mut buffer).unwrap();

        assert_eq!(buffer, bytes);
        i2c.verify();
    }

    #[test]
    fn test_read_err() {
        let mut i2c = MockI2c::new();
        let address = 0x70;

        i2c.expect_read_err(address, MockError::Bad);
        assert!(i2c.read(address, &mut [0]).is_err());

        i2c.verify();
    }

    #[test]
    #[should_panic]
    fn test_read_fail_address() {
        let mut i2c = MockI2c::new();
        let bytes = [1, 2, 3, 4];
        let mut buffer = [0u8; 4];

        i2c.expect_read(0x70, &bytes);
        i2c.read(0x71, &mut buffer).unwrap();
    }

    #[test]
    fn test_write() {
        let mut i2c = MockI2c::new();
        let address = 0x70;
        let write_bytes = [1, 2, 3, 4];

        i2c.expect_write(address, &write_bytes);
        i2c.write(address, &write_bytes).unwrap();

        i2c.verify();
    }

    #[test]
    fn test_write_err() {
        let mut i2c = MockI2c::new();
        let address = 0x70;

        i2c.expect_write_err(address, MockError::Bad);
        assert_eq!(i2c.write(address, &[1]), Err(MockError::Bad));

        i2c.verify();
    }

    #[test]
    #[should_panic]
    fn test_write_fail() {
        let mut i2c = MockI2c::new();
        let address = 0x70;

        i2c.expect_write(address, &[1, 2, 3, 4]);
        i2c.write(address, &[1, 2, 4, 3]).unwrap();
    }

    #[test]
    #[should_panic]
    fn test_unexpected_write() {
        let mut i2c = MockI2c::new();
        i2c.write(0x70, &[1]).unwrap();
    }

    #[test]
    #[should_panic]
    fn test_verify_fails_with_pending_writes() {
        let mut i2c = MockI2c::new();
        i2c.expect_write(0x70, &[1]);
        i2c.verify();
    }

    #[test]
    fn test_expect_rows() {
        let mut i2c = MockI2c::new();
        let address = 0x70;
        let mut rows = [0u8; 16];
        rows[3] = 0xAB;

        i2c.expect_rows(address, &rows);
        for (i, row) in rows.iter().enumerate() {
            i2c.write(address, &[i as u8, *row]).unwrap();
        }

        i2c.verify();
    }

    #[test]
    fn test_multiple_calls() {
        let mut i2c = MockI2c::new();
        let address = 0x70;

        i2c.expect_write(address, &[1]);
        i2c.expect_write(address, &[2]);
        i2c.expect_write(address, &[3]);
        i2c.write(address, &[1]).unwrap();
        i2c.write(address, &[2]).unwrap();
        i2c.write(address, &[3]).unwrap();

        i2c.verify();
    }

    #[test]
    #[should_panic]
    fn test_multiple_calls_fail() {
        let mut i2c = MockI2c::new();
        let address = 0x70;

        i2c.expect_write(address, &[1]);
        i2c.expect_write(address, &[2]);
        i2c.expect_write(address, &[3]);
        i2c.write(address, &[1]).unwrap();
        i2c.write(address, &[3]).unwrap();
    }
}
