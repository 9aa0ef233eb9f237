//! Flat memory image of a decoded snapshot.
//!
//! This module provides [`MemoryImage`], a byte-addressable view over the
//! 64KiB address space a GAC database lives in, built by fixing up the load
//! offset of a raw emulator snapshot file.
//!
//! # Address space
//!
//! Only `0x5C00..=0xFFFF` is meaningful; reads below `0x4000` always return
//! `0xFF` (matching the original toolkit's behavior when the ROM/system
//! variable area is probed by table-walking code that wandered off the end
//! of a record). All multi-byte integers are little-endian.
//!
//! # Example
//!
//! ```
//! use gac_adventure::memory::MemoryImage;
//!
//! let mut bytes = vec![0u8; 0xA400];
//! bytes[0] = 0x34;
//! bytes[1] = 0x12;
//! let image = MemoryImage::from_ram(bytes);
//! assert_eq!(image.read16(0x5C00), 0x1234);
//! assert_eq!(image.read8(0x1000), 0xFF);
//! ```

/// Number of bytes skipped at the start of a snapshot file before the RAM dump begins.
pub const SEEK_POS: usize = 0x1C1B;

/// First address the snapshot's RAM dump is loaded at.
pub const MEM_BASE: u16 = 0x5C00;

/// Number of bytes copied from the snapshot into the image at [`MEM_BASE`].
pub const MEM_SIZE: usize = 0xA400;

/// Addresses below this value are not backed by the snapshot and always read as `0xFF`.
pub const MIN_RAM: u16 = 0x4000;

/// The exact size, in bytes, a valid snapshot file must have on disk.
pub const SNAPSHOT_FILE_SIZE: usize = 49179;

/// A flat, byte-addressable view of the decoded 64KiB address space.
#[derive(Debug, Clone)]
pub struct MemoryImage {
    ram: Vec<u8>,
}

impl MemoryImage {
    /// Builds an image directly from an already-offset RAM buffer (starting at address 0).
    ///
    /// The buffer is placed starting at address 0 and padded with zeros up to 64KiB.
    /// This constructor is mainly useful for tests; production code should use
    /// [`MemoryImage::from_snapshot`].
    #[must_use]
    pub fn from_ram(mut ram: Vec<u8>) -> Self {
        ram.resize(0x10000, 0);
        MemoryImage { ram }
    }

    /// Builds an image from the raw bytes of a snapshot file (after the `SEEK_POS` skip
    /// has already been applied by the caller), placing them at [`MEM_BASE`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::DecodeError::SnapshotSize`] if `payload` is not exactly
    /// `MEM_SIZE` bytes.
    pub fn from_snapshot_payload(
        payload: &[u8],
    ) -> Result<Self, crate::error::DecodeError> {
        if payload.len() != MEM_SIZE {
            return Err(crate::error::DecodeError::SnapshotSize {
                expected: MEM_SIZE,
                found: payload.len(),
            });
        }
        let mut ram = vec![0u8; 0x10000];
        ram[usize::from(MEM_BASE)..usize::from(MEM_BASE) + MEM_SIZE].copy_from_slice(payload);
        Ok(MemoryImage { ram })
    }

    /// Loads a snapshot file from disk, skipping the first [`SEEK_POS`] bytes and
    /// validating the remaining payload is exactly [`MEM_SIZE`] bytes.
    ///
    /// # Errors
    ///
    /// - [`crate::error::DecodeError::Io`] if the file cannot be read.
    /// - [`crate::error::DecodeError::SnapshotSize`] if the payload size is wrong.
    pub fn load_file(path: &std::path::Path) -> Result<Self, crate::error::DecodeError> {
        let bytes = std::fs::read(path)?;
        if bytes.len() != SNAPSHOT_FILE_SIZE {
            return Err(crate::error::DecodeError::SnapshotSize {
                expected: SNAPSHOT_FILE_SIZE,
                found: bytes.len(),
            });
        }
        Self::from_snapshot_payload(&bytes[SEEK_POS..])
    }

    /// Reads a single byte. Addresses below [`MIN_RAM`] always read as `0xFF`.
    #[must_use]
    pub fn read8(&self, addr: u16) -> u8 {
        if addr < MIN_RAM {
            return 0xFF;
        }
        self.ram[usize::from(addr)]
    }

    /// Reads a little-endian 16-bit word. If `addr` itself is below [`MIN_RAM`] the
    /// whole read returns `0xFFFF`; otherwise each byte is read independently through
    /// [`MemoryImage::read8`] (so a word straddling the boundary at `addr == MIN_RAM - 1`
    /// takes its high byte from real RAM and low byte as `0xFF`, matching the original
    /// toolkit's byte-at-a-time `PEEK` semantics).
    #[must_use]
    pub fn read16(&self, addr: u16) -> u16 {
        if addr < MIN_RAM {
            return 0xFFFF;
        }
        let lo = u16::from(self.read8(addr));
        let hi = u16::from(self.read8(addr.wrapping_add(1)));
        lo | (hi << 8)
    }

    /// Validates the punctuation magic bytes (`\0 .,-!?:`) at their fixed address.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::DecodeError::BadMagic`] if the bytes don't match.
    pub fn check_magic(&self) -> Result<(), crate::error::DecodeError> {
        const MAGIC: &[u8; 8] = b"\0 .,-!?:";
        for (i, &expected) in MAGIC.iter().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let addr = crate::tables::PUNCTUATION_ADDR + i as u16;
            if self.read8(addr) != expected {
                return Err(crate::error::DecodeError::BadMagic);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read8_below_min_ram() {
        let image = MemoryImage::from_ram(vec![0; 0x10000]);
        assert_eq!(image.read8(0), 0xFF);
        assert_eq!(image.read8(MIN_RAM - 1), 0xFF);
    }

    #[test]
    fn test_read8_at_min_ram() {
        let mut ram = vec![0u8; 0x10000];
        ram[usize::from(MIN_RAM)] = 0x42;
        let image = MemoryImage::from_ram(ram);
        assert_eq!(image.read8(MIN_RAM), 0x42);
    }

    #[test]
    fn test_read16_below_min_ram() {
        let image = MemoryImage::from_ram(vec![0xAB; 0x10000]);
        assert_eq!(image.read16(0), 0xFFFF);
    }

    #[test]
    fn test_read16_little_endian() {
        let mut ram = vec![0u8; 0x10000];
        ram[0x5C00] = 0x34;
        ram[0x5C01] = 0x12;
        let image = MemoryImage::from_ram(ram);
        assert_eq!(image.read16(0x5C00), 0x1234);
    }

    #[test]
    fn test_from_snapshot_payload_wrong_size() {
        let result = MemoryImage::from_snapshot_payload(&[0u8; 10]);
        assert!(matches!(
            result,
            Err(crate::error::DecodeError::SnapshotSize { .. })
        ));
    }

    #[test]
    fn test_from_snapshot_payload_places_at_mem_base() {
        let mut payload = vec![0u8; MEM_SIZE];
        payload[0] = 0x99;
        let image = MemoryImage::from_snapshot_payload(&payload).unwrap();
        assert_eq!(image.read8(MEM_BASE), 0x99);
    }

    #[test]
    fn test_check_magic_valid() {
        let mut payload = vec![0u8; MEM_SIZE];
        let offset = usize::from(crate::tables::PUNCTUATION_ADDR - MEM_BASE);
        payload[offset..offset + 8].copy_from_slice(b"\0 .,-!?:");
        let image = MemoryImage::from_snapshot_payload(&payload).unwrap();
        assert!(image.check_magic().is_ok());
    }

    #[test]
    fn test_check_magic_invalid() {
        let payload = vec![0u8; MEM_SIZE];
        let image = MemoryImage::from_snapshot_payload(&payload).unwrap();
        assert!(matches!(
            image.check_magic(),
            Err(crate::error::DecodeError::BadMagic)
        ));
    }
}
