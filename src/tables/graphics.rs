//! Graphics table extraction.
//!
//! Graphic records are vector drawing instruction lists, each opcode having a
//! fixed parameter width (per spec §6). A record declaring `len <= 4` is not
//! an error — it is how the original toolkit marks "no more graphics
//! records" without a dedicated terminator id, and extraction stops there.

use std::collections::BTreeMap;

use crate::error::DecodeError;
use crate::memory::MemoryImage;

use super::GRAPHICS_ADDR;

/// One decoded vector drawing instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum GraphicInstruction {
    /// Set the border colour.
    Border(u8),
    /// Plot a single point `(x, y)`.
    Plot(u8, u8),
    /// Draw an ellipse from four shape parameters.
    Ellipse(u8, u8, u8, u8),
    /// Flood-fill with the ink colour.
    Fill(u8, u8),
    /// Flood-fill with the paper (background) colour.
    Bgfill(u8, u8),
    /// Apply a dither/shade pattern.
    Shade(u8, u8),
    /// Invoke another graphic record by address (a subroutine call).
    Call(u16),
    /// Draw a rectangle from four shape parameters.
    Rect(u8, u8, u8, u8),
    /// Draw a line from four shape parameters.
    Line(u8, u8, u8, u8),
    /// Set the foreground (ink) colour.
    Ink(u8),
    /// Set the background (paper) colour.
    Paper(u8),
    /// Set the bright attribute.
    Bright(u8),
    /// Set the flash attribute.
    Flash(u8),
}

impl GraphicInstruction {
    /// Decodes one instruction starting at `addr`, returning it along with the
    /// address immediately following its parameters.
    fn decode(image: &MemoryImage, addr: u16) -> Result<(Self, u16), DecodeError> {
        let opcode = image.read8(addr);
        let p = addr.wrapping_add(1);
        let inst = match opcode {
            0x01 => (GraphicInstruction::Border(image.read8(p)), p.wrapping_add(1)),
            0x02 => (
                GraphicInstruction::Plot(image.read8(p), image.read8(p.wrapping_add(1))),
                p.wrapping_add(2),
            ),
            0x03 => (
                GraphicInstruction::Ellipse(
                    image.read8(p),
                    image.read8(p.wrapping_add(1)),
                    image.read8(p.wrapping_add(2)),
                    image.read8(p.wrapping_add(3)),
                ),
                p.wrapping_add(4),
            ),
            0x04 => (
                GraphicInstruction::Fill(image.read8(p), image.read8(p.wrapping_add(1))),
                p.wrapping_add(2),
            ),
            0x05 => (
                GraphicInstruction::Bgfill(image.read8(p), image.read8(p.wrapping_add(1))),
                p.wrapping_add(2),
            ),
            0x06 => (
                GraphicInstruction::Shade(image.read8(p), image.read8(p.wrapping_add(1))),
                p.wrapping_add(2),
            ),
            0x07 => (GraphicInstruction::Call(image.read16(p)), p.wrapping_add(2)),
            0x08 => (
                GraphicInstruction::Rect(
                    image.read8(p),
                    image.read8(p.wrapping_add(1)),
                    image.read8(p.wrapping_add(2)),
                    image.read8(p.wrapping_add(3)),
                ),
                p.wrapping_add(4),
            ),
            0x09 => (
                GraphicInstruction::Line(
                    image.read8(p),
                    image.read8(p.wrapping_add(1)),
                    image.read8(p.wrapping_add(2)),
                    image.read8(p.wrapping_add(3)),
                ),
                p.wrapping_add(4),
            ),
            0x10 => (GraphicInstruction::Ink(image.read8(p)), p.wrapping_add(1)),
            0x11 => (GraphicInstruction::Paper(image.read8(p)), p.wrapping_add(1)),
            0x12 => (GraphicInstruction::Bright(image.read8(p)), p.wrapping_add(1)),
            0x13 => (GraphicInstruction::Flash(image.read8(p)), p.wrapping_add(1)),
            _ => return Err(DecodeError::truncated("graphics", addr)),
        };
        Ok(inst)
    }
}

/// Walks the graphics table, decoding every `[id: u16][len: u16][n_inst:
/// u8][inst*]` record until one with `len <= 4` is reached.
///
/// # Errors
///
/// Returns [`DecodeError::TruncatedRecord`] on an opcode byte outside the
/// documented set.
pub fn extract_graphics(
    image: &MemoryImage,
) -> Result<BTreeMap<u16, Vec<GraphicInstruction>>, DecodeError> {
    let mut result = BTreeMap::new();
    let mut addr = image.read16(GRAPHICS_ADDR);

    loop {
        let id = image.read16(addr);
        let len = image.read16(addr.wrapping_add(2));
        if len <= 4 {
            break;
        }
        let n_inst = image.read8(addr.wrapping_add(4));
        let mut inst_addr = addr.wrapping_add(5);
        let mut instructions = Vec::with_capacity(usize::from(n_inst));
        for _ in 0..n_inst {
            let (inst, next) = GraphicInstruction::decode(image, inst_addr)?;
            instructions.push(inst);
            inst_addr = next;
        }
        result.insert(id, instructions);
        addr = addr.wrapping_add(4).wrapping_add(len);
    }

    Ok(result)
}
