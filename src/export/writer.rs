//! Little-endian primitive writer for SPM files.

use crate::error::{Result, SpmError};
use crate::types::{convert_quaternion, convert_uv, convert_vector, Transform};
use byteorder::{LittleEndian, WriteBytesExt};
use glam::{Quat, Vec2, Vec3};
use std::io::Write;

/// Writer for SPM primitives.
///
/// Every call appends exactly its field's bytes in call order; nothing is
/// buffered or patched afterwards.
pub struct SpmWriter<W: Write> {
    writer: W,
}

impl<W: Write> SpmWriter<W> {
    /// Create a new SPM writer
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write_i8(&mut self, value: i8) -> Result<()> {
        self.writer.write_i8(value)?;
        Ok(())
    }

    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.writer.write_u8(value)?;
        Ok(())
    }

    pub fn write_i16(&mut self, value: i16) -> Result<()> {
        self.writer.write_i16::<LittleEndian>(value)?;
        Ok(())
    }

    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        self.writer.write_u16::<LittleEndian>(value)?;
        Ok(())
    }

    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        self.writer.write_i32::<LittleEndian>(value)?;
        Ok(())
    }

    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.writer.write_u32::<LittleEndian>(value)?;
        Ok(())
    }

    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        self.writer.write_f32::<LittleEndian>(value)?;
        Ok(())
    }

    pub fn write_f64(&mut self, value: f64) -> Result<()> {
        self.writer.write_f64::<LittleEndian>(value)?;
        Ok(())
    }

    /// Write raw bytes with no length prefix.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes)?;
        Ok(())
    }

    /// Write an `i32` byte length followed by the UTF-8 bytes, no terminator.
    pub fn write_string(&mut self, value: &str) -> Result<()> {
        let len = i32::try_from(value.len()).map_err(|_| SpmError::StringTooLong(value.len()))?;
        self.write_i32(len)?;
        self.write_bytes(value.as_bytes())
    }

    /// Write an `u32` count field.
    pub fn write_count(&mut self, what: &'static str, count: usize) -> Result<()> {
        let count = u32::try_from(count).map_err(|_| SpmError::CountOverflow { what, count })?;
        self.write_u32(count)
    }

    /// Write RGBA as four bytes.
    pub fn write_color(&mut self, rgba: [u8; 4]) -> Result<()> {
        self.write_bytes(&rgba)
    }

    /// Write X, Y, Z, negating Z when `flip_z` is set.
    pub fn write_vector(&mut self, value: Vec3, flip_z: bool) -> Result<()> {
        let v = convert_vector(value, flip_z);
        self.write_f32(v.x)?;
        self.write_f32(v.y)?;
        self.write_f32(v.z)
    }

    /// Write X, Y, -Z, W (W last).
    pub fn write_quaternion(&mut self, value: Quat) -> Result<()> {
        let q = convert_quaternion(value);
        self.write_f32(q.x)?;
        self.write_f32(q.y)?;
        self.write_f32(q.z)?;
        self.write_f32(q.w)
    }

    /// Write U, -V.
    pub fn write_uv(&mut self, value: Vec2) -> Result<()> {
        let uv = convert_uv(value);
        self.write_f32(uv.x)?;
        self.write_f32(uv.y)
    }

    /// Write position, rotation, then scale (scale Z is never negated).
    pub fn write_transform(&mut self, transform: &Transform) -> Result<()> {
        self.write_vector(transform.position, true)?;
        self.write_quaternion(transform.rotation)?;
        self.write_vector(transform.scale, false)
    }

    /// Consume the writer and return the inner writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}
