//! Framing primitives of the Minecraft protocol: VarInts, length-prefixed
//! strings and packets.

use tokio::io::{AsyncRead, AsyncReadExt};

use super::ProbeError;

/// A VarInt never takes more than five bytes.
const MAX_VARINT_LEN: u32 = 5;

pub fn write_varint(buf: &mut Vec<u8>, value: i32) {
    let mut value = value as u32;
    loop {
        if value & !0x7F == 0 {
            buf.push(value as u8);
            return;
        }
        buf.push((value & 0x7F) as u8 | 0x80);
        value >>= 7;
    }
}

pub fn write_string(buf: &mut Vec<u8>, value: &str) {
    write_varint(buf, value.len() as i32);
    buf.extend_from_slice(value.as_bytes());
}

/// Wraps `body` into a packet: length, packet id, body.
pub fn frame(packet_id: i32, body: &[u8]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(body.len() + 1);
    write_varint(&mut payload, packet_id);
    payload.extend_from_slice(body);

    let mut packet = Vec::with_capacity(payload.len() + 2);
    write_varint(&mut packet, payload.len() as i32);
    packet.extend_from_slice(&payload);
    packet
}

pub async fn read_varint<R>(reader: &mut R) -> Result<i32, ProbeError>
where
    R: AsyncRead + Unpin,
{
    let mut value: u32 = 0;
    for position in 0..MAX_VARINT_LEN {
        let byte = reader.read_u8().await?;
        value |= u32::from(byte & 0x7F) << (7 * position);
        if byte & 0x80 == 0 {
            return Ok(value as i32);
        }
    }
    Err(ProbeError::Protocol("VarInt is too long".into()))
}
