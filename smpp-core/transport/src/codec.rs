//! 帧编解码
//!
//! SMPP 的每个 PDU 以 4 字节大端 `command_length` 开头，长度包含自身。
//! 这里只负责按长度切帧，不解析头部之后的内容。

use bytes::{Buf, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::{Result, TransportError};

/// PDU 头部长度: command_length + command_id + command_status + sequence_number
pub const HEADER_LEN: usize = 16;

/// 按 `command_length` 切分的帧编解码器
#[derive(Debug, Clone)]
pub struct FrameCodec {
    max_frame_len: usize,
}

impl FrameCodec {
    pub fn new(max_frame_len: usize) -> Self {
        Self { max_frame_len }
    }

    pub fn max_frame_len(&self) -> usize {
        self.max_frame_len
    }

    fn check_len(&self, len: usize) -> Result<()> {
        if len < HEADER_LEN {
            return Err(TransportError::InvalidFrame(format!(
                "command_length {} 小于头部长度",
                len
            )));
        }
        if len > self.max_frame_len {
            return Err(TransportError::FrameTooLarge(len, self.max_frame_len));
        }
        Ok(())
    }
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::new(64 * 1024)
    }
}

impl Decoder for FrameCodec {
    type Item = BytesMut;
    type Error = TransportError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<BytesMut>> {
        if src.len() < 4 {
            return Ok(None);
        }

        let len = (&src[..4]).get_u32() as usize;
        self.check_len(len)?;

        if src.len() < len {
            src.reserve(len - src.len());
            return Ok(None);
        }

        Ok(Some(src.split_to(len)))
    }
}

impl Encoder<Bytes> for FrameCodec {
    type Error = TransportError;

    fn encode(&mut self, item: Bytes, dst: &mut BytesMut) -> Result<()> {
        if item.len() < 4 {
            return Err(TransportError::InvalidFrame("帧不完整".to_string()));
        }
        let declared = (&item[..4]).get_u32() as usize;
        if declared != item.len() {
            return Err(TransportError::InvalidFrame(format!(
                "command_length {} 与实际长度 {} 不一致",
                declared,
                item.len()
            )));
        }
        self.check_len(declared)?;

        dst.extend_from_slice(&item);
        Ok(())
    }
}
