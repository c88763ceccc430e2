use crate::frame::{HttpMeta, RespMeta};
use crate::header::FrameType;
use crate::Error;
use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub(crate) enum PendingMeta {
    Request(HttpMeta),
    Response(RespMeta),
    None,
}

/// Per-`request_id` chunk accumulator. Tolerates out-of-order chunk
/// arrival; completes when either `chunk_total` chunks have been seen
/// or a `final_chunk` flag arrives.
#[derive(Debug)]
pub(crate) struct ReassemblyBuffer {
    frame_type: FrameType,
    chunks: BTreeMap<u32, Vec<u8>>,
    chunk_total: Option<u32>,
    final_seen: bool,
    body_crc32: Option<u32>,
    meta: PendingMeta,
    last_touched: Instant,
}

impl ReassemblyBuffer {
    fn new(frame_type: FrameType) -> Self {
        Self {
            frame_type,
            chunks: BTreeMap::new(),
            chunk_total: None,
            final_seen: false,
            body_crc32: None,
            meta: PendingMeta::None,
            last_touched: Instant::now(),
        }
    }

    fn is_complete(&self) -> bool {
        if self.final_seen {
            return true;
        }
        match self.chunk_total {
            Some(total) => self.chunks.len() as u32 >= total,
            None => false,
        }
    }

    /// Concatenates chunk value slices in ascending index order.
    fn assemble_body(&self) -> Vec<u8> {
        let mut body = Vec::new();
        for chunk in self.chunks.values() {
            body.extend_from_slice(chunk);
        }
        body
    }
}

/// A completed logical frame produced once a chunk sequence finishes.
pub struct Reassembled {
    pub frame_type: FrameType,
    pub meta: PendingMeta,
    pub body: Vec<u8>,
    pub body_crc32: u32,
}

/// Tracks one [`ReassemblyBuffer`] per in-flight `request_id`, garbage
/// collecting buffers idle past `idle_ttl` (300s by default, the
/// `reassembly_idle_ttl` config value).
pub struct Reassembler {
    buffers: HashMap<Uuid, ReassemblyBuffer>,
    idle_ttl: Duration,
}

impl Reassembler {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            buffers: HashMap::new(),
            idle_ttl,
        }
    }

    /// Merges one chunk frame's body slice into the buffer for
    /// `request_id`, returning `Some` once the sequence completes.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn accept_chunk(
        &mut self,
        request_id: Uuid,
        frame_type: FrameType,
        chunk_index: u32,
        chunk_total: Option<u32>,
        final_chunk: bool,
        body_crc32: u32,
        value: Vec<u8>,
        meta: PendingMeta,
    ) -> Result<Option<Reassembled>, Error> {
        let buffer = self
            .buffers
            .entry(request_id)
            .or_insert_with(|| ReassemblyBuffer::new(frame_type));
        buffer.last_touched = Instant::now();

        if let Some(total) = chunk_total {
            buffer.chunk_total = Some(total);
            if chunk_index >= total {
                self.buffers.remove(&request_id);
                return Err(Error::ChunkIndexOutOfRange {
                    index: chunk_index,
                    total,
                });
            }
        } else if let Some(total) = buffer.chunk_total {
            if chunk_index >= total {
                self.buffers.remove(&request_id);
                return Err(Error::ChunkIndexOutOfRange {
                    index: chunk_index,
                    total,
                });
            }
        }

        if buffer.chunks.contains_key(&chunk_index) {
            self.buffers.remove(&request_id);
            return Err(Error::DuplicateChunkIndex(chunk_index));
        }

        buffer.chunks.insert(chunk_index, value);
        if final_chunk {
            buffer.final_seen = true;
        }
        if buffer.body_crc32.is_none() {
            buffer.body_crc32 = Some(body_crc32);
        }
        if !matches!(meta, PendingMeta::None) {
            buffer.meta = meta;
        }

        if buffer.is_complete() {
            let buffer = self.buffers.remove(&request_id).unwrap();
            let body = buffer.assemble_body();
            let expected_crc = buffer.body_crc32.unwrap_or(body_crc32);
            if crate::header::crc32(&body) != expected_crc {
                return Err(Error::BodyCrcMismatch);
            }
            Ok(Some(Reassembled {
                frame_type: buffer.frame_type,
                meta: buffer.meta,
                body,
                body_crc32: expected_crc,
            }))
        } else {
            Ok(None)
        }
    }

    /// Drops buffers whose last chunk arrived more than `idle_ttl` ago,
    /// returning the `request_id`s whose pending slot must now fail
    /// with [`Error::ReassemblyTimeout`].
    pub fn sweep_idle(&mut self) -> Vec<Uuid> {
        let now = Instant::now();
        let idle_ttl = self.idle_ttl;
        let expired: Vec<Uuid> = self
            .buffers
            .iter()
            .filter(|(_, buf)| now.duration_since(buf.last_touched) > idle_ttl)
            .map(|(id, _)| *id)
            .collect();
        for id in &expired {
            self.buffers.remove(id);
        }
        expired
    }

    pub fn discard(&mut self, request_id: &Uuid) {
        self.buffers.remove(request_id);
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }
}
