// Copyright (c) canopy-db.org 2026
// This file is licensed under the Apache-2.0 license

use crate::record::Record;
use crate::{Error, Result};
use canopy_base::{Attribute, Id};
use std::borrow::Cow;
use std::fmt;
use std::ptr::NonNull;

/// Payload bytes a near value can hold without a separate allocation.
pub const NEAR_CAPACITY: usize = 8;

/// Destructor hook run over owned buffer bytes when the payload is
/// finalized.
pub type DataDrop = fn(&mut [u8]);

/// A record's payload: a small tagged value, an owned byte buffer, or an
/// external resource mediated by a library record.
pub struct Data {
    pub domain: Id,
    pub tag: Id,
    pub attribute: Attribute,
    /// Embedder-defined encoding discriminator; the engine never interprets
    /// payload bytes.
    pub encoding: u8,
    writable: bool,
    payload: Payload,
}

enum Payload {
    /// In-struct value of up to [`NEAR_CAPACITY`] bytes.
    Near { bytes: [u8; NEAR_CAPACITY], size: u8 },
    /// Byte buffer; borrowed bytes are factual and never written through.
    Buffer { bytes: Cow<'static, [u8]>, on_drop: Option<DataDrop> },
    /// External resource handle mediated by a library record.
    Handle { resource: NonNull<Record>, library: NonNull<Record> },
    /// As handle, but with read/write semantics delegated to the library.
    Stream { resource: NonNull<Record>, library: NonNull<Record> },
}

impl Data {
    /// Inline value of at most [`NEAR_CAPACITY`] bytes.
    ///
    /// # Panics
    ///
    /// Panics when `value` exceeds the near capacity; larger payloads take
    /// the [`Data::buffer`] path.
    pub fn near(domain: Id, tag: Id, value: &[u8]) -> Data {
        assert!(value.len() <= NEAR_CAPACITY, "near value of {} bytes", value.len());
        let mut bytes = [0u8; NEAR_CAPACITY];
        bytes[..value.len()].copy_from_slice(value);
        Data {
            domain,
            tag,
            attribute: Attribute::NONE,
            encoding: 0,
            writable: true,
            payload: Payload::Near { bytes, size: value.len() as u8 },
        }
    }

    /// Owned heap buffer.
    pub fn buffer(domain: Id, tag: Id, bytes: Vec<u8>) -> Data {
        Data {
            domain,
            tag,
            attribute: Attribute::NONE,
            encoding: 0,
            writable: true,
            payload: Payload::Buffer { bytes: Cow::Owned(bytes), on_drop: None },
        }
    }

    /// Borrowed static bytes; no copy is taken, the payload is marked
    /// factual and rejects writes.
    pub fn borrowed(domain: Id, tag: Id, bytes: &'static [u8]) -> Data {
        Data {
            domain,
            tag,
            attribute: Attribute::FACTUAL,
            encoding: 0,
            writable: false,
            payload: Payload::Buffer { bytes: Cow::Borrowed(bytes), on_drop: None },
        }
    }

    /// External resource handle; lifetime stays with the library.
    pub fn handle(domain: Id, tag: Id, resource: &Record, library: &Record) -> Data {
        Data {
            domain,
            tag,
            attribute: Attribute::NONE,
            encoding: 0,
            writable: true,
            payload: Payload::Handle { resource: NonNull::from(resource), library: NonNull::from(library) },
        }
    }

    /// External stream; reads and writes are delegated to the library.
    pub fn stream(domain: Id, tag: Id, resource: &Record, library: &Record) -> Data {
        Data {
            domain,
            tag,
            attribute: Attribute::NONE,
            encoding: 0,
            writable: true,
            payload: Payload::Stream { resource: NonNull::from(resource), library: NonNull::from(library) },
        }
    }

    #[must_use]
    pub fn with_encoding(mut self, encoding: u8) -> Data {
        self.encoding = encoding;
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, attribute: Attribute) -> Data {
        self.attribute = self.attribute.with(attribute);
        self
    }

    /// Installs the destructor hook run over the buffer bytes at finalize.
    ///
    /// # Panics
    ///
    /// Panics on non-buffer payloads; near values and handles have nothing
    /// for a destructor to release.
    #[must_use]
    pub fn with_destructor(mut self, hook: DataDrop) -> Data {
        match &mut self.payload {
            Payload::Buffer { on_drop, .. } => *on_drop = Some(hook),
            _ => panic!("destructor on a non-buffer payload"),
        }
        self
    }

    pub fn writable(&self) -> bool {
        self.writable && !self.attribute.contains(Attribute::FACTUAL)
    }

    /// Freezes the payload; no further writes succeed.
    pub fn seal(&mut self) {
        self.writable = false;
        self.attribute = self.attribute.with(Attribute::FACTUAL);
    }

    /// The payload bytes. `None` for handles and streams, whose content
    /// lives behind the library record.
    pub fn bytes(&self) -> Option<&[u8]> {
        match &self.payload {
            Payload::Near { bytes, size } => Some(&bytes[..*size as usize]),
            Payload::Buffer { bytes, .. } => Some(bytes),
            Payload::Handle { .. } | Payload::Stream { .. } => None,
        }
    }

    /// Copies up to `dest.len()` payload bytes into `dest`, returning the
    /// copied length.
    pub fn read_into(&self, dest: &mut [u8]) -> Option<usize> {
        let bytes = self.bytes()?;
        let n = bytes.len().min(dest.len());
        dest[..n].copy_from_slice(&bytes[..n]);
        Some(n)
    }

    /// Size of the payload in bytes; zero for handles and streams.
    pub fn size(&self) -> usize {
        self.bytes().map_or(0, <[u8]>::len)
    }

    /// Writable capacity: the near slot for near values, the current
    /// allocation for owned buffers.
    pub fn capacity(&self) -> usize {
        match &self.payload {
            Payload::Near { .. } => NEAR_CAPACITY,
            Payload::Buffer { bytes: Cow::Owned(bytes), .. } => bytes.capacity(),
            Payload::Buffer { bytes: Cow::Borrowed(bytes), .. } => bytes.len(),
            Payload::Handle { .. } | Payload::Stream { .. } => 0,
        }
    }

    /// The resource and library records of a handle or stream payload.
    pub fn resource(&self) -> Option<(&Record, &Record)> {
        match &self.payload {
            Payload::Handle { resource, library } | Payload::Stream { resource, library } => {
                // Contract: the library keeps both records alive for the
                // lifetime of the payload.
                unsafe { Some((resource.as_ref(), library.as_ref())) }
            }
            _ => None,
        }
    }

    /// Overwrites the payload in place; the size may shrink or grow up to
    /// the capacity.
    pub fn update(&mut self, value: &[u8]) -> Result<()> {
        if !self.writable() {
            return Err(Error::NotWritable);
        }
        match &mut self.payload {
            Payload::Near { bytes, size } => {
                if value.len() > NEAR_CAPACITY {
                    return Err(Error::Capacity { needed: value.len(), capacity: NEAR_CAPACITY });
                }
                bytes.fill(0);
                bytes[..value.len()].copy_from_slice(value);
                *size = value.len() as u8;
                Ok(())
            }
            Payload::Buffer { bytes, .. } => {
                let owned = bytes.to_mut();
                let capacity = owned.capacity();
                if value.len() > capacity {
                    return Err(Error::Capacity { needed: value.len(), capacity });
                }
                owned.clear();
                owned.extend_from_slice(value);
                Ok(())
            }
            Payload::Handle { .. } | Payload::Stream { .. } => Err(Error::NotWritable),
        }
    }

    /// Replaces an owned buffer wholesale, transferring ownership of
    /// `value` in and dropping the previous allocation; capacity follows
    /// the new buffer.
    pub fn update_swap(&mut self, value: Vec<u8>) -> Result<()> {
        if !self.writable() {
            return Err(Error::NotWritable);
        }
        match &mut self.payload {
            Payload::Buffer { bytes, .. } => {
                *bytes = Cow::Owned(value);
                Ok(())
            }
            _ => Err(Error::NotWritable),
        }
    }

    /// Zeroes the payload bytes without releasing the allocation.
    pub fn reset(&mut self) {
        match &mut self.payload {
            Payload::Near { bytes, size } => {
                bytes.fill(0);
                *size = 0;
            }
            Payload::Buffer { bytes, .. } => {
                if let Cow::Owned(owned) = bytes {
                    owned.fill(0);
                    owned.clear();
                }
            }
            Payload::Handle { .. } | Payload::Stream { .. } => {}
        }
    }

    pub(crate) fn clone_payload(&self) -> Data {
        let payload = match &self.payload {
            Payload::Near { bytes, size } => Payload::Near { bytes: *bytes, size: *size },
            Payload::Buffer { bytes, on_drop } => {
                Payload::Buffer { bytes: bytes.clone(), on_drop: *on_drop }
            }
            Payload::Handle { resource, library } => {
                Payload::Handle { resource: *resource, library: *library }
            }
            Payload::Stream { resource, library } => {
                Payload::Stream { resource: *resource, library: *library }
            }
        };
        Data {
            domain: self.domain,
            tag: self.tag,
            attribute: self.attribute,
            encoding: self.encoding,
            writable: self.writable,
            payload,
        }
    }
}

impl Drop for Data {
    fn drop(&mut self) {
        if let Payload::Buffer { bytes: Cow::Owned(owned), on_drop: Some(hook) } = &mut self.payload {
            hook(owned);
        }
    }
}

impl fmt::Debug for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.payload {
            Payload::Near { .. } => "near",
            Payload::Buffer { .. } => "buffer",
            Payload::Handle { .. } => "handle",
            Payload::Stream { .. } => "stream",
        };
        f.debug_struct("Data")
            .field("domain", &self.domain)
            .field("tag", &self.tag)
            .field("kind", &kind)
            .field("size", &self.size())
            .field("writable", &self.writable())
            .finish()
    }
}
