use memmap2::{Mmap, MmapOptions};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};

/// Read-only view on the content of a file
pub trait Buffer: Send + Sync {
    fn data(&'_ self) -> &'_ [u8];

    fn slice(&'_ self, start: usize, end: usize) -> Result<&'_ [u8]> {
        let data = self.data();
        if start > end || end > data.len() {
            return Err(Error::Corrupted(format!(
                "range {}-{} is outside of the {} bytes buffer",
                start,
                end,
                data.len()
            )));
        }
        Ok(&data[start..end])
    }
}

/// Stores the data in memory
pub struct MemoryBuffer {
    data: Vec<u8>,
}

impl MemoryBuffer {
    pub fn new(path: &Path) -> Result<Self> {
        let mut file = File::options().read(true).open(path)?;

        let mut data = Vec::new();
        file.read_to_end(&mut data)?;

        Ok(Self { data })
    }
}

impl Buffer for MemoryBuffer {
    fn data(&'_ self) -> &'_ [u8] {
        &self.data
    }
}

/// Uses a memory map
pub struct MmapBuffer {
    // Empty files are not mapped
    mmap: Option<Mmap>,
}

impl MmapBuffer {
    pub fn new(path: &Path) -> Result<Self> {
        let file = File::options().read(true).open(path)?;
        if file.metadata()?.len() == 0 {
            return Ok(Self { mmap: None });
        }

        // The file is only read, and is not expected to change while mapped
        let mmap = unsafe { MmapOptions::new().map(&file)? };
        Ok(Self { mmap: Some(mmap) })
    }
}

impl Buffer for MmapBuffer {
    fn data(&'_ self) -> &'_ [u8] {
        match &self.mmap {
            Some(mmap) => &mmap[..],
            None => &[],
        }
    }
}

/// Opens `path` in memory or as a memory map
pub fn open_buffer(path: &Path, in_memory: bool) -> Result<Box<dyn Buffer>> {
    let buffer: Box<dyn Buffer> = if in_memory {
        Box::new(MemoryBuffer::new(path)?)
    } else {
        Box::new(MmapBuffer::new(path)?)
    };
    Ok(buffer)
}
