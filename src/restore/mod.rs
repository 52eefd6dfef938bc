//! Reassembling a content from its chunks.

use std::io::Write;

use tracing::info;

use crate::chunk::Digest;
use crate::error::{Error, Result};
use crate::hash::Blake3Hasher;
use crate::store::{Catalog, ContentId};

/// Writes the bytes of `content` to `out` in segment order.
///
/// Every segment must reference a non-empty chunk and sequence numbers must
/// run densely from zero; anything else is [`Error::Corruption`]. With
/// `verify` set, the written bytes must also hash to `expected`.
///
/// Output already written when an error occurs is left in place. Treat the
/// destination as incomplete on any error.
pub fn restore_content<W: Write + ?Sized>(
    catalog: &Catalog<'_>,
    content: ContentId,
    expected: &Digest,
    verify: bool,
    out: &mut W,
) -> Result<u64> {
    let mut hasher = Blake3Hasher::new();
    let mut next = 0u32;
    let mut written = 0u64;

    catalog.for_each_content_chunk(content, |sequence, bytes| {
        if sequence != next {
            return Err(Error::Corruption(format!(
                "content {content} expected segment {next}, found {sequence}"
            )));
        }
        let bytes = match bytes {
            Some(bytes) if !bytes.is_empty() => bytes,
            Some(_) => {
                return Err(Error::Corruption(format!(
                    "content {content} segment {sequence} references an empty chunk"
                )));
            }
            None => {
                return Err(Error::Corruption(format!(
                    "content {content} segment {sequence} references a missing chunk"
                )));
            }
        };

        out.write_all(bytes)?;
        if verify {
            hasher.update(bytes);
        }
        written += bytes.len() as u64;
        next += 1;
        Ok(())
    })?;
    out.flush()?;

    if verify {
        let actual = hasher.finalize();
        if actual != *expected {
            return Err(Error::Corruption(format!(
                "content {content} restored as {actual}, expected {expected}"
            )));
        }
    }

    info!(%content, bytes = written, segments = next, "restored content");
    Ok(written)
}
