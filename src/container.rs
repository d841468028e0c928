use std::path::Path;

/// Extensions treated as extension containers. All of them hold a zip
/// payload; CRX files prepend a signature header to it.
pub const CONTAINER_EXTENSIONS: &[&str] = &["crx", "xpi", "zip"];

/// Magic bytes opening a CRX signature header.
const CRX_MAGIC: &[u8; 4] = b"Cr24";

/// Errors from sizing a container's signature header.
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    #[error("CRX header truncated at {0} bytes")]
    Truncated(usize),

    #[error("unsupported CRX version {0}")]
    UnsupportedVersion(u32),

    #[error("CRX header claims {claimed} bytes but the file holds {actual}")]
    HeaderOverrun { claimed: usize, actual: usize },
}

/// Whether a path looks like an extension container, by extension.
pub fn is_container_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            CONTAINER_EXTENSIONS.iter().any(|c| *c == ext)
        })
        .unwrap_or(false)
}

/// Byte offset of the zip payload within a container file.
///
/// XPI and plain zip start at 0. CRX2 lays out magic, version, public-key
/// length, signature length, then both blobs; CRX3 lays out magic, version,
/// and one protobuf header with its length.
pub fn zip_payload_offset(data: &[u8]) -> Result<usize, ContainerError> {
    if !data.starts_with(CRX_MAGIC) {
        return Ok(0);
    }

    let version = le_u32(data, 4).ok_or(ContainerError::Truncated(data.len()))?;
    let offset = match version {
        2 => {
            let key_len = le_u32(data, 8).ok_or(ContainerError::Truncated(data.len()))?;
            let sig_len = le_u32(data, 12).ok_or(ContainerError::Truncated(data.len()))?;
            16usize + key_len as usize + sig_len as usize
        }
        3 => {
            let header_len = le_u32(data, 8).ok_or(ContainerError::Truncated(data.len()))?;
            12usize + header_len as usize
        }
        other => return Err(ContainerError::UnsupportedVersion(other)),
    };

    if offset > data.len() {
        return Err(ContainerError::HeaderOverrun { claimed: offset, actual: data.len() });
    }
    Ok(offset)
}

fn le_u32(data: &[u8], at: usize) -> Option<u32> {
    let bytes: [u8; 4] = data.get(at..at + 4)?.try_into().ok()?;
    Some(u32::from_le_bytes(bytes))
}
