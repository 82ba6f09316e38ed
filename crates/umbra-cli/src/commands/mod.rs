pub mod blob;
pub mod hex_utils;
pub mod hexdump;
pub mod inspect;

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result};

/// Load a RAM dump into a host-style shared buffer the accessor can
/// attach to.
pub(crate) fn load_dump(path: &Path) -> Result<Rc<RefCell<Vec<u8>>>> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read dump {}", path.display()))?;
    tracing::debug!("Loaded {} byte dump from {}", bytes.len(), path.display());
    Ok(Rc::new(RefCell::new(bytes)))
}
