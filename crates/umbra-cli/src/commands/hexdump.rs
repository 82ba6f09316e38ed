//! Hexdump command implementation.
//!
//! Displays raw dump bytes in traditional hexdump format, useful for
//! verifying layout profile offsets against a captured RAM image.
//!
//! # Output Format
//!
//! ```text
//! 0x000: 48 65 6C 6C 6F 20 57 6F  72 6C 64 00 00 00 00 00  |Hello World.....|
//! ```

use std::path::Path;

use anyhow::Result;
use umbra_core::{AddressSpace, MemoryAccessor, ReadMemory};

use crate::commands::load_dump;

/// Run the hexdump command
pub fn run(dump: &Path, address: u64, size: usize, ascii: bool) -> Result<()> {
    let ram = load_dump(dump)?;
    let accessor = MemoryAccessor::new(AddressSpace::attach(&ram));
    let bytes = accessor.read_bytes(address, size)?;

    println!("Hexdump at 0x{:X} ({} bytes):", address, size);
    println!();

    for (i, chunk) in bytes.chunks(16).enumerate() {
        let offset = i * 16;
        print!("0x{:03X}: ", offset);

        // Hex bytes
        for (j, byte) in chunk.iter().enumerate() {
            if j == 8 {
                print!(" ");
            }
            print!("{:02X} ", byte);
        }

        // Padding for incomplete lines
        if chunk.len() < 16 {
            for j in chunk.len()..16 {
                if j == 8 {
                    print!(" ");
                }
                print!("   ");
            }
        }

        // ASCII representation
        if ascii {
            print!(" |");
            for byte in chunk {
                if *byte >= 0x20 && *byte < 0x7F {
                    print!("{}", *byte as char);
                } else {
                    print!(".");
                }
            }
            for _ in chunk.len()..16 {
                print!(" ");
            }
            print!("|");
        }

        println!();
    }

    Ok(())
}
