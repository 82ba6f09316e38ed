pub mod layout;
mod accessor;

#[cfg(test)]
pub mod mock;

pub use accessor::{AddressSpace, MemoryAccessor, ReadMemory, is_sentinel};

#[cfg(test)]
pub use mock::{MockMemoryBuilder, MockMemoryReader};
