pub mod emulator;
pub mod errors;
pub mod io;
pub mod memory;

pub use emulator::{Emulator, ExecRet};
pub use errors::EmuError;
pub use memory::Memory;
