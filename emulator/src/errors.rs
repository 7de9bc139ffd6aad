use thiserror::Error;

// The machine has no architectural exception mechanism, so every one of
// these is fatal: the driver reports it on stderr and exits non-zero.
#[derive(Debug, Error)]
pub enum EmuError {
    #[error("unaligned word read ({addr:#06x})")]
    UnalignedRead { addr: u16 },

    #[error("unaligned word write ({addr:#06x})")]
    UnalignedWrite { addr: u16 },

    #[error("image of {len} bytes does not fit at {origin:#06x}")]
    ImageTooLarge { len: usize, origin: u16 },

    #[error("invalid instruction {header:#06x} at {ip:#06x}")]
    InvalidInstruction { header: u16, ip: u16 },

    #[error("console: {0}")]
    Io(#[from] std::io::Error),
}
