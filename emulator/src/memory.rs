use std::sync::Arc;

use log::trace;

use common::constants::*;
use common::misc::IsEven;

use crate::errors::EmuError;
use crate::io::console::{Console, StdConsole};

// The single 65536-byte store, with the stdin/stdout ports dispatched on the
// byte paths. Word access enforces alignment and goes through the byte paths
// so that a word touching a port follows the per-byte rules.
pub struct Memory {
    mem: Vec<u8>,
    console: Arc<dyn Console>,
}

impl Memory {
    pub fn new() -> Memory {
        Self::with_console(Arc::new(StdConsole))
    }

    pub fn with_console(console: Arc<dyn Console>) -> Memory {
        let mut mem = Memory {
            mem: vec![0; MEM_SIZE],
            console,
        };
        mem.poke_word(REG_IP, CODE_START);
        mem.poke_word(REG_SP, STACK_INIT);
        mem.poke_word(REG_BP, STACK_INIT);
        mem
    }

    pub fn load_image(&mut self, image: &[u8], origin: u16) -> Result<(), EmuError> {
        let origin = origin as usize;
        if image.len() + origin > MEM_SIZE {
            return Err(EmuError::ImageTooLarge {
                len: image.len(),
                origin: origin as u16,
            });
        }
        self.mem[origin..origin + image.len()].copy_from_slice(image);
        Ok(())
    }

    // Initial register install; not an architectural access.
    fn poke_word(&mut self, addr: u16, val: u16) {
        self.mem[addr as usize] = val as u8;
        self.mem[addr as usize + 1] = (val >> 8) as u8;
    }

    pub fn read_byte(&mut self, addr: u16) -> Result<u8, EmuError> {
        if addr == STDIN_PORT {
            let val = self.console.poll_input()?.unwrap_or(EOF_SENTINEL);
            trace!("mem: stdin port read {val:#04x}");
            return Ok(val);
        }
        Ok(self.mem[addr as usize])
    }

    pub fn write_byte(&mut self, addr: u16, val: u8) -> Result<(), EmuError> {
        if addr == STDOUT_PORT {
            self.console.handle_output(val)?;
        }
        trace!("mem: write {val:#04x} to {addr:#06x} (byte)");
        self.mem[addr as usize] = val;
        Ok(())
    }

    pub fn read_word(&mut self, addr: u16) -> Result<u16, EmuError> {
        if !addr.is_even() {
            return Err(EmuError::UnalignedRead { addr });
        }
        let lower = self.read_byte(addr)? as u16;
        let upper = self.read_byte(addr + 1)? as u16;
        Ok(lower | (upper << u8::BITS))
    }

    pub fn write_word(&mut self, addr: u16, val: u16) -> Result<(), EmuError> {
        if !addr.is_even() {
            return Err(EmuError::UnalignedWrite { addr });
        }
        self.write_byte(addr, val as u8)?;
        self.write_byte(addr + 1, (val >> u8::BITS) as u8)
    }

    // The framebuffer window as pixel words, for a PixelSink.
    pub fn screen(&self) -> Vec<u16> {
        self.mem[SCREEN_START as usize..SCREEN_END as usize]
            .chunks_exact(2)
            .map(|b| u16::from_le_bytes([b[0], b[1]]))
            .collect()
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}
