
use common::asm::*;
use common::constants::REG_IP;
use common::decoder::{decode, is_branch_header};

use crate::errors::EmuError;
use crate::io::screen::PixelSink;
use crate::memory::Memory;

use std::sync::Arc;

use delegate::delegate;
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecRet {
    Ok,
    Halt,
}

pub struct Emulator {
    mem: Memory,
    sink: Option<Arc<dyn PixelSink>>,
    trace: bool,
}

impl Emulator {
    pub fn new(mem: Memory) -> Emulator {
        Emulator {
            mem,
            sink: None,
            trace: false,
        }
    }

    // Print each executed instruction to stderr, one line per instruction,
    // prefixed with the pre-execution IP.
    pub fn set_trace(&mut self, trace: bool) {
        self.trace = trace;
    }

    pub fn set_pixel_sink(&mut self, sink: Arc<dyn PixelSink>) {
        self.sink = Some(sink);
    }

    // Hand the screen window to the installed sink, if any.
    pub fn present(&self) {
        if let Some(sink) = &self.sink {
            sink.present_pixels(&self.mem.screen());
        }
    }

    delegate! {
        to self.mem {
            pub fn read_byte(&mut self, addr: u16) -> Result<u8, EmuError>;
            pub fn write_byte(&mut self, addr: u16, val: u8) -> Result<(), EmuError>;
            pub fn read_word(&mut self, addr: u16) -> Result<u16, EmuError>;
            pub fn write_word(&mut self, addr: u16, val: u16) -> Result<(), EmuError>;
        }
    }

    // Run until the halt sentinel.
    pub fn run(&mut self) -> Result<(), EmuError> {
        while self.step()? != ExecRet::Halt {}
        Ok(())
    }

    // Fetch, decode, and execute one instruction.
    pub fn step(&mut self) -> Result<ExecRet, EmuError> {
        let ip = self.mem.read_word(REG_IP)?;
        let ins = self.fetch(ip)?;

        debug!("{ip:#06x}: {ins}");
        if self.trace {
            eprintln!("{ip:#06x}: {ins}");
        }

        // IP moves past the instruction before the effect lands, so a move
        // whose destination is the IP word acts as an absolute jump.
        self.mem.write_word(REG_IP, ip.wrapping_add(ins.size()))?;

        match ins {
            Ins::Move(ins) => self.exec_move(&ins),
            Ins::Alu(ins) => {
                self.exec_alu(&ins)?;
                Ok(ExecRet::Ok)
            }
            Ins::Branch(ins) => {
                self.exec_branch(&ins)?;
                Ok(ExecRet::Ok)
            }
        }
    }

    fn fetch(&mut self, ip: u16) -> Result<Ins, EmuError> {
        let header = self.mem.read_word(ip)?;
        let arg = self.mem.read_word(ip.wrapping_add(2))?;
        let ins = if is_branch_header(header) {
            let target = self.mem.read_word(ip.wrapping_add(4))?;
            decode(&[header, arg, target])
        } else {
            decode(&[header, arg])
        };
        ins.ok_or(EmuError::InvalidInstruction { header, ip })
    }

    ///////////////////////////////////////////////////////////////////////////

    fn load(&mut self, width: Width, addr: u16) -> Result<u32, EmuError> {
        Ok(match width {
            Width::Word => self.mem.read_word(addr)? as u32,
            Width::Byte => self.mem.read_byte(addr)? as u32,
        })
    }

    fn store(&mut self, width: Width, addr: u16, val: u32) -> Result<(), EmuError> {
        match width {
            Width::Word => self.mem.write_word(addr, val as u16),
            Width::Byte => self.mem.write_byte(addr, val as u8),
        }
    }

    fn exec_move(&mut self, ins: &MoveIns) -> Result<ExecRet, EmuError> {
        if ins.is_halt() {
            return Ok(ExecRet::Halt);
        }

        let MoveIns {
            op,
            width,
            imm,
            dst,
            src,
        } = *ins;

        let val = match op {
            MoveOpcode::Mvi => (src as u32) & width.mask(),
            MoveOpcode::Mv => self.load(width, src)?,
            MoveOpcode::Mvd => {
                let ptr = self.mem.read_word(src)?;
                self.load(width, ptr)?
            }
        };

        // The imm flag turns the destination field into a pointer.
        let dst = if imm { self.mem.read_word(dst)? } else { dst };
        self.store(width, dst, val)?;
        Ok(ExecRet::Ok)
    }

    fn exec_alu(&mut self, ins: &AluIns) -> Result<(), EmuError> {
        let AluIns {
            op,
            width,
            imm,
            dst,
            src,
        } = *ins;

        let lhs = self.load(width, dst)?;
        let rhs = if imm {
            (src as u32) & width.mask()
        } else {
            self.load(width, src)?
        };

        use AluOpcode::*;
        let res = match op {
            And => lhs & rhs,
            Or => lhs | rhs,
            Xor => lhs ^ rhs,
            Add => lhs.wrapping_add(rhs),
            Sub => lhs.wrapping_sub(rhs),
            // Shift counts are taken mod the operand width.
            Shr => lhs >> (rhs % width.bits()),
            Shl => lhs << (rhs % width.bits()),
            Sha => (sign_extend(lhs, width) >> (rhs % width.bits())) as u32,
        };

        self.store(width, dst, res & width.mask())
    }

    fn exec_branch(&mut self, ins: &BranchIns) -> Result<(), EmuError> {
        let BranchIns {
            op,
            imm,
            lhs,
            rhs,
            target,
            ..
        } = *ins;

        // Comparisons are always word width.
        let lhs = self.mem.read_word(lhs)?;
        let rhs = if imm { rhs } else { self.mem.read_word(rhs)? };

        use BranchOpcode::*;
        let taken = match (op, imm) {
            (Jl, false) => (lhs as i16) < (rhs as i16),
            (Jl, true) => (lhs as i16) <= (rhs as i16),
            (Jg, false) => (lhs as i16) > (rhs as i16),
            (Jg, true) => (lhs as i16) >= (rhs as i16),
            (Jb, false) => lhs < rhs,
            (Jb, true) => lhs <= rhs,
            (Ja, false) => lhs > rhs,
            (Ja, true) => lhs >= rhs,
            (Jq, false) => lhs == rhs,
            (Jq, true) => lhs != rhs,
        };

        if taken {
            self.mem.write_word(REG_IP, target)?;
        }
        Ok(())
    }
}

fn sign_extend(val: u32, width: Width) -> i32 {
    match width {
        Width::Word => val as u16 as i16 as i32,
        Width::Byte => val as u8 as i8 as i32,
    }
}
