
use crate::constants::WORD_SIZE;
use crate::mem::WriteU16;

use std::fmt;
use std::io::Write;

use delegate::delegate;
use derive_more::IsVariant;
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::{FromPrimitive, ToPrimitive};

// Every instruction starts with a header word: bits 15..10 hold the opcode
// field, bits 9..0 operand A. The opcode field is the 4-bit base op plus the
// width flag (bit 4, set for byte width) and the imm flag (bit 5).
pub const OPERAND_BITS: usize = 10; // The older toolchain variant used 12.
pub const OPERAND_MASK: u16 = (1u16 << OPERAND_BITS) - 1;

const BASE_MASK: u16 = 0xF;
const WIDTH_FLAG: u16 = 1 << 4;
const IMM_FLAG: u16 = 1 << 5;

pub fn operand_a(header: u16) -> u16 {
    header & OPERAND_MASK
}

fn op_field(header: u16) -> u16 {
    header >> OPERAND_BITS
}

pub fn has_imm_flag(header: u16) -> bool {
    op_field(header) & IMM_FLAG != 0
}

fn imm_bit(imm: bool) -> u16 {
    if imm { IMM_FLAG } else { 0 }
}

fn imm_suffix(imm: bool) -> &'static str {
    if imm { "i" } else { "" }
}

pub trait InsVariant<Opcode: FromPrimitive> {
    fn decode_opcode(header: u16) -> Option<Opcode> {
        Opcode::from_u16(op_field(header) & BASE_MASK)
    }
}


////////////////////////////////////////////////////////////////////////////////


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    Word,
    Byte,
}

impl Width {
    pub fn bytes(self) -> u16 {
        match self {
            Width::Word => 2,
            Width::Byte => 1,
        }
    }

    pub fn bits(self) -> u32 {
        self.bytes() as u32 * 8
    }

    pub fn mask(self) -> u32 {
        match self {
            Width::Word => 0xffff,
            Width::Byte => 0xff,
        }
    }

    pub fn from_header(header: u16) -> Width {
        if op_field(header) & WIDTH_FLAG == 0 {
            Width::Word
        } else {
            Width::Byte
        }
    }

    fn flag(self) -> u16 {
        match self {
            Width::Word => 0,
            Width::Byte => WIDTH_FLAG,
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            Width::Word => "",
            Width::Byte => "b",
        }
    }
}

////////////////////////////////////////////////////////////////////////////////

#[macro_export]
macro_rules! move_ins {
    ($op:ident, $width:ident, $imm:expr, $dst:expr, $src:expr) => {
        Ins::Move(MoveIns {
            op: MoveOpcode::$op,
            width: Width::$width,
            imm: $imm,
            dst: $dst,
            src: $src,
        })
    };
}

// The halt sentinel is a byte move of 0 to address 0.
#[macro_export]
macro_rules! halt_ins {
    () => {
        Ins::Move(MoveIns {
            op: MoveOpcode::Mvi,
            width: Width::Byte,
            imm: false,
            dst: 0,
            src: 0,
        })
    };
}

#[derive(Debug, Clone, Copy, FromPrimitive, ToPrimitive, PartialEq, Eq)]
pub enum MoveOpcode {
    Mvi = 0x0,
    Mv = 0x1,
    Mvd = 0x2,
}

impl fmt::Display for MoveOpcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", format!("{:?}", self).to_lowercase())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveIns {
    pub op: MoveOpcode,
    pub width: Width,
    pub imm: bool,
    pub dst: u16,
    pub src: u16,
}

impl InsVariant<MoveOpcode> for MoveIns {}

impl MoveIns {
    pub fn size(&self) -> u16 {
        2 * WORD_SIZE
    }

    pub fn is_halt(&self) -> bool {
        self.op == MoveOpcode::Mvi
            && self.width == Width::Byte
            && !self.imm
            && self.dst == 0
            && self.src == 0
    }

    pub fn header(&self) -> u16 {
        assert_eq!(self.dst & !OPERAND_MASK, 0, "dst out of operand range");
        let op = self.op.to_u16().unwrap() | self.width.flag() | imm_bit(self.imm);
        (op << OPERAND_BITS) | self.dst
    }

    pub fn emit(&self, out: &mut impl Write) {
        out.write_u16(self.header());
        out.write_u16(self.src);
    }
}

impl fmt::Display for MoveIns {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}{}{}\t{:#x}, {:#x}",
            self.op,
            self.width.suffix(),
            imm_suffix(self.imm),
            self.dst,
            self.src
        )
    }
}

////////////////////////////////////////////////////////////////////////////////

#[macro_export]
macro_rules! alu_ins {
    ($op:ident, $width:ident, $imm:expr, $dst:expr, $src:expr) => {
        Ins::Alu(AluIns {
            op: AluOpcode::$op,
            width: Width::$width,
            imm: $imm,
            dst: $dst,
            src: $src,
        })
    };
}

#[derive(Debug, Clone, Copy, FromPrimitive, ToPrimitive, PartialEq, Eq)]
pub enum AluOpcode {
    And = 0x3,
    Or = 0x4,
    Xor = 0x5,
    Add = 0x6,
    Sub = 0x7,
    Shr = 0x8,
    Shl = 0x9,
    Sha = 0xA,
}

impl fmt::Display for AluOpcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", format!("{:?}", self).to_lowercase())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AluIns {
    pub op: AluOpcode,
    pub width: Width,
    pub imm: bool,
    pub dst: u16,
    pub src: u16,
}

impl InsVariant<AluOpcode> for AluIns {}

impl AluIns {
    pub fn size(&self) -> u16 {
        2 * WORD_SIZE
    }

    pub fn header(&self) -> u16 {
        assert_eq!(self.dst & !OPERAND_MASK, 0, "dst out of operand range");
        let op = self.op.to_u16().unwrap() | self.width.flag() | imm_bit(self.imm);
        (op << OPERAND_BITS) | self.dst
    }

    pub fn emit(&self, out: &mut impl Write) {
        out.write_u16(self.header());
        out.write_u16(self.src);
    }
}

impl fmt::Display for AluIns {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}{}{}\t{:#x}, {:#x}",
            self.op,
            self.width.suffix(),
            imm_suffix(self.imm),
            self.dst,
            self.src
        )
    }
}

////////////////////////////////////////////////////////////////////////////////

#[macro_export]
macro_rules! branch_ins {
    ($op:ident, $imm:expr, $lhs:expr, $rhs:expr, $target:expr) => {
        Ins::Branch(BranchIns {
            op: BranchOpcode::$op,
            width: Width::Word,
            imm: $imm,
            lhs: $lhs,
            rhs: $rhs,
            target: $target,
        })
    };
}

// The imm flag doubles as the relaxed-predicate flag: jl/jb become <=,
// jg/ja become >=, jq becomes !=.
#[derive(Debug, Clone, Copy, FromPrimitive, ToPrimitive, PartialEq, Eq)]
pub enum BranchOpcode {
    Jl = 0xB,
    Jg = 0xC,
    Jb = 0xD,
    Ja = 0xE,
    Jq = 0xF,
}

impl fmt::Display for BranchOpcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", format!("{:?}", self).to_lowercase())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BranchIns {
    pub op: BranchOpcode,
    pub width: Width, // Decoded and displayed; comparisons are always 16-bit.
    pub imm: bool,
    pub lhs: u16,
    pub rhs: u16,
    pub target: u16,
}

impl InsVariant<BranchOpcode> for BranchIns {}

impl BranchIns {
    pub fn size(&self) -> u16 {
        3 * WORD_SIZE
    }

    pub fn header(&self) -> u16 {
        assert_eq!(self.lhs & !OPERAND_MASK, 0, "lhs out of operand range");
        let op = self.op.to_u16().unwrap() | self.width.flag() | imm_bit(self.imm);
        (op << OPERAND_BITS) | self.lhs
    }

    pub fn emit(&self, out: &mut impl Write) {
        out.write_u16(self.header());
        out.write_u16(self.rhs);
        out.write_u16(self.target);
    }
}

impl fmt::Display for BranchIns {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}{}{}\t{:#x}, {:#x}, {:#x}",
            self.op,
            self.width.suffix(),
            imm_suffix(self.imm),
            self.lhs,
            self.rhs,
            self.target
        )
    }
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Copy, PartialEq, Eq, IsVariant)]
pub enum Ins {
    Move(MoveIns),
    Alu(AluIns),
    Branch(BranchIns),
}

impl Ins {
    delegate! {
        to match self {
            Ins::Move(x) => x,
            Ins::Alu(x) => x,
            Ins::Branch(x) => x,
        } {
            pub fn size(&self) -> u16;
            pub fn header(&self) -> u16;
            pub fn emit(&self, out: &mut impl Write);
        }
    }
}

impl fmt::Display for Ins {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Ins::Move(ins) => write!(f, "{ins}"),
            Ins::Alu(ins) => write!(f, "{ins}"),
            Ins::Branch(ins) => write!(f, "{ins}"),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
