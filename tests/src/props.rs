use proptest::prelude::*;

use common::asm::AluOpcode::*;
use common::asm::Width;
use emu_lib::io::console::PipeConsole;
use emu_lib::{EmuError, Memory};

use std::sync::Arc;

use crate::helpers::run_alu;

fn pipe_mem() -> Memory {
    Memory::with_console(Arc::new(PipeConsole::default()))
}

// Byte ops work on the low byte of the cell and must leave the upper byte
// untouched.
fn byte_result(init: u16, low: u8) -> u16 {
    (init & 0xFF00) | low as u16
}

proptest! {
    #[test]
    fn add_wraps(a in any::<u16>(), b in any::<u16>()) {
        prop_assert_eq!(run_alu(Add, Width::Word, a, b), a.wrapping_add(b));
    }

    #[test]
    fn sub_wraps(a in any::<u16>(), b in any::<u16>()) {
        prop_assert_eq!(run_alu(Sub, Width::Word, a, b), a.wrapping_sub(b));
    }

    #[test]
    fn add_byte_wraps(a in any::<u16>(), b in any::<u16>()) {
        let low = (a as u8).wrapping_add(b as u8);
        prop_assert_eq!(run_alu(Add, Width::Byte, a, b), byte_result(a, low));
    }

    #[test]
    fn sub_byte_wraps(a in any::<u16>(), b in any::<u16>()) {
        let low = (a as u8).wrapping_sub(b as u8);
        prop_assert_eq!(run_alu(Sub, Width::Byte, a, b), byte_result(a, low));
    }

    #[test]
    fn bitwise(a in any::<u16>(), b in any::<u16>()) {
        prop_assert_eq!(run_alu(And, Width::Word, a, b), a & b);
        prop_assert_eq!(run_alu(Or, Width::Word, a, b), a | b);
        prop_assert_eq!(run_alu(Xor, Width::Word, a, b), a ^ b);
    }

    #[test]
    fn shr_count_mod_width(v in any::<u16>(), c in any::<u16>()) {
        prop_assert_eq!(run_alu(Shr, Width::Word, v, c), v >> (c % 16));
    }

    #[test]
    fn shl_count_mod_width(v in any::<u16>(), c in any::<u16>()) {
        let expected = ((v as u32) << (c % 16)) as u16;
        prop_assert_eq!(run_alu(Shl, Width::Word, v, c), expected);
    }

    #[test]
    fn sha_count_mod_width(v in any::<u16>(), c in any::<u16>()) {
        let expected = ((v as i16) >> (c % 16)) as u16;
        prop_assert_eq!(run_alu(Sha, Width::Word, v, c), expected);
    }

    #[test]
    fn sha_byte(v in any::<u16>(), c in any::<u16>()) {
        let low = ((v as u8 as i8) >> (c % 8)) as u8;
        prop_assert_eq!(run_alu(Sha, Width::Byte, v, c), byte_result(v, low));
    }

    #[test]
    fn odd_word_access_fails(addr in any::<u16>().prop_map(|a| a | 1)) {
        let mut mem = pipe_mem();
        prop_assert!(matches!(mem.read_word(addr), Err(EmuError::UnalignedRead { .. })), "expected UnalignedRead");
        prop_assert!(matches!(mem.write_word(addr, 0), Err(EmuError::UnalignedWrite { .. })), "expected UnalignedWrite");
    }

    #[test]
    fn even_word_access_round_trips(addr in (0x0010u16..0xFFFE).prop_map(|a| a & !1), val in any::<u16>()) {
        let mut mem = pipe_mem();
        mem.write_word(addr, val).unwrap();
        prop_assert_eq!(mem.read_word(addr).unwrap(), val);
        // Absent intervening writes, reads are stable.
        prop_assert_eq!(mem.read_word(addr).unwrap(), val);
    }
}
