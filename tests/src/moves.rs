use common::asm::*;
use common::constants::CODE_START;
use common::{halt_ins, move_ins};

use crate::helpers::run;

#[test]
fn mvi_word() {
    let mut emu = run(&[move_ins!(Mvi, Word, false, 0x010, 0x1234), halt_ins!()]);
    assert_eq!(emu.read_word(0x010).unwrap(), 0x1234);
}

#[test]
fn mvi_byte_truncates() {
    let mut emu = run(&[move_ins!(Mvi, Byte, false, 0x010, 0xAB12), halt_ins!()]);
    assert_eq!(emu.read_byte(0x010).unwrap(), 0x12);
    assert_eq!(emu.read_byte(0x011).unwrap(), 0);
}

#[test]
fn mvi_word_indirect() {
    // The imm flag makes the destination a pointer.
    let mut emu = run(&[
        move_ins!(Mvi, Word, false, 0x010, 0x0200),
        move_ins!(Mvi, Word, true, 0x010, 0xBEEF),
        halt_ins!(),
    ]);
    assert_eq!(emu.read_word(0x0200).unwrap(), 0xBEEF);
    assert_eq!(emu.read_word(0x010).unwrap(), 0x0200);
}

#[test]
fn mvi_byte_indirect() {
    let mut emu = run(&[
        move_ins!(Mvi, Word, false, 0x010, 0x0201),
        move_ins!(Mvi, Byte, true, 0x010, 0xFFAB),
        halt_ins!(),
    ]);
    assert_eq!(emu.read_byte(0x0201).unwrap(), 0xAB);
    assert_eq!(emu.read_byte(0x0200).unwrap(), 0);
    assert_eq!(emu.read_byte(0x0202).unwrap(), 0);
}

#[test]
fn mv_word() {
    let mut emu = run(&[
        move_ins!(Mvi, Word, false, 0x012, 0xCAFE),
        move_ins!(Mv, Word, false, 0x010, 0x012),
        halt_ins!(),
    ]);
    assert_eq!(emu.read_word(0x010).unwrap(), 0xCAFE);
}

#[test]
fn mv_byte() {
    let mut emu = run(&[
        move_ins!(Mvi, Word, false, 0x012, 0xCAFE),
        move_ins!(Mv, Byte, false, 0x010, 0x012),
        halt_ins!(),
    ]);
    // Only the low byte of the source is read and stored.
    assert_eq!(emu.read_word(0x010).unwrap(), 0x00FE);
}

#[test]
fn mv_word_indirect() {
    let mut emu = run(&[
        move_ins!(Mvi, Word, false, 0x012, 0xCAFE),
        move_ins!(Mvi, Word, false, 0x010, 0x0200),
        move_ins!(Mv, Word, true, 0x010, 0x012),
        halt_ins!(),
    ]);
    assert_eq!(emu.read_word(0x0200).unwrap(), 0xCAFE);
}

#[test]
fn mvd_word() {
    // dst <- mem16[mem16[src]]
    let mut emu = run(&[
        move_ins!(Mvi, Word, false, 0x012, 0x0200),
        move_ins!(Mvi, Word, true, 0x012, 0xCAFE),
        move_ins!(Mvd, Word, false, 0x010, 0x012),
        halt_ins!(),
    ]);
    assert_eq!(emu.read_word(0x010).unwrap(), 0xCAFE);
}

#[test]
fn mvd_byte() {
    let mut emu = run(&[
        move_ins!(Mvi, Word, false, 0x012, 0x0200),
        move_ins!(Mvi, Word, true, 0x012, 0xCAFE),
        move_ins!(Mvd, Byte, false, 0x010, 0x012),
        halt_ins!(),
    ]);
    assert_eq!(emu.read_word(0x010).unwrap(), 0x00FE);
}

#[test]
fn halt_stops_execution() {
    // Nothing after the sentinel runs.
    let mut emu = run(&[halt_ins!(), move_ins!(Mvi, Word, false, 0x010, 0xAAAA)]);
    assert_eq!(emu.read_word(0x010).unwrap(), 0);
}

#[test]
fn self_modifying_code() {
    // Rewrite the operand word of the third instruction before it runs.
    let patched = CODE_START + 10;
    let mut emu = run(&[
        move_ins!(Mvi, Word, false, 0x012, patched),
        move_ins!(Mvi, Word, true, 0x012, 0x2222),
        move_ins!(Mvi, Word, false, 0x010, 0x1111),
        halt_ins!(),
    ]);
    assert_eq!(emu.read_word(0x010).unwrap(), 0x2222);
}
