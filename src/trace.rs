//! # trace
//!
//! Optional diagnostics. An `Observer` attached to the interpreter sees every
//! executed instruction and every address the program uses as a code or data
//! entry point; the interpreter behaves the same with or without one.
//!
//! `disassemble` is the static counterpart, for listing a ROM without running
//! it.
use crate::instruction::{Instruction, Opcode};
use crate::state::Registers;
use log::trace;
use std::collections::BTreeSet;
use std::fmt::Write;

/// one executed instruction
#[derive(Debug, Clone, Copy)]
pub struct StepRecord<'a> {
    /// where it was fetched from
    pub addr: u16,
    pub opcode: Opcode,
    pub instruction: Instruction,
    /// after execution
    pub registers: &'a Registers,
}

pub trait Observer {
    fn on_step(&mut self, step: &StepRecord);

    /// a jump, call or index target; recorded even if the instruction then
    /// failed
    fn on_entry_point(&mut self, addr: u16);
}

/// deduplicated, ordered set of entry points
#[derive(Debug, Clone, Default)]
pub struct EntryPoints(BTreeSet<u16>);

impl EntryPoints {
    pub fn new() -> Self {
        EntryPoints::default()
    }

    /// true if `addr` wasn't already known
    pub fn insert(&mut self, addr: u16) -> bool {
        self.0.insert(addr)
    }

    pub fn contains(&self, addr: u16) -> bool {
        self.0.contains(&addr)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.0.iter().copied()
    }
}

/// writes one `trace!` line per step, `@` marking instructions that sit on a
/// known entry point
#[derive(Debug, Default)]
pub struct LogTracer {
    entry_points: EntryPoints,
    steps: u64,
}

impl LogTracer {
    pub fn new() -> Self {
        LogTracer::default()
    }

    pub fn entry_points(&self) -> &EntryPoints {
        &self.entry_points
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }
}

impl Observer for LogTracer {
    fn on_step(&mut self, step: &StepRecord) {
        self.steps += 1;
        let marker = if self.entry_points.contains(step.addr) { '@' } else { ' ' };
        let r = step.registers;
        trace!(
            "{}{:04x}: {:04x}  {:<20} i={:04x} v={:02x?}",
            marker,
            step.addr,
            step.opcode.0,
            step.instruction.to_string(),
            r.index,
            r.v
        );
    }

    fn on_entry_point(&mut self, addr: u16) {
        self.entry_points.insert(addr);
    }
}

/// a listing of `program` as if loaded at `base`. every jump, call and index
/// target gets an `L_XXXX` label, and lines at a labelled address carry it.
/// words that aren't instructions are shown as `.word`, a trailing odd byte
/// as `.byte`
pub fn disassemble(program: &[u8], base: u16) -> String {
    let words: Vec<(u16, Opcode)> = program
        .chunks_exact(2)
        .enumerate()
        .map(|(i, w)| (base.wrapping_add((2 * i) as u16), Opcode::from_bytes(w[0], w[1])))
        .collect();

    let mut labels = EntryPoints::new();
    for (_, op) in &words {
        if let Some(target) = Instruction::decode(*op).and_then(|i| i.target()) {
            labels.insert(target);
        }
    }

    let mut out = String::new();
    for (addr, op) in &words {
        let label = if labels.contains(*addr) {
            format!("L_{:04X}:", addr)
        } else {
            String::new()
        };
        let text = match Instruction::decode(*op) {
            Some(i) => match i.target() {
                Some(t) => labelled(&i, t),
                None => i.to_string(),
            },
            None => format!(".word {:#06x}", op.0),
        };
        // writing to a String can't fail
        let _ = writeln!(out, "{:<8}{:04x}  {:04x}  {}", label, addr, op.0, text);
    }
    if let [.., last] = program {
        if program.len() % 2 == 1 {
            let addr = base.wrapping_add((program.len() - 1) as u16);
            let _ = writeln!(out, "{:<8}{:04x}  {:02x}    .byte {:#04x}", "", addr, last, last);
        }
    }
    out
}

// swap the numeric target in a mnemonic for its label
fn labelled(instruction: &Instruction, target: u16) -> String {
    instruction
        .to_string()
        .replace(&format!("{:#05x}", target), &format!("L_{:04X}", target))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_points_dedup_and_order() {
        let mut e = EntryPoints::new();
        assert!(e.insert(0x300));
        assert!(e.insert(0x210));
        assert!(!e.insert(0x300));
        assert_eq!(e.iter().collect::<Vec<_>>(), vec![0x210, 0x300]);
        assert_eq!(e.len(), 2);
    }

    #[test]
    fn test_log_tracer_counts_steps() {
        let mut t = LogTracer::new();
        let regs = Registers::default();
        t.on_entry_point(0x200);
        t.on_step(&StepRecord {
            addr: 0x200,
            opcode: Opcode(0x00e0),
            instruction: Instruction::ClearScreen,
            registers: &regs,
        });
        assert_eq!(t.steps(), 1);
        assert!(t.entry_points().contains(0x200));
    }

    #[test]
    fn test_disassemble_labels_targets() {
        // 0x200: call 0x206, 0x202: jp 0x202, 0x204: junk, 0x206: ret
        let listing = disassemble(&[0x22, 0x06, 0x12, 0x02, 0xff, 0xff, 0x00, 0xee], 0x200);
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].ends_with("call L_0206"));
        assert!(lines[1].starts_with("L_0202:"));
        assert!(lines[1].ends_with("jp   L_0202"));
        assert!(lines[2].ends_with(".word 0xffff"));
        assert!(lines[3].starts_with("L_0206:"));
        assert!(lines[3].ends_with("ret"));
    }

    #[test]
    fn test_disassemble_wraps_past_address_space() {
        let listing = disassemble(&vec![0; 0x10002], 0x200);
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines.len(), 0x8001);
        assert!(lines[0x7f00].contains("0000  0000  nop"));
        assert!(lines[0x8000].contains("0200  0000  nop"));
    }

    #[test]
    fn test_disassemble_odd_length() {
        let listing = disassemble(&[0x60, 0x05, 0x7f], 0x200);
        let lines: Vec<&str> = listing.lines().collect();
        assert!(lines[0].ends_with("ld   v0, 0x05"));
        assert!(lines[1].contains("0202"));
        assert!(lines[1].ends_with(".byte 0x7f"));
    }
}
