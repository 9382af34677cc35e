//! Interactive monitor for the emu65 single-board computer.
//!
//! Loads a binary into memory, points the reset vector at it, and
//! drops into a command prompt: stepping, running, memory and register
//! inspection, interrupt injection and serial input.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use emu65_core::Cpu;
use machine_sbc::{Sbc, SbcConfig};

#[derive(Parser)]
#[command(name = "sbc-monitor", about = "6502 emulator monitor")]
struct Args {
    /// Binary image to load.
    program: PathBuf,

    /// Load address / reset target, e.g. 0x8000.
    origin: String,

    /// Emulated clock rate in Hz; 0 runs unpaced.
    #[arg(long, default_value_t = 1_000_000.0)]
    hz: f64,

    /// Do not attach the ACIA at $D000.
    #[arg(long)]
    no_acia: bool,

    /// Do not attach the TIA at $0000 (frees low RAM).
    #[arg(long)]
    no_tia: bool,
}

fn parse_hex(text: &str) -> Result<u16> {
    let digits = text
        .trim()
        .trim_start_matches("0x")
        .trim_start_matches("0X")
        .trim_start_matches('$');
    u16::from_str_radix(digits, 16).with_context(|| format!("invalid hex address '{text}'"))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let origin = parse_hex(&args.origin)?;
    let image = fs::read(&args.program)
        .with_context(|| format!("failed to read '{}'", args.program.display()))?;

    let config = SbcConfig {
        clock_hz: args.hz,
        acia: !args.no_acia,
        tia: !args.no_tia,
        ..SbcConfig::default()
    };
    let mut sbc = Sbc::new(&config);

    sbc.load_image(&image, origin)
        .map_err(|e| anyhow!("failed to load program: {e}"))?;
    sbc.set_reset_vector(origin);
    sbc.reset();

    eprintln!(
        "[Info] Loaded {} bytes at ${:04X}, reset vector set, PC = ${:04X}",
        image.len(),
        origin,
        Cpu::<machine_sbc::SystemBus>::pc(sbc.cpu())
    );
    eprintln!("[Info] 6502 Emulator Monitor");
    eprintln!("Type 'help' for available commands.");

    monitor_loop(&mut sbc)
}

fn monitor_loop(sbc: &mut Sbc) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("6502> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            println!();
            return Ok(());
        };
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if execute_command(sbc, line)? {
            return Ok(());
        }
    }
}

/// Parse and run one command. Returns true when the user wants to quit.
fn execute_command(sbc: &mut Sbc, line: &str) -> Result<bool> {
    let mut parts = line.split_whitespace();
    let command = parts.next().unwrap_or("").to_lowercase();
    let rest: Vec<&str> = parts.collect();

    match command.as_str() {
        "help" => print_help(),
        "quit" | "exit" => return Ok(true),
        "reset" => {
            sbc.reset();
            println!("[OK] CPU reset done. PC = ${:04X}", Cpu::<machine_sbc::SystemBus>::pc(sbc.cpu()));
        }
        "step" => {
            let count = rest.first().and_then(|s| s.parse().ok()).unwrap_or(1).max(1);
            do_step(sbc, count);
        }
        "run" => {
            let count = rest.first().and_then(|s| s.parse().ok());
            do_run(sbc, count);
        }
        "mem" => match rest.first() {
            Some(addr) => {
                let addr = parse_hex(addr)?;
                let count = rest.get(1).and_then(|s| s.parse().ok()).unwrap_or(16);
                do_memdump(sbc, addr, count);
            }
            None => println!("Usage: mem <hex_address> [count]"),
        },
        "pc" => match rest.first() {
            Some(addr) => {
                let addr = parse_hex(addr)?;
                sbc.cpu_mut().set_pc(addr);
                println!("[OK] PC set to ${addr:04X}");
            }
            None => println!("Usage: pc <hex_address>"),
        },
        "reg" | "regs" => show_registers(sbc),
        "irq" => {
            let cycles = sbc.irq();
            if cycles == 0 {
                println!("[IRQ] Ignored (interrupts disabled).");
            } else {
                println!("[IRQ] Taken, PC = ${:04X}", Cpu::<machine_sbc::SystemBus>::pc(sbc.cpu()));
            }
        }
        "nmi" => {
            sbc.nmi();
            println!("[NMI] Taken, PC = ${:04X}", Cpu::<machine_sbc::SystemBus>::pc(sbc.cpu()));
        }
        "stack" => {
            let count = rest.first().and_then(|s| s.parse().ok()).unwrap_or(16).max(1);
            do_stackdump(sbc, count);
        }
        "serial" => {
            let text = line[command.len()..].trim_start();
            if text.is_empty() {
                println!("Usage: serial <string>");
            } else {
                sbc.feed_serial(text.as_bytes());
                println!("[OK] {} bytes queued on serial input.", text.len());
            }
        }
        "load" => match (rest.first(), rest.get(1)) {
            (Some(path), Some(addr)) => {
                let addr = parse_hex(addr)?;
                match fs::read(path) {
                    Ok(data) => match sbc.load_image(&data, addr) {
                        Ok(()) => println!("[OK] Loaded {} bytes at ${addr:04X}", data.len()),
                        Err(e) => println!("[Error] {e}"),
                    },
                    Err(e) => println!("[Error] Failed to read '{path}': {e}"),
                }
            }
            _ => println!("Usage: load <file> <hex_address>"),
        },
        _ => println!("Unknown command: {command}"),
    }

    Ok(false)
}

fn do_step(sbc: &mut Sbc, count: u32) {
    for _ in 0..count {
        if sbc.cpu().halted() {
            println!("[Halt] CPU is jammed; 'reset' to resume.");
            break;
        }
        let cycles = sbc.step();
        flush_output(sbc);
        let cpu = sbc.cpu();
        println!(
            "PC=${:04X} A=${:02X} X=${:02X} Y=${:02X} SP=${:02X} P=${:02X} ({} cycles)",
            Cpu::<machine_sbc::SystemBus>::pc(cpu),
            cpu.a(),
            cpu.x(),
            cpu.y(),
            cpu.sp(),
            cpu.status(),
            cycles
        );
    }
}

fn do_run(sbc: &mut Sbc, count: Option<u64>) {
    let mut executed: u64 = 0;
    let mut last_pc = Cpu::<machine_sbc::SystemBus>::pc(sbc.cpu());
    let mut stuck = 0;

    loop {
        if sbc.cpu().halted() {
            println!("[Halt] CPU is jammed after {executed} instructions; 'reset' to resume.");
            break;
        }
        sbc.step();
        executed += 1;
        flush_output(sbc);

        if let Some(limit) = count {
            if executed >= limit {
                break;
            }
        } else {
            // Open-ended run: stop when the program spins in place.
            if Cpu::<machine_sbc::SystemBus>::pc(sbc.cpu()) == last_pc {
                stuck += 1;
                if stuck >= 3 {
                    println!(
                        "[Trap] PC stable at ${:04X} after {executed} instructions.",
                        Cpu::<machine_sbc::SystemBus>::pc(sbc.cpu())
                    );
                    break;
                }
            } else {
                stuck = 0;
            }
            last_pc = Cpu::<machine_sbc::SystemBus>::pc(sbc.cpu());
        }
    }
    show_registers(sbc);
}

fn do_memdump(sbc: &Sbc, start: u16, count: usize) {
    let mut addr = start;
    let mut remaining = count;
    while remaining > 0 {
        let row: Vec<u8> = (0..16.min(remaining))
            .map(|i| sbc.bus().peek_ram(addr.wrapping_add(i as u16)))
            .collect();

        print!("{addr:04X}: ");
        for byte in &row {
            print!("{byte:02X} ");
        }
        for _ in row.len()..16 {
            print!("   ");
        }
        print!(" |");
        for &byte in &row {
            let c = if byte.is_ascii_graphic() || byte == b' ' {
                byte as char
            } else {
                '.'
            };
            print!("{c}");
        }
        println!("|");

        addr = addr.wrapping_add(row.len() as u16);
        remaining -= row.len();
    }
}

fn show_registers(sbc: &Sbc) {
    let cpu = sbc.cpu();
    let p = cpu.status();
    let flag = |bit: u8, ch: char| if p & bit != 0 { ch } else { '-' };
    println!(
        "A=${:02X} X=${:02X} Y=${:02X} SP=${:02X} PC=${:04X} P=${:02X} [{}{}{}{}{}{}]{}",
        cpu.a(),
        cpu.x(),
        cpu.y(),
        cpu.sp(),
        Cpu::<machine_sbc::SystemBus>::pc(cpu),
        p,
        flag(0x80, 'N'),
        flag(0x40, 'V'),
        flag(0x08, 'D'),
        flag(0x04, 'I'),
        flag(0x02, 'Z'),
        flag(0x01, 'C'),
        if cpu.halted() { " HALTED" } else { "" },
    );
}

fn do_stackdump(sbc: &Sbc, count: usize) {
    let sp = sbc.cpu().sp();
    println!("Stack (SP=${sp:02X}):");
    let mut offset = sp.wrapping_add(1);
    for _ in 0..count {
        if offset == 0 {
            break; // wrapped past the top of page 1
        }
        let addr = 0x0100 | u16::from(offset);
        println!("  ${addr:04X}: ${:02X}", sbc.bus().peek_ram(addr));
        offset = offset.wrapping_add(1);
    }
}

/// Print everything the machine has emitted since the last call.
fn flush_output(sbc: &mut Sbc) {
    let output = sbc.take_output();
    if !output.is_empty() {
        print!("{}", String::from_utf8_lossy(&output));
        let _ = io::stdout().flush();
    }
}

fn print_help() {
    println!("Available commands:");
    println!("  help           - Show this help message");
    println!("  quit | exit    - Quit the emulator");
    println!("  reset          - Reset the CPU (PC from Reset Vector)");
    println!("  step [N]       - Execute N instructions (default = 1)");
    println!("  run [N]        - Run N instructions, or until halted/trapped");
    println!("  mem <addr> [c] - Hex dump memory from <addr>; c=16 by default");
    println!("  pc <addr>      - Set CPU PC to <addr>");
    println!("  reg            - Show CPU registers");
    println!("  irq            - Trigger an IRQ interrupt (if not masked)");
    println!("  nmi            - Trigger a Non-Maskable Interrupt");
    println!("  stack [N]      - Show top N bytes of the CPU stack (default=16)");
    println!("  serial <str>   - Feed <str> into the serial input");
    println!("  load <f> <a>   - Load a binary file at a hex address");
    println!();
    println!("Examples:");
    println!("  step 10        - Step 10 instructions");
    println!("  pc 0xC000      - Set PC to 0xC000");
    println!("  mem 0xC000 32  - Hex dump 32 bytes from 0xC000");
    println!("  run 1000       - Run 1000 instructions");
    println!("  run            - Run until the CPU halts or traps");
}
