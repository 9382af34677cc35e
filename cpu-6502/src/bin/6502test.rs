//! Klaus Dormann's 6502 test suite runner.
//!
//! Runs the functional test (origin $0000, start $0400, success when PC
//! reaches $3469) or, with `--decimal`, the decimal test (load $0200,
//! success at $044B). A trap (PC stuck in a loop) indicates a failure.
//!
//! Download the binaries from:
//! https://github.com/Klaus2m5/6502_65C02_functional_tests

use cpu_6502::Mos6502;
use emu65_core::{Bus, Cpu};
use std::fs;

struct TestBus {
    memory: [u8; 65536],
}

impl TestBus {
    fn new() -> Self {
        Self { memory: [0; 65536] }
    }

    fn load(&mut self, addr: usize, data: &[u8]) {
        self.memory[addr..addr + data.len()].copy_from_slice(data);
    }
}

impl Bus for TestBus {
    fn read(&mut self, address: u16) -> u8 {
        self.memory[address as usize]
    }

    fn write(&mut self, address: u16, value: u8) {
        self.memory[address as usize] = value;
    }
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let decimal = args.iter().any(|a| a == "--decimal");
    let default_path = if decimal {
        "test-roms/6502_decimal_test.bin"
    } else {
        "test-roms/6502_functional_test.bin"
    };
    let test_path = args
        .iter()
        .skip(1)
        .find(|a| !a.starts_with("--"))
        .cloned()
        .unwrap_or_else(|| default_path.to_string());

    let (load_addr, start_pc, success_pc) = if decimal {
        (0x0200usize, 0x0200u16, 0x044Bu16)
    } else {
        (0x0000usize, 0x0400u16, 0x3469u16)
    };

    let test_data = match fs::read(&test_path) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Failed to load test ROM '{}': {}", test_path, e);
            eprintln!();
            eprintln!("Download the binaries from:");
            eprintln!("  https://github.com/Klaus2m5/6502_65C02_functional_tests");
            eprintln!("and place them under test-roms/, or pass a path:");
            eprintln!("  cargo run -p cpu-6502 --bin 6502test -- [--decimal] <path>");
            std::process::exit(1);
        }
    };

    println!("Running 6502 {} test suite...", if decimal { "decimal" } else { "functional" });
    println!("Test binary: {} ({} bytes)", test_path, test_data.len());
    println!();

    let mut cpu = Mos6502::new();
    let mut bus = TestBus::new();

    bus.load(load_addr, &test_data);
    cpu.set_pc(start_pc);

    let mut last_pc = Cpu::<TestBus>::pc(&cpu);
    let mut stuck_count = 0;
    let mut total_cycles: u64 = 0;
    let mut instruction_count: u64 = 0;

    let start_time = std::time::Instant::now();

    loop {
        let cycles = cpu.step(&mut bus);
        total_cycles += u64::from(cycles);
        instruction_count += 1;

        if Cpu::<TestBus>::pc(&cpu) == success_pc {
            let elapsed = start_time.elapsed();
            println!("SUCCESS! All tests passed.");
            println!();
            println!("Statistics:");
            println!("  Instructions executed: {}", instruction_count);
            println!("  Total cycles: {}", total_cycles);
            println!("  Time elapsed: {:?}", elapsed);
            println!(
                "  Effective speed: {:.2} MHz",
                total_cycles as f64 / elapsed.as_secs_f64() / 1_000_000.0
            );
            std::process::exit(0);
        }

        if cpu.halted() {
            println!("JAM at PC=${:04X} - test failure", Cpu::<TestBus>::pc(&cpu));
            std::process::exit(1);
        }

        // Trap detection: the suite signals failure by spinning in place.
        if Cpu::<TestBus>::pc(&cpu) == last_pc {
            stuck_count += 1;
            if stuck_count >= 3 {
                println!("TRAP detected at PC=${:04X}", Cpu::<TestBus>::pc(&cpu));
                println!();
                println!("Context:");
                println!("  A=${:02X} X=${:02X} Y=${:02X}", cpu.a(), cpu.x(), cpu.y());
                println!("  SP=${:02X} P=${:02X}", cpu.sp(), cpu.status());
                println!("  Instructions executed: {}", instruction_count);

                println!();
                println!("Memory around PC:");
                let start = Cpu::<TestBus>::pc(&cpu).saturating_sub(8);
                for i in 0..16u16 {
                    print!("{:02X} ", bus.memory[start.wrapping_add(i) as usize]);
                }
                println!();

                std::process::exit(1);
            }
        } else {
            stuck_count = 0;
        }

        last_pc = Cpu::<TestBus>::pc(&cpu);

        if instruction_count % 1_000_000 == 0 {
            print!(
                "\rExecuted {} million instructions, PC=${:04X}...",
                instruction_count / 1_000_000,
                Cpu::<TestBus>::pc(&cpu)
            );
            use std::io::Write;
            std::io::stdout().flush().unwrap();
        }
    }
}
