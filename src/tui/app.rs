//! Debugger application state and logic.

use crate::cpu::console::BufferConsole;
use crate::cpu::decode::Instruction;
use crate::cpu::memory::Memory;
use crate::word::parse_word;
use crate::Cpu;
use std::collections::HashSet;

/// Debugger application state.
pub struct DebuggerApp {
    /// The CPU being debugged.
    pub cpu: Cpu,
    /// Memory image to restore on reset.
    pub initial: Memory,
    /// GET input queue and PUT output capture.
    pub console: BufferConsole,
    /// Breakpoints (by address).
    pub breakpoints: HashSet<i64>,
    /// Is the debugger running continuously?
    pub running: bool,
    /// Should we quit?
    pub should_quit: bool,
    /// Status message to display.
    pub status: String,
    /// Text typed so far while a GET is waiting for input.
    pub input: Option<String>,
    /// Memory view scroll offset.
    pub mem_scroll: usize,
}

impl DebuggerApp {
    /// Create a new debugger for a machine whose memory is already loaded.
    pub fn new(cpu: Cpu) -> Self {
        Self {
            initial: cpu.mem.clone(),
            cpu,
            console: BufferConsole::new(),
            breakpoints: HashSet::new(),
            running: false,
            should_quit: false,
            status: "Ready. Press 's' to step, 'r' to run, 'q' to quit.".into(),
            input: None,
            mem_scroll: 0,
        }
    }

    /// Step one instruction.
    ///
    /// A GET with no queued input switches to input mode instead.
    pub fn step(&mut self) {
        if self.cpu.is_halted() {
            self.status = format!("Halted at pc {:02}. Press 'x' to reset.", self.cpu.pc);
            self.running = false;
            return;
        }

        if matches!(self.cpu.peek(), Ok(Instruction::Get { .. })) && self.console.input.is_empty() {
            self.input = Some(String::new());
            self.running = false;
            self.status = "GET: type a word and press Enter".into();
            return;
        }

        let pc = self.cpu.pc;
        match self.cpu.step(&mut self.console) {
            Ok(instr) => {
                self.status = format!("{:02}: {}", pc, instr);
            }
            Err(e) => {
                self.status = format!("Fault at pc {:02}: {}", pc, e);
                self.running = false;
            }
        }
    }

    /// Run until halt, breakpoint, fault, or GET.
    pub fn run(&mut self) {
        self.running = true;
        self.status = "Running...".into();
        // Leave a breakpoint we are sitting on
        self.step();
    }

    /// Run one iteration of continuous execution.
    pub fn tick(&mut self) {
        if !self.running {
            return;
        }

        if !self.cpu.is_running() {
            self.running = false;
            if self.cpu.is_halted() {
                self.status = format!("Halted after {} cycles", self.cpu.cycles);
            }
            return;
        }

        if self.breakpoints.contains(&self.cpu.pc) {
            self.running = false;
            self.status = format!("Breakpoint at pc {:02}", self.cpu.pc);
            return;
        }

        self.step();
    }

    /// Toggle a breakpoint at the current program counter.
    pub fn toggle_breakpoint(&mut self) {
        let pc = self.cpu.pc;
        if self.breakpoints.remove(&pc) {
            self.status = format!("Removed breakpoint at pc {:02}", pc);
        } else {
            self.breakpoints.insert(pc);
            self.status = format!("Set breakpoint at pc {:02}", pc);
        }
    }

    /// Accept the typed word for a waiting GET and execute it.
    pub fn submit_input(&mut self) {
        let Some(text) = self.input.take() else {
            return;
        };

        match parse_word(&text) {
            Ok(_) => {
                self.console.push_input(text);
                self.step();
            }
            Err(e) => {
                self.status = format!("GET: {}", e);
                self.input = Some(String::new());
            }
        }
    }

    /// Add a typed character to the GET input line.
    pub fn input_char(&mut self, c: char) {
        if let Some(buffer) = self.input.as_mut() {
            if c == '-' || c.is_ascii_digit() {
                buffer.push(c);
            }
        }
    }

    /// Delete the last typed character.
    pub fn input_backspace(&mut self) {
        if let Some(buffer) = self.input.as_mut() {
            buffer.pop();
        }
    }

    /// Leave input mode without executing the GET.
    pub fn cancel_input(&mut self) {
        if self.input.take().is_some() {
            self.status = "GET cancelled.".into();
        }
    }

    /// Reset the CPU and restore the loaded memory image.
    pub fn reset(&mut self) {
        self.cpu = Cpu::new();
        self.cpu.mem = self.initial.clone();
        self.console = BufferConsole::new();
        self.input = None;
        self.running = false;
        self.status = "Reset. Ready.".into();
    }
}

/// Run the full-screen debugger on a loaded machine.
pub fn run_debugger(cpu: Cpu) -> std::io::Result<()> {
    use crossterm::{
        event::{self, Event, KeyCode, KeyEventKind},
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
        ExecutableCommand,
    };
    use ratatui::prelude::*;
    use std::io::stdout;
    use std::time::Duration;

    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut app = DebuggerApp::new(cpu);

    loop {
        terminal.draw(|frame| {
            super::ui::draw(frame, &app);
        })?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if app.input.is_some() {
                        match key.code {
                            KeyCode::Char(c) => app.input_char(c),
                            KeyCode::Backspace => app.input_backspace(),
                            KeyCode::Enter => app.submit_input(),
                            KeyCode::Esc => app.cancel_input(),
                            _ => {}
                        }
                    } else {
                        match key.code {
                            KeyCode::Char('q') => app.should_quit = true,
                            KeyCode::Char('s') => {
                                app.running = false;
                                app.step();
                            }
                            KeyCode::Char('r') => app.run(),
                            KeyCode::Char('p') => {
                                app.running = false;
                                app.status = "Paused.".into();
                            }
                            KeyCode::Char('b') => app.toggle_breakpoint(),
                            KeyCode::Char('x') => app.reset(),
                            KeyCode::Up => {
                                app.mem_scroll = app.mem_scroll.saturating_sub(1);
                            }
                            KeyCode::Down => {
                                if app.mem_scroll + 1 < crate::cpu::MEMORY_SIZE {
                                    app.mem_scroll += 1;
                                }
                            }
                            _ => {}
                        }
                    }
                }
            }
        }

        if app.running {
            app.tick();
        }

        if app.should_quit {
            break;
        }
    }

    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::decode::encode;
    use crate::Word;

    fn app_with(program: &[Instruction]) -> DebuggerApp {
        let mut cpu = Cpu::new();
        for (addr, instr) in program.iter().enumerate() {
            cpu.mem.write(addr, encode(instr)).unwrap();
        }
        DebuggerApp::new(cpu)
    }

    fn run_to_stop(app: &mut DebuggerApp) {
        app.run();
        for _ in 0..100 {
            if !app.running {
                break;
            }
            app.tick();
        }
    }

    #[test]
    fn test_get_waits_for_input() {
        let mut app = app_with(&[
            Instruction::Get { addr: 10 },
            Instruction::Put { addr: 10 },
            Instruction::Halt,
        ]);

        run_to_stop(&mut app);
        assert!(app.input.is_some());
        assert_eq!(app.cpu.pc, 0);

        app.input_char('x');
        app.input_char('7');
        app.input_backspace();
        assert_eq!(app.input.as_deref(), Some(""));
        app.input = Some("1-".into());
        app.submit_input();
        assert_eq!(app.input.as_deref(), Some(""));
        assert_eq!(app.cpu.pc, 0);

        app.input_char('-');
        app.input_char('5');
        app.submit_input();
        assert!(app.input.is_none());
        assert_eq!(app.cpu.pc, 1);

        run_to_stop(&mut app);
        assert!(app.cpu.is_halted());
        assert_eq!(app.console.output, vec!["00005"]);
    }

    #[test]
    fn test_breakpoint_stops_run() {
        let mut app = app_with(&[
            Instruction::Noop,
            Instruction::Noop,
            Instruction::Noop,
            Instruction::Halt,
        ]);
        app.cpu.pc = 2;
        app.toggle_breakpoint();
        app.cpu.pc = 0;

        run_to_stop(&mut app);
        assert_eq!(app.cpu.pc, 2);
        assert!(app.cpu.is_running());

        run_to_stop(&mut app);
        assert!(app.cpu.is_halted());
    }

    #[test]
    fn test_fault_stops_run_and_reset_restores() {
        let mut app = app_with(&[Instruction::Divide { addr: 10 }]);

        run_to_stop(&mut app);
        assert!(app.cpu.is_faulted());
        assert!(app.status.contains("divide by zero"));

        app.cpu.mem.write(5, Word::new(9).unwrap()).unwrap();
        app.reset();
        assert_eq!(app.cpu.mem, app.initial);
        assert!(app.cpu.is_running());
    }
}
