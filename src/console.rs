//! Simulated system-log shell overlaid on the scene.

use std::collections::VecDeque;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crossterm::event::{KeyCode, KeyEvent};
use log::debug;

use crate::config::ShellConfig;
use crate::render::canvas::{color_to_bg, color_to_fg};
use crate::render::{Canvas, ColorMode};

/// Most entries kept; older ones scroll away.
pub const MAX_ENTRIES: usize = 50;
/// Delay before a command's output appears.
pub const RESPONSE_DELAY: Duration = Duration::from_millis(200);
const PANEL_WIDTH: usize = 64;
const PANEL_LINES: usize = 8;
const PROMPT: &str = "visitor@tidemark:~$";

const HELP: [&str; 6] = [
    "Available commands:",
    "  help    - Show this menu",
    "  clear   - Clear terminal output",
    "  about   - Display summary",
    "  skills  - List technical stack",
    "  contact - Show contact info",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    System,
    User,
    Response,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub kind: EntryKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Action {
    Log(EntryKind, String),
    Clear,
}

#[derive(Debug, Clone)]
struct Scheduled {
    due: Duration,
    action: Action,
}

/// Log buffer, input line and timed output for the overlay shell.
/// Time is measured from console start so the schedule is testable.
pub struct Console {
    entries: VecDeque<LogEntry>,
    scheduled: Vec<Scheduled>,
    input: String,
    open: bool,
    focused: bool,
    shell: ShellConfig,
}

impl Console {
    /// New console with the boot sequence queued.
    pub fn new(shell: ShellConfig) -> Self {
        let mut console = Console {
            entries: VecDeque::with_capacity(MAX_ENTRIES),
            scheduled: Vec::new(),
            input: String::new(),
            open: true,
            focused: false,
            shell,
        };
        let boot: [(u64, EntryKind, &str); 6] = [
            (0, EntryKind::System, "System initialized."),
            (0, EntryKind::System, "Connecting to the render host..."),
            (800, EntryKind::System, "Connection established (200 OK)."),
            (1500, EntryKind::System, "Fetching scene data..."),
            (2200, EntryKind::System, "Rendering pipelines..."),
            (3000, EntryKind::Response, "Interactive Shell Ready. Type 'help' for commands."),
        ];
        for (ms, kind, msg) in boot {
            console.schedule(Duration::from_millis(ms), Action::Log(kind, msg.to_string()));
        }
        console
    }

    fn schedule(&mut self, due: Duration, action: Action) {
        self.scheduled.push(Scheduled { due, action });
    }

    /// Release every scheduled action due at or before `now`, in due order.
    pub fn tick(&mut self, now: Duration) {
        if self.scheduled.iter().all(|s| s.due > now) {
            return;
        }
        // Stable sort keeps same-time actions in the order they were queued.
        self.scheduled.sort_by_key(|s| s.due);
        let split = self.scheduled.partition_point(|s| s.due <= now);
        let due: Vec<Scheduled> = self.scheduled.drain(..split).collect();
        for s in due {
            match s.action {
                Action::Log(kind, msg) => self.push(kind, msg),
                Action::Clear => self.entries.clear(),
            }
        }
    }

    /// Append a timestamped system line right away.
    pub fn system(&mut self, message: impl Into<String>) {
        self.push(EntryKind::System, message.into());
    }

    fn push(&mut self, kind: EntryKind, message: String) {
        let message = match kind {
            EntryKind::System => format!("[{}] {}", wall_clock(), message),
            _ => message,
        };
        while self.entries.len() >= MAX_ENTRIES {
            self.entries.pop_front();
        }
        self.entries.push_back(LogEntry { kind, message });
    }

    /// Echo `line` and queue the command's output.
    pub fn run_command(&mut self, line: &str, now: Duration) {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return;
        }
        self.push(EntryKind::User, trimmed.to_string());
        let cmd = trimmed.to_lowercase();
        debug!("console command: {}", cmd);

        let due = now + RESPONSE_DELAY;
        let reply: Vec<String> = match cmd.as_str() {
            "help" => HELP.iter().map(|s| s.to_string()).collect(),
            "clear" => {
                self.schedule(due, Action::Clear);
                return;
            }
            "about" => self.shell.about.clone(),
            "skills" => self.shell.skills.clone(),
            "contact" => self.shell.contact.clone(),
            "sudo" => vec!["Permission denied: You are not root.".into()],
            "ls" => vec!["home/  experience/  projects/  skills/  contact/".into()],
            _ => vec![format!("Command not found: {}. Type 'help' for options.", cmd)],
        };
        for line in reply {
            self.schedule(due, Action::Log(EntryKind::Response, line));
        }
    }

    /// Handle a key press. Returns true when the console consumed it.
    pub fn handle_key(&mut self, key: KeyEvent, now: Duration) -> bool {
        if self.focused {
            match key.code {
                KeyCode::Enter => {
                    let line = std::mem::take(&mut self.input);
                    self.run_command(&line, now);
                }
                KeyCode::Esc => self.focused = false,
                KeyCode::Backspace => {
                    self.input.pop();
                }
                KeyCode::Tab => self.toggle(),
                KeyCode::Char(c) => self.input.push(c),
                _ => {}
            }
            return true;
        }
        match key.code {
            KeyCode::Tab => {
                self.toggle();
                true
            }
            KeyCode::Char(':') => {
                self.open = true;
                self.focused = true;
                true
            }
            _ => false,
        }
    }

    /// Open or collapse the panel. Collapsing also drops input focus.
    pub fn toggle(&mut self) {
        self.open = !self.open;
        if !self.open {
            self.focused = false;
        }
    }

    #[cfg(test)]
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    #[cfg(test)]
    pub fn is_open(&self) -> bool {
        self.open
    }

    #[cfg(test)]
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// ANSI overlay anchored at the bottom-left, ending on terminal row
    /// `bottom_row` (1-indexed). Colors follow the canvas color mode.
    pub fn render_overlay(&self, cols: usize, bottom_row: usize, canvas: &Canvas) -> String {
        let width = cols.min(PANEL_WIDTH);
        if width < 8 || bottom_row == 0 {
            return String::new();
        }

        let mut lines: Vec<(Ink, String)> = Vec::new();
        let marker = if self.open { "[-]" } else { "[+]" };
        lines.push((Ink::Header, format!(" SYSTEM_LOGS {}", marker)));

        if self.open {
            let body = if self.focused { PANEL_LINES - 1 } else { PANEL_LINES };
            let skip = self.entries.len().saturating_sub(body);
            for entry in self.entries.iter().skip(skip) {
                lines.push(styled(entry));
            }
            if self.focused {
                lines.push((Ink::Text(PROMPT_COLOR), format!("{} {}_", PROMPT, self.input)));
            }
        }

        // Mono keeps the terminal's own background.
        let bg = (canvas.color_mode != ColorMode::Mono).then(|| color_to_bg(canvas.map_color(0, 0, 0)));

        let room = bottom_row.min(lines.len());
        let first_row = bottom_row + 1 - room;
        let mut out = String::new();
        for (i, (ink, text)) in lines.iter().skip(lines.len() - room).enumerate() {
            let fg = match *ink {
                Ink::Header => "7".to_string(),
                Ink::Text(_) if canvas.color_mode == ColorMode::Mono => "0".to_string(),
                Ink::Text((r, g, b)) => color_to_fg(canvas.map_color(r, g, b)),
            };
            let sgr = match &bg {
                Some(bg) => format!("{};{}", bg, fg),
                None => fg,
            };
            let clipped: String = text.chars().take(width).collect();
            out.push_str(&format!(
                "\x1b[{};1H\x1b[{}m{:<w$}\x1b[0m",
                first_row + i,
                sgr,
                clipped,
                w = width
            ));
        }
        out
    }
}

/// How one overlay line is colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ink {
    /// Reverse video title bar
    Header,
    Text((u8, u8, u8)),
}

const PROMPT_COLOR: (u8, u8, u8) = (14, 165, 233);

fn styled(entry: &LogEntry) -> (Ink, String) {
    match entry.kind {
        EntryKind::User => (Ink::Text((255, 255, 255)), format!("{} {}", PROMPT, entry.message)),
        EntryKind::Response => (Ink::Text((103, 232, 249)), entry.message.clone()),
        EntryKind::System => (Ink::Text((148, 163, 184)), format!("➜ {}", entry.message)),
    }
}

/// Current UTC time of day as HH:MM:SS.
fn wall_clock() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
        % 86_400;
    format!("{:02}:{:02}:{:02}", secs / 3600, secs / 60 % 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderMode;
    use crossterm::event::KeyModifiers;

    fn canvas(mode: ColorMode) -> Canvas {
        Canvas::new(40, 23, RenderMode::HalfBlock, mode)
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn messages(c: &Console) -> Vec<String> {
        c.entries().map(|e| e.message.clone()).collect()
    }

    fn booted() -> Console {
        let mut c = Console::new(ShellConfig::default());
        c.tick(ms(3000));
        c
    }

    #[test]
    fn test_boot_sequence_follows_schedule() {
        let mut c = Console::new(ShellConfig::default());
        c.tick(ms(0));
        assert_eq!(c.entries().count(), 2);
        c.tick(ms(799));
        assert_eq!(c.entries().count(), 2);
        c.tick(ms(1500));
        assert_eq!(c.entries().count(), 4);
        c.tick(ms(3000));
        let last = c.entries().last().unwrap();
        assert_eq!(last.kind, EntryKind::Response);
        assert!(last.message.starts_with("Interactive Shell Ready"));
    }

    #[test]
    fn test_system_entries_are_timestamped() {
        let c = booted();
        let first = c.entries().next().unwrap();
        assert_eq!(first.kind, EntryKind::System);
        // "[HH:MM:SS] "
        assert_eq!(&first.message[0..1], "[");
        assert_eq!(&first.message[9..11], "] ");
        assert!(first.message.ends_with("System initialized."));
    }

    #[test]
    fn test_command_echo_is_immediate_reply_is_delayed() {
        let mut c = booted();
        let before = c.entries().count();
        c.run_command("  SUDO ", ms(5000));
        assert_eq!(c.entries().count(), before + 1);
        let echo = c.entries().last().unwrap();
        assert_eq!(echo.kind, EntryKind::User);
        assert_eq!(echo.message, "SUDO");

        c.tick(ms(5199));
        assert_eq!(c.entries().count(), before + 1);
        c.tick(ms(5200));
        assert_eq!(
            c.entries().last().unwrap().message,
            "Permission denied: You are not root."
        );
    }

    #[test]
    fn test_help_lists_commands_in_order() {
        let mut c = booted();
        c.run_command("help", ms(4000));
        c.tick(ms(4200));
        let msgs = messages(&c);
        let tail = &msgs[msgs.len() - HELP.len()..];
        assert_eq!(tail, HELP.map(String::from));
    }

    #[test]
    fn test_unknown_command() {
        let mut c = booted();
        c.run_command("Dance", ms(0));
        c.tick(ms(200));
        assert_eq!(
            c.entries().last().unwrap().message,
            "Command not found: dance. Type 'help' for options."
        );
    }

    #[test]
    fn test_clear_empties_after_delay() {
        let mut c = booted();
        c.run_command("clear", ms(4000));
        assert!(c.entries().count() > 0);
        c.tick(ms(4200));
        assert_eq!(c.entries().count(), 0);
    }

    #[test]
    fn test_empty_input_is_ignored() {
        let mut c = booted();
        let before = c.entries().count();
        c.run_command("   ", ms(4000));
        c.tick(ms(9000));
        assert_eq!(c.entries().count(), before);
    }

    #[test]
    fn test_profile_lines_come_from_config() {
        let shell = ShellConfig {
            about: vec!["A. Person | Data Engineer".into()],
            ..ShellConfig::default()
        };
        let mut c = Console::new(shell);
        c.run_command("about", ms(0));
        c.tick(ms(200));
        assert!(messages(&c).contains(&"A. Person | Data Engineer".to_string()));
    }

    #[test]
    fn test_log_is_capped() {
        let mut c = Console::new(ShellConfig::default());
        for i in 0..120 {
            c.system(format!("event {}", i));
        }
        assert_eq!(c.entries().count(), MAX_ENTRIES);
        assert!(c.entries().last().unwrap().message.ends_with("event 119"));
        assert!(c.entries().next().unwrap().message.ends_with("event 70"));
    }

    #[test]
    fn test_focus_captures_keys() {
        let mut c = booted();
        assert!(!c.handle_key(key(KeyCode::Char('q')), ms(0)));
        assert!(c.handle_key(key(KeyCode::Char(':')), ms(0)));
        assert!(c.is_focused());
        for ch in "lsx".chars() {
            assert!(c.handle_key(key(KeyCode::Char(ch)), ms(0)));
        }
        c.handle_key(key(KeyCode::Backspace), ms(0));
        c.handle_key(key(KeyCode::Enter), ms(4000));
        c.tick(ms(4200));
        assert!(messages(&c).last().unwrap().starts_with("home/"));
        c.handle_key(key(KeyCode::Esc), ms(0));
        assert!(!c.is_focused());
    }

    #[test]
    fn test_tab_toggles_panel() {
        let mut c = booted();
        assert!(c.is_open());
        assert!(c.handle_key(key(KeyCode::Tab), ms(0)));
        assert!(!c.is_open());
    }

    #[test]
    fn test_overlay_fits_width_and_ends_on_row() {
        let c = booted();
        let out = c.render_overlay(40, 23, &canvas(ColorMode::TrueColor));
        assert!(out.contains("\x1b[23;1H"));
        assert!(out.contains("SYSTEM_LOGS"));
        assert!(!out.contains("\x1b[24;1H"));
    }

    #[test]
    fn test_overlay_follows_color_mode() {
        let c = booted();
        let truecolor = c.render_overlay(40, 23, &canvas(ColorMode::TrueColor));
        assert!(truecolor.contains("48;2;0;0;0;38;2;148;163;184m"));

        let indexed = c.render_overlay(40, 23, &canvas(ColorMode::Ansi256));
        assert!(!indexed.contains("38;2;"));
        assert!(!indexed.contains("48;2;"));
        assert!(indexed.contains("48;5;16;38;5;"));

        let mono = c.render_overlay(40, 23, &canvas(ColorMode::Mono));
        assert!(!mono.contains(";2;"));
        assert!(!mono.contains(";5;"));
        assert!(mono.contains("\x1b[7m SYSTEM_LOGS"));
    }
}
