/// Tracks the active SGR (color) sequence while streaming a row of cells so
/// repeated colors are emitted once.
pub struct SgrRun {
    last: String,
    active: bool,
}

impl SgrRun {
    pub fn new() -> Self {
        SgrRun {
            last: String::new(),
            active: false,
        }
    }

    /// Switch to `sgr` unless it is already active.
    pub fn set(&mut self, out: &mut String, sgr: &str) {
        if self.active && self.last == sgr {
            return;
        }
        out.push_str("\x1b[");
        out.push_str(sgr);
        out.push('m');
        self.last.clear();
        self.last.push_str(sgr);
        self.active = true;
    }

    /// Drop back to the default colors if any SGR is active.
    pub fn reset(&mut self, out: &mut String) {
        if self.active {
            out.push_str("\x1b[0m");
            self.active = false;
            self.last.clear();
        }
    }

    /// Finish row `row` (0-indexed) and move the cursor to the start of the next one.
    /// Cursor movement instead of \n avoids blank-line scrolling at the bottom edge.
    pub fn end_row(&mut self, out: &mut String, row: usize) {
        self.reset(out);
        out.push_str("\x1b[");
        out.push_str(&(row + 2).to_string());
        out.push_str(";1H");
    }
}
