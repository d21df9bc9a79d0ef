use colored::Colorize;

/// Numbered step banners: `Step 1: ...`, `Step 2: ...`.
#[derive(Debug, Default)]
pub struct Steps {
    current: usize,
}

impl Steps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Announce the next step and return its number.
    pub fn next(&mut self, title: &str) -> usize {
        self.current += 1;
        println!();
        println!("{} Step {}: {}", "->".blue(), self.current, title.bold());
        self.current
    }
}

pub fn done(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn warn(msg: &str) {
    println!("{} Warning: {}", "!".yellow(), msg.yellow());
}

pub fn hint(msg: &str) {
    println!("   {}", msg.dimmed());
}
