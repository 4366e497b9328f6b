//! Interactive shell for fsbrowse.
//!
//! A small command loop over [`fsbrowse_core::PathNavigator`]:
//!
//! - `ls`, `cd`, `up`: walk the current listing
//! - `go`: jump straight to a symbolic path
//! - `filter`: narrow files by extension
//! - `locations`: list the selectable storage roots
//!
//! The prompt always shows the current symbolic path, so a session reads
//! like the path bar of a graphical file browser.

use anyhow::{Context, Result};
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;

use fsbrowse_core::{LocationsModel, PathNavigator, SymbolicPath};

/// Shell state: the navigator plus presentation switches.
pub struct Repl {
    navigator: PathNavigator,
    max_usb_slots: u8,
    json: bool,
    done: bool,
}

impl Repl {
    /// Wraps an already-initialized navigator.
    pub fn new(navigator: PathNavigator, max_usb_slots: u8) -> Self {
        Self {
            navigator,
            max_usb_slots,
            json: false,
            done: false,
        }
    }

    /// Emit listings as JSON instead of aligned text.
    pub fn with_json_listings(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Whether `quit` has been entered.
    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn navigator(&self) -> &PathNavigator {
        &self.navigator
    }

    /// Process a single line of input.
    pub fn process_line(&mut self, line: &str) -> Result<Option<String>> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        let (command, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (trimmed, ""),
        };

        match command {
            "ls" => self.cmd_ls(),
            "cd" => self.cmd_cd(rest),
            "up" => self.cmd_cd(".."),
            "go" => self.cmd_go(rest),
            "filter" => self.cmd_filter(rest),
            "locations" => self.cmd_locations(),
            "pwd" => self.cmd_pwd(),
            "help" | "?" => Ok(Some(HELP_TEXT.to_string())),
            "quit" | "exit" => {
                self.done = true;
                Ok(None)
            }
            _ => Ok(Some(format!(
                "Unknown command: {command}\nType 'help' for available commands."
            ))),
        }
    }

    /// `ls` re-lists before printing, so filter changes and filesystem
    /// changes show up here.
    fn cmd_ls(&mut self) -> Result<Option<String>> {
        self.navigator.refresh()?;
        if self.json {
            let listing = serde_json::to_string_pretty(self.navigator.entries())?;
            return Ok(Some(listing));
        }
        let mut out = String::new();
        for entry in self.navigator.entries() {
            if entry.is_directory {
                out.push_str(&format!("d  {:>5}     {}\n", "", entry.name));
            } else {
                out.push_str(&format!("-  {:>5} kB  {}\n", entry.size_kb, entry.name));
            }
        }
        Ok(Some(out.trim_end().to_string()))
    }

    fn cmd_cd(&mut self, token: &str) -> Result<Option<String>> {
        if token.is_empty() {
            return Ok(Some("usage: cd <entry>  (or 'up')".to_string()));
        }

        let before = self.navigator.current_path().map(ToString::to_string);
        self.navigator.navigate(token)?;
        let after = self.navigator.current_path().map(ToString::to_string);

        if before != after {
            Ok(after)
        } else if token == ".." {
            Ok(Some("already at a top-level folder".to_string()))
        } else {
            // The browsed directory did not change: the token named a file
            // or nothing at all. Either way the candidate was recorded.
            match self.navigator.full_path() {
                Some(path) if path.is_file() => Ok(Some(format!("selected {}", path.display()))),
                Some(path) => Ok(Some(format!("no entry named '{token}' ({})", path.display()))),
                None => Ok(None),
            }
        }
    }

    fn cmd_go(&mut self, raw: &str) -> Result<Option<String>> {
        if raw.is_empty() {
            return Ok(Some("usage: go <symbolic-path>, e.g. go %USB1%/".to_string()));
        }
        self.navigator.set_path(raw)?;
        Ok(self.navigator.current_path().map(ToString::to_string))
    }

    fn cmd_filter(&mut self, spec: &str) -> Result<Option<String>> {
        self.navigator.set_extension_filter(spec);
        let filter = self.navigator.extension_filter();
        if filter.is_match_all() {
            Ok(Some("filter cleared; the next 'ls' shows every file".to_string()))
        } else {
            Ok(Some(format!(
                "filter set to '{filter}'; takes effect at the next 'ls'"
            )))
        }
    }

    fn cmd_locations(&mut self) -> Result<Option<String>> {
        let model = LocationsModel::discover(self.navigator.registry(), self.max_usb_slots);
        let current_root = self.navigator.current_path().map(SymbolicPath::root);
        let mut out = String::new();
        for location in model.locations() {
            let marker = if current_root == Some(location.path.root()) {
                "*"
            } else {
                " "
            };
            out.push_str(&format!("{} {:<12} {}\n", marker, location.label, location.path));
        }
        Ok(Some(out.trim_end().to_string()))
    }

    fn cmd_pwd(&self) -> Result<Option<String>> {
        let Some(current) = self.navigator.current_path() else {
            return Ok(Some("(no current path)".to_string()));
        };
        match self.navigator.current_absolute() {
            Ok(absolute) => Ok(Some(format!("{}  ({})", current, absolute.display()))),
            Err(_) => Ok(Some(format!("{current}  (currently unresolvable)"))),
        }
    }

    fn prompt(&self) -> String {
        match self.navigator.current_path() {
            Some(current) => format!("{current}> "),
            None => "fsbrowse> ".to_string(),
        }
    }

    /// Run the interactive loop until `quit` or end of input.
    pub fn run(&mut self) -> Result<()> {
        println!("fsbrowse v{}", env!("CARGO_PKG_VERSION"));
        println!("Type 'help' for commands, 'quit' to exit.\n");

        let mut rl: Editor<(), DefaultHistory> =
            Editor::new().context("Failed to create line editor")?;

        loop {
            match rl.readline(&self.prompt()) {
                Ok(line) => {
                    let _ = rl.add_history_entry(line.as_str());

                    match self.process_line(&line) {
                        Ok(Some(output)) => println!("{}", output),
                        Ok(None) => {}
                        Err(e) => eprintln!("Error: {}", e),
                    }
                    if self.done {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("^D");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {}", err);
                    break;
                }
            }
        }

        Ok(())
    }
}

const HELP_TEXT: &str = r#"fsbrowse — symbolic path browser

Commands:
  ls                List the current folder: '..' first, then folders, then files
  cd <entry>        Descend into a folder, or select a file
  up                Go to the parent folder (stops at the root)
  go <path>         Jump to a symbolic path, e.g. %PROJECTDIR%\reports or %USB1%/
  filter <spec>     Set the extension filter, e.g. *.csv;*.txt (no spec clears it)
  locations         Show the selectable roots; '*' marks the current one
  pwd               Show the current symbolic path and where it resolves
  help, ?           Show this help
  quit, exit        Leave the browser
"#;
