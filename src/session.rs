//! Interaction-scoped state for the interactive mode.
//!
//! The fragment text and the query survive between submissions; every
//! submission recomputes everything else from scratch.

use crate::{
    analysis::{analyze, Report},
    config::AppConfig,
    error::Result,
};

#[derive(Debug, Clone)]
pub struct Session {
    config: AppConfig,
    fragments_text: String,
    query: String,
    last_report: Option<Report>,
}

impl Session {
    /// Start with the configured default fragments and query
    pub fn new(config: AppConfig) -> Self {
        let fragments_text = config.default_fragments_text();
        let query = config.default_query.clone();
        Self {
            config,
            fragments_text,
            query,
            last_report: None,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn fragments_text(&self) -> &str {
        &self.fragments_text
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_fragments(&mut self, text: impl Into<String>) {
        self.fragments_text = text.into();
    }

    /// Append one line to the fragment text
    pub fn add_fragment(&mut self, line: &str) {
        if !self.fragments_text.is_empty() && !self.fragments_text.ends_with('\n') {
            self.fragments_text.push('\n');
        }
        self.fragments_text.push_str(line);
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Back to the configured defaults
    pub fn reset(&mut self) {
        self.fragments_text = self.config.default_fragments_text();
        self.query = self.config.default_query.clone();
        self.last_report = None;
    }

    /// Run one computation over the current inputs.
    /// A failed submission clears the previous report.
    pub fn submit(&mut self) -> Result<&Report> {
        self.last_report = None;
        let report = analyze(&self.fragments_text, &self.query, &self.config.analysis())?;
        Ok(&*self.last_report.insert(report))
    }

    pub fn last_report(&self) -> Option<&Report> {
        self.last_report.as_ref()
    }
}

/// One line typed in the interactive mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// replace the fragments; lines follow until a single "."
    Fragments,
    Add(String),
    Query(String),
    Show,
    Run,
    Reset,
    Help,
    Quit,
    /// bare text: use it as the query and run
    Ask(String),
    Empty,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Command::Empty;
        }
        let Some(rest) = line.strip_prefix(':') else {
            return Command::Ask(line.to_string());
        };
        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };
        match name {
            "fragments" | "f" => Command::Fragments,
            "add" | "a" => Command::Add(arg.to_string()),
            "query" | "q" => Command::Query(arg.to_string()),
            "show" | "s" => Command::Show,
            "run" | "r" => Command::Run,
            "reset" => Command::Reset,
            "help" | "h" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        }
    }
}

pub const HELP: &str = "\
Commands:
  :fragments      replace the fragments (one per line, finish with a single '.')
  :add <line>     append one fragment
  :query <text>   set the query without running
  :show           show the current fragments and query
  :run            compute the affinity for the current inputs
  :reset          restore the default fragments and query
  :help           show this help
  :quit           leave
Any other line is used as the query and computed right away.";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AffinityError;

    #[test]
    fn starts_from_defaults_and_remembers_the_query() {
        let mut session = Session::new(AppConfig::default());
        assert_eq!(session.query(), "Which creature howls?");
        assert_eq!(session.fragments_text().lines().count(), 3);

        session.set_query("Who observes the night?");
        let best = session.submit().unwrap().best.index;
        assert_eq!(best, 1);
        assert_eq!(session.query(), "Who observes the night?");
        assert!(session.last_report().is_some());
    }

    #[test]
    fn failed_submission_keeps_inputs_and_drops_report() {
        let mut session = Session::new(AppConfig::default());
        session.submit().unwrap();
        session.set_fragments("   \n");
        let err = session.submit().unwrap_err();
        assert!(matches!(err, AffinityError::NoFragments));
        assert!(session.last_report().is_none());
        assert_eq!(session.fragments_text(), "   \n");
    }

    #[test]
    fn add_fragment_appends_a_line() {
        let mut session = Session::new(AppConfig::default());
        session.set_fragments("first");
        session.add_fragment("second");
        assert_eq!(session.fragments_text(), "first\nsecond");
        session.reset();
        assert_eq!(session.fragments_text(), AppConfig::default().default_fragments_text());
    }

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse(":query  why? "), Command::Query("why?".into()));
        assert_eq!(Command::parse(":q"), Command::Query(String::new()));
        assert_eq!(Command::parse(":add a new line"), Command::Add("a new line".into()));
        assert_eq!(Command::parse(":run"), Command::Run);
        assert_eq!(Command::parse("  "), Command::Empty);
        assert_eq!(Command::parse("which hound?"), Command::Ask("which hound?".into()));
        assert_eq!(Command::parse(":nope"), Command::Unknown("nope".into()));
    }
}
