//! Shell command parsing
//!
//! One input line becomes one [`Command`]. Arguments are split on
//! whitespace; double quotes group words (`--project "Tower A"`).

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login {
        username: String,
        password: Option<String>,
    },
    Logout,
    Menu,
    /// Section id or 1-based menu position
    Go(String),
    Permit,
    Observation,
    Open,
    Refresh,
    Close(String),
    Search(SearchArgs),
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchArgs {
    pub project: Option<String>,
    pub requester: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub open_only: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command \"{0}\" (try `help`)")]
    Unknown(String),

    #[error("`{command}` needs {arg}")]
    MissingArgument {
        command: &'static str,
        arg: &'static str,
    },

    #[error("unknown flag \"{0}\"")]
    UnknownFlag(String),

    #[error("flag {0} needs a value")]
    MissingValue(String),

    #[error("unterminated quote")]
    UnterminatedQuote,
}

pub const HELP: &str = "\
Commands:
  login <username> [password]   sign in
  menu                          list your sections
  go <section|number>           switch section
  permit                        fill in a new permit
  observation                   record a safety observation
  open                          list open permits
  refresh                       reload open permits
  close <permit-id>             close an open permit
  search [--project P] [--requester R] [--from YYYY-MM-DD] [--to YYYY-MM-DD] [--open]
  show                          redraw the current view
  logout                        sign out
  quit                          leave the shell

In a form: Enter keeps the shown value, - clears it, Ctrl-C cancels.";

/// How guided form entry treats input.
pub const FORM_KEYS: &str =
    "In a form: Enter keeps the shown value, - clears it, Ctrl-C cancels.";

/// Parse one input line. Blank lines are `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
    let words = split_args(line)?;
    let Some((head, rest)) = words.split_first() else {
        return Ok(None);
    };

    let command = match head.to_ascii_lowercase().as_str() {
        "login" => {
            let username = rest.first().cloned().ok_or(ParseError::MissingArgument {
                command: "login",
                arg: "a username",
            })?;
            Command::Login {
                username,
                password: rest.get(1).cloned(),
            }
        }
        "logout" => Command::Logout,
        "menu" | "ls" => Command::Menu,
        "go" | "cd" => Command::Go(rest.first().cloned().ok_or(ParseError::MissingArgument {
            command: "go",
            arg: "a section",
        })?),
        "permit" | "new-permit" => Command::Permit,
        "observation" | "observe" => Command::Observation,
        "open" => Command::Open,
        "refresh" => Command::Refresh,
        "close" => Command::Close(rest.first().cloned().ok_or(ParseError::MissingArgument {
            command: "close",
            arg: "a permit id",
        })?),
        "search" | "find" => Command::Search(parse_search(rest)?),
        "show" | "status" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(ParseError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn parse_search(args: &[String]) -> Result<SearchArgs, ParseError> {
    let mut search = SearchArgs::default();
    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        let slot = match flag.as_str() {
            "--open" => {
                search.open_only = true;
                continue;
            }
            "--project" | "-p" => &mut search.project,
            "--requester" | "-r" => &mut search.requester,
            "--from" => &mut search.from,
            "--to" => &mut search.to,
            other => return Err(ParseError::UnknownFlag(other.to_string())),
        };
        let value = iter
            .next()
            .ok_or_else(|| ParseError::MissingValue(flag.clone()))?;
        *slot = Some(value.clone());
    }
    Ok(search)
}

/// Whitespace split with double-quote grouping.
pub fn split_args(line: &str) -> Result<Vec<String>, ParseError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                in_word = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if quoted {
        return Err(ParseError::UnterminatedQuote);
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}
