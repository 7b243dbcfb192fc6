//! Interactive session: line commands mapped onto sequencer and ban-list
//! operations. Slot numbers are 1-based on the command line.

use crate::render;
use rand::Rng;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use vp_core::{ExclusionSet, RevealSequencer, Role, SelectionMode, StartOutcome};

pub const HELP: &str = "\
commands:
  roll                 draw a squad (locked slots are kept)
  lock N               lock / unlock slot N
  reroll N             redraw slot N
  pick N NAME          put agent NAME into slot N
  ban NAME             ban / unban an agent
  ban-role ROLE        ban a whole role (again to unban)
  players N            squad size 1-5
  mode full|balance    selection mode
  pool                 show roster and bans
  show                 show current slots
  reset                clear slots and locks
  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Roll,
    Lock(usize),
    Reroll(usize),
    Pick(usize, String),
    Ban(String),
    BanRole(Role),
    Players(usize),
    Mode(SelectionMode),
    Pool,
    Show,
    Reset,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError(pub String);

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn slot_arg(arg: Option<&str>) -> Result<usize, ParseError> {
    let raw = arg.ok_or_else(|| ParseError("missing slot number".to_string()))?;
    match raw.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(ParseError(format!("bad slot number: {}", raw))),
    }
}

fn rest(parts: &[&str]) -> Result<String, ParseError> {
    if parts.is_empty() {
        return Err(ParseError("missing name".to_string()));
    }
    Ok(parts.join(" "))
}

impl FromStr for SessionCommand {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some((head, args)) = parts.split_first() else {
            return Err(ParseError("empty command".to_string()));
        };

        match head.to_ascii_lowercase().as_str() {
            "roll" | "r" => Ok(SessionCommand::Roll),
            "lock" | "l" => Ok(SessionCommand::Lock(slot_arg(args.first().copied())?)),
            "reroll" => Ok(SessionCommand::Reroll(slot_arg(args.first().copied())?)),
            "pick" => {
                let index = slot_arg(args.first().copied())?;
                Ok(SessionCommand::Pick(index, rest(args.get(1..).unwrap_or_default())?))
            }
            "ban" => Ok(SessionCommand::Ban(rest(args)?)),
            "ban-role" => {
                let name = rest(args)?;
                Role::from_name(&name)
                    .map(SessionCommand::BanRole)
                    .ok_or_else(|| ParseError(format!("unknown role: {}", name)))
            }
            "players" => {
                let raw = args.first().ok_or_else(|| ParseError("missing count".to_string()))?;
                raw.parse().map(SessionCommand::Players).map_err(|_| ParseError(format!("bad count: {}", raw)))
            }
            "mode" => {
                let raw = args.first().ok_or_else(|| ParseError("missing mode".to_string()))?;
                raw.parse().map(SessionCommand::Mode).map_err(ParseError)
            }
            "pool" => Ok(SessionCommand::Pool),
            "show" | "s" => Ok(SessionCommand::Show),
            "reset" => Ok(SessionCommand::Reset),
            "help" | "?" => Ok(SessionCommand::Help),
            "quit" | "exit" | "q" => Ok(SessionCommand::Quit),
            other => Err(ParseError(format!("unknown command: {} (try 'help')", other))),
        }
    }
}

/// What the caller should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Message(String),
    /// Timers are armed; drive the sequencer until idle.
    Animate,
    Quit,
}

pub struct Session<R: Rng> {
    pub sequencer: RevealSequencer<R>,
    pub excluded: ExclusionSet,
}

impl<R: Rng> Session<R> {
    pub fn new(sequencer: RevealSequencer<R>, excluded: ExclusionSet) -> Self {
        Self { sequencer, excluded }
    }

    fn show(&self) -> String {
        render::squad_line(self.sequencer.slots())
    }

    pub fn apply(&mut self, command: SessionCommand, now: Duration) -> Outcome {
        match command {
            SessionCommand::Roll => match self.sequencer.start(now, &self.excluded) {
                Ok(StartOutcome::Started) => Outcome::Animate,
                Ok(StartOutcome::Ignored) => Outcome::Message("a roll is already running".to_string()),
                Err(error) if error.is_user_fixable() => {
                    Outcome::Message(format!("cannot roll: {} (unban agents or lower the squad size)", error))
                }
                Err(error) => Outcome::Message(format!("cannot roll: {}", error)),
            },
            SessionCommand::Reroll(index) => {
                if self.sequencer.reroll(index, now, &self.excluded) {
                    Outcome::Animate
                } else {
                    Outcome::Message(format!("slot {} cannot be rerolled", index + 1))
                }
            }
            SessionCommand::Lock(index) => match self.sequencer.toggle_lock(index) {
                Ok(true) => Outcome::Message(format!("slot {} locked", index + 1)),
                Ok(false) => Outcome::Message(format!("slot {} unlocked", index + 1)),
                Err(error) => Outcome::Message(error.to_string()),
            },
            SessionCommand::Pick(index, name) => match self.sequencer.substitute_by_name(index, &name) {
                Ok(()) => Outcome::Message(self.show()),
                Err(error) => Outcome::Message(error.to_string()),
            },
            SessionCommand::Ban(name) => {
                let Some(agent) = self.sequencer.roster().find_by_name(&name).cloned() else {
                    return Outcome::Message(format!("unknown agent: {}", name));
                };
                let verb = if self.excluded.toggle_agent(&agent.uuid) { "banned" } else { "unbanned" };
                Outcome::Message(format!("{} {}{}", agent.display_name, verb, self.pool_warning()))
            }
            SessionCommand::BanRole(role) => {
                let banned = self.excluded.toggle_role(self.sequencer.roster(), role);
                let verb = if banned { "banned" } else { "unbanned" };
                Outcome::Message(format!("all {}s {}{}", role, verb, self.pool_warning()))
            }
            SessionCommand::Players(count) => match self.sequencer.set_player_count(count) {
                Ok(()) => Outcome::Message(format!("squad size {}{}", count, self.pool_warning())),
                Err(error) => Outcome::Message(error.to_string()),
            },
            SessionCommand::Mode(mode) => {
                self.sequencer.set_mode(mode);
                Outcome::Message(format!("mode {}", mode))
            }
            SessionCommand::Pool => Outcome::Message(render::pool_summary(self.sequencer.roster(), &self.excluded)),
            SessionCommand::Show => Outcome::Message(self.show()),
            SessionCommand::Reset => {
                self.sequencer.reset();
                Outcome::Message("slots cleared".to_string())
            }
            SessionCommand::Help => Outcome::Message(HELP.to_string()),
            SessionCommand::Quit => Outcome::Quit,
        }
    }

    /// Full-random needs as many unbanned agents as slots.
    fn pool_warning(&self) -> String {
        let n = self.sequencer.player_count();
        if self.sequencer.mode() == SelectionMode::FullRandom
            && !self.excluded.is_valid_config(self.sequencer.roster(), n)
        {
            format!(" (warning: fewer than {} agents available)", n)
        } else {
            String::new()
        }
    }
}
