//! CLI `repl` command: an editable query/candidate session.
//!
//! Each line is one command. Slots keep their cached embeddings between `match`
//! commands until their text is edited, so re-matching after a single edit only
//! embeds the edited slot.

use anyhow::{Context, Result};
use std::io::Write;
use std::str::FromStr;
use tokio::io::{AsyncBufReadExt, BufReader};

use vecsearch::config::VecsearchConfig;
use vecsearch::matching::{MatchEngine, SlotId};

const HELP: &str = "\
Commands:
  query <text>       replace the query text
  add [text]         add a candidate (empty if no text)
  set <id> <text>    replace candidate <id>'s text
  remove <id>        remove candidate <id>
  list               show the query and candidates
  match              rank candidates against the query
  help               show this help
  quit               leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Query(String),
    Add(String),
    Set(u64, String),
    Remove(u64),
    List,
    Match,
    Help,
    Quit,
}

impl FromStr for ReplCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let parse_id = |s: &str| -> Result<u64, String> {
            s.parse().map_err(|_| format!("not a candidate id: {s:?}"))
        };

        match word {
            "query" => Ok(Self::Query(rest.to_owned())),
            "add" => Ok(Self::Add(rest.to_owned())),
            "set" => {
                let (id, text) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                Ok(Self::Set(parse_id(id)?, text.trim().to_owned()))
            }
            "remove" | "rm" => Ok(Self::Remove(parse_id(rest)?)),
            "list" | "ls" => Ok(Self::List),
            "match" | "m" => Ok(Self::Match),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            "" => Err("empty command".into()),
            other => Err(format!("unknown command: {other} (try `help`)")),
        }
    }
}

/// Run the interactive session on stdin/stdout.
pub async fn repl(config: &VecsearchConfig) -> Result<()> {
    let provider = super::shared_provider(config)?;
    let engine = MatchEngine::with_candidates(
        provider,
        config.defaults.query.clone(),
        config.defaults.candidates.iter().cloned(),
    );

    println!("{HELP}\n");
    print_slots(&engine);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush().context("failed to flush stdout")?;

        let Some(line) = lines.next_line().await.context("failed to read stdin")? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<ReplCommand>() {
            Ok(command) => command,
            Err(msg) => {
                println!("{msg}");
                continue;
            }
        };

        match command {
            ReplCommand::Query(text) => engine.set_query(text),
            ReplCommand::Add(text) => {
                let id = engine.add_candidate(text);
                println!("added {}", display_id(id));
            }
            ReplCommand::Set(n, text) => {
                if let Err(e) = engine.set_text(SlotId::Candidate(n), text) {
                    println!("{e}");
                }
            }
            ReplCommand::Remove(n) => match engine.remove_candidate(SlotId::Candidate(n)) {
                Ok(slot) => println!("removed {n}: {}", slot.content),
                Err(e) => println!("{e}"),
            },
            ReplCommand::List => print_slots(&engine),
            ReplCommand::Match => match super::with_spinner(engine.match_candidates()).await {
                Ok(report) => print!("{}", super::render_report(&report, &engine.candidates())),
                Err(e) => println!("Error: {e}"),
            },
            ReplCommand::Help => println!("{HELP}"),
            ReplCommand::Quit => break,
        }
    }

    Ok(())
}

fn display_id(id: SlotId) -> String {
    match id {
        SlotId::Query => "query".into(),
        SlotId::Candidate(n) => n.to_string(),
    }
}

fn print_slots(engine: &MatchEngine) {
    let query = engine.query();
    let mark = |id: SlotId| if engine.is_cached(id) { "*" } else { " " };

    println!("query{} {}", mark(query.id), query.content);
    for slot in engine.candidates() {
        println!("{:>4}{} {}", display_id(slot.id), mark(slot.id), slot.content);
    }
    println!("(* = embedding cached)");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(
            "query Yellow fruit".parse::<ReplCommand>(),
            Ok(ReplCommand::Query("Yellow fruit".into()))
        );
        assert_eq!("add".parse::<ReplCommand>(), Ok(ReplCommand::Add(String::new())));
        assert_eq!(
            "add  green apple ".parse::<ReplCommand>(),
            Ok(ReplCommand::Add("green apple".into()))
        );
        assert_eq!(
            "set 2 ripe banana".parse::<ReplCommand>(),
            Ok(ReplCommand::Set(2, "ripe banana".into()))
        );
        assert_eq!("set 4".parse::<ReplCommand>(), Ok(ReplCommand::Set(4, String::new())));
        assert_eq!("rm 1".parse::<ReplCommand>(), Ok(ReplCommand::Remove(1)));
        assert_eq!(" match ".parse::<ReplCommand>(), Ok(ReplCommand::Match));
        assert_eq!("ls".parse::<ReplCommand>(), Ok(ReplCommand::List));
        assert_eq!("q".parse::<ReplCommand>(), Ok(ReplCommand::Quit));
    }

    #[test]
    fn rejects_bad_input() {
        assert!("remove apple".parse::<ReplCommand>().is_err());
        assert!("set x text".parse::<ReplCommand>().is_err());
        assert!("frobnicate".parse::<ReplCommand>().is_err());
        assert!("".parse::<ReplCommand>().is_err());
    }
}
