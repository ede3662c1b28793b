use std::io::{BufRead, Write};

use anyhow::Context;
use tracing::{info, warn};
use tracker_lib::{FifoMessageTracker, MessageTracker, TrackerError};

use crate::script::{Command, parse_line};

/// Runs every command of a script against the tracker, writing one result per
/// command. `NotFound` is reported as output and does not stop the replay.
pub fn replay(
    tracker: &mut FifoMessageTracker,
    input: impl BufRead,
    output: &mut impl Write,
) -> anyhow::Result<usize> {
    let mut executed = 0;
    for (index, line) in input.lines().enumerate() {
        let line_number = index + 1;
        let line = line.with_context(|| format!("failed to read line {line_number}"))?;
        let Some(command) =
            parse_line(&line).with_context(|| format!("invalid command on line {line_number}"))?
        else {
            continue;
        };
        execute(tracker, command, output)?;
        executed += 1;
    }
    info!(
        executed,
        tracked = tracker.len(),
        capacity = tracker.capacity(),
        "replay finished"
    );
    Ok(executed)
}

fn execute(
    tracker: &mut FifoMessageTracker,
    command: Command,
    output: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        Command::Add(message) => {
            let id = message.id.clone();
            if tracker.add(message) {
                writeln!(output, "added {id}")?;
            } else {
                writeln!(output, "duplicate {id}")?;
            }
        }
        Command::Delete(id) => match tracker.delete(&id) {
            Ok(_) => writeln!(output, "deleted {id}")?,
            Err(err) => report(output, err)?,
        },
        Command::Get(id) => match tracker.message(&id) {
            Ok(message) => writeln!(
                output,
                "{} origin={} payload={}",
                message.id,
                message.origin,
                String::from_utf8_lossy(&message.payload)
            )?,
            Err(err) => report(output, err)?,
        },
        Command::List => {
            if tracker.is_empty() {
                writeln!(output, "(empty)")?;
            }
            for message in tracker.messages() {
                writeln!(output, "{} {}", message.id, message.origin)?;
            }
        }
        Command::Stats => {
            write!(output, "{}", tracker.metrics().snapshot())?;
        }
    }
    Ok(())
}

fn report(output: &mut impl Write, err: TrackerError) -> anyhow::Result<()> {
    warn!("{err}");
    writeln!(output, "{err}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(capacity: usize, script: &str) -> String {
        let mut tracker = FifoMessageTracker::new(capacity).unwrap();
        let mut output = Vec::new();
        replay(&mut tracker, Cursor::new(script), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_replay_eviction_and_listing() {
        let output = run(
            2,
            "add m0 peerA\n\
             add m1 peerB\n\
             # m0 is evicted here\n\
             add m2 peerC\n\
             list\n\
             get m0\n",
        );
        assert_eq!(
            output,
            "added m0\n\
             added m1\n\
             added m2\n\
             m1 peerB\n\
             m2 peerC\n\
             message not found: m0\n"
        );
    }

    #[test]
    fn test_replay_duplicates_and_deletes() {
        let output = run(
            5,
            "add m0 peerA ping\n\
             add m0 peerB pong\n\
             get m0\n\
             del m0\n\
             del m0\n\
             list\n",
        );
        assert_eq!(
            output,
            "added m0\n\
             duplicate m0\n\
             m0 origin=peerA payload=ping\n\
             deleted m0\n\
             message not found: m0\n\
             (empty)\n"
        );
    }

    #[test]
    fn test_replay_stats() {
        let output = run(1, "add m0 a\nadd m1 a\nadd m1 a\nstats\n");
        assert!(output.contains("  Added: 2\n"));
        assert!(output.contains("  Duplicates: 1\n"));
        assert!(output.contains("  Evicted: 1\n"));
    }

    #[test]
    fn test_replay_stops_on_malformed_line() {
        let mut tracker = FifoMessageTracker::new(3).unwrap();
        let mut output = Vec::new();
        let err = replay(
            &mut tracker,
            Cursor::new("add m0 a\nbogus\nadd m1 a\n"),
            &mut output,
        )
        .unwrap_err();

        assert_eq!(err.to_string(), "invalid command on line 2");
        assert_eq!(tracker.len(), 1);
    }
}
