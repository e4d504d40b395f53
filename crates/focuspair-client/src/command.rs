//! Parsing of interactive terminal commands.

/// One line of user input.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Create,
    Join(String),
    Solo,
    /// Stand-in for the page being hidden.
    Away,
    /// Stand-in for the page becoming visible again.
    Back,
    Break,
    End,
    Restart,
    /// Ambient volume as a fraction, 0.0 to 1.0.
    Volume(f32),
    Help,
    Quit,
}

pub const HELP: &str = "\
create          create a room and wait for a peer
join <code>     join a peer's room
solo            focus on your own
away / back     you left / returned to the session
break           take a break, once enough focus time has passed
volume <0-100>  ambient music volume
end             end the session
restart         start over after a session ended
quit            exit";

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();

    let command = match head.to_ascii_lowercase().as_str() {
        "create" | "c" => Command::Create,
        // A missing code is the session's call to reject.
        "join" | "j" => Command::Join(arg.unwrap_or_default().to_string()),
        "solo" | "s" => Command::Solo,
        "away" | "hide" => Command::Away,
        "back" | "show" => Command::Back,
        "break" | "b" => Command::Break,
        "end" | "e" => Command::End,
        "restart" | "r" => Command::Restart,
        "volume" | "vol" | "v" => {
            let raw = arg.ok_or("usage: volume <0-100>")?;
            let percent: f32 = raw
                .parse()
                .map_err(|_| format!("not a volume: {raw}"))?;
            if !(0.0..=100.0).contains(&percent) {
                return Err("volume must be between 0 and 100".into());
            }
            Command::Volume(percent / 100.0)
        }
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => return Err(format!("unknown command: {other} (try `help`)")),
    };
    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_ignored() {
        assert_eq!(parse_command(""), Ok(None));
        assert_eq!(parse_command("   \t"), Ok(None));
    }

    #[test]
    fn commands_and_aliases() {
        assert_eq!(parse_command("create"), Ok(Some(Command::Create)));
        assert_eq!(parse_command("C"), Ok(Some(Command::Create)));
        assert_eq!(parse_command(" solo "), Ok(Some(Command::Solo)));
        assert_eq!(parse_command("away"), Ok(Some(Command::Away)));
        assert_eq!(parse_command("back"), Ok(Some(Command::Back)));
        assert_eq!(parse_command("break"), Ok(Some(Command::Break)));
        assert_eq!(parse_command("end"), Ok(Some(Command::End)));
        assert_eq!(parse_command("restart"), Ok(Some(Command::Restart)));
        assert_eq!(parse_command("?"), Ok(Some(Command::Help)));
        assert_eq!(parse_command("exit"), Ok(Some(Command::Quit)));
    }

    #[test]
    fn join_takes_the_code() {
        assert_eq!(
            parse_command("join 4821"),
            Ok(Some(Command::Join("4821".into())))
        );
        assert_eq!(parse_command("join"), Ok(Some(Command::Join(String::new()))));
    }

    #[test]
    fn volume_is_a_percentage() {
        assert_eq!(parse_command("volume 50"), Ok(Some(Command::Volume(0.5))));
        assert_eq!(parse_command("v 0"), Ok(Some(Command::Volume(0.0))));
        assert!(parse_command("volume").is_err());
        assert!(parse_command("volume loud").is_err());
        assert!(parse_command("volume 150").is_err());
    }

    #[test]
    fn help_covers_every_command_without_fixed_timings() {
        let words = [
            "create", "join", "solo", "away", "back", "break", "volume", "end", "restart", "quit",
        ];
        for word in words {
            assert!(HELP.contains(word), "help is missing {word}");
        }
        // The break threshold is configurable.
        assert!(!HELP.contains("min"));
    }

    #[test]
    fn unknown_command_is_an_error() {
        let err = parse_command("dance").unwrap_err();
        assert!(err.contains("dance"));
    }
}
