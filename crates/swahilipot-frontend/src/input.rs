use crate::views::Control;

/// Surface a command is aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Fm,
    Mini,
}

/// A line of terminal input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Press(Surface, Control),
    Quit,
}

pub const HELP: &str = "commands: fm toggle | fm stop | mini toggle | mini stop | quit";

/// Parses `<surface> <control>` or `quit`. Case and extra spaces are ignored.
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim().to_ascii_lowercase();
    let mut words = line.split_whitespace();

    let first = words.next()?;
    if matches!(first, "quit" | "q" | "exit") {
        return words.next().is_none().then_some(Command::Quit);
    }

    let surface = match first {
        "fm" => Surface::Fm,
        "mini" => Surface::Mini,
        _ => return None,
    };
    let control = match words.next()? {
        "toggle" | "t" => Control::Toggle,
        "stop" | "s" => Control::Stop,
        _ => return None,
    };

    words
        .next()
        .is_none()
        .then_some(Command::Press(surface, control))
}
