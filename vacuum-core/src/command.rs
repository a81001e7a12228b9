//! Operator commands
//!
//! The three named commands map one-to-one onto the command surface of
//! [`VacuumZone`](crate::zone::VacuumZone). None take arguments.

/// Command parse errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Blank input
    Empty,
    /// Not a vacuum command
    Unknown,
    /// A vacuum command followed by parameters
    UnexpectedArguments,
}

/// Named operator command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// `ENABLE_VACUUM`
    EnableVacuum,
    /// `DISABLE_VACUUM`
    DisableVacuum,
    /// `EMPTY_VACUUM_TANK`
    EmptyVacuumTank,
}

impl Command {
    /// Every command, in registration order
    pub const ALL: [Command; 3] = [
        Command::EnableVacuum,
        Command::DisableVacuum,
        Command::EmptyVacuumTank,
    ];

    /// Registered command name
    pub const fn name(&self) -> &'static str {
        match self {
            Command::EnableVacuum => "ENABLE_VACUUM",
            Command::DisableVacuum => "DISABLE_VACUUM",
            Command::EmptyVacuumTank => "EMPTY_VACUUM_TANK",
        }
    }

    /// One-line help text
    pub const fn help(&self) -> &'static str {
        match self {
            Command::EnableVacuum => "Enable Vacuum System",
            Command::DisableVacuum => "Disable Vacuum System",
            Command::EmptyVacuumTank => "Repressure Tank",
        }
    }

    /// Parse a command line
    ///
    /// Names match case-insensitively; surrounding whitespace is ignored.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or(CommandError::Empty)?;

        let command = Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(name))
            .ok_or(CommandError::Unknown)?;

        if words.next().is_some() {
            return Err(CommandError::UnexpectedArguments);
        }

        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        for command in Command::ALL {
            assert_eq!(Command::parse(command.name()), Ok(command));
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            Command::parse("  enable_vacuum\r\n"),
            Ok(Command::EnableVacuum)
        );
        assert_eq!(
            Command::parse("Empty_Vacuum_Tank"),
            Ok(Command::EmptyVacuumTank)
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Command::parse(""), Err(CommandError::Empty));
        assert_eq!(Command::parse("   "), Err(CommandError::Empty));
        assert_eq!(Command::parse("G28"), Err(CommandError::Unknown));
        assert_eq!(
            Command::parse("DISABLE_VACUUM NOW=1"),
            Err(CommandError::UnexpectedArguments)
        );
    }

    #[test]
    fn test_help_text() {
        assert_eq!(Command::EmptyVacuumTank.help(), "Repressure Tank");
    }
}
