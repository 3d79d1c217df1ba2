//! Palette commands and their ids.

use std::{fmt, str::FromStr};

use anyhow::{anyhow, Error};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    RunFile,
    RunFileWithEcho,
    RunSelection,
    CreateSession,
    CreateGitignore,
    RunLinter,
    InstallLinter,
    PreviewDataframe,
}

impl Command {
    pub const ALL: [Command; 8] = [
        Command::RunFile,
        Command::RunFileWithEcho,
        Command::RunSelection,
        Command::CreateSession,
        Command::CreateGitignore,
        Command::RunLinter,
        Command::InstallLinter,
        Command::PreviewDataframe,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Command::RunFile => "r.runSource",
            Command::RunFileWithEcho => "r.runSourcewithEcho",
            Command::RunSelection => "r.runSelection",
            Command::CreateSession => "r.createRTerm",
            Command::CreateGitignore => "r.createGitignore",
            Command::RunLinter => "r.lintr",
            Command::InstallLinter => "r.installLintr",
            Command::PreviewDataframe => "r.previewDataframe",
        }
    }

    /// Short name accepted at the console prompt.
    pub fn alias(self) -> &'static str {
        match self {
            Command::RunFile => "source",
            Command::RunFileWithEcho => "echo",
            Command::RunSelection => "run",
            Command::CreateSession => "term",
            Command::CreateGitignore => "gitignore",
            Command::RunLinter => "lint",
            Command::InstallLinter => "install-lintr",
            Command::PreviewDataframe => "view",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Command::RunFile => "Save and source the file",
            Command::RunFileWithEcho => "Save and source the file with echo",
            Command::RunSelection => "Send the selection or current line, then move down",
            Command::CreateSession => "Start an R console if none is running",
            Command::CreateGitignore => "Write an R .gitignore to the workspace",
            Command::RunLinter => "Lint the file with lintr",
            Command::InstallLinter => "Install lintr from CRAN",
            Command::PreviewDataframe => "Preview the selected data frame",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::ALL
            .into_iter()
            .find(|c| c.id() == s || c.alias() == s)
            .ok_or_else(|| anyhow!("unknown command: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_and_aliases_resolve() {
        for c in Command::ALL {
            assert_eq!(c.id().parse::<Command>().unwrap(), c);
            assert_eq!(c.alias().parse::<Command>().unwrap(), c);
        }
        assert!("r.unknown".parse::<Command>().is_err());
    }
}
