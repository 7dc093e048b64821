//! Pre-match setup dialogs.

use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};
use chess_with_guns_core::{PieceRole, WeaponKind};

use crate::config::SideSettings;

/// Blocking prompts used to configure a match before it starts.
pub(crate) trait SetupDialog {
    /// Asks the user to pick one of `options`, returning its index.
    fn choose_one(&mut self, title: &str, options: &[&str]) -> Result<usize>;

    /// Asks a yes/no question.
    fn choose_yes_no(&mut self, title: &str) -> Result<bool>;
}

/// Line-based dialog over any reader/writer pair, usually stdin and stdout.
#[derive(Debug)]
pub(crate) struct TerminalDialog<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalDialog<R, W> {
    pub(crate) fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_answer(&mut self) -> Result<String> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("failed to read setup answer")?;
        if read == 0 {
            bail!("setup input closed before every question was answered");
        }
        Ok(line.trim().to_owned())
    }
}

impl<R: BufRead, W: Write> SetupDialog for TerminalDialog<R, W> {
    fn choose_one(&mut self, title: &str, options: &[&str]) -> Result<usize> {
        writeln!(self.output, "{title}")?;
        for (index, option) in options.iter().enumerate() {
            writeln!(self.output, "  {}) {option}", index + 1)?;
        }
        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;
            let answer = self.read_answer()?;
            let by_number = answer
                .parse::<usize>()
                .ok()
                .filter(|choice| (1..=options.len()).contains(choice))
                .map(|choice| choice - 1);
            let by_name = options
                .iter()
                .position(|option| option.eq_ignore_ascii_case(&answer));
            match by_number.or(by_name) {
                Some(index) => return Ok(index),
                None => writeln!(self.output, "Please pick one of the listed options.")?,
            }
        }
    }

    fn choose_yes_no(&mut self, title: &str) -> Result<bool> {
        loop {
            write!(self.output, "{title} [y/n] ")?;
            self.output.flush()?;
            match self.read_answer()?.to_ascii_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => writeln!(self.output, "Please answer y or n.")?,
            }
        }
    }
}

/// Asks for the piece, weapon and controller of one side.
pub(crate) fn configure_side(dialog: &mut dyn SetupDialog, side: &mut SideSettings) -> Result<()> {
    let name = side.color.label();

    let roles: Vec<&str> = PieceRole::ALL.iter().map(|role| role.label()).collect();
    side.role = PieceRole::ALL[dialog.choose_one(&format!("{name} piece"), &roles)?];

    let weapons: Vec<&str> = WeaponKind::ALL.iter().map(|weapon| weapon.label()).collect();
    side.weapon = WeaponKind::ALL[dialog.choose_one(&format!("{name} weapon"), &weapons)?];

    side.ai = dialog.choose_yes_no(&format!("{name} AI"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchSettings;
    use std::io::Cursor;

    fn dialog(script: &str) -> TerminalDialog<Cursor<Vec<u8>>, Vec<u8>> {
        TerminalDialog::new(Cursor::new(script.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn options_can_be_picked_by_number_or_name() {
        let mut dialog = dialog("2\nshotgun\n");
        let options = ["Pistol", "Shotgun", "Rifle"];

        assert_eq!(dialog.choose_one("Weapon", &options).expect("answer"), 1);
        assert_eq!(dialog.choose_one("Weapon", &options).expect("answer"), 1);
    }

    #[test]
    fn invalid_answers_are_asked_again() {
        let mut dialog = dialog("9\nmaybe\n1\nperhaps\nN\n");

        assert_eq!(dialog.choose_one("Piece", &["Pawn"]).expect("answer"), 0);
        assert!(!dialog.choose_yes_no("AI").expect("answer"));
        let transcript = String::from_utf8(dialog.output).expect("utf-8 output");
        assert!(transcript.contains("Please pick one of the listed options."));
        assert!(transcript.contains("Please answer y or n."));
    }

    #[test]
    fn closed_input_is_an_error() {
        let mut dialog = dialog("");

        assert!(dialog.choose_yes_no("AI").is_err());
    }

    #[test]
    fn a_side_is_configured_in_three_questions() {
        let mut settings = MatchSettings::default();
        let mut dialog = dialog("knight\n7\ny\n");

        configure_side(&mut dialog, &mut settings.white).expect("complete answers");

        assert_eq!(settings.white.role, PieceRole::Knight);
        assert_eq!(settings.white.weapon, WeaponKind::RocketLauncher);
        assert!(settings.white.ai);
    }
}
