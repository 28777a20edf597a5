//! Interactive session: the controller driven by line commands.
//!
//! One controller lives for the whole session, the way the upload page
//! lives for a browser tab. Commands run one at a time, so at most one
//! verification is ever in flight.

use std::path::PathBuf;
use std::str::FromStr;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::controller::{Controller, ControllerError};
use crate::llm::CertificateVerifier;
use crate::upload;
use crate::view;

const PROMPT: &str = "certverify> ";

const HELP: &str = "\
Commands:
  open <path>   select a certificate image (PNG, JPG, or WEBP)
  verify        analyze the selected certificate
  reset         clear the file and any result
  show          show the current panel
  help          show this help
  quit          leave the session
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Open(PathBuf),
    Verify,
    Reset,
    Show,
    Help,
    Quit,
}

impl FromStr for SessionCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        match word.to_ascii_lowercase().as_str() {
            "open" | "select" if !rest.is_empty() => Ok(SessionCommand::Open(PathBuf::from(rest))),
            "open" | "select" => Err("Usage: open <path>".to_string()),
            "verify" => Ok(SessionCommand::Verify),
            "reset" | "clear" => Ok(SessionCommand::Reset),
            "show" => Ok(SessionCommand::Show),
            "help" | "?" => Ok(SessionCommand::Help),
            "quit" | "exit" => Ok(SessionCommand::Quit),
            other => Err(format!("Unknown command: {other}. Type `help`.")),
        }
    }
}

/// Read commands from `input` until `quit` or end of input.
pub async fn run_session<V, R, W>(
    verifier: &V,
    input: R,
    mut output: W,
) -> std::io::Result<Controller>
where
    V: CertificateVerifier,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut controller = Controller::new();
    let mut lines = input.lines();

    output.write_all(view::render(&controller).as_bytes()).await?;
    output.write_all(PROMPT.as_bytes()).await?;
    output.flush().await?;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            output.write_all(PROMPT.as_bytes()).await?;
            output.flush().await?;
            continue;
        }

        let command = match line.parse::<SessionCommand>() {
            Ok(command) => command,
            Err(message) => {
                output.write_all(format!("{message}\n{PROMPT}").as_bytes()).await?;
                output.flush().await?;
                continue;
            }
        };
        log::debug!("[SESSION] {:?}", command);

        match command {
            SessionCommand::Quit => break,
            SessionCommand::Help => output.write_all(HELP.as_bytes()).await?,
            SessionCommand::Show => output.write_all(view::render(&controller).as_bytes()).await?,
            SessionCommand::Open(path) => match upload::read_candidate(&path).await {
                Ok(candidate) => {
                    let refused = controller.select_file(candidate).err();
                    output.write_all(view::render(&controller).as_bytes()).await?;
                    match refused {
                        // already shown as the inline notice
                        None | Some(ControllerError::InvalidFile(_)) => {}
                        Some(e) => {
                            log::info!("[SESSION] open refused: {}", e);
                            output.write_all(format!("! {e}\n").as_bytes()).await?;
                        }
                    }
                }
                Err(e) => output.write_all(format!("! {e}\n").as_bytes()).await?,
            },
            SessionCommand::Verify => match controller.begin_verification() {
                Ok(file) => {
                    output.write_all(view::render(&controller).as_bytes()).await?;
                    output.flush().await?;
                    let outcome = verifier.verify(&file.bytes, file.mime).await;
                    controller.complete_verification(outcome);
                    output.write_all(view::render(&controller).as_bytes()).await?;
                }
                Err(e) => {
                    log::info!("[SESSION] verify refused: {}", e);
                    output.write_all(view::render(&controller).as_bytes()).await?;
                    if !matches!(e, ControllerError::NoFileSelected) {
                        output.write_all(format!("! {e}\n").as_bytes()).await?;
                    }
                }
            },
            SessionCommand::Reset => match controller.reset() {
                Ok(()) => output.write_all(view::render(&controller).as_bytes()).await?,
                Err(e) => output.write_all(format!("! {e}\n").as_bytes()).await?,
            },
        }

        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;
    }

    output.flush().await?;
    Ok(controller)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_and_paths_with_spaces() {
        assert_eq!(
            "open  My Scans/diploma.png ".parse::<SessionCommand>(),
            Ok(SessionCommand::Open(PathBuf::from("My Scans/diploma.png")))
        );
        assert_eq!("VERIFY".parse::<SessionCommand>(), Ok(SessionCommand::Verify));
        assert_eq!("clear".parse::<SessionCommand>(), Ok(SessionCommand::Reset));
        assert_eq!("exit".parse::<SessionCommand>(), Ok(SessionCommand::Quit));
    }

    #[test]
    fn rejects_open_without_path_and_unknown_words() {
        assert!("open".parse::<SessionCommand>().is_err());
        let err = "upload x.png".parse::<SessionCommand>().unwrap_err();
        assert!(err.contains("Unknown command: upload"));
    }
}
