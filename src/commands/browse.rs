use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::accumulator::{AccumulatorConfig, Completion, Rejected};
use crate::client::ApiClient;
use crate::error::{BrowseError, Result};
use crate::output;
use crate::render;
use crate::session::Session;

const HELP: &str = "Commands: more (m), search <name> (s <name>), show, help, quit (q)";

#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    More,
    Search(&'a str),
    Show,
    Help,
    Quit,
    Blank,
    Unknown(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_lowercase().as_str() {
        "" => Input::Blank,
        "more" | "m" | "next" => Input::More,
        "search" | "s" | "/" => Input::Search(rest),
        "show" | "ls" => Input::Show,
        "help" | "h" | "?" => Input::Help,
        "quit" | "q" | "exit" => Input::Quit,
        _ => Input::Unknown(line),
    }
}

fn prompt() -> Result<()> {
    if output::is_json_output() {
        return Ok(());
    }
    print!("> ");
    std::io::stdout().flush()?;
    Ok(())
}

fn report_rejection(rejected: Rejected) {
    output::print_warning(&BrowseError::from(rejected).to_string());
}

fn report_completion(session: &Session, completion: Completion) {
    match completion {
        Completion::Stale => {}
        Completion::Failed(e) => output::print_warning(&format!("last action failed: {e}")),
        Completion::Replaced(n) => {
            output::print_message(&format!("Loaded {n} results"));
            render::print_results(session.accumulator());
        }
        Completion::Appended(n) => {
            output::print_message(&format!("Loaded {n} more"));
            render::print_results(session.accumulator());
        }
    }
}

pub async fn run(client: ApiClient, config: AccumulatorConfig) -> Result<()> {
    let session = Session::bootstrap(client, config).await?;
    run_with(session, BufReader::new(tokio::io::stdin())).await?;
    Ok(())
}

/// Drive `session` from line-based input until `quit` or end of input.
///
/// At end of input the last dispatched action still resolves and is shown.
pub async fn run_with<R>(mut session: Session, input: R) -> Result<Session>
where
    R: AsyncBufRead + Unpin,
{
    render::print_results(session.accumulator());
    output::print_message(HELP);
    prompt()?;

    let mut lines = input.lines();

    loop {
        tokio::select! {
            Some(completion) = session.next_completion(), if session.is_loading() => {
                if matches!(completion, Completion::Stale) {
                    continue;
                }
                report_completion(&session, completion);
                prompt()?;
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    while let Some(completion) = session.next_completion().await {
                        report_completion(&session, completion);
                    }
                    break;
                };

                match parse_input(&line) {
                    Input::More => {
                        if let Err(rejected) = session.load_more() {
                            report_rejection(rejected);
                        }
                    }
                    Input::Search(query) => {
                        if let Err(rejected) = session.search(query) {
                            report_rejection(rejected);
                        }
                    }
                    Input::Show => render::print_results(session.accumulator()),
                    Input::Help => output::print_message(HELP),
                    Input::Quit => break,
                    Input::Blank => {}
                    Input::Unknown(other) => {
                        output::print_warning(&format!("unknown command '{other}'. {HELP}"));
                    }
                }
                if !session.is_loading() {
                    prompt()?;
                }
            }
        }
    }

    Ok(session)
}
