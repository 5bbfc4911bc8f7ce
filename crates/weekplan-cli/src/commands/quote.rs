use clap::Subcommand;
use weekplan_core::{Config, GeminiProvider, PlanEdit, QuoteService};

use super::{open_session, persist, CmdResult};

#[derive(Subcommand)]
pub enum QuoteAction {
    /// Replace the week's quote
    Set {
        /// Quote text
        text: String,
    },
    /// Generate a quote from this week's tasks
    Generate,
}

pub fn run(offset: i64, action: QuoteAction) -> CmdResult {
    let mut session = open_session(offset)?;

    match action {
        QuoteAction::Set { text } => {
            session.edit(PlanEdit::SetQuote { text })?;
        }
        QuoteAction::Generate => {
            let config = Config::load()?;
            let quotes = QuoteService::new(GeminiProvider::from_config(&config.quote));
            session.refresh_quote_blocking(&quotes)?;
        }
    }

    persist(&mut session)?;
    println!("{}", session.data().quote);
    Ok(())
}
