//! Account commands: `tm add-account` and `tm accounts`.

use std::fmt::Write;

use anyhow::Result;
use chrono::{Local, TimeZone, Utc};
use tm_core::{Account, local_date};
use tm_db::Ledger;

/// Creates an account, failing loudly on a duplicate name.
pub fn add(ledger: &mut Ledger, name: &str) -> Result<()> {
    let now = Utc::now().timestamp();
    let account = ledger.create_account(name, now)?;
    tracing::debug!(id = account.id, "account created");
    println!("Added account '{}'", account.name);
    Ok(())
}

/// Lists all accounts with their creation dates.
pub fn list(ledger: &Ledger) -> Result<()> {
    let accounts = ledger.list_accounts()?;
    print!("{}", format_accounts(&Local, &accounts));
    Ok(())
}

/// Format accounts for human-readable output.
fn format_accounts<Tz: TimeZone>(tz: &Tz, accounts: &[Account]) -> String {
    let mut output = String::new();

    if accounts.is_empty() {
        writeln!(output, "No accounts yet. Add one with 'tm add-account <name>'.").unwrap();
        return output;
    }

    writeln!(output, "{:<4}  {:<28}  Created", "ID", "Name").unwrap();
    for account in accounts {
        writeln!(
            output,
            "{:<4}  {:<28}  {}",
            account.id,
            account.name,
            local_date(tz, account.created_at)
        )
        .unwrap();
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_empty_accounts_hints_at_add() {
        let output = format_accounts(&Utc, &[]);
        assert!(output.contains("tm add-account"));
    }

    #[test]
    fn test_format_accounts_shows_name_and_date() {
        let accounts = vec![Account {
            id: 1,
            name: "Work".to_string(),
            // 2025-01-27T09:00:00Z
            created_at: 1_737_968_400,
        }];
        let output = format_accounts(&Utc, &accounts);
        assert!(output.contains("Work"));
        assert!(output.contains("2025-01-27"));
    }
}
