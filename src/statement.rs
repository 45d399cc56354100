//! Statement model: the per-file accumulator and its transaction lines.

use crate::decimal::Amount;
use crate::error::Result;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::io::Write;

/// Identifier of a counterparty account.
///
/// The account code is free text (usually a spaced IBAN); it is not validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankAccount {
    /// Bank identifier (BIC). KBC exports never fill this in.
    pub bank_id: String,

    /// Account code, e.g. `BE12 1234 5678 9012`.
    pub acct_id: String,
}

impl BankAccount {
    /// Creates an account without bank identifier.
    pub fn new(acct_id: impl Into<String>) -> Self {
        BankAccount {
            bank_id: String::new(),
            acct_id: acct_id.into(),
        }
    }
}

impl fmt::Display for BankAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.acct_id)
    }
}

/// One normalized transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementLine {
    /// Booking date.
    pub date: NaiveDate,

    /// Signed amount; negative for money leaving the account.
    pub amount: Amount,

    /// Raw transaction description.
    pub memo: String,

    /// Counterparty name. `None` when neither the payee column nor the memo names one.
    pub payee: Option<String>,

    /// Counterparty account, from its own column or from the memo.
    pub bank_account_to: Option<BankAccount>,
}

/// Everything parsed from one export file.
///
/// # Invariants
///
/// - `account_id` and `currency` are set by the first data row and never change
/// - `lines` only grows, in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statement {
    /// Account the file belongs to.
    pub account_id: Option<String>,

    /// Currency of every line in the file.
    pub currency: Option<String>,

    /// Transactions in file order.
    pub lines: Vec<StatementLine>,
}

/// Flat CSV shape of a [`StatementLine`].
#[derive(Debug, Serialize)]
struct OutputRow<'a> {
    date: String,
    amount: Amount,
    payee: Option<&'a str>,
    bank_account_to: Option<&'a str>,
    memo: &'a str,
}

impl Statement {
    /// Creates an empty statement.
    pub fn new() -> Self {
        Statement::default()
    }

    /// Earliest line date, `None` for an empty statement.
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.lines.iter().map(|l| l.date).min()
    }

    /// Latest line date, `None` for an empty statement.
    pub fn end_date(&self) -> Option<NaiveDate> {
        self.lines.iter().map(|l| l.date).max()
    }

    /// Net sum of all line amounts.
    pub fn total(&self) -> Amount {
        self.lines
            .iter()
            .fold(Amount::ZERO, |acc, line| acc + line.amount)
    }

    /// Writes the lines as CSV with header `date,amount,payee,bank_account_to,memo`.
    ///
    /// Dates are written as `YYYY-MM-DD`.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        for line in &self.lines {
            csv_writer.serialize(OutputRow {
                date: line.date.format("%Y-%m-%d").to_string(),
                amount: line.amount,
                payee: line.payee.as_deref(),
                bank_account_to: line.bank_account_to.as_ref().map(|a| a.acct_id.as_str()),
                memo: &line.memo,
            })?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}
