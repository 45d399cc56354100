//! KBC CSV statement parser.
//!
//! Processes an export in a single forward pass. The first data row fixes the
//! statement's account id and currency; every later row must agree with them.
//! Any violation aborts the whole file: there is no skip-and-continue.

use crate::decimal::Amount;
use crate::error::{ParseError, Result};
use crate::memo::{MemoMatch, MemoPattern, CARD_PURCHASE, SAVINGS_TRANSFER};
use crate::record::{self, RawRow, RawRows, SkipInitialSpace};
use crate::statement::{BankAccount, Statement, StatementLine};
use chrono::NaiveDate;
use csv::Reader;
use log::{debug, trace};
use std::io::Read;

/// First field of the header row.
pub const HEADER_START: &str = "Rekeningnummer";

/// Number of fields in every data row.
pub const LINE_LENGTH: usize = 18;

/// Format of the date column.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Column indices (0-based) of the fields the parser reads.
pub mod column {
    pub const ACCOUNT_ID: usize = 0;
    pub const CURRENCY: usize = 3;
    pub const DATE: usize = 5;
    pub const MEMO: usize = 6;
    pub const AMOUNT: usize = 8;
    pub const COUNTERPARTY_ACCOUNT: usize = 12;
    pub const PAYEE: usize = 14;
}

/// Contract between a statement parser and the host driving it.
pub trait StatementParser {
    /// Parses the whole bound input into `statement`.
    ///
    /// Lines are appended to `statement.lines` only when every row parsed.
    fn parse(&mut self, statement: &mut Statement) -> Result<()>;
}

/// Parser bound to one KBC export stream.
pub struct KbcBeParser<R> {
    reader: Reader<SkipInitialSpace<R>>,

    /// Rows handed to [`KbcBeParser::parse_record`] so far, header included.
    line_nr: usize,
}

impl<R: Read> KbcBeParser<R> {
    /// Binds a parser to an input stream.
    pub fn new(input: R) -> Self {
        KbcBeParser {
            reader: record::reader(input),
            line_nr: 0,
        }
    }

    /// Returns the rows of the input, lazily. Consumes the stream.
    pub fn split_records(&mut self) -> RawRows<'_, R> {
        RawRows::new(&mut self.reader)
    }

    /// Processes one row against the statement accumulator.
    ///
    /// Returns `Ok(None)` for the header row.
    pub fn parse_record(
        &mut self,
        row: &RawRow,
        statement: &mut Statement,
    ) -> Result<Option<StatementLine>> {
        self.line_nr += 1;
        parse_row(row, self.line_nr, statement)
    }

    /// Lazy sequence of parsed lines. Stops after the first error.
    pub fn lines<'a>(&'a mut self, statement: &'a mut Statement) -> Lines<'a, R> {
        Lines {
            parser: self,
            statement,
            done: false,
        }
    }

    /// Parses the whole input into a fresh statement.
    pub fn into_statement(mut self) -> Result<Statement> {
        let mut statement = Statement::new();
        self.parse(&mut statement)?;
        Ok(statement)
    }
}

impl<R: Read> StatementParser for KbcBeParser<R> {
    fn parse(&mut self, statement: &mut Statement) -> Result<()> {
        let lines = self.lines(statement).collect::<Result<Vec<_>>>()?;
        debug!("Parsed {} statement lines", lines.len());
        statement.lines.extend(lines);
        Ok(())
    }
}

/// Iterator returned by [`KbcBeParser::lines`].
pub struct Lines<'a, R> {
    parser: &'a mut KbcBeParser<R>,
    statement: &'a mut Statement,
    done: bool,
}

impl<R: Read> Iterator for Lines<'_, R> {
    type Item = Result<StatementLine>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let row = match self.parser.split_records().next() {
                Some(Ok(row)) => row,
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(ParseError::Csv {
                        line: self.parser.line_nr + 1,
                        source: e,
                    }));
                }
                None => {
                    self.done = true;
                    return None;
                }
            };

            match self.parser.parse_record(&row, self.statement) {
                Ok(Some(line)) => return Some(Ok(line)),
                Ok(None) => continue,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
        None
    }
}

/// Processes one row. `line_nr` is the 1-based row number used in errors.
fn parse_row(
    row: &RawRow,
    line_nr: usize,
    statement: &mut Statement,
) -> Result<Option<StatementLine>> {
    if row.first() == Some(HEADER_START) {
        trace!("Line {}: header row skipped", line_nr);
        return Ok(None);
    }
    if row.len() != LINE_LENGTH {
        return Err(ParseError::Structural {
            line: line_nr,
            found: row.len(),
            expected: LINE_LENGTH,
        });
    }

    let account_id = &row[column::ACCOUNT_ID];
    match &statement.account_id {
        Some(expected) if expected != account_id => {
            return Err(ParseError::AccountMismatch {
                line: line_nr,
                found: account_id.to_string(),
                expected: expected.clone(),
            });
        }
        Some(_) => {}
        None => {
            debug!("Line {}: statement account is {}", line_nr, account_id);
            statement.account_id = Some(account_id.to_string());
        }
    }

    let currency = &row[column::CURRENCY];
    match &statement.currency {
        Some(expected) if expected != currency => {
            return Err(ParseError::CurrencyMismatch {
                line: line_nr,
                found: currency.to_string(),
                expected: expected.clone(),
            });
        }
        Some(_) => {}
        None => {
            debug!("Line {}: statement currency is {}", line_nr, currency);
            statement.currency = Some(currency.to_string());
        }
    }

    let mut line = map_fields(row, line_nr)?;
    extract_counterparty_account(&mut line, &row[column::COUNTERPARTY_ACCOUNT], line_nr)?;
    if line.payee.is_none() {
        extract_payee(&mut line, line_nr)?;
    }

    Ok(Some(line))
}

/// Maps the fixed columns onto a new line.
fn map_fields(row: &RawRow, line_nr: usize) -> Result<StatementLine> {
    let date_text = &row[column::DATE];
    let date = NaiveDate::parse_from_str(date_text.trim(), DATE_FORMAT).map_err(|_| {
        ParseError::InvalidDate {
            line: line_nr,
            value: date_text.to_string(),
        }
    })?;

    let amount_text = &row[column::AMOUNT];
    let amount =
        Amount::from_decimal_comma(amount_text).map_err(|_| ParseError::InvalidAmount {
            line: line_nr,
            value: amount_text.to_string(),
        })?;

    let payee = &row[column::PAYEE];

    Ok(StatementLine {
        date,
        amount,
        memo: row[column::MEMO].to_string(),
        payee: (!payee.is_empty()).then(|| payee.to_string()),
        bank_account_to: None,
    })
}

/// Sets `bank_account_to` from the counterparty column, or else from a savings memo.
///
/// The column wins whenever it is filled in; the memo is not consulted then.
fn extract_counterparty_account(
    line: &mut StatementLine,
    counterparty: &str,
    line_nr: usize,
) -> Result<()> {
    if !counterparty.is_empty() {
        line.bank_account_to = Some(BankAccount::new(counterparty));
        return Ok(());
    }

    if let Some(acct) = match_memo(&SAVINGS_TRANSFER, &line.memo, line_nr)? {
        trace!("Line {}: savings counterparty {}", line_nr, acct);
        line.bank_account_to = Some(BankAccount::new(acct));
    }
    Ok(())
}

/// Derives a missing payee from card purchase or savings memos.
fn extract_payee(line: &mut StatementLine, line_nr: usize) -> Result<()> {
    let payee = if CARD_PURCHASE.applies_to(&line.memo) {
        match_memo(&CARD_PURCHASE, &line.memo, line_nr)?
    } else {
        match_memo(&SAVINGS_TRANSFER, &line.memo, line_nr)?
    };

    if let Some(payee) = payee {
        trace!("Line {}: payee {} taken from memo", line_nr, payee);
        line.payee = Some(payee.to_string());
    }
    Ok(())
}

/// Applies a memo pattern, turning a half match into a [`ParseError::PatternMismatch`].
fn match_memo<'m>(pattern: &MemoPattern, memo: &'m str, line_nr: usize) -> Result<Option<&'m str>> {
    match pattern.captures(memo) {
        MemoMatch::NotApplicable => Ok(None),
        MemoMatch::Captured(value) => Ok(Some(value)),
        MemoMatch::Mismatch => Err(ParseError::PatternMismatch {
            line: line_nr,
            pattern: pattern.name,
            memo: memo.to_string(),
        }),
    }
}
