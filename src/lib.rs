//! # KBC Statement
//!
//! Parser for the semicolon-delimited CSV account export of KBC Bank
//! (Belgium), producing normalized statement lines for accounting imports.
//!
//! ## Design Principles
//!
//! - **Exact decimals**: amounts go through `rust_decimal`, never floats
//! - **Streaming**: one row in memory at a time
//! - **Strict invariants**: one file is one account in one currency
//! - **Fail fast**: the first malformed row aborts the whole file
//!
//! ## Example
//!
//! ```
//! use kbcbe_statement::KbcBeParser;
//! use std::io::Cursor;
//!
//! let csv = "Rekeningnummer;Rubrieknaam;Naam;Munt\n\
//!            BE1;Zicht;JAN;EUR;1;02/01/2024;STORTING;02/01/2024;100,00;;;;;;;;;\n";
//! let statement = KbcBeParser::new(Cursor::new(csv)).into_statement().unwrap();
//! assert_eq!(statement.currency.as_deref(), Some("EUR"));
//! assert_eq!(statement.lines[0].amount.to_string(), "100.00");
//! ```

pub mod decimal;
pub mod error;
pub mod memo;
pub mod parser;
pub mod plugin;
pub mod record;
pub mod statement;

pub use decimal::Amount;
pub use error::{ParseError, Result};
pub use parser::{KbcBeParser, Lines, StatementParser};
pub use plugin::{KbcBePlugin, Plugin};
pub use record::RawRow;
pub use statement::{BankAccount, Statement, StatementLine};
