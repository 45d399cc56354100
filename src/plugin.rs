//! Entry point used by hosts to get a parser for a file.

use crate::parser::{KbcBeParser, StatementParser};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

/// A statement format a host can hand files to.
pub trait Plugin {
    type Parser: StatementParser;

    /// Opens `path` and binds a parser to it.
    ///
    /// Only file-system errors are returned; contents are not read yet.
    fn get_parser(&self, path: &Path) -> io::Result<Self::Parser>;
}

/// Plugin for KBC (Belgium) CSV exports.
#[derive(Debug, Clone, Copy, Default)]
pub struct KbcBePlugin;

impl Plugin for KbcBePlugin {
    type Parser = KbcBeParser<BufReader<File>>;

    fn get_parser(&self, path: &Path) -> io::Result<Self::Parser> {
        let file = File::open(path)?;
        Ok(KbcBeParser::new(BufReader::new(file)))
    }
}
